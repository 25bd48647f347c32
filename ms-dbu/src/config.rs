use reconciler::config::Config as ReconcilerConfig;
use reconciler::wp_cli::WpCliConfig;
use sentry::types::{Dsn, ParseDsnError};
use serde::Deserialize;
use std::fs::File;

#[derive(Deserialize, Debug)]
pub struct MetricsConfig {
    pub statsd_host: String,
    pub statsd_port: u16,
}

#[derive(Deserialize, Debug)]
pub struct LoggingConfig {
    pub sentry_dsn: String,
}

impl LoggingConfig {
    pub fn dsn(&self) -> Result<Dsn, ConfigError> {
        Ok(self.sentry_dsn.parse()?)
    }
}

#[derive(Deserialize, Debug, Default)]
pub struct Config {
    #[serde(flatten)]
    pub reconciler: ReconcilerConfig,
    #[serde(default)]
    pub wp_cli: WpCliConfig,
    pub metrics: Option<MetricsConfig>,
    pub logging: Option<LoggingConfig>,
}

impl Config {
    pub fn from_file(path: &std::path::Path) -> Result<Self, ConfigError> {
        let file = File::open(path)?;
        let data: Config = serde_yaml::from_reader(file)?;

        if let Some(logging) = &data.logging {
            logging.dsn()?;
        }

        Ok(data)
    }
}

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("could not load config from file: {0}")]
    LoadError(#[from] std::io::Error),
    #[error("could not parse config: {0}")]
    ParseError(#[from] serde_yaml::Error),
    #[error("invalid sentry_dsn: {0}")]
    InvalidDsn(#[from] ParseDsnError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_tmp_file(s: &str) -> tempfile::NamedTempFile {
        let mut tmp = tempfile::NamedTempFile::new().expect("create temp file");
        write!(tmp, "{}", s).expect("write yaml");

        tmp
    }

    #[test]
    fn full_config() {
        let yaml = r#"
            env_prefix: PLATFORM_
            table_prefix: wp_
            strict_primary: true
            tables:
                network: [site, blogs]
                per_site: [options, posts, postmeta]
            wp_cli:
                path: /app/web/wp
                extra_args: ["--skip-plugins"]
            metrics:
                statsd_host: 127.0.0.1
                statsd_port: 8125
            logging:
                sentry_dsn: https://key@sentry.example.com/1
            "#;
        let tmp = write_tmp_file(yaml);
        let config = Config::from_file(tmp.path()).expect("load config");
        assert_eq!(config.reconciler.table_prefix.as_deref(), Some("wp_"));
        assert!(config.reconciler.strict_primary);
        assert_eq!(config.reconciler.tables.network, vec!["site", "blogs"]);
        assert_eq!(config.reconciler.site_scheme, "https");
        assert_eq!(config.wp_cli.binary, "wp");
        assert_eq!(config.wp_cli.path.as_deref(), Some("/app/web/wp"));
        assert_eq!(config.wp_cli.extra_args, vec!["--skip-plugins"]);
        assert_eq!(config.metrics.expect("metrics config").statsd_port, 8125);
        assert!(config.logging.is_some());
    }

    #[test]
    fn minimal_config() {
        let tmp = write_tmp_file("primary_last: false\n");
        let config = Config::from_file(tmp.path()).expect("load config");
        assert!(!config.reconciler.primary_last);
        assert_eq!(config.reconciler.env_prefix, "PLATFORM_");
        assert!(config.metrics.is_none());
        assert!(config.logging.is_none());
    }

    #[test]
    fn config_errors() {
        let missing = Config::from_file(std::path::Path::new("/nonexistent/ms-dbu.yaml"));
        assert!(matches!(missing, Err(ConfigError::LoadError(_))));

        let tmp = write_tmp_file("metrics:\n    statsd_port: not-a-port\n");
        let invalid = Config::from_file(tmp.path());
        assert!(matches!(invalid, Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn invalid_sentry_dsn() {
        let tmp = write_tmp_file("logging:\n    sentry_dsn: not-a-dsn\n");
        let invalid = Config::from_file(tmp.path());
        assert!(matches!(invalid, Err(ConfigError::InvalidDsn(_))));

        let logging = LoggingConfig {
            sentry_dsn: "https://key@sentry.example.com/1".into(),
        };
        assert!(logging.dsn().is_ok());
    }
}
