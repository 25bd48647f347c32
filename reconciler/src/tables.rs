use crate::config::TableGroups;
use crate::sites::ROOT_SITE_ID;

/// Builds the physical table names a rewrite for one site must touch.
///
/// Network tables are `<prefix><table>`. Per-site tables are
/// `<prefix><table>` for the root site and `<prefix><id>_<table>` for every
/// other site.
#[derive(Clone, Debug)]
pub struct TableTargetResolver {
    prefix: String,
    tables: TableGroups,
}

impl TableTargetResolver {
    pub fn new<P: Into<String>>(prefix: P, tables: TableGroups) -> Self {
        TableTargetResolver {
            prefix: prefix.into(),
            tables,
        }
    }

    /// Prefix of the per-site tables of `site_id`
    pub fn site_prefix(&self, site_id: u64) -> String {
        if site_id == ROOT_SITE_ID {
            self.prefix.clone()
        } else {
            format!("{}{}_", self.prefix, site_id)
        }
    }

    /// Network tables first, then per-site tables, each in configured order
    pub fn resolve(&self, site_id: u64) -> Vec<String> {
        let site_prefix = self.site_prefix(site_id);
        let network = self
            .tables
            .network
            .iter()
            .map(|table| format!("{}{}", self.prefix, table));
        let per_site = self
            .tables
            .per_site
            .iter()
            .map(|table| format!("{site_prefix}{table}"));
        network.chain(per_site).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn groups() -> TableGroups {
        TableGroups {
            network: vec!["site".into(), "blogs".into()],
            per_site: vec!["options".into()],
        }
    }

    #[test]
    fn test_root_site() {
        let resolver = TableTargetResolver::new("wp_", groups());
        assert_eq!(
            resolver.resolve(1),
            vec!["wp_site", "wp_blogs", "wp_options"]
        );
    }

    #[test]
    fn test_sub_site() {
        let resolver = TableTargetResolver::new("wp_", groups());
        assert_eq!(
            resolver.resolve(7),
            vec!["wp_site", "wp_blogs", "wp_7_options"]
        );
        assert_eq!(resolver.site_prefix(12), "wp_12_");
    }

    #[test]
    fn test_default_groups() {
        let resolver = TableTargetResolver::new("custom_", TableGroups::default());
        assert_eq!(
            resolver.resolve(2),
            vec![
                "custom_site",
                "custom_blogs",
                "custom_sitemeta",
                "custom_2_options",
                "custom_2_posts",
                "custom_2_postmeta",
            ]
        );
    }
}
