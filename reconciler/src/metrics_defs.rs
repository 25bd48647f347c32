//! Metrics definitions for the reconciler.

use shared::metrics_defs::{MetricDef, MetricType};

pub const ROUTES_FILTERED: MetricDef = MetricDef {
    name: "routes.filtered",
    metric_type: MetricType::Gauge,
    description: "Number of routes served by the application being updated",
};

pub const ROUTES_SKIPPED: MetricDef = MetricDef {
    name: "routes.skipped",
    metric_type: MetricType::Counter,
    description: "Number of routes skipped because no rewrite could be planned",
};

pub const REWRITE_SUCCEEDED: MetricDef = MetricDef {
    name: "rewrite.succeeded",
    metric_type: MetricType::Counter,
    description: "Number of domain rewrites that completed",
};

pub const REWRITE_FAILED: MetricDef = MetricDef {
    name: "rewrite.failed",
    metric_type: MetricType::Counter,
    description: "Number of domain rewrites reported as failed",
};

pub const REWRITE_DURATION: MetricDef = MetricDef {
    name: "rewrite.duration",
    metric_type: MetricType::Histogram,
    description: "Time to complete one domain rewrite in seconds",
};

pub const ALL_METRICS: &[MetricDef] = &[
    ROUTES_FILTERED,
    ROUTES_SKIPPED,
    REWRITE_SUCCEEDED,
    REWRITE_FAILED,
    REWRITE_DURATION,
];
