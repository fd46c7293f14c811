//! Graph build phase metrics
//!
//! Row counts per table, retained catalog sizes and stage timings.

use crate::metrics::{phase_metric, MetricDoc, MetricType, PhaseMetrics};

pub struct GraphMetrics;

impl GraphMetrics {
    /// Rows emitted for one node or edge table
    pub fn record_table_rows(kind: &'static str, table: &'static str, rows: usize) {
        ::metrics::counter!(phase_metric!(counter, "graph", "rows_emitted"), "kind" => kind, "table" => table)
            .increment(rows as u64);
    }

    pub fn record_filtered(movies: usize, people: usize) {
        ::metrics::gauge!(phase_metric!(gauge, "graph", "movies_retained")).set(movies as f64);
        ::metrics::gauge!(phase_metric!(gauge, "graph", "people_retained")).set(people as f64);
    }

    pub fn record_financial_conflicts(titles: usize) {
        ::metrics::counter!(phase_metric!(counter, "graph", "financial_conflicts"))
            .increment(titles as u64);
    }

    /// Missing or unrepresentable cells written as sentinel values
    pub fn record_sentinels(table: &'static str, cells: usize) {
        ::metrics::counter!(phase_metric!(counter, "graph", "sentinel_cells"), "table" => table)
            .increment(cells as u64);
    }

    pub fn record_stage_duration(stage: &'static str, duration_secs: f64) {
        ::metrics::histogram!(phase_metric!(histogram, "graph", "stage_duration_seconds"), "stage" => stage)
            .record(duration_secs);
    }

    pub fn record_run(success: bool) {
        let outcome = if success { "success" } else { "failure" };
        ::metrics::counter!(phase_metric!(counter, "graph", "runs"), "outcome" => outcome).increment(1);
    }
}

impl PhaseMetrics for GraphMetrics {
    fn register_metrics() {
        for doc in Self::metrics_documentation() {
            match doc.metric_type {
                MetricType::Counter => ::metrics::describe_counter!(doc.name, doc.help),
                MetricType::Histogram => ::metrics::describe_histogram!(doc.name, doc.help),
                MetricType::Gauge => ::metrics::describe_gauge!(doc.name, doc.help),
            }
        }
    }

    fn phase_name() -> &'static str {
        "graph"
    }

    fn metrics_documentation() -> Vec<MetricDoc> {
        vec![
            MetricDoc {
                name: phase_metric!(counter, "graph", "rows_emitted"),
                metric_type: MetricType::Counter,
                help: "Rows emitted per node or edge table",
            },
            MetricDoc {
                name: phase_metric!(gauge, "graph", "movies_retained"),
                metric_type: MetricType::Gauge,
                help: "Titles retained by the movie filter",
            },
            MetricDoc {
                name: phase_metric!(gauge, "graph", "people_retained"),
                metric_type: MetricType::Gauge,
                help: "Names credited on a retained movie",
            },
            MetricDoc {
                name: phase_metric!(counter, "graph", "financial_conflicts"),
                metric_type: MetricType::Counter,
                help: "Titles with repeated gross or production budget rows",
            },
            MetricDoc {
                name: phase_metric!(counter, "graph", "sentinel_cells"),
                metric_type: MetricType::Counter,
                help: "Cells filled with a sentinel default",
            },
            MetricDoc {
                name: phase_metric!(histogram, "graph", "stage_duration_seconds"),
                metric_type: MetricType::Histogram,
                help: "Wall time per build stage",
            },
            MetricDoc {
                name: phase_metric!(counter, "graph", "runs"),
                metric_type: MetricType::Counter,
                help: "Graph build runs by outcome",
            },
        ]
    }
}
