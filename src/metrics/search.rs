//! Search phase metrics

use crate::metrics::{phase_metric, MetricDoc, MetricType, PhaseMetrics};

pub struct SearchMetrics;

impl SearchMetrics {
    pub fn record_documents_indexed(index: &str, documents: usize) {
        ::metrics::counter!(phase_metric!(counter, "search", "documents_indexed"), "index" => index.to_string())
            .increment(documents as u64);
    }

    pub fn record_bulk_errors(index: &str) {
        ::metrics::counter!(phase_metric!(counter, "search", "bulk_errors"), "index" => index.to_string())
            .increment(1);
    }

    pub fn record_query(duration_secs: f64, hits: usize) {
        ::metrics::counter!(phase_metric!(counter, "search", "queries")).increment(1);
        ::metrics::histogram!(phase_metric!(histogram, "search", "query_duration_seconds"))
            .record(duration_secs);
        ::metrics::histogram!(phase_metric!(histogram, "search", "hits_per_query")).record(hits as f64);
    }
}

impl PhaseMetrics for SearchMetrics {
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
        "search"
    }

    fn metrics_documentation() -> Vec<MetricDoc> {
        vec![
            MetricDoc {
                name: phase_metric!(counter, "search", "documents_indexed"),
                metric_type: MetricType::Counter,
                help: "Documents sent in bulk upload requests",
            },
            MetricDoc {
                name: phase_metric!(counter, "search", "bulk_errors"),
                metric_type: MetricType::Counter,
                help: "Bulk responses reporting item errors",
            },
            MetricDoc {
                name: phase_metric!(counter, "search", "queries"),
                metric_type: MetricType::Counter,
                help: "Similarity queries served",
            },
            MetricDoc {
                name: phase_metric!(histogram, "search", "query_duration_seconds"),
                metric_type: MetricType::Histogram,
                help: "Time to answer a similarity query",
            },
            MetricDoc {
                name: phase_metric!(histogram, "search", "hits_per_query"),
                metric_type: MetricType::Histogram,
                help: "Title matches returned per query",
            },
        ]
    }
}
