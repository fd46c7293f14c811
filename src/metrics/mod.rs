//! Metrics for the graph build and the search API
//!
//! Each phase owns a submodule with its metric names, so names stay
//! consistent and conflicts are detected at registration.

pub mod graph;
pub mod registry;
pub mod search;

pub use graph::GraphMetrics;
pub use search::SearchMetrics;

use std::sync::Once;
use tracing::{info, warn};

static INIT: Once = Once::new();

/// Install the Prometheus recorder once per process.
///
/// The HTTP listener only starts when `CATALOG_GRAPH_METRICS_ADDR` is set;
/// otherwise metrics are recorded but not exposed.
pub fn init_metrics() {
    INIT.call_once(|| {
        let builder = metrics_exporter_prometheus::PrometheusBuilder::new();

        let listen_addr = std::env::var("CATALOG_GRAPH_METRICS_ADDR")
            .ok()
            .filter(|v| !v.trim().is_empty());

        let installed = match listen_addr {
            Some(addr_str) => match addr_str.trim().parse::<std::net::SocketAddr>() {
                // The HTTP exporter runs on the ambient tokio runtime
                Ok(addr) if tokio::runtime::Handle::try_current().is_ok() => {
                    info!("Prometheus HTTP exporter listening on http://{}/metrics", addr);
                    builder.with_http_listener(addr).install()
                }
                Ok(addr) => {
                    warn!("No async runtime for metrics listener on {}; recording only", addr);
                    builder.install_recorder().map(|_| ())
                }
                Err(e) => {
                    warn!("Invalid metrics addr '{}': {}; recording only", addr_str, e);
                    builder.install_recorder().map(|_| ())
                }
            },
            None => builder.install_recorder().map(|_| ()),
        };

        match installed {
            Ok(()) => {
                registry::register_all_metrics();
                info!("Metrics recorder installed");
            }
            Err(e) => warn!("Failed to install Prometheus recorder: {}", e),
        }
    });
}

/// Metric set owned by one phase
pub trait PhaseMetrics {
    /// Describe every metric of the phase to the recorder
    fn register_metrics();

    fn phase_name() -> &'static str;

    fn metrics_documentation() -> Vec<MetricDoc>;
}

#[derive(Debug, Clone)]
pub struct MetricDoc {
    pub name: &'static str,
    pub metric_type: MetricType,
    pub help: &'static str,
}

#[derive(Debug, Clone)]
pub enum MetricType {
    Counter,
    Histogram,
    Gauge,
}

/// Builds `catalog_graph_{phase}_{name}` names, with `_total` for counters
macro_rules! phase_metric {
    (counter, $phase:literal, $name:literal) => {
        concat!("catalog_graph_", $phase, "_", $name, "_total")
    };
    (histogram, $phase:literal, $name:literal) => {
        concat!("catalog_graph_", $phase, "_", $name)
    };
    (gauge, $phase:literal, $name:literal) => {
        concat!("catalog_graph_", $phase, "_", $name)
    };
}

pub(crate) use phase_metric;

#[cfg(test)]
mod tests {
    #[test]
    fn test_metric_naming_convention() {
        assert_eq!(
            phase_metric!(counter, "graph", "rows_written"),
            "catalog_graph_graph_rows_written_total"
        );
        assert_eq!(
            phase_metric!(histogram, "search", "query_duration_seconds"),
            "catalog_graph_search_query_duration_seconds"
        );
        assert_eq!(
            phase_metric!(gauge, "graph", "movies_retained"),
            "catalog_graph_graph_movies_retained"
        );
    }
}
