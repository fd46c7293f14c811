pub mod app;
pub mod catalog;
pub mod config;
pub mod constants;
pub mod error;
pub mod graph;
pub mod infra;
pub mod logging;
pub mod metrics;
pub mod ml;
pub mod pipeline;
pub mod search;
pub mod server;
