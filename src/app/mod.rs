pub mod ingest_use_case;
pub mod ports;
pub mod recommend_use_case;
