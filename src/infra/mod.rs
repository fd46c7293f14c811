pub mod http_client;
pub mod sigv4;
