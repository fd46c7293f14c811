use async_trait::async_trait;
use std::time::Instant;
use tracing::{info, warn};

use super::{
    bulk_body, knn_index_body, knn_query_body, match_query_body, parse_bulk_response, parse_hits,
    BulkOutcome, MovieDocument, SearchHit,
};
use crate::app::ports::SearchPort;
use crate::config::SearchConfig;
use crate::error::Result;
use crate::infra::http_client::SignedHttpClient;
use crate::metrics::SearchMetrics;

const SIGNING_SERVICE: &str = "es";

/// OpenSearch REST client
pub struct OpenSearchClient {
    endpoint: String,
    http: SignedHttpClient,
}

impl OpenSearchClient {
    pub async fn new(config: &SearchConfig) -> Result<Self> {
        let http = SignedHttpClient::new(config.auth_mode, &config.region, SIGNING_SERVICE).await?;
        Ok(Self::with_http(&config.endpoint, http))
    }

    pub fn with_http(endpoint: &str, http: SignedHttpClient) -> Self {
        Self {
            endpoint: normalize_endpoint(endpoint),
            http,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.endpoint, path.trim_start_matches('/'))
    }

    async fn search(&self, index: &str, body: &serde_json::Value) -> Result<Vec<SearchHit>> {
        let resp = self
            .http
            .post_json(&self.url(&format!("{}/_search", index)), body)
            .await?
            .error_for_status()?;
        Ok(parse_hits(&resp.body)?)
    }
}

/// Accept bare hosts as well as URLs
fn normalize_endpoint(endpoint: &str) -> String {
    let trimmed = endpoint.trim().trim_end_matches('/');
    if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        trimmed.to_string()
    } else {
        format!("https://{}", trimmed)
    }
}

#[async_trait]
impl SearchPort for OpenSearchClient {
    async fn index_exists(&self, index: &str) -> Result<bool> {
        let resp = self.http.head(&self.url(index)).await?;
        match resp.status {
            404 => Ok(false),
            _ => resp.error_for_status().map(|_| true),
        }
    }

    async fn create_knn_index(&self, index: &str, dimension: usize) -> Result<()> {
        self.http
            .put_json(&self.url(index), &knn_index_body(dimension))
            .await?
            .error_for_status()?;
        info!("Created knn index {} (dimension {})", index, dimension);
        Ok(())
    }

    async fn bulk_index(&self, index: &str, docs: &[MovieDocument]) -> Result<BulkOutcome> {
        let body = bulk_body(index, docs)?;
        let resp = self.http.post_ndjson(&self.url("_bulk"), body).await?.error_for_status()?;
        let outcome = parse_bulk_response(&resp.body)?;
        if outcome.failed > 0 {
            warn!("{} of {} documents rejected by {}", outcome.failed, docs.len(), index);
            SearchMetrics::record_bulk_errors(index);
        }
        SearchMetrics::record_documents_indexed(index, outcome.indexed);
        Ok(outcome)
    }

    async fn knn_search(&self, index: &str, vector: &[f32], k: usize) -> Result<Vec<SearchHit>> {
        let started = Instant::now();
        let hits = self.search(index, &knn_query_body(vector, k)).await?;
        SearchMetrics::record_query(started.elapsed().as_secs_f64(), hits.len());
        Ok(hits)
    }

    async fn match_title(&self, index: &str, text: &str, size: usize) -> Result<Vec<SearchHit>> {
        let started = Instant::now();
        let hits = self.search(index, &match_query_body(text, size)).await?;
        SearchMetrics::record_query(started.elapsed().as_secs_f64(), hits.len());
        Ok(hits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_normalization() {
        assert_eq!(normalize_endpoint("search-x.us-east-1.es.amazonaws.com"), "https://search-x.us-east-1.es.amazonaws.com");
        assert_eq!(normalize_endpoint("http://localhost:9200/"), "http://localhost:9200");

        let client = OpenSearchClient::with_http("http://localhost:9200/", SignedHttpClient::with_signer(None));
        assert_eq!(client.url("/ooc_knn/_search"), "http://localhost:9200/ooc_knn/_search");
    }
}
