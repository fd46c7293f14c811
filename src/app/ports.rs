use async_trait::async_trait;

use crate::error::Result;
use crate::search::{BulkOutcome, MovieDocument, SearchHit};

/// Operations the ingest and recommendation services need from the search engine
#[async_trait]
pub trait SearchPort: Send + Sync {
    async fn index_exists(&self, index: &str) -> Result<bool>;

    async fn create_knn_index(&self, index: &str, dimension: usize) -> Result<()>;

    async fn bulk_index(&self, index: &str, docs: &[MovieDocument]) -> Result<BulkOutcome>;

    /// Nearest neighbours of `vector`; returns up to `k + 1` hits
    async fn knn_search(&self, index: &str, vector: &[f32], k: usize) -> Result<Vec<SearchHit>>;

    async fn match_title(&self, index: &str, text: &str, size: usize) -> Result<Vec<SearchHit>>;
}
