use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, instrument};

use crate::app::ports::SearchPort;
use crate::error::Result;

/// One matched title and the titles nearest to it in embedding space
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    pub result: String,
    pub recs: Vec<String>,
    #[serde(rename = "ttId")]
    pub tt_id: String,
    pub recs_id: Vec<String>,
    pub rec_poster: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecommendationResponse {
    pub results: Vec<Recommendation>,
}

pub struct RecommendUseCase {
    search: Arc<dyn SearchPort>,
    knn_index: String,
    text_index: String,
}

impl RecommendUseCase {
    pub fn new(search: Arc<dyn SearchPort>, knn_index: impl Into<String>, text_index: impl Into<String>) -> Self {
        Self {
            search,
            knn_index: knn_index.into(),
            text_index: text_index.into(),
        }
    }

    /// Match `query` against titles, then find `num_recs` neighbours of each match
    #[instrument(skip(self))]
    pub async fn get_movies(&self, query: &str, num_movies: usize, num_recs: usize) -> Result<RecommendationResponse> {
        let matches = self.search.match_title(&self.text_index, query, num_movies).await?;
        debug!("{} title matches for '{}'", matches.len(), query);

        let mut results = Vec::with_capacity(matches.len());
        for hit in matches {
            let recs = self
                .search
                .knn_search(&self.knn_index, &hit.source.embeddings, num_recs)
                .await?;
            results.push(Recommendation {
                result: hit.source.display_title(),
                recs: recs.iter().map(|r| r.source.display_title()).collect(),
                tt_id: hit.id,
                recs_id: recs.iter().map(|r| r.id.clone()).collect(),
                rec_poster: recs.iter().map(|r| r.source.poster.clone()).collect(),
            });
        }
        Ok(RecommendationResponse { results })
    }
}
