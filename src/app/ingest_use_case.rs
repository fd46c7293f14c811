//! Load graph embeddings and movie metadata into the search indices.

use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use tracing::{info, instrument, warn};

use crate::app::ports::SearchPort;
use crate::error::{CatalogError, Result};
use crate::search::{BulkOutcome, MovieDocument};

/// One trained embedding, keyed by graph node id
#[derive(Debug, Clone, PartialEq)]
pub struct NodeEmbedding {
    pub node_id: String,
    pub embedding: Vec<f32>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingRow {
    nodes: String,
    embedding: String,
}

/// Columns of the exported movie node table that end up in the index
#[derive(Debug, Clone, Deserialize)]
pub struct MovieNodeRow {
    #[serde(rename = "~id")]
    pub id: String,
    #[serde(rename = "name:String")]
    pub name: String,
    #[serde(rename = "year:Int")]
    pub year: i32,
    #[serde(rename = "poster:String")]
    pub poster: String,
}

fn open_csv(path: &Path) -> Result<csv::Reader<std::fs::File>> {
    csv::Reader::from_path(path).map_err(|e| match e.into_kind() {
        csv::ErrorKind::Io(io) => CatalogError::io(io, format!("Failed to open {}", path.display())),
        kind => CatalogError::Config(format!("Unreadable CSV {}: {:?}", path.display(), kind)),
    })
}

/// Read an embeddings CSV with `nodes` and `embedding` (a JSON list) columns
pub fn read_embeddings(path: &Path) -> Result<Vec<NodeEmbedding>> {
    let mut reader = open_csv(path)?;
    let mut out = Vec::new();
    for (i, row) in reader.deserialize::<EmbeddingRow>().enumerate() {
        let row = row?;
        let embedding: Vec<f32> = serde_json::from_str(&row.embedding).map_err(|source| {
            CatalogError::MalformedRecord {
                path: path.to_path_buf(),
                // header is line 1
                line: i + 2,
                source,
            }
        })?;
        out.push(NodeEmbedding {
            node_id: row.nodes,
            embedding,
        });
    }
    info!("Read {} embeddings from {}", out.len(), path.display());
    Ok(out)
}

pub fn read_movie_nodes(path: &Path) -> Result<Vec<MovieNodeRow>> {
    let mut reader = open_csv(path)?;
    let rows = reader
        .deserialize::<MovieNodeRow>()
        .collect::<std::result::Result<Vec<_>, _>>()?;
    info!("Read {} movie nodes from {}", rows.len(), path.display());
    Ok(rows)
}

/// Inner-join embeddings with movie nodes on node id, keeping embedding order.
///
/// Embeddings of non-movie nodes are dropped, as are vectors whose length
/// differs from `dimension`.
pub fn merge_embeddings(
    embeddings: Vec<NodeEmbedding>,
    movies: &[MovieNodeRow],
    dimension: usize,
) -> Vec<MovieDocument> {
    let by_id: HashMap<&str, &MovieNodeRow> = movies.iter().map(|m| (m.id.as_str(), m)).collect();
    let mut wrong_dimension = 0usize;

    let docs: Vec<MovieDocument> = embeddings
        .into_iter()
        .filter_map(|e| {
            let movie = by_id.get(e.node_id.as_str())?;
            if e.embedding.len() != dimension {
                wrong_dimension += 1;
                return None;
            }
            Some(MovieDocument {
                id: e.node_id,
                title: movie.name.clone(),
                year: movie.year,
                poster: movie.poster.clone(),
                embeddings: e.embedding,
            })
        })
        .collect();

    if wrong_dimension > 0 {
        warn!("Skipped {} embeddings whose length is not {}", wrong_dimension, dimension);
    }
    info!("Merged {} movie documents", docs.len());
    docs
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IngestReport {
    pub knn: BulkOutcome,
    pub text: BulkOutcome,
    pub created_knn_index: bool,
}

pub struct IngestUseCase {
    search: Arc<dyn SearchPort>,
    knn_index: String,
    text_index: String,
    dimension: usize,
    batch_size: usize,
}

impl IngestUseCase {
    pub fn new(
        search: Arc<dyn SearchPort>,
        knn_index: impl Into<String>,
        text_index: impl Into<String>,
        dimension: usize,
        batch_size: usize,
    ) -> Self {
        Self {
            search,
            knn_index: knn_index.into(),
            text_index: text_index.into(),
            dimension,
            batch_size: batch_size.max(1),
        }
    }

    /// Create the KNN index if missing, then upload to both indices
    #[instrument(skip(self, docs), fields(documents = docs.len()))]
    pub async fn ingest(&self, docs: &[MovieDocument]) -> Result<IngestReport> {
        let mut report = IngestReport::default();

        if self.search.index_exists(&self.knn_index).await? {
            info!("Index {} already exists", self.knn_index);
        } else {
            self.search.create_knn_index(&self.knn_index, self.dimension).await?;
            report.created_knn_index = true;
        }

        report.knn = self.upload(&self.knn_index, docs).await?;
        info!("Upload complete for {}", self.knn_index);
        report.text = self.upload(&self.text_index, docs).await?;
        info!("Upload complete for {}", self.text_index);
        Ok(report)
    }

    async fn upload(&self, index: &str, docs: &[MovieDocument]) -> Result<BulkOutcome> {
        let mut total = BulkOutcome::default();
        for (n, batch) in docs.chunks(self.batch_size).enumerate() {
            let outcome = self.search.bulk_index(index, batch).await?;
            total.indexed += outcome.indexed;
            total.failed += outcome.failed;
            info!("{}: uploaded batch {} ({} documents)", index, n + 1, batch.len());
        }
        Ok(total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn movie_row(id: &str, name: &str) -> MovieNodeRow {
        MovieNodeRow {
            id: id.to_string(),
            name: name.to_string(),
            year: 2000,
            poster: "unavailable".to_string(),
        }
    }

    #[test]
    fn test_read_embeddings_parses_list_literals() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("embeddings.csv");
        fs::write(&path, "nodes,embedding\ntt1,\"[0.1, -0.2, 3.0]\"\nnm1,\"[1, 2, 3]\"\n").unwrap();

        let rows = read_embeddings(&path).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].node_id, "tt1");
        assert_eq!(rows[0].embedding, vec![0.1, -0.2, 3.0]);
        assert_eq!(rows[1].embedding, vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_bad_embedding_reports_line() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("embeddings.csv");
        fs::write(&path, "nodes,embedding\ntt1,\"[0.1]\"\ntt2,\"[oops]\"\n").unwrap();

        match read_embeddings(&path) {
            Err(CatalogError::MalformedRecord { line, .. }) => assert_eq!(line, 3),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_read_movie_nodes_from_export() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("part-00000.csv");
        fs::write(
            &path,
            "~id,~label,name:String,poster:String,year:Int,status:String,rating:Float\n\
             tt1,movie,The Matrix,https://img/1.jpg,1999,released,8.7\n",
        )
        .unwrap();

        let rows = read_movie_nodes(&path).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].id, "tt1");
        assert_eq!(rows[0].name, "The Matrix");
        assert_eq!(rows[0].year, 1999);
    }

    #[test]
    fn test_merge_is_inner_join_in_embedding_order() {
        let embeddings = vec![
            NodeEmbedding { node_id: "tt2".to_string(), embedding: vec![0.0, 1.0] },
            NodeEmbedding { node_id: "gn0000000001".to_string(), embedding: vec![1.0, 1.0] },
            NodeEmbedding { node_id: "tt1".to_string(), embedding: vec![1.0, 0.0] },
            NodeEmbedding { node_id: "tt3".to_string(), embedding: vec![1.0] },
        ];
        let movies = vec![movie_row("tt1", "One"), movie_row("tt2", "Two"), movie_row("tt3", "Three")];

        let docs = merge_embeddings(embeddings, &movies, 2);
        let ids: Vec<&str> = docs.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, vec!["tt2", "tt1"]);
        assert_eq!(docs[0].title, "Two");
        assert_eq!(docs[1].embeddings, vec![1.0, 0.0]);
    }
}
