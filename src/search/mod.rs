//! Documents and request bodies for the managed search engine.

pub mod client;

pub use client::OpenSearchClient;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// One movie as stored in both the KNN and the text index
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieDocument {
    pub id: String,
    pub title: String,
    pub year: i32,
    pub poster: String,
    pub embeddings: Vec<f32>,
}

impl MovieDocument {
    /// `"<title> (<year>)"`, as shown in search results
    pub fn display_title(&self) -> String {
        format!("{} ({})", self.title, self.year)
    }
}

/// A search hit: the document id plus its stored source
#[derive(Debug, Clone, PartialEq)]
pub struct SearchHit {
    pub id: String,
    pub source: StoredMovie,
}

/// `_source` of a hit; the id lives on the hit, not in the source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredMovie {
    pub title: String,
    pub year: i32,
    pub poster: String,
    #[serde(default)]
    pub embeddings: Vec<f32>,
}

impl StoredMovie {
    pub fn display_title(&self) -> String {
        format!("{} ({})", self.title, self.year)
    }
}

impl From<&MovieDocument> for StoredMovie {
    fn from(doc: &MovieDocument) -> Self {
        Self {
            title: doc.title.clone(),
            year: doc.year,
            poster: doc.poster.clone(),
            embeddings: doc.embeddings.clone(),
        }
    }
}

/// Settings and mappings for a cosine-similarity KNN index
pub fn knn_index_body(dimension: usize) -> Value {
    json!({
        "settings": {
            "index.knn": true,
            "index.knn.space_type": "cosinesimil",
            "analysis": {
                "analyzer": {
                    "default": { "type": "standard", "stopwords": "_english_" }
                }
            }
        },
        "mappings": {
            "properties": {
                "embeddings": { "type": "knn_vector", "dimension": dimension }
            }
        }
    })
}

/// Bulk `index` actions, one action line and one source line per document
pub fn bulk_body(index: &str, docs: &[MovieDocument]) -> serde_json::Result<String> {
    let mut body = String::new();
    for doc in docs {
        let action = json!({ "index": { "_index": index, "_id": doc.id } });
        body.push_str(&serde_json::to_string(&action)?);
        body.push('\n');
        body.push_str(&serde_json::to_string(&StoredMovie::from(doc))?);
        body.push('\n');
    }
    Ok(body)
}

/// KNN query; asks for one extra hit since the probe usually matches itself
pub fn knn_query_body(vector: &[f32], k: usize) -> Value {
    json!({
        "size": k + 1,
        "query": { "knn": { "embeddings": { "vector": vector, "k": k } } }
    })
}

pub fn match_query_body(text: &str, size: usize) -> Value {
    json!({
        "size": size,
        "query": { "match": { "title": text } }
    })
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    hits: HitsEnvelope,
}

#[derive(Debug, Deserialize)]
struct HitsEnvelope {
    #[serde(default)]
    hits: Vec<RawHit>,
}

#[derive(Debug, Deserialize)]
struct RawHit {
    #[serde(rename = "_id")]
    id: String,
    #[serde(rename = "_source")]
    source: StoredMovie,
}

pub fn parse_hits(body: &str) -> serde_json::Result<Vec<SearchHit>> {
    let response: SearchResponse = serde_json::from_str(body)?;
    Ok(response
        .hits
        .hits
        .into_iter()
        .map(|h| SearchHit {
            id: h.id,
            source: h.source,
        })
        .collect())
}

/// Per-item failures reported by a bulk request
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BulkOutcome {
    pub indexed: usize,
    pub failed: usize,
}

pub fn parse_bulk_response(body: &str) -> serde_json::Result<BulkOutcome> {
    let value: Value = serde_json::from_str(body)?;
    let items = value.get("items").and_then(Value::as_array);
    let mut outcome = BulkOutcome::default();
    for item in items.into_iter().flatten() {
        let failed = item
            .as_object()
            .and_then(|o| o.values().next())
            .map(|action| action.get("error").is_some())
            .unwrap_or(true);
        if failed {
            outcome.failed += 1;
        } else {
            outcome.indexed += 1;
        }
    }
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(id: &str, title: &str) -> MovieDocument {
        MovieDocument {
            id: id.to_string(),
            title: title.to_string(),
            year: 1999,
            poster: "https://img/p.jpg".to_string(),
            embeddings: vec![0.5, -0.25],
        }
    }

    #[test]
    fn test_knn_index_body() {
        let body = knn_index_body(64);
        assert_eq!(body["settings"]["index.knn"], json!(true));
        assert_eq!(body["settings"]["index.knn.space_type"], "cosinesimil");
        assert_eq!(body["settings"]["analysis"]["analyzer"]["default"]["stopwords"], "_english_");
        assert_eq!(body["mappings"]["properties"]["embeddings"]["type"], "knn_vector");
        assert_eq!(body["mappings"]["properties"]["embeddings"]["dimension"], 64);
    }

    #[test]
    fn test_bulk_body_escapes_titles() {
        let body = bulk_body("ooc_knn", &[doc("tt1", r#"The "Matrix""#)]).unwrap();
        let lines: Vec<&str> = body.lines().collect();
        assert_eq!(lines.len(), 2);

        let action: Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(action["index"]["_index"], "ooc_knn");
        assert_eq!(action["index"]["_id"], "tt1");

        let source: StoredMovie = serde_json::from_str(lines[1]).unwrap();
        assert_eq!(source.title, r#"The "Matrix""#);
        assert_eq!(source.year, 1999);
        assert_eq!(source.embeddings, vec![0.5, -0.25]);
        assert!(body.ends_with('\n'));
    }

    #[test]
    fn test_knn_query_asks_for_one_extra() {
        let body = knn_query_body(&[1.0, 0.0], 5);
        assert_eq!(body["size"], 6);
        assert_eq!(body["query"]["knn"]["embeddings"]["k"], 5);
        assert_eq!(body["query"]["knn"]["embeddings"]["vector"], json!([1.0, 0.0]));
    }

    #[test]
    fn test_parse_hits() {
        let body = r#"{"took":3,"hits":{"total":{"value":1},"hits":[
            {"_index":"ooc_text","_id":"tt0133093","_score":2.1,
             "_source":{"title":"The Matrix","year":1999,"poster":"p","embeddings":[0.1,0.2]}}]}}"#;
        let hits = parse_hits(body).unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, "tt0133093");
        assert_eq!(hits[0].source.display_title(), "The Matrix (1999)");
    }

    #[test]
    fn test_parse_bulk_response_counts_failures() {
        let body = r#"{"took":5,"errors":true,"items":[
            {"index":{"_id":"tt1","status":201}},
            {"index":{"_id":"tt2","status":400,"error":{"type":"mapper_parsing_exception"}}}]}"#;
        assert_eq!(
            parse_bulk_response(body).unwrap(),
            BulkOutcome { indexed: 1, failed: 1 }
        );
    }
}
