use super::{finish, ExtractContext, Extractor};
use crate::constants::{EDGE_HAS_RATING, NODE_RATING};
use crate::graph::ids::{rating_edge_id, rating_id, scaled_rating};
use crate::graph::{GraphTable, PropertyType, Value};

/// Rating nodes bucketed by tenths, linked from each rated movie
pub struct RatingExtractor;

impl Extractor for RatingExtractor {
    fn name(&self) -> &'static str {
        "rating"
    }

    fn extract(&self, ctx: &ExtractContext<'_>) -> Vec<GraphTable> {
        let mut nodes = GraphTable::nodes(NODE_RATING, &[("rating", PropertyType::Float)]);
        let mut edges = GraphTable::edges(EDGE_HAS_RATING, &[]);

        for title in &ctx.catalog.movies {
            let Some(rating) = title.rating() else {
                continue;
            };
            let id = rating_id(rating);
            // Node value is the bucket, so 8.46 and 8.54 share one node
            nodes.push(vec![
                id.as_str().into(),
                NODE_RATING.into(),
                Value::Float(f64::from(scaled_rating(rating)) / 10.0),
            ]);
            edges.push(vec![
                rating_edge_id(rating, &title.title_id).into(),
                title.title_id.as_str().into(),
                id.into(),
                EDGE_HAS_RATING.into(),
            ]);
        }

        vec![finish(nodes), finish(edges)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::extractors::fixtures::*;

    #[test]
    fn test_rated_movies_share_rating_node() {
        let catalog = catalog(
            vec![
                with_rating(movie("tt1"), 8.5, 10),
                with_rating(movie("tt2"), 8.5, 20),
                movie("tt3"),
            ],
            Vec::new(),
        );
        let financials = no_financials();
        let ctx = ExtractContext { catalog: &catalog, financials: &financials };

        let tables = RatingExtractor.extract(&ctx);
        let (nodes, edges) = (&tables[0], &tables[1]);
        assert_eq!(nodes.len(), 1);
        assert_eq!(nodes.value(0, "~id"), Some(&Value::from("rate85")));
        assert_eq!(nodes.value(0, "rating:Float"), Some(&Value::Float(8.5)));
        assert_eq!(edges.len(), 2);
        assert_eq!(edges.value(0, "~id"), Some(&Value::from("eTTRt-85-tt1")));
        assert_eq!(edges.value(1, "~from"), Some(&Value::from("tt2")));
        assert_eq!(edges.value(1, "~label"), Some(&Value::from("has_rating")));
    }

    #[test]
    fn test_unrated_movie_emits_nothing() {
        let catalog = catalog(vec![movie("tt1")], Vec::new());
        let financials = no_financials();
        let ctx = ExtractContext { catalog: &catalog, financials: &financials };
        assert!(RatingExtractor.extract(&ctx).iter().all(|t| t.is_empty()));
    }
}
