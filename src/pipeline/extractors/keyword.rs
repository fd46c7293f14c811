use std::collections::HashSet;

use super::{finish, ExtractContext, Extractor};
use crate::constants::{DEFAULT_KEYWORD_CATEGORY, EDGE_MOVIE_KEYWORD, NODE_KEYWORD};
use crate::graph::ids::{keyword_edge_id, keyword_id, strip_quotes};
use crate::graph::{GraphTable, PropertyType};

pub struct KeywordExtractor;

impl Extractor for KeywordExtractor {
    fn name(&self) -> &'static str {
        "keyword"
    }

    fn extract(&self, ctx: &ExtractContext<'_>) -> Vec<GraphTable> {
        let mut nodes = GraphTable::nodes(
            NODE_KEYWORD,
            &[("name", PropertyType::String), ("keyword_type", PropertyType::String)],
        );
        let mut edges = GraphTable::edges(EDGE_MOVIE_KEYWORD, &[]);
        // One node per keyword text; the first category seen names it
        let mut seen = HashSet::new();

        for title in &ctx.catalog.movies {
            for keyword in &title.keywords {
                let Some(text) = keyword.keyword.as_deref() else {
                    continue;
                };
                let id = keyword_id(text);
                let category = keyword
                    .category
                    .as_deref()
                    .filter(|c| !c.is_empty())
                    .unwrap_or(DEFAULT_KEYWORD_CATEGORY);

                if seen.insert(id.clone()) {
                    nodes.push(vec![
                        id.as_str().into(),
                        NODE_KEYWORD.into(),
                        strip_quotes(text).into(),
                        category.into(),
                    ]);
                }
                edges.push(vec![
                    keyword_edge_id(&title.title_id, &id).into(),
                    title.title_id.as_str().into(),
                    id.into(),
                    format!("described-by-{}-keyword", category).into(),
                ]);
            }
        }

        vec![finish(nodes), finish(edges)]
    }
}
