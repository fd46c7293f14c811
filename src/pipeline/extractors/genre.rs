use super::{finish, ExtractContext, Extractor};
use crate::constants::{EDGE_MOVIE_GENRE, NODE_GENRE};
use crate::graph::ids::{genre_edge_id, genre_id};
use crate::graph::{GraphTable, PropertyType};

pub struct GenreExtractor;

impl Extractor for GenreExtractor {
    fn name(&self) -> &'static str {
        "genre"
    }

    fn extract(&self, ctx: &ExtractContext<'_>) -> Vec<GraphTable> {
        let mut nodes = GraphTable::nodes(NODE_GENRE, &[("name", PropertyType::String)]);
        let mut edges = GraphTable::edges(EDGE_MOVIE_GENRE, &[]);

        for title in &ctx.catalog.movies {
            for genre in &title.genres {
                let id = genre_id(genre);
                nodes.push(vec![id.as_str().into(), NODE_GENRE.into(), genre.as_str().into()]);
                edges.push(vec![
                    genre_edge_id(&title.title_id, &id).into(),
                    title.title_id.as_str().into(),
                    id.into(),
                    "is-genre".into(),
                ]);
            }
        }

        vec![finish(nodes), finish(edges)]
    }
}
