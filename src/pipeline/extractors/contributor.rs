use super::{finish, ExtractContext, Extractor};
use crate::constants::{is_tracked_crew_category, EDGE_PERSON_TITLE, SENTINEL_TEXT};
use crate::graph::ids::{cast_edge_id, crew_edge_id};
use crate::graph::GraphTable;

/// Person-movie edges for cast and allow-listed crew credits.
///
/// Credits whose person is not in the retained people set are dropped, so
/// every edge lands on an emitted person node.
pub struct ContributorExtractor;

impl Extractor for ContributorExtractor {
    fn name(&self) -> &'static str {
        "contributor"
    }

    fn extract(&self, ctx: &ExtractContext<'_>) -> Vec<GraphTable> {
        let people = ctx.catalog.person_ids();
        let mut edges = GraphTable::edges(EDGE_PERSON_TITLE, &[]);

        for title in &ctx.catalog.movies {
            for credit in &title.principal_cast_members {
                let Some(name_id) = credit.name_id.as_deref().filter(|id| people.contains(id)) else {
                    continue;
                };
                let category = credit.category.as_deref().unwrap_or(SENTINEL_TEXT);
                edges.push(vec![
                    cast_edge_id(&title.title_id, name_id).into(),
                    title.title_id.as_str().into(),
                    name_id.into(),
                    format!("casted-by-{}", category).into(),
                ]);
            }

            for credit in &title.principal_crew_members {
                let (Some(category), Some(name_id)) = (credit.category.as_deref(), credit.name_id.as_deref()) else {
                    continue;
                };
                if !is_tracked_crew_category(category) || !people.contains(name_id) {
                    continue;
                }
                edges.push(vec![
                    crew_edge_id(&title.title_id, name_id).into(),
                    title.title_id.as_str().into(),
                    name_id.into(),
                    format!("crewed-by-{}", category).into(),
                ]);
            }
        }

        vec![finish(edges)]
    }
}
