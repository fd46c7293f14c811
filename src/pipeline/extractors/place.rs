use super::{finish, ExtractContext, Extractor};
use crate::constants::{EDGE_MOVIE_PLACE, NODE_PLACE};
use crate::graph::ids::{escape_quotes, place_edge_id, place_id};
use crate::graph::{GraphTable, PropertyType};

pub struct PlaceExtractor;

impl Extractor for PlaceExtractor {
    fn name(&self) -> &'static str {
        "place"
    }

    fn extract(&self, ctx: &ExtractContext<'_>) -> Vec<GraphTable> {
        let mut nodes = GraphTable::nodes(NODE_PLACE, &[("name", PropertyType::String)]).quoted();
        let mut edges = GraphTable::edges(EDGE_MOVIE_PLACE, &[]).quoted();

        for title in &ctx.catalog.movies {
            let places = title
                .locations
                .iter()
                .filter_map(|l| l.place.as_deref())
                .filter(|p| !p.is_empty());
            for place in places {
                let id = place_id(place);
                nodes.push(vec![id.as_str().into(), NODE_PLACE.into(), escape_quotes(place).into()]);
                edges.push(vec![
                    place_edge_id(&title.title_id, &id).into(),
                    title.title_id.as_str().into(),
                    id.into(),
                    "filmed-at".into(),
                ]);
            }
        }

        vec![finish(nodes), finish(edges)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Value;
    use crate::pipeline::extractors::fixtures::*;

    #[test]
    fn test_places_are_quoted_and_escaped() {
        let title = with_place(movie("tt1"), Some(r#"Studio "A", Rome, Italy"#));
        let catalog = catalog(vec![title], Vec::new());
        let financials = no_financials();
        let ctx = ExtractContext { catalog: &catalog, financials: &financials };

        let tables = PlaceExtractor.extract(&ctx);
        let (nodes, edges) = (&tables[0], &tables[1]);
        assert!(nodes.quote_all && edges.quote_all);
        assert_eq!(nodes.value(0, "name:String"), Some(&Value::from("Studio ''A'', Rome, Italy")));
        assert_eq!(edges.value(0, "~label"), Some(&Value::from("filmed-at")));
        assert_eq!(
            edges.value(0, "~id"),
            Some(&Value::Str(format!("tt1-place-{}", place_id(r#"Studio "A", Rome, Italy"#))))
        );
    }

    #[test]
    fn test_locations_without_place_are_skipped() {
        let title = with_place(with_place(movie("tt1"), None), Some("Paris, France"));
        let other = with_place(movie("tt2"), Some("Paris, France"));
        let catalog = catalog(vec![title, other], Vec::new());
        let financials = no_financials();
        let ctx = ExtractContext { catalog: &catalog, financials: &financials };

        let tables = PlaceExtractor.extract(&ctx);
        assert_eq!(tables[0].len(), 1);
        assert_eq!(tables[1].len(), 2);
    }
}
