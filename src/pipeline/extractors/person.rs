use super::{finish, ExtractContext, Extractor};
use crate::catalog::Name;
use crate::constants::{NODE_PERSON, SENTINEL_TEXT};
use crate::graph::ids::escape_quotes;
use crate::graph::{GraphTable, PropertyType, Value};

pub struct PersonExtractor;

/// (nominee, winner) from a person's Oscar entries
fn oscar_flags(person: &Name) -> (bool, bool) {
    person
        .awards
        .iter()
        .filter(|a| a.is_oscar())
        .fold((false, false), |(_, won), award| (true, won || award.is_win()))
}

impl Extractor for PersonExtractor {
    fn name(&self) -> &'static str {
        "person"
    }

    fn extract(&self, ctx: &ExtractContext<'_>) -> Vec<GraphTable> {
        let mut nodes = GraphTable::nodes(
            NODE_PERSON,
            &[
                ("name", PropertyType::String),
                ("oscar_nominee", PropertyType::Bool),
                ("oscar_winner", PropertyType::Bool),
            ],
        )
        .quoted();

        for person in &ctx.catalog.people {
            let (nominee, winner) = oscar_flags(person);
            nodes.push(vec![
                person.name_id.as_str().into(),
                NODE_PERSON.into(),
                person
                    .name
                    .as_deref()
                    .map(escape_quotes)
                    .unwrap_or_else(|| SENTINEL_TEXT.to_string())
                    .into(),
                Value::Bool(nominee),
                Value::Bool(winner),
            ]);
        }

        vec![finish(nodes)]
    }
}
