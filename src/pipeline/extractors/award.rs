use std::collections::HashSet;

use super::{finish, ExtractContext, Extractor};
use crate::catalog::Award;
use crate::constants::{EDGE_HAS_NOMINATION, EDGE_HAS_WON, NODE_AWARD_EVENT, SENTINEL_INT, SENTINEL_TEXT};
use crate::graph::ids::{award_event_id, nomination_edge_id, single_quote, win_edge_id};
use crate::graph::{GraphTable, PropertyType, Value};

/// Award events from titles and people; nomination and win edges from titles.
///
/// A title award lands in exactly one of `has_nomination` or `has_won`,
/// picked by its winner flag.
pub struct AwardExtractor;

impl Extractor for AwardExtractor {
    fn name(&self) -> &'static str {
        "award"
    }

    fn extract(&self, ctx: &ExtractContext<'_>) -> Vec<GraphTable> {
        let mut nodes = GraphTable::nodes(NODE_AWARD_EVENT, &[("event", PropertyType::String)]);
        let mut nominations = GraphTable::edges(EDGE_HAS_NOMINATION, &[("year", PropertyType::Int)]);
        let mut wins = GraphTable::edges(EDGE_HAS_WON, &[("year", PropertyType::Int)]);
        let mut seen_events = HashSet::new();

        let title_awards = ctx.catalog.movies.iter().flat_map(|t| t.awards.iter());
        let person_awards = ctx.catalog.people.iter().flat_map(|p| p.awards.iter());
        for event in title_awards.chain(person_awards).filter_map(|a| a.event.as_deref()) {
            if seen_events.insert(event) {
                nodes.push(vec![
                    award_event_id(event).into(),
                    NODE_AWARD_EVENT.into(),
                    single_quote(event).into(),
                ]);
            }
        }

        for title in &ctx.catalog.movies {
            for award in &title.awards {
                let Some(event) = award.event.as_deref() else {
                    continue;
                };
                let row = award_edge(award, &title.title_id, event);
                if award.is_win() {
                    wins.push(row);
                } else {
                    nominations.push(row);
                }
            }
        }

        vec![finish(nodes), finish(nominations), finish(wins)]
    }
}

fn award_edge(award: &Award, title_id: &str, event: &str) -> Vec<Value> {
    let nomination = award.award_nomination_id.as_deref().unwrap_or(SENTINEL_TEXT);
    let year = award.year.unwrap_or(SENTINEL_INT);
    let year_key = year.to_string();

    let (id, label) = if award.is_win() {
        (win_edge_id(nomination, title_id, &year_key), EDGE_HAS_WON)
    } else {
        (nomination_edge_id(nomination, title_id, &year_key), "nominated_for")
    };

    vec![
        id.into(),
        title_id.into(),
        award_event_id(event).into(),
        label.into(),
        Value::Int(year),
    ]
}
