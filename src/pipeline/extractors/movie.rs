use super::{finish, ExtractContext, Extractor};
use crate::constants::{
    NODE_MOVIE, SENTINEL_FLOAT, SENTINEL_INT, SENTINEL_LONG, SENTINEL_POSTER, SENTINEL_TEXT,
};
use crate::graph::ids::escape_quotes;
use crate::graph::{GraphTable, PropertyType, Value};
use crate::metrics::GraphMetrics;

/// Movie nodes enriched with box-office figures
pub struct MovieExtractor;

impl Extractor for MovieExtractor {
    fn name(&self) -> &'static str {
        "movie"
    }

    fn extract(&self, ctx: &ExtractContext<'_>) -> Vec<GraphTable> {
        let mut nodes = GraphTable::nodes(
            NODE_MOVIE,
            &[
                ("name", PropertyType::String),
                ("poster", PropertyType::String),
                ("year", PropertyType::Int),
                ("status", PropertyType::String),
                ("rating", PropertyType::Float),
                ("votes", PropertyType::Int),
                ("gross_international", PropertyType::Long),
                ("gross_worldwide", PropertyType::Int),
                ("gross_domestic", PropertyType::Int),
                ("budget_production", PropertyType::Int),
            ],
        );

        let mut sentinels = 0usize;
        for title in &ctx.catalog.movies {
            let money = ctx.financials.get(&title.title_id);
            let votes = title.votes().and_then(|v| i32::try_from(v).ok());
            sentinels += [
                title.original_title.is_none(),
                title.poster_url().is_none(),
                title.year.is_none(),
                title.latest_status().is_none(),
                title.rating().is_none(),
                votes.is_none(),
                money.gross_international.is_none(),
                money.gross_worldwide.is_none(),
                money.gross_domestic.is_none(),
                money.budget_production.is_none(),
            ]
            .iter()
            .filter(|missing| **missing)
            .count();

            nodes.push(vec![
                title.title_id.as_str().into(),
                NODE_MOVIE.into(),
                title
                    .original_title
                    .as_deref()
                    .map(escape_quotes)
                    .unwrap_or_else(|| SENTINEL_TEXT.to_string())
                    .into(),
                title.poster_url().unwrap_or(SENTINEL_POSTER).into(),
                Value::Int(title.year.unwrap_or(SENTINEL_INT)),
                title.latest_status().unwrap_or(SENTINEL_TEXT).into(),
                Value::Float(title.rating().unwrap_or(SENTINEL_FLOAT)),
                Value::Int(votes.unwrap_or(SENTINEL_INT)),
                Value::Long(money.gross_international.unwrap_or(SENTINEL_LONG)),
                Value::Int(money.gross_worldwide.unwrap_or(SENTINEL_INT)),
                Value::Int(money.gross_domestic.unwrap_or(SENTINEL_INT)),
                Value::Int(money.budget_production.unwrap_or(SENTINEL_INT)),
            ]);
        }
        GraphMetrics::record_sentinels(NODE_MOVIE, sentinels);

        vec![finish(nodes)]
    }
}
