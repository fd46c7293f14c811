//! Per-aspect extractors.
//!
//! Each extractor reads the filtered catalog and emits its own node and/or
//! edge tables. None reads another's output, so they can run in any order.

pub mod award;
pub mod contributor;
pub mod genre;
pub mod keyword;
pub mod movie;
pub mod person;
pub mod place;
pub mod rating;

use crate::catalog::{FilteredCatalog, FinancialIndex};
use crate::graph::{GraphTable, TableKind};
use crate::metrics::GraphMetrics;
use tracing::info;

pub use award::AwardExtractor;
pub use contributor::ContributorExtractor;
pub use genre::GenreExtractor;
pub use keyword::KeywordExtractor;
pub use movie::MovieExtractor;
pub use person::PersonExtractor;
pub use place::PlaceExtractor;
pub use rating::RatingExtractor;

/// Shared read-only inputs for every extractor
pub struct ExtractContext<'a> {
    pub catalog: &'a FilteredCatalog,
    pub financials: &'a FinancialIndex,
}

pub trait Extractor: Send + Sync {
    fn name(&self) -> &'static str;

    /// Produce this aspect's tables, already deduplicated
    fn extract(&self, ctx: &ExtractContext<'_>) -> Vec<GraphTable>;
}

/// Every extractor the build runs
pub fn all_extractors() -> Vec<Box<dyn Extractor>> {
    vec![
        Box::new(MovieExtractor),
        Box::new(GenreExtractor),
        Box::new(KeywordExtractor),
        Box::new(ContributorExtractor),
        Box::new(PersonExtractor),
        Box::new(RatingExtractor),
        Box::new(AwardExtractor),
        Box::new(PlaceExtractor),
    ]
}

/// Deduplicate a finished table and report its size
pub(crate) fn finish(mut table: GraphTable) -> GraphTable {
    table.dedup();
    let kind = match table.kind {
        TableKind::Node => "node",
        TableKind::Edge => "edge",
    };
    info!("{} {} count is {}", table.name, kind, table.len());
    GraphMetrics::record_table_rows(kind, table.name, table.len());
    table
}

#[cfg(test)]
pub(crate) mod fixtures {
    use crate::catalog::{
        Award, Credit, FilteredCatalog, FinancialIndex, ImdbRating, Keyword, Location, Name, Title,
    };

    pub fn movie(id: &str) -> Title {
        Title {
            title_id: id.to_string(),
            title_type: Some("movie".to_string()),
            original_title: Some(format!("Movie {id}")),
            ..Default::default()
        }
    }

    pub fn with_rating(mut title: Title, rating: f64, votes: i64) -> Title {
        title.imdb_rating = Some(ImdbRating {
            rating: Some(rating),
            number_of_votes: Some(votes),
        });
        title
    }

    pub fn with_genres(mut title: Title, genres: &[&str]) -> Title {
        title.genres = genres.iter().map(|g| g.to_string()).collect();
        title
    }

    pub fn with_keyword(mut title: Title, keyword: &str, category: Option<&str>) -> Title {
        title.keywords.push(Keyword {
            keyword: Some(keyword.to_string()),
            category: category.map(str::to_string),
        });
        title
    }

    pub fn with_place(mut title: Title, place: Option<&str>) -> Title {
        title.locations.push(Location {
            place: place.map(str::to_string),
        });
        title
    }

    pub fn with_cast(mut title: Title, name_id: &str, category: &str) -> Title {
        title.principal_cast_members.push(Credit {
            name_id: Some(name_id.to_string()),
            category: Some(category.to_string()),
        });
        title
    }

    pub fn with_crew(mut title: Title, name_id: &str, category: &str) -> Title {
        title.principal_crew_members.push(Credit {
            name_id: Some(name_id.to_string()),
            category: Some(category.to_string()),
        });
        title
    }

    pub fn award(event: &str, name: &str, nomination: &str, winner: Option<bool>, year: i32) -> Award {
        Award {
            event: Some(event.to_string()),
            award_name: Some(name.to_string()),
            award_nomination_id: Some(nomination.to_string()),
            winner,
            year: Some(year),
        }
    }

    pub fn person(id: &str, awards: Vec<Award>) -> Name {
        Name {
            name_id: id.to_string(),
            name: Some(format!("Person {id}")),
            awards,
        }
    }

    pub fn catalog(movies: Vec<Title>, people: Vec<Name>) -> FilteredCatalog {
        FilteredCatalog { movies, people }
    }

    pub fn no_financials() -> FinancialIndex {
        FinancialIndex::build(&[], &[])
    }
}
