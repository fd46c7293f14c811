use super::{Name, Title};
use crate::metrics::GraphMetrics;
use std::collections::HashSet;
use tracing::info;

/// The retained movies and the people credited on them
#[derive(Debug, Clone, Default)]
pub struct FilteredCatalog {
    pub movies: Vec<Title>,
    pub people: Vec<Name>,
}

impl FilteredCatalog {
    /// Ids of every retained person, for endpoint checks on person edges
    pub fn person_ids(&self) -> HashSet<&str> {
        self.people.iter().map(|p| p.name_id.as_str()).collect()
    }
}

/// Keep titles tagged `movie` and the names referenced by their cast or crew.
///
/// Credited ids from both lists are unioned and deduplicated, then matched
/// against the name table; credited ids with no name record are dropped.
pub fn filter_catalog(titles: Vec<Title>, names: Vec<Name>) -> FilteredCatalog {
    let movies: Vec<Title> = titles.into_iter().filter(Title::is_movie).collect();

    let credited: HashSet<&str> = movies
        .iter()
        .flat_map(|m| m.credits())
        .filter_map(|c| c.name_id.as_deref())
        .collect();

    let people: Vec<Name> = names
        .into_iter()
        .filter(|n| credited.contains(n.name_id.as_str()))
        .collect();

    info!("# of Movie Titles : {:>7}", movies.len());
    info!("# of Movie People : {:>7}", people.len());
    GraphMetrics::record_filtered(movies.len(), people.len());

    FilteredCatalog { movies, people }
}
