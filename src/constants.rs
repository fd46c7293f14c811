/// Input file names as published in the raw catalog dump
pub const TITLE_FILE: &str = "title_essential_v1_complete.jsonl.gz";
pub const NAME_FILE: &str = "name_essential_v1_complete.jsonl.gz";
pub const GROSSES_FILE: &str = "boxoffice_title_grosses_v1.jsonl.gz";
pub const BUDGETS_FILE: &str = "boxoffice_title_budgets_v1.jsonl.gz";

/// Title type tag that gates a title into the graph
pub const MOVIE_TITLE_TYPE: &str = "movie";

// Box-office area codes
pub const AREA_WORLDWIDE: &str = "XWW";
pub const AREA_DOMESTIC: &str = "XDOM";
pub const AREA_INTERNATIONAL: &str = "XNDOM";

pub const BUDGET_PRODUCTION: &str = "production";

// Sentinel defaults written in place of missing values
pub const SENTINEL_INT: i32 = -1;
pub const SENTINEL_LONG: i64 = -1;
pub const SENTINEL_FLOAT: f64 = -1.0;
pub const SENTINEL_POSTER: &str = "unavailable";
pub const SENTINEL_TEXT: &str = "unknown";

pub const DEFAULT_KEYWORD_CATEGORY: &str = "other";

pub const OSCAR_AWARD_NAME: &str = "Oscar";

/// Crew categories that become person-movie edges
pub const CREW_CATEGORIES: [&str; 7] = [
    "director",
    "producer",
    "composer",
    "writer",
    "editor",
    "cinematographer",
    "production_designer",
];

// Node table names (also the output directory under nodes/)
pub const NODE_MOVIE: &str = "movie";
pub const NODE_GENRE: &str = "genre";
pub const NODE_KEYWORD: &str = "keyword";
pub const NODE_PERSON: &str = "person";
pub const NODE_RATING: &str = "rating";
pub const NODE_AWARD_EVENT: &str = "award_event";
pub const NODE_PLACE: &str = "place";

// Edge table names (also the output directory under edges/)
pub const EDGE_MOVIE_GENRE: &str = "movie-genre";
pub const EDGE_MOVIE_KEYWORD: &str = "movie-keyword";
pub const EDGE_PERSON_TITLE: &str = "person-title";
pub const EDGE_HAS_RATING: &str = "has_rating";
pub const EDGE_HAS_NOMINATION: &str = "has_nomination";
pub const EDGE_HAS_WON: &str = "has_won";
pub const EDGE_MOVIE_PLACE: &str = "movie-place";

/// Single output unit written per table
pub const PART_FILE: &str = "part-00000.csv";

// Search indices used by the similarity API
pub const KNN_INDEX: &str = "ooc_knn";
pub const TEXT_INDEX: &str = "ooc_text";
pub const EMBEDDING_DIMENSION: usize = 64;
pub const BULK_BATCH_SIZE: usize = 10_000;

/// Whether a crew category is kept as a person-movie edge
pub fn is_tracked_crew_category(category: &str) -> bool {
    CREW_CATEGORIES.contains(&category)
}
