//! Deterministic synthetic ids and text sanitizers.
//!
//! Ids are derived only from natural keys, so re-running the build yields
//! the same ids and embeddings keyed by them stay joinable. CRC32 is 32 bits
//! wide; distinct keys can collide and the graph accepts that.

pub fn checksum(key: &str) -> u32 {
    crc32fast::hash(key.as_bytes())
}

fn prefixed(prefix: &str, key: &str) -> String {
    format!("{}{:010}", prefix, checksum(key))
}

pub fn genre_id(genre: &str) -> String {
    prefixed("gn", genre)
}

pub fn keyword_id(keyword: &str) -> String {
    prefixed("kn", keyword)
}

pub fn place_id(place: &str) -> String {
    prefixed("pl", place)
}

/// Award events are keyed by the bare checksum of the raw event name
pub fn award_event_id(event: &str) -> String {
    checksum(event).to_string()
}

/// Rating scaled by ten and rounded, e.g. 8.5 -> 85
pub fn scaled_rating(rating: f64) -> i32 {
    (rating * 10.0).round() as i32
}

pub fn rating_id(rating: f64) -> String {
    format!("rate{}", scaled_rating(rating))
}

pub fn genre_edge_id(title_id: &str, genre_id: &str) -> String {
    format!("{}-genre-{}", title_id, genre_id)
}

pub fn keyword_edge_id(title_id: &str, keyword_id: &str) -> String {
    format!("{}-keyword-{}", title_id, keyword_id)
}

pub fn place_edge_id(title_id: &str, place_id: &str) -> String {
    format!("{}-place-{}", title_id, place_id)
}

pub fn cast_edge_id(title_id: &str, name_id: &str) -> String {
    format!("{}-cast-{}", title_id, name_id)
}

pub fn crew_edge_id(title_id: &str, name_id: &str) -> String {
    format!("{}-crew-{}", title_id, name_id)
}

pub fn rating_edge_id(rating: f64, title_id: &str) -> String {
    format!("eTTRt-{}-{}", scaled_rating(rating), title_id)
}

pub fn nomination_edge_id(nomination_id: &str, title_id: &str, year: &str) -> String {
    format!("{}-{}-{}", nomination_id, title_id, year)
}

pub fn win_edge_id(nomination_id: &str, title_id: &str, year: &str) -> String {
    format!("aw{}", nomination_edge_id(nomination_id, title_id, year))
}

/// Replace double quotes with two single quotes (names, titles, places)
pub fn escape_quotes(text: &str) -> String {
    text.replace('"', "''")
}

/// Remove double quotes entirely (keywords)
pub fn strip_quotes(text: &str) -> String {
    text.replace('"', "")
}

/// Replace double quotes with one single quote (award events)
pub fn single_quote(text: &str) -> String {
    text.replace('"', "'")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checksum_matches_crc32() {
        // Standard CRC-32 check value
        assert_eq!(checksum("123456789"), 0xCBF4_3926);
    }

    #[test]
    fn test_ids_are_prefixed_and_padded() {
        let id = genre_id("Drama");
        assert!(id.starts_with("gn"));
        assert_eq!(id.len(), 12);
        assert_eq!(id, format!("gn{:010}", checksum("Drama")));
        assert!(keyword_id("heist").starts_with("kn"));
        assert!(place_id("Rome, Lazio, Italy").starts_with("pl"));
        assert_eq!(award_event_id("Academy Awards, USA"), checksum("Academy Awards, USA").to_string());
    }

    #[test]
    fn test_ids_are_deterministic() {
        assert_eq!(genre_id("War"), genre_id("War"));
        assert_eq!(keyword_id("robot"), keyword_id("robot"));
        assert_eq!(place_id("Paris"), place_id("Paris"));
        assert_eq!(award_event_id("Cannes"), award_event_id("Cannes"));
        assert_eq!(rating_id(7.3), rating_id(7.3));
        assert_ne!(genre_id("War"), genre_id("Drama"));
    }

    #[test]
    fn test_rating_scaling_rounds() {
        assert_eq!(rating_id(8.5), "rate85");
        assert_eq!(scaled_rating(5.1), 51);
        assert_eq!(scaled_rating(10.0), 100);
        assert_eq!(rating_edge_id(8.5, "tt1"), "eTTRt-85-tt1");
    }

    #[test]
    fn test_award_edge_ids() {
        assert_eq!(nomination_edge_id("an1", "tt1", "2001"), "an1-tt1-2001");
        assert_eq!(win_edge_id("an1", "tt1", "2001"), "awan1-tt1-2001");
    }

    #[test]
    fn test_sanitizers() {
        assert_eq!(escape_quotes(r#"The "Best" Movie"#), "The ''Best'' Movie");
        assert_eq!(strip_quotes(r#""quoted" keyword"#), "quoted keyword");
        assert_eq!(single_quote(r#"The "Golden" Awards"#), "The 'Golden' Awards");
    }
}
