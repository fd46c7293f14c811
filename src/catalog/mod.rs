//! Raw catalog records as they appear in the line-delimited JSON dumps.
//!
//! Field names follow the dump's camelCase keys. Nested lists that are
//! absent or explicitly `null` deserialize to empty vectors so extractors
//! never have to distinguish the two.

pub mod filter;
pub mod financial;
pub mod reader;

use serde::{Deserialize, Deserializer, Serialize};

pub use filter::{filter_catalog, FilteredCatalog};
pub use financial::{FinancialIndex, Financials};

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// One title from the title catalog
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Title {
    pub title_id: String,
    #[serde(default)]
    pub title_type: Option<String>,
    #[serde(default)]
    pub original_title: Option<String>,
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default)]
    pub image: Option<Image>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub production_status: Vec<ProductionStatus>,
    #[serde(default)]
    pub imdb_rating: Option<ImdbRating>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub genres: Vec<String>,
    #[serde(default, rename = "keywordsV2", deserialize_with = "null_as_default")]
    pub keywords: Vec<Keyword>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub locations: Vec<Location>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub awards: Vec<Award>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub principal_cast_members: Vec<Credit>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub principal_crew_members: Vec<Credit>,
}

impl Title {
    pub fn is_movie(&self) -> bool {
        self.title_type.as_deref() == Some(crate::constants::MOVIE_TITLE_TYPE)
    }

    pub fn poster_url(&self) -> Option<&str> {
        self.image.as_ref().and_then(|i| i.url.as_deref())
    }

    /// Latest production status; the history is ordered oldest first
    pub fn latest_status(&self) -> Option<&str> {
        self.production_status.last().and_then(|s| s.status.as_deref())
    }

    pub fn rating(&self) -> Option<f64> {
        self.imdb_rating.as_ref().and_then(|r| r.rating)
    }

    pub fn votes(&self) -> Option<i64> {
        self.imdb_rating.as_ref().and_then(|r| r.number_of_votes)
    }

    /// Every cast and crew credit, cast first
    pub fn credits(&self) -> impl Iterator<Item = &Credit> {
        self.principal_cast_members
            .iter()
            .chain(self.principal_crew_members.iter())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Image {
    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductionStatus {
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImdbRating {
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub number_of_votes: Option<i64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Keyword {
    #[serde(default)]
    pub keyword: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Location {
    #[serde(default)]
    pub place: Option<String>,
}

/// An award entry; shared by titles and names
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Award {
    #[serde(default)]
    pub event: Option<String>,
    #[serde(default)]
    pub award_name: Option<String>,
    #[serde(default)]
    pub award_nomination_id: Option<String>,
    #[serde(default)]
    pub winner: Option<bool>,
    #[serde(default)]
    pub year: Option<i32>,
}

impl Award {
    pub fn is_oscar(&self) -> bool {
        self.award_name.as_deref() == Some(crate::constants::OSCAR_AWARD_NAME)
    }

    pub fn is_win(&self) -> bool {
        self.winner.unwrap_or(false)
    }
}

/// A cast or crew association between a person and a title
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Credit {
    #[serde(default)]
    pub name_id: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
}

/// One person from the name catalog
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Name {
    pub name_id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub awards: Vec<Award>,
}

/// Box-office gross-to-date record, tagged by area code
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GrossRecord {
    pub title_id: String,
    #[serde(default)]
    pub area: Option<String>,
    #[serde(default)]
    pub gross_to_date: Option<f64>,
}

/// Budget record, tagged by budget item type
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetRecord {
    pub title_id: String,
    #[serde(default)]
    pub budget_item_type: Option<String>,
    #[serde(default)]
    pub amount: Option<f64>,
}
