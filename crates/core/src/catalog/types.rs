//! Types for the in-memory sheet music catalog.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A record as it appears in the catalog feed.
///
/// Everything is optional here; the normalizer decides which fields are
/// required for display.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawItem {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub composer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<RawPrice>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preview_image: Option<String>,
    #[serde(
        default,
        alias = "listing_url",
        skip_serializing_if = "Option::is_none"
    )]
    pub sheet_music_direct_url: Option<String>,
}

/// Price as written in the feed: usually "$4.99", occasionally a bare number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawPrice {
    Text(String),
    Number(serde_json::Number),
}

impl fmt::Display for RawPrice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawPrice::Text(s) => f.write_str(s),
            RawPrice::Number(n) => write!(f, "{}", n),
        }
    }
}

/// Difficulty level of an arrangement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
    Unrecognized,
}

impl Difficulty {
    /// Parse a feed label, ignoring case and surrounding whitespace.
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_lowercase().as_str() {
            "beginner" => Difficulty::Beginner,
            "intermediate" => Difficulty::Intermediate,
            "advanced" => Difficulty::Advanced,
            _ => Difficulty::Unrecognized,
        }
    }

    /// Sort rank; unrecognized labels rank last.
    pub fn rank(self) -> u8 {
        match self {
            Difficulty::Beginner => 1,
            Difficulty::Intermediate => 2,
            Difficulty::Advanced => 3,
            Difficulty::Unrecognized => 99,
        }
    }
}

/// Whether an entry is sheet music or an audio file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaKind {
    Sheet,
    Audio,
}

/// A normalized catalog entry. Derived keys are computed once, at load time.
#[derive(Debug, Clone, Serialize)]
pub struct CatalogItem {
    pub id: String,
    pub title: String,
    pub composer: String,
    /// Free-form category, e.g. "film-score" or "pop".
    pub category: String,
    /// Difficulty label as written in the feed.
    pub difficulty_label: String,
    pub difficulty: Difficulty,
    pub difficulty_rank: u8,
    /// Display price, e.g. "$4.99".
    pub price: String,
    /// Parsed price; `None` when the display price has no usable number.
    pub price_value: Option<f64>,
    pub media_kind: MediaKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preview_image_path: Option<String>,
    pub listing_url: String,
    /// Normalized title, composer, category and difficulty. Read by search.
    #[serde(skip)]
    pub search_text: String,
    /// Normalized category and difficulty. Read by category filtering.
    #[serde(skip)]
    pub category_key: String,
    /// Accent-folded sort keys, see `text::collation_key`.
    #[serde(skip)]
    pub title_key: String,
    #[serde(skip)]
    pub composer_key: String,
}

/// Sort order selected by the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    /// Feed load order.
    #[default]
    Default,
    TitleAsc,
    TitleDesc,
    ComposerAsc,
    ComposerDesc,
    DifficultyAsc,
    DifficultyDesc,
    PriceAsc,
    PriceDesc,
}

impl SortKey {
    pub const ALL: [SortKey; 9] = [
        SortKey::Default,
        SortKey::TitleAsc,
        SortKey::TitleDesc,
        SortKey::ComposerAsc,
        SortKey::ComposerDesc,
        SortKey::DifficultyAsc,
        SortKey::DifficultyDesc,
        SortKey::PriceAsc,
        SortKey::PriceDesc,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SortKey::Default => "default",
            SortKey::TitleAsc => "title_asc",
            SortKey::TitleDesc => "title_desc",
            SortKey::ComposerAsc => "composer_asc",
            SortKey::ComposerDesc => "composer_desc",
            SortKey::DifficultyAsc => "difficulty_asc",
            SortKey::DifficultyDesc => "difficulty_desc",
            SortKey::PriceAsc => "price_asc",
            SortKey::PriceDesc => "price_desc",
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortKey {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        SortKey::ALL
            .into_iter()
            .find(|k| k.as_str() == wanted)
            .ok_or_else(|| CatalogError::InvalidSortKey(s.to_string()))
    }
}

/// Errors for catalog operations.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Unknown sort key: {0}")]
    InvalidSortKey(String),

    #[error("Unusable record: {0}")]
    InvalidRecord(String),

    #[error("Not found: {0}")]
    NotFound(String),
}
