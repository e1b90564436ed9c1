//! Conversion of raw feed records into `CatalogItem`s.

use serde_json::Value;
use tracing::{debug, warn};

use crate::text::{collation_key, normalize, slugify};

use super::types::{CatalogError, CatalogItem, Difficulty, MediaKind, RawItem};

/// Builds catalog items from feed records.
#[derive(Debug, Clone)]
pub struct ItemNormalizer {
    audio_marker: String,
}

impl Default for ItemNormalizer {
    fn default() -> Self {
        Self::new("audio")
    }
}

impl ItemNormalizer {
    /// Create a normalizer that treats categories containing `audio_marker`
    /// (case-insensitive) as audio-file entries.
    pub fn new(audio_marker: &str) -> Self {
        Self {
            audio_marker: audio_marker.trim().to_lowercase(),
        }
    }

    /// Normalize one raw record.
    ///
    /// Fails only when a display field is missing. Bad prices and unknown
    /// difficulty labels degrade instead of failing.
    pub fn normalize(&self, raw: RawItem) -> Result<CatalogItem, CatalogError> {
        let title = required(raw.title, "title")?;
        let composer = required(raw.composer, "composer")?;
        let category = required(raw.category, "category")?;
        let difficulty_label = required(raw.difficulty, "difficulty")?;

        let price = raw.price.map(|p| p.to_string()).unwrap_or_default();
        let price_value = parse_price(&price);
        let difficulty = Difficulty::from_label(&difficulty_label);
        let media_kind = self.media_kind(&category);

        let id = raw
            .id
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| slugify(&title));

        let preview_image_path = raw
            .preview_image
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        let search_text = normalize(&format!(
            "{} {} {} {}",
            title, composer, category, difficulty_label
        ));
        let category_key = normalize(&format!("{} {}", category, difficulty_label));

        Ok(CatalogItem {
            id,
            title_key: collation_key(&title),
            composer_key: collation_key(&composer),
            title,
            composer,
            category,
            difficulty_label,
            difficulty,
            difficulty_rank: difficulty.rank(),
            price,
            price_value,
            media_kind,
            preview_image_path,
            listing_url: raw.sheet_music_direct_url.unwrap_or_default(),
            search_text,
            category_key,
        })
    }

    /// Normalize a whole feed, skipping records that cannot be displayed.
    ///
    /// Load order is preserved. Each record is decoded on its own so a single
    /// malformed entry never drops its neighbours.
    pub fn normalize_all(&self, records: Vec<Value>) -> Vec<CatalogItem> {
        let total = records.len();
        let mut items = Vec::with_capacity(total);

        for (index, record) in records.into_iter().enumerate() {
            let result = serde_json::from_value::<RawItem>(record)
                .map_err(|e| CatalogError::InvalidRecord(e.to_string()))
                .and_then(|raw| self.normalize(raw));

            match result {
                Ok(item) => items.push(item),
                Err(e) => warn!(index, error = %e, "Skipping catalog record"),
            }
        }

        debug!(total, kept = items.len(), "Normalized catalog feed");
        items
    }

    fn media_kind(&self, category: &str) -> MediaKind {
        if !self.audio_marker.is_empty() && category.to_lowercase().contains(&self.audio_marker) {
            MediaKind::Audio
        } else {
            MediaKind::Sheet
        }
    }
}

fn required(value: Option<String>, field: &str) -> Result<String, CatalogError> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .ok_or_else(|| CatalogError::InvalidRecord(format!("missing {}", field)))
}

/// Parse a display price by keeping only digits and dots.
///
/// Returns `None` when nothing parseable remains ("Free", "", "1.2.3").
pub fn parse_price(display: &str) -> Option<f64> {
    let digits: String = display
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    digits.parse::<f64>().ok().filter(|v| v.is_finite())
}
