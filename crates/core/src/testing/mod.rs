//! Testing utilities: a controllable feed source and record fixtures.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use sheetshelf_core::testing::{fixtures, MockFeed};
//!
//! let feed = Arc::new(MockFeed::with_records(vec![fixtures::landslide()]));
//! let mut store = CatalogStore::new(feed.clone());
//! store.load().await;
//! assert_eq!(feed.fetch_count(), 1);
//! ```

mod mock_feed;

pub use mock_feed::{MockFailure, MockFeed};

/// Test fixtures and helper functions.
pub mod fixtures {
    use serde_json::{json, Value};

    use crate::catalog::{RawItem, RawPrice};

    /// A raw record with the display fields set and no preview image.
    pub fn raw_item(
        title: &str,
        composer: &str,
        category: &str,
        difficulty: &str,
        price: &str,
    ) -> RawItem {
        RawItem {
            id: None,
            title: Some(title.to_string()),
            composer: Some(composer.to_string()),
            category: Some(category.to_string()),
            difficulty: Some(difficulty.to_string()),
            price: Some(RawPrice::Text(price.to_string())),
            preview_image: None,
            sheet_music_direct_url: Some(format!(
                "https://www.sheetmusicdirect.com/en-US/se/{}",
                crate::text::slugify(title)
            )),
        }
    }

    /// The same record as a feed JSON value.
    pub fn record(
        title: &str,
        composer: &str,
        category: &str,
        difficulty: &str,
        price: &str,
    ) -> Value {
        serde_json::to_value(raw_item(title, composer, category, difficulty, price))
            .unwrap_or(Value::Null)
    }

    /// "Landslide" with a preview under `img/previews/`.
    pub fn landslide() -> Value {
        json!({
            "title": "Landslide",
            "composer": "Fleetwood Mac",
            "category": "pop",
            "difficulty": "Intermediate",
            "price": "$4.99",
            "preview_image": "img/previews/landslide.png",
            "sheet_music_direct_url": "https://www.sheetmusicdirect.com/en-US/se/landslide"
        })
    }

    /// A small mixed feed: sheet music across categories, one audio entry,
    /// one unparsable price, one unknown difficulty and one broken record.
    pub fn sample_feed() -> Vec<Value> {
        vec![
            landslide(),
            record("Canon in D", "Pachelbel", "classical", "Beginner", "$3.99"),
            record("Main Theme", "Zimmer", "film-score", "Advanced", "$5.49"),
            record("Off Kilter Grit", "Streckfus", "audio-backing-track", "Beginner", "Free"),
            json!({"title": "Broken", "composer": "Nobody"}),
            record("Drowsy Maggie", "Traditional", "folk", "Virtuoso", "$1.99"),
        ]
    }
}
