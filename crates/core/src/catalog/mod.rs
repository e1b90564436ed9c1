//! Sheet music catalog: feed records, filtering, ordering and the store that
//! ties them together.
//!
//! Items are normalized once at load time. Filtering and sorting work on the
//! keys computed then, so the store never re-reads the feed to answer a
//! selection change.

mod filter;
mod normalize;
mod sort;
mod store;
mod types;

pub use filter::{matches_category, matches_search, normalize_category, visibility, ALL_CATEGORIES};
pub use normalize::{parse_price, ItemNormalizer};
pub use sort::{compare, sort_indices};
pub use store::{CatalogStore, CatalogView, CatalogViewEntry, LoadStatus, Notice, VisibleEntry};
pub use types::*;
