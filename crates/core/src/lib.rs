pub mod catalog;
pub mod config;
pub mod feed;
pub mod preview;
pub mod testing;
pub mod text;

pub use catalog::{
    CatalogError, CatalogItem, CatalogStore, CatalogView, Difficulty, ItemNormalizer, LoadStatus,
    MediaKind, Notice, SortKey,
};
pub use config::{
    load_config, load_config_from_str, validate_config, Config, ConfigError, FeedSourceKind,
    SanitizedConfig,
};
pub use feed::{create_feed, FeedError, FeedSource, FileFeed, HttpFeed};
pub use preview::{
    scan_preview_files, PreviewCandidate, PreviewMatch, PreviewMatcher, PreviewResolver,
    PreviewStage,
};
