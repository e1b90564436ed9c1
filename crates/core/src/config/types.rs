use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::net::IpAddr;
use std::path::PathBuf;

/// Root configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub feed: FeedConfig,
    #[serde(default)]
    pub previews: PreviewConfig,
    #[serde(default)]
    pub catalog: CatalogConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: IpAddr,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Directory with the catalog front-end assets, served as fallback.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub static_dir: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            static_dir: None,
        }
    }
}

fn default_host() -> IpAddr {
    IpAddr::from([0, 0, 0, 0])
}

fn default_port() -> u16 {
    8080
}

/// Where the catalog feed comes from.
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FeedSourceKind {
    Http,
    #[default]
    File,
}

/// Feed configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FeedConfig {
    #[serde(default)]
    pub source: FeedSourceKind,
    /// Feed URL (required when source = "http")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Feed file (used when source = "file")
    #[serde(default = "default_feed_path")]
    pub path: PathBuf,
    /// Request timeout in seconds (default: 30)
    #[serde(default = "default_timeout")]
    pub timeout_secs: u32,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            source: FeedSourceKind::default(),
            url: None,
            path: default_feed_path(),
            timeout_secs: default_timeout(),
        }
    }
}

fn default_feed_path() -> PathBuf {
    PathBuf::from("catalog-data.json")
}

fn default_timeout() -> u32 {
    30
}

/// Preview image conventions.
///
/// Two preview folders exist: `alternate_dir` is tried first, `matching_dir`
/// holds the filenames the feed references.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PreviewConfig {
    #[serde(default)]
    pub base_path: String,
    #[serde(default = "default_alternate_dir")]
    pub alternate_dir: String,
    #[serde(default = "default_matching_dir")]
    pub matching_dir: String,
    #[serde(default = "default_sheet_placeholder")]
    pub sheet_placeholder: String,
    #[serde(default = "default_audio_placeholder")]
    pub audio_placeholder: String,
    /// Folder scanned by the preview matcher.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scan_dir: Option<PathBuf>,
    /// Item id -> preview filename pairs the matcher always proposes.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub manual: HashMap<String, String>,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            base_path: String::new(),
            alternate_dir: default_alternate_dir(),
            matching_dir: default_matching_dir(),
            sheet_placeholder: default_sheet_placeholder(),
            audio_placeholder: default_audio_placeholder(),
            scan_dir: None,
            manual: HashMap::new(),
        }
    }
}

fn default_alternate_dir() -> String {
    "previews/".to_string()
}

fn default_matching_dir() -> String {
    "img/previews/".to_string()
}

fn default_sheet_placeholder() -> String {
    "img/sheet.png".to_string()
}

fn default_audio_placeholder() -> String {
    "img/audio.png".to_string()
}

/// Catalog behaviour configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CatalogConfig {
    /// Category substring marking audio-file entries.
    #[serde(default = "default_audio_marker")]
    pub audio_marker: String,
    /// External store link offered when the feed cannot be loaded.
    #[serde(default = "default_browse_url")]
    pub browse_url: String,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            audio_marker: default_audio_marker(),
            browse_url: default_browse_url(),
        }
    }
}

fn default_audio_marker() -> String {
    "audio".to_string()
}

fn default_browse_url() -> String {
    "https://www.sheetmusicdirect.com/en-US/Search.aspx?query=Brian%2BStreckfus".to_string()
}

/// Sanitized config for API responses (local paths hidden)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedConfig {
    pub server: SanitizedServerConfig,
    pub feed: SanitizedFeedConfig,
    pub previews: SanitizedPreviewConfig,
    pub catalog: CatalogConfig,
}

#[derive(Debug, Clone, Serialize)]
pub struct SanitizedServerConfig {
    pub port: u16,
    pub static_dir_configured: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct SanitizedFeedConfig {
    pub source: FeedSourceKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    pub timeout_secs: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct SanitizedPreviewConfig {
    pub base_path: String,
    pub alternate_dir: String,
    pub matching_dir: String,
    pub sheet_placeholder: String,
    pub audio_placeholder: String,
    pub matcher_enabled: bool,
}

impl From<&Config> for SanitizedConfig {
    fn from(config: &Config) -> Self {
        Self {
            server: SanitizedServerConfig {
                port: config.server.port,
                static_dir_configured: config.server.static_dir.is_some(),
            },
            feed: SanitizedFeedConfig {
                source: config.feed.source,
                url: config.feed.url.clone(),
                timeout_secs: config.feed.timeout_secs,
            },
            previews: SanitizedPreviewConfig {
                base_path: config.previews.base_path.clone(),
                alternate_dir: config.previews.alternate_dir.clone(),
                matching_dir: config.previews.matching_dir.clone(),
                sheet_placeholder: config.previews.sheet_placeholder.clone(),
                audio_placeholder: config.previews.audio_placeholder.clone(),
                matcher_enabled: config.previews.scan_dir.is_some(),
            },
            catalog: config.catalog.clone(),
        }
    }
}
