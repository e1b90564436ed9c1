//! Preview image fallback chain.
//!
//! Each rendered item walks `Primary -> Secondary -> Terminal` on image load
//! failures. `Terminal` is absorbing: once the placeholder is shown, further
//! failures are ignored.

use serde::Serialize;
use tracing::{debug, warn};

use crate::catalog::{CatalogItem, MediaKind};
use crate::config::PreviewConfig;

pub const CAPTION_PREVIEW: &str = "Preview image";
pub const CAPTION_NOT_FOUND: &str = "Preview image not found";
pub const CAPTION_UNAVAILABLE: &str = "Preview unavailable (open listing to view score)";

/// Position of an item in its fallback chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PreviewStage {
    Primary,
    Secondary,
    Terminal,
}

/// The image an item should currently display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PreviewCandidate {
    pub src: String,
    pub caption: &'static str,
    pub stage: PreviewStage,
}

impl PreviewCandidate {
    pub fn is_terminal(&self) -> bool {
        self.stage == PreviewStage::Terminal
    }
}

/// Result of a single fallback step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NextCandidate {
    /// Try another real preview.
    Retry(String),
    /// Give up and show the placeholder.
    Terminal(String),
}

/// Path rules for preview images, built from `[previews]` config.
#[derive(Debug, Clone)]
pub struct PreviewResolver {
    base_path: String,
    alternate_dir: String,
    matching_dir: String,
    sheet_placeholder: String,
    audio_placeholder: String,
}

impl Default for PreviewResolver {
    fn default() -> Self {
        Self::new(&PreviewConfig::default())
    }
}

impl PreviewResolver {
    pub fn new(config: &PreviewConfig) -> Self {
        Self {
            base_path: config.base_path.clone(),
            alternate_dir: config.alternate_dir.clone(),
            matching_dir: config.matching_dir.clone(),
            sheet_placeholder: config.sheet_placeholder.clone(),
            audio_placeholder: config.audio_placeholder.clone(),
        }
    }

    /// Placeholder image for a media kind, with the base path applied.
    pub fn placeholder(&self, kind: MediaKind) -> String {
        match kind {
            MediaKind::Sheet => self.with_base(&self.sheet_placeholder),
            MediaKind::Audio => self.with_base(&self.audio_placeholder),
        }
    }

    /// First candidate for an item.
    ///
    /// Sheet previews stored under the matching directory are tried under the
    /// alternate directory first. Items without a preview start on the
    /// placeholder.
    pub fn primary(&self, preview_path: Option<&str>, kind: MediaKind) -> PreviewCandidate {
        let Some(path) = preview_path else {
            return PreviewCandidate {
                src: self.placeholder(kind),
                caption: CAPTION_UNAVAILABLE,
                stage: PreviewStage::Terminal,
            };
        };

        let src = match (kind, path.strip_prefix(self.matching_dir.as_str())) {
            (MediaKind::Sheet, Some(rest)) => format!("{}{}", self.alternate_dir, rest),
            _ => path.to_string(),
        };

        PreviewCandidate {
            src: self.with_base(&src),
            caption: CAPTION_PREVIEW,
            stage: PreviewStage::Primary,
        }
    }

    /// What to try after `current` failed to load.
    pub fn next_candidate(&self, current: &str, kind: MediaKind) -> NextCandidate {
        if kind == MediaKind::Audio {
            return NextCandidate::Terminal(self.placeholder(kind));
        }

        let relative = current.strip_prefix(self.base_path.as_str()).unwrap_or(current);
        if relative.contains(self.alternate_dir.as_str())
            && !relative.contains(self.matching_dir.as_str())
        {
            let filename = relative.rsplit('/').next().unwrap_or(relative);
            return NextCandidate::Retry(self.with_base(&format!("{}{}", self.matching_dir, filename)));
        }

        NextCandidate::Terminal(self.placeholder(kind))
    }

    /// Start a fallback chain for an item.
    pub fn chain(&self, item: &CatalogItem) -> PreviewChain {
        let current = self.primary(item.preview_image_path.as_deref(), item.media_kind);
        PreviewChain {
            kind: item.media_kind,
            armed: !current.is_terminal(),
            current,
        }
    }

    fn with_base(&self, path: &str) -> String {
        if path.starts_with('/') || path.starts_with("http") {
            path.to_string()
        } else {
            format!("{}{}", self.base_path, path)
        }
    }
}

/// Fallback state of one rendered item.
#[derive(Debug, Clone)]
pub struct PreviewChain {
    kind: MediaKind,
    current: PreviewCandidate,
    armed: bool,
}

impl PreviewChain {
    pub fn current(&self) -> &PreviewCandidate {
        &self.current
    }

    /// Whether another failure report will change the candidate.
    pub fn is_armed(&self) -> bool {
        self.armed
    }

    /// Handle a load failure reported for `failed_src`.
    ///
    /// Returns `None` once the chain is disarmed. A report for anything but
    /// the current candidate is stale (a late or repeated error from an
    /// earlier image) and returns the current candidate unchanged.
    pub fn on_failure(
        &mut self,
        failed_src: &str,
        resolver: &PreviewResolver,
    ) -> Option<&PreviewCandidate> {
        if !self.armed {
            return None;
        }
        if !same_image(failed_src, &self.current.src) {
            debug!(
                reported = failed_src,
                current = %self.current.src,
                "Ignoring stale preview failure"
            );
            return Some(&self.current);
        }

        let next = match (self.current.stage, resolver.next_candidate(&self.current.src, self.kind)) {
            (PreviewStage::Primary, NextCandidate::Retry(src)) => {
                debug!(failed = %self.current.src, next = %src, "Trying fallback preview");
                PreviewCandidate {
                    src,
                    caption: CAPTION_PREVIEW,
                    stage: PreviewStage::Secondary,
                }
            }
            _ => {
                warn!(failed = %self.current.src, "Failed to load preview image");
                self.armed = false;
                PreviewCandidate {
                    src: resolver.placeholder(self.kind),
                    caption: CAPTION_NOT_FOUND,
                    stage: PreviewStage::Terminal,
                }
            }
        };

        self.current = next;
        Some(&self.current)
    }
}

/// Browsers report the resolved URL of a failed image, so a relative
/// candidate also matches any URL ending in `/<candidate>`.
fn same_image(reported: &str, candidate: &str) -> bool {
    if reported == candidate {
        return true;
    }
    let candidate = candidate.trim_start_matches('/');
    reported
        .strip_suffix(candidate)
        .is_some_and(|prefix| prefix.ends_with('/'))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolver() -> PreviewResolver {
        PreviewResolver::default()
    }

    /// Report a failure of whatever the chain currently shows.
    fn fail(chain: &mut PreviewChain, r: &PreviewResolver) -> Option<PreviewCandidate> {
        let src = chain.current().src.clone();
        chain.on_failure(&src, r).cloned()
    }

    #[test]
    fn test_primary_rewrites_matching_dir_to_alternate() {
        let c = resolver().primary(Some("img/previews/landslide.png"), MediaKind::Sheet);
        assert_eq!(c.src, "previews/landslide.png");
        assert_eq!(c.stage, PreviewStage::Primary);
        assert_eq!(c.caption, CAPTION_PREVIEW);
    }

    #[test]
    fn test_primary_keeps_other_paths() {
        let c = resolver().primary(Some("covers/landslide.jpg"), MediaKind::Sheet);
        assert_eq!(c.src, "covers/landslide.jpg");

        let c = resolver().primary(Some("https://cdn.example.com/a.png"), MediaKind::Sheet);
        assert_eq!(c.src, "https://cdn.example.com/a.png");
    }

    #[test]
    fn test_primary_audio_is_not_rewritten() {
        let c = resolver().primary(Some("img/previews/grit.png"), MediaKind::Audio);
        assert_eq!(c.src, "img/previews/grit.png");
    }

    #[test]
    fn test_primary_without_preview_is_placeholder() {
        let c = resolver().primary(None, MediaKind::Sheet);
        assert_eq!(c.src, "img/sheet.png");
        assert_eq!(c.caption, CAPTION_UNAVAILABLE);
        assert!(c.is_terminal());

        let c = resolver().primary(None, MediaKind::Audio);
        assert_eq!(c.src, "img/audio.png");
    }

    #[test]
    fn test_base_path_applied_to_relative_paths() {
        let config = PreviewConfig {
            base_path: "/catalog/".to_string(),
            ..PreviewConfig::default()
        };
        let r = PreviewResolver::new(&config);

        let c = r.primary(Some("img/previews/landslide.png"), MediaKind::Sheet);
        assert_eq!(c.src, "/catalog/previews/landslide.png");
        assert_eq!(
            r.next_candidate(&c.src, MediaKind::Sheet),
            NextCandidate::Retry("/catalog/img/previews/landslide.png".to_string())
        );
        assert_eq!(
            r.next_candidate("/catalog/img/previews/landslide.png", MediaKind::Sheet),
            NextCandidate::Terminal("/catalog/img/sheet.png".to_string())
        );
    }

    #[test]
    fn test_next_candidate_rules() {
        let r = resolver();
        assert_eq!(
            r.next_candidate("previews/sub/landslide.png", MediaKind::Sheet),
            NextCandidate::Retry("img/previews/landslide.png".to_string())
        );
        assert_eq!(
            r.next_candidate("img/previews/landslide.png", MediaKind::Sheet),
            NextCandidate::Terminal("img/sheet.png".to_string())
        );
        assert_eq!(
            r.next_candidate("covers/landslide.jpg", MediaKind::Sheet),
            NextCandidate::Terminal("img/sheet.png".to_string())
        );
        assert_eq!(
            r.next_candidate("previews/grit.png", MediaKind::Audio),
            NextCandidate::Terminal("img/audio.png".to_string())
        );
    }

    #[test]
    fn test_sheet_chain_walks_to_placeholder() {
        let r = resolver();
        let mut chain = PreviewChain {
            kind: MediaKind::Sheet,
            current: r.primary(Some("img/previews/landslide.png"), MediaKind::Sheet),
            armed: true,
        };

        let second = fail(&mut chain, &r).unwrap();
        assert_eq!(second.src, "img/previews/landslide.png");
        assert_eq!(second.stage, PreviewStage::Secondary);

        let third = fail(&mut chain, &r).unwrap();
        assert_eq!(third.src, "img/sheet.png");
        assert_eq!(third.caption, CAPTION_NOT_FOUND);
        assert!(third.is_terminal());
        assert!(!chain.is_armed());

        assert!(fail(&mut chain, &r).is_none());
        assert_eq!(chain.current(), &third);
    }

    #[test]
    fn test_stale_failure_does_not_advance() {
        let r = resolver();
        let mut chain = PreviewChain {
            kind: MediaKind::Sheet,
            current: r.primary(Some("img/previews/landslide.png"), MediaKind::Sheet),
            armed: true,
        };

        let second = fail(&mut chain, &r).unwrap();
        assert_eq!(second.stage, PreviewStage::Secondary);

        // A second error from the first image arrives late.
        let unchanged = chain.on_failure("previews/landslide.png", &r).cloned().unwrap();
        assert_eq!(unchanged, second);
        assert_eq!(chain.current().stage, PreviewStage::Secondary);
        assert!(chain.is_armed());

        let third = chain
            .on_failure("https://shop.example.com/img/previews/landslide.png", &r)
            .cloned()
            .unwrap();
        assert!(third.is_terminal());
    }

    #[test]
    fn test_same_image_accepts_resolved_urls() {
        assert!(same_image("previews/a.png", "previews/a.png"));
        assert!(same_image("https://host/previews/a.png", "previews/a.png"));
        assert!(same_image("https://host/shelf/previews/a.png", "/shelf/previews/a.png"));
        assert!(!same_image("previews/a.png", "img/previews/a.png"));
        assert!(!same_image("https://host/mypreviews/a.png", "previews/a.png"));
    }

    #[test]
    fn test_chain_without_alternate_goes_straight_to_terminal() {
        let r = resolver();
        let mut chain = PreviewChain {
            kind: MediaKind::Sheet,
            current: r.primary(Some("covers/landslide.jpg"), MediaKind::Sheet),
            armed: true,
        };
        let next = fail(&mut chain, &r).unwrap();
        assert!(next.is_terminal());
        assert!(fail(&mut chain, &r).is_none());
    }

    #[test]
    fn test_audio_chain_skips_secondary() {
        let r = resolver();
        let mut chain = PreviewChain {
            kind: MediaKind::Audio,
            current: r.primary(Some("previews/grit.png"), MediaKind::Audio),
            armed: true,
        };
        let next = fail(&mut chain, &r).unwrap();
        assert_eq!(next.src, "img/audio.png");
        assert!(next.is_terminal());
    }

    #[test]
    fn test_chain_terminates_within_two_failures() {
        let r = resolver();
        let paths = [
            Some("img/previews/a.png"),
            Some("previews/b.png"),
            Some("img/c.png"),
            Some("https://cdn.example.com/previews/d.png"),
            None,
        ];
        for kind in [MediaKind::Sheet, MediaKind::Audio] {
            for path in paths {
                let current = r.primary(path, kind);
                let mut chain = PreviewChain {
                    kind,
                    armed: !current.is_terminal(),
                    current,
                };
                let _ = fail(&mut chain, &r);
                let _ = fail(&mut chain, &r);
                assert!(chain.current().is_terminal(), "{:?} {:?}", kind, path);
                assert!(fail(&mut chain, &r).is_none());
            }
        }
    }
}
