//! Heuristic matching of preview image files to catalog items.
//!
//! Preview files are exported with names like
//! `Drowsy_Maggie_Guitar_7-preview.png` that rarely match the feed. This
//! proposes a file for each item that has no preview yet. Nothing here runs
//! on the display path.

use std::collections::{HashMap, HashSet};

use once_cell::sync::Lazy;
use regex_lite::Regex;
use serde::Serialize;
use tracing::debug;

use crate::catalog::CatalogItem;
use crate::text::{collation_key, normalize};

static RE_ARRANGEMENT_NOTE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s*\(arr[^)]*\)").expect("valid regex"));
static RE_FULL_SCORE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s*-?\s*full\s*score").expect("valid regex"));
static RE_DASH: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s*-\s*").expect("valid regex"));
static RE_LONG_WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b[a-z]{4,}\b").expect("valid regex"));

const STOP_WORDS: &[&str] = &[
    "arr", "arrangement", "arranged", "for", "guitar", "the", "a", "an", "and", "or", "but",
];

const REVISION_SUFFIXES: &[&str] = &[
    "_4", "_6", "_7", "_8", "_1", "_2", "_3", "_master", "_guitar", "_version",
];

/// How a match was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchMethod {
    Manual,
    Scored,
}

/// Per-strategy scores for one (file, item) pair, each in 0.0-1.0.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct MatchScore {
    pub title: f64,
    pub terms: f64,
    pub id: f64,
    pub words: f64,
    pub composer: f64,
    pub combined: f64,
}

/// A proposed preview file for a catalog item.
#[derive(Debug, Clone, Serialize)]
pub struct PreviewMatch {
    pub item_index: usize,
    pub item_id: String,
    pub title: String,
    pub preview_file: String,
    pub score: f64,
    pub method: MatchMethod,
}

/// Configuration for the matcher.
#[derive(Debug, Clone)]
pub struct PreviewMatcherConfig {
    pub title_weight: f64,
    pub terms_weight: f64,
    pub id_weight: f64,
    pub words_weight: f64,
    pub composer_weight: f64,
    /// Proposals must score strictly above this.
    pub min_score: f64,
}

impl Default for PreviewMatcherConfig {
    fn default() -> Self {
        Self {
            title_weight: 0.35,
            terms_weight: 0.25,
            id_weight: 0.15,
            words_weight: 0.15,
            composer_weight: 0.10,
            min_score: 0.5,
        }
    }
}

/// Matches preview filenames to catalog items.
#[derive(Debug, Clone, Default)]
pub struct PreviewMatcher {
    config: PreviewMatcherConfig,
    /// item id -> preview filename
    manual: HashMap<String, String>,
}

impl PreviewMatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: PreviewMatcherConfig) -> Self {
        Self {
            config,
            manual: HashMap::new(),
        }
    }

    /// Known item id -> filename pairs that win over scoring.
    pub fn with_manual_mappings(mut self, mappings: HashMap<String, String>) -> Self {
        self.manual = mappings;
        self
    }

    /// Score one preview file against one item.
    pub fn score(&self, preview_file: &str, item: &CatalogItem) -> MatchScore {
        let preview = clean_preview_name(preview_file);
        let preview_normalized = strip_stop_words(&preview);

        let title = similarity(&strip_stop_words(&item.title), &preview_normalized);
        let terms = overlap(
            &key_terms(&format!("{} {}", item.title, item.composer)),
            &key_terms(&preview),
        );
        let id = if item.id.is_empty() {
            0.0
        } else {
            similarity(&strip_stop_words(&item.id), &preview_normalized)
        };
        let words = overlap(&long_words(&item.title), &long_words(&preview));
        let composer = if !item.composer_key.is_empty()
            && collation_key(&preview).contains(&item.composer_key)
        {
            0.8
        } else {
            0.0
        };

        let c = &self.config;
        MatchScore {
            title,
            terms,
            id,
            words,
            composer,
            combined: title * c.title_weight
                + terms * c.terms_weight
                + id * c.id_weight
                + words * c.words_weight
                + composer * c.composer_weight,
        }
    }

    /// Propose preview files for items that have none.
    ///
    /// Manual mappings are applied first, then the best scoring unused file
    /// per item. Every file is proposed at most once. Results follow item
    /// load order.
    pub fn suggest(&self, items: &[CatalogItem], preview_files: &[String]) -> Vec<PreviewMatch> {
        let available: HashSet<&str> = preview_files.iter().map(String::as_str).collect();
        let mut used: HashSet<&str> = HashSet::new();
        let mut matches = Vec::new();

        let needs_preview = || {
            items
                .iter()
                .enumerate()
                .filter(|(_, item)| item.preview_image_path.is_none())
        };

        for (index, item) in needs_preview() {
            let Some(file) = self.manual.get(&item.id) else {
                continue;
            };
            if available.contains(file.as_str()) && used.insert(file.as_str()) {
                matches.push(PreviewMatch {
                    item_index: index,
                    item_id: item.id.clone(),
                    title: item.title.clone(),
                    preview_file: file.clone(),
                    score: 1.0,
                    method: MatchMethod::Manual,
                });
            }
        }

        let manually_matched: HashSet<usize> = matches.iter().map(|m| m.item_index).collect();

        for (index, item) in needs_preview() {
            if manually_matched.contains(&index) {
                continue;
            }

            let mut best: Option<(&str, f64)> = None;
            for file in preview_files {
                if used.contains(file.as_str()) {
                    continue;
                }
                let score = self.score(file, item).combined;
                if score > self.config.min_score && best.is_none_or(|(_, s)| score > s) {
                    best = Some((file.as_str(), score));
                }
            }

            if let Some((file, score)) = best {
                debug!(item = %item.id, file, score, "Matched preview file");
                used.insert(file);
                matches.push(PreviewMatch {
                    item_index: index,
                    item_id: item.id.clone(),
                    title: item.title.clone(),
                    preview_file: file.to_string(),
                    score,
                    method: MatchMethod::Scored,
                });
            }
        }

        matches.sort_by_key(|m| m.item_index);
        matches
    }
}

/// Strip the export suffix and trailing revision markers from a filename.
fn clean_preview_name(file: &str) -> String {
    let mut name = file.to_lowercase();
    for ext in ["-preview.png", ".png"] {
        if let Some(stripped) = name.strip_suffix(ext) {
            name = stripped.to_string();
        }
    }
    for suffix in REVISION_SUFFIXES {
        if let Some(stripped) = name.strip_suffix(suffix) {
            name = stripped.to_string();
        }
    }
    name
}

/// Lower-case, split on separators, drop words that never help matching.
fn strip_stop_words(s: &str) -> String {
    normalize(s)
        .split(' ')
        .filter(|w| !w.is_empty() && !STOP_WORDS.contains(w))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Distinctive words (4+ letters) after removing arrangement notes.
fn key_terms(text: &str) -> HashSet<String> {
    let text = text.to_lowercase().replace('_', " ");
    let text = RE_ARRANGEMENT_NOTE.replace_all(&text, "");
    let text = RE_FULL_SCORE.replace_all(&text, "");
    let text = RE_DASH.replace_all(&text, " ");
    long_words(&text)
}

fn long_words(text: &str) -> HashSet<String> {
    let text = text.to_lowercase().replace('_', " ");
    RE_LONG_WORD
        .find_iter(&text)
        .map(|m| m.as_str().to_string())
        .collect()
}

fn overlap(a: &HashSet<String>, b: &HashSet<String>) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    let common = a.intersection(b).count();
    common as f64 / a.len().max(b.len()) as f64
}

/// Similarity ratio (0.0-1.0) derived from the Levenshtein distance.
fn similarity(a: &str, b: &str) -> f64 {
    let longest = a.chars().count().max(b.chars().count());
    if longest == 0 {
        return 1.0;
    }
    1.0 - levenshtein_distance(a, b) as f64 / longest as f64
}

fn levenshtein_distance(a: &str, b: &str) -> usize {
    let b_chars: Vec<char> = b.chars().collect();
    let mut previous: Vec<usize> = (0..=b_chars.len()).collect();
    let mut current = vec![0usize; b_chars.len() + 1];

    for (i, a_char) in a.chars().enumerate() {
        current[0] = i + 1;
        for (j, b_char) in b_chars.iter().enumerate() {
            let cost = usize::from(a_char != *b_char);
            current[j + 1] = (previous[j + 1] + 1)
                .min(current[j] + 1)
                .min(previous[j] + cost);
        }
        std::mem::swap(&mut previous, &mut current);
    }

    previous[b_chars.len()]
}
