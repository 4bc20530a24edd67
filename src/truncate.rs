//! Corpus-wide word truncation.
//!
//! The global length is the smallest `L` for which cutting every distinct
//! word to `L` characters keeps all of them distinct. Collision-freedom at
//! `L` implies collision-freedom at `L + 1`, so the search is a binary search.

use crate::config::OverrideRule;
use crate::ignore::matches;
use once_cell::sync::Lazy;
use regex::Regex;
use std::borrow::Cow;
use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::path::Path;
use tracing::{debug, info, warn};

/// Unicode word characters; everything else delimits.
pub static WORD_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\w+").expect("word pattern is valid"));

/// Number of colliding groups kept for the verbose report.
const COLLISION_SAMPLE: usize = 5;

/// Truncation lengths for one run.
#[derive(Debug, Clone, Default)]
pub struct TruncationPlan {
    pub global_length: Option<usize>,
    pub max_length: usize,
    pub overrides: Vec<OverrideRule>,
    /// Groups of words that still collide at `max_length` when no global
    /// length exists.
    pub collisions: Vec<Vec<String>>,
}

impl TruncationPlan {
    /// Builds the plan from every text in the corpus.
    pub fn compute<'a, I>(texts: I, max_length: usize, overrides: Vec<OverrideRule>) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let words = unique_words(texts);
        debug!("Corpus has {} distinct words", words.len());

        let global_length = find_min_truncation_length(&words, max_length);
        let collisions = match global_length {
            Some(length) => {
                info!("Determined minimal truncation length: {}", length);
                Vec::new()
            }
            None if words.is_empty() => Vec::new(),
            None => {
                warn!(
                    "No truncation length up to {} keeps words unique. Global truncation will not be applied; overrides still apply.",
                    max_length
                );
                collision_groups(&words, max_length)
            }
        };

        TruncationPlan {
            global_length,
            max_length,
            overrides,
            collisions,
        }
    }

    /// The first matching override, else the global length.
    pub fn effective_length(&self, path: &Path) -> Option<(usize, bool)> {
        self.overrides
            .iter()
            .find(|rule| matches(path, &rule.pattern))
            .map(|rule| (rule.max_length, true))
            .or_else(|| self.global_length.map(|length| (length, false)))
    }
}

pub fn unique_words<'a, I>(texts: I) -> HashSet<&'a str>
where
    I: IntoIterator<Item = &'a str>,
{
    texts
        .into_iter()
        .flat_map(|text| WORD_PATTERN.find_iter(text).map(|m| m.as_str()))
        .collect()
}

/// Smallest length in `[1, min(max_length, longest word)]` without collisions.
pub fn find_min_truncation_length<S: AsRef<str>>(
    words: &HashSet<S>,
    max_length: usize,
) -> Option<usize> {
    let longest = words.iter().map(|w| w.as_ref().chars().count()).max()?;
    let upper = longest.min(max_length);
    if upper == 0 {
        return None;
    }

    let candidates: Vec<usize> = (1..=upper).collect();
    let index = candidates.partition_point(|&length| !is_collision_free(words, length));
    candidates.get(index).copied()
}

pub fn is_collision_free<S: AsRef<str>>(words: &HashSet<S>, length: usize) -> bool {
    let mut seen = HashSet::with_capacity(words.len());
    words
        .iter()
        .all(|word| seen.insert(truncate_word(word.as_ref(), length)))
}

/// First `length` characters of `word`.
pub fn truncate_word(word: &str, length: usize) -> &str {
    match word.char_indices().nth(length) {
        Some((index, _)) => &word[..index],
        None => word,
    }
}

/// Cuts every word in `text` longer than `length` characters.
pub fn truncate_content(text: &str, length: usize) -> Cow<'_, str> {
    WORD_PATTERN.replace_all(text, |caps: &regex::Captures| {
        truncate_word(&caps[0], length).to_string()
    })
}

fn collision_groups<S: AsRef<str>>(words: &HashSet<S>, length: usize) -> Vec<Vec<String>> {
    let mut groups: BTreeMap<&str, BTreeSet<&str>> = BTreeMap::new();
    for word in words {
        let word = word.as_ref();
        groups
            .entry(truncate_word(word, length))
            .or_default()
            .insert(word);
    }
    groups
        .into_values()
        .filter(|group| group.len() > 1)
        .take(COLLISION_SAMPLE)
        .map(|group| group.into_iter().map(str::to_string).collect())
        .collect()
}
