//! Requirement counting under the BC and RegData methodologies.
//!
//! Both counters lower-case the text and collapse whitespace runs to a
//! single space before matching, so byte positions in [`MatchDetail`]
//! refer to that normalised text.
//!
//! - **BC** masks negated obligations (`must not`, `not required`, ...)
//!   and then counts `must`, `shall`, `required`.
//! - **RegData** counts `may not` first and masks it, then counts
//!   `shall`, `must`, `required`, `prohibited`. Negated `must`/`shall`
//!   still count.

use std::collections::BTreeMap;

use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;

use regstock_core::tables::{BcTerms, RegDataTerms};

use crate::AnalysisError;

lazy_static! {
    static ref WHITESPACE: Regex = Regex::new(r"\s+").unwrap();
}

/// Most match details kept per document.
pub const MAX_DETAILS: usize = 100;
/// Characters of context kept either side of a match.
pub const CONTEXT_CHARS: usize = 50;

const EXCLUDED_PLACEHOLDER: &str = "___excluded___";
const COUNTED_PLACEHOLDER: &str = "___counted___";

/// One counted occurrence, for explaining a total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchDetail {
    pub term: String,
    pub position: usize,
    pub context: String,
}

/// Total and per-term breakdown for one text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RequirementCount {
    pub total: u64,
    pub by_term: BTreeMap<String, u64>,
    pub details: Vec<MatchDetail>,
}

impl RequirementCount {
    pub fn term(&self, term: &str) -> u64 {
        self.by_term.get(term).copied().unwrap_or(0)
    }
}

/// A pure, text-only requirement counting methodology.
pub trait RequirementCounter {
    /// Short method name used in logs and reports.
    fn method(&self) -> &'static str;

    /// Count `text`, keeping at most `detail_limit` match details.
    fn tally(&self, text: &str, detail_limit: usize) -> RequirementCount;

    fn count(&self, text: &str) -> RequirementCount {
        self.tally(text, 0)
    }

    /// Count with up to [`MAX_DETAILS`] match details.
    fn explain(&self, text: &str) -> RequirementCount {
        self.tally(text, MAX_DETAILS)
    }
}

/// Lower-case and collapse whitespace runs to one space.
pub fn normalize_text(text: &str) -> String {
    WHITESPACE.replace_all(&text.to_lowercase(), " ").into_owned()
}

// ── BC ──

pub struct BcCounter {
    negations: Vec<Regex>,
    terms: Vec<(String, Regex)>,
}

impl BcCounter {
    pub fn new(tables: &BcTerms) -> Result<Self, AnalysisError> {
        let negations = tables
            .negations
            .iter()
            .map(|phrase| phrase_pattern(phrase))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            negations,
            terms: term_patterns(&tables.terms)?,
        })
    }
}

impl RequirementCounter for BcCounter {
    fn method(&self) -> &'static str {
        "bc"
    }

    fn tally(&self, text: &str, detail_limit: usize) -> RequirementCount {
        if text.trim().is_empty() {
            return RequirementCount::default();
        }
        let mut masked = normalize_text(text);
        for negation in &self.negations {
            masked = negation.replace_all(&masked, EXCLUDED_PLACEHOLDER).into_owned();
        }

        let mut tally = Tally::new(detail_limit);
        for (term, pattern) in &self.terms {
            tally.record(term, pattern, &masked);
        }
        tally.finish()
    }
}

// ── RegData ──

pub struct RegDataCounter {
    phrases: Vec<(String, Regex)>,
    terms: Vec<(String, Regex)>,
}

impl RegDataCounter {
    pub fn new(tables: &RegDataTerms) -> Result<Self, AnalysisError> {
        let phrases = tables
            .phrases
            .iter()
            .map(|phrase| Ok((phrase.clone(), phrase_pattern(phrase)?)))
            .collect::<Result<Vec<_>, AnalysisError>>()?;
        Ok(Self {
            phrases,
            terms: term_patterns(&tables.terms)?,
        })
    }
}

impl RequirementCounter for RegDataCounter {
    fn method(&self) -> &'static str {
        "regdata"
    }

    fn tally(&self, text: &str, detail_limit: usize) -> RequirementCount {
        if text.trim().is_empty() {
            return RequirementCount::default();
        }
        let mut masked = normalize_text(text);
        let mut tally = Tally::new(detail_limit);

        // Phrases are counted once each, then masked so their words are not
        // picked up again by the single-term pass.
        for (phrase, pattern) in &self.phrases {
            tally.record(phrase, pattern, &masked);
            masked = pattern.replace_all(&masked, COUNTED_PLACEHOLDER).into_owned();
        }
        for (term, pattern) in &self.terms {
            tally.record(term, pattern, &masked);
        }
        tally.finish()
    }
}

// ── Shared helpers ──

struct Tally {
    count: RequirementCount,
    detail_limit: usize,
}

impl Tally {
    fn new(detail_limit: usize) -> Self {
        Self {
            count: RequirementCount::default(),
            detail_limit,
        }
    }

    fn record(&mut self, term: &str, pattern: &Regex, text: &str) {
        let mut n = 0u64;
        for m in pattern.find_iter(text) {
            n += 1;
            if self.count.details.len() < self.detail_limit {
                self.count.details.push(MatchDetail {
                    term: term.to_string(),
                    position: m.start(),
                    context: context(text, m.start(), m.end()),
                });
            }
        }
        *self.count.by_term.entry(term.to_string()).or_insert(0) += n;
        self.count.total += n;
    }

    fn finish(self) -> RequirementCount {
        self.count
    }
}

fn term_patterns(terms: &[String]) -> Result<Vec<(String, Regex)>, AnalysisError> {
    terms
        .iter()
        .map(|term| {
            let pattern = Regex::new(&format!(r"(?i)\b{}\b", regex::escape(term)))?;
            Ok((term.clone(), pattern))
        })
        .collect()
}

/// Multi-word phrase with any whitespace between words, e.g. `\bmust\s+not\b`.
fn phrase_pattern(phrase: &str) -> Result<Regex, AnalysisError> {
    let words: Vec<String> = phrase.split_whitespace().map(regex::escape).collect();
    Ok(Regex::new(&format!(r"(?i)\b{}\b", words.join(r"\s+")))?)
}

/// `...` + up to [`CONTEXT_CHARS`] characters either side of `start..end` + `...`.
fn context(text: &str, start: usize, end: usize) -> String {
    let from = text[..start]
        .char_indices()
        .rev()
        .nth(CONTEXT_CHARS - 1)
        .map(|(i, _)| i)
        .unwrap_or(0);
    let to = text[end..]
        .char_indices()
        .nth(CONTEXT_CHARS)
        .map(|(i, _)| end + i)
        .unwrap_or(text.len());
    format!("...{}...", &text[from..to])
}
