//! Keyword-scored ANZSIC industry classification.
//!
//! Each division's keyword list compiles to one case-insensitive whole-word
//! alternation. A document scores `10 × title matches + window matches`
//! per division, where the window is the first `text_window` characters of
//! the body. The highest score wins; ties go to the division listed first
//! in the tables. With no division score, a cross-cutting keyword in the
//! title or window gives `X`, otherwise `U`.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use regex::Regex;
use serde::Serialize;

use regstock_core::{ClassifierTables, IndustryCode};

use crate::AnalysisError;

/// Title matches are worth this many body matches.
pub const TITLE_WEIGHT: u64 = 10;

/// How clearly the winning division beat the rest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Confidence {
    Low,
    Medium,
    High,
}

impl Confidence {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classification result for a single document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IndustryClassification {
    pub code: IndustryCode,
    pub confidence: Confidence,
    /// Non-zero division scores.
    pub scores: BTreeMap<IndustryCode, u64>,
    /// Distinct lower-cased keywords of the winning division found in the title or window.
    pub matched_keywords: Vec<String>,
}

impl IndustryClassification {
    fn fallback(code: IndustryCode, confidence: Confidence) -> Self {
        Self {
            code,
            confidence,
            scores: BTreeMap::new(),
            matched_keywords: Vec::new(),
        }
    }
}

struct DivisionPattern {
    code: IndustryCode,
    pattern: Regex,
}

/// Precompiled, read-only division patterns.
pub struct IndustryClassifier {
    divisions: Vec<DivisionPattern>,
    cross_cutting: Option<Regex>,
    text_window: usize,
}

impl IndustryClassifier {
    /// Compile one pattern per division. Division order in `tables` is the tie-break order.
    pub fn new(tables: &ClassifierTables, text_window: usize) -> Result<Self, AnalysisError> {
        let divisions = tables
            .divisions
            .iter()
            .map(|division| {
                Ok(DivisionPattern {
                    code: division.code,
                    pattern: keyword_pattern(&division.keywords)?,
                })
            })
            .collect::<Result<Vec<_>, AnalysisError>>()?;

        let cross_cutting = if tables.cross_cutting.is_empty() {
            None
        } else {
            Some(keyword_pattern(&tables.cross_cutting)?)
        };

        Ok(Self {
            divisions,
            cross_cutting,
            text_window,
        })
    }

    pub fn text_window(&self) -> usize {
        self.text_window
    }

    /// Primary industry code only.
    pub fn classify_industry(&self, title: &str, text: &str) -> IndustryCode {
        self.classify(title, text).code
    }

    pub fn classify(&self, title: &str, text: &str) -> IndustryClassification {
        let window = char_window(text, self.text_window);

        let mut scores = BTreeMap::new();
        // (table index, code, score) of the first maximum in table order.
        let mut best: Option<(usize, IndustryCode, u64)> = None;

        for (idx, division) in self.divisions.iter().enumerate() {
            let title_hits = division.pattern.find_iter(title).count() as u64;
            let window_hits = division.pattern.find_iter(window).count() as u64;
            let score = TITLE_WEIGHT * title_hits + window_hits;
            if score == 0 {
                continue;
            }
            scores.insert(division.code, score);
            if best.is_none_or(|(_, _, s)| score > s) {
                best = Some((idx, division.code, score));
            }
        }

        if let Some((idx, code, top)) = best {
            let rival = scores
                .iter()
                .filter(|(c, _)| **c != code)
                .map(|(_, s)| *s)
                .max();
            let matched_keywords = matched_keywords(&self.divisions[idx].pattern, title, window);
            return IndustryClassification {
                code,
                confidence: confidence(top, rival),
                scores,
                matched_keywords,
            };
        }

        if let Some(cross) = &self.cross_cutting
            && cross.is_match(&format!("{title} {window}"))
        {
            return IndustryClassification::fallback(IndustryCode::X, Confidence::Medium);
        }

        IndustryClassification::fallback(IndustryCode::U, Confidence::Low)
    }
}

// ── Helpers ──

/// `(?i)\b(?:kw1|kw2|...)\b` with every keyword escaped.
fn keyword_pattern(keywords: &[String]) -> Result<Regex, AnalysisError> {
    let alternation: Vec<String> = keywords
        .iter()
        .filter(|k| !k.trim().is_empty())
        .map(|k| regex::escape(k.trim()))
        .collect();
    Ok(Regex::new(&format!(r"(?i)\b(?:{})\b", alternation.join("|")))?)
}

/// First `n` characters of `text`, cut on a char boundary.
fn char_window(text: &str, n: usize) -> &str {
    match text.char_indices().nth(n) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// High with no rival or at least 2× the best rival (floor 1), medium at 1.5×.
fn confidence(top: u64, rival: Option<u64>) -> Confidence {
    let Some(rival) = rival else {
        return Confidence::High;
    };
    let floor = rival.max(1);
    if top >= 2 * floor {
        Confidence::High
    } else if 2 * top >= 3 * floor {
        Confidence::Medium
    } else {
        Confidence::Low
    }
}

fn matched_keywords(pattern: &Regex, title: &str, window: &str) -> Vec<String> {
    let found: BTreeSet<String> = pattern
        .find_iter(title)
        .chain(pattern.find_iter(window))
        .map(|m| m.as_str().to_lowercase())
        .collect();
    found.into_iter().collect()
}
