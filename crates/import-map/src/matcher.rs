//! Fuzzy header-to-field matcher.
//!
//! A header is compared against every candidate field and the best-scoring
//! candidate wins. Scores come from four signals; the strongest applicable
//! one is kept:
//!
//! | Signal                 | Score                                  |
//! |------------------------|----------------------------------------|
//! | exact (normalized)     | 1.0                                    |
//! | containment            | shorter length / longer length         |
//! | synonym equal          | 0.95                                   |
//! | header contains synonym| 0.85                                   |
//! | synonym contains header| 0.75                                   |
//! | character overlap      | share of field chars in header × 0.7   |

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use import_model::FieldCatalog;

use crate::patterns::build_synonym_map;
use crate::utils::normalize_key;

/// Scores at or below this never produce a match.
pub const DEFAULT_MIN_CONFIDENCE: f32 = 0.3;

const SYNONYM_EQUAL_SCORE: f32 = 0.95;
const SYNONYM_IN_HEADER_SCORE: f32 = 0.85;
const HEADER_IN_SYNONYM_SCORE: f32 = 0.75;
const CHAR_OVERLAP_WEIGHT: f32 = 0.7;

/// Which rule produced a score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchSignal {
    /// Nothing matched.
    None,
    Exact,
    Containment,
    SynonymEqual,
    SynonymInHeader,
    HeaderInSynonym,
    CharacterOverlap,
}

impl MatchSignal {
    pub fn label(&self) -> &'static str {
        match self {
            Self::None => "no match",
            Self::Exact => "exact name",
            Self::Containment => "name containment",
            Self::SynonymEqual => "synonym",
            Self::SynonymInHeader => "header contains synonym",
            Self::HeaderInSynonym => "synonym contains header",
            Self::CharacterOverlap => "character overlap",
        }
    }
}

/// Confidence level categories for match quality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum ConfidenceLevel {
    /// Accepted but weak; worth a manual look.
    Low,
    Medium,
    /// Exact or synonym-equal matches.
    High,
}

impl ConfidenceLevel {
    #[must_use]
    pub fn description(&self) -> &'static str {
        match self {
            Self::High => "high confidence - likely correct",
            Self::Medium => "medium confidence - should review",
            Self::Low => "low confidence - needs verification",
        }
    }
}

/// Boundaries between confidence levels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConfidenceThresholds {
    /// Minimum confidence for high-quality matches (default: 0.95).
    pub high: f32,
    /// Minimum confidence for medium-quality matches (default: 0.75).
    pub medium: f32,
}

impl Default for ConfidenceThresholds {
    fn default() -> Self {
        Self {
            high: SYNONYM_EQUAL_SCORE,
            medium: HEADER_IN_SYNONYM_SCORE,
        }
    }
}

impl ConfidenceThresholds {
    #[must_use]
    pub fn categorize(&self, confidence: f32) -> ConfidenceLevel {
        if confidence >= self.high {
            ConfidenceLevel::High
        } else if confidence >= self.medium {
            ConfidenceLevel::Medium
        } else {
            ConfidenceLevel::Low
        }
    }
}

/// Outcome of matching one header.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchResult {
    /// Best candidate, present only when `confidence` beats the threshold.
    pub field: Option<String>,
    /// Best score over all candidates, in `[0, 1]`.
    pub confidence: f32,
    pub signal: MatchSignal,
}

impl MatchResult {
    fn none() -> Self {
        Self {
            field: None,
            confidence: 0.0,
            signal: MatchSignal::None,
        }
    }

    pub fn is_match(&self) -> bool {
        self.field.is_some()
    }

    /// Level of an accepted match; `None` when nothing was accepted.
    pub fn level(&self, thresholds: &ConfidenceThresholds) -> Option<ConfidenceLevel> {
        self.field
            .as_ref()
            .map(|_| thresholds.categorize(self.confidence))
    }
}

/// Scores headers against candidate fields using a synonym table.
#[derive(Debug, Clone)]
pub struct FieldMatcher {
    synonyms: BTreeMap<String, Vec<String>>,
    min_confidence: f32,
}

impl Default for FieldMatcher {
    fn default() -> Self {
        Self::new(&FieldCatalog::lead_catalog())
    }
}

impl FieldMatcher {
    pub fn new(catalog: &FieldCatalog) -> Self {
        Self {
            synonyms: build_synonym_map(catalog),
            min_confidence: DEFAULT_MIN_CONFIDENCE,
        }
    }

    /// Sets the acceptance threshold, clamped to `[0, 1]`.
    #[must_use]
    pub fn with_min_confidence(mut self, min_confidence: f32) -> Self {
        self.min_confidence = if min_confidence.is_nan() {
            DEFAULT_MIN_CONFIDENCE
        } else {
            min_confidence.clamp(0.0, 1.0)
        };
        self
    }

    pub fn min_confidence(&self) -> f32 {
        self.min_confidence
    }

    /// Picks the best candidate for `header`.
    ///
    /// Ties go to the earliest candidate. The field is reported only when the
    /// best score is strictly above the minimum confidence.
    pub fn match_header<S: AsRef<str>>(&self, header: &str, candidates: &[S]) -> MatchResult {
        let normalized = normalize_key(header);
        if normalized.is_empty() {
            return MatchResult::none();
        }

        let mut best: Option<(&str, f32, MatchSignal)> = None;
        for candidate in candidates {
            let candidate = candidate.as_ref();
            let (score, signal) = self.score_normalized(&normalized, candidate);
            if best.is_none_or(|(_, top, _)| score > top) {
                best = Some((candidate, score, signal));
            }
        }

        let Some((candidate, confidence, signal)) = best else {
            return MatchResult::none();
        };
        let field = (confidence > self.min_confidence).then(|| candidate.to_string());
        MatchResult {
            field,
            confidence,
            signal,
        }
    }

    /// Scores a single header/field pair.
    pub fn score(&self, header: &str, field: &str) -> (f32, MatchSignal) {
        let normalized = normalize_key(header);
        if normalized.is_empty() {
            return (0.0, MatchSignal::None);
        }
        self.score_normalized(&normalized, field)
    }

    fn score_normalized(&self, header: &str, field: &str) -> (f32, MatchSignal) {
        let target = normalize_key(field);
        if target.is_empty() {
            return (0.0, MatchSignal::None);
        }
        if header == target {
            return (1.0, MatchSignal::Exact);
        }

        let mut best = (0.0_f32, MatchSignal::None);
        let mut offer = |score: f32, signal: MatchSignal| {
            if score > best.0 {
                best = (score, signal);
            }
        };

        if header.contains(target.as_str()) || target.contains(header) {
            let header_len = header.chars().count();
            let target_len = target.chars().count();
            let ratio = header_len.min(target_len) as f32 / header_len.max(target_len) as f32;
            offer(ratio, MatchSignal::Containment);
        }

        if let Some(synonyms) = self.synonyms.get(field) {
            for synonym in synonyms {
                if header == synonym {
                    offer(SYNONYM_EQUAL_SCORE, MatchSignal::SynonymEqual);
                } else if header.contains(synonym.as_str()) {
                    offer(SYNONYM_IN_HEADER_SCORE, MatchSignal::SynonymInHeader);
                } else if synonym.contains(header) {
                    offer(HEADER_IN_SYNONYM_SCORE, MatchSignal::HeaderInSynonym);
                }
            }
        }

        let header_chars: BTreeSet<char> = header.chars().collect();
        let target_len = target.chars().count();
        let shared = target.chars().filter(|c| header_chars.contains(c)).count();
        offer(
            shared as f32 / target_len as f32 * CHAR_OVERLAP_WEIGHT,
            MatchSignal::CharacterOverlap,
        );

        best
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn categorize_levels() {
        let thresholds = ConfidenceThresholds::default();
        assert_eq!(thresholds.categorize(1.0), ConfidenceLevel::High);
        assert_eq!(thresholds.categorize(0.95), ConfidenceLevel::High);
        assert_eq!(thresholds.categorize(0.85), ConfidenceLevel::Medium);
        assert_eq!(thresholds.categorize(0.4), ConfidenceLevel::Low);
    }

    #[test]
    fn overlap_counts_field_characters() {
        let matcher = FieldMatcher::default();
        // Every character of "city", but no substring or synonym relation.
        let (score, signal) = matcher.score("Ticy", "City");
        assert_eq!(signal, MatchSignal::CharacterOverlap);
        assert!((score - 0.7).abs() < 1e-6);
    }

    #[test]
    fn min_confidence_is_clamped() {
        let matcher = FieldMatcher::default().with_min_confidence(4.0);
        assert_eq!(matcher.min_confidence(), 1.0);
        let matcher = FieldMatcher::default().with_min_confidence(f32::NAN);
        assert_eq!(matcher.min_confidence(), DEFAULT_MIN_CONFIDENCE);
    }
}
