//! Behavior of the fuzzy header matcher.

use import_map::{ConfidenceLevel, ConfidenceThresholds, FieldMatcher, MatchSignal};
use import_model::FieldCatalog;
use proptest::prelude::*;

fn matcher() -> FieldMatcher {
    FieldMatcher::new(&FieldCatalog::lead_catalog())
}

#[test]
fn synonym_header_matches_email() {
    let result = matcher().match_header("Email Address", &["Email", "FullName"]);
    assert_eq!(result.field.as_deref(), Some("Email"));
    assert!(result.confidence >= 0.85);
    assert_eq!(result.signal, MatchSignal::SynonymEqual);
}

#[test]
fn phone_number_maps_to_contact() {
    let result = matcher().match_header("Phone Number", &["Contact", "Email"]);
    assert_eq!(result.field.as_deref(), Some("Contact"));
    assert!(result.confidence >= 0.75);
}

#[test]
fn unrelated_header_is_rejected() {
    let result = matcher().match_header("xyz123", &["Contact"]);
    assert_eq!(result.field, None);
    assert!(result.confidence < 0.4);
}

#[test]
fn exact_name_scores_one() {
    let result = matcher().match_header("full_name", &["Email", "FullName"]);
    assert_eq!(result.field.as_deref(), Some("FullName"));
    assert_eq!(result.confidence, 1.0);
    assert_eq!(result.signal, MatchSignal::Exact);
    assert_eq!(
        result.level(&ConfidenceThresholds::default()),
        Some(ConfidenceLevel::High)
    );
}

#[test]
fn no_candidates_means_no_match() {
    let empty: [&str; 0] = [];
    let result = matcher().match_header("Email", &empty);
    assert_eq!(result.field, None);
    assert_eq!(result.confidence, 0.0);
}

#[test]
fn separator_only_header_matches_nothing() {
    let result = matcher().match_header(" _-() ", &["Email"]);
    assert_eq!(result.field, None);
    assert_eq!(result.confidence, 0.0);
}

#[test]
fn ties_go_to_first_candidate() {
    // Both candidates normalize to "remark" and score identically.
    let result = matcher().match_header("Remarks", &["Re-mark", "Remark"]);
    assert_eq!(result.field.as_deref(), Some("Re-mark"));
    assert_eq!(result.signal, MatchSignal::Containment);
}

#[test]
fn threshold_is_exclusive() {
    let strict = matcher().with_min_confidence(1.0);
    let result = strict.match_header("Email", &["Email"]);
    assert_eq!(result.confidence, 1.0);
    assert_eq!(result.field, None);
}

#[test]
fn candidates_without_synonyms_still_match_by_name() {
    let result = matcher().match_header("Campaign Code", &["CampaignCode"]);
    assert_eq!(result.field.as_deref(), Some("CampaignCode"));
    assert_eq!(result.signal, MatchSignal::Exact);
}

proptest! {
    #[test]
    fn confidence_stays_in_unit_range(
        header in "[ a-zA-Z0-9_.-]{0,24}",
        candidates in proptest::collection::vec("[a-zA-Z]{1,12}", 0..6),
    ) {
        let result = matcher().match_header(&header, &candidates);
        prop_assert!((0.0..=1.0).contains(&result.confidence));
        prop_assert_eq!(result.field.is_some(), result.confidence > 0.3);
        if let Some(field) = &result.field {
            prop_assert!(candidates.contains(field));
        }
    }

    #[test]
    fn matching_is_case_insensitive(header in "[a-zA-Z ]{1,16}") {
        let candidates = FieldCatalog::lead_catalog().field_names();
        let lower = matcher().match_header(&header.to_lowercase(), &candidates);
        let upper = matcher().match_header(&header.to_uppercase(), &candidates);
        prop_assert_eq!(lower, upper);
    }

    #[test]
    fn repeated_calls_agree(
        header in "[ a-zA-Z0-9_()/-]{0,20}",
        candidates in proptest::collection::vec("[a-zA-Z ]{1,12}", 0..6),
    ) {
        let matcher = matcher();
        let first = matcher.match_header(&header, &candidates);
        let second = matcher.match_header(&header, &candidates);
        prop_assert_eq!(first, second);
    }
}
