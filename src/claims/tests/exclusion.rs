use crate::claims::exclusion::ExclusionCatalog;

use super::common::{basis_vec, config};

fn analyze(text: &str) -> crate::claims::exclusion::ExclusionAssessment {
    ExclusionCatalog::standard().analyze(text, &[], &[], &config())
}

#[test]
fn emergency_token_overrides_every_signal() {
    for text in [
        "emergency appendectomy",
        "blunt trauma to the abdomen",
        "road accident with multiple fractures",
        "acute myocardial infarction",
        "critical condition on admission",
        "life-threatening internal bleeding",
    ] {
        let assessment = analyze(text);
        assert!(!assessment.is_excluded, "excluded for {text:?}");
        assert_eq!(assessment.confidence, 0.9);
        assert!(assessment.reason.contains("emergency treatment indicator"));
    }
}

#[test]
fn emergency_override_beats_exclusion_keywords() {
    let assessment = analyze("emergency revision of cosmetic liposuction after accident");
    assert!(!assessment.is_excluded);
}

#[test]
fn two_cosmetic_keywords_exclude_the_claim() {
    let assessment = analyze("cosmetic liposuction procedure");
    assert!(assessment.is_excluded);
    assert!((assessment.confidence - 0.9).abs() < 1e-9);
    assert!(assessment.reason.contains("cosmetic"));
}

#[test]
fn single_weak_keyword_reads_as_no_pattern() {
    // One dental keyword saturates at 1/2, so 0.35 stays below the 0.4
    // borderline threshold.
    let assessment = analyze("routine dental checkup");
    assert!(!assessment.is_excluded);
    assert_eq!(assessment.reason, "no exclusion pattern detected");
    assert!((assessment.confidence - 0.65).abs() < 1e-9);
}

#[test]
fn dental_pair_is_borderline_but_not_excluded() {
    // Two dental keywords reach the full 0.7 weight, which does not clear
    // the strictly-greater exclusion threshold.
    let assessment = analyze("dental treatment for tooth decay");
    assert!(!assessment.is_excluded);
    assert!(assessment.reason.contains("borderline exclusion signal"));
}

#[test]
fn vector_similarity_alone_can_exclude() {
    let claim = basis_vec(8, 1);
    let excluded = basis_vec(8, 1);
    let assessment = ExclusionCatalog::standard().analyze(
        "prolonged hospitalization for observation",
        &claim,
        &excluded,
        &config(),
    );
    // cosine 1.0 scaled by 0.8 clears the 0.7 threshold.
    assert!(assessment.is_excluded);
    assert!(assessment
        .reason
        .contains("closely match the policy's excluded conditions"));
}

#[test]
fn orthogonal_or_mismatched_embeddings_contribute_nothing() {
    let catalog = ExclusionCatalog::standard();
    let orthogonal = catalog.analyze(
        "prolonged hospitalization for observation",
        &basis_vec(8, 0),
        &basis_vec(8, 1),
        &config(),
    );
    assert!(!orthogonal.is_excluded);
    assert_eq!(orthogonal.reason, "no exclusion pattern detected");

    let mismatched = catalog.analyze(
        "prolonged hospitalization for observation",
        &basis_vec(8, 0),
        &basis_vec(16, 0),
        &config(),
    );
    assert!(!mismatched.is_excluded);
}

#[test]
fn keyword_reason_wins_over_weaker_vector_signal() {
    // Keyword score 0.9 outranks the scaled vector 0.8, so the rationale
    // names the keyword category.
    let assessment = ExclusionCatalog::standard().analyze(
        "cosmetic liposuction procedure",
        &basis_vec(8, 1),
        &basis_vec(8, 1),
        &config(),
    );
    assert!(assessment.is_excluded);
    assert!(assessment.reason.contains("cosmetic"));
}

#[test]
fn details_record_every_matched_category() {
    let assessment = analyze("elective lasik consultation");
    let joined = assessment.details.join("\n");
    assert!(joined.contains("elective"));
    assert!(joined.contains("vision"));
}
