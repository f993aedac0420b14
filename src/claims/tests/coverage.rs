use crate::claims::coverage::CoverageRules;
use crate::claims::domain::ExtractedMedicalProfile;
use crate::claims::terminology::MedicalTaxonomy;

fn assess(text: &str) -> crate::claims::coverage::CoverageAssessment {
    let taxonomy = MedicalTaxonomy::standard();
    let profile = taxonomy.extract(text);
    CoverageRules::standard().assess(&profile, text)
}

#[test]
fn unmatched_text_scores_zero() {
    let assessment = assess("routine paperwork with no medical content");
    assert_eq!(assessment.score, 0.0);
    assert!(assessment.reasons.is_empty());
}

#[test]
fn empty_profile_yields_default_assessment() {
    let rules = CoverageRules::standard();
    let assessment = rules.assess(&ExtractedMedicalProfile::default(), "");
    assert_eq!(assessment.score, 0.0);
    assert!(assessment.reasons.is_empty());
}

#[test]
fn strongest_category_dominates_rather_than_summing() {
    // Neurological: 0.85 * (1/15); General: 0.7 * (1/13). The score must be
    // the larger contribution, not their sum.
    let assessment = assess("admitted with epilepsy and fever");
    let neurological: f64 = 0.85 * (1.0 / 15.0);
    let general = 0.7 * (1.0 / 13.0);
    assert!((assessment.score - neurological.max(general)).abs() < 1e-9);
    assert_eq!(assessment.reasons.len(), 2);
}

#[test]
fn high_value_token_floors_the_score() {
    let assessment = assess("exploratory surgery performed under general anaesthesia");
    assert!((assessment.score - 0.9).abs() < 1e-9);
    assert!(assessment
        .reasons
        .iter()
        .any(|reason| reason.contains("high-value procedure indicator")));
}

#[test]
fn high_value_floor_clears_the_approval_threshold() {
    // A thin taxonomy match alone stays low, but the procedure token lifts
    // the claim over the default 0.6 approval threshold.
    let weak = assess("chest pain observed overnight");
    assert!(weak.score < 0.6, "score was {}", weak.score);

    let strong = assess("chest pain, emergency angioplasty performed");
    assert!(strong.score > 0.6, "score was {}", strong.score);
}

#[test]
fn reasons_name_the_matched_categories() {
    let assessment = assess("heart attack treated with angioplasty");
    assert!(assessment
        .reasons
        .iter()
        .any(|reason| reason.contains("cardiac")));
}
