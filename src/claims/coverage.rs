use serde::{Deserialize, Serialize};

use super::domain::{ExtractedMedicalProfile, MedicalCategory};
use super::similarity::clamp_unit;

/// Coverage verdict for the extracted medical profile.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CoverageAssessment {
    pub score: f64,
    pub reasons: Vec<String>,
}

#[derive(Debug)]
struct CoverageRule {
    category: MedicalCategory,
    base_score: f64,
    rationale: &'static str,
}

/// Floor applied when the claim text names a high-value procedure. Values
/// like surgery or ICU admission indicate genuinely hospital-grade treatment
/// even when the taxonomy match is thin.
const HIGH_VALUE_SCORE: f64 = 0.9;

const HIGH_VALUE_TOKENS: &[&str] = &[
    "surgery",
    "operation",
    "transplant",
    "emergency",
    "icu",
    "intensive care",
    "angioplasty",
    "craniotomy",
    "chemotherapy",
    "dialysis",
];

/// Static rule table mapping taxonomy categories to coverage base scores.
#[derive(Debug)]
pub struct CoverageRules {
    rules: Vec<CoverageRule>,
}

impl CoverageRules {
    pub fn standard() -> Self {
        Self {
            rules: vec![
                CoverageRule {
                    category: MedicalCategory::Cardiac,
                    base_score: 0.9,
                    rationale: "cardiac conditions covered under critical illness benefits",
                },
                CoverageRule {
                    category: MedicalCategory::Neurological,
                    base_score: 0.85,
                    rationale: "neurological conditions covered under hospitalization benefits",
                },
                CoverageRule {
                    category: MedicalCategory::Oncological,
                    base_score: 0.85,
                    rationale: "oncological treatment covered under major illness benefits",
                },
                CoverageRule {
                    category: MedicalCategory::Orthopedic,
                    base_score: 0.8,
                    rationale: "orthopedic procedures covered under surgical benefits",
                },
                CoverageRule {
                    category: MedicalCategory::Gastrointestinal,
                    base_score: 0.75,
                    rationale: "gastrointestinal treatment covered under inpatient benefits",
                },
                CoverageRule {
                    category: MedicalCategory::General,
                    base_score: 0.7,
                    rationale: "general hospitalization covered under base benefits",
                },
            ],
        }
    }

    /// Score how strongly the claim's conditions fall under policy coverage.
    ///
    /// One strong category dominates: the score is the maximum of
    /// `base_score * relevance` over matched categories, not a sum. A
    /// high-value procedure token in the text floors the score at 0.9.
    pub fn assess(&self, profile: &ExtractedMedicalProfile, full_text: &str) -> CoverageAssessment {
        let mut score = 0.0f64;
        let mut reasons = Vec::new();

        for matched in &profile.categories {
            let Some(rule) = self
                .rules
                .iter()
                .find(|rule| rule.category == matched.category)
            else {
                continue;
            };

            let contribution = rule.base_score * matched.relevance;
            if contribution > score {
                score = contribution;
            }
            reasons.push(format!(
                "{} match (relevance {:.2}): {}",
                matched.category.label(),
                matched.relevance,
                rule.rationale
            ));
        }

        let lowered = full_text.to_lowercase();
        if let Some(token) = HIGH_VALUE_TOKENS
            .iter()
            .find(|token| lowered.contains(*token))
        {
            if score < HIGH_VALUE_SCORE {
                score = HIGH_VALUE_SCORE;
            }
            reasons.push(format!(
                "high-value procedure indicator '{token}' present; treated as covered treatment"
            ));
        }

        if reasons.is_empty() {
            return CoverageAssessment::default();
        }

        CoverageAssessment {
            score: clamp_unit(score),
            reasons,
        }
    }
}
