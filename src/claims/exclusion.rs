use serde::{Deserialize, Serialize};

use super::engine_config::EngineConfig;
use super::similarity::{clamp_unit, cosine_similarity};

/// Closed set of policy exclusion buckets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExclusionKind {
    Cosmetic,
    Dental,
    Vision,
    Experimental,
    PreExisting,
    Elective,
}

impl ExclusionKind {
    pub const fn label(self) -> &'static str {
        match self {
            ExclusionKind::Cosmetic => "cosmetic",
            ExclusionKind::Dental => "dental",
            ExclusionKind::Vision => "vision",
            ExclusionKind::Experimental => "experimental",
            ExclusionKind::PreExisting => "pre-existing",
            ExclusionKind::Elective => "elective",
        }
    }
}

#[derive(Debug)]
struct ExclusionCategory {
    kind: ExclusionKind,
    keywords: &'static [&'static str],
    weight: f64,
    rationale: &'static str,
}

/// Tokens that mark genuinely urgent treatment. Matched as whole words; any
/// hit overrides every other exclusion signal.
const EMERGENCY_TOKENS: &[&str] = &[
    "emergency",
    "trauma",
    "accident",
    "acute",
    "critical",
    "life-threatening",
];

/// Outcome of the exclusion analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExclusionAssessment {
    pub is_excluded: bool,
    pub confidence: f64,
    pub reason: String,
    pub details: Vec<String>,
}

/// Static catalog of excluded-condition categories.
#[derive(Debug)]
pub struct ExclusionCatalog {
    categories: Vec<ExclusionCategory>,
}

impl ExclusionCatalog {
    pub fn standard() -> Self {
        Self {
            categories: vec![
                ExclusionCategory {
                    kind: ExclusionKind::Cosmetic,
                    keywords: &[
                        "cosmetic",
                        "aesthetic",
                        "liposuction",
                        "rhinoplasty",
                        "botox",
                    ],
                    weight: 0.9,
                    rationale: "cosmetic and aesthetic procedures are excluded from coverage",
                },
                ExclusionCategory {
                    kind: ExclusionKind::Experimental,
                    keywords: &["experimental", "clinical trial", "investigational", "unproven"],
                    weight: 0.85,
                    rationale: "experimental and investigational treatments are excluded",
                },
                ExclusionCategory {
                    kind: ExclusionKind::PreExisting,
                    keywords: &["pre-existing", "pre existing", "congenital", "since childhood"],
                    weight: 0.8,
                    rationale: "pre-existing conditions are excluded during the waiting period",
                },
                ExclusionCategory {
                    kind: ExclusionKind::Dental,
                    keywords: &["dental", "tooth", "teeth", "orthodontic", "root canal"],
                    weight: 0.7,
                    rationale: "dental treatment is excluded unless caused by accident",
                },
                ExclusionCategory {
                    kind: ExclusionKind::Vision,
                    keywords: &["lasik", "spectacles", "eyeglasses", "contact lens", "refractive"],
                    weight: 0.65,
                    rationale: "routine vision correction is excluded from coverage",
                },
                ExclusionCategory {
                    kind: ExclusionKind::Elective,
                    keywords: &["elective", "optional procedure", "non-essential", "voluntary"],
                    weight: 0.6,
                    rationale: "elective procedures without medical necessity are excluded",
                },
            ],
        }
    }

    /// Combine keyword exclusion matching with embedding similarity against
    /// the policy's excluded-conditions fingerprint.
    ///
    /// Emergency treatment always wins: any whole-word emergency token forces
    /// `is_excluded = false` irrespective of keyword density or vector
    /// similarity.
    pub fn analyze(
        &self,
        condition_text: &str,
        claim_embedding: &[f32],
        excluded_embedding: &[f32],
        config: &EngineConfig,
    ) -> ExclusionAssessment {
        let lowered = condition_text.to_lowercase();

        if let Some(token) = EMERGENCY_TOKENS
            .iter()
            .find(|token| contains_word(&lowered, token))
        {
            return ExclusionAssessment {
                is_excluded: false,
                confidence: 0.9,
                reason: format!(
                    "emergency treatment indicator '{token}' present; exclusions do not apply"
                ),
                details: vec![format!("emergency override via '{token}'")],
            };
        }

        let mut highest_score = 0.0f64;
        let mut winning: Option<&ExclusionCategory> = None;
        let mut details = Vec::new();

        let saturation = config.exclusion_keyword_saturation.max(1);
        for category in &self.categories {
            let matched: Vec<&str> = category
                .keywords
                .iter()
                .copied()
                .filter(|keyword| lowered.contains(keyword))
                .collect();
            if matched.is_empty() {
                continue;
            }

            // Matched count saturates so a pair of distinct exclusion
            // keywords carries the full category weight; the raw lexicon
            // ratio is kept in the details for audit.
            let saturated = (matched.len() as f64 / saturation as f64).min(1.0);
            let score = saturated * category.weight;
            details.push(format!(
                "{}: matched {:?} ({}/{} keywords, score {:.2})",
                category.kind.label(),
                matched,
                matched.len(),
                category.keywords.len(),
                score
            ));

            if score > highest_score {
                highest_score = score;
                winning = Some(category);
            }
        }

        let vector_score = cosine_similarity(claim_embedding, excluded_embedding).max(0.0);
        let scaled_vector = vector_score * config.exclusion_vector_scale;
        if vector_score > 0.0 {
            details.push(format!(
                "vector similarity to excluded conditions {:.2} (scaled {:.2})",
                vector_score, scaled_vector
            ));
        }

        let combined = highest_score.max(scaled_vector);

        if combined > config.exclusion_threshold {
            let reason = match winning {
                Some(category) if highest_score >= scaled_vector => category.rationale.to_string(),
                _ => "claim conditions closely match the policy's excluded conditions".to_string(),
            };
            return ExclusionAssessment {
                is_excluded: true,
                confidence: clamp_unit(combined),
                reason,
                details,
            };
        }

        let reason = if combined <= config.exclusion_borderline_threshold {
            "no exclusion pattern detected".to_string()
        } else {
            format!("borderline exclusion signal ({combined:.2}) within acceptable range")
        };

        ExclusionAssessment {
            is_excluded: false,
            confidence: clamp_unit(1.0 - combined),
            reason,
            details,
        }
    }
}

/// Whole-word containment: the token must not be flanked by alphanumerics.
fn contains_word(text: &str, token: &str) -> bool {
    let mut start = 0;
    while let Some(position) = text[start..].find(token) {
        let begin = start + position;
        let end = begin + token.len();
        let before_ok = begin == 0
            || !text[..begin]
                .chars()
                .next_back()
                .is_some_and(|ch| ch.is_alphanumeric());
        let after_ok = end == text.len()
            || !text[end..].chars().next().is_some_and(|ch| ch.is_alphanumeric());
        if before_ok && after_ok {
            return true;
        }
        start = end;
    }
    false
}
