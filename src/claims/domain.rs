use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Identifier wrapper for submitted claims.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ClaimId(pub String);

/// Pre-segmented claim text handed in by the ingestion pipeline.
///
/// Segmentation itself happens upstream; the engine only consumes the four
/// text slices plus the optional structured facts extracted alongside them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentedClaim {
    pub claim_id: ClaimId,
    #[serde(default)]
    pub pricing_and_date_text: String,
    #[serde(default)]
    pub conditions_text: String,
    #[serde(default)]
    pub hospital_info_text: String,
    #[serde(default)]
    pub full_text: String,
    #[serde(default)]
    pub hospital_name: Option<String>,
    #[serde(default)]
    pub claimed_amount: Option<f64>,
}

/// Policy facts and pre-computed semantic fingerprints served by the policy
/// store collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolicySnapshot {
    pub policy_number: String,
    pub sum_insured: f64,
    pub is_active: bool,
    #[serde(default)]
    pub covered_conditions_embedding: Vec<f32>,
    #[serde(default)]
    pub excluded_conditions_embedding: Vec<f32>,
    #[serde(default)]
    pub pricing_embedding: Vec<f32>,
    #[serde(default)]
    pub network_hospitals_embedding: Vec<f32>,
}

/// Claim-side embeddings produced by the embedding provider. A provider
/// failure yields the documented zero-vector fallback, never an error.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClaimEmbeddings {
    pub conditions: Vec<f32>,
    pub hospital: Vec<f32>,
}

/// Closed taxonomy buckets used to map extracted medical terms to coverage
/// rules and procedure price tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum MedicalCategory {
    Neurological,
    Cardiac,
    Orthopedic,
    Oncological,
    Gastrointestinal,
    General,
}

impl MedicalCategory {
    pub const fn label(self) -> &'static str {
        match self {
            MedicalCategory::Neurological => "neurological",
            MedicalCategory::Cardiac => "cardiac",
            MedicalCategory::Orthopedic => "orthopedic",
            MedicalCategory::Oncological => "oncological",
            MedicalCategory::Gastrointestinal => "gastrointestinal",
            MedicalCategory::General => "general",
        }
    }
}

/// Per-category match detail produced by the terminology extractor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryMatch {
    pub category: MedicalCategory,
    pub matched_keywords: Vec<String>,
    pub matched_conditions: Vec<String>,
    pub matched_procedures: Vec<String>,
    pub match_count: usize,
    pub relevance: f64,
}

/// Extraction output: matched terms and categories ordered by relevance.
/// Ephemeral, produced per analysis call, never persisted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtractedMedicalProfile {
    pub terms: BTreeSet<String>,
    pub categories: Vec<CategoryMatch>,
    pub confidence: f64,
}

impl ExtractedMedicalProfile {
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}

/// The six named checks, in their deterministic reporting order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CheckKind {
    WithinSumInsured,
    ConditionCovered,
    ConditionNotExcluded,
    PricingMatches,
    HospitalInNetwork,
    PolicyActive,
}

impl CheckKind {
    pub const fn label(self) -> &'static str {
        match self {
            CheckKind::WithinSumInsured => "within_sum_insured",
            CheckKind::ConditionCovered => "condition_covered",
            CheckKind::ConditionNotExcluded => "condition_not_excluded",
            CheckKind::PricingMatches => "pricing_matches",
            CheckKind::HospitalInNetwork => "hospital_in_network",
            CheckKind::PolicyActive => "policy_active",
        }
    }
}

/// One named check with its pass/fail state and aggregation weight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationCheck {
    pub kind: CheckKind,
    pub passed: bool,
    pub weight: f64,
}

/// Three-way adjudication outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ClaimDecision {
    Approved,
    NeedsReview,
    Rejected,
}

impl ClaimDecision {
    pub const fn label(self) -> &'static str {
        match self {
            ClaimDecision::Approved => "APPROVED",
            ClaimDecision::NeedsReview => "NEEDS_REVIEW",
            ClaimDecision::Rejected => "REJECTED",
        }
    }
}

/// Aggregated validation outcome. A pure function of its inputs: no hidden
/// state, no timestamps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClaimValidationResult {
    pub within_sum_insured: bool,
    pub condition_covered: bool,
    pub condition_not_excluded: bool,
    pub pricing_matches: bool,
    pub hospital_in_network: bool,
    pub policy_active: bool,
    pub validation_errors: Vec<String>,
    pub overall_score: f64,
    pub passed_checks: usize,
    pub total_checks: usize,
    pub decision: ClaimDecision,
}

impl ClaimValidationResult {
    pub fn checks(&self) -> [(CheckKind, bool); 6] {
        [
            (CheckKind::WithinSumInsured, self.within_sum_insured),
            (CheckKind::ConditionCovered, self.condition_covered),
            (CheckKind::ConditionNotExcluded, self.condition_not_excluded),
            (CheckKind::PricingMatches, self.pricing_matches),
            (CheckKind::HospitalInNetwork, self.hospital_in_network),
            (CheckKind::PolicyActive, self.policy_active),
        ]
    }
}
