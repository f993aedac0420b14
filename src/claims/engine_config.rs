use serde::{Deserialize, Serialize};

/// Aggregation weights for the five weighted checks. `policy_active` is a
/// separate gating fact and carries no weight.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CheckWeights {
    pub sum_insured: f64,
    pub coverage: f64,
    pub exclusion: f64,
    pub pricing: f64,
    pub hospital: f64,
}

impl CheckWeights {
    pub fn total(&self) -> f64 {
        self.sum_insured + self.coverage + self.exclusion + self.pricing + self.hospital
    }
}

impl Default for CheckWeights {
    fn default() -> Self {
        Self {
            sum_insured: 0.25,
            coverage: 0.25,
            exclusion: 0.15,
            pricing: 0.20,
            hospital: 0.15,
        }
    }
}

/// Every empirically-tuned constant of the engine, named and overridable.
/// Defaults reproduce the production behavior.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Coverage score above which the condition counts as covered.
    pub coverage_approval_threshold: f64,
    /// Combined exclusion score above which a claim is excluded.
    pub exclusion_threshold: f64,
    /// Combined exclusion score below which no exclusion pattern is reported.
    pub exclusion_borderline_threshold: f64,
    /// Scale applied to the exclusion vector-similarity signal.
    pub exclusion_vector_scale: f64,
    /// Distinct exclusion-keyword hits that saturate a category's weight.
    pub exclusion_keyword_saturation: usize,
    /// Final hospital score above which the hospital is in-network.
    pub network_threshold: f64,
    /// Hospital blend weight for the fuzzy string score.
    pub hospital_fuzzy_weight: f64,
    /// Hospital blend weight for the embedding similarity score.
    pub hospital_vector_weight: f64,
    /// Hospital blend weight for the chain-keyword score.
    pub hospital_chain_weight: f64,
    /// Bonus when a known major city appears in the hospital text.
    pub hospital_location_bonus: f64,
    /// Claim totals below this are too low to be real treatment.
    pub minimum_claim_amount: f64,
    /// Claim totals above this require manual review.
    pub manual_review_amount: f64,
    pub check_weights: CheckWeights,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            coverage_approval_threshold: 0.6,
            exclusion_threshold: 0.7,
            exclusion_borderline_threshold: 0.4,
            exclusion_vector_scale: 0.8,
            exclusion_keyword_saturation: 2,
            network_threshold: 0.5,
            hospital_fuzzy_weight: 0.4,
            hospital_vector_weight: 0.3,
            hospital_chain_weight: 0.25,
            hospital_location_bonus: 0.1,
            minimum_claim_amount: 1_000.0,
            manual_review_amount: 2_000_000.0,
            check_weights: CheckWeights::default(),
        }
    }
}
