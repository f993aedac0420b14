use serde::{Deserialize, Serialize};

use super::aggregate::{aggregate, AggregationInput};
use super::coverage::{CoverageAssessment, CoverageRules};
use super::domain::{
    ClaimEmbeddings, ClaimId, ClaimValidationResult, ExtractedMedicalProfile, PolicySnapshot,
    SegmentedClaim,
};
use super::engine_config::EngineConfig;
use super::exclusion::{ExclusionAssessment, ExclusionCatalog};
use super::hospital::{HospitalMatch, NetworkDirectory};
use super::pricing::{PricingAssessment, PricingValidator};
use super::terminology::MedicalTaxonomy;

/// Full evaluation output: the aggregated result plus every per-analysis
/// assessment, so a reviewer can audit exactly how the decision was reached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClaimEvaluation {
    pub claim_id: ClaimId,
    pub policy_number: String,
    pub profile: ExtractedMedicalProfile,
    pub coverage: CoverageAssessment,
    pub exclusion: ExclusionAssessment,
    pub pricing: PricingAssessment,
    pub hospital: HospitalMatch,
    pub result: ClaimValidationResult,
}

/// Stateless engine applying the static taxonomies and the configured
/// thresholds to one claim at a time.
pub struct ClaimValidationEngine {
    config: EngineConfig,
    taxonomy: MedicalTaxonomy,
    coverage_rules: CoverageRules,
    exclusions: ExclusionCatalog,
    pricing: PricingValidator,
    network: NetworkDirectory,
}

impl ClaimValidationEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            taxonomy: MedicalTaxonomy::standard(),
            coverage_rules: CoverageRules::standard(),
            exclusions: ExclusionCatalog::standard(),
            pricing: PricingValidator::new(),
            network: NetworkDirectory::standard(),
        }
    }

    /// Replace the built-in network directory, e.g. with an insurer CSV
    /// export hydrated through [`super::network_import`].
    pub fn with_network(mut self, network: NetworkDirectory) -> Self {
        self.network = network;
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Evaluate one claim against one policy.
    ///
    /// A pure function of its inputs: the four analyses read only the
    /// immutable claim segments, the supplied embeddings, and the static
    /// tables, and each is independently fail-open: degraded input lowers
    /// that analysis's own score without blocking the others.
    pub fn evaluate(
        &self,
        claim: &SegmentedClaim,
        embeddings: &ClaimEmbeddings,
        policy: &PolicySnapshot,
    ) -> ClaimEvaluation {
        let profile = self.taxonomy.extract(&claim.full_text);

        let coverage = self.coverage_rules.assess(&profile, &claim.full_text);

        let exclusion = self.exclusions.analyze(
            &claim.conditions_text,
            &embeddings.conditions,
            &policy.excluded_conditions_embedding,
            &self.config,
        );

        let pricing = self.pricing.validate(
            &claim.pricing_and_date_text,
            &profile,
            claim.claimed_amount,
            Some(policy.sum_insured),
            &self.config,
        );

        let hospital = self.network.match_hospital(
            claim.hospital_name.as_deref(),
            &claim.hospital_info_text,
            &embeddings.hospital,
            &policy.network_hospitals_embedding,
            &self.config,
        );

        let claim_amount = claim.claimed_amount.or(pricing.total_amount);
        let result = aggregate(
            AggregationInput {
                coverage: &coverage,
                exclusion: &exclusion,
                pricing: &pricing,
                hospital: &hospital,
                claim_amount,
                sum_insured: policy.sum_insured,
                policy_active: policy.is_active,
            },
            &self.config,
        );

        ClaimEvaluation {
            claim_id: claim.claim_id.clone(),
            policy_number: policy.policy_number.clone(),
            profile,
            coverage,
            exclusion,
            pricing,
            hospital,
            result,
        }
    }
}

impl Default for ClaimValidationEngine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}
