//! Claim validation and scoring engine.
//!
//! Five independent analyses (coverage, exclusion, pricing, hospital network,
//! terminology extraction feeding the first three) are fused by a weighted
//! aggregator into an APPROVED / NEEDS_REVIEW / REJECTED decision. The engine
//! itself is a pure function of the segmented claim text, the supplied
//! embeddings, and the policy facts; storage, embedding generation, and
//! notification live behind the service-layer traits.

mod aggregate;
pub mod coverage;
pub mod domain;
pub mod engine;
pub mod engine_config;
pub mod exclusion;
pub mod hospital;
pub mod network_import;
pub mod pricing;
pub mod router;
pub mod service;
pub mod similarity;
pub mod terminology;

#[cfg(test)]
mod tests;

pub use coverage::{CoverageAssessment, CoverageRules};
pub use domain::{
    CategoryMatch, CheckKind, ClaimDecision, ClaimEmbeddings, ClaimId, ClaimValidationResult,
    ExtractedMedicalProfile, MedicalCategory, PolicySnapshot, SegmentedClaim, ValidationCheck,
};
pub use engine::{ClaimEvaluation, ClaimValidationEngine};
pub use engine_config::{CheckWeights, EngineConfig};
pub use exclusion::{ExclusionAssessment, ExclusionCatalog, ExclusionKind};
pub use hospital::{normalize_hospital_name, HospitalMatch, NetworkDirectory};
pub use network_import::{directory_from_path, directory_from_reader, NetworkImportError};
pub use pricing::{
    AmountExtractor, PriceRange, PricingAssessment, PricingValidator, ProcedureAmount,
    ProcedurePriceBook,
};
pub use router::claims_router;
pub use service::{
    ClaimServiceError, ClaimValidationService, DecisionNotice, DecisionNotifier, EmbeddingError,
    EmbeddingProvider, HashingEmbedder, LogNotifier, MemoryPolicyStore, NotifyError, PolicyStore,
    PolicyStoreError,
};
pub use similarity::cosine_similarity;
pub use terminology::{CategoryLexicon, MedicalTaxonomy};
