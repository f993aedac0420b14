use std::sync::{Arc, Mutex};

use crate::claims::domain::{ClaimId, PolicySnapshot, SegmentedClaim};
use crate::claims::engine::ClaimValidationEngine;
use crate::claims::engine_config::EngineConfig;
use crate::claims::service::{
    ClaimValidationService, DecisionNotice, DecisionNotifier, EmbeddingError, EmbeddingProvider,
    HashingEmbedder, MemoryPolicyStore, NotifyError,
};

pub(super) fn engine() -> ClaimValidationEngine {
    ClaimValidationEngine::new(EngineConfig::default())
}

pub(super) fn config() -> EngineConfig {
    EngineConfig::default()
}

/// Basis vector along `axis`, for exact cosine outcomes in tests.
pub(super) fn basis_vec(dimension: usize, axis: usize) -> Vec<f32> {
    let mut vector = vec![0.0; dimension];
    vector[axis] = 1.0;
    vector
}

pub(super) fn policy(sum_insured: f64, is_active: bool) -> PolicySnapshot {
    PolicySnapshot {
        policy_number: "POL-2026-0042".to_string(),
        sum_insured,
        is_active,
        covered_conditions_embedding: basis_vec(8, 0),
        excluded_conditions_embedding: basis_vec(8, 1),
        pricing_embedding: basis_vec(8, 2),
        network_hospitals_embedding: basis_vec(8, 3),
    }
}

pub(super) fn claim(suffix: &str, full_text: &str) -> SegmentedClaim {
    SegmentedClaim {
        claim_id: ClaimId(format!("clm-{suffix}")),
        pricing_and_date_text: full_text.to_string(),
        conditions_text: full_text.to_string(),
        hospital_info_text: String::new(),
        full_text: full_text.to_string(),
        hospital_name: None,
        claimed_amount: None,
    }
}

pub(super) fn emergency_claim() -> SegmentedClaim {
    SegmentedClaim {
        claim_id: ClaimId("clm-emergency".to_string()),
        pricing_and_date_text: "Final bill total ₹8,47,500/- settled on 2026-03-14".to_string(),
        conditions_text: "emergency craniotomy for traumatic brain injury".to_string(),
        hospital_info_text: "Apollo Hospitals, Chennai".to_string(),
        full_text:
            "Emergency craniotomy for traumatic brain injury at Apollo Hospitals, total ₹8,47,500"
                .to_string(),
        hospital_name: Some("Apollo Hospitals".to_string()),
        claimed_amount: None,
    }
}

pub(super) fn cosmetic_claim() -> SegmentedClaim {
    SegmentedClaim {
        claim_id: ClaimId("clm-cosmetic".to_string()),
        pricing_and_date_text: "₹50,000 paid in advance".to_string(),
        conditions_text: "cosmetic liposuction procedure".to_string(),
        hospital_info_text: "City Clinic".to_string(),
        full_text: "Cosmetic liposuction procedure, ₹50,000, City Clinic".to_string(),
        hospital_name: Some("City Clinic".to_string()),
        claimed_amount: None,
    }
}

/// Notifier that records every published decision for assertions.
#[derive(Default)]
pub(super) struct MemoryNotifier {
    notices: Mutex<Vec<DecisionNotice>>,
}

impl MemoryNotifier {
    pub(super) fn notices(&self) -> Vec<DecisionNotice> {
        self.notices.lock().expect("notifier mutex poisoned").clone()
    }
}

impl DecisionNotifier for MemoryNotifier {
    fn publish(&self, notice: DecisionNotice) -> Result<(), NotifyError> {
        self.notices
            .lock()
            .expect("notifier mutex poisoned")
            .push(notice);
        Ok(())
    }
}

/// Provider that always fails, to exercise the zero-vector fallback.
pub(super) struct FailingEmbedder;

impl EmbeddingProvider for FailingEmbedder {
    fn embed(&self, _text: &str) -> Result<Vec<f32>, EmbeddingError> {
        Err(EmbeddingError::Provider("model offline".to_string()))
    }

    fn dimension(&self) -> usize {
        8
    }
}

pub(super) type TestService<E> = ClaimValidationService<MemoryPolicyStore, E, MemoryNotifier>;

pub(super) fn build_service(
    sum_insured: f64,
    is_active: bool,
) -> (TestService<HashingEmbedder>, Arc<MemoryNotifier>) {
    let store = Arc::new(MemoryPolicyStore::new());
    store.insert(policy(sum_insured, is_active));
    let notifier = Arc::new(MemoryNotifier::default());
    let service = ClaimValidationService::new(
        store,
        Arc::new(HashingEmbedder::new(64)),
        notifier.clone(),
        engine(),
    );
    (service, notifier)
}
