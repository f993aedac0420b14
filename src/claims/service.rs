use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::domain::{ClaimDecision, ClaimEmbeddings, ClaimId, PolicySnapshot, SegmentedClaim};
use super::engine::{ClaimEvaluation, ClaimValidationEngine};

/// Policy lookup abstraction so the service can be exercised in isolation.
pub trait PolicyStore: Send + Sync {
    fn fetch(&self, policy_number: &str) -> Result<Option<PolicySnapshot>, PolicyStoreError>;
}

#[derive(Debug, thiserror::Error)]
pub enum PolicyStoreError {
    #[error("policy store unavailable: {0}")]
    Unavailable(String),
}

/// Embedding generation collaborator. Dimension must match the stored policy
/// fingerprints for cosine comparison to be meaningful.
pub trait EmbeddingProvider: Send + Sync {
    fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError>;
    fn dimension(&self) -> usize;
}

#[derive(Debug, thiserror::Error)]
pub enum EmbeddingError {
    #[error("embedding provider failed: {0}")]
    Provider(String),
}

/// Outbound hook receiving each finished decision (mail, queue, audit log).
pub trait DecisionNotifier: Send + Sync {
    fn publish(&self, notice: DecisionNotice) -> Result<(), NotifyError>;
}

#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("decision notification failed: {0}")]
    Delivery(String),
}

/// Notification payload handed to the external decision collaborator. The
/// timestamp lives here, not in the pure validation result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionNotice {
    pub claim_id: ClaimId,
    pub policy_number: String,
    pub decision: ClaimDecision,
    pub overall_score: f64,
    pub passed_checks: usize,
    pub validation_errors: Vec<String>,
    pub evaluated_at: DateTime<Utc>,
}

/// Error raised by the claim validation service.
#[derive(Debug, thiserror::Error)]
pub enum ClaimServiceError {
    #[error("policy {0} not found")]
    PolicyNotFound(String),
    #[error(transparent)]
    Store(#[from] PolicyStoreError),
    #[error(transparent)]
    Notify(#[from] NotifyError),
}

/// Service composing the policy store, embedding provider, notifier, and the
/// pure validation engine.
pub struct ClaimValidationService<P, E, N> {
    store: Arc<P>,
    embedder: Arc<E>,
    notifier: Arc<N>,
    engine: Arc<ClaimValidationEngine>,
}

impl<P, E, N> ClaimValidationService<P, E, N>
where
    P: PolicyStore + 'static,
    E: EmbeddingProvider + 'static,
    N: DecisionNotifier + 'static,
{
    pub fn new(
        store: Arc<P>,
        embedder: Arc<E>,
        notifier: Arc<N>,
        engine: ClaimValidationEngine,
    ) -> Self {
        Self {
            store,
            embedder,
            notifier,
            engine: Arc::new(engine),
        }
    }

    /// Validate a claim against the named policy, publish the decision, and
    /// return the full evaluation.
    pub fn validate(
        &self,
        claim: &SegmentedClaim,
        policy_number: &str,
    ) -> Result<ClaimEvaluation, ClaimServiceError> {
        let policy = self
            .store
            .fetch(policy_number)?
            .ok_or_else(|| ClaimServiceError::PolicyNotFound(policy_number.to_string()))?;

        let embeddings = ClaimEmbeddings {
            conditions: self.embed_or_fallback(&claim.conditions_text, &policy),
            hospital: self.embed_or_fallback(&combined_hospital_text(claim), &policy),
        };

        let evaluation = self.engine.evaluate(claim, &embeddings, &policy);

        info!(
            claim_id = %evaluation.claim_id.0,
            policy_number = %policy.policy_number,
            decision = evaluation.result.decision.label(),
            score = evaluation.result.overall_score,
            passed = evaluation.result.passed_checks,
            "claim evaluated"
        );

        self.notifier.publish(DecisionNotice {
            claim_id: evaluation.claim_id.clone(),
            policy_number: evaluation.policy_number.clone(),
            decision: evaluation.result.decision,
            overall_score: evaluation.result.overall_score,
            passed_checks: evaluation.result.passed_checks,
            validation_errors: evaluation.result.validation_errors.clone(),
            evaluated_at: Utc::now(),
        })?;

        Ok(evaluation)
    }

    /// Provider failures degrade to the documented zero-vector fallback so
    /// cosine similarity returns 0 and the pipeline never aborts.
    fn embed_or_fallback(&self, text: &str, policy: &PolicySnapshot) -> Vec<f32> {
        match self.embedder.embed(text) {
            Ok(vector) => vector,
            Err(err) => {
                warn!(error = %err, "embedding provider failed; using zero-vector fallback");
                let dimension = if policy.excluded_conditions_embedding.is_empty() {
                    self.embedder.dimension()
                } else {
                    policy.excluded_conditions_embedding.len()
                };
                vec![0.0; dimension]
            }
        }
    }
}

fn combined_hospital_text(claim: &SegmentedClaim) -> String {
    match claim.hospital_name.as_deref() {
        Some(name) if !name.trim().is_empty() => {
            format!("{} {}", name.trim(), claim.hospital_info_text)
        }
        _ => claim.hospital_info_text.clone(),
    }
}

/// In-memory policy store for demos and tests.
#[derive(Default)]
pub struct MemoryPolicyStore {
    policies: Mutex<HashMap<String, PolicySnapshot>>,
}

impl MemoryPolicyStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, policy: PolicySnapshot) {
        self.policies
            .lock()
            .expect("policy store mutex poisoned")
            .insert(policy.policy_number.clone(), policy);
    }
}

impl PolicyStore for MemoryPolicyStore {
    fn fetch(&self, policy_number: &str) -> Result<Option<PolicySnapshot>, PolicyStoreError> {
        Ok(self
            .policies
            .lock()
            .expect("policy store mutex poisoned")
            .get(policy_number)
            .cloned())
    }
}

/// Deterministic token-hashing embedder for demos and tests: each token is
/// hashed into a bucket and the resulting vector is L2-normalized, so texts
/// sharing vocabulary land close under cosine similarity. Production deploys
/// swap in a real model behind the same trait.
pub struct HashingEmbedder {
    dimension: usize,
}

impl HashingEmbedder {
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension: dimension.max(1),
        }
    }
}

impl Default for HashingEmbedder {
    fn default() -> Self {
        Self::new(256)
    }
}

impl EmbeddingProvider for HashingEmbedder {
    fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        let mut vector = vec![0.0f32; self.dimension];
        for token in text
            .to_lowercase()
            .split(|ch: char| !ch.is_alphanumeric())
            .filter(|token| token.len() > 2)
        {
            let mut hasher = DefaultHasher::new();
            token.hash(&mut hasher);
            let bucket = (hasher.finish() % self.dimension as u64) as usize;
            vector[bucket] += 1.0;
        }

        let norm = vector.iter().map(|v| v * v).sum::<f32>().sqrt();
        if norm > 0.0 {
            for value in &mut vector {
                *value /= norm;
            }
        }
        Ok(vector)
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}

/// Notifier that records decisions in the service log.
#[derive(Default)]
pub struct LogNotifier;

impl DecisionNotifier for LogNotifier {
    fn publish(&self, notice: DecisionNotice) -> Result<(), NotifyError> {
        info!(
            claim_id = %notice.claim_id.0,
            policy_number = %notice.policy_number,
            decision = notice.decision.label(),
            score = notice.overall_score,
            errors = notice.validation_errors.len(),
            "claim decision published"
        );
        Ok(())
    }
}
