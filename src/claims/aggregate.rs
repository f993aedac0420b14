use super::coverage::CoverageAssessment;
use super::domain::{CheckKind, ClaimDecision, ClaimValidationResult, ValidationCheck};
use super::engine_config::EngineConfig;
use super::exclusion::ExclusionAssessment;
use super::hospital::HospitalMatch;
use super::pricing::PricingAssessment;

/// Inputs to the final aggregation: the four analysis verdicts plus the two
/// externally supplied facts.
pub(crate) struct AggregationInput<'a> {
    pub coverage: &'a CoverageAssessment,
    pub exclusion: &'a ExclusionAssessment,
    pub pricing: &'a PricingAssessment,
    pub hospital: &'a HospitalMatch,
    pub claim_amount: Option<f64>,
    pub sum_insured: f64,
    pub policy_active: bool,
}

/// Fuse the six named checks into a weighted score and a three-way decision.
///
/// `overall_score` is the weighted sum over the five weighted checks;
/// the decision branches on raw passed-check counts (6 approved, 4-5 review,
/// fewer rejected). An inactive policy forces rejection outright. Both values
/// are reported so the two semantics stay comparable.
pub(crate) fn aggregate(input: AggregationInput<'_>, config: &EngineConfig) -> ClaimValidationResult {
    let weights = &config.check_weights;

    let within_sum_insured = input
        .claim_amount
        .map(|amount| amount <= input.sum_insured)
        .unwrap_or(false);
    let condition_covered = input.coverage.score > config.coverage_approval_threshold;
    let condition_not_excluded = !input.exclusion.is_excluded;
    let pricing_matches = input.pricing.is_valid;
    let hospital_in_network = input.hospital.in_network;
    let policy_active = input.policy_active;

    let checks = [
        ValidationCheck {
            kind: CheckKind::WithinSumInsured,
            passed: within_sum_insured,
            weight: weights.sum_insured,
        },
        ValidationCheck {
            kind: CheckKind::ConditionCovered,
            passed: condition_covered,
            weight: weights.coverage,
        },
        ValidationCheck {
            kind: CheckKind::ConditionNotExcluded,
            passed: condition_not_excluded,
            weight: weights.exclusion,
        },
        ValidationCheck {
            kind: CheckKind::PricingMatches,
            passed: pricing_matches,
            weight: weights.pricing,
        },
        ValidationCheck {
            kind: CheckKind::HospitalInNetwork,
            passed: hospital_in_network,
            weight: weights.hospital,
        },
        // The gating fact: counted, never weighted.
        ValidationCheck {
            kind: CheckKind::PolicyActive,
            passed: policy_active,
            weight: 0.0,
        },
    ];

    let overall_score = checks
        .iter()
        .filter(|check| check.passed)
        .map(|check| check.weight)
        .sum::<f64>()
        .clamp(0.0, 1.0);

    let passed_checks = checks.iter().filter(|check| check.passed).count();

    let mut validation_errors = Vec::new();
    for check in &checks {
        if check.passed {
            continue;
        }
        validation_errors.push(describe_failure(check.kind, &input));
    }

    let decision = if !policy_active {
        ClaimDecision::Rejected
    } else {
        match passed_checks {
            6 => ClaimDecision::Approved,
            4 | 5 => ClaimDecision::NeedsReview,
            _ => ClaimDecision::Rejected,
        }
    };

    ClaimValidationResult {
        within_sum_insured,
        condition_covered,
        condition_not_excluded,
        pricing_matches,
        hospital_in_network,
        policy_active,
        validation_errors,
        overall_score,
        passed_checks,
        total_checks: checks.len(),
        decision,
    }
}

fn describe_failure(kind: CheckKind, input: &AggregationInput<'_>) -> String {
    match kind {
        CheckKind::WithinSumInsured => match input.claim_amount {
            Some(amount) => format!(
                "claim amount {amount:.0} exceeds sum insured {:.0}",
                input.sum_insured
            ),
            None => "no claim amount could be determined".to_string(),
        },
        CheckKind::ConditionCovered => format!(
            "medical condition not clearly covered (coverage score {:.2})",
            input.coverage.score
        ),
        CheckKind::ConditionNotExcluded => format!(
            "condition matches a policy exclusion: {}",
            input.exclusion.reason
        ),
        CheckKind::PricingMatches => {
            if input.pricing.issues.is_empty() {
                "pricing could not be validated".to_string()
            } else {
                format!("pricing issues: {}", input.pricing.issues.join("; "))
            }
        }
        CheckKind::HospitalInNetwork => match &input.hospital.best_match {
            Some(best) => format!(
                "hospital not in network (best candidate '{}', score {:.2})",
                best, input.hospital.final_score
            ),
            None => format!(
                "hospital not in network (score {:.2})",
                input.hospital.final_score
            ),
        },
        CheckKind::PolicyActive => "policy is not active".to_string(),
    }
}
