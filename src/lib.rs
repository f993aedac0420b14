//! Claim validation and scoring engine.
//!
//! Fuses five independent signals (medical-condition coverage, exclusion
//! risk, pricing plausibility, hospital-network membership, and policy-active
//! status) into a weighted, auditable approve/review/reject decision for a
//! health-insurance claim.

pub mod claims;
pub mod config;
pub mod error;
pub mod telemetry;
