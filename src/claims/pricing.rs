use std::collections::BTreeMap;

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::domain::{ExtractedMedicalProfile, MedicalCategory};
use super::engine_config::EngineConfig;
use super::similarity::clamp_unit;

/// Reference price window for a procedure, in rupees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceRange {
    pub min: f64,
    pub max: f64,
    pub avg: f64,
}

/// A `{procedure label, amount}` pair pulled out of the pricing text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcedureAmount {
    pub label: String,
    pub amount: f64,
}

/// Pricing verdict with the full audit trail of reasons and issues.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingAssessment {
    pub is_valid: bool,
    pub confidence: f64,
    /// The claim total actually validated: the externally derived amount when
    /// supplied, otherwise the best extracted amount.
    pub total_amount: Option<f64>,
    pub extracted_amounts: Vec<f64>,
    pub procedure_amounts: Vec<ProcedureAmount>,
    pub validated_procedures: usize,
    pub procedures_in_range: usize,
    pub issues: Vec<String>,
    pub reasons: Vec<String>,
}

/// Currency-tolerant amount scanner for Indian-format billing text.
#[derive(Debug)]
pub struct AmountExtractor {
    prefixed: Regex,
    suffixed: Regex,
    labeled: Regex,
}

const TOTAL_KEYWORDS: &[&str] = &[
    "total",
    "grand total",
    "net amount",
    "amount payable",
    "bill amount",
    "final bill",
];

impl AmountExtractor {
    pub fn new() -> Self {
        Self {
            // ₹8,47,500 | Rs. 50000 | INR 1,200.50
            prefixed: Regex::new(r"(?i)(?:₹|rs\.?|inr)\s*([0-9][0-9,]*(?:\.[0-9]{1,2})?)")
                .expect("prefixed amount pattern"),
            // 8,47,500/- | 50000 rupees | 1200 rs
            suffixed: Regex::new(
                r"(?i)([0-9][0-9,]*(?:\.[0-9]{1,2})?)\s*(?:/-|rupees\b|rs\b|inr\b)",
            )
            .expect("suffixed amount pattern"),
            // angioplasty: ₹3,50,000 | room charges - 12000
            labeled: Regex::new(
                r"(?i)([a-z][a-z ]{2,40}?)\s*[:\-]\s*(?:₹|rs\.?|inr)?\s*([0-9][0-9,]*(?:\.[0-9]{1,2})?)",
            )
            .expect("labeled amount pattern"),
        }
    }

    /// All plausible monetary amounts in order of first appearance. A text
    /// with no recognizable amounts yields an empty list, never an error.
    pub fn amounts(&self, text: &str) -> Vec<f64> {
        let mut found = Vec::new();
        for captures in self.prefixed.captures_iter(text) {
            if let Some(value) = parse_amount(&captures[1]) {
                found.push(value);
            }
        }
        for captures in self.suffixed.captures_iter(text) {
            if let Some(value) = parse_amount(&captures[1]) {
                found.push(value);
            }
        }

        let mut unique = Vec::new();
        for value in found {
            if !unique.iter().any(|existing: &f64| *existing == value) {
                unique.push(value);
            }
        }
        unique
    }

    /// `{label, amount}` pairs where a short preceding phrase looks like a
    /// procedure or line-item name.
    pub fn procedure_amounts(&self, text: &str) -> Vec<ProcedureAmount> {
        self.labeled
            .captures_iter(text)
            .filter_map(|captures| {
                let label = captures[1].trim().to_lowercase();
                let amount = parse_amount(&captures[2])?;
                if label.is_empty() {
                    return None;
                }
                Some(ProcedureAmount { label, amount })
            })
            .collect()
    }

    /// Pick the claim total from extracted candidates. Each candidate scores
    /// the count of total-indicating keywords in the text plus
    /// `log10(amount)`; with no keywords anywhere the maximum amount wins.
    pub fn best_amount(&self, text: &str, amounts: &[f64]) -> Option<f64> {
        if amounts.is_empty() {
            return None;
        }

        let lowered = text.to_lowercase();
        let keyword_hits = TOTAL_KEYWORDS
            .iter()
            .filter(|keyword| lowered.contains(*keyword))
            .count();

        if keyword_hits == 0 {
            return amounts.iter().copied().reduce(f64::max);
        }

        amounts
            .iter()
            .copied()
            .map(|amount| (amount, keyword_hits as f64 + amount.max(1.0).log10()))
            .max_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal))
            .map(|(amount, _)| amount)
    }
}

impl Default for AmountExtractor {
    fn default() -> Self {
        Self::new()
    }
}

fn unit(flag: bool) -> f64 {
    if flag {
        1.0
    } else {
        0.0
    }
}

fn parse_amount(raw: &str) -> Option<f64> {
    let cleaned: String = raw.chars().filter(|ch| *ch != ',').collect();
    let value = cleaned.parse::<f64>().ok()?;
    if value.is_finite() && value > 0.0 {
        Some(value)
    } else {
        None
    }
}

/// Reference cost tables keyed by taxonomy category, with a general fallback.
#[derive(Debug)]
pub struct ProcedurePriceBook {
    by_category: BTreeMap<MedicalCategory, BTreeMap<&'static str, PriceRange>>,
    general: BTreeMap<&'static str, PriceRange>,
}

impl ProcedurePriceBook {
    pub fn standard() -> Self {
        let mut by_category = BTreeMap::new();

        by_category.insert(
            MedicalCategory::Neurological,
            price_table(&[
                ("craniotomy", 300_000.0, 1_500_000.0, 800_000.0),
                ("spinal fusion", 250_000.0, 900_000.0, 500_000.0),
                ("shunt placement", 150_000.0, 500_000.0, 300_000.0),
            ]),
        );
        by_category.insert(
            MedicalCategory::Cardiac,
            price_table(&[
                ("angioplasty", 150_000.0, 600_000.0, 350_000.0),
                ("bypass surgery", 250_000.0, 800_000.0, 450_000.0),
                ("pacemaker implantation", 200_000.0, 700_000.0, 400_000.0),
                ("valve replacement", 300_000.0, 1_000_000.0, 550_000.0),
                ("stent placement", 120_000.0, 450_000.0, 250_000.0),
            ]),
        );
        by_category.insert(
            MedicalCategory::Orthopedic,
            price_table(&[
                ("knee replacement", 150_000.0, 500_000.0, 300_000.0),
                ("hip replacement", 200_000.0, 600_000.0, 350_000.0),
                ("arthroscopy", 80_000.0, 250_000.0, 150_000.0),
                ("fracture fixation", 50_000.0, 200_000.0, 100_000.0),
            ]),
        );
        by_category.insert(
            MedicalCategory::Oncological,
            price_table(&[
                ("chemotherapy", 50_000.0, 400_000.0, 150_000.0),
                ("radiation therapy", 100_000.0, 500_000.0, 250_000.0),
                ("tumor resection", 200_000.0, 800_000.0, 400_000.0),
                ("mastectomy", 150_000.0, 500_000.0, 280_000.0),
            ]),
        );
        by_category.insert(
            MedicalCategory::Gastrointestinal,
            price_table(&[
                ("appendectomy", 40_000.0, 150_000.0, 80_000.0),
                ("cholecystectomy", 60_000.0, 200_000.0, 110_000.0),
                ("hernia repair", 50_000.0, 180_000.0, 90_000.0),
                ("endoscopy", 10_000.0, 50_000.0, 25_000.0),
            ]),
        );

        let general = price_table(&[
            ("general surgery", 50_000.0, 300_000.0, 120_000.0),
            ("dialysis", 15_000.0, 50_000.0, 25_000.0),
            ("blood transfusion", 8_000.0, 40_000.0, 18_000.0),
        ]);

        Self {
            by_category,
            general,
        }
    }

    pub fn lookup(&self, category: MedicalCategory, procedure: &str) -> Option<PriceRange> {
        if let Some(table) = self.by_category.get(&category) {
            if let Some(range) = table.get(procedure) {
                return Some(*range);
            }
        }
        self.general.get(procedure).copied()
    }
}

fn price_table(entries: &[(&'static str, f64, f64, f64)]) -> BTreeMap<&'static str, PriceRange> {
    entries
        .iter()
        .map(|(key, min, max, avg)| {
            (
                *key,
                PriceRange {
                    min: *min,
                    max: *max,
                    avg: *avg,
                },
            )
        })
        .collect()
}

/// Pricing validator combining amount extraction, total plausibility, the
/// sum-insured cap, and per-procedure reference ranges.
#[derive(Debug)]
pub struct PricingValidator {
    extractor: AmountExtractor,
    price_book: ProcedurePriceBook,
}

impl PricingValidator {
    pub fn new() -> Self {
        Self {
            extractor: AmountExtractor::new(),
            price_book: ProcedurePriceBook::standard(),
        }
    }

    pub fn validate(
        &self,
        pricing_text: &str,
        profile: &ExtractedMedicalProfile,
        claimed_amount: Option<f64>,
        sum_insured: Option<f64>,
        config: &EngineConfig,
    ) -> PricingAssessment {
        let mut issues = Vec::new();
        let mut reasons = Vec::new();

        let extracted_amounts = self.extractor.amounts(pricing_text);
        let procedure_amounts = self.extractor.procedure_amounts(pricing_text);
        let has_documented_pricing = !extracted_amounts.is_empty();
        if !has_documented_pricing {
            issues.push("no monetary amounts found in pricing text".to_string());
        }

        let total_amount =
            claimed_amount.or_else(|| self.extractor.best_amount(pricing_text, &extracted_amounts));

        let has_reasonable_total = match total_amount {
            None => {
                issues.push("no claim amount available for validation".to_string());
                false
            }
            Some(total) if total < config.minimum_claim_amount => {
                issues.push(format!(
                    "claim amount {total:.0} is below the minimum plausible treatment cost {:.0}",
                    config.minimum_claim_amount
                ));
                false
            }
            Some(total) if total > config.manual_review_amount => {
                issues.push(format!(
                    "claim amount {total:.0} exceeds {:.0} and requires manual review",
                    config.manual_review_amount
                ));
                false
            }
            Some(total) => {
                reasons.push(format!("claim amount {total:.0} within plausible range"));
                true
            }
        };

        if let (Some(total), Some(limit)) = (total_amount, sum_insured) {
            if total > limit {
                issues.push(format!(
                    "claim amount {total:.0} exceeds sum insured {limit:.0}"
                ));
            } else {
                reasons.push(format!(
                    "claim amount {total:.0} within sum insured {limit:.0}"
                ));
            }
        }

        let mut validated_procedures = 0usize;
        let mut procedures_in_range = 0usize;
        for matched in &profile.categories {
            for procedure in &matched.matched_procedures {
                let Some(range) = self.price_book.lookup(matched.category, procedure) else {
                    continue;
                };
                let Some(pair) = procedure_amounts.iter().find(|pair| {
                    pair.label.contains(procedure.as_str()) || procedure.contains(&pair.label)
                }) else {
                    continue;
                };

                validated_procedures += 1;
                if pair.amount > range.max {
                    issues.push(format!(
                        "{procedure} billed at {:.0}, above the reference maximum {:.0}",
                        pair.amount, range.max
                    ));
                } else if pair.amount < range.min {
                    issues.push(format!(
                        "{procedure} billed at {:.0}, below the reference minimum {:.0}",
                        pair.amount, range.min
                    ));
                } else {
                    procedures_in_range += 1;
                    reasons.push(format!(
                        "{procedure} billed at {:.0}, within reference range {:.0}-{:.0}",
                        pair.amount, range.min, range.max
                    ));
                }
            }
        }

        let has_valid_procedures = validated_procedures == 0
            || (procedures_in_range as f64 / validated_procedures as f64) > 0.6;

        let confidence = clamp_unit(
            0.4 * unit(has_reasonable_total)
                + 0.3 * unit(has_valid_procedures)
                + 0.2 * unit(has_documented_pricing)
                + 0.1 * unit(reasons.len() > issues.len()),
        );
        let is_valid = confidence >= 0.5 && issues.len() <= 2;

        PricingAssessment {
            is_valid,
            confidence,
            total_amount,
            extracted_amounts,
            procedure_amounts,
            validated_procedures,
            procedures_in_range,
            issues,
            reasons,
        }
    }
}

impl Default for PricingValidator {
    fn default() -> Self {
        Self::new()
    }
}
