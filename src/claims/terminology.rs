use std::collections::BTreeSet;

use super::domain::{CategoryMatch, ExtractedMedicalProfile, MedicalCategory};
use super::similarity::clamp_unit;

/// Immutable phrase lexicon for one taxonomy category.
#[derive(Debug)]
pub struct CategoryLexicon {
    pub category: MedicalCategory,
    pub keywords: &'static [&'static str],
    pub conditions: &'static [&'static str],
    pub procedures: &'static [&'static str],
}

impl CategoryLexicon {
    fn total_phrases(&self) -> usize {
        self.keywords.len() + self.conditions.len() + self.procedures.len()
    }
}

/// The fixed medical taxonomy scanned against free claim text.
#[derive(Debug)]
pub struct MedicalTaxonomy {
    entries: Vec<CategoryLexicon>,
}

impl MedicalTaxonomy {
    pub fn standard() -> Self {
        Self {
            entries: standard_lexicons(),
        }
    }

    pub fn categories(&self) -> &[CategoryLexicon] {
        &self.entries
    }

    /// Scan free text for taxonomy phrases.
    ///
    /// Pure and infallible: empty text yields an empty profile with
    /// confidence 0. A category is included only when at least one of its
    /// phrases occurs as a substring of the lowercased text.
    pub fn extract(&self, text: &str) -> ExtractedMedicalProfile {
        let lowered = text.trim().to_lowercase();
        if lowered.is_empty() {
            return ExtractedMedicalProfile::default();
        }

        let mut terms = BTreeSet::new();
        let mut categories = Vec::new();
        let mut total_matches = 0usize;

        for lexicon in &self.entries {
            let matched_keywords = matching_phrases(&lowered, lexicon.keywords);
            let matched_conditions = matching_phrases(&lowered, lexicon.conditions);
            let matched_procedures = matching_phrases(&lowered, lexicon.procedures);

            let match_count =
                matched_keywords.len() + matched_conditions.len() + matched_procedures.len();
            if match_count == 0 {
                continue;
            }

            for term in matched_keywords
                .iter()
                .chain(&matched_conditions)
                .chain(&matched_procedures)
            {
                terms.insert(term.clone());
            }

            total_matches += match_count;
            let relevance = match_count as f64 / lexicon.total_phrases() as f64;
            categories.push(CategoryMatch {
                category: lexicon.category,
                matched_keywords,
                matched_conditions,
                matched_procedures,
                match_count,
                relevance: clamp_unit(relevance),
            });
        }

        categories.sort_by(|a, b| {
            b.relevance
                .partial_cmp(&a.relevance)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        let confidence = clamp_unit(0.1 * total_matches as f64 + 0.2 * categories.len() as f64);

        ExtractedMedicalProfile {
            terms,
            categories,
            confidence,
        }
    }
}

fn matching_phrases(lowered_text: &str, phrases: &[&'static str]) -> Vec<String> {
    phrases
        .iter()
        .filter(|phrase| lowered_text.contains(*phrase))
        .map(|phrase| phrase.to_string())
        .collect()
}

fn standard_lexicons() -> Vec<CategoryLexicon> {
    vec![
        CategoryLexicon {
            category: MedicalCategory::Neurological,
            keywords: &["brain", "neuro", "seizure", "stroke", "migraine", "paralysis"],
            conditions: &[
                "traumatic brain injury",
                "epilepsy",
                "brain tumor",
                "multiple sclerosis",
                "parkinson",
            ],
            procedures: &["craniotomy", "spinal fusion", "shunt placement", "brain surgery"],
        },
        CategoryLexicon {
            category: MedicalCategory::Cardiac,
            keywords: &["heart", "cardiac", "coronary", "artery", "chest pain"],
            conditions: &[
                "heart attack",
                "myocardial infarction",
                "arrhythmia",
                "heart failure",
                "coronary artery disease",
            ],
            procedures: &[
                "angioplasty",
                "bypass surgery",
                "stent placement",
                "pacemaker implantation",
                "valve replacement",
            ],
        },
        CategoryLexicon {
            category: MedicalCategory::Orthopedic,
            keywords: &["bone", "joint", "fracture", "knee", "hip", "spine"],
            conditions: &["osteoarthritis", "osteoporosis", "ligament tear", "slipped disc"],
            procedures: &[
                "knee replacement",
                "hip replacement",
                "arthroscopy",
                "fracture fixation",
            ],
        },
        CategoryLexicon {
            category: MedicalCategory::Oncological,
            keywords: &["cancer", "tumor", "oncology", "malignant", "metastasis"],
            conditions: &["breast cancer", "lung cancer", "leukemia", "lymphoma"],
            procedures: &[
                "chemotherapy",
                "radiation therapy",
                "tumor resection",
                "mastectomy",
            ],
        },
        CategoryLexicon {
            category: MedicalCategory::Gastrointestinal,
            keywords: &["stomach", "liver", "intestine", "gastric", "abdominal"],
            conditions: &["appendicitis", "gallstones", "hernia", "ulcer", "pancreatitis"],
            procedures: &[
                "appendectomy",
                "cholecystectomy",
                "hernia repair",
                "endoscopy",
            ],
        },
        CategoryLexicon {
            category: MedicalCategory::General,
            keywords: &["fever", "infection", "injury", "hospitalization", "inpatient"],
            conditions: &["pneumonia", "dengue", "typhoid", "gastroenteritis", "sepsis"],
            procedures: &["general surgery", "dialysis", "blood transfusion"],
        },
    ]
}
