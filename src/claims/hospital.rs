use serde::{Deserialize, Serialize};

use super::engine_config::EngineConfig;
use super::similarity::{clamp_unit, cosine_similarity};

/// Hospital-network verdict with the blended score components.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HospitalMatch {
    pub in_network: bool,
    pub final_score: f64,
    pub fuzzy_score: f64,
    pub chain_score: f64,
    pub vector_score: f64,
    pub location_bonus: f64,
    pub best_match: Option<String>,
    pub normalized_name: String,
}

const HONORIFIC_PREFIXES: &[&str] = &["dr. ", "dr ", "sri ", "shri ", "the "];

const INSTITUTIONAL_SUFFIXES: &[&str] = &[
    "multi specialty hospital",
    "medical center",
    "medical centre",
    "nursing home",
    "healthcare",
    "hospitals",
    "hospital",
    "clinic",
    "institute",
    "foundation",
    "trust",
    "pvt ltd",
    "private limited",
    "limited",
];

const ABBREVIATIONS: &[(&str, &str)] = &[
    ("multispeciality", "multi specialty"),
    ("multispecialty", "multi specialty"),
    ("pvt", "private"),
    ("&", "and"),
    ("hosp", "hospital"),
    ("med", "medical"),
    ("ctr", "center"),
    ("inst", "institute"),
];

const CHAIN_FRAGMENTS: &[&str] = &["apollo", "fortis", "max", "medanta", "narayana", "manipal"];

const MAJOR_CITIES: &[&str] = &[
    "mumbai",
    "delhi",
    "bangalore",
    "bengaluru",
    "chennai",
    "hyderabad",
    "kolkata",
    "pune",
    "ahmedabad",
    "gurgaon",
    "noida",
];

/// Canonical network-hospital names, held pre-normalized so fuzzy matching
/// compares like with like.
#[derive(Debug)]
pub struct NetworkDirectory {
    hospitals: Vec<NetworkHospital>,
}

#[derive(Debug, Clone)]
pub(crate) struct NetworkHospital {
    pub(crate) canonical: String,
    pub(crate) normalized: String,
}

impl NetworkDirectory {
    pub fn standard() -> Self {
        Self::from_names(
            [
                "Apollo Hospital",
                "Fortis Healthcare",
                "Max Healthcare",
                "Medanta The Medicity",
                "Narayana Health",
                "Manipal Hospital",
                "Kokilaben Dhirubhai Ambani Hospital",
                "Lilavati Hospital",
                "Breach Candy Hospital",
                "Sir Ganga Ram Hospital",
            ]
            .into_iter(),
        )
    }

    pub fn from_names<I, S>(names: I) -> Self
    where
        I: Iterator<Item = S>,
        S: AsRef<str>,
    {
        let hospitals = names
            .filter_map(|name| {
                let canonical = name.as_ref().trim().to_string();
                if canonical.is_empty() {
                    return None;
                }
                let normalized = normalize_hospital_name(&canonical);
                Some(NetworkHospital {
                    canonical,
                    normalized,
                })
            })
            .collect();
        Self { hospitals }
    }

    pub fn len(&self) -> usize {
        self.hospitals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hospitals.is_empty()
    }

    /// Match a candidate hospital against the network.
    ///
    /// Blends fuzzy name similarity, chain-keyword hits, embedding similarity
    /// to the policy's network fingerprint, and a major-city bonus into a
    /// single capped score.
    pub fn match_hospital(
        &self,
        hospital_name: Option<&str>,
        hospital_info_text: &str,
        hospital_embedding: &[f32],
        network_embedding: &[f32],
        config: &EngineConfig,
    ) -> HospitalMatch {
        let candidate = hospital_name
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .unwrap_or(hospital_info_text)
            .trim();
        let normalized = normalize_hospital_name(candidate);

        let mut fuzzy_score = 0.0f64;
        let mut best_match = None;
        for hospital in &self.hospitals {
            let levenshtein = levenshtein_similarity(&normalized, &hospital.normalized);
            let overlap = word_overlap_ratio(&normalized, &hospital.normalized);
            let score = levenshtein.max(overlap * 0.8);
            if score > fuzzy_score {
                fuzzy_score = score;
                best_match = Some(hospital.canonical.clone());
            }
        }

        let chain_score = if CHAIN_FRAGMENTS
            .iter()
            .any(|fragment| normalized.contains(fragment))
        {
            0.8
        } else {
            0.0
        };

        let vector_score = cosine_similarity(hospital_embedding, network_embedding).max(0.0);

        let combined_text = format!("{normalized} {}", hospital_info_text.to_lowercase());
        let location_bonus = if MAJOR_CITIES.iter().any(|city| combined_text.contains(city)) {
            config.hospital_location_bonus
        } else {
            0.0
        };

        let final_score = clamp_unit(
            fuzzy_score * config.hospital_fuzzy_weight
                + vector_score * config.hospital_vector_weight
                + chain_score * config.hospital_chain_weight
                + location_bonus,
        );

        HospitalMatch {
            in_network: final_score > config.network_threshold,
            final_score,
            fuzzy_score,
            chain_score,
            vector_score,
            location_bonus,
            best_match,
            normalized_name: normalized,
        }
    }
}

/// Canonicalize a hospital name for fuzzy comparison: lowercase, strip
/// honorifics and institutional suffixes, expand known abbreviations, drop
/// punctuation, collapse whitespace.
pub fn normalize_hospital_name(name: &str) -> String {
    let mut value = name.trim().to_lowercase();

    for prefix in HONORIFIC_PREFIXES {
        if let Some(rest) = value.strip_prefix(prefix) {
            value = rest.trim_start().to_string();
            break;
        }
    }

    let mut words: Vec<String> = value
        .split_whitespace()
        .map(|word| {
            ABBREVIATIONS
                .iter()
                .find(|(short, _)| *short == word.trim_matches('.'))
                .map(|(_, long)| long.to_string())
                .unwrap_or_else(|| word.to_string())
        })
        .collect();
    value = words.join(" ");

    // Longest suffixes first so "medical center" wins over "center".
    for suffix in INSTITUTIONAL_SUFFIXES {
        if let Some(rest) = value.strip_suffix(suffix) {
            value = rest.trim_end().to_string();
        }
    }

    words = value
        .split_whitespace()
        .map(|word| {
            word.chars()
                .filter(|ch| ch.is_alphanumeric())
                .collect::<String>()
        })
        .filter(|word| !word.is_empty())
        .collect();

    words.join(" ")
}

/// Normalized Levenshtein similarity: `1 - distance / max(len_a, len_b)`.
/// Identical strings (including two empties) score 1.0.
pub fn levenshtein_similarity(a: &str, b: &str) -> f64 {
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();
    let longest = a_chars.len().max(b_chars.len());
    if longest == 0 {
        return 1.0;
    }

    let distance = levenshtein_distance(&a_chars, &b_chars);
    clamp_unit(1.0 - distance as f64 / longest as f64)
}

fn levenshtein_distance(a: &[char], b: &[char]) -> usize {
    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut previous: Vec<usize> = (0..=b.len()).collect();
    let mut current = vec![0usize; b.len() + 1];

    for (i, a_char) in a.iter().enumerate() {
        current[0] = i + 1;
        for (j, b_char) in b.iter().enumerate() {
            let substitution = previous[j] + usize::from(a_char != b_char);
            current[j + 1] = substitution
                .min(previous[j + 1] + 1)
                .min(current[j] + 1);
        }
        std::mem::swap(&mut previous, &mut current);
    }

    previous[b.len()]
}

/// Shared tokens of length > 2, over the larger token-set size.
fn word_overlap_ratio(a: &str, b: &str) -> f64 {
    let tokens_a: std::collections::BTreeSet<&str> =
        a.split_whitespace().filter(|word| word.len() > 2).collect();
    let tokens_b: std::collections::BTreeSet<&str> =
        b.split_whitespace().filter(|word| word.len() > 2).collect();

    let largest = tokens_a.len().max(tokens_b.len());
    if largest == 0 {
        return 0.0;
    }

    let shared = tokens_a.intersection(&tokens_b).count();
    shared as f64 / largest as f64
}
