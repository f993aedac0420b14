use crate::claims::hospital::NetworkDirectory;

use super::common::{basis_vec, config};

#[test]
fn chain_hospital_matches_without_embeddings() {
    let directory = NetworkDirectory::standard();
    let matched = directory.match_hospital(Some("Apollo Hospitals"), "", &[], &[], &config());

    // fuzzy 1.0 * 0.4 + chain 0.8 * 0.25 with no vector or city signal.
    assert!(matched.in_network);
    assert!((matched.final_score - 0.6).abs() < 1e-9);
    assert_eq!(matched.fuzzy_score, 1.0);
    assert_eq!(matched.chain_score, 0.8);
    assert_eq!(matched.best_match.as_deref(), Some("Apollo Hospital"));
    assert_eq!(matched.normalized_name, "apollo");
}

#[test]
fn unknown_clinic_stays_out_of_network() {
    let directory = NetworkDirectory::standard();
    let matched = directory.match_hospital(Some("City Clinic"), "", &[], &[], &config());

    assert!(!matched.in_network);
    assert!(matched.final_score < 0.5, "score was {}", matched.final_score);
    assert_eq!(matched.chain_score, 0.0);
}

#[test]
fn major_city_adds_the_location_bonus() {
    let directory = NetworkDirectory::standard();
    let matched = directory.match_hospital(
        Some("Apollo Hospitals"),
        "Greams Road, Chennai",
        &[],
        &[],
        &config(),
    );

    assert_eq!(matched.location_bonus, 0.1);
    assert!((matched.final_score - 0.7).abs() < 1e-9);
}

#[test]
fn exact_non_chain_match_needs_vector_support() {
    let directory = NetworkDirectory::standard();

    // Name and city alone reach exactly the threshold, which is strict.
    let without_vectors = directory.match_hospital(
        Some("Lilavati Hospital"),
        "Bandra, Mumbai",
        &[],
        &[],
        &config(),
    );
    assert!((without_vectors.final_score - 0.5).abs() < 1e-9);
    assert!(!without_vectors.in_network);

    let with_vectors = directory.match_hospital(
        Some("Lilavati Hospital"),
        "Bandra, Mumbai",
        &basis_vec(8, 3),
        &basis_vec(8, 3),
        &config(),
    );
    assert!((with_vectors.final_score - 0.8).abs() < 1e-9);
    assert!(with_vectors.in_network);
}

#[test]
fn info_text_is_the_fallback_candidate() {
    let directory = NetworkDirectory::standard();
    let matched = directory.match_hospital(
        None,
        "treated at Fortis Healthcare Delhi",
        &[],
        &[],
        &config(),
    );

    assert!(matched.normalized_name.contains("fortis"));
    assert_eq!(matched.chain_score, 0.8);
    assert_eq!(matched.location_bonus, 0.1);
}

#[test]
fn blank_directory_entries_are_skipped() {
    let directory = NetworkDirectory::from_names(["", "   ", "Apollo Hospital"].into_iter());
    assert_eq!(directory.len(), 1);
    assert!(!directory.is_empty());
}

#[test]
fn empty_candidate_scores_zero_fuzzy() {
    let directory = NetworkDirectory::standard();
    let matched = directory.match_hospital(None, "", &[], &[], &config());

    assert!(!matched.in_network);
    assert_eq!(matched.fuzzy_score, 0.0);
    assert_eq!(matched.best_match, None);
}
