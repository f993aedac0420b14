use crate::claims::domain::MedicalCategory;
use crate::claims::terminology::MedicalTaxonomy;

#[test]
fn empty_text_yields_empty_profile() {
    let taxonomy = MedicalTaxonomy::standard();

    for text in ["", "   ", "\n\t"] {
        let profile = taxonomy.extract(text);
        assert!(profile.categories.is_empty());
        assert!(profile.terms.is_empty());
        assert_eq!(profile.confidence, 0.0);
    }
}

#[test]
fn unrelated_text_matches_nothing() {
    let taxonomy = MedicalTaxonomy::standard();
    let profile = taxonomy.extract("quarterly premium reminder for your vehicle policy");
    assert!(profile.is_empty());
    assert_eq!(profile.confidence, 0.0);
}

#[test]
fn single_phrase_relevance_is_ratio_of_lexicon() {
    let taxonomy = MedicalTaxonomy::standard();
    let profile = taxonomy.extract("diagnosed with epilepsy last month");

    assert_eq!(profile.categories.len(), 1);
    let matched = &profile.categories[0];
    assert_eq!(matched.category, MedicalCategory::Neurological);
    assert_eq!(matched.match_count, 1);
    // Neurological lexicon: 6 keywords + 5 conditions + 4 procedures.
    assert!((matched.relevance - 1.0 / 15.0).abs() < 1e-9);
    assert!(profile.terms.contains("epilepsy"));
}

#[test]
fn confidence_non_decreasing_with_more_matches() {
    let taxonomy = MedicalTaxonomy::standard();

    let sparse = taxonomy.extract("stroke");
    let denser = taxonomy.extract("stroke with seizure episodes");
    let densest = taxonomy.extract("stroke with seizure episodes and a brain tumor");

    assert!(denser.confidence >= sparse.confidence);
    assert!(densest.confidence >= denser.confidence);
}

#[test]
fn confidence_formula_counts_matches_and_categories() {
    let taxonomy = MedicalTaxonomy::standard();
    // One neurological keyword, one general keyword: 2 matches, 2 categories.
    let profile = taxonomy.extract("stroke patient with fever");

    assert_eq!(profile.categories.len(), 2);
    assert!((profile.confidence - (0.1 * 2.0 + 0.2 * 2.0)).abs() < 1e-9);
}

#[test]
fn categories_sorted_descending_by_relevance() {
    let taxonomy = MedicalTaxonomy::standard();
    let profile =
        taxonomy.extract("craniotomy after traumatic brain injury; mild fever post surgery");

    assert!(profile.categories.len() >= 2);
    for window in profile.categories.windows(2) {
        assert!(window[0].relevance >= window[1].relevance);
    }
    assert_eq!(profile.categories[0].category, MedicalCategory::Neurological);
}

#[test]
fn phrases_are_matched_as_substrings_of_lowercased_text() {
    let taxonomy = MedicalTaxonomy::standard();
    let profile = taxonomy.extract("UNDERWENT ANGIOPLASTY AND STENT PLACEMENT");

    let cardiac = profile
        .categories
        .iter()
        .find(|matched| matched.category == MedicalCategory::Cardiac)
        .expect("cardiac category matched");
    assert!(cardiac
        .matched_procedures
        .iter()
        .any(|phrase| phrase == "angioplasty"));
    assert!(cardiac
        .matched_procedures
        .iter()
        .any(|phrase| phrase == "stent placement"));
}
