use crate::scanner::extractor::{Extractor, ExtractorConfig};
use crate::scanner::pattern::PatternId;
use crate::scanner::relationship::{Daughter, RelationshipCollection};

const HENANECHA: &str = "D’après lui, le bey de Constantine, allié â celui de Tunis, avait, dans le cours de Tannée précédente (1724) attaqué à Timproviste la tribu des Henanecha. ";

const EULDJIA_TAIL: &str = "« se fit apporter les vêtements les plus beaux « et, s’en étant vêtue, monta achevai, appela les femmes « et les filles, ses parentes ou ses amies qui montèrent « aussi à cheval ; puis, elle harangua les femmes en leur « disant : « Puisque ces hommes n’ont pas de courage « d’aller contre les Turcs qui viendront bientôt nous « violer à leurs yeux, allons nous-mêmes vendre chèrement notre vie et ne restons pas plus longtemps avec ces lâches.";

const SIEGE: &str = ", après s'être vu enlever par ses adversaires 8.000 têtes de bétail et une partie de ses bagages, était sur le point de se rendre, lorsque sa fille";

fn extract_only(pattern: PatternId, text: &str) -> RelationshipCollection {
    let config = ExtractorConfig {
        patterns: vec![pattern],
        ..ExtractorConfig::default()
    };
    Extractor::new(config).unwrap().extract(text)
}

fn extract_all(text: &str) -> RelationshipCollection {
    Extractor::new(ExtractorConfig::default()).unwrap().extract(text)
}

// ============================================================================
// FATHER_DAUGHTER_1: "X, … sa fille [,] Y"
// ============================================================================

#[test]
fn test_fd1_father_and_daughter_present() {
    let text = format!("{}Bou-Aziz{} Euldjia {}", HENANECHA, SIEGE, EULDJIA_TAIL);
    let found = extract_only(PatternId::FatherDaughter1, &text);

    assert_eq!(found.len(), 1);
    assert_eq!(found[0].father(), "Bou-Aziz");
    assert_eq!(found[0].daughter(), &"Euldjia");
    assert_eq!(found[0].pattern(), PatternId::FatherDaughter1);
}

#[test]
fn test_fd1_comma_between_fille_and_name() {
    let text = format!("{}Bou-Aziz{}, Euldjia {}", HENANECHA, SIEGE, EULDJIA_TAIL);
    let found = extract_only(PatternId::FatherDaughter1, &text);

    assert_eq!(found.len(), 1);
    assert_eq!(found[0].father(), "Bou-Aziz");
    assert_eq!(found[0].daughter(), &"Euldjia");
}

#[test]
fn test_fd1_pronoun_instead_of_father() {
    let text = format!("Il{}, Euldjia {}", SIEGE, EULDJIA_TAIL);
    assert!(extract_only(PatternId::FatherDaughter1, &text).is_empty());
}

#[test]
fn test_fd1_no_name_after_sa_fille() {
    let text = format!("Il{} {}", SIEGE, EULDJIA_TAIL);
    assert!(extract_only(PatternId::FatherDaughter1, &text).is_empty());
}

#[test]
fn test_fd1_full_catalog_gives_same_result() {
    let text = format!("{}Bou-Aziz{} Euldjia {}", HENANECHA, SIEGE, EULDJIA_TAIL);
    let found = extract_all(&text);
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].pattern(), PatternId::FatherDaughter1);
}

#[test]
fn test_fd1_father_in_previous_paragraph_is_not_used() {
    let found = extract_all("Bou-Aziz partit.\n\nAlors sa fille Euldjia monta à cheval.");
    assert!(found.is_empty());
}

fn pairs(found: &RelationshipCollection) -> Vec<(&str, &str)> {
    found.iter().map(|r| (r.father(), r.daughter().as_str())).collect()
}

#[test]
fn test_fd1_two_phrases_in_one_sentence() {
    let found = extract_only(
        PatternId::FatherDaughter1,
        "Bou-Aziz vit sa fille Euldjia et Ahmed embrassa sa fille Aicha.",
    );
    assert_eq!(pairs(&found), vec![("Bou-Aziz", "Euldjia"), ("Ahmed", "Aicha")]);
}

#[test]
fn test_fd1_place_name_before_father() {
    let found = extract_only(PatternId::FatherDaughter1, "À Tunis, Bou-Aziz vit sa fille Euldjia.");
    assert_eq!(pairs(&found), vec![("Bou-Aziz", "Euldjia")]);

    let found = extract_only(PatternId::FatherDaughter1, "Bou-Aziz revint de Constantine avec sa fille Euldjia.");
    assert_eq!(pairs(&found), vec![("Bou-Aziz", "Euldjia")]);
}

// ============================================================================
// FATHER_DAUGHTER_2: "Y, fille de X"
// ============================================================================

#[test]
fn test_fd2_daughter_before_father() {
    let found = extract_all("Euldjia, fille de Bou-Aziz, monta à cheval.");
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].father(), "Bou-Aziz");
    assert_eq!(found[0].daughter(), &"Euldjia");
    assert_eq!(found[0].pattern(), PatternId::FatherDaughter2);
}

#[test]
fn test_fd2_not_triggered_by_determiner() {
    let found = extract_only(PatternId::FatherDaughter2, "La fille de Ben-Gana ne lui avait pas donné d’enfants.");
    assert!(found.is_empty());
}

// ============================================================================
// FATHER_DAUGHTER_3: "X … une fille nommée Y"
// ============================================================================

#[test]
fn test_fd3_named_daughter() {
    let found = extract_all("Bou-Aziz eut une fille nommée Euldjia.");
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].father(), "Bou-Aziz");
    assert_eq!(found[0].daughter(), &"Euldjia");
    assert_eq!(found[0].pattern(), PatternId::FatherDaughter3);
}

#[test]
fn test_fd3_two_phrases_in_one_sentence() {
    let found = extract_only(
        PatternId::FatherDaughter3,
        "Bou-Aziz eut une fille nommée Euldjia et Ahmed eut une fille nommée Aicha.",
    );
    assert_eq!(pairs(&found), vec![("Bou-Aziz", "Euldjia"), ("Ahmed", "Aicha")]);
}

#[test]
fn test_fd3_quoted_name() {
    let found = extract_all("Bou-Aziz eut une fille appelée « Euldjia ».");
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].daughter(), &"Euldjia");
}

// ============================================================================
// FATHER_DAUGHTER_4: "la/une fille de X"
// ============================================================================

#[test]
fn test_fd4_with_la() {
    let text = "Comme sa femme préférée, la fille de Ben-Gana, ne lui avait pas donné d’enfants, il épousa une fille des Mokrani, seigneurs de la Medjana.";
    let found = extract_only(PatternId::FatherDaughter4, text);

    assert_eq!(found.len(), 1);
    assert_eq!(found[0].father(), "Ben-Gana");
    assert_eq!(found[0].daughter(), &"unnamed daughter");
    assert_eq!(found[0].daughter(), &Daughter::Unnamed);
}

#[test]
fn test_fd4_with_une() {
    let text = "Comme sa femme préférée, une fille de Ben-Gana, ne lui avait pas donné d’enfants, il épousa une fille des Mokrani, seigneurs de la Medjana.";
    let found = extract_only(PatternId::FatherDaughter4, text);

    assert_eq!(found.len(), 1);
    assert_eq!(found[0].father(), "Ben-Gana");
    assert_eq!(found[0].daughter(), &"unnamed daughter");
}

#[test]
fn test_fd4_common_noun_father() {
    let text = "Comme sa femme préférée, une fille du cheik, ne lui avait pas donné d’enfants, il épousa une fille des Mokrani, seigneurs de la Medjana.";
    assert!(extract_only(PatternId::FatherDaughter4, text).is_empty());
    assert!(extract_all(text).is_empty());
}

// ============================================================================
// Mixed documents
// ============================================================================

#[test]
fn test_multiple_families_in_document_order() {
    let text = format!(
        "{}Bou-Aziz{} Euldjia {}\n\nComme sa femme préférée, la fille de Ben-Gana, ne lui avait pas donné d’enfants.",
        HENANECHA, SIEGE, EULDJIA_TAIL
    );
    let found = extract_all(&text);

    assert_eq!(found.len(), 2);
    assert_eq!(found[0].father(), "Bou-Aziz");
    assert_eq!(found[1].father(), "Ben-Gana");
    assert_eq!(found.by_pattern(PatternId::FatherDaughter4).count(), 1);
}

#[test]
fn test_rerun_does_not_accumulate() {
    let extractor = Extractor::new(ExtractorConfig::default()).unwrap();
    let text = "la fille de Ben-Gana";
    assert_eq!(extractor.extract(text).len(), 1);
    assert_eq!(extractor.extract(text).len(), 1);
}
