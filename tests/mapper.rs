mod common;

use serde_json::json;

use common::{MockLookup, work};
use csl_quickstatements::config::ResolvedConfig;
use csl_quickstatements::domain::{IdentifierKind, Statement, Value};
use csl_quickstatements::mapper::{Mapper, Mapping};

fn map_with(lookup: &MockLookup, message: serde_json::Value) -> Option<Mapping> {
    let config = ResolvedConfig::builtin().unwrap();
    let record = work(json!({ "message": message }));
    Mapper::new(&config, lookup)
        .map_to_statements(record.message.as_ref().unwrap())
        .unwrap()
}

fn map(message: serde_json::Value) -> Mapping {
    map_with(&MockLookup::new(), message).unwrap()
}

fn rows(statements: &[Statement], property: &str) -> Vec<String> {
    statements
        .iter()
        .filter(|statement| statement.property.as_str() == property)
        .map(|statement| statement.value.to_string())
        .collect()
}

#[test]
fn type_table() {
    let cases = [
        ("dataset", vec!["Q1172284"], "Dataset"),
        ("dissertation", vec!["Q1266946"], "Dissertation"),
        ("book-chapter", vec!["Q1980247"], "Book chapter"),
        ("book", vec!["Q47461344"], "Book"),
        ("edited-book", vec!["Q1711593"], "Edited book"),
        ("monograph", vec!["Q571", "Q193495"], "Monograph"),
        ("reference-book", vec!["Q47461344"], "Book"),
        ("report", vec!["Q10870555"], "Report"),
        ("journal-article", vec!["Q13442814"], "Scholarly article"),
        ("posted-content", vec!["Q13442814"], "Scholarly article"),
    ];
    for (work_type, classes, description) in cases {
        let mapping = map(json!({"type": work_type, "title": "T"}));
        assert_eq!(rows(&mapping.statements, "P31"), classes, "{work_type}");
        assert_eq!(mapping.description, description);
    }

    let untyped = map(json!({"title": "T"}));
    assert_eq!(rows(&untyped.statements, "P31"), ["Q13442814"]);
}

#[test]
fn phd_thesis_degree() {
    let phd = map(json!({"type": "dissertation", "title": "T", "degree": ["PhD Thesis"]}));
    assert_eq!(rows(&phd.statements, "P31"), ["Q187685"]);

    let other = map(json!({"type": "dissertation", "title": "T", "degree": "Doctoral Thesis"}));
    assert_eq!(rows(&other.statements, "P31"), ["Q1266946"]);
}

#[test]
fn missing_title_is_not_mapped() {
    assert!(map_with(&MockLookup::new(), json!({"DOI": "10.1/x"})).is_none());
    assert!(map_with(&MockLookup::new(), json!({"title": ["", "B"]})).is_none());
    assert!(map_with(&MockLookup::new(), json!({"title": "<b></b>"})).is_none());
}

#[test]
fn date_precisions() {
    let day = map(json!({"title": "T", "issued": {"date-parts": [[1998, 3, 7]]}}));
    assert_eq!(rows(&day.statements, "P577"), ["+1998-03-07T00:00:00Z/11"]);

    let month = map(json!({"title": "T", "issued": {"date-parts": [["1998", "3"]]}}));
    assert_eq!(rows(&month.statements, "P577"), ["+1998-03-00T00:00:00Z/10"]);

    let year = map(json!({"title": "T", "issued": {"date-parts": [[1998]]}}));
    assert_eq!(rows(&year.statements, "P577"), ["+1998-00-00T00:00:00Z/9"]);

    let none = map(json!({"title": "T", "issued": {"date-parts": [[null]]}}));
    assert!(rows(&none.statements, "P577").is_empty());
}

#[test]
fn urls_and_pdf_links_share_a_property() {
    let mapping = map(json!({
        "title": "T",
        "URL": ["https://a.org/1", "https://a.org/2"],
        "link": [
            {"URL": "https://a.org/x.pdf", "content-type": "application/pdf"},
            {"URL": "https://a.org/x.xml", "content-type": "text/xml"}
        ]
    }));
    assert_eq!(
        rows(&mapping.statements, "P953"),
        [
            "\"https://a.org/1\"",
            "\"https://a.org/2\"",
            "\"https://a.org/x.pdf\""
        ]
    );

    let single = map(json!({"title": "T", "URL": "https://a.org/only"}));
    assert_eq!(rows(&single.statements, "P953"), ["\"https://a.org/only\""]);
}

#[test]
fn journal_from_first_resolving_issn() {
    let lookup = MockLookup::new().with_item(IdentifierKind::Issn, "2222-2222", "Q42");
    let mapping = map_with(
        &lookup,
        json!({
            "title": "T",
            "container-title": ["Some Journal"],
            "ISSN": ["1111-1111", "2222-2222"]
        }),
    )
    .unwrap();
    assert_eq!(rows(&mapping.statements, "P1433"), ["Q42"]);
    assert_eq!(
        lookup.calls(),
        [
            (IdentifierKind::Issn, "1111-1111".to_string()),
            (IdentifierKind::Issn, "2222-2222".to_string())
        ]
    );

    let no_container = map_with(&lookup, json!({"title": "T", "ISSN": ["2222-2222"]})).unwrap();
    assert!(rows(&no_container.statements, "P1433").is_empty());
}

#[test]
fn identifiers_and_scalars_are_quoted_verbatim() {
    let mapping = map(json!({
        "title": "T",
        "DOI": "10.1/abc",
        "PMID": 123456,
        "JSTOR": "777",
        "BHLPART": "88",
        "volume": 3,
        "issue": "2&amp;3",
        "page": "45-50",
        "article-number": "e12"
    }));
    assert_eq!(rows(&mapping.statements, "P356"), ["\"10.1/abc\""]);
    assert_eq!(rows(&mapping.statements, "P698"), ["\"123456\""]);
    assert_eq!(rows(&mapping.statements, "P888"), ["\"777\""]);
    assert_eq!(rows(&mapping.statements, "P6535"), ["\"88\""]);
    assert_eq!(rows(&mapping.statements, "P478"), ["\"3\""]);
    assert_eq!(rows(&mapping.statements, "P433"), ["\"2&3\""]);
    assert_eq!(rows(&mapping.statements, "P304"), ["\"45-50\""]);
}

#[test]
fn authors_carry_ordinals() {
    let mapping = map(json!({
        "title": "T",
        "author": [
            {"given": "Ann", "family": "Lee"},
            {},
            {"literal": "The Group"}
        ]
    }));
    let authors: Vec<_> = mapping
        .statements
        .iter()
        .filter(|statement| statement.property.as_str() == "P2093")
        .collect();
    assert_eq!(authors.len(), 2);
    assert_eq!(authors[0].value, Value::text("Ann Lee"));
    assert_eq!(authors[0].qualifiers[0].1, Value::text("1"));
    assert_eq!(authors[1].value, Value::text("The Group"));
    assert_eq!(authors[1].qualifiers[0].0.as_str(), "P1545");
    assert_eq!(authors[1].qualifiers[0].1, Value::text("2"));
}

#[test]
fn title_abstract_and_language() {
    let mapping = map(json!({
        "title": "Une <i>nouvelle</i> espèce",
        "abstract": "<jats:p>Résumé.</jats:p>",
        "language": "fr"
    }));
    assert_eq!(mapping.language, "fr");
    assert_eq!(mapping.label, "Une nouvelle espèce");
    assert_eq!(rows(&mapping.statements, "P1476"), ["fr:\"Une nouvelle espèce\""]);
    assert_eq!(rows(&mapping.statements, "P1922"), ["fr:\"Résumé.\""]);
    assert_eq!(rows(&mapping.statements, "P407"), ["Q150"]);

    let unknown = map(json!({"title": "T", "language": "xx"}));
    assert_eq!(unknown.language, "en");
    assert!(rows(&unknown.statements, "P407").is_empty());
}

#[test]
fn errata_titles() {
    let erratum = map(json!({"title": "Errata: on the genus"}));
    assert_eq!(rows(&erratum.statements, "P31"), ["Q13442814", "Q1348305"]);

    let addenda = map(json!({"title": "Errata et addenda"}));
    assert_eq!(
        rows(&addenda.statements, "P31"),
        ["Q13442814", "Q1348305", "Q352858"]
    );

    let plain = map(json!({"title": "Erratic behaviour"}));
    assert_eq!(rows(&plain.statements, "P31"), ["Q13442814"]);
}

#[test]
fn long_titles_are_shortened_for_the_label() {
    let title = "word ".repeat(80);
    let mapping = map(json!({"title": title}));
    assert!(mapping.label.chars().count() <= 250);
    assert!(mapping.label.ends_with('…'));
    assert_eq!(rows(&mapping.statements, "P1476")[0].len(), title.trim().len() + 5);
}

#[test]
fn statement_order_ignores_key_order() {
    let first = map(json!({"page": "1", "title": "T", "DOI": "10.1/a", "volume": "2"}));
    let second = map(json!({"volume": "2", "DOI": "10.1/a", "title": "T", "page": "1"}));
    assert_eq!(first, second);
    let properties: Vec<_> = first
        .statements
        .iter()
        .map(|statement| statement.property.as_str())
        .collect();
    assert_eq!(properties, ["P31", "P1476", "P356", "P478", "P304"]);
}

#[test]
fn html5_entities_are_decoded() {
    let mapping = map(json!({"title": "Caf&eacute; &auml;", "issue": "3&ndash;4&thinsp;a"}));
    assert_eq!(mapping.label, "Café ä");
    assert_eq!(rows(&mapping.statements, "P1476"), ["en:\"Café ä\""]);
    assert_eq!(rows(&mapping.statements, "P433"), ["\"3–4 a\""]);
}
