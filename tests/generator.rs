mod common;

use assert_matches::assert_matches;
use serde_json::json;

use common::{MockLookup, work};
use csl_quickstatements::config::ResolvedConfig;
use csl_quickstatements::domain::{EntityRef, IdentifierKind, Provenance};
use csl_quickstatements::generator::{
    GenerateOptions, Generator, Outcome, ProgressEvent, ProgressSink, SkipReason,
};

fn generator(lookup: MockLookup) -> Generator<MockLookup> {
    Generator::new(ResolvedConfig::builtin().unwrap(), lookup)
}

struct Silent;

impl ProgressSink for Silent {
    fn event(&self, _event: ProgressEvent) {}
}

#[test]
fn new_journal_article_is_created() {
    let record = work(json!({
        "message": {
            "type": "journal-article",
            "title": "X",
            "DOI": "10.1/abc",
            "volume": "3",
            "page": "45-50"
        }
    }));
    let outcome = generator(MockLookup::new())
        .generate(&record, &GenerateOptions::default())
        .unwrap();

    assert_eq!(
        outcome,
        Outcome::Commands {
            entity: EntityRef::PendingCreation,
            text: [
                "CREATE",
                "LAST\tLen\t\"X\"",
                "LAST\tDen\t\"Scholarly article\"",
                "LAST\tP31\tQ13442814",
                "LAST\tP1476\ten:\"X\"",
                "LAST\tP356\t\"10.1/abc\"",
                "LAST\tP478\t\"3\"",
                "LAST\tP304\t\"45-50\"",
                "",
            ]
            .join("\n"),
        }
    );
}

#[test]
fn existing_item_without_update_emits_nothing() {
    let record = work(json!({"message": {"title": "Known", "DOI": "10.1/known"}}));
    let lookup = MockLookup::new().with_item(IdentifierKind::Doi, "10.1/known", "Q123");
    let options = GenerateOptions {
        update: false,
        ..GenerateOptions::default()
    };
    let outcome = generator(lookup).generate(&record, &options).unwrap();
    assert_eq!(outcome, Outcome::Existing("Q123".parse().unwrap()));
    assert_eq!(outcome.commands(), None);
}

#[test]
fn existing_item_with_update_skips_terms() {
    let record = work(json!({"message": {"title": "Known", "DOI": "10.1/known"}}));
    let lookup = MockLookup::new().with_item(IdentifierKind::Doi, "10.1/known", "Q123");
    let provenance = Provenance::parse_pairs(&["S248=Q5188229"]).unwrap();
    let options = GenerateOptions {
        provenance,
        ..GenerateOptions::default()
    };
    let outcome = generator(lookup).generate(&record, &options).unwrap();
    let text = outcome.commands().unwrap();
    assert!(!text.contains("CREATE"));
    assert!(!text.contains("\tLen\t"));
    assert!(text.starts_with("Q123\tP31\tQ13442814\tS248\tQ5188229\n"));
    assert!(text.contains("Q123\tP356\t\"10.1/known\"\tS248\tQ5188229\n"));
}

#[test]
fn no_check_never_looks_up() {
    let record = work(json!({"message": {"title": "Known", "DOI": "10.1/known"}}));
    let lookup = MockLookup::new().with_item(IdentifierKind::Doi, "10.1/known", "Q123");
    let generator = generator(lookup);
    let options = GenerateOptions {
        check: false,
        ..GenerateOptions::default()
    };
    let outcome = generator.generate(&record, &options).unwrap();
    assert_matches!(
        outcome,
        Outcome::Commands {
            entity: EntityRef::PendingCreation,
            ..
        }
    );
}

#[test]
fn records_without_message_or_title_are_skipped() {
    let generator = generator(MockLookup::new());
    let options = GenerateOptions::default();

    let no_message = work(json!({"status": "ok"}));
    assert_eq!(
        generator.generate(&no_message, &options).unwrap(),
        Outcome::Skipped(SkipReason::MissingMessage)
    );

    for title in [json!(null), json!(""), json!([]), json!("<i> </i>"), json!(42)] {
        let record = work(json!({"message": {"title": title, "DOI": "10.1/x"}}));
        assert_eq!(
            generator.generate(&record, &options).unwrap(),
            Outcome::Skipped(SkipReason::MissingTitle)
        );
    }
}

#[test]
fn label_uses_work_language() {
    let record = work(json!({
        "message": {"title": "Uma nova espécie", "ISSN": ["2178-0579"]}
    }));
    let outcome = generator(MockLookup::new())
        .generate(&record, &GenerateOptions::default())
        .unwrap();
    let text = outcome.commands().unwrap();
    assert!(text.contains("LAST\tLpt\t\"Uma nova espécie\"\n"));
    assert!(text.contains("LAST\tP1476\tpt:\"Uma nova espécie\"\n"));
    assert!(!text.contains("P407"));
}

#[test]
fn citations_are_appended_without_excluded_sources() {
    let record = work(json!({
        "message": {
            "title": "Citing work",
            "reference": [
                {"unstructured": "Somebody (1900) Something."},
                {"DOI": "10.1/cited"}
            ]
        }
    }));
    let lookup = MockLookup::new().with_item(IdentifierKind::Doi, "10.1/cited", "Q77");
    let options = GenerateOptions {
        include_citations: true,
        provenance: Provenance::parse_pairs(&["S248=Q5188229"]).unwrap(),
        ..GenerateOptions::default()
    };
    let outcome = generator(lookup).generate(&record, &options).unwrap();
    let text = outcome.commands().unwrap();
    assert_eq!(text.matches("CREATE").count(), 1);
    assert!(text.ends_with("LAST\tP2860\tQ77\tS248\tQ5188229\n"));
}

#[test]
fn malformed_reference_list_keeps_record_rows() {
    let record = work(json!({
        "message": {
            "title": "T",
            "DOI": "10.1/abc",
            "volume": "3",
            "reference": "not a list"
        }
    }));
    let options = GenerateOptions {
        include_citations: true,
        ..GenerateOptions::default()
    };
    let outcome = generator(MockLookup::new())
        .generate(&record, &options)
        .unwrap();
    let text = outcome.commands().unwrap();
    assert!(text.contains("LAST\tP356\t\"10.1/abc\"\n"));
    assert!(text.ends_with("LAST\tP478\t\"3\"\n"));
    assert!(!text.contains("P2860"));
}

#[test]
fn citations_only_for_existing_item() {
    let record = work(json!({
        "message": {
            "title": "Citing work",
            "reference": [{"DOI": "10.1/a"}, {"DOI": "10.1/missing"}, {"DOI": "10.1/b"}]
        }
    }));
    let lookup = MockLookup::new()
        .with_item(IdentifierKind::Doi, "10.1/a", "Q1")
        .with_item(IdentifierKind::Doi, "10.1/b", "Q2");
    let text = generator(lookup)
        .generate_citations(&record, &"Q9".parse().unwrap(), &Provenance::default())
        .unwrap();
    assert_eq!(text, "Q9\tP2860\tQ1\nQ9\tP2860\tQ2\n");
}

#[test]
fn batch_reports_each_record() {
    let works = vec![
        work(json!({"message": {"title": "New"}})),
        work(json!({})),
        work(json!({"message": {"title": "Old", "DOI": "10.1/old"}})),
    ];
    let lookup = MockLookup::new().with_item(IdentifierKind::Doi, "10.1/old", "Q5");
    let options = GenerateOptions {
        update: false,
        ..GenerateOptions::default()
    };
    let report = generator(lookup)
        .generate_batch(&works, &options, &Silent)
        .unwrap();

    let actions: Vec<_> = report.records.iter().map(|r| r.action.as_str()).collect();
    assert_eq!(actions, ["created", "skipped", "existing"]);
    assert_eq!(report.records[1].skip_reason, Some(SkipReason::MissingMessage));
    assert_eq!(report.records[2].item.as_deref(), Some("Q5"));
    assert!(report.commands().starts_with("CREATE\nLAST\tLen\t\"New\"\n"));
}

#[test]
fn generation_is_deterministic() {
    let record = work(json!({
        "message": {
            "type": "monograph",
            "title": "A <i>book</i>",
            "author": [{"given": "Ann", "family": "Lee"}, {"literal": "Group"}],
            "issued": {"date-parts": [[2001, 2]]},
            "URL": ["https://a.org/1", "https://a.org/2"]
        }
    }));
    let generator = generator(MockLookup::new());
    let first = generator.generate(&record, &GenerateOptions::default()).unwrap();
    let second = generator.generate(&record, &GenerateOptions::default()).unwrap();
    assert_eq!(first, second);
}
