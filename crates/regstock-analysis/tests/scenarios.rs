//! End-to-end scenarios: documents in, snapshots out.

use chrono::NaiveDate;
use pretty_assertions::assert_eq;
use proptest::prelude::*;

use regstock_analysis::{Analyzer, RequirementCounter};
use regstock_core::{AnalysisConfig, ClassifierTables, Document, IndustryCode, LegislationType};

fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

#[test]
fn aviation_excluded_and_corporations_cross_cutting() {
    let docs = vec![
        Document::new("C1998A00001", "Civil Aviation Safety Regulations 1998", "act", "operators must comply"),
        Document::new(
            "C2001A00050",
            "Corporations Act 2001",
            "act",
            "a person must not engage in conduct. directors shall report.",
        ),
    ];
    let analyzer = Analyzer::standard().unwrap();
    let corpus = analyzer.analyze(&docs);

    assert_eq!(corpus.documents[0].excluded_by.as_deref(), Some("civil_aviation"));

    let corps = &corpus.documents[1];
    assert_eq!(corps.legislation_type, LegislationType::Primary);
    assert_eq!(corps.industry.code, IndustryCode::X);
    assert_eq!(corps.bc.total, 1);
    assert_eq!(corps.bc.term("shall"), 1);
    assert_eq!(corps.regdata.total, 2);
    assert_eq!(corps.regdata.term("must"), 1);

    let snap = corpus.aggregate(date("2010-07-01"));
    assert_eq!(snap.rows.len(), 1);
    assert_eq!(snap.rows[0].industry, IndustryCode::X);
    assert_eq!(snap.rows[0].bc_total, 1);
    assert_eq!(snap.rows[0].regdata_total, 2);
}

#[test]
fn therapeutic_goods_regulations() {
    let doc = Document::new(
        "F2021L00001",
        "Therapeutic Goods (Medical Devices) Regulations 2021",
        "LegislativeInstrument",
        "",
    );
    let analyzed = Analyzer::standard().unwrap().analyze_document(&doc);
    assert_eq!(analyzed.bc.total, 0);
    assert_eq!(analyzed.regdata.total, 0);
    assert_eq!(analyzed.industry.code, IndustryCode::Q);
    assert_eq!(analyzed.subtype, "Therapeutic Goods");
}

#[test]
fn airworthiness_directive_excluded_despite_classification() {
    let doc = Document::new("F2020L00123", "AD/2020/01 - Airworthiness Directive", "LegislativeInstrument", "must")
        .with_commencement("2020-01-01");
    let analyzer = Analyzer::standard().unwrap();
    let analyzed = analyzer.analyze_document(&doc);
    assert!(analyzed.is_excluded());
    assert!(analyzed.dates.is_some());
    assert!(analyzer.aggregate(&[doc], date("2021-01-01")).rows.is_empty());
}

#[test]
fn in_force_boundaries() {
    let doc = Document::new("F2010L00001", "Banking Rules", "LegislativeInstrument", "must")
        .with_commencement("2010-07-01")
        .with_repeal("2020-07-01");
    let corpus = Analyzer::standard().unwrap().analyze(&[doc]);
    assert_eq!(corpus.aggregate(date("2010-06-30")).totals().document_count, 0);
    assert_eq!(corpus.aggregate(date("2010-07-01")).totals().document_count, 1);
    assert_eq!(corpus.aggregate(date("2020-06-30")).totals().document_count, 1);
    assert_eq!(corpus.aggregate(date("2020-07-01")).totals().document_count, 0);
}

#[test]
fn classification_is_idempotent() {
    let analyzer = Analyzer::standard().unwrap();
    let doc = Document::new("F2015L00001", "Radiocommunications (Spectrum) Determination 2015", "LegislativeInstrument", "A licensee must not transmit. Licensees shall register.");
    assert_eq!(analyzer.analyze_document(&doc), analyzer.analyze_document(&doc));
}

#[test]
fn malformed_json_fields_do_not_abort_the_batch() {
    let docs: Vec<Document> = serde_json::from_str(
        r#"[
            {"register_id": "C2001A00050", "title": "Corporations Act 2001", "collection": "act", "text": "shall"},
            {"register_id": 42, "title": null, "text": ["not", "text"], "collection": "Act"},
            {"id": "F2019L00001", "name": "Privacy Rules", "makingDate": "2019-03-01T00:00:00"}
        ]"#,
    )
    .unwrap();
    let corpus = Analyzer::standard().unwrap().analyze(&docs);
    assert_eq!(corpus.diagnostics.processed, 3);
    assert_eq!(corpus.diagnostics.missing_title, 1);
    // "42" carries no C/F year and no other date signal.
    assert_eq!(corpus.diagnostics.unresolved_dates, vec!["42"]);
    assert_eq!(corpus.aggregate(date("2020-01-01")).totals().document_count, 2);
}

#[test]
fn scraped_corpus_records_reach_the_snapshot() {
    let docs: Vec<Document> = serde_json::from_str(
        r#"[
            {"id": "C2001A00050", "register_id": "C2001A00050", "title": "Corporations Act 2001",
             "collection": "act", "text": "a person must not engage in conduct. directors shall report.",
             "text_length": 60, "download_links": {}, "fetched_at": "2025-01-14T10:22:31"},
            {"id": "F2006L09382", "register_id": "F2006L09382", "title": "Hospital Services Determination 2006",
             "collection": "legislativeinstrument", "text": "a hospital must keep records",
             "is_in_force": false, "making_date": "2006-11-20", "commencement_date": "2006-12-01",
             "repeal_date": "2015-03-01"}
        ]"#,
    )
    .unwrap();
    assert_eq!(docs[0].register_id, "C2001A00050");

    let corpus = Analyzer::standard().unwrap().analyze(&docs);
    assert!(corpus.diagnostics.unresolved_dates.is_empty());
    assert_eq!(corpus.diagnostics.flagged_not_in_force, 1);

    let corps = corpus.find("C2001A00050").unwrap();
    assert_eq!(corps.legislation_type, LegislationType::Primary);
    assert_eq!((corps.bc.total, corps.regdata.total), (1, 2));

    assert_eq!(corpus.aggregate(date("2010-07-01")).totals().document_count, 2);
    assert_eq!(corpus.aggregate(date("2015-07-01")).totals().document_count, 1);
}

#[test]
fn alternate_tables_change_behaviour() {
    let mut tables = ClassifierTables::standard();
    tables.bc.terms = vec!["will".into()];
    tables.bc.negations = vec!["will not".into()];
    tables.version = "test".into();
    let analyzer = Analyzer::new(&tables, &AnalysisConfig::default()).unwrap();
    assert_eq!(analyzer.bc().count("you will and you will not").total, 1);
    assert_eq!(analyzer.analyze(&[]).tables_version, "test");
}

fn sample_corpus() -> Vec<Document> {
    vec![
        Document::new("C2001A00050", "Corporations Act 2001", "act", "must shall required").with_commencement("2001-07-15"),
        Document::new("F2005L00001", "Banking Prudential Standard", "LegislativeInstrument", "must must may not")
            .with_commencement("2005-01-01"),
        Document::new("F2010L00002", "Hospital Rules", "LegislativeInstrument", "shall not prohibited")
            .with_commencement("2010-01-01")
            .with_repeal("2018-01-01"),
        Document::new("F2012L00003", "Mining Determination", "LegislativeInstrument", "required"),
        Document::new("F2003L00004", "Tariff Concession Order 1", "LegislativeInstrument", "must"),
        Document::new("C2015A00005", "Native Title Amendment Act", "act", "shall shall"),
        Document::new("", "Undated", "LegislativeInstrument", "must"),
    ]
}

proptest! {
    #[test]
    fn aggregation_is_order_independent(shuffled in Just(sample_corpus()).prop_shuffle()) {
        let analyzer = Analyzer::standard().unwrap();
        for reference in ["2004-07-01", "2012-07-01", "2020-07-01"] {
            let expected = analyzer.aggregate(&sample_corpus(), date(reference));
            let actual = analyzer.aggregate(&shuffled, date(reference));
            prop_assert_eq!(expected, actual);
        }
    }
}
