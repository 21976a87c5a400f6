//! In-memory document store loaded from the scraper's JSON output.

use std::path::Path;

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, warn};

use regstock_core::Document;

use crate::StoreError;

/// Top-level JSON shape the corpus arrived in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Envelope {
    /// `[ {...}, {...} ]`
    BareArray,
    /// `{"regulations": [ ... ], ...}`
    Regulations,
}

/// What happened while loading: how many records were usable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoadReport {
    pub envelope: Envelope,
    pub records: usize,
    pub loaded: usize,
    /// Records that were not JSON objects and were dropped.
    pub malformed: usize,
}

/// Normalised, read-only corpus.
///
/// Record-level problems never fail the load: fields with the wrong JSON
/// type decode as empty, and non-object records are counted in the
/// [`LoadReport`] and skipped.
#[derive(Debug, Clone)]
pub struct DocumentStore {
    documents: Vec<Document>,
    report: LoadReport,
}

impl DocumentStore {
    /// Load a corpus JSON file.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        if !path.exists() {
            return Err(StoreError::CorpusNotFound(path.to_path_buf()));
        }
        let raw = std::fs::read_to_string(path)?;
        let store = Self::from_json_str(&raw)?;
        info!(
            path = %path.display(),
            loaded = store.report.loaded,
            malformed = store.report.malformed,
            "loaded corpus"
        );
        Ok(store)
    }

    pub fn from_json_str(raw: &str) -> Result<Self, StoreError> {
        let value: Value = serde_json::from_str(raw)?;
        Self::from_value(value)
    }

    pub fn from_value(value: Value) -> Result<Self, StoreError> {
        let (envelope, records) = match value {
            Value::Array(records) => (Envelope::BareArray, records),
            Value::Object(mut map) => match map.remove("regulations") {
                Some(Value::Array(records)) => (Envelope::Regulations, records),
                Some(_) => {
                    return Err(StoreError::Envelope("\"regulations\" is not an array".into()));
                }
                None => {
                    return Err(StoreError::Envelope(
                        "expected an array or an object with a \"regulations\" array".into(),
                    ));
                }
            },
            _ => return Err(StoreError::Envelope("expected an array or an object".into())),
        };

        let total = records.len();
        let mut documents = Vec::with_capacity(total);
        let mut malformed = 0;
        for (idx, record) in records.into_iter().enumerate() {
            if !record.is_object() {
                debug!(idx, "skipping non-object record");
                malformed += 1;
                continue;
            }
            match serde_json::from_value::<Document>(record) {
                Ok(doc) => documents.push(doc),
                Err(e) => {
                    warn!(idx, error = %e, "skipping undecodable record");
                    malformed += 1;
                }
            }
        }

        let report = LoadReport {
            envelope,
            records: total,
            loaded: documents.len(),
            malformed,
        };
        Ok(Self { documents, report })
    }

    pub fn from_documents(documents: Vec<Document>) -> Self {
        let report = LoadReport {
            envelope: Envelope::BareArray,
            records: documents.len(),
            loaded: documents.len(),
            malformed: 0,
        };
        Self { documents, report }
    }

    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    pub fn report(&self) -> &LoadReport {
        &self.report
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Case-insensitive lookup by register id.
    pub fn get(&self, register_id: &str) -> Option<&Document> {
        self.documents
            .iter()
            .find(|d| d.register_id.eq_ignore_ascii_case(register_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use regstock_core::{CommencementSource, DateResolver, InForceStrategy};

    // Record shape written by the scraper: `id` and `register_id` side by
    // side, plus bookkeeping fields the store ignores.
    const SCRAPED: &str = r#"{
        "id": "C2001A00050",
        "register_id": "C2001A00050",
        "title": "Corporations Act 2001",
        "collection": "act",
        "url": "https://www.legislation.gov.au/C2001A00050",
        "text": "a person must not engage in conduct. directors shall report.",
        "text_length": 60,
        "download_links": {"word": "https://example.invalid/doc.docx"},
        "fetched_at": "2025-01-14T10:22:31.123456",
        "year": 2001,
        "department": "Treasury"
    }"#;

    // Same record after the register metadata refresh.
    const REFRESHED: &str = r#"{
        "id": "F2006L09382",
        "register_id": "F2006L09382",
        "title": "Customs (Prohibited Exports) Determination 2006",
        "collection": "legislativeinstrument",
        "text": "an exporter must hold a permit",
        "text_length": 30,
        "download_links": {},
        "fetched_at": "2025-01-14T10:22:31",
        "is_in_force": false,
        "making_date": "2006-11-20T00:00:00",
        "commencement_date": "2006-12-01T00:00:00",
        "repeal_date": "2015-03-01T00:00:00",
        "is_principal": true,
        "api_updated_at": "2025-02-01T09:00:00"
    }"#;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn scraper_records_load() {
        let raw = format!(r#"{{"regulations": [{SCRAPED}, {REFRESHED}]}}"#);
        let store = DocumentStore::from_json_str(&raw).unwrap();
        assert_eq!(store.report().loaded, 2);
        assert_eq!(store.report().malformed, 0);

        let corps = store.get("C2001A00050").unwrap();
        assert_eq!(corps.title, "Corporations Act 2001");
        assert_eq!(corps.collection, "act");
        assert!(corps.text.contains("directors shall report"));
    }

    #[test]
    fn refreshed_metadata_resolves_dates() {
        let raw = format!("[{SCRAPED}, {REFRESHED}]");
        let store = DocumentStore::from_json_str(&raw).unwrap();
        let resolver = DateResolver::new(InForceStrategy::StatusHistory);

        let customs = store.get("F2006L09382").unwrap();
        assert_eq!(customs.is_in_force, Some(false));
        let dates = resolver.resolve(customs).unwrap();
        assert_eq!(dates.commencement, date("2006-12-01"));
        assert_eq!(dates.repeal, Some(date("2015-03-01")));
        assert_eq!(dates.source, CommencementSource::CommencementField);
        assert!(dates.in_force_at(date("2010-07-01")));
        assert!(!dates.in_force_at(date("2015-03-01")));

        // No date metadata at all: falls back to the register-id year.
        let corps = resolver.resolve(store.get("C2001A00050").unwrap()).unwrap();
        assert_eq!(corps.commencement, date("2001-01-01"));
        assert_eq!(corps.source, CommencementSource::RegisterYear);
    }

    #[test]
    fn bare_array() {
        let store = DocumentStore::from_json_str(
            r#"[{"register_id": "C2001A00050", "title": "Corporations Act 2001", "collection": "act"}]"#,
        )
        .unwrap();
        assert_eq!(store.len(), 1);
        assert_eq!(store.report().envelope, Envelope::BareArray);
        assert_eq!(store.get("c2001a00050").unwrap().title, "Corporations Act 2001");
    }

    #[test]
    fn regulations_envelope() {
        let store = DocumentStore::from_json_str(
            r#"{"scraped_at": "2025-01-01", "regulations": [{"id": "F2006L09382", "name": "A Determination"}]}"#,
        )
        .unwrap();
        assert_eq!(store.report().envelope, Envelope::Regulations);
        assert_eq!(store.documents()[0].register_id, "F2006L09382");
    }

    #[test]
    fn non_object_records_are_counted() {
        let store = DocumentStore::from_json_str(r#"[{"title": "ok"}, 42, "text", null, {"title": "also ok"}]"#).unwrap();
        assert_eq!(
            store.report(),
            &LoadReport {
                envelope: Envelope::BareArray,
                records: 5,
                loaded: 2,
                malformed: 3,
            }
        );
    }

    #[test]
    fn unknown_envelope() {
        let err = DocumentStore::from_json_str(r#"{"documents": []}"#).unwrap_err();
        assert!(matches!(err, StoreError::Envelope(_)));
        assert!(DocumentStore::from_json_str("17").is_err());
    }

    #[test]
    fn invalid_json() {
        assert!(matches!(DocumentStore::from_json_str("[{"), Err(StoreError::Json(_))));
    }

    #[test]
    fn open_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("corpus.json");
        std::fs::write(&path, r#"{"regulations": [{"title": "x"}, {"title": "y"}]}"#).unwrap();
        assert_eq!(DocumentStore::open(&path).unwrap().len(), 2);

        let missing = dir.path().join("missing.json");
        assert!(matches!(DocumentStore::open(&missing), Err(StoreError::CorpusNotFound(_))));
    }
}
