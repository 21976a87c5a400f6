//! Arrow `RecordBatch` builders for aggregate and per-document rows.

use std::sync::Arc;

use arrow::array::{Date32Builder, StringBuilder, UInt64Builder};
use arrow::record_batch::RecordBatch;
use chrono::{Datelike, NaiveDate};

use regstock_core::stock;

use crate::aggregate::{AnalyzedDocument, Snapshot};
use crate::AnalysisError;

/// Days from 0001-01-01 (CE day 1) to 1970-01-01.
const UNIX_EPOCH_DAYS_FROM_CE: i32 = 719_163;

/// Days since the Unix epoch, as Arrow `Date32` stores them.
pub fn date32(date: NaiveDate) -> i32 {
    date.num_days_from_ce() - UNIX_EPOCH_DAYS_FROM_CE
}

/// Rows of every snapshot, in snapshot order.
pub fn aggregate_batch(snapshots: &[Snapshot]) -> Result<RecordBatch, AnalysisError> {
    let mut reference_date = Date32Builder::new();
    let mut legislation_type = StringBuilder::new();
    let mut industry_code = StringBuilder::new();
    let mut industry_name = StringBuilder::new();
    let mut document_count = UInt64Builder::new();
    let mut bc_count = UInt64Builder::new();
    let mut regdata_count = UInt64Builder::new();

    for snapshot in snapshots {
        for row in &snapshot.rows {
            reference_date.append_value(date32(row.reference_date));
            legislation_type.append_value(row.legislation_type.as_str());
            industry_code.append_value(row.industry.letter().to_string());
            industry_name.append_value(row.industry.name());
            document_count.append_value(row.document_count);
            bc_count.append_value(row.bc_total);
            regdata_count.append_value(row.regdata_total);
        }
    }

    let batch = RecordBatch::try_new(
        Arc::new(stock::aggregate_schema()),
        vec![
            Arc::new(reference_date.finish()),
            Arc::new(legislation_type.finish()),
            Arc::new(industry_code.finish()),
            Arc::new(industry_name.finish()),
            Arc::new(document_count.finish()),
            Arc::new(bc_count.finish()),
            Arc::new(regdata_count.finish()),
        ],
    )?;
    Ok(batch)
}

/// One row per analysed document, excluded ones included.
pub fn document_batch(documents: &[AnalyzedDocument]) -> Result<RecordBatch, AnalysisError> {
    let mut register_id = StringBuilder::new();
    let mut title = StringBuilder::new();
    let mut legislation_type = StringBuilder::new();
    let mut subtype = StringBuilder::new();
    let mut subtype_group = StringBuilder::new();
    let mut industry_code = StringBuilder::new();
    let mut industry_confidence = StringBuilder::new();
    let mut bc_count = UInt64Builder::new();
    let mut regdata_count = UInt64Builder::new();
    let mut commencement = Date32Builder::new();
    let mut repeal = Date32Builder::new();
    let mut commencement_source = StringBuilder::new();
    let mut excluded_by = StringBuilder::new();

    for doc in documents {
        register_id.append_value(&doc.register_id);
        title.append_value(&doc.title);
        legislation_type.append_value(doc.legislation_type.as_str());
        subtype.append_value(&doc.subtype);
        subtype_group.append_value(doc.subtype_group.as_str());
        industry_code.append_value(doc.industry.code.letter().to_string());
        industry_confidence.append_value(doc.industry.confidence.as_str());
        bc_count.append_value(doc.bc.total);
        regdata_count.append_value(doc.regdata.total);
        match &doc.dates {
            Some(dates) => {
                commencement.append_value(date32(dates.commencement));
                repeal.append_option(dates.repeal.map(date32));
                commencement_source.append_value(dates.source.as_str());
            }
            None => {
                commencement.append_null();
                repeal.append_null();
                commencement_source.append_null();
            }
        }
        excluded_by.append_option(doc.excluded_by.as_deref());
    }

    let batch = RecordBatch::try_new(
        Arc::new(stock::document_schema()),
        vec![
            Arc::new(register_id.finish()),
            Arc::new(title.finish()),
            Arc::new(legislation_type.finish()),
            Arc::new(subtype.finish()),
            Arc::new(subtype_group.finish()),
            Arc::new(industry_code.finish()),
            Arc::new(industry_confidence.finish()),
            Arc::new(bc_count.finish()),
            Arc::new(regdata_count.finish()),
            Arc::new(commencement.finish()),
            Arc::new(repeal.finish()),
            Arc::new(commencement_source.finish()),
            Arc::new(excluded_by.finish()),
        ],
    )?;
    Ok(batch)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Analyzer;
    use arrow::array::{Array, Date32Array, StringArray, UInt64Array};
    use regstock_core::Document;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn date32_epoch() {
        assert_eq!(date32(date("1970-01-01")), 0);
        assert_eq!(date32(date("1970-01-02")), 1);
        assert_eq!(date32(date("1969-12-31")), -1);
    }

    #[test]
    fn aggregate_rows_to_batch() {
        let docs = vec![
            Document::new("C2001A00050", "Corporations Act 2001", "act", "directors shall report")
                .with_commencement("2001-07-15"),
            Document::new("F2010L00001", "Medical Board Rules", "LegislativeInstrument", "must")
                .with_making_date("2010-01-01"),
        ];
        let corpus = Analyzer::standard().unwrap().analyze(&docs);
        let series = corpus.time_series(&[date("2005-07-01"), date("2011-07-01")]);

        let batch = aggregate_batch(&series).unwrap();
        assert_eq!(batch.num_rows(), 3);
        assert_eq!(batch.schema().fields().len(), 7);

        let codes = batch
            .column_by_name("industry_code")
            .unwrap()
            .as_any()
            .downcast_ref::<StringArray>()
            .unwrap();
        assert_eq!(codes.value(0), "X");
        assert_eq!(codes.value(2), "Q");

        let dates = batch
            .column_by_name("reference_date")
            .unwrap()
            .as_any()
            .downcast_ref::<Date32Array>()
            .unwrap();
        assert_eq!(dates.value(0), date32(date("2005-07-01")));
        assert_eq!(dates.value(2), date32(date("2011-07-01")));
    }

    #[test]
    fn document_rows_keep_excluded_and_unresolved() {
        let docs = vec![
            Document::new("F2020L00001", "Airspace Regulations 2020", "LegislativeInstrument", "must"),
            Document::new("", "No Date Instrument", "LegislativeInstrument", "shall shall"),
        ];
        let corpus = Analyzer::standard().unwrap().analyze(&docs);
        let batch = document_batch(&corpus.documents).unwrap();
        assert_eq!(batch.num_rows(), 2);

        let excluded = batch.column_by_name("excluded_by").unwrap();
        assert!(!excluded.is_null(0));
        assert!(excluded.is_null(1));

        let commencement = batch.column_by_name("commencement").unwrap();
        assert!(!commencement.is_null(0));
        assert!(commencement.is_null(1));

        let bc = batch
            .column_by_name("bc_count")
            .unwrap()
            .as_any()
            .downcast_ref::<UInt64Array>()
            .unwrap();
        assert_eq!(bc.value(0), 1);
        assert_eq!(bc.value(1), 2);
    }

    #[test]
    fn empty_inputs() {
        assert_eq!(aggregate_batch(&[]).unwrap().num_rows(), 0);
        assert_eq!(document_batch(&[]).unwrap().num_rows(), 0);
    }
}
