//! Effective commencement and repeal dates for legislative documents.
//!
//! Source metadata is patchy: status histories exist only for titles
//! fetched through the register API, explicit commencement and repeal
//! fields are often absent, and some records carry nothing but a register
//! identifier. Resolution walks a fixed fallback chain and reports which
//! link produced the commencement date.
//!
//! # Status-history chain
//!
//! Commencement:
//! 1. Earliest `InForce` entry in the status history
//! 2. `commencement_date` field
//! 3. `making_date` field
//! 4. Year embedded in the register id, as 1 January of that year
//!
//! Repeal comes only from a `Repealed` status entry or the `repeal_date`
//! field. It is never inferred from missing data.
//!
//! # Making-year chain
//!
//! The proxy used by the early analysis: commencement is 1 January of the
//! making year (register id first, then the making date) and repeal is
//! ignored entirely.

use chrono::{Datelike, NaiveDate};
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::Document;

lazy_static! {
    /// Four-digit making year after a leading `C` (Acts) or `F` (instruments).
    static ref REGISTER_YEAR: Regex = Regex::new(r"[CF](\d{4})").unwrap();
}

/// Which in-force heuristic the resolver applies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InForceStrategy {
    /// Status history, explicit fields, making date, register year; honours repeal.
    #[default]
    StatusHistory,
    /// Making year only; every document stays in force once made.
    MakingYear,
}

impl InForceStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::StatusHistory => "status_history",
            Self::MakingYear => "making_year",
        }
    }
}

/// Link of the fallback chain that produced a commencement date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommencementSource {
    StatusHistory,
    CommencementField,
    MakingDate,
    RegisterYear,
}

impl CommencementSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::StatusHistory => "status_history",
            Self::CommencementField => "commencement_field",
            Self::MakingDate => "making_date",
            Self::RegisterYear => "register_year",
        }
    }
}

/// Resolved dates for one document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EffectiveDates {
    pub commencement: NaiveDate,
    pub repeal: Option<NaiveDate>,
    pub source: CommencementSource,
}

impl EffectiveDates {
    /// Commenced on or before `date` and not repealed on or before it.
    pub fn in_force_at(&self, date: NaiveDate) -> bool {
        self.commencement <= date && self.repeal.is_none_or(|repeal| repeal > date)
    }
}

/// No date signal at all: the document cannot take part in temporal analysis.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("no usable date for {register_id:?}")]
pub struct UnresolvedDate {
    pub register_id: String,
}

/// Resolves [`EffectiveDates`] under a fixed [`InForceStrategy`].
#[derive(Debug, Clone, Copy, Default)]
pub struct DateResolver {
    strategy: InForceStrategy,
}

impl DateResolver {
    pub fn new(strategy: InForceStrategy) -> Self {
        Self { strategy }
    }

    pub fn strategy(&self) -> InForceStrategy {
        self.strategy
    }

    pub fn resolve(&self, doc: &Document) -> Result<EffectiveDates, UnresolvedDate> {
        let resolved = match self.strategy {
            InForceStrategy::StatusHistory => resolve_status_history(doc),
            InForceStrategy::MakingYear => resolve_making_year(doc),
        };
        resolved.ok_or_else(|| UnresolvedDate {
            register_id: doc.register_id.clone(),
        })
    }
}

fn resolve_status_history(doc: &Document) -> Option<EffectiveDates> {
    let (commencement, source) = earliest_status(doc, "InForce")
        .map(|d| (d, CommencementSource::StatusHistory))
        .or_else(|| {
            parse_date_opt(doc.commencement_date.as_deref())
                .map(|d| (d, CommencementSource::CommencementField))
        })
        .or_else(|| {
            parse_date_opt(doc.making_date.as_deref()).map(|d| (d, CommencementSource::MakingDate))
        })
        .or_else(|| {
            register_year(&doc.register_id)
                .and_then(january_first)
                .map(|d| (d, CommencementSource::RegisterYear))
        })?;

    let repeal = earliest_status(doc, "Repealed")
        .or_else(|| parse_date_opt(doc.repeal_date.as_deref()));

    Some(EffectiveDates {
        commencement,
        repeal,
        source,
    })
}

fn resolve_making_year(doc: &Document) -> Option<EffectiveDates> {
    let (year, source) = register_year(&doc.register_id)
        .map(|y| (y, CommencementSource::RegisterYear))
        .or_else(|| {
            parse_date_opt(doc.making_date.as_deref())
                .map(|d| (d.year(), CommencementSource::MakingDate))
        })?;

    Some(EffectiveDates {
        commencement: january_first(year)?,
        repeal: None,
        source,
    })
}

fn earliest_status(doc: &Document, status: &str) -> Option<NaiveDate> {
    doc.status_history
        .iter()
        .filter(|entry| entry.status.trim().eq_ignore_ascii_case(status))
        .filter_map(|entry| parse_date_opt(entry.start.as_deref()))
        .min()
}

fn parse_date_opt(s: Option<&str>) -> Option<NaiveDate> {
    s.and_then(parse_date)
}

fn january_first(year: i32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, 1, 1)
}

/// Parse an ISO-ish date: `2007-03-01`, `2007-03-01T00:00:00`, `2007-03-01T00:00:00Z`.
///
/// Only the leading `YYYY-MM-DD` is read; anything after it is ignored.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    let head = s.get(..10)?;
    head.parse::<NaiveDate>().ok()
}

/// Making year embedded in a register id (`C2007A00039` → 2007).
pub fn register_year(register_id: &str) -> Option<i32> {
    REGISTER_YEAR
        .captures(register_id)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

/// One reference date per year in `start_year..=end_year`, on `month`/`day`.
///
/// Years where the day does not exist (29 February) are skipped.
pub fn snapshot_dates(start_year: i32, end_year: i32, month: u32, day: u32) -> Vec<NaiveDate> {
    (start_year..=end_year)
        .filter_map(|year| NaiveDate::from_ymd_opt(year, month, day))
        .collect()
}

/// Financial-year snapshots on 1 July, as the time-series reports use.
pub fn july_snapshots(start_year: i32, end_year: i32) -> Vec<NaiveDate> {
    snapshot_dates(start_year, end_year, 7, 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        parse_date(s).unwrap()
    }

    fn resolver() -> DateResolver {
        DateResolver::new(InForceStrategy::StatusHistory)
    }

    #[test]
    fn parses_plain_and_timestamp_forms() {
        assert_eq!(parse_date("2007-03-01"), NaiveDate::from_ymd_opt(2007, 3, 1));
        assert_eq!(parse_date("2007-03-01T00:00:00"), NaiveDate::from_ymd_opt(2007, 3, 1));
        assert_eq!(parse_date("2007-03-01T10:00:00Z"), NaiveDate::from_ymd_opt(2007, 3, 1));
        assert_eq!(parse_date(" 2007-03-01 "), NaiveDate::from_ymd_opt(2007, 3, 1));
    }

    #[test]
    fn rejects_garbage_dates() {
        assert_eq!(parse_date(""), None);
        assert_eq!(parse_date("2007"), None);
        assert_eq!(parse_date("01/03/2007"), None);
        assert_eq!(parse_date("2007-13-01"), None);
    }

    #[test]
    fn register_year_extraction() {
        assert_eq!(register_year("C2007A00039"), Some(2007));
        assert_eq!(register_year("F2006L09382"), Some(2006));
        assert_eq!(register_year("xxF1998B0001"), Some(1998));
        assert_eq!(register_year("C20A"), None);
        assert_eq!(register_year(""), None);
        assert_eq!(register_year("c2007a00039"), None);
    }

    #[test]
    fn status_history_wins_over_fields() {
        let doc = Document::new("F2006L09382", "X Determination", "", "")
            .with_making_date("2006-12-01")
            .with_commencement("2007-02-01")
            .with_status("InForce", "2007-01-01T00:00:00")
            .with_status("Repealed", "2015-03-01T00:00:00")
            .with_repeal("2016-01-01");

        let dates = resolver().resolve(&doc).unwrap();
        assert_eq!(dates.commencement, date("2007-01-01"));
        assert_eq!(dates.repeal, Some(date("2015-03-01")));
        assert_eq!(dates.source, CommencementSource::StatusHistory);
    }

    #[test]
    fn earliest_in_force_entry_is_used() {
        let doc = Document::new("F2006L09382", "", "", "")
            .with_status("InForce", "2010-05-01")
            .with_status("InForce", "2007-01-01");
        assert_eq!(resolver().resolve(&doc).unwrap().commencement, date("2007-01-01"));
    }

    #[test]
    fn fallback_chain_order() {
        let base = Document::new("C2007A00039", "", "act", "");

        let with_commencement = base.clone().with_commencement("2007-07-01").with_making_date("2007-06-01");
        let d = resolver().resolve(&with_commencement).unwrap();
        assert_eq!((d.commencement, d.source), (date("2007-07-01"), CommencementSource::CommencementField));

        let with_making = base.clone().with_making_date("2007-06-01");
        let d = resolver().resolve(&with_making).unwrap();
        assert_eq!((d.commencement, d.source), (date("2007-06-01"), CommencementSource::MakingDate));

        let d = resolver().resolve(&base).unwrap();
        assert_eq!((d.commencement, d.source), (date("2007-01-01"), CommencementSource::RegisterYear));
    }

    #[test]
    fn unparseable_link_falls_through() {
        let doc = Document::new("C2007A00039", "", "act", "")
            .with_status("InForce", "unknown")
            .with_commencement("soon");
        let d = resolver().resolve(&doc).unwrap();
        assert_eq!(d.source, CommencementSource::RegisterYear);
    }

    #[test]
    fn no_signal_is_unresolved() {
        let doc = Document::new("not-an-id", "Mystery", "", "");
        let err = resolver().resolve(&doc).unwrap_err();
        assert_eq!(err.register_id, "not-an-id");
    }

    #[test]
    fn repeal_is_never_inferred() {
        let doc = Document::new("C1990A00001", "", "act", "").with_status("Ceased", "2000-01-01");
        let d = resolver().resolve(&doc).unwrap();
        assert_eq!(d.repeal, None);
        assert!(d.in_force_at(date("2099-01-01")));
    }

    #[test]
    fn in_force_bounds() {
        let dates = EffectiveDates {
            commencement: date("2010-07-01"),
            repeal: Some(date("2020-07-01")),
            source: CommencementSource::CommencementField,
        };
        assert!(!dates.in_force_at(date("2010-06-30")));
        // Inclusive at commencement.
        assert!(dates.in_force_at(date("2010-07-01")));
        assert!(dates.in_force_at(date("2020-06-30")));
        // Exclusive at repeal.
        assert!(!dates.in_force_at(date("2020-07-01")));
    }

    #[test]
    fn making_year_strategy_ignores_repeal_and_history() {
        let doc = Document::new("F2006L09382", "", "", "")
            .with_status("InForce", "2008-01-01")
            .with_repeal("2010-01-01");
        let d = DateResolver::new(InForceStrategy::MakingYear).resolve(&doc).unwrap();
        assert_eq!(d.commencement, date("2006-01-01"));
        assert_eq!(d.repeal, None);
        assert_eq!(d.source, CommencementSource::RegisterYear);
    }

    #[test]
    fn making_year_strategy_falls_back_to_making_date_year() {
        let doc = Document::new("legacy-17", "", "", "").with_making_date("1999-09-09");
        let d = DateResolver::new(InForceStrategy::MakingYear).resolve(&doc).unwrap();
        assert_eq!(d.commencement, date("1999-01-01"));
        assert_eq!(d.source, CommencementSource::MakingDate);
    }

    #[test]
    fn july_series() {
        let dates = july_snapshots(2010, 2012);
        assert_eq!(dates, vec![date("2010-07-01"), date("2011-07-01"), date("2012-07-01")]);
        assert!(july_snapshots(2012, 2010).is_empty());
    }

    #[test]
    fn leap_day_series_skips_missing_years() {
        assert_eq!(snapshot_dates(2019, 2021, 2, 29), vec![date("2020-02-29")]);
    }
}
