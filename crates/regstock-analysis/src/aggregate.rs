//! In-force aggregation over a classified corpus.
//!
//! Classification, counting and date resolution do not depend on the
//! reference date, so [`Analyzer::analyze`] runs them once per document and
//! returns an [`AnalyzedCorpus`]. Every snapshot after that is a filter and
//! a group-by over the cached results.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;
use tracing::{debug, info};

use regstock_core::{
    AnalysisConfig, ClassifierTables, CommencementSource, DateResolver, Document, EffectiveDates,
    IndustryCode, InForceStrategy, LegislationType, SubtypeGroup, UnresolvedDate,
};

use crate::counters::{BcCounter, RegDataCounter, RequirementCount, RequirementCounter};
use crate::exclusion::ExclusionFilter;
use crate::industry::{IndustryClassification, IndustryClassifier};
use crate::legislation_type::TypeClassifier;
use crate::AnalysisError;

/// Everything derived from one document that does not depend on a reference date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnalyzedDocument {
    pub register_id: String,
    pub title: String,
    pub legislation_type: LegislationType,
    pub subtype: String,
    pub subtype_group: SubtypeGroup,
    pub industry: IndustryClassification,
    pub bc: RequirementCount,
    pub regdata: RequirementCount,
    /// `None` when no date signal could be found.
    pub dates: Option<EffectiveDates>,
    /// First matching exclusion category.
    pub excluded_by: Option<String>,
    /// Upstream advisory flag, copied for display.
    pub source_in_force: Option<bool>,
}

impl AnalyzedDocument {
    pub fn industry_code(&self) -> IndustryCode {
        self.industry.code
    }

    pub fn is_excluded(&self) -> bool {
        self.excluded_by.is_some()
    }

    /// Not excluded, dates resolved, and in force at `date`.
    pub fn counts_toward(&self, date: NaiveDate) -> bool {
        !self.is_excluded() && self.dates.as_ref().is_some_and(|d| d.in_force_at(date))
    }
}

/// Totals for one (legislation type, industry) group at one reference date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AggregateRow {
    pub reference_date: NaiveDate,
    pub legislation_type: LegislationType,
    pub industry: IndustryCode,
    pub document_count: u64,
    pub bc_total: u64,
    pub regdata_total: u64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Totals {
    pub document_count: u64,
    pub bc_total: u64,
    pub regdata_total: u64,
}

impl Totals {
    fn add(&mut self, doc: &AnalyzedDocument) {
        self.document_count += 1;
        self.bc_total += doc.bc.total;
        self.regdata_total += doc.regdata.total;
    }

    fn merge(&mut self, row: &AggregateRow) {
        self.document_count += row.document_count;
        self.bc_total += row.bc_total;
        self.regdata_total += row.regdata_total;
    }
}

/// Aggregate rows for one reference date, ordered by (type, industry).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Snapshot {
    pub reference_date: NaiveDate,
    pub rows: Vec<AggregateRow>,
}

impl Snapshot {
    pub fn totals(&self) -> Totals {
        let mut totals = Totals::default();
        for row in &self.rows {
            totals.merge(row);
        }
        totals
    }

    /// Collapse industries: Primary vs Secondary totals.
    pub fn by_type(&self) -> BTreeMap<LegislationType, Totals> {
        let mut out: BTreeMap<LegislationType, Totals> = BTreeMap::new();
        for row in &self.rows {
            out.entry(row.legislation_type).or_default().merge(row);
        }
        out
    }

    /// Collapse legislation types: totals per industry.
    pub fn by_industry(&self) -> BTreeMap<IndustryCode, Totals> {
        let mut out: BTreeMap<IndustryCode, Totals> = BTreeMap::new();
        for row in &self.rows {
            out.entry(row.industry).or_default().merge(row);
        }
        out
    }

    pub fn row(&self, legislation_type: LegislationType, industry: IndustryCode) -> Option<&AggregateRow> {
        self.rows
            .iter()
            .find(|r| r.legislation_type == legislation_type && r.industry == industry)
    }
}

/// Counters that make a discrepancy with an external total explainable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CorpusDiagnostics {
    pub processed: usize,
    pub excluded: BTreeMap<String, usize>,
    /// Register ids (or titles when the id is blank) with no date signal.
    pub unresolved_dates: Vec<String>,
    pub empty_text: usize,
    pub missing_title: usize,
    /// Documents the source marks as not currently in force.
    pub flagged_not_in_force: usize,
    pub commencement_sources: BTreeMap<CommencementSource, usize>,
}

impl CorpusDiagnostics {
    pub fn excluded_total(&self) -> usize {
        self.excluded.values().sum()
    }
}

/// Per-document results computed once, reusable across reference dates.
#[derive(Debug, Clone, Serialize)]
pub struct AnalyzedCorpus {
    pub strategy: InForceStrategy,
    pub tables_version: String,
    pub documents: Vec<AnalyzedDocument>,
    pub diagnostics: CorpusDiagnostics,
}

impl AnalyzedCorpus {
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn find(&self, register_id: &str) -> Option<&AnalyzedDocument> {
        self.documents
            .iter()
            .find(|d| d.register_id.eq_ignore_ascii_case(register_id))
    }

    /// Documents counted at `reference_date`, in corpus order.
    pub fn in_force(&self, reference_date: NaiveDate) -> impl Iterator<Item = &AnalyzedDocument> {
        self.documents
            .iter()
            .filter(move |d| d.counts_toward(reference_date))
    }

    pub fn aggregate(&self, reference_date: NaiveDate) -> Snapshot {
        let mut groups: BTreeMap<(LegislationType, IndustryCode), Totals> = BTreeMap::new();
        for doc in self.in_force(reference_date) {
            groups
                .entry((doc.legislation_type, doc.industry.code))
                .or_default()
                .add(doc);
        }

        let rows: Vec<AggregateRow> = groups
            .into_iter()
            .map(|((legislation_type, industry), totals)| AggregateRow {
                reference_date,
                legislation_type,
                industry,
                document_count: totals.document_count,
                bc_total: totals.bc_total,
                regdata_total: totals.regdata_total,
            })
            .collect();

        debug!(%reference_date, groups = rows.len(), "aggregated snapshot");
        Snapshot {
            reference_date,
            rows,
        }
    }

    pub fn time_series(&self, reference_dates: &[NaiveDate]) -> Vec<Snapshot> {
        reference_dates.iter().map(|d| self.aggregate(*d)).collect()
    }
}

/// Date resolution, exclusion, classification and counting, wired from one config.
pub struct Analyzer {
    strategy: InForceStrategy,
    tables_version: String,
    resolver: DateResolver,
    exclusion: ExclusionFilter,
    types: TypeClassifier,
    industry: IndustryClassifier,
    bc: BcCounter,
    regdata: RegDataCounter,
}

impl Analyzer {
    pub fn new(tables: &ClassifierTables, config: &AnalysisConfig) -> Result<Self, AnalysisError> {
        tables.validate()?;
        config.validate(tables)?;
        let exclusion = if config.excluded_categories.is_empty() {
            debug!("exclusion disabled");
            ExclusionFilter::none()
        } else {
            ExclusionFilter::new(tables, &config.excluded_categories)?
        };
        Ok(Self {
            strategy: config.strategy,
            tables_version: tables.version.clone(),
            resolver: DateResolver::new(config.strategy),
            exclusion,
            types: TypeClassifier::new(tables),
            industry: IndustryClassifier::new(tables, config.text_window)?,
            bc: BcCounter::new(&tables.bc)?,
            regdata: RegDataCounter::new(&tables.regdata)?,
        })
    }

    /// Built-in tables and default config.
    pub fn standard() -> Result<Self, AnalysisError> {
        Self::new(&ClassifierTables::standard(), &AnalysisConfig::default())
    }

    pub fn exclusion(&self) -> &ExclusionFilter {
        &self.exclusion
    }

    pub fn industry(&self) -> &IndustryClassifier {
        &self.industry
    }

    pub fn bc(&self) -> &BcCounter {
        &self.bc
    }

    pub fn regdata(&self) -> &RegDataCounter {
        &self.regdata
    }

    pub fn analyze_document(&self, doc: &Document) -> AnalyzedDocument {
        let kind = self.types.classify_type(doc);
        let dates = match self.resolver.resolve(doc) {
            Ok(dates) => Some(dates),
            Err(UnresolvedDate { register_id }) => {
                debug!(register_id = %register_id, "no date signal, skipping from snapshots");
                None
            }
        };
        AnalyzedDocument {
            register_id: doc.register_id.clone(),
            title: doc.title.clone(),
            legislation_type: kind.legislation_type,
            subtype: kind.subtype,
            subtype_group: kind.group,
            industry: self.industry.classify(&doc.title, &doc.text),
            bc: self.bc.count(&doc.text),
            regdata: self.regdata.count(&doc.text),
            dates,
            excluded_by: self.exclusion.evaluate(doc).map(str::to_string),
            source_in_force: doc.is_in_force,
        }
    }

    /// Analyse every document once. Never fails on an individual record.
    pub fn analyze(&self, documents: &[Document]) -> AnalyzedCorpus {
        let mut diagnostics = CorpusDiagnostics {
            processed: documents.len(),
            ..Default::default()
        };
        for name in self.exclusion.category_names() {
            diagnostics.excluded.insert(name.to_string(), 0);
        }

        let mut analyzed = Vec::with_capacity(documents.len());
        for doc in documents {
            let result = self.analyze_document(doc);

            if let Some(category) = &result.excluded_by {
                *diagnostics.excluded.entry(category.clone()).or_insert(0) += 1;
            }
            match &result.dates {
                Some(dates) => *diagnostics.commencement_sources.entry(dates.source).or_insert(0) += 1,
                None => diagnostics.unresolved_dates.push(if doc.register_id.is_empty() {
                    doc.title.clone()
                } else {
                    doc.register_id.clone()
                }),
            }
            if !doc.has_text() {
                diagnostics.empty_text += 1;
            }
            if !doc.has_title() {
                diagnostics.missing_title += 1;
            }
            if doc.is_in_force == Some(false) {
                diagnostics.flagged_not_in_force += 1;
            }
            analyzed.push(result);
        }

        info!(
            processed = diagnostics.processed,
            excluded = diagnostics.excluded_total(),
            unresolved_dates = diagnostics.unresolved_dates.len(),
            empty_text = diagnostics.empty_text,
            strategy = self.strategy.as_str(),
            "analysed corpus"
        );

        AnalyzedCorpus {
            strategy: self.strategy,
            tables_version: self.tables_version.clone(),
            documents: analyzed,
            diagnostics,
        }
    }

    /// One-shot aggregation of `documents` at `reference_date`.
    pub fn aggregate(&self, documents: &[Document], reference_date: NaiveDate) -> Snapshot {
        self.analyze(documents).aggregate(reference_date)
    }
}
