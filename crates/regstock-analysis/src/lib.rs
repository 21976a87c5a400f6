//! Analysis layer: exclusion, type and industry classification, requirement
//! counting, and in-force aggregation over a document corpus.

pub mod aggregate;
pub mod counters;
mod error;
pub mod exclusion;
pub mod export;
pub mod industry;
pub mod legislation_type;

pub use aggregate::{
    AggregateRow, AnalyzedCorpus, AnalyzedDocument, Analyzer, CorpusDiagnostics, Snapshot, Totals,
};
pub use counters::{BcCounter, RegDataCounter, RequirementCount, RequirementCounter};
pub use error::AnalysisError;
pub use exclusion::ExclusionFilter;
pub use industry::{Confidence, IndustryClassification, IndustryClassifier};
pub use legislation_type::{TypeClassification, TypeClassifier};
