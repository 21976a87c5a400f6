pub mod config;
pub mod dates;
pub mod document;
pub mod error;
pub mod schema;
pub mod tables;
pub mod taxonomy;

pub use config::AnalysisConfig;
pub use dates::{CommencementSource, DateResolver, EffectiveDates, InForceStrategy, UnresolvedDate};
pub use document::{Document, StatusEntry};
pub use error::CoreError;
pub use schema::stock;
pub use tables::{ClassifierTables, MatchKind, SubtypeGroup, TitleRule};
pub use taxonomy::{IndustryCode, LegislationType};
