//! Title-based exclusion categories applied before every aggregation.

use regstock_core::tables::ExclusionCategory;
use regstock_core::{ClassifierTables, Document};

use crate::AnalysisError;

/// OR-combination of named title predicates.
///
/// Categories are evaluated in table order so the first match can be
/// reported; the order never changes whether a document is excluded.
#[derive(Debug, Clone)]
pub struct ExclusionFilter {
    categories: Vec<ExclusionCategory>,
}

impl ExclusionFilter {
    /// Filter applying the named categories from `tables`.
    pub fn new(tables: &ClassifierTables, enabled: &[String]) -> Result<Self, AnalysisError> {
        let mut categories = Vec::with_capacity(enabled.len());
        for category in &tables.exclusions {
            if enabled.contains(&category.name) {
                categories.push(category.clone());
            }
        }
        if let Some(unknown) = enabled
            .iter()
            .find(|name| !tables.exclusions.iter().any(|c| &c.name == *name))
        {
            return Err(AnalysisError::UnknownCategory(unknown.clone()));
        }
        Ok(Self { categories })
    }

    /// Filter that excludes nothing.
    pub fn none() -> Self {
        Self {
            categories: Vec::new(),
        }
    }

    pub fn category_names(&self) -> Vec<&str> {
        self.categories.iter().map(|c| c.name.as_str()).collect()
    }

    /// Name of the first category matching the title, if any.
    pub fn evaluate_title(&self, title: &str) -> Option<&str> {
        let lower = title.to_lowercase();
        self.categories
            .iter()
            .find(|category| category.rules.iter().any(|rule| rule.matches(title, &lower)))
            .map(|category| category.name.as_str())
    }

    pub fn evaluate(&self, doc: &Document) -> Option<&str> {
        self.evaluate_title(&doc.title)
    }

    pub fn is_excluded(&self, doc: &Document) -> bool {
        self.evaluate(doc).is_some()
    }
}
