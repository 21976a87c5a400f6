//! Primary/Secondary type and the ordered subtype cascade.

use serde::Serialize;

use regstock_core::tables::{SubtypeRule, SubtypeTest};
use regstock_core::{ClassifierTables, Document, LegislationType, SubtypeGroup};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TypeClassification {
    pub legislation_type: LegislationType,
    pub subtype: String,
    pub group: SubtypeGroup,
}

/// First-match-wins cascade over an explicit `(test, label)` list.
#[derive(Debug, Clone)]
pub struct TypeClassifier {
    rules: Vec<SubtypeRule>,
    default_subtype: String,
}

impl TypeClassifier {
    pub fn new(tables: &ClassifierTables) -> Self {
        Self {
            rules: tables.subtypes.clone(),
            default_subtype: tables.default_subtype.clone(),
        }
    }

    pub fn rules(&self) -> &[SubtypeRule] {
        &self.rules
    }

    pub fn classify_type(&self, doc: &Document) -> TypeClassification {
        let legislation_type = LegislationType::from_collection(&doc.collection);
        let (subtype, group) = self.subtype(&doc.title, legislation_type);
        TypeClassification {
            legislation_type,
            subtype,
            group,
        }
    }

    /// Subtype label and group for a title of the given type.
    pub fn subtype(&self, title: &str, legislation_type: LegislationType) -> (String, SubtypeGroup) {
        let lower = title.to_lowercase();
        self.rules
            .iter()
            .find(|rule| match &rule.test {
                SubtypeTest::Title(title_rule) => title_rule.matches(title, &lower),
                SubtypeTest::IsAct => legislation_type == LegislationType::Primary,
            })
            .map(|rule| (rule.label.clone(), rule.group))
            .unwrap_or_else(|| (self.default_subtype.clone(), SubtypeGroup::StandardInstruments))
    }
}
