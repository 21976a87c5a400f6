//! Versioned keyword and phrase tables driving every classifier.
//!
//! The `const` tables below are the built-in data set. They are turned into
//! an owned [`ClassifierTables`] once at start-up and handed to classifier
//! constructors; alternate tables (tests, experiments) can be loaded from
//! JSON with the same shape.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{CoreError, IndustryCode};

/// Version tag of the built-in tables. Bump on any list change.
pub const TABLES_VERSION: &str = "2026.1";

/// Exclusion category for titles with the exclusive subject matter of civil aviation.
pub const CIVIL_AVIATION: &str = "civil_aviation";
/// Exclusion category for Tariff Concession Orders.
pub const TARIFF_CONCESSION: &str = "tariff_concession";

// ── Industry divisions ──

/// Division keyword lists in scoring order. The first maximum wins ties, so
/// this order is part of the classification contract.
pub const DIVISION_KEYWORDS: &[(IndustryCode, &[&str])] = &[
    (
        IndustryCode::O,
        &[
            "government", "public administration", "defence", "defense", "national security",
            "intelligence", "military", "ADF", "AFP", "ASIO", "police", "law enforcement",
            "emergency", "fire service", "correctional", "prison", "border", "customs",
            "immigration", "public service", "commonwealth", "federal", "minister",
        ],
    ),
    (
        IndustryCode::Q,
        &[
            "health", "medical", "hospital", "healthcare", "patient", "pharmaceutical",
            "medicine", "therapy", "therapeutic", "drug", "aged care", "disability",
            "mental health", "medicare", "PBS", "NDIS", "nursing", "dental", "pathology",
            "diagnostic",
        ],
    ),
    (
        IndustryCode::K,
        &[
            "banking", "bank", "financial", "insurance", "credit", "loan", "investment", "fund",
            "superannuation", "pension", "APRA", "ASIC", "prudential", "ADI", "securities",
            "money", "currency", "payment",
        ],
    ),
    (
        IndustryCode::D,
        &[
            "electricity", "electric", "power", "energy", "gas", "water", "waste", "sewage",
            "renewable", "solar", "wind", "hydro", "nuclear", "grid", "transmission",
            "pipeline", "utility",
        ],
    ),
    (
        IndustryCode::I,
        &[
            "transport", "maritime", "shipping", "rail", "road", "port", "cargo", "freight",
            "passenger", "navigation", "seafarer", "postal", "mail", "logistics", "vehicle",
        ],
    ),
    (
        IndustryCode::J,
        &[
            "telecommunications", "broadcasting", "media", "internet", "television", "radio",
            "radiocommunications", "spectrum", "mobile", "telephone", "broadband",
            "communications", "digital",
        ],
    ),
    (
        IndustryCode::A,
        &[
            "agriculture", "farming", "farm", "crop", "livestock", "cattle", "sheep", "dairy",
            "poultry", "fishing", "fisheries", "aquaculture", "forestry", "timber", "rural",
            "primary producer", "grain", "beef", "wool", "wheat", "vineyard", "biosecurity",
            "quarantine",
        ],
    ),
    (
        IndustryCode::B,
        &[
            "mining", "mine", "mineral", "coal", "iron ore", "gold", "copper", "uranium",
            "petroleum", "oil", "gas", "exploration", "extraction", "quarry", "resources",
            "offshore", "drilling", "seismic",
        ],
    ),
    (
        IndustryCode::C,
        &[
            "manufacturing", "factory", "industrial", "processing", "automotive", "chemical",
            "textile", "machinery", "equipment",
        ],
    ),
    (
        IndustryCode::P,
        &[
            "education", "school", "university", "training", "student", "teacher", "academic",
            "higher education", "tertiary", "vocational", "TAFE", "qualification", "curriculum",
        ],
    ),
    (
        IndustryCode::E,
        &[
            "construction", "building", "infrastructure", "contractor", "architect", "builder",
            "project", "site", "development",
        ],
    ),
    (
        IndustryCode::R,
        &[
            "arts", "culture", "recreation", "sport", "entertainment", "museum", "library",
            "heritage", "creative", "gambling", "gaming", "lottery", "national park",
            "environment",
        ],
    ),
    (
        IndustryCode::F,
        &["wholesale", "import", "export", "trade", "dealer", "distributor"],
    ),
    (
        IndustryCode::G,
        &["retail", "shop", "store", "consumer", "merchandise"],
    ),
    (
        IndustryCode::H,
        &[
            "hotel", "accommodation", "tourism", "restaurant", "food service", "hospitality",
            "catering", "tourist", "visitor",
        ],
    ),
    (
        IndustryCode::L,
        &[
            "rental", "lease", "property", "real estate", "land", "housing", "tenancy",
            "landlord", "native title",
        ],
    ),
    (
        IndustryCode::M,
        &[
            "professional", "consulting", "technical", "scientific", "research", "legal",
            "accounting", "veterinary", "design",
        ],
    ),
    (
        IndustryCode::N,
        &[
            "administrative", "support services", "staffing", "recruitment", "office",
            "security services", "cleaning", "maintenance",
        ],
    ),
    (
        IndustryCode::S,
        &[
            "repair", "personal", "community", "religious", "civic", "union", "association",
            "organisation",
        ],
    ),
];

/// Broad-application indicators, tested only when no division scores.
pub const CROSS_CUTTING_KEYWORDS: &[&str] = &[
    "corporations", "competition", "consumer", "workplace", "employment", "fair work",
    "privacy", "taxation", "GST", "income tax",
];

// ── Title rules ──

/// Aviation title rules with their subtype labels. Shared by the civil
/// aviation exclusion and the subtype cascade so the two never drift.
pub const AVIATION_RULES: &[(MatchKind, &str, &str)] = &[
    (MatchKind::ContainsExact, "AD/", "Aviation - Airworthiness Directive"),
    (MatchKind::Prefix, "ad/", "Aviation - Airworthiness Directive"),
    (MatchKind::ContainsExact, "CAO ", "Aviation - Civil Aviation Order"),
    (MatchKind::Prefix, "cao ", "Aviation - Civil Aviation Order"),
    (MatchKind::Contains, "casa ", "Aviation - CASA Instrument"),
    (MatchKind::Contains, "civil aviation safety", "Aviation - CASA Instrument"),
    (MatchKind::Contains, "civil aviation", "Aviation - Civil Aviation"),
    (MatchKind::Contains, "aviation transport security", "Aviation - Transport Security"),
    (MatchKind::Contains, "airspace", "Aviation - Airspace"),
    (MatchKind::Contains, "aircraft noise", "Aviation - Aircraft Noise"),
    (MatchKind::Contains, "air navigation", "Aviation - Air Navigation"),
    (MatchKind::Contains, "airworthiness", "Aviation - Airworthiness"),
    (MatchKind::Contains, "manual of standards part", "Aviation - Manual of Standards"),
];

/// Named administrative and sector categories, checked after aviation.
/// Every phrase in an entry must be present.
pub const NAMED_CATEGORY_RULES: &[(&[&str], &str, SubtypeGroup)] = &[
    (&["tariff concession"], "Tariff Concession Order", SubtypeGroup::Administrative),
    (&["statement of principles"], "Statement of Principles (RMA)", SubtypeGroup::Administrative),
    (&["licence area plan"], "Licence Area Plan", SubtypeGroup::Administrative),
    (&["native title"], "Native Title", SubtypeGroup::SectorSpecific),
    (&["superannuation", "family law"], "Superannuation Family Law", SubtypeGroup::Administrative),
    (&["biosecurity"], "Biosecurity", SubtypeGroup::SectorSpecific),
    (&["therapeutic goods"], "Therapeutic Goods", SubtypeGroup::SectorSpecific),
    (&["export control"], "Export Control", SubtypeGroup::SectorSpecific),
];

/// Generic instrument keywords, checked after the `Act` rule.
pub const INSTRUMENT_TYPE_RULES: &[(&str, &str)] = &[
    (" regulation", "Regulation"),
    (" determination", "Determination"),
    (" order", "Order"),
    (" rules", "Rules"),
    (" direction", "Direction"),
    (" notice", "Notice"),
    (" declaration", "Declaration"),
    (" standard", "Standard"),
    ("exemption", "Exemption"),
    ("approval", "Approval"),
    (" instrument", "Instrument"),
    ("proclamation", "Proclamation"),
];

pub const ACT_SUBTYPE: &str = "Act";
pub const DEFAULT_SUBTYPE: &str = "Other Instrument";

// ── Requirement terms ──

pub const BC_TERMS: &[&str] = &["must", "shall", "required"];
/// Negated phrases masked before BC counting.
pub const BC_NEGATIONS: &[&str] = &[
    "must not",
    "shall not",
    "must never",
    "shall never",
    "not required",
    "no longer required",
];

/// Phrases RegData counts (and masks) before single words.
pub const REGDATA_PHRASES: &[&str] = &["may not"];
pub const REGDATA_TERMS: &[&str] = &["shall", "must", "required", "prohibited"];

// ── Owned tables ──

/// How a title phrase is compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchKind {
    /// Lower-cased title starts with the lower-cased phrase.
    Prefix,
    /// Lower-cased title contains the lower-cased phrase.
    Contains,
    /// Raw title contains the phrase exactly (case-sensitive).
    ContainsExact,
}

/// All phrases must match under `kind`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TitleRule {
    pub kind: MatchKind,
    pub phrases: Vec<String>,
}

impl TitleRule {
    pub fn new(kind: MatchKind, phrase: &str) -> Self {
        Self {
            kind,
            phrases: vec![phrase.to_string()],
        }
    }

    pub fn all_of(kind: MatchKind, phrases: &[&str]) -> Self {
        Self {
            kind,
            phrases: phrases.iter().map(|p| p.to_string()).collect(),
        }
    }

    /// `title_lower` must be `title.to_lowercase()`; callers lower-case once per document.
    pub fn matches(&self, title: &str, title_lower: &str) -> bool {
        !self.phrases.is_empty()
            && self.phrases.iter().all(|phrase| match self.kind {
                MatchKind::Prefix => title_lower.starts_with(&phrase.to_lowercase()),
                MatchKind::Contains => title_lower.contains(&phrase.to_lowercase()),
                MatchKind::ContainsExact => title.contains(phrase.as_str()),
            })
    }
}

/// Dashboard grouping of subtype labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubtypeGroup {
    Aviation,
    Administrative,
    SectorSpecific,
    StandardInstruments,
}

impl SubtypeGroup {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Aviation => "Aviation",
            Self::Administrative => "Administrative",
            Self::SectorSpecific => "Sector-Specific",
            Self::StandardInstruments => "Standard Instruments",
        }
    }
}

/// Test applied by one step of the subtype cascade.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubtypeTest {
    Title(TitleRule),
    /// Collection is `act`.
    IsAct,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubtypeRule {
    pub test: SubtypeTest,
    pub label: String,
    pub group: SubtypeGroup,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExclusionCategory {
    pub name: String,
    pub rules: Vec<TitleRule>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DivisionTable {
    pub code: IndustryCode,
    pub keywords: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BcTerms {
    pub terms: Vec<String>,
    pub negations: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegDataTerms {
    pub phrases: Vec<String>,
    pub terms: Vec<String>,
}

/// Every list the classifiers and counters need, as one immutable value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassifierTables {
    pub version: String,
    pub divisions: Vec<DivisionTable>,
    pub cross_cutting: Vec<String>,
    pub exclusions: Vec<ExclusionCategory>,
    pub subtypes: Vec<SubtypeRule>,
    pub default_subtype: String,
    pub bc: BcTerms,
    pub regdata: RegDataTerms,
}

impl Default for ClassifierTables {
    fn default() -> Self {
        Self::standard()
    }
}

impl ClassifierTables {
    /// The built-in tables at [`TABLES_VERSION`].
    pub fn standard() -> Self {
        let divisions = DIVISION_KEYWORDS
            .iter()
            .map(|(code, keywords)| DivisionTable {
                code: *code,
                keywords: strings(keywords),
            })
            .collect();

        let aviation: Vec<TitleRule> = AVIATION_RULES
            .iter()
            .map(|(kind, phrase, _)| TitleRule::new(*kind, phrase))
            .collect();

        let exclusions = vec![
            ExclusionCategory {
                name: CIVIL_AVIATION.to_string(),
                rules: aviation,
            },
            ExclusionCategory {
                name: TARIFF_CONCESSION.to_string(),
                rules: vec![TitleRule::new(MatchKind::Contains, "tariff concession")],
            },
        ];

        let mut subtypes: Vec<SubtypeRule> = AVIATION_RULES
            .iter()
            .map(|(kind, phrase, label)| SubtypeRule {
                test: SubtypeTest::Title(TitleRule::new(*kind, phrase)),
                label: label.to_string(),
                group: SubtypeGroup::Aviation,
            })
            .collect();
        subtypes.extend(NAMED_CATEGORY_RULES.iter().map(|(phrases, label, group)| SubtypeRule {
            test: SubtypeTest::Title(TitleRule::all_of(MatchKind::Contains, phrases)),
            label: label.to_string(),
            group: *group,
        }));
        subtypes.push(SubtypeRule {
            test: SubtypeTest::IsAct,
            label: ACT_SUBTYPE.to_string(),
            group: SubtypeGroup::StandardInstruments,
        });
        subtypes.extend(INSTRUMENT_TYPE_RULES.iter().map(|(phrase, label)| SubtypeRule {
            test: SubtypeTest::Title(TitleRule::new(MatchKind::Contains, phrase)),
            label: label.to_string(),
            group: SubtypeGroup::StandardInstruments,
        }));

        Self {
            version: TABLES_VERSION.to_string(),
            divisions,
            cross_cutting: strings(CROSS_CUTTING_KEYWORDS),
            exclusions,
            subtypes,
            default_subtype: DEFAULT_SUBTYPE.to_string(),
            bc: BcTerms {
                terms: strings(BC_TERMS),
                negations: strings(BC_NEGATIONS),
            },
            regdata: RegDataTerms {
                phrases: strings(REGDATA_PHRASES),
                terms: strings(REGDATA_TERMS),
            },
        }
    }

    /// Load tables from a JSON file with the same shape as [`ClassifierTables`].
    pub fn from_json_file(path: &Path) -> Result<Self, CoreError> {
        if !path.exists() {
            return Err(CoreError::ConfigNotFound(path.to_path_buf()));
        }
        let raw = std::fs::read_to_string(path)?;
        let tables: Self = serde_json::from_str(&raw)?;
        tables.validate()?;
        debug!(path = %path.display(), version = %tables.version, divisions = tables.divisions.len(), "loaded classifier tables");
        Ok(tables)
    }

    /// Structural checks that would otherwise surface as silent misclassification.
    pub fn validate(&self) -> Result<(), CoreError> {
        let mut seen = Vec::with_capacity(self.divisions.len());
        for division in &self.divisions {
            if !division.code.is_division() {
                return Err(CoreError::InvalidTables(format!(
                    "{} is not an ANZSIC division",
                    division.code
                )));
            }
            if seen.contains(&division.code) {
                return Err(CoreError::InvalidTables(format!(
                    "division {} listed twice",
                    division.code
                )));
            }
            if division.keywords.iter().all(|k| k.trim().is_empty()) {
                return Err(CoreError::InvalidTables(format!(
                    "division {} has no keywords",
                    division.code
                )));
            }
            seen.push(division.code);
        }
        for category in &self.exclusions {
            if category.name.trim().is_empty() || category.rules.is_empty() {
                return Err(CoreError::InvalidTables(format!(
                    "exclusion category {:?} needs a name and at least one rule",
                    category.name
                )));
            }
        }
        if self.bc.terms.is_empty() || self.regdata.terms.is_empty() {
            return Err(CoreError::InvalidTables("requirement term lists must not be empty".into()));
        }
        Ok(())
    }

    /// Names of all exclusion categories in evaluation order.
    pub fn exclusion_names(&self) -> Vec<&str> {
        self.exclusions.iter().map(|c| c.name.as_str()).collect()
    }

    /// Group of a subtype label; the default label counts as a standard instrument.
    pub fn subtype_group(&self, label: &str) -> SubtypeGroup {
        self.subtypes
            .iter()
            .find(|rule| rule.label == label)
            .map(|rule| rule.group)
            .unwrap_or(SubtypeGroup::StandardInstruments)
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}
