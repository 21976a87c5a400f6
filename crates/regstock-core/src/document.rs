//! Legislative document records as supplied by the corpus loader.
//!
//! Upstream data carries no schema guarantees, so every field is optional
//! on the wire and text-like fields are deserialised leniently: a missing,
//! null, or wrongly-typed value becomes an empty string instead of failing
//! the whole record.

use serde::{Deserialize, Deserializer, Serialize};

/// One transition in a title's status history, e.g. `InForce` or `Repealed`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusEntry {
    #[serde(default, deserialize_with = "lenient_string")]
    pub status: String,
    /// ISO 8601 date or timestamp string.
    #[serde(default, deserialize_with = "lenient_opt_string")]
    pub start: Option<String>,
}

impl StatusEntry {
    pub fn new(status: &str, start: &str) -> Self {
        Self {
            status: status.to_string(),
            start: Some(start.to_string()),
        }
    }
}

/// A single Act or legislative instrument.
///
/// Decoding goes through `RawDocument`, which accepts both the snake_case
/// shape written by the scraper and the camelCase shape returned by the
/// register API, including records that carry both spellings of a field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawDocument")]
pub struct Document {
    /// Register identifier such as `C2007A00039` or `F2006L09382`.
    pub register_id: String,
    pub title: String,
    pub text: String,
    /// Raw source category; `act` (any case) marks primary legislation.
    pub collection: String,
    pub making_date: Option<String>,
    pub commencement_date: Option<String>,
    pub repeal_date: Option<String>,
    /// Advisory flag from the source; only meaningful at the scrape date.
    pub is_in_force: Option<bool>,
    pub status_history: Vec<StatusEntry>,
}

/// Wire shape of a corpus record. The scraper writes `id` and
/// `register_id` side by side, so each spelling gets its own slot and the
/// snake_case one wins when both are set.
#[derive(Debug, Default, Deserialize)]
struct RawDocument {
    #[serde(default, deserialize_with = "lenient_string")]
    register_id: String,
    #[serde(default, deserialize_with = "lenient_string")]
    id: String,
    #[serde(default, deserialize_with = "lenient_string")]
    title: String,
    #[serde(default, deserialize_with = "lenient_string")]
    name: String,
    #[serde(default, deserialize_with = "lenient_string")]
    text: String,
    #[serde(default, deserialize_with = "lenient_string")]
    collection: String,
    #[serde(default, deserialize_with = "lenient_opt_string")]
    making_date: Option<String>,
    #[serde(default, rename = "makingDate", deserialize_with = "lenient_opt_string")]
    making_date_api: Option<String>,
    #[serde(default, deserialize_with = "lenient_opt_string")]
    commencement_date: Option<String>,
    #[serde(default, deserialize_with = "lenient_opt_string")]
    repeal_date: Option<String>,
    #[serde(default, deserialize_with = "lenient_opt_bool")]
    is_in_force: Option<bool>,
    #[serde(default, rename = "isInForce", deserialize_with = "lenient_opt_bool")]
    is_in_force_api: Option<bool>,
    #[serde(default, deserialize_with = "lenient_history")]
    status_history: Vec<StatusEntry>,
    #[serde(default, rename = "statusHistory", deserialize_with = "lenient_history")]
    status_history_api: Vec<StatusEntry>,
}

impl From<RawDocument> for Document {
    fn from(raw: RawDocument) -> Self {
        Self {
            register_id: prefer_non_blank(raw.register_id, raw.id),
            title: prefer_non_blank(raw.title, raw.name),
            text: raw.text,
            collection: raw.collection,
            making_date: raw.making_date.or(raw.making_date_api),
            commencement_date: raw.commencement_date,
            repeal_date: raw.repeal_date,
            is_in_force: raw.is_in_force.or(raw.is_in_force_api),
            status_history: if raw.status_history.is_empty() {
                raw.status_history_api
            } else {
                raw.status_history
            },
        }
    }
}

fn prefer_non_blank(primary: String, fallback: String) -> String {
    if primary.trim().is_empty() { fallback } else { primary }
}

impl Document {
    /// Build a minimal document, mostly for tests and ad-hoc counting.
    pub fn new(register_id: &str, title: &str, collection: &str, text: &str) -> Self {
        Self {
            register_id: register_id.to_string(),
            title: title.to_string(),
            collection: collection.to_string(),
            text: text.to_string(),
            ..Default::default()
        }
    }

    pub fn with_making_date(mut self, date: &str) -> Self {
        self.making_date = Some(date.to_string());
        self
    }

    pub fn with_commencement(mut self, date: &str) -> Self {
        self.commencement_date = Some(date.to_string());
        self
    }

    pub fn with_repeal(mut self, date: &str) -> Self {
        self.repeal_date = Some(date.to_string());
        self
    }

    pub fn with_status(mut self, status: &str, start: &str) -> Self {
        self.status_history.push(StatusEntry::new(status, start));
        self
    }

    pub fn has_title(&self) -> bool {
        !self.title.trim().is_empty()
    }

    pub fn has_text(&self) -> bool {
        !self.text.trim().is_empty()
    }
}

// ── Lenient field decoding ──

fn value_to_string(value: serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::Null => None,
        serde_json::Value::String(s) => Some(s),
        serde_json::Value::Number(n) => Some(n.to_string()),
        serde_json::Value::Bool(b) => Some(b.to_string()),
        // Arrays and objects carry no usable text for a scalar field.
        _ => None,
    }
}

fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(value_to_string(value).unwrap_or_default())
}

fn lenient_opt_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(value_to_string(value).filter(|s| !s.trim().is_empty()))
}

fn lenient_opt_bool<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::Bool(b) => Some(b),
        serde_json::Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "yes" | "1" => Some(true),
            "false" | "no" | "0" => Some(false),
            _ => None,
        },
        _ => None,
    })
}

fn lenient_history<'de, D>(deserializer: D) -> Result<Vec<StatusEntry>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    let serde_json::Value::Array(items) = value else {
        return Ok(Vec::new());
    };
    Ok(items
        .into_iter()
        .filter_map(|item| serde_json::from_value::<StatusEntry>(item).ok())
        .collect())
}
