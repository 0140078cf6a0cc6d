//! Tiered keyword parsing — decodes the persisted `extracted_keywords` column.
//!
//! Two payload shapes exist in storage:
//! - legacy: a flat JSON array of keywords
//! - tiered: `{"keywords": [...], "primary": [...]}` where `primary` marks must-haves
//!
//! Both are decoded here, once, into [`TieredKeywords`]. Malformed payloads
//! decode to `None` instead of an error.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Normalized keyword tiers. `primary ⊆ all`; `secondary = all \ primary` in `all` order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TieredKeywords {
    pub all: Vec<String>,
    pub primary: Vec<String>,
    pub secondary: Vec<String>,
}

/// The two recognised payload shapes.
#[derive(Debug, Clone, PartialEq)]
pub enum KeywordPayload {
    Legacy(Vec<String>),
    Tiered {
        keywords: Vec<String>,
        primary: Vec<String>,
    },
}

fn is_legacy_shape(value: &Value) -> bool {
    value.is_array()
}

fn is_tiered_shape(value: &Value) -> bool {
    let Some(obj) = value.as_object() else {
        return false;
    };
    let keywords_ok = obj.get("keywords").is_some_and(Value::is_array);
    let primary_ok = match obj.get("primary") {
        None | Some(Value::Null) => true,
        Some(v) => v.is_array(),
    };
    keywords_ok && primary_ok
}

/// String elements of a JSON array, first occurrence only. Non-strings are skipped.
fn string_elements(value: Option<&Value>) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for s in value
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter_map(Value::as_str)
    {
        if !out.iter().any(|existing| existing == s) {
            out.push(s.to_string());
        }
    }
    out
}

impl KeywordPayload {
    /// Classifies a raw column value. Returns `None` for blank input, invalid
    /// JSON, or any unrecognised shape.
    pub fn decode(raw: Option<&str>) -> Option<Self> {
        let raw = raw.map(str::trim).filter(|r| !r.is_empty())?;
        let value: Value = match serde_json::from_str(raw) {
            Ok(v) => v,
            Err(e) => {
                tracing::debug!("Unparseable keyword payload: {e}");
                return None;
            }
        };

        if is_legacy_shape(&value) {
            Some(KeywordPayload::Legacy(string_elements(Some(&value))))
        } else if is_tiered_shape(&value) {
            Some(KeywordPayload::Tiered {
                keywords: string_elements(value.get("keywords")),
                primary: string_elements(value.get("primary")),
            })
        } else {
            None
        }
    }

    pub fn into_tiered(self) -> Option<TieredKeywords> {
        let (all, requested_primary) = match self {
            KeywordPayload::Legacy(all) => (all, Vec::new()),
            KeywordPayload::Tiered { keywords, primary } => (keywords, primary),
        };

        if all.is_empty() {
            return None;
        }

        let primary: Vec<String> = requested_primary
            .into_iter()
            .filter(|p| all.contains(p))
            .collect();
        let secondary = all
            .iter()
            .filter(|k| !primary.contains(k))
            .cloned()
            .collect();

        Some(TieredKeywords {
            all,
            primary,
            secondary,
        })
    }
}

/// Parses a persisted keyword payload into tiers. `None` on blank, malformed,
/// or empty payloads.
pub fn parse_tiered_keywords(raw: Option<&str>) -> Option<TieredKeywords> {
    KeywordPayload::decode(raw)?.into_tiered()
}

/// Flat view of a persisted keyword payload: just the `all` list.
pub fn parse_keywords_flat(raw: Option<&str>) -> Option<Vec<String>> {
    parse_tiered_keywords(raw).map(|t| t.all)
}
