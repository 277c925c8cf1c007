//! Validation response parser
//!
//! Turns the raw answer of the validation service into a per-field verdict:
//!
//! 1. Error entries: the first `Error` match is read. Each entry bumps the
//!    error or warning counter by `ErrorSeverity`, and an entry with a
//!    `ComponentRef` marks that field invalid with the service's value as
//!    suggestion.
//! 2. Every other submitted field is compared with what the service returns
//!    under the same key. A difference is a warning.
//! 3. The overall result is `error` if any error was counted, `warning` if any
//!    warning was, `valid` otherwise.
//!
//! Formatted address lines are taken from `FormattedSubmittedAddress` and
//! `Label`.

use crate::search::{first, search};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Overall classification of a validated address
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResultKind {
    Valid,
    Warning,
    Error,
}

impl ResultKind {
    pub fn from_counts(counts: &Counts) -> Self {
        if counts.errors > 0 {
            ResultKind::Error
        } else if counts.warnings > 0 {
            ResultKind::Warning
        } else {
            ResultKind::Valid
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldVerdict {
    pub valid: bool,
    pub suggestion: String,
}

impl FieldVerdict {
    fn valid(value: &str) -> Self {
        Self {
            valid: true,
            suggestion: value.to_string(),
        }
    }

    fn invalid(suggestion: String) -> Self {
        Self {
            valid: false,
            suggestion,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Counts {
    pub errors: usize,
    pub warnings: usize,
}

/// Address lines as submitted and as validated by the service
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormattedAddress {
    pub submitted: Vec<String>,
    pub validated: Vec<String>,
}

/// Simplified verdict returned by `/validate`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationOutcome {
    pub result: ResultKind,
    pub fields: BTreeMap<String, FieldVerdict>,
    pub counts: Counts,
    pub formatted: FormattedAddress,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_response: Option<Value>,
}

impl ValidationOutcome {
    /// Attach the untouched service answer for diagnostics.
    pub fn with_raw_response(mut self, raw: Value) -> Self {
        self.raw_response = Some(raw);
        self
    }
}

/// Build the verdict for `submitted` fields from the service answer `raw`.
///
/// `submitted` holds `(field name, submitted text)` pairs; the result has
/// exactly one verdict per pair.
pub fn parse_response(submitted: &[(&str, String)], raw: &Value) -> ValidationOutcome {
    let mut counts = Counts::default();
    let mut fields: BTreeMap<String, FieldVerdict> = BTreeMap::new();

    // Only the first Error container is considered
    if let Some(errors) = first("Error", raw) {
        let entries: Vec<&Value> = match errors {
            Value::Array(items) => items.iter().collect(),
            other => vec![other],
        };

        for entry in entries.into_iter().filter_map(Value::as_object) {
            match entry.get("ErrorSeverity").and_then(Value::as_str) {
                Some(s) if s.eq_ignore_ascii_case("error") => counts.errors += 1,
                Some(s) if s.eq_ignore_ascii_case("warning") => counts.warnings += 1,
                _ => {}
            }

            let Some(component) = entry
                .get("ComponentRef")
                .and_then(Value::as_str)
                .filter(|c| !c.is_empty())
            else {
                continue;
            };
            let Some((name, value)) = submitted.iter().find(|(name, _)| *name == component)
            else {
                tracing::debug!(component, "Error entry refers to a field that was not submitted");
                continue;
            };

            let suggestion = first(component, raw)
                .and_then(fragment_text)
                .map(|s| title_case(&s))
                .unwrap_or_else(|| value.clone());
            fields
                .entry(name.to_string())
                .or_insert_with(|| FieldVerdict::invalid(suggestion));
        }
    }

    for (name, value) in submitted {
        if fields.contains_key(*name) {
            continue;
        }

        let found: String = search(name, raw).filter_map(fragment_text).collect();
        let found = found.trim();
        let verdict = if !found.is_empty() && found.to_lowercase() != value.trim().to_lowercase() {
            counts.warnings += 1;
            FieldVerdict::invalid(title_case(found))
        } else {
            FieldVerdict::valid(value)
        };
        fields.insert(name.to_string(), verdict);
    }

    ValidationOutcome {
        result: ResultKind::from_counts(&counts),
        fields,
        counts,
        formatted: FormattedAddress {
            submitted: formatted_lines("FormattedSubmittedAddress", raw),
            validated: formatted_lines("Label", raw),
        },
        raw_response: None,
    }
}

/// Text of a scalar fragment; numbers are rendered in decimal.
fn fragment_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// `Line` entries of the first `key` match.
fn formatted_lines(key: &str, raw: &Value) -> Vec<String> {
    match first(key, raw).and_then(|block| block.get("Line")) {
        Some(Value::Array(lines)) => lines.iter().filter_map(fragment_text).collect(),
        Some(Value::String(line)) => vec![line.clone()],
        _ => Vec::new(),
    }
}

/// Upper-case the first letter of every word and lower-case the rest.
///
/// A word is a run of letters, so `"o'neil"` becomes `"O'Neil"`.
pub fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_word = false;

    for c in text.chars() {
        if c.is_alphabetic() {
            if in_word {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            in_word = true;
        } else {
            out.push(c);
            in_word = false;
        }
    }
    out
}
