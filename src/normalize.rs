//! Municipality alias normalization
//!
//! Belgian postal codes often cover several sub-municipalities (deelgemeenten /
//! sections). The validation service expects the main municipality, so a
//! submitted sub-municipality is rewritten to its canonical name before the
//! request goes out. Lookups are keyed on (postal code, canonical id):
//!
//! - Unicode NFKD decomposition
//! - Combining marks dropped, then anything outside ASCII
//! - Lowercase conversion
//! - Whitespace removed
//! - Only ASCII letters, digits and `_` kept

use serde_json::Value;
use std::collections::HashMap;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Build the lookup id for a municipality name.
///
/// # Examples
///
/// ```
/// use address_validator::normalize::canonical_id;
///
/// assert_eq!(canonical_id("Sint-Lambrechts-Woluwe"), "sintlambrechtswoluwe");
/// assert_eq!(canonical_id("Liège"), "liege");
/// assert_eq!(canonical_id("  Bois d'Haine "), "boisdhaine");
/// ```
pub fn canonical_id(name: &str) -> String {
    name.nfkd()
        .filter(|c| !is_combining_mark(*c))
        .filter(char::is_ascii)
        .map(|c| c.to_ascii_lowercase())
        .filter(|c| !c.is_whitespace())
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_')
        .collect()
}

/// Interpret a submitted postal code as an integer.
///
/// Accepts decimal text (surrounding whitespace ignored) or a JSON number with
/// no fractional part.
pub fn parse_postal_code(value: &Value) -> Option<u32> {
    match value {
        Value::String(s) => s.trim().parse().ok(),
        Value::Number(n) => {
            if let Some(i) = n.as_u64() {
                u32::try_from(i).ok()
            } else {
                n.as_f64()
                    .filter(|f| f.fract() == 0.0 && *f >= 0.0 && *f <= u32::MAX as f64)
                    .map(|f| f as u32)
            }
        }
        _ => None,
    }
}

/// Read-only mapping from (postal code, municipality id) to the canonical
/// municipality name. Built once at startup, shared behind an `Arc`.
#[derive(Debug, Clone, Default)]
pub struct AliasTable {
    entries: HashMap<(u32, String), String>,
}

impl AliasTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `alias` as a name for `canonical` within `postal_code`.
    pub fn insert(&mut self, postal_code: u32, alias: &str, canonical: &str) {
        self.entries
            .insert((postal_code, canonical_id(alias)), canonical.to_string());
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Canonical municipality for a submitted pair, if one is known.
    pub fn resolve(&self, postal_code: &Value, municipality: &str) -> Option<&str> {
        let code = parse_postal_code(postal_code)?;
        self.entries
            .get(&(code, canonical_id(municipality)))
            .map(String::as_str)
    }
}

/// Rewrite `MunicipalityName` in a raw request body to its canonical form.
///
/// Best effort: bodies that are not objects, lack either field, or carry
/// unexpected types pass through untouched. Returns whether the body changed.
pub fn normalize_address(body: &mut Value, aliases: &AliasTable) -> bool {
    let Some(fields) = body.as_object_mut() else {
        return false;
    };

    let canonical = match (fields.get("PostalCode"), fields.get("MunicipalityName")) {
        (Some(code), Some(Value::String(name))) => match aliases.resolve(code, name) {
            Some(canonical) if canonical != name.as_str() => canonical.to_string(),
            _ => return false,
        },
        _ => return false,
    };

    tracing::debug!(municipality = %canonical, "Resolved municipality alias");
    fields.insert("MunicipalityName".into(), Value::String(canonical));
    true
}
