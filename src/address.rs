//! Submitted address model and the request schema

use crate::error::ApiError;
use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use serde_json::{json, Number, Value};
use std::fmt;

/// Field names in the order they are reported back.
pub const FIELD_NAMES: [&str; 9] = [
    "Title",
    "FirstName",
    "LastName",
    "StreetName",
    "StreetNumber",
    "BoxNumber",
    "PostalCode",
    "MunicipalityName",
    "CountryName",
];

/// Fields that must be present in every request.
pub const REQUIRED_FIELDS: [&str; 4] = [
    "StreetName",
    "StreetNumber",
    "PostalCode",
    "MunicipalityName",
];

/// A field accepted either as text or as a JSON number (house numbers,
/// box numbers and postal codes).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    Number(Number),
}

impl FieldValue {
    pub fn as_text(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Text(s) => f.write_str(s),
            FieldValue::Number(n) => write!(f, "{}", n),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Text(s.to_string())
    }
}

/// Postal address as submitted to `/validate`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Address {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub street_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub street_number: Option<FieldValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub box_number: Option<FieldValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<FieldValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub municipality_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country_name: Option<String>,
}

impl Address {
    /// Present fields as `(name, text)` pairs, in [`FIELD_NAMES`] order.
    pub fn submitted_fields(&self) -> Vec<(&'static str, String)> {
        let values = [
            self.title.clone(),
            self.first_name.clone(),
            self.last_name.clone(),
            self.street_name.clone(),
            self.street_number.as_ref().map(FieldValue::as_text),
            self.box_number.as_ref().map(FieldValue::as_text),
            self.postal_code.as_ref().map(FieldValue::as_text),
            self.municipality_name.clone(),
            self.country_name.clone(),
        ];

        FIELD_NAMES
            .into_iter()
            .zip(values)
            .filter_map(|(name, value)| value.map(|v| (name, v)))
            .collect()
    }
}

/// JSON schema for request bodies.
pub fn address_schema() -> Value {
    let text = || json!({"type": "string"});
    let text_or_number = || json!({"oneOf": [{"type": "string"}, {"type": "number"}]});

    json!({
        "type": "object",
        "properties": {
            "Title": text(),
            "FirstName": text(),
            "LastName": text(),
            "StreetName": text(),
            "StreetNumber": text_or_number(),
            "BoxNumber": text_or_number(),
            "PostalCode": text_or_number(),
            "MunicipalityName": text(),
            "CountryName": text(),
        },
        "required": REQUIRED_FIELDS,
    })
}

/// Compiled request schema, built once at startup.
pub struct AddressSchema {
    validator: jsonschema::Validator,
}

impl AddressSchema {
    pub fn new() -> Result<Self> {
        let validator = jsonschema::validator_for(&address_schema())
            .map_err(|e| anyhow!("Invalid address schema: {}", e))?;
        Ok(Self { validator })
    }

    /// Validate a request body and convert it into an [`Address`].
    ///
    /// All schema violations are reported together in one message.
    pub fn check(&self, body: &Value) -> Result<Address, ApiError> {
        let errors: Vec<String> = self
            .validator
            .iter_errors(body)
            .map(|e| {
                let path = e.instance_path.to_string();
                if path.is_empty() {
                    e.to_string()
                } else {
                    format!("{}: {}", path, e)
                }
            })
            .collect();

        if !errors.is_empty() {
            return Err(ApiError::RequestShapeInvalid(errors.join("; ")));
        }

        serde_json::from_value(body.clone())
            .map_err(|e| ApiError::RequestShapeInvalid(e.to_string()))
    }
}
