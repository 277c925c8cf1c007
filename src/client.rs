//! bpost address validation client
//!
//! Wraps the public `ExternalMailingAddressProofingCSREST` service: one
//! POST per address, no retries. Any failure is reported as an
//! [`UpstreamError`].

use crate::address::{Address, FieldValue};
use crate::error::UpstreamError;
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use std::time::Duration;

pub const DEFAULT_ENDPOINT: &str =
    "https://webservices-pub.bpost.be/ws/ExternalMailingAddressProofingCSREST_v1/address/validateAddresses";
pub const DEFAULT_TIMEOUT_MS: u64 = 3000;

/// The service only validates Belgian addresses.
const HOME_COUNTRY_ISO: &str = "BE";

/// Compose the validation request document for one address.
///
/// Missing fields are sent as empty strings; numeric fields are sent as text.
pub fn build_request(address: &Address) -> Value {
    let text = |v: &Option<String>| v.clone().unwrap_or_default();
    let number = |v: &Option<FieldValue>| v.as_ref().map(FieldValue::as_text).unwrap_or_default();

    json!({
        "ValidateAddressesRequest": {
            "AddressToValidateList": {
                "AddressToValidate": [{
                    "@id": "1",
                    "AddresseeIdentification": {
                        "Title": text(&address.title),
                        "FirstName": text(&address.first_name),
                        "LastName": text(&address.last_name),
                    },
                    "PostalAddress": {
                        "DeliveryPointLocation": {
                            "StructuredDeliveryPointLocation": {
                                "StreetName": text(&address.street_name),
                                "StreetNumber": number(&address.street_number),
                                "BoxNumber": number(&address.box_number),
                            }
                        },
                        "PostalCodeMunicipality": {
                            "StructuredPostalCodeMunicipality": {
                                "PostalCode": number(&address.postal_code),
                                "MunicipalityName": text(&address.municipality_name),
                            }
                        },
                        "CountryName": text(&address.country_name),
                    },
                    "DispatchingCountryISOCode": HOME_COUNTRY_ISO,
                    "DeliveringCountryISOCode": HOME_COUNTRY_ISO,
                }]
            },
            "ValidateAddressOptions": {
                "IncludeFormatting": "Y",
                "IncludeSuggestions": "Y",
                "IncludeSubmittedAddress": "Y",
                "IncludeDefaultGeoLocation": "Y",
                "IncludeListOfBoxes": "N",
                "IncludeNumberOfBoxes": "N",
            }
        }
    })
}

/// Anything that can validate an address and hand back the raw answer.
#[async_trait]
pub trait AddressValidationService: Send + Sync {
    /// Validate one address, giving up after `timeout_ms` milliseconds.
    async fn validate(&self, address: &Address, timeout_ms: u64) -> Result<Value, UpstreamError>;
}

/// HTTP implementation talking to the bpost web service
pub struct HttpValidationClient {
    http: Client,
    endpoint: String,
}

impl HttpValidationClient {
    pub fn new(endpoint: impl Into<String>) -> Result<Self> {
        let http = Client::builder()
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            http,
            endpoint: endpoint.into(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl AddressValidationService for HttpValidationClient {
    async fn validate(&self, address: &Address, timeout_ms: u64) -> Result<Value, UpstreamError> {
        let request = build_request(address);
        tracing::debug!(endpoint = %self.endpoint, timeout_ms, "Calling address validation service");

        let response = self
            .http
            .post(&self.endpoint)
            .json(&request)
            .timeout(Duration::from_millis(timeout_ms))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(UpstreamError::Status(status));
        }

        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }
}
