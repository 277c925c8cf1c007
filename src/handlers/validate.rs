//! POST /validate: validate a Belgian postal address.
//!
//! Normalizes the municipality, checks the body against the address schema,
//! asks the validation service and returns the simplified verdict.
//! - Malformed JSON or schema violations: 417
//! - Validation service unreachable, slow or undecodable: 503

use axum::{body::Bytes, extract::State, Json};
use serde_json::Value;

use crate::error::ApiError;
use crate::normalize::normalize_address;
use crate::parser::{parse_response, ValidationOutcome};
use crate::router::AppState;

pub async fn validate_address(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<ValidationOutcome>, ApiError> {
    let mut payload: Value = serde_json::from_slice(&body).map_err(|e| {
        tracing::debug!(error = %e, "Rejected malformed request body");
        ApiError::RequestShapeInvalid(format!("Invalid JSON body: {}", e))
    })?;

    normalize_address(&mut payload, &state.aliases);

    let address = state.schema.check(&payload).inspect_err(|e| {
        tracing::debug!(error = %e, "Rejected address failing schema");
    })?;

    let raw = state
        .client
        .validate(&address, state.timeout_ms)
        .await
        .map_err(|e| {
            tracing::warn!(error = %e, "Address validation service unavailable");
            ApiError::UpstreamUnavailable("Address validation service unavailable".into())
        })?;

    let outcome = parse_response(&address.submitted_fields(), &raw);
    tracing::info!(
        result = ?outcome.result,
        errors = outcome.counts.errors,
        warnings = outcome.counts.warnings,
        "Address validated"
    );

    if state.include_raw_response {
        Ok(Json(outcome.with_raw_response(raw)))
    } else {
        Ok(Json(outcome))
    }
}
