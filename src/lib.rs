//! Address validation facade
//!
//! Accepts a Belgian postal address as JSON, checks its shape, forwards it to
//! the bpost address validation service and reduces the answer to a
//! field-by-field verdict (valid / warning / error) with formatted lines.

pub mod address;
pub mod client;
pub mod config;
pub mod dataset;
pub mod error;
pub mod handlers;
pub mod normalize;
pub mod parser;
pub mod router;
pub mod search;

pub use address::{Address, AddressSchema, FieldValue};
pub use client::{AddressValidationService, HttpValidationClient};
pub use error::{ApiError, UpstreamError};
pub use normalize::AliasTable;
pub use parser::{parse_response, FieldVerdict, ResultKind, ValidationOutcome};
