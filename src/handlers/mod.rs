//! HTTP handlers for the validation server.

pub mod health;
pub mod validate;
