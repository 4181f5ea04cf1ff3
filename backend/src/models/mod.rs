//! # API Models
//!
//! This module defines the request and response structures for the REST API.
//! These are separate from database models, although single records are
//! serialized directly as envelope payloads.
//!
//! ## Organization
//!
//! - `requests.rs` - Incoming query strings and bodies
//! - `responses.rs` - Response envelopes
//! - `validation.rs` - Field constraint checks
//!
//! ## Serialization
//!
//! All models use Serde. Field names stay snake_case on the wire, matching
//! the column names, except the password key `contraseña`.

pub mod requests;
pub mod responses;
pub mod validation;

pub use requests::*;
pub use responses::*;
pub use validation::{Validate, ValidationError};
