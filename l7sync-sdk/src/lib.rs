//! Typed client for the L7 protection API v1.
//!
//! The API is imperative create/update/delete/list over HTTP+JSON with a
//! bearer token. Every successful response wraps its payload in a
//! `{"data":{"result":…}}` envelope; error responses carry an `{"error":…}`
//! body. One module per remote resource kind:
//! - [`l7resource`] — the top-level protected endpoint
//! - [`l7origin`] — backend origins belonging to one resource
//!
//! Two quirks of the service worth knowing up front: delete calls confirm
//! with a literal `"ok"` result string rather than a status code alone, and
//! the custom SSL key/certificate fields are write-only — no read ever
//! returns them.

pub mod client;
pub mod error;
pub mod l7origin;
pub mod l7resource;

pub use client::Client;
pub use error::{ApiError, Result};
