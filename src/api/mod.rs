//! Clinic HTTP API.
//!
//! JSON endpoints for the admin console (patients and their appointment and
//! prescription series) and the patient portal (projected occurrences).
//! `api_router()` returns a `Router` that can be mounted on any axum server;
//! `start_server()` runs it on its own listener.

pub mod endpoints;
pub mod error;
pub mod middleware;
pub mod router;
pub mod server;
pub mod types;

pub use error::ApiError;
pub use router::api_router;
pub use server::{start_server, ApiServer, ServerError};
pub use types::ApiContext;
