//! v1 API Data Transfer Objects.
//!
//! These types define the wire format for the v1 REST API. Result payloads
//! reuse the domain models in `src/models/` directly; only request bodies and
//! endpoint-specific wrappers live here.

pub mod assist;
pub mod interactions;
pub mod model;

// Re-export all public types for convenient access via `dto::*`.
pub use assist::*;
pub use interactions::*;
pub use model::*;
