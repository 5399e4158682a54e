//! Interaction log DTOs for the v1 API.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::models::Interaction;

/// Response for `GET /v1/interactions`.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InteractionsResponse {
    pub interactions: Vec<Interaction>,
    /// Number of interactions per kind.
    pub counts: BTreeMap<String, usize>,
}
