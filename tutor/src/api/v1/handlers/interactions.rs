use axum::extract::State;

use crate::api::v1::dto::InteractionsResponse;
use crate::api::v1::response::{ApiResponse, ResponseMeta};
use crate::api::AppState;

/// `GET /api/v1/interactions`
#[utoipa::path(
    get,
    path = "/api/v1/interactions",
    tag = "interactions",
    operation_id = "interactions.list",
    responses(
        (status = 200, description = "Interaction log for this process", body = InteractionsResponse),
    )
)]
pub async fn list_interactions(State(state): State<AppState>) -> ApiResponse<InteractionsResponse> {
    let interactions = state.log.list();
    let total = interactions.len() as u64;

    ApiResponse::success_with_meta(
        InteractionsResponse {
            interactions,
            counts: state.log.counts(),
        },
        ResponseMeta { total: Some(total) },
    )
}
