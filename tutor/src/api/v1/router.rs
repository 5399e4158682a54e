use axum::{
    routing::{get, post},
    Router,
};

use crate::api::state::AppState;

use super::handlers;

pub fn v1_router() -> Router<AppState> {
    let public_routes = Router::new()
        .route("/health", get(handlers::health_check))
        .route("/openapi.json", get(super::openapi::openapi_json))
        .merge(super::openapi::redoc_router());

    let model_routes = Router::new()
        .route("/model", get(handlers::model::get_model))
        .route("/model:load", post(handlers::model::load_model))
        .route("/model:unload", post(handlers::model::unload_model))
        .route(
            "/settings",
            get(handlers::model::get_settings).patch(handlers::model::update_settings),
        );

    let assist_routes = Router::new()
        .route(
            "/textbook:analyze",
            post(handlers::assist::analyze_textbook),
        )
        .route("/text:extract", post(handlers::assist::extract_text))
        .route(
            "/questions:answer",
            post(handlers::assist::answer_question),
        )
        .route(
            "/concepts:explain",
            post(handlers::assist::explain_concept),
        )
        .route("/text:summarize", post(handlers::assist::summarize_text))
        .route("/text:translate", post(handlers::assist::translate_text))
        .route(
            "/interactions",
            get(handlers::interactions::list_interactions),
        );

    Router::new()
        .merge(public_routes)
        .merge(model_routes)
        .merge(assist_routes)
}
