use axum::{
    extract::{rejection::JsonRejection, State},
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        HeaderName, Method,
    },
    routing::{get, post},
    Json, Router,
};
use shared::{ChatRequest, ChatResponse, MISSING_PROMPT};
use supportchat::{ChatTurn, Responder};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::error::ApiError;

pub const SUPPORT_CHAT_ROUTE: &str = "/api/v0/support-chat";

pub fn app(responder: Responder) -> Router {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_origin(Any)
        .allow_headers([
            AUTHORIZATION,
            CONTENT_TYPE,
            HeaderName::from_static("x-client-info"),
            HeaderName::from_static("apikey"),
        ]);

    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route(SUPPORT_CHAT_ROUTE, post(support_chat))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(responder)
}

async fn support_chat(
    State(responder): State<Responder>,
    body: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatResponse>, ApiError> {
    // Optional fields never fail to parse, so a rejected body has no usable prompt.
    let Json(req) = body.map_err(|rejection| {
        tracing::debug!(%rejection, "rejected support-chat body");
        ApiError::BadRequest(MISSING_PROMPT.to_owned())
    })?;

    let turn = ChatTurn {
        prompt: req.prompt.unwrap_or_default(),
        session_id: req.session_id,
        history: req.history,
    };

    let answer = responder.respond(turn).await?;

    Ok(Json(ChatResponse {
        generated_text: answer.text,
    }))
}
