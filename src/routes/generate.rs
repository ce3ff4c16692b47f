//! Generate endpoint
//!
//! `POST /generate` relays one prompt plus history to the model provider.
//! Provider failures come back in-band with HTTP 200; only a body that does
//! not have the request shape is answered with an error status.

use std::sync::Arc;
use std::time::Instant;

use axum::{extract::rejection::JsonRejection, extract::State, Json};
use tracing::{info, warn};

use crate::{
    error::{AppError, AppResult, ErrorResponse},
    routes::metrics::{record_provider_error, record_request},
    types::{GenerateReply, GenerateRequest},
    AppState,
};

/// Handle generate requests
#[utoipa::path(
    post,
    path = "/generate",
    tag = "Generate",
    request_body = GenerateRequest,
    responses(
        (
            status = 200,
            description = "Generated text, or an in-band error description",
            body = GenerateReply
        ),
        (status = 400, description = "Body is not valid JSON", body = ErrorResponse),
        (status = 415, description = "Body is not sent as JSON", body = ErrorResponse),
        (status = 422, description = "Body does not have the request shape", body = ErrorResponse)
    )
)]
pub async fn generate(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<GenerateRequest>, JsonRejection>,
) -> AppResult<Json<GenerateReply>> {
    let start_time = Instant::now();

    let Json(request) = payload.map_err(|rejection| {
        warn!(error = %rejection.body_text(), "Rejected generate request body");
        record_request("invalid", start_time.elapsed().as_secs_f64());
        AppError::from(rejection)
    })?;

    info!(
        history = request.history.len(),
        prompt_chars = request.prompt.len(),
        credential = %request.api_key.fingerprint(),
        "Processing generate request"
    );

    let reply = state.relay.generate(request).await;

    let duration = start_time.elapsed().as_secs_f64();
    if reply.is_error() {
        record_request("error", duration);
        record_provider_error(state.relay.provider().name());
    } else {
        record_request("success", duration);
    }

    info!(
        duration_ms = %format!("{:.2}", duration * 1000.0),
        error = reply.is_error(),
        "Generate request completed"
    );

    Ok(Json(reply))
}
