//! OpenAPI specification for the relay API

use utoipa::OpenApi;

use crate::{
    error::{ErrorBody, ErrorResponse},
    types::{GenerateReply, GenerateRequest, HistoryEntry},
};

/// OpenAPI specification for the CodeMaster relay
#[derive(OpenApi)]
#[openapi(
    info(
        title = "CodeMaster Relay API",
        version = "1.0.0",
        description = "Relays chat prompts and history to Gemini under the CodeMaster persona"
    ),
    paths(
        crate::routes::generate::generate
    ),
    components(
        schemas(
            HistoryEntry,
            GenerateRequest,
            GenerateReply,
            ErrorBody,
            ErrorResponse,
        )
    ),
    tags(
        (name = "Generate", description = "Text generation relay")
    )
)]
pub struct RelayApiDoc;
