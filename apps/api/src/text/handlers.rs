use axum::Json;
use serde::{Deserialize, Serialize};

use crate::text::sanitize::{is_meaningful_text, sanitize_optional};

#[derive(Debug, Deserialize)]
pub struct SanitizeRequest {
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SanitizeResponse {
    pub text: String,
    pub meaningful: bool,
}

/// POST /api/v1/text/sanitize
pub async fn handle_sanitize(Json(req): Json<SanitizeRequest>) -> Json<SanitizeResponse> {
    let text = sanitize_optional(req.text.as_deref());
    let meaningful = is_meaningful_text(&text);
    Json(SanitizeResponse { text, meaningful })
}
