use anyhow::Context;
use axum::{
    extract::{multipart::MultipartError, Multipart, State},
    http::StatusCode,
    Json,
};
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};

use crate::errors::AppError;
use crate::models::resume::ResumeDocument;
use crate::resume::chat::{decode_modifications, parse_chat_response};
use crate::resume::extract::{extract_text, ExtractError, UploadMeta};
use crate::resume::modifications::{apply_modifications, ApplyOutcome};
use crate::resume::parser::parse_markdown_to_resume_data;
use crate::resume::render::render_markdown;
use crate::state::AppState;
use crate::text::sanitize::is_meaningful_text;

/// Multipart field carrying the resume file.
const UPLOAD_FIELD: &str = "file";

#[derive(Debug, Deserialize)]
pub struct ParseRequest {
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub document: ResumeDocument,
    pub extracted_chars: usize,
}

#[derive(Debug, Deserialize)]
pub struct ModifyRequest {
    pub resume: ResumeDocument,
    /// Decoded entry by entry so one malformed edit does not reject the batch.
    #[serde(default)]
    pub modifications: Vec<Value>,
}

#[derive(Debug, Deserialize)]
pub struct ChatResponseRequest {
    pub resume: ResumeDocument,
    pub response_text: String,
}

#[derive(Debug, Serialize)]
pub struct ChatResponseResult {
    pub message: String,
    pub outcome: ApplyOutcome,
}

#[derive(Debug, Serialize)]
pub struct MarkdownResponse {
    pub markdown: String,
}

/// POST /api/v1/resumes/parse
pub async fn handle_parse(Json(req): Json<ParseRequest>) -> Result<Json<ResumeDocument>, AppError> {
    if req.text.trim().is_empty() {
        return Err(AppError::Validation("text must not be empty".to_string()));
    }
    Ok(Json(parse_markdown_to_resume_data(&req.text)))
}

/// POST /api/v1/resumes/upload
/// Multipart body with a `file` field (PDF, plain text or markdown).
pub async fn handle_upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, AppError> {
    let (meta, data) = read_upload(&mut multipart).await?;

    let limit = state.config.max_upload_bytes;
    if data.len() > limit {
        warn!(size = data.len(), limit, "Rejected oversized upload");
        return Err(AppError::PayloadTooLarge(format!(
            "File is {} bytes; the limit is {limit} bytes",
            data.len()
        )));
    }

    let extractors = state.extractors.clone();
    let upload_meta = meta.clone();
    let text = tokio::task::spawn_blocking(move || extract_text(&extractors, &upload_meta, &data))
        .await
        .context("Upload extraction task failed")?
        .map_err(|e| {
            warn!(file = ?meta.file_name, error = %e, "Rejected upload");
            match e {
                ExtractError::Unsupported(_) => AppError::UnsupportedMediaType(e.to_string()),
                ExtractError::Pdf(_) => AppError::UnprocessableEntity(e.to_string()),
            }
        })?;

    if !is_meaningful_text(&text) {
        warn!(file = ?meta.file_name, "Uploaded file has no usable text");
        return Err(AppError::UnprocessableEntity(
            "Could not find enough readable text in the uploaded file".to_string(),
        ));
    }

    let extracted_chars = text.chars().count();
    info!(file = ?meta.file_name, extracted_chars, "Parsed uploaded resume");

    Ok(Json(UploadResponse {
        document: parse_markdown_to_resume_data(&text),
        extracted_chars,
    }))
}

async fn read_upload(multipart: &mut Multipart) -> Result<(UploadMeta, Bytes), AppError> {
    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }
        let meta = UploadMeta {
            file_name: field.file_name().map(String::from),
            content_type: field.content_type().map(String::from),
        };
        let data = field.bytes().await.map_err(multipart_error)?;
        return Ok((meta, data));
    }

    Err(AppError::Validation(format!(
        "Missing multipart field '{UPLOAD_FIELD}'"
    )))
}

fn multipart_error(e: MultipartError) -> AppError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(e.body_text())
    } else {
        AppError::Validation(e.body_text())
    }
}

/// POST /api/v1/resumes/modify
pub async fn handle_modify(Json(req): Json<ModifyRequest>) -> Json<ApplyOutcome> {
    let modifications = decode_modifications(&req.modifications);
    Json(apply_modifications(&req.resume, &modifications))
}

/// POST /api/v1/resumes/chat-response
/// Decodes an assistant reply and applies the edits it carries.
pub async fn handle_chat_response(
    Json(req): Json<ChatResponseRequest>,
) -> Result<Json<ChatResponseResult>, AppError> {
    if req.response_text.trim().is_empty() {
        return Err(AppError::Validation(
            "response_text must not be empty".to_string(),
        ));
    }

    let reply = parse_chat_response(&req.response_text);
    let outcome = apply_modifications(&req.resume, &reply.modifications);
    Ok(Json(ChatResponseResult {
        message: reply.message,
        outcome,
    }))
}

/// POST /api/v1/resumes/markdown
pub async fn handle_markdown(Json(doc): Json<ResumeDocument>) -> Json<MarkdownResponse> {
    Json(MarkdownResponse {
        markdown: render_markdown(&doc),
    })
}
