use axum::Json;
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::jobs::link::{is_restricted_job_site, normalize_job_link};
use crate::jobs::metadata::derive_job_metadata;
use crate::models::job::{JobMetadata, RestrictionCheck};

#[derive(Debug, Deserialize)]
pub struct JobMetadataRequest {
    pub job_text: String,
    #[serde(default)]
    pub job_link: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct JobMetadataResponse {
    pub metadata: JobMetadata,
    pub normalized_link: String,
    pub restriction: RestrictionCheck,
}

#[derive(Debug, Deserialize)]
pub struct LinkCheckRequest {
    pub url: String,
}

#[derive(Debug, Serialize)]
pub struct LinkCheckResponse {
    pub normalized_link: String,
    pub restriction: RestrictionCheck,
}

/// POST /api/v1/jobs/metadata
pub async fn handle_job_metadata(
    Json(req): Json<JobMetadataRequest>,
) -> Result<Json<JobMetadataResponse>, AppError> {
    if req.job_text.trim().is_empty() {
        return Err(AppError::Validation("job_text must not be empty".to_string()));
    }

    let normalized_link = normalize_job_link(req.job_link.as_deref());
    let restriction = req
        .job_link
        .as_deref()
        .map(is_restricted_job_site)
        .unwrap_or_else(RestrictionCheck::allowed);
    let metadata = derive_job_metadata(&req.job_text, req.job_link.as_deref());

    Ok(Json(JobMetadataResponse {
        metadata,
        normalized_link,
        restriction,
    }))
}

/// POST /api/v1/jobs/link-check
/// Restricted sites are reported in the body, not as an error status.
pub async fn handle_link_check(Json(req): Json<LinkCheckRequest>) -> Json<LinkCheckResponse> {
    let normalized_link = normalize_job_link(Some(&req.url));
    let restriction = is_restricted_job_site(&req.url);
    Json(LinkCheckResponse {
        normalized_link,
        restriction,
    })
}
