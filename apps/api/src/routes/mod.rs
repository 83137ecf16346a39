pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::jobs::handlers as jobs;
use crate::resume::handlers as resumes;
use crate::state::AppState;
use crate::text::handlers as text;

/// Room for multipart boundaries and headers on top of the file itself.
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

pub fn build_router(state: AppState) -> Router {
    let upload_limit = state.config.max_upload_bytes + MULTIPART_OVERHEAD_BYTES;

    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/text/sanitize", post(text::handle_sanitize))
        // Jobs
        .route("/api/v1/jobs/metadata", post(jobs::handle_job_metadata))
        .route("/api/v1/jobs/link-check", post(jobs::handle_link_check))
        // Resumes
        .route("/api/v1/resumes/parse", post(resumes::handle_parse))
        .route(
            "/api/v1/resumes/upload",
            post(resumes::handle_upload).layer(DefaultBodyLimit::max(upload_limit)),
        )
        .route("/api/v1/resumes/modify", post(resumes::handle_modify))
        .route(
            "/api/v1/resumes/chat-response",
            post(resumes::handle_chat_response),
        )
        .route("/api/v1/resumes/markdown", post(resumes::handle_markdown))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use axum::{
        body::{to_bytes, Body},
        http::{header, Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    const RESUME_TEXT: &str = "# Jane Doe\n\
        jane@example.com | +1 555 123 4567\n\n\
        ## Summary\n\
        Backend engineer with eight years of experience building payment systems and data pipelines in Rust and Go.\n\n\
        ## Experience\n\
        ### Senior Engineer\n\
        *Acme | 2020 - Present*\n\
        - Cut checkout latency by 40%\n";

    fn app() -> Router {
        build_router(AppState::new(Config {
            max_upload_bytes: 1024,
            ..Config::default()
        }))
    }

    async fn post_json(uri: &str, body: Value) -> (StatusCode, Value) {
        let response = app()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(uri)
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        read_json(response).await
    }

    async fn read_json(response: axum::response::Response) -> (StatusCode, Value) {
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn multipart_request(file_name: &str, content_type: &str, data: &[u8]) -> Request<Body> {
        let boundary = "tailor-test-boundary";
        let mut body = format!(
            "--{boundary}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{file_name}\"\r\nContent-Type: {content_type}\r\n\r\n"
        )
        .into_bytes();
        body.extend_from_slice(data);
        body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());

        Request::builder()
            .method("POST")
            .uri("/api/v1/resumes/upload")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={boundary}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let response = app()
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let (status, body) = read_json(response).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["service"], "tailor-api");
    }

    #[tokio::test]
    async fn test_sanitize_accepts_null_text() {
        let (status, body) = post_json("/api/v1/text/sanitize", json!({"text": null})).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["text"], "");
        assert_eq!(body["meaningful"], false);
    }

    #[tokio::test]
    async fn test_sanitize_strips_markdown() {
        let (_, body) =
            post_json("/api/v1/text/sanitize", json!({"text": "## **Skills**\r\n* Rust"})).await;
        assert_eq!(body["text"], "Skills\n- Rust");
    }

    #[tokio::test]
    async fn test_job_metadata() {
        let (status, body) = post_json(
            "/api/v1/jobs/metadata",
            json!({
                "job_text": "Job Title: Staff Engineer\nCompany: Globex\n\nWe build things.",
                "job_link": "https://www.linkedin.com/jobs/view/123"
            }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["metadata"]["title"], "Staff Engineer");
        assert_eq!(body["metadata"]["company"], "Globex");
        assert_eq!(body["normalized_link"], "https://www.linkedin.com/jobs/view/123");
        assert_eq!(body["restriction"]["isRestricted"], true);
    }

    #[tokio::test]
    async fn test_job_metadata_rejects_empty_text() {
        let (status, body) = post_json("/api/v1/jobs/metadata", json!({"job_text": "   "})).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_link_check_restricted_is_still_ok() {
        let (status, body) =
            post_json("/api/v1/jobs/link-check", json!({"url": "linkedin.com/jobs/1"})).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["normalized_link"], "");
        assert_eq!(body["restriction"]["isRestricted"], true);
    }

    #[tokio::test]
    async fn test_parse_resume() {
        let (status, body) = post_json("/api/v1/resumes/parse", json!({"text": RESUME_TEXT})).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["personalInfo"]["name"], "Jane Doe");
        assert_eq!(body["personalInfo"]["email"], "jane@example.com");
        // The contact line under the heading opens the implicit summary.
        assert_eq!(body["sections"][0]["title"], "Professional Summary");
        assert_eq!(body["sections"][2]["type"], "experience");
        assert_eq!(body["sections"][2]["content"][0]["subtitle"], "Acme");
    }

    #[tokio::test]
    async fn test_parse_rejects_empty_text() {
        let (status, _) = post_json("/api/v1/resumes/parse", json!({"text": ""})).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_modify_reports_skipped_entries() {
        let resume = json!({
            "personalInfo": {"name": "Jane Doe"},
            "sections": [{"type": "skills", "title": "Skills", "content": "Rust"}]
        });
        let (status, body) = post_json(
            "/api/v1/resumes/modify",
            json!({
                "resume": resume,
                "modifications": [
                    {"action": "update", "target": "personalInfo", "field": "email", "value": "jane@example.com"},
                    {"action": "delete", "target": "section", "sectionIndex": 7},
                    {"nonsense": true}
                ]
            }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["applied"], 1);
        assert_eq!(body["skipped"].as_array().unwrap().len(), 1);
        assert_eq!(body["document"]["personalInfo"]["email"], "jane@example.com");
    }

    #[tokio::test]
    async fn test_chat_response_applies_fenced_reply() {
        let reply = "```json\n{\"message\": \"Dropped skills.\", \"modifications\": [{\"action\": \"delete\", \"target\": \"section\", \"sectionIndex\": 0}]}\n```";
        let (status, body) = post_json(
            "/api/v1/resumes/chat-response",
            json!({
                "resume": {
                    "personalInfo": {"name": "Jane Doe"},
                    "sections": [{"type": "skills", "title": "Skills", "content": "Rust"}]
                },
                "response_text": reply
            }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Dropped skills.");
        assert_eq!(body["outcome"]["applied"], 1);
        assert!(body["outcome"]["document"]["sections"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_markdown_render() {
        let (status, body) = post_json(
            "/api/v1/resumes/markdown",
            json!({
                "personalInfo": {"name": "Jane Doe"},
                "sections": [{"type": "skills", "title": "Skills", "content": "Rust"}]
            }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["markdown"], "# Jane Doe\n\n## Skills\nRust\n");
    }

    #[tokio::test]
    async fn test_upload_markdown_file() {
        let response = app()
            .oneshot(multipart_request("resume.md", "text/markdown", RESUME_TEXT.as_bytes()))
            .await
            .unwrap();
        let (status, body) = read_json(response).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["document"]["personalInfo"]["name"], "Jane Doe");
        assert_eq!(body["extracted_chars"], RESUME_TEXT.chars().count());
    }

    #[tokio::test]
    async fn test_upload_docx_is_unsupported() {
        let docx = "application/vnd.openxmlformats-officedocument.wordprocessingml.document";
        let response = app()
            .oneshot(multipart_request("resume.docx", docx, b"PK\x03\x04"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
    }

    #[tokio::test]
    async fn test_upload_too_large() {
        let data = vec![b'a'; 2048];
        let response = app()
            .oneshot(multipart_request("resume.txt", "text/plain", &data))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }

    #[tokio::test]
    async fn test_upload_without_prose_is_unprocessable() {
        let response = app()
            .oneshot(multipart_request("phone.txt", "text/plain", b"+1 555 123 4567"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }
}
