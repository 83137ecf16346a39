//! Upload text extraction. Pluggable per file type; the handler picks the
//! first extractor that accepts the upload.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("unsupported file type: {0}")]
    Unsupported(String),

    #[error("could not read PDF: {0}")]
    Pdf(String),
}

/// What the client told us about an uploaded file.
#[derive(Debug, Clone, Default)]
pub struct UploadMeta {
    pub file_name: Option<String>,
    pub content_type: Option<String>,
}

impl UploadMeta {
    fn has_extension(&self, extensions: &[&str]) -> bool {
        self.file_name
            .as_deref()
            .and_then(|name| name.rsplit_once('.'))
            .is_some_and(|(_, ext)| extensions.iter().any(|e| ext.eq_ignore_ascii_case(e)))
    }

    fn has_content_type(&self, types: &[&str]) -> bool {
        self.content_type.as_deref().is_some_and(|ct| {
            let essence = ct.split(';').next().unwrap_or_default().trim();
            types.iter().any(|t| essence.eq_ignore_ascii_case(t))
        })
    }

    pub fn describe(&self) -> String {
        self.content_type
            .clone()
            .or_else(|| self.file_name.clone())
            .unwrap_or_else(|| "unknown".to_string())
    }
}

/// Turns uploaded bytes into plain text.
pub trait TextExtractor: Send + Sync {
    fn name(&self) -> &'static str;
    fn accepts(&self, meta: &UploadMeta) -> bool;
    fn extract(&self, bytes: &[u8]) -> Result<String, ExtractError>;
}

pub struct PdfExtractor;

impl TextExtractor for PdfExtractor {
    fn name(&self) -> &'static str {
        "pdf"
    }

    fn accepts(&self, meta: &UploadMeta) -> bool {
        meta.has_content_type(&["application/pdf"]) || meta.has_extension(&["pdf"])
    }

    fn extract(&self, bytes: &[u8]) -> Result<String, ExtractError> {
        pdf_extract::extract_text_from_mem(bytes).map_err(|e| ExtractError::Pdf(e.to_string()))
    }
}

pub struct PlainTextExtractor;

impl TextExtractor for PlainTextExtractor {
    fn name(&self) -> &'static str {
        "text"
    }

    fn accepts(&self, meta: &UploadMeta) -> bool {
        meta.has_content_type(&["text/plain", "text/markdown"])
            || meta.has_extension(&["txt", "md", "markdown"])
    }

    fn extract(&self, bytes: &[u8]) -> Result<String, ExtractError> {
        Ok(String::from_utf8_lossy(bytes).into_owned())
    }
}

pub fn default_extractors() -> Vec<Box<dyn TextExtractor>> {
    vec![Box::new(PdfExtractor), Box::new(PlainTextExtractor)]
}

/// Runs the first extractor that accepts `meta`. CPU-bound for PDFs; call
/// from a blocking task.
pub fn extract_text(
    extractors: &[Box<dyn TextExtractor>],
    meta: &UploadMeta,
    bytes: &[u8],
) -> Result<String, ExtractError> {
    let extractor = extractors
        .iter()
        .find(|e| e.accepts(meta))
        .ok_or_else(|| ExtractError::Unsupported(meta.describe()))?;
    tracing::debug!(extractor = extractor.name(), bytes = bytes.len(), "Extracting upload text");
    extractor.extract(bytes)
}
