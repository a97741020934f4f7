//! PDF text extraction via `pdf-extract`, run off the async executor.

use std::path::Path;

use tracing::debug;

use crate::errors::InputError;
use crate::sources::text::io_error;

/// Right-trims every line and trims the whole text.
pub fn normalize(text: &str) -> String {
    text.lines()
        .map(str::trim_end)
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}

fn unreadable(path: &Path, reason: impl Into<String>) -> InputError {
    InputError::UnreadableDocument {
        path: path.to_path_buf(),
        reason: reason.into(),
    }
}

fn describe_failure(message: &str) -> String {
    let lower = message.to_lowercase();
    if lower.contains("encrypt") || lower.contains("password") {
        "document is password-protected".to_string()
    } else {
        message.to_string()
    }
}

pub async fn extract_text(path: &Path) -> Result<String, InputError> {
    let bytes = tokio::fs::read(path).await.map_err(|e| io_error(path, e))?;
    extract_text_from_bytes(bytes, path).await
}

/// Extracts text from an in-memory PDF. `source` names it in errors.
pub async fn extract_text_from_bytes(bytes: Vec<u8>, source: &Path) -> Result<String, InputError> {
    if !bytes.starts_with(b"%PDF") {
        return Err(unreadable(source, "not a PDF document"));
    }

    let size = bytes.len();
    let extracted = tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&bytes))
        .await
        .map_err(|e| unreadable(source, format!("extractor crashed: {e}")))?
        .map_err(|e| unreadable(source, describe_failure(&e.to_string())))?;

    let text = normalize(&extracted);
    debug!(
        "Extracted {} chars from {} ({} bytes)",
        text.len(),
        source.display(),
        size
    );
    Ok(text)
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    #[test]
    fn test_normalize_trims_lines_and_ends() {
        assert_eq!(normalize("\n  Jane Doe   \nEngineer \t\n\n"), "Jane Doe\nEngineer");
    }

    #[test]
    fn test_encryption_failures_reported_distinctly() {
        assert_eq!(
            describe_failure("Decryption error: Encrypted document"),
            "document is password-protected"
        );
        assert_eq!(describe_failure("invalid xref"), "invalid xref");
    }

    #[tokio::test]
    async fn test_non_pdf_bytes_unreadable() {
        let err = extract_text_from_bytes(b"hello".to_vec(), &PathBuf::from("upload.pdf"))
            .await
            .unwrap_err();
        assert!(matches!(err, InputError::UnreadableDocument { .. }));
    }

    #[tokio::test]
    async fn test_truncated_pdf_unreadable() {
        let err = extract_text_from_bytes(b"%PDF-1.7\n1 0 obj".to_vec(), &PathBuf::from("cut.pdf"))
            .await
            .unwrap_err();
        assert!(matches!(err, InputError::UnreadableDocument { .. }));
    }

    #[tokio::test]
    async fn test_missing_pdf_not_found() {
        let err = extract_text(&PathBuf::from("/definitely/not/here.pdf"))
            .await
            .unwrap_err();
        assert!(matches!(err, InputError::NotFound(_)));
    }
}
