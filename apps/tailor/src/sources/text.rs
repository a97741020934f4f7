use std::io::ErrorKind;
use std::path::Path;

use crate::errors::InputError;

pub(crate) fn io_error(path: &Path, source: std::io::Error) -> InputError {
    if source.kind() == ErrorKind::NotFound {
        InputError::NotFound(path.to_path_buf())
    } else {
        InputError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Reads a UTF-8 text file.
pub async fn read_text(path: &Path) -> Result<String, InputError> {
    tokio::fs::read_to_string(path)
        .await
        .map_err(|e| io_error(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("job_file.txt");
        std::fs::write(&path, "Data Engineer\nPython required\n").unwrap();
        assert_eq!(read_text(&path).await.unwrap(), "Data Engineer\nPython required\n");
    }

    #[tokio::test]
    async fn test_missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope.txt");
        assert!(matches!(read_text(&path).await, Err(InputError::NotFound(p)) if p == path));
    }

    #[tokio::test]
    async fn test_directory_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(read_text(dir.path()).await, Err(InputError::Io { .. })));
    }
}
