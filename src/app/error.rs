use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Could not read {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error("Could not save {path}: {source}")]
    Write {
        path: String,
        source: std::io::Error,
    },

    #[error("PDF export failed: {0}")]
    Export(String),

    #[error("Theme error: {0}")]
    Theme(String),
}

/// Convenience type alias for Results with AppError
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_error_display() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err = AppError::Read {
            path: "/tmp/missing.md".to_string(),
            source: io_err,
        };
        let msg = err.to_string();
        assert!(msg.contains("/tmp/missing.md"));
        assert!(msg.contains("file not found"));
    }

    #[test]
    fn test_write_error_display() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err = AppError::Write {
            path: "/etc/doc.md".to_string(),
            source: io_err,
        };
        assert!(err.to_string().starts_with("Could not save /etc/doc.md"));
    }

    #[test]
    fn test_error_display() {
        let err = AppError::Export("page layout overflow".to_string());
        assert_eq!(err.to_string(), "PDF export failed: page layout overflow");

        let err = AppError::Theme("corrupt theme file".to_string());
        assert_eq!(err.to_string(), "Theme error: corrupt theme file");
    }
}
