use thiserror::Error;

#[derive(Error, Debug)]
pub enum DaemonError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Core error: {0}")]
    Core(#[from] shelf_core::Error),

    #[error("Watcher error: {0}")]
    Watch(#[from] notify::Error),
}

pub type Result<T> = std::result::Result<T, DaemonError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err = DaemonError::Io(io_err);
        assert!(err.to_string().contains("IO error"));
    }

    #[test]
    fn test_from_core_error() {
        let err: DaemonError = shelf_core::Error::Prefs("bad".to_string()).into();
        assert!(matches!(err, DaemonError::Core(_)));
        assert!(err.to_string().contains("bad"));
    }

    #[test]
    fn test_from_json_error() {
        let json_err = serde_json::from_str::<i32>("not json").unwrap_err();
        let err: DaemonError = json_err.into();
        assert!(matches!(err, DaemonError::Json(_)));
    }
}
