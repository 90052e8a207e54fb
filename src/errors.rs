use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("NOT_UNDERSTOOD: {0}")]
    Unrecognized(String),
    #[error("NOT_FOUND: {0}")]
    NotFound(String),
    #[error("IO_FAILURE: {0}")]
    Io(String),
    #[error("STORAGE: {0}")]
    Storage(String),
    #[error("CONFIG_INVALID: {0}")]
    Config(String),
}

impl AppError {
    /// True for failures of the backing resource itself (file or database).
    pub fn is_storage(&self) -> bool {
        matches!(self, Self::Io(_) | Self::Storage(_))
    }
}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value.to_string())
    }
}

impl From<tempfile::PersistError> for AppError {
    fn from(value: tempfile::PersistError) -> Self {
        Self::Io(value.error.to_string())
    }
}

impl From<rusqlite::Error> for AppError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Storage(value.to_string())
    }
}

impl From<serde_yaml::Error> for AppError {
    fn from(value: serde_yaml::Error) -> Self {
        Self::Config(value.to_string())
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::AppError;

    #[test]
    fn classifies_storage_failures() {
        assert!(AppError::Io("disk full".to_string()).is_storage());
        assert!(AppError::Storage("locked".to_string()).is_storage());
        assert!(!AppError::NotFound("item 3".to_string()).is_storage());
        assert!(!AppError::Unrecognized("FOO".to_string()).is_storage());
    }

    #[test]
    fn renders_stable_prefix() {
        let error = AppError::from(std::io::Error::new(std::io::ErrorKind::Other, "boom"));
        assert_eq!(error.to_string(), "IO_FAILURE: boom");
    }
}
