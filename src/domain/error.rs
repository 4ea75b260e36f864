use std::fmt;

#[derive(Debug)]
pub enum AppError {
    FileNotFound(String),
    IoError(String),
    EmptyInput(String),
    ParseError(String),
    MissingColumn(String),
    ConfigError(String),
    HostUnavailable(String),
    NotFound(String),
    Conflict(String),
    StoreError(String),
}

impl AppError {
    /// Process exit code for a fatal error surfaced by the CLI.
    pub fn exit_code(&self) -> i32 {
        match self {
            AppError::MissingColumn(_) | AppError::ConfigError(_) => 2,
            _ => 1,
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::FileNotFound(msg) => write!(f, "File not found: {}", msg),
            AppError::IoError(msg) => write!(f, "IO error: {}", msg),
            AppError::EmptyInput(msg) => write!(f, "Empty input: {}", msg),
            AppError::ParseError(msg) => write!(f, "Parse error: {}", msg),
            AppError::MissingColumn(msg) => write!(f, "Missing column: {}", msg),
            AppError::ConfigError(msg) => write!(f, "Configuration error: {}", msg),
            AppError::HostUnavailable(msg) => write!(f, "Host unavailable: {}", msg),
            AppError::NotFound(msg) => write!(f, "Not found: {}", msg),
            AppError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            AppError::StoreError(msg) => write!(f, "Store error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => AppError::FileNotFound(err.to_string()),
            _ => AppError::IoError(err.to_string()),
        }
    }
}

impl From<csv::Error> for AppError {
    fn from(err: csv::Error) -> Self {
        AppError::ParseError(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::StoreError(err.to_string())
    }
}

impl From<figment::Error> for AppError {
    fn from(err: figment::Error) -> Self {
        AppError::ConfigError(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes() {
        assert_eq!(AppError::MissingColumn("id".into()).exit_code(), 2);
        assert_eq!(AppError::FileNotFound("a.csv".into()).exit_code(), 1);
    }

    #[test]
    fn test_io_not_found_maps_to_file_not_found() {
        let err: AppError = std::io::Error::new(std::io::ErrorKind::NotFound, "gone").into();
        assert!(matches!(err, AppError::FileNotFound(_)));
    }
}
