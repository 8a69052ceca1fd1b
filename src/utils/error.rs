use thiserror::Error;

#[derive(Error, Debug)]
pub enum SyncError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Invalid connection root '{root}': {reason}")]
    InvalidRoot { root: String, reason: String },

    #[error("Unknown HTTP method: {method}")]
    UnknownMethod { method: String },

    #[error("Missing key: {key}")]
    MissingKey { key: String },

    #[error("Unresolved request path: {path}")]
    UnresolvedPath { path: String },

    #[error("Expected a JSON object, found {found}")]
    NotAnObject { found: String },

    #[error("Request to {url} failed with status {status}")]
    HttpStatus { status: u16, url: String },

    #[error("Unknown forge: {name}")]
    UnknownForge { name: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation error in '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl SyncError {
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            SyncError::MissingKey { .. } | SyncError::NotAnObject { .. } => ErrorSeverity::Low,
            SyncError::HttpError(_) | SyncError::HttpStatus { .. } => ErrorSeverity::Medium,
            SyncError::InvalidRoot { .. }
            | SyncError::UnknownMethod { .. }
            | SyncError::UnresolvedPath { .. }
            | SyncError::UnknownForge { .. }
            | SyncError::ConfigError { .. }
            | SyncError::ConfigValidationError { .. }
            | SyncError::InvalidConfigValueError { .. }
            | SyncError::MissingConfigError { .. }
            | SyncError::SerializationError(_) => ErrorSeverity::High,
            SyncError::IoError(_) => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            SyncError::HttpError(_) => "Check network connectivity and that the forge is reachable",
            SyncError::HttpStatus { status, .. } if *status == 401 || *status == 403 => {
                "Check the authentication headers configured for this forge"
            }
            SyncError::HttpStatus { .. } => "Check the request path and method",
            SyncError::InvalidRoot { .. } => "Use an absolute http:// or https:// root URL",
            SyncError::UnknownMethod { .. } => {
                "Use one of GET, HEAD, POST, PUT, PATCH, DELETE, OPTIONS"
            }
            SyncError::UnknownForge { .. } => "Check the forge names declared in the config file",
            SyncError::IoError(_) => "Check file paths and permissions",
            SyncError::SerializationError(_) | SyncError::NotAnObject { .. } => {
                "Check that the payload is a valid JSON object"
            }
            _ => "Review the configuration and command line arguments",
        }
    }
}

pub type Result<T> = std::result::Result<T, SyncError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_orders_config_above_lookup_errors() {
        let missing = SyncError::MissingKey {
            key: "foo".to_string(),
        };
        let config = SyncError::ConfigError {
            message: "bad".to_string(),
        };
        assert!(missing.severity() < config.severity());
    }

    #[test]
    fn test_auth_status_gets_auth_suggestion() {
        let err = SyncError::HttpStatus {
            status: 401,
            url: "https://api.github.com/user".to_string(),
        };
        assert!(err.recovery_suggestion().contains("authentication"));
        assert_eq!(err.severity(), ErrorSeverity::Medium);
    }
}
