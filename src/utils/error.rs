use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("{method} {path} returned {status}")]
    Status {
        method: String,
        path: String,
        status: u16,
        body: String,
    },

    #[error("Streaming request failed with status {status}")]
    StreamFailed { status: u16 },

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfig { field: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Server,
    Client,
    Configuration,
    Data,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl ClientError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            ClientError::Transport(_) => ErrorCategory::Network,
            ClientError::Status { status, .. } | ClientError::StreamFailed { status } => {
                if *status >= 500 {
                    ErrorCategory::Server
                } else {
                    ErrorCategory::Client
                }
            }
            ClientError::InvalidUrl(_)
            | ClientError::ConfigError { .. }
            | ClientError::InvalidConfigValue { .. }
            | ClientError::MissingConfig { .. } => ErrorCategory::Configuration,
            ClientError::Serialization(_) | ClientError::Io(_) => ErrorCategory::Data,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Network | ErrorCategory::Server => ErrorSeverity::Medium,
            ErrorCategory::Client | ErrorCategory::Data => ErrorSeverity::High,
            ErrorCategory::Configuration => ErrorSeverity::Critical,
        }
    }

    /// HTTP status carried by the error, if the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Status { status, .. } | ClientError::StreamFailed { status } => {
                Some(*status)
            }
            ClientError::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            ClientError::Transport(e) if e.is_timeout() => {
                "The storefront service did not answer in time".to_string()
            }
            ClientError::Transport(_) => "Could not reach the storefront service".to_string(),
            ClientError::Status {
                method,
                path,
                status,
                ..
            } => format!("{} {} was rejected with status {}", method, path, status),
            ClientError::StreamFailed { status } => {
                format!("The chat stream could not be opened (status {})", status)
            }
            other => other.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            ClientError::Transport(_) => "Check the base URL and that the service is running",
            ClientError::Status { status: 401, .. } | ClientError::Status { status: 403, .. } => {
                "Sign in again or pass a valid --session-cookie"
            }
            ClientError::Status { status: 404, .. } => "Check the identifier you passed",
            ClientError::Status { .. } | ClientError::StreamFailed { .. } => {
                "Retry later; the service reported a failure"
            }
            ClientError::InvalidUrl(_) => "Use an absolute http:// or https:// URL",
            ClientError::Serialization(_) => "The service answered with an unexpected payload",
            ClientError::Io(_) => "Check that the file exists and is readable",
            ClientError::ConfigError { .. }
            | ClientError::InvalidConfigValue { .. }
            | ClientError::MissingConfig { .. } => "Fix the configuration and run again",
        }
    }
}

pub type Result<T> = std::result::Result<T, ClientError>;
