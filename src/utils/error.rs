use thiserror::Error;

#[derive(Error, Debug)]
pub enum RunnerError {
    #[error("{var} environment variable not set")]
    MissingCredential { var: String },

    #[error("Network failure: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Remote returned HTTP {status}: {body}")]
    NonSuccessStatus { status: u16, body: String },

    #[error("Provider rejected the request (HTTP {status}): {message}")]
    Provider { status: u16, message: String },

    #[error("Unexpected response: {message}")]
    UnexpectedResponse { message: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for {field}: '{value}' ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Network,
    Remote,
    Internal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Medium,
    High,
    Critical,
}

impl RunnerError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            RunnerError::MissingCredential { .. }
            | RunnerError::ConfigError { .. }
            | RunnerError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            RunnerError::Network(_) => ErrorCategory::Network,
            RunnerError::NonSuccessStatus { .. }
            | RunnerError::Provider { .. }
            | RunnerError::UnexpectedResponse { .. } => ErrorCategory::Remote,
            RunnerError::IoError(_) | RunnerError::SerializationError(_) => {
                ErrorCategory::Internal
            }
        }
    }

    /// Transient failures (network, 5xx) are `Medium`; everything the caller
    /// has to fix before trying again is `High`.
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            RunnerError::Network(_) => ErrorSeverity::Medium,
            RunnerError::NonSuccessStatus { status, .. } if *status >= 500 => {
                ErrorSeverity::Medium
            }
            RunnerError::IoError(_) | RunnerError::SerializationError(_) => {
                ErrorSeverity::Critical
            }
            _ => ErrorSeverity::High,
        }
    }

    pub fn is_configuration_error(&self) -> bool {
        self.category() == ErrorCategory::Configuration
    }

    /// Process exit status for this failure.
    pub fn exit_code(&self) -> i32 {
        match self.severity() {
            ErrorSeverity::High => 1,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::Critical => 3,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            RunnerError::MissingCredential { var } => {
                format!("Set it with: export {}=your_token_here", var)
            }
            RunnerError::Network(_) => {
                "Check your internet connection and the configured base URL".to_string()
            }
            RunnerError::NonSuccessStatus { status: 401, .. }
            | RunnerError::NonSuccessStatus { status: 403, .. } => {
                "Verify the token is correct and has the required permissions".to_string()
            }
            RunnerError::NonSuccessStatus { status: 404, .. } => {
                "Check the owner, repository and path in the configuration".to_string()
            }
            RunnerError::NonSuccessStatus { status, .. } if *status >= 500 => {
                "The remote service is failing, try again later".to_string()
            }
            RunnerError::NonSuccessStatus { .. } => {
                "Inspect the response body above for details".to_string()
            }
            RunnerError::Provider { .. } => {
                "Check that the sender is verified and the template id exists".to_string()
            }
            RunnerError::UnexpectedResponse { .. } => {
                "The remote API may have changed its response format".to_string()
            }
            RunnerError::ConfigError { .. } | RunnerError::InvalidConfigValueError { .. } => {
                "Fix the configuration file or command-line flags".to_string()
            }
            RunnerError::IoError(_) => "Check that the file exists and is readable".to_string(),
            RunnerError::SerializationError(_) => "Check the JSON value supplied".to_string(),
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            RunnerError::MissingCredential { var } => {
                format!("{} environment variable not set", var)
            }
            RunnerError::Network(e) => format!("Request could not be completed: {}", e),
            RunnerError::NonSuccessStatus { status, body } => {
                format!("Request failed: {}\nResponse: {}", status, body)
            }
            RunnerError::Provider { status, message } => {
                format!("Provider error ({}): {}", status, message)
            }
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, RunnerError>;
