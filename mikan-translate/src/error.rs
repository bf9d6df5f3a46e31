/// Error types for the translation pipeline and relay
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TranslateError {
    /// Malformed or empty language code
    InvalidLocale(String),
    /// Missing API key or other construction-time problem
    ConfigError(String),
    /// Connection or timeout failure reaching a server
    NetworkError(String),
    /// Authenticity token missing or rejected
    AuthError(String),
    /// Malformed request (missing parameter, texts not a list)
    ValidationError(String),
    /// The external translation API failed; carries the upstream status and message
    UpstreamError { status: u16, message: String },
    /// Malformed JSON, or a response that does not line up with its request
    DecodeError(String),
}

impl std::fmt::Display for TranslateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TranslateError::InvalidLocale(msg) => write!(f, "Invalid locale: {}", msg),
            TranslateError::ConfigError(msg) => write!(f, "Configuration error: {}", msg),
            TranslateError::NetworkError(msg) => write!(f, "Network error: {}", msg),
            TranslateError::AuthError(msg) => write!(f, "Authentication error: {}", msg),
            TranslateError::ValidationError(msg) => write!(f, "Validation error: {}", msg),
            TranslateError::UpstreamError { status, message } => {
                write!(f, "Upstream error ({}): {}", status, message)
            }
            TranslateError::DecodeError(msg) => write!(f, "Decode error: {}", msg),
        }
    }
}

impl std::error::Error for TranslateError {}

/// Result type for translation operations
pub type TranslateResult<T> = Result<T, TranslateError>;
