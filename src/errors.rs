use std::fmt;

#[derive(Debug, Clone)]
pub enum ShortyError {
    InvalidUrl(String),
    NotFound(String),
    TokenExhausted(String),
    FileOperation(String),
    Serialization(String),
}

impl ShortyError {
    /// Stable error code for API responses
    pub fn code(&self) -> &'static str {
        match self {
            ShortyError::InvalidUrl(_) => "E001",
            ShortyError::NotFound(_) => "E002",
            ShortyError::TokenExhausted(_) => "E003",
            ShortyError::FileOperation(_) => "E004",
            ShortyError::Serialization(_) => "E005",
        }
    }

    pub fn error_type(&self) -> &'static str {
        match self {
            ShortyError::InvalidUrl(_) => "Invalid URL",
            ShortyError::NotFound(_) => "Resource Not Found",
            ShortyError::TokenExhausted(_) => "Token Space Exhausted",
            ShortyError::FileOperation(_) => "File Operation Error",
            ShortyError::Serialization(_) => "Serialization Error",
        }
    }

    pub fn message(&self) -> &str {
        match self {
            ShortyError::InvalidUrl(msg) => msg,
            ShortyError::NotFound(msg) => msg,
            ShortyError::TokenExhausted(msg) => msg,
            ShortyError::FileOperation(msg) => msg,
            ShortyError::Serialization(msg) => msg,
        }
    }

    /// HTTP status the boundary layer should render this error as
    pub fn http_status(&self) -> u16 {
        match self {
            ShortyError::InvalidUrl(_) => 400,
            ShortyError::NotFound(_) => 404,
            ShortyError::TokenExhausted(_) => 503,
            ShortyError::FileOperation(_) => 500,
            ShortyError::Serialization(_) => 500,
        }
    }
}

impl fmt::Display for ShortyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.error_type(), self.message())
    }
}

impl std::error::Error for ShortyError {}

impl ShortyError {
    pub fn invalid_url<T: Into<String>>(msg: T) -> Self {
        ShortyError::InvalidUrl(msg.into())
    }

    pub fn not_found<T: Into<String>>(msg: T) -> Self {
        ShortyError::NotFound(msg.into())
    }

    pub fn token_exhausted<T: Into<String>>(msg: T) -> Self {
        ShortyError::TokenExhausted(msg.into())
    }

    pub fn file_operation<T: Into<String>>(msg: T) -> Self {
        ShortyError::FileOperation(msg.into())
    }

    pub fn serialization<T: Into<String>>(msg: T) -> Self {
        ShortyError::Serialization(msg.into())
    }
}

impl From<std::io::Error> for ShortyError {
    fn from(err: std::io::Error) -> Self {
        ShortyError::FileOperation(err.to_string())
    }
}

impl From<serde_json::Error> for ShortyError {
    fn from(err: serde_json::Error) -> Self {
        ShortyError::Serialization(err.to_string())
    }
}

impl From<url::ParseError> for ShortyError {
    fn from(err: url::ParseError) -> Self {
        ShortyError::InvalidUrl(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ShortyError>;
