use std::fmt;
use thiserror::Error;

/// Boxed error used to carry transport failures without tying the error type to one HTTP stack.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// ArangoDB `errorNum` values the client interprets - mirrored from the server's error table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum ErrorCode {
    // General errors
    NoError = 0,
    Failed = 1,
    Internal = 4,
    NotImplemented = 9,
    BadParameter = 10,
    Forbidden = 11,
    OnlyEnterprise = 31,

    // HTTP errors
    HttpBadParameter = 400,
    HttpUnauthorized = 401,
    HttpForbidden = 403,
    HttpNotFound = 404,
    HttpMethodNotAllowed = 405,
    HttpPreconditionFailed = 412,
    HttpServerError = 500,
    HttpServiceUnavailable = 503,

    // ArangoDB errors
    ArangoConflict = 1200,
    ArangoDocumentNotFound = 1202,
    ArangoDataSourceNotFound = 1203,
    ArangoDuplicateName = 1207,
    ArangoIllegalName = 1208,
    ArangoUniqueConstraintViolated = 1210,
    ArangoDatabaseNotFound = 1228,
    ArangoDatabaseNameInvalid = 1229,
    ArangoUseSystemDatabase = 1230,

    // Query errors
    QueryParse = 1501,
}

impl ErrorCode {
    pub fn as_u32(&self) -> u32 {
        *self as u32
    }

    pub fn from_u32(value: u32) -> Option<Self> {
        let code = match value {
            0 => ErrorCode::NoError,
            1 => ErrorCode::Failed,
            4 => ErrorCode::Internal,
            9 => ErrorCode::NotImplemented,
            10 => ErrorCode::BadParameter,
            11 => ErrorCode::Forbidden,
            31 => ErrorCode::OnlyEnterprise,
            400 => ErrorCode::HttpBadParameter,
            401 => ErrorCode::HttpUnauthorized,
            403 => ErrorCode::HttpForbidden,
            404 => ErrorCode::HttpNotFound,
            405 => ErrorCode::HttpMethodNotAllowed,
            412 => ErrorCode::HttpPreconditionFailed,
            500 => ErrorCode::HttpServerError,
            503 => ErrorCode::HttpServiceUnavailable,
            1200 => ErrorCode::ArangoConflict,
            1202 => ErrorCode::ArangoDocumentNotFound,
            1203 => ErrorCode::ArangoDataSourceNotFound,
            1207 => ErrorCode::ArangoDuplicateName,
            1208 => ErrorCode::ArangoIllegalName,
            1210 => ErrorCode::ArangoUniqueConstraintViolated,
            1228 => ErrorCode::ArangoDatabaseNotFound,
            1229 => ErrorCode::ArangoDatabaseNameInvalid,
            1230 => ErrorCode::ArangoUseSystemDatabase,
            1501 => ErrorCode::QueryParse,
            _ => return None,
        };
        Some(code)
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorCode::NoError => write!(f, "no error"),
            ErrorCode::Failed => write!(f, "failed"),
            ErrorCode::Internal => write!(f, "internal error"),
            ErrorCode::BadParameter | ErrorCode::HttpBadParameter => write!(f, "bad parameter"),
            ErrorCode::Forbidden | ErrorCode::HttpForbidden => write!(f, "forbidden"),
            ErrorCode::OnlyEnterprise => write!(f, "enterprise edition only"),
            ErrorCode::HttpUnauthorized => write!(f, "unauthorized"),
            ErrorCode::HttpNotFound => write!(f, "not found"),
            ErrorCode::ArangoConflict => write!(f, "conflict"),
            ErrorCode::ArangoDocumentNotFound => write!(f, "document not found"),
            ErrorCode::ArangoDataSourceNotFound => write!(f, "collection or view not found"),
            ErrorCode::ArangoDuplicateName => write!(f, "duplicate name"),
            ErrorCode::ArangoUniqueConstraintViolated => write!(f, "unique constraint violated"),
            ErrorCode::ArangoDatabaseNotFound => write!(f, "database not found"),
            _ => write!(f, "error code {}", self.as_u32()),
        }
    }
}

/// Main client error type
#[derive(Error, Debug)]
pub enum ArangoError {
    /// The server answered with a non-success status code.
    #[error("ArangoDB error (code {code}, errorNum {error_num}): {message}")]
    Arango {
        code: u16,
        error_num: u32,
        message: String,
    },

    /// The request never produced a status code.
    #[error("Transport error: {0}")]
    Transport(#[source] BoxError),

    #[error("Decode error: {0}")]
    Decode(#[source] serde_json::Error),

    #[error("Encode error: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("Malformed payload: {0}")]
    MalformedPayload(String),

    #[error("Unknown analyzer type '{0}'")]
    UnknownAnalyzerType(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("No more documents")]
    NoMoreDocuments,
}

impl ArangoError {
    pub fn new(code: u16, error_num: ErrorCode, message: impl Into<String>) -> Self {
        ArangoError::Arango {
            code,
            error_num: error_num.as_u32(),
            message: message.into(),
        }
    }

    pub fn transport(err: impl Into<BoxError>) -> Self {
        ArangoError::Transport(err.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ArangoError::new(404, ErrorCode::ArangoDataSourceNotFound, message)
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        ArangoError::new(409, ErrorCode::ArangoDuplicateName, message)
    }

    pub fn validation(message: impl Into<String>) -> Self {
        ArangoError::Validation(message.into())
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        ArangoError::MalformedPayload(message.into())
    }

    /// HTTP status code of a server-reported error.
    pub fn http_code(&self) -> Option<u16> {
        match self {
            ArangoError::Arango { code, .. } => Some(*code),
            _ => None,
        }
    }

    /// Known `errorNum` of a server-reported error.
    pub fn error_code(&self) -> Option<ErrorCode> {
        match self {
            ArangoError::Arango { error_num, .. } => ErrorCode::from_u32(*error_num),
            _ => None,
        }
    }

    pub fn is_arango_error_with_error_num(&self, codes: &[ErrorCode]) -> bool {
        self.error_code().is_some_and(|code| codes.contains(&code))
    }

    pub fn is_not_found(&self) -> bool {
        self.http_code() == Some(404)
            || self.is_arango_error_with_error_num(&[
                ErrorCode::ArangoDocumentNotFound,
                ErrorCode::ArangoDataSourceNotFound,
                ErrorCode::ArangoDatabaseNotFound,
            ])
    }

    pub fn is_conflict(&self) -> bool {
        self.http_code() == Some(409)
            || self.is_arango_error_with_error_num(&[
                ErrorCode::ArangoConflict,
                ErrorCode::ArangoDuplicateName,
                ErrorCode::ArangoUniqueConstraintViolated,
            ])
    }

    pub fn is_unauthorized(&self) -> bool {
        self.http_code() == Some(401)
    }

    pub fn is_no_more_documents(&self) -> bool {
        matches!(self, ArangoError::NoMoreDocuments)
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, ArangoError::Transport(_))
    }

    /// Payload shape problems: client and server disagree about the wire format.
    pub fn is_decode(&self) -> bool {
        matches!(
            self,
            ArangoError::Decode(_) | ArangoError::MalformedPayload(_) | ArangoError::UnknownAnalyzerType(_)
        )
    }
}

impl From<config::ConfigError> for ArangoError {
    fn from(err: config::ConfigError) -> Self {
        ArangoError::Config(err.to_string())
    }
}

impl From<reqwest::Error> for ArangoError {
    fn from(err: reqwest::Error) -> Self {
        ArangoError::transport(err)
    }
}

/// Result type alias for client operations
pub type Result<T> = std::result::Result<T, ArangoError>;

/// Macro for early return with a validation error
#[macro_export]
macro_rules! arango_bail {
    ($($arg:tt)*) => {
        return Err($crate::common::error::ArangoError::Validation(format!($($arg)*)))
    };
}

/// Macro for ensuring a condition or returning a validation error
#[macro_export]
macro_rules! arango_ensure {
    ($cond:expr, $($arg:tt)*) => {
        if !($cond) {
            $crate::arango_bail!($($arg)*);
        }
    };
}
