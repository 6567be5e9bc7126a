use serde::Serialize;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, GatewayError>;

/// Reasons a payment instrument is rejected before any record is written.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstrumentError {
    #[error("Invalid VPA format")]
    InvalidVpa,
    #[error("Invalid card number")]
    InvalidCard,
    #[error("Card has expired")]
    ExpiredCard,
}

impl InstrumentError {
    pub fn code(&self) -> &'static str {
        match self {
            InstrumentError::InvalidVpa => "INVALID_VPA",
            InstrumentError::InvalidCard => "INVALID_CARD",
            InstrumentError::ExpiredCard => "EXPIRED_CARD",
        }
    }
}

#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("{0}")]
    BadRequest(String),
    #[error(transparent)]
    InvalidInstrument(#[from] InstrumentError),
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("Invalid API credentials")]
    Authentication,
    #[error("Identifier already in use: {0}")]
    Conflict(String),
    #[error("Payment {id} is already settled as {status}")]
    AlreadySettled { id: String, status: String },
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
    #[error("Logging setup failed: {0}")]
    LoggingError(String),
    #[error("Background task failed: {0}")]
    TaskError(#[from] tokio::task::JoinError),
    #[cfg(feature = "storage-rocksdb")]
    #[error("Storage error: {0}")]
    StorageError(#[from] rocksdb::Error),
}

impl GatewayError {
    /// Machine-readable code reported alongside the description.
    pub fn code(&self) -> &'static str {
        match self {
            GatewayError::BadRequest(_) => "BAD_REQUEST_ERROR",
            GatewayError::InvalidInstrument(e) => e.code(),
            GatewayError::NotFound(_) => "NOT_FOUND_ERROR",
            GatewayError::Authentication => "AUTHENTICATION_ERROR",
            GatewayError::Conflict(_) => "CONFLICT_ERROR",
            _ => "INTERNAL_ERROR",
        }
    }

    pub fn to_body(&self) -> ErrorBody {
        ErrorBody {
            error: ErrorDetail {
                code: self.code(),
                description: self.to_string(),
            },
        }
    }
}

/// Wire envelope: `{"error": {"code": "...", "description": "..."}}`.
#[derive(Debug, Serialize, PartialEq)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct ErrorDetail {
    pub code: &'static str,
    pub description: String,
}
