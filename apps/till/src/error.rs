//! # Till Error Type
//!
//! Unified error type for the till's use cases and commands.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in the Till                               │
//! │                                                                         │
//! │  till order pay <id> 50                                                 │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │  TillService::tender                                             │  │
//! │  │  AppResult<T>                                                    │  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Store down? ─── CoreError::Persistence ─────────┐              │  │
//! │  │         │                                        │              │  │
//! │  │         ▼                                        ▼              │  │
//! │  │  Bad tender? ─── CoreError::InvalidPayment.. ── AppError ──────►│  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Success ──────────────────────────────────────────────────────►│  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! │                                                                         │
//! │  main() prints "[PAYMENT_ERROR] ..." (or the JSON body) and exits with  │
//! │  ErrorCode::exit_code()                                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::Serialize;
use thiserror::Error;

use noodle_core::{CoreError, ErrorKind};
use noodle_db::DbError;

/// Errors surfaced by the till.
#[derive(Debug, Error)]
pub enum AppError {
    /// Domain failure, including repository failures passed through the core.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Failure opening or migrating the SQLite store.
    #[error(transparent)]
    Database(#[from] DbError),

    /// Configuration could not be used.
    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Failed to parse config file: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Failed to write config file: {0}")]
    ConfigWrite(#[from] toml::ser::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Machine-readable error codes.
///
/// Printed in brackets on failure and carried in the `--json` error body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Order or menu item not found
    NotFound,

    /// Input validation failed
    ValidationError,

    /// Operation not allowed in the order's current status
    BusinessLogic,

    /// Order line operation failed (empty order, too many lines)
    OrderError,

    /// Tender rejected
    PaymentError,

    /// Storage failed
    DatabaseError,

    /// Configuration could not be loaded or is invalid
    ConfigError,

    /// Anything else
    Internal,
}

impl ErrorCode {
    /// Process exit status for this code. Zero is reserved for success.
    pub const fn exit_code(&self) -> u8 {
        match self {
            ErrorCode::Internal => 1,
            ErrorCode::ValidationError => 2,
            ErrorCode::NotFound => 3,
            ErrorCode::BusinessLogic => 4,
            ErrorCode::OrderError => 5,
            ErrorCode::PaymentError => 6,
            ErrorCode::DatabaseError => 7,
            ErrorCode::ConfigError => 8,
        }
    }
}

impl AppError {
    /// Creates a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        AppError::Config(message.into())
    }

    /// Maps the error to its machine-readable code.
    pub fn code(&self) -> ErrorCode {
        match self {
            AppError::Core(err) => match err {
                CoreError::InvalidPaymentAmount { .. } => ErrorCode::PaymentError,
                CoreError::EmptyOrder { .. } | CoreError::OrderTooLarge { .. } => {
                    ErrorCode::OrderError
                }
                other => match other.kind() {
                    ErrorKind::NotFound => ErrorCode::NotFound,
                    ErrorKind::InvalidArgument => ErrorCode::ValidationError,
                    ErrorKind::InvalidState => ErrorCode::BusinessLogic,
                    ErrorKind::PersistenceFailure => ErrorCode::DatabaseError,
                },
            },
            AppError::Database(DbError::NotFound { .. }) => ErrorCode::NotFound,
            AppError::Database(_) => ErrorCode::DatabaseError,
            AppError::Config(_) | AppError::ConfigParse(_) | AppError::ConfigWrite(_) => {
                ErrorCode::ConfigError
            }
            AppError::Io(_) | AppError::Json(_) => ErrorCode::Internal,
        }
    }

    /// Taxonomy bucket, when the error came from the domain.
    pub fn kind(&self) -> Option<ErrorKind> {
        match self {
            AppError::Core(err) => Some(err.kind()),
            AppError::Database(_) => Some(ErrorKind::PersistenceFailure),
            _ => None,
        }
    }

    /// The serializable body printed for `--json` failures.
    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse {
            code: self.code(),
            message: self.to_string(),
        }
    }
}

/// What a `--json` caller receives when a command fails:
/// ```json
/// {
///   "code": "NOT_FOUND",
///   "message": "Order not found: 3f2a..."
/// }
/// ```
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub code: ErrorCode,
    pub message: String,
}

pub type AppResult<T> = Result<T, AppError>;
