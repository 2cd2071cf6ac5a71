use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum HistoryError {
    InvalidDate { date: String },
    InvalidEvent { message: String },
    SessionNotFound { session_id: String },
    AuthenticationRequired,
    InvalidToken,
    SessionExpired,
    InternalError { message: String },
}

impl fmt::Display for HistoryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HistoryError::InvalidDate { date } => write!(f, "Invalid date: {}", date),
            HistoryError::InvalidEvent { message } => write!(f, "Invalid event: {}", message),
            HistoryError::SessionNotFound { session_id } => {
                write!(f, "Session not found: {}", session_id)
            }
            HistoryError::AuthenticationRequired => write!(f, "Authentication required"),
            HistoryError::InvalidToken => write!(f, "Invalid authentication token"),
            HistoryError::SessionExpired => write!(f, "Session expired"),
            HistoryError::InternalError { message } => write!(f, "Internal error: {}", message),
        }
    }
}

/// JSON body of every non-2xx response
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ErrorResponse {
    pub error: String,
    pub kind: HistoryError,
}

impl From<HistoryError> for ErrorResponse {
    fn from(kind: HistoryError) -> Self {
        ErrorResponse {
            error: kind.to_string(),
            kind,
        }
    }
}
