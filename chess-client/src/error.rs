//! Error types for the chess client

use thiserror::Error;

use crate::types::Operation;

pub type ClientResult<T> = Result<T, ClientError>;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Invalid server address: {0}")]
    InvalidAddress(String),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{operation} returned {status}{}", detail_suffix(.detail))]
    Service {
        operation: Operation,
        status: u16,
        detail: Option<String>,
    },

    #[error("Server returned invalid data for {operation}: {reason}")]
    Decode { operation: Operation, reason: String },

    #[error("Mock response not configured for: {0}")]
    NotConfigured(String),
}

fn detail_suffix(detail: &Option<String>) -> String {
    detail.as_deref().map(|d| format!(": {d}")).unwrap_or_default()
}

impl ClientError {
    /// Human-readable detail supplied by the backend, if any.
    pub fn detail(&self) -> Option<&str> {
        match self {
            Self::Service { detail, .. } => detail.as_deref(),
            _ => None,
        }
    }

    /// Status line for the operation that failed: the backend detail when
    /// provided, otherwise the operation's generic failure text.
    pub fn status_line(&self, operation: Operation) -> String {
        match self.detail() {
            Some(detail) => format!("{}: {}", operation.failure_message(), detail),
            None => format!("{}.", operation.failure_message()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_line_prefers_backend_detail() {
        let err = ClientError::Service {
            operation: Operation::AnalyzeMove,
            status: 400,
            detail: Some("Illegal move for this position".into()),
        };
        assert_eq!(
            err.status_line(Operation::AnalyzeMove),
            "Analysis failed: Illegal move for this position"
        );
        assert_eq!(
            err.to_string(),
            "analyze move returned 400: Illegal move for this position"
        );
    }

    #[test]
    fn status_line_falls_back_to_generic_text() {
        let err = ClientError::Decode {
            operation: Operation::ListGames,
            reason: "missing field `games`".into(),
        };
        assert_eq!(err.detail(), None);
        assert_eq!(err.status_line(Operation::ListGames), "Failed to load games.");
    }
}
