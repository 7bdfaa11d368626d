use crate::session::SessionError;
use crate::view::ViewMode;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CoachError {
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error("Invalid move: {0}")]
    InvalidMove(#[from] chess::MoveParseError),
    #[error("No completed move to analyze")]
    NoCompletedMove,
    #[error("Username is not set")]
    NotConfigured,
    #[error("No game selected")]
    NoGameSelected,
    #[error("Only available in {0} mode")]
    WrongMode(ViewMode),
    #[error("Internal error: {0}")]
    Internal(String),
}
