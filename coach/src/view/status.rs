//! User-visible status lines.
//!
//! Analysis and reply outcomes update separate fields so a failure of one
//! never hides or blocks the other.

use std::fmt;

use chess_client::Operation;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AnalysisStatus {
    #[default]
    Idle,
    Analyzing,
    NotConfigured,
    Failed(Option<String>),
}

impl fmt::Display for AnalysisStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => Ok(()),
            Self::Analyzing => f.write_str("Analyzing move..."),
            Self::NotConfigured => f.write_str("Enter a username to analyze moves."),
            Self::Failed(detail) => failure_line(f, Operation::AnalyzeMove, detail.as_deref()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ReplyStatus {
    #[default]
    Idle,
    Waiting,
    Failed(Option<String>),
    /// The service answered with a move no reading of which is legal.
    Dropped(String),
}

impl fmt::Display for ReplyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => Ok(()),
            Self::Waiting => f.write_str("Waiting for engine reply..."),
            Self::Failed(_) => write!(f, "{}.", Operation::PredictMove.failure_message()),
            Self::Dropped(mv) => write!(f, "Engine reply {mv} is not legal here; ignored."),
        }
    }
}

/// Status of the review game list and game selection.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CatalogStatus {
    #[default]
    Idle,
    NotConfigured,
    LoadingGames,
    LoadingGame,
    NoGameSelected,
    ReplayFailed,
    GamesFailed(Option<String>),
    GameFailed(Option<String>),
}

impl fmt::Display for CatalogStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => Ok(()),
            Self::NotConfigured => f.write_str("Enter a username to load games."),
            Self::LoadingGames => f.write_str("Loading games..."),
            Self::LoadingGame => f.write_str("Loading game..."),
            Self::NoGameSelected => f.write_str("Select a game to begin."),
            Self::ReplayFailed => f.write_str("Failed to apply move from PGN."),
            Self::GamesFailed(detail) => failure_line(f, Operation::ListGames, detail.as_deref()),
            Self::GameFailed(detail) => failure_line(f, Operation::GetGameMoves, detail.as_deref()),
        }
    }
}

fn failure_line(f: &mut fmt::Formatter<'_>, operation: Operation, detail: Option<&str>) -> fmt::Result {
    match detail {
        Some(detail) => write!(f, "{}: {}", operation.failure_message(), detail),
        None => write!(f, "{}.", operation.failure_message()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn analysis_lines() {
        assert_eq!(AnalysisStatus::Idle.to_string(), "");
        assert_eq!(AnalysisStatus::Analyzing.to_string(), "Analyzing move...");
        assert_eq!(
            AnalysisStatus::NotConfigured.to_string(),
            "Enter a username to analyze moves."
        );
        assert_eq!(
            AnalysisStatus::Failed(Some("Profile not found".into())).to_string(),
            "Analysis failed: Profile not found"
        );
        assert_eq!(AnalysisStatus::Failed(None).to_string(), "Analysis failed.");
    }

    #[test]
    fn reply_and_catalog_lines() {
        assert_eq!(ReplyStatus::Failed(None).to_string(), "Engine reply failed.");
        assert_eq!(CatalogStatus::GamesFailed(None).to_string(), "Failed to load games.");
        assert_eq!(
            CatalogStatus::GameFailed(Some("Game index out of range".into())).to_string(),
            "Failed to load game: Game index out of range"
        );
        assert_eq!(CatalogStatus::NoGameSelected.to_string(), "Select a game to begin.");
    }
}
