use chess::{BoardStatus, PieceColor, UciMove};
use chess_client::{DeepAnalysis, GameHeaders, GameSummary, MoveAnalysis};

use super::pane::{Pane, ReviewCatalog};
use super::state::ViewMode;
use super::status::{AnalysisStatus, CatalogStatus, ReplyStatus};
use crate::deep::{DeepAnalysisState, DeepContext, DeepStatus};
use crate::diagnostics::DiagnosticEntry;

/// Shown when the loaded game does not list the user as a player.
pub const UNKNOWN_COLOR_NOTICE: &str = "Username not found in this game; analyzing all moves.";

/// Complete, immutable snapshot of coach state.
/// Broadcast after every command and every completion.
#[derive(Debug, Clone)]
pub struct CoachSnapshot {
    pub mode: ViewMode,
    pub username: Option<String>,
    pub live: PaneSnapshot,
    pub review: PaneSnapshot,
    pub catalog: CatalogSnapshot,
    pub deep: DeepSnapshot,
    pub log: Vec<DiagnosticEntry>,
}

impl CoachSnapshot {
    /// The pane for the current mode.
    pub fn active(&self) -> &PaneSnapshot {
        match self.mode {
            ViewMode::Play => &self.live,
            ViewMode::Review => &self.review,
        }
    }
}

#[derive(Debug, Clone)]
pub struct PaneSnapshot {
    pub fen: String,
    pub side_to_move: PieceColor,
    pub status: BoardStatus,
    pub cursor: usize,
    pub len: usize,
    pub played: Vec<UciMove>,
    pub next_move: Option<UciMove>,
    pub version: u64,
    pub analysis: Option<MoveAnalysis>,
    pub analysis_status: AnalysisStatus,
    pub reply_status: ReplyStatus,
    pub waiting: bool,
}

impl PaneSnapshot {
    pub(crate) fn from_pane(pane: &Pane) -> Self {
        let session = pane.session();
        Self {
            fen: session.position().fen(),
            side_to_move: session.position().side_to_move(),
            status: session.terminal(),
            cursor: session.cursor(),
            len: session.len(),
            played: session.played().to_vec(),
            next_move: session.next_move(),
            version: session.version(),
            analysis: pane.analysis().cloned(),
            analysis_status: pane.analysis_status().clone(),
            reply_status: pane.reply_status().clone(),
            waiting: pane.is_waiting(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct CatalogSnapshot {
    pub games: Vec<GameSummary>,
    pub selected: Option<usize>,
    pub headers: Option<GameHeaders>,
    pub user_color: Option<PieceColor>,
    pub status: CatalogStatus,
    pub notice: Option<&'static str>,
    pub loading: bool,
}

impl CatalogSnapshot {
    pub(crate) fn from_catalog(catalog: &ReviewCatalog, script_len: usize) -> Self {
        let unknown_color =
            catalog.selected().is_some() && catalog.user_color().is_none() && script_len > 0;
        Self {
            games: catalog.games().to_vec(),
            selected: catalog.selected(),
            headers: catalog.headers().cloned(),
            user_color: catalog.user_color(),
            status: catalog.status().clone(),
            notice: unknown_color.then_some(UNKNOWN_COLOR_NOTICE),
            loading: catalog.is_loading(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct DeepSnapshot {
    pub context: Option<DeepContext>,
    pub status: DeepStatus,
    pub result: Option<DeepAnalysis>,
    pub explanation: Option<String>,
    pub pending: bool,
}

impl DeepSnapshot {
    pub(crate) fn from_state(deep: &DeepAnalysisState) -> Self {
        Self {
            context: deep.context().cloned(),
            status: deep.status().clone(),
            result: deep.result().cloned(),
            explanation: deep.explanation().map(str::to_string),
            pending: deep.is_pending(),
        }
    }
}
