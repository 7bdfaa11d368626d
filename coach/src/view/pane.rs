use chess::PieceColor;
use chess_client::{GameHeaders, GameSummary, MoveAnalysis};

use super::calls::PaneId;
use super::status::{AnalysisStatus, CatalogStatus, ReplyStatus};
use crate::session::BoardSession;

/// One board plus the analysis bookkeeping attached to it.
#[derive(Debug, Clone)]
pub struct Pane {
    pub(crate) id: PaneId,
    pub(crate) session: BoardSession,
    pub(crate) epoch: u64,
    pub(crate) pending_analysis: Option<u64>,
    pub(crate) pending_reply: Option<u64>,
    pub(crate) analysis: Option<MoveAnalysis>,
    pub(crate) analysis_status: AnalysisStatus,
    pub(crate) reply_status: ReplyStatus,
}

impl Pane {
    pub(crate) fn new(id: PaneId, session: BoardSession) -> Self {
        Self {
            id,
            session,
            epoch: 0,
            pending_analysis: None,
            pending_reply: None,
            analysis: None,
            analysis_status: AnalysisStatus::Idle,
            reply_status: ReplyStatus::Idle,
        }
    }

    pub fn id(&self) -> PaneId {
        self.id
    }

    pub fn session(&self) -> &BoardSession {
        &self.session
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn analysis(&self) -> Option<&MoveAnalysis> {
        self.analysis.as_ref()
    }

    pub fn analysis_status(&self) -> &AnalysisStatus {
        &self.analysis_status
    }

    pub fn reply_status(&self) -> &ReplyStatus {
        &self.reply_status
    }

    pub fn is_waiting(&self) -> bool {
        self.pending_analysis.is_some() || self.pending_reply.is_some()
    }

    /// Drop the current result and any outstanding requests.
    pub(crate) fn supersede(&mut self) {
        self.pending_analysis = None;
        self.pending_reply = None;
        self.analysis = None;
        self.analysis_status = AnalysisStatus::Idle;
        self.reply_status = ReplyStatus::Idle;
    }

    /// Start a new generation: everything issued before is now stale.
    pub(crate) fn invalidate(&mut self) {
        self.epoch += 1;
        self.supersede();
    }
}

/// Games available for review and the one currently loaded.
#[derive(Debug, Clone, Default)]
pub struct ReviewCatalog {
    pub(crate) games: Vec<GameSummary>,
    pub(crate) selected: Option<usize>,
    pub(crate) headers: Option<GameHeaders>,
    pub(crate) user_color: Option<PieceColor>,
    pub(crate) status: CatalogStatus,
    pub(crate) pending_list: Option<u64>,
    pub(crate) pending_game: Option<u64>,
}

impl ReviewCatalog {
    pub fn games(&self) -> &[GameSummary] {
        &self.games
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn headers(&self) -> Option<&GameHeaders> {
        self.headers.as_ref()
    }

    pub fn user_color(&self) -> Option<PieceColor> {
        self.user_color
    }

    pub fn status(&self) -> &CatalogStatus {
        &self.status
    }

    pub fn is_loading(&self) -> bool {
        self.pending_list.is_some() || self.pending_game.is_some()
    }
}
