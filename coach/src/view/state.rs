use std::fmt;

use chess::{PieceColor, UciMove};
use chess_client::{
    ClientError, ClientResult, DeepAnalysis, GameRecord, GameSummary, MoveAnalysis,
    MoveExplanation, MoveRequest, PredictedMove,
};

use super::calls::{Completion, Outcome, PaneId, RemoteCall, Resolution, Ticket};
use super::pane::{Pane, ReviewCatalog};
use super::snapshot::{CatalogSnapshot, CoachSnapshot, DeepSnapshot, PaneSnapshot};
use super::status::{AnalysisStatus, CatalogStatus, ReplyStatus};
use crate::classifier::{classify, MoveOwner};
use crate::deep::{DeepAnalysisState, DeepContext, DeepKind, DeepStatus};
use crate::diagnostics::DiagnosticLog;
use crate::error::CoachError;
use crate::reply::normalize_reply;
use crate::session::{BoardSession, SessionError, StepOutcome};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewMode {
    #[default]
    Play,
    Review,
}

impl ViewMode {
    pub fn pane(self) -> PaneId {
        match self {
            Self::Play => PaneId::Live,
            Self::Review => PaneId::Review,
        }
    }
}

impl fmt::Display for ViewMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Play => "play",
            Self::Review => "review",
        })
    }
}

/// Result of a review cursor step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewStep {
    pub outcome: StepOutcome,
    /// Whose move was played; `None` for backward steps and no-ops.
    pub owner: Option<MoveOwner>,
    pub calls: Vec<RemoteCall>,
}

impl ReviewStep {
    fn quiet(outcome: StepOutcome) -> Self {
        Self {
            outcome,
            owner: None,
            calls: Vec::new(),
        }
    }
}

/// The coach's complete state, mutated synchronously.
///
/// Every operation applies its board change immediately and returns the
/// remote calls it wants made. Their results come back through
/// [`CoachState::complete`], which checks the ticket against the current
/// state and drops anything that no longer applies. No locks: the owner
/// (usually the actor) is the only writer.
#[derive(Debug)]
pub struct CoachState {
    mode: ViewMode,
    username: Option<String>,
    games_limit: usize,
    live: Pane,
    review: Pane,
    catalog: ReviewCatalog,
    deep: DeepAnalysisState,
    log: DiagnosticLog,
    next_seq: u64,
}

fn clean_username(name: &str) -> Option<String> {
    let name = name.trim();
    (!name.is_empty()).then(|| name.to_string())
}

fn failure_reason(err: &ClientError) -> String {
    err.detail()
        .map(str::to_string)
        .unwrap_or_else(|| err.to_string())
}

impl CoachState {
    pub fn new(username: Option<&str>, games_limit: usize) -> Self {
        Self {
            mode: ViewMode::Play,
            username: username.and_then(clean_username),
            games_limit,
            live: Pane::new(PaneId::Live, BoardSession::live()),
            review: Pane::new(PaneId::Review, BoardSession::review(Vec::new())),
            catalog: ReviewCatalog::default(),
            deep: DeepAnalysisState::default(),
            log: DiagnosticLog::new(),
            next_seq: 0,
        }
    }

    pub fn mode(&self) -> ViewMode {
        self.mode
    }

    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    pub fn live(&self) -> &Pane {
        &self.live
    }

    pub fn review(&self) -> &Pane {
        &self.review
    }

    pub fn catalog(&self) -> &ReviewCatalog {
        &self.catalog
    }

    pub fn deep(&self) -> &DeepAnalysisState {
        &self.deep
    }

    pub fn log(&self) -> &DiagnosticLog {
        &self.log
    }

    fn pane_mut(&mut self, id: PaneId) -> &mut Pane {
        match id {
            PaneId::Live => &mut self.live,
            PaneId::Review => &mut self.review,
        }
    }

    fn ticket(&mut self, id: PaneId) -> Ticket {
        self.next_seq += 1;
        let seq = self.next_seq;
        let pane = self.pane_mut(id);
        Ticket {
            pane: id,
            epoch: pane.epoch,
            seq,
            version: pane.session.version(),
        }
    }

    fn require_mode(&self, mode: ViewMode) -> Result<(), CoachError> {
        if self.mode == mode {
            Ok(())
        } else {
            Err(CoachError::WrongMode(mode))
        }
    }

    pub fn set_username(&mut self, name: &str) {
        self.username = clean_username(name);
        match &self.username {
            Some(name) => self.log.push(format!("Username set to {name}.")),
            None => self.log.push("Username cleared."),
        }
    }

    /// Switch between play and review. The pane being left keeps its board
    /// but loses its result, and anything still in flight for it becomes
    /// stale.
    ///
    /// Re-entering play with the engine to move asks for its reply again,
    /// since the request made before leaving was invalidated.
    pub fn switch_mode(&mut self, mode: ViewMode) -> Vec<RemoteCall> {
        if mode == self.mode {
            return Vec::new();
        }
        let left = self.mode.pane();
        self.pane_mut(left).invalidate();
        self.deep.clear();
        self.mode = mode;
        tracing::info!(%mode, "Mode switched");
        self.log.push(format!("Mode: switched to {mode}."));

        if mode != ViewMode::Play {
            return Vec::new();
        }
        let session = &self.live.session;
        let engine_to_move = session.position().side_to_move() == PieceColor::Black;
        if !engine_to_move || session.terminal().is_terminal() || self.live.pending_reply.is_some() {
            return Vec::new();
        }
        self.log.push("Live: requesting engine reply again.");
        vec![self.reply_call()]
    }

    /// Play a user move on the live board.
    ///
    /// On success the board has already changed. The returned calls are an
    /// analysis request (when a username is set) and an opponent reply
    /// request (unless the move ended the game); the two are independent.
    pub fn play_move(&mut self, mv: UciMove) -> Result<Vec<RemoteCall>, CoachError> {
        self.require_mode(ViewMode::Play)?;

        let record = match self.live.session.apply_move(mv) {
            Ok(record) => record,
            Err(err) => {
                tracing::debug!(%mv, error = %err, "Live move rejected");
                self.log.push(match err {
                    SessionError::GameOver => "Live: game is over.".to_string(),
                    _ => format!("Live: illegal move {mv}."),
                });
                return Err(err.into());
            }
        };
        self.log.push(format!("Live: user move {mv}."));
        self.live.supersede();

        let fen_before = record.before.fen();
        self.deep.set_context(DeepContext {
            pane: PaneId::Live,
            fen_before: fen_before.clone(),
            mv,
        });

        let mut calls = Vec::with_capacity(2);
        if let Some(call) = self.analysis_call(PaneId::Live, fen_before, mv) {
            calls.push(call);
        }

        let status = self.live.session.terminal();
        if status.is_terminal() {
            self.log
                .push(format!("Live: game over ({status}); no engine reply requested."));
        } else {
            calls.push(self.reply_call());
        }
        Ok(calls)
    }

    /// Opponent reply request for the current live position.
    fn reply_call(&mut self) -> RemoteCall {
        let ticket = self.ticket(PaneId::Live);
        self.live.pending_reply = Some(ticket.seq);
        self.live.reply_status = ReplyStatus::Waiting;
        RemoteCall::Predict {
            ticket,
            fen: self.live.session.position().fen(),
        }
    }

    /// Analysis request for a user move, or the not-configured status when
    /// no username is set.
    fn analysis_call(&mut self, id: PaneId, fen: String, mv: UciMove) -> Option<RemoteCall> {
        let Some(username) = self.username.clone() else {
            self.pane_mut(id).analysis_status = AnalysisStatus::NotConfigured;
            self.log
                .push(format!("{}: username missing for analysis.", id.label()));
            return None;
        };
        let ticket = self.ticket(id);
        let pane = self.pane_mut(id);
        pane.pending_analysis = Some(ticket.seq);
        pane.analysis_status = AnalysisStatus::Analyzing;
        Some(RemoteCall::Analyze {
            ticket,
            request: MoveRequest {
                username,
                fen,
                mv: mv.to_string(),
            },
        })
    }

    /// Reset the active pane: the live board returns to the start with an
    /// empty history, the review cursor seeks back to ply 0.
    pub fn reset(&mut self) {
        let id = self.mode.pane();
        let pane = self.pane_mut(id);
        pane.session.reset();
        pane.invalidate();
        self.deep.clear();
        if id == PaneId::Review {
            self.catalog.status = CatalogStatus::Idle;
        }
        self.log.push(format!("{}: board reset.", id.label()));
    }

    /// Request the user's game list.
    pub fn load_games(&mut self) -> Result<Vec<RemoteCall>, CoachError> {
        self.require_mode(ViewMode::Review)?;
        let Some(username) = self.username.clone() else {
            self.catalog.status = CatalogStatus::NotConfigured;
            self.log.push("Review: username missing for games list.");
            return Err(CoachError::NotConfigured);
        };

        let ticket = self.ticket(PaneId::Review);
        self.catalog.pending_list = Some(ticket.seq);
        self.catalog.status = CatalogStatus::LoadingGames;
        Ok(vec![RemoteCall::ListGames {
            ticket,
            username,
            limit: self.games_limit,
        }])
    }

    /// Request one game's moves. The review board is replaced when it
    /// arrives.
    pub fn select_game(&mut self, index: usize) -> Result<Vec<RemoteCall>, CoachError> {
        self.require_mode(ViewMode::Review)?;
        let Some(username) = self.username.clone() else {
            self.catalog.status = CatalogStatus::NotConfigured;
            self.log.push("Review: username missing for game select.");
            return Err(CoachError::NotConfigured);
        };

        let ticket = self.ticket(PaneId::Review);
        self.catalog.pending_game = Some(ticket.seq);
        self.catalog.status = CatalogStatus::LoadingGame;
        Ok(vec![RemoteCall::LoadGame {
            ticket,
            username,
            index,
        }])
    }

    /// Advance the review cursor. User moves are analysed, opponent moves
    /// are skipped.
    pub fn step_forward(&mut self) -> Result<ReviewStep, CoachError> {
        self.require_mode(ViewMode::Review)?;
        if self.catalog.selected.is_none() {
            self.catalog.status = CatalogStatus::NoGameSelected;
            self.log.push("Review: no game selected.");
            return Err(CoachError::NoGameSelected);
        }

        let cursor_before = self.review.session.cursor();
        let outcome = match self.review.session.step_forward() {
            Ok(outcome) => outcome,
            Err(err) => {
                tracing::warn!(error = %err, "Review step failed");
                if let SessionError::ReplayIntegrity { mv, .. } = err {
                    self.catalog.status = CatalogStatus::ReplayFailed;
                    self.log.push(format!("Review: failed to apply move {mv}."));
                }
                return Err(err.into());
            }
        };
        let applied = match &outcome {
            StepOutcome::Applied(record) => Some((record.mv, record.before.fen())),
            StepOutcome::AtStart | StepOutcome::AtEnd => None,
        };
        let Some((mv, fen_before)) = applied else {
            return Ok(ReviewStep::quiet(outcome));
        };

        self.review.supersede();
        self.catalog.status = CatalogStatus::Idle;
        self.log.push(format!("Review: applied move {mv}."));

        let owner = classify(cursor_before, self.catalog.user_color);
        let mut calls = Vec::new();
        match owner {
            MoveOwner::Opponent => {
                self.deep.clear();
                self.log.push("Review: skipping opponent move.");
            }
            MoveOwner::User => {
                self.deep.set_context(DeepContext {
                    pane: PaneId::Review,
                    fen_before: fen_before.clone(),
                    mv,
                });
                calls.extend(self.analysis_call(PaneId::Review, fen_before, mv));
            }
        }
        Ok(ReviewStep {
            outcome,
            owner: Some(owner),
            calls,
        })
    }

    /// Move the review cursor back one ply.
    pub fn step_back(&mut self) -> Result<ReviewStep, CoachError> {
        self.require_mode(ViewMode::Review)?;
        let outcome = self.review.session.step_back()?;
        if matches!(outcome, StepOutcome::Applied(_)) {
            self.review.supersede();
            self.deep.clear();
            self.catalog.status = CatalogStatus::Idle;
            self.log.push("Review: step back one move.");
        }
        Ok(ReviewStep::quiet(outcome))
    }

    /// Ask for a deep analysis or explanation of the last completed user
    /// move.
    pub fn request_deep(&mut self, kind: DeepKind) -> Result<Vec<RemoteCall>, CoachError> {
        let Some(context) = self.deep.context().cloned() else {
            self.deep.set_status(DeepStatus::NoMove);
            self.log.push("Deep: no completed move to analyze.");
            return Err(CoachError::NoCompletedMove);
        };
        let Some(username) = self.username.clone() else {
            self.deep.set_status(DeepStatus::NotConfigured);
            self.log.push("Deep: username missing.");
            return Err(CoachError::NotConfigured);
        };

        let ticket = self.ticket(context.pane);
        self.deep.begin(kind, ticket.seq);
        self.log.push(match kind {
            DeepKind::Engine => "Deep: running deep analysis.",
            DeepKind::Explain => "Deep: requesting AI explanation.",
        });
        Ok(vec![RemoteCall::Deep {
            ticket,
            kind,
            request: MoveRequest {
                username,
                fen: context.fen_before,
                mv: context.mv.to_string(),
            },
        }])
    }

    pub fn clear_log(&mut self) {
        self.log.clear();
    }

    /// Fold a finished remote call back into the state, or drop it when the
    /// state it was issued against is gone.
    pub fn complete(&mut self, completion: Completion) -> Resolution {
        let Completion { ticket, outcome } = completion;
        match outcome {
            Outcome::Analysis(result) => self.complete_analysis(ticket, result),
            Outcome::Reply(result) => self.complete_reply(ticket, result),
            Outcome::Deep(result) => self.complete_deep(ticket, result.map(DeepResponse::Engine)),
            Outcome::Explain(result) => {
                self.complete_deep(ticket, result.map(DeepResponse::Explain))
            }
            Outcome::Games(result) => self.complete_games(ticket, result),
            Outcome::Game { index, result } => self.complete_game(ticket, index, result),
        }
    }

    fn discard(&mut self, prefix: &str, what: &str, ticket: Ticket) -> Resolution {
        tracing::warn!(
            pane = ?ticket.pane,
            epoch = ticket.epoch,
            seq = ticket.seq,
            version = ticket.version,
            "Discarding stale {}",
            what
        );
        self.log.push(format!("{prefix}: stale {what} discarded."));
        Resolution::Discarded
    }

    fn complete_analysis(&mut self, ticket: Ticket, result: ClientResult<MoveAnalysis>) -> Resolution {
        let prefix = ticket.pane.label();
        let pane = self.pane_mut(ticket.pane);
        if pane.epoch != ticket.epoch || pane.pending_analysis != Some(ticket.seq) {
            return self.discard(prefix, "analysis", ticket);
        }
        pane.pending_analysis = None;

        let line = match result {
            Ok(analysis) => {
                let line = format!("{prefix}: analysis {} ({} CPL).", analysis.label, analysis.cpl);
                pane.analysis = Some(analysis);
                pane.analysis_status = AnalysisStatus::Idle;
                line
            }
            Err(err) => {
                tracing::warn!(error = %err, "Analysis failed");
                pane.analysis_status = AnalysisStatus::Failed(err.detail().map(str::to_string));
                format!("{prefix}: analysis failed ({}).", failure_reason(&err))
            }
        };
        self.log.push(line);
        Resolution::Applied
    }

    /// Apply an opponent reply. It must match the live epoch, be the latest
    /// reply request, find the board unchanged since the request, and
    /// normalise to a legal move.
    fn complete_reply(&mut self, ticket: Ticket, result: ClientResult<PredictedMove>) -> Resolution {
        let pane = &mut self.live;
        if ticket.pane != PaneId::Live
            || pane.epoch != ticket.epoch
            || pane.pending_reply != Some(ticket.seq)
            || pane.session.version() != ticket.version
        {
            return self.discard("Live", "engine reply", ticket);
        }
        pane.pending_reply = None;

        let line = match result {
            Err(err) => {
                tracing::warn!(error = %err, "Engine reply failed");
                pane.reply_status = ReplyStatus::Failed(err.detail().map(str::to_string));
                format!("Live: engine reply failed ({}).", failure_reason(&err))
            }
            Ok(PredictedMove { mv: None, message }) => {
                pane.reply_status = ReplyStatus::Idle;
                format!(
                    "Live: no engine reply ({}).",
                    message.as_deref().unwrap_or("no move offered")
                )
            }
            Ok(PredictedMove {
                mv: Some(reply), ..
            }) => match normalize_reply(pane.session.position(), &reply) {
                None => {
                    tracing::warn!(%reply, "Dropping unplayable engine reply");
                    pane.reply_status = ReplyStatus::Dropped(reply.to_string());
                    format!("Live: engine reply {reply} dropped; not legal here.")
                }
                Some(mv) => match pane.session.apply_move(mv) {
                    Ok(_) => {
                        pane.reply_status = ReplyStatus::Idle;
                        format!("Live: engine reply {mv}.")
                    }
                    Err(err) => {
                        pane.reply_status = ReplyStatus::Dropped(reply.to_string());
                        format!("Live: engine reply {mv} rejected ({err}).")
                    }
                },
            },
        };
        self.log.push(line);
        Resolution::Applied
    }

    fn complete_deep(&mut self, ticket: Ticket, result: ClientResult<DeepResponse>) -> Resolution {
        if !self.deep.accept(ticket.seq) {
            return self.discard("Deep", "deep analysis", ticket);
        }
        let line = match result {
            Ok(DeepResponse::Engine(analysis)) => {
                self.deep.finish_engine(analysis);
                "Deep: analysis complete.".to_string()
            }
            Ok(DeepResponse::Explain(explained)) => {
                self.deep.finish_explain(explained);
                "Deep: AI explanation generated.".to_string()
            }
            Err(err) => {
                tracing::warn!(error = %err, "Deep analysis failed");
                let reason = failure_reason(&err);
                self.deep.fail(err.detail().map(str::to_string));
                format!("Deep: failed ({reason}).")
            }
        };
        self.log.push(line);
        Resolution::Applied
    }

    fn complete_games(&mut self, ticket: Ticket, result: ClientResult<Vec<GameSummary>>) -> Resolution {
        if self.catalog.pending_list != Some(ticket.seq) {
            return self.discard("Review", "game list", ticket);
        }
        self.catalog.pending_list = None;

        let line = match result {
            Ok(games) => {
                let line = format!("Review: loaded {} games.", games.len());
                self.catalog.games = games;
                self.catalog.status = CatalogStatus::Idle;
                line
            }
            Err(err) => {
                tracing::warn!(error = %err, "Loading games failed");
                self.catalog.status = CatalogStatus::GamesFailed(err.detail().map(str::to_string));
                format!("Review: load games failed ({}).", failure_reason(&err))
            }
        };
        self.log.push(line);
        Resolution::Applied
    }

    fn complete_game(&mut self, ticket: Ticket, index: usize, result: ClientResult<GameRecord>) -> Resolution {
        if self.catalog.pending_game != Some(ticket.seq) {
            return self.discard("Review", "game", ticket);
        }
        self.catalog.pending_game = None;

        let line = match result {
            Ok(record) => {
                let count = record.moves.len();
                self.review.session = BoardSession::review(record.moves);
                self.review.invalidate();
                self.deep.clear_pane(PaneId::Review);
                self.catalog.selected = Some(index);
                self.catalog.headers = Some(record.headers);
                self.catalog.user_color = record.user_color.map(Into::into);
                self.catalog.status = CatalogStatus::Idle;
                tracing::info!(index, moves = count, "Review game loaded");
                format!("Review: loaded game {} with {} moves.", index + 1, count)
            }
            Err(err) => {
                tracing::warn!(error = %err, index, "Loading game failed");
                self.catalog.status = CatalogStatus::GameFailed(err.detail().map(str::to_string));
                format!("Review: load game failed ({}).", failure_reason(&err))
            }
        };
        self.log.push(line);
        Resolution::Applied
    }

    /// Cloneable read model of everything observable.
    pub fn snapshot(&self) -> CoachSnapshot {
        CoachSnapshot {
            mode: self.mode,
            username: self.username.clone(),
            live: PaneSnapshot::from_pane(&self.live),
            review: PaneSnapshot::from_pane(&self.review),
            catalog: CatalogSnapshot::from_catalog(&self.catalog, self.review.session.len()),
            deep: DeepSnapshot::from_state(&self.deep),
            log: self.log.to_vec(),
        }
    }
}

enum DeepResponse {
    Engine(DeepAnalysis),
    Explain(MoveExplanation),
}
