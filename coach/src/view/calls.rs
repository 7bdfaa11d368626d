//! Remote calls issued by [`super::CoachState`] and their completions.
//!
//! The state machine never performs I/O. It returns [`RemoteCall`]s for the
//! caller to run and later receives a [`Completion`] carrying the same
//! [`Ticket`], which is what lets it recognise stale responses.

use chess_client::{
    ChessService, ClientResult, DeepAnalysis, GameRecord, GameSummary, MoveAnalysis,
    MoveExplanation, MoveRequest, PredictedMove,
};

use crate::deep::DeepKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PaneId {
    Live,
    Review,
}

impl PaneId {
    pub fn label(self) -> &'static str {
        match self {
            Self::Live => "Live",
            Self::Review => "Review",
        }
    }
}

/// Identity of the state a call was issued against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket {
    pub pane: PaneId,
    /// Pane generation; bumped by reset, game load and mode switch.
    pub epoch: u64,
    /// Unique per call.
    pub seq: u64,
    /// Session version right after the triggering mutation.
    pub version: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteCall {
    Analyze {
        ticket: Ticket,
        request: MoveRequest,
    },
    Predict {
        ticket: Ticket,
        fen: String,
    },
    Deep {
        ticket: Ticket,
        kind: DeepKind,
        request: MoveRequest,
    },
    ListGames {
        ticket: Ticket,
        username: String,
        limit: usize,
    },
    LoadGame {
        ticket: Ticket,
        username: String,
        index: usize,
    },
}

impl RemoteCall {
    pub fn ticket(&self) -> Ticket {
        match self {
            Self::Analyze { ticket, .. }
            | Self::Predict { ticket, .. }
            | Self::Deep { ticket, .. }
            | Self::ListGames { ticket, .. }
            | Self::LoadGame { ticket, .. } => *ticket,
        }
    }

    /// Run the call against `service`.
    pub async fn execute(self, service: &dyn ChessService) -> Completion {
        let ticket = self.ticket();
        let outcome = match self {
            Self::Analyze { request, .. } => Outcome::Analysis(service.analyze_move(request).await),
            Self::Predict { fen, .. } => Outcome::Reply(service.predict_move(fen).await),
            Self::Deep {
                kind: DeepKind::Engine,
                request,
                ..
            } => Outcome::Deep(service.analyze_move_deep(request).await),
            Self::Deep {
                kind: DeepKind::Explain,
                request,
                ..
            } => Outcome::Explain(service.explain_move(request).await),
            Self::ListGames {
                username, limit, ..
            } => Outcome::Games(service.list_games(username, limit).await),
            Self::LoadGame {
                username, index, ..
            } => Outcome::Game {
                index,
                result: service.get_game_moves(username, index).await,
            },
        };
        Completion { ticket, outcome }
    }
}

#[derive(Debug)]
pub enum Outcome {
    Analysis(ClientResult<MoveAnalysis>),
    Reply(ClientResult<PredictedMove>),
    Deep(ClientResult<DeepAnalysis>),
    Explain(ClientResult<MoveExplanation>),
    Games(ClientResult<Vec<GameSummary>>),
    Game {
        index: usize,
        result: ClientResult<GameRecord>,
    },
}

#[derive(Debug)]
pub struct Completion {
    pub ticket: Ticket,
    pub outcome: Outcome,
}

/// What [`super::CoachState::complete`] did with a completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    Applied,
    Discarded,
}
