//! Mock ChessService implementation for testing

use crate::error::{ClientError, ClientResult};
use crate::traits::ChessService;
use crate::types::{
    DeepAnalysis, GameHeaders, GameRecord, GameSummary, MoveAnalysis, MoveExplanation, MoveLabel,
    MoveRequest, GamePhase, PredictedMove, ReplyMove, UserColor,
};
use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

type Responder<T> = Option<Box<dyn Fn() -> ClientResult<T> + Send>>;

/// Mock service for testing - only compiled in test mode or with mock feature
///
/// Clones share responders, gates and the call log, so a test can keep one
/// clone for assertions after handing another to the code under test.
#[derive(Clone)]
pub struct MockChessService {
    responses: Arc<Mutex<MockResponses>>,
    gates: Arc<Mutex<MockGates>>,
    call_log: Arc<Mutex<Vec<MockCall>>>,
}

#[derive(Default)]
struct MockResponses {
    analyze_move: Responder<MoveAnalysis>,
    analyze_move_deep: Responder<DeepAnalysis>,
    explain_move: Responder<MoveExplanation>,
    predict_move: Responder<PredictedMove>,
    list_games: Responder<Vec<GameSummary>>,
    get_game_moves: Responder<GameRecord>,
}

/// Optional gates: a gated call waits for `notify_one` before answering.
#[derive(Default, Clone)]
struct MockGates {
    analyze_move: Option<Arc<Notify>>,
    predict_move: Option<Arc<Notify>>,
    deep: Option<Arc<Notify>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockCall {
    AnalyzeMove(MoveRequest),
    AnalyzeMoveDeep(MoveRequest),
    ExplainMove(MoveRequest),
    PredictMove { fen: String },
    ListGames { username: String, limit: usize },
    GetGameMoves { username: String, index: usize },
}

impl Default for MockChessService {
    fn default() -> Self {
        Self::new()
    }
}

impl MockChessService {
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(MockResponses::default())),
            gates: Arc::new(Mutex::new(MockGates::default())),
            call_log: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Configure analyze_move response
    pub fn with_analyze_response<F>(self, f: F) -> Self
    where
        F: Fn() -> ClientResult<MoveAnalysis> + Send + 'static,
    {
        self.responses.lock().unwrap().analyze_move = Some(Box::new(f));
        self
    }

    /// Configure analyze_move_deep response
    pub fn with_deep_response<F>(self, f: F) -> Self
    where
        F: Fn() -> ClientResult<DeepAnalysis> + Send + 'static,
    {
        self.responses.lock().unwrap().analyze_move_deep = Some(Box::new(f));
        self
    }

    /// Configure explain_move response
    pub fn with_explain_response<F>(self, f: F) -> Self
    where
        F: Fn() -> ClientResult<MoveExplanation> + Send + 'static,
    {
        self.responses.lock().unwrap().explain_move = Some(Box::new(f));
        self
    }

    /// Configure predict_move response
    pub fn with_predict_response<F>(self, f: F) -> Self
    where
        F: Fn() -> ClientResult<PredictedMove> + Send + 'static,
    {
        self.responses.lock().unwrap().predict_move = Some(Box::new(f));
        self
    }

    /// Configure list_games response
    pub fn with_list_games_response<F>(self, f: F) -> Self
    where
        F: Fn() -> ClientResult<Vec<GameSummary>> + Send + 'static,
    {
        self.responses.lock().unwrap().list_games = Some(Box::new(f));
        self
    }

    /// Configure get_game_moves response
    pub fn with_game_moves_response<F>(self, f: F) -> Self
    where
        F: Fn() -> ClientResult<GameRecord> + Send + 'static,
    {
        self.responses.lock().unwrap().get_game_moves = Some(Box::new(f));
        self
    }

    /// Hold analyze_move responses until the returned gate is notified.
    pub fn gate_analyze(&self) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        self.gates.lock().unwrap().analyze_move = Some(gate.clone());
        gate
    }

    /// Hold predict_move responses until the returned gate is notified.
    pub fn gate_predict(&self) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        self.gates.lock().unwrap().predict_move = Some(gate.clone());
        gate
    }

    /// Hold deep and explain responses until the returned gate is notified.
    pub fn gate_deep(&self) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        self.gates.lock().unwrap().deep = Some(gate.clone());
        gate
    }

    /// Pre-configure a backend that answers every call successfully:
    /// a "good" 12 CPL analysis, `e7e5` as reply and a three-move game.
    pub fn with_standard_backend(self) -> Self {
        self.with_analyze_response(|| Ok(sample_analysis(MoveLabel::Good, 12.0)))
            .with_deep_response(|| Ok(sample_deep_analysis()))
            .with_explain_response(|| {
                Ok(MoveExplanation {
                    analysis: sample_deep_analysis(),
                    explanation: "Controls the centre.".to_string(),
                })
            })
            .with_predict_response(|| Ok(reply_text("e7e5")))
            .with_list_games_response(|| Ok(vec![sample_summary(0)]))
            .with_game_moves_response(|| Ok(sample_game(&["e2e4", "e7e5", "g1f3"], Some(UserColor::White))))
    }

    /// Get recorded calls for verification
    pub fn get_calls(&self) -> Vec<MockCall> {
        self.call_log.lock().unwrap().clone()
    }

    /// Clear call history
    pub fn clear_calls(&self) {
        self.call_log.lock().unwrap().clear()
    }

    fn record(&self, call: MockCall) {
        self.call_log.lock().unwrap().push(call);
    }

    async fn wait_for(gate: Option<Arc<Notify>>) {
        if let Some(gate) = gate {
            gate.notified().await;
        }
    }

    fn respond<T>(&self, pick: impl Fn(&MockResponses) -> &Responder<T>, name: &str) -> ClientResult<T> {
        let responses = self.responses.lock().unwrap();
        match pick(&responses) {
            Some(f) => f(),
            None => Err(ClientError::NotConfigured(name.to_string())),
        }
    }
}

#[async_trait]
impl ChessService for MockChessService {
    async fn analyze_move(&self, request: MoveRequest) -> ClientResult<MoveAnalysis> {
        self.record(MockCall::AnalyzeMove(request));
        let gate = self.gates.lock().unwrap().analyze_move.clone();
        Self::wait_for(gate).await;
        self.respond(|r| &r.analyze_move, "analyze_move")
    }

    async fn analyze_move_deep(&self, request: MoveRequest) -> ClientResult<DeepAnalysis> {
        self.record(MockCall::AnalyzeMoveDeep(request));
        let gate = self.gates.lock().unwrap().deep.clone();
        Self::wait_for(gate).await;
        self.respond(|r| &r.analyze_move_deep, "analyze_move_deep")
    }

    async fn explain_move(&self, request: MoveRequest) -> ClientResult<MoveExplanation> {
        self.record(MockCall::ExplainMove(request));
        let gate = self.gates.lock().unwrap().deep.clone();
        Self::wait_for(gate).await;
        self.respond(|r| &r.explain_move, "explain_move")
    }

    async fn predict_move(&self, fen: String) -> ClientResult<PredictedMove> {
        self.record(MockCall::PredictMove { fen });
        let gate = self.gates.lock().unwrap().predict_move.clone();
        Self::wait_for(gate).await;
        self.respond(|r| &r.predict_move, "predict_move")
    }

    async fn list_games(&self, username: String, limit: usize) -> ClientResult<Vec<GameSummary>> {
        self.record(MockCall::ListGames { username, limit });
        self.respond(|r| &r.list_games, "list_games")
    }

    async fn get_game_moves(&self, username: String, index: usize) -> ClientResult<GameRecord> {
        self.record(MockCall::GetGameMoves { username, index });
        self.respond(|r| &r.get_game_moves, "get_game_moves")
    }
}

pub fn sample_analysis(label: MoveLabel, cpl: f64) -> MoveAnalysis {
    MoveAnalysis {
        label,
        cpl,
        phase: GamePhase::Opening,
        matches_profile_weakness: false,
        suggested_good_moves: vec!["e2e4".to_string(), "d2d4".to_string()],
        feedback: None,
    }
}

pub fn sample_deep_analysis() -> DeepAnalysis {
    DeepAnalysis {
        best_move: Some("e2e4".to_string()),
        best_line: vec!["e4".to_string(), "e5".to_string()],
        played_line: vec!["e4".to_string(), "c5".to_string()],
        eval_best: 35,
        eval_played: 30,
        eval_delta: 5,
        cpl: Some(5.0),
        label: Some(MoveLabel::Good),
        phase: Some(GamePhase::Opening),
        depth: Some(14),
    }
}

pub fn reply_text(mv: &str) -> PredictedMove {
    PredictedMove {
        mv: Some(ReplyMove::Text(mv.to_string())),
        message: None,
    }
}

pub fn sample_summary(index: usize) -> GameSummary {
    GameSummary {
        index,
        white: "alice".to_string(),
        black: "bob".to_string(),
        result: "1-0".to_string(),
    }
}

/// Panics on malformed moves; fixtures only.
pub fn sample_game(moves: &[&str], user_color: Option<UserColor>) -> GameRecord {
    GameRecord {
        moves: moves.iter().map(|m| m.parse().unwrap()).collect(),
        headers: GameHeaders {
            white: Some("alice".to_string()),
            black: Some("bob".to_string()),
            result: Some("1-0".to_string()),
            opening: Some("King's Knight Opening".to_string()),
            eco: Some("C40".to_string()),
        },
        user_color,
    }
}
