//! ChessService trait abstraction for client implementations

use crate::error::ClientResult;
use crate::types::{
    DeepAnalysis, GameRecord, GameSummary, MoveAnalysis, MoveExplanation, MoveRequest,
    PredictedMove,
};
use async_trait::async_trait;

/// Backend interface consumed by the coach.
/// Implemented by both real ChessClient and MockChessService.
///
/// Methods take `&self` so a single `Arc<dyn ChessService>` can serve
/// several in-flight calls at once.
#[async_trait]
pub trait ChessService: Send + Sync {
    /// Label, centipawn loss and suggestions for one played move
    async fn analyze_move(&self, request: MoveRequest) -> ClientResult<MoveAnalysis>;

    /// Best line vs played line for one played move
    async fn analyze_move_deep(&self, request: MoveRequest) -> ClientResult<DeepAnalysis>;

    /// Deep analysis plus a natural-language explanation
    async fn explain_move(&self, request: MoveRequest) -> ClientResult<MoveExplanation>;

    /// Reply move for the automated opponent
    async fn predict_move(&self, fen: String) -> ClientResult<PredictedMove>;

    /// Previously imported games for a user
    async fn list_games(&self, username: String, limit: usize) -> ClientResult<Vec<GameSummary>>;

    /// Move list, headers and user color of one imported game
    async fn get_game_moves(&self, username: String, index: usize) -> ClientResult<GameRecord>;
}
