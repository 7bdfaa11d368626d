//! HTTP client for the move-analysis backend
//!
//! Provides a typed async client for the analysis, prediction and game
//! history endpoints the coach talks to.
//!
//! # Example
//!
//! ```no_run
//! use chess_client::{ChessClient, ChessService, ClientConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = ChessClient::new(ClientConfig::new("http://127.0.0.1:8000"))?;
//!     let games = client.list_games("alice".to_string(), 20).await?;
//!     println!("Found {} games", games.len());
//!     Ok(())
//! }
//! ```

mod client;
mod error;
mod traits;
mod types;

#[cfg(any(test, feature = "mock"))]
pub mod mock;

pub use client::{ChessClient, ClientConfig, DEFAULT_TIMEOUT};
pub use error::{ClientError, ClientResult};
pub use traits::ChessService;
pub use types::{
    DeepAnalysis, GameHeaders, GamePhase, GameRecord, GameSummary, MoveAnalysis,
    MoveExplanation, MoveLabel, MoveRequest, Operation, PredictRequest, PredictedMove, ReplyMove,
    UserColor, Validate,
};
