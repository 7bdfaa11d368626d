//! Rules boundary for the coach workspace.
//!
//! Wraps cozy-chess behind project-owned types: an immutable [`Position`],
//! the structured/compact [`UciMove`], SAN resolution and terminal status.
//! Nothing outside this crate touches cozy-chess directly.

pub mod converters;
pub mod fen;
pub mod position;
pub mod san;
pub mod types;
pub mod uci;

pub use converters::{format_square, parse_square};
pub use cozy_chess::Square;
pub use fen::{FenError, START_FEN};
pub use position::{BoardStatus, Position, RulesError};
pub use san::SanError;
pub use types::{PieceColor, PieceKind};
pub use uci::{MoveParseError, UciMove};
