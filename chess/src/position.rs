use cozy_chess::{Board, GameStatus, Move};

use crate::fen::{format_fen, parse_fen, FenError};
use crate::san::{self, SanError};
use crate::types::PieceColor;
use crate::uci::{from_cozy, to_cozy, UciMove};

/// Immutable board state: layout, side to move, castling, en passant and
/// move clocks. Every accepted move produces a new `Position`.
#[derive(Debug, Clone)]
pub struct Position {
    board: Board,
}

/// Terminal state of a position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoardStatus {
    Ongoing,
    Checkmate { winner: PieceColor },
    Stalemate,
    Draw,
}

impl BoardStatus {
    pub fn is_terminal(self) -> bool {
        !matches!(self, Self::Ongoing)
    }
}

impl std::fmt::Display for BoardStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Ongoing => f.write_str("ongoing"),
            Self::Checkmate { winner } => write!(f, "checkmate, {winner} wins"),
            Self::Stalemate => f.write_str("stalemate"),
            Self::Draw => f.write_str("draw"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RulesError {
    #[error("Illegal move: {0}")]
    IllegalMove(UciMove),
}

impl Position {
    /// The standard starting position.
    pub fn initial() -> Self {
        Self {
            board: Board::default(),
        }
    }

    pub fn from_fen(fen: &str) -> Result<Self, FenError> {
        Ok(Self {
            board: parse_fen(fen)?,
        })
    }

    pub fn fen(&self) -> String {
        format_fen(&self.board)
    }

    pub fn side_to_move(&self) -> PieceColor {
        self.board.side_to_move().into()
    }

    /// All legal moves in standard notation.
    pub fn legal_moves(&self) -> Vec<UciMove> {
        self.cozy_legal_moves()
            .into_iter()
            .map(|mv| from_cozy(&self.board, mv))
            .collect()
    }

    pub fn is_legal(&self, mv: &UciMove) -> bool {
        self.resolve(mv).is_some()
    }

    /// Play `mv`, returning the resulting position. `self` is left untouched.
    pub fn play(&self, mv: &UciMove) -> Result<Position, RulesError> {
        let cozy = self.resolve(mv).ok_or(RulesError::IllegalMove(*mv))?;
        let mut board = self.board.clone();
        board.play_unchecked(cozy);
        Ok(Position { board })
    }

    /// Replay `moves` from `start`. Fails on the first illegal move.
    pub fn replay<'a, I>(start: &Position, moves: I) -> Result<Position, RulesError>
    where
        I: IntoIterator<Item = &'a UciMove>,
    {
        moves
            .into_iter()
            .try_fold(start.clone(), |position, mv| position.play(mv))
    }

    pub fn status(&self) -> BoardStatus {
        match self.board.status() {
            GameStatus::Ongoing => BoardStatus::Ongoing,
            GameStatus::Won => BoardStatus::Checkmate {
                winner: self.side_to_move().opposite(),
            },
            GameStatus::Drawn => {
                if self.board.checkers().is_empty() && self.cozy_legal_moves().is_empty() {
                    BoardStatus::Stalemate
                } else {
                    BoardStatus::Draw
                }
            }
        }
    }

    /// SAN for a legal move in this position.
    pub fn san(&self, mv: &UciMove) -> Result<String, RulesError> {
        let cozy = self.resolve(mv).ok_or(RulesError::IllegalMove(*mv))?;
        Ok(san::format_san(&self.board, cozy))
    }

    /// Resolve SAN text ("Nf3", "exd5", "O-O") to a legal move.
    pub fn parse_san(&self, text: &str) -> Result<UciMove, SanError> {
        let legal = self.cozy_legal_moves();
        let mv = san::parse_san(&self.board, &legal, text)?;
        Ok(from_cozy(&self.board, mv))
    }

    /// The legal cozy-chess move for `mv`. Only the standard spelling is
    /// accepted: castling as king-takes-rook (e1h1) is rejected.
    fn resolve(&self, mv: &UciMove) -> Option<Move> {
        let legal = self.cozy_legal_moves();
        let cozy = to_cozy(mv, &legal);
        (legal.contains(&cozy) && from_cozy(&self.board, cozy) == *mv).then_some(cozy)
    }

    fn cozy_legal_moves(&self) -> Vec<Move> {
        let mut moves = Vec::new();
        self.board.generate_moves(|mvs| {
            moves.extend(mvs);
            false
        });
        moves
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::initial()
    }
}

/// Positions are equal when their FEN is equal, clocks included.
impl PartialEq for Position {
    fn eq(&self, other: &Self) -> bool {
        self.fen() == other.fen()
    }
}

impl Eq for Position {}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.fen())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fen::START_FEN;

    fn mv(s: &str) -> UciMove {
        s.parse().unwrap()
    }

    #[test]
    fn play_returns_new_position_and_keeps_original() {
        let start = Position::initial();
        let after = start.play(&mv("e2e4")).unwrap();
        assert_eq!(start.fen(), START_FEN);
        assert_eq!(
            after.fen(),
            "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1"
        );
        assert_eq!(after.side_to_move(), PieceColor::Black);
    }

    #[test]
    fn illegal_move_is_rejected() {
        let start = Position::initial();
        assert_eq!(
            start.play(&mv("e2e5")),
            Err(RulesError::IllegalMove(mv("e2e5")))
        );
        assert!(!start.is_legal(&mv("e1e2")));
    }

    #[test]
    fn replay_matches_sequential_play() {
        let moves = [mv("e2e4"), mv("e7e5"), mv("g1f3")];
        let replayed = Position::replay(&Position::initial(), &moves).unwrap();
        let stepped = Position::initial()
            .play(&moves[0])
            .and_then(|p| p.play(&moves[1]))
            .and_then(|p| p.play(&moves[2]))
            .unwrap();
        assert_eq!(replayed, stepped);
    }

    #[test]
    fn castling_uses_standard_notation() {
        let pos = Position::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").unwrap();
        assert!(pos.legal_moves().contains(&mv("e1g1")));
        let after = pos.play(&mv("e1g1")).unwrap();
        assert_eq!(after.fen(), "r3k2r/8/8/8/8/8/8/R4RK1 b kq - 1 1");
    }

    #[test]
    fn king_takes_rook_castling_is_rejected() {
        let pos = Position::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").unwrap();
        assert!(!pos.is_legal(&mv("e1h1")));
        assert!(!pos.is_legal(&mv("e1a1")));
        assert_eq!(pos.play(&mv("e1h1")), Err(RulesError::IllegalMove(mv("e1h1"))));
        assert!(!pos.legal_moves().contains(&mv("e1h1")));
    }

    #[test]
    fn detects_checkmate_and_stalemate() {
        let mated = Position::from_fen("rnb1kbnr/pppp1ppp/8/4p3/6Pq/5P2/PPPPP2P/RNBQKBNR w KQkq - 1 3").unwrap();
        assert_eq!(
            mated.status(),
            BoardStatus::Checkmate {
                winner: PieceColor::Black
            }
        );

        let stalemate = Position::from_fen("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1").unwrap();
        assert_eq!(stalemate.status(), BoardStatus::Stalemate);
        assert!(Position::initial().status() == BoardStatus::Ongoing);
    }

    #[test]
    fn san_round_trips_through_position() {
        let pos = Position::initial();
        assert_eq!(pos.san(&mv("g1f3")).unwrap(), "Nf3");
        assert_eq!(pos.parse_san("Nf3").unwrap(), mv("g1f3"));
    }
}
