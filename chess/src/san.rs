//! Standard Algebraic Notation over cozy-chess boards.

use cozy_chess::{Board, GameStatus, Move, Piece};

use crate::converters::{file_char, format_square, rank_char};
use crate::types::PieceKind;
use crate::uci::from_cozy;

/// Format a legal move as SAN, including check and mate suffixes.
pub(crate) fn format_san(board: &Board, mv: Move) -> String {
    let mut san = format_san_body(board, mv);
    let mut after = board.clone();
    after.play_unchecked(mv);
    if !after.checkers().is_empty() {
        san.push(if after.status() == GameStatus::Won { '#' } else { '+' });
    }
    san
}

/// Resolve SAN text to the single matching legal move.
pub(crate) fn parse_san(board: &Board, legal_moves: &[Move], san: &str) -> Result<Move, SanError> {
    let wanted = normalize(san);
    if wanted.is_empty() {
        return Err(SanError::InvalidFormat(san.to_string()));
    }

    let mut found: Option<Move> = None;
    for &mv in legal_moves {
        let body = format_san_body(board, mv);
        if body == wanted || body.replace('=', "") == wanted {
            if found.is_some() {
                return Err(SanError::AmbiguousMove(san.to_string()));
            }
            found = Some(mv);
        }
    }
    found.ok_or_else(|| SanError::NoLegalMove(san.to_string()))
}

/// Strip check marks and annotation glyphs; accept zero-castling.
fn normalize(san: &str) -> String {
    let trimmed = san.trim().trim_end_matches(['+', '#', '!', '?']);
    match trimmed {
        "0-0" => "O-O".to_string(),
        "0-0-0" => "O-O-O".to_string(),
        other => other.to_string(),
    }
}

fn format_san_body(board: &Board, mv: Move) -> String {
    let Some(piece) = board.piece_on(mv.from) else {
        return format_square(mv.from) + &format_square(mv.to);
    };

    let standard = from_cozy(board, mv);
    if piece == Piece::King && standard.to != mv.to {
        return if (standard.to.file() as u8) > (mv.from.file() as u8) {
            "O-O".to_string()
        } else {
            "O-O-O".to_string()
        };
    }

    let mut san = String::new();
    let is_capture = board.color_on(mv.to).is_some() || (piece == Piece::Pawn && mv.from.file() != mv.to.file());

    if piece == Piece::Pawn {
        if is_capture {
            san.push(file_char(mv.from.file()));
        }
    } else {
        san.push(PieceKind::from(piece).to_char_upper());
        san.push_str(&disambiguation(board, mv, piece));
    }

    if is_capture {
        san.push('x');
    }
    san.push_str(&format_square(mv.to));

    if let Some(promo) = mv.promotion {
        san.push('=');
        san.push(PieceKind::from(promo).to_char_upper());
    }
    san
}

fn disambiguation(board: &Board, mv: Move, piece: Piece) -> String {
    let mut rivals = Vec::new();
    board.generate_moves(|mvs| {
        rivals.extend(
            mvs.into_iter()
                .filter(|other| other.to == mv.to && other.from != mv.from && board.piece_on(other.from) == Some(piece)),
        );
        false
    });

    if rivals.is_empty() {
        return String::new();
    }
    let shares_file = rivals.iter().any(|r| r.from.file() == mv.from.file());
    let shares_rank = rivals.iter().any(|r| r.from.rank() == mv.from.rank());
    match (shares_file, shares_rank) {
        (false, _) => file_char(mv.from.file()).to_string(),
        (true, false) => rank_char(mv.from.rank()).to_string(),
        (true, true) => format_square(mv.from),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SanError {
    #[error("No legal move found for: {0}")]
    NoLegalMove(String),
    #[error("Ambiguous move: {0}")]
    AmbiguousMove(String),
    #[error("Invalid format: {0}")]
    InvalidFormat(String),
}
