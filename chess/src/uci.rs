//! Compact move encoding ("e2e4", "e7e8q").
//!
//! [`UciMove`] is the structured move exchanged with every collaborator.
//! Castling is always written the standard way (king moves two files, e.g.
//! `e1g1`); cozy-chess writes it king-takes-rook (`e1h1`) and the translation
//! happens only at the [`crate::Position`] boundary.

use std::fmt;
use std::str::FromStr;

use cozy_chess::{Board, File, Move, Piece, Rank, Square};

use crate::converters::{format_square, parse_square};
use crate::types::PieceKind;

/// A move as origin, destination and optional promotion piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UciMove {
    pub from: Square,
    pub to: Square,
    pub promotion: Option<PieceKind>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MoveParseError {
    #[error("Move must be 4 or 5 characters, got {0:?}")]
    InvalidLength(String),
    #[error("Invalid square in move {0:?}")]
    InvalidSquare(String),
    #[error("Invalid promotion piece in move {0:?}")]
    InvalidPromotion(String),
}

impl UciMove {
    pub fn new(from: Square, to: Square) -> Self {
        Self {
            from,
            to,
            promotion: None,
        }
    }

    pub fn with_promotion(mut self, piece: PieceKind) -> Self {
        self.promotion = Some(piece);
        self
    }

    /// Build a move from separate square/promotion text, as sent by services
    /// that use a structured `{from, to, promotion}` object.
    pub fn from_parts(from: &str, to: &str, promotion: Option<&str>) -> Result<Self, MoveParseError> {
        let joined = format!("{}{}{}", from, to, promotion.unwrap_or(""));
        let from_sq = parse_square(from).ok_or_else(|| MoveParseError::InvalidSquare(joined.clone()))?;
        let to_sq = parse_square(to).ok_or_else(|| MoveParseError::InvalidSquare(joined.clone()))?;
        let promotion = match promotion.map(str::trim).filter(|p| !p.is_empty()) {
            None => None,
            Some(p) => Some(parse_promotion(p).ok_or(MoveParseError::InvalidPromotion(joined))?),
        };
        Ok(Self {
            from: from_sq,
            to: to_sq,
            promotion,
        })
    }
}

fn parse_promotion(text: &str) -> Option<PieceKind> {
    let mut chars = text.chars();
    let c = chars.next()?;
    if chars.next().is_some() {
        return None;
    }
    PieceKind::from_char(c).filter(|p| p.is_promotion_target())
}

impl fmt::Display for UciMove {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", format_square(self.from), format_square(self.to))?;
        if let Some(promo) = self.promotion {
            write!(f, "{}", promo.to_char_lower())?;
        }
        Ok(())
    }
}

impl FromStr for UciMove {
    type Err = MoveParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if !s.is_ascii() || !(4..=5).contains(&s.len()) {
            return Err(MoveParseError::InvalidLength(s.to_string()));
        }
        let from = parse_square(&s[0..2]).ok_or_else(|| MoveParseError::InvalidSquare(s.to_string()))?;
        let to = parse_square(&s[2..4]).ok_or_else(|| MoveParseError::InvalidSquare(s.to_string()))?;
        let promotion = match s.get(4..) {
            Some(p) if !p.is_empty() => {
                Some(parse_promotion(p).ok_or_else(|| MoveParseError::InvalidPromotion(s.to_string()))?)
            }
            _ => None,
        };
        Ok(Self { from, to, promotion })
    }
}

/// Translate a standard-notation move into the matching cozy-chess legal move.
///
/// Castling written as `e1g1` becomes `e1h1` when that is among `legal_moves`.
/// Every other move converts field by field.
pub(crate) fn to_cozy(mv: &UciMove, legal_moves: &[Move]) -> Move {
    let plain = Move {
        from: mv.from,
        to: mv.to,
        promotion: mv.promotion.map(Piece::from),
    };

    let is_back_rank = matches!(mv.from.rank(), Rank::First | Rank::Eighth);
    let is_e_file = matches!(mv.from.file(), File::E);
    let is_g_or_c_file = matches!(mv.to.file(), File::G | File::C);
    if !(is_back_rank && is_e_file && is_g_or_c_file && mv.promotion.is_none()) {
        return plain;
    }

    let rook_file = if mv.to.file() == File::G { File::H } else { File::A };
    let castle = Move {
        from: mv.from,
        to: Square::new(rook_file, mv.from.rank()),
        promotion: None,
    };
    if !legal_moves.contains(&plain) && legal_moves.contains(&castle) {
        castle
    } else {
        plain
    }
}

/// Translate a cozy-chess move played on `board` into standard notation.
pub(crate) fn from_cozy(board: &Board, mv: Move) -> UciMove {
    let mover = board.color_on(mv.from);
    let is_castle = board.piece_on(mv.from) == Some(Piece::King)
        && board.piece_on(mv.to) == Some(Piece::Rook)
        && board.color_on(mv.to) == mover;

    let to = if is_castle {
        let file = if (mv.to.file() as u8) > (mv.from.file() as u8) { File::G } else { File::C };
        Square::new(file, mv.from.rank())
    } else {
        mv.to
    };

    UciMove {
        from: mv.from,
        to,
        promotion: mv.promotion.map(PieceKind::from),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn sq(s: &str) -> Square {
        parse_square(s).unwrap()
    }

    #[test]
    fn test_format_uci_move() {
        assert_eq!(UciMove::new(sq("e2"), sq("e4")).to_string(), "e2e4");
    }

    #[test]
    fn test_format_uci_move_with_promotion() {
        let mv = UciMove::new(sq("e7"), sq("e8")).with_promotion(PieceKind::Queen);
        assert_eq!(mv.to_string(), "e7e8q");
    }

    #[test]
    fn parse_accepts_upper_case_promotion() {
        let mv: UciMove = "a7a8N".parse().unwrap();
        assert_eq!(mv.promotion, Some(PieceKind::Knight));
        assert_eq!(mv.to_string(), "a7a8n");
    }

    #[test]
    fn parse_rejects_malformed_text() {
        assert!(matches!("e2e".parse::<UciMove>(), Err(MoveParseError::InvalidLength(_))));
        assert!(matches!("e2e4qq".parse::<UciMove>(), Err(MoveParseError::InvalidLength(_))));
        assert!(matches!("z2e4".parse::<UciMove>(), Err(MoveParseError::InvalidSquare(_))));
        assert!(matches!("e7e8k".parse::<UciMove>(), Err(MoveParseError::InvalidPromotion(_))));
        assert!(matches!("e7e8p".parse::<UciMove>(), Err(MoveParseError::InvalidPromotion(_))));
    }

    #[test]
    fn from_parts_matches_compact_parse() {
        let structured = UciMove::from_parts("g7", "g8", Some("q")).unwrap();
        assert_eq!(structured, "g7g8q".parse().unwrap());
        let plain = UciMove::from_parts("e2", "e4", Some("")).unwrap();
        assert_eq!(plain.promotion, None);
    }

    #[test]
    fn castling_translates_both_ways() {
        let board: Board = "r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1".parse().unwrap();
        let mut legal = Vec::new();
        board.generate_moves(|mvs| {
            legal.extend(mvs);
            false
        });

        let short: UciMove = "e1g1".parse().unwrap();
        let cozy = to_cozy(&short, &legal);
        assert_eq!(cozy.to, sq("h1"));
        assert_eq!(from_cozy(&board, cozy), short);

        let long: UciMove = "e1c1".parse().unwrap();
        let cozy = to_cozy(&long, &legal);
        assert_eq!(cozy.to, sq("a1"));
        assert_eq!(from_cozy(&board, cozy), long);
    }

    fn arb_move() -> impl Strategy<Value = UciMove> {
        let promo = prop_oneof![
            Just(None),
            Just(Some(PieceKind::Queen)),
            Just(Some(PieceKind::Rook)),
            Just(Some(PieceKind::Bishop)),
            Just(Some(PieceKind::Knight)),
        ];
        (0usize..64, 0usize..64, promo).prop_map(|(from, to, promotion)| UciMove {
            from: Square::index(from),
            to: Square::index(to),
            promotion,
        })
    }

    proptest! {
        #[test]
        fn compact_encoding_round_trips(mv in arb_move()) {
            let text = mv.to_string();
            prop_assert!(text.len() == 4 || text.len() == 5);
            prop_assert_eq!(text.parse::<UciMove>().unwrap(), mv);
        }
    }
}
