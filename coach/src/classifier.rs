//! Decides whose move a review step is.

use chess::PieceColor;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOwner {
    User,
    Opponent,
}

/// Classify the move about to be played from `cursor_before`.
///
/// Sides alternate strictly by ply parity from the standard start, white
/// first. With no known user colour every move counts as the user's, so
/// nothing is silently skipped.
pub fn classify(cursor_before: usize, user_color: Option<PieceColor>) -> MoveOwner {
    let mover = if cursor_before % 2 == 0 {
        PieceColor::White
    } else {
        PieceColor::Black
    };
    match user_color {
        Some(color) if color != mover => MoveOwner::Opponent,
        _ => MoveOwner::User,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn white_owns_even_plies() {
        let owners: Vec<_> = (0..4).map(|ply| classify(ply, Some(PieceColor::White))).collect();
        assert_eq!(
            owners,
            vec![
                MoveOwner::User,
                MoveOwner::Opponent,
                MoveOwner::User,
                MoveOwner::Opponent
            ]
        );
    }

    #[test]
    fn black_owns_odd_plies() {
        assert_eq!(classify(0, Some(PieceColor::Black)), MoveOwner::Opponent);
        assert_eq!(classify(1, Some(PieceColor::Black)), MoveOwner::User);
        assert_eq!(classify(10, Some(PieceColor::Black)), MoveOwner::Opponent);
    }

    #[test]
    fn unknown_colour_analyzes_everything() {
        assert!((0..20).all(|ply| classify(ply, None) == MoveOwner::User));
    }
}
