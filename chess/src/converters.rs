//! Square and piece conversions between text and cozy-chess values.

use cozy_chess::{File, Rank, Square};

/// Format a square as lower-case algebraic text ("e4").
pub fn format_square(sq: Square) -> String {
    let mut s = String::with_capacity(2);
    s.push(file_char(sq.file()));
    s.push(rank_char(sq.rank()));
    s
}

/// Parse algebraic square text ("e4"). Returns `None` for anything else.
pub fn parse_square(s: &str) -> Option<Square> {
    let bytes = s.as_bytes();
    if bytes.len() != 2 {
        return None;
    }
    let file = match bytes[0] {
        b'a'..=b'h' => File::index((bytes[0] - b'a') as usize),
        _ => return None,
    };
    let rank = match bytes[1] {
        b'1'..=b'8' => Rank::index((bytes[1] - b'1') as usize),
        _ => return None,
    };
    Some(Square::new(file, rank))
}

pub fn file_char(file: File) -> char {
    (b'a' + file as u8) as char
}

pub fn rank_char(rank: Rank) -> char {
    (b'1' + rank as u8) as char
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn square_text_round_trips_on_corners() {
        for text in ["a1", "h1", "a8", "h8", "e4"] {
            let sq = parse_square(text).unwrap();
            assert_eq!(format_square(sq), text);
        }
    }

    #[test]
    fn parse_square_rejects_out_of_board_text() {
        assert!(parse_square("i1").is_none());
        assert!(parse_square("a9").is_none());
        assert!(parse_square("e").is_none());
        assert!(parse_square("e44").is_none());
    }
}
