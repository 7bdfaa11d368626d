//! Normalising opponent replies from the prediction service.

use chess::{Position, UciMove};
use chess_client::ReplyMove;

/// Turn a reply into a move that is legal in `position`.
///
/// Structured replies are read as `{from, to, promotion}`. Text replies are
/// tried as a compact move first and as SAN second. The first legal reading
/// wins; `None` means no reading is legal and the reply must be dropped.
pub fn normalize_reply(position: &Position, reply: &ReplyMove) -> Option<UciMove> {
    let legal = |mv: UciMove| position.is_legal(&mv).then_some(mv);

    match reply {
        ReplyMove::Structured {
            from,
            to,
            promotion,
        } => UciMove::from_parts(from.trim(), to.trim(), promotion.as_deref())
            .ok()
            .and_then(legal),
        ReplyMove::Text(text) => {
            let text = text.trim();
            text.parse::<UciMove>()
                .ok()
                .and_then(legal)
                .or_else(|| position.parse_san(text).ok())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn after_e4() -> Position {
        Position::initial().play(&"e2e4".parse().unwrap()).unwrap()
    }

    fn text(s: &str) -> ReplyMove {
        ReplyMove::Text(s.to_string())
    }

    #[test]
    fn structured_reply() {
        let reply = ReplyMove::Structured {
            from: "e7".into(),
            to: "e5".into(),
            promotion: None,
        };
        assert_eq!(
            normalize_reply(&after_e4(), &reply),
            Some("e7e5".parse().unwrap())
        );
    }

    #[test]
    fn compact_and_san_text() {
        let position = after_e4();
        assert_eq!(normalize_reply(&position, &text("g8f6")), Some("g8f6".parse().unwrap()));
        assert_eq!(normalize_reply(&position, &text("Nf6")), Some("g8f6".parse().unwrap()));
        assert_eq!(normalize_reply(&position, &text(" c5 ")), Some("c7c5".parse().unwrap()));
    }

    #[test]
    fn illegal_or_garbage_is_dropped() {
        let position = after_e4();
        assert_eq!(normalize_reply(&position, &text("e2e4")), None);
        assert_eq!(normalize_reply(&position, &text("Qxh7")), None);
        assert_eq!(normalize_reply(&position, &text("")), None);
        let reply = ReplyMove::Structured {
            from: "z9".into(),
            to: "e5".into(),
            promotion: None,
        };
        assert_eq!(normalize_reply(&position, &reply), None);
    }
}
