//! Line commands and text rendering for the terminal driver.

use std::fmt::Write as _;

use chess::{Position, UciMove};
use coach::view::PaneSnapshot;
use coach::{CoachError, CoachSnapshot, DeepKind, DiagnosticEntry, ViewMode};

pub const HELP: &str = "\
Commands:
  play               switch to live play
  review             switch to game review
  user <name>        set the username (blank clears it)
  move <uci>         play a move on the live board, e.g. e2e4 or e7e8q
  reset              reset the active board
  games              load your games for review
  select <n>         load game #n from the list
  next | prev        step through the loaded game
  deep | explain     deep analysis or AI explanation of the last move
  log                print the diagnostic log
  clear              clear the diagnostic log
  show               print the current state
  help               print this help
  quit               exit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Mode(ViewMode),
    User(String),
    Move(UciMove),
    Reset,
    Games,
    Select(usize),
    Next,
    Prev,
    Deep(DeepKind),
    Log,
    Clear,
    Show,
    Help,
    Quit,
}

/// Parse one input line. Blank lines yield `Ok(None)`.
pub fn parse_command(line: &str) -> Result<Option<Input>, String> {
    let line = line.trim();
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    let input = match word.to_ascii_lowercase().as_str() {
        "" => return Ok(None),
        "play" => Input::Mode(ViewMode::Play),
        "review" => Input::Mode(ViewMode::Review),
        "user" => Input::User(rest.to_string()),
        "move" | "m" => Input::Move(
            rest.parse()
                .map_err(|e: chess::MoveParseError| CoachError::from(e).to_string())?,
        ),
        "reset" => Input::Reset,
        "games" => Input::Games,
        "select" => {
            let number: usize = rest
                .parse()
                .map_err(|_| format!("select expects a game number, got {rest:?}"))?;
            if number == 0 {
                return Err("Game numbers start at 1".to_string());
            }
            Input::Select(number - 1)
        }
        "next" | "n" => Input::Next,
        "prev" | "p" => Input::Prev,
        "deep" => Input::Deep(DeepKind::Engine),
        "explain" => Input::Deep(DeepKind::Explain),
        "log" => Input::Log,
        "clear" => Input::Clear,
        "show" => Input::Show,
        "help" | "?" => Input::Help,
        "quit" | "exit" | "q" => Input::Quit,
        other => return Err(format!("Unknown command {other:?}; type help")),
    };
    Ok(Some(input))
}

/// Log entries in `log` that come after `last_seen`.
pub fn new_entries<'a>(
    log: &'a [DiagnosticEntry],
    last_seen: Option<&DiagnosticEntry>,
) -> &'a [DiagnosticEntry] {
    match last_seen.and_then(|seen| log.iter().rposition(|e| e == seen)) {
        Some(pos) => &log[pos + 1..],
        None => log,
    }
}

fn join_or_na(items: &[String]) -> String {
    if items.is_empty() {
        "n/a".to_string()
    } else {
        items.join(" ")
    }
}

/// Moves in SAN, replayed from the start. Falls back to compact notation
/// from the first move that does not replay.
fn moves_line(moves: &[UciMove]) -> String {
    let mut position = Some(Position::initial());
    let mut out = Vec::with_capacity(moves.len());
    for mv in moves {
        let san = position.as_ref().and_then(|p| p.san(mv).ok());
        position = match (position, &san) {
            (Some(p), Some(_)) => p.play(mv).ok(),
            _ => None,
        };
        out.push(san.unwrap_or_else(|| mv.to_string()));
    }
    out.join(" ")
}

fn render_pane(out: &mut String, pane: &PaneSnapshot) {
    let _ = writeln!(
        out,
        "Board: {} ({} to move, {})",
        pane.fen, pane.side_to_move, pane.status
    );
    if !pane.played.is_empty() {
        let _ = writeln!(out, "Moves: {}", moves_line(&pane.played));
    }

    let status = pane.analysis_status.to_string();
    if !status.is_empty() {
        let _ = writeln!(out, "Status: {status}");
    }
    let reply = pane.reply_status.to_string();
    if !reply.is_empty() {
        let _ = writeln!(out, "Reply: {reply}");
    }

    match &pane.analysis {
        Some(analysis) => {
            let _ = writeln!(
                out,
                "Feedback: {} | {} CPL | {}",
                analysis.label, analysis.cpl, analysis.phase
            );
            let _ = writeln!(
                out,
                "  {}",
                if analysis.matches_profile_weakness {
                    "Matches your known weak phase."
                } else {
                    "Not a typical weakness based on your profile."
                }
            );
            if analysis.suggested_good_moves.is_empty() {
                let _ = writeln!(out, "  No suggestions available.");
            } else {
                let _ = writeln!(
                    out,
                    "  Suggested good moves: {}",
                    analysis.suggested_good_moves.join(" ")
                );
            }
            if let Some(feedback) = &analysis.feedback {
                let _ = writeln!(out, "  {feedback}");
            }
        }
        None if status.is_empty() => {
            let _ = writeln!(out, "Make a move to analyze it.");
        }
        None => {}
    }
}

/// Multi-line human summary of a snapshot.
pub fn render_summary(snapshot: &CoachSnapshot) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Mode: {} | Username: {}",
        snapshot.mode,
        snapshot.username.as_deref().unwrap_or("not set")
    );

    if snapshot.mode == ViewMode::Review {
        let catalog = &snapshot.catalog;
        for game in &catalog.games {
            let marker = if catalog.selected == Some(game.index) { '*' } else { ' ' };
            let _ = writeln!(
                out,
                "{marker} #{} {} vs {} {}",
                game.index + 1,
                game.white,
                game.black,
                game.result
            );
        }
        if let Some(headers) = &catalog.headers {
            let _ = writeln!(
                out,
                "Game: {} vs {} | {} | {}",
                headers.white.as_deref().unwrap_or("?"),
                headers.black.as_deref().unwrap_or("?"),
                headers.result.as_deref().unwrap_or("*"),
                headers.opening_label()
            );
        }
        if let Some(notice) = catalog.notice {
            let _ = writeln!(out, "{notice}");
        }
        let status = catalog.status.to_string();
        if !status.is_empty() {
            let _ = writeln!(out, "Review: {status}");
        }
        let _ = writeln!(out, "Move {} / {}", snapshot.review.cursor, snapshot.review.len);
    }

    render_pane(&mut out, snapshot.active());

    let deep = &snapshot.deep;
    let deep_status = deep.status.to_string();
    if !deep_status.is_empty() {
        let _ = writeln!(out, "Deep: {deep_status}");
    }
    if let Some(result) = &deep.result {
        let _ = writeln!(
            out,
            "Best move: {}",
            result.best_move.as_deref().unwrap_or("n/a")
        );
        let _ = writeln!(out, "Best line: {}", join_or_na(&result.best_line));
        let _ = writeln!(out, "Played line: {}", join_or_na(&result.played_line));
        let _ = writeln!(
            out,
            "Eval best: {} | Eval played: {} | Delta: {}",
            result.eval_best, result.eval_played, result.eval_delta
        );
    }
    if let Some(explanation) = &deep.explanation {
        let _ = writeln!(out, "{explanation}");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use coach::CoachState;

    #[test]
    fn parses_commands() {
        assert_eq!(parse_command("   "), Ok(None));
        assert_eq!(parse_command("review"), Ok(Some(Input::Mode(ViewMode::Review))));
        assert_eq!(
            parse_command("move e7e8q"),
            Ok(Some(Input::Move("e7e8q".parse().unwrap())))
        );
        assert_eq!(
            parse_command("user  john doe "),
            Ok(Some(Input::User("john doe".into())))
        );
        assert_eq!(parse_command("select 3"), Ok(Some(Input::Select(2))));
        assert_eq!(parse_command("EXPLAIN"), Ok(Some(Input::Deep(DeepKind::Explain))));
    }

    #[test]
    fn rejects_bad_arguments() {
        assert_eq!(
            parse_command("move e9e4"),
            Err("Invalid move: Invalid square in move \"e9e4\"".to_string())
        );
        assert!(parse_command("select 0").is_err());
        assert!(parse_command("select two").is_err());
        assert!(parse_command("castle").is_err());
    }

    #[test]
    fn new_entries_follow_last_seen() {
        let mut state = CoachState::new(None, 20);
        state.set_username("a");
        state.set_username("b");
        let log = state.log().to_vec();

        assert_eq!(new_entries(&log, None).len(), 2);
        assert_eq!(new_entries(&log, Some(&log[0])), &log[1..]);
        assert!(new_entries(&log, Some(&log[1])).is_empty());
    }

    #[test]
    fn move_line_uses_san() {
        let moves: Vec<UciMove> = ["e2e4", "e7e5", "g1f3", "b8c6", "f1c4", "g8f6", "e1g1"]
            .iter()
            .map(|m| m.parse().unwrap())
            .collect();
        assert_eq!(moves_line(&moves), "e4 e5 Nf3 Nc6 Bc4 Nf6 O-O");
    }

    #[test]
    fn move_line_falls_back_after_unplayable_move() {
        let moves: Vec<UciMove> = ["e2e4", "e2e4", "e7e5"]
            .iter()
            .map(|m| m.parse().unwrap())
            .collect();
        assert_eq!(moves_line(&moves), "e4 e2e4 e7e5");
    }

    #[test]
    fn summary_of_fresh_state() {
        let state = CoachState::new(Some("alice"), 20);
        let text = render_summary(&state.snapshot());
        assert!(text.starts_with("Mode: play | Username: alice\n"));
        assert!(text.contains("white to move, ongoing"));
        assert!(text.contains("Make a move to analyze it."));
    }
}
