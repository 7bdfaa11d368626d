//! Request and response shapes exchanged with the analysis backend.
//!
//! Required keys carry no serde defaults: a response missing one fails to
//! decode instead of turning into zero or an empty list. Optional keys are
//! `Option` fields.

use std::fmt;

use chess::{PieceColor, UciMove};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Backend operations, used for error reporting and logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    AnalyzeMove,
    DeepAnalysis,
    ExplainMove,
    PredictMove,
    ListGames,
    GetGameMoves,
}

impl Operation {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::AnalyzeMove => "analyze move",
            Self::DeepAnalysis => "deep-analyze move",
            Self::ExplainMove => "explain move",
            Self::PredictMove => "predict reply",
            Self::ListGames => "list games",
            Self::GetGameMoves => "get game moves",
        }
    }

    /// Generic user-facing text when the backend gives no detail.
    pub fn failure_message(self) -> &'static str {
        match self {
            Self::AnalyzeMove => "Analysis failed",
            Self::DeepAnalysis | Self::ExplainMove => "Deep analysis failed",
            Self::PredictMove => "Engine reply failed",
            Self::ListGames => "Failed to load games",
            Self::GetGameMoves => "Failed to load game",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Post-receipt checks beyond what serde enforces.
pub trait Validate: Sized {
    fn validate(self) -> Result<Self, String>;
}

fn check_cpl(cpl: f64) -> Result<(), String> {
    if cpl.is_finite() && cpl >= 0.0 {
        Ok(())
    } else {
        Err(format!("centipawn loss must be a non-negative number, got {cpl}"))
    }
}

/// Body shared by analyze, deep-analyze and explain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveRequest {
    pub username: String,
    /// Position before the move.
    pub fen: String,
    #[serde(rename = "move")]
    pub mv: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PredictRequest {
    pub fen: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MoveLabel {
    Good,
    Inaccuracy,
    Mistake,
    Blunder,
}

impl fmt::Display for MoveLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Good => "good",
            Self::Inaccuracy => "inaccuracy",
            Self::Mistake => "mistake",
            Self::Blunder => "blunder",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GamePhase {
    Opening,
    Middlegame,
    Endgame,
}

impl fmt::Display for GamePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Opening => "opening",
            Self::Middlegame => "middlegame",
            Self::Endgame => "endgame",
        })
    }
}

/// Quality verdict for one played move.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoveAnalysis {
    pub label: MoveLabel,
    pub cpl: f64,
    pub phase: GamePhase,
    pub matches_profile_weakness: bool,
    pub suggested_good_moves: Vec<String>,
    pub feedback: Option<String>,
}

impl Validate for MoveAnalysis {
    fn validate(self) -> Result<Self, String> {
        check_cpl(self.cpl)?;
        Ok(self)
    }
}

/// Engine comparison of the best line against the played line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeepAnalysis {
    pub best_move: Option<String>,
    pub best_line: Vec<String>,
    pub played_line: Vec<String>,
    pub eval_best: i32,
    pub eval_played: i32,
    pub eval_delta: i32,
    pub cpl: Option<f64>,
    pub label: Option<MoveLabel>,
    pub phase: Option<GamePhase>,
    pub depth: Option<u32>,
}

impl Validate for DeepAnalysis {
    fn validate(self) -> Result<Self, String> {
        if let Some(cpl) = self.cpl {
            check_cpl(cpl)?;
        }
        Ok(self)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoveExplanation {
    pub analysis: DeepAnalysis,
    pub explanation: String,
}

impl Validate for MoveExplanation {
    fn validate(self) -> Result<Self, String> {
        Ok(Self {
            analysis: self.analysis.validate()?,
            explanation: self.explanation,
        })
    }
}

/// Reply move as sent by the prediction service: either a
/// `{from, to, promotion}` object or a single string (compact or SAN).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ReplyMove {
    Structured {
        from: String,
        to: String,
        #[serde(default)]
        promotion: Option<String>,
    },
    Text(String),
}

impl fmt::Display for ReplyMove {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Structured {
                from,
                to,
                promotion,
            } => write!(f, "{}{}{}", from, to, promotion.as_deref().unwrap_or("")),
            Self::Text(text) => f.write_str(text),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PredictedMove {
    /// `None` when the service has no move to offer (game over).
    #[serde(rename = "move")]
    pub mv: Option<ReplyMove>,
    pub message: Option<String>,
}

impl Validate for PredictedMove {
    fn validate(self) -> Result<Self, String> {
        Ok(self)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSummary {
    pub index: usize,
    pub white: String,
    pub black: String,
    pub result: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameList {
    pub games: Vec<GameSummary>,
}

impl Validate for GameList {
    fn validate(self) -> Result<Self, String> {
        Ok(self)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameHeaders {
    pub white: Option<String>,
    pub black: Option<String>,
    pub result: Option<String>,
    pub opening: Option<String>,
    pub eco: Option<String>,
}

impl GameHeaders {
    pub fn opening_label(&self) -> &str {
        self.opening
            .as_deref()
            .or(self.eco.as_deref())
            .unwrap_or("Opening unknown")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserColor {
    White,
    Black,
}

impl From<UserColor> for PieceColor {
    fn from(c: UserColor) -> Self {
        match c {
            UserColor::White => PieceColor::White,
            UserColor::Black => PieceColor::Black,
        }
    }
}

/// A recorded game, moves in compact form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameRecord {
    #[serde(serialize_with = "serialize_moves", deserialize_with = "deserialize_moves")]
    pub moves: Vec<UciMove>,
    pub headers: GameHeaders,
    /// `None` when the tracked user is not a player in this game.
    pub user_color: Option<UserColor>,
}

impl Validate for GameRecord {
    fn validate(self) -> Result<Self, String> {
        Ok(self)
    }
}

fn serialize_moves<S: Serializer>(moves: &[UciMove], serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_seq(moves.iter().map(|m| m.to_string()))
}

fn deserialize_moves<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<UciMove>, D::Error> {
    let raw = Vec::<String>::deserialize(deserializer)?;
    raw.iter()
        .map(|m| m.parse::<UciMove>().map_err(serde::de::Error::custom))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn analysis_decodes_with_optional_feedback_absent() {
        let analysis: MoveAnalysis = serde_json::from_value(json!({
            "label": "good",
            "cpl": 12.0,
            "phase": "opening",
            "matches_profile_weakness": false,
            "suggested_good_moves": ["e2e4", "d2d4"]
        }))
        .unwrap();
        assert_eq!(analysis.label, MoveLabel::Good);
        assert_eq!(analysis.cpl, 12.0);
        assert_eq!(analysis.feedback, None);
    }

    #[test]
    fn analysis_missing_required_field_fails_to_decode() {
        let result = serde_json::from_value::<MoveAnalysis>(json!({
            "label": "good",
            "phase": "opening",
            "matches_profile_weakness": false,
            "suggested_good_moves": []
        }));
        assert!(result.is_err());
    }

    #[test]
    fn negative_cpl_fails_validation() {
        let analysis = MoveAnalysis {
            label: MoveLabel::Mistake,
            cpl: -3.0,
            phase: GamePhase::Middlegame,
            matches_profile_weakness: false,
            suggested_good_moves: vec![],
            feedback: None,
        };
        assert!(analysis.validate().is_err());
    }

    #[test]
    fn reply_move_accepts_string_object_and_null() {
        let text: PredictedMove = serde_json::from_value(json!({"move": "Nf6", "message": "ok"})).unwrap();
        assert_eq!(text.mv, Some(ReplyMove::Text("Nf6".into())));

        let structured: PredictedMove =
            serde_json::from_value(json!({"move": {"from": "e7", "to": "e5"}})).unwrap();
        assert_eq!(
            structured.mv,
            Some(ReplyMove::Structured {
                from: "e7".into(),
                to: "e5".into(),
                promotion: None
            })
        );

        let none: PredictedMove = serde_json::from_value(json!({"move": null, "message": "Game over"})).unwrap();
        assert_eq!(none.mv, None);
    }

    #[test]
    fn game_record_parses_moves_and_unknown_color() {
        let record: GameRecord = serde_json::from_value(json!({
            "moves": ["e2e4", "e7e5", "g1f3"],
            "headers": {"white": "alice", "black": "bob", "result": "1-0", "eco": "C40"},
            "user_color": null
        }))
        .unwrap();
        assert_eq!(record.moves.len(), 3);
        assert_eq!(record.moves[2].to_string(), "g1f3");
        assert_eq!(record.user_color, None);
        assert_eq!(record.headers.opening_label(), "C40");
    }

    #[test]
    fn game_record_with_bad_move_fails_to_decode() {
        let result = serde_json::from_value::<GameRecord>(json!({
            "moves": ["e2e4", "castle"],
            "headers": {},
            "user_color": "white"
        }));
        assert!(result.is_err());
    }
}
