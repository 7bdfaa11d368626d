//! Board session: one position plus a move history and a cursor.
//!
//! A single type serves both modes. In [`SessionMode::Live`] the history is
//! the append-only list of played moves and the cursor always sits at its
//! end. In [`SessionMode::Review`] the history is a fixed script and the
//! cursor moves over it in both directions.
//!
//! Invariant: `position == replay(start, history[..cursor])` and
//! `cursor <= history.len()` after every operation.

use chess::{BoardStatus, Position, UciMove};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionMode {
    Live,
    Review,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error("Illegal move: {0}")]
    IllegalMove(UciMove),
    #[error("Recorded move {mv} at ply {ply} was rejected by the rules engine")]
    ReplayIntegrity { ply: usize, mv: UciMove },
    #[error("Expected scripted move {expected}, got {found}")]
    ScriptMismatch { expected: UciMove, found: UciMove },
    #[error("No scripted moves remain")]
    ScriptExhausted,
    #[error("Session has no script to step through")]
    NotScripted,
    #[error("Game is over")]
    GameOver,
}

/// A move that was applied (or, for a backward step, undone).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveRecord {
    /// Cursor before the move was played.
    pub ply: usize,
    pub mv: UciMove,
    /// Position the move was played from.
    pub before: Position,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    Applied(MoveRecord),
    AtStart,
    AtEnd,
}

#[derive(Debug, Clone)]
pub struct BoardSession {
    mode: SessionMode,
    start: Position,
    position: Position,
    history: Vec<UciMove>,
    cursor: usize,
    status: BoardStatus,
    version: u64,
}

impl BoardSession {
    /// Empty live session from the standard starting position.
    pub fn live() -> Self {
        Self::with_mode(SessionMode::Live, Vec::new())
    }

    /// Review session over a recorded move list, cursor at the start.
    pub fn review(script: Vec<UciMove>) -> Self {
        Self::with_mode(SessionMode::Review, script)
    }

    fn with_mode(mode: SessionMode, history: Vec<UciMove>) -> Self {
        let start = Position::initial();
        Self {
            mode,
            status: start.status(),
            position: start.clone(),
            start,
            history,
            cursor: 0,
            version: 0,
        }
    }

    pub fn mode(&self) -> SessionMode {
        self.mode
    }

    pub fn position(&self) -> &Position {
        &self.position
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    /// Full history: played moves (live) or the whole script (review).
    pub fn history(&self) -> &[UciMove] {
        &self.history
    }

    /// Moves that lead to the current position.
    pub fn played(&self) -> &[UciMove] {
        &self.history[..self.cursor]
    }

    /// Next scripted move, if any.
    pub fn next_move(&self) -> Option<UciMove> {
        match self.mode {
            SessionMode::Live => None,
            SessionMode::Review => self.history.get(self.cursor).copied(),
        }
    }

    pub fn terminal(&self) -> BoardStatus {
        self.status
    }

    /// Bumped on every mutation; async callers compare it before applying
    /// a late result.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Apply `mv` to the current position.
    ///
    /// Live sessions append it to the history. Review sessions only accept
    /// the next scripted move; a rules rejection of that move is a replay
    /// integrity error, not an ordinary illegal move. Nothing changes on
    /// failure.
    pub fn apply_move(&mut self, mv: UciMove) -> Result<MoveRecord, SessionError> {
        let ply = self.cursor;
        let next = match self.mode {
            SessionMode::Live => {
                if self.status.is_terminal() {
                    return Err(SessionError::GameOver);
                }
                self.position
                    .play(&mv)
                    .map_err(|_| SessionError::IllegalMove(mv))?
            }
            SessionMode::Review => {
                let expected = *self
                    .history
                    .get(ply)
                    .ok_or(SessionError::ScriptExhausted)?;
                if expected != mv {
                    return Err(SessionError::ScriptMismatch {
                        expected,
                        found: mv,
                    });
                }
                self.position
                    .play(&mv)
                    .map_err(|_| SessionError::ReplayIntegrity { ply, mv })?
            }
        };

        let before = std::mem::replace(&mut self.position, next);
        if self.mode == SessionMode::Live {
            self.history.push(mv);
        }
        self.cursor += 1;
        self.status = self.position.status();
        self.version += 1;
        tracing::debug!(ply, %mv, version = self.version, "Move applied");

        Ok(MoveRecord { ply, mv, before })
    }

    /// Advance over the next scripted move. A no-op at the end.
    pub fn step_forward(&mut self) -> Result<StepOutcome, SessionError> {
        if self.mode != SessionMode::Review {
            return Err(SessionError::NotScripted);
        }
        match self.next_move() {
            None => Ok(StepOutcome::AtEnd),
            Some(mv) => self.apply_move(mv).map(StepOutcome::Applied),
        }
    }

    /// Undo one scripted move by replaying from the start. A no-op at the
    /// start. The returned record describes the undone move.
    pub fn step_back(&mut self) -> Result<StepOutcome, SessionError> {
        if self.mode != SessionMode::Review {
            return Err(SessionError::NotScripted);
        }
        if self.cursor == 0 {
            return Ok(StepOutcome::AtStart);
        }

        let ply = self.cursor - 1;
        let mv = self.history[ply];
        let before = Position::replay(&self.start, &self.history[..ply]).map_err(|e| {
            let chess::RulesError::IllegalMove(bad) = e;
            let ply = self.history.iter().position(|m| *m == bad).unwrap_or(ply);
            SessionError::ReplayIntegrity { ply, mv: bad }
        })?;

        self.position = before.clone();
        self.cursor = ply;
        self.status = self.position.status();
        self.version += 1;
        tracing::debug!(ply, %mv, version = self.version, "Move undone");

        Ok(StepOutcome::Applied(MoveRecord { ply, mv, before }))
    }

    /// Back to the starting position. Live sessions drop their history;
    /// review sessions keep the script and seek to ply 0.
    pub fn reset(&mut self) {
        if self.mode == SessionMode::Live {
            self.history.clear();
        }
        self.position = self.start.clone();
        self.cursor = 0;
        self.status = self.position.status();
        self.version += 1;
        tracing::debug!(mode = ?self.mode, version = self.version, "Session reset");
    }
}
