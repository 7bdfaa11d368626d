//! On-demand deep analysis of the last completed user move.

use std::fmt;

use chess::UciMove;
use chess_client::{DeepAnalysis, MoveExplanation, Operation};

use crate::view::PaneId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeepKind {
    /// Engine comparison of best and played lines.
    Engine,
    /// Engine comparison plus natural-language explanation.
    Explain,
}

impl DeepKind {
    pub fn operation(self) -> Operation {
        match self {
            Self::Engine => Operation::DeepAnalysis,
            Self::Explain => Operation::ExplainMove,
        }
    }
}

/// The (position, move) pair a deep request is about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeepContext {
    pub pane: PaneId,
    pub fen_before: String,
    pub mv: UciMove,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DeepStatus {
    #[default]
    Idle,
    Running(DeepKind),
    NoMove,
    NotConfigured,
    Failed(Option<String>),
}

impl fmt::Display for DeepStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => Ok(()),
            Self::Running(DeepKind::Engine) => f.write_str("Running deep analysis..."),
            Self::Running(DeepKind::Explain) => f.write_str("Requesting AI explanation..."),
            Self::NoMove => f.write_str("Make a move to analyze."),
            Self::NotConfigured => f.write_str("Enter a username to analyze moves."),
            Self::Failed(Some(detail)) => {
                write!(f, "{}: {}", Operation::DeepAnalysis.failure_message(), detail)
            }
            Self::Failed(None) => write!(f, "{}.", Operation::DeepAnalysis.failure_message()),
        }
    }
}

/// Deep results live here, apart from the per-move panes, because they are
/// tied to one move and replaced wholesale by every request.
#[derive(Debug, Clone, Default)]
pub struct DeepAnalysisState {
    context: Option<DeepContext>,
    pending: Option<u64>,
    status: DeepStatus,
    result: Option<DeepAnalysis>,
    explanation: Option<String>,
}

impl DeepAnalysisState {
    pub fn context(&self) -> Option<&DeepContext> {
        self.context.as_ref()
    }

    pub fn status(&self) -> &DeepStatus {
        &self.status
    }

    pub fn result(&self) -> Option<&DeepAnalysis> {
        self.result.as_ref()
    }

    pub fn explanation(&self) -> Option<&str> {
        self.explanation.as_deref()
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Point at a newly completed user move, dropping anything about the
    /// previous one.
    pub(crate) fn set_context(&mut self, context: DeepContext) {
        *self = Self {
            context: Some(context),
            ..Self::default()
        };
    }

    /// Forget the context; late responses for it will be discarded.
    pub(crate) fn clear(&mut self) {
        *self = Self::default();
    }

    /// Clear only if the context belongs to `pane`.
    pub(crate) fn clear_pane(&mut self, pane: PaneId) {
        if self.context.as_ref().is_some_and(|c| c.pane == pane) {
            self.clear();
        }
    }

    pub(crate) fn set_status(&mut self, status: DeepStatus) {
        self.status = status;
    }

    /// Start a request under `seq`, clearing the previous result.
    pub(crate) fn begin(&mut self, kind: DeepKind, seq: u64) {
        self.pending = Some(seq);
        self.status = DeepStatus::Running(kind);
        self.result = None;
        self.explanation = None;
    }

    /// True when `seq` is the outstanding request and its context still
    /// stands. Consumes the pending slot on success.
    pub(crate) fn accept(&mut self, seq: u64) -> bool {
        if self.context.is_none() || self.pending != Some(seq) {
            return false;
        }
        self.pending = None;
        true
    }

    pub(crate) fn finish_engine(&mut self, analysis: DeepAnalysis) {
        self.status = DeepStatus::Idle;
        self.result = Some(analysis);
        self.explanation = None;
    }

    pub(crate) fn finish_explain(&mut self, explained: MoveExplanation) {
        self.status = DeepStatus::Idle;
        self.result = Some(explained.analysis);
        self.explanation = Some(explained.explanation).filter(|text| !text.is_empty());
    }

    pub(crate) fn fail(&mut self, detail: Option<String>) {
        self.status = DeepStatus::Failed(detail);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chess_client::mock::sample_deep_analysis;

    fn context() -> DeepContext {
        DeepContext {
            pane: PaneId::Live,
            fen_before: chess::START_FEN.to_string(),
            mv: "e2e4".parse().unwrap(),
        }
    }

    #[test]
    fn accepts_only_latest_request_with_context() {
        let mut deep = DeepAnalysisState::default();
        assert!(!deep.accept(1));

        deep.set_context(context());
        deep.begin(DeepKind::Engine, 1);
        deep.begin(DeepKind::Explain, 2);
        assert!(!deep.accept(1));
        assert!(deep.accept(2));
        assert!(!deep.accept(2));
    }

    #[test]
    fn clearing_context_orphans_pending_request() {
        let mut deep = DeepAnalysisState::default();
        deep.set_context(context());
        deep.begin(DeepKind::Engine, 7);
        deep.clear();
        assert!(!deep.accept(7));
        assert_eq!(deep.status(), &DeepStatus::Idle);
    }

    #[test]
    fn new_request_replaces_previous_result() {
        let mut deep = DeepAnalysisState::default();
        deep.set_context(context());
        deep.begin(DeepKind::Explain, 1);
        assert!(deep.accept(1));
        deep.finish_explain(MoveExplanation {
            analysis: sample_deep_analysis(),
            explanation: "Grabs the centre.".into(),
        });
        assert_eq!(deep.explanation(), Some("Grabs the centre."));

        deep.begin(DeepKind::Engine, 2);
        assert!(deep.result().is_none());
        assert!(deep.explanation().is_none());
        assert_eq!(deep.status().to_string(), "Running deep analysis...");
    }

    #[test]
    fn status_lines() {
        assert_eq!(DeepStatus::Idle.to_string(), "");
        assert_eq!(
            DeepStatus::Running(DeepKind::Explain).to_string(),
            "Requesting AI explanation..."
        );
        assert_eq!(DeepStatus::NoMove.to_string(), "Make a move to analyze.");
        assert_eq!(
            DeepStatus::Failed(Some("Stockfish engine not initialized".into())).to_string(),
            "Deep analysis failed: Stockfish engine not initialized"
        );
        assert_eq!(DeepStatus::Failed(None).to_string(), "Deep analysis failed.");
    }
}
