//! Move replay and analysis coach.
//!
//! Drives a live board against an automated opponent and a review board
//! over recorded games, asking a remote backend to analyse the user's
//! moves. Board changes are synchronous; remote calls run concurrently and
//! their results are checked for staleness before they touch any state.

pub mod classifier;
pub mod config;
pub mod deep;
pub mod diagnostics;
pub mod error;
pub mod reply;
pub mod session;
pub mod view;

pub use classifier::{classify, MoveOwner};
pub use config::CoachConfig;
pub use deep::{DeepAnalysisState, DeepContext, DeepKind, DeepStatus};
pub use diagnostics::{DiagnosticEntry, DiagnosticLog, DIAGNOSTIC_CAPACITY};
pub use error::CoachError;
pub use session::{BoardSession, MoveRecord, SessionError, SessionMode, StepOutcome};
pub use view::{spawn_coach, CoachEvent, CoachHandle, CoachSnapshot, CoachState, ViewMode};
