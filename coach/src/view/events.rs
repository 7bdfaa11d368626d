use super::snapshot::CoachSnapshot;

/// Events broadcast from the coach actor to all subscribers.
#[derive(Debug, Clone)]
pub enum CoachEvent {
    /// Full state snapshot after any command or remote completion.
    Updated(CoachSnapshot),
}
