use chess::UciMove;
use tokio::sync::{broadcast, oneshot};

use super::events::CoachEvent;
use super::snapshot::CoachSnapshot;
use super::state::ViewMode;
use crate::deep::DeepKind;
use crate::error::CoachError;

pub type CommandReply = oneshot::Sender<Result<CoachSnapshot, CoachError>>;

/// Commands sent to the coach actor. Each embeds a oneshot for the reply.
pub enum CoachCommand {
    SetUsername {
        name: String,
        reply: oneshot::Sender<CoachSnapshot>,
    },
    SwitchMode {
        mode: ViewMode,
        reply: oneshot::Sender<CoachSnapshot>,
    },
    PlayMove {
        mv: UciMove,
        reply: CommandReply,
    },
    Reset {
        reply: oneshot::Sender<CoachSnapshot>,
    },
    LoadGames {
        reply: CommandReply,
    },
    SelectGame {
        index: usize,
        reply: CommandReply,
    },
    StepForward {
        reply: CommandReply,
    },
    StepBack {
        reply: CommandReply,
    },
    RequestDeep {
        kind: DeepKind,
        reply: CommandReply,
    },
    ClearLog {
        reply: oneshot::Sender<CoachSnapshot>,
    },
    GetSnapshot {
        reply: oneshot::Sender<CoachSnapshot>,
    },
    Subscribe {
        reply: oneshot::Sender<(CoachSnapshot, broadcast::Receiver<CoachEvent>)>,
    },
    Shutdown,
}
