//! The coach view: a synchronous state machine over the live and review
//! boards, and the actor that drives it against a [`ChessService`].

pub mod actor;
pub mod calls;
pub mod commands;
pub mod events;
pub mod handle;
pub mod pane;
pub mod snapshot;
pub mod state;
pub mod status;

use std::sync::Arc;

use chess_client::ChessService;
use tokio::sync::{broadcast, mpsc};

use actor::run_coach_actor;
pub use calls::{Completion, Outcome, PaneId, RemoteCall, Resolution, Ticket};
pub use events::CoachEvent;
pub use handle::CoachHandle;
pub use pane::{Pane, ReviewCatalog};
pub use snapshot::{CatalogSnapshot, CoachSnapshot, DeepSnapshot, PaneSnapshot, UNKNOWN_COLOR_NOTICE};
pub use state::{CoachState, ReviewStep, ViewMode};
pub use status::{AnalysisStatus, CatalogStatus, ReplyStatus};

/// Spawn the actor task owning `state` and return a handle to it.
/// Must be called from within a tokio runtime.
pub fn spawn_coach(state: CoachState, service: Arc<dyn ChessService>) -> CoachHandle {
    let (cmd_tx, cmd_rx) = mpsc::channel(32);
    let (event_tx, _) = broadcast::channel(100);

    tokio::spawn(run_coach_actor(state, service, cmd_rx, event_tx));

    CoachHandle::new(cmd_tx)
}
