use std::sync::Arc;

use chess_client::ChessService;
use tokio::sync::{broadcast, mpsc};
use tracing::Instrument;

use super::calls::{Completion, RemoteCall};
use super::commands::*;
use super::events::CoachEvent;
use super::snapshot::CoachSnapshot;
use super::state::CoachState;
use crate::error::CoachError;

/// The main coach actor loop.
/// Owns the state. Processes commands and call completions sequentially.
pub(crate) async fn run_coach_actor(
    state: CoachState,
    service: Arc<dyn ChessService>,
    cmd_rx: mpsc::Receiver<CoachCommand>,
    event_tx: broadcast::Sender<CoachEvent>,
) {
    run_coach_actor_inner(state, service, cmd_rx, event_tx)
        .instrument(tracing::info_span!("coach"))
        .await;
}

async fn run_coach_actor_inner(
    mut state: CoachState,
    service: Arc<dyn ChessService>,
    mut cmd_rx: mpsc::Receiver<CoachCommand>,
    event_tx: broadcast::Sender<CoachEvent>,
) {
    tracing::info!("Coach actor started");

    let (done_tx, mut done_rx) = mpsc::unbounded_channel();
    let runner = CallRunner { service, done_tx };

    loop {
        tokio::select! {
            biased;

            cmd = cmd_rx.recv() => {
                match cmd {
                    Some(CoachCommand::Shutdown) | None => {
                        tracing::info!("Coach actor shutting down");
                        break;
                    }
                    Some(cmd) => handle_command(&mut state, cmd, &runner, &event_tx),
                }
            }

            Some(completion) = done_rx.recv() => {
                let resolution = state.complete(completion);
                tracing::debug!(?resolution, "Remote call completed");
                publish(&state, &event_tx);
            }
        }
    }

    tracing::info!("Coach actor exited");
}

/// Runs remote calls as independent tasks. Results re-enter the actor
/// through the completion channel, so the actor stays the only writer.
struct CallRunner {
    service: Arc<dyn ChessService>,
    done_tx: mpsc::UnboundedSender<Completion>,
}

impl CallRunner {
    fn dispatch(&self, calls: Vec<RemoteCall>) {
        for call in calls {
            tracing::debug!(ticket = ?call.ticket(), "Dispatching remote call");
            let service = Arc::clone(&self.service);
            let done_tx = self.done_tx.clone();
            tokio::spawn(
                async move {
                    let completion = call.execute(service.as_ref()).await;
                    // Actor gone means nobody is left to care.
                    let _ = done_tx.send(completion);
                }
                .in_current_span(),
            );
        }
    }
}

fn handle_command(
    state: &mut CoachState,
    cmd: CoachCommand,
    runner: &CallRunner,
    event_tx: &broadcast::Sender<CoachEvent>,
) {
    match cmd {
        CoachCommand::SetUsername { name, reply } => {
            state.set_username(&name);
            let _ = reply.send(publish(state, event_tx));
        }
        CoachCommand::SwitchMode { mode, reply } => {
            runner.dispatch(state.switch_mode(mode));
            let _ = reply.send(publish(state, event_tx));
        }
        CoachCommand::PlayMove { mv, reply } => {
            let result = state.play_move(mv).map(|calls| runner.dispatch(calls));
            respond(state, result, reply, event_tx);
        }
        CoachCommand::Reset { reply } => {
            state.reset();
            let _ = reply.send(publish(state, event_tx));
        }
        CoachCommand::LoadGames { reply } => {
            let result = state.load_games().map(|calls| runner.dispatch(calls));
            respond(state, result, reply, event_tx);
        }
        CoachCommand::SelectGame { index, reply } => {
            let result = state.select_game(index).map(|calls| runner.dispatch(calls));
            respond(state, result, reply, event_tx);
        }
        CoachCommand::StepForward { reply } => {
            let result = state.step_forward().map(|step| runner.dispatch(step.calls));
            respond(state, result, reply, event_tx);
        }
        CoachCommand::StepBack { reply } => {
            let result = state.step_back().map(|step| runner.dispatch(step.calls));
            respond(state, result, reply, event_tx);
        }
        CoachCommand::RequestDeep { kind, reply } => {
            let result = state.request_deep(kind).map(|calls| runner.dispatch(calls));
            respond(state, result, reply, event_tx);
        }
        CoachCommand::ClearLog { reply } => {
            state.clear_log();
            let _ = reply.send(publish(state, event_tx));
        }
        CoachCommand::GetSnapshot { reply } => {
            let _ = reply.send(state.snapshot());
        }
        CoachCommand::Subscribe { reply } => {
            let _ = reply.send((state.snapshot(), event_tx.subscribe()));
        }
        // Handled by the loop before dispatch.
        CoachCommand::Shutdown => {}
    }
}

/// Failed commands still publish: status lines and the log may have changed.
fn respond(
    state: &CoachState,
    result: Result<(), CoachError>,
    reply: CommandReply,
    event_tx: &broadcast::Sender<CoachEvent>,
) {
    let snapshot = publish(state, event_tx);
    let _ = reply.send(result.map(|()| snapshot));
}

fn publish(state: &CoachState, event_tx: &broadcast::Sender<CoachEvent>) -> CoachSnapshot {
    let snapshot = state.snapshot();
    let _ = event_tx.send(CoachEvent::Updated(snapshot.clone()));
    snapshot
}
