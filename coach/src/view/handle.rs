use chess::UciMove;
use tokio::sync::{broadcast, mpsc, oneshot};

use super::commands::*;
use super::events::CoachEvent;
use super::snapshot::CoachSnapshot;
use super::state::ViewMode;
use crate::deep::DeepKind;
use crate::error::CoachError;

/// Cheap, cloneable handle to the coach actor.
#[derive(Clone)]
pub struct CoachHandle {
    cmd_tx: mpsc::Sender<CoachCommand>,
}

impl CoachHandle {
    pub(crate) fn new(cmd_tx: mpsc::Sender<CoachCommand>) -> Self {
        Self { cmd_tx }
    }

    pub async fn set_username(&self, name: impl Into<String>) -> Result<CoachSnapshot, CoachError> {
        let name = name.into();
        self.request(|reply| CoachCommand::SetUsername { name, reply })
            .await
    }

    pub async fn switch_mode(&self, mode: ViewMode) -> Result<CoachSnapshot, CoachError> {
        self.request(|reply| CoachCommand::SwitchMode { mode, reply })
            .await
    }

    pub async fn play_move(&self, mv: UciMove) -> Result<CoachSnapshot, CoachError> {
        self.request(|reply| CoachCommand::PlayMove { mv, reply })
            .await?
    }

    pub async fn reset(&self) -> Result<CoachSnapshot, CoachError> {
        self.request(|reply| CoachCommand::Reset { reply }).await
    }

    pub async fn load_games(&self) -> Result<CoachSnapshot, CoachError> {
        self.request(|reply| CoachCommand::LoadGames { reply })
            .await?
    }

    pub async fn select_game(&self, index: usize) -> Result<CoachSnapshot, CoachError> {
        self.request(|reply| CoachCommand::SelectGame { index, reply })
            .await?
    }

    pub async fn step_forward(&self) -> Result<CoachSnapshot, CoachError> {
        self.request(|reply| CoachCommand::StepForward { reply })
            .await?
    }

    pub async fn step_back(&self) -> Result<CoachSnapshot, CoachError> {
        self.request(|reply| CoachCommand::StepBack { reply })
            .await?
    }

    pub async fn request_deep(&self, kind: DeepKind) -> Result<CoachSnapshot, CoachError> {
        self.request(|reply| CoachCommand::RequestDeep { kind, reply })
            .await?
    }

    pub async fn clear_log(&self) -> Result<CoachSnapshot, CoachError> {
        self.request(|reply| CoachCommand::ClearLog { reply }).await
    }

    pub async fn snapshot(&self) -> Result<CoachSnapshot, CoachError> {
        self.request(|reply| CoachCommand::GetSnapshot { reply })
            .await
    }

    pub async fn subscribe(
        &self,
    ) -> Result<(CoachSnapshot, broadcast::Receiver<CoachEvent>), CoachError> {
        self.request(|reply| CoachCommand::Subscribe { reply })
            .await
    }

    pub async fn shutdown(&self) {
        let _ = self.cmd_tx.send(CoachCommand::Shutdown).await;
    }

    async fn request<T>(
        &self,
        command: impl FnOnce(oneshot::Sender<T>) -> CoachCommand,
    ) -> Result<T, CoachError> {
        let (tx, rx) = oneshot::channel();
        self.cmd_tx
            .send(command(tx))
            .await
            .map_err(|_| CoachError::Internal("Coach actor closed".into()))?;
        rx.await
            .map_err(|_| CoachError::Internal("Reply dropped".into()))
    }
}
