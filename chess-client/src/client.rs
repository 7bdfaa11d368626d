//! HTTP client for the analysis backend

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{ClientError, ClientResult};
use crate::traits::ChessService;
use crate::types::{
    DeepAnalysis, GameList, GameRecord, GameSummary, MoveAnalysis, MoveExplanation, MoveRequest,
    Operation, PredictRequest, PredictedMove, Validate,
};

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    pub timeout: Duration,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// Network client for communicating with the analysis backend
#[derive(Debug, Clone)]
pub struct ChessClient {
    http: Client,
    base_url: Url,
}

impl ChessClient {
    pub fn new(config: ClientConfig) -> ClientResult<Self> {
        let base_url = Url::parse(&config.base_url)
            .map_err(|e| ClientError::InvalidAddress(format!("{}: {}", config.base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(ClientError::InvalidAddress(config.base_url));
        }

        let http = Client::builder()
            .user_agent(concat!("coach/", env!("CARGO_PKG_VERSION")))
            .timeout(config.timeout)
            .build()?;

        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Append path segments to the base URL, percent-encoding each one.
    fn endpoint(&self, segments: &[&str]) -> ClientResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ClientError::InvalidAddress(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn post_json<B, T>(&self, operation: Operation, segments: &[&str], body: &B) -> ClientResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned + Validate,
    {
        let url = self.endpoint(segments)?;
        self.send(operation, self.http.post(url).json(body)).await
    }

    async fn get_json<T>(&self, operation: Operation, segments: &[&str], query: &[(&str, String)]) -> ClientResult<T>
    where
        T: DeserializeOwned + Validate,
    {
        let url = self.endpoint(segments)?;
        self.send(operation, self.http.get(url).query(query)).await
    }

    async fn send<T>(&self, operation: Operation, request: RequestBuilder) -> ClientResult<T>
    where
        T: DeserializeOwned + Validate,
    {
        tracing::debug!(%operation, "Sending request");
        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let detail = extract_detail(&body);
            tracing::warn!(%operation, status = status.as_u16(), ?detail, "Backend returned an error");
            return Err(ClientError::Service {
                operation,
                status: status.as_u16(),
                detail,
            });
        }

        decode(operation, &body)
    }
}

/// Decode and validate a success body.
pub(crate) fn decode<T>(operation: Operation, body: &str) -> ClientResult<T>
where
    T: DeserializeOwned + Validate,
{
    serde_json::from_str::<T>(body)
        .map_err(|e| e.to_string())
        .and_then(Validate::validate)
        .map_err(|reason| ClientError::Decode { operation, reason })
}

/// Pull the human-readable `detail` out of an error body.
///
/// Accepts `{"detail": "text"}` and validation-style
/// `{"detail": [{"msg": "..."}, ...]}` bodies.
pub(crate) fn extract_detail(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    match value.get("detail")? {
        serde_json::Value::String(text) if !text.trim().is_empty() => Some(text.clone()),
        serde_json::Value::Array(items) => {
            let messages: Vec<&str> = items
                .iter()
                .filter_map(|item| item.get("msg").and_then(|m| m.as_str()))
                .collect();
            (!messages.is_empty()).then(|| messages.join("; "))
        }
        _ => None,
    }
}

#[async_trait]
impl ChessService for ChessClient {
    async fn analyze_move(&self, request: MoveRequest) -> ClientResult<MoveAnalysis> {
        self.post_json(Operation::AnalyzeMove, &["analyze", "move"], &request)
            .await
    }

    async fn analyze_move_deep(&self, request: MoveRequest) -> ClientResult<DeepAnalysis> {
        self.post_json(Operation::DeepAnalysis, &["analyze", "move", "deep"], &request)
            .await
    }

    async fn explain_move(&self, request: MoveRequest) -> ClientResult<MoveExplanation> {
        self.post_json(Operation::ExplainMove, &["analyze", "move", "explain"], &request)
            .await
    }

    async fn predict_move(&self, fen: String) -> ClientResult<PredictedMove> {
        self.post_json(Operation::PredictMove, &["model", "predict"], &PredictRequest { fen })
            .await
    }

    async fn list_games(&self, username: String, limit: usize) -> ClientResult<Vec<GameSummary>> {
        let list: GameList = self
            .get_json(
                Operation::ListGames,
                &["games", "pgn", &username],
                &[("limit", limit.to_string())],
            )
            .await?;
        Ok(list.games)
    }

    async fn get_game_moves(&self, username: String, index: usize) -> ClientResult<GameRecord> {
        self.get_json(
            Operation::GetGameMoves,
            &["games", "pgn", &username, &index.to_string()],
            &[],
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_unparseable_base_url() {
        let result = ChessClient::new(ClientConfig::new("not a url"));
        assert!(matches!(result, Err(ClientError::InvalidAddress(_))));
    }

    #[test]
    fn endpoint_encodes_username_segment() {
        let client = ChessClient::new(ClientConfig::new("http://127.0.0.1:8000/api/")).unwrap();
        let url = client.endpoint(&["games", "pgn", "john doe/x"]).unwrap();
        assert_eq!(url.as_str(), "http://127.0.0.1:8000/api/games/pgn/john%20doe%2Fx");
    }

    #[test]
    fn extracts_string_and_list_details() {
        assert_eq!(
            extract_detail(r#"{"detail": "Stockfish engine not initialized"}"#).as_deref(),
            Some("Stockfish engine not initialized")
        );
        assert_eq!(
            extract_detail(r#"{"detail": [{"msg": "field required"}, {"msg": "bad fen"}]}"#).as_deref(),
            Some("field required; bad fen")
        );
        assert_eq!(extract_detail("<html>502</html>"), None);
        assert_eq!(extract_detail(r#"{"detail": ""}"#), None);
    }

    #[test]
    fn decode_reports_operation_on_failure() {
        let err = decode::<MoveAnalysis>(Operation::AnalyzeMove, r#"{"label": "good"}"#).unwrap_err();
        match err {
            ClientError::Decode { operation, .. } => assert_eq!(operation, Operation::AnalyzeMove),
            other => panic!("unexpected error: {other}"),
        }
    }
}
