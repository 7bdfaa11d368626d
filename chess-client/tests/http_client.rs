//! ChessClient against an in-process fake backend.

use std::sync::{Arc, Mutex};

use axum::extract::{Path, Query};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Extension, Json, Router};
use chess_client::{
    ChessClient, ChessService, ClientConfig, ClientError, MoveLabel, MoveRequest, Operation,
    ReplyMove, UserColor,
};
use serde::Deserialize;
use serde_json::{json, Value};

type Seen = Arc<Mutex<Vec<Value>>>;

#[derive(Deserialize)]
struct Limit {
    limit: usize,
}

async fn analyze(Extension(seen): Extension<Seen>, Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    seen.lock().unwrap().push(body.clone());
    if body["move"] == "e2e5" {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"detail": "Illegal move for this position"})),
        );
    }
    (
        StatusCode::OK,
        Json(json!({
            "label": "inaccuracy",
            "cpl": 64.5,
            "phase": "opening",
            "matches_profile_weakness": true,
            "suggested_good_moves": ["d2d4"],
            "feedback": "Too slow"
        })),
    )
}

async fn deep() -> (StatusCode, Json<Value>) {
    (
        StatusCode::SERVICE_UNAVAILABLE,
        Json(json!({"detail": "Stockfish engine not initialized"})),
    )
}

async fn explain() -> Json<Value> {
    Json(json!({
        "analysis": {
            "best_move": "g1f3",
            "best_line": ["Nf3", "Nc6"],
            "played_line": ["a3", "e5"],
            "eval_best": 40,
            "eval_played": 5,
            "eval_delta": 35,
            "cpl": 35.0,
            "label": "inaccuracy",
            "phase": "opening",
            "depth": 18
        },
        "explanation": "Develop a piece instead."
    }))
}

async fn predict(Json(body): Json<Value>) -> Json<Value> {
    if body["fen"].as_str().is_some_and(|f| f.contains(" b ")) {
        Json(json!({"move": {"from": "e7", "to": "e5"}, "message": null}))
    } else {
        Json(json!({"move": null, "message": "No legal moves"}))
    }
}

async fn list_games(Path(username): Path<String>, Query(q): Query<Limit>) -> (StatusCode, Json<Value>) {
    if username != "john doe" {
        return (StatusCode::NOT_FOUND, Json(json!({"detail": "Unknown user"})));
    }
    let games: Vec<Value> = (0..q.limit.min(2))
        .map(|i| json!({"index": i, "white": "john doe", "black": "bob", "result": "1/2-1/2"}))
        .collect();
    (StatusCode::OK, Json(json!({ "games": games })))
}

async fn game_moves(Path((_username, index)): Path<(String, usize)>) -> (StatusCode, Json<Value>) {
    if index > 1 {
        return (StatusCode::NOT_FOUND, Json(json!({})));
    }
    (
        StatusCode::OK,
        Json(json!({
            "moves": ["e2e4", "c7c5"],
            "headers": {"white": "john doe", "black": "bob", "opening": "Sicilian Defense"},
            "user_color": "white"
        })),
    )
}

async fn spawn_backend() -> (String, Seen) {
    let seen: Seen = Arc::new(Mutex::new(Vec::new()));
    let app = Router::new()
        .route("/analyze/move", post(analyze))
        .route("/analyze/move/deep", post(deep))
        .route("/analyze/move/explain", post(explain))
        .route("/model/predict", post(predict))
        .route("/games/pgn/{username}", get(list_games))
        .route("/games/pgn/{username}/{index}", get(game_moves))
        .layer(Extension(seen.clone()));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (format!("http://{addr}"), seen)
}

fn request(mv: &str) -> MoveRequest {
    MoveRequest {
        username: "john doe".into(),
        fen: chess::START_FEN.into(),
        mv: mv.into(),
    }
}

#[tokio::test]
async fn analyze_move_sends_body_and_decodes_verdict() {
    let (url, seen) = spawn_backend().await;
    let client = ChessClient::new(ClientConfig::new(url)).unwrap();

    let analysis = client.analyze_move(request("e2e4")).await.unwrap();
    assert_eq!(analysis.label, MoveLabel::Inaccuracy);
    assert_eq!(analysis.cpl, 64.5);
    assert!(analysis.matches_profile_weakness);
    assert_eq!(analysis.feedback.as_deref(), Some("Too slow"));

    let body = seen.lock().unwrap()[0].clone();
    assert_eq!(body["username"], "john doe");
    assert_eq!(body["move"], "e2e4");
    assert_eq!(body["fen"], chess::START_FEN);
}

#[tokio::test]
async fn rejected_move_surfaces_backend_detail() {
    let (url, _) = spawn_backend().await;
    let client = ChessClient::new(ClientConfig::new(url)).unwrap();

    let err = client.analyze_move(request("e2e5")).await.unwrap_err();
    assert!(matches!(err, ClientError::Service { status: 400, .. }));
    assert_eq!(
        err.status_line(Operation::AnalyzeMove),
        "Analysis failed: Illegal move for this position"
    );
}

#[tokio::test]
async fn deep_analysis_unavailable_is_a_service_error() {
    let (url, _) = spawn_backend().await;
    let client = ChessClient::new(ClientConfig::new(url)).unwrap();

    let err = client.analyze_move_deep(request("e2e4")).await.unwrap_err();
    assert_eq!(err.detail(), Some("Stockfish engine not initialized"));

    let explained = client.explain_move(request("a2a3")).await.unwrap();
    assert_eq!(explained.analysis.eval_delta, 35);
    assert_eq!(explained.analysis.depth, Some(18));
    assert_eq!(explained.explanation, "Develop a piece instead.");
}

#[tokio::test]
async fn predict_decodes_structured_and_missing_moves() {
    let (url, _) = spawn_backend().await;
    let client = ChessClient::new(ClientConfig::new(url)).unwrap();

    let after_e4 = "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq - 0 1";
    let reply = client.predict_move(after_e4.into()).await.unwrap();
    assert_eq!(
        reply.mv,
        Some(ReplyMove::Structured {
            from: "e7".into(),
            to: "e5".into(),
            promotion: None
        })
    );

    let none = client.predict_move(chess::START_FEN.into()).await.unwrap();
    assert_eq!(none.mv, None);
    assert_eq!(none.message.as_deref(), Some("No legal moves"));
}

#[tokio::test]
async fn games_use_encoded_username_and_limit() {
    let (url, _) = spawn_backend().await;
    let client = ChessClient::new(ClientConfig::new(format!("{url}/"))).unwrap();

    let games = client.list_games("john doe".into(), 20).await.unwrap();
    assert_eq!(games.len(), 2);
    assert_eq!(games[1].index, 1);

    let record = client.get_game_moves("john doe".into(), 1).await.unwrap();
    assert_eq!(record.moves.len(), 2);
    assert_eq!(record.user_color, Some(UserColor::White));
    assert_eq!(record.headers.opening_label(), "Sicilian Defense");

    let err = client.list_games("nobody".into(), 20).await.unwrap_err();
    assert_eq!(err.status_line(Operation::ListGames), "Failed to load games: Unknown user");

    let err = client.get_game_moves("john doe".into(), 7).await.unwrap_err();
    assert_eq!(err.status_line(Operation::GetGameMoves), "Failed to load game.");
}

#[tokio::test]
async fn unreachable_backend_is_an_http_error() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = ChessClient::new(ClientConfig::new(format!("http://{addr}"))).unwrap();
    let err = client.predict_move(chess::START_FEN.into()).await.unwrap_err();
    assert!(matches!(err, ClientError::Http(_)));
}
