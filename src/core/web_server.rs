//! Poll display server.
//!
//! The projector page in the voting hall polls `/polls/active` and renders
//! the live tally. Runs on `--display-port` / DISPLAY_PORT next to the bot.
//! Every voting team is listed; teams that have not voted show `"none"`.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use serde_json::{json, Map, Value};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;

use crate::core::error::AppResult;
use crate::directory::Directory;
use crate::poll::Poll;
use crate::storage::PollStore;

/// Placeholder for a team without a vote on the active poll
pub const NO_VOTE: &str = "none";

#[derive(Clone)]
struct DisplayState {
    store: PollStore,
    directory: Arc<Directory>,
}

/// Build the display router.
pub fn display_router(store: PollStore, directory: Arc<Directory>) -> Router {
    Router::new()
        .route("/polls/active", get(active_poll_handler))
        .route("/health", get(health_handler))
        .with_state(DisplayState { store, directory })
}

/// Start the display server and serve until the process exits.
pub async fn start_display_server(port: u16, store: PollStore, directory: Arc<Directory>) -> anyhow::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let app = display_router(store, directory);

    log::info!("Starting poll display server on http://{}", addr);
    log::info!("  /polls/active - Active poll and votes (JSON)");
    log::info!("  /health       - Health check");

    let listener = TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn active_poll_handler(State(state): State<DisplayState>) -> impl IntoResponse {
    active_poll_response(&state.store, &state.directory)
}

/// Status and body for `/polls/active`.
pub fn active_poll_response(store: &PollStore, directory: &Directory) -> (StatusCode, Json<Value>) {
    match load_active_poll(store, directory) {
        Ok(Some(body)) => (StatusCode::OK, Json(body)),
        Ok(None) => (StatusCode::NOT_FOUND, Json(json!({ "error": "no active poll" }))),
        Err(e) => {
            log::error!("Display server could not read polls: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({ "error": "storage unavailable" })),
            )
        }
    }
}

fn load_active_poll(store: &PollStore, directory: &Directory) -> AppResult<Option<Value>> {
    let Some(poll) = store.get_active_poll()? else {
        return Ok(None);
    };
    let votes = store.votes_for(poll.poll_id)?;

    let mut by_team = Map::new();
    for team in directory.voting_teams() {
        by_team.insert(team.code.clone(), Value::String(NO_VOTE.to_string()));
    }
    // votes of teams since removed from the roster are still shown
    for vote in votes {
        by_team.insert(vote.team_code, Value::String(vote.choice));
    }
    Ok(Some(poll_body(&poll, by_team)))
}

fn poll_body(poll: &Poll, votes: Map<String, Value>) -> Value {
    json!({
        "poll_id": poll.poll_id,
        "question": poll.question,
        "choices": poll.choices,
        "votes": votes,
    })
}

async fn health_handler() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}
