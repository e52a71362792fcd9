//! REST API route handlers.
//!
//! Endpoints for health, chat, chat history, schedule generation and
//! retrieval, and goals. Every handler resolves its user from the `X-User`
//! header (default `demo_user`) and returns JSON; store failures surface as
//! 500 with an `{error}` body, malformed input as 400.

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use focusflow_core::{format_time, parse_workflow};
use focusflow_llm::{ChatTurn, ScheduleSource};
use focusflow_store::{ChatMessage, StoreError};

use crate::state::AppState;

/// Username used when the `X-User` header is absent or unusable.
const DEFAULT_USERNAME: &str = "demo_user";

/// Length caps applied to inbound text.
const MAX_USERNAME_LEN: usize = 50;
const MAX_MESSAGE_LEN: usize = 2_000;
const MAX_WORKFLOW_LEN: usize = 5_000;

// ---------------------------------------------------------------------------
// Input sanitation
// ---------------------------------------------------------------------------

/// Trim, strip angle brackets and control characters, and cap length.
fn sanitize(text: &str, max_len: usize) -> String {
    text.chars()
        .filter(|c| !c.is_control() && *c != '<' && *c != '>')
        .take(max_len)
        .collect::<String>()
        .trim()
        .to_string()
}

/// Resolve the username from the `X-User` header.
///
/// Only alphanumerics, `_` and `-` survive; an empty result falls back to
/// [`DEFAULT_USERNAME`].
fn username_from(headers: &HeaderMap) -> String {
    let raw = headers
        .get("x-user")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();

    let cleaned: String = raw
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_' || *c == '-')
        .take(MAX_USERNAME_LEN)
        .collect();

    if cleaned.is_empty() {
        DEFAULT_USERNAME.to_string()
    } else {
        cleaned
    }
}

fn store_failure(e: StoreError) -> (StatusCode, Json<Value>) {
    tracing::error!(error = %e, "store operation failed");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({"error": "storage failure"})),
    )
}

// ---------------------------------------------------------------------------
// GET /api/health
// ---------------------------------------------------------------------------

/// Liveness probe. Always succeeds, including in fallback mode.
pub async fn health(State(state): State<Arc<AppState>>) -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "ai_provider": state.assistant.provider_name(),
        "ai_enabled": state.assistant.ai_enabled(),
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

// ---------------------------------------------------------------------------
// POST /api/chat
// ---------------------------------------------------------------------------

/// Request body for the chat endpoint.
#[derive(Deserialize)]
pub struct ChatBody {
    pub message: String,
}

/// Answer a chat message and persist both sides of the exchange.
pub async fn chat(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(body): Json<ChatBody>,
) -> (StatusCode, Json<Value>) {
    let message = sanitize(&body.message, MAX_MESSAGE_LEN);
    if message.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"error": "message is required"})),
        );
    }

    let user = match state.users.get_or_create(&username_from(&headers)).await {
        Ok(u) => u,
        Err(e) => return store_failure(e),
    };

    let history = match state.chat.recent(&user.id, None).await {
        Ok(h) => h,
        Err(e) => return store_failure(e),
    };
    let turns: Vec<ChatTurn> = history.iter().map(to_turn).collect();

    let response = state.assistant.respond(&message, &turns).await;

    if let Err(e) = state.chat.append(&user.id, "user", &message).await {
        return store_failure(e);
    }
    if let Err(e) = state.chat.append(&user.id, "assistant", &response).await {
        return store_failure(e);
    }

    (
        StatusCode::OK,
        Json(json!({
            "response": response,
            "timestamp": chrono::Utc::now().to_rfc3339(),
        })),
    )
}

fn to_turn(m: &ChatMessage) -> ChatTurn {
    ChatTurn {
        role: m.role.clone(),
        content: m.content.clone(),
    }
}

// ---------------------------------------------------------------------------
// GET /api/chat/history
// ---------------------------------------------------------------------------

/// Query parameters for the history endpoint.
#[derive(Deserialize)]
pub struct HistoryParams {
    pub limit: Option<u32>,
}

/// Return the most recent chat messages in chronological order.
pub async fn chat_history(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(params): Query<HistoryParams>,
) -> (StatusCode, Json<Value>) {
    let user = match state.users.get_or_create(&username_from(&headers)).await {
        Ok(u) => u,
        Err(e) => return store_failure(e),
    };

    match state.chat.recent(&user.id, params.limit).await {
        Ok(history) => {
            let items: Vec<Value> = history
                .iter()
                .map(|m| {
                    json!({
                        "role": m.role,
                        "content": m.content,
                        "timestamp": m.created_at,
                    })
                })
                .collect();
            (StatusCode::OK, Json(json!({"history": items})))
        }
        Err(e) => store_failure(e),
    }
}

// ---------------------------------------------------------------------------
// POST /api/generate-schedule
// ---------------------------------------------------------------------------

/// Request body for schedule generation.
#[derive(Deserialize)]
pub struct GenerateScheduleBody {
    pub workflow: String,
}

/// Parse the workflow text, build a schedule (AI when available, otherwise
/// deterministic), and replace the user's active schedule with it.
pub async fn generate_schedule(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(body): Json<GenerateScheduleBody>,
) -> (StatusCode, Json<Value>) {
    let workflow = sanitize(&body.workflow, MAX_WORKFLOW_LEN);
    if workflow.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"success": false, "error": "workflow description is required"})),
        );
    }

    let user = match state.users.get_or_create(&username_from(&headers)).await {
        Ok(u) => u,
        Err(e) => return store_failure(e),
    };

    let request = parse_workflow(&workflow);
    let (blocks, source) = state.assistant.build_schedule(&request).await;
    let source = match source {
        ScheduleSource::Ai => "ai",
        ScheduleSource::Fallback => "fallback",
    };

    match state
        .schedules
        .replace_for_user(&user.id, &workflow, source, &blocks)
        .await
    {
        Ok(schedule_id) => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "schedule_id": schedule_id,
                "source": source,
            })),
        ),
        Err(e) => store_failure(e),
    }
}

// ---------------------------------------------------------------------------
// GET /api/schedule
// ---------------------------------------------------------------------------

/// Return the user's active schedule, blocks ordered by day then start.
pub async fn get_schedule(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> (StatusCode, Json<Value>) {
    let user = match state.users.get_or_create(&username_from(&headers)).await {
        Ok(u) => u,
        Err(e) => return store_failure(e),
    };

    match state.schedules.active_for_user(&user.id).await {
        Ok(Some((schedule, blocks))) => {
            let items: Vec<Value> = blocks
                .iter()
                .map(|b| {
                    json!({
                        "day": b.day,
                        "start_time": format_time(b.start),
                        "end_time": format_time(b.end),
                        "subject": b.subject,
                        "topic": b.topic,
                        "priority": b.priority.as_str(),
                    })
                })
                .collect();
            (
                StatusCode::OK,
                Json(json!({
                    "schedule_id": schedule.id,
                    "week_start": schedule.week_start,
                    "source": schedule.source,
                    "blocks": items,
                })),
            )
        }
        Ok(None) => (
            StatusCode::OK,
            Json(json!({"schedule_id": null, "blocks": []})),
        ),
        Err(e) => store_failure(e),
    }
}

// ---------------------------------------------------------------------------
// GET /api/goals
// ---------------------------------------------------------------------------

/// Return the user's goals as a nested tree.
pub async fn goals(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> (StatusCode, Json<Value>) {
    let user = match state.users.get_or_create(&username_from(&headers)).await {
        Ok(u) => u,
        Err(e) => return store_failure(e),
    };

    match state.goals.tree_for_user(&user.id).await {
        Ok(tree) => (StatusCode::OK, Json(json!({"goals": tree}))),
        Err(e) => store_failure(e),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
