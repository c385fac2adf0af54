use axum::extract::{Path, State};
use axum::Json;

use opsdesk_connect::{token_from_env, CompletionClient, WireMessage};
use opsdesk_core::chat::{Chat, ChatRole};
use opsdesk_core::config::Config;
use opsdesk_core::employee::Employee;

use crate::error::AppError;
use crate::state::AppState;

/// GET /api/chats
pub async fn list(State(app): State<AppState>) -> Result<Json<Vec<Chat>>, AppError> {
    let root = app.root.clone();
    let chats = tokio::task::spawn_blocking(move || Chat::list(&root))
        .await
        .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;
    Ok(Json(chats))
}

/// GET /api/chats/:id
pub async fn get(
    State(app): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Chat>, AppError> {
    let root = app.root.clone();
    let chat = tokio::task::spawn_blocking(move || Chat::load(&root, &id))
        .await
        .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;
    Ok(Json(chat))
}

#[derive(serde::Deserialize)]
pub struct CreateBody {
    pub employee_id: String,
    pub title: String,
}

/// POST /api/chats — open a conversation with an AI employee.
pub async fn create(
    State(app): State<AppState>,
    Json(body): Json<CreateBody>,
) -> Result<Json<Chat>, AppError> {
    let root = app.root.clone();
    let chat = tokio::task::spawn_blocking(move || {
        // The employee must exist at open time; it may still be deleted later.
        Employee::load(&root, &body.employee_id)?;
        let chat = Chat::open(body.employee_id, body.title);
        chat.save(&root)?;
        Ok::<_, opsdesk_core::OpsError>(chat)
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    app.touch();
    Ok(Json(chat))
}

#[derive(serde::Deserialize)]
pub struct MessageBody {
    pub content: String,
}

/// POST /api/chats/:id/messages — append the user turn, run a completion,
/// append and return the assistant reply.
pub async fn send_message(
    State(app): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<MessageBody>,
) -> Result<Json<Chat>, AppError> {
    let root = app.root.clone();

    // Phase 1 (blocking): persist the user turn, gather what the completion
    // needs. The user message stays even if the upstream call fails.
    let (mut chat, persona, model) = {
        let root = root.clone();
        tokio::task::spawn_blocking(move || {
            let mut chat = Chat::load(&root, &id)?;
            chat.push(ChatRole::User, body.content);
            chat.save(&root)?;
            let employee = Employee::load(&root, &chat.employee_id).ok();
            let persona = employee.as_ref().map(|e| e.persona.clone());
            let model = employee.and_then(|e| e.model);
            Ok::<_, opsdesk_core::OpsError>((chat, persona, model))
        })
        .await
        .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??
    };

    // Phase 2 (async): the completion call.
    let config = Config::load(&app.root)?;
    let Some(assistant) = config.integrations.assistant else {
        return Err(AppError::not_configured("assistant"));
    };
    let api_key = token_from_env(&assistant.key_env)?;
    let client = CompletionClient::new(
        assistant.api_base,
        api_key,
        assistant.model,
        assistant.max_tokens,
    );
    let messages: Vec<WireMessage> = chat
        .transcript()
        .into_iter()
        .map(|(role, content)| WireMessage {
            role: role.to_string(),
            content: content.to_string(),
        })
        .collect();
    let reply = client
        .complete(persona.as_deref(), &messages, model.as_deref())
        .await?;

    // Phase 3 (blocking): persist the assistant turn.
    let chat = tokio::task::spawn_blocking(move || {
        chat.push(ChatRole::Assistant, reply);
        chat.save(&root)?;
        Ok::<_, opsdesk_core::OpsError>(chat)
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    app.touch();
    Ok(Json(chat))
}

/// DELETE /api/chats/:id
pub async fn delete(
    State(app): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    let root = app.root.clone();
    let deleted = id.clone();
    tokio::task::spawn_blocking(move || Chat::delete(&root, &id))
        .await
        .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    app.touch();
    Ok(Json(serde_json::json!({ "deleted": deleted })))
}
