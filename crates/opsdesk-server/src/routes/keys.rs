use axum::extract::{Path, State};
use axum::Json;
use chrono::{NaiveDate, Utc};

use opsdesk_core::activity::ActivityEntry;
use opsdesk_core::key::SoftwareKey;
use opsdesk_core::notify::EventKind;

use crate::effects;
use crate::error::AppError;
use crate::state::AppState;

/// GET /api/keys — all keys with date expiry folded into the status.
pub async fn list(State(app): State<AppState>) -> Result<Json<serde_json::Value>, AppError> {
    let root = app.root.clone();
    let result = tokio::task::spawn_blocking(move || {
        let today = Utc::now().date_naive();
        let keys = SoftwareKey::list(&root)?;
        let list: Vec<serde_json::Value> = keys
            .iter()
            .map(|k| {
                serde_json::json!({
                    "id": k.id,
                    "code": k.code,
                    "tools": k.tools,
                    "status": k.effective_status(today),
                    "expires_on": k.expires_on,
                    "max_activations": k.max_activations,
                    "activations": k.activations,
                    "issued_to": k.issued_to,
                    "created_at": k.created_at,
                })
            })
            .collect();
        Ok::<_, opsdesk_core::OpsError>(serde_json::json!(list))
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Json(result))
}

/// GET /api/keys/:id
pub async fn get(
    State(app): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SoftwareKey>, AppError> {
    let root = app.root.clone();
    let key = tokio::task::spawn_blocking(move || SoftwareKey::load(&root, &id))
        .await
        .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;
    Ok(Json(key))
}

#[derive(serde::Deserialize)]
pub struct IssueBody {
    pub tools: Vec<String>,
    pub max_activations: u32,
    #[serde(default)]
    pub expires_on: Option<NaiveDate>,
    #[serde(default)]
    pub issued_to: Option<String>,
}

/// POST /api/keys — issue a new key.
pub async fn issue(
    State(app): State<AppState>,
    Json(body): Json<IssueBody>,
) -> Result<Json<SoftwareKey>, AppError> {
    let root = app.root.clone();
    let key = tokio::task::spawn_blocking(move || {
        let mut key = SoftwareKey::issue(body.tools, body.max_activations, body.expires_on);
        key.issued_to = body.issued_to;
        key.save(&root)?;
        Ok::<_, opsdesk_core::OpsError>(key)
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    effects::record_activity(&app, ActivityEntry::new("portal", "issued", "key", &key.id));
    effects::post_event(
        &app,
        EventKind::KeyIssued {
            code: key.code.clone(),
            tools: key.tools.clone(),
        },
    );
    app.touch();
    Ok(Json(key))
}

/// POST /api/keys/:id/activate — consume one activation.
pub async fn activate(
    State(app): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SoftwareKey>, AppError> {
    let root = app.root.clone();
    let key = tokio::task::spawn_blocking(move || {
        let mut key = SoftwareKey::load(&root, &id)?;
        key.activate(Utc::now().date_naive())?;
        key.save(&root)?;
        Ok::<_, opsdesk_core::OpsError>(key)
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    app.touch();
    Ok(Json(key))
}

/// POST /api/keys/:id/revoke
pub async fn revoke(
    State(app): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SoftwareKey>, AppError> {
    let root = app.root.clone();
    let key = tokio::task::spawn_blocking(move || {
        let mut key = SoftwareKey::load(&root, &id)?;
        key.revoke();
        key.save(&root)?;
        Ok::<_, opsdesk_core::OpsError>(key)
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    effects::record_activity(&app, ActivityEntry::new("portal", "revoked", "key", &key.id));
    effects::post_event(
        &app,
        EventKind::KeyRevoked {
            code: key.code.clone(),
        },
    );
    app.touch();
    Ok(Json(key))
}

/// DELETE /api/keys/:id
pub async fn delete(
    State(app): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    let root = app.root.clone();
    let deleted_id = id.clone();
    tokio::task::spawn_blocking(move || SoftwareKey::delete(&root, &id))
        .await
        .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    app.touch();
    Ok(Json(serde_json::json!({ "deleted": deleted_id })))
}
