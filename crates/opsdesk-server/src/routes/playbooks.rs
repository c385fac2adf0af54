use axum::extract::{Path, State};
use axum::Json;

use opsdesk_connect::{token_from_env, Playbook, PlaybooksClient, StartRun};
use opsdesk_core::config::Config;

use crate::error::AppError;
use crate::state::AppState;

fn client(app: &AppState) -> Result<PlaybooksClient, AppError> {
    let config = Config::load(&app.root)?;
    let Some(playbooks) = config.integrations.playbooks else {
        return Err(AppError::not_configured("playbooks"));
    };
    let token = token_from_env(&playbooks.token_env)?;
    Ok(PlaybooksClient::new(playbooks.api_base, token))
}

/// GET /api/playbooks
pub async fn list(State(app): State<AppState>) -> Result<Json<serde_json::Value>, AppError> {
    let list = client(&app)?.list_playbooks().await?;
    Ok(Json(serde_json::json!({
        "total_count": list.total_count,
        "items": list.items,
    })))
}

/// GET /api/playbooks/:id
pub async fn get(
    State(app): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Playbook>, AppError> {
    let playbook = client(&app)?.get_playbook(&id).await?;
    Ok(Json(playbook))
}

/// POST /api/playbooks
pub async fn create(
    State(app): State<AppState>,
    Json(playbook): Json<Playbook>,
) -> Result<Json<Playbook>, AppError> {
    let created = client(&app)?.create_playbook(&playbook).await?;
    Ok(Json(created))
}

/// PUT /api/playbooks/:id
pub async fn update(
    State(app): State<AppState>,
    Path(id): Path<String>,
    Json(playbook): Json<Playbook>,
) -> Result<Json<Playbook>, AppError> {
    let updated = client(&app)?.update_playbook(&id, &playbook).await?;
    Ok(Json(updated))
}

/// DELETE /api/playbooks/:id
pub async fn delete(
    State(app): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    client(&app)?.delete_playbook(&id).await?;
    Ok(Json(serde_json::json!({ "deleted": id })))
}

/// GET /api/playbooks/runs/list
pub async fn runs(State(app): State<AppState>) -> Result<Json<serde_json::Value>, AppError> {
    let list = client(&app)?.list_runs().await?;
    let items: Vec<serde_json::Value> = list
        .items
        .iter()
        .map(|r| {
            serde_json::json!({
                "id": r.id,
                "name": r.name,
                "playbook_id": r.playbook_id,
                "current_status": r.current_status,
            })
        })
        .collect();
    Ok(Json(serde_json::json!({
        "total_count": list.total_count,
        "items": items,
    })))
}

/// POST /api/playbooks/runs — kick off a run from a template.
pub async fn start_run(
    State(app): State<AppState>,
    Json(run): Json<StartRun>,
) -> Result<Json<serde_json::Value>, AppError> {
    let started = client(&app)?.start_run(&run).await?;
    Ok(Json(serde_json::json!({
        "id": started.id,
        "name": started.name,
        "playbook_id": started.playbook_id,
        "current_status": started.current_status,
    })))
}
