use axum::extract::{Path, Query, State};
use axum::Json;

use opsdesk_core::notify::EventKind;
use opsdesk_core::rock::{self, Rock};
use opsdesk_core::types::RockStatus;

use crate::effects;
use crate::error::AppError;
use crate::state::AppState;

#[derive(serde::Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub quarter: Option<String>,
}

/// GET /api/rocks[?quarter=2026-Q3]
pub async fn list(
    State(app): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<Rock>>, AppError> {
    let root = app.root.clone();
    let rocks = tokio::task::spawn_blocking(move || {
        let all = Rock::list(&root)?;
        let filtered = match &query.quarter {
            Some(q) => rock::for_quarter(&all, q).into_iter().cloned().collect(),
            None => all,
        };
        Ok::<_, opsdesk_core::OpsError>(filtered)
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Json(rocks))
}

/// GET /api/rocks/:id
pub async fn get(
    State(app): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Rock>, AppError> {
    let root = app.root.clone();
    let rock = tokio::task::spawn_blocking(move || Rock::load(&root, &id))
        .await
        .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;
    Ok(Json(rock))
}

#[derive(serde::Deserialize)]
pub struct CreateBody {
    pub title: String,
    pub owner: String,
    pub quarter: String,
    #[serde(default)]
    pub due_on: Option<chrono::NaiveDate>,
}

/// POST /api/rocks
pub async fn create(
    State(app): State<AppState>,
    Json(body): Json<CreateBody>,
) -> Result<Json<Rock>, AppError> {
    let root = app.root.clone();
    let rock = tokio::task::spawn_blocking(move || {
        let mut rock = Rock::new(body.title, body.owner, body.quarter)?;
        rock.due_on = body.due_on;
        rock.save(&root)?;
        Ok::<_, opsdesk_core::OpsError>(rock)
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    app.touch();
    Ok(Json(rock))
}

#[derive(serde::Deserialize)]
pub struct UpdateBody {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub owner: Option<String>,
    #[serde(default)]
    pub quarter: Option<String>,
    #[serde(default)]
    pub due_on: Option<chrono::NaiveDate>,
}

/// PUT /api/rocks/:id
pub async fn update(
    State(app): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<UpdateBody>,
) -> Result<Json<Rock>, AppError> {
    let root = app.root.clone();
    let rock = tokio::task::spawn_blocking(move || {
        let mut rock = Rock::load(&root, &id)?;
        if let Some(title) = body.title {
            rock.title = title;
        }
        if let Some(owner) = body.owner {
            rock.owner = owner;
        }
        if let Some(quarter) = body.quarter {
            opsdesk_core::paths::validate_quarter(&quarter)?;
            rock.quarter = quarter;
        }
        if let Some(due_on) = body.due_on {
            rock.due_on = Some(due_on);
        }
        rock.updated_at = chrono::Utc::now();
        rock.save(&root)?;
        Ok::<_, opsdesk_core::OpsError>(rock)
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    app.touch();
    Ok(Json(rock))
}

#[derive(serde::Deserialize)]
pub struct StatusBody {
    pub status: String,
}

/// POST /api/rocks/:id/status
pub async fn set_status(
    State(app): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<StatusBody>,
) -> Result<Json<Rock>, AppError> {
    let root = app.root.clone();
    let rock = tokio::task::spawn_blocking(move || {
        let mut rock = Rock::load(&root, &id)?;
        let status: RockStatus = body.status.parse()?;
        rock.set_status(status);
        rock.save(&root)?;
        Ok::<_, opsdesk_core::OpsError>(rock)
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    effects::post_event(
        &app,
        EventKind::RockStatusChanged {
            title: rock.title.clone(),
            owner: rock.owner.clone(),
            status: rock.status.to_string(),
        },
    );
    app.touch();
    Ok(Json(rock))
}

/// DELETE /api/rocks/:id
pub async fn delete(
    State(app): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    let root = app.root.clone();
    let deleted = id.clone();
    tokio::task::spawn_blocking(move || Rock::delete(&root, &id))
        .await
        .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    app.touch();
    Ok(Json(serde_json::json!({ "deleted": deleted })))
}
