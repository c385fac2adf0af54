use axum::extract::{Path, State};
use axum::Json;

use opsdesk_core::activity::ActivityEntry;
use opsdesk_core::notify::EventKind;
use opsdesk_core::tracker::{self, TrackerItem};
use opsdesk_core::types::{TrackerKind, TrackerPriority, TrackerStatus};

use crate::effects;
use crate::error::AppError;
use crate::state::AppState;

/// GET /api/tracker — items plus a one-line summary.
pub async fn list(State(app): State<AppState>) -> Result<Json<serde_json::Value>, AppError> {
    let root = app.root.clone();
    let result = tokio::task::spawn_blocking(move || {
        let items = TrackerItem::list(&root)?;
        let summary = tracker::summarize(&items);
        Ok::<_, opsdesk_core::OpsError>(serde_json::json!({
            "items": items,
            "summary": summary,
        }))
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Json(result))
}

/// GET /api/tracker/:id
pub async fn get(
    State(app): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<TrackerItem>, AppError> {
    let root = app.root.clone();
    let item = tokio::task::spawn_blocking(move || TrackerItem::load(&root, &id))
        .await
        .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;
    Ok(Json(item))
}

#[derive(serde::Deserialize)]
pub struct CreateBody {
    pub title: String,
    pub kind: String,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub priority: Option<String>,
    #[serde(default)]
    pub reporter: Option<String>,
}

/// POST /api/tracker
pub async fn create(
    State(app): State<AppState>,
    Json(body): Json<CreateBody>,
) -> Result<Json<TrackerItem>, AppError> {
    let root = app.root.clone();
    let item = tokio::task::spawn_blocking(move || {
        let kind: TrackerKind = body.kind.parse()?;
        let mut item = TrackerItem::new(body.title, kind);
        if let Some(text) = body.body {
            item.body = text;
        }
        if let Some(priority) = body.priority {
            item.priority = priority.parse()?;
        }
        item.reporter = body.reporter;
        item.save(&root)?;
        Ok::<_, opsdesk_core::OpsError>(item)
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    effects::record_activity(
        &app,
        ActivityEntry::new("portal", "opened", "tracker_item", &item.id),
    );
    effects::post_event(
        &app,
        EventKind::TrackerItemOpened {
            title: item.title.clone(),
            kind: item.kind.to_string(),
            priority: item.priority.to_string(),
        },
    );
    app.touch();
    Ok(Json(item))
}

#[derive(serde::Deserialize)]
pub struct UpdateBody {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub priority: Option<String>,
    #[serde(default)]
    pub reporter: Option<String>,
}

/// PUT /api/tracker/:id
pub async fn update(
    State(app): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<UpdateBody>,
) -> Result<Json<TrackerItem>, AppError> {
    let root = app.root.clone();
    let item = tokio::task::spawn_blocking(move || {
        let mut item = TrackerItem::load(&root, &id)?;
        if let Some(title) = body.title {
            item.title = title;
        }
        if let Some(text) = body.body {
            item.body = text;
        }
        if let Some(priority) = body.priority {
            item.set_priority(priority.parse()?);
        }
        if let Some(reporter) = body.reporter {
            item.reporter = Some(reporter);
        }
        item.updated_at = chrono::Utc::now();
        item.save(&root)?;
        Ok::<_, opsdesk_core::OpsError>(item)
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    app.touch();
    Ok(Json(item))
}

#[derive(serde::Deserialize)]
pub struct StatusBody {
    pub status: String,
    #[serde(default)]
    pub priority: Option<String>,
}

/// POST /api/tracker/:id/status
pub async fn set_status(
    State(app): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<StatusBody>,
) -> Result<Json<TrackerItem>, AppError> {
    let root = app.root.clone();
    let item = tokio::task::spawn_blocking(move || {
        let mut item = TrackerItem::load(&root, &id)?;
        let status: TrackerStatus = body.status.parse()?;
        item.set_status(status);
        if let Some(priority) = body.priority {
            let priority: TrackerPriority = priority.parse()?;
            item.set_priority(priority);
        }
        item.save(&root)?;
        Ok::<_, opsdesk_core::OpsError>(item)
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    if item.status == TrackerStatus::Resolved {
        effects::post_event(
            &app,
            EventKind::TrackerItemResolved {
                title: item.title.clone(),
            },
        );
    }
    app.touch();
    Ok(Json(item))
}

#[derive(serde::Deserialize)]
pub struct CommentBody {
    pub body: String,
    #[serde(default)]
    pub author: Option<String>,
}

/// POST /api/tracker/:id/comments
pub async fn add_comment(
    State(app): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<CommentBody>,
) -> Result<Json<serde_json::Value>, AppError> {
    let root = app.root.clone();
    let (item, comment_id) = tokio::task::spawn_blocking(move || {
        let mut item = TrackerItem::load(&root, &id)?;
        let comment_id = item.add_comment(body.body, body.author);
        item.save(&root)?;
        Ok::<_, opsdesk_core::OpsError>((item, comment_id))
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    app.touch();
    Ok(Json(serde_json::json!({
        "item_id": item.id,
        "comment_id": comment_id,
    })))
}

/// DELETE /api/tracker/:id/comments/:cid
pub async fn resolve_comment(
    State(app): State<AppState>,
    Path((id, cid)): Path<(String, String)>,
) -> Result<Json<TrackerItem>, AppError> {
    let root = app.root.clone();
    let item = tokio::task::spawn_blocking(move || {
        let mut item = TrackerItem::load(&root, &id)?;
        item.resolve_comment(&cid)?;
        item.save(&root)?;
        Ok::<_, opsdesk_core::OpsError>(item)
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    app.touch();
    Ok(Json(item))
}

/// DELETE /api/tracker/:id
pub async fn delete(
    State(app): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    let root = app.root.clone();
    let deleted = id.clone();
    tokio::task::spawn_blocking(move || TrackerItem::delete(&root, &id))
        .await
        .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    app.touch();
    Ok(Json(serde_json::json!({ "deleted": deleted })))
}
