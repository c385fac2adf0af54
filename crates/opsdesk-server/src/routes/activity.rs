use axum::extract::{Query, State};
use axum::Json;

use opsdesk_core::activity::ActivityLog;

use crate::error::AppError;
use crate::state::AppState;

#[derive(serde::Deserialize)]
pub struct RecentQuery {
    #[serde(default = "default_limit")]
    pub limit: usize,
}

fn default_limit() -> usize {
    50
}

/// GET /api/activity[?limit=50] — most recent entries, newest first.
pub async fn recent(
    State(app): State<AppState>,
    Query(query): Query<RecentQuery>,
) -> Result<Json<serde_json::Value>, AppError> {
    let root = app.root.clone();
    let entries = tokio::task::spawn_blocking(move || {
        let log = ActivityLog::open_at_root(&root)?;
        log.recent(query.limit)
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Json(serde_json::json!(entries)))
}
