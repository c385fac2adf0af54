use axum::extract::{Path, State};
use axum::Json;

use opsdesk_core::availability::{AvailabilitySchedule, DayTemplate, MeetingType};
use opsdesk_core::notify::EventKind;

use crate::effects;
use crate::error::AppError;
use crate::state::AppState;

/// GET /api/schedules
pub async fn list(
    State(app): State<AppState>,
) -> Result<Json<Vec<AvailabilitySchedule>>, AppError> {
    let root = app.root.clone();
    let schedules = tokio::task::spawn_blocking(move || AvailabilitySchedule::list(&root))
        .await
        .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;
    Ok(Json(schedules))
}

/// GET /api/schedules/:slug
pub async fn get(
    State(app): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<AvailabilitySchedule>, AppError> {
    let root = app.root.clone();
    let schedule = tokio::task::spawn_blocking(move || AvailabilitySchedule::load(&root, &slug))
        .await
        .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;
    Ok(Json(schedule))
}

#[derive(serde::Deserialize)]
pub struct CreateBody {
    pub slug: String,
    pub owner_name: String,
}

/// POST /api/schedules — publish a new booking page.
pub async fn create(
    State(app): State<AppState>,
    Json(body): Json<CreateBody>,
) -> Result<Json<AvailabilitySchedule>, AppError> {
    let root = app.root.clone();
    let schedule = tokio::task::spawn_blocking(move || {
        AvailabilitySchedule::create(&root, &body.slug, &body.owner_name)
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    effects::post_event(
        &app,
        EventKind::SchedulePublished {
            slug: schedule.slug.clone(),
            owner: schedule.owner_name.clone(),
        },
    );
    app.touch();
    Ok(Json(schedule))
}

#[derive(serde::Deserialize)]
pub struct UpdateBody {
    #[serde(default)]
    pub owner_name: Option<String>,
    #[serde(default)]
    pub time_zone: Option<String>,
    #[serde(default)]
    pub weekly: Option<[DayTemplate; 7]>,
    #[serde(default)]
    pub meeting_types: Option<Vec<MeetingType>>,
    #[serde(default)]
    pub blocked_dates: Option<Vec<chrono::NaiveDate>>,
}

/// PUT /api/schedules/:slug — replace templates, meeting types, blocked dates.
pub async fn update(
    State(app): State<AppState>,
    Path(slug): Path<String>,
    Json(body): Json<UpdateBody>,
) -> Result<Json<AvailabilitySchedule>, AppError> {
    let root = app.root.clone();
    let schedule = tokio::task::spawn_blocking(move || {
        let mut schedule = AvailabilitySchedule::load(&root, &slug)?;
        if let Some(owner_name) = body.owner_name {
            schedule.owner_name = owner_name;
        }
        if let Some(time_zone) = body.time_zone {
            schedule.time_zone = Some(time_zone);
        }
        if let Some(weekly) = body.weekly {
            schedule.weekly = weekly;
        }
        if let Some(meeting_types) = body.meeting_types {
            schedule.meeting_types = meeting_types;
        }
        if let Some(blocked_dates) = body.blocked_dates {
            schedule.blocked_dates = blocked_dates;
        }
        schedule.updated_at = chrono::Utc::now();
        schedule.save(&root)?;
        Ok::<_, opsdesk_core::OpsError>(schedule)
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    app.touch();
    Ok(Json(schedule))
}

/// DELETE /api/schedules/:slug
pub async fn delete(
    State(app): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    let root = app.root.clone();
    let deleted = slug.clone();
    tokio::task::spawn_blocking(move || AvailabilitySchedule::delete(&root, &slug))
        .await
        .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    app.touch();
    Ok(Json(serde_json::json!({ "deleted": deleted })))
}
