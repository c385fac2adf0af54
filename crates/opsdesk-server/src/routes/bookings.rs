use axum::extract::{Path, Query, State};
use axum::Json;
use chrono::NaiveDate;

use opsdesk_core::activity::ActivityEntry;
use opsdesk_core::availability::{slots_for_date, AvailabilitySchedule};
use opsdesk_core::booking::{self, Booking, BookingRequest};
use opsdesk_core::config::Config;
use opsdesk_core::notify::EventKind;

use crate::effects;
use crate::error::AppError;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Internal management surface
// ---------------------------------------------------------------------------

#[derive(serde::Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub schedule: Option<String>,
}

/// GET /api/bookings[?date=&schedule=]
pub async fn list(
    State(app): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<Booking>>, AppError> {
    let root = app.root.clone();
    let bookings = tokio::task::spawn_blocking(move || {
        let all = Booking::list(&root)?;
        let filtered = all
            .into_iter()
            .filter(|b| query.date.is_none_or(|d| b.date == d))
            .filter(|b| {
                query
                    .schedule
                    .as_deref()
                    .is_none_or(|s| b.schedule_slug == s)
            })
            .collect::<Vec<_>>();
        Ok::<_, opsdesk_core::OpsError>(filtered)
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Json(bookings))
}

/// POST /api/bookings/:id/cancel
pub async fn cancel(
    State(app): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Booking>, AppError> {
    let root = app.root.clone();
    let booking = tokio::task::spawn_blocking(move || {
        let mut booking = Booking::load(&root, &id)?;
        booking.cancel();
        booking.save(&root)?;
        Ok::<_, opsdesk_core::OpsError>(booking)
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    effects::record_activity(
        &app,
        ActivityEntry::new("portal", "cancelled", "booking", &booking.id),
    );
    effects::post_event(
        &app,
        EventKind::BookingCancelled {
            schedule: booking.schedule_slug.clone(),
            date: booking.date.to_string(),
            start: booking.start.format("%H:%M").to_string(),
        },
    );
    app.touch();
    Ok(Json(booking))
}

/// POST /api/bookings/:id/complete
pub async fn complete(
    State(app): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Booking>, AppError> {
    let root = app.root.clone();
    let booking = tokio::task::spawn_blocking(move || {
        let mut booking = Booking::load(&root, &id)?;
        booking.complete();
        booking.save(&root)?;
        Ok::<_, opsdesk_core::OpsError>(booking)
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    app.touch();
    Ok(Json(booking))
}

// ---------------------------------------------------------------------------
// Public booking surface
// ---------------------------------------------------------------------------

/// GET /api/book/:slug — what the public page needs to render.
pub async fn public_schedule(
    State(app): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    let root = app.root.clone();
    let result = tokio::task::spawn_blocking(move || {
        let schedule = AvailabilitySchedule::load(&root, &slug)?;
        Ok::<_, opsdesk_core::OpsError>(serde_json::json!({
            "slug": schedule.slug,
            "owner_name": schedule.owner_name,
            "time_zone": schedule.time_zone,
            "meeting_types": schedule.meeting_types,
        }))
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Json(result))
}

#[derive(serde::Deserialize)]
pub struct SlotsQuery {
    pub date: NaiveDate,
    pub meeting_type: String,
}

/// GET /api/book/:slug/slots?date=&meeting_type= — open start times,
/// already-held slots removed.
pub async fn public_slots(
    State(app): State<AppState>,
    Path(slug): Path<String>,
    Query(query): Query<SlotsQuery>,
) -> Result<Json<serde_json::Value>, AppError> {
    let root = app.root.clone();
    let result = tokio::task::spawn_blocking(move || {
        let config = Config::load(&root)?;
        let schedule = AvailabilitySchedule::load(&root, &slug)?;
        let meeting = schedule.meeting_type(&query.meeting_type)?;
        let duration = meeting.duration_minutes;

        let offered = slots_for_date(
            &schedule,
            query.date,
            &query.meeting_type,
            config.booking.slot_step_minutes,
        )?;

        // Drop starts that would overlap a held booking.
        let all = Booking::list(&root)?;
        let held: Vec<&Booking> = booking::for_date(&all, &slug, query.date)
            .into_iter()
            .filter(|b| b.status.holds_slot())
            .collect();
        let open: Vec<String> = offered
            .into_iter()
            .filter(|start| {
                use chrono::Timelike;
                let s = start.num_seconds_from_midnight() / 60;
                let e = s + duration;
                !held.iter().any(|b| {
                    let bs = b.start.num_seconds_from_midnight() / 60;
                    let be = bs + b.duration_minutes;
                    bs < e && s < be
                })
            })
            .map(|t| t.format("%H:%M").to_string())
            .collect();

        Ok::<_, opsdesk_core::OpsError>(serde_json::json!({
            "date": query.date,
            "meeting_type": query.meeting_type,
            "slots": open,
        }))
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Json(result))
}

/// POST /api/book/:slug — create a booking from the public page.
///
/// The slot is re-validated against the schedule and existing bookings at
/// write time; a taken slot answers 409 instead of silently double-booking.
pub async fn public_book(
    State(app): State<AppState>,
    Path(slug): Path<String>,
    Json(req): Json<BookingRequest>,
) -> Result<Json<Booking>, AppError> {
    let root = app.root.clone();
    let booking = tokio::task::spawn_blocking(move || {
        let config = Config::load(&root)?;
        let schedule = AvailabilitySchedule::load(&root, &slug)?;
        booking::create_booking(&root, &schedule, req, config.booking.slot_step_minutes)
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    // Side-effects are best-effort: a failed activity write or webhook post
    // never fails the booking.
    effects::record_activity(
        &app,
        ActivityEntry::new("public", "created", "booking", &booking.id).with_detail(format!(
            "{} on {} {}",
            booking.meeting_type,
            booking.date,
            booking.start.format("%H:%M")
        )),
    );
    effects::post_event(
        &app,
        EventKind::BookingCreated {
            schedule: booking.schedule_slug.clone(),
            date: booking.date.to_string(),
            start: booking.start.format("%H:%M").to_string(),
            name: booking.name.clone(),
        },
    );
    app.touch();
    Ok(Json(booking))
}
