use axum::extract::State;
use axum::Json;

use opsdesk_core::availability::AvailabilitySchedule;
use opsdesk_core::booking::Booking;
use opsdesk_core::config::Config;
use opsdesk_core::employee::Employee;
use opsdesk_core::key::SoftwareKey;
use opsdesk_core::member::Member;
use opsdesk_core::opportunity::{self, Opportunity};
use opsdesk_core::partner::Partner;
use opsdesk_core::rock::Rock;
use opsdesk_core::tracker::{self, TrackerItem};
use opsdesk_core::types::BookingStatus;

use crate::error::AppError;
use crate::state::AppState;

/// GET /api/state — one summary object for the dashboard.
pub async fn get_state(State(app): State<AppState>) -> Result<Json<serde_json::Value>, AppError> {
    let root = app.root.clone();
    let result = tokio::task::spawn_blocking(move || {
        let config = Config::load(&root)?;
        let opportunities = Opportunity::list(&root)?;
        let bookings = Booking::list(&root)?;
        let items = TrackerItem::list(&root)?;
        let upcoming = bookings
            .iter()
            .filter(|b| b.status == BookingStatus::Confirmed)
            .count();

        Ok::<_, opsdesk_core::OpsError>(serde_json::json!({
            "project": config.project.name,
            "pipeline": opportunity::summarize(&opportunities),
            "tracker": tracker::summarize(&items),
            "counts": {
                "opportunities": opportunities.len(),
                "members": Member::list(&root)?.len(),
                "partners": Partner::list(&root)?.len(),
                "keys": SoftwareKey::list(&root)?.len(),
                "schedules": AvailabilitySchedule::list(&root)?.len(),
                "bookings": bookings.len(),
                "upcoming_bookings": upcoming,
                "tracker_items": items.len(),
                "employees": Employee::list(&root)?.len(),
                "rocks": Rock::list(&root)?.len(),
            },
        }))
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Json(result))
}
