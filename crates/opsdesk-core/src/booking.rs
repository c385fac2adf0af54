use crate::availability::{slots_for_date, AvailabilitySchedule};
use crate::error::{OpsError, Result};
use crate::paths;
use crate::store;
use crate::types::BookingStatus;
use chrono::{DateTime, NaiveDate, NaiveTime, Timelike, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Booking
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booking {
    pub id: String,
    pub schedule_slug: String,
    pub meeting_type: String,
    pub date: NaiveDate,
    pub start: NaiveTime,
    pub duration_minutes: u32,
    pub name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub status: BookingStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request payload for a new booking, as submitted from the public page.
#[derive(Debug, Clone, Deserialize)]
pub struct BookingRequest {
    pub meeting_type: String,
    pub date: NaiveDate,
    /// Accepts both "09:30" (as the slots endpoint renders) and "09:30:00".
    #[serde(deserialize_with = "de_start_time")]
    pub start: NaiveTime,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub notes: Option<String>,
}

fn de_start_time<'de, D>(deserializer: D) -> std::result::Result<NaiveTime, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    NaiveTime::parse_from_str(&s, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(&s, "%H:%M:%S"))
        .map_err(serde::de::Error::custom)
}

impl Booking {
    pub fn save(&self, root: &Path) -> Result<()> {
        store::write_doc(root, paths::BOOKINGS, &self.id, self)
    }

    pub fn load(root: &Path, id: &str) -> Result<Self> {
        store::read_doc(root, paths::BOOKINGS, id)?
            .ok_or_else(|| OpsError::BookingNotFound(id.to_string()))
    }

    pub fn list(root: &Path) -> Result<Vec<Self>> {
        let mut all: Vec<Self> = store::list_docs(root, paths::BOOKINGS)?;
        all.sort_by(|a, b| (a.date, a.start).cmp(&(b.date, b.start)));
        Ok(all)
    }

    pub fn cancel(&mut self) {
        self.status = BookingStatus::Cancelled;
        self.updated_at = Utc::now();
    }

    pub fn complete(&mut self) {
        self.status = BookingStatus::Completed;
        self.updated_at = Utc::now();
    }

    fn end_minutes(&self) -> u32 {
        self.start.num_seconds_from_midnight() / 60 + self.duration_minutes
    }

    fn start_minutes(&self) -> u32 {
        self.start.num_seconds_from_midnight() / 60
    }
}

// ---------------------------------------------------------------------------
// Creation with write-time re-validation
// ---------------------------------------------------------------------------

/// Create a booking, re-checking the slot at write time.
///
/// The requested start must be one the schedule currently offers for that
/// date and meeting type, and must not overlap any non-cancelled booking
/// already held for the same schedule and date. Both checks return
/// `SlotUnavailable` so a stale booking page gets one consistent answer.
pub fn create_booking(
    root: &Path,
    schedule: &AvailabilitySchedule,
    req: BookingRequest,
    step_minutes: Option<u32>,
) -> Result<Booking> {
    let meeting = schedule.meeting_type(&req.meeting_type)?;
    let offered = slots_for_date(schedule, req.date, &req.meeting_type, step_minutes)?;
    if !offered.contains(&req.start) {
        return Err(slot_unavailable(req.date, req.start));
    }

    let duration = meeting.duration_minutes;
    let existing = Booking::list(root)?;
    let req_start = req.start.num_seconds_from_midnight() / 60;
    let req_end = req_start + duration;
    let clash = existing.iter().any(|b| {
        b.schedule_slug == schedule.slug
            && b.date == req.date
            && b.status.holds_slot()
            && b.start_minutes() < req_end
            && req_start < b.end_minutes()
    });
    if clash {
        return Err(slot_unavailable(req.date, req.start));
    }

    let now = Utc::now();
    let booking = Booking {
        id: Uuid::new_v4().to_string(),
        schedule_slug: schedule.slug.clone(),
        meeting_type: req.meeting_type,
        date: req.date,
        start: req.start,
        duration_minutes: duration,
        name: req.name,
        email: req.email,
        notes: req.notes,
        status: BookingStatus::Confirmed,
        created_at: now,
        updated_at: now,
    };
    booking.save(root)?;
    Ok(booking)
}

fn slot_unavailable(date: NaiveDate, start: NaiveTime) -> OpsError {
    OpsError::SlotUnavailable {
        date: date.to_string(),
        start: start.format("%H:%M").to_string(),
    }
}

/// Bookings on a given schedule and date, soonest first.
pub fn for_date<'a>(bookings: &'a [Booking], slug: &str, date: NaiveDate) -> Vec<&'a Booking> {
    bookings
        .iter()
        .filter(|b| b.schedule_slug == slug && b.date == date)
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
