use crate::error::{OpsError, Result};
use crate::paths;
use crate::store;
use chrono::{DateTime, Datelike, NaiveDate, NaiveTime, Timelike, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;

// ---------------------------------------------------------------------------
// TimeWindow / DayTemplate / MeetingType
// ---------------------------------------------------------------------------

/// Half-open working window within a single day. Windows never cross
/// midnight; `end <= start` is rejected at the edge and yields no slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl TimeWindow {
    pub fn validate(&self) -> Result<()> {
        if self.end <= self.start {
            return Err(OpsError::InvalidTimeRange(format!(
                "{}-{}",
                self.start.format("%H:%M"),
                self.end.format("%H:%M")
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DayTemplate {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub windows: Vec<TimeWindow>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeetingType {
    pub name: String,
    pub duration_minutes: u32,
}

// ---------------------------------------------------------------------------
// AvailabilitySchedule
// ---------------------------------------------------------------------------

/// One bookable calendar, published under `slug` (the public booking
/// handle). `weekly` is indexed Monday-first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvailabilitySchedule {
    pub slug: String,
    pub owner_name: String,
    /// Informational label shown on the booking page; slot arithmetic is
    /// wall-clock within this zone.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_zone: Option<String>,
    pub weekly: [DayTemplate; 7],
    pub meeting_types: Vec<MeetingType>,
    #[serde(default)]
    pub blocked_dates: Vec<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl AvailabilitySchedule {
    pub fn new(slug: impl Into<String>, owner_name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            slug: slug.into(),
            owner_name: owner_name.into(),
            time_zone: None,
            weekly: Default::default(),
            meeting_types: Vec::new(),
            blocked_dates: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn meeting_type(&self, name: &str) -> Result<&MeetingType> {
        self.meeting_types
            .iter()
            .find(|m| m.name == name)
            .ok_or_else(|| OpsError::UnknownMeetingType(name.to_string()))
    }

    pub fn is_blocked(&self, date: NaiveDate) -> bool {
        self.blocked_dates.contains(&date)
    }

    // -----------------------------------------------------------------------
    // Persistence (keyed by slug)
    // -----------------------------------------------------------------------

    pub fn create(root: &Path, slug: &str, owner_name: &str) -> Result<Self> {
        paths::validate_slug(slug)?;
        if store::doc_exists(root, paths::SCHEDULES, slug) {
            return Err(OpsError::ScheduleExists(slug.to_string()));
        }
        let schedule = Self::new(slug, owner_name);
        schedule.save(root)?;
        Ok(schedule)
    }

    pub fn save(&self, root: &Path) -> Result<()> {
        for day in &self.weekly {
            for window in &day.windows {
                window.validate()?;
            }
        }
        store::write_doc(root, paths::SCHEDULES, &self.slug, self)
    }

    pub fn load(root: &Path, slug: &str) -> Result<Self> {
        store::read_doc(root, paths::SCHEDULES, slug)?
            .ok_or_else(|| OpsError::ScheduleNotFound(slug.to_string()))
    }

    pub fn list(root: &Path) -> Result<Vec<Self>> {
        let mut all: Vec<Self> = store::list_docs(root, paths::SCHEDULES)?;
        all.sort_by(|a, b| a.slug.cmp(&b.slug));
        Ok(all)
    }

    pub fn delete(root: &Path, slug: &str) -> Result<()> {
        if !store::delete_doc(root, paths::SCHEDULES, slug)? {
            return Err(OpsError::ScheduleNotFound(slug.to_string()));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Slot generation
// ---------------------------------------------------------------------------

/// Fixed-step start times within a window. The last slot must still fit:
/// `start + duration <= window.end`. Zero duration or step yields nothing.
pub fn generate_slots(window: &TimeWindow, duration_minutes: u32, step_minutes: u32) -> Vec<NaiveTime> {
    if duration_minutes == 0 || step_minutes == 0 {
        return Vec::new();
    }
    let start = window.start.num_seconds_from_midnight() / 60;
    let end = window.end.num_seconds_from_midnight() / 60;
    if end <= start {
        return Vec::new();
    }

    let mut slots = Vec::new();
    let mut cursor = start;
    while cursor + duration_minutes <= end {
        slots.push(minutes_to_time(cursor));
        cursor += step_minutes;
    }
    slots
}

fn minutes_to_time(minutes: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(minutes / 60, minutes % 60, 0)
        .unwrap_or(NaiveTime::MIN)
}

/// All bookable start times for `date` and the named meeting type.
///
/// Disabled weekdays and blocked dates yield an empty list rather than an
/// error — a visitor picking a closed day just sees no slots. `step_minutes`
/// of `None` steps by the meeting duration.
pub fn slots_for_date(
    schedule: &AvailabilitySchedule,
    date: NaiveDate,
    meeting_type: &str,
    step_minutes: Option<u32>,
) -> Result<Vec<NaiveTime>> {
    let meeting = schedule.meeting_type(meeting_type)?;
    if schedule.is_blocked(date) {
        return Ok(Vec::new());
    }

    let day = &schedule.weekly[date.weekday().num_days_from_monday() as usize];
    if !day.enabled {
        return Ok(Vec::new());
    }

    let step = step_minutes.unwrap_or(meeting.duration_minutes);
    let mut slots = Vec::new();
    for window in &day.windows {
        slots.extend(generate_slots(window, meeting.duration_minutes, step));
    }
    slots.sort();
    Ok(slots)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn window(sh: u32, sm: u32, eh: u32, em: u32) -> TimeWindow {
        TimeWindow {
            start: t(sh, sm),
            end: t(eh, em),
        }
    }

    fn schedule_with_weekday_mornings() -> AvailabilitySchedule {
        let mut schedule = AvailabilitySchedule::new("intro", "Dana");
        for i in 0..5 {
            schedule.weekly[i] = DayTemplate {
                enabled: true,
                windows: vec![window(9, 0, 12, 0)],
            };
        }
        schedule.meeting_types.push(MeetingType {
            name: "intro-call".into(),
            duration_minutes: 30,
        });
        schedule
    }

    #[test]
    fn generates_fixed_step_slots() {
        let slots = generate_slots(&window(9, 0, 10, 30), 30, 30);
        assert_eq!(slots, vec![t(9, 0), t(9, 30), t(10, 0)]);
    }

    #[test]
    fn last_slot_must_fit_duration() {
        // 45-minute meetings stepping every 30: 10:15 would end past 11:00.
        let slots = generate_slots(&window(9, 0, 11, 0), 45, 30);
        assert_eq!(slots, vec![t(9, 0), t(9, 30), t(10, 0)]);
    }

    #[test]
    fn window_shorter_than_duration_is_empty() {
        assert!(generate_slots(&window(9, 0, 9, 20), 30, 30).is_empty());
    }

    #[test]
    fn zero_duration_is_empty() {
        assert!(generate_slots(&window(9, 0, 17, 0), 0, 30).is_empty());
    }

    #[test]
    fn inverted_window_is_empty() {
        assert!(generate_slots(&window(17, 0, 9, 0), 30, 30).is_empty());
    }

    #[test]
    fn inverted_window_fails_validation() {
        assert!(window(17, 0, 9, 0).validate().is_err());
        assert!(window(9, 0, 9, 0).validate().is_err());
        assert!(window(9, 0, 17, 0).validate().is_ok());
    }

    #[test]
    fn slots_for_enabled_weekday() {
        let schedule = schedule_with_weekday_mornings();
        // 2026-08-03 is a Monday.
        let date = NaiveDate::from_ymd_opt(2026, 8, 3).unwrap();
        let slots = slots_for_date(&schedule, date, "intro-call", None).unwrap();
        assert_eq!(slots.len(), 6);
        assert_eq!(slots[0], t(9, 0));
        assert_eq!(slots[5], t(11, 30));
    }

    #[test]
    fn disabled_day_has_no_slots() {
        let schedule = schedule_with_weekday_mornings();
        // 2026-08-08 is a Saturday.
        let date = NaiveDate::from_ymd_opt(2026, 8, 8).unwrap();
        let slots = slots_for_date(&schedule, date, "intro-call", None).unwrap();
        assert!(slots.is_empty());
    }

    #[test]
    fn blocked_date_has_no_slots() {
        let mut schedule = schedule_with_weekday_mornings();
        let date = NaiveDate::from_ymd_opt(2026, 8, 3).unwrap();
        schedule.blocked_dates.push(date);
        let slots = slots_for_date(&schedule, date, "intro-call", None).unwrap();
        assert!(slots.is_empty());
    }

    #[test]
    fn unknown_meeting_type_errors() {
        let schedule = schedule_with_weekday_mornings();
        let date = NaiveDate::from_ymd_opt(2026, 8, 3).unwrap();
        assert!(matches!(
            slots_for_date(&schedule, date, "deep-dive", None),
            Err(OpsError::UnknownMeetingType(_))
        ));
    }

    #[test]
    fn step_override_densifies_slots() {
        let schedule = schedule_with_weekday_mornings();
        let date = NaiveDate::from_ymd_opt(2026, 8, 3).unwrap();
        let slots = slots_for_date(&schedule, date, "intro-call", Some(15)).unwrap();
        assert_eq!(slots[0], t(9, 0));
        assert_eq!(slots[1], t(9, 15));
        // Last start leaving room for 30 minutes before 12:00.
        assert_eq!(*slots.last().unwrap(), t(11, 30));
    }

    #[test]
    fn multiple_windows_merge_sorted() {
        let mut schedule = schedule_with_weekday_mornings();
        schedule.weekly[0].windows.push(window(14, 0, 15, 0));
        let date = NaiveDate::from_ymd_opt(2026, 8, 3).unwrap();
        let slots = slots_for_date(&schedule, date, "intro-call", None).unwrap();
        assert!(slots.contains(&t(14, 0)));
        assert!(slots.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn create_rejects_duplicate_slug() {
        let dir = TempDir::new().unwrap();
        AvailabilitySchedule::create(dir.path(), "intro", "Dana").unwrap();
        assert!(matches!(
            AvailabilitySchedule::create(dir.path(), "intro", "Lee"),
            Err(OpsError::ScheduleExists(_))
        ));
    }

    #[test]
    fn create_validates_slug() {
        let dir = TempDir::new().unwrap();
        assert!(matches!(
            AvailabilitySchedule::create(dir.path(), "Bad Slug", "Dana"),
            Err(OpsError::InvalidSlug(_))
        ));
    }

    #[test]
    fn save_rejects_invalid_window() {
        let dir = TempDir::new().unwrap();
        let mut schedule = AvailabilitySchedule::new("intro", "Dana");
        schedule.weekly[0] = DayTemplate {
            enabled: true,
            windows: vec![window(15, 0, 9, 0)],
        };
        assert!(schedule.save(dir.path()).is_err());
    }

    #[test]
    fn roundtrip() {
        let dir = TempDir::new().unwrap();
        let schedule = schedule_with_weekday_mornings();
        schedule.save(dir.path()).unwrap();
        let loaded = AvailabilitySchedule::load(dir.path(), "intro").unwrap();
        assert_eq!(loaded.meeting_types[0].duration_minutes, 30);
        assert!(loaded.weekly[0].enabled);
        assert!(!loaded.weekly[5].enabled);
    }
}
