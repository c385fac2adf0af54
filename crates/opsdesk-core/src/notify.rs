//! Chat-webhook message formatting.
//!
//! Maps portal events to the incoming-webhook payload of the team chat
//! (`text` in markdown, plus `username`/`icon_emoji`). Formatting only —
//! posting lives in the connect crate, and callers treat a failed post as
//! non-fatal.

use serde_json::{json, Value};

// ---------------------------------------------------------------------------
// EventKind
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub enum EventKind {
    OpportunityCreated { name: String, company: String, value: f64 },
    OpportunityStageChanged { name: String, from: String, to: String },
    OpportunityWon { name: String, value: f64 },
    OpportunityLost { name: String },
    MemberAdded { name: String, role: String },
    MemberRemoved { name: String },
    PartnerAdded { name: String, company: Option<String> },
    KeyIssued { code: String, tools: Vec<String> },
    KeyRevoked { code: String },
    BookingCreated { schedule: String, date: String, start: String, name: String },
    BookingCancelled { schedule: String, date: String, start: String },
    TrackerItemOpened { title: String, kind: String, priority: String },
    TrackerItemResolved { title: String },
    RockStatusChanged { title: String, owner: String, status: String },
    SchedulePublished { slug: String, owner: String },
    ChatEscalated { employee: String, title: String },
}

impl EventKind {
    /// Emoji shown next to the bot username for this event.
    fn icon(&self) -> &'static str {
        match self {
            EventKind::OpportunityCreated { .. }
            | EventKind::OpportunityStageChanged { .. } => ":chart_with_upwards_trend:",
            EventKind::OpportunityWon { .. } => ":tada:",
            EventKind::OpportunityLost { .. } => ":small_red_triangle_down:",
            EventKind::MemberAdded { .. } | EventKind::MemberRemoved { .. } => ":bust_in_silhouette:",
            EventKind::PartnerAdded { .. } => ":handshake:",
            EventKind::KeyIssued { .. } | EventKind::KeyRevoked { .. } => ":key:",
            EventKind::BookingCreated { .. } | EventKind::BookingCancelled { .. } => ":calendar:",
            EventKind::TrackerItemOpened { .. } | EventKind::TrackerItemResolved { .. } => ":bug:",
            EventKind::RockStatusChanged { .. } => ":mountain:",
            EventKind::SchedulePublished { .. } => ":mega:",
            EventKind::ChatEscalated { .. } => ":robot_face:",
        }
    }

    fn text(&self) -> String {
        match self {
            EventKind::OpportunityCreated { name, company, value } => {
                format!("**New opportunity**: {name} ({company}) — ${value:.0}")
            }
            EventKind::OpportunityStageChanged { name, from, to } => {
                format!("**{name}** moved from `{from}` to `{to}`")
            }
            EventKind::OpportunityWon { name, value } => {
                format!(":tada: **{name}** closed won — ${value:.0}")
            }
            EventKind::OpportunityLost { name } => format!("**{name}** closed lost"),
            EventKind::MemberAdded { name, role } => {
                format!("**{name}** joined as {role}")
            }
            EventKind::MemberRemoved { name } => format!("**{name}** was removed from the team"),
            EventKind::PartnerAdded { name, company } => match company {
                Some(c) => format!("New strategic partner: **{name}** ({c})"),
                None => format!("New strategic partner: **{name}**"),
            },
            EventKind::KeyIssued { code, tools } => {
                format!("Software key `{code}` issued for: {}", tools.join(", "))
            }
            EventKind::KeyRevoked { code } => format!("Software key `{code}` was revoked"),
            EventKind::BookingCreated { schedule, date, start, name } => {
                format!("**New booking** on `{schedule}`: {date} {start} with {name}")
            }
            EventKind::BookingCancelled { schedule, date, start } => {
                format!("Booking on `{schedule}` for {date} {start} was cancelled")
            }
            EventKind::TrackerItemOpened { title, kind, priority } => {
                format!("New {kind} ({priority}): **{title}**")
            }
            EventKind::TrackerItemResolved { title } => format!("Resolved: **{title}**"),
            EventKind::RockStatusChanged { title, owner, status } => {
                format!("Rock **{title}** ({owner}) is now `{status}`")
            }
            EventKind::SchedulePublished { slug, owner } => {
                format!("{owner} published a booking page: `/book/{slug}`")
            }
            EventKind::ChatEscalated { employee, title } => {
                format!("Chat with **{employee}** needs a human: {title}")
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Payload
// ---------------------------------------------------------------------------

/// Build the webhook body for an event.
pub fn payload(event: &EventKind, username: &str) -> Value {
    json!({
        "text": event.text(),
        "username": username,
        "icon_emoji": event.icon(),
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
