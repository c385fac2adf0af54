use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// OpportunityStage
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OpportunityStage {
    Lead,
    Qualified,
    Proposal,
    Negotiation,
    ClosedWon,
    ClosedLost,
}

impl OpportunityStage {
    pub fn all() -> &'static [OpportunityStage] {
        &[
            OpportunityStage::Lead,
            OpportunityStage::Qualified,
            OpportunityStage::Proposal,
            OpportunityStage::Negotiation,
            OpportunityStage::ClosedWon,
            OpportunityStage::ClosedLost,
        ]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            OpportunityStage::Lead => "lead",
            OpportunityStage::Qualified => "qualified",
            OpportunityStage::Proposal => "proposal",
            OpportunityStage::Negotiation => "negotiation",
            OpportunityStage::ClosedWon => "closed_won",
            OpportunityStage::ClosedLost => "closed_lost",
        }
    }

    /// Default win probability (percent) assigned when a deal enters the stage.
    pub fn default_probability(self) -> u8 {
        match self {
            OpportunityStage::Lead => 10,
            OpportunityStage::Qualified => 25,
            OpportunityStage::Proposal => 50,
            OpportunityStage::Negotiation => 75,
            OpportunityStage::ClosedWon => 100,
            OpportunityStage::ClosedLost => 0,
        }
    }

    pub fn is_closed(self) -> bool {
        matches!(
            self,
            OpportunityStage::ClosedWon | OpportunityStage::ClosedLost
        )
    }
}

impl fmt::Display for OpportunityStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for OpportunityStage {
    type Err = crate::error::OpsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "lead" => Ok(OpportunityStage::Lead),
            "qualified" => Ok(OpportunityStage::Qualified),
            "proposal" => Ok(OpportunityStage::Proposal),
            "negotiation" => Ok(OpportunityStage::Negotiation),
            "closed_won" => Ok(OpportunityStage::ClosedWon),
            "closed_lost" => Ok(OpportunityStage::ClosedLost),
            _ => Err(crate::error::OpsError::InvalidStage(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// MemberRole
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemberRole {
    Owner,
    Admin,
    Staff,
    Affiliate,
    Contractor,
}

impl MemberRole {
    pub fn as_str(self) -> &'static str {
        match self {
            MemberRole::Owner => "owner",
            MemberRole::Admin => "admin",
            MemberRole::Staff => "staff",
            MemberRole::Affiliate => "affiliate",
            MemberRole::Contractor => "contractor",
        }
    }
}

impl fmt::Display for MemberRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for MemberRole {
    type Err = crate::error::OpsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "owner" => Ok(MemberRole::Owner),
            "admin" => Ok(MemberRole::Admin),
            "staff" => Ok(MemberRole::Staff),
            "affiliate" => Ok(MemberRole::Affiliate),
            "contractor" => Ok(MemberRole::Contractor),
            _ => Err(crate::error::OpsError::InvalidRole(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// KeyStatus
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyStatus {
    Active,
    Revoked,
    Expired,
}

impl fmt::Display for KeyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            KeyStatus::Active => "active",
            KeyStatus::Revoked => "revoked",
            KeyStatus::Expired => "expired",
        };
        f.write_str(s)
    }
}

// ---------------------------------------------------------------------------
// BookingStatus
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    Confirmed,
    Cancelled,
    Completed,
}

impl BookingStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Cancelled => "cancelled",
            BookingStatus::Completed => "completed",
        }
    }

    /// Cancelled bookings release their slot; everything else holds it.
    pub fn holds_slot(self) -> bool {
        !matches!(self, BookingStatus::Cancelled)
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// TrackerKind / TrackerStatus / TrackerPriority
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrackerKind {
    Bug,
    Idea,
}

impl fmt::Display for TrackerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TrackerKind::Bug => "bug",
            TrackerKind::Idea => "idea",
        };
        f.write_str(s)
    }
}

impl std::str::FromStr for TrackerKind {
    type Err = crate::error::OpsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "bug" => Ok(TrackerKind::Bug),
            "idea" => Ok(TrackerKind::Idea),
            _ => Err(crate::error::OpsError::InvalidKind(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrackerStatus {
    Open,
    InProgress,
    Resolved,
    Closed,
}

impl TrackerStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            TrackerStatus::Open => "open",
            TrackerStatus::InProgress => "in_progress",
            TrackerStatus::Resolved => "resolved",
            TrackerStatus::Closed => "closed",
        }
    }
}

impl fmt::Display for TrackerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for TrackerStatus {
    type Err = crate::error::OpsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "open" => Ok(TrackerStatus::Open),
            "in_progress" => Ok(TrackerStatus::InProgress),
            "resolved" => Ok(TrackerStatus::Resolved),
            "closed" => Ok(TrackerStatus::Closed),
            _ => Err(crate::error::OpsError::InvalidStatus(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrackerPriority {
    Low,
    Medium,
    High,
    Critical,
}

impl TrackerPriority {
    pub fn as_str(self) -> &'static str {
        match self {
            TrackerPriority::Low => "low",
            TrackerPriority::Medium => "medium",
            TrackerPriority::High => "high",
            TrackerPriority::Critical => "critical",
        }
    }
}

impl fmt::Display for TrackerPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for TrackerPriority {
    type Err = crate::error::OpsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(TrackerPriority::Low),
            "medium" => Ok(TrackerPriority::Medium),
            "high" => Ok(TrackerPriority::High),
            "critical" => Ok(TrackerPriority::Critical),
            _ => Err(crate::error::OpsError::InvalidPriority(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// RockStatus
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RockStatus {
    OnTrack,
    OffTrack,
    Done,
}

impl RockStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            RockStatus::OnTrack => "on_track",
            RockStatus::OffTrack => "off_track",
            RockStatus::Done => "done",
        }
    }
}

impl fmt::Display for RockStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for RockStatus {
    type Err = crate::error::OpsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "on_track" => Ok(RockStatus::OnTrack),
            "off_track" => Ok(RockStatus::OffTrack),
            "done" => Ok(RockStatus::Done),
            _ => Err(crate::error::OpsError::InvalidStatus(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
