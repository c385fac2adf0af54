use thiserror::Error;

#[derive(Debug, Error)]
pub enum OpsError {
    #[error("not initialized: run 'opsdesk init'")]
    NotInitialized,

    #[error("opportunity not found: {0}")]
    OpportunityNotFound(String),

    #[error("member not found: {0}")]
    MemberNotFound(String),

    #[error("partner not found: {0}")]
    PartnerNotFound(String),

    #[error("software key not found: {0}")]
    KeyNotFound(String),

    #[error("schedule not found: {0}")]
    ScheduleNotFound(String),

    #[error("schedule already exists: {0}")]
    ScheduleExists(String),

    #[error("booking not found: {0}")]
    BookingNotFound(String),

    #[error("tracker item not found: {0}")]
    ItemNotFound(String),

    #[error("comment not found: {0}")]
    CommentNotFound(String),

    #[error("employee not found: {0}")]
    EmployeeNotFound(String),

    #[error("chat not found: {0}")]
    ChatNotFound(String),

    #[error("rock not found: {0}")]
    RockNotFound(String),

    #[error("invalid slug '{0}': must be lowercase alphanumeric with hyphens")]
    InvalidSlug(String),

    #[error("invalid quarter '{0}': expected YYYY-Qn")]
    InvalidQuarter(String),

    #[error("invalid stage: {0}")]
    InvalidStage(String),

    #[error("invalid status: {0}")]
    InvalidStatus(String),

    #[error("invalid role: {0}")]
    InvalidRole(String),

    #[error("invalid priority: {0}")]
    InvalidPriority(String),

    #[error("invalid kind: {0}")]
    InvalidKind(String),

    #[error("invalid time window: {0}")]
    InvalidTimeRange(String),

    #[error("unknown meeting type: {0}")]
    UnknownMeetingType(String),

    #[error("slot unavailable: {date} {start}")]
    SlotUnavailable { date: String, start: String },

    #[error("key is not active: {0}")]
    KeyInactive(String),

    #[error("activation limit reached for key {0}")]
    ActivationLimit(String),

    #[error("activity log error: {0}")]
    Activity(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, OpsError>;
