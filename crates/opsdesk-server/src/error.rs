use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use opsdesk_connect::ConnectError;
use opsdesk_core::error::OpsError;

// ---------------------------------------------------------------------------
// Internal sentinel for explicit 503 errors
// ---------------------------------------------------------------------------

/// Private sentinel error type used to carry an explicit HTTP 503 through
/// the `anyhow::Error` chain without touching the `OpsError` enum.
#[derive(Debug)]
struct NotConfiguredError(String);

impl std::fmt::Display for NotConfiguredError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for NotConfiguredError {}

/// Private sentinel error type used to carry an explicit HTTP 400 through
/// the `anyhow::Error` chain.
#[derive(Debug)]
struct BadRequestError(String);

impl std::fmt::Display for BadRequestError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for BadRequestError {}

// ---------------------------------------------------------------------------
// AppError — unified error type for HTTP responses
// ---------------------------------------------------------------------------

/// Unified error type for HTTP responses.
#[derive(Debug)]
pub struct AppError(pub anyhow::Error);

impl AppError {
    /// Construct a 400 Bad Request error with the given message.
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self(BadRequestError(msg.into()).into())
    }

    /// Construct a 503 error for an integration that is absent from config.
    pub fn not_configured(integration: &str) -> Self {
        Self(NotConfiguredError(format!("integration not configured: {integration}")).into())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Check the sentinel types before falling through to the enums.
        if let Some(n) = self.0.downcast_ref::<NotConfiguredError>() {
            let body = serde_json::json!({ "error": n.0.clone() });
            return (StatusCode::SERVICE_UNAVAILABLE, axum::Json(body)).into_response();
        }
        if let Some(b) = self.0.downcast_ref::<BadRequestError>() {
            let body = serde_json::json!({ "error": b.0.clone() });
            return (StatusCode::BAD_REQUEST, axum::Json(body)).into_response();
        }

        let status = if let Some(e) = self.0.downcast_ref::<OpsError>() {
            match e {
                OpsError::NotInitialized => StatusCode::BAD_REQUEST,
                OpsError::OpportunityNotFound(_)
                | OpsError::MemberNotFound(_)
                | OpsError::PartnerNotFound(_)
                | OpsError::KeyNotFound(_)
                | OpsError::ScheduleNotFound(_)
                | OpsError::BookingNotFound(_)
                | OpsError::ItemNotFound(_)
                | OpsError::CommentNotFound(_)
                | OpsError::EmployeeNotFound(_)
                | OpsError::ChatNotFound(_)
                | OpsError::RockNotFound(_) => StatusCode::NOT_FOUND,
                OpsError::ScheduleExists(_) => StatusCode::CONFLICT,
                OpsError::SlotUnavailable { .. }
                | OpsError::KeyInactive(_)
                | OpsError::ActivationLimit(_) => StatusCode::CONFLICT,
                OpsError::InvalidSlug(_)
                | OpsError::InvalidQuarter(_)
                | OpsError::InvalidStage(_)
                | OpsError::InvalidStatus(_)
                | OpsError::InvalidRole(_)
                | OpsError::InvalidPriority(_)
                | OpsError::InvalidKind(_)
                | OpsError::InvalidTimeRange(_)
                | OpsError::UnknownMeetingType(_) => StatusCode::BAD_REQUEST,
                OpsError::Activity(_)
                | OpsError::Io(_)
                | OpsError::Yaml(_)
                | OpsError::Json(_) => StatusCode::INTERNAL_SERVER_ERROR,
            }
        } else if let Some(e) = self.0.downcast_ref::<ConnectError>() {
            match e {
                ConnectError::MissingCredentials(_) => StatusCode::SERVICE_UNAVAILABLE,
                _ => StatusCode::BAD_GATEWAY,
            }
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        };

        let body = serde_json::json!({ "error": self.0.to_string() });
        (status, axum::Json(body)).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::response::IntoResponse;

    #[test]
    fn opportunity_not_found_maps_to_404() {
        let err = AppError(OpsError::OpportunityNotFound("o-1".into()).into());
        assert_eq!(err.into_response().status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn schedule_exists_maps_to_409() {
        let err = AppError(OpsError::ScheduleExists("intro".into()).into());
        assert_eq!(err.into_response().status(), StatusCode::CONFLICT);
    }

    #[test]
    fn slot_unavailable_maps_to_409() {
        let err = AppError(
            OpsError::SlotUnavailable {
                date: "2026-08-03".into(),
                start: "09:30".into(),
            }
            .into(),
        );
        assert_eq!(err.into_response().status(), StatusCode::CONFLICT);
    }

    #[test]
    fn activation_limit_maps_to_409() {
        let err = AppError(OpsError::ActivationLimit("X".into()).into());
        assert_eq!(err.into_response().status(), StatusCode::CONFLICT);
    }

    #[test]
    fn invalid_stage_maps_to_400() {
        let err = AppError(OpsError::InvalidStage("won".into()).into());
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn unknown_meeting_type_maps_to_400() {
        let err = AppError(OpsError::UnknownMeetingType("deep-dive".into()).into());
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn not_initialized_maps_to_400() {
        let err = AppError(OpsError::NotInitialized.into());
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn io_error_maps_to_500() {
        let io_err = std::io::Error::other("disk full");
        let err = AppError(OpsError::Io(io_err).into());
        assert_eq!(
            err.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn upstream_api_error_maps_to_502() {
        let err = AppError(
            ConnectError::Api {
                status: 500,
                body: "boom".into(),
            }
            .into(),
        );
        assert_eq!(err.into_response().status(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn missing_credentials_maps_to_503() {
        let err = AppError(ConnectError::MissingCredentials("TOKEN".into()).into());
        assert_eq!(
            err.into_response().status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }

    #[test]
    fn not_configured_maps_to_503() {
        let err = AppError::not_configured("bank");
        assert_eq!(
            err.into_response().status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }

    #[test]
    fn bad_request_constructor_maps_to_400() {
        let err = AppError::bad_request("date query parameter is required");
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn response_body_contains_error_field() {
        let err = AppError(OpsError::RockNotFound("r-1".into()).into());
        let response = err.into_response();
        let ct = response
            .headers()
            .get(axum::http::header::CONTENT_TYPE)
            .expect("should have content-type");
        assert!(ct.to_str().unwrap().contains("application/json"));
    }
}
