//! Best-effort side channels shared by the route handlers.
//!
//! Activity-log writes and chat-webhook posts must never fail the request
//! that triggered them; both log a warning and move on.

use opsdesk_core::activity::{ActivityEntry, ActivityLog};
use opsdesk_core::config::Config;
use opsdesk_core::notify::{payload, EventKind};
use opsdesk_connect::WebhookClient;

use crate::state::AppState;

/// Record an activity entry, swallowing failures.
pub fn record_activity(app: &AppState, entry: ActivityEntry) {
    match ActivityLog::open_at_root(&app.root) {
        Ok(log) => {
            if let Err(e) = log.record(&entry) {
                tracing::warn!(error = %e, "activity write failed");
            }
        }
        Err(e) => tracing::warn!(error = %e, "activity log unavailable"),
    }
}

/// Post an event to the configured chat webhook, if any, on a background
/// task. The triggering request does not wait for the result.
pub fn post_event(app: &AppState, event: EventKind) {
    let config = match Config::load(&app.root) {
        Ok(c) => c,
        Err(e) => {
            tracing::warn!(error = %e, "config unavailable, skipping webhook");
            return;
        }
    };
    let Some(url) = config.notifications.webhook_url else {
        return;
    };

    let body = payload(&event, &config.notifications.username);
    tokio::spawn(async move {
        let client = WebhookClient::new(url);
        if let Err(e) = client.post(&body).await {
            tracing::warn!(error = %e, "webhook post failed");
        }
    });
}
