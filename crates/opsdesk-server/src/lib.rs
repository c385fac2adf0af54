pub mod effects;
pub mod error;
pub mod routes;
pub mod state;

use axum::routing::{delete, get, post, put};
use axum::Router;
use std::path::PathBuf;
use tower_http::cors::{Any, CorsLayer};

/// Build the axum Router with all API routes and middleware.
/// Used by `serve()` and available for integration testing.
pub fn build_router(root: PathBuf) -> Router {
    let app_state = state::AppState::new(root);

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Events (SSE)
        .route("/api/events", get(routes::events::sse_events))
        // State & config
        .route("/api/state", get(routes::state::get_state))
        .route("/api/config", get(routes::config::get_config))
        // Opportunities
        .route("/api/opportunities", get(routes::opportunities::list))
        .route("/api/opportunities", post(routes::opportunities::create))
        .route("/api/opportunities/{id}", get(routes::opportunities::get))
        .route("/api/opportunities/{id}", put(routes::opportunities::update))
        .route(
            "/api/opportunities/{id}",
            delete(routes::opportunities::delete),
        )
        .route(
            "/api/opportunities/{id}/stage",
            post(routes::opportunities::set_stage),
        )
        // Members
        .route("/api/members", get(routes::members::list))
        .route("/api/members", post(routes::members::create))
        .route("/api/members/{id}", get(routes::members::get))
        .route("/api/members/{id}", put(routes::members::update))
        .route("/api/members/{id}", delete(routes::members::delete))
        // Partners
        .route("/api/partners", get(routes::partners::list))
        .route("/api/partners", post(routes::partners::create))
        .route("/api/partners/{id}", get(routes::partners::get))
        .route("/api/partners/{id}", put(routes::partners::update))
        .route("/api/partners/{id}", delete(routes::partners::delete))
        .route(
            "/api/partners/{id}/recordings",
            post(routes::partners::add_recording),
        )
        // Software keys
        .route("/api/keys", get(routes::keys::list))
        .route("/api/keys", post(routes::keys::issue))
        .route("/api/keys/{id}", get(routes::keys::get))
        .route("/api/keys/{id}", delete(routes::keys::delete))
        .route("/api/keys/{id}/activate", post(routes::keys::activate))
        .route("/api/keys/{id}/revoke", post(routes::keys::revoke))
        // Availability schedules
        .route("/api/schedules", get(routes::schedules::list))
        .route("/api/schedules", post(routes::schedules::create))
        .route("/api/schedules/{slug}", get(routes::schedules::get))
        .route("/api/schedules/{slug}", put(routes::schedules::update))
        .route("/api/schedules/{slug}", delete(routes::schedules::delete))
        // Bookings (management)
        .route("/api/bookings", get(routes::bookings::list))
        .route("/api/bookings/{id}/cancel", post(routes::bookings::cancel))
        .route(
            "/api/bookings/{id}/complete",
            post(routes::bookings::complete),
        )
        // Public booking page
        .route("/api/book/{slug}", get(routes::bookings::public_schedule))
        .route("/api/book/{slug}", post(routes::bookings::public_book))
        .route(
            "/api/book/{slug}/slots",
            get(routes::bookings::public_slots),
        )
        // Tracker
        .route("/api/tracker", get(routes::tracker::list))
        .route("/api/tracker", post(routes::tracker::create))
        .route("/api/tracker/{id}", get(routes::tracker::get))
        .route("/api/tracker/{id}", put(routes::tracker::update))
        .route("/api/tracker/{id}", delete(routes::tracker::delete))
        .route("/api/tracker/{id}/status", post(routes::tracker::set_status))
        .route(
            "/api/tracker/{id}/comments",
            post(routes::tracker::add_comment),
        )
        .route(
            "/api/tracker/{id}/comments/{cid}",
            delete(routes::tracker::resolve_comment),
        )
        // AI employees & chats
        .route("/api/employees", get(routes::employees::list))
        .route("/api/employees", post(routes::employees::create))
        .route("/api/employees/{id}", get(routes::employees::get))
        .route("/api/employees/{id}", put(routes::employees::update))
        .route("/api/employees/{id}", delete(routes::employees::delete))
        .route("/api/chats", get(routes::chats::list))
        .route("/api/chats", post(routes::chats::create))
        .route("/api/chats/{id}", get(routes::chats::get))
        .route("/api/chats/{id}", delete(routes::chats::delete))
        .route("/api/chats/{id}/messages", post(routes::chats::send_message))
        // Rocks
        .route("/api/rocks", get(routes::rocks::list))
        .route("/api/rocks", post(routes::rocks::create))
        .route("/api/rocks/{id}", get(routes::rocks::get))
        .route("/api/rocks/{id}", put(routes::rocks::update))
        .route("/api/rocks/{id}", delete(routes::rocks::delete))
        .route("/api/rocks/{id}/status", post(routes::rocks::set_status))
        // Activity log
        .route("/api/activity", get(routes::activity::recent))
        // Integration proxies
        .route("/api/bank/accounts", get(routes::bank::accounts))
        .route(
            "/api/bank/accounts/{id}/transactions",
            get(routes::bank::transactions),
        )
        .route("/api/playbooks", get(routes::playbooks::list))
        .route("/api/playbooks", post(routes::playbooks::create))
        .route("/api/playbooks/runs/list", get(routes::playbooks::runs))
        .route("/api/playbooks/runs", post(routes::playbooks::start_run))
        .route("/api/playbooks/{id}", get(routes::playbooks::get))
        .route("/api/playbooks/{id}", put(routes::playbooks::update))
        .route("/api/playbooks/{id}", delete(routes::playbooks::delete))
        .layer(cors)
        .with_state(app_state)
}

/// Start the opsdesk API server.
pub async fn serve(root: PathBuf, port: u16) -> anyhow::Result<()> {
    let app = build_router(root);

    let addr = format!("0.0.0.0:{port}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("opsdesk API listening on http://localhost:{port}");

    axum::serve(listener, app).await?;
    Ok(())
}
