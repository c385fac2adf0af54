use axum::http::StatusCode;
use http_body_util::BodyExt;
use tempfile::TempDir;
use tower::ServiceExt;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Bootstrap a minimal project inside the given temp directory.
fn init_project(dir: &TempDir) {
    let config = opsdesk_core::config::Config::new("test-org");
    opsdesk_core::io::ensure_dir(&dir.path().join(".opsdesk")).unwrap();
    config.save(dir.path()).unwrap();
}

fn router(dir: &TempDir) -> axum::Router {
    opsdesk_server::build_router(dir.path().to_path_buf())
}

/// Send a GET request via `oneshot` and return (status, parsed JSON body).
async fn get(app: axum::Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let req = axum::http::Request::builder()
        .uri(uri)
        .body(axum::body::Body::empty())
        .unwrap();
    let response = app.oneshot(req).await.unwrap();
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null);
    (status, json)
}

/// Send a request with a JSON body via `oneshot` and return (status, parsed JSON body).
async fn send_json(
    app: axum::Router,
    method: &str,
    uri: &str,
    body: serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    let req = axum::http::Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(axum::body::Body::from(serde_json::to_vec(&body).unwrap()))
        .unwrap();
    let response = app.oneshot(req).await.unwrap();
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null);
    (status, json)
}

async fn post_json(
    app: axum::Router,
    uri: &str,
    body: serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    send_json(app, "POST", uri, body).await
}

/// Create a schedule with weekday-morning availability and a 30-minute
/// meeting type, via the API.
async fn publish_schedule(dir: &TempDir, slug: &str) {
    let (status, _) = post_json(
        router(dir),
        "/api/schedules",
        serde_json::json!({ "slug": slug, "owner_name": "Dana" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let weekly: Vec<serde_json::Value> = (0..7)
        .map(|i| {
            if i < 5 {
                serde_json::json!({
                    "enabled": true,
                    "windows": [{ "start": "09:00:00", "end": "12:00:00" }],
                })
            } else {
                serde_json::json!({ "enabled": false, "windows": [] })
            }
        })
        .collect();
    let (status, _) = send_json(
        router(dir),
        "PUT",
        &format!("/api/schedules/{slug}"),
        serde_json::json!({
            "weekly": weekly,
            "meeting_types": [{ "name": "intro-call", "duration_minutes": 30 }],
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

fn booking_body(start: &str) -> serde_json::Value {
    serde_json::json!({
        "meeting_type": "intro-call",
        "date": "2026-08-03",
        "start": start,
        "name": "Sam",
        "email": "sam@example.com",
    })
}

// ---------------------------------------------------------------------------
// State & config
// ---------------------------------------------------------------------------

#[tokio::test]
async fn get_state_returns_summary() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);

    let (status, json) = get(router(&dir), "/api/state").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["project"], "test-org");
    assert_eq!(json["counts"]["opportunities"], 0);
    assert!(json["pipeline"].is_object());
}

#[tokio::test]
async fn get_config_errors_when_not_initialized() {
    let dir = TempDir::new().unwrap();
    // Deliberately do NOT call init_project.

    let (status, _json) = get(router(&dir), "/api/config").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn get_config_returns_config_and_warnings() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);

    let (status, json) = get(router(&dir), "/api/config").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["config"]["project"]["name"], "test-org");
    assert!(json["warnings"].is_array());
}

// ---------------------------------------------------------------------------
// Opportunities
// ---------------------------------------------------------------------------

#[tokio::test]
async fn opportunity_create_list_stage() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);

    let (status, created) = post_json(
        router(&dir),
        "/api/opportunities",
        serde_json::json!({ "name": "Rebuild", "company": "Acme", "value": 24000.0 }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(created["stage"], "lead");
    assert_eq!(created["probability"], 10);
    let id = created["id"].as_str().unwrap().to_string();

    let (status, listed) = get(router(&dir), "/api/opportunities").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed["opportunities"].as_array().unwrap().len(), 1);
    assert_eq!(listed["summary"]["open_count"], 1);

    let (status, moved) = post_json(
        router(&dir),
        &format!("/api/opportunities/{id}/stage"),
        serde_json::json!({ "stage": "proposal" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(moved["stage"], "proposal");
    assert_eq!(moved["probability"], 50);
}

#[tokio::test]
async fn opportunity_invalid_stage_is_400() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);

    let (_, created) = post_json(
        router(&dir),
        "/api/opportunities",
        serde_json::json!({ "name": "Rebuild", "company": "Acme", "value": 1.0 }),
    )
    .await;
    let id = created["id"].as_str().unwrap();

    let (status, _) = post_json(
        router(&dir),
        &format!("/api/opportunities/{id}/stage"),
        serde_json::json!({ "stage": "won" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn opportunity_missing_is_404() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);

    let (status, _) = get(router(&dir), "/api/opportunities/nope").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Members
// ---------------------------------------------------------------------------

#[tokio::test]
async fn member_role_filter() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);

    for (name, role) in [("Dana", "staff"), ("Lee", "affiliate")] {
        let (status, _) = post_json(
            router(&dir),
            "/api/members",
            serde_json::json!({ "name": name, "email": format!("{name}@x.co"), "role": role }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    let (status, json) = get(router(&dir), "/api/members?role=affiliate").await;
    assert_eq!(status, StatusCode::OK);
    let arr = json.as_array().unwrap();
    assert_eq!(arr.len(), 1);
    assert_eq!(arr[0]["name"], "Lee");

    let (status, _) = get(router(&dir), "/api/members?role=intern").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// Software keys
// ---------------------------------------------------------------------------

#[tokio::test]
async fn key_issue_activate_to_cap_then_conflict() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);

    let (status, key) = post_json(
        router(&dir),
        "/api/keys",
        serde_json::json!({ "tools": ["reporter", "all"], "max_activations": 1 }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    // The all-tools entitlement clears individual picks.
    assert_eq!(key["tools"], serde_json::json!(["all"]));
    let id = key["id"].as_str().unwrap().to_string();

    let (status, activated) =
        post_json(router(&dir), &format!("/api/keys/{id}/activate"), serde_json::json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(activated["activations"], 1);

    let (status, _) =
        post_json(router(&dir), &format!("/api/keys/{id}/activate"), serde_json::json!({})).await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn revoked_key_activation_is_conflict() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);

    let (_, key) = post_json(
        router(&dir),
        "/api/keys",
        serde_json::json!({ "tools": ["all"], "max_activations": 5 }),
    )
    .await;
    let id = key["id"].as_str().unwrap().to_string();

    let (status, revoked) =
        post_json(router(&dir), &format!("/api/keys/{id}/revoke"), serde_json::json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(revoked["status"], "revoked");

    let (status, _) =
        post_json(router(&dir), &format!("/api/keys/{id}/activate"), serde_json::json!({})).await;
    assert_eq!(status, StatusCode::CONFLICT);
}

// ---------------------------------------------------------------------------
// Schedules & public booking
// ---------------------------------------------------------------------------

#[tokio::test]
async fn duplicate_schedule_slug_is_409() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);

    let body = serde_json::json!({ "slug": "intro", "owner_name": "Dana" });
    let (status, _) = post_json(router(&dir), "/api/schedules", body.clone()).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = post_json(router(&dir), "/api/schedules", body).await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn invalid_schedule_slug_is_400() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);

    let (status, _) = post_json(
        router(&dir),
        "/api/schedules",
        serde_json::json!({ "slug": "Bad Slug", "owner_name": "Dana" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn public_page_shows_meeting_types() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);
    publish_schedule(&dir, "intro").await;

    let (status, json) = get(router(&dir), "/api/book/intro").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["owner_name"], "Dana");
    assert_eq!(json["meeting_types"][0]["name"], "intro-call");
}

#[tokio::test]
async fn public_slots_for_open_monday() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);
    publish_schedule(&dir, "intro").await;

    // 2026-08-03 is a Monday.
    let (status, json) = get(
        router(&dir),
        "/api/book/intro/slots?date=2026-08-03&meeting_type=intro-call",
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let slots = json["slots"].as_array().unwrap();
    assert_eq!(slots.len(), 6);
    assert_eq!(slots[0], "09:00");
}

#[tokio::test]
async fn booking_holds_slot_and_second_attempt_conflicts() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);
    publish_schedule(&dir, "intro").await;

    let (status, booking) =
        post_json(router(&dir), "/api/book/intro", booking_body("09:30")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(booking["status"], "confirmed");

    // The same slot again: the write-time re-check answers 409.
    let (status, err) = post_json(router(&dir), "/api/book/intro", booking_body("09:30")).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(err["error"].as_str().unwrap().contains("slot unavailable"));

    // And the slots listing no longer offers it.
    let (_, json) = get(
        router(&dir),
        "/api/book/intro/slots?date=2026-08-03&meeting_type=intro-call",
    )
    .await;
    let slots = json["slots"].as_array().unwrap();
    assert!(!slots.iter().any(|s| s == "09:30"));
    assert!(slots.iter().any(|s| s == "10:00"));
}

#[tokio::test]
async fn cancelled_booking_reopens_slot() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);
    publish_schedule(&dir, "intro").await;

    let (_, booking) = post_json(router(&dir), "/api/book/intro", booking_body("09:30")).await;
    let id = booking["id"].as_str().unwrap().to_string();

    let (status, cancelled) = post_json(
        router(&dir),
        &format!("/api/bookings/{id}/cancel"),
        serde_json::json!({}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(cancelled["status"], "cancelled");

    let (status, _) = post_json(router(&dir), "/api/book/intro", booking_body("09:30")).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn off_grid_start_is_conflict() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);
    publish_schedule(&dir, "intro").await;

    let (status, _) = post_json(router(&dir), "/api/book/intro", booking_body("09:10")).await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn booking_writes_activity_entry() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);
    publish_schedule(&dir, "intro").await;

    post_json(router(&dir), "/api/book/intro", booking_body("09:00")).await;

    let (status, json) = get(router(&dir), "/api/activity").await;
    assert_eq!(status, StatusCode::OK);
    let entries = json.as_array().unwrap();
    assert!(entries
        .iter()
        .any(|e| e["subject_kind"] == "booking" && e["verb"] == "created"));
}

// ---------------------------------------------------------------------------
// Tracker
// ---------------------------------------------------------------------------

#[tokio::test]
async fn tracker_item_comment_roundtrip() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);

    let (status, item) = post_json(
        router(&dir),
        "/api/tracker",
        serde_json::json!({ "title": "Login 500s", "kind": "bug", "priority": "high" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let id = item["id"].as_str().unwrap().to_string();

    let (status, comment) = post_json(
        router(&dir),
        &format!("/api/tracker/{id}/comments"),
        serde_json::json!({ "body": "repro attached", "author": "dana" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(comment["comment_id"], "C1");

    let (status, updated) = post_json(
        router(&dir),
        &format!("/api/tracker/{id}/status"),
        serde_json::json!({ "status": "resolved" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["status"], "resolved");

    let (status, after) = send_json(
        router(&dir),
        "DELETE",
        &format!("/api/tracker/{id}/comments/C1"),
        serde_json::json!({}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(after["comments"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn tracker_unknown_kind_is_400() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);

    let (status, _) = post_json(
        router(&dir),
        "/api/tracker",
        serde_json::json!({ "title": "X", "kind": "feature" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// Rocks
// ---------------------------------------------------------------------------

#[tokio::test]
async fn rock_invalid_quarter_is_400() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);

    let (status, _) = post_json(
        router(&dir),
        "/api/rocks",
        serde_json::json!({ "title": "Ship v2", "owner": "Dana", "quarter": "Q3" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn rock_quarter_filter() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);

    for (title, quarter) in [("A", "2026-Q3"), ("B", "2026-Q4")] {
        post_json(
            router(&dir),
            "/api/rocks",
            serde_json::json!({ "title": title, "owner": "Dana", "quarter": quarter }),
        )
        .await;
    }

    let (status, json) = get(router(&dir), "/api/rocks?quarter=2026-Q3").await;
    assert_eq!(status, StatusCode::OK);
    let arr = json.as_array().unwrap();
    assert_eq!(arr.len(), 1);
    assert_eq!(arr[0]["title"], "A");
}

// ---------------------------------------------------------------------------
// Employees & chats
// ---------------------------------------------------------------------------

#[tokio::test]
async fn chat_requires_existing_employee() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);

    let (status, _) = post_json(
        router(&dir),
        "/api/chats",
        serde_json::json!({ "employee_id": "ghost", "title": "Hello" }),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn chat_message_without_assistant_config_is_503() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);

    let (_, employee) = post_json(
        router(&dir),
        "/api/employees",
        serde_json::json!({ "name": "Morgan", "role": "copywriter", "persona": "You write copy." }),
    )
    .await;
    let (_, chat) = post_json(
        router(&dir),
        "/api/chats",
        serde_json::json!({ "employee_id": employee["id"], "title": "Taglines" }),
    )
    .await;
    let chat_id = chat["id"].as_str().unwrap().to_string();

    let (status, _) = post_json(
        router(&dir),
        &format!("/api/chats/{chat_id}/messages"),
        serde_json::json!({ "content": "Draft three taglines" }),
    )
    .await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);

    // The user turn was still persisted.
    let (_, reloaded) = get(router(&dir), &format!("/api/chats/{chat_id}")).await;
    assert_eq!(reloaded["messages"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn chat_message_roundtrip_against_mock_upstream() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);

    let mut upstream = mockito::Server::new_async().await;
    upstream
        .mock("POST", "/v1/messages")
        .with_body(r#"{"content":[{"type":"text","text":"1. Ship faster"}]}"#)
        .create_async()
        .await;

    // Point the assistant integration at the mock and expose its key.
    let mut config = opsdesk_core::config::Config::new("test-org");
    config.integrations.assistant = Some(opsdesk_core::config::AssistantIntegration {
        api_base: upstream.url(),
        model: "fast-model".into(),
        key_env: "OPSDESK_TEST_ASSISTANT_KEY".into(),
        max_tokens: 256,
    });
    config.save(dir.path()).unwrap();
    std::env::set_var("OPSDESK_TEST_ASSISTANT_KEY", "sk-test");

    let (_, employee) = post_json(
        router(&dir),
        "/api/employees",
        serde_json::json!({ "name": "Morgan", "role": "copywriter", "persona": "You write copy." }),
    )
    .await;
    let (_, chat) = post_json(
        router(&dir),
        "/api/chats",
        serde_json::json!({ "employee_id": employee["id"], "title": "Taglines" }),
    )
    .await;
    let chat_id = chat["id"].as_str().unwrap().to_string();

    let (status, updated) = post_json(
        router(&dir),
        &format!("/api/chats/{chat_id}/messages"),
        serde_json::json!({ "content": "Draft three taglines" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let messages = updated["messages"].as_array().unwrap();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[1]["role"], "assistant");
    assert_eq!(messages[1]["content"], "1. Ship faster");
}

// ---------------------------------------------------------------------------
// Integration proxies
// ---------------------------------------------------------------------------

#[tokio::test]
async fn bank_proxy_unconfigured_is_503() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);

    let (status, _) = get(router(&dir), "/api/bank/accounts").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn bank_proxy_passes_through() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);

    let mut upstream = mockito::Server::new_async().await;
    upstream
        .mock("GET", "/accounts")
        .with_body(
            r#"{"accounts":[{"id":"a1","name":"Checking",
                "availableBalance":1200.5,"currentBalance":1300.0}]}"#,
        )
        .create_async()
        .await;

    let mut config = opsdesk_core::config::Config::new("test-org");
    config.integrations.bank = Some(opsdesk_core::config::BankIntegration {
        api_base: upstream.url(),
        token_env: "OPSDESK_TEST_BANK_TOKEN".into(),
    });
    config.save(dir.path()).unwrap();
    std::env::set_var("OPSDESK_TEST_BANK_TOKEN", "tok-1");

    let (status, json) = get(router(&dir), "/api/bank/accounts").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json[0]["name"], "Checking");
}

#[tokio::test]
async fn bank_proxy_upstream_failure_is_502() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);

    let mut upstream = mockito::Server::new_async().await;
    upstream
        .mock("GET", "/accounts")
        .with_status(500)
        .with_body("boom")
        .create_async()
        .await;

    let mut config = opsdesk_core::config::Config::new("test-org");
    config.integrations.bank = Some(opsdesk_core::config::BankIntegration {
        api_base: upstream.url(),
        token_env: "OPSDESK_TEST_BANK_TOKEN_502".into(),
    });
    config.save(dir.path()).unwrap();
    std::env::set_var("OPSDESK_TEST_BANK_TOKEN_502", "tok-1");

    let (status, _) = get(router(&dir), "/api/bank/accounts").await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
}

#[tokio::test]
async fn playbooks_proxy_lists_upstream_items() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);

    let mut upstream = mockito::Server::new_async().await;
    upstream
        .mock("GET", "/playbooks")
        .with_body(r#"{"total_count":1,"items":[{"id":"pb1","title":"Client onboarding"}]}"#)
        .create_async()
        .await;

    let mut config = opsdesk_core::config::Config::new("test-org");
    config.integrations.playbooks = Some(opsdesk_core::config::PlaybooksIntegration {
        api_base: upstream.url(),
        token_env: "OPSDESK_TEST_PB_TOKEN".into(),
    });
    config.save(dir.path()).unwrap();
    std::env::set_var("OPSDESK_TEST_PB_TOKEN", "tok-pb");

    let (status, json) = get(router(&dir), "/api/playbooks").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["total_count"], 1);
    assert_eq!(json["items"][0]["title"], "Client onboarding");
}
