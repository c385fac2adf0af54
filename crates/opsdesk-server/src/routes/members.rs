use axum::extract::{Path, Query, State};
use axum::Json;

use opsdesk_core::activity::ActivityEntry;
use opsdesk_core::member::{self, Member};
use opsdesk_core::notify::EventKind;
use opsdesk_core::types::MemberRole;

use crate::effects;
use crate::error::AppError;
use crate::state::AppState;

#[derive(serde::Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub role: Option<String>,
}

/// GET /api/members[?role=affiliate]
pub async fn list(
    State(app): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<serde_json::Value>, AppError> {
    let root = app.root.clone();
    let result = tokio::task::spawn_blocking(move || {
        let members = Member::list(&root)?;
        let filtered: Vec<Member> = match &query.role {
            Some(role) => {
                let role: MemberRole = role.parse()?;
                member::with_role(&members, role).into_iter().cloned().collect()
            }
            None => members,
        };
        Ok::<_, opsdesk_core::OpsError>(serde_json::json!(filtered))
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Json(result))
}

/// GET /api/members/:id
pub async fn get(
    State(app): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Member>, AppError> {
    let root = app.root.clone();
    let member = tokio::task::spawn_blocking(move || Member::load(&root, &id))
        .await
        .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;
    Ok(Json(member))
}

#[derive(serde::Deserialize)]
pub struct CreateBody {
    pub name: String,
    pub email: String,
    pub role: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub is_client: bool,
}

/// POST /api/members
pub async fn create(
    State(app): State<AppState>,
    Json(body): Json<CreateBody>,
) -> Result<Json<Member>, AppError> {
    let root = app.root.clone();
    let member = tokio::task::spawn_blocking(move || {
        let role: MemberRole = body.role.parse()?;
        let mut member = Member::new(body.name, body.email, role);
        member.phone = body.phone;
        member.company = body.company;
        member.is_client = body.is_client;
        member.save(&root)?;
        Ok::<_, opsdesk_core::OpsError>(member)
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    effects::record_activity(
        &app,
        ActivityEntry::new("portal", "created", "member", &member.id),
    );
    effects::post_event(
        &app,
        EventKind::MemberAdded {
            name: member.name.clone(),
            role: member.role.to_string(),
        },
    );
    app.touch();
    Ok(Json(member))
}

#[derive(serde::Deserialize)]
pub struct UpdateBody {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub is_client: Option<bool>,
}

/// PUT /api/members/:id
pub async fn update(
    State(app): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<UpdateBody>,
) -> Result<Json<Member>, AppError> {
    let root = app.root.clone();
    let member = tokio::task::spawn_blocking(move || {
        let mut member = Member::load(&root, &id)?;
        if let Some(name) = body.name {
            member.name = name;
        }
        if let Some(email) = body.email {
            member.email = email;
        }
        if let Some(role) = body.role {
            member.role = role.parse()?;
        }
        if let Some(phone) = body.phone {
            member.phone = Some(phone);
        }
        if let Some(company) = body.company {
            member.company = Some(company);
        }
        if let Some(is_client) = body.is_client {
            member.is_client = is_client;
        }
        member.updated_at = chrono::Utc::now();
        member.save(&root)?;
        Ok::<_, opsdesk_core::OpsError>(member)
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    app.touch();
    Ok(Json(member))
}

/// DELETE /api/members/:id
pub async fn delete(
    State(app): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    let root = app.root.clone();
    let name = {
        let root = root.clone();
        let id = id.clone();
        tokio::task::spawn_blocking(move || {
            let member = Member::load(&root, &id)?;
            Member::delete(&root, &id)?;
            Ok::<_, opsdesk_core::OpsError>(member.name)
        })
        .await
        .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??
    };

    effects::record_activity(&app, ActivityEntry::new("portal", "deleted", "member", &id));
    effects::post_event(&app, EventKind::MemberRemoved { name });
    app.touch();
    Ok(Json(serde_json::json!({ "deleted": id })))
}
