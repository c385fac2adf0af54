use axum::extract::{Path, State};
use axum::Json;

use opsdesk_core::activity::ActivityEntry;
use opsdesk_core::notify::EventKind;
use opsdesk_core::partner::{Partner, Recording};

use crate::effects;
use crate::error::AppError;
use crate::state::AppState;

/// GET /api/partners
pub async fn list(State(app): State<AppState>) -> Result<Json<Vec<Partner>>, AppError> {
    let root = app.root.clone();
    let partners = tokio::task::spawn_blocking(move || Partner::list(&root))
        .await
        .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;
    Ok(Json(partners))
}

/// GET /api/partners/:id
pub async fn get(
    State(app): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Partner>, AppError> {
    let root = app.root.clone();
    let partner = tokio::task::spawn_blocking(move || Partner::load(&root, &id))
        .await
        .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;
    Ok(Json(partner))
}

#[derive(serde::Deserialize)]
pub struct CreateBody {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub expertise: Vec<String>,
}

/// POST /api/partners
pub async fn create(
    State(app): State<AppState>,
    Json(body): Json<CreateBody>,
) -> Result<Json<Partner>, AppError> {
    let root = app.root.clone();
    let partner = tokio::task::spawn_blocking(move || {
        let mut partner = Partner::new(body.name, body.email);
        partner.phone = body.phone;
        partner.company = body.company;
        partner.expertise = body.expertise;
        partner.save(&root)?;
        Ok::<_, opsdesk_core::OpsError>(partner)
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    effects::record_activity(
        &app,
        ActivityEntry::new("portal", "created", "partner", &partner.id),
    );
    effects::post_event(
        &app,
        EventKind::PartnerAdded {
            name: partner.name.clone(),
            company: partner.company.clone(),
        },
    );
    app.touch();
    Ok(Json(partner))
}

#[derive(serde::Deserialize)]
pub struct UpdateBody {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub expertise: Option<Vec<String>>,
}

/// PUT /api/partners/:id
pub async fn update(
    State(app): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<UpdateBody>,
) -> Result<Json<Partner>, AppError> {
    let root = app.root.clone();
    let partner = tokio::task::spawn_blocking(move || {
        let mut partner = Partner::load(&root, &id)?;
        if let Some(name) = body.name {
            partner.name = name;
        }
        if let Some(email) = body.email {
            partner.email = email;
        }
        if let Some(phone) = body.phone {
            partner.phone = Some(phone);
        }
        if let Some(company) = body.company {
            partner.company = Some(company);
        }
        if let Some(expertise) = body.expertise {
            partner.expertise = expertise;
        }
        partner.updated_at = chrono::Utc::now();
        partner.save(&root)?;
        Ok::<_, opsdesk_core::OpsError>(partner)
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    app.touch();
    Ok(Json(partner))
}

/// POST /api/partners/:id/recordings — attach a recorded session.
pub async fn add_recording(
    State(app): State<AppState>,
    Path(id): Path<String>,
    Json(recording): Json<Recording>,
) -> Result<Json<Partner>, AppError> {
    let root = app.root.clone();
    let partner = tokio::task::spawn_blocking(move || {
        let mut partner = Partner::load(&root, &id)?;
        partner.add_recording(recording);
        partner.save(&root)?;
        Ok::<_, opsdesk_core::OpsError>(partner)
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    app.touch();
    Ok(Json(partner))
}

/// DELETE /api/partners/:id
pub async fn delete(
    State(app): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    let root = app.root.clone();
    let deleted_id = id.clone();
    tokio::task::spawn_blocking(move || Partner::delete(&root, &id))
        .await
        .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    effects::record_activity(
        &app,
        ActivityEntry::new("portal", "deleted", "partner", &deleted_id),
    );
    app.touch();
    Ok(Json(serde_json::json!({ "deleted": deleted_id })))
}
