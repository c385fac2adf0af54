use axum::extract::{Path, State};
use axum::Json;

use opsdesk_core::notify::EventKind;
use opsdesk_core::opportunity::{self, Opportunity, Subscription};
use opsdesk_core::types::OpportunityStage;

use crate::effects;
use crate::error::AppError;
use crate::state::AppState;
use opsdesk_core::activity::ActivityEntry;

/// GET /api/opportunities — all deals plus a pipeline summary.
pub async fn list(State(app): State<AppState>) -> Result<Json<serde_json::Value>, AppError> {
    let root = app.root.clone();
    let result = tokio::task::spawn_blocking(move || {
        let opportunities = Opportunity::list(&root)?;
        let summary = opportunity::summarize(&opportunities);
        Ok::<_, opsdesk_core::OpsError>(serde_json::json!({
            "opportunities": opportunities,
            "summary": summary,
        }))
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Json(result))
}

/// GET /api/opportunities/:id
pub async fn get(
    State(app): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Opportunity>, AppError> {
    let root = app.root.clone();
    let opp = tokio::task::spawn_blocking(move || Opportunity::load(&root, &id))
        .await
        .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;
    Ok(Json(opp))
}

#[derive(serde::Deserialize)]
pub struct CreateBody {
    pub name: String,
    pub company: String,
    pub value: f64,
    #[serde(default)]
    pub affiliate_id: Option<String>,
    #[serde(default)]
    pub subscription: Option<Subscription>,
}

/// POST /api/opportunities
pub async fn create(
    State(app): State<AppState>,
    Json(body): Json<CreateBody>,
) -> Result<Json<Opportunity>, AppError> {
    let root = app.root.clone();
    let opp = tokio::task::spawn_blocking(move || {
        let mut opp = Opportunity::new(body.name, body.company, body.value);
        opp.affiliate_id = body.affiliate_id;
        opp.subscription = body.subscription;
        opp.save(&root)?;
        Ok::<_, opsdesk_core::OpsError>(opp)
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    effects::record_activity(
        &app,
        ActivityEntry::new("portal", "created", "opportunity", &opp.id),
    );
    effects::post_event(
        &app,
        EventKind::OpportunityCreated {
            name: opp.name.clone(),
            company: opp.company.clone(),
            value: opp.value,
        },
    );
    app.touch();
    Ok(Json(opp))
}

#[derive(serde::Deserialize)]
pub struct UpdateBody {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub value: Option<f64>,
    #[serde(default)]
    pub probability: Option<u8>,
    #[serde(default)]
    pub affiliate_id: Option<String>,
    #[serde(default)]
    pub subscription: Option<Subscription>,
}

/// PUT /api/opportunities/:id
pub async fn update(
    State(app): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<UpdateBody>,
) -> Result<Json<Opportunity>, AppError> {
    let root = app.root.clone();
    let opp = tokio::task::spawn_blocking(move || {
        let mut opp = Opportunity::load(&root, &id)?;
        if let Some(name) = body.name {
            opp.name = name;
        }
        if let Some(company) = body.company {
            opp.company = company;
        }
        if let Some(value) = body.value {
            opp.value = value;
        }
        if let Some(p) = body.probability {
            opp.set_probability(p);
        }
        if let Some(affiliate_id) = body.affiliate_id {
            opp.affiliate_id = Some(affiliate_id);
        }
        if let Some(subscription) = body.subscription {
            opp.subscription = Some(subscription);
        }
        opp.updated_at = chrono::Utc::now();
        opp.save(&root)?;
        Ok::<_, opsdesk_core::OpsError>(opp)
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    app.touch();
    Ok(Json(opp))
}

#[derive(serde::Deserialize)]
pub struct StageBody {
    pub stage: String,
}

/// POST /api/opportunities/:id/stage — move the deal through the pipeline.
pub async fn set_stage(
    State(app): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<StageBody>,
) -> Result<Json<Opportunity>, AppError> {
    let root = app.root.clone();
    let (opp, from) = tokio::task::spawn_blocking(move || {
        let mut opp = Opportunity::load(&root, &id)?;
        let target: OpportunityStage = body.stage.parse()?;
        let from = opp.stage;
        opp.set_stage(target);
        opp.save(&root)?;
        Ok::<_, opsdesk_core::OpsError>((opp, from))
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    effects::record_activity(
        &app,
        ActivityEntry::new("portal", "staged", "opportunity", &opp.id)
            .with_detail(format!("{from} -> {}", opp.stage)),
    );
    let event = match opp.stage {
        OpportunityStage::ClosedWon => EventKind::OpportunityWon {
            name: opp.name.clone(),
            value: opp.value,
        },
        OpportunityStage::ClosedLost => EventKind::OpportunityLost {
            name: opp.name.clone(),
        },
        _ => EventKind::OpportunityStageChanged {
            name: opp.name.clone(),
            from: from.to_string(),
            to: opp.stage.to_string(),
        },
    };
    effects::post_event(&app, event);
    app.touch();
    Ok(Json(opp))
}

/// DELETE /api/opportunities/:id
pub async fn delete(
    State(app): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    let root = app.root.clone();
    let deleted_id = id.clone();
    tokio::task::spawn_blocking(move || Opportunity::delete(&root, &id))
        .await
        .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    effects::record_activity(
        &app,
        ActivityEntry::new("portal", "deleted", "opportunity", &deleted_id),
    );
    app.touch();
    Ok(Json(serde_json::json!({ "deleted": deleted_id })))
}
