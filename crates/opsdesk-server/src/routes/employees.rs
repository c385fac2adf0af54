use axum::extract::{Path, State};
use axum::Json;

use opsdesk_core::employee::{Employee, EmployeeRole};

use crate::error::AppError;
use crate::state::AppState;

/// GET /api/employees
pub async fn list(State(app): State<AppState>) -> Result<Json<Vec<Employee>>, AppError> {
    let root = app.root.clone();
    let employees = tokio::task::spawn_blocking(move || Employee::list(&root))
        .await
        .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;
    Ok(Json(employees))
}

/// GET /api/employees/:id
pub async fn get(
    State(app): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Employee>, AppError> {
    let root = app.root.clone();
    let employee = tokio::task::spawn_blocking(move || Employee::load(&root, &id))
        .await
        .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;
    Ok(Json(employee))
}

#[derive(serde::Deserialize)]
pub struct CreateBody {
    pub name: String,
    pub role: String,
    pub persona: String,
    #[serde(default)]
    pub model: Option<String>,
}

/// POST /api/employees
pub async fn create(
    State(app): State<AppState>,
    Json(body): Json<CreateBody>,
) -> Result<Json<Employee>, AppError> {
    let root = app.root.clone();
    let employee = tokio::task::spawn_blocking(move || {
        let role: EmployeeRole = body.role.parse()?;
        let mut employee = Employee::new(body.name, role, body.persona);
        employee.model = body.model;
        employee.save(&root)?;
        Ok::<_, opsdesk_core::OpsError>(employee)
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    app.touch();
    Ok(Json(employee))
}

#[derive(serde::Deserialize)]
pub struct UpdateBody {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub persona: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
}

/// PUT /api/employees/:id
pub async fn update(
    State(app): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<UpdateBody>,
) -> Result<Json<Employee>, AppError> {
    let root = app.root.clone();
    let employee = tokio::task::spawn_blocking(move || {
        let mut employee = Employee::load(&root, &id)?;
        if let Some(name) = body.name {
            employee.name = name;
        }
        if let Some(role) = body.role {
            employee.role = role.parse()?;
        }
        if let Some(persona) = body.persona {
            employee.persona = persona;
        }
        if let Some(model) = body.model {
            employee.model = Some(model);
        }
        employee.updated_at = chrono::Utc::now();
        employee.save(&root)?;
        Ok::<_, opsdesk_core::OpsError>(employee)
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    app.touch();
    Ok(Json(employee))
}

/// DELETE /api/employees/:id
pub async fn delete(
    State(app): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    let root = app.root.clone();
    let deleted = id.clone();
    tokio::task::spawn_blocking(move || Employee::delete(&root, &id))
        .await
        .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    app.touch();
    Ok(Json(serde_json::json!({ "deleted": deleted })))
}
