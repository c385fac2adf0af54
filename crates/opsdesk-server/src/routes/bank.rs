use axum::extract::{Path, Query, State};
use axum::Json;

use opsdesk_connect::{token_from_env, BankClient};
use opsdesk_core::config::Config;

use crate::error::AppError;
use crate::state::AppState;

fn client(app: &AppState) -> Result<BankClient, AppError> {
    let config = Config::load(&app.root)?;
    let Some(bank) = config.integrations.bank else {
        return Err(AppError::not_configured("bank"));
    };
    let token = token_from_env(&bank.token_env)?;
    Ok(BankClient::new(bank.api_base, token))
}

/// GET /api/bank/accounts — pass-through to the banking read API.
pub async fn accounts(State(app): State<AppState>) -> Result<Json<serde_json::Value>, AppError> {
    let accounts = client(&app)?.accounts().await?;
    let list: Vec<serde_json::Value> = accounts
        .iter()
        .map(|a| {
            serde_json::json!({
                "id": a.id,
                "name": a.name,
                "kind": a.kind,
                "available_balance": a.available_balance,
                "current_balance": a.current_balance,
            })
        })
        .collect();
    Ok(Json(serde_json::json!(list)))
}

#[derive(serde::Deserialize)]
pub struct TransactionsQuery {
    #[serde(default = "default_limit")]
    pub limit: u32,
}

fn default_limit() -> u32 {
    25
}

/// GET /api/bank/accounts/:id/transactions[?limit=25]
pub async fn transactions(
    State(app): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<TransactionsQuery>,
) -> Result<Json<serde_json::Value>, AppError> {
    let txns = client(&app)?.transactions(&id, query.limit).await?;
    let list: Vec<serde_json::Value> = txns
        .iter()
        .map(|t| {
            serde_json::json!({
                "id": t.id,
                "amount": t.amount,
                "counterparty_name": t.counterparty_name,
                "kind": t.kind,
                "status": t.status,
                "posted_at": t.posted_at,
            })
        })
        .collect();
    Ok(Json(serde_json::json!(list)))
}
