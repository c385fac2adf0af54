use crate::error::{ConnectError, Result};
use chrono::{DateTime, Utc};
use serde::Deserialize;

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BankAccount {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub kind: Option<String>,
    pub available_balance: f64,
    pub current_balance: f64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: String,
    pub amount: f64,
    #[serde(default)]
    pub counterparty_name: Option<String>,
    #[serde(default)]
    pub kind: Option<String>,
    pub status: String,
    #[serde(default)]
    pub posted_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
struct AccountsResponse {
    accounts: Vec<BankAccount>,
}

#[derive(Debug, Deserialize)]
struct TransactionsResponse {
    transactions: Vec<Transaction>,
}

// ---------------------------------------------------------------------------
// BankClient
// ---------------------------------------------------------------------------

/// Read-only client for the banking data provider. The portal never moves
/// money; this backs a balances/transactions dashboard.
#[derive(Debug, Clone)]
pub struct BankClient {
    api_base: String,
    token: String,
    http: reqwest::Client,
}

impl BankClient {
    pub fn new(api_base: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            api_base: api_base.into().trim_end_matches('/').to_string(),
            token: token.into(),
            http: reqwest::Client::new(),
        }
    }

    pub async fn accounts(&self) -> Result<Vec<BankAccount>> {
        let url = format!("{}/accounts", self.api_base);
        let resp: AccountsResponse = self.get_json(&url).await?;
        Ok(resp.accounts)
    }

    pub async fn transactions(&self, account_id: &str, limit: u32) -> Result<Vec<Transaction>> {
        let url = format!(
            "{}/account/{}/transactions?limit={}",
            self.api_base, account_id, limit
        );
        let resp: TransactionsResponse = self.get_json(&url).await?;
        Ok(resp.transactions)
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, url: &str) -> Result<T> {
        let resp = self
            .http
            .get(url)
            .bearer_auth(&self.token)
            .send()
            .await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ConnectError::Api {
                status: status.as_u16(),
                body,
            });
        }
        let body = resp.text().await?;
        serde_json::from_str(&body).map_err(|e| ConnectError::Decode(e.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn lists_accounts() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/accounts")
            .match_header("authorization", "Bearer tok-1")
            .with_body(
                r#"{"accounts":[{"id":"a1","name":"Checking","kind":"checking",
                    "availableBalance":1200.50,"currentBalance":1300.00}]}"#,
            )
            .create_async()
            .await;

        let client = BankClient::new(server.url(), "tok-1");
        let accounts = client.accounts().await.unwrap();
        assert_eq!(accounts.len(), 1);
        assert_eq!(accounts[0].name, "Checking");
        assert!((accounts[0].available_balance - 1200.50).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn lists_transactions_with_limit() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/account/a1/transactions?limit=5")
            .with_body(
                r#"{"transactions":[{"id":"t1","amount":-42.00,
                    "counterpartyName":"AWS","status":"posted"}]}"#,
            )
            .create_async()
            .await;

        let client = BankClient::new(server.url(), "tok-1");
        let txns = client.transactions("a1", 5).await.unwrap();
        assert_eq!(txns.len(), 1);
        assert_eq!(txns[0].counterparty_name.as_deref(), Some("AWS"));
        assert!(txns[0].posted_at.is_none());
    }

    #[tokio::test]
    async fn upstream_error_carries_status() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/accounts")
            .with_status(401)
            .with_body("bad token")
            .create_async()
            .await;

        let client = BankClient::new(server.url(), "tok-bad");
        let err = client.accounts().await.unwrap_err();
        assert!(matches!(err, ConnectError::Api { status: 401, .. }));
    }

    #[tokio::test]
    async fn decode_error_on_unexpected_shape() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/accounts")
            .with_body(r#"{"unexpected":true}"#)
            .create_async()
            .await;

        let client = BankClient::new(server.url(), "tok-1");
        assert!(matches!(
            client.accounts().await.unwrap_err(),
            ConnectError::Decode(_)
        ));
    }
}
