//! Thin reqwest wrapper over the REST API.
//!
//! One method per endpoint. Every non-2xx answer becomes
//! [`ClientError::Status`] carrying the server's message; nothing is retried.

use std::sync::Arc;

use reqwest::{Client, Method, RequestBuilder, Response};
use serde::{Serialize, de::DeserializeOwned};
use serde_json::json;
use tokio::sync::RwLock;

use crate::client::error::{ClientError, Result};
use crate::models::{
    AuthResponse, CategoryPayload, CategoryTotal, Expense, ExpenseCategory, ExpensePayload,
    Income, IncomePayload, PiggyBank, PiggyBankPayload, PiggyTransaction,
    PiggyTransactionPayload, RegisterPayload, User, YearlyComparisonEntry,
};

/// Cloning is cheap and clones share the bearer token, so a login through
/// one handle authenticates every view holding another.
#[derive(Clone, Debug)]
pub struct ApiClient {
    http: Client,
    base_url: String,
    token: Arc<RwLock<Option<String>>>,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(http: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            http,
            base_url,
            token: Arc::new(RwLock::new(None)),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn token(&self) -> Option<String> {
        self.token.read().await.clone()
    }

    pub async fn set_token(&self, token: impl Into<String>) {
        *self.token.write().await = Some(token.into());
    }

    pub async fn clear_token(&self) {
        *self.token.write().await = None;
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn send(&self, builder: RequestBuilder) -> Result<Response> {
        let builder = match self.token().await {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        };

        let response = builder.send().await?;
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            tracing::debug!(status = status.as_u16(), %message, "request rejected");
            return Err(ClientError::Status {
                status: status.as_u16(),
                message,
            });
        }
        Ok(response)
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T> {
        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let response = self.send(self.http.get(self.url(path))).await?;
        Self::decode(response).await
    }

    async fn write<B, T>(&self, method: Method, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let builder = self.http.request(method, self.url(path)).json(body);
        let response = self.send(builder).await?;
        Self::decode(response).await
    }

    async fn delete(&self, path: &str) -> Result<()> {
        self.send(self.http.delete(self.url(path))).await?;
        Ok(())
    }

    // Auth

    pub async fn login(&self, email: &str, password: &str) -> Result<AuthResponse> {
        let body = json!({ "email": email, "password": password });
        self.write(Method::POST, "/auth/login", &body).await
    }

    pub async fn register(&self, payload: &RegisterPayload) -> Result<AuthResponse> {
        self.write(Method::POST, "/auth/register", payload).await
    }

    pub async fn me(&self) -> Result<User> {
        self.get("/auth/me").await
    }

    pub async fn logout(&self) -> Result<()> {
        self.send(self.http.post(self.url("/auth/logout"))).await?;
        Ok(())
    }

    // Incomes

    pub async fn list_incomes(&self) -> Result<Vec<Income>> {
        self.get("/incomes").await
    }

    pub async fn create_income(&self, payload: &IncomePayload) -> Result<Income> {
        self.write(Method::POST, "/incomes", payload).await
    }

    pub async fn update_income(&self, id: i64, payload: &IncomePayload) -> Result<Income> {
        self.write(Method::PUT, &format!("/incomes/{}", id), payload)
            .await
    }

    pub async fn delete_income(&self, id: i64) -> Result<()> {
        self.delete(&format!("/incomes/{}", id)).await
    }

    // Categories

    pub async fn list_categories(&self) -> Result<Vec<ExpenseCategory>> {
        self.get("/categories").await
    }

    pub async fn create_category(&self, payload: &CategoryPayload) -> Result<ExpenseCategory> {
        self.write(Method::POST, "/categories", payload).await
    }

    pub async fn update_category(
        &self,
        id: i64,
        payload: &CategoryPayload,
    ) -> Result<ExpenseCategory> {
        self.write(Method::PUT, &format!("/categories/{}", id), payload)
            .await
    }

    pub async fn delete_category(&self, id: i64) -> Result<()> {
        self.delete(&format!("/categories/{}", id)).await
    }

    // Expenses

    pub async fn list_expenses(&self) -> Result<Vec<Expense>> {
        self.get("/expenses").await
    }

    pub async fn create_expense(&self, payload: &ExpensePayload) -> Result<Expense> {
        self.write(Method::POST, "/expenses", payload).await
    }

    pub async fn update_expense(&self, id: i64, payload: &ExpensePayload) -> Result<Expense> {
        self.write(Method::PUT, &format!("/expenses/{}", id), payload)
            .await
    }

    pub async fn delete_expense(&self, id: i64) -> Result<()> {
        self.delete(&format!("/expenses/{}", id)).await
    }

    // Piggy banks

    pub async fn list_piggy_banks(&self) -> Result<Vec<PiggyBank>> {
        self.get("/piggy-banks").await
    }

    pub async fn create_piggy_bank(&self, payload: &PiggyBankPayload) -> Result<PiggyBank> {
        self.write(Method::POST, "/piggy-banks", payload).await
    }

    pub async fn update_piggy_bank(
        &self,
        id: i64,
        payload: &PiggyBankPayload,
    ) -> Result<PiggyBank> {
        self.write(Method::PUT, &format!("/piggy-banks/{}", id), payload)
            .await
    }

    pub async fn delete_piggy_bank(&self, id: i64) -> Result<()> {
        self.delete(&format!("/piggy-banks/{}", id)).await
    }

    pub async fn list_transactions(&self, piggy_bank_id: i64) -> Result<Vec<PiggyTransaction>> {
        self.get(&format!("/piggy-banks/{}/transactions", piggy_bank_id))
            .await
    }

    pub async fn create_transaction(
        &self,
        payload: &PiggyTransactionPayload,
    ) -> Result<PiggyTransaction> {
        self.write(Method::POST, "/piggy-banks/transactions", payload)
            .await
    }

    // Reports

    pub async fn yearly_comparison(&self, year: i32) -> Result<Vec<YearlyComparisonEntry>> {
        let builder = self
            .http
            .get(self.url("/reports/yearly-comparison"))
            .query(&[("year", year)]);
        let response = self.send(builder).await?;
        Self::decode(response).await
    }

    pub async fn expenses_by_category(
        &self,
        start_date: &str,
        end_date: &str,
    ) -> Result<Vec<CategoryTotal>> {
        let builder = self
            .http
            .get(self.url("/reports/expenses-by-category"))
            .query(&[("startDate", start_date), ("endDate", end_date)]);
        let response = self.send(builder).await?;
        Self::decode(response).await
    }
}
