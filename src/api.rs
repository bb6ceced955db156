//! Typed calls against the finance backend.
//!
//! The client is stateless apart from the base URL. Callers pass the bearer
//! token to every authenticated call.

use gloo_net::http::{Request, RequestBuilder, Response};
use serde::de::{DeserializeOwned, IgnoredAny};
use serde::{Deserialize, Serialize};

use crate::config::CONFIG;
use crate::error::{AppError, NETWORK_FAILURE};
use crate::models::{
    AuthResponse, Category, DashboardStats, Goal, GoalAmountUpdate, GoalPayload, LoginRequest,
    RegisterRequest, TipRequest, TipResponse, Transaction, TransactionPayload, UserProfile,
};

/// The calls the session store needs from the backend.
#[allow(async_fn_in_trait)]
pub trait AuthApi {
    async fn login(&self, request: &LoginRequest) -> Result<AuthResponse, AppError>;
    async fn register(&self, request: &RegisterRequest) -> Result<AuthResponse, AppError>;
    async fn me(&self, token: &str) -> Result<UserProfile, AppError>;
}

#[derive(Clone, Debug, PartialEq)]
pub struct ApiClient {
    base_url: String,
}

impl Default for ApiClient {
    fn default() -> Self {
        Self::new(CONFIG.backend_url.clone())
    }
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api{}", self.base_url, path)
    }

    // ---- dashboard ----

    pub async fn dashboard_stats(&self, token: &str) -> Result<DashboardStats, AppError> {
        let request = authorized(Request::get(&self.url("/dashboard/stats")), token).build()?;
        send(request).await
    }

    // ---- transactions ----

    pub async fn list_transactions(&self, token: &str) -> Result<Vec<Transaction>, AppError> {
        let request = authorized(Request::get(&self.url("/transactions")), token).build()?;
        send(request).await
    }

    pub async fn create_transaction(
        &self,
        token: &str,
        payload: &TransactionPayload,
    ) -> Result<Transaction, AppError> {
        let request =
            authorized(Request::post(&self.url("/transactions")), token).json(payload)?;
        send(request).await
    }

    pub async fn update_transaction(
        &self,
        token: &str,
        id: &str,
        payload: &TransactionPayload,
    ) -> Result<Transaction, AppError> {
        let url = self.url(&format!("/transactions/{id}"));
        let request = authorized(Request::put(&url), token).json(payload)?;
        send(request).await
    }

    pub async fn delete_transaction(&self, token: &str, id: &str) -> Result<(), AppError> {
        let url = self.url(&format!("/transactions/{id}"));
        let request = authorized(Request::delete(&url), token).build()?;
        send::<IgnoredAny>(request).await.map(|_| ())
    }

    pub async fn list_categories(&self, token: &str) -> Result<Vec<Category>, AppError> {
        let request = authorized(Request::get(&self.url("/categories")), token).build()?;
        send(request).await
    }

    // ---- goals ----

    pub async fn list_goals(&self, token: &str) -> Result<Vec<Goal>, AppError> {
        let request = authorized(Request::get(&self.url("/goals")), token).build()?;
        send(request).await
    }

    pub async fn create_goal(&self, token: &str, payload: &GoalPayload) -> Result<Goal, AppError> {
        let request = authorized(Request::post(&self.url("/goals")), token).json(payload)?;
        send(request).await
    }

    pub async fn update_goal(
        &self,
        token: &str,
        id: &str,
        payload: &GoalPayload,
    ) -> Result<Goal, AppError> {
        self.put_goal(token, id, payload).await
    }

    pub async fn set_goal_amount(
        &self,
        token: &str,
        id: &str,
        update: &GoalAmountUpdate,
    ) -> Result<Goal, AppError> {
        self.put_goal(token, id, update).await
    }

    async fn put_goal<B: Serialize>(&self, token: &str, id: &str, body: &B) -> Result<Goal, AppError> {
        let url = self.url(&format!("/goals/{id}"));
        let request = authorized(Request::put(&url), token).json(body)?;
        send(request).await
    }

    pub async fn delete_goal(&self, token: &str, id: &str) -> Result<(), AppError> {
        let url = self.url(&format!("/goals/{id}"));
        let request = authorized(Request::delete(&url), token).build()?;
        send::<IgnoredAny>(request).await.map(|_| ())
    }

    // ---- ai ----

    pub async fn ai_tip(&self, token: &str, request: &TipRequest) -> Result<TipResponse, AppError> {
        let request = authorized(Request::post(&self.url("/ai/tips")), token).json(request)?;
        send(request).await
    }
}

impl AuthApi for ApiClient {
    async fn login(&self, request: &LoginRequest) -> Result<AuthResponse, AppError> {
        let request = Request::post(&self.url("/auth/login")).json(request)?;
        send(request).await
    }

    async fn register(&self, request: &RegisterRequest) -> Result<AuthResponse, AppError> {
        let request = Request::post(&self.url("/auth/register")).json(request)?;
        send(request).await
    }

    async fn me(&self, token: &str) -> Result<UserProfile, AppError> {
        let request = authorized(Request::get(&self.url("/auth/me")), token).build()?;
        send(request).await
    }
}

fn authorized(builder: RequestBuilder, token: &str) -> RequestBuilder {
    builder.header("Authorization", &bearer(token))
}

fn bearer(token: &str) -> String {
    format!("Bearer {token}")
}

async fn send<T: DeserializeOwned>(request: Request) -> Result<T, AppError> {
    let response = request.send().await?;
    if !response.ok() {
        return Err(rejection(response).await);
    }

    response.json::<T>().await.map_err(|error| {
        log::error!("could not decode response body: {error}");
        AppError::Network(NETWORK_FAILURE.to_string())
    })
}

async fn rejection(response: Response) -> AppError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    log::warn!("{} answered {status}", response.url());
    error_from_status(status, &body)
}

#[derive(Deserialize)]
struct ErrorBody {
    detail: Detail,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Detail {
    Message(String),
    Items(Vec<DetailItem>),
}

#[derive(Deserialize)]
struct DetailItem {
    msg: String,
}

/// Pulls the human readable message out of a FastAPI style error body.
fn detail_message(body: &str) -> Option<String> {
    let body: ErrorBody = serde_json::from_str(body).ok()?;
    let message = match body.detail {
        Detail::Message(message) => message,
        Detail::Items(items) => items
            .into_iter()
            .map(|item| item.msg)
            .collect::<Vec<_>>()
            .join("; "),
    };

    Some(message).filter(|message| !message.trim().is_empty())
}

/// Maps a non-2xx status and its body onto the error taxonomy.
fn error_from_status(status: u16, body: &str) -> AppError {
    let detail = detail_message(body);
    match status {
        401 | 403 => AppError::Auth(
            detail.unwrap_or_else(|| "Session expired, please log in again".to_string()),
        ),
        400 | 422 => {
            AppError::Validation(detail.unwrap_or_else(|| "The request was rejected".to_string()))
        }
        _ => AppError::Network(detail.unwrap_or_else(|| NETWORK_FAILURE.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::{bearer, detail_message, error_from_status, ApiClient};
    use crate::error::{AppError, NETWORK_FAILURE};

    #[test]
    fn builds_urls_under_api_prefix() {
        let client = ApiClient::new("http://localhost:8000");

        assert_eq!(
            client.url("/transactions/abc"),
            "http://localhost:8000/api/transactions/abc"
        );
    }

    #[test]
    fn authorization_header_carries_the_bearer_token() {
        assert_eq!(bearer("token-1"), "Bearer token-1");
    }

    #[test]
    fn unauthorized_is_an_auth_error_with_backend_message() {
        let error = error_from_status(401, r#"{"detail": "Invalid credentials"}"#);

        assert_eq!(error, AppError::Auth("Invalid credentials".into()));
    }

    #[test]
    fn unauthorized_without_body_still_is_auth() {
        assert!(error_from_status(401, "").is_auth());
    }

    #[test]
    fn bad_request_is_validation() {
        let error = error_from_status(400, r#"{"detail": "Email already registered"}"#);

        assert_eq!(error, AppError::Validation("Email already registered".into()));
    }

    #[test]
    fn server_error_without_detail_uses_generic_message() {
        let error = error_from_status(502, "<html>Bad gateway</html>");

        assert_eq!(error, AppError::Network(NETWORK_FAILURE.into()));
    }

    #[test]
    fn flattens_list_style_detail() {
        let body = r#"{"detail": [
            {"loc": ["body", "email"], "msg": "value is not a valid email address", "type": "value_error"},
            {"loc": ["body", "password"], "msg": "field required", "type": "missing"}
        ]}"#;

        assert_eq!(
            detail_message(body).as_deref(),
            Some("value is not a valid email address; field required")
        );
    }

    #[test]
    fn blank_detail_is_ignored() {
        assert_eq!(detail_message(r#"{"detail": "  "}"#), None);
    }
}
