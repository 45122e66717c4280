//! Bearer token acquisition.

use crate::config::{normalize_base_url, Credentials};
use crate::error::IdeaCenterError;

pub const AUTH_ROUTE: &str = "/api/User/Authentication";

/// Log in with `credentials` and return the `accessToken` from the response.
///
/// Uses a throwaway, unauthenticated HTTP client. Any status other than
/// `200 OK`, or a missing or blank token, yields
/// [`IdeaCenterError::Authentication`] carrying the raw response body.
pub async fn obtain_token(
    base_url: &str,
    credentials: &Credentials,
) -> Result<String, IdeaCenterError> {
    let url = format!("{}{}", normalize_base_url(base_url)?, AUTH_ROUTE);
    tracing::debug!(%url, email = credentials.email(), "requesting access token");

    let response = reqwest::Client::new()
        .post(&url)
        .json(&serde_json::json!({
            "email": credentials.email(),
            "password": credentials.password(),
        }))
        .send()
        .await?;

    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    if status != reqwest::StatusCode::OK {
        tracing::warn!(%status, "authentication rejected");
        return Err(IdeaCenterError::Authentication(body));
    }

    extract_token(&body).ok_or(IdeaCenterError::Authentication(body))
}

fn extract_token(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    value
        .get("accessToken")
        .and_then(|v| v.as_str())
        .filter(|t| !t.trim().is_empty())
        .map(|t| t.to_string())
}
