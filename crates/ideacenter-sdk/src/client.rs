//! Async Idea Center API client.
//!
//! A [`Client`] is bound to a base URL and a bearer token obtained through
//! [`auth::obtain_token`](crate::auth::obtain_token). Every call returns the
//! raw [`ApiReply`] (status and body text) rather than failing on non-2xx, so
//! negative-path scenarios can assert on rejected requests.

use crate::config::normalize_base_url;
use crate::error::IdeaCenterError;
use crate::types::IdeaRequest;
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use std::fmt;

pub const CREATE_ROUTE: &str = "/api/Idea/Create";
pub const ALL_ROUTE: &str = "/api/Idea/All";
pub const EDIT_ROUTE: &str = "/api/Idea/Edit";
pub const DELETE_ROUTE: &str = "/api/Idea/Delete";

/// Query parameter carrying the idea identifier on edit and delete.
pub const IDEA_ID_PARAM: &str = "ideaId";

/// An HTTP client that sends `Authorization: Bearer <token>` on every request.
#[derive(Clone)]
pub struct Client {
    http: reqwest::Client,
    token: String,
    base_url: String,
}

/// Status and body of a completed request.
#[derive(Debug, Clone)]
pub struct ApiReply {
    pub status: StatusCode,
    pub body: String,
}

impl ApiReply {
    /// Decode the body as JSON.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, IdeaCenterError> {
        serde_json::from_str(&self.body).map_err(|e| {
            IdeaCenterError::InvalidResponse(format!(
                "Failed to deserialize body ({}): {}: {}",
                self.status, e, self.body
            ))
        })
    }
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("base_url", &self.base_url)
            .field("token", &"<redacted>")
            .finish()
    }
}

impl Client {
    /// Create a client bound to `base_url` with an explicit bearer token.
    pub fn from_token(base_url: &str, token: impl Into<String>) -> Result<Self, IdeaCenterError> {
        let token = token.into();
        if token.trim().is_empty() {
            return Err(IdeaCenterError::Configuration(
                "Token cannot be empty".to_string(),
            ));
        }
        Ok(Self {
            http: reqwest::Client::new(),
            token,
            base_url: normalize_base_url(base_url)?,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Send a request to `route` with optional query parameters and JSON body.
    pub async fn send(
        &self,
        method: Method,
        route: &str,
        query: &[(&str, &str)],
        body: Option<&IdeaRequest>,
    ) -> Result<ApiReply, IdeaCenterError> {
        let url = format!("{}{}", self.base_url, route);
        tracing::debug!(%method, %url, ?query, "sending request");

        let mut request = self
            .http
            .request(method.clone(), &url)
            .bearer_auth(&self.token)
            .header(
                "User-Agent",
                format!("ideacenter-sdk/{}", env!("CARGO_PKG_VERSION")),
            );
        if !query.is_empty() {
            request = request.query(query);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;
        tracing::debug!(%method, %url, %status, "received response");
        Ok(ApiReply { status, body })
    }

    /// `POST /api/Idea/Create`.
    pub async fn create_idea(&self, idea: &IdeaRequest) -> Result<ApiReply, IdeaCenterError> {
        self.send(Method::POST, CREATE_ROUTE, &[], Some(idea)).await
    }

    /// `GET /api/Idea/All`.
    pub async fn all_ideas(&self) -> Result<ApiReply, IdeaCenterError> {
        self.send(Method::GET, ALL_ROUTE, &[], None).await
    }

    /// `PUT /api/Idea/Edit?ideaId=<id>`.
    pub async fn edit_idea(
        &self,
        idea_id: &str,
        idea: &IdeaRequest,
    ) -> Result<ApiReply, IdeaCenterError> {
        self.send(Method::PUT, EDIT_ROUTE, &[(IDEA_ID_PARAM, idea_id)], Some(idea))
            .await
    }

    /// `DELETE /api/Idea/Delete?ideaId=<id>`.
    pub async fn delete_idea(&self, idea_id: &str) -> Result<ApiReply, IdeaCenterError> {
        self.send(Method::DELETE, DELETE_ROUTE, &[(IDEA_ID_PARAM, idea_id)], None)
            .await
    }

    /// Allow integration tests (in tests/ directory) to point at a mock server.
    #[doc(hidden)]
    pub fn set_base_url(&mut self, url: String) {
        self.base_url = url.trim_end_matches('/').to_string();
    }
}
