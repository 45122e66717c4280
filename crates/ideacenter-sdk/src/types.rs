//! Wire shapes for the Idea endpoints.

use serde::{Deserialize, Serialize};

/// Body sent to `/api/Idea/Create` and `/api/Idea/Edit`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdeaRequest {
    pub title: String,
    pub description: String,
    /// Omitted from the body when `None`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl IdeaRequest {
    /// Title and description only; no `url` field on the wire.
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            url: None,
        }
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }
}

/// Body returned by the create, list, and edit endpoints.
///
/// The list endpoint returns an array of these; extra fields (title,
/// description, ...) are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiResponse {
    #[serde(rename = "msg", default)]
    pub message: Option<String>,
    #[serde(default)]
    pub id: Option<String>,
}
