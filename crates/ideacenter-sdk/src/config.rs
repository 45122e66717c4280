//! Run configuration: service location and test account credentials.
//!
//! Credentials are resolved once, up front, and passed explicitly into the
//! token provider. A missing variable is a [`IdeaCenterError::Configuration`],
//! never an authentication failure.

use crate::error::IdeaCenterError;
use std::fmt;

/// Default Idea Center deployment. Routes are appended as `/api/...`.
pub const DEFAULT_BASE_URL: &str =
    "http://softuni-qa-loadbalancer-2137572849.eu-north-1.elb.amazonaws.com:84";

pub const EMAIL_VAR: &str = "IDEA_CENTER_EMAIL";
pub const PASSWORD_VAR: &str = "IDEA_CENTER_PASS";
pub const BASE_URL_VAR: &str = "IDEA_CENTER_BASE_URL";

/// Test account credentials.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    email: String,
    password: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }

    /// Read `IDEA_CENTER_EMAIL` and `IDEA_CENTER_PASS` from the process environment.
    pub fn from_env() -> Result<Self, IdeaCenterError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Resolve credentials through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, IdeaCenterError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let email = required(&lookup, EMAIL_VAR)?;
        let password = required(&lookup, PASSWORD_VAR)?;
        Ok(Self { email, password })
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn password(&self) -> &str {
        &self.password
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

fn required<F>(lookup: &F, name: &str) -> Result<String, IdeaCenterError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(name) {
        Some(value) if !value.trim().is_empty() => Ok(value),
        Some(_) => Err(IdeaCenterError::Configuration(format!(
            "{} environment variable is empty",
            name
        ))),
        None => Err(IdeaCenterError::Configuration(format!(
            "{} environment variable not set",
            name
        ))),
    }
}

/// Everything a suite run needs before the first network call.
#[derive(Debug, Clone)]
pub struct Config {
    base_url: String,
    credentials: Credentials,
}

impl Config {
    /// Build a config, validating that `base_url` is an absolute http(s) URL.
    pub fn new(base_url: &str, credentials: Credentials) -> Result<Self, IdeaCenterError> {
        Ok(Self {
            base_url: normalize_base_url(base_url)?,
            credentials,
        })
    }

    /// Credentials from the environment, base URL from `IDEA_CENTER_BASE_URL`
    /// or [`DEFAULT_BASE_URL`].
    pub fn from_env() -> Result<Self, IdeaCenterError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, IdeaCenterError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let credentials = Credentials::from_lookup(&lookup)?;
        let base_url = lookup(BASE_URL_VAR)
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        Self::new(&base_url, credentials)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }
}

pub(crate) fn normalize_base_url(raw: &str) -> Result<String, IdeaCenterError> {
    let trimmed = raw.trim();
    let parsed = url::Url::parse(trimmed).map_err(|e| {
        IdeaCenterError::Configuration(format!("Invalid base URL '{}': {}", trimmed, e))
    })?;
    if parsed.scheme() != "http" && parsed.scheme() != "https" {
        return Err(IdeaCenterError::Configuration(format!(
            "Base URL must use http or https, got '{}'",
            parsed.scheme()
        )));
    }
    Ok(trimmed.trim_end_matches('/').to_string())
}
