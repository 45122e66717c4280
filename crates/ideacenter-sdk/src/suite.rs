//! The ordered Idea Center scenario suite.
//!
//! Scenarios share one piece of state, the identifier of the most recently
//! listed idea, which lives in a [`SuiteContext`] threaded through every
//! scenario. The token is obtained once in [`SuiteContext::bootstrap`]; each
//! scenario gets a freshly built [`Client`] that is dropped when it finishes.
//!
//! ```no_run
//! # async fn example() -> Result<(), ideacenter_sdk::IdeaCenterError> {
//! use ideacenter_sdk::{Config, SuiteContext};
//!
//! let mut ctx = SuiteContext::bootstrap(Config::from_env()?).await?;
//! let report = ctx.run_all().await;
//! println!("{}", report);
//! assert!(report.all_passed());
//! # Ok(())
//! # }
//! ```

use crate::auth;
use crate::client::{ApiReply, Client, DELETE_ROUTE, IDEA_ID_PARAM};
use crate::config::Config;
use crate::error::IdeaCenterError;
use crate::types::{ApiResponse, IdeaRequest};
use reqwest::{Method, StatusCode};
use std::fmt;

pub const CREATED_MESSAGE: &str = "Successfully created!";
pub const EDITED_MESSAGE: &str = "Edited successfully";
pub const DELETED_MESSAGE: &str = "The idea is deleted!";
pub const NO_SUCH_IDEA_MESSAGE: &str = "There is no such idea!";
pub const NON_EXISTING_ID: &str = "non-existing-id";

/// Idea sent by the create scenario.
pub fn test_idea() -> IdeaRequest {
    IdeaRequest::new("Test Idea", "This is a test idea").with_url("")
}

/// Idea sent by both edit scenarios.
pub fn updated_test_idea() -> IdeaRequest {
    IdeaRequest::new("Updated Test Idea", "This is an updated test idea").with_url("")
}

/// One step of the suite. Execution order comes from [`Scenario::order`],
/// not from declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scenario {
    CreateWithRequiredFields,
    GetAllIdeas,
    EditLastCreatedIdea,
    DeleteLastCreatedIdea,
    CreateWithoutRequiredFields,
    EditNonExistingIdea,
    DeleteWithWrongVerb,
    /// Deleting the idea removed by [`Scenario::DeleteLastCreatedIdea`] again
    /// must be rejected.
    RepeatDeleteOfDeletedIdea,
}

impl Scenario {
    pub const ALL: [Scenario; 8] = [
        Scenario::CreateWithRequiredFields,
        Scenario::GetAllIdeas,
        Scenario::EditLastCreatedIdea,
        Scenario::DeleteLastCreatedIdea,
        Scenario::CreateWithoutRequiredFields,
        Scenario::EditNonExistingIdea,
        Scenario::DeleteWithWrongVerb,
        Scenario::RepeatDeleteOfDeletedIdea,
    ];

    pub fn order(self) -> u8 {
        match self {
            Scenario::CreateWithRequiredFields => 1,
            Scenario::GetAllIdeas => 2,
            Scenario::EditLastCreatedIdea => 3,
            Scenario::DeleteLastCreatedIdea => 4,
            Scenario::CreateWithoutRequiredFields => 5,
            Scenario::EditNonExistingIdea => 6,
            Scenario::DeleteWithWrongVerb => 7,
            Scenario::RepeatDeleteOfDeletedIdea => 8,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Scenario::CreateWithRequiredFields => "create_idea_with_required_fields_returns_success",
            Scenario::GetAllIdeas => "get_all_ideas_returns_list",
            Scenario::EditLastCreatedIdea => "edit_last_created_idea_returns_success",
            Scenario::DeleteLastCreatedIdea => "delete_last_created_idea_returns_success",
            Scenario::CreateWithoutRequiredFields => {
                "create_idea_without_required_fields_returns_bad_request"
            }
            Scenario::EditNonExistingIdea => "edit_non_existing_idea_returns_bad_request",
            Scenario::DeleteWithWrongVerb => "delete_with_put_returns_method_not_allowed",
            Scenario::RepeatDeleteOfDeletedIdea => "repeat_delete_of_deleted_idea_is_rejected",
        }
    }

    /// All scenarios sorted by their sequence number.
    pub fn ordered() -> Vec<Scenario> {
        let mut all = Self::ALL.to_vec();
        all.sort_by_key(|s| s.order());
        all
    }
}

impl fmt::Display for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}. {}", self.order(), self.name())
    }
}

/// Result of one scenario in a run.
#[derive(Debug)]
pub struct ScenarioOutcome {
    pub scenario: Scenario,
    pub result: Result<(), IdeaCenterError>,
}

impl ScenarioOutcome {
    pub fn passed(&self) -> bool {
        self.result.is_ok()
    }
}

/// Per-scenario outcomes of [`SuiteContext::run_all`], in execution order.
#[derive(Debug, Default)]
pub struct SuiteReport {
    pub outcomes: Vec<ScenarioOutcome>,
}

impl SuiteReport {
    pub fn all_passed(&self) -> bool {
        self.outcomes.iter().all(ScenarioOutcome::passed)
    }

    pub fn failures(&self) -> Vec<&ScenarioOutcome> {
        self.outcomes.iter().filter(|o| !o.passed()).collect()
    }

    pub fn outcome(&self, scenario: Scenario) -> Option<&ScenarioOutcome> {
        self.outcomes.iter().find(|o| o.scenario == scenario)
    }
}

impl fmt::Display for SuiteReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for outcome in &self.outcomes {
            match &outcome.result {
                Ok(()) => writeln!(f, "ok     {}", outcome.scenario)?,
                Err(e) => writeln!(f, "FAILED {}: {}", outcome.scenario, e)?,
            }
        }
        let failed = self.failures().len();
        write!(
            f,
            "{} passed; {} failed",
            self.outcomes.len() - failed,
            failed
        )
    }
}

/// State carried across scenarios for one run.
pub struct SuiteContext {
    config: Config,
    token: String,
    last_idea_id: Option<String>,
    deleted_idea_id: Option<String>,
}

impl SuiteContext {
    /// Authenticate once. An authentication failure aborts the run, since no
    /// scenario can proceed without a token.
    pub async fn bootstrap(config: Config) -> Result<Self, IdeaCenterError> {
        let token = auth::obtain_token(config.base_url(), config.credentials()).await?;
        tracing::info!(base_url = config.base_url(), "authenticated");
        Ok(Self::with_token(config, token))
    }

    /// Start from an already obtained token.
    pub fn with_token(config: Config, token: impl Into<String>) -> Self {
        Self {
            config,
            token: token.into(),
            last_idea_id: None,
            deleted_idea_id: None,
        }
    }

    /// Build a fresh authenticated client reusing the cached token.
    pub fn client(&self) -> Result<Client, IdeaCenterError> {
        Client::from_token(self.config.base_url(), self.token.as_str())
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn last_idea_id(&self) -> Option<&str> {
        self.last_idea_id.as_deref()
    }

    pub fn deleted_idea_id(&self) -> Option<&str> {
        self.deleted_idea_id.as_deref()
    }

    /// Return the last known idea id, listing ideas first when none is known.
    ///
    /// Fails with [`IdeaCenterError::Precondition`] when the list fetch is
    /// rejected or the list is empty.
    pub async fn ensure_known_id(&mut self, client: &Client) -> Result<String, IdeaCenterError> {
        if let Some(id) = self.last_idea_id.as_deref().filter(|id| !id.trim().is_empty()) {
            return Ok(id.to_string());
        }
        let reply = client.all_ideas().await?;
        if reply.status != StatusCode::OK {
            return Err(IdeaCenterError::Precondition(format!(
                "Listing ideas to recover the last id failed with {}: {}",
                reply.status, reply.body
            )));
        }
        let ideas: Vec<ApiResponse> = reply.json()?;
        if ideas.is_empty() {
            return Err(IdeaCenterError::Precondition(
                "Expected at least one idea to already exist.".to_string(),
            ));
        }
        let id = last_id(&ideas).ok_or_else(|| {
            IdeaCenterError::Precondition("The last listed idea has no id.".to_string())
        })?;
        self.last_idea_id = Some(id.clone());
        Ok(id)
    }

    /// Run a single scenario with its own client.
    pub async fn run(&mut self, scenario: Scenario) -> Result<(), IdeaCenterError> {
        let client = self.client()?;
        match scenario {
            Scenario::CreateWithRequiredFields => create_with_required_fields(&client).await,
            Scenario::GetAllIdeas => {
                self.last_idea_id = get_all_ideas(&client).await?;
                Ok(())
            }
            Scenario::EditLastCreatedIdea => {
                let id = self.ensure_known_id(&client).await?;
                edit_idea(&client, &id).await
            }
            Scenario::DeleteLastCreatedIdea => {
                let id = self.ensure_known_id(&client).await?;
                delete_idea(&client, &id).await?;
                self.deleted_idea_id = Some(id);
                Ok(())
            }
            Scenario::CreateWithoutRequiredFields => create_without_required_fields(&client).await,
            Scenario::EditNonExistingIdea => edit_non_existing_idea(&client).await,
            Scenario::DeleteWithWrongVerb => delete_with_wrong_verb(&client, NON_EXISTING_ID).await,
            Scenario::RepeatDeleteOfDeletedIdea => {
                let id = self.deleted_idea_id.clone().ok_or_else(|| {
                    IdeaCenterError::Precondition(
                        "No idea was deleted earlier in this run.".to_string(),
                    )
                })?;
                repeat_delete(&client, &id).await
            }
        }
    }

    /// Run every scenario in order. A failing scenario is recorded and the run
    /// continues; later scenarios may then fail their own preconditions.
    pub async fn run_all(&mut self) -> SuiteReport {
        let mut report = SuiteReport::default();
        for scenario in Scenario::ordered() {
            let result = self.run(scenario).await;
            match &result {
                Ok(()) => tracing::info!(%scenario, "passed"),
                Err(e) => tracing::warn!(%scenario, error = %e, "failed"),
            }
            report.outcomes.push(ScenarioOutcome { scenario, result });
        }
        report
    }
}

impl fmt::Debug for SuiteContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SuiteContext")
            .field("config", &self.config)
            .field("token", &"<redacted>")
            .field("last_idea_id", &self.last_idea_id)
            .field("deleted_idea_id", &self.deleted_idea_id)
            .finish()
    }
}

fn last_id(ideas: &[ApiResponse]) -> Option<String> {
    ideas
        .last()
        .and_then(|idea| idea.id.clone())
        .filter(|id| !id.trim().is_empty())
}

// ── Scenarios ───────────────────────────────────────────────────────────────

pub async fn create_with_required_fields(client: &Client) -> Result<(), IdeaCenterError> {
    let reply = client.create_idea(&test_idea()).await?;
    expect_status(&reply, StatusCode::OK)?;
    expect_message(&reply, CREATED_MESSAGE)
}

/// Returns the id of the last listed idea, if it has one.
pub async fn get_all_ideas(client: &Client) -> Result<Option<String>, IdeaCenterError> {
    let reply = client.all_ideas().await?;
    expect_status(&reply, StatusCode::OK)?;
    let ideas: Vec<ApiResponse> = reply.json()?;
    if ideas.is_empty() {
        return Err(IdeaCenterError::Assertion(
            "Expected at least one idea to be returned.".to_string(),
        ));
    }
    Ok(last_id(&ideas))
}

pub async fn edit_idea(client: &Client, idea_id: &str) -> Result<(), IdeaCenterError> {
    let reply = client.edit_idea(idea_id, &updated_test_idea()).await?;
    expect_status(&reply, StatusCode::OK)?;
    expect_message(&reply, EDITED_MESSAGE)
}

pub async fn delete_idea(client: &Client, idea_id: &str) -> Result<(), IdeaCenterError> {
    let reply = client.delete_idea(idea_id).await?;
    expect_status(&reply, StatusCode::OK)?;
    expect_body_contains(&reply, DELETED_MESSAGE)
}

pub async fn create_without_required_fields(client: &Client) -> Result<(), IdeaCenterError> {
    let reply = client.create_idea(&IdeaRequest::new("", "")).await?;
    expect_status(&reply, StatusCode::BAD_REQUEST)
}

pub async fn edit_non_existing_idea(client: &Client) -> Result<(), IdeaCenterError> {
    let reply = client
        .edit_idea(NON_EXISTING_ID, &updated_test_idea())
        .await?;
    expect_status(&reply, StatusCode::BAD_REQUEST)?;
    expect_body_contains(&reply, NO_SUCH_IDEA_MESSAGE)
}

/// Issue the delete with `PUT`; the route only accepts `DELETE`.
pub async fn delete_with_wrong_verb(client: &Client, idea_id: &str) -> Result<(), IdeaCenterError> {
    let reply = client
        .send(Method::PUT, DELETE_ROUTE, &[(IDEA_ID_PARAM, idea_id)], None)
        .await?;
    expect_status(&reply, StatusCode::METHOD_NOT_ALLOWED)
}

/// A second delete of the same id must be a client error other than 405.
pub async fn repeat_delete(client: &Client, idea_id: &str) -> Result<(), IdeaCenterError> {
    let reply = client.delete_idea(idea_id).await?;
    if reply.status.is_client_error() && reply.status != StatusCode::METHOD_NOT_ALLOWED {
        return Ok(());
    }
    Err(IdeaCenterError::Assertion(format!(
        "Expected a not-found style rejection for already deleted idea '{}', got {}: {}",
        idea_id, reply.status, reply.body
    )))
}

// ── Assertions ──────────────────────────────────────────────────────────────

pub fn expect_status(reply: &ApiReply, expected: StatusCode) -> Result<(), IdeaCenterError> {
    if reply.status == expected {
        return Ok(());
    }
    Err(IdeaCenterError::Assertion(format!(
        "Expected status {}, got {}: {}",
        expected, reply.status, reply.body
    )))
}

pub fn expect_message(reply: &ApiReply, expected: &str) -> Result<(), IdeaCenterError> {
    let parsed: ApiResponse = reply.json()?;
    match parsed.message.as_deref() {
        Some(msg) if msg == expected => Ok(()),
        other => Err(IdeaCenterError::Assertion(format!(
            "Expected message {:?}, got {:?}",
            expected, other
        ))),
    }
}

pub fn expect_body_contains(reply: &ApiReply, needle: &str) -> Result<(), IdeaCenterError> {
    if reply.body.contains(needle) {
        return Ok(());
    }
    Err(IdeaCenterError::Assertion(format!(
        "Expected body to contain {:?}, got: {}",
        needle, reply.body
    )))
}
