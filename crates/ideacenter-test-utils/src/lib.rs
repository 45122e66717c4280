//! Shared test utilities for the Idea Center suite.
//!
//! [`FakeIdeaCenter`] is an in-process stand-in for the real service built on
//! wiremock: it keeps ideas in memory and answers the authentication and Idea
//! routes with the same statuses and messages the live deployment uses.

use ideacenter_sdk::auth::AUTH_ROUTE;
use ideacenter_sdk::client::{ALL_ROUTE, CREATE_ROUTE, DELETE_ROUTE, EDIT_ROUTE, IDEA_ID_PARAM};
use ideacenter_sdk::config::{EMAIL_VAR, PASSWORD_VAR};
use ideacenter_sdk::suite::{CREATED_MESSAGE, DELETED_MESSAGE, EDITED_MESSAGE, NO_SUCH_IDEA_MESSAGE};
use serde_json::{json, Value};
use std::sync::{Arc, LazyLock, Mutex};
use wiremock::matchers::{body_json, header, method, path, path_regex};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

pub const TEST_EMAIL: &str = "qa-tester@example.com";
pub const TEST_PASSWORD: &str = "qa-tester-password";
pub const TEST_TOKEN: &str = "fake-jwt-access-token";

static TRACING: LazyLock<()> = LazyLock::new(|| {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("ideacenter_sdk=debug"));
    if std::env::var("TEST_LOG").is_ok() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stdout)
            .try_init();
    } else {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init();
    }
});

/// Install the test subscriber once per test binary. Set `TEST_LOG` to see
/// output without `--nocapture`.
pub fn init_tracing() {
    LazyLock::force(&TRACING);
}

/// Returns `Some(reason)` when live credentials are absent, for use with
/// `test_with::runtime_ignore_if`.
pub fn no_online_credentials() -> Option<String> {
    for var in [EMAIL_VAR, PASSWORD_VAR] {
        match std::env::var(var) {
            Ok(v) if !v.trim().is_empty() => {}
            _ => return Some(format!("{} not set", var)),
        }
    }
    None
}

type Store = Arc<Mutex<Vec<Value>>>;

/// In-memory Idea Center served by a wiremock [`MockServer`].
pub struct FakeIdeaCenter {
    server: MockServer,
    ideas: Store,
}

impl FakeIdeaCenter {
    /// Start a fake service accepting [`TEST_EMAIL`]/[`TEST_PASSWORD`] and
    /// issuing [`TEST_TOKEN`].
    pub async fn start() -> Self {
        let server = MockServer::start().await;
        let ideas: Store = Arc::new(Mutex::new(Vec::new()));
        let bearer = format!("Bearer {}", TEST_TOKEN);

        Mock::given(method("POST"))
            .and(path(AUTH_ROUTE))
            .and(body_json(json!({"email": TEST_EMAIL, "password": TEST_PASSWORD})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "email": TEST_EMAIL,
                "accessToken": TEST_TOKEN,
            })))
            .with_priority(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path(AUTH_ROUTE))
            .respond_with(
                ResponseTemplate::new(400)
                    .set_body_json(json!({"msg": "Invalid email or password!"})),
            )
            .with_priority(2)
            .mount(&server)
            .await;

        let store = ideas.clone();
        Mock::given(method("POST"))
            .and(path(CREATE_ROUTE))
            .and(header("Authorization", bearer.as_str()))
            .respond_with(move |req: &Request| create(&store, req))
            .mount(&server)
            .await;

        let store = ideas.clone();
        Mock::given(method("GET"))
            .and(path(ALL_ROUTE))
            .and(header("Authorization", bearer.as_str()))
            .respond_with(move |_: &Request| {
                let ideas = store.lock().unwrap();
                ResponseTemplate::new(200).set_body_json(Value::Array(ideas.clone()))
            })
            .mount(&server)
            .await;

        let store = ideas.clone();
        Mock::given(method("PUT"))
            .and(path(EDIT_ROUTE))
            .and(header("Authorization", bearer.as_str()))
            .respond_with(move |req: &Request| edit(&store, req))
            .mount(&server)
            .await;

        let store = ideas.clone();
        Mock::given(method("DELETE"))
            .and(path(DELETE_ROUTE))
            .and(header("Authorization", bearer.as_str()))
            .respond_with(move |req: &Request| delete(&store, req))
            .mount(&server)
            .await;

        // Any other verb on the delete route.
        Mock::given(path(DELETE_ROUTE))
            .respond_with(ResponseTemplate::new(405))
            .with_priority(6)
            .mount(&server)
            .await;

        Mock::given(path_regex("^/api/Idea/"))
            .respond_with(ResponseTemplate::new(401))
            .with_priority(10)
            .mount(&server)
            .await;

        Self { server, ideas }
    }

    pub fn uri(&self) -> String {
        self.server.uri()
    }

    pub fn server(&self) -> &MockServer {
        &self.server
    }

    /// Snapshot of the stored ideas, oldest first.
    pub fn ideas(&self) -> Vec<Value> {
        self.ideas.lock().unwrap().clone()
    }

    /// Insert an idea directly and return its id.
    pub fn seed(&self, title: &str, description: &str) -> String {
        let id = uuid::Uuid::new_v4().to_string();
        self.ideas.lock().unwrap().push(json!({
            "id": id,
            "title": title,
            "description": description,
            "url": "",
        }));
        id
    }

    /// Number of requests the server saw on `route` with `verb`.
    pub async fn request_count(&self, verb: &str, route: &str) -> usize {
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .iter()
            .filter(|r| r.method.as_str() == verb && r.url.path() == route)
            .count()
    }
}

fn idea_id(req: &Request) -> Option<String> {
    req.url
        .query_pairs()
        .find(|(k, _)| k == IDEA_ID_PARAM)
        .map(|(_, v)| v.into_owned())
}

fn non_blank(body: &Value, field: &str) -> bool {
    body.get(field)
        .and_then(Value::as_str)
        .is_some_and(|s| !s.trim().is_empty())
}

fn validation_errors(body: &Value) -> Option<Value> {
    let mut errors = serde_json::Map::new();
    if !non_blank(body, "title") {
        errors.insert("Title".into(), json!(["The Title field is required."]));
    }
    if !non_blank(body, "description") {
        errors.insert(
            "Description".into(),
            json!(["The Description field is required."]),
        );
    }
    if errors.is_empty() {
        None
    } else {
        Some(json!({
            "title": "One or more validation errors occurred.",
            "status": 400,
            "errors": errors,
        }))
    }
}

fn no_such_idea() -> ResponseTemplate {
    ResponseTemplate::new(400).set_body_json(json!(NO_SUCH_IDEA_MESSAGE))
}

fn create(store: &Store, req: &Request) -> ResponseTemplate {
    let body: Value = serde_json::from_slice(&req.body).unwrap_or(Value::Null);
    if let Some(errors) = validation_errors(&body) {
        return ResponseTemplate::new(400).set_body_json(errors);
    }
    let idea = json!({
        "id": uuid::Uuid::new_v4().to_string(),
        "title": body["title"],
        "description": body["description"],
        "url": body.get("url").cloned().unwrap_or(json!("")),
    });
    store.lock().unwrap().push(idea.clone());
    ResponseTemplate::new(200).set_body_json(json!({
        "msg": CREATED_MESSAGE,
        "idea": idea,
    }))
}

fn edit(store: &Store, req: &Request) -> ResponseTemplate {
    let Some(id) = idea_id(req) else {
        return no_such_idea();
    };
    let body: Value = serde_json::from_slice(&req.body).unwrap_or(Value::Null);
    let mut ideas = store.lock().unwrap();
    let Some(idea) = ideas.iter_mut().find(|i| i["id"] == id.as_str()) else {
        return no_such_idea();
    };
    if let Some(errors) = validation_errors(&body) {
        return ResponseTemplate::new(400).set_body_json(errors);
    }
    idea["title"] = body["title"].clone();
    idea["description"] = body["description"].clone();
    if let Some(url) = body.get("url") {
        idea["url"] = url.clone();
    }
    ResponseTemplate::new(200).set_body_json(json!({
        "msg": EDITED_MESSAGE,
        "idea": idea.clone(),
    }))
}

fn delete(store: &Store, req: &Request) -> ResponseTemplate {
    let Some(id) = idea_id(req) else {
        return no_such_idea();
    };
    let mut ideas = store.lock().unwrap();
    let before = ideas.len();
    ideas.retain(|i| i["id"] != id.as_str());
    if ideas.len() == before {
        return no_such_idea();
    }
    ResponseTemplate::new(200).set_body_json(json!(DELETED_MESSAGE))
}
