use super::*;
use ideacenter_sdk::auth::obtain_token;
use ideacenter_sdk::{IdeaCenterError, Scenario};

#[tokio::test]
async fn token_is_fetched_once_and_reused_across_scenarios() {
    let (fake, mut ctx) = setup().await;
    ctx.run(Scenario::CreateWithRequiredFields).await.unwrap();
    ctx.run(Scenario::GetAllIdeas).await.unwrap();
    ctx.run(Scenario::EditLastCreatedIdea).await.unwrap();

    // Each scenario went out with its own client, all carrying the one token.
    let authorized = fake
        .server()
        .received_requests()
        .await
        .unwrap()
        .iter()
        .filter(|r| r.url.path().starts_with("/api/Idea/"))
        .filter(|r| {
            r.headers
                .get("authorization")
                .and_then(|v| v.to_str().ok())
                == Some(format!("Bearer {}", TEST_TOKEN).as_str())
        })
        .count();
    assert_eq!(authorized, 3);
    assert_eq!(
        fake.request_count("POST", "/api/User/Authentication").await,
        1
    );
}

#[tokio::test]
async fn obtain_token_returns_fake_token() {
    let fake = FakeIdeaCenter::start().await;
    let token = obtain_token(&fake.uri(), &Credentials::new(TEST_EMAIL, TEST_PASSWORD))
        .await
        .unwrap();
    assert_eq!(token, TEST_TOKEN);
}

#[tokio::test]
async fn wrong_password_aborts_bootstrap_with_body() {
    let fake = FakeIdeaCenter::start().await;
    let config = Config::new(&fake.uri(), Credentials::new(TEST_EMAIL, "wrong")).unwrap();
    match SuiteContext::bootstrap(config).await {
        Err(err @ IdeaCenterError::Authentication(_)) => {
            assert!(err.is_fatal());
            assert!(err.to_string().contains("Invalid email or password!"));
        }
        other => panic!("Expected Authentication, got {:?}", other),
    }
}

#[test]
fn missing_credentials_fail_before_any_request() {
    let err = Config::from_lookup(|_| None).unwrap_err();
    assert!(matches!(err, IdeaCenterError::Configuration(_)));
}

#[tokio::test]
async fn stale_token_is_rejected_by_service() {
    let fake = FakeIdeaCenter::start().await;
    let ctx = SuiteContext::with_token(config_for(&fake), "stale-token");
    let reply = ctx.client().unwrap().all_ideas().await.unwrap();
    assert_eq!(reply.status.as_u16(), 401);
}
