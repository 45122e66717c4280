use super::*;
use ideacenter_sdk::{IdeaCenterError, Scenario};
use wiremock::matchers::{method, path};
use wiremock::{Mock, ResponseTemplate};

#[tokio::test]
async fn full_run_against_fake_service_passes() {
    let (fake, mut ctx) = setup().await;
    let report = ctx.run_all().await;

    assert!(report.all_passed(), "{}", report);
    assert_eq!(report.outcomes.len(), 8);
    let order: Vec<u8> = report.outcomes.iter().map(|o| o.scenario.order()).collect();
    assert_eq!(order, vec![1, 2, 3, 4, 5, 6, 7, 8]);

    // Created, edited, then deleted: nothing left behind.
    assert!(fake.ideas().is_empty());
    assert!(report.to_string().ends_with("8 passed; 0 failed"));
}

#[tokio::test]
async fn literal_end_to_end_flow() {
    let (fake, mut ctx) = setup().await;

    ctx.run(Scenario::CreateWithRequiredFields).await.unwrap();
    ctx.run(Scenario::GetAllIdeas).await.unwrap();
    let id = ctx.last_idea_id().unwrap().to_string();

    ctx.run(Scenario::EditLastCreatedIdea).await.unwrap();
    let stored = fake.ideas();
    assert_eq!(stored[0]["id"], id.as_str());
    assert_eq!(stored[0]["title"], "Updated Test Idea");
    assert_eq!(stored[0]["description"], "This is an updated test idea");

    ctx.run(Scenario::DeleteLastCreatedIdea).await.unwrap();
    assert!(fake.ideas().is_empty());
}

#[tokio::test]
async fn failing_create_does_not_abort_remaining_scenarios() {
    let (fake, mut ctx) = setup().await;
    Mock::given(method("POST"))
        .and(path("/api/Idea/Create"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .with_priority(1)
        .mount(fake.server())
        .await;

    let report = ctx.run_all().await;

    assert_eq!(report.outcomes.len(), Scenario::ALL.len());
    let failed = |s: Scenario| !report.outcome(s).unwrap().passed();
    assert!(failed(Scenario::CreateWithRequiredFields));
    // Nothing was created, so the stateful scenarios lose their state...
    assert!(failed(Scenario::GetAllIdeas));
    assert!(matches!(
        report.outcome(Scenario::EditLastCreatedIdea).unwrap().result,
        Err(IdeaCenterError::Precondition(_))
    ));
    assert!(failed(Scenario::DeleteLastCreatedIdea));
    assert!(failed(Scenario::RepeatDeleteOfDeletedIdea));
    // ...while the independent ones still run and pass.
    assert!(report.outcome(Scenario::EditNonExistingIdea).unwrap().passed());
    assert!(report.outcome(Scenario::DeleteWithWrongVerb).unwrap().passed());

    assert_eq!(
        fake.request_count("POST", "/api/User/Authentication").await,
        1
    );
    assert_eq!(fake.request_count("PUT", "/api/Idea/Edit").await, 1);
    assert_eq!(fake.request_count("PUT", "/api/Idea/Delete").await, 1);
}

#[tokio::test]
async fn emptied_service_fails_list_and_edit_preconditions() {
    let (fake, mut ctx) = setup().await;
    // A foreign client deletes everything right after creation, so the list
    // scenario sees nothing and both stateful scenarios lose their precondition.
    let client = ctx.client().unwrap();
    ideacenter_sdk::suite::create_with_required_fields(&client)
        .await
        .unwrap();
    let id = fake.ideas()[0]["id"].as_str().unwrap().to_string();
    client.delete_idea(&id).await.unwrap();

    let err = ctx.run(Scenario::GetAllIdeas).await.unwrap_err();
    assert!(matches!(err, IdeaCenterError::Assertion(_)));
    let err = ctx.run(Scenario::EditLastCreatedIdea).await.unwrap_err();
    assert!(matches!(err, IdeaCenterError::Precondition(_)));
}
