//! End-to-end tests for the gateway
//!
//! Backends register through the Consul HTTP protocol against a mock agent;
//! the gateway resolves through the same agent.

use pretty_assertions::assert_eq;
use quest_catalog::seed_quests;
use quest_client::testing::closed_endpoint;
use quest_core::{
    Quest, QuestReview, ServiceInstance, CATALOG_SERVICE, QUESTS_PATH, QUESTS_REVIEWS_PATH,
    REVIEWS_PATH, REVIEW_SERVICE,
};
use quest_discovery::{ConsulRegistry, RegistryClient};
use quest_review::seed_reviews;
use quest_tests::{get_json, start_gateway, Agent, Backend};
use serde_json::json;
use std::sync::Arc;

async fn catalog(agent: &Agent) -> Backend {
    Backend::start(agent, CATALOG_SERVICE, "quest-catalog-1", QUESTS_PATH, seed_quests()).await
}

async fn reviews(agent: &Agent) -> Backend {
    Backend::start(agent, REVIEW_SERVICE, "quest-review-1", REVIEWS_PATH, seed_reviews()).await
}

#[tokio::test]
async fn test_quests_with_reviews() {
    let agent = Agent::start().await;
    let _catalog = catalog(&agent).await;
    let _reviews = reviews(&agent).await;
    let gateway = start_gateway(agent.client(), 5).await.unwrap();

    let (status, body) = get_json(&gateway, QUESTS_REVIEWS_PATH).await;

    assert_eq!(status, 200);
    assert_eq!(
        body,
        json!([
            {
                "id": 1,
                "title": "Haunted Mansion",
                "description": "Find the hidden treasure",
                "reviews": [
                    {"questId": 1, "comment": "Amazing adventure!", "rating": 5},
                    {"questId": 1, "comment": "Too scary", "rating": 3}
                ]
            },
            {
                "id": 2,
                "title": "Pirate Treasure Hunt",
                "description": "Escape the haunted house",
                "reviews": [
                    {"questId": 2, "comment": "Great puzzles", "rating": 4}
                ]
            }
        ])
    );
}

#[tokio::test]
async fn test_catalog_not_registered() {
    let agent = Agent::start().await;
    let _reviews = reviews(&agent).await;
    let gateway = start_gateway(agent.client(), 5).await.unwrap();

    let (status, body) = get_json(&gateway, QUESTS_REVIEWS_PATH).await;

    assert_eq!(status, 503);
    assert!(body.is_object(), "expected a single error, got {}", body);
    assert_eq!(body["error"], "service_not_found");
}

#[tokio::test]
async fn test_reviews_unreachable() {
    let agent = Agent::start().await;
    let _catalog = catalog(&agent).await;

    // Registered but nothing listening
    let dead = closed_endpoint().unwrap();
    agent
        .store
        .register(&ServiceInstance::new(
            REVIEW_SERVICE,
            "quest-review-dead",
            dead.host,
            dead.port,
        ))
        .await
        .unwrap();
    let gateway = start_gateway(agent.client(), 5).await.unwrap();

    let (status, body) = get_json(&gateway, QUESTS_REVIEWS_PATH).await;

    assert_eq!(status, 502);
    assert_eq!(body["error"], "service_unreachable");
    assert!(body.get("reviews").is_none());
}

#[tokio::test]
async fn test_orphan_reviews_are_omitted() {
    let agent = Agent::start().await;
    let _catalog = catalog(&agent).await;
    let mut records = seed_reviews();
    records.push(QuestReview::new(42, "Which quest was this?", 2));
    let _reviews =
        Backend::start(&agent, REVIEW_SERVICE, "quest-review-1", REVIEWS_PATH, records).await;
    let gateway = start_gateway(agent.client(), 5).await.unwrap();

    let (status, body) = get_json(&gateway, QUESTS_REVIEWS_PATH).await;

    assert_eq!(status, 200);
    let quests = body.as_array().unwrap();
    assert_eq!(quests.len(), 2);
    let total: usize = quests
        .iter()
        .map(|q| q["reviews"].as_array().unwrap().len())
        .sum();
    assert_eq!(total, 3);
    assert!(!body.to_string().contains("Which quest was this?"));
}

#[tokio::test]
async fn test_quest_without_reviews() {
    let agent = Agent::start().await;
    let mut quests = seed_quests();
    quests.push(Quest::new(3, "Lost Temple", "Decode the glyphs"));
    let _catalog =
        Backend::start(&agent, CATALOG_SERVICE, "quest-catalog-1", QUESTS_PATH, quests).await;
    let _reviews = reviews(&agent).await;
    let gateway = start_gateway(agent.client(), 5).await.unwrap();

    let (_, body) = get_json(&gateway, QUESTS_REVIEWS_PATH).await;

    assert_eq!(body[2]["id"], 3);
    assert_eq!(body[2]["reviews"], json!([]));
}

#[tokio::test]
async fn test_agent_error_surfaces_as_registry_rejected() {
    let agent = Agent::start().await;
    let _catalog = catalog(&agent).await;
    let _reviews = reviews(&agent).await;
    let gateway = start_gateway(agent.client(), 5).await.unwrap();

    agent.store.set_available(false);
    let (status, body) = get_json(&gateway, QUESTS_REVIEWS_PATH).await;

    assert_eq!(status, 502);
    assert_eq!(body["error"], "registry_rejected");
}

#[tokio::test]
async fn test_agent_down_is_registry_unavailable() {
    let dead = closed_endpoint().unwrap();
    let registry: Arc<dyn RegistryClient> =
        Arc::new(ConsulRegistry::new(&dead.base_url()).unwrap());
    let gateway = start_gateway(registry, 5).await.unwrap();

    let (status, body) = get_json(&gateway, QUESTS_REVIEWS_PATH).await;

    assert_eq!(status, 503);
    assert_eq!(body["error"], "registry_unavailable");
}
