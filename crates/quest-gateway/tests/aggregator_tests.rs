//! Aggregator tests against live in-process backends
//!
//! Backends are plain axum routers on ephemeral ports, registered in a
//! `MemoryRegistry` the way a real backend registers itself in Consul.

use std::sync::Arc;
use std::time::Duration;

use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use pretty_assertions::assert_eq;
use quest_client::testing::{closed_endpoint, TestServer};
use quest_client::ServiceClient;
use quest_core::{ServiceInstance, REVIEW_SERVICE};
use quest_discovery::{MemoryRegistry, RegistryClient, ServiceResolver};
use quest_gateway::{AggregatedQuest, Aggregator, Quest, QuestError, QuestReview, RouteConfig};

// =============================================================================
// Fixtures
// =============================================================================

fn quests() -> Vec<Quest> {
    vec![
        Quest::new(1, "Haunted Mansion", "Find the hidden treasure"),
        Quest::new(2, "Pirate Treasure Hunt", "Escape the haunted house"),
    ]
}

fn reviews() -> Vec<QuestReview> {
    vec![
        QuestReview::new(1, "Amazing adventure!", 5),
        QuestReview::new(1, "Too scary", 3),
        QuestReview::new(2, "Great puzzles", 4),
    ]
}

fn catalog_router(records: Vec<Quest>) -> Router {
    Router::new().route("/quests", get(move || async move { Json(records) }))
}

fn review_router(records: Vec<QuestReview>) -> Router {
    Router::new().route("/reviews", get(move || async move { Json(records) }))
}

async fn register(registry: &MemoryRegistry, name: &str, server: &TestServer) {
    let endpoint = server.endpoint();
    let instance = ServiceInstance::new(name, format!("{}-1", name), endpoint.host, endpoint.port);
    registry.register(&instance).await.unwrap();
}

fn aggregator(registry: Arc<MemoryRegistry>) -> Aggregator {
    let client =
        ServiceClient::with_config(Duration::from_secs(2), Duration::from_secs(1)).unwrap();
    Aggregator::new(ServiceResolver::new(registry), client)
}

// =============================================================================
// Tests
// =============================================================================

#[tokio::test]
async fn test_aggregate_joins_reviews() {
    let registry = Arc::new(MemoryRegistry::new());
    let catalog = TestServer::start(catalog_router(quests())).await.unwrap();
    let review = TestServer::start(review_router(reviews())).await.unwrap();
    register(&registry, "quest-catalog", &catalog).await;
    register(&registry, "quest-review", &review).await;

    let result = aggregator(registry).aggregate().await.unwrap();

    assert_eq!(
        result,
        vec![
            AggregatedQuest::from_quest(
                quests()[0].clone(),
                vec![reviews()[0].clone(), reviews()[1].clone()],
            ),
            AggregatedQuest::from_quest(quests()[1].clone(), vec![reviews()[2].clone()]),
        ]
    );
}

#[tokio::test]
async fn test_aggregate_drops_orphan_reviews() {
    let registry = Arc::new(MemoryRegistry::new());
    let mut records = reviews();
    records.push(QuestReview::new(99, "No such quest", 1));
    let catalog = TestServer::start(catalog_router(quests())).await.unwrap();
    let review = TestServer::start(review_router(records)).await.unwrap();
    register(&registry, "quest-catalog", &catalog).await;
    register(&registry, "quest-review", &review).await;

    let result = aggregator(registry).aggregate().await.unwrap();

    assert!(result
        .iter()
        .flat_map(|q| &q.reviews)
        .all(|r| r.quest_id != 99));
    assert_eq!(result.iter().map(|q| q.reviews.len()).sum::<usize>(), 3);
}

#[tokio::test]
async fn test_catalog_not_registered() {
    let registry = Arc::new(MemoryRegistry::new());
    let review = TestServer::start(review_router(reviews())).await.unwrap();
    register(&registry, "quest-review", &review).await;

    let err = aggregator(registry).aggregate().await.unwrap_err();

    assert!(matches!(err, QuestError::ServiceNotFound(name) if name == "quest-catalog"));
}

#[tokio::test]
async fn test_reviews_unreachable() {
    let registry = Arc::new(MemoryRegistry::new());
    let catalog = TestServer::start(catalog_router(quests())).await.unwrap();
    register(&registry, "quest-catalog", &catalog).await;

    let dead = closed_endpoint().unwrap();
    registry
        .register(&ServiceInstance::new(REVIEW_SERVICE, "quest-review-1", dead.host, dead.port))
        .await
        .unwrap();

    let err = aggregator(registry).aggregate().await.unwrap_err();

    assert!(matches!(err, QuestError::Unreachable { .. }));
}

#[tokio::test]
async fn test_backend_error_status() {
    let registry = Arc::new(MemoryRegistry::new());
    let catalog = TestServer::start(catalog_router(quests())).await.unwrap();
    let broken = Router::new().route(
        "/reviews",
        get(|| async { (StatusCode::SERVICE_UNAVAILABLE, "down") }),
    );
    let review = TestServer::start(broken).await.unwrap();
    register(&registry, "quest-catalog", &catalog).await;
    register(&registry, "quest-review", &review).await;

    let err = aggregator(registry).aggregate().await.unwrap_err();

    assert!(matches!(err, QuestError::Remote { status: 503, .. }));
}

#[tokio::test]
async fn test_malformed_reviews() {
    let registry = Arc::new(MemoryRegistry::new());
    let catalog = TestServer::start(catalog_router(quests())).await.unwrap();
    let bad = Router::new().route(
        "/reviews",
        get(|| async { Json(serde_json::json!({"reviews": []})) }),
    );
    let review = TestServer::start(bad).await.unwrap();
    register(&registry, "quest-catalog", &catalog).await;
    register(&registry, "quest-review", &review).await;

    let err = aggregator(registry).aggregate().await.unwrap_err();

    assert!(matches!(err, QuestError::Decode(_)));
}

#[tokio::test]
async fn test_registry_outage() {
    let registry = Arc::new(MemoryRegistry::new());
    registry.set_available(false);

    let err = aggregator(registry).aggregate().await.unwrap_err();

    assert!(matches!(err, QuestError::RegistryUnavailable(_)));
}

#[tokio::test]
async fn test_fetches_run_concurrently() {
    let registry = Arc::new(MemoryRegistry::new());
    let slow_catalog = Router::new().route(
        "/quests",
        get(|| async {
            tokio::time::sleep(Duration::from_millis(300)).await;
            Json(quests())
        }),
    );
    let slow_reviews = Router::new().route(
        "/reviews",
        get(|| async {
            tokio::time::sleep(Duration::from_millis(300)).await;
            Json(reviews())
        }),
    );
    let catalog = TestServer::start(slow_catalog).await.unwrap();
    let review = TestServer::start(slow_reviews).await.unwrap();
    register(&registry, "quest-catalog", &catalog).await;
    register(&registry, "quest-review", &review).await;

    let started = tokio::time::Instant::now();
    let result = aggregator(registry).aggregate().await.unwrap();

    assert_eq!(result.len(), 2);
    assert!(started.elapsed() < Duration::from_millis(550));
}

#[tokio::test]
async fn test_custom_routes() {
    let registry = Arc::new(MemoryRegistry::new());
    let catalog = TestServer::start(
        Router::new().route("/v2/quests", get(|| async { Json(quests()) })),
    )
    .await
    .unwrap();
    let review = TestServer::start(review_router(reviews())).await.unwrap();
    register(&registry, "catalog-v2", &catalog).await;
    register(&registry, "quest-review", &review).await;

    let routes = RouteConfig {
        catalog_service: "catalog-v2".to_string(),
        catalog_path: "/v2/quests".to_string(),
        ..RouteConfig::default()
    };
    let result = aggregator(registry).with_routes(routes).aggregate().await.unwrap();

    assert_eq!(result.len(), 2);
    assert_eq!(result[0].reviews.len(), 2);
}
