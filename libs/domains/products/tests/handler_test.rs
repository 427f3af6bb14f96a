//! Handler tests for the Products domain
//!
//! These drive `handlers::router` with `oneshot` against the in-memory
//! repository and check:
//! - status codes and `Location`
//! - JSON request/response shapes
//! - error bodies for bad ids, bad bodies and missing query parameters

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use domain_products::*;
use http_body_util::BodyExt;
use rust_decimal::Decimal;
use serde_json::{Value, json};
use tower::ServiceExt; // For oneshot()

// Helper to parse JSON response body
async fn json_body<T: serde::de::DeserializeOwned>(body: Body) -> T {
    let bytes = body.collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::get(uri).body(Body::empty()).unwrap()
}

async fn seeded_app() -> (Router, InMemoryProductRepository) {
    let repo = InMemoryProductRepository::new();
    for (name, category, cents) in [
        ("Kettle", "kitchen", 3500),
        ("Desk Lamp", "lighting", 2450),
        ("Teapot", "kitchen", 1800),
    ] {
        repo.add(Product::new(name, "", category, Decimal::new(cents, 2)))
            .await
            .unwrap();
    }

    let app = handlers::router(ProductService::new(repo.clone()));
    (app, repo)
}

#[tokio::test]
async fn test_create_returns_201_with_location() {
    let app = handlers::router(ProductService::new(InMemoryProductRepository::new()));

    let response = app
        .oneshot(json_request(
            "POST",
            "/",
            json!({
                "name": "Mug",
                "description": "Stoneware",
                "category": "kitchen",
                "price": 7.25
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(
        response.headers().get(header::LOCATION).unwrap(),
        "/api/products/1"
    );

    let product: Product = json_body(response.into_body()).await;
    assert_eq!(product.id, 1);
    assert_eq!(product.name, "Mug");
    assert_eq!(product.price, Decimal::new(725, 2));
}

#[tokio::test]
async fn test_create_with_explicit_id_then_duplicate_is_409() {
    let app = handlers::router(ProductService::new(InMemoryProductRepository::new()));
    let body = json!({ "id": 77, "name": "Mug", "category": "kitchen", "price": 7 });

    let first = app
        .clone()
        .oneshot(json_request("POST", "/", body.clone()))
        .await
        .unwrap();
    assert_eq!(first.status(), StatusCode::CREATED);
    assert_eq!(
        first.headers().get(header::LOCATION).unwrap(),
        "/api/products/77"
    );

    let second = app.oneshot(json_request("POST", "/", body)).await.unwrap();
    assert_eq!(second.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_create_validates_input() {
    let app = handlers::router(ProductService::new(InMemoryProductRepository::new()));

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/",
            json!({ "name": "", "category": "kitchen", "price": 1 }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body: Value = json_body(response.into_body()).await;
    assert_eq!(body["error"], "VALIDATION_ERROR");
    assert!(body["details"]["name"].is_array());

    // Missing required field
    let response = app
        .oneshot(json_request("POST", "/", json!({ "name": "Mug" })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_create_with_unparsable_body_is_400() {
    let app = handlers::router(ProductService::new(InMemoryProductRepository::new()));

    // Well-formed JSON without `name`
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/",
            json!({ "category": "k", "price": 1 }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = json_body(response.into_body()).await;
    assert_eq!(body["error"], "JSON_EXTRACTION");

    // Not JSON at all
    let response = app
        .oneshot(
            Request::post("/")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from("{\"name\": "))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = json_body(response.into_body()).await;
    assert_eq!(body["error"], "JSON_EXTRACTION");
}

#[tokio::test]
async fn test_list_returns_all_in_id_order() {
    let (app, _) = seeded_app().await;

    let response = app.oneshot(get("/")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let products: Vec<Product> = json_body(response.into_body()).await;
    let ids: Vec<i32> = products.iter().map(|p| p.id).collect();
    assert_eq!(ids, vec![1, 2, 3]);
}

#[tokio::test]
async fn test_get_by_id() {
    let (app, _) = seeded_app().await;

    let response = app.clone().oneshot(get("/2")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let product: Product = json_body(response.into_body()).await;
    assert_eq!(product.name, "Desk Lamp");

    let missing = app.clone().oneshot(get("/99")).await.unwrap();
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
    let body: Value = json_body(missing.into_body()).await;
    assert_eq!(body["error"], "NOT_FOUND");

    let invalid = app.oneshot(get("/abc")).await.unwrap();
    assert_eq!(invalid.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_search_by_name() {
    let (app, _) = seeded_app().await;

    let response = app.clone().oneshot(get("/search?name=ea")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let products: Vec<Product> = json_body(response.into_body()).await;
    assert_eq!(products.len(), 1);
    assert_eq!(products[0].name, "Teapot");

    let none = app.clone().oneshot(get("/search?name=zzz")).await.unwrap();
    assert_eq!(none.status(), StatusCode::OK);
    let products: Vec<Product> = json_body(none.into_body()).await;
    assert!(products.is_empty());

    let missing = app.oneshot(get("/search")).await.unwrap();
    assert_eq!(missing.status(), StatusCode::BAD_REQUEST);
    let body: Value = json_body(missing.into_body()).await;
    assert_eq!(body["error"], "INVALID_QUERY");
}

#[tokio::test]
async fn test_by_category() {
    let (app, _) = seeded_app().await;

    let response = app.clone().oneshot(get("/category/kitchen")).await.unwrap();
    let products: Vec<Product> = json_body(response.into_body()).await;
    let names: Vec<&str> = products.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["Kettle", "Teapot"]);

    let response = app.oneshot(get("/category/garden")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let products: Vec<Product> = json_body(response.into_body()).await;
    assert!(products.is_empty());
}

#[tokio::test]
async fn test_sorted() {
    let (app, _) = seeded_app().await;

    let response = app
        .clone()
        .oneshot(get("/sort?sortBy=price&isAscending=true"))
        .await
        .unwrap();
    let products: Vec<Product> = json_body(response.into_body()).await;
    let ids: Vec<i32> = products.iter().map(|p| p.id).collect();
    assert_eq!(ids, vec![3, 2, 1]);

    // isAscending defaults to false
    let response = app.clone().oneshot(get("/sort?sortBy=name")).await.unwrap();
    let products: Vec<Product> = json_body(response.into_body()).await;
    let names: Vec<&str> = products.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["Teapot", "Kettle", "Desk Lamp"]);

    // Unknown field leaves store order
    let response = app
        .oneshot(get("/sort?sortBy=weight&isAscending=true"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let products: Vec<Product> = json_body(response.into_body()).await;
    let ids: Vec<i32> = products.iter().map(|p| p.id).collect();
    assert_eq!(ids, vec![1, 2, 3]);
}

#[tokio::test]
async fn test_total_count() {
    let (app, _) = seeded_app().await;

    let response = app.oneshot(get("/total-count")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let count: u64 = json_body(response.into_body()).await;
    assert_eq!(count, 3);
}

#[tokio::test]
async fn test_update() {
    let (app, repo) = seeded_app().await;
    let replacement = json!({
        "id": 1,
        "name": "Kettle Pro",
        "description": "1.7L",
        "category": "appliances",
        "price": 49.99
    });

    let response = app
        .clone()
        .oneshot(json_request("PUT", "/1", replacement.clone()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let stored = repo.get_by_id(1).await.unwrap().unwrap();
    assert_eq!(stored.name, "Kettle Pro");
    assert_eq!(stored.category, "appliances");
    assert_eq!(stored.price, Decimal::new(4999, 2));

    // Path/body id mismatch is a 404 and changes nothing
    let response = app
        .clone()
        .oneshot(json_request("PUT", "/2", replacement))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(repo.get_by_id(2).await.unwrap().unwrap().name, "Desk Lamp");

    // Missing target
    let response = app
        .oneshot(json_request(
            "PUT",
            "/50",
            json!({ "id": 50, "name": "Ghost", "category": "none", "price": 1 }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_update_id_mismatch_wins_over_empty_name() {
    let (app, repo) = seeded_app().await;

    let response = app
        .oneshot(json_request(
            "PUT",
            "/1",
            json!({ "id": 2, "name": "", "category": "kitchen", "price": 1 }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(repo.get_by_id(1).await.unwrap().unwrap().name, "Kettle");
    assert_eq!(repo.get_by_id(2).await.unwrap().unwrap().name, "Desk Lamp");
}

#[tokio::test]
async fn test_update_stores_empty_name() {
    let (app, repo) = seeded_app().await;

    let response = app
        .oneshot(json_request(
            "PUT",
            "/1",
            json!({ "id": 1, "name": "", "category": "kitchen", "price": 1 }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let stored = repo.get_by_id(1).await.unwrap().unwrap();
    assert_eq!(stored.name, "");
    assert_eq!(stored.price, Decimal::ONE);
}

#[tokio::test]
async fn test_delete_and_delete_all() {
    let (app, repo) = seeded_app().await;

    let delete = |uri: &str| Request::delete(uri).body(Body::empty()).unwrap();

    let response = app.clone().oneshot(delete("/2")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app.clone().oneshot(delete("/2")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app.clone().oneshot(delete("/")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert_eq!(repo.count().await.unwrap(), 0);

    // Idempotent
    let response = app.oneshot(delete("/")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}
