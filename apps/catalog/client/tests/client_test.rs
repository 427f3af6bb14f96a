//! Client tests against the real products router
//!
//! Each test serves `handlers::router` over the in-memory store on an
//! ephemeral port, so requests go through reqwest and the full HTTP stack.

use axum::Router;
use catalog_client::*;
use domain_products::{InMemoryProductRepository, ProductService, handlers};
use reqwest::StatusCode;
use rust_decimal::Decimal;

async fn spawn_api() -> ProductsClient {
    let app = Router::new().nest(
        "/api/products",
        handlers::router(ProductService::new(InMemoryProductRepository::new())),
    );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    ProductsClient::new(&format!("http://{}/api/products", addr)).unwrap()
}

async fn seed(client: &ProductsClient) {
    for (name, category, cents) in [
        ("Kettle", "kitchen", 3500),
        ("Desk Lamp", "lighting", 2450),
        ("Teapot", "kitchen", 1800),
    ] {
        let status = client
            .create(&Product::new(name, "seeded", category, Decimal::new(cents, 2)))
            .await
            .unwrap();
        assert_eq!(status, StatusCode::CREATED);
    }
}

fn names(products: &[Product]) -> Vec<&str> {
    products.iter().map(|p| p.name.as_str()).collect()
}

// ============================================================================
// ProductsClient
// ============================================================================

#[tokio::test]
async fn test_reads() {
    let client = spawn_api().await;
    seed(&client).await;

    assert_eq!(client.list().await.unwrap().len(), 3);
    assert_eq!(client.count().await.unwrap(), 3);

    let lamp = client.get(2).await.unwrap().unwrap();
    assert_eq!(lamp.name, "Desk Lamp");
    assert_eq!(lamp.price, Decimal::new(2450, 2));
    assert!(client.get(99).await.unwrap().is_none());

    assert_eq!(names(&client.search("ea").await.unwrap()), vec!["Teapot"]);
    assert_eq!(
        names(&client.by_category("kitchen").await.unwrap()),
        vec!["Kettle", "Teapot"]
    );
    assert_eq!(
        names(&client.sorted("price", true).await.unwrap()),
        vec!["Teapot", "Desk Lamp", "Kettle"]
    );
}

#[tokio::test]
async fn test_writes_return_raw_status() {
    let client = spawn_api().await;
    seed(&client).await;

    let duplicate = Product::new("Clone", "x", "kitchen", Decimal::ONE).with_id(1);
    assert_eq!(client.create(&duplicate).await.unwrap(), StatusCode::CONFLICT);

    let mismatched = Product::new("Other", "x", "kitchen", Decimal::ONE).with_id(3);
    assert_eq!(
        client.update(1, &mismatched).await.unwrap(),
        StatusCode::NOT_FOUND
    );

    assert_eq!(client.delete(1).await.unwrap(), StatusCode::NO_CONTENT);
    assert_eq!(client.delete(1).await.unwrap(), StatusCode::NOT_FOUND);
    assert_eq!(client.delete_all().await.unwrap(), StatusCode::NO_CONTENT);
    assert_eq!(client.count().await.unwrap(), 0);
}

#[tokio::test]
async fn test_unreachable_api_is_http_error() {
    let client = ProductsClient::new("http://127.0.0.1:1/api/products").unwrap();
    assert!(matches!(client.list().await, Err(ClientError::Http(_))));
}

// ============================================================================
// ProductList
// ============================================================================

#[tokio::test]
async fn test_list_search_falls_back_to_load() {
    let client = spawn_api().await;
    seed(&client).await;
    let mut list = ProductList::new(client, RecordingNotifier::new());

    list.search_name = "Lamp".to_string();
    list.search().await.unwrap();
    assert_eq!(names(&list.products), vec!["Desk Lamp"]);

    list.search_name.clear();
    list.search().await.unwrap();
    assert_eq!(list.products.len(), 3);
}

#[tokio::test]
async fn test_list_sort_defaults_and_setters() {
    let client = spawn_api().await;
    seed(&client).await;
    let mut list = ProductList::new(client, RecordingNotifier::new());
    assert_eq!(list.sort_by, "name");
    assert!(list.sort_asc);

    list.sort().await.unwrap();
    assert_eq!(names(&list.products), vec!["Desk Lamp", "Kettle", "Teapot"]);

    list.set_sort_asc(false).await.unwrap();
    assert_eq!(names(&list.products), vec!["Teapot", "Kettle", "Desk Lamp"]);

    list.set_sort_by("category").await.unwrap();
    assert_eq!(list.products[2].category, "kitchen");
    assert_eq!(list.products[0].category, "lighting");
}

#[tokio::test]
async fn test_list_delete_notifies_and_reloads() {
    let client = spawn_api().await;
    seed(&client).await;
    let notifier = RecordingNotifier::new();
    let mut list = ProductList::new(client, notifier.clone());

    assert!(list.delete(2).await);
    assert_eq!(
        notifier.last(),
        Some(Notice::success("Product deleted successfully"))
    );
    assert_eq!(names(&list.products), vec!["Kettle", "Teapot"]);

    assert!(!list.delete(2).await);
    assert_eq!(notifier.last(), Some(Notice::error("Product deletion failed")));

    assert!(list.delete_all().await);
    assert_eq!(
        notifier.last(),
        Some(Notice::success("All products deleted successfully"))
    );
    assert!(list.products.is_empty());
}

// ============================================================================
// ProductForm
// ============================================================================

#[tokio::test]
async fn test_form_create() {
    let client = spawn_api().await;
    let notifier = RecordingNotifier::new();

    let mut form = ProductForm::open(client.clone(), notifier.clone(), None)
        .await
        .unwrap();
    assert_eq!(form.mode(), FormMode::Creating);

    // Empty fields never reach the API
    assert!(!form.submit().await);
    assert_eq!(notifier.last(), Some(Notice::error("Please enter valid data")));
    assert_eq!(client.count().await.unwrap(), 0);

    form.product = Product::new("Mug", "Stoneware", "kitchen", Decimal::new(725, 2));
    assert!(form.submit().await);
    assert_eq!(
        notifier.last(),
        Some(Notice::success("Product added successfully"))
    );
    assert_eq!(client.count().await.unwrap(), 1);

    // Same explicit id twice: 409 is a failure
    form.product.id = 1;
    assert!(!form.submit().await);
    assert_eq!(notifier.last(), Some(Notice::error("Product addition failed")));
}

#[tokio::test]
async fn test_form_edit_loads_then_updates() {
    let client = spawn_api().await;
    seed(&client).await;
    let notifier = RecordingNotifier::new();

    let mut form = ProductForm::open(client.clone(), notifier.clone(), Some(1))
        .await
        .unwrap();
    assert_eq!(form.mode(), FormMode::Editing(1));
    assert_eq!(form.product.name, "Kettle");

    form.product.price = Decimal::new(3999, 2);
    assert!(form.submit().await);
    assert_eq!(
        notifier.last(),
        Some(Notice::success("Product updated successfully"))
    );
    assert_eq!(
        client.get(1).await.unwrap().unwrap().price,
        Decimal::new(3999, 2)
    );

    // Deleted underneath the form
    client.delete(1).await.unwrap();
    assert!(!form.submit().await);
    assert_eq!(notifier.last(), Some(Notice::error("Product update failed")));
}

#[tokio::test]
async fn test_form_edit_missing_product() {
    let client = spawn_api().await;
    let result = ProductForm::open(client, RecordingNotifier::new(), Some(42)).await;
    assert!(matches!(result, Err(ClientError::NotFound(42))));
}

#[tokio::test]
async fn test_form_transport_failure_is_notified() {
    let client = ProductsClient::new("http://127.0.0.1:1/api/products").unwrap();
    let notifier = RecordingNotifier::new();

    let mut form = ProductForm::open(client, notifier.clone(), None).await.unwrap();
    form.product = Product::new("Mug", "Stoneware", "kitchen", Decimal::ONE);

    assert!(!form.submit().await);
    assert_eq!(notifier.last(), Some(Notice::error("Product addition failed")));
}
