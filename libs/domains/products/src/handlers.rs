//! HTTP handlers for the Products API

use axum::{
    Json, Router,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::{StatusCode, header},
    response::IntoResponse,
    routing::get,
};
use axum_helpers::{
    AppError, IdPath, ValidatedJson,
    errors::responses::{
        BadRequestIdResponse, BadRequestValidationResponse, ConflictResponse,
        InternalServerErrorResponse, NotFoundResponse, ServiceUnavailableResponse,
    },
};
use std::sync::Arc;
use utoipa::OpenApi;

use crate::error::ProductResult;
use crate::models::{Product, SearchQuery, SortField, SortQuery};
use crate::repository::ProductRepository;
use crate::service::ProductService;

/// Where [`router`] is mounted; used to build `Location` headers.
pub const PRODUCTS_PATH: &str = "/api/products";

const TAG: &str = "Products";

/// OpenAPI documentation for Products API
#[derive(OpenApi)]
#[openapi(
    paths(
        list_products,
        create_product,
        get_product,
        search_products,
        get_by_category,
        get_sorted,
        total_count,
        update_product,
        delete_product,
        delete_all_products,
    ),
    components(
        schemas(Product, SortField),
        responses(
            NotFoundResponse,
            BadRequestValidationResponse,
            BadRequestIdResponse,
            ConflictResponse,
            InternalServerErrorResponse,
            ServiceUnavailableResponse
        )
    ),
    tags(
        (name = TAG, description = "Product catalog endpoints")
    )
)]
pub struct ApiDoc;

/// Create the products router with all HTTP endpoints
pub fn router<R: ProductRepository + 'static>(service: ProductService<R>) -> Router {
    let shared_service = Arc::new(service);

    Router::new()
        .route(
            "/",
            get(list_products::<R>)
                .post(create_product::<R>)
                .delete(delete_all_products::<R>),
        )
        .route("/search", get(search_products::<R>))
        .route("/sort", get(get_sorted::<R>))
        .route("/total-count", get(total_count::<R>))
        .route("/category/{category}", get(get_by_category::<R>))
        .route(
            "/{id}",
            get(get_product::<R>)
                .put(update_product::<R>)
                .delete(delete_product::<R>),
        )
        .with_state(shared_service)
}

/// List all products
#[utoipa::path(
    get,
    path = "",
    tag = TAG,
    responses(
        (status = 200, description = "All products in id order", body = Vec<Product>),
        (status = 500, response = InternalServerErrorResponse),
        (status = 503, response = ServiceUnavailableResponse)
    )
)]
async fn list_products<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
) -> ProductResult<Json<Vec<Product>>> {
    let products = service.list_products().await?;
    Ok(Json(products))
}

/// Create a product
#[utoipa::path(
    post,
    path = "",
    tag = TAG,
    request_body = Product,
    responses(
        (status = 201, description = "Product created", body = Product,
            headers(("Location" = String, description = "URL of the new product"))),
        (status = 400, response = BadRequestValidationResponse),
        (status = 409, response = ConflictResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn create_product<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    ValidatedJson(product): ValidatedJson<Product>,
) -> ProductResult<impl IntoResponse> {
    let product = service.add_product(product).await?;
    let location = format!("{}/{}", PRODUCTS_PATH, product.id);

    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(product),
    ))
}

/// Get a product by id
#[utoipa::path(
    get,
    path = "/{id}",
    tag = TAG,
    params(
        ("id" = i32, Path, description = "Product id")
    ),
    responses(
        (status = 200, description = "Product found", body = Product),
        (status = 400, response = BadRequestIdResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_product<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    IdPath(id): IdPath,
) -> ProductResult<Json<Product>> {
    let product = service.get_product(id).await?;
    Ok(Json(product))
}

/// Products whose name contains the given text
#[utoipa::path(
    get,
    path = "/search",
    tag = TAG,
    params(SearchQuery),
    responses(
        (status = 200, description = "Matching products, possibly none", body = Vec<Product>),
        (status = 400, description = "Missing `name` parameter"),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn search_products<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    query: Result<Query<SearchQuery>, QueryRejection>,
) -> Result<Json<Vec<Product>>, AppError> {
    let Query(query) = query?;
    let products = service.search_by_name(&query.name).await?;
    Ok(Json(products))
}

/// Products in a category
#[utoipa::path(
    get,
    path = "/category/{category}",
    tag = TAG,
    params(
        ("category" = String, Path, description = "Exact category name")
    ),
    responses(
        (status = 200, description = "Products in the category", body = Vec<Product>),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_by_category<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    Path(category): Path<String>,
) -> ProductResult<Json<Vec<Product>>> {
    let products = service.get_by_category(&category).await?;
    Ok(Json(products))
}

/// All products ordered by a field
#[utoipa::path(
    get,
    path = "/sort",
    tag = TAG,
    params(SortQuery),
    responses(
        (status = 200, description = "Sorted products; unknown fields leave id order", body = Vec<Product>),
        (status = 400, description = "Malformed query"),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_sorted<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    query: Result<Query<SortQuery>, QueryRejection>,
) -> Result<Json<Vec<Product>>, AppError> {
    let Query(query) = query?;
    let products = service
        .get_sorted(query.field(), query.is_ascending)
        .await?;
    Ok(Json(products))
}

/// Number of stored products
#[utoipa::path(
    get,
    path = "/total-count",
    tag = TAG,
    responses(
        (status = 200, description = "Total product count", body = u64),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn total_count<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
) -> ProductResult<Json<u64>> {
    let count = service.count_products().await?;
    Ok(Json(count))
}

/// Replace a product
///
/// The body is stored as sent: field rules are only enforced on create.
#[utoipa::path(
    put,
    path = "/{id}",
    tag = TAG,
    params(
        ("id" = i32, Path, description = "Product id; must equal the body id")
    ),
    request_body = Product,
    responses(
        (status = 204, description = "Product updated"),
        (status = 400, description = "Malformed id or JSON body"),
        (status = 404, description = "Id mismatch or unknown product"),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn update_product<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    IdPath(id): IdPath,
    payload: Result<Json<Product>, JsonRejection>,
) -> Result<StatusCode, AppError> {
    let Json(product) = payload?;
    service.update_product(id, product).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Delete a product
#[utoipa::path(
    delete,
    path = "/{id}",
    tag = TAG,
    params(
        ("id" = i32, Path, description = "Product id")
    ),
    responses(
        (status = 204, description = "Product deleted"),
        (status = 400, response = BadRequestIdResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn delete_product<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
    IdPath(id): IdPath,
) -> ProductResult<StatusCode> {
    service.delete_product(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Delete every product
#[utoipa::path(
    delete,
    path = "",
    tag = TAG,
    responses(
        (status = 204, description = "All products deleted"),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn delete_all_products<R: ProductRepository>(
    State(service): State<Arc<ProductService<R>>>,
) -> ProductResult<StatusCode> {
    service.delete_all_products().await?;
    Ok(StatusCode::NO_CONTENT)
}
