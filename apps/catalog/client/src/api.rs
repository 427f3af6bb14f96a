//! Typed HTTP client for `/api/products`

use domain_products::Product;
use reqwest::{StatusCode, Url};
use serde::de::DeserializeOwned;
use thiserror::Error;

/// Used when neither `--api-url` nor `CATALOG_API_URL` is given
pub const DEFAULT_API_URL: &str = "http://localhost:8080/api/products";

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Invalid API base URL '{0}'")]
    InvalidBaseUrl(String),

    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Unexpected response status: {0}")]
    UnexpectedStatus(StatusCode),

    #[error("Product {0} not found")]
    NotFound(i32),
}

pub type ClientResult<T> = Result<T, ClientError>;

/// Reads decode the body; writes hand back the raw status for the caller
/// to judge.
#[derive(Clone, Debug)]
pub struct ProductsClient {
    http: reqwest::Client,
    base_url: Url,
}

impl ProductsClient {
    pub fn new(base_url: &str) -> ClientResult<Self> {
        let parsed =
            Url::parse(base_url).map_err(|_| ClientError::InvalidBaseUrl(base_url.to_string()))?;
        if parsed.cannot_be_a_base() {
            return Err(ClientError::InvalidBaseUrl(base_url.to_string()));
        }

        Ok(Self {
            http: reqwest::Client::new(),
            base_url: parsed,
        })
    }

    /// `CATALOG_API_URL`, falling back to [`DEFAULT_API_URL`]
    pub fn from_env() -> ClientResult<Self> {
        Self::new(&core_config::env_or_default("CATALOG_API_URL", DEFAULT_API_URL))
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    fn url(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        // cannot_be_a_base was rejected in new()
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    async fn read<T: DeserializeOwned>(request: reqwest::RequestBuilder) -> ClientResult<T> {
        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::UnexpectedStatus(status));
        }
        Ok(response.json().await?)
    }

    pub async fn list(&self) -> ClientResult<Vec<Product>> {
        Self::read(self.http.get(self.url(&[]))).await
    }

    /// `None` on 404
    pub async fn get(&self, id: i32) -> ClientResult<Option<Product>> {
        let response = self.http.get(self.url(&[&id.to_string()])).send().await?;
        match response.status() {
            StatusCode::NOT_FOUND => Ok(None),
            status if status.is_success() => Ok(Some(response.json().await?)),
            status => Err(ClientError::UnexpectedStatus(status)),
        }
    }

    pub async fn search(&self, name: &str) -> ClientResult<Vec<Product>> {
        Self::read(self.http.get(self.url(&["search"])).query(&[("name", name)])).await
    }

    pub async fn by_category(&self, category: &str) -> ClientResult<Vec<Product>> {
        Self::read(self.http.get(self.url(&["category", category]))).await
    }

    /// `sort_by` is sent as-is; the server ignores names it does not know.
    pub async fn sorted(&self, sort_by: &str, ascending: bool) -> ClientResult<Vec<Product>> {
        let ascending = ascending.to_string();
        Self::read(
            self.http
                .get(self.url(&["sort"]))
                .query(&[("sortBy", sort_by), ("isAscending", ascending.as_str())]),
        )
        .await
    }

    pub async fn count(&self) -> ClientResult<u64> {
        Self::read(self.http.get(self.url(&["total-count"]))).await
    }

    pub async fn create(&self, product: &Product) -> ClientResult<StatusCode> {
        let response = self.http.post(self.url(&[])).json(product).send().await?;
        Ok(response.status())
    }

    pub async fn update(&self, id: i32, product: &Product) -> ClientResult<StatusCode> {
        let response = self
            .http
            .put(self.url(&[&id.to_string()]))
            .json(product)
            .send()
            .await?;
        Ok(response.status())
    }

    pub async fn delete(&self, id: i32) -> ClientResult<StatusCode> {
        let response = self.http.delete(self.url(&[&id.to_string()])).send().await?;
        Ok(response.status())
    }

    pub async fn delete_all(&self) -> ClientResult<StatusCode> {
        let response = self.http.delete(self.url(&[])).send().await?;
        Ok(response.status())
    }
}
