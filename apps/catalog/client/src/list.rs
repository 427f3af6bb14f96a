//! Product list view state

use domain_products::Product;
use reqwest::StatusCode;

use crate::api::{ClientResult, ProductsClient};
use crate::notify::{Notice, Notifier};

/// Holds whatever the last query returned.
///
/// Every action re-queries the API. Nothing is cached and nothing is
/// sorted or filtered locally.
pub struct ProductList<N: Notifier> {
    client: ProductsClient,
    notifier: N,
    pub products: Vec<Product>,
    pub search_name: String,
    pub sort_by: String,
    pub sort_asc: bool,
}

impl<N: Notifier> ProductList<N> {
    pub fn new(client: ProductsClient, notifier: N) -> Self {
        Self {
            client,
            notifier,
            products: Vec::new(),
            search_name: String::new(),
            sort_by: "name".to_string(),
            sort_asc: true,
        }
    }

    pub async fn load(&mut self) -> ClientResult<()> {
        self.products = self.client.list().await?;
        Ok(())
    }

    /// Searches by `search_name`, or reloads everything when it is empty.
    pub async fn search(&mut self) -> ClientResult<()> {
        if self.search_name.is_empty() {
            return self.load().await;
        }
        self.products = self.client.search(&self.search_name).await?;
        Ok(())
    }

    pub async fn sort(&mut self) -> ClientResult<()> {
        self.products = self.client.sorted(&self.sort_by, self.sort_asc).await?;
        Ok(())
    }

    pub async fn set_sort_by(&mut self, field: impl Into<String>) -> ClientResult<()> {
        self.sort_by = field.into();
        self.sort().await
    }

    pub async fn set_sort_asc(&mut self, ascending: bool) -> ClientResult<()> {
        self.sort_asc = ascending;
        self.sort().await
    }

    /// Returns whether the product was deleted; the outcome is also notified.
    pub async fn delete(&mut self, id: i32) -> bool {
        let deleted = matches!(self.client.delete(id).await, Ok(StatusCode::NO_CONTENT));
        self.finish(
            deleted,
            "Product deleted successfully",
            "Product deletion failed",
        )
        .await
    }

    pub async fn delete_all(&mut self) -> bool {
        let deleted = matches!(self.client.delete_all().await, Ok(StatusCode::NO_CONTENT));
        self.finish(
            deleted,
            "All products deleted successfully",
            "All products deletion failed",
        )
        .await
    }

    async fn finish(&mut self, ok: bool, success: &str, failure: &str) -> bool {
        if !ok {
            self.notifier.notify(Notice::error(failure));
            return false;
        }

        self.notifier.notify(Notice::success(success));
        if let Err(e) = self.load().await {
            tracing::warn!("Reload after delete failed: {}", e);
        }
        true
    }
}
