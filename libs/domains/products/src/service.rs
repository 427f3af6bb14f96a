//! Product Service - the layer handlers talk to

use std::sync::Arc;
use tracing::instrument;
use validator::Validate;

use crate::error::{ProductError, ProductResult};
use crate::models::{Product, SortField};
use crate::repository::ProductRepository;

/// Turns the repository's `None`/`false` answers into typed errors for the
/// HTTP layer.
pub struct ProductService<R: ProductRepository> {
    repository: Arc<R>,
}

impl<R: ProductRepository> ProductService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    #[instrument(skip(self, product), fields(product_id = product.id, product_name = %product.name))]
    pub async fn add_product(&self, product: Product) -> ProductResult<Product> {
        product
            .validate()
            .map_err(|e| ProductError::Validation(e.to_string()))?;

        self.repository.add(product).await
    }

    #[instrument(skip(self))]
    pub async fn list_products(&self) -> ProductResult<Vec<Product>> {
        self.repository.get_all().await
    }

    #[instrument(skip(self))]
    pub async fn get_product(&self, id: i32) -> ProductResult<Product> {
        self.repository
            .get_by_id(id)
            .await?
            .ok_or(ProductError::NotFound(id))
    }

    #[instrument(skip(self))]
    pub async fn search_by_name(&self, name: &str) -> ProductResult<Vec<Product>> {
        self.repository.get_by_name(name).await
    }

    #[instrument(skip(self))]
    pub async fn get_by_category(&self, category: &str) -> ProductResult<Vec<Product>> {
        self.repository.get_by_category(category).await
    }

    #[instrument(skip(self))]
    pub async fn get_sorted(
        &self,
        sort: Option<SortField>,
        ascending: bool,
    ) -> ProductResult<Vec<Product>> {
        if sort.is_none() {
            tracing::debug!("Unknown sort field, returning store order");
        }
        self.repository.get_sorted(sort, ascending).await
    }

    #[instrument(skip(self))]
    pub async fn count_products(&self) -> ProductResult<u64> {
        self.repository.count().await
    }

    /// Replace product `id` with `product`.
    ///
    /// Unlike [`Self::add_product`] the body is not validated; only the id
    /// must agree with the path.
    #[instrument(skip(self, product))]
    pub async fn update_product(&self, id: i32, product: Product) -> ProductResult<()> {
        if product.id != id {
            tracing::info!(body_id = product.id, "Path id does not match body id");
            return Err(ProductError::IdMismatch {
                path: id,
                body: product.id,
            });
        }

        if !self.repository.update(id, product).await? {
            return Err(ProductError::NotFound(id));
        }

        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn delete_product(&self, id: i32) -> ProductResult<()> {
        if !self.repository.delete_by_id(id).await? {
            return Err(ProductError::NotFound(id));
        }

        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn delete_all_products(&self) -> ProductResult<u64> {
        self.repository.delete_all().await
    }
}

impl<R: ProductRepository> Clone for ProductService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
        }
    }
}
