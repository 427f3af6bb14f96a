use async_trait::async_trait;
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::error::{ProductError, ProductResult};
use crate::models::{Product, SortField};

/// Repository trait for Product persistence
///
/// Lookups that find nothing return `None`, `false` or an empty list; only
/// storage failures and duplicate ids are errors.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// Insert a product. A non-zero id is kept, zero gets the next id.
    async fn add(&self, product: Product) -> ProductResult<Product>;

    /// All products in id order
    async fn get_all(&self) -> ProductResult<Vec<Product>>;

    async fn get_by_id(&self, id: i32) -> ProductResult<Option<Product>>;

    /// Products whose name contains `name` (case-sensitive)
    async fn get_by_name(&self, name: &str) -> ProductResult<Vec<Product>>;

    /// Products whose category equals `category` exactly
    async fn get_by_category(&self, category: &str) -> ProductResult<Vec<Product>>;

    /// All products ordered by `sort`; `None` keeps id order.
    async fn get_sorted(
        &self,
        sort: Option<SortField>,
        ascending: bool,
    ) -> ProductResult<Vec<Product>>;

    async fn count(&self) -> ProductResult<u64>;

    /// Replace the stored record with `product`.
    ///
    /// `false` when `product.id != id` or no record has that id.
    async fn update(&self, id: i32, product: Product) -> ProductResult<bool>;

    /// Whether a row was removed
    async fn delete_by_id(&self, id: i32) -> ProductResult<bool>;

    /// Remove every product, returning how many were removed
    async fn delete_all(&self) -> ProductResult<u64>;
}

/// In-memory implementation of ProductRepository (for development/testing)
#[derive(Debug, Default, Clone)]
pub struct InMemoryProductRepository {
    products: Arc<RwLock<BTreeMap<i32, Product>>>,
}

impl InMemoryProductRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

fn compare(field: SortField, a: &Product, b: &Product) -> Ordering {
    match field {
        SortField::Name => a.name.cmp(&b.name),
        SortField::Category => a.category.cmp(&b.category),
        SortField::Price => a.price.cmp(&b.price),
    }
}

#[async_trait]
impl ProductRepository for InMemoryProductRepository {
    async fn add(&self, mut product: Product) -> ProductResult<Product> {
        let mut products = self.products.write().await;

        if product.id == 0 {
            product.id = match products.keys().next_back() {
                None => 1,
                Some(last) => last.checked_add(1).ok_or_else(|| {
                    tracing::error!(last_id = last, "No product id left to assign");
                    ProductError::Internal("product id space exhausted".into())
                })?,
            };
        } else if products.contains_key(&product.id) {
            return Err(ProductError::Duplicate(product.id));
        }

        products.insert(product.id, product.clone());

        tracing::info!(product_id = product.id, "Created product");
        Ok(product)
    }

    async fn get_all(&self) -> ProductResult<Vec<Product>> {
        let products = self.products.read().await;
        Ok(products.values().cloned().collect())
    }

    async fn get_by_id(&self, id: i32) -> ProductResult<Option<Product>> {
        let products = self.products.read().await;
        Ok(products.get(&id).cloned())
    }

    async fn get_by_name(&self, name: &str) -> ProductResult<Vec<Product>> {
        let products = self.products.read().await;
        Ok(products
            .values()
            .filter(|p| p.name.contains(name))
            .cloned()
            .collect())
    }

    async fn get_by_category(&self, category: &str) -> ProductResult<Vec<Product>> {
        let products = self.products.read().await;
        Ok(products
            .values()
            .filter(|p| p.category == category)
            .cloned()
            .collect())
    }

    async fn get_sorted(
        &self,
        sort: Option<SortField>,
        ascending: bool,
    ) -> ProductResult<Vec<Product>> {
        let mut result = self.get_all().await?;

        // Stable sort: ties stay in id order in both directions
        if let Some(field) = sort {
            if ascending {
                result.sort_by(|a, b| compare(field, a, b));
            } else {
                result.sort_by(|a, b| compare(field, b, a));
            }
        }

        Ok(result)
    }

    async fn count(&self) -> ProductResult<u64> {
        let products = self.products.read().await;
        Ok(products.len() as u64)
    }

    async fn update(&self, id: i32, product: Product) -> ProductResult<bool> {
        if product.id != id {
            return Ok(false);
        }

        let mut products = self.products.write().await;
        match products.get_mut(&id) {
            Some(existing) => {
                *existing = product;
                tracing::info!(product_id = id, "Updated product");
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_by_id(&self, id: i32) -> ProductResult<bool> {
        let mut products = self.products.write().await;

        if products.remove(&id).is_some() {
            tracing::info!(product_id = id, "Deleted product");
            Ok(true)
        } else {
            Ok(false)
        }
    }

    async fn delete_all(&self) -> ProductResult<u64> {
        let mut products = self.products.write().await;
        let removed = products.len() as u64;
        products.clear();

        tracing::info!(removed, "Deleted all products");
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn product(name: &str, category: &str, cents: i64) -> Product {
        Product::new(name, "", category, Decimal::new(cents, 2))
    }

    async fn seeded() -> InMemoryProductRepository {
        let repo = InMemoryProductRepository::new();
        repo.add(product("Kettle", "kitchen", 3500)).await.unwrap();
        repo.add(product("Desk Lamp", "lighting", 2450)).await.unwrap();
        repo.add(product("Teapot", "kitchen", 1800)).await.unwrap();
        repo
    }

    #[tokio::test]
    async fn test_add_assigns_sequential_ids() {
        let repo = seeded().await;
        let ids: Vec<i32> = repo.get_all().await.unwrap().iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_add_keeps_explicit_id_and_rejects_duplicate() {
        let repo = InMemoryProductRepository::new();

        let created = repo.add(product("Mug", "kitchen", 700).with_id(42)).await.unwrap();
        assert_eq!(created.id, 42);

        let next = repo.add(product("Bowl", "kitchen", 900)).await.unwrap();
        assert_eq!(next.id, 43);

        let result = repo.add(product("Plate", "kitchen", 900).with_id(42)).await;
        assert!(matches!(result, Err(ProductError::Duplicate(42))));
    }

    #[tokio::test]
    async fn test_add_after_max_id_fails_instead_of_wrapping() {
        let repo = InMemoryProductRepository::new();
        repo.add(product("Mug", "kitchen", 700).with_id(i32::MAX))
            .await
            .unwrap();

        let result = repo.add(product("Bowl", "kitchen", 900)).await;
        assert!(matches!(result, Err(ProductError::Internal(_))));
        assert_eq!(repo.count().await.unwrap(), 1);
        assert!(repo.get_by_id(i32::MIN).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_get_by_name_is_case_sensitive_substring() {
        let repo = seeded().await;

        let hits = repo.get_by_name("ea").await.unwrap();
        let names: Vec<&str> = hits.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Teapot"]);

        assert!(repo.get_by_name("kettle").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_get_by_category_exact_match() {
        let repo = seeded().await;
        assert_eq!(repo.get_by_category("kitchen").await.unwrap().len(), 2);
        assert!(repo.get_by_category("Kitchen").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_get_sorted() {
        let repo = seeded().await;

        let by_price = repo.get_sorted(Some(SortField::Price), true).await.unwrap();
        let prices: Vec<i32> = by_price.iter().map(|p| p.id).collect();
        assert_eq!(prices, vec![3, 2, 1]);

        let by_name_desc = repo.get_sorted(Some(SortField::Name), false).await.unwrap();
        let names: Vec<&str> = by_name_desc.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Teapot", "Kettle", "Desk Lamp"]);

        let unsorted = repo.get_sorted(None, false).await.unwrap();
        assert_eq!(unsorted, repo.get_all().await.unwrap());
    }

    #[tokio::test]
    async fn test_update_replaces_whole_record() {
        let repo = seeded().await;

        let replacement = Product::new("Kettle Pro", "", "appliances", Decimal::new(4999, 2)).with_id(1);
        assert!(repo.update(1, replacement.clone()).await.unwrap());
        assert_eq!(repo.get_by_id(1).await.unwrap(), Some(replacement));
    }

    #[tokio::test]
    async fn test_update_mismatch_or_missing_returns_false() {
        let repo = seeded().await;

        let body = product("Kettle", "kitchen", 3500).with_id(2);
        assert!(!repo.update(1, body).await.unwrap());
        assert_eq!(repo.get_by_id(1).await.unwrap().unwrap().name, "Kettle");

        let ghost = product("Ghost", "none", 0).with_id(99);
        assert!(!repo.update(99, ghost).await.unwrap());
    }

    #[tokio::test]
    async fn test_delete_by_id_and_delete_all() {
        let repo = seeded().await;

        assert!(repo.delete_by_id(2).await.unwrap());
        assert!(!repo.delete_by_id(2).await.unwrap());
        assert_eq!(repo.count().await.unwrap(), 2);

        assert_eq!(repo.delete_all().await.unwrap(), 2);
        assert_eq!(repo.delete_all().await.unwrap(), 0);
        assert_eq!(repo.count().await.unwrap(), 0);
    }
}
