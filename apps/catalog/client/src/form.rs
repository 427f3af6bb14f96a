//! Create/edit form

use domain_products::Product;
use reqwest::StatusCode;
use rust_decimal::Decimal;

use crate::api::{ClientError, ClientResult, ProductsClient};
use crate::notify::{Notice, Notifier};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FormMode {
    Creating,
    Editing(i32),
}

impl FormMode {
    /// Absent or `0` means a new product.
    pub fn from_route_id(id: Option<i32>) -> Self {
        match id {
            Some(id) if id != 0 => FormMode::Editing(id),
            _ => FormMode::Creating,
        }
    }
}

pub struct ProductForm<N: Notifier> {
    client: ProductsClient,
    notifier: N,
    mode: FormMode,
    pub product: Product,
}

impl<N: Notifier> ProductForm<N> {
    /// Opens the form; in edit mode the product is fetched first.
    pub async fn open(client: ProductsClient, notifier: N, route_id: Option<i32>) -> ClientResult<Self> {
        let mode = FormMode::from_route_id(route_id);
        let product = match mode {
            FormMode::Creating => Product::new("", "", "", Decimal::ZERO),
            FormMode::Editing(id) => client.get(id).await?.ok_or(ClientError::NotFound(id))?,
        };

        Ok(Self {
            client,
            notifier,
            mode,
            product,
        })
    }

    pub fn mode(&self) -> FormMode {
        self.mode
    }

    fn is_valid(&self) -> bool {
        [
            &self.product.name,
            &self.product.description,
            &self.product.category,
        ]
        .iter()
        .all(|field| !field.trim().is_empty())
    }

    /// Posts or puts the product. Only `201` (create) and `204` (update)
    /// count as success.
    pub async fn submit(&mut self) -> bool {
        if !self.is_valid() {
            self.notifier.notify(Notice::error("Please enter valid data"));
            return false;
        }

        match self.mode {
            FormMode::Editing(id) => {
                self.product.id = id;
                let result = self.client.update(id, &self.product).await;
                self.report(
                    result,
                    StatusCode::NO_CONTENT,
                    "Product updated successfully",
                    "Product update failed",
                )
            }
            FormMode::Creating => {
                let result = self.client.create(&self.product).await;
                self.report(
                    result,
                    StatusCode::CREATED,
                    "Product added successfully",
                    "Product addition failed",
                )
            }
        }
    }

    fn report(
        &self,
        result: ClientResult<StatusCode>,
        expected: StatusCode,
        success: &str,
        failure: &str,
    ) -> bool {
        match result {
            Ok(status) if status == expected => {
                self.notifier.notify(Notice::success(success));
                true
            }
            Ok(status) => {
                tracing::debug!(%status, "Unexpected status from API");
                self.notifier.notify(Notice::error(failure));
                false
            }
            Err(e) => {
                tracing::debug!("Request failed: {}", e);
                self.notifier.notify(Notice::error(failure));
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_from_route_id() {
        assert_eq!(FormMode::from_route_id(None), FormMode::Creating);
        assert_eq!(FormMode::from_route_id(Some(0)), FormMode::Creating);
        assert_eq!(FormMode::from_route_id(Some(7)), FormMode::Editing(7));
    }
}
