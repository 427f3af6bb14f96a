use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use strum::{Display, EnumString};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

/// A catalog entry.
///
/// `id` is optional on the wire. `0` (or omitted) asks the store to assign
/// one; any other value is inserted as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema, Validate)]
pub struct Product {
    #[serde(default)]
    pub id: i32,

    #[validate(length(min = 1, message = "name must not be empty"))]
    pub name: String,

    #[serde(default)]
    pub description: String,

    pub category: String,

    /// Currency amount, NUMERIC(18,2) in storage
    #[schema(value_type = f64, example = 19.99)]
    pub price: Decimal,
}

impl Product {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        category: impl Into<String>,
        price: Decimal,
    ) -> Self {
        Self {
            id: 0,
            name: name.into(),
            description: description.into(),
            category: category.into(),
            price,
        }
    }

    pub fn with_id(mut self, id: i32) -> Self {
        self.id = id;
        self
    }
}

/// Columns the list can be ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, ToSchema)]
#[strum(serialize_all = "lowercase")]
pub enum SortField {
    Name,
    Category,
    Price,
}

impl SortField {
    /// `None` for anything other than `name`, `category` or `price`.
    pub fn parse(raw: &str) -> Option<Self> {
        Self::from_str(raw).ok()
    }
}

/// `GET /products/search?name=`
#[derive(Debug, Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SearchQuery {
    /// Substring to look for in product names (case-sensitive)
    pub name: String,
}

/// `GET /products/sort?sortBy=&isAscending=`
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query, rename_all = "camelCase")]
pub struct SortQuery {
    /// `name`, `category` or `price`; anything else leaves the order unchanged
    #[serde(default)]
    pub sort_by: String,

    #[serde(default)]
    pub is_ascending: bool,
}

impl SortQuery {
    pub fn field(&self) -> Option<SortField> {
        SortField::parse(&self.sort_by)
    }
}
