use sea_orm::ActiveValue::{NotSet, Set};
use sea_orm::entity::prelude::*;

use crate::models::{Product, SortField};

/// Sea-ORM Entity for the products table
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "products")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    pub category: String,
    #[sea_orm(column_type = "Decimal(Some((18, 2)))")]
    pub price: Decimal,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Product {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            description: model.description,
            category: model.category,
            price: model.price,
        }
    }
}

/// Insert form: a zero id is left to the sequence.
impl From<Product> for ActiveModel {
    fn from(product: Product) -> Self {
        ActiveModel {
            id: if product.id == 0 {
                NotSet
            } else {
                Set(product.id)
            },
            name: Set(product.name),
            description: Set(product.description),
            category: Set(product.category),
            price: Set(product.price),
        }
    }
}

impl From<SortField> for Column {
    fn from(field: SortField) -> Self {
        match field {
            SortField::Name => Column::Name,
            SortField::Category => Column::Category,
            SortField::Price => Column::Price,
        }
    }
}
