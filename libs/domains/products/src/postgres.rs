use async_trait::async_trait;
use sea_orm::ActiveValue::Set;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, SqlErr,
};

use crate::{
    entity,
    error::{ProductError, ProductResult},
    models::{Product, SortField},
    repository::ProductRepository,
};

/// Moves the id sequence past explicitly inserted ids so later
/// server-assigned ids do not collide with them.
const SYNC_ID_SEQUENCE: &str = "SELECT setval(pg_get_serial_sequence('products', 'id'), \
     GREATEST((SELECT MAX(id) FROM products), 1))";

/// PostgreSQL-backed repository. Each call borrows a pooled connection for
/// its own statement.
#[derive(Clone)]
pub struct PgProductRepository {
    db: DatabaseConnection,
}

impl PgProductRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn exists(&self, id: i32) -> ProductResult<bool> {
        let count = entity::Entity::find()
            .filter(entity::Column::Id.eq(id))
            .count(&self.db)
            .await?;
        Ok(count > 0)
    }
}

#[async_trait]
impl ProductRepository for PgProductRepository {
    async fn add(&self, product: Product) -> ProductResult<Product> {
        let explicit_id = (product.id != 0).then_some(product.id);

        if let Some(id) = explicit_id {
            if self.exists(id).await? {
                return Err(ProductError::Duplicate(id));
            }
        }

        let active_model: entity::ActiveModel = product.into();
        let model = active_model.insert(&self.db).await.map_err(|e| {
            match (e.sql_err(), explicit_id) {
                (Some(SqlErr::UniqueConstraintViolation(_)), Some(id)) => {
                    ProductError::Duplicate(id)
                }
                _ => ProductError::from(e),
            }
        })?;

        if explicit_id.is_some() {
            self.db.execute_unprepared(SYNC_ID_SEQUENCE).await?;
        }

        tracing::info!(product_id = model.id, category = %model.category, "Created product");
        Ok(model.into())
    }

    async fn get_all(&self) -> ProductResult<Vec<Product>> {
        let models = entity::Entity::find()
            .order_by_asc(entity::Column::Id)
            .all(&self.db)
            .await?;

        Ok(models.into_iter().map(Into::into).collect())
    }

    async fn get_by_id(&self, id: i32) -> ProductResult<Option<Product>> {
        let model = entity::Entity::find_by_id(id).one(&self.db).await?;
        Ok(model.map(Into::into))
    }

    async fn get_by_name(&self, name: &str) -> ProductResult<Vec<Product>> {
        let models = entity::Entity::find()
            .filter(entity::Column::Name.contains(name))
            .order_by_asc(entity::Column::Id)
            .all(&self.db)
            .await?;

        Ok(models.into_iter().map(Into::into).collect())
    }

    async fn get_by_category(&self, category: &str) -> ProductResult<Vec<Product>> {
        let models = entity::Entity::find()
            .filter(entity::Column::Category.eq(category))
            .order_by_asc(entity::Column::Id)
            .all(&self.db)
            .await?;

        Ok(models.into_iter().map(Into::into).collect())
    }

    async fn get_sorted(
        &self,
        sort: Option<SortField>,
        ascending: bool,
    ) -> ProductResult<Vec<Product>> {
        let mut query = entity::Entity::find();

        if let Some(field) = sort {
            let column = entity::Column::from(field);
            query = if ascending {
                query.order_by_asc(column)
            } else {
                query.order_by_desc(column)
            };
        }

        // Ties (and the unsorted case) fall back to id order
        let models = query
            .order_by_asc(entity::Column::Id)
            .all(&self.db)
            .await?;

        Ok(models.into_iter().map(Into::into).collect())
    }

    async fn count(&self) -> ProductResult<u64> {
        Ok(entity::Entity::find().count(&self.db).await?)
    }

    async fn update(&self, id: i32, product: Product) -> ProductResult<bool> {
        if product.id != id {
            return Ok(false);
        }

        let active_model = entity::ActiveModel {
            id: Set(id),
            name: Set(product.name),
            description: Set(product.description),
            category: Set(product.category),
            price: Set(product.price),
        };

        match active_model.update(&self.db).await {
            Ok(_) => {
                tracing::info!(product_id = id, "Updated product");
                Ok(true)
            }
            // Zero rows touched: the row is gone, or something else is
            // writing it concurrently.
            Err(DbErr::RecordNotUpdated) => {
                if self.exists(id).await? {
                    tracing::error!(product_id = id, "Update matched no rows but product exists");
                    Err(ProductError::Database(DbErr::RecordNotUpdated))
                } else {
                    tracing::info!(product_id = id, "Update target not found");
                    Ok(false)
                }
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn delete_by_id(&self, id: i32) -> ProductResult<bool> {
        let result = entity::Entity::delete_by_id(id).exec(&self.db).await?;

        if result.rows_affected > 0 {
            tracing::info!(product_id = id, "Deleted product");
            Ok(true)
        } else {
            Ok(false)
        }
    }

    async fn delete_all(&self) -> ProductResult<u64> {
        let result = entity::Entity::delete_many().exec(&self.db).await?;

        tracing::info!(removed = result.rows_affected, "Deleted all products");
        Ok(result.rows_affected)
    }
}
