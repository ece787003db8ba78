// src/services/catalog_service.rs

use crate::{
    common::{
        error::AppError,
        validation::{field_error, require_not_blank, validate_positive_decimal},
    },
    db::CatalogRepository,
    models::inventory::{Category, NewProduct, Product, ProductChanges, ProductView},
};
use rust_decimal::Decimal;
use sqlx::{Acquire, Executor, Postgres};
use uuid::Uuid;

#[derive(Clone)]
pub struct CatalogService {
    catalog_repo: CatalogRepository,
}

fn require_positive_price(price: &Decimal) -> Result<(), AppError> {
    validate_positive_decimal(price)
        .map_err(|_| field_error("price", "range", "The price must be greater than zero."))
}

impl CatalogService {
    pub fn new(catalog_repo: CatalogRepository) -> Self {
        Self { catalog_repo }
    }

    // ---
    // CATEGORIAS
    // ---

    pub async fn list_categories<'e, E>(
        &self,
        executor: E,
        association_id: Uuid,
    ) -> Result<Vec<Category>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        self.catalog_repo.get_all_categories(executor, association_id).await
    }

    pub async fn get_category<'e, E>(
        &self,
        executor: E,
        association_id: Uuid,
        category_id: Uuid,
    ) -> Result<Category, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        self.catalog_repo
            .find_category(executor, association_id, category_id)
            .await?
            .ok_or(AppError::CategoryNotFound)
    }

    pub async fn create_category<'e, E>(
        &self,
        executor: E,
        association_id: Uuid,
        name: &str,
        description: Option<&str>,
    ) -> Result<Category, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        require_not_blank("name", name)?;

        let category = self
            .catalog_repo
            .create_category(executor, association_id, name.trim(), description.unwrap_or_default())
            .await?;

        tracing::info!("📁 Categoria {} criada na associação {}", category.id, association_id);
        Ok(category)
    }

    pub async fn update_category<'e, E>(
        &self,
        executor: E,
        association_id: Uuid,
        category_id: Uuid,
        name: &str,
        description: Option<&str>,
    ) -> Result<Category, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        require_not_blank("name", name)?;

        self.catalog_repo
            .update_category(executor, association_id, category_id, name.trim(), description)
            .await?
            .ok_or(AppError::CategoryNotFound)
    }

    pub async fn delete_category<'e, E>(
        &self,
        executor: E,
        association_id: Uuid,
        category_id: Uuid,
    ) -> Result<Category, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let deleted = self
            .catalog_repo
            .delete_category(executor, association_id, category_id)
            .await?
            .ok_or(AppError::CategoryNotFound)?;

        tracing::info!("🗑️ Categoria {} removida da associação {}", category_id, association_id);
        Ok(deleted)
    }

    // ---
    // PRODUTOS
    // ---

    pub async fn list_products<'e, E>(
        &self,
        executor: E,
        association_id: Uuid,
    ) -> Result<Vec<ProductView>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        self.catalog_repo.get_all_products(executor, association_id).await
    }

    pub async fn get_product<'e, E>(
        &self,
        executor: E,
        association_id: Uuid,
        product_id: Uuid,
    ) -> Result<ProductView, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        self.catalog_repo
            .find_product_view(executor, association_id, product_id)
            .await?
            .ok_or(AppError::ProductNotFound)
    }

    /// Cria um produto com estoque 0. A categoria precisa ser da mesma associação;
    /// a checagem e o insert rodam na mesma transação.
    pub async fn create_product<'e, E>(
        &self,
        executor: E,
        association_id: Uuid,
        new_product: NewProduct,
    ) -> Result<Product, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        require_not_blank("name", &new_product.name)?;
        require_positive_price(&new_product.price)?;

        let new_product = NewProduct {
            name: new_product.name.trim().to_string(),
            ..new_product
        };

        let mut tx = executor.begin().await?;

        self.catalog_repo
            .find_category(&mut *tx, association_id, new_product.category_id)
            .await?
            .ok_or(AppError::CategoryNotFound)?;

        let product = self
            .catalog_repo
            .create_product(&mut *tx, association_id, &new_product)
            .await?;

        tx.commit().await?;

        tracing::info!("📦 Produto {} ({}) criado na associação {}", product.id, product.name, association_id);
        Ok(product)
    }

    pub async fn update_product<'e, E>(
        &self,
        executor: E,
        association_id: Uuid,
        product_id: Uuid,
        changes: ProductChanges,
    ) -> Result<Product, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        require_not_blank("name", &changes.name)?;
        require_positive_price(&changes.price)?;

        let changes = ProductChanges {
            name: changes.name.trim().to_string(),
            ..changes
        };

        self.catalog_repo
            .update_product(executor, association_id, product_id, &changes)
            .await?
            .ok_or(AppError::ProductNotFound)
    }

    /// Devolve o produto removido para que o chamador limpe a imagem, se houver.
    pub async fn delete_product<'e, E>(
        &self,
        executor: E,
        association_id: Uuid,
        product_id: Uuid,
    ) -> Result<Product, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let deleted = self
            .catalog_repo
            .delete_product(executor, association_id, product_id)
            .await?
            .ok_or(AppError::ProductNotFound)?;

        tracing::info!("🗑️ Produto {} removido da associação {}", product_id, association_id);
        Ok(deleted)
    }
}
