// src/db/catalog_repo.rs

use sqlx::{Executor, Postgres};
use uuid::Uuid;
use crate::{
    common::error::AppError,
    models::inventory::{Category, NewProduct, Product, ProductChanges, ProductView},
};

// Todas as consultas filtram por `association_id`:
// um id de outra associação se comporta como um id inexistente.
#[derive(Clone, Default)]
pub struct CatalogRepository;

const PRODUCT_VIEW_SELECT: &str = r#"
    SELECT p.*, c.name AS category_name
    FROM products p
    LEFT JOIN categories c ON c.id = p.category_id
"#;

impl CatalogRepository {
    pub fn new() -> Self {
        Self
    }

    // ---
    // Categorias
    // ---

    pub async fn get_all_categories<'e, E>(
        &self,
        executor: E,
        association_id: Uuid,
    ) -> Result<Vec<Category>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let categories = sqlx::query_as::<_, Category>(
            "SELECT * FROM categories WHERE association_id = $1 ORDER BY name ASC",
        )
            .bind(association_id)
            .fetch_all(executor)
            .await?;
        Ok(categories)
    }

    pub async fn find_category<'e, E>(
        &self,
        executor: E,
        association_id: Uuid,
        category_id: Uuid,
    ) -> Result<Option<Category>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let category = sqlx::query_as::<_, Category>(
            "SELECT * FROM categories WHERE id = $1 AND association_id = $2",
        )
            .bind(category_id)
            .bind(association_id)
            .fetch_optional(executor)
            .await?;
        Ok(category)
    }

    pub async fn create_category<'e, E>(
        &self,
        executor: E,
        association_id: Uuid,
        name: &str,
        description: &str,
    ) -> Result<Category, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let category = sqlx::query_as::<_, Category>(
            r#"
            INSERT INTO categories (association_id, name, description)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
            .bind(association_id)
            .bind(name)
            .bind(description)
            .fetch_one(executor)
            .await?;
        Ok(category)
    }

    /// `description = None` mantém a descrição atual.
    pub async fn update_category<'e, E>(
        &self,
        executor: E,
        association_id: Uuid,
        category_id: Uuid,
        name: &str,
        description: Option<&str>,
    ) -> Result<Option<Category>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let category = sqlx::query_as::<_, Category>(
            r#"
            UPDATE categories
            SET name = $3,
                description = COALESCE($4, description),
                updated_at = NOW()
            WHERE id = $1 AND association_id = $2
            RETURNING *
            "#,
        )
            .bind(category_id)
            .bind(association_id)
            .bind(name)
            .bind(description)
            .fetch_optional(executor)
            .await?;
        Ok(category)
    }

    // Os produtos da categoria ficam com category_id = NULL (FK ON DELETE SET NULL)
    pub async fn delete_category<'e, E>(
        &self,
        executor: E,
        association_id: Uuid,
        category_id: Uuid,
    ) -> Result<Option<Category>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let category = sqlx::query_as::<_, Category>(
            "DELETE FROM categories WHERE id = $1 AND association_id = $2 RETURNING *",
        )
            .bind(category_id)
            .bind(association_id)
            .fetch_optional(executor)
            .await?;
        Ok(category)
    }

    // ---
    // Produtos
    // ---

    pub async fn get_all_products<'e, E>(
        &self,
        executor: E,
        association_id: Uuid,
    ) -> Result<Vec<ProductView>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!("{PRODUCT_VIEW_SELECT} WHERE p.association_id = $1 ORDER BY p.name ASC, p.id ASC");
        let products = sqlx::query_as::<_, ProductView>(&sql)
            .bind(association_id)
            .fetch_all(executor)
            .await?;
        Ok(products)
    }

    pub async fn find_product_view<'e, E>(
        &self,
        executor: E,
        association_id: Uuid,
        product_id: Uuid,
    ) -> Result<Option<ProductView>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!("{PRODUCT_VIEW_SELECT} WHERE p.id = $1 AND p.association_id = $2");
        let product = sqlx::query_as::<_, ProductView>(&sql)
            .bind(product_id)
            .bind(association_id)
            .fetch_optional(executor)
            .await?;
        Ok(product)
    }

    /// Insere o produto com quantidade 0 (default da coluna).
    pub async fn create_product<'e, E>(
        &self,
        executor: E,
        association_id: Uuid,
        new_product: &NewProduct,
    ) -> Result<Product, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let product = sqlx::query_as::<_, Product>(
            r#"
            INSERT INTO products (association_id, category_id, name, description, price, unit, image_url)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
            .bind(association_id)
            .bind(new_product.category_id)
            .bind(&new_product.name)
            .bind(&new_product.description)
            .bind(new_product.price)
            .bind(&new_product.unit)
            .bind(&new_product.image_url)
            .fetch_one(executor)
            .await?;
        Ok(product)
    }

    // Nunca toca em quantity, category_id ou association_id.
    pub async fn update_product<'e, E>(
        &self,
        executor: E,
        association_id: Uuid,
        product_id: Uuid,
        changes: &ProductChanges,
    ) -> Result<Option<Product>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let product = sqlx::query_as::<_, Product>(
            r#"
            UPDATE products
            SET name = $3,
                description = COALESCE($4, description),
                price = $5,
                image_url = COALESCE($6, image_url),
                updated_at = NOW()
            WHERE id = $1 AND association_id = $2
            RETURNING *
            "#,
        )
            .bind(product_id)
            .bind(association_id)
            .bind(&changes.name)
            .bind(changes.description.as_deref())
            .bind(changes.price)
            .bind(changes.image_url.as_deref())
            .fetch_optional(executor)
            .await?;
        Ok(product)
    }

    /// Remove o produto. Se houver transações apontando para ele,
    /// o banco recusa (FK) e devolvemos `ProductHasHistory`.
    pub async fn delete_product<'e, E>(
        &self,
        executor: E,
        association_id: Uuid,
        product_id: Uuid,
    ) -> Result<Option<Product>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Product>(
            "DELETE FROM products WHERE id = $1 AND association_id = $2 RETURNING *",
        )
            .bind(product_id)
            .bind(association_id)
            .fetch_optional(executor)
            .await
            .map_err(|e| {
                if let sqlx::Error::Database(db_err) = &e {
                    if db_err.is_foreign_key_violation() {
                        return AppError::ProductHasHistory;
                    }
                }
                e.into()
            })
    }
}
