// src/db/ledger_repo.rs

use sqlx::{Executor, Postgres};
use uuid::Uuid;
use crate::{
    common::error::AppError,
    models::{
        inventory::Product,
        ledger::{StockTransaction, TransactionType, TransactionView},
    },
};

// Transação + nomes do produto e da categoria (exibição / exportação)
pub(crate) const TRANSACTION_VIEW_SELECT: &str = r#"
    SELECT t.*,
           p.name AS product_name,
           p.unit AS product_unit,
           c.name AS category_name
    FROM stock_transactions t
    JOIN products p ON p.id = t.product_id
    LEFT JOIN categories c ON c.id = p.category_id
"#;

#[derive(Clone, Default)]
pub struct LedgerRepository;

impl LedgerRepository {
    pub fn new() -> Self {
        Self
    }

    // ---
    // Leitura
    // ---

    pub async fn find_product<'e, E>(
        &self,
        executor: E,
        association_id: Uuid,
        product_id: Uuid,
    ) -> Result<Option<Product>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let product = sqlx::query_as::<_, Product>(
            "SELECT * FROM products WHERE id = $1 AND association_id = $2",
        )
            .bind(product_id)
            .bind(association_id)
            .fetch_optional(executor)
            .await?;
        Ok(product)
    }

    /// Carrega os produtos da lista que pertencem à associação.
    /// Ids ausentes (ou de outra associação) simplesmente não voltam.
    pub async fn find_products<'e, E>(
        &self,
        executor: E,
        association_id: Uuid,
        product_ids: &[Uuid],
    ) -> Result<Vec<Product>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let products = sqlx::query_as::<_, Product>(
            "SELECT * FROM products WHERE association_id = $1 AND id = ANY($2)",
        )
            .bind(association_id)
            .bind(product_ids)
            .fetch_all(executor)
            .await?;
        Ok(products)
    }

    pub async fn find_transaction_views<'e, E>(
        &self,
        executor: E,
        association_id: Uuid,
        transaction_ids: &[Uuid],
    ) -> Result<Vec<TransactionView>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!("{TRANSACTION_VIEW_SELECT} WHERE t.association_id = $1 AND t.id = ANY($2)");
        let views = sqlx::query_as::<_, TransactionView>(&sql)
            .bind(association_id)
            .bind(transaction_ids)
            .fetch_all(executor)
            .await?;
        Ok(views)
    }

    // ---
    // Escrita (sempre dentro da transação do serviço)
    // ---

    /// Entrada condicional: só atualiza se o novo saldo cabe na coluna INTEGER.
    /// `None` = produto inexistente OU saldo estouraria (o chamador relê para distinguir).
    pub async fn increment_quantity<'e, E>(
        &self,
        executor: E,
        association_id: Uuid,
        product_id: Uuid,
        quantity: i32,
    ) -> Result<Option<Product>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let product = sqlx::query_as::<_, Product>(
            r#"
            UPDATE products
            SET quantity = quantity + $3, updated_at = NOW()
            WHERE id = $1 AND association_id = $2 AND quantity <= $4 - $3
            RETURNING *
            "#,
        )
            .bind(product_id)
            .bind(association_id)
            .bind(quantity)
            .bind(i32::MAX)
            .fetch_optional(executor)
            .await?;
        Ok(product)
    }

    /// Baixa condicional: só atualiza se houver saldo.
    /// `None` = produto inexistente OU saldo insuficiente (o chamador relê para distinguir).
    pub async fn decrement_if_available<'e, E>(
        &self,
        executor: E,
        association_id: Uuid,
        product_id: Uuid,
        quantity: i32,
    ) -> Result<Option<Product>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let product = sqlx::query_as::<_, Product>(
            r#"
            UPDATE products
            SET quantity = quantity - $3, updated_at = NOW()
            WHERE id = $1 AND association_id = $2 AND quantity >= $3
            RETURNING *
            "#,
        )
            .bind(product_id)
            .bind(association_id)
            .bind(quantity)
            .fetch_optional(executor)
            .await?;
        Ok(product)
    }

    pub async fn record_transaction<'e, E>(
        &self,
        executor: E,
        association_id: Uuid,
        product_id: Uuid,
        kind: TransactionType,
        quantity: i32,
        recipient_name: Option<&str>,
        recipient_info: Option<&str>,
    ) -> Result<StockTransaction, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let transaction = sqlx::query_as::<_, StockTransaction>(
            r#"
            INSERT INTO stock_transactions
                (association_id, product_id, type, quantity, recipient_name, recipient_info)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
            .bind(association_id)
            .bind(product_id)
            .bind(kind)
            .bind(quantity)
            .bind(recipient_name)
            .bind(recipient_info)
            .fetch_one(executor)
            .await?;
        Ok(transaction)
    }
}
