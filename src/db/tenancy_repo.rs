// src/db/tenancy_repo.rs

use sqlx::{Executor, Postgres};
use crate::common::error::AppError;
use crate::models::tenancy::Association;

#[derive(Clone, Default)]
pub struct TenantRepository;

impl TenantRepository {
    pub fn new() -> Self {
        Self
    }

    /// Busca a associação pelo e-mail (já normalizado).
    pub async fn find_by_email<'e, E>(
        &self,
        executor: E,
        email: &str,
    ) -> Result<Option<Association>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let association = sqlx::query_as::<_, Association>(
            "SELECT * FROM associations WHERE email = $1",
        )
            .bind(email)
            .fetch_optional(executor)
            .await?;

        Ok(association)
    }

    /// Cria a associação se o e-mail ainda não existe.
    /// `None` = outra requisição criou a mesma associação antes (conflito no e-mail).
    pub async fn insert_if_absent<'e, E>(
        &self,
        executor: E,
        email: &str,
        name: &str,
    ) -> Result<Option<Association>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let association = sqlx::query_as::<_, Association>(
            r#"
            INSERT INTO associations (email, name)
            VALUES ($1, $2)
            ON CONFLICT (email) DO NOTHING
            RETURNING *
            "#,
        )
            .bind(email)
            .bind(name)
            .fetch_optional(executor)
            .await?;

        Ok(association)
    }
}
