// src/services/tenancy_service.rs

use crate::{
    common::{error::AppError, validation::field_error},
    db::TenantRepository,
    models::tenancy::Association,
};
use sqlx::{Acquire, Executor, Postgres};

#[derive(Clone)]
pub struct TenantService {
    tenant_repo: TenantRepository,
}

/// E-mails são comparados sem espaços e em minúsculas.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Nome padrão de uma associação nova: a parte local do e-mail.
pub fn default_name(email: &str) -> String {
    email.split('@').next().unwrap_or(email).to_string()
}

impl TenantService {
    pub fn new(tenant_repo: TenantRepository) -> Self {
        Self { tenant_repo }
    }

    /// Devolve a associação do e-mail, criando-a no primeiro acesso.
    /// Idempotente: duas chamadas com o mesmo e-mail devolvem o mesmo `id`.
    /// Associação existente = só uma leitura, sem escrita nem lock de linha.
    pub async fn resolve<'e, A>(
        &self,
        db: A,
        email: &str,
        name: Option<&str>,
    ) -> Result<Association, AppError>
    where
        A: Acquire<'e, Database = Postgres>,
    {
        let email = normalize_email(email);
        if email.is_empty() {
            return Err(field_error("email", "required", "The e-mail is required."));
        }

        let mut conn = db.acquire().await?;

        if let Some(association) = self.find_by_email(&mut *conn, &email).await? {
            return Ok(association);
        }

        let name = name
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| default_name(&email));

        if let Some(association) = self
            .tenant_repo
            .insert_if_absent(&mut *conn, &email, &name)
            .await?
        {
            tracing::info!("🏠 Associação {} criada para {}", association.id, email);
            return Ok(association);
        }

        // Criada por uma requisição concorrente entre a leitura e o INSERT
        self.tenant_repo
            .find_by_email(&mut *conn, &email)
            .await?
            .ok_or(AppError::AssociationNotFound)
    }

    pub async fn find_by_email<'e, E>(
        &self,
        executor: E,
        email: &str,
    ) -> Result<Option<Association>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        self.tenant_repo
            .find_by_email(executor, &normalize_email(email))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn emails_are_trimmed_and_lowercased() {
        assert_eq!(normalize_email("  Amina@Example.ORG "), "amina@example.org");
    }

    #[test]
    fn default_name_is_local_part() {
        assert_eq!(default_name("food.bank@example.org"), "food.bank");
        assert_eq!(default_name("no-at-sign"), "no-at-sign");
    }
}
