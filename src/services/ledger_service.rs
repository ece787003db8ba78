// src/services/ledger_service.rs

use std::collections::{BTreeMap, HashMap, HashSet};

use crate::{
    common::{
        error::AppError,
        validation::{field_error, require_positive_quantity},
    },
    db::LedgerRepository,
    models::{
        inventory::Product,
        ledger::{DonationItem, DonationRequest, TransactionType, TransactionView},
    },
};
use sqlx::{Acquire, Executor, PgConnection, Postgres};
use uuid::Uuid;

#[derive(Clone)]
pub struct LedgerService {
    ledger_repo: LedgerRepository,
}

fn insufficient(product: &Product, requested: i32) -> AppError {
    AppError::InsufficientStock {
        product_id: product.id,
        product_name: product.name.clone(),
        available: product.quantity,
        requested,
        unit: product.unit.clone(),
    }
}

/// Fase de validação da doação (pura, sem I/O).
///
/// Recebe as linhas do pedido e os produtos encontrados na associação e devolve
/// o total a baixar por produto, em ordem crescente de id (ordem estável de locks).
/// Linhas repetidas do mesmo produto são somadas antes da checagem de saldo.
pub fn plan_donation(
    items: &[DonationItem],
    products: &HashMap<Uuid, Product>,
) -> Result<BTreeMap<Uuid, i32>, AppError> {
    let mut seen = HashSet::new();
    let unknown: Vec<Uuid> = items
        .iter()
        .map(|item| item.product_id)
        .filter(|id| !products.contains_key(id) && seen.insert(*id))
        .collect();

    if !unknown.is_empty() {
        return Err(AppError::UnknownProducts(unknown));
    }

    let mut totals: BTreeMap<Uuid, i64> = BTreeMap::new();
    for item in items {
        *totals.entry(item.product_id).or_default() += i64::from(item.quantity);
    }

    // O erro cita o primeiro item (na ordem do pedido) sem saldo
    for item in items {
        let product = &products[&item.product_id];
        let requested = totals[&item.product_id];
        if requested > i64::from(product.quantity) {
            let requested = i32::try_from(requested).unwrap_or(i32::MAX);
            return Err(insufficient(product, requested));
        }
    }

    // Cada total cabe em i32: é <= product.quantity
    Ok(totals
        .into_iter()
        .map(|(id, total)| (id, total as i32))
        .collect())
}

fn clean_recipient(value: Option<&str>) -> String {
    value.map(str::trim).unwrap_or_default().to_string()
}

impl LedgerService {
    pub fn new(ledger_repo: LedgerRepository) -> Self {
        Self { ledger_repo }
    }

    // Baixa condicional; se nada mudou, relê o produto para saber o motivo.
    async fn take_stock(
        &self,
        conn: &mut PgConnection,
        association_id: Uuid,
        product_id: Uuid,
        quantity: i32,
    ) -> Result<Product, AppError> {
        if let Some(product) = self
            .ledger_repo
            .decrement_if_available(&mut *conn, association_id, product_id, quantity)
            .await?
        {
            return Ok(product);
        }

        let current = self
            .ledger_repo
            .find_product(&mut *conn, association_id, product_id)
            .await?
            .ok_or(AppError::ProductNotFound)?;

        tracing::warn!(
            "⚠️ Estoque insuficiente: produto {} tem {}, pedido {}",
            product_id, current.quantity, quantity
        );
        Err(insufficient(&current, quantity))
    }

    // --- RECEIVE (ENTRADA) ---
    pub async fn receive<'e, E>(
        &self,
        executor: E,
        association_id: Uuid,
        product_id: Uuid,
        quantity: i32,
    ) -> Result<Product, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        require_positive_quantity("quantity", quantity)?;

        let mut tx = executor.begin().await?;

        let product = match self
            .ledger_repo
            .increment_quantity(&mut *tx, association_id, product_id, quantity)
            .await?
        {
            Some(product) => product,
            None => {
                let current = self
                    .ledger_repo
                    .find_product(&mut *tx, association_id, product_id)
                    .await?
                    .ok_or(AppError::ProductNotFound)?;

                tracing::warn!(
                    "⚠️ Entrada recusada: produto {} tem {}, somar {} estoura o limite",
                    product_id, current.quantity, quantity
                );
                return Err(field_error(
                    "quantity",
                    "range",
                    "The resulting stock would exceed the maximum quantity (2147483647).",
                ));
            }
        };

        self.ledger_repo
            .record_transaction(&mut *tx, association_id, product_id, TransactionType::Add, quantity, None, None)
            .await?;

        tx.commit().await?;

        tracing::info!(
            "📥 Entrada de {} {} em {} (saldo {})",
            quantity, product.unit, product.name, product.quantity
        );
        Ok(product)
    }

    // --- ISSUE (SAÍDA) ---
    pub async fn issue<'e, E>(
        &self,
        executor: E,
        association_id: Uuid,
        product_id: Uuid,
        quantity: i32,
    ) -> Result<Product, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        require_positive_quantity("quantity", quantity)?;

        let mut tx = executor.begin().await?;

        let product = self
            .take_stock(&mut tx, association_id, product_id, quantity)
            .await?;

        self.ledger_repo
            .record_transaction(&mut *tx, association_id, product_id, TransactionType::Remove, quantity, None, None)
            .await?;

        tx.commit().await?;

        tracing::info!(
            "📤 Saída de {} {} de {} (saldo {})",
            quantity, product.unit, product.name, product.quantity
        );
        Ok(product)
    }

    // --- DONATE (DOAÇÃO) ---
    /// Tudo ou nada: valida todos os itens, aplica todas as baixas e grava
    /// uma transação GIVE por item, na mesma transação do banco.
    /// Devolve as transações criadas na ordem do pedido.
    pub async fn donate<'e, E>(
        &self,
        executor: E,
        association_id: Uuid,
        request: DonationRequest,
    ) -> Result<Vec<TransactionView>, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        if request.items.is_empty() {
            return Err(field_error("items", "length", "At least one item is required."));
        }
        if request.items.iter().any(|item| item.quantity <= 0) {
            return Err(field_error("items", "range", "Every quantity must be a positive integer."));
        }

        let recipient_name = clean_recipient(request.recipient_name.as_deref());
        let recipient_info = clean_recipient(request.recipient_info.as_deref());

        let mut tx = executor.begin().await?;

        // 1. Validação (nada é escrito antes de todos os itens passarem)
        let ids: Vec<Uuid> = request
            .items
            .iter()
            .map(|item| item.product_id)
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();

        let products: HashMap<Uuid, Product> = self
            .ledger_repo
            .find_products(&mut *tx, association_id, &ids)
            .await?
            .into_iter()
            .map(|product| (product.id, product))
            .collect();

        let plan = plan_donation(&request.items, &products)?;

        // 2. Baixas, em ordem de id. Uma corrida com outra saída aborta o lote inteiro.
        for (product_id, quantity) in &plan {
            self.take_stock(&mut tx, association_id, *product_id, *quantity)
                .await?;
        }

        // 3. Uma linha GIVE por item, na ordem do pedido
        let mut transaction_ids = Vec::with_capacity(request.items.len());
        for item in &request.items {
            let transaction = self
                .ledger_repo
                .record_transaction(
                    &mut *tx,
                    association_id,
                    item.product_id,
                    TransactionType::Give,
                    item.quantity,
                    Some(recipient_name.as_str()),
                    Some(recipient_info.as_str()),
                )
                .await?;
            transaction_ids.push(transaction.id);
        }

        let mut views: HashMap<Uuid, TransactionView> = self
            .ledger_repo
            .find_transaction_views(&mut *tx, association_id, &transaction_ids)
            .await?
            .into_iter()
            .map(|view| (view.transaction.id, view))
            .collect();

        tx.commit().await?;

        tracing::info!(
            "🎁 Doação registrada: {} itens para '{}' na associação {}",
            transaction_ids.len(), recipient_name, association_id
        );

        Ok(transaction_ids
            .iter()
            .filter_map(|id| views.remove(id))
            .collect())
    }
}
