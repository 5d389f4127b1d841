//! # Finance Repository
//!
//! Persistence for manual income/expense bookkeeping entries. These are
//! operator-entered records; sales revenue is computed from transactions
//! and never duplicated here.

use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use kasir_core::FinanceRecord;

/// Repository for finance ledger database operations.
#[derive(Debug, Clone)]
pub struct FinanceRepository {
    pool: SqlitePool,
}

impl FinanceRepository {
    /// Creates a new FinanceRepository.
    pub fn new(pool: SqlitePool) -> Self {
        FinanceRepository { pool }
    }

    /// Lists all finance records, newest entry date first.
    pub async fn list(&self) -> DbResult<Vec<FinanceRecord>> {
        let records = sqlx::query_as::<_, FinanceRecord>(
            r#"
            SELECT id, kind, category, amount, description, date, created_at
            FROM finances
            ORDER BY date DESC, created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }

    /// Gets a single finance record by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<FinanceRecord>> {
        let record = sqlx::query_as::<_, FinanceRecord>(
            r#"
            SELECT id, kind, category, amount, description, date, created_at
            FROM finances
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }

    /// Inserts a new finance record.
    pub async fn insert(&self, record: &FinanceRecord) -> DbResult<()> {
        debug!(id = %record.id, kind = ?record.kind, "Inserting finance record");

        sqlx::query(
            r#"
            INSERT INTO finances (id, kind, category, amount, description, date, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
        )
        .bind(&record.id)
        .bind(record.kind)
        .bind(&record.category)
        .bind(record.amount)
        .bind(&record.description)
        .bind(record.date)
        .bind(record.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Updates an existing finance record.
    pub async fn update(&self, record: &FinanceRecord) -> DbResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE finances
            SET kind = ?2, category = ?3, amount = ?4, description = ?5, date = ?6
            WHERE id = ?1
            "#,
        )
        .bind(&record.id)
        .bind(record.kind)
        .bind(&record.category)
        .bind(record.amount)
        .bind(&record.description)
        .bind(record.date)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Finance record", &record.id));
        }

        Ok(())
    }

    /// Deletes a finance record.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        let result = sqlx::query("DELETE FROM finances WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Finance record", id));
        }

        Ok(())
    }
}

/// Generates a new unique finance record ID.
pub fn generate_finance_id() -> String {
    Uuid::new_v4().to_string()
}

// =============================================================================
// Unit Tests
// =============================================================================
