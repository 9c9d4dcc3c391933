//! Repository for the `borrowers` table.

use sqlx::postgres::PgExecutor;
use sqlx::PgPool;
use stockroom_core::types::DbId;

use crate::models::borrower::{Borrower, CreateBorrower, UpdateBorrower};

/// Column list for `borrowers` queries.
const COLUMNS: &str = "\
    id, full_name, department, contact_email, contact_phone, \
    created_at, updated_at";

/// Provides CRUD operations for borrowers.
pub struct BorrowerRepo;

impl BorrowerRepo {
    /// Insert a single borrower.
    pub async fn create<'e>(
        executor: impl PgExecutor<'e>,
        input: &CreateBorrower,
    ) -> Result<Borrower, sqlx::Error> {
        let query = format!(
            "INSERT INTO borrowers (full_name, department, contact_email, contact_phone) \
             VALUES ($1, $2, $3, $4) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Borrower>(&query)
            .bind(input.full_name.as_str())
            .bind(input.department.as_str())
            .bind(input.contact_email.as_deref())
            .bind(input.contact_phone.as_deref())
            .fetch_one(executor)
            .await
    }

    /// Insert several borrowers in one transaction. Either all rows are
    /// created or none are.
    pub async fn create_many(
        pool: &PgPool,
        inputs: &[CreateBorrower],
    ) -> Result<Vec<Borrower>, sqlx::Error> {
        let mut tx = pool.begin().await?;
        let mut created = Vec::with_capacity(inputs.len());
        for input in inputs {
            created.push(Self::create(&mut *tx, input).await?);
        }
        tx.commit().await?;
        Ok(created)
    }

    /// Find a borrower by ID.
    pub async fn find_by_id<'e>(
        executor: impl PgExecutor<'e>,
        id: DbId,
    ) -> Result<Option<Borrower>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM borrowers WHERE id = $1");
        sqlx::query_as::<_, Borrower>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// Find a borrower by contact email.
    pub async fn find_by_email(
        pool: &PgPool,
        email: &str,
    ) -> Result<Option<Borrower>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM borrowers WHERE contact_email = $1");
        sqlx::query_as::<_, Borrower>(&query)
            .bind(email.trim())
            .fetch_optional(pool)
            .await
    }

    /// Fetch several borrowers by ID, in no particular order.
    pub async fn find_many<'e>(
        executor: impl PgExecutor<'e>,
        ids: &[DbId],
    ) -> Result<Vec<Borrower>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM borrowers WHERE id = ANY($1)");
        sqlx::query_as::<_, Borrower>(&query)
            .bind(ids)
            .fetch_all(executor)
            .await
    }

    /// List all borrowers, newest first.
    pub async fn list(pool: &PgPool) -> Result<Vec<Borrower>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM borrowers ORDER BY created_at DESC, id DESC");
        sqlx::query_as::<_, Borrower>(&query).fetch_all(pool).await
    }

    /// Update a borrower. Omitted fields keep their value; contact fields
    /// are overwritten, possibly with `NULL`, whenever they are present.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateBorrower,
    ) -> Result<Option<Borrower>, sqlx::Error> {
        let query = format!(
            "UPDATE borrowers SET \
                full_name = COALESCE($2, full_name), \
                department = COALESCE($3, department), \
                contact_email = CASE WHEN $4 THEN $5 ELSE contact_email END, \
                contact_phone = CASE WHEN $6 THEN $7 ELSE contact_phone END \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Borrower>(&query)
            .bind(id)
            .bind(input.full_name.as_deref())
            .bind(input.department.as_deref())
            .bind(input.contact_email.is_some())
            .bind(input.contact_email.clone().flatten())
            .bind(input.contact_phone.is_some())
            .bind(input.contact_phone.clone().flatten())
            .fetch_optional(pool)
            .await
    }

    /// Delete a borrower by ID. Returns true if a row was deleted.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM borrowers WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
