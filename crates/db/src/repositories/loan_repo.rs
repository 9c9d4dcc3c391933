//! Repository for the `loans` table and the borrow/return lifecycle.
//!
//! `create`, `update`, and `delete` each run in a single transaction that
//! also writes the loan's asset, so `assets.status` and the ledger commit or
//! roll back together. Each of them locks the asset row before touching the
//! loan row, which keeps concurrent operations on one asset from both seeing
//! it as available.

use std::collections::HashMap;

use chrono::Utc;
use sqlx::postgres::PgExecutor;
use sqlx::{PgConnection, PgPool};
use stockroom_core::asset_status::AssetStatus;
use stockroom_core::error::CoreError;
use stockroom_core::loans::{check_can_lend, plan_delete, plan_update, LoanState};
use stockroom_core::types::DbId;

use crate::error::LedgerError;
use crate::models::loan::{
    CreateLoan, Loan, LoanDeletion, LoanDetail, LoanListParams, UpdateLoan,
};
use crate::repositories::{AssetRepo, BorrowerRepo};

/// Column list for `loans` queries.
const COLUMNS: &str = "\
    id, asset_id, borrower_id, borrowed_at, returned_at, state, notes, \
    created_at, updated_at";

/// Provides the loan ledger and its lifecycle transitions.
pub struct LoanRepo;

impl LoanRepo {
    // -----------------------------------------------------------------------
    // Lifecycle
    // -----------------------------------------------------------------------

    /// Record a new loan and mark its asset as on loan.
    ///
    /// Fails with `NotFound` if the asset or borrower is missing and with
    /// `Conflict` if the asset is already on loan. Nothing is written on
    /// failure.
    pub async fn create(pool: &PgPool, input: &CreateLoan) -> Result<LoanDetail, LedgerError> {
        let mut tx = pool.begin().await?;

        let asset = AssetRepo::lock_for_update(&mut *tx, input.asset_id)
            .await?
            .ok_or_else(|| LedgerError::not_found("Asset", input.asset_id))?;
        let borrower = BorrowerRepo::find_by_id(&mut *tx, input.borrower_id)
            .await?
            .ok_or_else(|| LedgerError::not_found("Borrower", input.borrower_id))?;

        let active = Self::count_active_for_asset(&mut *tx, asset.id, None).await?;
        check_can_lend(&asset.name, &asset.asset_tag, asset.status, active)?;

        let query = format!(
            "INSERT INTO loans (asset_id, borrower_id, borrowed_at, returned_at, state, notes) \
             VALUES ($1, $2, NOW(), $3, $4, $5) \
             RETURNING {COLUMNS}"
        );
        let loan = sqlx::query_as::<_, Loan>(&query)
            .bind(asset.id)
            .bind(borrower.id)
            .bind(input.expected_return_at)
            .bind(LoanState::Active.as_str())
            .bind(input.notes.as_deref())
            .fetch_one(&mut *tx)
            .await?;

        let asset = AssetRepo::set_status(&mut *tx, asset.id, AssetStatus::ON_LOAN).await?;

        tx.commit().await?;
        Ok(LoanDetail {
            loan,
            asset,
            borrower,
        })
    }

    /// Apply a partial update to a loan, moving its asset between available
    /// and on loan when the state changes.
    ///
    /// Reopening a returned loan fails with `Conflict` if the asset already
    /// has a different active loan.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateLoan,
    ) -> Result<LoanDetail, LedgerError> {
        let mut tx = pool.begin().await?;

        let asset_id = Self::asset_id_of(&mut *tx, id)
            .await?
            .ok_or_else(|| LedgerError::not_found("Loan", id))?;
        let asset = AssetRepo::lock_for_update(&mut *tx, asset_id)
            .await?
            .ok_or_else(|| LedgerError::not_found("Asset", asset_id))?;
        let current = Self::lock_for_update(&mut *tx, id)
            .await?
            .ok_or_else(|| LedgerError::not_found("Loan", id))?;

        let plan = plan_update(
            current.state,
            current.returned_at,
            input.state,
            input.returned_at,
            Utc::now(),
        );

        if plan.reactivates(current.state) {
            let others = Self::count_active_for_asset(&mut *tx, asset.id, Some(id)).await?;
            if others > 0 {
                return Err(CoreError::Conflict(format!(
                    "Asset \"{}\" ({}) already has another active loan",
                    asset.name, asset.asset_tag
                ))
                .into());
            }
        }

        let query = format!(
            "UPDATE loans SET \
                state = $2, \
                returned_at = $3, \
                notes = CASE WHEN $4 THEN $5 ELSE notes END \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        let loan = sqlx::query_as::<_, Loan>(&query)
            .bind(id)
            .bind(plan.state.as_str())
            .bind(plan.returned_at)
            .bind(input.notes.is_some())
            .bind(input.notes.clone().flatten())
            .fetch_one(&mut *tx)
            .await?;

        let asset = match plan.asset_effect.target_status() {
            Some(status) => AssetRepo::set_status(&mut *tx, asset.id, status).await?,
            None => asset,
        };
        let borrower = BorrowerRepo::find_by_id(&mut *tx, loan.borrower_id)
            .await?
            .ok_or_else(|| LedgerError::not_found("Borrower", loan.borrower_id))?;

        tx.commit().await?;
        Ok(LoanDetail {
            loan,
            asset,
            borrower,
        })
    }

    /// Delete a loan and recompute its asset's availability.
    ///
    /// Deleting an active loan frees the asset only if no other active loan
    /// for it remains.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<LoanDeletion, LedgerError> {
        let mut tx = pool.begin().await?;

        let asset_id = Self::asset_id_of(&mut *tx, id)
            .await?
            .ok_or_else(|| LedgerError::not_found("Loan", id))?;
        let asset = AssetRepo::lock_for_update(&mut *tx, asset_id)
            .await?
            .ok_or_else(|| LedgerError::not_found("Asset", asset_id))?;

        let query = format!("DELETE FROM loans WHERE id = $1 RETURNING {COLUMNS}");
        let loan = sqlx::query_as::<_, Loan>(&query)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| LedgerError::not_found("Loan", id))?;

        let remaining = Self::count_active_for_asset(&mut *tx, asset.id, None).await?;
        let asset_status = match plan_delete(loan.state, remaining).target_status() {
            Some(status) => AssetRepo::set_status(&mut *tx, asset.id, status).await?.status,
            None => asset.status,
        };

        tx.commit().await?;
        Ok(LoanDeletion { loan, asset_status })
    }

    // -----------------------------------------------------------------------
    // Reads
    // -----------------------------------------------------------------------

    /// Find a loan row by ID.
    pub async fn find_by_id<'e>(
        executor: impl PgExecutor<'e>,
        id: DbId,
    ) -> Result<Option<Loan>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM loans WHERE id = $1");
        sqlx::query_as::<_, Loan>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// Find a loan by ID with its asset and borrower resolved.
    pub async fn find_detail(pool: &PgPool, id: DbId) -> Result<Option<LoanDetail>, LedgerError> {
        let mut conn = pool.acquire().await?;
        let Some(loan) = Self::find_by_id(&mut *conn, id).await? else {
            return Ok(None);
        };
        Ok(Self::with_relations(&mut *conn, vec![loan]).await?.pop())
    }

    /// List loans, most recent borrow first, optionally narrowed to one
    /// asset and/or one borrower.
    pub async fn list(
        pool: &PgPool,
        params: &LoanListParams,
    ) -> Result<Vec<LoanDetail>, LedgerError> {
        let query = format!(
            "SELECT {COLUMNS} FROM loans \
             WHERE ($1::BIGINT IS NULL OR asset_id = $1) \
               AND ($2::BIGINT IS NULL OR borrower_id = $2) \
             ORDER BY borrowed_at DESC, id DESC"
        );
        let mut conn = pool.acquire().await?;
        let loans = sqlx::query_as::<_, Loan>(&query)
            .bind(params.asset_id)
            .bind(params.borrower_id)
            .fetch_all(&mut *conn)
            .await?;
        Self::with_relations(&mut *conn, loans).await
    }

    /// Count all loans (any state) that reference a borrower.
    pub async fn count_for_borrower(pool: &PgPool, borrower_id: DbId) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM loans WHERE borrower_id = $1")
            .bind(borrower_id)
            .fetch_one(pool)
            .await?;
        Ok(count)
    }

    /// Count all loans (any state) that reference an asset.
    pub async fn count_for_asset(pool: &PgPool, asset_id: DbId) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM loans WHERE asset_id = $1")
            .bind(asset_id)
            .fetch_one(pool)
            .await?;
        Ok(count)
    }

    /// Count active loans on an asset, optionally ignoring one loan.
    pub async fn count_active_for_asset<'e>(
        executor: impl PgExecutor<'e>,
        asset_id: DbId,
        excluding: Option<DbId>,
    ) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM loans \
             WHERE asset_id = $1 AND state = $2 \
               AND ($3::BIGINT IS NULL OR id <> $3)",
        )
        .bind(asset_id)
        .bind(LoanState::Active.as_str())
        .bind(excluding)
        .fetch_one(executor)
        .await?;
        Ok(count)
    }

    // -----------------------------------------------------------------------
    // Helpers
    // -----------------------------------------------------------------------

    async fn asset_id_of<'e>(
        executor: impl PgExecutor<'e>,
        id: DbId,
    ) -> Result<Option<DbId>, sqlx::Error> {
        let row: Option<(DbId,)> = sqlx::query_as("SELECT asset_id FROM loans WHERE id = $1")
            .bind(id)
            .fetch_optional(executor)
            .await?;
        Ok(row.map(|(asset_id,)| asset_id))
    }

    async fn lock_for_update<'e>(
        executor: impl PgExecutor<'e>,
        id: DbId,
    ) -> Result<Option<Loan>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM loans WHERE id = $1 FOR UPDATE");
        sqlx::query_as::<_, Loan>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// Attach assets and borrowers to loans, preserving the input order.
    ///
    /// Foreign keys guarantee both sides exist, so a missing relation is an
    /// internal error rather than a row to skip.
    async fn with_relations(
        conn: &mut PgConnection,
        loans: Vec<Loan>,
    ) -> Result<Vec<LoanDetail>, LedgerError> {
        if loans.is_empty() {
            return Ok(Vec::new());
        }

        let asset_ids: Vec<DbId> = loans.iter().map(|l| l.asset_id).collect();
        let borrower_ids: Vec<DbId> = loans.iter().map(|l| l.borrower_id).collect();

        let assets: HashMap<DbId, _> = AssetRepo::find_many(&mut *conn, &asset_ids)
            .await?
            .into_iter()
            .map(|a| (a.id, a))
            .collect();
        let borrowers: HashMap<DbId, _> = BorrowerRepo::find_many(&mut *conn, &borrower_ids)
            .await?
            .into_iter()
            .map(|b| (b.id, b))
            .collect();

        loans
            .into_iter()
            .map(|loan| -> Result<LoanDetail, LedgerError> {
                let asset = assets.get(&loan.asset_id).cloned().ok_or_else(|| {
                    dangling(loan.id, "asset", loan.asset_id)
                })?;
                let borrower = borrowers.get(&loan.borrower_id).cloned().ok_or_else(|| {
                    dangling(loan.id, "borrower", loan.borrower_id)
                })?;
                Ok(LoanDetail {
                    loan,
                    asset,
                    borrower,
                })
            })
            .collect()
    }
}

fn dangling(loan_id: DbId, relation: &str, relation_id: DbId) -> LedgerError {
    CoreError::Internal(format!(
        "Loan {loan_id} references missing {relation} {relation_id}"
    ))
    .into()
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn missing_relation_is_an_internal_error() {
        let err = dangling(7, "asset", 3);
        assert_matches!(
            err,
            LedgerError::Core(CoreError::Internal(msg)) if msg == "Loan 7 references missing asset 3"
        );
    }
}
