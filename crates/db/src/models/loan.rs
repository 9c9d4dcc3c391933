//! Loan ledger models and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use stockroom_core::asset_status::AssetStatus;
use stockroom_core::loans::LoanState;
use stockroom_core::text;
use stockroom_core::timestamps::lenient_timestamp;
use stockroom_core::types::{DbId, Timestamp};
use validator::Validate;

use super::asset::Asset;
use super::borrower::Borrower;

/// A row from the `loans` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Loan {
    pub id: DbId,
    pub asset_id: DbId,
    pub borrower_id: DbId,
    pub borrowed_at: Timestamp,
    /// Return time once returned; for an active loan, the expected return
    /// date if one was given at checkout.
    pub returned_at: Option<Timestamp>,
    #[sqlx(try_from = "String")]
    pub state: LoanState,
    pub notes: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A loan with its asset and borrower resolved for display.
#[derive(Debug, Clone, Serialize)]
pub struct LoanDetail {
    #[serde(flatten)]
    pub loan: Loan,
    pub asset: Asset,
    pub borrower: Borrower,
}

/// DTO for recording a new loan.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct CreateLoan {
    #[validate(range(min = 1, message = "asset_id must be a positive id"))]
    pub asset_id: DbId,
    #[validate(range(min = 1, message = "borrower_id must be a positive id"))]
    pub borrower_id: DbId,
    #[serde(default, deserialize_with = "lenient_timestamp::optional")]
    pub expected_return_at: Option<Timestamp>,
    #[serde(default, deserialize_with = "text::blank_as_none")]
    pub notes: Option<String>,
}

/// DTO for updating a loan (mark returned, correct a return, edit notes).
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct UpdateLoan {
    pub state: Option<LoanState>,
    #[serde(default, deserialize_with = "lenient_timestamp::optional")]
    pub returned_at: Option<Timestamp>,
    /// `null` or `""` clears the notes.
    #[serde(default, deserialize_with = "text::nullable")]
    pub notes: Option<Option<String>>,
}

/// Query parameters for listing loans.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoanListParams {
    pub asset_id: Option<DbId>,
    pub borrower_id: Option<DbId>,
}

/// Outcome of deleting a loan.
#[derive(Debug, Clone, Serialize)]
pub struct LoanDeletion {
    /// The row as it was before deletion.
    pub loan: Loan,
    /// The asset's status after the deletion committed.
    pub asset_status: AssetStatus,
}
