//! Borrower models and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use stockroom_core::text;
use stockroom_core::types::{DbId, Timestamp};
use validator::Validate;

/// A row from the `borrowers` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Borrower {
    pub id: DbId,
    pub full_name: String,
    pub department: String,
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for registering a borrower.
///
/// `Serialize` is required by the `length` rule on [`CreateBorrowers`].
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct CreateBorrower {
    #[serde(deserialize_with = "text::trimmed")]
    #[validate(length(min = 1, max = 255, message = "full_name must be 1-255 characters"))]
    pub full_name: String,
    #[serde(deserialize_with = "text::trimmed")]
    #[validate(length(min = 1, max = 255, message = "department must be 1-255 characters"))]
    pub department: String,
    #[serde(default, deserialize_with = "text::blank_as_none")]
    #[validate(email(message = "contact_email must be a valid email address"))]
    pub contact_email: Option<String>,
    #[serde(default, deserialize_with = "text::blank_as_none")]
    #[validate(length(max = 32, message = "contact_phone must be at most 32 characters"))]
    pub contact_phone: Option<String>,
}

/// DTO for registering several borrowers at once (a JSON array).
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(transparent)]
pub struct CreateBorrowers {
    #[validate(length(min = 1, message = "at least one borrower is required"))]
    #[validate(nested)]
    pub borrowers: Vec<CreateBorrower>,
}

/// DTO for updating a borrower. Omitted fields keep their value;
/// `contact_email` and `contact_phone` are cleared by `null` or `""`.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct UpdateBorrower {
    #[serde(default, deserialize_with = "text::trimmed_optional")]
    #[validate(length(min = 1, max = 255, message = "full_name must be 1-255 characters"))]
    pub full_name: Option<String>,
    #[serde(default, deserialize_with = "text::trimmed_optional")]
    #[validate(length(min = 1, max = 255, message = "department must be 1-255 characters"))]
    pub department: Option<String>,
    #[serde(default, deserialize_with = "text::nullable")]
    #[validate(email(message = "contact_email must be a valid email address"))]
    pub contact_email: Option<Option<String>>,
    #[serde(default, deserialize_with = "text::nullable")]
    #[validate(length(max = 32, message = "contact_phone must be at most 32 characters"))]
    pub contact_phone: Option<Option<String>>,
}
