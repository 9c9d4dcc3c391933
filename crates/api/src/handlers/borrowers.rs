//! Handlers for the `/borrowers` resource.

use std::collections::HashSet;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use stockroom_core::error::CoreError;
use stockroom_core::types::DbId;
use stockroom_db::models::borrower::{Borrower, CreateBorrower, CreateBorrowers, UpdateBorrower};
use stockroom_db::models::loan::{LoanDetail, LoanListParams};
use stockroom_db::repositories::{BorrowerRepo, LoanRepo};

use crate::error::{AppError, AppResult};
use crate::extract::ValidatedJson;
use crate::response::{DataResponse, Deleted};
use crate::state::AppState;

/// POST /api/v1/borrowers
pub async fn create(
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<CreateBorrower>,
) -> AppResult<(StatusCode, Json<DataResponse<Borrower>>)> {
    if let Some(email) = input.contact_email.as_deref() {
        ensure_email_free(&state, email, None).await?;
    }

    let borrower = BorrowerRepo::create(&state.pool, &input).await?;
    tracing::info!(borrower_id = borrower.id, "Borrower created");
    Ok((StatusCode::CREATED, Json(DataResponse { data: borrower })))
}

/// POST /api/v1/borrowers/bulk
///
/// Creates every borrower in the batch or none of them.
pub async fn create_bulk(
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<CreateBorrowers>,
) -> AppResult<(StatusCode, Json<DataResponse<Vec<Borrower>>>)> {
    let mut seen = HashSet::new();
    for email in input
        .borrowers
        .iter()
        .filter_map(|b| b.contact_email.as_deref())
    {
        if !seen.insert(email.to_string()) {
            return Err(AppError::Core(CoreError::Conflict(format!(
                "Email \"{email}\" appears more than once in the batch."
            ))));
        }
        ensure_email_free(&state, email, None).await?;
    }

    let borrowers = BorrowerRepo::create_many(&state.pool, &input.borrowers).await?;
    tracing::info!(count = borrowers.len(), "Borrowers imported");
    Ok((StatusCode::CREATED, Json(DataResponse { data: borrowers })))
}

/// GET /api/v1/borrowers
pub async fn list(State(state): State<AppState>) -> AppResult<Json<DataResponse<Vec<Borrower>>>> {
    let borrowers = BorrowerRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: borrowers }))
}

/// GET /api/v1/borrowers/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Borrower>>> {
    let borrower = BorrowerRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Borrower",
            id,
        }))?;
    Ok(Json(DataResponse { data: borrower }))
}

/// PUT /api/v1/borrowers/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    ValidatedJson(input): ValidatedJson<UpdateBorrower>,
) -> AppResult<Json<DataResponse<Borrower>>> {
    if let Some(Some(email)) = input.contact_email.as_ref() {
        ensure_email_free(&state, email, Some(id)).await?;
    }

    let borrower = BorrowerRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Borrower",
            id,
        }))?;
    tracing::info!(borrower_id = id, "Borrower updated");
    Ok(Json(DataResponse { data: borrower }))
}

/// DELETE /api/v1/borrowers/{id}
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Deleted>>> {
    if LoanRepo::count_for_borrower(&state.pool, id).await? > 0 {
        return Err(AppError::Core(CoreError::Conflict(
            "Cannot delete borrower: they have associated loan records. Delete the records first."
                .to_string(),
        )));
    }

    if !BorrowerRepo::delete(&state.pool, id).await? {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Borrower",
            id,
        }));
    }
    tracing::info!(borrower_id = id, "Borrower deleted");
    Ok(Json(DataResponse {
        data: Deleted {
            id,
            message: "Borrower deleted successfully".to_string(),
        },
    }))
}

/// GET /api/v1/borrowers/{id}/loans
pub async fn list_loans(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<LoanDetail>>>> {
    BorrowerRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Borrower",
            id,
        }))?;

    let params = LoanListParams {
        asset_id: None,
        borrower_id: Some(id),
    };
    let loans = LoanRepo::list(&state.pool, &params).await?;
    Ok(Json(DataResponse { data: loans }))
}

/// Reject a contact email already used by a different borrower.
async fn ensure_email_free(state: &AppState, email: &str, current: Option<DbId>) -> AppResult<()> {
    match BorrowerRepo::find_by_email(&state.pool, email).await? {
        Some(existing) if Some(existing.id) != current => Err(AppError::Core(
            CoreError::Conflict(format!("Borrower with email \"{email}\" already exists.")),
        )),
        _ => Ok(()),
    }
}
