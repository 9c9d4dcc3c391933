//! Handlers for the `/loans` resource.
//!
//! Every mutation goes through [`LoanRepo`], which keeps the loan's asset
//! status in step with the ledger inside the same transaction.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;
use stockroom_core::asset_status::AssetStatus;
use stockroom_core::error::CoreError;
use stockroom_core::types::DbId;
use stockroom_db::models::loan::{CreateLoan, LoanDetail, LoanListParams, UpdateLoan};
use stockroom_db::repositories::LoanRepo;

use crate::error::{AppError, AppResult};
use crate::extract::ValidatedJson;
use crate::response::DataResponse;
use crate::state::AppState;

/// Confirmation payload for `DELETE /loans/{id}`.
#[derive(Debug, Serialize)]
pub struct LoanDeleted {
    pub id: DbId,
    pub asset_id: DbId,
    /// The asset's status once the deletion committed.
    pub asset_status: AssetStatus,
    pub message: String,
}

/// POST /api/v1/loans
pub async fn create(
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<CreateLoan>,
) -> AppResult<(StatusCode, Json<DataResponse<LoanDetail>>)> {
    let detail = LoanRepo::create(&state.pool, &input).await?;
    tracing::info!(
        loan_id = detail.loan.id,
        asset_id = detail.asset.id,
        borrower_id = detail.borrower.id,
        "Loan created"
    );
    Ok((StatusCode::CREATED, Json(DataResponse { data: detail })))
}

/// GET /api/v1/loans
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<LoanListParams>,
) -> AppResult<Json<DataResponse<Vec<LoanDetail>>>> {
    let loans = LoanRepo::list(&state.pool, &params).await?;
    Ok(Json(DataResponse { data: loans }))
}

/// GET /api/v1/loans/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<LoanDetail>>> {
    let detail = LoanRepo::find_detail(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Loan", id }))?;
    Ok(Json(DataResponse { data: detail }))
}

/// PUT /api/v1/loans/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    ValidatedJson(input): ValidatedJson<UpdateLoan>,
) -> AppResult<Json<DataResponse<LoanDetail>>> {
    let detail = LoanRepo::update(&state.pool, id, &input).await?;
    tracing::info!(
        loan_id = id,
        asset_id = detail.asset.id,
        state = detail.loan.state.as_str(),
        asset_status = detail.asset.status.as_str(),
        "Loan updated"
    );
    Ok(Json(DataResponse { data: detail }))
}

/// DELETE /api/v1/loans/{id}
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<LoanDeleted>>> {
    let deletion = LoanRepo::delete(&state.pool, id).await?;
    tracing::info!(
        loan_id = id,
        asset_id = deletion.loan.asset_id,
        asset_status = deletion.asset_status.as_str(),
        "Loan deleted"
    );
    Ok(Json(DataResponse {
        data: LoanDeleted {
            id,
            asset_id: deletion.loan.asset_id,
            asset_status: deletion.asset_status,
            message: "Loan record deleted successfully".to_string(),
        },
    }))
}
