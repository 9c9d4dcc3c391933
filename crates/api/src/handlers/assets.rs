//! Handlers for the `/assets` resource.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;
use stockroom_core::asset_status::validate_operator_status;
use stockroom_core::error::CoreError;
use stockroom_core::types::DbId;
use stockroom_db::models::asset::{Asset, AssetListParams, AssetPage, CreateAsset, UpdateAsset};
use stockroom_db::models::loan::{LoanDetail, LoanListParams};
use stockroom_db::repositories::{AssetRepo, LoanRepo};

use crate::error::{AppError, AppResult};
use crate::extract::ValidatedJson;
use crate::response::{DataResponse, Deleted};
use crate::state::AppState;

/// Result of `GET /assets`: a page, or every match when `all=true`.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum AssetListing {
    Page(AssetPage),
    All(Vec<Asset>),
}

/// POST /api/v1/assets
pub async fn create(
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<CreateAsset>,
) -> AppResult<(StatusCode, Json<DataResponse<Asset>>)> {
    if let Some(status) = input.status {
        validate_operator_status(status)?;
    }
    ensure_tag_free(&state, &input.asset_tag, None).await?;

    let asset = AssetRepo::create(&state.pool, &input).await?;
    tracing::info!(asset_id = asset.id, asset_tag = %asset.asset_tag, "Asset created");
    Ok((StatusCode::CREATED, Json(DataResponse { data: asset })))
}

/// GET /api/v1/assets
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<AssetListParams>,
) -> AppResult<Json<DataResponse<AssetListing>>> {
    let listing = if params.all {
        AssetListing::All(AssetRepo::search_all(&state.pool, &params).await?)
    } else {
        AssetListing::Page(AssetRepo::search(&state.pool, &params).await?)
    };
    Ok(Json(DataResponse { data: listing }))
}

/// GET /api/v1/assets/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Asset>>> {
    let asset = AssetRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Asset",
            id,
        }))?;
    Ok(Json(DataResponse { data: asset }))
}

/// PUT /api/v1/assets/{id}
///
/// Operators may set any status except `on_loan`, including while a loan
/// is active.
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    ValidatedJson(input): ValidatedJson<UpdateAsset>,
) -> AppResult<Json<DataResponse<Asset>>> {
    if let Some(status) = input.status {
        validate_operator_status(status)?;
    }
    if let Some(tag) = input.asset_tag.as_deref() {
        ensure_tag_free(&state, tag, Some(id)).await?;
    }

    let asset = AssetRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Asset",
            id,
        }))?;
    tracing::info!(asset_id = id, status = %asset.status.as_str(), "Asset updated");
    Ok(Json(DataResponse { data: asset }))
}

/// DELETE /api/v1/assets/{id}
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Deleted>>> {
    if LoanRepo::count_for_asset(&state.pool, id).await? > 0 {
        return Err(AppError::Core(CoreError::Conflict(
            "Cannot delete asset: it has associated loan records. Delete the records first."
                .to_string(),
        )));
    }

    if !AssetRepo::delete(&state.pool, id).await? {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Asset",
            id,
        }));
    }
    tracing::info!(asset_id = id, "Asset deleted");
    Ok(Json(DataResponse {
        data: Deleted {
            id,
            message: "Asset deleted successfully".to_string(),
        },
    }))
}

/// GET /api/v1/assets/{id}/loans
pub async fn list_loans(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<LoanDetail>>>> {
    AssetRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Asset",
            id,
        }))?;

    let params = LoanListParams {
        asset_id: Some(id),
        borrower_id: None,
    };
    let loans = LoanRepo::list(&state.pool, &params).await?;
    Ok(Json(DataResponse { data: loans }))
}

/// Reject an asset tag already used by a different asset.
async fn ensure_tag_free(state: &AppState, tag: &str, current: Option<DbId>) -> AppResult<()> {
    match AssetRepo::find_by_tag(&state.pool, tag).await? {
        Some(existing) if Some(existing.id) != current => Err(AppError::Core(
            CoreError::Conflict(format!("Asset with tag \"{tag}\" already exists.")),
        )),
        _ => Ok(()),
    }
}
