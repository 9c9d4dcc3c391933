//! Asset models and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use stockroom_core::asset_status::{AssetCategory, AssetStatus};
use stockroom_core::search::Pagination;
use stockroom_core::text;
use stockroom_core::types::{DbId, Timestamp};
use validator::Validate;

/// A row from the `assets` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Asset {
    pub id: DbId,
    pub asset_tag: String,
    pub name: String,
    pub description: Option<String>,
    #[sqlx(try_from = "String")]
    pub category: AssetCategory,
    #[sqlx(try_from = "String")]
    pub status: AssetStatus,
    pub image_url: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for registering a new asset.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct CreateAsset {
    #[serde(deserialize_with = "text::trimmed")]
    #[validate(length(min = 1, max = 64, message = "asset_tag must be 1-64 characters"))]
    pub asset_tag: String,
    #[serde(deserialize_with = "text::trimmed")]
    #[validate(length(min = 1, max = 255, message = "name must be 1-255 characters"))]
    pub name: String,
    #[serde(default, deserialize_with = "text::blank_as_none")]
    pub description: Option<String>,
    pub category: AssetCategory,
    /// Initial status; defaults to `in_use` when omitted.
    pub status: Option<AssetStatus>,
    #[serde(default, deserialize_with = "text::blank_as_none")]
    #[validate(url(message = "image_url must be a valid URL"))]
    pub image_url: Option<String>,
}

/// DTO for updating an existing asset. Omitted fields keep their value;
/// `description` and `image_url` are cleared by `null` or `""`.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct UpdateAsset {
    #[serde(default, deserialize_with = "text::trimmed_optional")]
    #[validate(length(min = 1, max = 64, message = "asset_tag must be 1-64 characters"))]
    pub asset_tag: Option<String>,
    #[serde(default, deserialize_with = "text::trimmed_optional")]
    #[validate(length(min = 1, max = 255, message = "name must be 1-255 characters"))]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "text::nullable")]
    pub description: Option<Option<String>>,
    pub category: Option<AssetCategory>,
    pub status: Option<AssetStatus>,
    #[serde(default, deserialize_with = "text::nullable")]
    #[validate(url(message = "image_url must be a valid URL"))]
    pub image_url: Option<Option<String>>,
}

/// Query parameters for listing assets.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AssetListParams {
    /// Case-insensitive match against name or asset tag.
    pub search: Option<String>,
    pub category: Option<AssetCategory>,
    pub status: Option<AssetStatus>,
    /// 1-based page number.
    pub page: Option<i64>,
    pub limit: Option<i64>,
    /// Return every match without pagination.
    #[serde(default)]
    pub all: bool,
}

impl AssetListParams {
    /// The `ILIKE` pattern for `search`, if a non-blank term was given.
    pub fn search_pattern(&self) -> Option<String> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| format!("%{s}%"))
    }
}

/// One page of assets plus its pagination metadata.
#[derive(Debug, Clone, Serialize)]
pub struct AssetPage {
    pub assets: Vec<Asset>,
    pub pagination: Pagination,
}
