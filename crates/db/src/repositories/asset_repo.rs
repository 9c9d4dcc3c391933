//! Repository for the `assets` table.

use sqlx::postgres::{PgArguments, PgExecutor};
use sqlx::query::QueryAs;
use sqlx::{PgPool, Postgres};
use stockroom_core::asset_status::AssetStatus;
use stockroom_core::search::{clamp_limit, clamp_page, Pagination, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
use stockroom_core::types::DbId;

use crate::models::asset::{Asset, AssetListParams, AssetPage, CreateAsset, UpdateAsset};

/// Column list for `assets` queries.
const COLUMNS: &str = "\
    id, asset_tag, name, description, category, status, image_url, \
    created_at, updated_at";

/// Provides CRUD operations for assets.
pub struct AssetRepo;

impl AssetRepo {
    /// Register a new asset. Status defaults to `in_use`.
    pub async fn create(pool: &PgPool, input: &CreateAsset) -> Result<Asset, sqlx::Error> {
        let status = input.status.unwrap_or(AssetStatus::AVAILABLE);
        let query = format!(
            "INSERT INTO assets (asset_tag, name, description, category, status, image_url) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Asset>(&query)
            .bind(input.asset_tag.as_str())
            .bind(input.name.as_str())
            .bind(input.description.as_deref())
            .bind(input.category.as_str())
            .bind(status.as_str())
            .bind(input.image_url.as_deref())
            .fetch_one(pool)
            .await
    }

    /// Find an asset by ID.
    pub async fn find_by_id<'e>(
        executor: impl PgExecutor<'e>,
        id: DbId,
    ) -> Result<Option<Asset>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM assets WHERE id = $1");
        sqlx::query_as::<_, Asset>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// Find an asset by its unique asset tag.
    pub async fn find_by_tag(pool: &PgPool, asset_tag: &str) -> Result<Option<Asset>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM assets WHERE asset_tag = $1");
        sqlx::query_as::<_, Asset>(&query)
            .bind(asset_tag.trim())
            .fetch_optional(pool)
            .await
    }

    /// Fetch several assets by ID, in no particular order.
    pub async fn find_many<'e>(
        executor: impl PgExecutor<'e>,
        ids: &[DbId],
    ) -> Result<Vec<Asset>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM assets WHERE id = ANY($1)");
        sqlx::query_as::<_, Asset>(&query)
            .bind(ids)
            .fetch_all(executor)
            .await
    }

    /// Load an asset and hold its row lock until the transaction ends.
    ///
    /// Every loan lifecycle operation takes this lock first, so operations
    /// on the same asset run one after another.
    pub async fn lock_for_update<'e>(
        executor: impl PgExecutor<'e>,
        id: DbId,
    ) -> Result<Option<Asset>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM assets WHERE id = $1 FOR UPDATE");
        sqlx::query_as::<_, Asset>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// Overwrite an asset's status, returning the updated row.
    pub async fn set_status<'e>(
        executor: impl PgExecutor<'e>,
        id: DbId,
        status: AssetStatus,
    ) -> Result<Asset, sqlx::Error> {
        let query = format!("UPDATE assets SET status = $2 WHERE id = $1 RETURNING {COLUMNS}");
        sqlx::query_as::<_, Asset>(&query)
            .bind(id)
            .bind(status.as_str())
            .fetch_one(executor)
            .await
    }

    /// List one page of assets matching the filters, newest first.
    pub async fn search(pool: &PgPool, params: &AssetListParams) -> Result<AssetPage, sqlx::Error> {
        let page = clamp_page(params.page);
        let limit = clamp_limit(params.limit, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE);
        let (where_clause, next_idx) = filter_clause(params);

        let count_query = format!("SELECT COUNT(*) FROM assets {where_clause}");
        let (total,): (i64,) = bind_filters(sqlx::query_as(&count_query), params)
            .fetch_one(pool)
            .await?;

        let pagination = Pagination::new(page, limit, total);
        let query = format!(
            "SELECT {COLUMNS} FROM assets {where_clause} \
             ORDER BY created_at DESC, id DESC \
             LIMIT ${next_idx} OFFSET ${offset_idx}",
            offset_idx = next_idx + 1,
        );
        let assets = bind_filters(sqlx::query_as::<_, Asset>(&query), params)
            .bind(pagination.limit)
            .bind(pagination.offset())
            .fetch_all(pool)
            .await?;

        Ok(AssetPage { assets, pagination })
    }

    /// List every asset matching the filters, newest first.
    pub async fn search_all(
        pool: &PgPool,
        params: &AssetListParams,
    ) -> Result<Vec<Asset>, sqlx::Error> {
        let (where_clause, _) = filter_clause(params);
        let query = format!(
            "SELECT {COLUMNS} FROM assets {where_clause} ORDER BY created_at DESC, id DESC"
        );
        bind_filters(sqlx::query_as::<_, Asset>(&query), params)
            .fetch_all(pool)
            .await
    }

    /// Update an existing asset. Omitted fields keep their value;
    /// `description` and `image_url` are overwritten, possibly with `NULL`,
    /// whenever they are present.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateAsset,
    ) -> Result<Option<Asset>, sqlx::Error> {
        let query = format!(
            "UPDATE assets SET \
                asset_tag = COALESCE($2, asset_tag), \
                name = COALESCE($3, name), \
                description = CASE WHEN $4 THEN $5 ELSE description END, \
                category = COALESCE($6, category), \
                status = COALESCE($7, status), \
                image_url = CASE WHEN $8 THEN $9 ELSE image_url END \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Asset>(&query)
            .bind(id)
            .bind(input.asset_tag.as_deref())
            .bind(input.name.as_deref())
            .bind(input.description.is_some())
            .bind(input.description.clone().flatten())
            .bind(input.category.map(|c| c.as_str()))
            .bind(input.status.map(|s| s.as_str()))
            .bind(input.image_url.is_some())
            .bind(input.image_url.clone().flatten())
            .fetch_optional(pool)
            .await
    }

    /// Delete an asset by ID. Returns true if a row was deleted.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM assets WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

/// Build the `WHERE` clause for [`AssetListParams`].
///
/// Returns the clause (empty when unfiltered) and the next free bind index.
fn filter_clause(params: &AssetListParams) -> (String, u32) {
    let mut conditions = Vec::new();
    let mut bind_idx = 1u32;

    if params.search_pattern().is_some() {
        conditions.push(format!(
            "(name ILIKE ${bind_idx} OR asset_tag ILIKE ${bind_idx})"
        ));
        bind_idx += 1;
    }
    if params.category.is_some() {
        conditions.push(format!("category = ${bind_idx}"));
        bind_idx += 1;
    }
    if params.status.is_some() {
        conditions.push(format!("status = ${bind_idx}"));
        bind_idx += 1;
    }

    let clause = if conditions.is_empty() {
        String::new()
    } else {
        format!("WHERE {}", conditions.join(" AND "))
    };
    (clause, bind_idx)
}

/// Bind the filter values in the same order [`filter_clause`] numbered them.
fn bind_filters<'q, O>(
    mut query: QueryAs<'q, Postgres, O, PgArguments>,
    params: &AssetListParams,
) -> QueryAs<'q, Postgres, O, PgArguments> {
    if let Some(pattern) = params.search_pattern() {
        query = query.bind(pattern);
    }
    if let Some(category) = params.category {
        query = query.bind(category.as_str());
    }
    if let Some(status) = params.status {
        query = query.bind(status.as_str());
    }
    query
}
