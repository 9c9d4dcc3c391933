//! Route definitions for the asset catalogue.

use axum::routing::get;
use axum::Router;

use crate::handlers::assets;
use crate::state::AppState;

/// Asset routes mounted at `/assets`.
///
/// ```text
/// GET    /                  -> list (search, category, status, page, limit, all)
/// POST   /                  -> create
/// GET    /{id}              -> get_by_id
/// PUT    /{id}              -> update
/// DELETE /{id}              -> delete
/// GET    /{id}/loans        -> list_loans
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(assets::list).post(assets::create))
        .route(
            "/{id}",
            get(assets::get_by_id)
                .put(assets::update)
                .delete(assets::delete),
        )
        .route("/{id}/loans", get(assets::list_loans))
}
