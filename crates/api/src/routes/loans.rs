//! Route definitions for the loan ledger.

use axum::routing::get;
use axum::Router;

use crate::handlers::loans;
use crate::state::AppState;

/// Loan routes mounted at `/loans`.
///
/// ```text
/// GET    /                  -> list (asset_id, borrower_id)
/// POST   /                  -> create
/// GET    /{id}              -> get_by_id
/// PUT    /{id}              -> update
/// DELETE /{id}              -> delete
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(loans::list).post(loans::create))
        .route(
            "/{id}",
            get(loans::get_by_id)
                .put(loans::update)
                .delete(loans::delete),
        )
}
