//! Route definitions for borrowers.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::borrowers;
use crate::state::AppState;

/// Borrower routes mounted at `/borrowers`.
///
/// ```text
/// GET    /                  -> list
/// POST   /                  -> create
/// POST   /bulk              -> create_bulk
/// GET    /{id}              -> get_by_id
/// PUT    /{id}              -> update
/// DELETE /{id}              -> delete
/// GET    /{id}/loans        -> list_loans
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(borrowers::list).post(borrowers::create))
        .route("/bulk", post(borrowers::create_bulk))
        .route(
            "/{id}",
            get(borrowers::get_by_id)
                .put(borrowers::update)
                .delete(borrowers::delete),
        )
        .route("/{id}/loans", get(borrowers::list_loans))
}
