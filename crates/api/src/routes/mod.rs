pub mod assets;
pub mod borrowers;
pub mod health;
pub mod loans;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /assets                                          list/search, create
/// /assets/{id}                                     get, update, delete
/// /assets/{id}/loans                               loans for one asset
///
/// /borrowers                                       list, create
/// /borrowers/bulk                                  create many (POST)
/// /borrowers/{id}                                  get, update, delete
/// /borrowers/{id}/loans                            loans for one borrower
///
/// /loans                                           list (filters), create
/// /loans/{id}                                      get, update, delete
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Assets.
        .nest("/assets", assets::router())
        // Borrowers.
        .nest("/borrowers", borrowers::router())
        // Loan ledger.
        .nest("/loans", loans::router())
}
