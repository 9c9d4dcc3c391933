use stockroom_core::error::CoreError;

/// Error returned by loan lifecycle operations.
///
/// Lifecycle operations fail either on a domain rule (missing asset, asset
/// already on loan) or on the database itself. Either way the surrounding
/// transaction has been rolled back by the time the caller sees the error.
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

impl LedgerError {
    pub(crate) fn not_found(entity: &'static str, id: stockroom_core::types::DbId) -> Self {
        LedgerError::Core(CoreError::NotFound { entity, id })
    }
}
