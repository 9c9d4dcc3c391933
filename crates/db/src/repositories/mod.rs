//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods.
//! Plain reads and writes take `&PgPool`; methods that also run inside the
//! loan lifecycle transaction take any `PgExecutor` so the same query can be
//! issued on a pool or on `&mut *tx`.

pub mod asset_repo;
pub mod borrower_repo;
pub mod loan_repo;

pub use asset_repo::AssetRepo;
pub use borrower_repo::BorrowerRepo;
pub use loan_repo::LoanRepo;
