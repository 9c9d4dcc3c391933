//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A `Deserialize` create DTO for inserts
//! - A `Deserialize` update DTO (all `Option` fields) for patches
//!
//! Request DTOs reject unknown fields and carry `validator` rules.

pub mod asset;
pub mod borrower;
pub mod loan;
