//! Request handlers for the inventory resources.
//!
//! Each submodule provides the async handler functions for one resource.
//! Handlers validate input, delegate to the corresponding repository in
//! `stockroom_db`, and map errors via [`AppError`](crate::error::AppError).

pub mod assets;
pub mod borrowers;
pub mod loans;
