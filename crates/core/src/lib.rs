//! Domain types and rules shared by the Stockroom database and API crates.
//!
//! Nothing here touches the database; callers pass in rows loaded by the
//! repository layer and apply the returned decisions themselves.

#[macro_use]
mod labels;

pub mod asset_status;
pub mod error;
pub mod loans;
pub mod search;
pub mod text;
pub mod timestamps;
pub mod types;
