//! Asset availability statuses and equipment categories.
//!
//! Operators may set any [`AssetStatus`]; the loan lifecycle only ever writes
//! [`AssetStatus::AVAILABLE`] and [`AssetStatus::ON_LOAN`].

use crate::error::CoreError;

define_label_enum! {
    /// Availability status of an asset.
    AssetStatus ("asset status") {
        /// In service and free to lend.
        InUse = "in_use",
        OutOfUse = "out_of_use",
        Maintenance = "maintenance",
        Reserve = "reserve",
        Lost = "lost",
        /// Held by a borrower under an active loan.
        OnLoan = "on_loan",
    }
}

impl AssetStatus {
    /// Status written when an asset's last active loan closes.
    pub const AVAILABLE: AssetStatus = AssetStatus::InUse;

    /// Status written when an asset is lent out.
    pub const ON_LOAN: AssetStatus = AssetStatus::OnLoan;

    pub fn is_on_loan(self) -> bool {
        self == Self::ON_LOAN
    }
}

/// Check a status an operator is writing directly to an asset.
///
/// `on_loan` is only ever set by creating or reopening a loan, so it is
/// refused here. Every other status may be set at any time, even while a
/// loan is active.
pub fn validate_operator_status(status: AssetStatus) -> Result<(), CoreError> {
    if status.is_on_loan() {
        return Err(CoreError::Validation(
            "Status 'on_loan' is managed by loan records and cannot be set directly".to_string(),
        ));
    }
    Ok(())
}

define_label_enum! {
    /// Equipment category of an asset.
    AssetCategory ("asset category") {
        Computer = "computer",
        Laptop = "laptop",
        Monitor = "monitor",
        Printer = "printer",
        PcOnly = "pc_only",
        Network = "network",
        Other = "other",
    }
}
