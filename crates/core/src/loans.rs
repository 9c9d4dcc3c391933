//! Borrow/return lifecycle rules.
//!
//! An asset's status is a projection of its loans: it is `on_loan` exactly
//! when an active loan exists. The functions here decide what a create,
//! update, or delete must do to keep that projection true. The repository
//! layer runs the decisions inside a single transaction.

use crate::asset_status::AssetStatus;
use crate::error::CoreError;
use crate::types::Timestamp;

define_label_enum! {
    /// Lifecycle state of a loan record.
    LoanState ("loan state") {
        /// The asset is still out with the borrower.
        Active = "active",
        /// The asset came back.
        Returned = "returned",
    }
}

/// What a lifecycle operation must write to the loan's asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetEffect {
    /// Leave `assets.status` alone.
    Unchanged,
    /// Set `assets.status` to [`AssetStatus::AVAILABLE`].
    MarkAvailable,
    /// Set `assets.status` to [`AssetStatus::ON_LOAN`].
    MarkOnLoan,
}

impl AssetEffect {
    /// The status to write, if any.
    pub fn target_status(self) -> Option<AssetStatus> {
        match self {
            AssetEffect::Unchanged => None,
            AssetEffect::MarkAvailable => Some(AssetStatus::AVAILABLE),
            AssetEffect::MarkOnLoan => Some(AssetStatus::ON_LOAN),
        }
    }
}

/// Check that an asset may be lent out.
///
/// The asset is considered on loan if its status says so or if any active
/// loan still references it.
pub fn check_can_lend(
    asset_name: &str,
    asset_tag: &str,
    status: AssetStatus,
    active_loans: i64,
) -> Result<(), CoreError> {
    if status.is_on_loan() || active_loans > 0 {
        return Err(CoreError::Conflict(format!(
            "Asset \"{asset_name}\" ({asset_tag}) is already on loan"
        )));
    }
    Ok(())
}

/// The resolved outcome of applying an update to a loan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoanUpdatePlan {
    pub state: LoanState,
    pub returned_at: Option<Timestamp>,
    pub asset_effect: AssetEffect,
}

impl LoanUpdatePlan {
    /// True when the update reopens a previously returned loan.
    pub fn reactivates(&self, current: LoanState) -> bool {
        current == LoanState::Returned && self.state == LoanState::Active
    }
}

/// Decide the new state, return timestamp, and asset effect of an update.
///
/// - Active to Returned: the asset becomes available; `returned_at` is the
///   supplied value or `now`.
/// - Returned to Active: the asset goes back on loan; `returned_at` is
///   cleared even if a value was supplied.
/// - No state change: the asset is untouched; a supplied `returned_at`
///   replaces the stored one.
pub fn plan_update(
    current_state: LoanState,
    current_returned_at: Option<Timestamp>,
    requested_state: Option<LoanState>,
    requested_returned_at: Option<Timestamp>,
    now: Timestamp,
) -> LoanUpdatePlan {
    let target = requested_state.unwrap_or(current_state);

    match (current_state, target) {
        (LoanState::Active, LoanState::Returned) => LoanUpdatePlan {
            state: LoanState::Returned,
            returned_at: Some(requested_returned_at.unwrap_or(now)),
            asset_effect: AssetEffect::MarkAvailable,
        },
        (LoanState::Returned, LoanState::Active) => LoanUpdatePlan {
            state: LoanState::Active,
            returned_at: None,
            asset_effect: AssetEffect::MarkOnLoan,
        },
        (_, unchanged) => LoanUpdatePlan {
            state: unchanged,
            returned_at: requested_returned_at.or(current_returned_at),
            asset_effect: AssetEffect::Unchanged,
        },
    }
}

/// Decide what deleting a loan does to its asset.
///
/// `other_active_loans` counts active loans on the same asset excluding the
/// one being deleted. Only the removal of the last active loan frees the
/// asset; a surviving duplicate keeps it on loan.
pub fn plan_delete(deleted_state: LoanState, other_active_loans: i64) -> AssetEffect {
    match deleted_state {
        LoanState::Active if other_active_loans == 0 => AssetEffect::MarkAvailable,
        _ => AssetEffect::Unchanged,
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use chrono::{TimeZone, Utc};

    use super::*;

    fn at(day: u32) -> Timestamp {
        Utc.with_ymd_and_hms(2026, 3, day, 9, 0, 0).unwrap()
    }

    #[test]
    fn lending_an_available_asset_is_allowed() {
        assert!(check_can_lend("Laptop 7", "IT-007", AssetStatus::InUse, 0).is_ok());
        assert!(check_can_lend("Laptop 7", "IT-007", AssetStatus::Reserve, 0).is_ok());
    }

    #[test]
    fn lending_an_on_loan_asset_conflicts_and_names_it() {
        let err = check_can_lend("Laptop 7", "IT-007", AssetStatus::OnLoan, 0).unwrap_err();
        assert_matches!(err, CoreError::Conflict(msg) if msg.contains("\"Laptop 7\" (IT-007)"));
    }

    #[test]
    fn a_dangling_active_loan_blocks_lending_even_under_override() {
        let result = check_can_lend("Printer", "PR-1", AssetStatus::Maintenance, 1);
        assert_matches!(result, Err(CoreError::Conflict(_)));
    }

    #[test]
    fn returning_defaults_returned_at_to_now() {
        let plan = plan_update(LoanState::Active, None, Some(LoanState::Returned), None, at(5));
        assert_eq!(plan.state, LoanState::Returned);
        assert_eq!(plan.returned_at, Some(at(5)));
        assert_eq!(plan.asset_effect, AssetEffect::MarkAvailable);
    }

    #[test]
    fn returning_keeps_an_explicit_returned_at() {
        let plan = plan_update(
            LoanState::Active,
            None,
            Some(LoanState::Returned),
            Some(at(3)),
            at(5),
        );
        assert_eq!(plan.returned_at, Some(at(3)));
    }

    #[test]
    fn returning_replaces_an_expected_return_date() {
        let plan = plan_update(
            LoanState::Active,
            Some(at(20)),
            Some(LoanState::Returned),
            None,
            at(5),
        );
        assert_eq!(plan.returned_at, Some(at(5)));
    }

    #[test]
    fn reactivating_clears_returned_at_even_when_supplied() {
        let plan = plan_update(
            LoanState::Returned,
            Some(at(4)),
            Some(LoanState::Active),
            Some(at(6)),
            at(7),
        );
        assert_eq!(plan.state, LoanState::Active);
        assert_eq!(plan.returned_at, None);
        assert_eq!(plan.asset_effect, AssetEffect::MarkOnLoan);
        assert!(plan.reactivates(LoanState::Returned));
    }

    #[test]
    fn same_state_leaves_the_asset_alone() {
        let plan = plan_update(LoanState::Active, None, Some(LoanState::Active), None, at(2));
        assert_eq!(plan.asset_effect, AssetEffect::Unchanged);
        assert_eq!(plan.returned_at, None);

        let plan = plan_update(LoanState::Returned, Some(at(1)), None, Some(at(2)), at(3));
        assert_eq!(plan.state, LoanState::Returned);
        assert_eq!(plan.returned_at, Some(at(2)));
        assert_eq!(plan.asset_effect, AssetEffect::Unchanged);
        assert!(!plan.reactivates(LoanState::Returned));
    }

    #[test]
    fn deleting_the_last_active_loan_frees_the_asset() {
        assert_eq!(plan_delete(LoanState::Active, 0), AssetEffect::MarkAvailable);
    }

    #[test]
    fn deleting_a_duplicate_active_loan_keeps_the_asset_on_loan() {
        assert_eq!(plan_delete(LoanState::Active, 1), AssetEffect::Unchanged);
    }

    #[test]
    fn deleting_a_returned_loan_changes_nothing() {
        assert_eq!(plan_delete(LoanState::Returned, 0), AssetEffect::Unchanged);
    }

    #[test]
    fn effects_map_to_lifecycle_statuses() {
        assert_eq!(AssetEffect::Unchanged.target_status(), None);
        assert_eq!(
            AssetEffect::MarkAvailable.target_status(),
            Some(AssetStatus::AVAILABLE)
        );
        assert_eq!(
            AssetEffect::MarkOnLoan.target_status(),
            Some(AssetStatus::ON_LOAN)
        );
    }

    #[test]
    fn loan_state_labels_round_trip_through_strings() {
        assert_eq!(LoanState::Active.as_str(), "active");
        assert_eq!(
            LoanState::try_from("returned".to_string()).unwrap(),
            LoanState::Returned
        );
        assert!(LoanState::try_from("borrowed".to_string()).is_err());
    }
}
