//! Ledger domain models, recurrence expansion, and budget rollups.

pub mod cadence;
pub mod category;
#[allow(clippy::module_inception)]
pub mod ledger;
pub mod plan;
pub mod recurring;
pub mod rollup;
pub mod transaction;

pub use cadence::{first_of_month, MonthWindow, RepeatCadence};
pub use category::{Category, ColorRgb, Subcategory, Taxonomy};
pub use ledger::Ledger;
pub use plan::{MonthlyPlan, PlannedCategory, PlannedSubcategory};
pub use recurring::{expand_all_for_month, expand_for_month};
pub use rollup::{CategoryRollup, PlanRollup, RollupService, SpendProgress, SubcategoryRollup};
pub use transaction::{
    DeletionScope, DisplayTransaction, Repetition, Transaction, MAX_DESCRIPTION_LEN,
};
