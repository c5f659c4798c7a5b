//! Planned-vs-actual aggregation over one month's materialized transactions.

use std::collections::HashMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::category::Taxonomy;
use super::plan::{MonthlyPlan, PlannedCategory, PlannedSubcategory};
use super::transaction::DisplayTransaction;

/// Spent-against-planned pair for a plan row. Keeps the raw figures so
/// callers can render both a clamped bar and an overspend marker.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct SpendProgress {
    pub spent: f64,
    pub planned: f64,
}

impl SpendProgress {
    pub fn from_parts(spent: f64, planned: f64) -> Self {
        Self { spent, planned }
    }

    /// Unclamped spent ÷ planned; defined as 0 for an empty plan.
    pub fn ratio(&self) -> f64 {
        if self.planned.abs() < f64::EPSILON {
            0.0
        } else {
            self.spent / self.planned
        }
    }

    /// Ratio clamped to `[0, 1]` for progress-bar rendering.
    pub fn progress(&self) -> f64 {
        self.ratio().clamp(0.0, 1.0)
    }

    pub fn remaining(&self) -> f64 {
        self.planned - self.spent
    }

    pub fn is_overspent(&self) -> bool {
        self.spent > self.planned
    }
}

/// One planned subcategory row in a month summary.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SubcategoryRollup {
    pub subcategory_id: Uuid,
    pub name: String,
    pub progress: SpendProgress,
}

/// One planned category row in a month summary.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CategoryRollup {
    pub category_id: Uuid,
    pub name: String,
    pub progress: SpendProgress,
    /// This category's planned amount as a share of the whole month's plan.
    pub plan_share: f64,
    pub subcategories: Vec<SubcategoryRollup>,
}

/// Complete planned-vs-actual picture for one month.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlanRollup {
    pub month: NaiveDate,
    pub totals: SpendProgress,
    pub categories: Vec<CategoryRollup>,
    /// Expense records omitted because their subcategory is missing from the
    /// taxonomy.
    pub skipped_transactions: usize,
}

/// Stateless rollup utilities over materialized month transactions. Every
/// operation is a pure function of its arguments; income records never
/// participate, and expenses referencing an unknown subcategory are skipped
/// with a warning rather than failing the aggregate.
pub struct RollupService;

impl RollupService {
    /// Total spent across every planned subcategory in the month's plan.
    pub fn total_spent_in_planned_categories(
        transactions: &[DisplayTransaction],
        plan: &MonthlyPlan,
        taxonomy: &Taxonomy,
    ) -> f64 {
        let (spent, _) = spent_by_subcategory(transactions, taxonomy);
        plan.planned_subcategory_ids()
            .iter()
            .map(|id| spent.get(id).copied().unwrap_or(0.0))
            .sum()
    }

    /// Total spent across one planned category's subcategories.
    pub fn total_spent_for_category(
        transactions: &[DisplayTransaction],
        planned_category: &PlannedCategory,
        taxonomy: &Taxonomy,
    ) -> f64 {
        let (spent, _) = spent_by_subcategory(transactions, taxonomy);
        planned_category
            .subcategories
            .iter()
            .map(|p| spent.get(&p.subcategory_id).copied().unwrap_or(0.0))
            .sum()
    }

    /// Total spent against one planned subcategory.
    pub fn total_spent_for_subcategory(
        transactions: &[DisplayTransaction],
        planned_subcategory: &PlannedSubcategory,
        taxonomy: &Taxonomy,
    ) -> f64 {
        let (spent, _) = spent_by_subcategory(transactions, taxonomy);
        spent
            .get(&planned_subcategory.subcategory_id)
            .copied()
            .unwrap_or(0.0)
    }

    /// Planned total minus total spent; negative means overspend.
    pub fn remaining_budget(
        transactions: &[DisplayTransaction],
        plan: &MonthlyPlan,
        taxonomy: &Taxonomy,
    ) -> f64 {
        plan.planned_total()
            - Self::total_spent_in_planned_categories(transactions, plan, taxonomy)
    }

    pub fn subcategory_progress(
        transactions: &[DisplayTransaction],
        planned_subcategory: &PlannedSubcategory,
        taxonomy: &Taxonomy,
    ) -> SpendProgress {
        SpendProgress::from_parts(
            Self::total_spent_for_subcategory(transactions, planned_subcategory, taxonomy),
            planned_subcategory.planned_amount,
        )
    }

    pub fn category_progress(
        transactions: &[DisplayTransaction],
        planned_category: &PlannedCategory,
        taxonomy: &Taxonomy,
    ) -> SpendProgress {
        SpendProgress::from_parts(
            Self::total_spent_for_category(transactions, planned_category, taxonomy),
            planned_category.planned_total(),
        )
    }

    /// One category's planned amount as a share of the whole month's plan;
    /// 0 when nothing is planned.
    pub fn plan_share(planned_category: &PlannedCategory, plan: &MonthlyPlan) -> f64 {
        let total = plan.planned_total();
        if total.abs() < f64::EPSILON {
            0.0
        } else {
            planned_category.planned_total() / total
        }
    }

    /// Single-pass summary of the whole plan: overall totals plus one row per
    /// planned category with nested subcategory rows, sorted by name.
    pub fn summarize_month(
        transactions: &[DisplayTransaction],
        plan: &MonthlyPlan,
        taxonomy: &Taxonomy,
    ) -> PlanRollup {
        let (spent, skipped) = spent_by_subcategory(transactions, taxonomy);

        let mut categories: Vec<CategoryRollup> = plan
            .categories
            .iter()
            .map(|planned_category| {
                let mut subcategories: Vec<SubcategoryRollup> = planned_category
                    .subcategories
                    .iter()
                    .map(|p| SubcategoryRollup {
                        subcategory_id: p.subcategory_id,
                        name: taxonomy
                            .subcategory(p.subcategory_id)
                            .map(|s| s.name.clone())
                            .unwrap_or_else(|| "Unknown Subcategory".into()),
                        progress: SpendProgress::from_parts(
                            spent.get(&p.subcategory_id).copied().unwrap_or(0.0),
                            p.planned_amount,
                        ),
                    })
                    .collect();
                subcategories.sort_by(|a, b| a.name.cmp(&b.name));

                let category_spent: f64 =
                    subcategories.iter().map(|row| row.progress.spent).sum();
                CategoryRollup {
                    category_id: planned_category.category_id,
                    name: taxonomy
                        .category(planned_category.category_id)
                        .map(|c| c.name.clone())
                        .unwrap_or_else(|| "Unknown Category".into()),
                    progress: SpendProgress::from_parts(
                        category_spent,
                        planned_category.planned_total(),
                    ),
                    plan_share: Self::plan_share(planned_category, plan),
                    subcategories,
                }
            })
            .collect();
        categories.sort_by(|a, b| a.name.cmp(&b.name));

        let total_spent: f64 = categories.iter().map(|row| row.progress.spent).sum();
        PlanRollup {
            month: plan.month,
            totals: SpendProgress::from_parts(total_spent, plan.planned_total()),
            categories,
            skipped_transactions: skipped,
        }
    }
}

/// Accumulates expense amounts per subcategory, excluding income records and
/// skipping (with a warning) any expense whose subcategory is not in the
/// taxonomy. Returns the accumulator plus the skipped count.
fn spent_by_subcategory(
    transactions: &[DisplayTransaction],
    taxonomy: &Taxonomy,
) -> (HashMap<Uuid, f64>, usize) {
    let mut spent: HashMap<Uuid, f64> = HashMap::new();
    let mut skipped = 0usize;
    for txn in transactions.iter().filter(|t| !t.is_income) {
        if taxonomy.subcategory(txn.subcategory_id).is_none() {
            tracing::warn!(
                transaction_id = %txn.original_transaction_id,
                subcategory_id = %txn.subcategory_id,
                "expense references unknown subcategory; omitted from totals"
            );
            skipped += 1;
            continue;
        }
        *spent.entry(txn.subcategory_id).or_insert(0.0) += txn.amount;
    }
    (spent, skipped)
}
