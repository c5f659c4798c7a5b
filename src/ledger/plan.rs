use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::cadence::first_of_month;

/// Planned amount against one real subcategory for one month.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlannedSubcategory {
    pub id: Uuid,
    pub subcategory_id: Uuid,
    pub planned_amount: f64,
}

impl PlannedSubcategory {
    pub fn new(subcategory_id: Uuid, planned_amount: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            subcategory_id,
            planned_amount,
        }
    }
}

/// Groups planned subcategories under one real category for one month.
/// At most one entry per subcategory; setting an amount again replaces it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlannedCategory {
    pub id: Uuid,
    pub category_id: Uuid,
    /// Normalized to the first of the planned month.
    pub month: NaiveDate,
    #[serde(default)]
    pub subcategories: Vec<PlannedSubcategory>,
}

impl PlannedCategory {
    pub fn new(category_id: Uuid, month: NaiveDate) -> Self {
        Self {
            id: Uuid::new_v4(),
            category_id,
            month: first_of_month(month),
            subcategories: Vec::new(),
        }
    }

    pub fn planned_subcategory(&self, subcategory_id: Uuid) -> Option<&PlannedSubcategory> {
        self.subcategories
            .iter()
            .find(|p| p.subcategory_id == subcategory_id)
    }

    pub fn set_planned_amount(&mut self, subcategory_id: Uuid, amount: f64) {
        match self
            .subcategories
            .iter_mut()
            .find(|p| p.subcategory_id == subcategory_id)
        {
            Some(existing) => existing.planned_amount = amount,
            None => self
                .subcategories
                .push(PlannedSubcategory::new(subcategory_id, amount)),
        }
    }

    pub fn remove_subcategory(&mut self, subcategory_id: Uuid) -> bool {
        let before = self.subcategories.len();
        self.subcategories
            .retain(|p| p.subcategory_id != subcategory_id);
        self.subcategories.len() != before
    }

    pub fn planned_total(&self) -> f64 {
        self.subcategories.iter().map(|p| p.planned_amount).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.subcategories.is_empty()
    }
}

/// The whole spending plan for one calendar month. At most one planned
/// category per real category.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MonthlyPlan {
    /// Normalized to the first of the planned month.
    pub month: NaiveDate,
    #[serde(default)]
    pub categories: Vec<PlannedCategory>,
}

impl MonthlyPlan {
    pub fn new(month: NaiveDate) -> Self {
        Self {
            month: first_of_month(month),
            categories: Vec::new(),
        }
    }

    pub fn planned_category(&self, category_id: Uuid) -> Option<&PlannedCategory> {
        self.categories.iter().find(|p| p.category_id == category_id)
    }

    /// Creates or extends the plan entry for `(category, subcategory)`. A
    /// subcategory budgets under exactly one category per month, so planning
    /// it under a different category moves the entry rather than duplicating
    /// it across the plan.
    pub fn set_planned_amount(&mut self, category_id: Uuid, subcategory_id: Uuid, amount: f64) {
        for category in &mut self.categories {
            if category.category_id != category_id {
                category.remove_subcategory(subcategory_id);
            }
        }
        self.categories.retain(|p| !p.is_empty());
        let index = match self
            .categories
            .iter()
            .position(|p| p.category_id == category_id)
        {
            Some(index) => index,
            None => {
                self.categories
                    .push(PlannedCategory::new(category_id, self.month));
                self.categories.len() - 1
            }
        };
        self.categories[index].set_planned_amount(subcategory_id, amount);
    }

    /// Drops one subcategory from the plan, pruning its planned category when
    /// that leaves it empty.
    pub fn remove_subcategory(&mut self, subcategory_id: Uuid) -> bool {
        let mut removed = false;
        for category in &mut self.categories {
            removed |= category.remove_subcategory(subcategory_id);
        }
        self.categories.retain(|p| !p.is_empty());
        removed
    }

    /// Clears every planned entry for the month.
    pub fn clear(&mut self) {
        self.categories.clear();
    }

    /// Sum of every planned subcategory amount across the month.
    pub fn planned_total(&self) -> f64 {
        self.categories.iter().map(|p| p.planned_total()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// All planned subcategory ids across the plan, for matching expenses.
    pub fn planned_subcategory_ids(&self) -> Vec<Uuid> {
        self.categories
            .iter()
            .flat_map(|c| c.subcategories.iter().map(|p| p.subcategory_id))
            .collect()
    }
}
