use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{
    cadence::{first_of_month, MonthWindow},
    category::Taxonomy,
    plan::MonthlyPlan,
    recurring,
    rollup::{PlanRollup, RollupService},
    transaction::{DeletionScope, DisplayTransaction, Transaction},
};
use crate::errors::ExpenseError;

const CURRENT_SCHEMA_VERSION: u8 = 1;

/// Aggregate root holding the taxonomy, base transactions, and per-month
/// spending plans.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ledger {
    pub id: Uuid,
    pub name: String,
    pub taxonomy: Taxonomy,
    #[serde(default)]
    pub transactions: Vec<Transaction>,
    #[serde(default)]
    pub plans: Vec<MonthlyPlan>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default = "Ledger::schema_version_default")]
    pub schema_version: u8,
}

impl Ledger {
    /// Creates a ledger seeded with the fixed first-launch taxonomy.
    pub fn new(name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            taxonomy: Taxonomy::seed(),
            transactions: Vec::new(),
            plans: Vec::new(),
            created_at: now,
            updated_at: now,
            schema_version: CURRENT_SCHEMA_VERSION,
        }
    }

    /// Records a base transaction after checking that its subcategory belongs
    /// to its category, and bumps the subcategory usage counter.
    pub fn add_transaction(&mut self, transaction: Transaction) -> Result<Uuid, ExpenseError> {
        if !self
            .taxonomy
            .subcategory_belongs_to(transaction.subcategory_id, transaction.category_id)
        {
            return Err(ExpenseError::InvalidRef(format!(
                "subcategory {} does not belong to category {}",
                transaction.subcategory_id, transaction.category_id
            )));
        }
        let id = transaction.id;
        self.taxonomy.record_usage(transaction.subcategory_id);
        self.transactions.push(transaction);
        self.touch();
        Ok(id)
    }

    pub fn transaction(&self, id: Uuid) -> Option<&Transaction> {
        self.transactions.iter().find(|t| t.id == id)
    }

    pub fn transaction_count(&self) -> usize {
        self.transactions.len()
    }

    /// Deletes a transaction with the user's scope choice. Deleting a single
    /// occurrence of a repeating record only excludes that date; the series
    /// and any other record sharing the date are untouched.
    pub fn delete_transaction(
        &mut self,
        id: Uuid,
        scope: DeletionScope,
    ) -> Result<(), ExpenseError> {
        let index = self
            .transactions
            .iter()
            .position(|t| t.id == id)
            .ok_or_else(|| ExpenseError::InvalidRef(format!("unknown transaction {id}")))?;

        match scope {
            DeletionScope::EntireSeries => {
                self.transactions.remove(index);
            }
            DeletionScope::ThisOccurrence(date) => {
                let transaction = &mut self.transactions[index];
                match transaction.repetition.as_mut() {
                    Some(rule) => rule.exclude(date),
                    None if transaction.date == date => {
                        self.transactions.remove(index);
                    }
                    None => {
                        return Err(ExpenseError::InvalidInput(format!(
                            "transaction {id} has no occurrence on {date}"
                        )));
                    }
                }
            }
        }
        self.touch();
        Ok(())
    }

    /// The month's plan, if one was ever created.
    pub fn plan_for_month(&self, date: NaiveDate) -> Option<&MonthlyPlan> {
        let month = first_of_month(date);
        self.plans.iter().find(|p| p.month == month)
    }

    /// The month's plan, created on demand. One plan per calendar month.
    pub fn plan_for_month_mut(&mut self, date: NaiveDate) -> &mut MonthlyPlan {
        let month = first_of_month(date);
        if let Some(index) = self.plans.iter().position(|p| p.month == month) {
            return &mut self.plans[index];
        }
        self.plans.push(MonthlyPlan::new(month));
        self.plans.last_mut().unwrap()
    }

    /// Removes the month's plan entirely.
    pub fn clear_plan_for_month(&mut self, date: NaiveDate) -> bool {
        let month = first_of_month(date);
        let before = self.plans.len();
        self.plans.retain(|p| p.month != month);
        let removed = self.plans.len() != before;
        if removed {
            self.touch();
        }
        removed
    }

    /// Every occurrence visible in the month containing `date`, sorted
    /// date-descending for display.
    pub fn display_transactions_for_month(&self, date: NaiveDate) -> Vec<DisplayTransaction> {
        let window = MonthWindow::containing(date);
        recurring::expand_all_for_month(&self.transactions, window)
    }

    /// Planned-vs-actual summary for the month containing `date`. An absent
    /// plan rolls up as an empty one.
    pub fn summarize_month(&self, date: NaiveDate) -> PlanRollup {
        let transactions = self.display_transactions_for_month(date);
        match self.plan_for_month(date) {
            Some(plan) => RollupService::summarize_month(&transactions, plan, &self.taxonomy),
            None => RollupService::summarize_month(
                &transactions,
                &MonthlyPlan::new(first_of_month(date)),
                &self.taxonomy,
            ),
        }
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    pub fn schema_version_default() -> u8 {
        CURRENT_SCHEMA_VERSION
    }
}
