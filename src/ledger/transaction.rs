use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::cadence::RepeatCadence;
use crate::errors::ExpenseError;

/// Longest description the record form accepts.
pub const MAX_DESCRIPTION_LEN: usize = 20;

/// A single persisted record representing a (possibly repeating) financial
/// event. Amounts are signed doubles with no attached currency.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Transaction {
    pub id: Uuid,
    pub amount: f64,
    pub date: NaiveDate,
    pub description: String,
    pub is_income: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repetition: Option<Repetition>,
    pub category_id: Uuid,
    pub subcategory_id: Uuid,
}

impl Transaction {
    pub fn new(
        amount: f64,
        date: NaiveDate,
        description: impl Into<String>,
        is_income: bool,
        category_id: Uuid,
        subcategory_id: Uuid,
    ) -> Result<Self, ExpenseError> {
        let description = description.into();
        if description.chars().count() > MAX_DESCRIPTION_LEN {
            return Err(ExpenseError::InvalidInput(format!(
                "description exceeds {MAX_DESCRIPTION_LEN} characters"
            )));
        }
        Ok(Self {
            id: Uuid::new_v4(),
            amount,
            date,
            description,
            is_income,
            repetition: None,
            category_id,
            subcategory_id,
        })
    }

    pub fn with_repetition(mut self, repetition: Repetition) -> Self {
        self.set_repetition(Some(repetition));
        self
    }

    /// Attaches a repetition rule. A `Never` cadence carries no schedule, so
    /// it normalizes to no rule at all.
    pub fn set_repetition(&mut self, repetition: Option<Repetition>) {
        self.repetition = repetition.filter(|rule| rule.cadence.is_repeating());
    }

    pub fn is_repeating(&self) -> bool {
        self.repetition.is_some()
    }
}

/// Cadence, optional end date, and explicit exclusions governing how a base
/// transaction materializes into monthly occurrences.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Repetition {
    pub cadence: RepeatCadence,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub excluded_dates: Vec<NaiveDate>,
}

impl Repetition {
    pub fn new(cadence: RepeatCadence) -> Self {
        Self {
            cadence,
            end_date: None,
            excluded_dates: Vec::new(),
        }
    }

    pub fn until(mut self, end_date: NaiveDate) -> Self {
        self.end_date = Some(end_date);
        self
    }

    pub fn is_excluded(&self, date: NaiveDate) -> bool {
        self.excluded_dates.contains(&date)
    }

    /// Adds a date to the exclusion set ("delete this occurrence only").
    pub fn exclude(&mut self, date: NaiveDate) {
        if !self.is_excluded(date) {
            self.excluded_dates.push(date);
        }
    }

    /// An end date before the series origin makes the rule unsatisfiable.
    pub fn ends_before(&self, origin: NaiveDate) -> bool {
        self.end_date.map(|end| end < origin).unwrap_or(false)
    }

    pub fn allows(&self, date: NaiveDate) -> bool {
        self.end_date.map(|end| date <= end).unwrap_or(true)
    }
}

/// One materialized calendar occurrence of a base transaction. Used only for
/// display and aggregation, never persisted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DisplayTransaction {
    pub amount: f64,
    pub date: NaiveDate,
    pub description: String,
    pub is_income: bool,
    pub category_id: Uuid,
    pub subcategory_id: Uuid,
    pub is_recurring_instance: bool,
    /// Identifier of the base transaction this occurrence derives from.
    pub original_transaction_id: Uuid,
}

impl DisplayTransaction {
    pub fn from_base(base: &Transaction, date: NaiveDate, recurring: bool) -> Self {
        Self {
            amount: base.amount,
            date,
            description: base.description.clone(),
            is_income: base.is_income,
            category_id: base.category_id,
            subcategory_id: base.subcategory_id,
            is_recurring_instance: recurring,
            original_transaction_id: base.id,
        }
    }
}

/// User choice when deleting a transaction that may repeat.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum DeletionScope {
    /// Skip a single occurrence date; the base record survives.
    ThisOccurrence(NaiveDate),
    /// Remove the base record and with it every future occurrence.
    EntireSeries,
}
