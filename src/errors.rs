use thiserror::Error;

/// Error type that captures common ledger failures.
#[derive(Debug, Error)]
pub enum ExpenseError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Invalid reference: {0}")]
    InvalidRef(String),
}
