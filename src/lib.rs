#![doc(test(attr(deny(warnings))))]

//! Expense Core offers the taxonomy, recurring-transaction expansion, and
//! monthly budget rollup primitives that power higher level expense-tracking
//! front ends.

pub mod errors;
pub mod ledger;
pub mod utils;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Expense Core tracing initialized.");
    });
}

#[cfg(test)]
mod tests {
    #[test]
    fn init_does_not_panic() {
        super::init();
    }
}
