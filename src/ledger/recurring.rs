use super::cadence::MonthWindow;
use super::transaction::{DisplayTransaction, Transaction};

/// Upper bound on occurrences emitted for one base record in one month. A
/// daily cadence tops out at 31, so the guard only trips on pathological
/// input.
const MAX_OCCURRENCES_PER_MONTH: usize = 64;

/// Materializes every occurrence of `base` that falls inside the month
/// window. One entry per qualifying occurrence, no duplicates; output is in
/// ascending occurrence order but callers own any display ordering.
pub fn expand_for_month(base: &Transaction, window: MonthWindow) -> Vec<DisplayTransaction> {
    let rule = match base.repetition.as_ref() {
        Some(rule) if rule.cadence.is_repeating() => rule,
        // No rule (or a stored `Never` cadence): at most the base record itself.
        _ => {
            return if window.contains(base.date) {
                vec![DisplayTransaction::from_base(base, base.date, false)]
            } else {
                Vec::new()
            };
        }
    };

    if rule.ends_before(base.date) {
        tracing::warn!(
            transaction_id = %base.id,
            end_date = ?rule.end_date,
            origin = %base.date,
            "repetition rule ends before its origin; no occurrences generated"
        );
        return Vec::new();
    }

    let cadence = rule.cadence;
    let mut occurrences = Vec::new();
    let mut index = cadence.first_index_on_or_after(base.date, window.start);
    for _ in 0..MAX_OCCURRENCES_PER_MONTH {
        let date = cadence.occurrence_date(base.date, index);
        if date >= window.end || !rule.allows(date) {
            break;
        }
        if !rule.is_excluded(date) {
            occurrences.push(DisplayTransaction::from_base(base, date, true));
        }
        index += 1;
    }
    occurrences
}

/// Expands every base record against the window and returns the combined
/// list sorted date-descending (the order the display path consumes), with
/// ties broken by originating id for determinism.
pub fn expand_all_for_month(
    transactions: &[Transaction],
    window: MonthWindow,
) -> Vec<DisplayTransaction> {
    let mut all: Vec<DisplayTransaction> = transactions
        .iter()
        .flat_map(|base| expand_for_month(base, window))
        .collect();
    all.sort_by(|a, b| {
        b.date
            .cmp(&a.date)
            .then_with(|| a.original_transaction_id.cmp(&b.original_transaction_id))
    });
    all
}
