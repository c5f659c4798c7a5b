use chrono::NaiveDate;
use uuid::Uuid;

use expense_core::ledger::{
    DisplayTransaction, Ledger, MonthlyPlan, RollupService, Transaction,
};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn add_expense(ledger: &mut Ledger, category: &str, sub: &str, amount: f64, on: NaiveDate) {
    let (category_id, sub_id) = ledger.taxonomy.find_pair(category, sub).unwrap();
    let txn = Transaction::new(amount, on, sub, false, category_id, sub_id).unwrap();
    ledger.add_transaction(txn).unwrap();
}

#[test]
fn fuel_scenario_matches_expected_figures() {
    let mut ledger = Ledger::new("January");
    let (transport, fuel) = ledger.taxonomy.find_pair("Transport", "Fuel").unwrap();
    ledger
        .plan_for_month_mut(date(2025, 1, 1))
        .set_planned_amount(transport, fuel, 300.0);
    add_expense(&mut ledger, "Transport", "Fuel", 80.0, date(2025, 1, 8));
    add_expense(&mut ledger, "Transport", "Fuel", 50.0, date(2025, 1, 22));

    let transactions = ledger.display_transactions_for_month(date(2025, 1, 1));
    let plan = ledger.plan_for_month(date(2025, 1, 1)).unwrap();
    let planned_category = plan.planned_category(transport).unwrap();
    let planned_sub = planned_category.planned_subcategory(fuel).unwrap();

    let spent =
        RollupService::total_spent_for_subcategory(&transactions, planned_sub, &ledger.taxonomy);
    assert!((spent - 130.0).abs() < 1e-9);

    let remaining = RollupService::remaining_budget(&transactions, plan, &ledger.taxonomy);
    assert!((remaining - 170.0).abs() < 1e-9);

    let progress =
        RollupService::subcategory_progress(&transactions, planned_sub, &ledger.taxonomy);
    assert!((progress.ratio() - 130.0 / 300.0).abs() < 1e-9);
    assert!(!progress.is_overspent());
}

#[test]
fn empty_plan_never_divides_by_zero() {
    let mut ledger = Ledger::new("Empty");
    add_expense(&mut ledger, "Food", "Groceries", 120.0, date(2025, 3, 2));

    let transactions = ledger.display_transactions_for_month(date(2025, 3, 1));
    let plan = MonthlyPlan::new(date(2025, 3, 1));

    assert_eq!(
        RollupService::total_spent_in_planned_categories(&transactions, &plan, &ledger.taxonomy),
        0.0
    );
    assert_eq!(
        RollupService::remaining_budget(&transactions, &plan, &ledger.taxonomy),
        0.0
    );

    let rollup = RollupService::summarize_month(&transactions, &plan, &ledger.taxonomy);
    assert_eq!(rollup.totals.ratio(), 0.0);
    assert!(rollup.categories.is_empty());
}

#[test]
fn category_totals_sum_to_the_overall_total() {
    let mut ledger = Ledger::new("Sum");
    let (transport, fuel) = ledger.taxonomy.find_pair("Transport", "Fuel").unwrap();
    let (food, groceries) = ledger.taxonomy.find_pair("Food", "Groceries").unwrap();
    let (_, restaurants) = ledger.taxonomy.find_pair("Food", "Restaurants").unwrap();
    {
        let plan = ledger.plan_for_month_mut(date(2025, 4, 1));
        plan.set_planned_amount(transport, fuel, 300.0);
        plan.set_planned_amount(food, groceries, 500.0);
        plan.set_planned_amount(food, restaurants, 200.0);
    }
    add_expense(&mut ledger, "Transport", "Fuel", 60.0, date(2025, 4, 3));
    add_expense(&mut ledger, "Food", "Groceries", 140.0, date(2025, 4, 10));
    add_expense(&mut ledger, "Food", "Restaurants", 75.0, date(2025, 4, 18));
    // Unplanned subcategory: spent, but outside every planned total.
    add_expense(&mut ledger, "Health", "Pharmacy", 33.0, date(2025, 4, 20));

    let transactions = ledger.display_transactions_for_month(date(2025, 4, 1));
    let plan = ledger.plan_for_month(date(2025, 4, 1)).unwrap();

    let overall =
        RollupService::total_spent_in_planned_categories(&transactions, plan, &ledger.taxonomy);
    let per_category: f64 = plan
        .categories
        .iter()
        .map(|c| RollupService::total_spent_for_category(&transactions, c, &ledger.taxonomy))
        .sum();
    assert!((overall - per_category).abs() < 1e-9);
    assert!((overall - 275.0).abs() < 1e-9);

    // Plan shares are shares of the plan, not of spend.
    let transport_share =
        RollupService::plan_share(plan.planned_category(transport).unwrap(), plan);
    let food_share = RollupService::plan_share(plan.planned_category(food).unwrap(), plan);
    assert!((transport_share - 0.3).abs() < 1e-9);
    assert!((food_share - 0.7).abs() < 1e-9);
}

#[test]
fn replanned_subcategory_is_counted_once() {
    let mut ledger = Ledger::new("NoDoubleCount");
    let (transport, fuel) = ledger.taxonomy.find_pair("Transport", "Fuel").unwrap();
    let (food, _) = ledger.taxonomy.find_pair("Food", "Groceries").unwrap();
    {
        let plan = ledger.plan_for_month_mut(date(2025, 9, 1));
        plan.set_planned_amount(transport, fuel, 300.0);
        plan.set_planned_amount(food, fuel, 100.0);
    }
    add_expense(&mut ledger, "Transport", "Fuel", 10.0, date(2025, 9, 4));

    let transactions = ledger.display_transactions_for_month(date(2025, 9, 1));
    let plan = ledger.plan_for_month(date(2025, 9, 1)).unwrap();

    // The later assignment wins; the subcategory appears once across the plan.
    assert_eq!(plan.planned_subcategory_ids(), vec![fuel]);
    assert_eq!(plan.categories.len(), 1);
    assert_eq!(plan.categories[0].category_id, food);

    let spent =
        RollupService::total_spent_in_planned_categories(&transactions, plan, &ledger.taxonomy);
    assert!((spent - 10.0).abs() < 1e-9);
    assert!(
        (RollupService::remaining_budget(&transactions, plan, &ledger.taxonomy) - 90.0).abs()
            < 1e-9
    );
}

#[test]
fn income_never_participates_in_rollups() {
    let mut ledger = Ledger::new("Income");
    let (transport, fuel) = ledger.taxonomy.find_pair("Transport", "Fuel").unwrap();
    let (income, salary) = ledger.taxonomy.find_pair("Income", "Salary").unwrap();
    ledger
        .plan_for_month_mut(date(2025, 5, 1))
        .set_planned_amount(transport, fuel, 300.0);
    add_expense(&mut ledger, "Transport", "Fuel", 45.0, date(2025, 5, 6));
    let salary_txn =
        Transaction::new(4000.0, date(2025, 5, 1), "Salary", true, income, salary).unwrap();
    ledger.add_transaction(salary_txn).unwrap();

    let transactions = ledger.display_transactions_for_month(date(2025, 5, 1));
    assert_eq!(transactions.len(), 2);

    let plan = ledger.plan_for_month(date(2025, 5, 1)).unwrap();
    let spent =
        RollupService::total_spent_in_planned_categories(&transactions, plan, &ledger.taxonomy);
    assert!((spent - 45.0).abs() < 1e-9);
}

#[test]
fn unknown_subcategory_is_skipped_not_fatal() {
    let ledger = Ledger::new("Integrity");
    let (transport, fuel) = ledger.taxonomy.find_pair("Transport", "Fuel").unwrap();
    let mut plan = MonthlyPlan::new(date(2025, 6, 1));
    plan.set_planned_amount(transport, fuel, 100.0);

    let orphan_sub = Uuid::new_v4();
    let base = Transaction::new(10.0, date(2025, 6, 5), "Fuel", false, transport, fuel).unwrap();
    let good = DisplayTransaction::from_base(&base, base.date, false);
    let mut orphan = good.clone();
    orphan.subcategory_id = orphan_sub;
    orphan.amount = 999.0;

    let transactions = vec![good, orphan];
    let rollup = RollupService::summarize_month(&transactions, &plan, &ledger.taxonomy);
    assert_eq!(rollup.skipped_transactions, 1);
    assert!((rollup.totals.spent - 10.0).abs() < 1e-9);
}

#[test]
fn summary_rollup_matches_point_operations() {
    let mut ledger = Ledger::new("Summary");
    let (transport, fuel) = ledger.taxonomy.find_pair("Transport", "Fuel").unwrap();
    let (food, groceries) = ledger.taxonomy.find_pair("Food", "Groceries").unwrap();
    {
        let plan = ledger.plan_for_month_mut(date(2025, 7, 1));
        plan.set_planned_amount(transport, fuel, 200.0);
        plan.set_planned_amount(food, groceries, 400.0);
    }
    add_expense(&mut ledger, "Transport", "Fuel", 250.0, date(2025, 7, 4));
    add_expense(&mut ledger, "Food", "Groceries", 90.0, date(2025, 7, 9));

    let rollup = ledger.summarize_month(date(2025, 7, 15));
    assert!((rollup.totals.spent - 340.0).abs() < 1e-9);
    assert!((rollup.totals.planned - 600.0).abs() < 1e-9);
    assert!((rollup.totals.remaining() - 260.0).abs() < 1e-9);

    let fuel_row = rollup
        .categories
        .iter()
        .find(|c| c.category_id == transport)
        .unwrap();
    assert!(fuel_row.progress.is_overspent());
    assert_eq!(fuel_row.progress.progress(), 1.0);
    assert!(fuel_row.progress.ratio() > 1.0);
}

#[test]
fn ledger_round_trips_through_serde() {
    let mut ledger = Ledger::new("RoundTrip");
    let (transport, fuel) = ledger.taxonomy.find_pair("Transport", "Fuel").unwrap();
    ledger
        .plan_for_month_mut(date(2025, 8, 1))
        .set_planned_amount(transport, fuel, 300.0);
    add_expense(&mut ledger, "Transport", "Fuel", 80.0, date(2025, 8, 2));

    let json = serde_json::to_string(&ledger).unwrap();
    let restored: Ledger = serde_json::from_str(&json).unwrap();
    assert_eq!(restored.transactions, ledger.transactions);
    assert_eq!(restored.plans, ledger.plans);
    assert_eq!(restored.taxonomy, ledger.taxonomy);
}
