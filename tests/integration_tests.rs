use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use splitledger::core::member::{Member, MemberId};
use splitledger::core::record::{Expense, GroupSnapshot, Payment};
use splitledger::graph::debt_graph::DebtGraphBuilder;
use splitledger::settlement::aggregate::{BalanceEngine, LedgerError};
use splitledger::settlement::planner::SettlementPlanner;
use std::collections::HashMap;

fn id(s: &str) -> MemberId {
    MemberId::new(s)
}

/// Full pipeline test: records → balances → plan → graph.
#[test]
fn full_pipeline_weekend_trip() {
    let mut group = GroupSnapshot::new();
    group.add_member(Member::new("usr-alice", "Alice"));
    group.add_member(Member::new("usr-bob", "Bob"));
    group.add_member(Member::new("usr-carol", "Carol"));
    group.add_member(Member::new("usr-dan", "Dan"));

    // Cabin, split equally.
    group.add_expense(Expense::new(id("usr-alice"), dec!(480)).with_description("Cabin rental"));
    // Groceries, itemized: Dan skipped the barbecue.
    group.add_expense(
        Expense::new(id("usr-bob"), dec!(90))
            .with_split(id("usr-alice"), dec!(30))
            .with_split(id("usr-bob"), dec!(30))
            .with_split(id("usr-carol"), dec!(30))
            .with_description("Groceries"),
    );
    // Fuel, split equally.
    group.add_expense(Expense::new(id("usr-carol"), dec!(60)).with_description("Fuel"));
    // Dan already paid Alice part of his share.
    group.add_payment(Payment::new(id("usr-dan"), id("usr-alice"), dec!(50)));

    let aggregation = BalanceEngine::aggregate(&group).unwrap();
    assert!(aggregation.is_clean());
    assert_eq!(aggregation.total_expenses(), dec!(630));

    // Cabin: everyone owes 120. Groceries: Alice/Bob/Carol owe 30 each.
    // Fuel: everyone owes 15. Payment: Dan +50, Alice -50.
    let sheet = aggregation.sheet();
    assert_eq!(sheet.balance(&id("usr-alice")), dec!(265)); // 480-120-30-15-50
    assert_eq!(sheet.balance(&id("usr-bob")), dec!(-75)); // 90-120-30-15
    assert_eq!(sheet.balance(&id("usr-carol")), dec!(-105)); // 60-120-30-15
    assert_eq!(sheet.balance(&id("usr-dan")), dec!(-85)); // -120-15+50
    assert_eq!(sheet.residual(), Decimal::ZERO);

    // Total spent counts consumption, not who paid.
    assert_eq!(sheet.spent(&id("usr-alice")), dec!(165)); // 120+30+15
    assert_eq!(sheet.spent(&id("usr-dan")), dec!(135)); // 120+15

    let report = aggregation.report(&group);
    assert_eq!(report.per_person_share, dec!(157.50));

    let plan = SettlementPlanner::plan(&report.balances);
    // One creditor, three debtors: exactly three transactions.
    assert_eq!(plan.len(), 3);
    assert!(plan
        .transactions()
        .iter()
        .all(|t| t.to.as_str() == "usr-alice"));
    assert_eq!(plan.total_transferred(), dec!(265.00));
    assert_eq!(plan.residual(), Decimal::ZERO);

    // Largest debt settles first.
    assert_eq!(plan.transactions()[0].from.as_str(), "usr-carol");
    assert_eq!(plan.transactions()[0].amount, dec!(105.00));

    let graph = DebtGraphBuilder::assemble(&group, &aggregation, &plan);
    assert_eq!(graph.node_count(), 4);
    assert_eq!(graph.optimized_edge_count(), 3);
    // Cabin 3 + groceries 2 + fuel 3 + payment 1 (self-splits omitted).
    assert_eq!(graph.raw_edge_count(), 9);
}

/// An expense of 300 across 3 members with no explicit splits reduces every
/// balance by exactly 100 and credits the payer 300.
#[test]
fn equal_split_fallback_exact_shares() {
    let mut group = GroupSnapshot::new();
    group.add_member(Member::new("usr-a", "Ana"));
    group.add_member(Member::new("usr-b", "Ben"));
    group.add_member(Member::new("usr-c", "Cai"));
    group.add_expense(Expense::new(id("usr-a"), dec!(300)));

    let report = BalanceEngine::aggregate(&group).unwrap().report(&group);
    let by_id: HashMap<&str, Decimal> = report
        .balances
        .iter()
        .map(|b| (b.member.as_str(), b.balance))
        .collect();

    assert_eq!(by_id["usr-a"], dec!(200.00));
    assert_eq!(by_id["usr-b"], dec!(-100.00));
    assert_eq!(by_id["usr-c"], dec!(-100.00));
}

/// Balances {A: +50, B: -30, C: -20} settle in exactly two transactions
/// with zero residual.
#[test]
fn two_debtor_settlement_example() {
    let mut group = GroupSnapshot::new();
    group.add_member(Member::new("usr-a", "Ana"));
    group.add_member(Member::new("usr-b", "Ben"));
    group.add_member(Member::new("usr-c", "Cai"));
    group.add_expense(
        Expense::new(id("usr-a"), dec!(50))
            .with_split(id("usr-b"), dec!(30))
            .with_split(id("usr-c"), dec!(20)),
    );

    let aggregation = BalanceEngine::aggregate(&group).unwrap();
    let plan = SettlementPlanner::plan(&aggregation.report(&group).balances);

    assert_eq!(plan.len(), 2);
    assert_eq!(plan.transactions()[0].from.as_str(), "usr-b");
    assert_eq!(plan.transactions()[0].to.as_str(), "usr-a");
    assert_eq!(plan.transactions()[0].amount, dec!(30.00));
    assert_eq!(plan.transactions()[1].from.as_str(), "usr-c");
    assert_eq!(plan.transactions()[1].amount, dec!(20.00));
    assert_eq!(plan.residual(), Decimal::ZERO);
}

/// A group with no debt yields an empty plan.
#[test]
fn already_settled_group_yields_empty_plan() {
    let mut group = GroupSnapshot::new();
    group.add_member(Member::new("usr-a", "Ana"));
    group.add_member(Member::new("usr-b", "Ben"));

    let aggregation = BalanceEngine::aggregate(&group).unwrap();
    let plan = SettlementPlanner::plan(&aggregation.report(&group).balances);
    assert!(plan.is_empty());
}

/// An expense followed by a payment covering it in full brings both
/// balances to zero and the plan to empty.
#[test]
fn payment_discharges_all_debt() {
    let mut group = GroupSnapshot::new();
    group.add_member(Member::new("usr-a", "Ana"));
    group.add_member(Member::new("usr-b", "Ben"));
    group.add_expense(Expense::new(id("usr-a"), dec!(200)).with_split(id("usr-b"), dec!(100)).with_split(id("usr-a"), dec!(100)));
    group.add_payment(Payment::new(id("usr-b"), id("usr-a"), dec!(100)));

    let aggregation = BalanceEngine::aggregate(&group).unwrap();
    assert_eq!(aggregation.sheet().balance(&id("usr-a")), Decimal::ZERO);
    assert_eq!(aggregation.sheet().balance(&id("usr-b")), Decimal::ZERO);

    let plan = SettlementPlanner::plan(&aggregation.report(&group).balances);
    assert!(plan.is_empty());
}

/// Applying every planned transaction to the rounded balances zeroes them.
#[test]
fn applying_plan_zeroes_balances() {
    let mut group = GroupSnapshot::new();
    for (uid, name) in [
        ("usr-a", "Ana"),
        ("usr-b", "Ben"),
        ("usr-c", "Cai"),
        ("usr-d", "Dee"),
        ("usr-e", "Eli"),
    ] {
        group.add_member(Member::new(uid, name));
    }
    group.add_expense(Expense::new(id("usr-a"), dec!(123.45)));
    group.add_expense(Expense::new(id("usr-b"), dec!(67.80)));
    group.add_expense(
        Expense::new(id("usr-c"), dec!(55.55))
            .with_split(id("usr-d"), dec!(25.55))
            .with_split(id("usr-e"), dec!(30.00)),
    );

    let report = BalanceEngine::aggregate(&group).unwrap().report(&group);
    let plan = SettlementPlanner::plan(&report.balances);

    let mut remaining: HashMap<MemberId, Decimal> = report
        .balances
        .iter()
        .map(|b| (b.member.clone(), b.balance))
        .collect();
    for t in plan.transactions() {
        *remaining.get_mut(&t.from).unwrap() += t.amount;
        *remaining.get_mut(&t.to).unwrap() -= t.amount;
    }

    let leftover: Decimal = remaining.values().map(|v| v.abs()).sum();
    assert_eq!(leftover, plan.residual().abs());
    // 123.45 and 67.80 divide by 5 exactly; the itemized expense is exact.
    assert_eq!(plan.residual(), Decimal::ZERO);
    assert!(remaining.values().all(|v| *v == Decimal::ZERO));
}

/// Equal-split aggregation against an empty group is a fatal error.
#[test]
fn empty_group_equal_split_is_fatal() {
    let mut group = GroupSnapshot::new();
    group.add_expense(Expense::new(id("usr-ghost"), dec!(10)));

    match BalanceEngine::aggregate(&group) {
        Err(LedgerError::EmptyGroup { .. }) => {}
        other => panic!("expected EmptyGroup error, got {:?}", other),
    }
}

/// Recomputing from the same snapshot yields identical results.
#[test]
fn recomputation_is_idempotent() {
    let mut group = GroupSnapshot::new();
    group.add_member(Member::new("usr-a", "Ana"));
    group.add_member(Member::new("usr-b", "Ben"));
    group.add_member(Member::new("usr-c", "Cai"));
    group.add_expense(Expense::new(id("usr-a"), dec!(100)));
    group.add_expense(Expense::new(id("usr-b"), dec!(47.31)));
    group.add_payment(Payment::new(id("usr-c"), id("usr-a"), dec!(12)));

    let first = BalanceEngine::aggregate(&group).unwrap();
    let second = BalanceEngine::aggregate(&group).unwrap();
    assert_eq!(first, second);

    let plan_a = SettlementPlanner::plan(&first.report(&group).balances);
    let plan_b = SettlementPlanner::plan(&second.report(&group).balances);
    assert_eq!(plan_a, plan_b);

    let graph_a = DebtGraphBuilder::build(&group).unwrap();
    let graph_b = DebtGraphBuilder::build(&group).unwrap();
    assert_eq!(graph_a, graph_b);
}

/// The JSON shapes exposed to consumers carry the expected fields.
#[test]
fn query_outputs_serialize() {
    let mut group = GroupSnapshot::new();
    group.add_member(Member::new("usr-a", "Ana"));
    group.add_member(Member::new("usr-b", "Ben"));
    group.add_expense(Expense::new(id("usr-a"), dec!(80)));

    let aggregation = BalanceEngine::aggregate(&group).unwrap();
    let report = aggregation.report(&group);
    let json: serde_json::Value =
        serde_json::from_str(&serde_json::to_string(&report).unwrap()).unwrap();
    assert!(json.get("total_expenses").is_some());
    assert!(json.get("per_person_share").is_some());
    assert_eq!(json["balances"].as_array().unwrap().len(), 2);
    assert_eq!(json["balances"][0]["name"], "Ana");

    let plan = SettlementPlanner::plan(&report.balances);
    let json: serde_json::Value =
        serde_json::from_str(&serde_json::to_string(&plan).unwrap()).unwrap();
    assert_eq!(json["transactions"].as_array().unwrap().len(), 1);

    let graph = DebtGraphBuilder::build(&group).unwrap();
    let json: serde_json::Value =
        serde_json::from_str(&serde_json::to_string(&graph).unwrap()).unwrap();
    assert!(json.get("nodes").is_some());
    assert!(json.get("raw_edges").is_some());
    assert!(json.get("optimized_edges").is_some());
}

/// No raw edge ever points from a member to itself.
#[test]
fn raw_edges_have_no_self_loops() {
    let mut group = GroupSnapshot::new();
    group.add_member(Member::new("usr-a", "Ana"));
    group.add_member(Member::new("usr-b", "Ben"));
    // Payer appears in their own split list.
    group.add_expense(
        Expense::new(id("usr-a"), dec!(100))
            .with_split(id("usr-a"), dec!(60))
            .with_split(id("usr-b"), dec!(40)),
    );
    group.add_expense(Expense::new(id("usr-b"), dec!(50)));

    let graph = DebtGraphBuilder::build(&group).unwrap();
    assert!(graph.raw_edges().iter().all(|e| e.from != e.to));
    // Ana's self-split is omitted from edges but counted in her spend.
    let ana = graph
        .nodes()
        .iter()
        .find(|n| n.id.as_str() == "usr-a")
        .unwrap();
    assert_eq!(ana.total_spent, dec!(85.00)); // 60 + 25
}
