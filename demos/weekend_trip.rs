//! Weekend trip walkthrough: equal splits, an itemized expense, and a
//! recorded payment, settled in the minimum number of transfers.

use rust_decimal_macros::dec;
use splitledger::core::member::{Member, MemberId};
use splitledger::core::record::{Expense, GroupSnapshot, Payment};
use splitledger::settlement::aggregate::BalanceEngine;
use splitledger::settlement::planner::SettlementPlanner;

fn main() {
    println!("╔══════════════════════════════════════════╗");
    println!("║   splitledger: Weekend Trip Walkthrough  ║");
    println!("╚══════════════════════════════════════════╝\n");

    let mut group = GroupSnapshot::new();
    group.add_member(Member::new("usr-alice", "Alice"));
    group.add_member(Member::new("usr-bob", "Bob"));
    group.add_member(Member::new("usr-carol", "Carol"));
    group.add_member(Member::new("usr-dan", "Dan"));

    // Alice booked the cabin for everyone.
    group.add_expense(
        Expense::new(MemberId::new("usr-alice"), dec!(480)).with_description("Cabin rental"),
    );

    // Bob bought groceries; Dan skipped the barbecue, so it's itemized.
    group.add_expense(
        Expense::new(MemberId::new("usr-bob"), dec!(90))
            .with_split(MemberId::new("usr-alice"), dec!(30))
            .with_split(MemberId::new("usr-bob"), dec!(30))
            .with_split(MemberId::new("usr-carol"), dec!(30))
            .with_description("Groceries"),
    );

    // Carol covered fuel both ways.
    group.add_expense(Expense::new(MemberId::new("usr-carol"), dec!(60)).with_description("Fuel"));

    // Dan already sent Alice part of his share.
    group.add_payment(
        Payment::new(
            MemberId::new("usr-dan"),
            MemberId::new("usr-alice"),
            dec!(50),
        )
        .with_note("partial repayment"),
    );

    let aggregation = BalanceEngine::aggregate(&group).expect("group has members");
    let report = aggregation.report(&group);
    println!("{}", report);

    let plan = SettlementPlanner::plan(&report.balances);
    println!("{}", plan);
}
