//! Uneven shares and the debt graph: how many raw debt lines collapse
//! into the optimized transfer set.

use rust_decimal_macros::dec;
use splitledger::core::member::{Member, MemberId};
use splitledger::core::record::{Expense, GroupSnapshot};
use splitledger::graph::debt_graph::DebtGraphBuilder;

fn main() {
    println!("╔══════════════════════════════════════════╗");
    println!("║   splitledger: Debt Graph Compression    ║");
    println!("╚══════════════════════════════════════════╝\n");

    let mut group = GroupSnapshot::new();
    group.add_member(Member::new("usr-ana", "Ana"));
    group.add_member(Member::new("usr-ben", "Ben"));
    group.add_member(Member::new("usr-cai", "Cai"));

    // A week of lunches, every day paid by someone else, shares uneven.
    for (payer, first, second) in [
        ("usr-ana", ("usr-ben", dec!(14.50)), ("usr-cai", dec!(9.20))),
        ("usr-ben", ("usr-ana", dec!(11.00)), ("usr-cai", dec!(13.30))),
        ("usr-cai", ("usr-ana", dec!(8.75)), ("usr-ben", dec!(12.25))),
        ("usr-ana", ("usr-ben", dec!(10.40)), ("usr-cai", dec!(7.60))),
    ] {
        let amount = first.1 + second.1;
        group.add_expense(
            Expense::new(MemberId::new(payer), amount)
                .with_split(MemberId::new(first.0), first.1)
                .with_split(MemberId::new(second.0), second.1),
        );
    }

    let graph = DebtGraphBuilder::build(&group).expect("group has members");
    println!("{}", graph);

    println!("Raw debt lines:");
    for edge in graph.raw_edges() {
        println!("  {} → {}  {}", edge.from, edge.to, edge.amount);
    }

    println!("\nOptimized transfers:");
    if graph.optimized_edges().is_empty() {
        println!("  (everyone settled up)");
    } else {
        for edge in graph.optimized_edges() {
            println!("  {} → {}  {}", edge.from, edge.to, edge.amount);
        }
    }
}
