//! splitledger CLI
//!
//! Query a group ledger from the command line.
//!
//! # Usage
//!
//! ```bash
//! # Net balances for a group
//! splitledger balances --input group.json
//!
//! # Minimal settlement plan
//! splitledger settle --input group.json --format json
//!
//! # Raw vs. optimized debt graph
//! splitledger graph --input group.json --format json
//!
//! # Generate a random group for testing
//! splitledger generate --members 6 --expenses 25
//! ```

use rust_decimal::Decimal;
use splitledger::core::member::{Member, MemberId};
use splitledger::core::record::{Expense, GroupSnapshot, Payment, Split};
use splitledger::graph::debt_graph::DebtGraphBuilder;
use splitledger::settlement::aggregate::{BalanceEngine, LedgerError};
use splitledger::settlement::planner::SettlementPlanner;
use splitledger::simulation::random_group::{generate_random_group, GroupConfig};
use std::fs;
use std::process;

fn print_usage() {
    eprintln!(
        r#"splitledger — shared-expense balances, settlement plans and debt graphs

USAGE:
    splitledger <COMMAND> [OPTIONS]

COMMANDS:
    balances    Compute each member's net balance
    settle      Compute the minimal settlement plan
    graph       Build the raw and optimized debt graphs
    generate    Generate a random group file (for testing)
    help        Show this message

OPTIONS (balances, settle, graph):
    --input <FILE>      Path to a JSON group file
    --format <FORMAT>   Output format: text (default) or json

OPTIONS (generate):
    --members <N>       Number of members (default: 5)
    --expenses <N>      Number of expenses (default: 20)
    --payments <N>      Number of payments (default: 3)
    --output <FILE>     Write to file instead of stdout

EXAMPLES:
    splitledger balances --input group.json
    splitledger settle --input group.json --format json
    splitledger graph --input group.json --format json
    splitledger generate --members 8 --expenses 40 --output group.json"#
    );
}

/// JSON schema for input group files.
#[derive(serde::Deserialize)]
struct GroupFile {
    members: Vec<MemberInput>,
    #[serde(default)]
    expenses: Vec<ExpenseInput>,
    #[serde(default)]
    payments: Vec<PaymentInput>,
}

#[derive(serde::Deserialize)]
struct MemberInput {
    id: String,
    name: String,
}

#[derive(serde::Deserialize)]
struct ExpenseInput {
    payer: String,
    amount: String,
    #[serde(default)]
    splits: Vec<SplitInput>,
    #[serde(default)]
    description: Option<String>,
}

#[derive(serde::Deserialize)]
struct SplitInput {
    member: String,
    amount: String,
}

#[derive(serde::Deserialize)]
struct PaymentInput {
    from: String,
    to: String,
    amount: String,
}

/// JSON output schema for balance queries.
#[derive(serde::Serialize)]
struct BalancesOutput {
    total_expenses: String,
    per_person_share: String,
    balances: Vec<BalanceOutput>,
    warnings: Vec<String>,
}

#[derive(serde::Serialize)]
struct BalanceOutput {
    member: String,
    name: String,
    balance: String,
    status: String,
}

/// JSON output schema for settlement queries.
#[derive(serde::Serialize)]
struct SettleOutput {
    settlements: Vec<SettlementOutput>,
    residual: String,
    warnings: Vec<String>,
}

#[derive(serde::Serialize)]
struct SettlementOutput {
    from: String,
    to: String,
    from_name: String,
    to_name: String,
    amount: String,
}

fn parse_amount(raw: &str, context: &str) -> Decimal {
    let amount: Decimal = raw.parse().unwrap_or_else(|e| {
        eprintln!("Invalid amount '{}' for {}: {}", raw, context, e);
        process::exit(1);
    });
    if amount <= Decimal::ZERO {
        eprintln!("Amount for {} must be positive, got {}", context, amount);
        process::exit(1);
    }
    amount
}

fn load_group(path: &str) -> GroupSnapshot {
    let content = fs::read_to_string(path).unwrap_or_else(|e| {
        eprintln!("Error reading file '{}': {}", path, e);
        process::exit(1);
    });

    let file: GroupFile = serde_json::from_str(&content).unwrap_or_else(|e| {
        eprintln!("Error parsing JSON: {}", e);
        eprintln!("Expected format:");
        eprintln!(
            r#"{{
  "members": [ {{ "id": "usr-alice", "name": "Alice" }} ],
  "expenses": [ {{ "payer": "usr-alice", "amount": "90.00",
                   "splits": [ {{ "member": "usr-bob", "amount": "45.00" }} ] }} ],
  "payments": [ {{ "from": "usr-bob", "to": "usr-alice", "amount": "45.00" }} ]
}}"#
        );
        process::exit(1);
    });

    let mut group = GroupSnapshot::new();
    for m in file.members {
        group.add_member(Member::new(m.id, m.name));
    }
    for e in file.expenses {
        let amount = parse_amount(&e.amount, "expense");
        let mut expense = Expense::new(MemberId::new(e.payer), amount);
        if !e.splits.is_empty() {
            let splits = e
                .splits
                .iter()
                .map(|s| {
                    let share: Decimal = s.amount.parse().unwrap_or_else(|err| {
                        eprintln!("Invalid split amount '{}': {}", s.amount, err);
                        process::exit(1);
                    });
                    Split::new(MemberId::new(s.member.as_str()), share)
                })
                .collect();
            expense = expense.with_splits(splits);
        }
        if let Some(description) = e.description {
            expense = expense.with_description(description);
        }
        group.add_expense(expense);
    }
    for p in file.payments {
        let amount = parse_amount(&p.amount, "payment");
        group.add_payment(Payment::new(
            MemberId::new(p.from),
            MemberId::new(p.to),
            amount,
        ));
    }
    group
}

fn exit_on_ledger_error(err: LedgerError) -> ! {
    eprintln!("Error: {}", err);
    process::exit(1);
}

/// Parse the shared `--input` / `--format` option pair.
fn parse_query_options(args: &[String]) -> (String, String) {
    let mut input_path = None;
    let mut format = "text".to_string();
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--input" => {
                i += 1;
                input_path = Some(args.get(i).cloned().unwrap_or_else(|| {
                    eprintln!("--input requires a file path");
                    process::exit(1);
                }));
            }
            "--format" => {
                i += 1;
                format = args.get(i).cloned().unwrap_or_else(|| {
                    eprintln!("--format requires 'text' or 'json'");
                    process::exit(1);
                });
            }
            _ => {
                eprintln!("Unknown option: {}", args[i]);
                process::exit(1);
            }
        }
        i += 1;
    }

    let path = input_path.unwrap_or_else(|| {
        eprintln!("Error: --input <FILE> is required");
        process::exit(1);
    });
    (path, format)
}

fn cmd_balances(args: &[String]) {
    let (path, format) = parse_query_options(args);
    let group = load_group(&path);

    let aggregation = BalanceEngine::aggregate(&group).unwrap_or_else(|e| exit_on_ledger_error(e));
    let report = aggregation.report(&group);

    if format == "json" {
        let output = BalancesOutput {
            total_expenses: report.total_expenses.to_string(),
            per_person_share: report.per_person_share.to_string(),
            balances: report
                .balances
                .iter()
                .map(|b| BalanceOutput {
                    member: b.member.to_string(),
                    name: b.name.clone(),
                    balance: b.balance.to_string(),
                    status: if b.balance > Decimal::ZERO {
                        "CREDITOR".to_string()
                    } else if b.balance < Decimal::ZERO {
                        "DEBTOR".to_string()
                    } else {
                        "SETTLED".to_string()
                    },
                })
                .collect(),
            warnings: aggregation.warnings().iter().map(|w| w.to_string()).collect(),
        };
        println!("{}", serde_json::to_string_pretty(&output).unwrap());
    } else {
        print!("{}", report);
        for warning in aggregation.warnings() {
            eprintln!("warning: {}", warning);
        }
    }
}

fn cmd_settle(args: &[String]) {
    let (path, format) = parse_query_options(args);
    let group = load_group(&path);

    let aggregation = BalanceEngine::aggregate(&group).unwrap_or_else(|e| exit_on_ledger_error(e));
    let report = aggregation.report(&group);
    let plan = SettlementPlanner::plan(&report.balances);

    if format == "json" {
        let output = SettleOutput {
            settlements: plan
                .transactions()
                .iter()
                .map(|t| SettlementOutput {
                    from: t.from.to_string(),
                    to: t.to.to_string(),
                    from_name: t.from_name.clone(),
                    to_name: t.to_name.clone(),
                    amount: t.amount.to_string(),
                })
                .collect(),
            residual: plan.residual().to_string(),
            warnings: aggregation.warnings().iter().map(|w| w.to_string()).collect(),
        };
        println!("{}", serde_json::to_string_pretty(&output).unwrap());
    } else {
        print!("{}", plan);
        for warning in aggregation.warnings() {
            eprintln!("warning: {}", warning);
        }
    }
}

fn cmd_graph(args: &[String]) {
    let (path, format) = parse_query_options(args);
    let group = load_group(&path);

    let graph = DebtGraphBuilder::build(&group).unwrap_or_else(|e| exit_on_ledger_error(e));

    if format == "json" {
        println!("{}", serde_json::to_string_pretty(&graph).unwrap());
    } else {
        print!("{}", graph);
    }
}

fn cmd_generate(args: &[String]) {
    let mut config = GroupConfig::default();
    let mut output_path: Option<String> = None;
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--members" => {
                i += 1;
                config.member_count = args.get(i).and_then(|s| s.parse().ok()).unwrap_or_else(|| {
                    eprintln!("--members requires a number");
                    process::exit(1);
                });
            }
            "--expenses" => {
                i += 1;
                config.expense_count =
                    args.get(i).and_then(|s| s.parse().ok()).unwrap_or_else(|| {
                        eprintln!("--expenses requires a number");
                        process::exit(1);
                    });
            }
            "--payments" => {
                i += 1;
                config.payment_count =
                    args.get(i).and_then(|s| s.parse().ok()).unwrap_or_else(|| {
                        eprintln!("--payments requires a number");
                        process::exit(1);
                    });
            }
            "--output" => {
                i += 1;
                output_path = Some(args.get(i).cloned().unwrap_or_else(|| {
                    eprintln!("--output requires a file path");
                    process::exit(1);
                }));
            }
            _ => {
                eprintln!("Unknown option: {}", args[i]);
                process::exit(1);
            }
        }
        i += 1;
    }

    let group = generate_random_group(&config);

    #[derive(serde::Serialize)]
    struct OutputSplit {
        member: String,
        amount: String,
    }

    #[derive(serde::Serialize)]
    struct OutputExpense {
        payer: String,
        amount: String,
        #[serde(skip_serializing_if = "Vec::is_empty")]
        splits: Vec<OutputSplit>,
    }

    #[derive(serde::Serialize)]
    struct OutputPayment {
        from: String,
        to: String,
        amount: String,
    }

    #[derive(serde::Serialize)]
    struct OutputMember {
        id: String,
        name: String,
    }

    #[derive(serde::Serialize)]
    struct OutputFile {
        members: Vec<OutputMember>,
        expenses: Vec<OutputExpense>,
        payments: Vec<OutputPayment>,
    }

    let output = OutputFile {
        members: group
            .members()
            .iter()
            .map(|m| OutputMember {
                id: m.id.to_string(),
                name: m.name.clone(),
            })
            .collect(),
        expenses: group
            .expenses()
            .iter()
            .map(|e| OutputExpense {
                payer: e.payer().to_string(),
                amount: e.amount().to_string(),
                splits: e
                    .splits()
                    .iter()
                    .map(|s| OutputSplit {
                        member: s.member.to_string(),
                        amount: s.share.to_string(),
                    })
                    .collect(),
            })
            .collect(),
        payments: group
            .payments()
            .iter()
            .map(|p| OutputPayment {
                from: p.from().to_string(),
                to: p.to().to_string(),
                amount: p.amount().to_string(),
            })
            .collect(),
    };

    let json = serde_json::to_string_pretty(&output).unwrap();

    if let Some(path) = output_path {
        fs::write(&path, &json).unwrap_or_else(|e| {
            eprintln!("Error writing to '{}': {}", path, e);
            process::exit(1);
        });
        eprintln!(
            "Generated {} expenses across {} members → {}",
            group.expense_count(),
            group.member_count(),
            path
        );
    } else {
        println!("{}", json);
    }
}

fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        process::exit(1);
    }

    let command = args[1].as_str();
    let rest = &args[2..];

    match command {
        "balances" => cmd_balances(rest),
        "settle" => cmd_settle(rest),
        "graph" => cmd_graph(rest),
        "generate" => cmd_generate(rest),
        "help" | "--help" | "-h" => print_usage(),
        _ => {
            eprintln!("Unknown command: {}", command);
            print_usage();
            process::exit(1);
        }
    }
}
