//! Console tables for run outcomes

use super::{RunOutcome, SweepReport};

fn verdict(ok: bool) -> &'static str {
    if ok {
        "Yes"
    } else {
        "No"
    }
}

/// Print one run's decisions
pub fn print_outcome(outcome: &RunOutcome) {
    println!("\n{}", "=".repeat(80));
    println!(
        "  OM({}) with {} generals, initial order {}",
        outcome.faults, outcome.generals, outcome.initial_order
    );
    println!("{}", "=".repeat(80));
    println!();

    match outcome.leader {
        Some(leader) => println!("{:<30} | issued {}", leader.to_string(), outcome.initial_order),
        None => println!("{:<30} | never issued an order", "Commander 0 (absent)"),
    }
    for decision in &outcome.decisions {
        println!("{:<30} | decided {}", decision.general.to_string(), decision.order);
    }

    println!("{}", "-".repeat(80));
    println!(
        "Agreement: {} | Validity: {} | Time: {:.2}ms",
        verdict(outcome.agreement()),
        verdict(outcome.validity()),
        outcome.elapsed.as_secs_f64() * 1000.0
    );
    println!("{}", "=".repeat(80));
    println!();
}

/// Print a sweep summary, one row per run
pub fn print_sweep(report: &SweepReport) {
    println!("\n{}", "=".repeat(100));
    println!(
        "  Traitor placement sweep: {} generals, initial order {}",
        report.generals, report.initial_order
    );
    println!("{}", "=".repeat(100));
    println!();
    println!(
        "{:<6} | {:<20} | {:<12} | {:<10} | {:<10} | {:<10}",
        "m", "Traitors", "Leader", "Consensus", "Agreement", "Validity"
    );
    println!("{}", "-".repeat(100));

    for outcome in &report.outcomes {
        let consensus = outcome
            .consensus()
            .map(|o| o.to_string())
            .unwrap_or_else(|| "?".to_string());
        println!(
            "{:<6} | {:<20} | {:<12} | {:<10} | {:<10} | {:<10}",
            outcome.faults,
            format!("{:?}", outcome.traitor_ids()),
            if outcome.leader_loyal() { "loyal" } else { "traitor" },
            consensus,
            verdict(outcome.agreement()),
            verdict(outcome.validity())
        );
    }

    println!("{}", "=".repeat(100));
    let failures = report.failures().count();
    if failures == 0 {
        println!("All {} runs passed!", report.runs());
    } else {
        println!("{} of {} runs FAILED!", failures, report.runs());
    }
    println!();
}
