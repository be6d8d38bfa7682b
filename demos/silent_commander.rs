// Demo C: a commander that never speaks

use byzantine_generals::consensus::{ConsensusTree, General, Order, TraitorPolicy};
use byzantine_generals::scenario::{execute, report, run_roster};
use byzantine_generals::RunConfig;
use std::sync::Arc;

#[tokio::main]
async fn main() {
    println!("\n{}", "=".repeat(80));
    println!("  Demo C: withheld and missing orders");
    println!("{}", "=".repeat(80));

    // A traitor commander that closes every slot it owns.
    let roster: Vec<General> = (0..4)
        .map(|id| General::new(id, id == 0).with_policy(TraitorPolicy::Withhold))
        .collect();
    match run_roster(&roster, 1, Order::Attack, &RunConfig::default()).await {
        Ok(outcome) => report::print_outcome(&outcome),
        Err(e) => println!("Error: {}", e),
    }

    // A commander that never shows up; lieutenants wait out the timeout.
    let config = RunConfig::new().with_timeout_ms(300);
    let lieutenants: Vec<General> = (1..4).map(|id| General::new(id, false)).collect();
    let tree = match ConsensusTree::build(1, 4) {
        Ok(tree) => Arc::new(tree),
        Err(e) => {
            println!("Error: {}", e);
            return;
        }
    };
    match execute(tree, &lieutenants, Order::Attack, &config).await {
        Ok(outcome) => report::print_outcome(&outcome),
        Err(e) => println!("Error: {}", e),
    }
}
