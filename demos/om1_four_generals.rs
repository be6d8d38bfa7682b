// Demo A: OM(1) with four generals and one traitorous lieutenant

use byzantine_generals::consensus::{General, Order};
use byzantine_generals::scenario::{report, run_roster};
use byzantine_generals::RunConfig;

#[tokio::main]
async fn main() {
    println!("\n{}", "=".repeat(80));
    println!("  Demo A: OM(1), four generals, lieutenant 3 is a traitor");
    println!("{}", "=".repeat(80));

    let roster: Vec<General> = (0..4).map(|id| General::new(id, id == 3)).collect();

    match run_roster(&roster, 1, Order::Attack, &RunConfig::default()).await {
        Ok(outcome) => {
            report::print_outcome(&outcome);
            println!("Both loyal lieutenants follow the loyal commander:");
            println!("  - lieutenant 3 tells lieutenant 2 to retreat");
            println!("  - lieutenant 2 still sees Attack from the commander and lieutenant 1");
            println!("  - majority(Attack, Attack, Retreat) = Attack");
            println!();
        }
        Err(e) => println!("Error: {}", e),
    }
}
