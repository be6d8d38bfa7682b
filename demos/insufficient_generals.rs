// Demo B: three generals cannot tolerate one traitor (n < 3m + 1)

use byzantine_generals::consensus::Order;
use byzantine_generals::scenario::{report, run_roster, traitor_placements};
use byzantine_generals::RunConfig;

#[tokio::main]
async fn main() {
    println!("\n{}", "=".repeat(80));
    println!("  Demo B: OM(1) with three generals");
    println!("{}", "=".repeat(80));

    let config = RunConfig::default();
    let mut broken = 0;

    for roster in traitor_placements(3, 1) {
        match run_roster(&roster, 1, Order::Attack, &config).await {
            Ok(outcome) => {
                report::print_outcome(&outcome);
                if !outcome.passed() {
                    broken += 1;
                }
            }
            Err(e) => println!("Error: {}", e),
        }
    }

    println!("{} of 3 placements broke agreement.", broken);
    println!("A single traitor is indistinguishable from a traitorous commander");
    println!("when only two lieutenants can compare notes.");
    println!();
}
