//! List rules command implementation.

use layer_lint_core::rules::all_rules;

/// Runs the list-rules command.
pub fn run() {
    println!("Available rules:\n");
    println!("{:<14} {:<28} Description", "Code", "Name");
    println!("{}", "-".repeat(90));

    for rule in all_rules() {
        println!(
            "{:<14} {:<28} {}",
            rule.code(),
            rule.name(),
            rule.description()
        );
    }

    println!("\nAll rules run by default. Disable one with:");
    println!("  [rules.import-cycle]");
    println!("  enabled = false");
    println!("\nUse --rules to run a subset, e.g.:");
    println!("  layer-lint check --rules domain-isolation,layer-direction");
    println!("  layer-lint check --rules CYCLE001,PURITY001");
}
