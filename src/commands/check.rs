//! Check command implementation
//!
//! Validates the configuration and loads every job list without cloning.
//! Prints one line per category and lists display ids that appear in more
//! than one category (only the first category's copy would be processed).

use anyhow::Result;
use clap::Args;
use repo_metrics::analyzer::CommandAnalyzer;
use repo_metrics::coordinator::cross_category_duplicates;

use super::ConfigArgs;

/// Arguments for the check command
#[derive(Args, Debug)]
pub struct CheckArgs {
    #[command(flatten)]
    pub config: ConfigArgs,
}

/// Execute the check command
pub fn execute(args: CheckArgs) -> Result<()> {
    let config = args.config.resolve()?;
    let batches = super::load_batches(&config)?;

    for (category, records) in &batches {
        println!("{}: {} repositories", category, records.len());
    }

    for (id, categories) in cross_category_duplicates(&batches) {
        let names: Vec<&str> = categories.iter().map(|c| c.as_str()).collect();
        println!(
            "duplicate: {} in {} (kept in {})",
            id,
            names.join(", "),
            names[0]
        );
    }

    let analyzer = CommandAnalyzer::new(config.analyzer.program.clone());
    if let Err(e) = analyzer.probe() {
        log::warn!("{}", e);
        println!("analyzer: '{}' not found", analyzer.program());
    } else {
        println!("analyzer: {}", analyzer.program());
    }

    Ok(())
}
