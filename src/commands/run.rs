//! Run command implementation
//!
//! The run command executes the whole pipeline:
//! 1. Resolve configuration and load every category's job list
//! 2. Check that the analyzer can be started
//! 3. Start one worker per category and print each completed repository
//! 4. Report per-category totals on stderr
//!
//! Ctrl-C raises the shared cancel flag. Workers stop after the repository
//! in hand and the command exits with an error. A second Ctrl-C exits
//! immediately.

use anyhow::Result;
use clap::Args;
use log::{info, warn};
use repo_metrics::cancel::CancelFlag;

use super::ConfigArgs;

/// Arguments for the run command
#[derive(Args, Debug)]
pub struct RunArgs {
    #[command(flatten)]
    pub config: ConfigArgs,

    /// Suppress the final summary
    #[arg(short, long)]
    pub quiet: bool,
}

/// Execute the run command
pub fn execute(args: RunArgs) -> Result<()> {
    use repo_metrics::analyzer::CommandAnalyzer;
    use repo_metrics::coordinator::{drop_cross_category_duplicates, Coordinator};
    use repo_metrics::repository::DefaultGitOperations;
    use repo_metrics::worker::PipelineContext;
    use std::time::Instant;

    let start_time = Instant::now();
    let config = args.config.resolve()?;
    // Count only what will actually run
    let batches = drop_cross_category_duplicates(super::load_batches(&config)?);

    let analyzer = CommandAnalyzer::new(config.analyzer.program.clone());
    if analyzer.probe().is_err() {
        return Err(repo_metrics::suggestions::analyzer_not_found(analyzer.program()));
    }

    let total: usize = batches.iter().map(|(_, records)| records.len()).sum();
    info!(
        "Processing {} repositories across {} categories",
        total,
        batches.len()
    );

    let context = PipelineContext::new(
        Box::new(DefaultGitOperations::with_depth(config.clone_depth)),
        Box::new(analyzer),
        &config.workspace_root,
        &config.output_root,
    )
    .with_formats(config.analyzer.formats.clone());

    let cancel = CancelFlag::new();
    install_interrupt_handler(cancel.clone());

    let summary = Coordinator::new(context)
        .with_channel_capacity(config.channel_capacity)
        .with_cancel_flag(cancel.clone())
        .run(batches, |token| println!("{}", token))?;

    if !args.quiet {
        for report in &summary.reports {
            eprintln!(
                "{}: {}/{} completed, {} clone failure(s), {} analyzer failure(s){}",
                report.category,
                report.completed,
                report.processed,
                report.clone_failures,
                report.analyzer_failures,
                if report.cancelled { ", stopped early" } else { "" }
            );
        }
        eprintln!(
            "Done: {} of {} repositories in {:.2}s",
            summary.delivered,
            total,
            start_time.elapsed().as_secs_f64()
        );
    }

    if cancel.is_cancelled() {
        anyhow::bail!(
            "Interrupted after {} of {} repositories",
            summary.delivered,
            total
        );
    }

    Ok(())
}

/// Route Ctrl-C (and SIGTERM) to `cancel`.
fn install_interrupt_handler(cancel: CancelFlag) {
    let result = ctrlc::set_handler(move || {
        if cancel.is_cancelled() {
            std::process::exit(130);
        }
        warn!("Interrupted, stopping after the repositories in progress (Ctrl-C again to abort)");
        cancel.cancel();
    });
    if let Err(e) = result {
        warn!("Cannot install interrupt handler: {}", e);
    }
}
