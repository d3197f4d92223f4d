//! # Category Worker
//!
//! A category worker drives one category's job list to completion. For each
//! record, strictly in order, it:
//!
//! 1.  Acquires a fresh [`Workspace`].
//! 2.  Clones the repository into it. A failed clone is logged, the workspace
//!     is released and the record is skipped without a completion token.
//! 3.  Runs the analyzer once per configured output format. Each format is
//!     independent; a failure is logged and the next format is still tried.
//! 4.  Releases the workspace.
//! 5.  Sends a [`CompletionToken`].
//!
//! When the list is exhausted, or cancellation is observed, the worker sends
//! exactly one [`TerminationSignal`]. The signal is sent from a drop guard,
//! so it is also delivered when the worker returns early or unwinds.
//!
//! The only fatal error is failing to create a workspace. The worker then
//! raises the shared cancel flag, so sibling workers stop at their next
//! record, and returns the error.

use crate::analyzer::{report_path, Analyzer, OutputFormat};
use crate::cancel::CancelFlag;
use crate::error::{Error, Result};
use crate::job::{path_component, Category, CompletionToken, JobRecord, TerminationSignal};
use crate::repository::GitOperations;
use crate::workspace::{self, Workspace};
use crossbeam::channel::Sender;
use log::{debug, error, info, warn};
use std::path::{Path, PathBuf};

/// Everything a worker needs besides its own job list.
///
/// Shared read-only by all workers of a run.
pub struct PipelineContext {
    pub git: Box<dyn GitOperations>,
    pub analyzer: Box<dyn Analyzer>,
    /// Parent directory of every workspace.
    pub workspace_root: PathBuf,
    /// Reports land in `<output_root>/<format>/`.
    pub output_root: PathBuf,
    pub formats: Vec<OutputFormat>,
}

impl PipelineContext {
    pub fn new(
        git: Box<dyn GitOperations>,
        analyzer: Box<dyn Analyzer>,
        workspace_root: impl Into<PathBuf>,
        output_root: impl Into<PathBuf>,
    ) -> Self {
        Self {
            git,
            analyzer,
            workspace_root: workspace_root.into(),
            output_root: output_root.into(),
            formats: OutputFormat::ALL.to_vec(),
        }
    }

    pub fn with_formats(mut self, formats: Vec<OutputFormat>) -> Self {
        self.formats = formats;
        self
    }

    /// Make both roots absolute and create the workspace root and one output
    /// directory per format.
    ///
    /// The analyzer runs with the workspace as its working directory, so
    /// report paths must not be relative.
    pub fn prepare(mut self) -> Result<Self> {
        self.workspace_root = absolute(&self.workspace_root)?;
        self.output_root = absolute(&self.output_root)?;

        workspace::ensure_root(&self.workspace_root)?;
        for format in &self.formats {
            let dir = self.output_root.join(format.as_str());
            std::fs::create_dir_all(&dir).map_err(|e| Error::Workspace {
                path: dir.display().to_string(),
                message: e.to_string(),
            })?;
        }
        Ok(self)
    }
}

fn absolute(path: &Path) -> Result<PathBuf> {
    std::path::absolute(path).map_err(|e| Error::Workspace {
        path: path.display().to_string(),
        message: e.to_string(),
    })
}

/// Tally of one worker's run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkerReport {
    pub category: Category,
    /// Records the worker started on.
    pub processed: usize,
    /// Completion tokens sent.
    pub completed: usize,
    pub clone_failures: usize,
    pub analyzer_failures: usize,
    /// The worker stopped before the end of its list.
    pub cancelled: bool,
}

impl WorkerReport {
    pub fn new(category: Category) -> Self {
        Self {
            category,
            processed: 0,
            completed: 0,
            clone_failures: 0,
            analyzer_failures: 0,
            cancelled: false,
        }
    }
}

/// Sends the termination signal when dropped.
struct TerminationGuard {
    category: Category,
    sender: Sender<TerminationSignal>,
}

impl Drop for TerminationGuard {
    fn drop(&mut self) {
        // The coordinator may already be gone; nothing left to tell it then
        let _ = self.sender.send(TerminationSignal {
            category: self.category.clone(),
        });
    }
}

enum Outcome {
    Completed(CompletionToken),
    Skipped,
    Interrupted,
}

/// Processes the records of one category, sequentially.
pub struct CategoryWorker<'a> {
    category: Category,
    records: Vec<JobRecord>,
    context: &'a PipelineContext,
    cancel: CancelFlag,
}

impl<'a> CategoryWorker<'a> {
    pub fn new(
        category: Category,
        records: Vec<JobRecord>,
        context: &'a PipelineContext,
        cancel: CancelFlag,
    ) -> Self {
        Self {
            category,
            records,
            context,
            cancel,
        }
    }

    /// Run to completion, sending one token per successful record on
    /// `tokens` and a single signal on `termination` at the end.
    pub fn run(
        self,
        tokens: Sender<CompletionToken>,
        termination: Sender<TerminationSignal>,
    ) -> Result<WorkerReport> {
        let _guard = TerminationGuard {
            category: self.category.clone(),
            sender: termination,
        };

        let mut report = WorkerReport::new(self.category.clone());
        info!(
            "[{}] Starting worker with {} repositories",
            self.category,
            self.records.len()
        );

        for record in &self.records {
            if self.cancel.is_cancelled() {
                info!("[{}] Cancelled, stopping before {}", self.category, record.display_id());
                report.cancelled = true;
                break;
            }

            report.processed += 1;
            let outcome = match self.process(record, &mut report) {
                Ok(outcome) => outcome,
                Err(e) => {
                    error!("[{}] Fatal: {}", self.category, e);
                    self.cancel.cancel();
                    return Err(Error::Worker {
                        category: self.category.to_string(),
                        message: e.to_string(),
                    });
                }
            };

            match outcome {
                Outcome::Completed(token) => {
                    if tokens.send(token).is_err() {
                        warn!("[{}] Coordinator stopped listening", self.category);
                        report.cancelled = true;
                        break;
                    }
                    report.completed += 1;
                }
                Outcome::Skipped => {}
                Outcome::Interrupted => {
                    report.cancelled = true;
                    break;
                }
            }
        }

        info!(
            "[{}] Finished: {} of {} completed",
            self.category,
            report.completed,
            self.records.len()
        );
        Ok(report)
    }

    /// Clone and analyze one record. `Err` is reserved for fatal conditions.
    fn process(&self, record: &JobRecord, report: &mut WorkerReport) -> Result<Outcome> {
        let display_id = record.display_id();
        let url = record.clone_url();
        let workspace = Workspace::acquire(&self.context.workspace_root, &path_component(&display_id))?;

        debug!("[{}] Cloning {} into {}", self.category, url, workspace.path().display());
        if let Err(e) = self.context.git.clone_repository(&url, workspace.path()) {
            error!("[{}] Skipping {}: {}", self.category, display_id, e);
            report.clone_failures += 1;
            self.release(workspace);
            return Ok(Outcome::Skipped);
        }

        for format in &self.context.formats {
            if self.cancel.is_cancelled() {
                info!("[{}] Cancelled while analyzing {}", self.category, display_id);
                self.release(workspace);
                return Ok(Outcome::Interrupted);
            }

            let output = report_path(&self.context.output_root, *format, &display_id);
            match self.context.analyzer.analyze(workspace.path(), *format, &output) {
                Ok(()) => debug!("[{}] Wrote {}", self.category, output.display()),
                Err(e) => {
                    warn!("[{}] {}", self.category, e);
                    report.analyzer_failures += 1;
                }
            }
        }

        self.release(workspace);
        Ok(Outcome::Completed(CompletionToken {
            category: self.category.clone(),
            display_id,
        }))
    }

    fn release(&self, workspace: Workspace) {
        if let Err(e) = workspace.release() {
            warn!("[{}] {}", self.category, e);
        }
    }
}
