//! # Coordinator
//!
//! The coordinator owns a run: it starts one [`CategoryWorker`] per category
//! on its own named thread, merges their completion tokens into a single
//! stream handed to the caller's sink, and returns once every worker has
//! signaled termination and been joined.
//!
//! ## Fan-in
//!
//! Each worker gets two channels: a bounded token channel and a termination
//! channel. The coordinator blocks in a `crossbeam` select over every token
//! channel still open and every termination channel not yet signaled, so it
//! never polls. Token delivery is never gated on termination:
//!
//! - A token is handed to the sink as soon as it is received. Tokens of one
//!   category keep their order; categories interleave freely.
//! - When a category's termination signal arrives, every token that worker
//!   sent is already buffered (it sends its tokens before the signal), so
//!   the coordinator drains them and drops the category from the select.
//! - The run is over when every category, by identity, has terminated.
//!
//! ## Output collisions
//!
//! Report files are keyed by `owner-repo`. Before starting, records whose
//! identifier already appears in an earlier category are dropped with a
//! warning so two workers never write the same report.

use crate::cancel::CancelFlag;
use crate::error::{Error, Result};
use crate::job::{Category, CompletionToken, JobRecord, TerminationSignal};
use crate::worker::{CategoryWorker, PipelineContext, WorkerReport};
use crossbeam::channel::{bounded, Receiver, Select};
use log::{debug, info, warn};
use std::collections::{HashMap, HashSet};
use std::thread;

/// Default capacity of each worker's token channel.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 100;

/// Result of a completed run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    /// One report per category, in the order the categories were given.
    pub reports: Vec<WorkerReport>,
    /// Tokens handed to the sink.
    pub delivered: usize,
}

impl RunSummary {
    pub fn total_completed(&self) -> usize {
        self.reports.iter().map(|r| r.completed).sum()
    }

    pub fn total_clone_failures(&self) -> usize {
        self.reports.iter().map(|r| r.clone_failures).sum()
    }
}

/// Starts the category workers and merges their output.
pub struct Coordinator {
    context: PipelineContext,
    channel_capacity: usize,
    cancel: CancelFlag,
}

impl Coordinator {
    pub fn new(context: PipelineContext) -> Self {
        Self {
            context,
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
            cancel: CancelFlag::new(),
        }
    }

    /// Capacity of each token channel; values below one are raised to one.
    pub fn with_channel_capacity(mut self, capacity: usize) -> Self {
        self.channel_capacity = capacity.max(1);
        self
    }

    /// Use an externally owned cancel flag instead of a private one.
    pub fn with_cancel_flag(mut self, cancel: CancelFlag) -> Self {
        self.cancel = cancel;
        self
    }

    /// A handle that stops every worker at its next record boundary.
    pub fn cancel_flag(&self) -> CancelFlag {
        self.cancel.clone()
    }

    /// Process every batch and feed each completion token to `sink` as it
    /// arrives.
    ///
    /// Returns after all workers terminated. Per-record failures are only
    /// visible in the returned reports; an `Err` means a worker failed
    /// fatally or panicked, or the output layout could not be prepared.
    pub fn run<F>(self, batches: Vec<(Category, Vec<JobRecord>)>, mut sink: F) -> Result<RunSummary>
    where
        F: FnMut(&CompletionToken),
    {
        check_unique_categories(&batches)?;
        let batches = drop_cross_category_duplicates(batches);
        let context = self.context.prepare()?;
        let cancel = self.cancel;
        let capacity = self.channel_capacity;

        info!("Starting {} category worker(s)", batches.len());

        thread::scope(|scope| {
            let mut lanes = Vec::with_capacity(batches.len());
            let mut handles = Vec::with_capacity(batches.len());
            let mut spawn_error = None;

            for (category, records) in batches {
                let (token_tx, token_rx) = bounded(capacity);
                let (term_tx, term_rx) = bounded(1);
                let worker = CategoryWorker::new(category.clone(), records, &context, cancel.clone());

                let spawned = thread::Builder::new()
                    .name(format!("worker-{}", category))
                    .spawn_scoped(scope, move || worker.run(token_tx, term_tx));

                match spawned {
                    Ok(handle) => {
                        lanes.push(Lane::new(category.clone(), token_rx, term_rx));
                        handles.push((category, handle));
                    }
                    Err(e) => {
                        cancel.cancel();
                        spawn_error = Some(Error::Worker {
                            category: category.to_string(),
                            message: format!("failed to spawn thread: {}", e),
                        });
                        break;
                    }
                }
            }

            let delivered = fan_in(&mut lanes, &mut sink);

            let mut reports = Vec::with_capacity(handles.len());
            let mut first_error = spawn_error;
            for (category, handle) in handles {
                match handle.join() {
                    Ok(Ok(report)) => reports.push(report),
                    Ok(Err(e)) => {
                        first_error.get_or_insert(e);
                    }
                    Err(_) => {
                        first_error.get_or_insert(Error::WorkerPanicked {
                            category: category.to_string(),
                        });
                    }
                }
            }

            match first_error {
                Some(e) => Err(e),
                None => {
                    info!("All workers finished, {} repositories completed", delivered);
                    Ok(RunSummary { reports, delivered })
                }
            }
        })
    }
}

/// One worker's pair of channels, as seen by the coordinator.
struct Lane {
    category: Category,
    tokens: Receiver<CompletionToken>,
    termination: Receiver<TerminationSignal>,
    tokens_open: bool,
    terminated: bool,
}

impl Lane {
    fn new(
        category: Category,
        tokens: Receiver<CompletionToken>,
        termination: Receiver<TerminationSignal>,
    ) -> Self {
        Self {
            category,
            tokens,
            termination,
            tokens_open: true,
            terminated: false,
        }
    }
}

#[derive(Clone, Copy)]
enum Source {
    Tokens,
    Termination,
}

enum Event {
    Token(CompletionToken),
    TokensClosed,
    Terminated,
}

/// Merge every lane into `sink` until all lanes have terminated.
///
/// Returns the number of tokens delivered.
fn fan_in<F>(lanes: &mut [Lane], sink: &mut F) -> usize
where
    F: FnMut(&CompletionToken),
{
    let mut delivered = 0;

    while lanes.iter().any(|lane| !lane.terminated) {
        let (index, event) = {
            let mut select = Select::new();
            let mut sources = Vec::new();
            for (index, lane) in lanes.iter().enumerate() {
                if lane.tokens_open {
                    select.recv(&lane.tokens);
                    sources.push((index, Source::Tokens));
                }
                if !lane.terminated {
                    select.recv(&lane.termination);
                    sources.push((index, Source::Termination));
                }
            }

            let operation = select.select();
            let (index, source) = sources[operation.index()];
            let lane = &lanes[index];
            let event = match source {
                Source::Tokens => match operation.recv(&lane.tokens) {
                    Ok(token) => Event::Token(token),
                    Err(_) => Event::TokensClosed,
                },
                Source::Termination => {
                    if operation.recv(&lane.termination).is_err() {
                        warn!("[{}] Worker exited without a termination signal", lane.category);
                    }
                    Event::Terminated
                }
            };
            (index, event)
        };

        let lane = &mut lanes[index];
        match event {
            Event::Token(token) => {
                sink(&token);
                delivered += 1;
            }
            Event::TokensClosed => lane.tokens_open = false,
            Event::Terminated => {
                lane.terminated = true;
                for token in lane.tokens.try_iter() {
                    sink(&token);
                    delivered += 1;
                }
                lane.tokens_open = false;
                debug!("[{}] Terminated", lane.category);
            }
        }
    }

    delivered
}

fn check_unique_categories(batches: &[(Category, Vec<JobRecord>)]) -> Result<()> {
    let mut seen = HashSet::new();
    for (category, _) in batches {
        if !seen.insert(category) {
            return Err(Error::DuplicateCategory {
                category: category.to_string(),
            });
        }
    }
    Ok(())
}

/// Remove records whose display id already belongs to an earlier category.
///
/// Duplicates inside a single category are kept; they run one after the
/// other and cannot race on their report files.
pub fn drop_cross_category_duplicates(
    batches: Vec<(Category, Vec<JobRecord>)>,
) -> Vec<(Category, Vec<JobRecord>)> {
    let mut owners: HashMap<String, Category> = HashMap::new();

    batches
        .into_iter()
        .map(|(category, records)| {
            let kept: Vec<JobRecord> = records
                .into_iter()
                .filter(|record| {
                    let id = record.display_id();
                    if let Some(owner) = owners.get(&id) {
                        if *owner == category {
                            return true;
                        }
                        warn!(
                            "[{}] Skipping {}: already scheduled under {}",
                            category, id, owner
                        );
                        return false;
                    }
                    owners.insert(id, category.clone());
                    true
                })
                .collect();
            (category, kept)
        })
        .collect()
}

/// Display ids that appear in more than one category, with the categories
/// they appear in.
pub fn cross_category_duplicates(batches: &[(Category, Vec<JobRecord>)]) -> Vec<(String, Vec<Category>)> {
    let mut seen: HashMap<String, Vec<Category>> = HashMap::new();
    for (category, records) in batches {
        for record in records {
            let categories = seen.entry(record.display_id()).or_default();
            if !categories.contains(category) {
                categories.push(category.clone());
            }
        }
    }

    let mut duplicates: Vec<(String, Vec<Category>)> =
        seen.into_iter().filter(|(_, categories)| categories.len() > 1).collect();
    duplicates.sort();
    duplicates
}
