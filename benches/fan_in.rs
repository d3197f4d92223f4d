//! Benchmarks for the coordinator's fan-in.
//!
//! Git and the analyzer are replaced by no-op implementations so the numbers
//! reflect thread startup, workspace churn and channel merging only.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use repo_metrics::analyzer::{Analyzer, OutputFormat};
use repo_metrics::coordinator::Coordinator;
use repo_metrics::error::Result;
use repo_metrics::job::{Category, JobRecord};
use repo_metrics::repository::GitOperations;
use repo_metrics::worker::PipelineContext;
use std::path::Path;
use tempfile::TempDir;

struct NoopGit;

impl GitOperations for NoopGit {
    fn clone_repository(&self, _url: &str, _target_dir: &Path) -> Result<()> {
        Ok(())
    }
}

struct NoopAnalyzer;

impl Analyzer for NoopAnalyzer {
    fn analyze(&self, _workspace: &Path, _format: OutputFormat, _output: &Path) -> Result<()> {
        Ok(())
    }
}

fn batches(categories: usize, records: usize) -> Vec<(Category, Vec<JobRecord>)> {
    (0..categories)
        .map(|c| {
            let owner = format!("owner{}", c);
            let records = (0..records)
                .map(|r| {
                    let repo = format!("repo{}", r);
                    let url = format!("https://example.com/{}/{}", owner, repo);
                    JobRecord::new(owner.clone(), repo, url)
                })
                .collect();
            (Category::new(format!("lang{}", c)), records)
        })
        .collect()
}

fn run_once(root: &Path, batches: Vec<(Category, Vec<JobRecord>)>, capacity: usize) -> usize {
    let context = PipelineContext::new(
        Box::new(NoopGit),
        Box::new(NoopAnalyzer),
        root.join("repositories"),
        root.join("out"),
    );
    let mut delivered = 0;
    Coordinator::new(context)
        .with_channel_capacity(capacity)
        .run(batches, |token| {
            black_box(token);
            delivered += 1;
        })
        .unwrap();
    delivered
}

/// Scaling with the number of categories at a fixed list length.
fn bench_categories(c: &mut Criterion) {
    let mut group = c.benchmark_group("fan_in_categories");
    let root = TempDir::new().unwrap();

    for categories in [1usize, 4, 16] {
        group.bench_with_input(
            BenchmarkId::from_parameter(categories),
            &categories,
            |b, &categories| {
                b.iter(|| run_once(root.path(), batches(categories, 20), 100));
            },
        );
    }

    group.finish();
}

/// A capacity of one forces every send to wait for the coordinator.
fn bench_channel_capacity(c: &mut Criterion) {
    let mut group = c.benchmark_group("fan_in_capacity");
    let root = TempDir::new().unwrap();

    for capacity in [1usize, 100] {
        group.bench_with_input(
            BenchmarkId::from_parameter(capacity),
            &capacity,
            |b, &capacity| {
                b.iter(|| run_once(root.path(), batches(4, 50), capacity));
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_categories, bench_channel_capacity);
criterion_main!(benches);
