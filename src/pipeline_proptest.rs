//! Property-based tests for the worker/coordinator pipeline.
//!
//! These tests use proptest to generate arbitrary category layouts (number
//! of categories, records per category, which clones fail, how long each
//! clone takes) and verify that the fan-in invariants hold for all of them.

#[cfg(test)]
mod proptest_tests {
    use crate::analyzer::{Analyzer, OutputFormat};
    use crate::coordinator::Coordinator;
    use crate::error::{Error, Result};
    use crate::job::{Category, CompletionToken, JobRecord};
    use crate::repository::GitOperations;
    use crate::worker::PipelineContext;
    use proptest::prelude::*;
    use std::path::Path;
    use std::time::Duration;

    /// Clone URLs encode their behavior: `.../fail-*` fails, `.../d<N>-*`
    /// sleeps N milliseconds first.
    struct ScriptedGit;

    impl GitOperations for ScriptedGit {
        fn clone_repository(&self, url: &str, target_dir: &Path) -> Result<()> {
            let name = url.rsplit('/').next().unwrap_or_default();
            if let Some(rest) = name.strip_prefix('d') {
                let millis: u64 = rest.split('-').next().and_then(|n| n.parse().ok()).unwrap_or(0);
                std::thread::sleep(Duration::from_millis(millis));
            }
            if name.contains("fail") {
                return Err(Error::GitClone {
                    url: url.to_string(),
                    message: "scripted failure".to_string(),
                    hint: None,
                });
            }
            std::fs::write(target_dir.join("src.rs"), "")?;
            Ok(())
        }
    }

    struct NoopAnalyzer;

    impl Analyzer for NoopAnalyzer {
        fn analyze(&self, _workspace: &Path, _format: OutputFormat, _output: &Path) -> Result<()> {
            Ok(())
        }
    }

    /// One record: (fails, delay in ms)
    fn category_strategy() -> impl Strategy<Value = Vec<(bool, u64)>> {
        prop::collection::vec((prop::bool::weighted(0.2), 0u64..3), 0..8)
    }

    fn build_batches(layout: &[Vec<(bool, u64)>]) -> Vec<(Category, Vec<JobRecord>)> {
        layout
            .iter()
            .enumerate()
            .map(|(c, records)| {
                let category = Category::new(format!("lang{}", c));
                let records = records
                    .iter()
                    .enumerate()
                    .map(|(i, (fails, delay))| {
                        let repo = if *fails {
                            format!("fail-{}", i)
                        } else {
                            format!("d{}-{}", delay, i)
                        };
                        let owner = format!("owner{}", c);
                        let url = format!("https://example.com/{}/{}", owner, repo);
                        JobRecord::new(owner, repo, url)
                    })
                    .collect();
                (category, records)
            })
            .collect()
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        /// Property: the run terminates, delivers exactly one token per
        /// successful clone, keeps per-category order and leaks no workspace
        #[test]
        fn fan_in_delivers_every_success_in_category_order(
            layout in prop::collection::vec(category_strategy(), 1..5),
            capacity in 1usize..4,
        ) {
            let root = tempfile::TempDir::new().unwrap();
            let batches = build_batches(&layout);
            let context = PipelineContext::new(
                Box::new(ScriptedGit),
                Box::new(NoopAnalyzer),
                root.path().join("ws"),
                root.path().join("out"),
            );

            let mut tokens: Vec<CompletionToken> = Vec::new();
            let summary = Coordinator::new(context)
                .with_channel_capacity(capacity)
                .run(batches.clone(), |t| tokens.push(t.clone()))
                .unwrap();

            prop_assert_eq!(summary.reports.len(), batches.len());
            prop_assert_eq!(summary.delivered, tokens.len());

            for ((category, records), report) in batches.iter().zip(&summary.reports) {
                let expected: Vec<String> = records
                    .iter()
                    .filter(|r| !r.repo_name.starts_with("fail"))
                    .map(|r| r.display_id())
                    .collect();
                let observed: Vec<String> = tokens
                    .iter()
                    .filter(|t| &t.category == category)
                    .map(|t| t.display_id.clone())
                    .collect();

                prop_assert_eq!(&report.category, category);
                prop_assert_eq!(report.processed, records.len());
                prop_assert_eq!(report.completed, expected.len());
                prop_assert_eq!(report.clone_failures, records.len() - expected.len());
                prop_assert_eq!(observed, expected);
            }

            let leftover = std::fs::read_dir(root.path().join("ws")).unwrap().count();
            prop_assert_eq!(leftover, 0);
        }
    }
}
