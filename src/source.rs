//! # Job Sources
//!
//! A job source produces the ordered list of repositories for one category.
//! The pipeline only depends on the `JobSource` trait; `CsvJobSource` is the
//! implementation used by the CLI and reads `<data_dir>/<category>.csv`.
//!
//! ## File Format
//!
//! No header row. Each row holds at least three columns:
//!
//! ```text
//! owner_login,repo_name,clone_url_base[,ignored...]
//! ```
//!
//! Any unreadable file or malformed row fails the whole load.

use crate::error::{Error, Result};
use crate::job::{Category, JobRecord};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Supplies the ordered job records of a category.
pub trait JobSource: Send + Sync {
    fn load(&self, category: &Category) -> Result<Vec<JobRecord>>;
}

/// Reads one CSV file per category from a data directory.
#[derive(Debug, Clone)]
pub struct CsvJobSource {
    data_dir: PathBuf,
}

impl CsvJobSource {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// The file holding the records for `category`.
    pub fn path_for(&self, category: &Category) -> PathBuf {
        self.data_dir.join(format!("{}.csv", category))
    }
}

impl JobSource for CsvJobSource {
    fn load(&self, category: &Category) -> Result<Vec<JobRecord>> {
        let path = self.path_for(category);
        let file = std::fs::File::open(&path).map_err(|e| Error::JobSource {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        parse_records(file, &path)
    }
}

/// Parse job records from CSV data. `origin` is only used in error messages.
pub fn parse_records<R: std::io::Read>(reader: R, origin: &Path) -> Result<Vec<JobRecord>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut records = Vec::new();
    for (index, row) in csv_reader.records().enumerate() {
        let row_number = index + 1;
        let row = row.map_err(|e| Error::JobSource {
            path: origin.display().to_string(),
            message: format!("row {}: {}", row_number, e),
        })?;

        if row.len() < 3 {
            return Err(Error::JobSource {
                path: origin.display().to_string(),
                message: format!(
                    "row {} has {} column(s), expected owner,repo,url",
                    row_number,
                    row.len()
                ),
            });
        }

        let (owner, repo, url) = (&row[0], &row[1], &row[2]);
        if owner.is_empty() || repo.is_empty() || url.is_empty() {
            return Err(Error::JobSource {
                path: origin.display().to_string(),
                message: format!("row {} has an empty owner, repo or url", row_number),
            });
        }

        records.push(JobRecord::new(owner, repo, url));
    }

    Ok(records)
}

/// A job source backed by in-memory lists, for embedding and tests.
///
/// Categories that were never inserted load as empty.
#[derive(Debug, Clone, Default)]
pub struct StaticJobSource {
    batches: HashMap<Category, Vec<JobRecord>>,
}

impl StaticJobSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_batch(mut self, category: impl Into<Category>, records: Vec<JobRecord>) -> Self {
        self.batches.insert(category.into(), records);
        self
    }
}

impl JobSource for StaticJobSource {
    fn load(&self, category: &Category) -> Result<Vec<JobRecord>> {
        Ok(self.batches.get(category).cloned().unwrap_or_default())
    }
}

/// Load every category's records, in category order.
///
/// Stops at the first failure.
pub fn load_all(
    source: &dyn JobSource,
    categories: &[Category],
) -> Result<Vec<(Category, Vec<JobRecord>)>> {
    categories
        .iter()
        .map(|category| {
            let records = source.load(category)?;
            log::debug!("Loaded {} record(s) for {}", records.len(), category);
            Ok((category.clone(), records))
        })
        .collect()
}
