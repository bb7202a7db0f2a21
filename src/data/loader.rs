// ============================================================
// Table Loader
// ============================================================
// Reads a MedPix CSV into typed records with the csv crate and
// serde. The whole table is loaded once when an adapter is
// built; after that the rows are read-only.
//
// Failure here is fatal for the adapter: a missing file, a
// missing required column or a malformed row all come back as
// DatasetError and construction stops.
//
// Rows whose task type has no prompt bucket are handled here
// too, according to the configured UnknownTypePolicy.
//
// Reference: csv crate documentation (serde support)

use std::path::{Path, PathBuf};

use crate::domain::record::TableRecord;
use crate::domain::traits::RecordSource;
use crate::error::DatasetError;
use crate::infra::config::UnknownTypePolicy;
use crate::prompts::catalog::PromptCatalog;

/// Loads every row of a CSV file with a header line.
pub struct CsvRecordSource {
    path: PathBuf,
}

impl CsvRecordSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn table_error(&self, source: csv::Error) -> DatasetError {
        DatasetError::Table {
            path: self.path.clone(),
            source,
        }
    }
}

impl<T: TableRecord> RecordSource<T> for CsvRecordSource {
    fn load_all(&self) -> Result<Vec<T>, DatasetError> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_path(&self.path)
            .map_err(|e| self.table_error(e))?;

        // serde treats a missing Option column as None, so required
        // columns are checked against the header explicitly.
        let headers = reader.headers().map_err(|e| self.table_error(e))?.clone();
        for &column in T::REQUIRED_COLUMNS {
            if !headers.iter().any(|h| h == column) {
                return Err(DatasetError::MissingColumn {
                    path:   self.path.clone(),
                    column,
                });
            }
        }

        let records = reader
            .deserialize::<T>()
            .collect::<Result<Vec<T>, csv::Error>>()
            .map_err(|e| self.table_error(e))?;

        tracing::info!("Loaded {} rows from '{}'", records.len(), self.path.display());
        Ok(records)
    }
}

/// Check every row's task type against the catalog.
///
/// With `Reject` the first unknown type fails the whole load;
/// with `Skip` those rows are dropped and counted in a warning.
pub fn retain_known_task_types<T: TableRecord>(
    records: Vec<T>,
    catalog: &PromptCatalog,
    policy:  UnknownTypePolicy,
) -> Result<Vec<T>, DatasetError> {
    let total = records.len();
    let mut kept = Vec::with_capacity(total);

    for record in records {
        match record.task_type() {
            Some(task_type) if !catalog.contains(task_type) => match policy {
                UnknownTypePolicy::Reject => {
                    return Err(DatasetError::UnknownTaskType {
                        family:    catalog.family().to_string(),
                        task_type: task_type.to_string(),
                    });
                }
                UnknownTypePolicy::Skip => {
                    tracing::debug!("Skipping row with unknown task type '{}'", task_type);
                }
            },
            _ => kept.push(record),
        }
    }

    if kept.len() < total {
        tracing::warn!(
            "Dropped {} of {} rows with task types unknown to the {} catalog",
            total - kept.len(),
            total,
            catalog.family()
        );
    }
    Ok(kept)
}
