//! Storage layer for feedback records.
//!
//! Records live in a single JSON file holding an array, newest first. Every
//! read loads the whole file and every write rewrites it.

pub mod page;

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::record::{next_id, FeedbackRecord, ValidFeedback};

pub use page::{Page, PageRequest, Pagination};

/// Flat-file store for feedback records.
///
/// Appends within this process are serialized; nothing guards against a
/// second process writing the same file.
#[derive(Debug)]
pub struct FeedbackStore {
    /// Path to the JSON file.
    path: PathBuf,
    /// Last id handed out. Held for the whole read-modify-write of an append.
    last_id: Mutex<Option<i64>>,
}

impl FeedbackStore {
    /// Open the store at the given path.
    ///
    /// Creates the parent directories, and an empty `[]` file if none exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory or the initial file can't be created.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).map_err(|source| Error::DirectoryCreate {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }

        let store = Self {
            path,
            last_id: Mutex::new(None),
        };

        if !store.path.exists() {
            debug!("Creating empty feedback file at {}", store.path.display());
            store.persist(&[])?;
        }

        info!("Feedback store opened at {}", store.path.display());
        Ok(store)
    }

    /// Get the path to the record file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Insert validated feedback at the head of the collection and persist it.
    ///
    /// Returns the stored record with its assigned `id` and `date`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::StorageWrite`] if the file can't be rewritten, or
    /// [`Error::Internal`] if the stored ids leave no larger id to assign.
    pub fn append(&self, fields: ValidFeedback) -> Result<FeedbackRecord> {
        // The guarded id is only updated after a successful write, so a
        // poisoned lock still holds a consistent value.
        let mut last_id = self.last_id.lock().unwrap_or_else(PoisonError::into_inner);

        // Entries that don't decode as records are carried over untouched.
        let mut entries = self.load_entries()?;

        let floor = entries
            .iter()
            .filter_map(|entry| entry.get("id").and_then(Value::as_i64))
            .chain(*last_id)
            .max();
        let now = Utc::now();
        let id = next_id(now, floor)
            .ok_or_else(|| Error::internal("no feedback id left above the stored maximum"))?;
        let record = FeedbackRecord::new(id, fields, now);

        entries.insert(0, serde_json::to_value(&record)?);
        self.persist(&entries)?;
        *last_id = Some(record.id);

        info!(id = record.id, total = entries.len(), "Stored feedback");
        Ok(record)
    }

    /// Return one page of records, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`Error::StorageRead`] if the file exists but can't be read.
    /// A missing or unparseable file reads as empty, and entries that aren't
    /// valid records are skipped.
    pub fn list(&self, request: PageRequest) -> Result<Page> {
        let records = self.load()?;
        Ok(Page::from_records(records, request))
    }

    /// Return one page of records containing `query` in any text field.
    ///
    /// Matching ignores case. A blank query behaves like [`Self::list`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::StorageRead`] if the file exists but can't be read.
    pub fn search(&self, query: &str, request: PageRequest) -> Result<Page> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return self.list(request);
        }

        let matching: Vec<_> = self
            .load()?
            .into_iter()
            .filter(|record| record.matches(&needle))
            .collect();
        debug!(query = %needle, hits = matching.len(), "Searched feedback");

        Ok(Page::from_records(matching, request))
    }

    /// Count stored records.
    ///
    /// # Errors
    ///
    /// Returns [`Error::StorageRead`] if the file exists but can't be read.
    pub fn count(&self) -> Result<usize> {
        Ok(self.load()?.len())
    }

    /// Report that the store is reachable.
    ///
    /// The store is local, so this always succeeds once the process is up.
    #[must_use]
    pub fn health(&self) -> Health {
        Health::ok()
    }

    /// Get store statistics.
    ///
    /// # Errors
    ///
    /// Returns [`Error::StorageRead`] if the file exists but can't be read.
    pub fn stats(&self) -> Result<StoreStats> {
        let records = self.load()?;

        let file_size_bytes = fs::metadata(&self.path).map(|m| m.len()).unwrap_or(0);

        Ok(StoreStats {
            total_records: records.len(),
            newest_record: records.iter().map(|r| r.date).max(),
            oldest_record: records.iter().map(|r| r.date).min(),
            file_size_bytes,
        })
    }

    /// Read the whole collection, skipping entries that aren't valid records.
    fn load(&self) -> Result<Vec<FeedbackRecord>> {
        let records = self
            .load_entries()?
            .into_iter()
            .enumerate()
            .filter_map(
                |(index, entry)| match serde_json::from_value::<FeedbackRecord>(entry) {
                    Ok(record) => Some(record),
                    Err(e) => {
                        warn!(index, error = %e, "Skipping malformed feedback record");
                        None
                    }
                },
            )
            .collect();
        Ok(records)
    }

    /// Read the raw entries of the collection.
    ///
    /// A file that isn't JSON, or whose top level isn't an array, reads as
    /// empty.
    fn load_entries(&self) -> Result<Vec<Value>> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => {
                return Err(Error::StorageRead {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        match serde_json::from_str(&contents) {
            Ok(Value::Array(entries)) => Ok(entries),
            Ok(_) => {
                warn!(
                    "Feedback file at {} does not hold an array, treating as empty",
                    self.path.display()
                );
                Ok(Vec::new())
            }
            Err(e) => {
                warn!(
                    error = %e,
                    "Unparseable feedback file at {}, treating as empty",
                    self.path.display()
                );
                Ok(Vec::new())
            }
        }
    }

    /// Rewrite the whole collection.
    ///
    /// Writes a sibling temp file and renames it over the target, so readers
    /// see either the old or the new contents.
    fn persist(&self, entries: &[Value]) -> Result<()> {
        let json = serde_json::to_string_pretty(entries)?;
        let tmp = self.tmp_path();

        let write_err = |source: std::io::Error| Error::StorageWrite {
            path: self.path.clone(),
            source,
        };

        fs::write(&tmp, json).map_err(write_err)?;
        if let Err(source) = fs::rename(&tmp, &self.path) {
            let _ = fs::remove_file(&tmp);
            return Err(write_err(source));
        }
        Ok(())
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(std::ffi::OsStr::to_os_string)
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

/// Store health report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Health {
    /// Always `"ok"`.
    pub status: &'static str,
    /// Human-readable status.
    pub message: &'static str,
}

impl Health {
    /// The healthy report.
    #[must_use]
    pub fn ok() -> Self {
        Self {
            status: "ok",
            message: "Server is running",
        }
    }
}

/// Statistics about the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoreStats {
    /// Total number of records stored.
    pub total_records: usize,
    /// Date of the newest record.
    pub newest_record: Option<DateTime<Utc>>,
    /// Date of the oldest record.
    pub oldest_record: Option<DateTime<Utc>>,
    /// Size of the record file in bytes.
    pub file_size_bytes: u64,
}
