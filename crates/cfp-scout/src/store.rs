use std::collections::HashSet;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use crate::types::Entry;

pub const HEADER: [&str; 5] = ["identifier", "title", "date", "location", "discovered_at"];

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Failed to read history store {path:?}: {source}")]
    Read { path: PathBuf, source: io::Error },
    #[error("History store {path:?} is malformed: {reason}")]
    Malformed { path: PathBuf, reason: String },
    #[error("Failed to serialize entry '{identifier}': {source}")]
    Serialize { identifier: String, source: csv::Error },
    #[error("Failed to write history store {path:?}: {source}")]
    Write { path: PathBuf, source: io::Error },
}

/// How the store currently ends, which decides what `append` writes first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tail {
    /// Absent or zero-length: the header goes first.
    Empty,
    Terminated,
    /// Last record has no line break, e.g. after a hand edit.
    Unterminated,
}

/// Append-only CSV record of every accepted entry.
#[derive(Debug, Clone)]
pub struct HistoryStore {
    path: PathBuf,
}

impl HistoryStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Every identifier recorded so far. A missing store is an empty history.
    pub fn load(&self) -> Result<HashSet<String>, StoreError> {
        let records = self.records()?;

        let mut known = HashSet::with_capacity(records.len());
        for entry in records {
            if !known.insert(entry.identifier.clone()) {
                log::warn!(
                    "Duplicate identifier in {:?}: {}",
                    self.path,
                    entry.identifier
                );
            }
        }

        log::debug!("Loaded {} known identifier(s) from {:?}", known.len(), self.path);
        Ok(known)
    }

    /// Every stored entry, in file order.
    pub fn records(&self) -> Result<Vec<Entry>, StoreError> {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => {
                return Err(StoreError::Read {
                    path: self.path.clone(),
                    source,
                });
            }
        };

        let mut reader = csv::Reader::from_reader(file);

        let headers = reader.headers().map_err(|e| self.read_error(e))?.clone();
        if headers.is_empty() {
            return Ok(Vec::new());
        }
        if headers.iter().ne(HEADER) {
            return Err(self.malformed(format!(
                "unexpected header '{}'",
                headers.iter().collect::<Vec<_>>().join(",")
            )));
        }

        let mut entries = Vec::new();
        for record in reader.deserialize::<Entry>() {
            let entry = record.map_err(|e| self.read_error(e))?;
            if entry.identifier.trim().is_empty() {
                return Err(self.malformed(format!(
                    "empty identifier in record {}",
                    entries.len() + 1
                )));
            }
            entries.push(entry);
        }

        Ok(entries)
    }

    /// Adds `entries` after the existing records, in order.
    ///
    /// The batch is serialized in memory first and handed to a single append
    /// write, so a serialization failure leaves the store untouched. A crash
    /// in the middle of the write itself can still leave a partial batch.
    pub fn append(&self, entries: &[Entry]) -> Result<(), StoreError> {
        if entries.is_empty() {
            return Ok(());
        }

        let tail = self.tail()?;

        let mut buffer = Vec::new();
        if tail == Tail::Unterminated {
            buffer.push(b'\n');
        }

        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(buffer);

        if tail == Tail::Empty {
            writer
                .write_record(HEADER)
                .map_err(|source| StoreError::Serialize {
                    identifier: "<header>".to_string(),
                    source,
                })?;
        }
        for entry in entries {
            writer
                .serialize(entry)
                .map_err(|source| StoreError::Serialize {
                    identifier: entry.identifier.clone(),
                    source,
                })?;
        }

        let buffer = writer.into_inner().map_err(|e| StoreError::Write {
            path: self.path.clone(),
            source: e.into_error(),
        })?;

        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(|source| self.write_error(source))?;
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|source| self.write_error(source))?;
        file.write_all(&buffer)
            .and_then(|_| file.sync_all())
            .map_err(|source| self.write_error(source))?;

        log::debug!("Appended {} entry(ies) to {:?}", entries.len(), self.path);
        Ok(())
    }

    fn tail(&self) -> Result<Tail, StoreError> {
        let meta = match fs::metadata(&self.path) {
            Ok(meta) => meta,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Tail::Empty),
            Err(source) => return Err(self.read_io_error(source)),
        };
        // Not a regular file: opening it for append reports the failure.
        if !meta.is_file() {
            return Ok(Tail::Terminated);
        }
        if meta.len() == 0 {
            return Ok(Tail::Empty);
        }

        let mut file = File::open(&self.path).map_err(|source| self.read_io_error(source))?;
        let mut last = [0u8; 1];
        file.seek(SeekFrom::End(-1))
            .and_then(|_| file.read_exact(&mut last))
            .map_err(|source| self.read_io_error(source))?;

        if last[0] == b'\n' || last[0] == b'\r' {
            Ok(Tail::Terminated)
        } else {
            Ok(Tail::Unterminated)
        }
    }

    fn malformed(&self, reason: String) -> StoreError {
        StoreError::Malformed {
            path: self.path.clone(),
            reason,
        }
    }

    fn read_error(&self, err: csv::Error) -> StoreError {
        if !err.is_io_error() {
            return self.malformed(err.to_string());
        }
        match err.into_kind() {
            csv::ErrorKind::Io(source) => StoreError::Read {
                path: self.path.clone(),
                source,
            },
            other => self.malformed(format!("{other:?}")),
        }
    }

    fn read_io_error(&self, source: io::Error) -> StoreError {
        StoreError::Read {
            path: self.path.clone(),
            source,
        }
    }

    fn write_error(&self, source: io::Error) -> StoreError {
        StoreError::Write {
            path: self.path.clone(),
            source,
        }
    }
}
