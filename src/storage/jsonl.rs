//! JSON Lines result store
//!
//! One UTF-8 JSON object per line, appended and never rewritten. Each append
//! is a single `write_all` of a complete line on an `O_APPEND` handle followed
//! by `sync_data`, so a crash can at worst leave one torn final line. Torn or
//! otherwise unparseable lines are skipped on load.

use crate::storage::traits::{ResultStore, StorageResult};
use crate::storage::{CrawlRecord, ResumeState, StoredEntry};
use serde::de::DeserializeOwned;
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, ErrorKind, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

/// Append-only JSON Lines store
#[derive(Debug)]
pub struct JsonlStore {
    path: PathBuf,
    file: File,
}

impl JsonlStore {
    /// Opens (creating if needed) the results file at `path`
    ///
    /// If the file ends in a partial line from an interrupted write, a newline
    /// is appended first so the next record starts on a line of its own.
    pub fn open(path: &Path) -> StorageResult<Self> {
        let mut file = OpenOptions::new()
            .create(true)
            .read(true)
            .append(true)
            .open(path)?;

        if terminate_torn_line(&mut file)? {
            tracing::warn!(
                "Results file {} ended in a partial record; it will be skipped on load",
                path.display()
            );
        }

        Ok(Self {
            path: path.to_path_buf(),
            file,
        })
    }

    /// Returns the path of the results file
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ResultStore for JsonlStore {
    fn append(&mut self, record: &CrawlRecord) -> StorageResult<()> {
        let mut line = serde_json::to_vec(record)?;
        line.push(b'\n');

        self.file.write_all(&line)?;
        self.file.flush()?;
        self.file.sync_data()?;

        Ok(())
    }

    fn load_existing(&self) -> StorageResult<ResumeState> {
        let mut state = ResumeState::default();

        let malformed = scan_lines::<StoredEntry, _>(&self.path, |entry| state.absorb(entry))?;
        state.malformed = malformed;

        tracing::debug!(
            "Loaded {} stored records ({} fingerprints, {} malformed) from {}",
            state.scraped.len(),
            state.fingerprints.len(),
            state.malformed,
            self.path.display()
        );

        Ok(state)
    }
}

/// Full records read back from a results file
#[derive(Debug, Clone, Default)]
pub struct RecordScan {
    pub records: Vec<CrawlRecord>,
    pub malformed: usize,
}

/// Reads every complete record from a results file without opening it for writing
///
/// A missing file reads as empty.
pub fn read_records(path: &Path) -> StorageResult<RecordScan> {
    let mut records = Vec::new();
    let malformed = scan_lines::<CrawlRecord, _>(path, |record| records.push(record))?;
    Ok(RecordScan { records, malformed })
}

/// Parses each non-blank line of `path` as `T`, returning the number of failures
fn scan_lines<T, F>(path: &Path, mut on_record: F) -> StorageResult<usize>
where
    T: DeserializeOwned,
    F: FnMut(T),
{
    let file = match File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(0),
        Err(e) => return Err(e.into()),
    };

    let mut malformed = 0;
    for (index, line) in BufReader::new(file).split(b'\n').enumerate() {
        let line = line?;
        if line.iter().all(u8::is_ascii_whitespace) {
            continue;
        }

        match serde_json::from_slice::<T>(&line) {
            Ok(record) => on_record(record),
            Err(e) => {
                malformed += 1;
                tracing::warn!(
                    "Skipping malformed record at {}:{}: {}",
                    path.display(),
                    index + 1,
                    e
                );
            }
        }
    }

    Ok(malformed)
}

/// Appends a newline if the file's last byte is not one; returns whether it did
fn terminate_torn_line(file: &mut File) -> StorageResult<bool> {
    if file.metadata()?.len() == 0 {
        return Ok(false);
    }

    let mut last = [0u8; 1];
    file.seek(SeekFrom::End(-1))?;
    file.read_exact(&mut last)?;

    if last[0] == b'\n' {
        return Ok(false);
    }

    file.write_all(b"\n")?;
    file.sync_data()?;
    Ok(true)
}
