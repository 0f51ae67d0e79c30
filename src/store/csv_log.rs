use async_trait::async_trait;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tempfile::NamedTempFile;

use crate::domain::record::{PredictionRecord, LOG_COLUMNS};
use crate::store::{PredictionStore, StoreError};

/// Flat CSV log, one row per record under a fixed header.
///
/// Appends rewrite the whole file through a uniquely named sibling temp file
/// and rename it into place. The write lock is held by the blocking task doing
/// the rewrite, so a cancelled caller cannot release it early. Writers inside
/// this process are serialized; separate processes sharing the file are not.
pub struct CsvPredictionLog {
    path: PathBuf,
    write_lock: Arc<Mutex<()>>,
}

impl CsvPredictionLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl PredictionStore for CsvPredictionLog {
    async fn load_all(&self) -> Result<Vec<PredictionRecord>, StoreError> {
        let path = self.path.clone();
        tokio::task::spawn_blocking(move || read_log(&path)).await?
    }

    async fn append(&self, record: PredictionRecord) -> Result<usize, StoreError> {
        let path = self.path.clone();
        let write_lock = self.write_lock.clone();

        tokio::task::spawn_blocking(move || -> Result<usize, StoreError> {
            // Guards no data, so a panicked writer leaves nothing to repair.
            let _guard = write_lock.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
            let mut records = read_log(&path)?;
            records.push(record);
            write_log(&path, &records)?;
            Ok(records.len())
        })
        .await?
    }
}

pub fn read_log(path: &Path) -> Result<Vec<PredictionRecord>, StoreError> {
    if !path.exists() {
        return Ok(Vec::new());
    }

    let unreadable = |reason: String| StoreError::Read {
        location: path.display().to_string(),
        reason,
    };

    let mut reader = csv::Reader::from_path(path).map_err(|e| unreadable(e.to_string()))?;

    let headers = reader.headers().map_err(|e| unreadable(e.to_string()))?;
    if !headers.iter().eq(LOG_COLUMNS.iter().copied()) {
        return Err(unreadable(format!(
            "unexpected header {:?}, expected {:?}",
            headers.iter().collect::<Vec<_>>(),
            LOG_COLUMNS
        )));
    }

    let mut records = Vec::new();
    for (i, row) in reader.deserialize::<PredictionRecord>().enumerate() {
        // Header is line 1.
        let line = i + 2;
        let record = row.map_err(|e| unreadable(format!("line {line}: {e}")))?;
        record
            .validate()
            .map_err(|reason| unreadable(format!("line {line}: {reason}")))?;
        records.push(record);
    }
    Ok(records)
}

pub fn write_log(path: &Path, records: &[PredictionRecord]) -> Result<(), StoreError> {
    let failed = |reason: String| StoreError::Write {
        location: path.display().to_string(),
        reason,
    };

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent).map_err(|e| failed(e.to_string()))?;
        }
    }

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir).map_err(|e| failed(e.to_string()))?;

    {
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(tmp.as_file_mut());

        writer.write_record(LOG_COLUMNS).map_err(|e| failed(e.to_string()))?;
        for record in records {
            writer.serialize(record).map_err(|e| failed(e.to_string()))?;
        }
        writer.flush().map_err(|e| failed(e.to_string()))?;
    }

    tmp.persist(path).map_err(|e| failed(e.error.to_string()))?;
    Ok(())
}
