//! Persistence for the prediction log.
//!
//! Callers depend on [`PredictionStore`] only; the backing file or database is
//! chosen once at startup.

use async_trait::async_trait;
use std::sync::Mutex;
use thiserror::Error;

use crate::domain::record::PredictionRecord;

pub mod csv_log;
pub mod sqlite_log;

pub use csv_log::CsvPredictionLog;
pub use sqlite_log::SqlitePredictionLog;

#[derive(Debug, Error)]
pub enum StoreError {
    /// The store exists but does not match the record schema.
    #[error("prediction log {location} is unreadable: {reason}")]
    Read { location: String, reason: String },
    #[error("failed to write prediction log {location}: {reason}")]
    Write { location: String, reason: String },
    /// A writer panicked while holding the log lock.
    #[error("prediction log {0} lock poisoned")]
    Poisoned(String),
    #[error("prediction database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("storage task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Append-only, insertion-ordered log of submissions.
#[async_trait]
pub trait PredictionStore: Send + Sync {
    /// Every record in append order. A store that does not exist yet is empty.
    async fn load_all(&self) -> Result<Vec<PredictionRecord>, StoreError>;

    /// Appends `record` as the last row and returns the row count including it.
    async fn append(&self, record: PredictionRecord) -> Result<usize, StoreError>;
}

/// Process-local log, lost on restart.
#[derive(Default)]
pub struct MemoryPredictionLog {
    records: Mutex<Vec<PredictionRecord>>,
}

impl MemoryPredictionLog {
    pub fn new() -> Self {
        Self::default()
    }

    fn poisoned() -> StoreError {
        StoreError::Poisoned("memory".to_string())
    }
}

#[async_trait]
impl PredictionStore for MemoryPredictionLog {
    async fn load_all(&self) -> Result<Vec<PredictionRecord>, StoreError> {
        let records = self.records.lock().map_err(|_| Self::poisoned())?;
        Ok(records.clone())
    }

    async fn append(&self, record: PredictionRecord) -> Result<usize, StoreError> {
        let mut records = self.records.lock().map_err(|_| Self::poisoned())?;
        records.push(record);
        Ok(records.len())
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use crate::domain::record::PredictionRecord;
    use crate::domain::zodiac::{ChineseSign, WesternSign};

    pub fn sample_record(user_name: &str, beer_score: u8) -> PredictionRecord {
        PredictionRecord {
            timestamp: "2026-01-01 12:00".to_string(),
            user_name: user_name.to_string(),
            dob: "2000-06-15".to_string(),
            beer_score,
            western: WesternSign::Gemini,
            chinese: ChineseSign::Dragon,
        }
    }
}
