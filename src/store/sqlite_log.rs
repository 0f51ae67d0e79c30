use async_trait::async_trait;
use sqlx::{sqlite::SqlitePoolOptions, Pool, Sqlite};
use std::fs;
use std::path::Path;

use crate::domain::record::PredictionRecord;
use crate::store::{PredictionStore, StoreError};

pub type DbPool = Pool<Sqlite>;

pub async fn init_db(db_path: &str) -> Result<DbPool, StoreError> {
    let in_memory = db_path == ":memory:";

    if !in_memory {
        if let Some(parent) = Path::new(db_path).parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).map_err(|e| StoreError::Write {
                    location: db_path.to_string(),
                    reason: e.to_string(),
                })?;
            }
        }
    }

    let db_url = format!("sqlite:{}?mode=rwc", db_path);

    // Each in-memory connection would otherwise see its own empty database.
    let max_connections = if in_memory { 1 } else { 5 };
    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections)
        .connect(&db_url)
        .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS predictions (
          timestamp TEXT NOT NULL,
          user_name TEXT NOT NULL,
          dob TEXT NOT NULL,
          beer_score INTEGER NOT NULL,
          western TEXT NOT NULL,
          chinese TEXT NOT NULL
        );
        "#,
    )
    .execute(&pool)
    .await?;

    Ok(pool)
}

#[derive(sqlx::FromRow)]
pub struct PredictionRow {
    pub timestamp: String,
    pub user_name: String,
    pub dob: String,
    pub beer_score: i64,
    pub western: String,
    pub chinese: String,
}

impl TryFrom<PredictionRow> for PredictionRecord {
    type Error = String;

    fn try_from(row: PredictionRow) -> Result<Self, Self::Error> {
        let record = PredictionRecord {
            beer_score: u8::try_from(row.beer_score).map_err(|_| format!("beer_score {} out of range", row.beer_score))?,
            western: row.western.parse().map_err(|_| format!("unknown western sign {:?}", row.western))?,
            chinese: row.chinese.parse().map_err(|_| format!("unknown chinese sign {:?}", row.chinese))?,
            timestamp: row.timestamp,
            user_name: row.user_name,
            dob: row.dob,
        };
        record.validate()?;
        Ok(record)
    }
}

/// SQLite-backed log. Row order is rowid order.
pub struct SqlitePredictionLog {
    pool: DbPool,
    location: String,
}

impl SqlitePredictionLog {
    pub async fn open(db_path: &str) -> Result<Self, StoreError> {
        let pool = init_db(db_path).await?;
        Ok(Self {
            pool,
            location: db_path.to_string(),
        })
    }
}

#[async_trait]
impl PredictionStore for SqlitePredictionLog {
    async fn load_all(&self) -> Result<Vec<PredictionRecord>, StoreError> {
        let rows = sqlx::query_as::<_, PredictionRow>(
            "SELECT timestamp, user_name, dob, beer_score, western, chinese FROM predictions ORDER BY rowid ASC",
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .enumerate()
            .map(|(i, row)| {
                PredictionRecord::try_from(row).map_err(|reason| StoreError::Read {
                    location: self.location.clone(),
                    reason: format!("row {}: {}", i + 1, reason),
                })
            })
            .collect()
    }

    async fn append(&self, record: PredictionRecord) -> Result<usize, StoreError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            "INSERT INTO predictions (timestamp, user_name, dob, beer_score, western, chinese) VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(&record.timestamp)
        .bind(&record.user_name)
        .bind(&record.dob)
        .bind(i64::from(record.beer_score))
        .bind(record.western.as_str())
        .bind(record.chinese.as_str())
        .execute(&mut *tx)
        .await?;

        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM predictions")
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(count as usize)
    }
}
