use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::domain::zodiac::{ChineseSign, WesternSign};

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M";
pub const DOB_FORMAT: &str = "%Y-%m-%d";

/// Column order of the persisted log.
pub const LOG_COLUMNS: [&str; 6] = ["timestamp", "user_name", "dob", "beer_score", "western", "chinese"];

/// One logged submission. Field order matches `LOG_COLUMNS`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PredictionRecord {
    pub timestamp: String,
    pub user_name: String,
    pub dob: String,
    pub beer_score: u8,
    pub western: WesternSign,
    pub chinese: ChineseSign,
}

pub fn format_timestamp(at: &NaiveDateTime) -> String {
    at.format(TIMESTAMP_FORMAT).to_string()
}

pub const MIN_BEER_SCORE: u8 = 1;
pub const MAX_BEER_SCORE: u8 = 5;

impl PredictionRecord {
    /// Checks the fields the type system does not: score bounds and the exact
    /// zero-padded timestamp and dob layouts that summaries sort on.
    pub fn validate(&self) -> Result<(), String> {
        if !(MIN_BEER_SCORE..=MAX_BEER_SCORE).contains(&self.beer_score) {
            return Err(format!("beer_score {} out of range", self.beer_score));
        }

        let canonical_timestamp = NaiveDateTime::parse_from_str(&self.timestamp, TIMESTAMP_FORMAT)
            .map(|t| t.format(TIMESTAMP_FORMAT).to_string());
        if canonical_timestamp.as_deref() != Ok(self.timestamp.as_str()) {
            return Err(format!("timestamp {:?} is not YYYY-MM-DD HH:MM", self.timestamp));
        }

        let canonical_dob = NaiveDate::parse_from_str(&self.dob, DOB_FORMAT).map(|d| d.format(DOB_FORMAT).to_string());
        if canonical_dob.as_deref() != Ok(self.dob.as_str()) {
            return Err(format!("dob {:?} is not YYYY-MM-DD", self.dob));
        }
        Ok(())
    }
}
