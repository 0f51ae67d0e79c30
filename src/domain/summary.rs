use serde::Serialize;
use std::collections::HashMap;
use std::hash::Hash;

use crate::domain::record::PredictionRecord;
use crate::domain::zodiac::{ChineseSign, WesternSign};

pub const NO_DATA: &str = "no data";

/// Aggregates over the whole log. Every `None` means the log was empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummaryTable {
    pub total: usize,
    pub first_timestamp: Option<String>,
    pub last_timestamp: Option<String>,
    pub top_beer_score: Option<u8>,
    pub top_western: Option<WesternSign>,
    pub top_chinese: Option<ChineseSign>,
}

impl SummaryTable {
    /// Label/value pairs in display order, with `NO_DATA` for missing aggregates.
    pub fn rows(&self) -> Vec<(&'static str, String)> {
        fn or_no_data<T: ToString>(value: &Option<T>) -> String {
            value.as_ref().map(|v| v.to_string()).unwrap_or_else(|| NO_DATA.to_string())
        }

        vec![
            ("Total predictions", self.total.to_string()),
            ("First prediction", or_no_data(&self.first_timestamp)),
            ("Last prediction", or_no_data(&self.last_timestamp)),
            ("Most common beer score", or_no_data(&self.top_beer_score)),
            ("Most common Western sign", or_no_data(&self.top_western)),
            ("Most common Chinese sign", or_no_data(&self.top_chinese)),
        ]
    }
}

pub fn build_summary(records: &[PredictionRecord]) -> SummaryTable {
    // `YYYY-MM-DD HH:MM` sorts lexically in time order.
    let first_timestamp = records.iter().map(|r| &r.timestamp).min().cloned();
    let last_timestamp = records.iter().map(|r| &r.timestamp).max().cloned();

    SummaryTable {
        total: records.len(),
        first_timestamp,
        last_timestamp,
        top_beer_score: stable_mode(records.iter().map(|r| r.beer_score)),
        top_western: stable_mode(records.iter().map(|r| r.western)),
        top_chinese: stable_mode(records.iter().map(|r| r.chinese)),
    }
}

/// Most frequent value; ties go to the value seen first.
fn stable_mode<T, I>(values: I) -> Option<T>
where
    T: Copy + Eq + Hash,
    I: IntoIterator<Item = T>,
{
    let mut counts: HashMap<T, usize> = HashMap::new();
    let mut first_seen: Vec<T> = Vec::new();

    for value in values {
        let count = counts.entry(value).or_insert(0);
        if *count == 0 {
            first_seen.push(value);
        }
        *count += 1;
    }

    let mut best: Option<(T, usize)> = None;
    for value in first_seen {
        let count = counts[&value];
        match best {
            Some((_, best_count)) if best_count >= count => {}
            _ => best = Some((value, count)),
        }
    }
    best.map(|(value, _)| value)
}
