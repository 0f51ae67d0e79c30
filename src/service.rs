use chrono::{Datelike, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::auth::{AuthOutcome, Authenticator};
use crate::domain::prediction::PredictionCatalog;
use crate::domain::record::{format_timestamp, PredictionRecord, DOB_FORMAT, MAX_BEER_SCORE, MIN_BEER_SCORE};
use crate::domain::summary::{build_summary, SummaryTable};
use crate::domain::zodiac::{chinese_zodiac, western_zodiac, ChineseSign, WesternSign};
use crate::error::AppError;
use crate::report::{build_workbook, export_file_name};
use crate::store::PredictionStore;

pub const DEFAULT_BEER_SCORE: u8 = 3;
pub const DEFAULT_RECENT_LIMIT: usize = 10;

fn default_beer_score() -> u8 {
    DEFAULT_BEER_SCORE
}

fn earliest_dob() -> NaiveDate {
    NaiveDate::from_ymd_opt(1940, 1, 1).unwrap_or(NaiveDate::MIN)
}

fn latest_dob() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 1, 1).unwrap_or(NaiveDate::MAX)
}

#[derive(Debug, Clone, Deserialize)]
pub struct PredictionForm {
    pub name: String,
    pub dob: NaiveDate,
    #[serde(default = "default_beer_score")]
    pub beer_score: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Metrics {
    /// DD/MM/YYYY
    pub dob: String,
    pub western: WesternSign,
    pub chinese: ChineseSign,
    pub beer_score: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PredictionOutcome {
    pub greeting: String,
    pub metrics: Metrics,
    pub success: String,
    pub love: String,
    pub visitor_count: usize,
    pub visitor_message: String,
}

/// Admin listing. `recent` keeps insertion order, so the newest row is last.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AdminView {
    pub total: usize,
    pub recent: Vec<PredictionRecord>,
    pub summary: SummaryTable,
}

#[derive(Debug, Clone)]
pub struct WorkbookExport {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

pub struct HoroscopeService {
    store: Arc<dyn PredictionStore>,
    catalog: PredictionCatalog,
    authenticator: Arc<dyn Authenticator>,
    recent_limit: usize,
}

impl HoroscopeService {
    pub fn new(
        store: Arc<dyn PredictionStore>,
        catalog: PredictionCatalog,
        authenticator: Arc<dyn Authenticator>,
        recent_limit: usize,
    ) -> Self {
        Self {
            store,
            catalog,
            authenticator,
            recent_limit,
        }
    }

    pub async fn submit(&self, form: PredictionForm, now: NaiveDateTime) -> Result<PredictionOutcome, AppError> {
        let name = form.name.trim();
        if name.is_empty() {
            tracing::warn!("Rejected submission without a name");
            return Err(AppError::Validation("Please enter your name!".to_string()));
        }
        if form.dob < earliest_dob() || form.dob > latest_dob() {
            tracing::warn!(dob = %form.dob, "Rejected submission with out-of-range date of birth");
            return Err(AppError::Validation(format!(
                "Date of birth must be between {} and {}.",
                earliest_dob().format("%d/%m/%Y"),
                latest_dob().format("%d/%m/%Y")
            )));
        }
        if !(MIN_BEER_SCORE..=MAX_BEER_SCORE).contains(&form.beer_score) {
            tracing::warn!(beer_score = form.beer_score, "Rejected submission with out-of-range beer score");
            return Err(AppError::Validation(format!(
                "Beer score must be between {MIN_BEER_SCORE} and {MAX_BEER_SCORE}."
            )));
        }

        let dob_str = form.dob.format(DOB_FORMAT).to_string();
        let western = western_zodiac(&form.dob);
        let chinese = chinese_zodiac(form.dob.year());
        let predictions = self.catalog.build_predictions(&dob_str, form.beer_score);

        let record = PredictionRecord {
            timestamp: format_timestamp(&now),
            user_name: name.to_string(),
            dob: dob_str,
            beer_score: form.beer_score,
            western,
            chinese,
        };
        let visitor_count = self.store.append(record).await.map_err(|e| {
            tracing::error!(error = %e, "Failed to log prediction");
            e
        })?;
        tracing::info!(count = visitor_count, %western, %chinese, beer_score = form.beer_score, "Prediction logged");

        Ok(PredictionOutcome {
            greeting: format!("Cheers, {name}! Here is your 2026 outlook:"),
            metrics: Metrics {
                dob: form.dob.format("%d/%m/%Y").to_string(),
                western,
                chinese,
                beer_score: form.beer_score,
            },
            success: predictions.success,
            love: predictions.love,
            visitor_count,
            visitor_message: format!(
                "You are the {} person to check their beer destiny!",
                ordinal(visitor_count)
            ),
        })
    }

    /// `Ok(None)` when no password was entered.
    pub async fn admin_view(&self, password: &str) -> Result<Option<AdminView>, AppError> {
        if !self.authorize(password)? {
            return Ok(None);
        }

        let records = self.store.load_all().await?;
        let summary = build_summary(&records);
        let start = records.len().saturating_sub(self.recent_limit);

        Ok(Some(AdminView {
            total: records.len(),
            recent: records[start..].to_vec(),
            summary,
        }))
    }

    pub async fn export(&self, password: &str, now: NaiveDateTime) -> Result<Option<WorkbookExport>, AppError> {
        if !self.authorize(password)? {
            return Ok(None);
        }

        let records = self.store.load_all().await?;
        let bytes = build_workbook(&records)?;
        let file_name = export_file_name(&now);
        tracing::info!(rows = records.len(), file_name = %file_name, "Workbook exported");

        Ok(Some(WorkbookExport { file_name, bytes }))
    }

    fn authorize(&self, password: &str) -> Result<bool, AppError> {
        match self.authenticator.check(password) {
            AuthOutcome::Empty => Ok(false),
            AuthOutcome::Granted => Ok(true),
            AuthOutcome::Denied => {
                tracing::warn!("Admin password rejected");
                Err(AppError::Auth)
            }
        }
    }
}

pub fn ordinal(n: usize) -> String {
    let suffix = match (n % 10, n % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    };
    format!("{n}{suffix}")
}
