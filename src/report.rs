//! Two-sheet xlsx export: the raw log and its summary.

use chrono::NaiveDateTime;
use rust_xlsxwriter::{Format, Workbook, XlsxError};

use crate::domain::record::{PredictionRecord, LOG_COLUMNS};
use crate::domain::summary::build_summary;

pub const XLSX_CONTENT_TYPE: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";
pub const LOG_SHEET: &str = "Log";
pub const SUMMARY_SHEET: &str = "Summary";

pub fn build_workbook(records: &[PredictionRecord]) -> Result<Vec<u8>, XlsxError> {
    let mut workbook = Workbook::new();
    let bold = Format::new().set_bold();

    let log = workbook.add_worksheet();
    log.set_name(LOG_SHEET)?;
    for (col, name) in LOG_COLUMNS.iter().enumerate() {
        log.write_string_with_format(0, col as u16, *name, &bold)?;
    }
    for (i, record) in records.iter().enumerate() {
        let row = i as u32 + 1;
        log.write_string(row, 0, &record.timestamp)?;
        log.write_string(row, 1, &record.user_name)?;
        log.write_string(row, 2, &record.dob)?;
        log.write_number(row, 3, record.beer_score)?;
        log.write_string(row, 4, record.western.as_str())?;
        log.write_string(row, 5, record.chinese.as_str())?;
    }

    let summary = workbook.add_worksheet();
    summary.set_name(SUMMARY_SHEET)?;
    summary.write_string_with_format(0, 0, "Metric", &bold)?;
    summary.write_string_with_format(0, 1, "Value", &bold)?;
    for (i, (label, value)) in build_summary(records).rows().into_iter().enumerate() {
        let row = i as u32 + 1;
        summary.write_string(row, 0, label)?;
        summary.write_string(row, 1, value)?;
    }

    workbook.save_to_buffer()
}

pub fn export_file_name(now: &NaiveDateTime) -> String {
    format!("predictions_summary_{}.xlsx", now.format("%Y%m%d_%H%M"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::testing::sample_record;
    use chrono::NaiveDate;

    fn contains(haystack: &[u8], needle: &[u8]) -> bool {
        haystack.windows(needle.len()).any(|w| w == needle)
    }

    #[test]
    fn test_workbook_has_two_sheets() -> Result<(), XlsxError> {
        let records = vec![sample_record("Ada", 4), sample_record("Bob", 2)];
        let bytes = build_workbook(&records)?;

        // xlsx is a zip archive; entry names are stored uncompressed.
        assert!(bytes.starts_with(b"PK"));
        assert!(contains(&bytes, b"xl/worksheets/sheet1.xml"));
        assert!(contains(&bytes, b"xl/worksheets/sheet2.xml"));
        assert!(!contains(&bytes, b"xl/worksheets/sheet3.xml"));
        Ok(())
    }

    #[test]
    fn test_empty_log_still_exports() -> Result<(), XlsxError> {
        let bytes = build_workbook(&[])?;
        assert!(contains(&bytes, b"xl/worksheets/sheet2.xml"));
        Ok(())
    }

    #[test]
    fn test_export_file_name_embeds_time() {
        let now = NaiveDate::from_ymd_opt(2026, 1, 2)
            .unwrap()
            .and_hms_opt(9, 5, 59)
            .unwrap();
        assert_eq!(export_file_name(&now), "predictions_summary_20260102_0905.xlsx");
    }
}
