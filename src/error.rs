use thiserror::Error;

use crate::store::StoreError;

#[derive(Debug, Error)]
pub enum AppError {
    /// A required form field is missing or out of bounds. Nothing was written.
    #[error("{0}")]
    Validation(String),
    #[error("incorrect admin password")]
    Auth,
    #[error(transparent)]
    Storage(#[from] StoreError),
    #[error("failed to build workbook: {0}")]
    Report(#[from] rust_xlsxwriter::XlsxError),
}
