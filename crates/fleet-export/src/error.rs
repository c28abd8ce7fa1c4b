//! Export errors

use thiserror::Error;

use crate::column::FormatError;

#[derive(Error, Debug)]
pub enum ExportError {
    /// A caller-supplied formatter failed; surfaced unchanged.
    #[error("Formatter for column '{column}' failed: {source}")]
    Formatter {
        column: String,
        #[source]
        source: FormatError,
    },

    #[error("Spreadsheet error: {0}")]
    Spreadsheet(#[from] rust_xlsxwriter::XlsxError),

    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid export configuration: {0}")]
    InvalidConfig(String),
}
