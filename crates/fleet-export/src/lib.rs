//! # Fleet Export
//! 
//! Turns in-memory rows plus a column mapping into a downloadable artifact:
//! CSV text, a single-sheet XLSX workbook, or a paginated PDF.
//!
//! ```no_run
//! use fleet_export::{export, Column, CsvConfig, ExportRequest, JsonRow};
//!
//! # fn demo(rows: Vec<JsonRow>) -> Result<(), fleet_export::ExportError> {
//! let columns = vec![
//!     Column::new("Driver", "name".to_string()),
//!     Column::new("Phone", "phone".to_string()),
//! ];
//! let artifact = export(&ExportRequest::Csv(CsvConfig::new(columns, rows, "drivers.csv")))?;
//! artifact.write_to_dir(std::path::Path::new("exports"))?;
//! # Ok(())
//! # }
//! ```

pub mod artifact;
pub mod column;
pub mod csv;
pub mod error;
pub mod pdf;
pub mod request;
pub mod row;
pub mod spreadsheet;
pub mod value;

pub use artifact::{Artifact, Disposition};
pub use column::{Column, FormatError, ResolvedCell};
pub use csv::{CsvConfig, CsvExporter};
pub use error::ExportError;
pub use pdf::{Orientation, PdfAction, PdfConfig, PdfExporter};
pub use request::{export, ExportFormat, ExportRequest};
pub use row::{ExportRow, JsonRow, Record};
pub use spreadsheet::{SpreadsheetConfig, SpreadsheetExporter};
pub use value::CellValue;
