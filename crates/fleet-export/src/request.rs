//! Single entry point over the three export formats

use std::fmt;
use std::str::FromStr;

use tracing::info;

use crate::artifact::Artifact;
use crate::csv::{CsvConfig, CsvExporter};
use crate::error::ExportError;
use crate::pdf::{PdfConfig, PdfExporter};
use crate::row::ExportRow;
use crate::spreadsheet::{SpreadsheetConfig, SpreadsheetExporter};

pub enum ExportRequest<R: ExportRow> {
    Csv(CsvConfig<R>),
    Spreadsheet(SpreadsheetConfig<R>),
    Pdf(PdfConfig<R>),
}

impl<R: ExportRow> ExportRequest<R> {
    pub fn format(&self) -> ExportFormat {
        match self {
            ExportRequest::Csv(_) => ExportFormat::Csv,
            ExportRequest::Spreadsheet(_) => ExportFormat::Xlsx,
            ExportRequest::Pdf(_) => ExportFormat::Pdf,
        }
    }

    pub fn row_count(&self) -> usize {
        match self {
            ExportRequest::Csv(c) => c.data.len(),
            ExportRequest::Spreadsheet(c) => c.data.len(),
            ExportRequest::Pdf(c) => c.data.len(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Xlsx,
    Pdf,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Xlsx => "xlsx",
            ExportFormat::Pdf => "pdf",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "xlsx" | "excel" | "spreadsheet" => Ok(ExportFormat::Xlsx),
            "pdf" => Ok(ExportFormat::Pdf),
            other => Err(format!("unknown export format '{}'", other)),
        }
    }
}

/// Runs the exporter matching `request`.
pub fn export<R: ExportRow>(request: &ExportRequest<R>) -> Result<Artifact, ExportError> {
    let artifact = match request {
        ExportRequest::Csv(config) => CsvExporter::blob(config)?,
        ExportRequest::Spreadsheet(config) => SpreadsheetExporter::build(config)?,
        ExportRequest::Pdf(config) => PdfExporter::build(config)?,
    };

    info!(
        "Exported {} rows as {} to {} ({} bytes)",
        request.row_count(),
        request.format(),
        artifact.file_name,
        artifact.bytes.len()
    );
    Ok(artifact)
}
