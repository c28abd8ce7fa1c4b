//! CSV export

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::artifact::Artifact;
use crate::column::{resolve_rows, Column, ResolvedCell};
use crate::error::ExportError;
use crate::row::ExportRow;

pub const CSV_MIME_TYPE: &str = "text/csv;charset=utf-8";

pub struct CsvConfig<R: ExportRow> {
    pub columns: Vec<Column<R>>,
    pub data: Vec<R>,
    pub file_name: String,
    pub include_headers: bool,
}

impl<R: ExportRow> CsvConfig<R> {
    pub fn new(columns: Vec<Column<R>>, data: Vec<R>, file_name: impl Into<String>) -> Self {
        Self {
            columns,
            data,
            file_name: file_name.into(),
            include_headers: true,
        }
    }

    pub fn with_headers(mut self, include_headers: bool) -> Self {
        self.include_headers = include_headers;
        self
    }
}

pub struct CsvExporter;

impl CsvExporter {
    /// Rows joined by `\n`, cells by `,`, header line first when enabled.
    pub fn content<R: ExportRow>(config: &CsvConfig<R>) -> Result<String, ExportError> {
        let rows = resolve_rows(&config.columns, &config.data)?;

        let mut lines = Vec::with_capacity(rows.len() + 1);
        if config.include_headers {
            lines.push(join(config.columns.iter().map(|c| escape(&c.header))));
        }
        for row in &rows {
            lines.push(join(row.iter().map(escape_cell)));
        }

        debug!("CSV content built: {} rows, {} columns", rows.len(), config.columns.len());
        Ok(lines.join("\n"))
    }

    pub fn blob<R: ExportRow>(config: &CsvConfig<R>) -> Result<Artifact, ExportError> {
        let content = Self::content(config)?;
        Ok(Artifact::attachment(
            config.file_name.clone(),
            CSV_MIME_TYPE,
            content.into_bytes(),
        ))
    }

    pub fn download<R: ExportRow>(config: &CsvConfig<R>, dir: &Path) -> Result<PathBuf, ExportError> {
        Self::blob(config)?.write_to_dir(dir)
    }
}

/// Quotes a cell when it contains a separator, a quote or a line break.
/// Inner quotes are doubled.
pub fn escape(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

fn escape_cell(cell: &ResolvedCell) -> String {
    if cell.is_null() {
        return String::new();
    }
    escape(&cell.to_text())
}

fn join(cells: impl Iterator<Item = String>) -> String {
    cells.collect::<Vec<_>>().join(",")
}
