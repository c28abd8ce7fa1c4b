//! Column mapping shared by every export format

use std::fmt;
use std::sync::Arc;

use crate::error::ExportError;
use crate::row::ExportRow;
use crate::value::CellValue;

/// Error a caller-supplied formatter may return.
pub type FormatError = Box<dyn std::error::Error + Send + Sync>;

/// Turns a raw value (plus the whole row, for derived columns) into display text.
pub type Formatter<R> =
    Arc<dyn Fn(&CellValue, &R) -> Result<String, FormatError> + Send + Sync>;

/// One output column: header text, source field and optional formatter.
pub struct Column<R: ExportRow> {
    pub header: String,
    pub field: R::Field,
    /// Relative width, only used by the PDF layout.
    pub width: Option<u32>,
    formatter: Option<Formatter<R>>,
}

impl<R: ExportRow> Column<R> {
    pub fn new(header: impl Into<String>, field: R::Field) -> Self {
        Self {
            header: header.into(),
            field,
            width: None,
            formatter: None,
        }
    }

    pub fn with_formatter<F>(mut self, formatter: F) -> Self
    where
        F: Fn(&CellValue, &R) -> Result<String, FormatError> + Send + Sync + 'static,
    {
        self.formatter = Some(Arc::new(formatter));
        self
    }

    pub fn with_width(mut self, width: u32) -> Self {
        self.width = Some(width);
        self
    }

    /// Value for this column in `row`, run through the formatter when present.
    pub fn resolve(&self, row: &R) -> Result<ResolvedCell, ExportError> {
        let value = row.value(&self.field);
        match &self.formatter {
            Some(format) => format(&value, row)
                .map(ResolvedCell::Formatted)
                .map_err(|source| ExportError::Formatter {
                    column: self.header.clone(),
                    source,
                }),
            None => Ok(ResolvedCell::Value(value)),
        }
    }
}

impl<R: ExportRow> Clone for Column<R>
where
    R::Field: Clone,
{
    fn clone(&self) -> Self {
        Self {
            header: self.header.clone(),
            field: self.field.clone(),
            width: self.width,
            formatter: self.formatter.clone(),
        }
    }
}

impl<R: ExportRow> fmt::Debug for Column<R>
where
    R::Field: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Column")
            .field("header", &self.header)
            .field("field", &self.field)
            .field("width", &self.width)
            .field("formatter", &self.formatter.is_some())
            .finish()
    }
}

/// A cell after field lookup and formatting.
#[derive(Debug, Clone, PartialEq)]
pub enum ResolvedCell {
    Value(CellValue),
    Formatted(String),
}

impl ResolvedCell {
    pub fn to_text(&self) -> String {
        match self {
            ResolvedCell::Value(value) => value.to_text(),
            ResolvedCell::Formatted(text) => text.clone(),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, ResolvedCell::Value(CellValue::Null))
    }
}

pub(crate) fn ensure_columns<R: ExportRow>(columns: &[Column<R>]) -> Result<(), ExportError> {
    if columns.is_empty() {
        return Err(ExportError::InvalidConfig("at least one column is required".into()));
    }
    Ok(())
}

/// Resolves every row against `columns`, in order. The first formatter
/// failure aborts the whole export.
pub fn resolve_rows<R: ExportRow>(
    columns: &[Column<R>],
    rows: &[R],
) -> Result<Vec<Vec<ResolvedCell>>, ExportError> {
    ensure_columns(columns)?;
    rows.iter()
        .map(|row| columns.iter().map(|column| column.resolve(row)).collect())
        .collect()
}
