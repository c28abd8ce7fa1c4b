//! XLSX export

use std::path::{Path, PathBuf};

use fleet_shared::constants::{DEFAULT_COLUMN_WIDTH, SPREADSHEET_EXTENSION, SPREADSHEET_SHEET_NAME};
use fleet_shared::utils::with_extension;
use rust_xlsxwriter::{Format, Workbook, Worksheet, XlsxError};
use tracing::debug;

use crate::artifact::Artifact;
use crate::column::{resolve_rows, Column, ResolvedCell};
use crate::error::ExportError;
use crate::row::ExportRow;
use crate::value::CellValue;

pub const XLSX_MIME_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

const MAX_COLUMNS: u16 = 16_384;
const MAX_DATA_ROWS: usize = 1_048_575;

pub struct SpreadsheetConfig<R: ExportRow> {
    pub columns: Vec<Column<R>>,
    pub data: Vec<R>,
    pub file_name: String,
    pub column_width: f64,
}

impl<R: ExportRow> SpreadsheetConfig<R> {
    pub fn new(columns: Vec<Column<R>>, data: Vec<R>, file_name: impl Into<String>) -> Self {
        Self {
            columns,
            data,
            file_name: file_name.into(),
            column_width: DEFAULT_COLUMN_WIDTH,
        }
    }

    pub fn with_column_width(mut self, width: f64) -> Self {
        self.column_width = width;
        self
    }

    /// File name with its extension forced to `.xlsx`.
    pub fn output_file_name(&self) -> String {
        with_extension(&self.file_name, SPREADSHEET_EXTENSION)
    }
}

pub struct SpreadsheetExporter;

impl SpreadsheetExporter {
    /// Single `Report` sheet: bold header row, one row per record.
    pub fn workbook_bytes<R: ExportRow>(config: &SpreadsheetConfig<R>) -> Result<Vec<u8>, ExportError> {
        if config.column_width.is_nan() || config.column_width <= 0.0 {
            return Err(ExportError::InvalidConfig(format!(
                "column width must be positive, got {}",
                config.column_width
            )));
        }
        let rows = resolve_rows(&config.columns, &config.data)?;
        let last_col = sheet_col(config.columns.len() - 1)?;
        if rows.len() > MAX_DATA_ROWS {
            return Err(ExportError::InvalidConfig(format!(
                "{} rows exceed the sheet limit of {}",
                rows.len(),
                MAX_DATA_ROWS
            )));
        }

        let mut workbook = Workbook::new();
        let header_format = Format::new().set_bold();
        {
            let sheet = workbook.add_worksheet();
            sheet.set_name(SPREADSHEET_SHEET_NAME)?;

            for (col, column) in (0..=last_col).zip(&config.columns) {
                sheet.set_column_width(col, config.column_width)?;
                sheet.write_string_with_format(0, col, &column.header, &header_format)?;
            }

            for (excel_row, row) in (1u32..).zip(&rows) {
                for (col, cell) in (0..=last_col).zip(row) {
                    write_cell(sheet, excel_row, col, cell)?;
                }
            }
        }

        debug!(
            "Workbook built: {} rows, {} columns",
            rows.len(),
            config.columns.len()
        );
        Ok(workbook.save_to_buffer()?)
    }

    pub fn build<R: ExportRow>(config: &SpreadsheetConfig<R>) -> Result<Artifact, ExportError> {
        let bytes = Self::workbook_bytes(config)?;
        Ok(Artifact::attachment(config.output_file_name(), XLSX_MIME_TYPE, bytes))
    }

    pub fn download<R: ExportRow>(
        config: &SpreadsheetConfig<R>,
        dir: &Path,
    ) -> Result<PathBuf, ExportError> {
        Self::build(config)?.write_to_dir(dir)
    }
}

/// Zero-based sheet column for `index`, rejecting what the format cannot hold.
fn sheet_col(index: usize) -> Result<u16, ExportError> {
    u16::try_from(index)
        .ok()
        .filter(|col| *col < MAX_COLUMNS)
        .ok_or_else(|| {
            ExportError::InvalidConfig(format!(
                "{} columns exceed the sheet limit of {}",
                index + 1,
                MAX_COLUMNS
            ))
        })
}

fn write_cell(sheet: &mut Worksheet, row: u32, col: u16, cell: &ResolvedCell) -> Result<(), XlsxError> {
    match cell {
        ResolvedCell::Formatted(text) => {
            sheet.write_string(row, col, text)?;
        }
        ResolvedCell::Value(value) => match value {
            CellValue::Null => {}
            CellValue::Bool(b) => {
                sheet.write_boolean(row, col, *b)?;
            }
            CellValue::Int(i) => {
                sheet.write_number(row, col, *i as f64)?;
            }
            CellValue::Float(f) if f.is_finite() => {
                sheet.write_number(row, col, *f)?;
            }
            other => {
                sheet.write_string(row, col, other.to_text())?;
            }
        },
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::row::JsonRow;
    use calamine::{open_workbook_from_rs, Data, Reader, Xlsx};
    use serde_json::json;
    use std::io::{Cursor, Read};

    fn vehicle_rows() -> Vec<JsonRow> {
        serde_json::from_value(json!([
            {"plate": "B 1234 XY", "seats": 4, "active": true, "rating": 4.5},
            {"plate": "B 9876 ZZ", "seats": null, "active": false, "rating": 3.0},
        ]))
        .unwrap()
    }

    fn vehicle_columns() -> Vec<Column<JsonRow>> {
        vec![
            Column::new("Plate", "plate".to_string()),
            Column::new("Seats", "seats".to_string()),
            Column::new("Active", "active".to_string()),
            Column::new("Rating", "rating".to_string())
                .with_formatter(|v: &CellValue, _: &JsonRow| Ok(format!("{} stars", v))),
        ]
    }

    fn read_back(bytes: Vec<u8>) -> calamine::Range<Data> {
        let mut workbook: Xlsx<_> = open_workbook_from_rs(Cursor::new(bytes)).unwrap();
        assert_eq!(workbook.sheet_names(), vec![SPREADSHEET_SHEET_NAME.to_string()]);
        workbook.worksheet_range(SPREADSHEET_SHEET_NAME).unwrap()
    }

    #[test]
    fn test_file_name_normalized() {
        let config = SpreadsheetConfig::new(vehicle_columns(), Vec::new(), "vehicles.csv");
        assert_eq!(config.output_file_name(), "vehicles.xlsx");

        let config = SpreadsheetConfig::new(vehicle_columns(), Vec::new(), "vehicles.xlsx");
        assert_eq!(config.output_file_name(), "vehicles.xlsx");
    }

    #[test]
    fn test_typed_cells_round_trip() {
        let config = SpreadsheetConfig::new(vehicle_columns(), vehicle_rows(), "vehicles");
        let artifact = SpreadsheetExporter::build(&config).unwrap();
        assert_eq!(artifact.file_name, "vehicles.xlsx");
        assert_eq!(artifact.mime_type, XLSX_MIME_TYPE);

        let range = read_back(artifact.bytes);
        let rows: Vec<&[Data]> = range.rows().collect();
        assert_eq!(rows.len(), 3);

        assert_eq!(rows[0][0], Data::String("Plate".into()));
        assert_eq!(rows[0][3], Data::String("Rating".into()));

        assert_eq!(rows[1][0], Data::String("B 1234 XY".into()));
        assert_eq!(rows[1][1], Data::Float(4.0));
        assert_eq!(rows[1][2], Data::Bool(true));
        assert_eq!(rows[1][3], Data::String("4.5 stars".into()));

        assert_eq!(rows[2][1], Data::Empty);
        assert_eq!(rows[2][2], Data::Bool(false));
    }

    #[test]
    fn test_empty_data_keeps_header() {
        let config = SpreadsheetConfig::new(vehicle_columns(), Vec::new(), "vehicles");
        let range = read_back(SpreadsheetExporter::workbook_bytes(&config).unwrap());
        assert_eq!(range.height(), 1);
        assert_eq!(range.width(), 4);
    }

    fn attr(element: &str, name: &str) -> String {
        let start = element.find(&format!(" {}=\"", name)).unwrap() + name.len() + 3;
        let end = element[start..].find('"').unwrap() + start;
        element[start..end].to_string()
    }

    /// `(min, max, width)` of every `<col>` entry of the first sheet.
    fn sheet_columns(bytes: Vec<u8>) -> Vec<(u32, u32, String)> {
        let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
        let mut xml = String::new();
        archive
            .by_name("xl/worksheets/sheet1.xml")
            .unwrap()
            .read_to_string(&mut xml)
            .unwrap();

        xml.match_indices("<col ")
            .map(|(start, _)| {
                let end = xml[start..].find("/>").unwrap() + start;
                let element = &xml[start..end];
                (
                    attr(element, "min").parse().unwrap(),
                    attr(element, "max").parse().unwrap(),
                    attr(element, "width"),
                )
            })
            .collect()
    }

    #[test]
    fn test_every_column_gets_the_same_width() {
        let narrow = SpreadsheetConfig::new(vehicle_columns(), vehicle_rows(), "vehicles")
            .with_column_width(12.0);
        let narrow_cols = sheet_columns(SpreadsheetExporter::workbook_bytes(&narrow).unwrap());

        let mut covered: Vec<u32> = narrow_cols
            .iter()
            .flat_map(|(min, max, _)| *min..=*max)
            .collect();
        covered.sort_unstable();
        assert_eq!(covered, vec![1, 2, 3, 4]);

        let widths: Vec<&String> = narrow_cols.iter().map(|(_, _, w)| w).collect();
        assert!(widths.iter().all(|w| *w == widths[0]));

        let wide = SpreadsheetConfig::new(vehicle_columns(), vehicle_rows(), "vehicles");
        let wide_cols = sheet_columns(SpreadsheetExporter::workbook_bytes(&wide).unwrap());
        assert!(wide_cols.iter().all(|(_, _, w)| w == &wide_cols[0].2));
        assert_ne!(wide_cols[0].2, narrow_cols[0].2);
    }

    #[test]
    fn test_too_many_columns_rejected() {
        let columns: Vec<Column<JsonRow>> = (0..70_000)
            .map(|i| Column::new(format!("C{}", i), format!("c{}", i)))
            .collect();
        let config = SpreadsheetConfig::new(columns, vehicle_rows(), "wide");
        match SpreadsheetExporter::build(&config) {
            Err(ExportError::InvalidConfig(message)) => assert!(message.contains("70000 columns")),
            other => panic!("unexpected: {:?}", other.map(|a| a.file_name)),
        }
        assert_eq!(sheet_col(16_383).unwrap(), 16_383);
        assert!(sheet_col(16_384).is_err());
    }

    #[test]
    fn test_invalid_width_rejected() {
        let config = SpreadsheetConfig::new(vehicle_columns(), Vec::new(), "vehicles")
            .with_column_width(0.0);
        assert!(matches!(
            SpreadsheetExporter::build(&config),
            Err(ExportError::InvalidConfig(_))
        ));
    }
}
