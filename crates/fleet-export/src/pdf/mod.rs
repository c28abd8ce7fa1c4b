//! PDF export
//!
//! Builds a tabular A4 report directly with `lopdf`: title block, table
//! header repeated on every page, optional summary block and a
//! "Page N of M" footer. Saving and printing share one document; printing
//! only adds an open action that brings up the print dialog.

pub mod layout;

use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use fleet_shared::constants::DEFAULT_ROWS_PER_PAGE;
use fleet_shared::utils::with_extension;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};
use tracing::debug;

use self::layout::{
    column_spans, encode_text, fit_text, paginate, text_width, PageLayout, PagePlan, BODY_SIZE,
    HEADER_SIZE, MARGIN, META_LINE, ROW_HEIGHT, SUBTITLE_SIZE, TITLE_SIZE,
};
use crate::artifact::{Artifact, Disposition};
use crate::column::{resolve_rows, Column};
use crate::error::ExportError;
use crate::row::ExportRow;

pub use self::layout::Orientation;

pub const PDF_MIME_TYPE: &str = "application/pdf";

const REGULAR: &str = "F1";
const BOLD: &str = "F2";
const FOOTER_SIZE: i64 = 8;
const SUMMARY_VALUE_OFFSET: i64 = 160;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PdfAction {
    #[default]
    Save,
    Print,
}

impl std::str::FromStr for PdfAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "save" => Ok(PdfAction::Save),
            "print" => Ok(PdfAction::Print),
            other => Err(format!("unknown PDF action '{}'", other)),
        }
    }
}

pub struct PdfConfig<R: ExportRow> {
    pub columns: Vec<Column<R>>,
    pub data: Vec<R>,
    pub file_name: String,
    pub title: String,
    pub subtitle: Option<String>,
    pub orientation: Orientation,
    pub rows_per_page: usize,
    /// Label/value lines printed after the last row.
    pub summary: Vec<(String, String)>,
    pub footer: Option<String>,
    pub action: PdfAction,
    pub generated_at: Option<NaiveDateTime>,
}

impl<R: ExportRow> PdfConfig<R> {
    pub fn new(
        columns: Vec<Column<R>>,
        data: Vec<R>,
        file_name: impl Into<String>,
        title: impl Into<String>,
    ) -> Self {
        Self {
            columns,
            data,
            file_name: file_name.into(),
            title: title.into(),
            subtitle: None,
            orientation: Orientation::default(),
            rows_per_page: DEFAULT_ROWS_PER_PAGE,
            summary: Vec::new(),
            footer: None,
            action: PdfAction::default(),
            generated_at: None,
        }
    }

    pub fn with_subtitle(mut self, subtitle: impl Into<String>) -> Self {
        self.subtitle = Some(subtitle.into());
        self
    }

    pub fn with_orientation(mut self, orientation: Orientation) -> Self {
        self.orientation = orientation;
        self
    }

    pub fn with_rows_per_page(mut self, rows_per_page: usize) -> Self {
        self.rows_per_page = rows_per_page;
        self
    }

    pub fn with_summary_line(mut self, label: impl Into<String>, value: impl Into<String>) -> Self {
        self.summary.push((label.into(), value.into()));
        self
    }

    pub fn with_footer(mut self, footer: impl Into<String>) -> Self {
        self.footer = Some(footer.into());
        self
    }

    pub fn with_action(mut self, action: PdfAction) -> Self {
        self.action = action;
        self
    }

    pub fn with_generated_at(mut self, generated_at: NaiveDateTime) -> Self {
        self.generated_at = Some(generated_at);
        self
    }

    pub fn output_file_name(&self) -> String {
        with_extension(&self.file_name, "pdf")
    }
}

pub struct PdfExporter;

impl PdfExporter {
    pub fn document_bytes<R: ExportRow>(config: &PdfConfig<R>) -> Result<Vec<u8>, ExportError> {
        if config.rows_per_page == 0 {
            return Err(ExportError::InvalidConfig("rows per page must be at least 1".into()));
        }
        let cells = resolve_rows(&config.columns, &config.data)?;
        let rows: Vec<Vec<String>> = cells
            .iter()
            .map(|row| row.iter().map(|cell| cell.to_text()).collect())
            .collect();

        let layout = PageLayout::new(
            config.orientation,
            config.subtitle.is_some(),
            config.generated_at.is_some(),
        );
        let plans = paginate(
            rows.len(),
            config.summary.len(),
            config.rows_per_page,
            layout.capacity(),
        );
        let weights: Vec<u32> = config.columns.iter().map(|c| c.width.unwrap_or(1)).collect();
        let spans = column_spans(&weights, layout.content_width());

        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let regular_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
            "Encoding" => "WinAnsiEncoding",
        });
        let bold_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica-Bold",
            "Encoding" => "WinAnsiEncoding",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! {
                REGULAR => regular_id,
                BOLD => bold_id,
            },
        });

        let page_count = plans.len();
        let mut kids: Vec<Object> = Vec::with_capacity(page_count);
        for (idx, plan) in plans.iter().enumerate() {
            let page = PageWriter {
                config,
                layout: &layout,
                spans: &spans,
                rows: &rows,
            };
            let content = page.render(plan, idx + 1, page_count);
            let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode()?));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
            });
            kids.push(page_id.into());
        }

        let pages = dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => page_count as i64,
            "Resources" => resources_id,
            "MediaBox" => vec![
                Object::Integer(0),
                Object::Integer(0),
                Object::Integer(layout.width),
                Object::Integer(layout.height),
            ],
        };
        doc.objects.insert(pages_id, Object::Dictionary(pages));

        let mut catalog = dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        };
        if config.action == PdfAction::Print {
            catalog.set(
                "OpenAction",
                dictionary! {
                    "Type" => "Action",
                    "S" => "Named",
                    "N" => "Print",
                },
            );
        }
        let catalog_id = doc.add_object(catalog);
        doc.trailer.set("Root", catalog_id);

        let info_id = doc.add_object(dictionary! {
            "Title" => Object::string_literal(encode_text(&config.title)),
            "Producer" => Object::string_literal("fleet-export"),
        });
        doc.trailer.set("Info", info_id);

        let mut buffer = Vec::new();
        doc.save_to(&mut buffer)?;

        debug!(
            "PDF built: {} rows on {} pages ({:?})",
            rows.len(),
            page_count,
            config.action
        );
        Ok(buffer)
    }

    /// `Save` yields a download, `Print` an inline document that opens the
    /// print dialog.
    pub fn build<R: ExportRow>(config: &PdfConfig<R>) -> Result<Artifact, ExportError> {
        let bytes = Self::document_bytes(config)?;
        let disposition = match config.action {
            PdfAction::Save => Disposition::Attachment,
            PdfAction::Print => Disposition::Inline,
        };
        Ok(Artifact {
            file_name: config.output_file_name(),
            mime_type: PDF_MIME_TYPE,
            bytes,
            disposition,
        })
    }

    pub fn save<R: ExportRow>(config: &PdfConfig<R>, dir: &Path) -> Result<PathBuf, ExportError> {
        Self::build(config)?.write_to_dir(dir)
    }
}

struct PageWriter<'a, R: ExportRow> {
    config: &'a PdfConfig<R>,
    layout: &'a PageLayout,
    spans: &'a [(i64, i64)],
    rows: &'a [Vec<String>],
}

impl<R: ExportRow> PageWriter<'_, R> {
    fn render(&self, plan: &PagePlan, page_no: usize, page_count: usize) -> Content {
        let mut ops = Vec::new();
        let layout = self.layout;

        let full_width = layout.content_width();
        let mut y = layout.top() - TITLE_SIZE;
        let title = fit_text(&self.config.title, full_width, TITLE_SIZE);
        text(&mut ops, BOLD, TITLE_SIZE, MARGIN, y, &title);
        if let Some(subtitle) = &self.config.subtitle {
            y -= META_LINE;
            let subtitle = fit_text(subtitle, full_width, SUBTITLE_SIZE);
            text(&mut ops, REGULAR, SUBTITLE_SIZE, MARGIN, y, &subtitle);
        }
        if let Some(at) = &self.config.generated_at {
            y -= META_LINE;
            let stamp = format!("Generated: {}", at.format("%Y-%m-%d %H:%M"));
            text(&mut ops, REGULAR, BODY_SIZE, MARGIN, y, &stamp);
        }

        let header_y = layout.body_top() + ROW_HEIGHT + 2;
        for (column, (x, width)) in self.config.columns.iter().zip(self.spans) {
            let label = fit_text(&column.header, *width, HEADER_SIZE);
            text(&mut ops, BOLD, HEADER_SIZE, MARGIN + x + 2, header_y, &label);
        }
        rule(&mut ops, header_y - 5, layout.width);

        let mut y = layout.body_top();
        for row in &self.rows[plan.rows.clone()] {
            for (value, (x, width)) in row.iter().zip(self.spans) {
                let cell = fit_text(value, *width, BODY_SIZE);
                if !cell.is_empty() {
                    text(&mut ops, REGULAR, BODY_SIZE, MARGIN + x + 2, y, &cell);
                }
            }
            y -= ROW_HEIGHT;
        }

        if !plan.summary.is_empty() {
            if !plan.rows.is_empty() {
                y -= ROW_HEIGHT;
            }
            let value_width = full_width - SUMMARY_VALUE_OFFSET;
            for (label, value) in &self.config.summary[plan.summary.clone()] {
                let label = fit_text(label, SUMMARY_VALUE_OFFSET, BODY_SIZE);
                let value = fit_text(value, value_width, BODY_SIZE);
                text(&mut ops, BOLD, BODY_SIZE, MARGIN, y, &label);
                text(&mut ops, REGULAR, BODY_SIZE, MARGIN + SUMMARY_VALUE_OFFSET, y, &value);
                y -= ROW_HEIGHT;
            }
        }

        let footer_y = layout.footer_baseline();
        let page_label = format!("Page {} of {}", page_no, page_count);
        let label_width = text_width(&page_label, FOOTER_SIZE);
        if let Some(footer) = &self.config.footer {
            // Stops one label's width short of the page number.
            let footer = fit_text(footer, full_width - 2 * label_width, FOOTER_SIZE);
            text(&mut ops, REGULAR, FOOTER_SIZE, MARGIN, footer_y, &footer);
        }
        let x = layout.width - MARGIN - label_width;
        text(&mut ops, REGULAR, FOOTER_SIZE, x, footer_y, &page_label);

        Content { operations: ops }
    }
}

fn text(ops: &mut Vec<Operation>, font: &str, size: i64, x: i64, y: i64, value: &str) {
    ops.push(Operation::new("BT", vec![]));
    ops.push(Operation::new(
        "Tf",
        vec![Object::Name(font.as_bytes().to_vec()), size.into()],
    ));
    ops.push(Operation::new("Td", vec![x.into(), y.into()]));
    ops.push(Operation::new(
        "Tj",
        vec![Object::string_literal(encode_text(value))],
    ));
    ops.push(Operation::new("ET", vec![]));
}

fn rule(ops: &mut Vec<Operation>, y: i64, page_width: i64) {
    ops.push(Operation::new("w", vec![Object::Integer(1)]));
    ops.push(Operation::new("m", vec![MARGIN.into(), y.into()]));
    ops.push(Operation::new("l", vec![(page_width - MARGIN).into(), y.into()]));
    ops.push(Operation::new("S", vec![]));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::row::JsonRow;
    use crate::value::CellValue;
    use chrono::NaiveDate;
    use serde_json::json;

    fn trip_rows(count: usize) -> Vec<JsonRow> {
        (0..count)
            .map(|i| {
                serde_json::from_value(json!({
                    "driver": format!("Driver {:02}", i + 1),
                    "status": if i % 2 == 0 { "completed" } else { "cancelled" },
                    "fare": 10000 + i as i64,
                }))
                .unwrap()
            })
            .collect()
    }

    fn trip_columns() -> Vec<Column<JsonRow>> {
        vec![
            Column::new("Driver", "driver".to_string()).with_width(2),
            Column::new("Status", "status".to_string()),
            Column::new("Fare", "fare".to_string()),
        ]
    }

    /// Text shown on each page, in drawing order.
    fn page_texts(bytes: &[u8]) -> Vec<Vec<String>> {
        let doc = Document::load_mem(bytes).unwrap();
        doc.get_pages()
            .values()
            .map(|page_id| {
                let raw = doc.get_page_content(*page_id).unwrap();
                Content::decode(&raw)
                    .unwrap()
                    .operations
                    .iter()
                    .filter(|op| op.operator == "Tj")
                    .filter_map(|op| match op.operands.first() {
                        Some(Object::String(bytes, _)) => {
                            Some(String::from_utf8_lossy(bytes).into_owned())
                        }
                        _ => None,
                    })
                    .collect()
            })
            .collect()
    }

    fn contains(page: &[String], needle: &str) -> bool {
        page.iter().any(|t| t == needle)
    }

    #[test]
    fn test_paginates_with_repeated_header_and_footer() {
        let config = PdfConfig::new(trip_columns(), trip_rows(60), "trips", "Bookings by Status");
        let pages = page_texts(&PdfExporter::document_bytes(&config).unwrap());

        assert_eq!(pages.len(), 3);
        for (idx, page) in pages.iter().enumerate() {
            assert!(contains(page, "Bookings by Status"));
            assert!(contains(page, "Driver"));
            assert!(contains(page, &format!("Page {} of 3", idx + 1)));
        }
        assert!(contains(&pages[0], "Driver 25"));
        assert!(!contains(&pages[0], "Driver 26"));
        assert!(contains(&pages[1], "Driver 26"));
        assert!(contains(&pages[2], "Driver 60"));
    }

    #[test]
    fn test_empty_data_single_page() {
        let config = PdfConfig::new(trip_columns(), Vec::new(), "trips", "Empty Report")
            .with_footer("Fleet Admin");
        let pages = page_texts(&PdfExporter::document_bytes(&config).unwrap());

        assert_eq!(pages.len(), 1);
        assert_eq!(
            pages[0],
            vec!["Empty Report", "Driver", "Status", "Fare", "Fleet Admin", "Page 1 of 1"]
        );
    }

    #[test]
    fn test_meta_lines_and_summary() {
        let generated = NaiveDate::from_ymd_opt(2024, 5, 1)
            .unwrap()
            .and_hms_opt(8, 30, 0)
            .unwrap();
        let config = PdfConfig::new(trip_columns(), trip_rows(3), "trips", "Trips")
            .with_subtitle("May 2024")
            .with_generated_at(generated)
            .with_summary_line("Total trips", "3");
        let pages = page_texts(&PdfExporter::document_bytes(&config).unwrap());

        assert_eq!(pages.len(), 1);
        assert!(contains(&pages[0], "May 2024"));
        assert!(contains(&pages[0], "Generated: 2024-05-01 08:30"));
        assert!(contains(&pages[0], "Total trips"));
    }

    #[test]
    fn test_long_title_summary_and_footer_are_clipped() {
        let long = "Monthly bookings per driver across every fleet operator and corporate account in the greater Jakarta area";
        let config = PdfConfig::new(trip_columns(), trip_rows(2), "trips", long)
            .with_summary_line("Average fare collected per completed booking", "10000")
            .with_footer(format!("{} {}", long, long));
        let pages = page_texts(&PdfExporter::document_bytes(&config).unwrap());
        let page = &pages[0];
        let content_width = PageLayout::new(Orientation::Portrait, false, false).content_width();

        let title = &page[0];
        assert!(title.ends_with("..."));
        assert!(long.starts_with(title.trim_end_matches("...")));
        assert!(text_width(title, TITLE_SIZE) <= content_width);

        let label = page
            .iter()
            .find(|t| t.starts_with("Average fare"))
            .unwrap();
        assert!(label.ends_with("..."));
        assert!(text_width(label, BODY_SIZE) <= SUMMARY_VALUE_OFFSET);
        assert!(contains(page, "10000"));

        let footer = &page[page.len() - 2];
        assert!(footer.ends_with("..."));
        assert!(text_width(footer, FOOTER_SIZE) < content_width - text_width("Page 1 of 1", FOOTER_SIZE));
        assert_eq!(page[page.len() - 1], "Page 1 of 1");
    }

    #[test]
    fn test_summary_moves_to_new_page_when_full() {
        let generated = NaiveDate::from_ymd_opt(2024, 5, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        let config = PdfConfig::new(trip_columns(), trip_rows(25), "trips", "Trips")
            .with_orientation(Orientation::Landscape)
            .with_subtitle("All drivers")
            .with_generated_at(generated)
            .with_summary_line("Completed", "13")
            .with_summary_line("Cancelled", "12")
            .with_summary_line("Total fare", "250300")
            .with_summary_line("Average fare", "10012");

        let pages = page_texts(&PdfExporter::document_bytes(&config).unwrap());
        assert_eq!(pages.len(), 2);
        assert!(contains(&pages[0], "Driver 25"));
        assert!(!contains(&pages[0], "Completed"));
        assert!(contains(&pages[1], "Completed"));
        assert!(contains(&pages[1], "Average fare"));
        assert!(contains(&pages[1], "Page 2 of 2"));
    }

    #[test]
    fn test_print_adds_open_action() {
        let save = PdfConfig::new(trip_columns(), trip_rows(2), "trips.csv", "Trips");
        let artifact = PdfExporter::build(&save).unwrap();
        assert_eq!(artifact.file_name, "trips.pdf");
        assert_eq!(artifact.disposition, Disposition::Attachment);
        let doc = Document::load_mem(&artifact.bytes).unwrap();
        assert!(doc.catalog().unwrap().get(b"OpenAction").is_err());

        let print = PdfConfig::new(trip_columns(), trip_rows(2), "trips", "Trips")
            .with_action(PdfAction::Print);
        let artifact = PdfExporter::build(&print).unwrap();
        assert_eq!(artifact.disposition, Disposition::Inline);
        let doc = Document::load_mem(&artifact.bytes).unwrap();
        let action = doc
            .catalog()
            .unwrap()
            .get(b"OpenAction")
            .unwrap()
            .as_dict()
            .unwrap();
        assert_eq!(action.get(b"S").unwrap().as_name().unwrap(), b"Named");
        assert_eq!(action.get(b"N").unwrap().as_name().unwrap(), b"Print");
    }

    #[test]
    fn test_invalid_rows_per_page() {
        let config = PdfConfig::new(trip_columns(), trip_rows(1), "trips", "Trips")
            .with_rows_per_page(0);
        assert!(matches!(
            PdfExporter::document_bytes(&config),
            Err(ExportError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_formatter_error_aborts() {
        let columns = vec![Column::new("Fare", "fare".to_string())
            .with_formatter(|_: &CellValue, _: &JsonRow| Err("no currency".into()))];
        let config = PdfConfig::new(columns, trip_rows(1), "trips", "Trips");
        assert!(matches!(
            PdfExporter::build(&config),
            Err(ExportError::Formatter { .. })
        ));
    }

    #[test]
    fn test_action_from_str() {
        assert_eq!("print".parse::<PdfAction>().unwrap(), PdfAction::Print);
        assert_eq!("Save".parse::<PdfAction>().unwrap(), PdfAction::Save);
        assert!("fax".parse::<PdfAction>().is_err());
        assert_eq!("landscape".parse::<Orientation>().unwrap(), Orientation::Landscape);
    }
}
