//! `export` command and the export step shared with `fetch`

use std::fs;
use std::path::Path;

use anyhow::{anyhow, bail, Context, Result};
use chrono::Local;
use fleet_export::{
    export, Column, CsvConfig, Disposition, ExportFormat, ExportRequest, JsonRow, Orientation,
    PdfAction, PdfConfig, SpreadsheetConfig,
};
use serde_json::Value;

use crate::cli::ExportArgs;
use crate::context::AppContext;

pub fn run_file(ctx: &AppContext, input: &Path, args: &ExportArgs) -> Result<String> {
    let raw = fs::read_to_string(input)
        .with_context(|| format!("Failed to read {}", input.display()))?;
    let value: Value = serde_json::from_str(&raw)
        .with_context(|| format!("{} is not valid JSON", input.display()))?;
    let rows = rows_from_value(value)?;

    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("export");
    write_export(ctx, args, rows, stem)
}

/// Builds the artifact for `rows` and writes it to the output directory.
pub fn write_export(
    ctx: &AppContext,
    args: &ExportArgs,
    rows: Vec<JsonRow>,
    default_name: &str,
) -> Result<String> {
    let count = rows.len();
    let request = build_request(ctx, args, rows, default_name)?;
    let artifact = export(&request)?;

    let dir = args
        .out
        .as_deref()
        .unwrap_or(ctx.config.export.output_dir.as_path());
    let path = artifact.write_to_dir(dir)?;

    let note = match artifact.disposition {
        Disposition::Inline => " (opens the print dialog)",
        Disposition::Attachment => "",
    };
    Ok(format!("Wrote {} rows to {}{}", count, path.display(), note))
}

pub fn build_request(
    ctx: &AppContext,
    args: &ExportArgs,
    rows: Vec<JsonRow>,
    default_name: &str,
) -> Result<ExportRequest<JsonRow>> {
    let columns = args
        .columns
        .iter()
        .map(|raw| parse_column(raw))
        .collect::<Result<Vec<_>>>()?;
    if args.print && args.format != ExportFormat::Pdf {
        bail!("--print only applies to PDF exports");
    }

    let file_name = args
        .file_name
        .clone()
        .unwrap_or_else(|| format!("{}.{}", default_name, args.format.extension()));
    let settings = &ctx.config.export;

    let request = match args.format {
        ExportFormat::Csv => ExportRequest::Csv(
            CsvConfig::new(columns, rows, file_name).with_headers(!args.no_headers),
        ),
        ExportFormat::Xlsx => ExportRequest::Spreadsheet(
            SpreadsheetConfig::new(columns, rows, file_name)
                .with_column_width(settings.column_width),
        ),
        ExportFormat::Pdf => {
            let title = args.title.clone().unwrap_or_else(|| title_case(default_name));
            let mut config = PdfConfig::new(columns, rows, file_name, title)
                .with_rows_per_page(args.rows_per_page.unwrap_or(settings.rows_per_page))
                .with_generated_at(Local::now().naive_local());
            if let Some(subtitle) = &args.subtitle {
                config = config.with_subtitle(subtitle.as_str());
            }
            if let Some(footer) = &args.footer {
                config = config.with_footer(footer.as_str());
            }
            for line in &args.summary {
                let (label, value) = split_pair(line, "summary line")?;
                config = config.with_summary_line(label, value);
            }
            if args.landscape {
                config = config.with_orientation(Orientation::Landscape);
            }
            if args.print {
                config = config.with_action(PdfAction::Print);
            }
            ExportRequest::Pdf(config)
        }
    };
    Ok(request)
}

/// `Header=field` or `Header=field:width`.
pub fn parse_column(raw: &str) -> Result<Column<JsonRow>> {
    let (header, field) = split_pair(raw, "column")?;
    let (field, width) = match field.rsplit_once(':') {
        Some((name, width)) if !name.is_empty() && width.parse::<u32>().is_ok() => {
            (name, width.parse::<u32>().ok())
        }
        _ => (field, None),
    };

    let column = Column::new(header, field.to_string());
    Ok(match width {
        Some(width) => column.with_width(width),
        None => column,
    })
}

fn split_pair<'a>(raw: &'a str, what: &str) -> Result<(&'a str, &'a str)> {
    let (left, right) = raw
        .split_once('=')
        .ok_or_else(|| anyhow!("Invalid {} '{}', expected `Label=value`", what, raw))?;
    let (left, right) = (left.trim(), right.trim());
    if left.is_empty() || right.is_empty() {
        bail!("Invalid {} '{}', both sides must be non-empty", what, raw);
    }
    Ok((left, right))
}

/// Rows from a JSON array of objects, or from the `data` field of a response
/// envelope.
pub fn rows_from_value(value: Value) -> Result<Vec<JsonRow>> {
    match value {
        Value::Array(items) => items
            .into_iter()
            .enumerate()
            .map(|(idx, item)| match item {
                Value::Object(row) => Ok(row),
                other => Err(anyhow!("Row {} is not an object: {}", idx, other)),
            })
            .collect(),
        Value::Object(mut object) => match object.remove("data") {
            Some(data @ Value::Array(_)) => rows_from_value(data),
            _ => bail!("Expected an array of rows or an object with a `data` array"),
        },
        _ => bail!("Expected an array of rows"),
    }
}

fn title_case(name: &str) -> String {
    name.split(['-', '_', ' '])
        .filter(|w| !w.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
