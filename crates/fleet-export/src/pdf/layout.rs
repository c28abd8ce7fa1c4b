//! Page geometry and pagination for the PDF report.
//!
//! All measurements are PDF points. Text width is estimated from the font
//! size since the standard fonts are not embedded.

use std::ops::Range;

pub const MARGIN: i64 = 40;
pub const TITLE_SIZE: i64 = 16;
pub const SUBTITLE_SIZE: i64 = 11;
pub const BODY_SIZE: i64 = 9;
pub const HEADER_SIZE: i64 = 10;
pub const ROW_HEIGHT: i64 = 14;
pub const FOOTER_HEIGHT: i64 = 24;

const TITLE_LINE: i64 = 24;
pub const META_LINE: i64 = 14;
const TABLE_HEADER_LINE: i64 = 20;
const CELL_PADDING: i64 = 4;
const ELLIPSIS: &str = "...";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Orientation {
    #[default]
    Portrait,
    Landscape,
}

impl Orientation {
    /// A4 size as `(width, height)`.
    pub fn page_size(self) -> (i64, i64) {
        match self {
            Orientation::Portrait => (595, 842),
            Orientation::Landscape => (842, 595),
        }
    }
}

impl std::str::FromStr for Orientation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "portrait" | "p" => Ok(Orientation::Portrait),
            "landscape" | "l" => Ok(Orientation::Landscape),
            other => Err(format!("unknown orientation '{}'", other)),
        }
    }
}

/// Fixed layout of one page: where the header block ends and how many body
/// lines fit above the footer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageLayout {
    pub width: i64,
    pub height: i64,
    header_height: i64,
}

impl PageLayout {
    pub fn new(orientation: Orientation, has_subtitle: bool, has_timestamp: bool) -> Self {
        let (width, height) = orientation.page_size();
        let mut header_height = TITLE_LINE + TABLE_HEADER_LINE;
        if has_subtitle {
            header_height += META_LINE;
        }
        if has_timestamp {
            header_height += META_LINE;
        }
        Self {
            width,
            height,
            header_height,
        }
    }

    pub fn content_width(&self) -> i64 {
        self.width - 2 * MARGIN
    }

    pub fn top(&self) -> i64 {
        self.height - MARGIN
    }

    /// Baseline of the first body line.
    pub fn body_top(&self) -> i64 {
        self.top() - self.header_height - ROW_HEIGHT
    }

    pub fn footer_baseline(&self) -> i64 {
        MARGIN - FOOTER_HEIGHT / 2
    }

    /// Body lines (rows or summary lines) that fit on one page.
    pub fn capacity(&self) -> usize {
        let body = self.height - 2 * MARGIN - self.header_height - FOOTER_HEIGHT;
        (body / ROW_HEIGHT).max(1) as usize
    }
}

/// What one page shows: a slice of the data rows and a slice of the summary
/// lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PagePlan {
    pub rows: Range<usize>,
    pub summary: Range<usize>,
}

/// Splits `row_count` rows into pages of at most `rows_per_page` (never more
/// than `capacity`), then places the summary block.
///
/// Rows are never split. The summary sits under the last row, one blank line
/// apart, when it fits; otherwise it starts on a fresh page.
pub fn paginate(
    row_count: usize,
    summary_lines: usize,
    rows_per_page: usize,
    capacity: usize,
) -> Vec<PagePlan> {
    let capacity = capacity.max(1);
    let per_page = rows_per_page.clamp(1, capacity);

    let mut pages = Vec::new();
    let mut start = 0;
    while start < row_count {
        let end = (start + per_page).min(row_count);
        pages.push(PagePlan {
            rows: start..end,
            summary: 0..0,
        });
        start = end;
    }
    if pages.is_empty() {
        pages.push(PagePlan {
            rows: 0..0,
            summary: 0..0,
        });
    }
    if summary_lines == 0 {
        return pages;
    }

    let mut start = 0;
    if let Some(last) = pages.last_mut() {
        let used = last.rows.len();
        let room = if used == 0 {
            capacity
        } else {
            capacity.saturating_sub(used + 1)
        };
        if summary_lines <= room {
            last.summary = 0..summary_lines;
            return pages;
        }
        if used == 0 {
            start = capacity.min(summary_lines);
            last.summary = 0..start;
        }
    }
    while start < summary_lines {
        let end = (start + capacity).min(summary_lines);
        pages.push(PagePlan {
            rows: row_count..row_count,
            summary: start..end,
        });
        start = end;
    }
    pages
}

/// Left edge and width of every column, sharing `total` by relative weight.
pub fn column_spans(weights: &[u32], total: i64) -> Vec<(i64, i64)> {
    let weights: Vec<i64> = weights.iter().map(|w| i64::from((*w).max(1))).collect();
    let sum: i64 = weights.iter().sum();
    if sum == 0 {
        return Vec::new();
    }

    let mut x = 0;
    weights
        .iter()
        .map(|w| {
            let width = total * w / sum;
            let span = (x, width);
            x += width;
            span
        })
        .collect()
}

/// Clips `text` so it fits `width` points at `font_size`, ending with `...`
/// when cut.
pub fn fit_text(text: &str, width: i64, font_size: i64) -> String {
    let usable = (width - CELL_PADDING).max(0);
    // Helvetica averages roughly half an em per glyph.
    let max_chars = (usable * 2 / font_size.max(1)) as usize;
    let count = text.chars().count();
    if count <= max_chars {
        return text.to_string();
    }
    if max_chars <= ELLIPSIS.len() {
        return text.chars().take(max_chars).collect();
    }
    let mut clipped: String = text.chars().take(max_chars - ELLIPSIS.len()).collect();
    clipped.push_str(ELLIPSIS);
    clipped
}

/// Single-byte encoding for the standard Type1 fonts. Anything outside
/// Latin-1 becomes `?`; line breaks become spaces.
pub fn encode_text(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match c {
            '\n' | '\r' | '\t' => b' ',
            c if (c as u32) <= 0xFF => c as u8,
            _ => b'?',
        })
        .collect()
}

/// Rough rendered width, used to right-align short strings.
pub fn text_width(text: &str, font_size: i64) -> i64 {
    text.chars().count() as i64 * font_size / 2
}
