//! Minimal text-only PDF writer.
//!
//! Emits a PDF 1.4 file with one content stream per page, set in the
//! built-in Helvetica font so no font data needs embedding.

use std::fmt::Write as _;

use super::ExportError;

/// Lines per page.
pub const LINES_PER_PAGE: usize = 50;

const PAGE_WIDTH: u32 = 612;
const PAGE_HEIGHT: u32 = 792;
const FONT_SIZE: u32 = 10;
const LEADING: u32 = 14;
const MARGIN_LEFT: u32 = 50;
const MARGIN_TOP: u32 = 50;

/// Object numbers of the fixed objects.
const CATALOG_ID: usize = 1;
const PAGES_ID: usize = 2;
const FONT_ID: usize = 3;
const FIRST_PAGE_ID: usize = 4;

/// Replace characters Helvetica's standard encoding cannot show and escape
/// string delimiters.
fn escape_text(line: &str) -> String {
    let mut escaped = String::with_capacity(line.len());
    for c in line.chars() {
        match c {
            '(' | ')' | '\\' => {
                escaped.push('\\');
                escaped.push(c);
            }
            '\t' => escaped.push(' '),
            c if c.is_ascii() && !c.is_ascii_control() => escaped.push(c),
            _ => escaped.push('?'),
        }
    }
    escaped
}

fn content_stream(lines: &[String]) -> Result<String, ExportError> {
    let mut stream = String::new();
    writeln!(stream, "BT")?;
    writeln!(stream, "/F1 {FONT_SIZE} Tf")?;
    writeln!(stream, "{LEADING} TL")?;
    writeln!(stream, "{MARGIN_LEFT} {} Td", PAGE_HEIGHT - MARGIN_TOP)?;
    for line in lines {
        writeln!(stream, "({}) Tj", escape_text(line))?;
        writeln!(stream, "T*")?;
    }
    writeln!(stream, "ET")?;
    Ok(stream)
}

/// Render pre-wrapped lines as a paginated PDF document.
///
/// An empty document still gets one blank page.
///
/// # Errors
///
/// Returns `ExportError::Format` if writing the document text fails.
pub fn render_pdf(lines: &[String]) -> Result<Vec<u8>, ExportError> {
    let mut pages: Vec<&[String]> = lines.chunks(LINES_PER_PAGE).collect();
    if pages.is_empty() {
        pages.push(&[]);
    }

    let mut out = String::new();
    let mut offsets = Vec::new();
    out.push_str("%PDF-1.4\n");

    offsets.push(out.len());
    writeln!(
        out,
        "{CATALOG_ID} 0 obj\n<< /Type /Catalog /Pages {PAGES_ID} 0 R >>\nendobj"
    )?;

    let kids = (0..pages.len())
        .map(|i| format!("{} 0 R", FIRST_PAGE_ID + i * 2))
        .collect::<Vec<_>>()
        .join(" ");
    offsets.push(out.len());
    writeln!(
        out,
        "{PAGES_ID} 0 obj\n<< /Type /Pages /Kids [{kids}] /Count {} >>\nendobj",
        pages.len()
    )?;

    offsets.push(out.len());
    writeln!(
        out,
        "{FONT_ID} 0 obj\n<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica >>\nendobj"
    )?;

    for (i, page) in pages.iter().enumerate() {
        let page_id = FIRST_PAGE_ID + i * 2;
        let content_id = page_id + 1;

        offsets.push(out.len());
        writeln!(
            out,
            "{page_id} 0 obj\n<< /Type /Page /Parent {PAGES_ID} 0 R \
             /MediaBox [0 0 {PAGE_WIDTH} {PAGE_HEIGHT}] \
             /Resources << /Font << /F1 {FONT_ID} 0 R >> >> \
             /Contents {content_id} 0 R >>\nendobj"
        )?;

        let stream = content_stream(page)?;
        offsets.push(out.len());
        write!(
            out,
            "{content_id} 0 obj\n<< /Length {} >>\nstream\n{stream}endstream\nendobj\n",
            stream.len()
        )?;
    }

    let xref_offset = out.len();
    let object_count = offsets.len() + 1;
    writeln!(out, "xref\n0 {object_count}")?;
    writeln!(out, "0000000000 65535 f ")?;
    for offset in &offsets {
        writeln!(out, "{offset:010} 00000 n ")?;
    }
    write!(
        out,
        "trailer\n<< /Size {object_count} /Root {CATALOG_ID} 0 R >>\nstartxref\n{xref_offset}\n%%EOF"
    )?;

    Ok(out.into_bytes())
}
