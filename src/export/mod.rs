//! Note export to PDF.

mod markdown;
mod pdf;

pub use markdown::{markdown_to_lines, wrap_line};
pub use pdf::{render_pdf, LINES_PER_PAGE};

use crate::store::Note;

/// Maximum characters per line before wrapping.
pub const LINE_WIDTH: usize = 90;

/// Errors that can occur while exporting.
#[derive(thiserror::Error, Debug)]
pub enum ExportError {
    /// Failed to write document text.
    #[error("Failed to format document: {0}")]
    Format(#[from] std::fmt::Error),
}

/// Lay out a note as wrapped lines: title, blank line, content, then the AI
/// summary under its own heading when one exists.
#[must_use]
pub fn note_lines(note: &Note) -> Vec<String> {
    let mut lines = vec![note.title.clone(), String::new()];
    lines.extend(markdown_to_lines(&note.content));

    if let Some(summary) = note.ai_summary.as_deref().filter(|s| !s.trim().is_empty()) {
        lines.push(String::new());
        lines.push("AI Summary:".to_string());
        lines.extend(markdown_to_lines(summary));
    }

    lines
        .iter()
        .flat_map(|line| wrap_line(line, LINE_WIDTH))
        .collect()
}

/// Render a note as a PDF document.
///
/// # Errors
///
/// Returns an error if the document cannot be written.
pub fn note_to_pdf(note: &Note) -> Result<Vec<u8>, ExportError> {
    render_pdf(&note_lines(note))
}

/// File name for a note download. Characters that would break a
/// `Content-Disposition` header are replaced with `_`.
#[must_use]
pub fn export_filename(title: &str) -> String {
    let stem: String = title
        .trim()
        .chars()
        .map(|c| match c {
            '"' | '\\' | '/' => '_',
            c if c.is_ascii() && !c.is_ascii_control() => c,
            _ => '_',
        })
        .collect();
    let stem = if stem.is_empty() { "note".to_string() } else { stem };
    format!("{stem}.pdf")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::NewNote;
    use chrono::Utc;

    fn note(content: &str, summary: Option<&str>) -> Note {
        let mut note = Note::new(
            NewNote {
                title: "Biology".to_string(),
                content: content.to_string(),
                subject: "Science".to_string(),
            },
            Utc::now(),
        );
        note.ai_summary = summary.map(String::from);
        note
    }

    #[test]
    fn test_note_lines_layout() {
        let lines = note_lines(&note("# Cells\n\nBasic unit of life.", Some("- Cells")));
        assert_eq!(
            lines,
            vec![
                "Biology",
                "",
                "Cells",
                "",
                "Basic unit of life.",
                "",
                "AI Summary:",
                "- Cells"
            ]
        );
    }

    #[test]
    fn test_note_lines_without_summary() {
        let lines = note_lines(&note("Plain text.", None));
        assert_eq!(lines, vec!["Biology", "", "Plain text."]);
    }

    #[test]
    fn test_note_lines_are_wrapped() {
        let long = "word ".repeat(60);
        for line in note_lines(&note(&long, None)) {
            assert!(line.chars().count() <= LINE_WIDTH);
        }
    }

    #[test]
    fn test_note_to_pdf() {
        let pdf = note_to_pdf(&note("Content (with parens)", None)).unwrap();
        let text = String::from_utf8(pdf).unwrap();
        assert!(text.starts_with("%PDF-"));
        assert!(text.contains("(Content \\(with parens\\)) Tj"));
        assert!(text.ends_with("%%EOF"));
    }

    #[test]
    fn test_export_filename() {
        assert_eq!(export_filename("Biology"), "Biology.pdf");
        assert_eq!(export_filename("Ch. 1 \"Cells\""), "Ch. 1 _Cells_.pdf");
        assert_eq!(export_filename("  "), "note.pdf");
        assert_eq!(export_filename("Caf\u{e9}"), "Caf_.pdf");
    }
}
