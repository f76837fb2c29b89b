//! CSV export of a session snapshot.
//!
//! Produces text only; writing the file or offering a download is up to the caller.

use csv::{QuoteStyle, Terminator, WriterBuilder};

use crate::error::ExportError;
use crate::sessions::SnapshotRow;

/// Column titles of the exported sheet.
pub const CSV_HEADER: [&str; 6] = [
    "Question Label",
    "Selected Option",
    "Selected Index",
    "Correct Option",
    "Correct Index",
    "Explanation",
];

/// File name used when the caller does not pick one.
pub const DEFAULT_EXPORT_FILE_NAME: &str = "quiz_answers.csv";

/// A rendered export ready for delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvExport {
    pub file_name: String,
    pub content: String,
}

impl CsvExport {
    /// Render `rows` under the given file name.
    ///
    /// # Errors
    ///
    /// Propagates `ExportError` from [`to_csv`].
    pub fn render(file_name: impl Into<String>, rows: &[SnapshotRow]) -> Result<Self, ExportError> {
        Ok(Self {
            file_name: file_name.into(),
            content: to_csv(rows)?,
        })
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        self.content.as_bytes()
    }
}

/// Render snapshot rows as CSV: a header line, then one line per row.
///
/// Every field is quoted and embedded quotes are doubled. Lines are joined with
/// `\n` and there is no trailing newline.
///
/// # Errors
///
/// Returns `ExportError` if the in-memory writer fails.
pub fn to_csv(rows: &[SnapshotRow]) -> Result<String, ExportError> {
    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    writer.write_record(CSV_HEADER)?;
    for row in rows {
        writer.write_record(record(row))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|err| ExportError::Flush(err.to_string()))?;
    let mut text = String::from_utf8(bytes)?;
    if text.ends_with('\n') {
        text.pop();
    }
    Ok(text)
}

fn record(row: &SnapshotRow) -> [String; 6] {
    [
        row.question_label.clone(),
        row.selected_option.clone().unwrap_or_default(),
        row.selected_index.map(|i| i.to_string()).unwrap_or_default(),
        row.correct_option.clone(),
        row.correct_index.to_string(),
        row.explanation.clone(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(label: &str, selected: Option<usize>) -> SnapshotRow {
        SnapshotRow {
            question_label: label.to_string(),
            selected_option: selected.map(|i| format!("opt {i}")),
            selected_index: selected,
            correct_option: "A. right".to_string(),
            correct_index: 0,
            explanation: String::new(),
        }
    }

    #[test]
    fn header_only_for_no_rows() {
        let csv = to_csv(&[]).unwrap();
        assert_eq!(
            csv,
            r#""Question Label","Selected Option","Selected Index","Correct Option","Correct Index","Explanation""#
        );
    }

    #[test]
    fn every_field_is_quoted() {
        let csv = to_csv(&[row("Q1: x", Some(0))]).unwrap();
        let line = csv.lines().nth(1).unwrap();
        assert_eq!(line, r#""Q1: x","opt 0","0","A. right","0","""#);
    }

    #[test]
    fn embedded_quotes_are_doubled() {
        let csv = to_csv(&[row(r#"Q1: "Politics""#, None)]).unwrap();
        assert!(csv.contains(r#""Q1: ""Politics""""#));
    }

    #[test]
    fn no_trailing_newline() {
        let csv = to_csv(&[row("Q1", None), row("Q2", None)]).unwrap();
        assert!(!csv.ends_with('\n'));
        assert_eq!(csv.split('\n').count(), 3);
    }

    #[test]
    fn render_keeps_file_name() {
        let export = CsvExport::render(DEFAULT_EXPORT_FILE_NAME, &[row("Q1", None)]).unwrap();
        assert_eq!(export.file_name, "quiz_answers.csv");
        assert!(export.as_bytes().starts_with(b"\"Question Label\""));
    }
}
