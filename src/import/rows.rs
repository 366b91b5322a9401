//! CSV record parsing

use std::fs::File;
use std::io::Read;
use std::path::Path;

use super::error::ImportError;

/// All records of one input file, as raw text fields
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RowBatch {
    rows: Vec<Vec<String>>,
}

impl RowBatch {
    /// Create a batch from already-split records
    pub fn new(rows: Vec<Vec<String>>) -> Self {
        Self { rows }
    }

    /// Read every record of a headerless, comma-separated UTF-8 file
    pub fn from_path(path: &Path) -> Result<Self, ImportError> {
        if !path.is_file() {
            return Err(ImportError::FileNotFound(path.to_path_buf()));
        }
        let file = File::open(path)?;
        Self::from_reader(file)
    }

    /// Read every record from a reader
    ///
    /// Blank lines are records with no fields, so a blank line inside a
    /// file of non-empty records fails [`RowBatch::validate_shape`].
    /// Records may differ in width here; [`RowBatch::validate_shape`] decides
    /// whether that is acceptable.
    pub fn from_reader<R: Read>(mut reader: R) -> Result<Self, ImportError> {
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;

        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(data.as_slice());
        let mut records = csv_reader.records();

        let mut rows = Vec::new();
        for blank in record_lines(&data) {
            if blank {
                rows.push(Vec::new());
                continue;
            }
            match records.next() {
                Some(record) => rows.push(record?.iter().map(str::to_string).collect()),
                None => break,
            }
        }
        for record in records {
            rows.push(record?.iter().map(str::to_string).collect());
        }

        Ok(Self { rows })
    }

    /// Number of records
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// True if there are no records
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Records in file order
    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// Check that the batch is non-empty and uniformly wide
    ///
    /// Returns the shared field count.
    pub fn validate_shape(&self) -> Result<usize, ImportError> {
        let Some(first) = self.rows.first() else {
            return Err(ImportError::EmptyInput);
        };
        let expected = first.len();

        for (i, row) in self.rows.iter().enumerate().skip(1) {
            if row.len() != expected {
                return Err(ImportError::InconsistentColumnCount {
                    record: i + 1,
                    expected,
                    found: row.len(),
                });
            }
        }

        Ok(expected)
    }
}

impl From<Vec<Vec<String>>> for RowBatch {
    fn from(rows: Vec<Vec<String>>) -> Self {
        Self::new(rows)
    }
}

/// Scanner state for [`record_lines`]
#[derive(Clone, Copy, PartialEq, Eq)]
enum ScanState {
    FieldStart,
    Unquoted,
    Quoted,
    QuoteInQuoted,
}

/// Classify each physical record of `data` as blank (`true`) or not
///
/// Newlines inside quoted fields do not end a record. A line holding only a
/// carriage return counts as blank, matching the reader's terminator handling.
fn record_lines(data: &[u8]) -> Vec<bool> {
    let mut lines = Vec::new();
    let mut state = ScanState::FieldStart;
    let mut empty = true;

    for &b in data {
        match (state, b) {
            (ScanState::Quoted, b'"') => state = ScanState::QuoteInQuoted,
            (ScanState::Quoted, _) => {}
            (ScanState::QuoteInQuoted, b'"') => state = ScanState::Quoted,
            (_, b'\n') => {
                lines.push(empty);
                state = ScanState::FieldStart;
                empty = true;
            }
            (_, b'\r') => {}
            (ScanState::FieldStart, b'"') => {
                state = ScanState::Quoted;
                empty = false;
            }
            (_, b',') => {
                state = ScanState::FieldStart;
                empty = false;
            }
            _ => {
                state = ScanState::Unquoted;
                empty = false;
            }
        }
    }
    if !empty {
        lines.push(false);
    }

    lines
}
