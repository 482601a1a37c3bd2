//! Tabular upload parsing.
//!
//! Uploads arrive as a staged temp file plus the name the client gave it.
//! The extension picks the decoder: comma-separated text or a spreadsheet
//! workbook (first sheet only). In both cases the first row holds the column
//! headers and every following non-blank row becomes a [`Row`].
//!
//! The staged file is owned by [`UploadedFile`] and removed once the parser
//! is done with it, whatever the outcome.

use std::io::Write;
use std::path::Path;

use calamine::{open_workbook_auto, Data, Reader};
use indexmap::IndexMap;
use serde::Serialize;
use tempfile::NamedTempFile;
use tracing::{debug, warn};

use crate::config::{normalize_extension, UploadConfig};
use crate::error::{DistributorError, Result};

/// A raw cell value, before validation narrows it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CellValue {
    Text(String),
    Number(f64),
    Empty,
}

impl CellValue {
    /// Build a cell from delimited text; the empty string is an empty cell.
    pub fn from_text(text: &str) -> Self {
        if text.is_empty() {
            CellValue::Empty
        } else {
            CellValue::Text(text.to_string())
        }
    }

    /// Render the cell as text. Empty cells have no text.
    pub fn as_text(&self) -> Option<String> {
        match self {
            CellValue::Text(text) => Some(text.clone()),
            CellValue::Number(number) => Some(render_number(*number)),
            CellValue::Empty => None,
        }
    }

    /// Whether the cell is empty or only whitespace.
    pub fn is_blank(&self) -> bool {
        self.as_text().map_or(true, |text| text.trim().is_empty())
    }
}

impl From<&Data> for CellValue {
    fn from(cell: &Data) -> Self {
        match cell {
            Data::Empty | Data::Error(_) => CellValue::Empty,
            Data::String(text) => CellValue::from_text(text),
            Data::Float(number) => CellValue::Number(*number),
            Data::Int(number) => CellValue::Number(*number as f64),
            other => CellValue::Text(other.to_string()),
        }
    }
}

/// Whole numbers print without a fractional part, so a phone number stored
/// as a spreadsheet number reads back as `5551234567`.
fn render_number(number: f64) -> String {
    if number.is_finite() && number.fract() == 0.0 && number.abs() < 1e15 {
        format!("{}", number as i64)
    } else {
        number.to_string()
    }
}

/// One parsed row: header name to cell value, in column order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    cells: IndexMap<String, CellValue>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the value of a column.
    pub fn insert(&mut self, header: impl Into<String>, value: CellValue) {
        self.cells.insert(header.into(), value);
    }

    /// Get the value of a column, if the column exists.
    pub fn get(&self, header: &str) -> Option<&CellValue> {
        self.cells.get(header)
    }

    /// Whether the row has the column at all (even if empty).
    pub fn has_column(&self, header: &str) -> bool {
        self.cells.contains_key(header)
    }

    /// Column headers in file order.
    pub fn headers(&self) -> impl Iterator<Item = &str> {
        self.cells.keys().map(String::as_str)
    }

    /// Trimmed text of a column; `None` when missing or blank.
    pub fn text(&self, header: &str) -> Option<String> {
        self.get(header)
            .and_then(CellValue::as_text)
            .map(|text| text.trim().to_string())
            .filter(|text| !text.is_empty())
    }

    /// Whether every cell is blank.
    pub fn is_blank(&self) -> bool {
        self.cells.values().all(CellValue::is_blank)
    }
}

impl FromIterator<(String, CellValue)> for Row {
    fn from_iter<I: IntoIterator<Item = (String, CellValue)>>(iter: I) -> Self {
        Self {
            cells: iter.into_iter().collect(),
        }
    }
}

/// Supported encodings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    /// Comma-separated text.
    Csv,
    /// Excel workbook (`.xlsx` or legacy `.xls`).
    Workbook,
}

impl FileFormat {
    /// Pick the format for an extension (case-insensitive, dot optional).
    pub fn from_extension(extension: &str) -> Option<Self> {
        match normalize_extension(extension).as_str() {
            ".csv" => Some(FileFormat::Csv),
            ".xlsx" | ".xls" => Some(FileFormat::Workbook),
            _ => None,
        }
    }
}

/// Lowercased extension of a file name, with leading dot.
pub fn extension_of(file_name: &str) -> Option<String> {
    Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .filter(|ext| !ext.is_empty())
        .map(normalize_extension)
}

/// An upload staged on disk. Dropping it removes the file.
#[derive(Debug)]
pub struct UploadedFile {
    file: NamedTempFile,
    original_name: String,
    extension: Option<String>,
}

impl UploadedFile {
    /// Write uploaded bytes into a new temp file under `temp_dir`.
    pub fn store(temp_dir: &Path, original_name: &str, bytes: &[u8]) -> Result<Self> {
        let extension = extension_of(original_name);
        let mut file = tempfile::Builder::new()
            .prefix("upload-")
            .suffix(extension.as_deref().unwrap_or(""))
            .tempfile_in(temp_dir)?;
        file.write_all(bytes)?;
        file.flush()?;

        debug!(
            file = %original_name,
            path = %file.path().display(),
            bytes = bytes.len(),
            "Staged upload"
        );

        Ok(Self {
            file,
            original_name: original_name.to_string(),
            extension,
        })
    }

    /// Location of the staged file.
    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// Name the client gave the file.
    pub fn original_name(&self) -> &str {
        &self.original_name
    }

    /// Declared extension, lowercased with leading dot.
    pub fn extension(&self) -> Option<&str> {
        self.extension.as_deref()
    }

    /// Remove the staged file, logging instead of failing.
    fn discard(self) {
        let path = self.file.path().to_path_buf();
        match self.file.close() {
            Ok(()) => debug!(path = %path.display(), "Removed staged upload"),
            Err(err) => warn!(path = %path.display(), error = %err, "Failed to remove staged upload"),
        }
    }
}

/// Reads staged uploads into rows.
#[derive(Debug, Clone, Default)]
pub struct TabularParser {
    config: UploadConfig,
}

impl TabularParser {
    pub fn new(config: UploadConfig) -> Self {
        Self { config }
    }

    /// Limits this parser enforces.
    pub fn config(&self) -> &UploadConfig {
        &self.config
    }

    /// Resolve the format of an upload, rejecting anything not allowed.
    pub fn format_of(&self, upload: &UploadedFile) -> Result<FileFormat> {
        upload
            .extension()
            .filter(|ext| self.config.allows(ext))
            .and_then(FileFormat::from_extension)
            .ok_or_else(|| DistributorError::UnsupportedFormat(upload.original_name().to_string()))
    }

    /// Parse an upload into rows and remove the staged file.
    ///
    /// The caller gets every row or an error, never a partial result.
    pub fn parse(&self, upload: UploadedFile) -> Result<Vec<Row>> {
        let result = self.read(&upload);
        upload.discard();
        result
    }

    fn read(&self, upload: &UploadedFile) -> Result<Vec<Row>> {
        let format = self.format_of(upload)?;

        let size = std::fs::metadata(upload.path())
            .map_err(|err| DistributorError::EmptyOrMalformedFile(err.to_string()))?
            .len();
        if size > self.config.max_file_size_bytes {
            return Err(DistributorError::FileTooLarge {
                size,
                max: self.config.max_file_size_bytes,
            });
        }

        let rows = match format {
            FileFormat::Csv => read_csv(upload.path())?,
            FileFormat::Workbook => read_workbook(upload.path())?,
        };

        debug!(
            file = %upload.original_name(),
            format = ?format,
            rows = rows.len(),
            "Parsed upload"
        );

        Ok(rows)
    }
}

fn malformed(err: impl std::fmt::Display) -> DistributorError {
    DistributorError::EmptyOrMalformedFile(err.to_string())
}

/// Pair cells with headers. Columns without a header are dropped and
/// missing trailing cells read as empty.
fn build_row(headers: &[String], cells: impl IntoIterator<Item = CellValue>) -> Row {
    let mut cells = cells.into_iter();
    headers
        .iter()
        .map(|header| (header, cells.next().unwrap_or(CellValue::Empty)))
        .filter(|(header, _)| !header.is_empty())
        .map(|(header, value)| (header.clone(), value))
        .collect()
}

fn read_csv(path: &Path) -> Result<Vec<Row>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)
        .map_err(malformed)?;

    let headers: Vec<String> = reader
        .headers()
        .map_err(malformed)?
        .iter()
        .map(|header| header.trim_start_matches('\u{feff}').to_string())
        .collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(malformed)?;
        let row = build_row(&headers, record.iter().map(CellValue::from_text));
        if !row.is_blank() {
            rows.push(row);
        }
    }

    Ok(rows)
}

fn read_workbook(path: &Path) -> Result<Vec<Row>> {
    let mut workbook = open_workbook_auto(path).map_err(malformed)?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| malformed("workbook has no sheets"))?
        .map_err(malformed)?;

    let mut sheet_rows = range.rows();
    let Some(header_cells) = sheet_rows.next() else {
        return Ok(Vec::new());
    };
    let headers: Vec<String> = header_cells.iter().map(|cell| cell.to_string()).collect();

    let rows = sheet_rows
        .map(|cells| build_row(&headers, cells.iter().map(CellValue::from)))
        .filter(|row| !row.is_blank())
        .collect();

    Ok(rows)
}
