//! Row validation for parsed uploads.
//!
//! Validation never stops at the first problem: every missing column or
//! blank required field is reported, so the file can be fixed in one pass.

use std::fmt;

use crate::error::{DistributorError, Result};
use crate::model::Contact;
use crate::tabular::Row;

/// Column holding the contact's first name.
pub const FIRST_NAME: &str = "FirstName";
/// Column holding the contact's phone number.
pub const PHONE: &str = "Phone";
/// Optional free-text column.
pub const NOTES: &str = "Notes";

/// Columns every upload must carry.
pub const REQUIRED_COLUMNS: [&str; 2] = [FIRST_NAME, PHONE];

/// A single problem found in an upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationIssue {
    /// The upload has no rows.
    EmptyFile,
    /// A required column is absent from the header row.
    MissingColumn(&'static str),
    /// A required field is blank in a row (1-indexed).
    MissingField { row: usize, field: &'static str },
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationIssue::EmptyFile => write!(f, "File is empty or invalid"),
            ValidationIssue::MissingColumn(column) => {
                write!(f, "Missing required field: {}", column)
            }
            ValidationIssue::MissingField { row, field } => {
                write!(f, "Row {}: {} is required", row, field)
            }
        }
    }
}

/// Check parsed rows, collecting every issue.
pub fn validate_rows(rows: &[Row]) -> std::result::Result<(), Vec<ValidationIssue>> {
    let Some(first) = rows.first() else {
        return Err(vec![ValidationIssue::EmptyFile]);
    };

    // Row checks against a missing column would only repeat the same problem.
    let missing_columns: Vec<ValidationIssue> = REQUIRED_COLUMNS
        .iter()
        .filter(|column| !first.has_column(column))
        .map(|column| ValidationIssue::MissingColumn(*column))
        .collect();
    if !missing_columns.is_empty() {
        return Err(missing_columns);
    }

    let mut issues = Vec::new();
    for (index, row) in rows.iter().enumerate() {
        for field in REQUIRED_COLUMNS {
            if row.text(field).is_none() {
                issues.push(ValidationIssue::MissingField {
                    row: index + 1,
                    field,
                });
            }
        }
    }

    if issues.is_empty() {
        Ok(())
    } else {
        Err(issues)
    }
}

/// Validate rows and narrow them into typed contacts.
///
/// An upload without rows is reported as an empty file rather than a
/// validation failure.
pub fn into_contacts(rows: Vec<Row>) -> Result<Vec<Contact>> {
    if let Err(issues) = validate_rows(&rows) {
        if issues == [ValidationIssue::EmptyFile] {
            return Err(DistributorError::EmptyOrMalformedFile(
                "no data rows".to_string(),
            ));
        }
        return Err(DistributorError::ValidationFailed(issues));
    }

    Ok(rows
        .into_iter()
        .map(|row| Contact {
            first_name: row.text(FIRST_NAME).unwrap_or_default(),
            phone: row.text(PHONE).unwrap_or_default(),
            notes: row.text(NOTES).unwrap_or_default(),
        })
        .collect())
}
