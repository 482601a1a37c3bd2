//! Upload and distribution settings.

use std::path::PathBuf;

use crate::model::AgentOrder;

/// Default upload size limit (5 MiB).
pub const DEFAULT_MAX_FILE_SIZE_BYTES: u64 = 5 * 1024 * 1024;

/// File extensions accepted when nothing else is configured.
pub const DEFAULT_ALLOWED_EXTENSIONS: [&str; 3] = [".csv", ".xlsx", ".xls"];

/// Limits applied to uploaded files before and during parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadConfig {
    /// Largest accepted file, in bytes.
    pub max_file_size_bytes: u64,
    /// Accepted extensions, with leading dot (e.g. `.csv`).
    pub allowed_extensions: Vec<String>,
    /// Directory where uploads are staged until they are parsed.
    pub temp_directory: PathBuf,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            max_file_size_bytes: DEFAULT_MAX_FILE_SIZE_BYTES,
            allowed_extensions: DEFAULT_ALLOWED_EXTENSIONS
                .iter()
                .map(|ext| ext.to_string())
                .collect(),
            temp_directory: std::env::temp_dir(),
        }
    }
}

impl UploadConfig {
    /// Check whether an extension is accepted (case-insensitive, dot optional).
    pub fn allows(&self, extension: &str) -> bool {
        let wanted = normalize_extension(extension);
        self.allowed_extensions
            .iter()
            .any(|allowed| normalize_extension(allowed) == wanted)
    }
}

/// Lowercase an extension and make sure it carries a leading dot.
pub fn normalize_extension(extension: &str) -> String {
    let trimmed = extension.trim().trim_start_matches('.');
    format!(".{}", trimmed.to_ascii_lowercase())
}

/// Settings for the upload pipeline.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DistributorConfig {
    /// File limits handed to the parser.
    pub upload: UploadConfig,
    /// Order in which active agents receive their allotments.
    pub agent_order: AgentOrder,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_extensions() {
        let config = UploadConfig::default();
        assert!(config.allows(".csv"));
        assert!(config.allows("XLSX"));
        assert!(config.allows(".Xls"));
        assert!(!config.allows(".txt"));
        assert!(!config.allows(""));
    }

    #[test]
    fn test_normalize_extension() {
        assert_eq!(normalize_extension("CSV"), ".csv");
        assert_eq!(normalize_extension(" .xlsx "), ".xlsx");
    }
}
