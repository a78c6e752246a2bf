//! File scanning, declaration extraction, and reference classification

pub mod builder;
pub mod classifier;
pub mod config;
pub mod coordinator;
pub mod discover;
pub mod extractor;
pub mod includes;
pub mod warning;


#[cfg(test)]
pub mod test_utils;

pub use builder::assemble;
pub use classifier::{classify_body, inherits_from, ReferenceClassifier};
pub use config::{OutputConfig, ScanConfig, CONFIG_FILE};
pub use coordinator::{scan_file, Coordinator, ScanOutcome, ScanStats};
pub use discover::{discover, find_code_files};
pub use extractor::{extract_declarations, strip_line_comments, Extraction};
pub use includes::{resolve_includes, Includes};
pub use warning::ScanWarning;
