//! Non-fatal conditions met while scanning a file

use std::path::PathBuf;

/// A per-file problem. Logged, counted, and otherwise ignored: the scan continues.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScanWarning {
    #[error("declaration head `{head}` has no identifier")]
    MissingIdentifier { head: String },

    #[error("declaration `{head}` does not have a proper classifier")]
    UnknownClassifier { head: String },

    #[error("source file {} does not have a valid extension", path.display())]
    UnmappedExtension { path: PathBuf },

    #[error("include target `{target}` has no recognised extension")]
    UnmappedInclude { target: String },

    #[error("cannot read {}: {reason}", path.display())]
    Unreadable { path: PathBuf, reason: String },
}
