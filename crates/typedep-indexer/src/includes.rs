//! `#include` resolution

use regex::Regex;
use std::collections::BTreeSet;
use std::path::Path;
use std::sync::LazyLock;
use typedep_core::SourceFile;

use crate::warning::ScanWarning;

static INCLUDE_DIRECTIVE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?m)^\s*#\s*include\s*[<"]([^">]+)[">]"#).unwrap());

/// Files named by a file's `#include` directives.
#[derive(Debug, Clone, Default)]
pub struct Includes {
    pub files: BTreeSet<SourceFile>,
    pub warnings: Vec<ScanWarning>,
}

/// Collect the `#include` targets of `code` that map to a source file.
///
/// Only the target's file name matters: `"engine/Engine.h"` and `<Engine.h>`
/// both resolve to the `Engine` header. Targets without an extension, such as
/// `<vector>`, are library includes and are ignored. Targets with an
/// unrecognised extension produce a warning.
pub fn resolve_includes(code: &str) -> Includes {
    let mut includes = Includes::default();
    for caps in INCLUDE_DIRECTIVE.captures_iter(code) {
        let Some(target) = caps.get(1).map(|m| m.as_str().trim()) else {
            continue;
        };
        let Some(file_name) = Path::new(target).file_name() else {
            continue;
        };
        let file_name = Path::new(file_name);
        if file_name.extension().is_none() {
            continue;
        }
        match SourceFile::from_path(file_name) {
            Some(file) => {
                includes.files.insert(file);
            }
            None => includes.warnings.push(ScanWarning::UnmappedInclude {
                target: target.to_string(),
            }),
        }
    }
    includes
}
