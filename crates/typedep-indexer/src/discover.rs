//! File discovery over scan roots, keeping C/C++ sources and headers

use globset::{Glob, GlobSet, GlobSetBuilder};
use ignore::WalkBuilder;
use std::collections::BTreeSet;
use std::path::{Component, Path, PathBuf};
use tracing::{debug, warn};
use typedep_core::{Result, SourceKind, TypeGraphError};

use crate::config::ScanConfig;

/// Return the files to scan under `root`.
///
/// A file root is returned as-is. A directory root is walked recursively,
/// skipping excluded directory subtrees, excluded globs, and files whose
/// extension is not a recognised header or source extension.
pub fn find_code_files(root: &Path, config: &ScanConfig) -> Result<Vec<PathBuf>> {
    let metadata = std::fs::metadata(root).map_err(|source| TypeGraphError::Discovery {
        path: root.to_path_buf(),
        source,
    })?;
    if metadata.is_file() {
        return Ok(vec![root.to_path_buf()]);
    }

    let excluded = build_globset(&config.exclude)?;
    let excluded_dirs = config.excluded_dirs.clone();
    let walk_root = root.to_path_buf();

    let mut builder = WalkBuilder::new(root);
    // Excluded segments are matched below the root only: a root that itself
    // sits under a `tests` directory is still scanned.
    builder
        .standard_filters(false)
        .follow_links(true)
        .filter_entry(move |entry| !in_excluded_dir(entry.path(), &walk_root, &excluded_dirs));
    if config.respect_gitignore {
        builder
            .ignore(true)
            .git_ignore(true)
            .git_exclude(true)
            .parents(true)
            .require_git(false);
    }

    let mut files = Vec::new();
    for entry in builder.build() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!("Cannot read entry: {}", e);
                continue;
            }
        };
        if !entry.file_type().is_some_and(|ft| ft.is_file()) {
            continue;
        }
        let path = entry.path();
        if excluded.is_match(path) {
            debug!("Excluded by pattern: {}", path.display());
            continue;
        }
        if SourceKind::from_path(path).is_none() {
            continue;
        }
        files.push(entry.into_path());
    }
    files.sort();
    Ok(files)
}

/// Discover files under every root. The result is sorted and free of duplicates.
pub fn discover(roots: &[PathBuf], config: &ScanConfig) -> Result<Vec<PathBuf>> {
    let mut files = BTreeSet::new();
    for root in roots {
        let found = find_code_files(root, config)?;
        debug!("Found {} files under {}", found.len(), root.display());
        files.extend(found);
    }
    Ok(files.into_iter().collect())
}

/// True if `path`, relative to `root`, passes through an excluded directory.
fn in_excluded_dir(path: &Path, root: &Path, excluded_dirs: &[String]) -> bool {
    let relative = path.strip_prefix(root).unwrap_or(path);
    relative.components().any(|component| match component {
        Component::Normal(name) => excluded_dirs.iter().any(|dir| name == dir.as_str()),
        _ => false,
    })
}

fn build_globset(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob = Glob::new(pattern)
            .map_err(|e| TypeGraphError::Config(format!("invalid exclude pattern `{}`: {}", pattern, e)))?;
        builder.add(glob);
    }
    builder
        .build()
        .map_err(|e| TypeGraphError::Config(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::create_repo_with_structure;

    fn relative(root: &Path, files: &[PathBuf]) -> Vec<String> {
        files
            .iter()
            .map(|f| f.strip_prefix(root).unwrap().to_string_lossy().replace('\\', "/"))
            .collect()
    }

    #[test]
    fn filters_extensions_and_test_dirs() {
        let repo = create_repo_with_structure(&[
            ("src/Engine.h", "class Engine {};"),
            ("src/Engine.cpp", ""),
            ("src/util.c++", ""),
            ("src/notes.txt", ""),
            ("src/tests/EngineTest.cpp", ""),
            ("tests/Fixture.h", ""),
            ("lib/contests/Prize.hpp", ""),
        ]);
        let files = find_code_files(repo.path(), &ScanConfig::default()).unwrap();
        assert_eq!(
            relative(repo.path(), &files),
            vec!["lib/contests/Prize.hpp", "src/Engine.cpp", "src/Engine.h", "src/util.c++"]
        );
    }

    #[test]
    fn exclude_globs_are_applied() {
        let repo = create_repo_with_structure(&[
            ("src/Engine.h", ""),
            ("third_party/zlib/zlib.h", ""),
        ]);
        let config = ScanConfig {
            exclude: vec!["**/third_party/**".to_string()],
            ..ScanConfig::default()
        };
        let files = find_code_files(repo.path(), &config).unwrap();
        assert_eq!(relative(repo.path(), &files), vec!["src/Engine.h"]);
    }

    #[test]
    fn single_file_root_is_returned_as_is() {
        let repo = create_repo_with_structure(&[("README.md", "# readme")]);
        let file = repo.path().join("README.md");
        let files = find_code_files(&file, &ScanConfig::default()).unwrap();
        assert_eq!(files, vec![file]);
    }

    #[test]
    fn missing_root_is_a_discovery_error() {
        let repo = create_repo_with_structure(&[]);
        let result = find_code_files(&repo.path().join("nope"), &ScanConfig::default());
        assert!(matches!(result, Err(TypeGraphError::Discovery { .. })));
    }

    #[test]
    fn gitignore_is_opt_in() {
        let repo = create_repo_with_structure(&[
            (".gitignore", "build/\n"),
            ("src/Engine.h", ""),
            ("build/Generated.h", ""),
        ]);
        let all = find_code_files(repo.path(), &ScanConfig::default()).unwrap();
        assert_eq!(all.len(), 2);

        let config = ScanConfig {
            respect_gitignore: true,
            ..ScanConfig::default()
        };
        let filtered = find_code_files(repo.path(), &config).unwrap();
        assert_eq!(relative(repo.path(), &filtered), vec!["src/Engine.h"]);
    }

    #[test]
    fn multiple_roots_are_deduplicated() {
        let repo = create_repo_with_structure(&[("a/A.h", ""), ("b/B.h", "")]);
        let roots = vec![repo.path().to_path_buf(), repo.path().join("a")];
        let files = discover(&roots, &ScanConfig::default()).unwrap();
        assert_eq!(relative(repo.path(), &files), vec!["a/A.h", "b/B.h"]);
    }

    #[test]
    fn root_inside_tests_dir_is_scanned() {
        let repo = create_repo_with_structure(&[
            ("tests/fixture/Engine.h", ""),
            ("tests/fixture/tests/EngineTest.cpp", ""),
        ]);
        let root = repo.path().join("tests/fixture");
        let files = find_code_files(&root, &ScanConfig::default()).unwrap();
        assert_eq!(relative(&root, &files), vec!["Engine.h"]);
    }

    #[cfg(unix)]
    #[test]
    fn symlinked_sources_are_followed() {
        let repo = create_repo_with_structure(&[("shared/Engine.h", ""), ("src/Car.h", "")]);
        std::os::unix::fs::symlink(repo.path().join("shared/Engine.h"), repo.path().join("src/Engine.h")).unwrap();
        std::os::unix::fs::symlink(repo.path().join("shared"), repo.path().join("src/vendor")).unwrap();

        let root = repo.path().join("src");
        let files = find_code_files(&root, &ScanConfig::default()).unwrap();
        assert_eq!(relative(&root, &files), vec!["Car.h", "Engine.h", "vendor/Engine.h"]);
    }
}
