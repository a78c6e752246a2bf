//! Corpus-wide mappings of file -> declarations and file -> includes

use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;

use dashmap::DashMap;
use tracing::warn;

use crate::model::{DeclarationBody, SourceFile, TypeDeclaration};

/// Everything recovered from one file on disk.
#[derive(Debug, Clone)]
pub struct FileScan {
    pub path: PathBuf,
    pub source: SourceFile,
    pub declarations: BTreeMap<TypeDeclaration, DeclarationBody>,
    pub includes: BTreeSet<SourceFile>,
}

/// Per-file results written by concurrent workers. Thread-safe for concurrent access.
///
/// Entries are keyed by path, so two workers never contend for the same key.
/// Reconciling files that share a (stem, kind) identity happens once, in [`ScanTable::freeze`].
pub struct ScanTable {
    scans: DashMap<PathBuf, FileScan>,
}

impl ScanTable {
    pub fn new() -> Self {
        ScanTable {
            scans: DashMap::new(),
        }
    }

    /// Record the result of scanning one file.
    pub fn insert(&self, scan: FileScan) {
        self.scans.insert(scan.path.clone(), scan);
    }

    /// Merge all per-file results into a corpus keyed by file identity.
    ///
    /// Files are merged in sorted path order, so the outcome does not depend on
    /// which worker finished first.
    pub fn freeze(self) -> Corpus {
        let mut scans: Vec<FileScan> = self.scans.into_iter().map(|(_, scan)| scan).collect();
        scans.sort_by(|a, b| a.path.cmp(&b.path));

        let mut corpus = Corpus::default();
        for scan in scans {
            corpus.merge(scan);
        }
        corpus
    }
}

impl Default for ScanTable {
    fn default() -> Self {
        Self::new()
    }
}

/// The merged, read-only view of a whole scan.
#[derive(Debug, Clone, Default)]
pub struct Corpus {
    declarations: BTreeMap<SourceFile, BTreeMap<TypeDeclaration, DeclarationBody>>,
    includes: BTreeMap<SourceFile, BTreeSet<SourceFile>>,
    paths: BTreeMap<SourceFile, Vec<PathBuf>>,
}

impl Corpus {
    /// Fold one file's scan into the corpus. Includes are unioned; an existing
    /// declaration is never replaced.
    pub fn merge(&mut self, scan: FileScan) {
        let FileScan {
            path,
            source,
            declarations,
            includes,
        } = scan;

        let paths = self.paths.entry(source.clone()).or_default();
        if !paths.is_empty() {
            warn!(
                "{} shares its identity with {}; merging",
                path.display(),
                paths
                    .iter()
                    .map(|p| p.display().to_string())
                    .collect::<Vec<_>>()
                    .join(", ")
            );
        }
        paths.push(path);

        if !declarations.is_empty() {
            let existing = self.declarations.entry(source.clone()).or_default();
            for (decl, body) in declarations {
                existing.entry(decl).or_insert(body);
            }
        }
        if !includes.is_empty() {
            self.includes.entry(source).or_default().extend(includes);
        }
    }

    /// Files that declared at least one type, with their declarations.
    pub fn declarations(&self) -> &BTreeMap<SourceFile, BTreeMap<TypeDeclaration, DeclarationBody>> {
        &self.declarations
    }

    /// Files that included at least one resolvable file.
    pub fn includes(&self) -> &BTreeMap<SourceFile, BTreeSet<SourceFile>> {
        &self.includes
    }

    /// Files included by `file`.
    pub fn includes_of(&self, file: &SourceFile) -> Option<&BTreeSet<SourceFile>> {
        self.includes.get(file)
    }

    /// Every declared type in the corpus.
    pub fn types(&self) -> impl Iterator<Item = &TypeDeclaration> {
        self.declarations.values().flat_map(|decls| decls.keys())
    }

    /// Types reachable from `file` through its `#include` directives: the union,
    /// over every included file, of the types declared there.
    pub fn visible_types(&self, file: &SourceFile) -> BTreeSet<&TypeDeclaration> {
        self.includes
            .get(file)
            .into_iter()
            .flatten()
            .filter_map(|included| self.declarations.get(included))
            .flat_map(|decls| decls.keys())
            .collect()
    }

    /// Number of distinct file identities seen.
    pub fn file_count(&self) -> usize {
        self.paths.len()
    }
}
