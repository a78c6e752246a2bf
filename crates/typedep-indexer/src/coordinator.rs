//! Orchestrates concurrent scanning
//!
//! A fixed pool of worker threads drains a bounded queue of file paths. Each
//! worker extracts declarations and includes from one file at a time and
//! records the result in a shared [`ScanTable`]. The coordinator returns once
//! the queue is drained and every worker has finished.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc::{self, Receiver};
use std::sync::Mutex;
use std::thread;

use tracing::{debug, error, info, warn};
use typedep_core::{Corpus, FileScan, Result, ScanTable, SourceFile, TypeGraph, ValidationReport};

use crate::builder::assemble;
use crate::config::ScanConfig;
use crate::discover::discover;
use crate::extractor::{extract_declarations, strip_line_comments};
use crate::includes::resolve_includes;
use crate::warning::ScanWarning;

/// Counters for one scan.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanStats {
    pub files_discovered: usize,
    pub files_scanned: usize,
    pub files_failed: usize,
    pub declarations: usize,
    pub includes: usize,
    pub warnings: usize,
}

impl fmt::Display for ScanStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Scanned {} of {} files ({} failed): {} declarations, {} includes, {} warnings",
            self.files_scanned,
            self.files_discovered,
            self.files_failed,
            self.declarations,
            self.includes,
            self.warnings
        )
    }
}

/// A validated graph and how it was produced.
#[derive(Debug)]
pub struct ScanOutcome {
    pub graph: TypeGraph,
    pub report: ValidationReport,
    pub stats: ScanStats,
}

#[derive(Default)]
struct Tally {
    scanned: AtomicUsize,
    failed: AtomicUsize,
    warnings: AtomicUsize,
}

/// Read one file and recover its declarations and includes.
///
/// Returns the per-declaration warnings alongside the scan. An unreadable file
/// or one without a recognised extension is rejected as a whole.
pub fn scan_file(path: &Path) -> std::result::Result<(FileScan, Vec<ScanWarning>), ScanWarning> {
    let source = SourceFile::from_path(path).ok_or_else(|| ScanWarning::UnmappedExtension {
        path: path.to_path_buf(),
    })?;
    let bytes = std::fs::read(path).map_err(|e| ScanWarning::Unreadable {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    let code = strip_line_comments(&String::from_utf8_lossy(&bytes));

    let extraction = extract_declarations(&code, &source);
    let includes = resolve_includes(&code);

    let mut warnings = extraction.warnings;
    warnings.extend(includes.warnings);
    let scan = FileScan {
        path: path.to_path_buf(),
        source,
        declarations: extraction.declarations,
        includes: includes.files,
    };
    Ok((scan, warnings))
}

pub struct Coordinator {
    config: ScanConfig,
}

impl Coordinator {
    pub fn new(config: ScanConfig) -> Self {
        Coordinator { config }
    }

    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    /// Scan `files` on the worker pool and merge the results.
    pub fn scan(&self, files: Vec<PathBuf>) -> (Corpus, ScanStats) {
        let files_discovered = files.len();
        let (sender, receiver) = mpsc::sync_channel::<PathBuf>(self.config.queue_capacity);
        let receiver = Mutex::new(receiver);
        let table = ScanTable::new();
        let tally = Tally::default();

        info!("Processing source files at capacity of {} threads", self.config.workers);
        thread::scope(|scope| {
            for worker_id in 0..self.config.workers {
                let receiver = &receiver;
                let table = &table;
                let tally = &tally;
                scope.spawn(move || worker_thread(worker_id, receiver, table, tally));
            }

            for path in files {
                if sender.send(path).is_err() {
                    error!("All scan workers exited before the queue was drained");
                    break;
                }
            }
            drop(sender);
        });
        info!("All work completed");

        let corpus = table.freeze();
        let stats = ScanStats {
            files_discovered,
            files_scanned: tally.scanned.load(Ordering::Relaxed),
            files_failed: tally.failed.load(Ordering::Relaxed),
            declarations: corpus.types().count(),
            includes: corpus.includes().values().map(|i| i.len()).sum(),
            warnings: tally.warnings.load(Ordering::Relaxed),
        };
        (corpus, stats)
    }

    /// Discover, scan and assemble, without validating.
    pub fn build(&self, roots: &[PathBuf]) -> Result<(TypeGraph, ScanStats)> {
        self.config.validate()?;
        let files = discover(roots, &self.config)?;
        info!("Found {} source files", files.len());

        let (corpus, stats) = self.scan(files);
        info!("{}", stats);

        let graph = assemble(&corpus);
        info!("Assembled {} nodes, {} edges", graph.node_count(), graph.edge_count());
        Ok((graph, stats))
    }

    /// Discover, scan, assemble and validate.
    pub fn run_full_index(&self, roots: &[PathBuf]) -> Result<ScanOutcome> {
        let (graph, stats) = self.build(roots)?;
        let report = graph.validate()?;
        Ok(ScanOutcome { graph, report, stats })
    }
}

fn worker_thread(worker_id: usize, receiver: &Mutex<Receiver<PathBuf>>, table: &ScanTable, tally: &Tally) {
    debug!("Scan worker {} started", worker_id);

    loop {
        let next = match receiver.lock() {
            Ok(guard) => guard.recv(),
            Err(_) => {
                error!("Scan worker {} found the work queue poisoned", worker_id);
                break;
            }
        };
        let Ok(path) = next else {
            debug!("Scan worker {} shutting down", worker_id);
            break;
        };

        debug!("Processing {}", path.display());
        match scan_file(&path) {
            Ok((scan, warnings)) => {
                for warning in &warnings {
                    warn!("{}: {}", path.display(), warning);
                }
                tally.warnings.fetch_add(warnings.len(), Ordering::Relaxed);
                tally.scanned.fetch_add(1, Ordering::Relaxed);
                table.insert(scan);
            }
            Err(warning) => {
                warn!("Skipping {}", warning);
                tally.warnings.fetch_add(1, Ordering::Relaxed);
                tally.failed.fetch_add(1, Ordering::Relaxed);
            }
        }
        debug!("Finished {}", path.display());
    }
}
