//! Batch scanning of a course directory

use crate::config::Config;
use crate::diagnostics::{Diagnostic, FileReport};
use crate::engine::LintEngine;
use chrono::{DateTime, Local};
use rayon::prelude::*;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Input directory not found: {0}")]
    NotFound(PathBuf),

    #[error("Input path is not a directory: {0}")]
    NotADirectory(PathBuf),

    #[error("Failed to walk {path}: {source}")]
    Walk {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("Failed to start worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

/// An HTML file discovered under the scan root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HtmlFile {
    /// Absolute or root-joined path on disk
    pub path: PathBuf,
    /// Path relative to the scan root, forward slashes
    pub relative: String,
}

/// A file that could not be loaded
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileFailure {
    pub path: String,
    pub reason: String,
}

/// Aggregate counts for one scan
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanSummary {
    /// HTML files found, including ones that failed to load
    pub files_scanned: usize,
    pub files_with_issues: usize,
    /// Total diagnostics across all files
    pub issues: usize,
    /// Files that could not be loaded
    pub parse_errors: usize,
}

/// Result of scanning a directory
#[derive(Debug, Clone)]
pub struct ScanReport {
    pub summary: ScanSummary,
    /// One report per loaded file, in walk order
    pub files: Vec<FileReport>,
    pub failures: Vec<FileFailure>,
    pub generated_at: DateTime<Local>,
}

impl ScanReport {
    /// Build a report from per-file outcomes, keeping their order
    pub fn from_outcomes(outcomes: Vec<Result<FileReport, FileFailure>>) -> Self {
        let mut summary = ScanSummary {
            files_scanned: outcomes.len(),
            ..Default::default()
        };
        let mut files = Vec::new();
        let mut failures = Vec::new();

        for outcome in outcomes {
            match outcome {
                Ok(report) => {
                    if report.has_issues() {
                        summary.files_with_issues += 1;
                        summary.issues += report.issue_count();
                    }
                    files.push(report);
                }
                Err(failure) => {
                    summary.parse_errors += 1;
                    failures.push(failure);
                }
            }
        }

        Self {
            summary,
            files,
            failures,
            generated_at: Local::now(),
        }
    }

    /// Files with at least one diagnostic, in walk order
    pub fn files_with_issues(&self) -> impl Iterator<Item = &FileReport> {
        self.files.iter().filter(|f| f.has_issues())
    }

    /// Diagnostics keyed by relative path; clean files are absent
    pub fn by_file(&self) -> BTreeMap<&str, &[Diagnostic]> {
        self.files_with_issues()
            .map(|f| (f.path.as_str(), f.diagnostics.as_slice()))
            .collect()
    }

    pub fn has_issues(&self) -> bool {
        self.summary.issues > 0
    }

    /// No issues and every file could be read
    pub fn is_clean(&self) -> bool {
        !self.has_issues() && self.summary.parse_errors == 0
    }
}

fn is_html(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("html") || e.eq_ignore_ascii_case("htm"))
}

fn relative_path(root: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// Find every `.html`/`.htm` file under `root`, sorted by name at each level
pub fn collect_html_files(root: &Path, config: &Config) -> Result<Vec<HtmlFile>, ScanError> {
    if !root.exists() {
        return Err(ScanError::NotFound(root.to_path_buf()));
    }
    if !root.is_dir() {
        return Err(ScanError::NotADirectory(root.to_path_buf()));
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) if e.depth() == 0 => {
                return Err(ScanError::Walk {
                    path: root.to_path_buf(),
                    source: e,
                })
            }
            Err(e) => {
                log::warn!("Skipping unreadable entry: {e}");
                continue;
            }
        };

        if !entry.file_type().is_file() || !is_html(entry.path()) {
            continue;
        }

        let relative = relative_path(root, entry.path());
        if config.is_file_excluded(Path::new(&relative)) {
            log::debug!("Excluded {relative}");
            continue;
        }

        files.push(HtmlFile {
            path: entry.into_path(),
            relative,
        });
    }

    Ok(files)
}

/// Lint a list of files; output order matches input order
pub fn scan_files(files: &[HtmlFile], engine: &LintEngine, jobs: usize) -> Result<ScanReport, ScanError> {
    let lint_one = |file: &HtmlFile| -> Result<FileReport, FileFailure> {
        log::debug!("Scanning {}", file.relative);
        engine.lint_file(&file.path, &file.relative).map_err(|e| {
            log::warn!("Failed to load {}: {e}", file.relative);
            FileFailure {
                path: file.relative.clone(),
                reason: e.to_string(),
            }
        })
    };

    let outcomes: Vec<_> = match jobs {
        1 => files.iter().map(lint_one).collect(),
        0 => files.par_iter().map(lint_one).collect(),
        n => {
            let pool = rayon::ThreadPoolBuilder::new().num_threads(n).build()?;
            pool.install(|| files.par_iter().map(lint_one).collect())
        }
    };

    let report = ScanReport::from_outcomes(outcomes);
    log::info!(
        "Scanned {} files: {} issues in {} files, {} failed to load",
        report.summary.files_scanned,
        report.summary.issues,
        report.summary.files_with_issues,
        report.summary.parse_errors
    );
    Ok(report)
}

/// Walk `root` and lint every HTML file in it
pub fn scan_directory(root: &Path, config: &Config) -> Result<ScanReport, ScanError> {
    let files = collect_html_files(root, config)?;
    let engine = LintEngine::new(config);
    scan_files(&files, &engine, config.jobs)
}
