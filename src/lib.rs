//! course-lint: a linter for course-template HTML pages
//!
//! Walks a directory of course pages, parses each one, runs a fixed battery of
//! structural and accessibility checks against it and reports every finding with
//! the source line it came from.

pub mod aggregator;
pub mod config;
pub mod diagnostics;
pub mod engine;
pub mod location;
pub mod output;
pub mod parser;
pub mod rules;
pub mod scan;

pub use config::{CliOptions, Config, ConfigError};
pub use diagnostics::{Diagnostic, ErrorSink, FileReport, Finding};
pub use engine::{LintEngine, PageShape};
pub use parser::{HtmlDocument, LoadError};
pub use rules::{Rule, RuleContext};
pub use scan::{scan_directory, ScanError, ScanReport, ScanSummary};
