//! course-lint CLI entry point

use clap::Parser;
use course_lint::config::CliOptions;
use course_lint::engine::LintEngine;
use course_lint::rules::{iframe_only_rules, standard_rules};
use course_lint::{output, scan, Config};
use miette::{IntoDiagnostic, Result};
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(name = "course-lint")]
#[command(author, version, about = "A linter for course-template HTML pages", long_about = None)]
struct Cli {
    /// Course directory to scan
    #[arg(required_unless_present = "list_rules")]
    dir: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    format: OutputFormat,

    /// Also write the text report to this file
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Config file path (default: auto-detect .courselintrc.json)
    #[arg(short, long, env = "COURSELINT_CONFIG")]
    config: Option<PathBuf>,

    /// Disable specific rule (can be used multiple times)
    #[arg(short, long = "ignore", value_name = "RULE")]
    ignore: Vec<String>,

    /// Exclude files matching pattern (can be used multiple times)
    #[arg(long = "exclude", value_name = "PATTERN")]
    exclude: Vec<String>,

    /// Number of parallel jobs (0 = auto, 1 = sequential)
    #[arg(short = 'j', long = "jobs", value_name = "N")]
    jobs: Option<usize>,

    /// List all rules and exit
    #[arg(long)]
    list_rules: bool,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[derive(clap::ValueEnum, Clone, Debug, Default)]
enum OutputFormat {
    #[default]
    Text,
    Json,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter)).init();

    if cli.no_color {
        colored::control::set_override(false);
    }

    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e:?}");
            ExitCode::from(2)
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode> {
    if cli.list_rules {
        print_rules();
        return Ok(ExitCode::SUCCESS);
    }

    let Some(dir) = cli.dir else {
        return Err(miette::miette!("No input directory given"));
    };

    // Load or create configuration
    let mut config = if let Some(ref config_path) = cli.config {
        Config::from_file(config_path).into_diagnostic()?
    } else {
        match Config::find_and_load(&dir) {
            Ok(Some((path, cfg))) => {
                log::info!("Using config: {}", path.display());
                cfg
            }
            Ok(None) => Config::default(),
            Err(e) => {
                log::warn!("Failed to load config: {e}");
                Config::default()
            }
        }
    };

    config
        .merge_cli(CliOptions {
            disabled_rules: cli.ignore,
            exclude: cli.exclude,
            jobs: cli.jobs,
        })
        .into_diagnostic()?;

    let files = scan::collect_html_files(&dir, &config).into_diagnostic()?;
    if files.is_empty() {
        eprintln!("No HTML files found in {}", dir.display());
    }

    let engine = LintEngine::new(&config);
    log::debug!("{} rules enabled", engine.rule_count());
    let report = scan::scan_files(&files, &engine, config.jobs).into_diagnostic()?;

    match cli.format {
        OutputFormat::Text => {
            output::print_text(&report);
            eprintln!("\n{}", output::summary_line(&report.summary));
        }
        OutputFormat::Json => {
            output::print_json(&report).into_diagnostic()?;
        }
    }

    if let Some(path) = cli.output {
        fs::write(&path, output::render_text(&report)).into_diagnostic()?;
        log::info!("Report written to {}", path.display());
    }

    Ok(if report.is_clean() {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(1)
    })
}

fn print_rules() {
    let iframe_only: Vec<&'static str> = iframe_only_rules().iter().map(|r| r.id()).collect();

    println!("{:26} {:22} DESCRIPTION", "RULE", "PAGES");
    for rule in standard_rules() {
        let pages = if iframe_only.contains(&rule.id()) {
            "standard, iframe-only"
        } else {
            "standard"
        };
        println!("{:26} {:22} {}", rule.id(), pages, rule.description());
    }
}
