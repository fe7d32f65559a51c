mod batch;
mod blurb;
mod cli;
mod config;
mod error;
mod report;
mod scoring;
mod source;
mod telemetry;
mod types;

use crate::batch::CancelFlag;
use crate::error::PrioritizerError;
use crate::source::{DirectorySource, RetryingSource, SignalSource};
use crate::types::config::PrioritizerConfig;
use crate::types::report::BatchReport;
use crate::types::scoring::BatchRow;
use chrono::NaiveDate;
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

pub mod exit_code {
    pub const SUCCESS: i32 = 0;
    pub const NO_DATA: i32 = 1;
    pub const INVALID_CONFIG: i32 = 2;
    pub const RUNTIME_FAILURE: i32 = 3;
}

/// Blurbs generated when `--blurbs` is given without `--top`.
const DEFAULT_BLURB_LIMIT: usize = 10;

fn run() -> Result<i32, PrioritizerError> {
    let cli = cli::Cli::parse();
    if let Err(err) = telemetry::init(cli.verbose, cli.quiet) {
        eprintln!("warning: {err}");
    }

    match cli.command {
        cli::Commands::Rank(cmd) => {
            let loaded = load_validated(&cmd.config)?;
            let today = resolve_today(&cmd.source);
            let directory = open_source(&cmd.source, &cmd.config, &loaded)?;
            let domains = collect_domains(&cmd, &directory)?;
            let source = retrying(directory, &loaded);

            let cancel = CancelFlag::new();
            if let Err(err) = cancel.cancel_on_interrupt() {
                tracing::warn!(error = %err, "interrupt handler not installed");
            }
            let outcome = batch::run_batch(&domains, &source, today, &loaded.scoring, &cancel);
            let mut rows = outcome.rows;
            if let Some(top) = cmd.top {
                keep_top(&mut rows, top);
            }

            let (blurbs, blurb_failures) = if cmd.blurbs {
                let limit = cmd.top.unwrap_or(DEFAULT_BLURB_LIMIT);
                blurb::generate_blurbs(&rows, &blurb::TemplateBlurbs, limit)
            } else {
                (Vec::new(), Vec::new())
            };

            let report = BatchReport {
                as_of: today,
                scoring_version: loaded.scoring.fingerprint()?,
                cancelled: outcome.cancelled,
                rows,
                blurbs,
                blurb_failures,
            };
            tracing::info!(
                scored = report.scored_count(),
                no_data = report.no_data_count(),
                "batch complete"
            );

            let output_format = match cmd.format {
                cli::ReportFormat::Table => report::OutputFormat::Table,
                cli::ReportFormat::Md => report::OutputFormat::Md,
                cli::ReportFormat::Json => report::OutputFormat::Json,
                cli::ReportFormat::Csv => report::OutputFormat::Csv,
            };
            let rendered = report::render(&report, output_format)?;
            match &cmd.out {
                Some(path) => {
                    std::fs::write(path, &rendered)?;
                    tracing::info!(path = %path.display(), "report written");
                }
                None => println!("{}", rendered.trim_end()),
            }

            if report.no_data_count() > 0 {
                Ok(exit_code::NO_DATA)
            } else {
                Ok(exit_code::SUCCESS)
            }
        }
        cli::Commands::Explain(cmd) => {
            let loaded = load_validated(&cmd.config)?;
            let today = resolve_today(&cmd.source);
            let domain = batch::normalize_domain(&cmd.domain)
                .ok_or_else(|| PrioritizerError::Input("domain must not be empty".to_string()))?;
            let source = retrying(open_source(&cmd.source, &cmd.config, &loaded)?, &loaded);

            let record = match source.fetch(&domain, today) {
                Ok(record) => record,
                Err(err) => {
                    eprintln!("no data: {err}");
                    return Ok(exit_code::NO_DATA);
                }
            };
            let result = scoring::score_record(&record, today, &loaded.scoring);
            let rendered = match cmd.format {
                cli::ExplainFormat::Table => report::explain::to_explanation(
                    &record,
                    &result,
                    today,
                    &loaded.scoring.fingerprint()?,
                ),
                cli::ExplainFormat::Json => serde_json::to_string_pretty(&result)?,
            };
            println!("{}", rendered.trim_end());
            Ok(exit_code::SUCCESS)
        }
        cli::Commands::Config(cmd) => {
            let loaded = load_validated(&cmd.config)?;
            println!("# scoring version: {}", loaded.scoring.fingerprint()?);
            println!("{}", toml::to_string_pretty(&loaded)?.trim_end());
            Ok(exit_code::SUCCESS)
        }
    }
}

fn load_validated(args: &cli::ConfigArgs) -> Result<PrioritizerConfig, PrioritizerError> {
    if !args.root.exists() {
        return Err(PrioritizerError::PathNotFound(args.root.display().to_string()));
    }
    let loaded = config::load_config(&args.root, args.config.as_deref())?;
    loaded.validate()?;
    Ok(loaded)
}

fn resolve_today(args: &cli::SourceArgs) -> NaiveDate {
    args.as_of.unwrap_or_else(|| chrono::Local::now().date_naive())
}

/// `--signals-dir` wins; a configured directory is relative to the root.
fn open_source(
    source: &cli::SourceArgs,
    config_args: &cli::ConfigArgs,
    loaded: &PrioritizerConfig,
) -> Result<DirectorySource, PrioritizerError> {
    let dir: PathBuf = match (&source.signals_dir, &loaded.source.signals_dir) {
        (Some(dir), _) => dir.clone(),
        (None, Some(dir)) => config_args.root.join(dir),
        (None, None) => {
            return Err(PrioritizerError::Input(
                "no signals directory: pass --signals-dir or set [source] signals_dir".to_string(),
            ))
        }
    };
    DirectorySource::open(&dir)
}

fn retrying(directory: DirectorySource, loaded: &PrioritizerConfig) -> RetryingSource<DirectorySource> {
    RetryingSource::new(
        directory,
        loaded.source.max_attempts,
        Duration::from_millis(loaded.source.backoff_ms),
    )
}

fn collect_domains(
    cmd: &cli::RankCommand,
    directory: &DirectorySource,
) -> Result<Vec<String>, PrioritizerError> {
    let mut domains = cmd
        .domains
        .iter()
        .filter_map(|raw| batch::normalize_domain(raw))
        .collect::<Vec<_>>();
    if let Some(path) = &cmd.domains_file {
        if !path.exists() {
            return Err(PrioritizerError::PathNotFound(path.display().to_string()));
        }
        domains.extend(batch::parse_domains(&std::fs::read_to_string(path)?));
    }
    if cmd.all {
        domains.extend(directory.domains());
    }
    if domains.is_empty() {
        return Err(PrioritizerError::Input(
            "no domains to rank: pass domains, --domains-file or --all".to_string(),
        ));
    }
    Ok(domains)
}

/// Drops scored rows past `top`; no-data rows are always reported.
fn keep_top(rows: &mut Vec<BatchRow>, top: usize) {
    let mut kept = 0;
    rows.retain(|row| {
        if !row.is_scored() {
            return true;
        }
        kept += 1;
        kept <= top
    });
}

fn main() {
    match run() {
        Ok(code) => {
            if code != 0 {
                std::process::exit(code);
            }
        }
        Err(e) => {
            eprintln!("error: {}", e);
            let code = match e {
                PrioritizerError::ConfigParse(_) | PrioritizerError::InvalidConfig(_) => {
                    exit_code::INVALID_CONFIG
                }
                _ => exit_code::RUNTIME_FAILURE,
            };
            std::process::exit(code);
        }
    }
}
