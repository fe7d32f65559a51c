use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "prioritizer",
    version,
    about = "Account prioritization: fit score, trigger badge and ranked outreach list"
)]
pub struct Cli {
    /// Increase verbosity (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Score and rank a batch of domains
    Rank(RankCommand),
    /// Show the full score breakdown for one domain
    Explain(ExplainCommand),
    /// Validate and print the effective scoring policy
    Config(ConfigCommand),
}

/// Where configuration is read from.
#[derive(Args, Clone, Debug)]
pub struct ConfigArgs {
    /// Directory holding prioritizer.toml and .prioritizer/local.toml
    #[arg(long, default_value = ".")]
    pub root: PathBuf,

    /// Extra config file merged on top of every other layer
    #[arg(long)]
    pub config: Option<PathBuf>,
}

/// Where signals come from and which day counts as today.
#[derive(Args, Clone, Debug)]
pub struct SourceArgs {
    /// Directory of <domain>.json payload bundles
    #[arg(long)]
    pub signals_dir: Option<PathBuf>,

    /// Evaluation date (YYYY-MM-DD); defaults to the local date
    #[arg(long)]
    pub as_of: Option<NaiveDate>,
}

#[derive(Args)]
pub struct RankCommand {
    /// Domains to rank
    pub domains: Vec<String>,

    /// File with one domain per line (# starts a comment)
    #[arg(long)]
    pub domains_file: Option<PathBuf>,

    /// Rank every payload found in the signals directory
    #[arg(long)]
    pub all: bool,

    #[arg(short, long, value_enum, default_value = "table")]
    pub format: ReportFormat,

    /// Write the report to a file instead of stdout
    #[arg(short, long)]
    pub out: Option<PathBuf>,

    /// Generate sales blurbs for the top-ranked accounts
    #[arg(long)]
    pub blurbs: bool,

    /// Keep only the N best-ranked scored rows
    #[arg(long)]
    pub top: Option<usize>,

    #[command(flatten)]
    pub source: SourceArgs,

    #[command(flatten)]
    pub config: ConfigArgs,
}

#[derive(Args)]
pub struct ExplainCommand {
    pub domain: String,

    #[arg(short, long, value_enum, default_value = "table")]
    pub format: ExplainFormat,

    #[command(flatten)]
    pub source: SourceArgs,

    #[command(flatten)]
    pub config: ConfigArgs,
}

#[derive(Args)]
pub struct ConfigCommand {
    #[command(flatten)]
    pub config: ConfigArgs,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum ReportFormat {
    Table,
    Md,
    Json,
    Csv,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum ExplainFormat {
    Table,
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn rank_parses_sources_and_date() {
        let cli = Cli::parse_from([
            "prioritizer",
            "rank",
            "acme.com",
            "beta.io",
            "--signals-dir",
            "payloads",
            "--as-of",
            "2026-06-01",
            "--format",
            "csv",
            "--top",
            "5",
        ]);
        match cli.command {
            Commands::Rank(cmd) => {
                assert_eq!(cmd.domains, vec!["acme.com", "beta.io"]);
                assert_eq!(cmd.source.signals_dir, Some(PathBuf::from("payloads")));
                assert_eq!(
                    cmd.source.as_of,
                    NaiveDate::from_ymd_opt(2026, 6, 1)
                );
                assert!(matches!(cmd.format, ReportFormat::Csv));
                assert_eq!(cmd.top, Some(5));
                assert_eq!(cmd.config.root, PathBuf::from("."));
            }
            _ => panic!("expected rank command"),
        }
    }

    #[test]
    fn invalid_as_of_is_rejected() {
        let parsed = Cli::try_parse_from(["prioritizer", "rank", "a.com", "--as-of", "June 1"]);
        assert!(parsed.is_err());
    }
}
