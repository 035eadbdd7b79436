use clap::Parser;
use std::path::PathBuf;
use tracing::Level;

use crate::application::dto::EnrichmentFailurePolicy;
use crate::config::AggregatorConfig;

/// Log verbosity selected on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    Quiet,
    Normal,
    Verbose,
    Trace,
}

impl Verbosity {
    /// Maximum `tracing` level emitted at this verbosity
    pub fn max_level(&self) -> Level {
        match self {
            Verbosity::Quiet => Level::ERROR,
            Verbosity::Normal => Level::WARN,
            Verbosity::Verbose => Level::INFO,
            Verbosity::Trace => Level::DEBUG,
        }
    }
}

/// Aggregate vulnerability and license data for a dependency stack
#[derive(Parser, Debug)]
#[command(name = "stack-aggregator")]
#[command(version)]
#[command(
    about = "Aggregate vulnerability and license data for a dependency stack",
    long_about = None
)]
pub struct Args {
    /// Path to the stack request JSON file
    #[arg(short, long, value_name = "FILE")]
    pub request: PathBuf,

    /// Path to a config file (defaults to ./stack-aggregator.config.yml when present)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Output file path (if not specified, outputs to stdout)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Number of packages per graph query
    #[arg(long, value_name = "N")]
    pub batch_size: Option<usize>,

    /// Maximum number of graph queries in flight
    #[arg(long, value_name = "N")]
    pub max_concurrent_batches: Option<usize>,

    /// URL of the Gremlin HTTP endpoint of the graph service
    #[arg(long, value_name = "URL")]
    pub graph_url: Option<String>,

    /// Base URL of the license scoring service
    #[arg(long, value_name = "URL")]
    pub license_url: Option<String>,

    /// Base URL of the ingestion service for unknown packages
    #[arg(long, value_name = "URL")]
    pub ingestion_url: Option<String>,

    /// Report packages of failed graph batches as unknown instead of failing
    #[arg(long)]
    pub degrade: bool,

    /// Do not schedule ingestion of unknown packages
    #[arg(long)]
    pub no_ingest: bool,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, conflicts_with = "quiet")]
    pub verbose: u8,

    /// Only print errors
    #[arg(short, long)]
    pub quiet: bool,
}

impl Args {
    pub fn parse_args() -> Self {
        Self::parse()
    }

    pub fn verbosity(&self) -> Verbosity {
        match (self.quiet, self.verbose) {
            (true, _) => Verbosity::Quiet,
            (false, 0) => Verbosity::Normal,
            (false, 1) => Verbosity::Verbose,
            (false, _) => Verbosity::Trace,
        }
    }

    /// Applies command-line overrides on top of the loaded config
    pub fn apply_overrides(&self, config: &mut AggregatorConfig) {
        if let Some(batch_size) = self.batch_size {
            config.batch_size = batch_size;
        }
        if let Some(max) = self.max_concurrent_batches {
            config.max_concurrent_batches = max;
        }
        if let Some(url) = &self.graph_url {
            config.graph_url = url.clone();
        }
        if let Some(url) = &self.license_url {
            config.license_service_url = url.clone();
        }
        if let Some(url) = &self.ingestion_url {
            config.ingestion_url = Some(url.clone());
        }
        if self.degrade {
            config.enrichment_failure_policy = EnrichmentFailurePolicy::Degrade;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("stack-aggregator").chain(args.iter().copied()))
            .unwrap()
    }

    #[test]
    fn test_request_is_required() {
        assert!(Args::try_parse_from(["stack-aggregator"]).is_err());
    }

    #[test]
    fn test_minimal_args() {
        let args = parse(&["--request", "stack.json"]);
        assert_eq!(args.request, PathBuf::from("stack.json"));
        assert!(args.output.is_none());
        assert!(!args.no_ingest);
        assert_eq!(args.verbosity(), Verbosity::Normal);
    }

    #[test]
    fn test_verbosity_levels() {
        assert_eq!(parse(&["-r", "s.json", "-v"]).verbosity(), Verbosity::Verbose);
        assert_eq!(parse(&["-r", "s.json", "-vv"]).verbosity(), Verbosity::Trace);
        assert_eq!(parse(&["-r", "s.json", "-q"]).verbosity(), Verbosity::Quiet);
        assert_eq!(Verbosity::Quiet.max_level(), Level::ERROR);
    }

    #[test]
    fn test_quiet_conflicts_with_verbose() {
        assert!(Args::try_parse_from(["stack-aggregator", "-r", "s.json", "-q", "-v"]).is_err());
    }

    #[test]
    fn test_overrides_applied() {
        let args = parse(&[
            "-r",
            "s.json",
            "--batch-size",
            "7",
            "--graph-url",
            "http://graph:8182",
            "--license-url",
            "http://license:6162",
            "--ingestion-url",
            "http://ingest:5000",
            "--degrade",
        ]);
        let mut config = AggregatorConfig::default();

        args.apply_overrides(&mut config);

        assert_eq!(config.batch_size, 7);
        assert_eq!(config.graph_url, "http://graph:8182");
        assert_eq!(config.license_service_url, "http://license:6162");
        assert_eq!(config.ingestion_url.as_deref(), Some("http://ingest:5000"));
        assert_eq!(config.enrichment_failure_policy, EnrichmentFailurePolicy::Degrade);
    }

    #[test]
    fn test_no_overrides_keep_config() {
        let args = parse(&["-r", "s.json"]);
        let mut config = AggregatorConfig::default();

        args.apply_overrides(&mut config);

        assert_eq!(config.batch_size, AggregatorConfig::default().batch_size);
        assert_eq!(
            config.enrichment_failure_policy,
            EnrichmentFailurePolicy::Propagate
        );
    }
}
