use owo_colors::OwoColorize;
use stack_aggregator::adapters::outbound::console::StderrProgressReporter;
use stack_aggregator::adapters::outbound::filesystem::{
    FileSystemReader, FileSystemReportWriter, StdoutReportWriter,
};
use stack_aggregator::adapters::outbound::network::{
    CachingGraphRepository, GremlinGraphClient, IngestionClient, LicenseScoringClient,
};
use stack_aggregator::application::dto::AggregationOptions;
use stack_aggregator::application::use_cases::AggregateStackUseCase;
use stack_aggregator::cli::Args;
use stack_aggregator::config::{discover_config, load_config_from_path, AggregatorConfig};
use stack_aggregator::ports::outbound::{ReportRepository, RequestReader};
use stack_aggregator::shared::error::ExitCode;
use stack_aggregator::shared::Result;
use stack_aggregator::stack_analysis::domain::{LicenseServiceStatus, StackReport};
use std::path::PathBuf;
use std::process;
use tracing::info;
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() {
    let args = Args::parse_args();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(args.verbosity().max_level())
        .with_writer(std::io::stderr)
        .with_target(false)
        .finish();
    if tracing::subscriber::set_global_default(subscriber).is_err() {
        eprintln!("⚠️  Warning: a global tracing subscriber is already installed");
    }

    if let Err(e) = run(args).await {
        eprintln!("\n{}\n", "❌ An error occurred:".red().bold());
        eprintln!("{}", e);

        let mut source = e.source();
        while let Some(err) = source {
            eprintln!("\n{} {}", "Caused by:".yellow(), err);
            source = err.source();
        }

        eprintln!();
        process::exit(ExitCode::ApplicationError.as_i32());
    }
}

async fn run(args: Args) -> Result<()> {
    let (config_path, mut config) = load_config(&args)?;
    args.apply_overrides(&mut config);
    config.validate(&config_path)?;

    let request = FileSystemReader::new().read_request(&args.request)?;
    info!(
        external_request_id = %request.external_request_id,
        ecosystem = %request.ecosystem,
        packages = request.packages.len(),
        "stack request loaded"
    );

    let timeout = config.request_timeout();
    let graph_repository = CachingGraphRepository::new(GremlinGraphClient::new(
        config.graph_url.clone(),
        timeout,
        config.max_retries,
    )?);
    let license_service =
        LicenseScoringClient::new(&config.license_service_url, timeout, config.max_retries)?;
    let ingestor = config
        .ingestion_url
        .as_deref()
        .map(|url| IngestionClient::new(url, timeout, config.max_retries))
        .transpose()?;

    let progress_reporter = if args.quiet {
        StderrProgressReporter::quiet()
    } else {
        StderrProgressReporter::new()
    };

    let report_repository: Box<dyn ReportRepository> = match args.output.clone() {
        Some(path) => Box::new(FileSystemReportWriter::new(path)),
        None => Box::new(StdoutReportWriter::new()),
    };

    let use_case = AggregateStackUseCase::new(
        graph_repository,
        license_service,
        ingestor,
        report_repository,
        progress_reporter,
        config.to_settings(),
    );

    let options = AggregationOptions {
        persist: true,
        ingest_unknown: !args.no_ingest,
    };
    let report = use_case.execute(request, options).await?;

    if !args.quiet {
        print_summary(&report);
    }

    Ok(())
}

/// Explicit `--config` wins; otherwise a config file in the working
/// directory is picked up, falling back to built-in defaults.
fn load_config(args: &Args) -> Result<(PathBuf, AggregatorConfig)> {
    if let Some(path) = &args.config {
        return Ok((path.clone(), load_config_from_path(path)?));
    }

    let cwd = std::env::current_dir()?;
    Ok(discover_config(&cwd)?
        .unwrap_or_else(|| (PathBuf::from("<defaults>"), AggregatorConfig::default())))
}

fn print_summary(report: &StackReport) {
    let vulnerable = report.vulnerable_direct_count();
    let vulnerabilities = report.total_vulnerability_count();

    eprintln!();
    eprintln!("{}", "📊 Stack summary".bold());
    eprintln!(
        "   Analyzed: {}   Unknown: {}",
        report.analyzed_dependencies.len(),
        report.unknown_dependencies.len()
    );
    if vulnerabilities == 0 {
        eprintln!("   {}", "No known vulnerabilities".green());
    } else {
        eprintln!(
            "   {}",
            format!(
                "{} vulnerabilit{} across {} direct dependenc{}",
                vulnerabilities,
                if vulnerabilities == 1 { "y" } else { "ies" },
                vulnerable,
                if vulnerable == 1 { "y" } else { "ies" }
            )
            .red()
        );
    }

    let licenses = &report.license_analysis;
    match licenses.service_status {
        LicenseServiceStatus::Unavailable => {
            eprintln!("   {}", "License service unavailable".yellow())
        }
        LicenseServiceStatus::Available => match &licenses.current_stack_license {
            Some(license) => eprintln!("   Stack license: {}", license.green()),
            None if licenses.stack_license_conflict => {
                eprintln!("   {}", "Stack license conflict".yellow())
            }
            None => {}
        },
    }
}
