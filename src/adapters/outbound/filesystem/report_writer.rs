use crate::ports::outbound::ReportRepository;
use crate::shared::error::AggregatorError;
use crate::shared::security::validate_output_path;
use crate::shared::Result;
use crate::stack_analysis::domain::StackReport;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::info;

fn render(report: &StackReport) -> Result<String> {
    Ok(serde_json::to_string_pretty(report)?)
}

/// FileSystemReportWriter adapter persisting reports as pretty JSON files
pub struct FileSystemReportWriter {
    output_path: PathBuf,
}

impl FileSystemReportWriter {
    pub fn new(output_path: PathBuf) -> Self {
        Self { output_path }
    }

    fn validate_parent_directory(&self) -> Result<()> {
        if let Some(parent) = self.output_path.parent() {
            if parent != Path::new("") && !parent.is_dir() {
                return Err(AggregatorError::FileWriteError {
                    path: self.output_path.clone(),
                    details: format!("Parent directory does not exist: {}", parent.display()),
                }
                .into());
            }
        }
        Ok(())
    }
}

impl ReportRepository for FileSystemReportWriter {
    fn persist(&self, report: &StackReport) -> Result<()> {
        self.validate_parent_directory()?;
        validate_output_path(&self.output_path)?;

        let content = render(report)?;
        fs::write(&self.output_path, content).map_err(|e| AggregatorError::FileWriteError {
            path: self.output_path.clone(),
            details: e.to_string(),
        })?;

        info!(
            path = %self.output_path.display(),
            external_request_id = %report.external_request_id,
            "report written"
        );
        eprintln!("✅ Report written: {}", self.output_path.display());
        Ok(())
    }
}

/// StdoutReportWriter adapter printing reports to stdout
pub struct StdoutReportWriter;

impl StdoutReportWriter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for StdoutReportWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportRepository for StdoutReportWriter {
    fn persist(&self, report: &StackReport) -> Result<()> {
        let content = render(report)?;
        let mut stdout = io::stdout().lock();
        writeln!(stdout, "{}", content)?;
        stdout.flush()?;
        Ok(())
    }
}
