/// Filesystem adapters for reading requests and writing reports
mod file_reader;
mod report_writer;

pub use file_reader::FileSystemReader;
pub use report_writer::{FileSystemReportWriter, StdoutReportWriter};
