use std::env;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use sales_report::{ReportConfig, ReportGenerator};

/// Shown to the user on any pipeline failure; details go to the log only.
const PROCESSING_FAILED: &str =
    "An error occurred. Please ensure that your spreadsheet is correctly formatted and try again.";

fn main() -> ExitCode {
    env_logger::init();

    let mut args = env::args().skip(1);
    let Some(input) = args.next() else {
        eprintln!("Usage: sales-report <workbook.(xlsx|xls|ods)> [work-dir]");
        return ExitCode::FAILURE;
    };
    let base = args.next().map(PathBuf::from).unwrap_or_else(|| PathBuf::from("."));

    let result = ReportGenerator::new(ReportConfig::under(&base))
        .and_then(|generator| generator.generate(Path::new(&input)));

    match result {
        Ok(report) => {
            println!("{}", report.pdf_path.display());
            ExitCode::SUCCESS
        }
        Err(err) => {
            log::error!("report generation failed: {err}");
            eprintln!("{PROCESSING_FAILED}");
            ExitCode::FAILURE
        }
    }
}
