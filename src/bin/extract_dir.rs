use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use log::{error, info};

use pdf_unlock_text::{Credentials, Extractor};

/// Extract the text of every PDF in a folder.
///
/// Each `name.pdf` becomes `<output>/name_extracted.txt`. Files that fail
/// are reported and skipped.
#[derive(Parser, Debug)]
#[command(name = "extract_dir", version, about, long_about = None)]
struct Args {
    /// Folder to scan for *.pdf files
    #[arg(default_value = "toProcess")]
    input: PathBuf,

    /// Folder to write the text files into
    #[arg(short, long, default_value = "output")]
    output: PathBuf,
}

fn main() -> ExitCode {
    let args = Args::parse();

    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let extractor = Extractor::new(Credentials::from_env());
    let report = match extractor.extract_dir(&args.input, &args.output) {
        Ok(report) => report,
        Err(e) => {
            error!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    info!(
        "{} extracted, {} failed",
        report.extracted.len(),
        report.failed.len()
    );
    if report.extracted.is_empty() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
