use std::path::PathBuf;
use std::process::ExitCode;

use clap::error::ErrorKind;
use clap::Parser;
use log::error;

use pdf_unlock_text::{Credentials, Extractor};

const USAGE: &str = "Usage: extract_text <input_pdf> <output_txt>";

/// Extract the text of a PDF into a text file, one block per page.
///
/// Encrypted files are unlocked with the passwords in PASS_CC, PASS_BIRTH,
/// PASS_BIRTH2 and PASS_SURNAME (also read from a .env file).
#[derive(Parser, Debug)]
#[command(name = "extract_text", version, about, long_about = None)]
struct Args {
    /// PDF file to read
    input: PathBuf,

    /// Text file to write, replaced if it exists
    output: PathBuf,
}

fn main() -> ExitCode {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => e.exit(),
        Err(_) => {
            println!("{}", USAGE);
            return ExitCode::FAILURE;
        }
    };

    // does not override variables that are already set
    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let extractor = Extractor::new(Credentials::from_env());
    match extractor.extract(&args.input, &args.output) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            error!("error extracting text from {}: {}", args.input.display(), e);
            ExitCode::FAILURE
        }
    }
}
