use std::io;
use std::process::ExitCode;

use clap::error::ErrorKind;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ocr_service::config::Config;
use ocr_service::output::EXIT_FAILURE;
use ocr_service::tesseract::TesseractFactory;
use ocr_service::{emit, DiagnosticStream, Outcome, Pipeline};

#[derive(Parser)]
#[command(name = "ocr-service")]
#[command(
    version,
    about = "Extract text from an image file or URL and print it as JSON"
)]
struct Args {
    /// Image file path or http(s) URL
    #[arg(value_name = "IMAGE_PATH_OR_URL")]
    image: String,

    /// Directory containing Tesseract traineddata files
    #[arg(long, value_name = "DIR")]
    tessdata: Option<String>,

    /// Download timeout in seconds
    #[arg(long, value_name = "SECS")]
    timeout: Option<u64>,

    /// Do not print progress updates (Tesseract reports only 0% and 100%)
    #[arg(short, long)]
    quiet: bool,

    /// Flatten the text to one line and tighten CJK spacing
    #[arg(long)]
    compact: bool,
}

impl Args {
    fn into_config(self) -> (String, Config) {
        let mut config = Config::default();
        config.ocr.data_path = self.tessdata;
        config.ocr.show_progress = !self.quiet;
        config.ocr.compact = self.compact;
        if let Some(timeout) = self.timeout {
            config.fetch.timeout_secs = timeout;
        }
        (self.image, config)
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    // Nothing is allocated until the invocation shape is valid.
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            let _ = e.print();
            return match e.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => ExitCode::SUCCESS,
                _ => ExitCode::from(EXIT_FAILURE),
            };
        }
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ocr_service=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let (image, config) = args.into_config();
    let mut diag = DiagnosticStream::stderr();

    let factory = TesseractFactory::new(config.ocr.data_path.clone());
    let outcome = match Pipeline::from_config(factory, &config) {
        Ok(pipeline) => pipeline.run(&image, &diag).await,
        Err(e) => Outcome::failure(&e),
    };

    ExitCode::from(emit(&outcome, &mut io::stdout().lock(), &mut diag))
}
