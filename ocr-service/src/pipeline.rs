use std::io::{self, Write};

use tracing::{info, warn};

use crate::acquire::ByteAcquirer;
use crate::config::Config;
use crate::engine::{EngineFactory, LanguageProfile, RecognitionSession};
use crate::error::Result;
use crate::format::compact_text;
use crate::output::{DiagnosticStream, Outcome};
use crate::progress::ProgressRelay;
use crate::source::ImageSource;

/// Image to text: resolve the source, open a recognition session, acquire the
/// bytes, recognize, close the session, build the [`Outcome`].
pub struct Pipeline<F> {
    factory: F,
    acquirer: ByteAcquirer,
    languages: LanguageProfile,
    show_progress: bool,
    compact: bool,
}

impl<F: EngineFactory> Pipeline<F> {
    pub fn new(factory: F, acquirer: ByteAcquirer, languages: LanguageProfile) -> Self {
        Self {
            factory,
            acquirer,
            languages,
            show_progress: true,
            compact: false,
        }
    }

    pub fn from_config(factory: F, config: &Config) -> Result<Self> {
        let acquirer = ByteAcquirer::new(&config.fetch)?;
        Ok(Self::new(factory, acquirer, config.ocr.languages.clone())
            .with_progress(config.ocr.show_progress)
            .with_compact(config.ocr.compact))
    }

    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    pub fn with_compact(mut self, compact: bool) -> Self {
        self.compact = compact;
        self
    }

    /// Run one invocation. Never fails: every error becomes a failure outcome.
    pub async fn run(&self, raw_source: &str, diag: &DiagnosticStream) -> Outcome {
        let source = ImageSource::resolve(raw_source);
        info!(source = %source, kind = ?source.kind(), "Processing image");

        match self.extract(&source, diag).await {
            Ok(text) if self.compact => Outcome::success(&compact_text(&text)),
            Ok(text) => Outcome::success(&text),
            Err(e) => {
                info!(error = %e, "Image processing failed");
                Outcome::failure(&e)
            }
        }
    }

    /// Raw recognized text for `source`. The session is closed on every path
    /// once it has been opened; a close failure is logged and never replaces
    /// the recognition result.
    pub async fn extract(&self, source: &ImageSource, diag: &DiagnosticStream) -> Result<String> {
        let mut session = RecognitionSession::open(&self.factory, &self.languages)?;

        let result = self.acquire_and_recognize(&mut session, source, diag).await;

        if let Err(e) = session.close() {
            warn!(error = %e, "Failed to terminate recognition engine");
        }
        result
    }

    async fn acquire_and_recognize(
        &self,
        session: &mut RecognitionSession,
        source: &ImageSource,
        diag: &DiagnosticStream,
    ) -> Result<String> {
        let mut notices = diag.clone();
        let image = self.acquirer.acquire(source, &mut notices).await?;

        if let Err(e) = writeln!(notices, "Performing OCR...") {
            warn!(error = %e, "Failed to write diagnostic notice");
        }

        let (progress, relay) = if self.show_progress {
            ProgressRelay::spawn(Box::new(diag.clone()) as Box<dyn Write + Send>)
        } else {
            ProgressRelay::spawn(Box::new(io::sink()) as Box<dyn Write + Send>)
        };

        let text = session.recognize(image, progress).await;
        relay.finish().await;
        text
    }
}
