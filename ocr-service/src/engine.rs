//! Recognition session
//!
//! The engine itself is opaque: an [`EngineFactory`] opens one
//! [`RecognitionEngine`] for a [`LanguageProfile`], the engine recognizes one
//! image, and it is terminated. [`RecognitionSession`] owns that lifecycle:
//!
//! ```text
//! open() -> Ready -> recognize() -> Running -> Recognized -> close()/drop -> Terminated
//! ```
//!
//! Termination happens exactly once. `close()` does it explicitly and reports
//! the error; dropping a session that was never closed (early return, panic,
//! cancelled future) terminates the engine and logs any failure.

use std::fmt;

use async_trait::async_trait;
use tracing::{debug, info, warn};

use crate::acquire::ImageBytes;
use crate::error::{OcrServiceError, Result};
use crate::progress::ProgressSender;

/// Tesseract-style language list, joined with `+` when handed to the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageProfile(Vec<String>);

impl LanguageProfile {
    pub fn new<I, S>(languages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(languages.into_iter().map(Into::into).collect())
    }

    pub fn languages(&self) -> &[String] {
        &self.0
    }
}

impl Default for LanguageProfile {
    /// Simplified Chinese plus English.
    fn default() -> Self {
        Self::new(["chi_sim", "eng"])
    }
}

impl fmt::Display for LanguageProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join("+"))
    }
}

#[async_trait]
pub trait RecognitionEngine: Send {
    /// Recognize text in `image`. Progress goes to `progress`; the sender is
    /// dropped when the call returns, which ends the relay on the other side.
    async fn recognize(&mut self, image: ImageBytes, progress: ProgressSender) -> Result<String>;

    /// Release every engine resource. Called at most once.
    fn terminate(&mut self) -> Result<()>;
}

pub trait EngineFactory: Send + Sync {
    fn open(&self, languages: &LanguageProfile) -> Result<Box<dyn RecognitionEngine>>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Ready,
    Running,
    Recognized,
    Terminated,
}

pub struct RecognitionSession {
    engine: Option<Box<dyn RecognitionEngine>>,
    state: SessionState,
}

impl RecognitionSession {
    pub fn open<F>(factory: &F, languages: &LanguageProfile) -> Result<Self>
    where
        F: EngineFactory + ?Sized,
    {
        let engine = factory.open(languages)?;
        info!(languages = %languages, "Recognition engine ready");

        Ok(Self {
            engine: Some(engine),
            state: SessionState::Ready,
        })
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Run the one recognition this session allows. Returns untrimmed text.
    pub async fn recognize(
        &mut self,
        image: ImageBytes,
        progress: ProgressSender,
    ) -> Result<String> {
        if self.state != SessionState::Ready {
            return Err(OcrServiceError::Recognition(format!(
                "session is {:?}, expected Ready",
                self.state
            )));
        }
        let engine = self.engine.as_mut().ok_or_else(|| {
            OcrServiceError::Recognition("recognition engine already released".to_string())
        })?;

        self.state = SessionState::Running;
        debug!(bytes = image.len(), "Starting recognition");
        let result = engine.recognize(image, progress).await;
        self.state = SessionState::Recognized;

        result
    }

    /// Terminate the engine now and surface any failure to the caller.
    pub fn close(mut self) -> Result<()> {
        self.release()
    }

    fn release(&mut self) -> Result<()> {
        self.state = SessionState::Terminated;
        match self.engine.take() {
            Some(mut engine) => {
                debug!("Terminating recognition engine");
                engine.terminate()
            }
            None => Ok(()),
        }
    }
}

impl Drop for RecognitionSession {
    fn drop(&mut self) {
        if self.engine.is_none() {
            return;
        }
        if let Err(e) = self.release() {
            warn!(error = %e, "Failed to terminate recognition engine");
        }
    }
}
