//! Image to text extraction.
//!
//! Takes a local path or an `http(s)://` URL, loads the image, runs it through
//! a recognition engine (Tesseract by default) and reports one JSON outcome.

pub mod acquire;
pub mod config;
pub mod engine;
pub mod error;
pub mod format;
pub mod output;
pub mod pipeline;
pub mod progress;
pub mod source;
pub mod tesseract;

pub use engine::{EngineFactory, LanguageProfile, RecognitionEngine, RecognitionSession};
pub use error::{OcrServiceError, Result};
pub use output::{emit, DiagnosticStream, Outcome};
pub use pipeline::Pipeline;
pub use source::ImageSource;
