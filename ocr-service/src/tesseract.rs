//! Tesseract engine backed by leptess.
//!
//! leptess has no progress monitor, so a recognition reports `recognizing text`
//! only at its start (0%) and end (100%).

use std::sync::Arc;

use async_trait::async_trait;
use leptess::LepTess;
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::acquire::ImageBytes;
use crate::engine::{EngineFactory, LanguageProfile, RecognitionEngine};
use crate::error::{OcrServiceError, Result};
use crate::progress::{ProgressEvent, ProgressSender};

/// Opens Tesseract instances through leptess.
#[derive(Debug, Clone, Default)]
pub struct TesseractFactory {
    data_path: Option<String>,
}

impl TesseractFactory {
    pub fn new(data_path: Option<String>) -> Self {
        Self { data_path }
    }
}

impl EngineFactory for TesseractFactory {
    fn open(&self, languages: &LanguageProfile) -> Result<Box<dyn RecognitionEngine>> {
        let lt = LepTess::new(self.data_path.as_deref(), &languages.to_string())
            .map_err(|e| OcrServiceError::EngineInit(format!("{languages}: {e}")))?;

        info!(languages = %languages, "Tesseract OCR initialized");
        Ok(Box::new(TesseractEngine {
            tesseract: Some(Arc::new(Mutex::new(lt))),
        }))
    }
}

pub struct TesseractEngine {
    tesseract: Option<Arc<Mutex<LepTess>>>,
}

#[async_trait]
impl RecognitionEngine for TesseractEngine {
    async fn recognize(&mut self, image: ImageBytes, progress: ProgressSender) -> Result<String> {
        let tesseract = self
            .tesseract
            .as_ref()
            .map(Arc::clone)
            .ok_or_else(|| {
                OcrServiceError::Recognition("Tesseract already terminated".to_string())
            })?;

        // A closed receiver only means nobody is watching.
        tokio::task::spawn_blocking(move || {
            let mut lt = tesseract.blocking_lock();

            let _ = progress.send(ProgressEvent::new("loading image", 0.0));
            lt.set_image_from_mem(image.as_slice())
                .map_err(|e| OcrServiceError::Recognition(format!("Failed to set image: {e}")))?;
            let _ = progress.send(ProgressEvent::new("loading image", 1.0));

            let _ = progress.send(ProgressEvent::recognizing(0.0));
            let text = lt.get_utf8_text().map_err(|e| {
                OcrServiceError::Recognition(format!("Failed to extract text: {e}"))
            })?;
            let _ = progress.send(ProgressEvent::recognizing(1.0));

            debug!(chars = text.chars().count(), "Tesseract recognition finished");
            Ok::<_, OcrServiceError>(text)
        })
        .await
        .map_err(|e| OcrServiceError::Recognition(format!("OCR task panicked: {e}")))?
    }

    fn terminate(&mut self) -> Result<()> {
        match self.tesseract.take() {
            Some(tesseract) => match Arc::try_unwrap(tesseract) {
                Ok(lt) => {
                    drop(lt.into_inner());
                    debug!("Tesseract instance released");
                    Ok(())
                }
                Err(_) => Err(OcrServiceError::EngineTerminate(
                    "Tesseract instance still in use".to_string(),
                )),
            },
            None => Ok(()),
        }
    }
}
