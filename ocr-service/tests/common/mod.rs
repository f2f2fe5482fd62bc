use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;

use ocr_service::acquire::{ByteAcquirer, ImageBytes};
use ocr_service::config::FetchConfig;
use ocr_service::progress::{ProgressEvent, ProgressSender};
use ocr_service::{EngineFactory, LanguageProfile, OcrServiceError, Pipeline, RecognitionEngine};

#[derive(Clone)]
pub enum Reply {
    Text(String),
    Fail(String),
}

/// Engine stand-in that records how often it was opened and terminated.
#[derive(Clone)]
pub struct ScriptedFactory {
    reply: Reply,
    fail_open: bool,
    fail_terminate: bool,
    pub opened: Arc<AtomicUsize>,
    pub terminated: Arc<AtomicUsize>,
    pub recognized_bytes: Arc<AtomicUsize>,
}

impl ScriptedFactory {
    pub fn returning(text: &str) -> Self {
        Self::with_reply(Reply::Text(text.to_string()))
    }

    pub fn failing(message: &str) -> Self {
        Self::with_reply(Reply::Fail(message.to_string()))
    }

    pub fn unopenable() -> Self {
        Self {
            fail_open: true,
            ..Self::returning("")
        }
    }

    /// Same engine, but `terminate()` reports a failure after counting the call.
    pub fn with_failing_terminate(self) -> Self {
        Self {
            fail_terminate: true,
            ..self
        }
    }

    fn with_reply(reply: Reply) -> Self {
        Self {
            reply,
            fail_open: false,
            fail_terminate: false,
            opened: Arc::new(AtomicUsize::new(0)),
            terminated: Arc::new(AtomicUsize::new(0)),
            recognized_bytes: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn opened(&self) -> usize {
        self.opened.load(Ordering::SeqCst)
    }

    pub fn terminated(&self) -> usize {
        self.terminated.load(Ordering::SeqCst)
    }
}

struct ScriptedEngine {
    factory: ScriptedFactory,
}

#[async_trait]
impl RecognitionEngine for ScriptedEngine {
    async fn recognize(
        &mut self,
        image: ImageBytes,
        progress: ProgressSender,
    ) -> ocr_service::Result<String> {
        self.factory
            .recognized_bytes
            .store(image.len(), Ordering::SeqCst);

        let _ = progress.send(ProgressEvent::new("initializing api", 1.0));
        for step in [0.0, 0.5, 1.0] {
            let _ = progress.send(ProgressEvent::recognizing(step));
        }

        match &self.factory.reply {
            Reply::Text(text) => Ok(text.clone()),
            Reply::Fail(message) => Err(OcrServiceError::Recognition(message.clone())),
        }
    }

    fn terminate(&mut self) -> ocr_service::Result<()> {
        self.factory.terminated.fetch_add(1, Ordering::SeqCst);
        if self.factory.fail_terminate {
            return Err(OcrServiceError::EngineTerminate(
                "worker did not shut down".to_string(),
            ));
        }
        Ok(())
    }
}

impl EngineFactory for ScriptedFactory {
    fn open(
        &self,
        _languages: &LanguageProfile,
    ) -> ocr_service::Result<Box<dyn RecognitionEngine>> {
        if self.fail_open {
            return Err(OcrServiceError::EngineInit(
                "chi_sim+eng: missing traineddata".to_string(),
            ));
        }
        self.opened.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(ScriptedEngine {
            factory: self.clone(),
        }))
    }
}

pub fn pipeline(factory: ScriptedFactory) -> Pipeline<ScriptedFactory> {
    let acquirer = ByteAcquirer::new(&FetchConfig {
        timeout_secs: 5,
        ..FetchConfig::default()
    })
    .expect("Failed to build HTTP client");
    Pipeline::new(factory, acquirer, LanguageProfile::default())
}

/// Write a fake image to a fresh temp dir and return both (the dir must outlive the test).
pub fn image_file(name: &str, bytes: &[u8]) -> (tempfile::TempDir, PathBuf) {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = dir.path().join(name);
    std::fs::write(&path, bytes).expect("Failed to write image fixture");
    (dir, path)
}
