//! Progress relay: renders engine progress on the diagnostic stream.
//!
//! The engine receives a [`ProgressSender`] for the duration of one
//! recognition call. [`ProgressRelay`] drains the other end on its own task and
//! rewrites a single `\rProgress: N%` line in place. It only observes; nothing
//! it does can change the recognition result.

use std::io::Write;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Status reported while the engine is reading text off the page.
pub const RECOGNIZING_TEXT: &str = "recognizing text";

#[derive(Debug, Clone, PartialEq)]
pub struct ProgressEvent {
    pub status: String,
    /// Fraction in `[0, 1]`.
    pub progress: f32,
}

impl ProgressEvent {
    pub fn new(status: impl Into<String>, progress: f32) -> Self {
        Self {
            status: status.into(),
            progress,
        }
    }

    pub fn recognizing(progress: f32) -> Self {
        Self::new(RECOGNIZING_TEXT, progress)
    }
}

pub type ProgressSender = mpsc::UnboundedSender<ProgressEvent>;

/// Integer percentage for a progress fraction, clamped to `0..=100`.
pub fn percent(progress: f32) -> u32 {
    if progress.is_nan() {
        return 0;
    }
    (progress.clamp(0.0, 1.0) * 100.0).round() as u32
}

/// The overwritable status line for `event`, or `None` for statuses the relay ignores.
pub fn render(event: &ProgressEvent) -> Option<String> {
    if event.status != RECOGNIZING_TEXT {
        return None;
    }
    Some(format!("\rProgress: {}%", percent(event.progress)))
}

pub struct ProgressRelay {
    handle: JoinHandle<()>,
}

impl ProgressRelay {
    /// Start relaying to `writer`. The relay ends once every clone of the
    /// returned sender has been dropped.
    pub fn spawn<W>(mut writer: W) -> (ProgressSender, Self)
    where
        W: Write + Send + 'static,
    {
        let (tx, mut rx) = mpsc::unbounded_channel::<ProgressEvent>();

        let handle = tokio::spawn(async move {
            let mut rendered = false;

            while let Some(event) = rx.recv().await {
                let Some(line) = render(&event) else {
                    continue;
                };
                match writer
                    .write_all(line.as_bytes())
                    .and_then(|_| writer.flush())
                {
                    Ok(()) => rendered = true,
                    Err(e) => debug!(error = %e, "Failed to write progress line"),
                }
            }

            // Leave the cursor on a fresh line for whatever follows.
            if rendered {
                if let Err(e) = writer.write_all(b"\n").and_then(|_| writer.flush()) {
                    debug!(error = %e, "Failed to terminate progress line");
                }
            }
        });

        (tx, Self { handle })
    }

    /// Wait for the relay to drain. Call after the sender has been consumed.
    pub async fn finish(self) {
        if let Err(e) = self.handle.await {
            warn!(error = %e, "Progress relay task failed");
        }
    }
}
