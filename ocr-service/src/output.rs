//! Result emitter
//!
//! Exactly one [`Outcome`] is produced per invocation. A success is the only
//! thing ever written to the result stream (stdout); a failure object goes to
//! the diagnostic stream (stderr) and the exit status carries the failure.

use std::io::{self, Write};
use std::sync::{Arc, Mutex};

use serde::Serialize;
use tracing::error;

use crate::error::OcrServiceError;

pub const EXIT_SUCCESS: u8 = 0;
pub const EXIT_FAILURE: u8 = 1;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Success { text: String, length: usize },
    Failure { error: String },
}

impl Outcome {
    /// Trim the recognized text and count its characters. Empty text is still
    /// a success.
    pub fn success(raw_text: &str) -> Self {
        let text = raw_text.trim().to_string();
        let length = text.chars().count();
        Outcome::Success { text, length }
    }

    pub fn failure(error: &OcrServiceError) -> Self {
        Outcome::Failure {
            error: error.to_string(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success { .. })
    }

    pub fn exit_code(&self) -> u8 {
        if self.is_success() {
            EXIT_SUCCESS
        } else {
            EXIT_FAILURE
        }
    }

    /// The single JSON line for this outcome, without the trailing newline.
    pub fn to_json_line(&self) -> serde_json::Result<String> {
        match self {
            Outcome::Success { text, length } => serde_json::to_string(&SuccessLine {
                success: true,
                text,
                length: *length,
            }),
            Outcome::Failure { error } => serde_json::to_string(&FailureLine {
                success: false,
                error,
            }),
        }
    }
}

#[derive(Serialize)]
struct SuccessLine<'a> {
    success: bool,
    text: &'a str,
    length: usize,
}

#[derive(Serialize)]
struct FailureLine<'a> {
    success: bool,
    error: &'a str,
}

/// Write `outcome` to the stream it belongs on and return the exit status.
pub fn emit<O, D>(outcome: &Outcome, out: &mut O, diag: &mut D) -> u8
where
    O: Write,
    D: Write,
{
    let line = match outcome.to_json_line() {
        Ok(line) => line,
        Err(e) => {
            error!(error = %e, "Failed to serialize outcome");
            return EXIT_FAILURE;
        }
    };

    let written = if outcome.is_success() {
        writeln!(out, "{line}").and_then(|_| out.flush())
    } else {
        writeln!(diag, "{line}").and_then(|_| diag.flush())
    };

    match written {
        Ok(()) => outcome.exit_code(),
        Err(e) => {
            error!(error = %e, "Failed to write outcome");
            EXIT_FAILURE
        }
    }
}

/// Handle to the diagnostic stream. Cloned freely so the pipeline and the
/// progress relay can share it; tests swap stderr for an in-memory buffer.
#[derive(Debug, Clone)]
pub enum DiagnosticStream {
    Stderr,
    Buffer(Arc<Mutex<Vec<u8>>>),
}

impl DiagnosticStream {
    pub fn stderr() -> Self {
        DiagnosticStream::Stderr
    }

    pub fn buffer() -> Self {
        DiagnosticStream::Buffer(Arc::new(Mutex::new(Vec::new())))
    }

    /// Everything written so far. Always empty for stderr.
    pub fn contents(&self) -> String {
        match self {
            DiagnosticStream::Stderr => String::new(),
            DiagnosticStream::Buffer(buf) => match buf.lock() {
                Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
                Err(poisoned) => String::from_utf8_lossy(&poisoned.into_inner()).into_owned(),
            },
        }
    }
}

impl Write for DiagnosticStream {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        match self {
            DiagnosticStream::Stderr => io::stderr().write(data),
            DiagnosticStream::Buffer(buf) => buf
                .lock()
                .map_err(|_| io::Error::other("diagnostic buffer poisoned"))?
                .write(data),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            DiagnosticStream::Stderr => io::stderr().flush(),
            DiagnosticStream::Buffer(_) => Ok(()),
        }
    }
}
