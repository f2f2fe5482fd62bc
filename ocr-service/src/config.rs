use crate::engine::LanguageProfile;

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub ocr: OcrConfig,
    pub fetch: FetchConfig,
}

#[derive(Debug, Clone)]
pub struct OcrConfig {
    pub languages: LanguageProfile,
    /// Directory holding `*.traineddata`; `None` lets Tesseract use its own lookup.
    pub data_path: Option<String>,
    pub show_progress: bool,
    /// Flatten and tighten mixed CJK/Latin output before it is reported.
    pub compact: bool,
}

#[derive(Debug, Clone)]
pub struct FetchConfig {
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            languages: LanguageProfile::default(),
            data_path: None,
            show_progress: true,
            compact: false,
        }
    }
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            user_agent: concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}
