//! Compaction for mixed Chinese/Latin OCR output.
//!
//! Tesseract tends to put spaces between CJK ideographs and to break lines
//! wherever the layout wraps. `compact_text` flattens the text to one line and
//! tightens the spacing.

use std::sync::OnceLock;

use regex::Regex;

const CJK: &str = r"[\x{4e00}-\x{9fff}]";
const PUNCTUATION: &str = "[,，.。;；:：!！?？、]";

struct Rules {
    between_cjk: Regex,
    cjk_then_latin: Regex,
    latin_then_cjk: Regex,
    around_punctuation: Regex,
    repeated_spaces: Regex,
}

fn rules() -> &'static Rules {
    static RULES: OnceLock<Rules> = OnceLock::new();
    RULES.get_or_init(|| Rules {
        between_cjk: compile(&format!(r"({CJK})\s+({CJK})")),
        cjk_then_latin: compile(&format!(r"({CJK})\s+([a-zA-Z0-9])")),
        latin_then_cjk: compile(&format!(r"([a-zA-Z0-9])\s+({CJK})")),
        around_punctuation: compile(&format!(r"\s+({PUNCTUATION})\s*")),
        repeated_spaces: compile(r" {2,}"),
    })
}

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).expect("static pattern is valid")
}

/// Replace until the text stops changing; adjacent matches share a character.
fn replace_to_fixpoint(re: &Regex, text: String, replacement: &str) -> String {
    let mut current = text;
    loop {
        let next = re.replace_all(&current, replacement).into_owned();
        if next == current {
            return current;
        }
        current = next;
    }
}

pub fn compact_text(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }

    let rules = rules();
    let flattened = text.replace(['\r', '\n'], " ");

    let text = replace_to_fixpoint(&rules.between_cjk, flattened, "$1$2");
    let text = rules.cjk_then_latin.replace_all(&text, "$1 $2");
    let text = rules.latin_then_cjk.replace_all(&text, "$1 $2");
    let text = rules.around_punctuation.replace_all(&text, "$1");
    let text = rules.repeated_spaces.replace_all(&text, " ");

    text.trim().to_string()
}
