//! Word-processor (`.docx`) text extraction.
//!
//! A `.docx` file is a zip archive; the body lives in `word/document.xml` as
//! `<w:p>` paragraphs made of `<w:t>` text runs.

use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::sync::OnceLock;

use regex::Regex;
use zip::ZipArchive;

use super::ExtractError;

const DOCUMENT_PART: &str = "word/document.xml";

fn token_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    // Alternatives, in order: self-closing `<w:p/>`, paragraph open (not
    // `<w:pPr>`), paragraph close, a text run, a tab.
    PATTERN.get_or_init(|| {
        Regex::new(
            r"<w:p(?:\s[^>]*)?/>|(<w:p(?:\s[^>]*)?>)|(</w:p>)|<w:t(?:\s[^>]*)?>([^<]*)</w:t>|(<w:tab/>)",
        )
        .expect("token pattern is valid")
    })
}

fn char_ref_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"&#(?:x([0-9A-Fa-f]+)|([0-9]+));").expect("char ref pattern is valid")
    })
}

/// Concatenates every non-empty paragraph, newline separated.
pub(super) fn extract(path: &Path) -> Result<String, ExtractError> {
    let file = File::open(path)?;
    let mut archive = ZipArchive::new(file)?;

    let mut xml = String::new();
    archive.by_name(DOCUMENT_PART)?.read_to_string(&mut xml)?;

    Ok(paragraphs(&xml).join("\n"))
}

/// Paragraphs in the order they close. A paragraph nested inside another
/// (text boxes) is emitted on its own, ahead of the paragraph holding it.
fn paragraphs(xml: &str) -> Vec<String> {
    let mut open: Vec<String> = Vec::new();
    let mut done = Vec::new();

    for token in token_pattern().captures_iter(xml) {
        if token.get(1).is_some() {
            open.push(String::new());
        } else if token.get(2).is_some() {
            if let Some(text) = open.pop().filter(|text| !text.trim().is_empty()) {
                done.push(text);
            }
        } else if let Some(current) = open.last_mut() {
            match token.get(3) {
                Some(run) => current.push_str(&unescape_xml(run.as_str())),
                None if token.get(4).is_some() => current.push('\t'),
                None => {}
            }
        }
    }
    done
}

fn unescape_xml(raw: &str) -> String {
    let decoded = char_ref_pattern().replace_all(raw, |caps: &regex::Captures| {
        let code = match (caps.get(1), caps.get(2)) {
            (Some(hex), _) => u32::from_str_radix(hex.as_str(), 16).ok(),
            (None, Some(dec)) => dec.as_str().parse::<u32>().ok(),
            _ => None,
        };
        code.and_then(char::from_u32)
            .map(String::from)
            .unwrap_or_else(|| caps[0].to_string())
    });

    decoded
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}
