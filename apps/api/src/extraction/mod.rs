//! Resume ingestion: turns a saved resume file into raw text plus contact details.
//!
//! Extraction is total: a missing parser, a corrupt file, or an unreadable path
//! all produce an empty string, which the rest of the pipeline treats as an
//! ordinary (if unpromising) resume.

mod contact;
mod docx;

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, warn};

use crate::models::candidate::Contact;

pub use contact::parse_contact;

#[derive(Debug, Error)]
enum ExtractError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("zip error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("PDF error: {0}")]
    Pdf(String),
}

/// Resume formats recognised by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResumeFormat {
    PlainText,
    Docx,
    Pdf,
}

impl ResumeFormat {
    /// Unknown or missing extensions are read as plain text.
    pub fn from_path(path: &Path) -> Self {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase());

        match extension.as_deref() {
            Some("docx") => Self::Docx,
            Some("pdf") => Self::Pdf,
            _ => Self::PlainText,
        }
    }
}

/// A resume after extraction. Lives only for the pipeline run that built it.
#[derive(Debug, Clone)]
pub struct ResumeDocument {
    pub path: PathBuf,
    pub text: String,
    pub contact: Contact,
}

impl ResumeDocument {
    pub fn load(path: &Path) -> Self {
        let text = extract_text(path);
        let contact = parse_contact(&text);
        debug!(
            path = %path.display(),
            chars = text.len(),
            "resume text extracted"
        );
        Self {
            path: path.to_path_buf(),
            text,
            contact,
        }
    }
}

/// Extracts raw text from a resume, returning an empty string on any failure.
pub fn extract_text(path: &Path) -> String {
    let format = ResumeFormat::from_path(path);
    let extracted = match format {
        ResumeFormat::PlainText => read_plain_text(path),
        ResumeFormat::Docx => docx::extract(path),
        ResumeFormat::Pdf => read_pdf(path),
    };

    match extracted {
        Ok(text) => text,
        Err(err) => {
            warn!(path = %path.display(), ?format, "text extraction failed: {err}");
            String::new()
        }
    }
}

/// Reads the file as UTF-8, dropping undecodable bytes.
fn read_plain_text(path: &Path) -> Result<String, ExtractError> {
    let bytes = fs::read(path)?;
    Ok(String::from_utf8_lossy(&bytes)
        .chars()
        .filter(|c| *c != char::REPLACEMENT_CHARACTER)
        .collect())
}

/// Joins the text of every page that yields any, newline separated.
fn read_pdf(path: &Path) -> Result<String, ExtractError> {
    let bytes = fs::read(path)?;

    // pdf-extract panics on some malformed inputs instead of returning an error.
    let pages = std::panic::catch_unwind(|| pdf_extract::extract_text_from_mem_by_pages(&bytes))
        .map_err(|_| ExtractError::Pdf("parser panicked".to_string()))?
        .map_err(|e| ExtractError::Pdf(e.to_string()))?;

    Ok(join_pages(&pages))
}

fn join_pages(pages: &[String]) -> String {
    pages
        .iter()
        .map(|page| page.trim())
        .filter(|page| !page.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}
