//! Resume file storage under the configured resumes directory.

pub mod handlers;

use std::io;
use std::path::{Path, PathBuf};

use tracing::info;

/// Reduces an uploaded file name to its final path component.
/// Returns `None` when nothing usable is left.
pub fn sanitize_filename(raw: &str) -> Option<String> {
    let name = raw
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default()
        .trim();

    match name {
        "" | "." | ".." => None,
        name => Some(name.to_string()),
    }
}

/// Writes an uploaded resume into `dir`, creating it if needed.
/// An existing file with the same name is replaced.
pub async fn save_resume(dir: &Path, filename: &str, bytes: &[u8]) -> io::Result<PathBuf> {
    tokio::fs::create_dir_all(dir).await?;
    let path = dir.join(filename);
    tokio::fs::write(&path, bytes).await?;
    info!(path = %path.display(), bytes = bytes.len(), "resume saved");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_keeps_final_component() {
        assert_eq!(sanitize_filename("cv.pdf").as_deref(), Some("cv.pdf"));
        assert_eq!(sanitize_filename("../../etc/passwd").as_deref(), Some("passwd"));
        assert_eq!(sanitize_filename(r"C:\Users\me\cv.docx").as_deref(), Some("cv.docx"));
        assert_eq!(sanitize_filename("  Jane Doe.txt ").as_deref(), Some("Jane Doe.txt"));
    }

    #[test]
    fn test_sanitize_rejects_empty_and_dot_names() {
        assert_eq!(sanitize_filename(""), None);
        assert_eq!(sanitize_filename("uploads/"), None);
        assert_eq!(sanitize_filename(".."), None);
        assert_eq!(sanitize_filename("a/."), None);
    }

    #[tokio::test]
    async fn test_save_creates_directory_and_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let resumes = dir.path().join("nested").join("resumes");

        let path = save_resume(&resumes, "cv.txt", b"first").await.unwrap();
        assert_eq!(path, resumes.join("cv.txt"));
        save_resume(&resumes, "cv.txt", b"second").await.unwrap();

        assert_eq!(std::fs::read(&path).unwrap(), b"second");
    }
}
