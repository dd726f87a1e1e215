//! Photo uploads for the build gallery.
//!
//! Files are read concurrently. Each finished read is appended to the build
//! by its own session call, so gallery order follows completion order, not
//! the order the paths were given in.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use tokio::task::JoinSet;

use crate::session::{SessionError, SessionScope};

/// Outcome of an upload batch.
#[derive(Debug, Default)]
pub struct PhotoUploadReport {
    /// Paths appended to the build, in completion order.
    pub added: Vec<PathBuf>,
    /// Paths that could not be read, with the reason.
    pub failed: Vec<(PathBuf, String)>,
}

/// Mime type guessed from the file extension.
pub fn mime_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());
    match ext.as_deref() {
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("svg") => "image/svg+xml",
        Some("bmp") => "image/bmp",
        _ => "application/octet-stream",
    }
}

pub fn encode_data_url(mime: &str, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", mime, STANDARD.encode(bytes))
}

/// Read one file into a `data:` URL.
pub async fn read_data_url(path: &Path) -> Result<String> {
    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;
    Ok(encode_data_url(mime_for(path), &bytes))
}

/// Read every path and append each photo to the active build as soon as its
/// read completes. Unreadable files are reported, not fatal; a missing
/// session or a storage failure aborts the batch.
pub async fn upload_photos(
    scope: &SessionScope,
    paths: Vec<PathBuf>,
) -> Result<PhotoUploadReport, SessionError> {
    let mut reads = JoinSet::new();
    for path in paths {
        reads.spawn(async move {
            let result = read_data_url(&path).await;
            (path, result)
        });
    }

    let mut report = PhotoUploadReport::default();
    while let Some(joined) = reads.join_next().await {
        let (path, result) = match joined {
            Ok(done) => done,
            Err(e) => {
                tracing::error!(error = %e, "Photo read task failed");
                continue;
            }
        };

        match result {
            Ok(url) => {
                scope.try_with(|session| session.add_photo(url))?;
                tracing::info!(path = %path.display(), "Photo added");
                report.added.push(path);
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Skipping photo");
                report.failed.push((path, format!("{:#}", e)));
            }
        }
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guesses_mime_from_extension() {
        assert_eq!(mime_for(Path::new("tank.PNG")), "image/png");
        assert_eq!(mime_for(Path::new("scape.jpeg")), "image/jpeg");
        assert_eq!(mime_for(Path::new("notes")), "application/octet-stream");
    }

    #[test]
    fn encodes_base64_payload() {
        assert_eq!(encode_data_url("image/png", b"hi"), "data:image/png;base64,aGk=");
    }
}
