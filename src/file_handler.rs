//! Upload boundary for raster images.
//!
//! SVG uploads are refused both by MIME type and by file name; only the
//! common raster formats get through.

use std::path::Path;

use eframe::egui;

use crate::error::UploadError;

const ACCEPTED_EXTENSIONS: [&str; 6] = ["jpg", "jpeg", "png", "webp", "bmp", "gif"];
const ACCEPTED_MIME: [&str; 6] = [
    "image/jpeg",
    "image/jpg",
    "image/png",
    "image/webp",
    "image/bmp",
    "image/gif",
];

/// A file handed to the studio by the user.
#[derive(Debug, Clone, PartialEq)]
pub struct FileUpload {
    pub name: String,
    /// Empty when the platform did not report one.
    pub mime: String,
    pub bytes: Vec<u8>,
}

impl FileUpload {
    pub fn new(name: impl Into<String>, mime: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime: mime.into(),
            bytes,
        }
    }

    fn extension(&self) -> Option<String> {
        Path::new(&self.name)
            .extension()
            .map(|ext| ext.to_string_lossy().to_lowercase())
    }
}

/// Checks an upload before anything is created from it.
pub fn validate_upload(file: &FileUpload) -> Result<(), UploadError> {
    let mime = file.mime.to_ascii_lowercase();
    let extension = file.extension();
    if mime == "image/svg+xml" || extension.as_deref() == Some("svg") {
        return Err(UploadError::SvgNotAllowed);
    }
    let mime_ok = ACCEPTED_MIME.contains(&mime.as_str());
    let extension_ok = extension
        .as_deref()
        .is_some_and(|ext| ACCEPTED_EXTENSIONS.contains(&ext));
    // A reported MIME type wins; the extension decides when there is none.
    let accepted = if mime.is_empty() { extension_ok } else { mime_ok };
    if !accepted {
        let shown = if mime.is_empty() {
            extension.unwrap_or_else(|| "unknown".to_owned())
        } else {
            mime
        };
        return Err(UploadError::UnsupportedType(shown));
    }
    if file.bytes.is_empty() {
        return Err(UploadError::Empty(file.name.clone()));
    }
    Ok(())
}

/// Collects files dropped onto the window this frame.
pub fn take_dropped_files(ctx: &egui::Context) -> Vec<FileUpload> {
    let dropped = ctx.input(|i| i.raw.dropped_files.clone());
    dropped.into_iter().filter_map(read_dropped).collect()
}

fn read_dropped(file: egui::DroppedFile) -> Option<FileUpload> {
    let name = if !file.name.is_empty() {
        file.name.clone()
    } else if let Some(path) = &file.path {
        path.file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string())
    } else {
        "unknown".to_owned()
    };

    if let Some(bytes) = &file.bytes {
        log::info!("Processing dropped file from memory: {} ({} bytes)", name, bytes.len());
        return Some(FileUpload::new(name, file.mime, bytes.to_vec()));
    }

    if let Some(path) = &file.path {
        log::info!("Processing dropped file from path: {}", path.display());
        return read_path(path).map(|bytes| FileUpload::new(name, file.mime, bytes));
    }

    log::warn!("Dropped file {name} has no readable contents");
    None
}

#[cfg(not(target_arch = "wasm32"))]
fn read_path(path: &Path) -> Option<Vec<u8>> {
    match std::fs::read(path) {
        Ok(bytes) => Some(bytes),
        Err(err) => {
            log::error!("Failed to read dropped file {}: {}", path.display(), err);
            None
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn read_path(_path: &Path) -> Option<Vec<u8>> {
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn upload(name: &str, mime: &str) -> FileUpload {
        FileUpload::new(name, mime, vec![1, 2, 3])
    }

    #[test]
    fn svg_is_refused_by_mime_or_name() {
        assert_eq!(validate_upload(&upload("logo.svg", "image/svg+xml")), Err(UploadError::SvgNotAllowed));
        assert_eq!(validate_upload(&upload("logo.SVG", "")), Err(UploadError::SvgNotAllowed));
        assert_eq!(validate_upload(&upload("logo.png", "image/svg+xml")), Err(UploadError::SvgNotAllowed));
        assert_eq!(validate_upload(&upload("logo.svg", "image/png")), Err(UploadError::SvgNotAllowed));
    }

    #[test]
    fn rejection_message_is_user_facing() {
        assert_eq!(
            UploadError::SvgNotAllowed.to_string(),
            "SVG not allowed. Please choose JPG, PNG, WebP, BMP or GIF."
        );
    }

    #[test]
    fn common_raster_formats_pass() {
        for (name, mime) in [
            ("a.jpg", "image/jpeg"),
            ("a.png", "image/png"),
            ("a.webp", "image/webp"),
            ("a.bmp", "image/bmp"),
            ("a.gif", "image/gif"),
            ("a.JPEG", ""),
        ] {
            assert_eq!(validate_upload(&upload(name, mime)), Ok(()), "{name}");
        }
    }

    #[test]
    fn other_types_and_empty_files_fail() {
        assert_eq!(
            validate_upload(&upload("doc.pdf", "application/pdf")),
            Err(UploadError::UnsupportedType("application/pdf".to_owned()))
        );
        assert_eq!(
            validate_upload(&upload("noext", "")),
            Err(UploadError::UnsupportedType("unknown".to_owned()))
        );
        assert_eq!(
            validate_upload(&FileUpload::new("a.png", "image/png", Vec::new())),
            Err(UploadError::Empty("a.png".to_owned()))
        );
    }
}
