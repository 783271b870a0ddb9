use std::path::PathBuf;
use thiserror::Error;

/// Rejections raised at the upload boundary. The `Display` text is shown to the user as-is.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UploadError {
    #[error("SVG not allowed. Please choose JPG, PNG, WebP, BMP or GIF.")]
    SvgNotAllowed,
    #[error("Unsupported file type ({0}). Please choose JPG, PNG, WebP, BMP or GIF.")]
    UnsupportedType(String),
    #[error("The file {0} is empty.")]
    Empty(String),
}

/// Failures while resolving an image resource.
#[derive(Debug, Error)]
pub enum AssetError {
    #[error("asset not found: {0}")]
    NotFound(String),
    #[error("unsupported asset url: {0}")]
    UnsupportedScheme(String),
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to decode {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: image::ImageError,
    },
    #[error("failed to render svg {url}: {message}")]
    Svg { url: String, message: String },
}

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("Failed to serialize design: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("Failed to access design file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid design: {0}")]
    Invalid(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Error)]
pub enum StudioError {
    #[error(transparent)]
    Upload(#[from] UploadError),
    #[error(transparent)]
    Asset(#[from] AssetError),
    #[error(transparent)]
    Persistence(#[from] PersistenceError),
    #[error(transparent)]
    Config(#[from] ConfigError),
}
