use std::path::PathBuf;

/// Errors raised while building a gore globe.
///
/// Every variant is fatal for the run.
#[derive(Debug, thiserror::Error)]
pub enum GoreError {
    /// A run parameter failed validation before any geometry work started.
    #[error("invalid {param} value {value}: {reason}")]
    Configuration {
        param: &'static str,
        value: String,
        reason: &'static str,
    },

    /// The land dataset could not be opened or read.
    #[error("failed to read land dataset {}: {source}", path.display())]
    DataSource {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The land dataset was readable but is not valid GeoJSON.
    #[error("failed to parse land dataset {}: {reason}", path.display())]
    DataParse { path: PathBuf, reason: String },

    /// A gore boundary failed validation or could not be clipped.
    #[error("gore {gore}: invalid geometry: {reason}")]
    Geometry { gore: usize, reason: String },

    /// No tile frame fits the requested gore and pixel width.
    #[error("cannot frame gore tiles: {reason}")]
    Frame { reason: String },

    /// A tile could not be rasterized or placed.
    #[error("gore {gore}: render failed: {reason}")]
    Render { gore: usize, reason: String },

    /// The composite image could not be written.
    #[error("failed to write {}: {source}", path.display())]
    Output {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The image encoder rejected the composite.
    #[error("failed to encode {}: {source}", path.display())]
    Encode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

pub type Result<T> = std::result::Result<T, GoreError>;
