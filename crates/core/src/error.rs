//! Error types for GeoView

use thiserror::Error;

/// Main error type for GeoView core operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid GeoJSON: {0}")]
    GeoJson(#[from] geojson::Error),

    #[error("shapefile error: {0}")]
    Shapefile(#[from] shapefile::Error),

    #[error("dBASE error: {0}")]
    Dbase(String),

    #[error("zip archive error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("archive contains no .shp member")]
    MissingShp,

    #[error("buffer of {0} bytes is neither a zip archive nor a .shp file")]
    UnrecognisedShapefile(usize),

    #[error("unsupported CRS transform: {from} -> {to}")]
    UnsupportedTransform { from: String, to: String },

    #[error("{0}")]
    Other(String),
}

impl From<dbase::Error> for Error {
    fn from(e: dbase::Error) -> Self {
        Error::Dbase(e.to_string())
    }
}

/// Result type alias for GeoView core operations
pub type Result<T> = std::result::Result<T, Error>;
