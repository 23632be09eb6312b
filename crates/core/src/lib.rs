//! # GeoView Core
//!
//! Core types and I/O for the GeoView map viewer.
//!
//! This crate provides:
//! - `CRS`: Coordinate Reference System handling and the EPSG:4326 ↔ EPSG:3857 transform
//! - `Feature` / `FeatureCollection`: geometry plus ordered attributes
//! - `Extent`: bounding rectangle with "empty" semantics
//! - Geodesic length and area measurement
//! - GeoJSON and Shapefile codecs
//! - Layer `Style` descriptions

pub mod crs;
pub mod error;
pub mod io;
pub mod style;
pub mod vector;

pub use crs::CRS;
pub use error::{Error, Result};
pub use style::Style;
pub use vector::{Extent, Feature, FeatureCollection, FeatureId, Properties};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::crs::{from_lon_lat, to_lon_lat, CRS};
    pub use crate::error::{Error, Result};
    pub use crate::style::Style;
    pub use crate::vector::{Extent, Feature, FeatureCollection, FeatureId, Properties};
}
