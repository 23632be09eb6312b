//! # GeoView Remote
//!
//! Fetches WFS layers over HTTP. A WFS endpoint is treated as a plain
//! GeoJSON download: one GET, no paging, no retry. Features come back in
//! EPSG:4326 together with the style to draw them with.

pub mod error;
pub mod http;
pub mod wfs;

pub use error::{RemoteError, Result};
pub use http::HttpClient;
pub use wfs::{layer_title, WfsClient, WfsLayer};
