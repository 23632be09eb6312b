//! I/O operations for reading and writing vector data
//!
//! All readers return features in the CRS the file was written in; the
//! viewer reprojects afterwards. Everything works on in-memory buffers so the
//! same code runs natively and under WASM.

mod geojson_io;
mod shapefile_io;

pub use geojson_io::{read_geojson, read_geojson_str, write_geojson, write_geojson_value};
pub use shapefile_io::{read_shapefile, ShapefileSource};
