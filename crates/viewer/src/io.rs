//! File decoding for imports and encoding for exports.
//!
//! Shapefile decoding runs on a background thread on native targets and
//! reports back through the controller's channel. On wasm32 there are no
//! threads, so the work runs inline and the result is queued the same way.

use std::panic::{self, AssertUnwindSafe};

use crossbeam_channel::Sender;
use tracing::{debug, warn};

use geoview_core::io::{read_geojson_str, read_shapefile, write_geojson};
use geoview_core::{FeatureCollection, CRS};

use crate::state::{AppMessage, ImportFormat, ImportTicket};

/// Decode an uploaded file into features in EPSG:4326.
pub fn parse_import(format: ImportFormat, bytes: &[u8]) -> geoview_core::Result<FeatureCollection> {
    match format {
        ImportFormat::GeoJson => {
            let text = std::str::from_utf8(bytes)
                .map_err(|e| geoview_core::Error::Other(format!("file is not UTF-8: {e}")))?;
            read_geojson_str(text)
        }
        ImportFormat::Shapefile => read_shapefile(bytes),
    }
}

fn decode(format: ImportFormat, bytes: &[u8]) -> Result<FeatureCollection, String> {
    let result = parse_import(format, bytes).map_err(|e| {
        warn!("import {:?} failed: {}", format, e);
        e.to_string()
    });
    if let Ok(fc) = &result {
        debug!("import {:?} decoded {} features", format, fc.len());
    }
    result
}

/// Run `work` and always send exactly one `ImportParsed` message, turning a
/// panic in the decoder into an error result.
fn report<F>(ticket: ImportTicket, format: ImportFormat, tx: &Sender<AppMessage>, work: F)
where
    F: FnOnce() -> Result<FeatureCollection, String>,
{
    let result = panic::catch_unwind(AssertUnwindSafe(work)).unwrap_or_else(|_| {
        warn!("import {:?} decoder panicked", format);
        Err(format!("{format:?} decoder panicked"))
    });
    let _ = tx.send(AppMessage::ImportParsed {
        ticket,
        format,
        result,
    });
}

/// Decode `bytes` off the UI thread and send an `ImportParsed` message.
#[cfg(not(target_arch = "wasm32"))]
pub fn spawn_parse(ticket: ImportTicket, format: ImportFormat, bytes: Vec<u8>, tx: Sender<AppMessage>) {
    std::thread::spawn(move || report(ticket, format, &tx, || decode(format, &bytes)));
}

#[cfg(target_arch = "wasm32")]
pub fn spawn_parse(ticket: ImportTicket, format: ImportFormat, bytes: Vec<u8>, tx: Sender<AppMessage>) {
    report(ticket, format, &tx, || decode(format, &bytes));
}

/// Serialise features held in `from` as a GeoJSON FeatureCollection in EPSG:4326.
pub fn export_geojson(features: &FeatureCollection, from: &CRS) -> geoview_core::Result<String> {
    let geographic = features.transformed(from, &CRS::wgs84())?;
    write_geojson(&geographic)
}
