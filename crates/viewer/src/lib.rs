//! # GeoView Viewer
//!
//! The map viewer as a command dispatcher. The host (browser glue, a desktop
//! shell, or a test) turns UI events into [`Command`]s, hands them to
//! [`MapController::dispatch`] and performs the returned [`Effect`]s:
//! notices, view animations, file pickers, downloads and popups.
//!
//! Background work (shapefile decoding) reports back through an internal
//! channel drained by [`MapController::process_messages`].

pub mod config;
pub mod controller;
pub mod error;
pub mod format;
pub mod io;
pub mod panels;
pub mod state;

pub use config::{TileSourceConfig, ViewerConfig};
pub use controller::{MapController, OpenPopup, RenderLayer};
pub use error::{Result, ViewerError};
pub use state::{
    AppMessage, Command, Effect, GeometryKind, ImportFormat, ImportTicket, MeasureKind, Notice,
    NoticeLevel, OverlayKind,
};
