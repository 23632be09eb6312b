pub mod imports;
pub mod interaction;
pub mod layers;
pub mod messages;
pub mod view;
pub mod workspace;

pub use imports::{ImportTicket, ImportTracker};
pub use interaction::{DrawInteraction, DrawProgress, DrawPurpose, InteractionSlot};
pub use layers::{BaseLayers, TileSource};
pub use messages::{
    AppMessage, Command, Effect, GeometryKind, ImportFormat, MeasureKind, Notice, NoticeLevel,
    OverlayKind,
};
pub use view::MapView;
pub use workspace::{LayerId, Overlay, VectorSource, Workspace};
