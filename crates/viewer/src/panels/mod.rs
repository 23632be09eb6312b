//! Map controls: the pieces of UI state the host renders.

pub mod layer_switcher;
pub mod mouse_position;
pub mod popup;
pub mod scale_bar;

pub use layer_switcher::LayerSwitcher;
pub use mouse_position::MousePosition;
pub use popup::PopupTable;
pub use scale_bar::ScaleBar;
