pub mod banner;
pub mod debug_overlay;

pub use banner::Banner;
pub use debug_overlay::{DebugOverlay, OverlayStats};
