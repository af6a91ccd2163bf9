pub mod controls;
pub mod music;

pub use controls::MusicControls;
pub use music::MusicPlayer;
