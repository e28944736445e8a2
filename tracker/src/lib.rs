pub mod animator;
pub mod error;
pub mod loader;
pub mod period;
pub mod playback;
pub mod scene;
pub mod snap;
pub mod speed;

pub use crate::error::TrackerError;
