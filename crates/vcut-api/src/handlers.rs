//! Request handlers.

pub mod artifacts;
pub mod audio;
pub mod cut;
pub mod health;
pub mod progress;
pub mod upload;

pub use artifacts::*;
pub use audio::*;
pub use cut::*;
pub use health::*;
pub use progress::*;
