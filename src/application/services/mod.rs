//! Application services
//!
//! Concrete services that drive the domain kernel on behalf of the shell.
//! Services depend on I/O boundary traits (Ticker) but are themselves
//! concrete structs, not traits.

mod autoplay;
mod playback;
mod session;

pub use autoplay::AutoPlayer;
pub use playback::{Playback, PlaybackState};
pub use session::{
    NodeView, Session, SessionEvent, SessionObserver, SessionOptions, TickHandle, TreeSource,
};
