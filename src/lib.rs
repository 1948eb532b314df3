//! Workspace umbrella crate.
//!
//! Re-exports the podcast core so host applications can depend on
//! `podcore-workspace` and pick a feature instead of wiring each crate:
//!
//! - `service` (default): the full façade, catalog and player
//! - `playback-only`: just the session controller and player host

#[cfg(feature = "service")]
pub use core_catalog as catalog;
#[cfg(any(feature = "service", feature = "playback-only"))]
pub use core_playback as playback;
#[cfg(feature = "service")]
pub use core_service as service;
