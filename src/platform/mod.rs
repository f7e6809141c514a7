//! Host-side collaborators of the reader controller
//!
//! This module contains the traits the controller uses to reach outside its
//! own state, together with in-memory implementations that keep tests and the
//! CLI deterministic.

pub mod opener;
pub mod surface;

#[cfg(feature = "system-opener")]
pub use opener::SystemOpener;
pub use opener::{ExternalOpener, NoopOpener, RecordingOpener};
pub use surface::RecordingSurface;

/// The opener used when the host does not supply one: the platform browser
/// when the `system-opener` feature is enabled, a logging no-op otherwise.
///
/// With `background` unset the browser launch runs on the calling thread.
pub fn default_opener(background: bool) -> Box<dyn ExternalOpener> {
    #[cfg(feature = "system-opener")]
    {
        if background {
            Box::new(SystemOpener::new())
        } else {
            Box::new(SystemOpener::blocking())
        }
    }

    #[cfg(not(feature = "system-opener"))]
    {
        let _ = background;
        Box::new(NoopOpener::new())
    }
}
