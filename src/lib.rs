//! RFox Reader
//!
//! Presents a single article inside an embedded web-rendering surface, keeps
//! the surface's viewport in sync with the reading position persisted for the
//! article, and polices outbound navigation so that only first-party content
//! stays in place.
//!
//! # Features
//!
//! - **Surface-agnostic**: any embedded web view that implements
//!   [`RenderSurface`] can be driven by the [`ReaderController`]
//! - **Bounded restore**: the saved offset is re-applied once layout is tall
//!   enough, with a bounded retry budget
//! - **Ordered persistence**: settle offsets are written on a dedicated
//!   single-writer worker, never on the interactive path
//!
//! # Example
//!
//! ```no_run
//! use rfreader::platform::{RecordingOpener, RecordingSurface};
//! use rfreader::store::MemoryEntryStore;
//! use rfreader::{Entry, EntryId, ReaderConfig, ReaderController, StaticSettings};
//! use std::sync::Arc;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let store = Arc::new(MemoryEntryStore::new());
//! store.insert(Entry::new(EntryId::new("42"), "Hello").with_content("<p>Body</p>"));
//!
//! let mut controller = ReaderController::new(
//!     ReaderConfig::default(),
//!     RecordingSurface::new(),
//!     Arc::new(StaticSettings::default()),
//!     store,
//!     Arc::new(RecordingOpener::new()),
//! )?;
//! controller.present(&EntryId::new("42"))?;
//! # Ok(())
//! # }
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use url::Url;

pub mod error;
pub use error::{Error, Result};

pub mod entry;
pub use entry::{Entry, EntryId};

pub mod settings;
pub use settings::{FontScalePercent, ReaderSettings, SettingsProvider, StaticSettings};

// Durable entry storage (trait + in-memory and JSON-file backends)
pub mod store;
pub use store::EntryStore;

// Pure building blocks, leaves first
pub mod document;
pub mod font;
pub mod navigation;
pub mod progress;
pub mod restore;
pub mod session;

// Serialized persistence worker
pub mod persist;

// Host-side collaborators: external opener, recording surface
pub mod platform;

pub mod controller;
pub use controller::ReaderController;

// Single-context async event loop around the controller
pub mod driver;

pub use navigation::{NavigationDecision, NavigationRequest};
pub use progress::ProgressTracker;
pub use restore::{RestoreState, RestoreStep};
pub use session::{SessionClock, SessionToken};

/// Default first-party content root (the bundled content directory).
pub const DEFAULT_CONTENT_ROOT: &str = "file:///app/content/";

/// Configuration for the reader controller
///
/// The defaults mirror the behaviour of a typical mobile reader: a 50ms
/// restore retry cadence, animated restores and 100% font scale.
///
/// # Examples
///
/// ```
/// let cfg = rfreader::ReaderConfig::default();
/// assert_eq!(cfg.restore_retry_delay_ms, 50);
/// assert!(cfg.animate_restore);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReaderConfig {
    /// Root URL of first-party content; navigations beneath it stay in place
    pub content_root: Url,
    /// Delay between restore attempts while layout is still too short
    pub restore_retry_delay_ms: u64,
    /// Maximum number of restore retries before giving up (0 => single attempt)
    pub restore_max_retries: u32,
    /// Whether the restored offset is applied with an animated scroll
    pub animate_restore: bool,
    /// Font scale used when the settings provider reports an unusable value
    pub default_font_scale_percent: u32,
    /// Whether the CLI justifies body text when rendering without `--justify`
    pub justify_by_default: bool,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            content_root: Url::parse(DEFAULT_CONTENT_ROOT)
                .expect("default content root is a valid URL"),
            restore_retry_delay_ms: 50,
            restore_max_retries: 100,
            animate_restore: true,
            default_font_scale_percent: 100,
            justify_by_default: false,
        }
    }
}

impl ReaderConfig {
    /// Parse a configuration from JSON. Missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let cfg: ReaderConfig = serde_json::from_str(json)
            .map_err(|e| Error::ConfigError(format!("Malformed reader config: {}", e)))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Read and parse a JSON configuration file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&text)
    }

    /// Check the invariants the controller relies on.
    pub fn validate(&self) -> Result<()> {
        if self.content_root.cannot_be_a_base() {
            return Err(Error::ConfigError(format!(
                "content_root '{}' cannot be used as a base URL",
                self.content_root
            )));
        }
        if self.restore_retry_delay_ms == 0 {
            return Err(Error::ConfigError(
                "restore_retry_delay_ms must be greater than zero".into(),
            ));
        }
        FontScalePercent::new(self.default_font_scale_percent)?;
        Ok(())
    }

    pub fn restore_retry_delay(&self) -> Duration {
        Duration::from_millis(self.restore_retry_delay_ms)
    }
}

/// Scroll geometry reported by the rendering surface, in device pixels
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScrollGeometry {
    /// Current vertical content offset
    pub offset_y: f64,
    /// Height of the visible viewport
    pub viewport_height: f64,
    /// Total laid-out content height
    pub content_height: f64,
}

impl ScrollGeometry {
    pub fn new(offset_y: f64, viewport_height: f64, content_height: f64) -> Self {
        Self {
            offset_y,
            viewport_height,
            content_height,
        }
    }

    /// Distance the content can travel before the bottom edge is reached.
    pub fn scrollable_height(&self) -> f64 {
        self.content_height - self.viewport_height
    }

    /// True once layout is tall enough to hold any positive offset.
    pub fn content_exceeds_viewport(&self) -> bool {
        self.content_height > self.viewport_height
    }
}

/// Result of a script evaluated by the rendering surface
#[derive(Debug, Clone, PartialEq)]
pub struct ScriptResult {
    /// Serialized result value
    pub value: String,
    /// Whether the script threw an error
    pub is_error: bool,
}

/// Commands the controller issues to an embedded web-rendering surface
///
/// Implementations wrap a concrete web view. Each method is called on the
/// surface's own execution context and must not block.
pub trait RenderSurface {
    /// Replace the current document with `html`, resolving relative URLs
    /// against `base_url`.
    fn load_html(&mut self, html: &str, base_url: &Url) -> Result<()>;

    /// Current scroll geometry.
    fn geometry(&self) -> ScrollGeometry;

    /// Scroll the content to `(0, offset_y)`.
    fn scroll_to(&mut self, offset_y: f64, animated: bool) -> Result<()>;

    /// Evaluate a script against the loaded document.
    fn evaluate_script(&mut self, script: &str) -> Result<ScriptResult>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ReaderConfig::default();
        assert_eq!(config.content_root.as_str(), DEFAULT_CONTENT_ROOT);
        assert_eq!(config.restore_max_retries, 100);
        assert_eq!(config.default_font_scale_percent, 100);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_from_partial_json() {
        let cfg = ReaderConfig::from_json_str(
            r#"{ "content_root": "https://reader.local/bundle/", "restore_retry_delay_ms": 20 }"#,
        )
        .unwrap();
        assert_eq!(cfg.content_root.host_str(), Some("reader.local"));
        assert_eq!(cfg.restore_retry_delay(), Duration::from_millis(20));
        assert!(cfg.animate_restore);
    }

    #[test]
    fn test_config_rejects_zero_delay() {
        let err = ReaderConfig::from_json_str(r#"{ "restore_retry_delay_ms": 0 }"#).unwrap_err();
        assert!(matches!(err, Error::ConfigError(_)));
    }

    #[test]
    fn test_config_rejects_non_base_root() {
        let err =
            ReaderConfig::from_json_str(r#"{ "content_root": "mailto:someone@example.com" }"#)
                .unwrap_err();
        assert!(matches!(err, Error::ConfigError(_)));
    }

    #[test]
    fn test_geometry() {
        let g = ScrollGeometry::new(300.0, 400.0, 1000.0);
        assert_eq!(g.scrollable_height(), 600.0);
        assert!(g.content_exceeds_viewport());
        assert!(!ScrollGeometry::new(0.0, 400.0, 400.0).content_exceeds_viewport());
    }
}
