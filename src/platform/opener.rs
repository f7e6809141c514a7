//! External navigation handlers

use log::{info, warn};
use url::Url;

/// Hands a URL to whatever opens links outside the reader.
///
/// Dispatch is fire-and-forget: the controller never waits for or inspects
/// the outcome.
pub trait ExternalOpener: Send + Sync {
    fn open(&self, url: &Url);
}

/// Opens URLs in the platform's default browser.
///
/// The default instance launches the browser on a background thread so the
/// surface never waits. Short-lived callers such as the CLI use
/// [`SystemOpener::blocking`] so the launch completes before they exit.
#[cfg(feature = "system-opener")]
pub struct SystemOpener {
    background: bool,
}

#[cfg(feature = "system-opener")]
impl SystemOpener {
    pub fn new() -> Self {
        SystemOpener { background: true }
    }

    pub fn blocking() -> Self {
        SystemOpener { background: false }
    }

    pub fn is_background(&self) -> bool {
        self.background
    }
}

#[cfg(feature = "system-opener")]
impl Default for SystemOpener {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "system-opener")]
impl ExternalOpener for SystemOpener {
    fn open(&self, url: &Url) {
        let target = url.to_string();
        if self.background {
            std::thread::spawn(move || launch(&target));
        } else {
            launch(&target);
        }
    }
}

#[cfg(feature = "system-opener")]
fn launch(target: &str) {
    if let Err(e) = webbrowser::open(target) {
        warn!("Failed to open {} externally: {}", target, e);
    }
}

/// Logs and drops every URL.
pub struct NoopOpener;

impl NoopOpener {
    pub fn new() -> Self {
        NoopOpener
    }
}

impl Default for NoopOpener {
    fn default() -> Self {
        Self::new()
    }
}

impl ExternalOpener for NoopOpener {
    fn open(&self, url: &Url) {
        info!("external navigation to {} ignored", url);
    }
}

/// Records every dispatched URL in order
pub struct RecordingOpener {
    opened: std::sync::Mutex<Vec<Url>>,
}

impl RecordingOpener {
    pub fn new() -> Self {
        RecordingOpener {
            opened: std::sync::Mutex::new(Vec::new()),
        }
    }

    pub fn opened(&self) -> Vec<Url> {
        self.opened.lock().unwrap().clone()
    }
}

impl Default for RecordingOpener {
    fn default() -> Self {
        Self::new()
    }
}

impl ExternalOpener for RecordingOpener {
    fn open(&self, url: &Url) {
        let mut g = self.opened.lock().unwrap();
        g.push(url.clone());
    }
}
