//! Reader settings supplied by the host application

use crate::{Error, Result};
use std::sync::RwLock;

/// Snapshot of the externally owned reader settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReaderSettings {
    /// Font scale applied to the document root, in percent
    pub font_scale_percent: u32,
    /// Whether body text is justified
    pub justify: bool,
}

impl Default for ReaderSettings {
    fn default() -> Self {
        Self {
            font_scale_percent: 100,
            justify: false,
        }
    }
}

/// A validated, non-zero font scale percentage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FontScalePercent(u32);

impl FontScalePercent {
    pub fn new(percent: u32) -> Result<Self> {
        if percent == 0 {
            return Err(Error::ConfigError("font scale percent must be non-zero".into()));
        }
        Ok(FontScalePercent(percent))
    }

    pub fn get(self) -> u32 {
        self.0
    }
}

/// Read-only access to eventually-consistent reader settings
pub trait SettingsProvider: Send + Sync {
    fn snapshot(&self) -> ReaderSettings;
}

/// A settings provider holding a value the host can replace at any time.
pub struct StaticSettings {
    current: RwLock<ReaderSettings>,
}

impl StaticSettings {
    pub fn new(settings: ReaderSettings) -> Self {
        StaticSettings {
            current: RwLock::new(settings),
        }
    }

    pub fn set(&self, settings: ReaderSettings) {
        if let Ok(mut g) = self.current.write() {
            *g = settings;
        }
    }
}

impl Default for StaticSettings {
    fn default() -> Self {
        Self::new(ReaderSettings::default())
    }
}

impl SettingsProvider for StaticSettings {
    fn snapshot(&self) -> ReaderSettings {
        self.current.read().map(|g| *g).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_font_scale_is_rejected() {
        assert!(FontScalePercent::new(0).is_err());
        assert_eq!(FontScalePercent::new(120).unwrap().get(), 120);
    }

    #[test]
    fn static_settings_can_be_replaced() {
        let s = StaticSettings::default();
        assert_eq!(s.snapshot().font_scale_percent, 100);
        s.set(ReaderSettings {
            font_scale_percent: 130,
            justify: true,
        });
        assert_eq!(
            s.snapshot(),
            ReaderSettings {
                font_scale_percent: 130,
                justify: true
            }
        );
    }
}
