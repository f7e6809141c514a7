//! In-memory rendering surface.
//!
//! Records every command the controller issues and lets the host (or a test)
//! drive the reported geometry. Clones share the same state, so one handle can
//! live inside the controller while another inspects it.

use crate::{Error, RenderSurface, Result, ScriptResult, ScrollGeometry};
use std::sync::{Arc, Mutex, MutexGuard};
use url::Url;

#[derive(Debug, Default)]
struct SurfaceState {
    html: Option<String>,
    base_url: Option<Url>,
    loads: usize,
    geometry: ScrollGeometry,
    scrolls: Vec<(f64, bool)>,
    scripts: Vec<String>,
    font_scale_percent: Option<u32>,
    fail_loads: bool,
    fail_scripts: bool,
}

#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    state: Arc<Mutex<SurfaceState>>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, SurfaceState> {
        self.state.lock().unwrap()
    }

    /// Report new layout dimensions, keeping the current offset.
    pub fn set_layout(&self, viewport_height: f64, content_height: f64) {
        let mut s = self.state();
        s.geometry.viewport_height = viewport_height;
        s.geometry.content_height = content_height;
    }

    /// Move the content as a user drag would.
    pub fn set_offset(&self, offset_y: f64) {
        self.state().geometry.offset_y = offset_y;
    }

    pub fn html(&self) -> Option<String> {
        self.state().html.clone()
    }

    pub fn base_url(&self) -> Option<Url> {
        self.state().base_url.clone()
    }

    pub fn load_count(&self) -> usize {
        self.state().loads
    }

    /// Every `scroll_to` call as `(offset, animated)`.
    pub fn scrolls(&self) -> Vec<(f64, bool)> {
        self.state().scrolls.clone()
    }

    pub fn scripts(&self) -> Vec<String> {
        self.state().scripts.clone()
    }

    /// Font scale most recently set by a script, if any.
    pub fn font_scale_percent(&self) -> Option<u32> {
        self.state().font_scale_percent
    }

    pub fn fail_loads(&self, fail: bool) {
        self.state().fail_loads = fail;
    }

    pub fn fail_scripts(&self, fail: bool) {
        self.state().fail_scripts = fail;
    }
}

fn parse_text_size_percent(script: &str) -> Option<u32> {
    let start = script.find("webkitTextSizeAdjust='")? + "webkitTextSizeAdjust='".len();
    let rest = &script[start..];
    let end = rest.find('%')?;
    rest[..end].parse().ok()
}

impl RenderSurface for RecordingSurface {
    fn load_html(&mut self, html: &str, base_url: &Url) -> Result<()> {
        let mut s = self.state();
        if s.fail_loads {
            return Err(Error::LoadError("surface refused the document".into()));
        }
        s.html = Some(html.to_string());
        s.base_url = Some(base_url.clone());
        s.loads += 1;
        s.geometry.offset_y = 0.0;
        s.font_scale_percent = None;
        Ok(())
    }

    fn geometry(&self) -> ScrollGeometry {
        self.state().geometry
    }

    fn scroll_to(&mut self, offset_y: f64, animated: bool) -> Result<()> {
        let mut s = self.state();
        s.scrolls.push((offset_y, animated));
        s.geometry.offset_y = offset_y;
        Ok(())
    }

    fn evaluate_script(&mut self, script: &str) -> Result<ScriptResult> {
        let mut s = self.state();
        s.scripts.push(script.to_string());
        if s.fail_scripts {
            return Ok(ScriptResult {
                value: "Script thrown: document is not ready".into(),
                is_error: true,
            });
        }
        let percent = parse_text_size_percent(script);
        if percent.is_some() {
            s.font_scale_percent = percent;
        }
        Ok(ScriptResult {
            value: percent.map(|p| p.to_string()).unwrap_or_default(),
            is_error: false,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_state() {
        let mut a = RecordingSurface::new();
        let b = a.clone();
        b.set_layout(400.0, 1000.0);
        a.scroll_to(300.0, true).unwrap();
        assert_eq!(b.geometry(), ScrollGeometry::new(300.0, 400.0, 1000.0));
        assert_eq!(b.scrolls(), vec![(300.0, true)]);
    }

    #[test]
    fn load_resets_offset_and_font_scale() {
        let mut s = RecordingSurface::new();
        s.set_offset(120.0);
        s.evaluate_script("x.webkitTextSizeAdjust='130%'").unwrap();
        s.load_html("<p>x</p>", &Url::parse("file:///app/content/").unwrap())
            .unwrap();
        assert_eq!(s.geometry().offset_y, 0.0);
        assert_eq!(s.font_scale_percent(), None);
        assert_eq!(s.load_count(), 1);
    }
}
