//! Reading progress: a normalized fraction of the scrollable height,
//! published on every scroll sample over a `watch` channel.

use crate::ScrollGeometry;
use tokio::sync::watch;

/// Progress for `geometry`, always within `[0, 1]`.
///
/// Content that fits inside the viewport has nothing to scroll and reports 0.
pub fn normalized_progress(geometry: ScrollGeometry) -> f64 {
    let scrollable = geometry.scrollable_height();
    if !scrollable.is_finite() || scrollable <= 0.0 || !geometry.offset_y.is_finite() {
        return 0.0;
    }
    (geometry.offset_y / scrollable).clamp(0.0, 1.0)
}

/// Publishes progress to any number of observers.
///
/// Observers see only the latest value; intermediate samples may be skipped.
#[derive(Debug)]
pub struct ProgressTracker {
    tx: watch::Sender<f64>,
}

impl ProgressTracker {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(0.0);
        Self { tx }
    }

    pub fn subscribe(&self) -> watch::Receiver<f64> {
        self.tx.subscribe()
    }

    /// Latest published value.
    pub fn current(&self) -> f64 {
        *self.tx.borrow()
    }

    /// Recompute from `geometry`, publish and return the new value.
    pub fn on_scroll(&self, geometry: ScrollGeometry) -> f64 {
        let progress = normalized_progress(geometry);
        self.tx.send_replace(progress);
        progress
    }

    /// Forget the previous document's progress.
    pub fn reset(&self) {
        self.tx.send_replace(0.0);
    }
}

impl Default for ProgressTracker {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn halfway_through() {
        assert_eq!(normalized_progress(ScrollGeometry::new(300.0, 400.0, 1000.0)), 0.5);
    }

    #[test]
    fn short_content_is_zero_for_any_offset() {
        for offset in [0.0, 10.0, 250.0, -40.0, 9999.0] {
            assert_eq!(normalized_progress(ScrollGeometry::new(offset, 400.0, 400.0)), 0.0);
            assert_eq!(normalized_progress(ScrollGeometry::new(offset, 400.0, 120.0)), 0.0);
        }
    }

    #[test]
    fn overscroll_is_clamped() {
        // rubber-band bounce reports offsets outside the content
        assert_eq!(normalized_progress(ScrollGeometry::new(-30.0, 400.0, 1000.0)), 0.0);
        assert_eq!(normalized_progress(ScrollGeometry::new(700.0, 400.0, 1000.0)), 1.0);
    }

    #[test]
    fn non_finite_geometry_is_zero() {
        assert_eq!(normalized_progress(ScrollGeometry::new(f64::NAN, 400.0, 1000.0)), 0.0);
        assert_eq!(normalized_progress(ScrollGeometry::new(10.0, 400.0, f64::INFINITY)), 0.0);
    }

    #[test]
    fn tracker_publishes_to_subscribers() {
        let tracker = ProgressTracker::new();
        let rx = tracker.subscribe();
        tracker.on_scroll(ScrollGeometry::new(150.0, 400.0, 1000.0));
        assert_eq!(*rx.borrow(), 0.25);
        tracker.reset();
        assert_eq!(tracker.current(), 0.0);
    }
}
