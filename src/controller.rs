//! The reader controller: loads an entry into a rendering surface, classifies
//! navigations, restores and tracks the scroll position, and persists it.
//!
//! All methods run on the surface's execution context and return promptly.
//! The only deferred work is the restore retry, which is handed back to the
//! caller as a [`RestoreTicket`] to be redeemed after its delay (see
//! [`crate::driver`] for a ready-made loop), and the position write, which is
//! queued on the persistence worker.

use crate::document::build_document;
use crate::font::FontScaler;
use crate::navigation::{NavigationDecision, NavigationPolicy, NavigationRequest};
use crate::persist::PositionWriter;
use crate::platform::ExternalOpener;
use crate::progress::ProgressTracker;
use crate::restore::{RestoreState, RestoreStep, ScrollRestorer};
use crate::session::{RenderSession, SessionClock, SessionToken};
use crate::{
    Entry, EntryId, EntryStore, FontScalePercent, ReaderConfig, RenderSurface, Result,
    ScrollGeometry, SettingsProvider,
};
use log::{debug, info, warn};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

/// A restore attempt to run again after `delay`, valid only while `session`
/// is current.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RestoreTicket {
    pub session: SessionToken,
    pub delay: Duration,
}

pub struct ReaderController<S: RenderSurface> {
    config: ReaderConfig,
    surface: S,
    settings: Arc<dyn SettingsProvider>,
    store: Arc<dyn EntryStore>,
    opener: Arc<dyn ExternalOpener>,
    policy: NavigationPolicy,
    clock: SessionClock,
    writer: PositionWriter,
    progress: ProgressTracker,
    font: FontScaler,
    restorer: Option<ScrollRestorer>,
    session: Option<RenderSession>,
}

impl<S: RenderSurface> ReaderController<S> {
    /// Create a controller and spawn its persistence worker.
    pub fn new(
        config: ReaderConfig,
        surface: S,
        settings: Arc<dyn SettingsProvider>,
        store: Arc<dyn EntryStore>,
        opener: Arc<dyn ExternalOpener>,
    ) -> Result<Self> {
        config.validate()?;
        let clock = SessionClock::new();
        let writer = PositionWriter::spawn(store.clone())?;
        Ok(Self {
            policy: NavigationPolicy::new(config.content_root.clone()),
            config,
            surface,
            settings,
            store,
            opener,
            clock,
            writer,
            progress: ProgressTracker::new(),
            font: FontScaler::new(),
            restorer: None,
            session: None,
        })
    }

    pub fn config(&self) -> &ReaderConfig {
        &self.config
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn session(&self) -> Option<&RenderSession> {
        self.session.as_ref()
    }

    pub fn clock(&self) -> &SessionClock {
        &self.clock
    }

    /// Handle to the persistence worker, e.g. to `flush` on shutdown.
    pub fn writer(&self) -> &PositionWriter {
        &self.writer
    }

    /// Observe reading progress in `[0, 1]`.
    pub fn progress(&self) -> watch::Receiver<f64> {
        self.progress.subscribe()
    }

    pub fn restore_state(&self) -> Option<RestoreState> {
        self.restorer.as_ref().map(ScrollRestorer::state)
    }

    /// Load the entry `id` from the store and present it.
    pub fn present(&mut self, id: &EntryId) -> Result<SessionToken> {
        let entry = self.store.load(id)?;
        self.present_entry(entry)
    }

    /// Build the entry's document and load it into the surface, starting a new
    /// session. Work scheduled by the previous session becomes stale.
    pub fn present_entry(&mut self, entry: Entry) -> Result<SessionToken> {
        let token = self.clock.begin();
        self.session = None;
        self.restorer = None;
        self.font.reset();
        self.progress.reset();

        let justify = self.settings.snapshot().justify;
        let html = build_document(&entry, justify);
        if let Err(e) = self.surface.load_html(&html, &self.config.content_root) {
            self.clock.invalidate();
            return Err(e);
        }

        info!(
            "presenting entry {} (session {}, saved offset {})",
            entry.id,
            token.generation(),
            entry.screen_position
        );
        self.restorer = Some(ScrollRestorer::new(
            entry.screen_position_for_webview(),
            self.config.restore_retry_delay(),
            self.config.restore_max_retries,
        ));
        self.session = Some(RenderSession::new(token, entry));
        Ok(token)
    }

    /// Surface signal: the document finished loading. Applies the font scale
    /// and makes the first restore attempt.
    ///
    /// Every load-finished is a fresh document (an in-place navigation
    /// replaces the one we built), so the font scale is always re-sent.
    pub fn on_load_finished(&mut self) -> Option<RestoreTicket> {
        let token = match self.session.as_mut() {
            Some(session) => {
                session.loaded = true;
                session.token
            }
            None => {
                debug!("load-finished without an active session ignored");
                return None;
            }
        };
        self.font.reset();
        self.apply_font_scale();
        self.attempt_restore(token)
    }

    /// Redeem a ticket returned by a previous restore attempt.
    pub fn retry_restore(&mut self, ticket: RestoreTicket) -> Option<RestoreTicket> {
        if !self.clock.is_current(ticket.session) {
            debug!(
                "restore retry for stale session {} dropped",
                ticket.session.generation()
            );
            return None;
        }
        self.attempt_restore(ticket.session)
    }

    fn attempt_restore(&mut self, token: SessionToken) -> Option<RestoreTicket> {
        let geometry = self.surface.geometry();
        if let Some(session) = self.session.as_mut() {
            session.geometry = geometry;
        }
        let restorer = self.restorer.as_mut()?;
        match restorer.attempt(geometry) {
            RestoreStep::Apply { offset } => {
                debug!("restoring offset {}", offset);
                if let Err(e) = self.surface.scroll_to(offset, self.config.animate_restore) {
                    warn!("Failed to restore offset {}: {}", offset, e);
                }
                None
            }
            RestoreStep::RetryAfter(delay) => Some(RestoreTicket {
                session: token,
                delay,
            }),
            RestoreStep::GaveUp => {
                debug!(
                    "layout never exceeded the viewport ({} <= {}); leaving document unscrolled",
                    geometry.content_height, geometry.viewport_height
                );
                None
            }
            RestoreStep::Idle => None,
        }
    }

    /// Surface signal: decide a navigation. Foreign top-level navigations are
    /// cancelled and dispatched to the external opener.
    pub fn decide_navigation(&self, request: &NavigationRequest) -> NavigationDecision {
        self.policy.decide_and_dispatch(request, self.opener.as_ref())
    }

    /// Surface signal: a scroll sample. Publishes progress and returns it.
    pub fn on_scroll(&mut self, geometry: ScrollGeometry) -> f64 {
        match self.session.as_mut() {
            Some(session) => {
                session.geometry = geometry;
                session.settled = false;
                self.progress.on_scroll(geometry)
            }
            None => self.progress.current(),
        }
    }

    /// Surface signal: scrolling settled. Records the raw offset on the
    /// session's entry and queues it for persistence.
    pub fn on_scroll_settle(&mut self, geometry: ScrollGeometry) -> bool {
        let Some(session) = self.session.as_mut() else {
            debug!("settle without an active session ignored");
            return false;
        };
        session.geometry = geometry;
        session.settled = true;
        session.entry.screen_position = geometry.offset_y as f32;
        self.writer.submit(session.entry.id.clone(), geometry.offset_y)
    }

    /// The settings provider signalled a change. Re-applies the font scale to
    /// an already loaded document.
    pub fn on_settings_changed(&mut self) {
        if self.session.as_ref().is_some_and(|s| s.loaded) {
            self.apply_font_scale();
        }
    }

    /// The view is going away. Pending restores become stale; queued writes
    /// still land.
    pub fn teardown(&mut self) {
        if let Some(session) = self.session.take() {
            debug!("tearing down session {}", session.token.generation());
        }
        self.clock.invalidate();
        self.restorer = None;
        self.font.reset();
    }

    fn apply_font_scale(&mut self) {
        let requested = self.settings.snapshot().font_scale_percent;
        let percent = match FontScalePercent::new(requested) {
            Ok(p) => p,
            Err(e) => {
                warn!("{}; using {}%", e, self.config.default_font_scale_percent);
                match FontScalePercent::new(self.config.default_font_scale_percent) {
                    Ok(p) => p,
                    Err(_) => return,
                }
            }
        };
        if let Err(e) = self.font.apply(&mut self.surface, percent) {
            warn!("Failed to apply font scale: {}", e);
        }
    }
}
