//! Async event loop around a [`ReaderController`].
//!
//! The host forwards surface callbacks through a [`ReaderHandle`]; `run`
//! processes them one at a time on the current task and owns the restore
//! retry timer, so a retry re-enters the same execution context instead of
//! blocking it. Works on a current-thread runtime or inside a `LocalSet` when
//! the surface is not `Send`.

use crate::controller::{ReaderController, RestoreTicket};
use crate::navigation::{NavigationDecision, NavigationRequest};
use crate::{EntryId, Error, RenderSurface, Result, ScrollGeometry};
use log::{debug, warn};
use tokio::sync::{mpsc, oneshot};
use tokio::time::Instant;

/// Signals the host forwards to the controller
#[derive(Debug)]
pub enum ReaderEvent {
    /// Load and present an entry from the store
    Present(EntryId),
    LoadFinished,
    /// A navigation awaiting a decision; the answer goes back on the sender
    Navigation(NavigationRequest, oneshot::Sender<NavigationDecision>),
    Scroll(ScrollGeometry),
    Settle(ScrollGeometry),
    SettingsChanged,
    Teardown,
}

/// Cloneable sender side of the event loop.
#[derive(Debug, Clone)]
pub struct ReaderHandle {
    tx: mpsc::UnboundedSender<ReaderEvent>,
}

impl ReaderHandle {
    fn send(&self, event: ReaderEvent) -> bool {
        self.tx.send(event).is_ok()
    }

    pub fn present(&self, id: EntryId) -> bool {
        self.send(ReaderEvent::Present(id))
    }

    pub fn load_finished(&self) -> bool {
        self.send(ReaderEvent::LoadFinished)
    }

    pub fn scroll(&self, geometry: ScrollGeometry) -> bool {
        self.send(ReaderEvent::Scroll(geometry))
    }

    pub fn settle(&self, geometry: ScrollGeometry) -> bool {
        self.send(ReaderEvent::Settle(geometry))
    }

    pub fn settings_changed(&self) -> bool {
        self.send(ReaderEvent::SettingsChanged)
    }

    pub fn teardown(&self) -> bool {
        self.send(ReaderEvent::Teardown)
    }

    /// Ask for a navigation decision.
    pub async fn decide_navigation(&self, request: NavigationRequest) -> Result<NavigationDecision> {
        let (tx, rx) = oneshot::channel();
        if !self.send(ReaderEvent::Navigation(request, tx)) {
            return Err(Error::Other("reader event loop has stopped".into()));
        }
        rx.await
            .map_err(|e| Error::Other(format!("Navigation decision canceled: {}", e)))
    }
}

/// Create the handle and the receiver to pass to [`run`].
pub fn channel() -> (ReaderHandle, mpsc::UnboundedReceiver<ReaderEvent>) {
    let (tx, rx) = mpsc::unbounded_channel();
    (ReaderHandle { tx }, rx)
}

/// Process events until every handle is dropped, then hand the controller
/// back.
pub async fn run<S: RenderSurface>(
    mut controller: ReaderController<S>,
    mut events: mpsc::UnboundedReceiver<ReaderEvent>,
) -> ReaderController<S> {
    let mut pending: Option<(RestoreTicket, Instant)> = None;

    loop {
        let deadline = pending.map(|(_, at)| at);
        let retry = async move {
            match deadline {
                Some(at) => tokio::time::sleep_until(at).await,
                None => std::future::pending::<()>().await,
            }
        };

        tokio::select! {
            event = events.recv() => {
                let Some(event) = event else { break };
                match dispatch(&mut controller, event) {
                    Scheduled::Keep => {}
                    Scheduled::Clear => pending = None,
                    Scheduled::Retry(ticket) => {
                        pending = Some((ticket, Instant::now() + ticket.delay));
                    }
                }
            }
            () = retry => {
                if let Some((ticket, _)) = pending.take() {
                    pending = controller
                        .retry_restore(ticket)
                        .map(|next| (next, Instant::now() + next.delay));
                }
            }
        }
    }

    debug!("reader event loop finished");
    controller
}

enum Scheduled {
    Keep,
    Clear,
    Retry(RestoreTicket),
}

fn dispatch<S: RenderSurface>(controller: &mut ReaderController<S>, event: ReaderEvent) -> Scheduled {
    match event {
        ReaderEvent::Present(id) => {
            if let Err(e) = controller.present(&id) {
                warn!("Failed to present entry {}: {}", id, e);
            }
            Scheduled::Clear
        }
        ReaderEvent::LoadFinished => match controller.on_load_finished() {
            Some(ticket) => Scheduled::Retry(ticket),
            None => Scheduled::Keep,
        },
        ReaderEvent::Navigation(request, reply) => {
            let decision = controller.decide_navigation(&request);
            if reply.send(decision).is_err() {
                debug!("navigation decision for {:?} had no listener", request.url);
            }
            Scheduled::Keep
        }
        ReaderEvent::Scroll(geometry) => {
            controller.on_scroll(geometry);
            Scheduled::Keep
        }
        ReaderEvent::Settle(geometry) => {
            controller.on_scroll_settle(geometry);
            Scheduled::Keep
        }
        ReaderEvent::SettingsChanged => {
            controller.on_settings_changed();
            Scheduled::Keep
        }
        ReaderEvent::Teardown => {
            controller.teardown();
            Scheduled::Clear
        }
    }
}
