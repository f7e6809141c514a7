//! Position persistence writer.
//!
//! A dedicated worker thread owns the durable store handle and applies writes
//! strictly in the order they were submitted, so an older offset can never
//! overwrite a newer one. Writes are keyed by entry, not by document, so a
//! write queued before the next presentation still lands. Submission is
//! fire-and-forget; callers that need to observe completion use `flush`.

use crate::{EntryId, EntryStore, Error, Result};
use log::{debug, warn};
use std::sync::mpsc::{self, Sender};
use std::sync::Arc;
use std::thread;
use tokio::sync::oneshot;

/// A single offset commit
#[derive(Debug, Clone, PartialEq)]
pub struct PositionWrite {
    pub entry: EntryId,
    /// Raw offset in device pixels
    pub offset: f32,
}

enum Command {
    Write(PositionWrite),
    Flush(oneshot::Sender<()>),
    Shutdown(oneshot::Sender<()>),
}

/// Handle to the serialized writer. Clones feed the same queue.
#[derive(Clone)]
pub struct PositionWriter {
    cmd_tx: Sender<Command>,
}

impl PositionWriter {
    /// Spawn the worker bound to `store`.
    pub fn spawn(store: Arc<dyn EntryStore>) -> Result<Self> {
        let (cmd_tx, cmd_rx) = mpsc::channel::<Command>();

        thread::Builder::new()
            .name("rfreader-persist".into())
            .spawn(move || {
                while let Ok(cmd) = cmd_rx.recv() {
                    match cmd {
                        Command::Write(w) => apply_write(store.as_ref(), w),
                        Command::Flush(resp) => {
                            let _ = resp.send(());
                        }
                        Command::Shutdown(resp) => {
                            let _ = resp.send(());
                            break;
                        }
                    }
                }
                debug!("persistence worker stopped");
            })
            .map_err(|e| {
                Error::WorkerGone(format!("failed to spawn persistence worker: {}", e))
            })?;

        Ok(Self { cmd_tx })
    }

    /// Queue a write of `offset` for `entry`. Returns false when the worker is
    /// gone; the write is then dropped.
    pub fn submit(&self, entry: EntryId, offset: f64) -> bool {
        let write = PositionWrite {
            entry,
            offset: offset as f32,
        };
        match self.cmd_tx.send(Command::Write(write)) {
            Ok(()) => true,
            Err(e) => {
                let Command::Write(w) = e.0 else {
                    return false;
                };
                warn!(
                    "Persistence worker gone; dropping offset {} for {}",
                    w.offset, w.entry
                );
                false
            }
        }
    }

    /// Wait until every write queued before this call has been applied.
    pub async fn flush(&self) -> Result<()> {
        let (tx, rx) = oneshot::channel();
        self.cmd_tx
            .send(Command::Flush(tx))
            .map_err(|_| Error::WorkerGone("flush after shutdown".into()))?;
        rx.await
            .map_err(|e| Error::WorkerGone(format!("Flush canceled: {}", e)))
    }

    /// Drain queued writes and stop the worker.
    pub async fn shutdown(self) -> Result<()> {
        let (tx, rx) = oneshot::channel();
        self.cmd_tx
            .send(Command::Shutdown(tx))
            .map_err(|_| Error::WorkerGone("already shut down".into()))?;
        rx.await
            .map_err(|e| Error::WorkerGone(format!("Shutdown canceled: {}", e)))
    }
}

fn apply_write(store: &dyn EntryStore, w: PositionWrite) {
    match store.update_screen_position(&w.entry, w.offset) {
        Ok(()) => debug!("saved offset {} for {}", w.offset, w.entry),
        // non-fatal: the in-memory offset stays authoritative for the session
        Err(e) => warn!("Failed to save offset {} for {}: {}", w.offset, w.entry, e),
    }
}
