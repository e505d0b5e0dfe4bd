//! Background writer for the habit collection.
//!
//! # Responsibility
//! - Write whole-collection snapshots off the caller's thread.
//! - Keep writes ordered; a newer queued snapshot supersedes older ones.
//! - Log failures without surfacing them to mutating callers.
//!
//! # Invariants
//! - The last scheduled snapshot is always the last one written.
//! - `flush` returns only after every snapshot scheduled before it is handled.
//! - Dropping the worker drains the queue and joins the thread.

use crate::repo::slot_store::{SlotStore, HABITS_SLOT};
use log::{debug, error};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Instant;

const WORKER_THREAD_NAME: &str = "habit-persist";

enum PersistCommand {
    Write { revision: u64, document: String },
    Flush(Sender<()>),
}

pub(crate) struct PersistWorker {
    sender: Option<Sender<PersistCommand>>,
    handle: Option<JoinHandle<()>>,
    failures: Arc<AtomicUsize>,
    next_revision: u64,
}

impl PersistWorker {
    /// Moves `slots` onto a dedicated writer thread.
    pub(crate) fn spawn(slots: Box<dyn SlotStore>) -> Self {
        let (sender, receiver) = mpsc::channel();
        let failures = Arc::new(AtomicUsize::new(0));
        let worker_failures = Arc::clone(&failures);

        let spawned = thread::Builder::new()
            .name(WORKER_THREAD_NAME.to_string())
            .spawn(move || run(slots.as_ref(), &receiver, &worker_failures));

        match spawned {
            Ok(handle) => Self {
                sender: Some(sender),
                handle: Some(handle),
                failures,
                next_revision: 0,
            },
            Err(err) => {
                error!(
                    "event=habits_persist module=service status=error error_code=worker_spawn_failed error={err}"
                );
                Self {
                    sender: None,
                    handle: None,
                    failures,
                    next_revision: 0,
                }
            }
        }
    }

    /// Queues a snapshot; returns immediately.
    pub(crate) fn schedule(&mut self, document: String) {
        self.next_revision += 1;
        let revision = self.next_revision;
        let queued = self
            .sender
            .as_ref()
            .map(|sender| sender.send(PersistCommand::Write { revision, document }).is_ok())
            .unwrap_or(false);

        if !queued {
            self.failures.fetch_add(1, Ordering::Relaxed);
            error!(
                "event=habits_persist module=service status=error revision={revision} error_code=worker_unavailable"
            );
        }
    }

    /// Blocks until every previously scheduled snapshot is handled.
    pub(crate) fn flush(&self) {
        let Some(sender) = self.sender.as_ref() else {
            return;
        };
        let (ack_sender, ack_receiver) = mpsc::channel();
        if sender.send(PersistCommand::Flush(ack_sender)).is_ok() {
            let _ = ack_receiver.recv();
        }
    }

    /// Count of snapshots that could not be written.
    pub(crate) fn failures(&self) -> usize {
        self.failures.load(Ordering::Relaxed)
    }
}

impl Drop for PersistWorker {
    fn drop(&mut self) {
        self.sender.take();
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                error!("event=habits_persist module=service status=error error_code=worker_panicked");
            }
        }
    }
}

fn run(slots: &dyn SlotStore, receiver: &Receiver<PersistCommand>, failures: &AtomicUsize) {
    while let Ok(command) = receiver.recv() {
        let (mut latest, mut acks) = match command {
            PersistCommand::Write { revision, document } => {
                (Some((revision, document)), Vec::new())
            }
            PersistCommand::Flush(ack) => (None, vec![ack]),
        };

        while let Ok(queued) = receiver.try_recv() {
            match queued {
                PersistCommand::Write { revision, document } => {
                    if let Some((superseded, _)) = latest.replace((revision, document)) {
                        debug!(
                            "event=habits_persist module=service status=skipped revision={superseded}"
                        );
                    }
                }
                PersistCommand::Flush(ack) => acks.push(ack),
            }
        }

        if let Some((revision, document)) = latest {
            write_snapshot(slots, revision, &document, failures);
        }
        for ack in acks {
            let _ = ack.send(());
        }
    }
}

fn write_snapshot(
    slots: &dyn SlotStore,
    revision: u64,
    document: &str,
    failures: &AtomicUsize,
) {
    let started_at = Instant::now();
    match slots.write_slot(HABITS_SLOT, document) {
        Ok(()) => debug!(
            "event=habits_persist module=service status=ok backend={} revision={revision} bytes={} duration_ms={}",
            slots.backend(),
            document.len(),
            started_at.elapsed().as_millis()
        ),
        Err(err) => {
            failures.fetch_add(1, Ordering::Relaxed);
            error!(
                "event=habits_persist module=service status=error backend={} revision={revision} error_code=write_failed error={err}",
                slots.backend()
            );
        }
    }
}
