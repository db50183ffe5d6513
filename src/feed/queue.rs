//! Fetch execution off the UI thread.
//!
//! - Provider calls block, so they run on tokio's blocking pool
//! - Completions come back over a flume channel the UI thread drains
//! - Nothing is cancelled; stale completions are filtered by their owners

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use flume::{Receiver, Sender};
use tokio::runtime::{Builder as TokioRuntimeBuilder, Runtime};
use tracing::{debug, error, trace, warn};

use super::controller::{FetchOutcome, FetchTicket};
use crate::detail::{DetailOutcome, DetailTicket};
use crate::source::PhotoSource;

/// Default number of concurrent provider calls.
pub const DEFAULT_WORKERS: usize = 2;

/// Maximum number of concurrent provider calls.
const MAX_WORKERS: usize = 8;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchJob {
    Page(FetchTicket),
    Detail(DetailTicket),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Completion {
    Page(FetchOutcome),
    Detail(DetailOutcome),
}

pub struct FetchQueue {
    runtime: Option<Runtime>,
    source: Arc<dyn PhotoSource>,
    result_tx: Sender<Completion>,
    result_rx: Receiver<Completion>,
    /// Jobs submitted whose completion has not been drained yet.
    in_flight: AtomicUsize,
}

impl FetchQueue {
    pub fn new(source: Arc<dyn PhotoSource>, workers: usize) -> Result<Self> {
        let workers = workers.clamp(1, MAX_WORKERS);
        let runtime = TokioRuntimeBuilder::new_multi_thread()
            .worker_threads(1)
            .max_blocking_threads(workers)
            .thread_name("mosaic-fetch")
            .build()
            .context("Failed to start fetch runtime")?;

        let (result_tx, result_rx) = flume::unbounded();
        debug!(workers, "Started fetch queue");

        Ok(Self {
            runtime: Some(runtime),
            source,
            result_tx,
            result_rx,
            in_flight: AtomicUsize::new(0),
        })
    }

    /// Start a job. Returns false once the queue has been shut down.
    pub fn submit(&self, job: FetchJob) -> bool {
        let Some(runtime) = self.runtime.as_ref() else {
            warn!(?job, "Fetch queue is shut down, dropping job");
            return false;
        };

        let source = Arc::clone(&self.source);
        let tx = self.result_tx.clone();
        self.in_flight.fetch_add(1, Ordering::SeqCst);
        trace!(?job, "Submitting fetch");

        runtime.spawn_blocking(move || {
            let completion = run_job(source.as_ref(), job);
            if tx.send(completion).is_err() {
                error!("Fetch result channel disconnected");
            }
        });
        true
    }

    /// Drain completed jobs (non-blocking).
    pub fn poll(&self) -> Vec<Completion> {
        let drained: Vec<Completion> = self.result_rx.try_iter().collect();
        self.in_flight.fetch_sub(drained.len(), Ordering::SeqCst);
        drained
    }

    /// Block until one job completes or `timeout` elapses.
    pub fn wait(&self, timeout: Duration) -> Option<Completion> {
        let completion = self.result_rx.recv_timeout(timeout).ok()?;
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        Some(completion)
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }

    /// Work is running or results are waiting to be drained.
    pub fn is_busy(&self) -> bool {
        self.in_flight() > 0
    }

    pub fn shutdown(&mut self) {
        if let Some(runtime) = self.runtime.take() {
            debug!("Shutting down fetch queue");
            runtime.shutdown_background();
        }
    }
}

impl Drop for FetchQueue {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn run_job(source: &dyn PhotoSource, job: FetchJob) -> Completion {
    match job {
        FetchJob::Page(ticket) => {
            let result = ticket.run(source);
            Completion::Page(FetchOutcome { ticket, result })
        }
        FetchJob::Detail(ticket) => {
            let result = source.fetch_detail(&ticket.id);
            Completion::Detail(DetailOutcome { ticket, result })
        }
    }
}
