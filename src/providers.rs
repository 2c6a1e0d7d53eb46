//! Provider plumbing: per-seat registration and the deadline wrapper that
//! bridges the synchronous turn machine to slow or unreliable deciders.
//!
//! The turn machine issues at most one outstanding decision call at any
//! instant, so decisions are resolved strictly in request order without
//! any locking inside the game state.

use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use crate::decision::{Decision, DecisionError, DecisionProvider, DecisionRequest, Snapshot};

mod heuristic;

pub use heuristic::HeuristicProvider;

/// One optional provider per seat. Seats without a provider resolve every
/// decision to the kind's fallback.
pub struct ProviderTable {
    seats: Vec<Option<Box<dyn DecisionProvider>>>,
}

impl std::fmt::Debug for ProviderTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let flags: String =
            self.seats.iter().map(|s| if s.is_some() { 'P' } else { '-' }).collect();
        write!(f, "ProviderTable({flags})")
    }
}

impl ProviderTable {
    pub fn for_seats(n: usize) -> Self {
        let mut seats = Vec::with_capacity(n);
        seats.resize_with(n, || None);
        Self { seats }
    }

    pub fn set(&mut self, seat: usize, provider: Option<Box<dyn DecisionProvider>>) {
        if seat >= self.seats.len() {
            self.seats.resize_with(seat + 1, || None);
        }
        self.seats[seat] = provider;
    }

    pub fn has_provider(&self, seat: usize) -> bool {
        self.seats.get(seat).map(|s| s.is_some()).unwrap_or(false)
    }

    /// Ask the seat's provider to decide. A missing provider is an error,
    /// which the caller resolves to the fallback like any other failure.
    pub fn decide(
        &mut self,
        seat: usize,
        snapshot: &Snapshot,
        request: &DecisionRequest,
    ) -> Result<Decision, DecisionError> {
        match self.seats.get_mut(seat) {
            Some(Some(provider)) => provider.decide(snapshot, request),
            _ => Err(DecisionError::NoProvider(seat)),
        }
    }
}

type WorkItem = (u64, Snapshot, DecisionRequest);
type WorkResult = (u64, Result<Decision, DecisionError>);

/// Runs an inner provider on its own worker thread and bounds every
/// `decide` call with a deadline. On expiry the pending call is abandoned
/// (best-effort cancellation): its reply, if one ever arrives, carries a
/// stale sequence number and is discarded on the next call.
pub struct TimedProvider {
    tx: mpsc::Sender<WorkItem>,
    rx: mpsc::Receiver<WorkResult>,
    deadline: Duration,
    seq: u64,
    label: String,
}

impl TimedProvider {
    pub fn spawn<P>(inner: P, deadline: Duration) -> Self
    where
        P: DecisionProvider + 'static,
    {
        let label = format!("timed:{}", inner.name());
        let (work_tx, work_rx) = mpsc::channel::<WorkItem>();
        let (result_tx, result_rx) = mpsc::channel::<WorkResult>();
        thread::spawn(move || {
            let mut inner = inner;
            while let Ok((seq, snapshot, request)) = work_rx.recv() {
                let outcome = inner.decide(&snapshot, &request);
                if result_tx.send((seq, outcome)).is_err() {
                    break;
                }
            }
        });
        Self { tx: work_tx, rx: result_rx, deadline, seq: 0, label }
    }

    pub fn deadline(&self) -> Duration {
        self.deadline
    }
}

impl DecisionProvider for TimedProvider {
    fn decide(
        &mut self,
        snapshot: &Snapshot,
        request: &DecisionRequest,
    ) -> Result<Decision, DecisionError> {
        self.seq += 1;
        let seq = self.seq;
        self.tx
            .send((seq, snapshot.clone(), request.clone()))
            .map_err(|_| DecisionError::WorkerGone)?;

        let started = Instant::now();
        loop {
            let remaining = match self.deadline.checked_sub(started.elapsed()) {
                Some(d) => d,
                None => return Err(DecisionError::Timeout(self.deadline)),
            };
            match self.rx.recv_timeout(remaining) {
                Ok((reply_seq, outcome)) if reply_seq == seq => return outcome,
                // Stale reply from an abandoned call; drop it and keep waiting.
                Ok(_) => continue,
                Err(mpsc::RecvTimeoutError::Timeout) => {
                    return Err(DecisionError::Timeout(self.deadline))
                }
                Err(mpsc::RecvTimeoutError::Disconnected) => return Err(DecisionError::WorkerGone),
            }
        }
    }

    fn name(&self) -> &str {
        &self.label
    }
}
