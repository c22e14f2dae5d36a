use super::{missing_root_rows, Communicator, ROOT_RANK};
use crate::data_wrappers::MergeCandidate;
use crate::UpgmaError;
use log::{debug, trace};
use num_traits::Float;
use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::sync::mpsc::{channel, Receiver, Sender};
use std::thread;

enum Payload<T> {
    Row { index: usize, values: Vec<T> },
    Rows(Vec<Vec<T>>),
    Candidate(Option<MergeCandidate<T>>),
    Abort(String),
}

impl<T> Payload<T> {
    fn kind(&self) -> &'static str {
        match self {
            Payload::Row { .. } => "row",
            Payload::Rows(_) => "matrix",
            Payload::Candidate(_) => "candidate",
            Payload::Abort(_) => "abort",
        }
    }
}

struct Envelope<T> {
    source: usize,
    seq: u64,
    payload: Payload<T>,
}

/// One rank of a `WorkerGroup`. Owns its inbox and a sender to every peer. Each collective call
/// is numbered, so a message that arrives early (a faster peer already in the next collective)
/// is held back until this rank gets there.
pub struct ChannelCommunicator<T> {
    rank: usize,
    size: usize,
    peers: Vec<Option<Sender<Envelope<T>>>>,
    inbox: Receiver<Envelope<T>>,
    held: RefCell<VecDeque<Envelope<T>>>,
    seq: Cell<u64>,
    finished: Cell<bool>,
}

impl<T> ChannelCommunicator<T> {
    fn connect(size: usize) -> Vec<Self> {
        let (senders, receivers): (Vec<_>, Vec<_>) = (0..size).map(|_| channel()).unzip();
        receivers
            .into_iter()
            .enumerate()
            .map(|(rank, inbox)| ChannelCommunicator {
                rank,
                size,
                peers: senders
                    .iter()
                    .enumerate()
                    .map(|(dest, sender)| (dest != rank).then(|| sender.clone()))
                    .collect(),
                inbox,
                held: RefCell::new(VecDeque::new()),
                seq: Cell::new(0),
                finished: Cell::new(false),
            })
            .collect()
    }

    fn next_seq(&self) -> u64 {
        let seq = self.seq.get();
        self.seq.set(seq + 1);
        seq
    }

    fn other_ranks(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.size).filter(move |dest| *dest != self.rank)
    }

    fn send(&self, dest: usize, seq: u64, payload: Payload<T>) -> Result<(), UpgmaError> {
        trace!("rank {} -> rank {dest}: {} #{seq}", self.rank, payload.kind());
        let envelope = Envelope {
            source: self.rank,
            seq,
            payload,
        };
        match self.peers.get(dest).and_then(Option::as_ref) {
            Some(sender) => sender
                .send(envelope)
                .map_err(|_| UpgmaError::Disconnected(self.rank)),
            None => Err(UpgmaError::Disconnected(self.rank)),
        }
    }

    /// Blocks until the message of collective `seq` arrives, checking that it is of the kind
    /// this rank expects.
    fn receive(&self, seq: u64, expected: &'static str) -> Result<Envelope<T>, UpgmaError> {
        let held = {
            let mut held = self.held.borrow_mut();
            let pos = held.iter().position(|envelope| envelope.seq == seq);
            pos.and_then(|pos| held.remove(pos))
        };
        if let Some(envelope) = held {
            return self.accept(envelope, expected);
        }

        loop {
            let envelope = self
                .inbox
                .recv()
                .map_err(|_| UpgmaError::Disconnected(self.rank))?;
            if let Payload::Abort(reason) = envelope.payload {
                return Err(UpgmaError::Aborted {
                    rank: envelope.source,
                    reason,
                });
            }
            if envelope.seq == seq {
                return self.accept(envelope, expected);
            }
            if envelope.seq > seq {
                self.held.borrow_mut().push_back(envelope);
                continue;
            }
            // A message from a collective this rank has already completed
            return Err(UpgmaError::CollectiveMismatch {
                rank: self.rank,
                expected,
                found: envelope.payload.kind(),
            });
        }
    }

    fn accept(
        &self,
        envelope: Envelope<T>,
        expected: &'static str,
    ) -> Result<Envelope<T>, UpgmaError> {
        let found = envelope.payload.kind();
        if found == expected {
            Ok(envelope)
        } else {
            Err(UpgmaError::CollectiveMismatch {
                rank: self.rank,
                expected,
                found,
            })
        }
    }

    fn mark_finished(&self) {
        self.finished.set(true);
    }

    fn send_abort(&self, reason: &str) {
        if self.finished.replace(true) {
            return;
        }
        let seq = self.seq.get();
        for dest in self.other_ranks() {
            // Peers that already finished have dropped their inbox
            let _ = self.send(dest, seq, Payload::Abort(reason.to_string()));
        }
    }
}

impl<T: Float> Communicator<T> for ChannelCommunicator<T> {
    fn rank(&self) -> usize {
        self.rank
    }

    fn size(&self) -> usize {
        self.size
    }

    fn gather_rows(
        &self,
        own: Vec<(usize, Vec<T>)>,
        n_rows: usize,
    ) -> Result<Option<Vec<Vec<T>>>, UpgmaError> {
        let seq = self.next_seq();
        if !self.is_root() {
            for (index, values) in own {
                self.send(ROOT_RANK, seq, Payload::Row { index, values })?;
            }
            return Ok(None);
        }

        let mut slots: Vec<Option<Vec<T>>> = (0..n_rows).map(|_| None).collect();
        let n_own = own.len();
        for (index, values) in own {
            if let Some(slot) = slots.get_mut(index) {
                *slot = Some(values);
            }
        }
        for _ in n_own..n_rows {
            let envelope = self.receive(seq, "row")?;
            if let Payload::Row { index, values } = envelope.payload {
                match slots.get_mut(index) {
                    Some(slot) => *slot = Some(values),
                    None => {
                        return Err(UpgmaError::WrongDimension(format!(
                            "rank {} sent row {index} of a {n_rows} row matrix",
                            envelope.source
                        )))
                    }
                }
            }
        }
        debug!("Root gathered {n_rows} rows, {} from peers", n_rows - n_own);
        slots
            .into_iter()
            .collect::<Option<Vec<_>>>()
            .map(Some)
            .ok_or_else(|| {
                UpgmaError::WrongDimension(String::from("gathered rows do not cover the matrix"))
            })
    }

    fn broadcast_rows(&self, rows: Option<Vec<Vec<T>>>) -> Result<Vec<Vec<T>>, UpgmaError> {
        let seq = self.next_seq();
        if self.is_root() {
            let rows = rows.ok_or_else(|| missing_root_rows(self.rank))?;
            for dest in self.other_ranks() {
                self.send(dest, seq, Payload::Rows(rows.clone()))?;
            }
            return Ok(rows);
        }
        match self.receive(seq, "matrix")?.payload {
            Payload::Rows(rows) => Ok(rows),
            other => Err(UpgmaError::CollectiveMismatch {
                rank: self.rank,
                expected: "matrix",
                found: other.kind(),
            }),
        }
    }

    fn all_reduce_min(
        &self,
        local: Option<MergeCandidate<T>>,
    ) -> Result<Option<MergeCandidate<T>>, UpgmaError> {
        let seq = self.next_seq();
        for dest in self.other_ranks() {
            self.send(dest, seq, Payload::Candidate(local))?;
        }

        let mut by_rank: Vec<Option<MergeCandidate<T>>> = vec![None; self.size];
        by_rank[self.rank] = local;
        for _ in 1..self.size {
            let envelope = self.receive(seq, "candidate")?;
            if let Payload::Candidate(candidate) = envelope.payload {
                by_rank[envelope.source] = candidate;
            }
        }
        // Folding in rank order gives every rank the same answer
        Ok(by_rank.into_iter().fold(None, MergeCandidate::min_of))
    }

    fn abort(&self, reason: &str) {
        debug!("Rank {} aborting the run: {reason}", self.rank);
        self.send_abort(reason);
    }
}

impl<T> Drop for ChannelCommunicator<T> {
    fn drop(&mut self) {
        if !self.finished.get() {
            self.send_abort("rank exited before completing the run");
        }
    }
}

/// A fixed set of ranks for the lifetime of one run. Each rank runs on its own scoped thread
/// with its own `ChannelCommunicator`, and the group is torn down when every rank has returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkerGroup {
    size: usize,
}

impl WorkerGroup {
    pub fn new(size: usize) -> Self {
        WorkerGroup { size: size.max(1) }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Runs `work` once on every rank and waits for all of them.
    ///
    /// A rank that returns an error, panics, or fails to start aborts the whole group.
    ///
    /// # Returns
    /// * Every rank's result in rank order, or the error that brought the run down. Errors that
    ///   only report another rank's failure are returned only when no root cause is known.
    pub fn run<T, R, F>(&self, work: F) -> Result<Vec<R>, UpgmaError>
    where
        T: Send,
        R: Send,
        F: Fn(&ChannelCommunicator<T>) -> Result<R, UpgmaError> + Sync,
    {
        let work = &work;
        let comms = ChannelCommunicator::<T>::connect(self.size);
        let outcomes = thread::scope(|scope| {
            let handles: Vec<_> = comms
                .into_iter()
                .map(|comm| {
                    let rank = comm.rank;
                    let spawned = thread::Builder::new()
                        .name(format!("upgma-rank-{rank}"))
                        .spawn_scoped(scope, move || {
                            let result = work(&comm);
                            match &result {
                                Ok(_) => comm.mark_finished(),
                                Err(err) => comm.send_abort(&err.to_string()),
                            }
                            result
                        });
                    (rank, spawned)
                })
                .collect();

            handles
                .into_iter()
                .map(|(rank, spawned)| match spawned {
                    Ok(handle) => handle
                        .join()
                        .unwrap_or_else(|_| Err(UpgmaError::WorkerPanicked(rank))),
                    Err(source) => Err(UpgmaError::WorkerSpawn { rank, source }),
                })
                .collect::<Vec<_>>()
        });
        collect_outcomes(outcomes)
    }
}

fn collect_outcomes<R>(outcomes: Vec<Result<R, UpgmaError>>) -> Result<Vec<R>, UpgmaError> {
    let mut results = Vec::with_capacity(outcomes.len());
    let mut root_cause = None;
    let mut secondary = None;
    for outcome in outcomes {
        match outcome {
            Ok(result) => results.push(result),
            Err(err) if err.is_secondary() => {
                secondary.get_or_insert(err);
            }
            Err(err) => {
                root_cause.get_or_insert(err);
            }
        }
    }
    match root_cause.or(secondary) {
        Some(err) => Err(err),
        None => Ok(results),
    }
}
