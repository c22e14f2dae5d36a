use crate::data_wrappers::MergeCandidate;
use crate::UpgmaError;

pub(super) mod channel;
pub(super) mod solo;

/// Rank that gathers the base matrix, broadcasts it, and reports the final tree.
pub const ROOT_RANK: usize = 0;

/// The collective operations a worker uses to cooperate with its peers. Workers share no memory:
/// every piece of data another rank needs crosses one of these calls.
///
/// Every rank of a group must call the same collectives in the same order. A rank that detects
/// otherwise, or that sees a peer fail, returns an error rather than continuing with a replica
/// that may no longer match its peers.
pub trait Communicator<T> {
    /// This worker's rank, in `0..size`.
    fn rank(&self) -> usize;

    /// The number of workers in the group.
    fn size(&self) -> usize;

    fn is_root(&self) -> bool {
        self.rank() == ROOT_RANK
    }

    /// Gathers rows of the base matrix on the root. Every non-root rank sends each of its `own`
    /// `(index, values)` rows as a separate message without waiting; the root blocks until all
    /// `n_rows` rows are present.
    ///
    /// # Returns
    /// * On the root, every row ordered by index. `None` on every other rank.
    fn gather_rows(
        &self,
        own: Vec<(usize, Vec<T>)>,
        n_rows: usize,
    ) -> Result<Option<Vec<Vec<T>>>, UpgmaError>;

    /// Broadcasts the root's rows to every rank. Only the root's `rows` argument is read.
    fn broadcast_rows(&self, rows: Option<Vec<Vec<T>>>) -> Result<Vec<Vec<T>>, UpgmaError>;

    /// Combines one candidate per rank into the single smallest candidate under
    /// `MergeCandidate::total_cmp`, and hands the same result to every rank. `None` means a rank
    /// had no pair to offer.
    fn all_reduce_min(
        &self,
        local: Option<MergeCandidate<T>>,
    ) -> Result<Option<MergeCandidate<T>>, UpgmaError>;

    /// Tells every peer to stop. Peers blocked in, or later entering, a collective fail with
    /// `UpgmaError::Aborted`.
    fn abort(&self, reason: &str);
}

pub(crate) fn missing_root_rows(rank: usize) -> UpgmaError {
    UpgmaError::WrongDimension(format!(
        "rank {rank} cannot broadcast: no gathered rows on the root"
    ))
}
