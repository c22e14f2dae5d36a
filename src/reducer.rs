use crate::cluster_state::ClusterState;
use crate::comm::Communicator;
use crate::data_wrappers::MergeCandidate;
use crate::partition::PartitionPolicy;
use crate::UpgmaError;
use num_traits::Float;
use std::ops::Range;

/// Finds the globally closest pair of active clusters. Each rank scans the upper triangle of its
/// own block of active positions, and one all-reduce of a single `MergeCandidate` record per rank
/// settles the winner on every rank at once.
pub(crate) struct PartitionedMinReducer<'c, C> {
    comm: &'c C,
    policy: PartitionPolicy,
}

impl<'c, C> PartitionedMinReducer<'c, C> {
    pub(crate) fn new(comm: &'c C, policy: PartitionPolicy) -> Self {
        Self { comm, policy }
    }

    pub(crate) fn reduce<T: Float>(
        &self,
        state: &ClusterState<T>,
    ) -> Result<Option<MergeCandidate<T>>, UpgmaError>
    where
        C: Communicator<T>,
    {
        // Membership changes every round, so the blocks are recomputed every round
        let partition = self
            .policy
            .partition(state.n_active(), self.comm.size(), self.comm.rank());
        let local = scan_rows(state, partition.rows);
        self.comm.all_reduce_min(local)
    }
}

/// The smallest candidate among pairs `(active[ii], active[jj])` with `ii` in `rows` and
/// `jj > ii`. Since active ids are ascending, the scan meets pairs in `(left, right)` order, so
/// keeping the first strictly smaller distance yields the minimum under
/// `MergeCandidate::total_cmp`.
pub(crate) fn scan_rows<T: Float>(
    state: &ClusterState<T>,
    rows: Range<usize>,
) -> Option<MergeCandidate<T>> {
    let active = &state.active;
    let mut best: Option<MergeCandidate<T>> = None;
    for ii in rows {
        let i = active[ii];
        for &j in &active[ii + 1..] {
            let dist = state.matrix.distance(i, j);
            if best.map_or(true, |best| dist < best.distance) {
                best = Some(MergeCandidate::new(dist, i, j));
            }
        }
    }
    best
}
