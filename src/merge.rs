use crate::cluster_state::ClusterState;
use crate::data_wrappers::{ClusterNode, MergeCandidate};
use num_traits::Float;

/// Applies the agreed merge to a replica. Every rank runs this on the same state with the same
/// candidate, so every replica takes the same next step without exchanging any matrix data.
pub(crate) struct MergeCoordinator;

impl MergeCoordinator {
    /// Merges clusters `candidate.left` and `candidate.right` into a new cluster with the next
    /// id, computes the new cluster's distances to every other active cluster, and deactivates
    /// the two merged clusters.
    ///
    /// # Returns
    /// * The id of the new cluster.
    pub(crate) fn apply<T: Float>(
        state: &mut ClusterState<T>,
        candidate: &MergeCandidate<T>,
    ) -> usize {
        let (i, j) = (candidate.left, candidate.right);
        debug_assert!(state.active.contains(&i) && state.active.contains(&j));

        let node = Self::join(&state.nodes[i], &state.nodes[j], i, j, candidate.distance);
        let row = Self::average_row(state, i, j);

        let k = state.matrix.push_row(row);
        state.nodes.push(node);
        debug_assert_eq!(k + 1, state.nodes.len());

        state.matrix.retire(i);
        state.matrix.retire(j);
        state.active.retain(|&m| m != i && m != j);
        state.active.push(k);
        state.merges.push(*candidate);
        k
    }

    fn join<T: Float>(
        left: &ClusterNode<T>,
        right: &ClusterNode<T>,
        left_id: usize,
        right_id: usize,
        distance: T,
    ) -> ClusterNode<T> {
        let height = distance / (T::one() + T::one());
        ClusterNode {
            name: String::new(),
            left: Some(left_id),
            right: Some(right_id),
            height,
            branch_length_left: non_negative(height - left.height),
            branch_length_right: non_negative(height - right.height),
            size: left.size + right.size,
        }
    }

    /// The new cluster's row: for every active `m` other than `i` and `j`,
    /// `(D[i][m] * size_i + D[j][m] * size_j) / (size_i + size_j)`. Columns of inactive clusters
    /// are never read and hold `T::max_value()`.
    fn average_row<T: Float>(state: &ClusterState<T>, i: usize, j: usize) -> Vec<T> {
        let size_i = as_float::<T>(state.nodes[i].size);
        let size_j = as_float::<T>(state.nodes[j].size);
        let total = size_i + size_j;

        let mut row = vec![T::max_value(); state.matrix.len()];
        for &m in state.active.iter().filter(|&&m| m != i && m != j) {
            let dist_im = state.matrix.distance(i, m);
            let dist_jm = state.matrix.distance(j, m);
            row[m] = (dist_im * size_i + dist_jm * size_j) / total;
        }
        row
    }
}

/// Clamps at zero, mapping `-0.0` to `0.0` as well.
pub(crate) fn non_negative<T: Float>(length: T) -> T {
    if length > T::zero() {
        length
    } else {
        T::zero()
    }
}

fn as_float<T: Float>(size: usize) -> T {
    T::from(size).unwrap_or_else(T::max_value)
}
