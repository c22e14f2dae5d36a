use num_traits::Float;
use std::cmp::Ordering;

/// A leaf taxon or an internal merge of the dendrogram. Children are referenced by their index
/// in the dendrogram's node arena, and are always older (lower index) than their parent.
#[derive(Debug, Clone, PartialEq)]
pub struct ClusterNode<T> {
    pub name: String,
    pub left: Option<usize>,
    pub right: Option<usize>,
    pub height: T,
    pub branch_length_left: T,
    pub branch_length_right: T,
    pub size: usize,
}

impl<T: Float> ClusterNode<T> {
    pub(crate) fn leaf(name: &str) -> Self {
        ClusterNode {
            name: name.to_string(),
            left: None,
            right: None,
            height: T::zero(),
            branch_length_left: T::zero(),
            branch_length_right: T::zero(),
            size: 1,
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.left.is_none() && self.right.is_none()
    }
}

/// A candidate pair of active clusters to merge, and the distance between them. `left` is always
/// the lower cluster id. This is the single record exchanged by the per-round all-reduce.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MergeCandidate<T> {
    pub distance: T,
    pub left: usize,
    pub right: usize,
}

impl<T: Float> MergeCandidate<T> {
    pub(crate) fn new(distance: T, a: usize, b: usize) -> Self {
        MergeCandidate {
            distance,
            left: a.min(b),
            right: a.max(b),
        }
    }

    /// Total order over candidates: distance first, then the lower id, then the higher id.
    /// Distances are finite by the time they reach the clustering loop.
    pub fn total_cmp(&self, other: &Self) -> Ordering {
        self.distance
            .partial_cmp(&other.distance)
            .unwrap_or(Ordering::Equal)
            .then(self.left.cmp(&other.left))
            .then(self.right.cmp(&other.right))
    }

    /// Combines two optional candidates, keeping whichever comes first in the total order.
    pub(crate) fn min_of(a: Option<Self>, b: Option<Self>) -> Option<Self> {
        match (a, b) {
            (Some(a), Some(b)) => {
                if b.total_cmp(&a) == Ordering::Less {
                    Some(b)
                } else {
                    Some(a)
                }
            }
            (a, None) => a,
            (None, b) => b,
        }
    }
}
