use crate::data_wrappers::{ClusterNode, MergeCandidate};
use crate::dendrogram::Dendrogram;
use crate::matrix::DistanceMatrix;
use crate::UpgmaError;
use num_traits::Float;

/// One worker's replica of the clustering state. Every worker starts from the same broadcast
/// matrix and applies the same merges in the same order, so replicas never need reconciling.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ClusterState<T> {
    pub(crate) matrix: DistanceMatrix<T>,
    // Always in ascending id order: removals keep the order and new ids are the largest yet
    pub(crate) active: Vec<usize>,
    pub(crate) nodes: Vec<ClusterNode<T>>,
    pub(crate) merges: Vec<MergeCandidate<T>>,
}

impl<T: Float> ClusterState<T> {
    pub(crate) fn new(names: &[&str], matrix: DistanceMatrix<T>) -> Result<Self, UpgmaError> {
        if names.len() != matrix.len() {
            return Err(UpgmaError::WrongDimension(format!(
                "{} taxon names for a {} row distance matrix",
                names.len(),
                matrix.len()
            )));
        }
        let n_leaves = names.len();
        let mut nodes = Vec::with_capacity((2 * n_leaves).saturating_sub(1));
        nodes.extend(names.iter().map(|name| ClusterNode::leaf(name)));
        Ok(ClusterState {
            matrix,
            active: (0..n_leaves).collect(),
            nodes,
            merges: Vec::with_capacity(n_leaves.saturating_sub(1)),
        })
    }

    pub(crate) fn n_active(&self) -> usize {
        self.active.len()
    }

    pub(crate) fn into_dendrogram(self) -> Result<Dendrogram<T>, UpgmaError> {
        match self.active.as_slice() {
            [root] => Ok(Dendrogram::new(self.nodes, self.merges, *root)),
            active => Err(UpgmaError::WrongDimension(format!(
                "clustering stopped with {} active clusters",
                active.len()
            ))),
        }
    }
}
