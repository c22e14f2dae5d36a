use crate::data_wrappers::{ClusterNode, MergeCandidate};
use crate::newick;
use num_traits::Float;

/// The finished tree of a UPGMA run. Nodes live in one append-only arena: the `N` leaves come
/// first in input order, followed by one internal node per merge, so a child always has a lower
/// index than its parent.
#[derive(Debug, Clone, PartialEq)]
pub struct Dendrogram<T> {
    nodes: Vec<ClusterNode<T>>,
    merges: Vec<MergeCandidate<T>>,
    root: usize,
}

impl<T: Float> Dendrogram<T> {
    pub(crate) fn new(
        nodes: Vec<ClusterNode<T>>,
        merges: Vec<MergeCandidate<T>>,
        root: usize,
    ) -> Self {
        debug_assert!(root < nodes.len());
        Dendrogram { nodes, merges, root }
    }

    /// Index of the root in `Dendrogram::nodes`.
    pub fn root(&self) -> usize {
        self.root
    }

    pub fn root_node(&self) -> &ClusterNode<T> {
        &self.nodes[self.root]
    }

    /// Every node, indexed by cluster id.
    pub fn nodes(&self) -> &[ClusterNode<T>] {
        &self.nodes
    }

    pub fn node(&self, id: usize) -> Option<&ClusterNode<T>> {
        self.nodes.get(id)
    }

    /// The agreed merges in the order they were applied. Merge `r` created node `N + r`.
    pub fn merges(&self) -> &[MergeCandidate<T>] {
        &self.merges
    }

    pub fn n_leaves(&self) -> usize {
        self.nodes.len() - self.merges.len()
    }

    pub fn leaf_names(&self) -> Vec<&str> {
        self.nodes
            .iter()
            .filter(|node| node.is_leaf())
            .map(|node| node.name.as_str())
            .collect()
    }

    /// Renders the tree in Newick format, with branch lengths printed with up to `precision`
    /// decimals.
    ///
    /// # Examples
    /// ```
    ///use upgma::{DistanceTable, Upgma};
    ///
    ///let table = DistanceTable::from_matrix(
    ///    &["A", "B"],
    ///    &[vec![0.0, 0.3], vec![0.3, 0.0]],
    ///);
    ///let tree = Upgma::default_params(&table).cluster().unwrap();
    ///assert_eq!("(A:0.15,B:0.15);", tree.to_newick(6));
    ///assert_eq!("(A:0,B:0);", tree.to_newick(0));
    /// ```
    pub fn to_newick(&self, precision: usize) -> String {
        newick::write_newick(self, precision)
    }
}
