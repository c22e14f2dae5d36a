//! UPGMA (Unweighted Pair Group Method with Arithmetic mean) phylogenetic tree building in Rust,
//! spread over a group of cooperating workers that share no memory. Generic over floating point
//! numeric types.
//!
//! UPGMA is average-linkage hierarchical clustering: it repeatedly merges the two closest
//! clusters, and measures the distance from the merged cluster to every other cluster as the
//! size-weighted average of its two parts. The result is an ultrametric binary tree, rendered
//! here in Newick format.
//!
//! A distributed run works as follows:
//!  1. The workers split the rows of the distance matrix between them, compute their rows, and
//!     the root worker gathers them and broadcasts the whole matrix once;
//!  2. Each round, every worker scans its share of the active clusters for the closest pair, and
//!     a single all-reduce of one `(distance, left, right)` record settles the pair every worker
//!     merges; and
//!  3. Every worker applies the merge to its own replica of the state, so no matrix data is ever
//!     exchanged again.
//!
//! Ties are broken on the lower cluster id first, then the higher, so every worker count produces
//! the same merges as the sequential run.
//!
//! # Examples
//! ```
//!use upgma::{DistanceTable, Upgma, UpgmaParams};
//!
//!let table = DistanceTable::from_matrix(
//!    &["A", "B", "C", "D"],
//!    &[
//!        vec![0.0, 2.0, 4.0, 6.0],
//!        vec![2.0, 0.0, 4.0, 6.0],
//!        vec![4.0, 4.0, 0.0, 6.0],
//!        vec![6.0, 6.0, 6.0, 0.0],
//!    ],
//!);
//!let sequential = Upgma::default_params(&table).cluster().unwrap();
//!assert_eq!("(D:3,(C:2,(A:1,B:1):1):1);", sequential.to_newick(6));
//!
//!let params = UpgmaParams::builder().n_workers(4).build();
//!let distributed = Upgma::new(&table, params).cluster_distributed().unwrap();
//!assert_eq!(sequential.merges(), distributed.merges());
//! ```
//!
//! # References
//! * [Sokal, R.R.; Michener, C.D. A statistical method for evaluating systematic relationships.](https://archive.org/details/cbarchive_33927_astatisticalmethodforevaluatin1902)
//! * [Jukes, T.H.; Cantor, C.R. Evolution of protein molecules.](https://doi.org/10.1016/B978-1-4832-3211-9.50009-7)

pub use crate::comm::channel::{ChannelCommunicator, WorkerGroup};
pub use crate::comm::solo::SoloCommunicator;
pub use crate::comm::{Communicator, ROOT_RANK};
pub use crate::data_wrappers::{ClusterNode, MergeCandidate};
pub use crate::dendrogram::Dendrogram;
pub use crate::distance::{jukes_cantor, UNDEFINED_DISTANCE};
pub use crate::error::UpgmaError;
pub use crate::input::{
    read_distance_table, read_sequences, write_sequences, DistanceTable, Sequence,
};
pub use crate::matrix::DistanceMatrix;
pub use crate::newick::parse_leaf_names;
pub use crate::params::{ParamBuilder, UpgmaParams};
pub use crate::partition::{PartitionPolicy, WorkerPartition};
pub use crate::simulate::SequenceSimulator;
pub use crate::upgma::{MatrixSource, Upgma};

mod cluster_state;
mod comm;
mod data_wrappers;
mod dendrogram;
mod distance;
mod error;
mod input;
mod matrix;
mod matrix_builder;
mod merge;
mod newick;
mod params;
mod partition;
mod reducer;
mod simulate;
mod upgma;
mod validation;
