use crate::cluster_state::ClusterState;
use crate::comm::channel::{ChannelCommunicator, WorkerGroup};
use crate::comm::solo::SoloCommunicator;
use crate::comm::Communicator;
use crate::dendrogram::Dendrogram;
use crate::matrix_builder::DistanceMatrixBuilder;
use crate::merge::MergeCoordinator;
use crate::reducer::PartitionedMinReducer;
use crate::validation::DataValidator;
use crate::{distance, DistanceTable, Sequence, UpgmaError, UpgmaParams};
use log::{debug, info};
use num_traits::Float;

/// Where the pairwise distances come from: a table read from a file, or sequences compared
/// with the Jukes-Cantor correction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MatrixSource<'a, T> {
    Table(&'a DistanceTable<T>),
    Sequences(&'a [Sequence]),
}

impl<'a, T: Float> MatrixSource<'a, T> {
    /// Taxon names, in input order. Leaf `i` of the tree is the `i`th name.
    pub fn names(&self) -> Vec<&'a str> {
        match *self {
            MatrixSource::Table(table) => table.names.iter().map(String::as_str).collect(),
            MatrixSource::Sequences(sequences) => {
                sequences.iter().map(|seq| seq.name.as_str()).collect()
            }
        }
    }

    pub fn len(&self) -> usize {
        match *self {
            MatrixSource::Table(table) => table.len(),
            MatrixSource::Sequences(sequences) => sequences.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The distance between taxa `i` and `j`, or `None` where it is undefined.
    pub fn pair_distance(&self, i: usize, j: usize) -> Option<T> {
        match *self {
            MatrixSource::Table(table) => table.rows.get(i).and_then(|row| row.get(j).copied())?,
            MatrixSource::Sequences(sequences) => {
                distance::jukes_cantor(&sequences[i].symbols, &sequences[j].symbols)
            }
        }
    }
}

impl<'a, T> From<&'a DistanceTable<T>> for MatrixSource<'a, T> {
    fn from(table: &'a DistanceTable<T>) -> Self {
        MatrixSource::Table(table)
    }
}

impl<'a, T> From<&'a [Sequence]> for MatrixSource<'a, T> {
    fn from(sequences: &'a [Sequence]) -> Self {
        MatrixSource::Sequences(sequences)
    }
}

impl<'a, T> From<&'a Vec<Sequence>> for MatrixSource<'a, T> {
    fn from(sequences: &'a Vec<Sequence>) -> Self {
        MatrixSource::Sequences(sequences.as_slice())
    }
}

/// The UPGMA clustering algorithm in Rust. Generic over floating point numeric types.
///
/// A run can be sequential, or spread over a fixed group of workers that share no memory. Every
/// worker holds a replica of the clustering state, and a distributed run reproduces the merges of
/// the sequential run exactly.
#[derive(Debug, Clone, PartialEq)]
pub struct Upgma<'a, T> {
    source: MatrixSource<'a, T>,
    hp: UpgmaParams,
}

impl<'a, T: Float + Send + Sync> Upgma<'a, T> {
    /// Creates an instance of the UPGMA model using a custom parameter configuration.
    ///
    /// # Parameters
    /// * `source` - the taxa to cluster: a `&DistanceTable` or a slice of equal length
    ///              `Sequence`s.
    /// * `params` - the parameter configuration.
    ///
    /// # Returns
    /// * The UPGMA model instance.
    ///
    /// # Examples
    /// ```
    ///use upgma::{DistanceTable, PartitionPolicy, Upgma, UpgmaParams};
    ///
    ///let table = DistanceTable::from_matrix(
    ///    &["A", "B", "C"],
    ///    &[vec![0.0, 2.0, 4.0], vec![2.0, 0.0, 4.0], vec![4.0, 4.0, 0.0]],
    ///);
    ///let params = UpgmaParams::builder()
    ///    .n_workers(2)
    ///    .partition(PartitionPolicy::RemainderLast)
    ///    .build();
    ///let model = Upgma::new(&table, params);
    /// ```
    pub fn new(source: impl Into<MatrixSource<'a, T>>, params: UpgmaParams) -> Self {
        Upgma {
            source: source.into(),
            hp: params,
        }
    }

    /// Creates an instance of the UPGMA model using the default parameters.
    pub fn default_params(source: impl Into<MatrixSource<'a, T>>) -> Self {
        Upgma::new(source, UpgmaParams::default())
    }

    pub fn params(&self) -> &UpgmaParams {
        &self.hp
    }

    /// Clusters the taxa on a single worker. This is the reference every distributed run must
    /// reproduce.
    ///
    /// # Returns
    /// * A result that, if successful, contains the dendrogram. An error is returned if the input
    ///   is empty, has duplicate names, or (for tables) is not square, symmetric, finite and
    ///   non-negative, or (for sequences) has sequences of different lengths.
    ///
    /// # Examples
    /// ```
    ///use upgma::{DistanceTable, Upgma};
    ///
    ///let table = DistanceTable::from_matrix(
    ///    &["A", "B", "C"],
    ///    &[vec![0.0, 2.0, 4.0], vec![2.0, 0.0, 4.0], vec![4.0, 4.0, 0.0]],
    ///);
    ///let tree = Upgma::default_params(&table).cluster().unwrap();
    ///assert_eq!("(C:2,(A:1,B:1):1);", tree.to_newick(6));
    /// ```
    pub fn cluster(&self) -> Result<Dendrogram<T>, UpgmaError> {
        self.cluster_with(&SoloCommunicator)
    }

    /// Clusters the taxa on `params.n_workers()` workers, each running on its own thread with its
    /// own replica of the clustering state.
    ///
    /// # Returns
    /// * A result that, if successful, contains the root worker's dendrogram. Besides the input
    ///   errors of `Upgma::cluster`, an error is returned if any worker fails, or if the workers'
    ///   replicas finish with different merge sequences.
    ///
    /// # Examples
    /// ```
    ///use upgma::{DistanceTable, Upgma, UpgmaParams};
    ///
    ///let table = DistanceTable::from_matrix(
    ///    &["A", "B", "C"],
    ///    &[vec![0.0, 2.0, 4.0], vec![2.0, 0.0, 4.0], vec![4.0, 4.0, 0.0]],
    ///);
    ///let params = UpgmaParams::builder().n_workers(3).build();
    ///let tree = Upgma::new(&table, params).cluster_distributed().unwrap();
    ///assert_eq!("(C:2,(A:1,B:1):1);", tree.to_newick(6));
    /// ```
    pub fn cluster_distributed(&self) -> Result<Dendrogram<T>, UpgmaError> {
        let group = WorkerGroup::new(self.hp.n_workers);
        let replicas = group.run(|comm: &ChannelCommunicator<T>| self.cluster_with(comm))?;
        Self::check_replicas(replicas)
    }

    /// Runs this worker's share of a clustering on any communicator. Every rank of the group must
    /// call this with the same model.
    ///
    /// # Returns
    /// * This rank's replica of the dendrogram.
    pub fn cluster_with<C>(&self, comm: &C) -> Result<Dendrogram<T>, UpgmaError>
    where
        C: Communicator<T>,
    {
        // Every rank validates the same input, so every rank fails here together
        DataValidator::new(&self.source).validate_input_data()?;
        self.run(comm).map_err(|err| {
            if !err.is_secondary() {
                comm.abort(&err.to_string());
            }
            err
        })
    }

    fn run<C: Communicator<T>>(&self, comm: &C) -> Result<Dendrogram<T>, UpgmaError> {
        let n_taxa = self.source.len();
        if comm.is_root() {
            info!("Clustering {n_taxa} taxa on {} worker(s)", comm.size());
        }
        let matrix = DistanceMatrixBuilder::new(&self.source, &self.hp).build(comm)?;
        let mut state = ClusterState::new(&self.source.names(), matrix)?;

        let reducer = PartitionedMinReducer::new(comm, self.hp.partition);
        while state.n_active() > 1 {
            let best = reducer
                .reduce(&state)?
                .ok_or(UpgmaError::EmptyReduction(comm.rank()))?;
            let k = MergeCoordinator::apply(&mut state, &best);
            if comm.is_root() {
                debug!(
                    "Merged {} and {} at distance {} into {k}",
                    best.left,
                    best.right,
                    best.distance.to_f64().unwrap_or(f64::NAN)
                );
            }
        }

        let dendrogram = state.into_dendrogram()?;
        if comm.is_root() {
            info!("Finished {} merges", dendrogram.merges().len());
        }
        Ok(dendrogram)
    }

    fn check_replicas(replicas: Vec<Dendrogram<T>>) -> Result<Dendrogram<T>, UpgmaError> {
        let mut replicas = replicas.into_iter().enumerate();
        let (_, root) = replicas.next().ok_or(UpgmaError::EmptyDataset)?;
        for (rank, replica) in replicas {
            if replica.merges() != root.merges() {
                return Err(UpgmaError::ReplicaDivergence(rank));
            }
        }
        Ok(root)
    }
}
