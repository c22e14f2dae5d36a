use thiserror::Error;

/// Possible errors that arise from malformed input, invalid configuration or a failure of the
/// worker group while clustering.
#[derive(Debug, Error)]
pub enum UpgmaError {
    #[error("The dataset provided is empty")]
    EmptyDataset,
    #[error("Invalid header line: {0}")]
    InvalidHeader(String),
    #[error("Not enough sequences in the input: expected {expected}, found {found}")]
    MissingSequences { expected: usize, found: usize },
    #[error("Malformed row on line {line}: {msg}")]
    MalformedRow { line: usize, msg: String },
    #[error("Invalid distance value '{token}' on line {line}")]
    InvalidNumber { line: usize, token: String },
    #[error("Input has mismatched dimensions: {0}")]
    WrongDimension(String),
    #[error("Invalid distance: {0}")]
    InvalidDistance(String),
    #[error("Distance matrix is not symmetric at ({row}, {col})")]
    AsymmetricMatrix { row: usize, col: usize },
    #[error("Taxon name '{0}' contains whitespace or a character reserved by Newick")]
    InvalidName(String),
    #[error("Taxon name '{0}' appears more than once")]
    DuplicateName(String),
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
    #[error("Malformed Newick string: {0}")]
    MalformedNewick(String),

    #[error("Rank {rank} expected a {expected} message but received a {found} message")]
    CollectiveMismatch {
        rank: usize,
        expected: &'static str,
        found: &'static str,
    },
    #[error("Run aborted by rank {rank}: {reason}")]
    Aborted { rank: usize, reason: String },
    #[error("Rank {0} lost contact with its peers")]
    Disconnected(usize),
    #[error("Worker rank {0} panicked")]
    WorkerPanicked(usize),
    #[error("Failed to start worker rank {rank}: {source}")]
    WorkerSpawn {
        rank: usize,
        #[source]
        source: std::io::Error,
    },
    #[error("Replica on rank {0} diverged from the root's merge sequence")]
    ReplicaDivergence(usize),
    #[error("Rank {0} found no merge candidate while more than one cluster was active")]
    EmptyReduction(usize),
}

impl UpgmaError {
    /// Whether this error is a consequence of another rank failing, rather than a root cause.
    pub fn is_secondary(&self) -> bool {
        matches!(self, UpgmaError::Aborted { .. } | UpgmaError::Disconnected(_))
    }
}
