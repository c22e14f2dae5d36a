use crate::distance::UNDEFINED_DISTANCE;
use crate::partition::PartitionPolicy;
use log::warn;

// Defaults for parameters
const N_WORKERS_DEFAULT: usize = 1;
const PARTITION_POLICY_DEFAULT: PartitionPolicy = PartitionPolicy::RemainderFirst;
const UNDEFINED_DISTANCE_DEFAULT: f64 = UNDEFINED_DISTANCE;
const PRECISION_DEFAULT: usize = 6;

// Valid minimums/left bounds of parameters
const N_WORKERS_MINIMUM: usize = 1;

/// A wrapper around the parameters of a UPGMA run. Use `Upgma::default_params()` to build a
/// model with the defaults, or `UpgmaParams::builder()` to tune them.
#[derive(Debug, Clone, PartialEq)]
pub struct UpgmaParams {
    pub(crate) n_workers: usize,
    pub(crate) partition: PartitionPolicy,
    pub(crate) undefined_distance: f64,
    pub(crate) precision: usize,
}

/// Builder object to set custom parameters.
pub struct ParamBuilder {
    n_workers: Option<usize>,
    partition: Option<PartitionPolicy>,
    undefined_distance: Option<f64>,
    precision: Option<usize>,
}

impl Default for UpgmaParams {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl UpgmaParams {
    /// Enters the builder pattern, allowing custom parameters to be set using various setter
    /// methods.
    ///
    /// # Returns
    /// * the parameter configuration builder
    pub fn builder() -> ParamBuilder {
        ParamBuilder {
            n_workers: None,
            partition: None,
            undefined_distance: None,
            precision: None,
        }
    }

    pub fn n_workers(&self) -> usize {
        self.n_workers
    }

    pub fn precision(&self) -> usize {
        self.precision
    }
}

impl ParamBuilder {
    /// Sets the number of cooperating workers for a distributed run. Each worker keeps its own
    /// replica of the clustering state. Defaults to 1.
    ///
    /// # Parameters
    /// * n_workers - the number of workers
    ///
    /// # Returns
    /// * the parameter configuration builder
    pub fn n_workers(mut self, n_workers: usize) -> ParamBuilder {
        let valid_n_workers =
            ParamBuilder::validate_input_left_bound(n_workers, N_WORKERS_MINIMUM, "n_workers");
        self.n_workers = Some(valid_n_workers);
        self
    }

    /// Sets how rows are divided between workers, both when building the distance matrix and
    /// when scanning for the closest pair. Results do not depend on it, but the amount of work
    /// and messages per worker does. Defaults to `PartitionPolicy::RemainderFirst`.
    pub fn partition(mut self, partition: PartitionPolicy) -> ParamBuilder {
        self.partition = Some(partition);
        self
    }

    /// Sets the finite value that undefined pairwise distances (`N/A` entries, or sequences with
    /// no valid comparison) are replaced with before clustering. Defaults to 1,000,000.
    pub fn undefined_distance(mut self, undefined_distance: f64) -> ParamBuilder {
        if undefined_distance.is_finite() && undefined_distance >= 0.0 {
            self.undefined_distance = Some(undefined_distance);
        } else {
            warn!(
                "undefined_distance ({undefined_distance}) must be finite and non-negative. \
                Set to {UNDEFINED_DISTANCE_DEFAULT}."
            );
        }
        self
    }

    /// Sets the number of decimals branch lengths are printed with in Newick output. Trailing
    /// zeros are trimmed. Defaults to 6.
    pub fn precision(mut self, precision: usize) -> ParamBuilder {
        self.precision = Some(precision);
        self
    }

    /// Finishes the building of the parameter configuration.
    ///
    /// # Returns
    /// * The completed UPGMA parameter configuration.
    pub fn build(self) -> UpgmaParams {
        UpgmaParams {
            n_workers: self.n_workers.unwrap_or(N_WORKERS_DEFAULT),
            partition: self.partition.unwrap_or(PARTITION_POLICY_DEFAULT),
            undefined_distance: self.undefined_distance.unwrap_or(UNDEFINED_DISTANCE_DEFAULT),
            precision: self.precision.unwrap_or(PRECISION_DEFAULT),
        }
    }

    fn validate_input_left_bound(input_param: usize, left_bound: usize, param: &str) -> usize {
        if input_param < left_bound {
            warn!("{param} ({input_param}) cannot be lower than {left_bound}. Set to {left_bound}.");
            left_bound
        } else {
            input_param
        }
    }
}
