use crate::comm::Communicator;
use crate::matrix::DistanceMatrix;
use crate::upgma::MatrixSource;
use crate::{UpgmaError, UpgmaParams};
use log::debug;
use num_traits::Float;

#[cfg(feature = "parallel")]
pub(super) mod parallel;
pub(super) mod serial;

/// Builds the base distance matrix cooperatively. Each rank computes the lower-triangle rows of
/// its block, the root gathers them, and the assembled matrix is broadcast to every rank. This is
/// the only time the full matrix crosses between workers.
pub(crate) struct DistanceMatrixBuilder<'a, T> {
    source: &'a MatrixSource<'a, T>,
    hp: &'a UpgmaParams,
}

impl<'a, T: Float + Send + Sync> DistanceMatrixBuilder<'a, T> {
    pub(crate) fn new(source: &'a MatrixSource<'a, T>, hp: &'a UpgmaParams) -> Self {
        Self { source, hp }
    }

    pub(crate) fn build<C>(&self, comm: &C) -> Result<DistanceMatrix<T>, UpgmaError>
    where
        C: Communicator<T>,
    {
        let n_rows = self.source.len();
        let undefined = T::from(self.hp.undefined_distance).ok_or_else(|| {
            UpgmaError::InvalidParameter(format!(
                "undefined distance {} is not representable",
                self.hp.undefined_distance
            ))
        })?;
        let partition = self.hp.partition.partition(n_rows, comm.size(), comm.rank());
        debug!(
            "Rank {} computing rows {:?} of {n_rows}",
            partition.rank, partition.rows
        );

        #[cfg(feature = "parallel")]
        let own =
            parallel::RowCalculatorPar::new(self.source, undefined).calc_rows(partition.rows);
        #[cfg(not(feature = "parallel"))]
        let own = serial::RowCalculator::new(self.source, undefined).calc_rows(partition.rows);

        let gathered = comm.gather_rows(own, n_rows)?;
        let rows = comm.broadcast_rows(gathered)?;
        DistanceMatrix::from_lower_rows(rows)
    }
}

/// The lower-triangle row of taxon `i`: its distances to taxa `0..i`, with undefined distances
/// replaced by `undefined`.
pub(crate) fn calc_row<T: Float>(source: &MatrixSource<'_, T>, i: usize, undefined: T) -> Vec<T> {
    (0..i)
        .map(|j| source.pair_distance(i, j).unwrap_or(undefined))
        .collect()
}
