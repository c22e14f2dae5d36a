use super::{missing_root_rows, Communicator, ROOT_RANK};
use crate::data_wrappers::MergeCandidate;
use crate::UpgmaError;
use log::debug;

/// A group of one. Every collective is the identity, which makes a run on this communicator the
/// sequential reference that distributed runs must reproduce.
#[derive(Debug, Default, Clone, Copy)]
pub struct SoloCommunicator;

impl<T> Communicator<T> for SoloCommunicator {
    fn rank(&self) -> usize {
        ROOT_RANK
    }

    fn size(&self) -> usize {
        1
    }

    fn gather_rows(
        &self,
        mut own: Vec<(usize, Vec<T>)>,
        n_rows: usize,
    ) -> Result<Option<Vec<Vec<T>>>, UpgmaError> {
        if own.len() != n_rows {
            return Err(UpgmaError::WrongDimension(format!(
                "expected {n_rows} rows, computed {}",
                own.len()
            )));
        }
        own.sort_by_key(|(index, _)| *index);
        Ok(Some(own.into_iter().map(|(_, values)| values).collect()))
    }

    fn broadcast_rows(&self, rows: Option<Vec<Vec<T>>>) -> Result<Vec<Vec<T>>, UpgmaError> {
        rows.ok_or_else(|| missing_root_rows(ROOT_RANK))
    }

    fn all_reduce_min(
        &self,
        local: Option<MergeCandidate<T>>,
    ) -> Result<Option<MergeCandidate<T>>, UpgmaError> {
        Ok(local)
    }

    fn abort(&self, reason: &str) {
        debug!("Aborting single worker run: {reason}");
    }
}
