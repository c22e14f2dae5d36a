use crate::UpgmaError;
use num_traits::Float;

/// A symmetric distance matrix indexed by cluster id. Only the strictly lower triangle is stored,
/// so `D[i][j] == D[j][i]` holds by construction: row `i` holds the distances from cluster `i`
/// to every cluster with a lower id.
///
/// The id space grows by one row per merge, from `n` leaves up to `2n - 1` clusters. Rows of
/// clusters that have been merged away are released and can no longer be read.
#[derive(Debug, Clone, PartialEq)]
pub struct DistanceMatrix<T> {
    rows: Vec<Vec<T>>,
    retired: Vec<bool>,
}

impl<T: Float> DistanceMatrix<T> {
    pub(crate) fn from_lower_rows(rows: Vec<Vec<T>>) -> Result<Self, UpgmaError> {
        if let Some((i, row)) = rows.iter().enumerate().find(|(i, row)| row.len() != *i) {
            return Err(UpgmaError::WrongDimension(format!(
                "Row {i} of the lower triangle should hold {i} distances, not {}",
                row.len()
            )));
        }
        let retired = vec![false; rows.len()];
        Ok(DistanceMatrix { rows, retired })
    }

    /// The number of cluster ids allocated so far, merged ones included.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// The distance between clusters `a` and `b`, or `None` if either is out of range or has
    /// been merged away.
    pub fn get(&self, a: usize, b: usize) -> Option<T> {
        if a >= self.len() || b >= self.len() || self.retired[a] || self.retired[b] {
            return None;
        }
        Some(self.distance(a, b))
    }

    pub(crate) fn distance(&self, a: usize, b: usize) -> T {
        match a.cmp(&b) {
            std::cmp::Ordering::Equal => T::zero(),
            std::cmp::Ordering::Greater => self.rows[a][b],
            std::cmp::Ordering::Less => self.rows[b][a],
        }
    }

    /// Appends the row of a new cluster, which takes the next id.
    pub(crate) fn push_row(&mut self, row: Vec<T>) -> usize {
        debug_assert_eq!(row.len(), self.rows.len());
        self.rows.push(row);
        self.retired.push(false);
        self.rows.len() - 1
    }

    /// Releases the row of a cluster that has been merged into another.
    pub(crate) fn retire(&mut self, id: usize) {
        self.rows[id] = Vec::new();
        self.retired[id] = true;
    }
}
