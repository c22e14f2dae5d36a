use crate::upgma::MatrixSource;
use crate::UpgmaError;
use num_traits::Float;
use std::collections::HashSet;

/// Characters with structural meaning in a Newick string.
const NEWICK_RESERVED: &[char] = &['(', ')', ',', ':', ';', '[', ']', '\''];

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct DataValidator<'a, T> {
    source: &'a MatrixSource<'a, T>,
}

impl<'a, T: Float> DataValidator<'a, T> {
    pub(crate) fn new(source: &'a MatrixSource<'a, T>) -> Self {
        Self { source }
    }

    pub(crate) fn validate_input_data(&self) -> Result<(), UpgmaError> {
        let names = self.source.names();
        if names.is_empty() {
            return Err(UpgmaError::EmptyDataset);
        }
        let mut seen = HashSet::with_capacity(names.len());
        for name in names.iter().copied() {
            if name.is_empty() {
                return Err(UpgmaError::InvalidParameter(String::from(
                    "Taxon names must not be empty",
                )));
            }
            if name.contains(NEWICK_RESERVED) || name.contains(char::is_whitespace) {
                return Err(UpgmaError::InvalidName(name.to_string()));
            }
            if !seen.insert(name) {
                return Err(UpgmaError::DuplicateName(name.to_string()));
            }
        }
        match self.source {
            MatrixSource::Table(table) => self.validate_table(names.len(), &table.rows),
            MatrixSource::Sequences(sequences) => {
                let len_0th = sequences[0].symbols.len();
                for (n, sequence) in sequences.iter().enumerate() {
                    let len_nth = sequence.symbols.len();
                    if len_nth != len_0th {
                        return Err(UpgmaError::WrongDimension(format!(
                            "0th sequence has length {len_0th}, but {n}th has {len_nth}"
                        )));
                    }
                }
                Ok(())
            }
        }
    }

    fn validate_table(&self, n_names: usize, rows: &[Vec<Option<T>>]) -> Result<(), UpgmaError> {
        let n = rows.len();
        if n != n_names {
            return Err(UpgmaError::WrongDimension(format!(
                "Distance table has {n_names} names, but {n} rows"
            )));
        }
        for (i, row) in rows.iter().enumerate() {
            if row.len() != n {
                return Err(UpgmaError::WrongDimension(format!(
                    "Distance table has {n} rows, but row {i} has {} entries",
                    row.len()
                )));
            }
            for (j, entry) in row.iter().enumerate() {
                if let Some(dist) = entry {
                    if !dist.is_finite() || *dist < T::zero() {
                        return Err(UpgmaError::InvalidDistance(format!(
                            "entry ({i}, {j}) must be finite and non-negative"
                        )));
                    }
                }
            }
        }
        for i in 0..n {
            for j in (i + 1)..n {
                let symmetrical = match (rows[i][j], rows[j][i]) {
                    (Some(a), Some(b)) => (a - b).abs() <= T::epsilon(),
                    (None, None) => true,
                    _ => false,
                };
                if !symmetrical {
                    return Err(UpgmaError::AsymmetricMatrix { row: i, col: j });
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{DistanceTable, Sequence};

    fn validate(source: MatrixSource<f64>) -> Result<(), UpgmaError> {
        DataValidator::new(&source).validate_input_data()
    }

    #[test]
    fn accepts_symmetric_table_with_undefined_entries() {
        let table = DistanceTable {
            names: vec![String::from("A"), String::from("B")],
            rows: vec![vec![Some(0.0), None], vec![None, Some(0.0)]],
        };
        assert!(validate(MatrixSource::Table(&table)).is_ok());
    }

    #[test]
    fn rejects_asymmetric_table() {
        let table = DistanceTable::from_matrix(
            &["A", "B", "C"],
            &[vec![0.0, 1.0, 2.0], vec![1.0, 0.0, 3.0], vec![2.0, 3.5, 0.0]],
        );
        assert!(matches!(
            validate(MatrixSource::Table(&table)),
            Err(UpgmaError::AsymmetricMatrix { row: 1, col: 2 })
        ));
    }

    #[test]
    fn rejects_non_square_and_negative_tables() {
        let ragged = DistanceTable::from_matrix(&["A", "B"], &[vec![0.0, 1.0], vec![1.0]]);
        assert!(matches!(
            validate(MatrixSource::Table(&ragged)),
            Err(UpgmaError::WrongDimension(_))
        ));
        let negative = DistanceTable::from_matrix(&["A", "B"], &[vec![0.0, -1.0], vec![-1.0, 0.0]]);
        assert!(matches!(
            validate(MatrixSource::Table(&negative)),
            Err(UpgmaError::InvalidDistance(_))
        ));
    }

    #[test]
    fn rejects_names_newick_cannot_hold() {
        for name in ["A(1)", "B,x", "C:3", "D;", "E F", "'G'", "H[1]"] {
            let sequences = [Sequence::new(name, "ACGT"), Sequence::new("Ok", "ACGT")];
            assert!(
                matches!(
                    validate(MatrixSource::Sequences(&sequences)),
                    Err(UpgmaError::InvalidName(ref bad)) if bad == name
                ),
                "{name}"
            );
        }
        let sequences = [Sequence::new("Homo_sapiens-1.2", "ACGT"), Sequence::new("B", "ACGT")];
        assert!(validate(MatrixSource::Sequences(&sequences)).is_ok());
    }

    #[test]
    fn rejects_duplicate_names_and_uneven_sequences() {
        let duplicated = [Sequence::new("A", "ACGT"), Sequence::new("A", "ACGT")];
        assert!(matches!(
            validate(MatrixSource::Sequences(&duplicated)),
            Err(UpgmaError::DuplicateName(_))
        ));
        let uneven = [Sequence::new("A", "ACGT"), Sequence::new("B", "ACG")];
        assert!(matches!(
            validate(MatrixSource::Sequences(&uneven)),
            Err(UpgmaError::WrongDimension(_))
        ));
        assert!(matches!(
            validate(MatrixSource::Sequences(&[])),
            Err(UpgmaError::EmptyDataset)
        ));
    }
}
