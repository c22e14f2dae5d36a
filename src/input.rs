use crate::distance::jukes_cantor;
use crate::UpgmaError;
use num_traits::Float;
use std::fmt::{Display, Formatter};

const UNDEFINED_TOKEN: &str = "N/A";

/// A named, aligned symbol sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sequence {
    pub name: String,
    pub symbols: Vec<u8>,
}

impl Sequence {
    pub fn new(name: &str, symbols: &str) -> Self {
        Sequence {
            name: name.to_string(),
            symbols: symbols.as_bytes().to_vec(),
        }
    }
}

/// A named square table of pairwise distances. `None` entries are undefined distances.
#[derive(Debug, Clone, PartialEq)]
pub struct DistanceTable<T> {
    pub names: Vec<String>,
    pub rows: Vec<Vec<Option<T>>>,
}

impl<T: Float> DistanceTable<T> {
    /// Builds a fully defined table from a list of names and a square matrix.
    pub fn from_matrix(names: &[&str], matrix: &[Vec<T>]) -> Self {
        DistanceTable {
            names: names.iter().map(|name| name.to_string()).collect(),
            rows: matrix
                .iter()
                .map(|row| row.iter().copied().map(Some).collect())
                .collect(),
        }
    }

    /// Computes the Jukes-Cantor distance table of a set of aligned sequences.
    pub fn from_sequences(sequences: &[Sequence]) -> Self {
        let n = sequences.len();
        let mut rows = vec![vec![Some(T::zero()); n]; n];
        for i in 0..n {
            for j in (i + 1)..n {
                let dist = jukes_cantor(&sequences[i].symbols, &sequences[j].symbols);
                rows[i][j] = dist;
                rows[j][i] = dist;
            }
        }
        DistanceTable {
            names: sequences.iter().map(|seq| seq.name.clone()).collect(),
            rows,
        }
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl<T: Float> Display for DistanceTable<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for (name, row) in self.names.iter().zip(&self.rows) {
            write!(f, "{name:>10} ")?;
            for entry in row {
                match entry.and_then(|dist| dist.to_f64()) {
                    Some(dist) => write!(f, "{dist:>8.4}")?,
                    None => write!(f, "{UNDEFINED_TOKEN:>8}")?,
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Reads a whitespace delimited distance table. Each row is a taxon name followed by its
/// distances, and an `N/A` token (in any case) marks an undefined distance. The first line may
/// instead hold just the number of taxa, in which case the number of rows must match it.
///
/// # Returns
/// * The parsed table, or an error naming the offending line if a distance cannot be parsed, a
///   row has no distances, or the row count does not match the declared count. Squareness and
///   symmetry are checked later, before clustering.
pub fn read_distance_table<T: Float>(text: &str) -> Result<DistanceTable<T>, UpgmaError> {
    let mut lines = text
        .lines()
        .enumerate()
        .map(|(n, line)| (n + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty())
        .peekable();

    let declared_count = match lines.peek() {
        None => return Err(UpgmaError::EmptyDataset),
        Some((_, line)) => parse_count_line(line),
    };
    if declared_count.is_some() {
        lines.next();
    }

    let mut names = Vec::new();
    let mut rows = Vec::new();
    for (line_no, line) in lines {
        let mut tokens = line.split_whitespace();
        let name = tokens.next().ok_or_else(|| UpgmaError::MalformedRow {
            line: line_no,
            msg: String::from("missing taxon name"),
        })?;
        let row = tokens
            .map(|token| parse_distance(token, line_no))
            .collect::<Result<Vec<_>, _>>()?;
        if row.is_empty() {
            return Err(UpgmaError::MalformedRow {
                line: line_no,
                msg: format!("taxon '{name}' has no distances"),
            });
        }
        names.push(name.to_string());
        rows.push(row);
    }

    match declared_count {
        Some(count) if count != names.len() => Err(UpgmaError::WrongDimension(format!(
            "header declares {count} taxa, but {} rows were found",
            names.len()
        ))),
        _ if names.is_empty() => Err(UpgmaError::EmptyDataset),
        _ => Ok(DistanceTable { names, rows }),
    }
}

fn parse_count_line(line: &str) -> Option<usize> {
    let mut tokens = line.split_whitespace();
    match (tokens.next(), tokens.next()) {
        (Some(token), None) => token.parse().ok(),
        _ => None,
    }
}

fn parse_distance<T: Float>(token: &str, line: usize) -> Result<Option<T>, UpgmaError> {
    if token.eq_ignore_ascii_case(UNDEFINED_TOKEN) {
        return Ok(None);
    }
    token
        .parse::<f64>()
        .ok()
        .and_then(T::from)
        .map(Some)
        .ok_or_else(|| UpgmaError::InvalidNumber {
            line,
            token: token.to_string(),
        })
}

/// Reads sequence input: a header line `<numSequences> <sequenceLength>` followed by one
/// `<name> <symbols>` line per sequence. Lines past the declared number of sequences are
/// ignored.
pub fn read_sequences(text: &str) -> Result<Vec<Sequence>, UpgmaError> {
    let mut lines = text
        .lines()
        .enumerate()
        .map(|(n, line)| (n + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty());

    let (_, header) = lines.next().ok_or(UpgmaError::EmptyDataset)?;
    let header_tokens: Vec<&str> = header.split_whitespace().collect();
    if header_tokens.len() < 2 {
        return Err(UpgmaError::InvalidHeader(format!(
            "expected '<numSequences> <sequenceLength>', found '{header}'"
        )));
    }
    let n_sequences: usize = header_tokens[0].parse().map_err(|_| {
        UpgmaError::InvalidHeader(format!("invalid sequence count '{}'", header_tokens[0]))
    })?;
    let length: usize = header_tokens[1].parse().map_err(|_| {
        UpgmaError::InvalidHeader(format!("invalid sequence length '{}'", header_tokens[1]))
    })?;
    if n_sequences == 0 {
        return Err(UpgmaError::EmptyDataset);
    }

    let mut sequences = Vec::with_capacity(n_sequences);
    for (line_no, line) in lines.take(n_sequences) {
        let mut tokens = line.split_whitespace();
        let (name, symbols) = match (tokens.next(), tokens.next()) {
            (Some(name), Some(symbols)) => (name, symbols),
            _ => {
                return Err(UpgmaError::MalformedRow {
                    line: line_no,
                    msg: String::from("expected '<name> <symbols>'"),
                })
            }
        };
        if symbols.len() != length {
            return Err(UpgmaError::WrongDimension(format!(
                "sequence '{name}' on line {line_no} has length {}, header declares {length}",
                symbols.len()
            )));
        }
        sequences.push(Sequence::new(name, symbols));
    }

    if sequences.len() < n_sequences {
        return Err(UpgmaError::MissingSequences {
            expected: n_sequences,
            found: sequences.len(),
        });
    }
    Ok(sequences)
}

/// Renders sequences in the layout `read_sequences` accepts, with the header taken from the
/// first sequence's length.
pub fn write_sequences(sequences: &[Sequence]) -> String {
    let length = sequences.first().map_or(0, |seq| seq.symbols.len());
    let mut out = format!("{} {length}\n", sequences.len());
    for seq in sequences {
        out.push_str(&format!(
            "{:<10} {}\n",
            seq.name,
            String::from_utf8_lossy(&seq.symbols)
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_table_with_count_and_na() {
        let text = "3\nA 0 1.5 n/a\nB 1.5 0 2\n\nC N/A 2 0\n";
        let table: DistanceTable<f64> = read_distance_table(text).unwrap();
        assert_eq!(vec!["A", "B", "C"], table.names);
        assert_eq!(vec![Some(0.0), Some(1.5), None], table.rows[0]);
        assert_eq!(vec![None, Some(2.0), Some(0.0)], table.rows[2]);
    }

    #[test]
    fn reads_table_without_count() {
        let table: DistanceTable<f32> = read_distance_table("A 0 1\nB 1 0").unwrap();
        assert_eq!(2, table.len());
    }

    #[test]
    fn rejects_unparsable_distance() {
        let result = read_distance_table::<f64>("A 0 x\nB 1 0");
        assert!(matches!(
            result,
            Err(UpgmaError::InvalidNumber { line: 1, ref token }) if token == "x"
        ));
    }

    #[test]
    fn rejects_count_mismatch_and_empty_input() {
        assert!(matches!(
            read_distance_table::<f64>("3\nA 0 1\nB 1 0"),
            Err(UpgmaError::WrongDimension(_))
        ));
        assert!(matches!(
            read_distance_table::<f64>("  \n"),
            Err(UpgmaError::EmptyDataset)
        ));
        assert!(matches!(
            read_distance_table::<f64>("A\nB 1 0"),
            Err(UpgmaError::MalformedRow { line: 1, .. })
        ));
    }

    #[test]
    fn reads_sequences() {
        let seqs = read_sequences("2 4\nOrg1 ACGT\nOrg2 AC-N\n").unwrap();
        assert_eq!(vec![Sequence::new("Org1", "ACGT"), Sequence::new("Org2", "AC-N")], seqs);
    }

    #[test]
    fn rejects_bad_sequence_input() {
        assert!(matches!(read_sequences(""), Err(UpgmaError::EmptyDataset)));
        assert!(matches!(read_sequences("2\n"), Err(UpgmaError::InvalidHeader(_))));
        assert!(matches!(read_sequences("two 4\n"), Err(UpgmaError::InvalidHeader(_))));
        assert!(matches!(
            read_sequences("3 4\nA ACGT\nB ACGT\n"),
            Err(UpgmaError::MissingSequences { expected: 3, found: 2 })
        ));
        assert!(matches!(
            read_sequences("2 4\nA ACGT\nB\n"),
            Err(UpgmaError::MalformedRow { line: 3, .. })
        ));
        assert!(matches!(
            read_sequences("2 4\nA ACGT\nB ACG\n"),
            Err(UpgmaError::WrongDimension(_))
        ));
    }

    #[test]
    fn prints_undefined_distances_as_na() {
        let seqs = vec![
            Sequence::new("A", "ACGT"),
            Sequence::new("B", "ACGA"),
            Sequence::new("C", "----"),
        ];
        let table: DistanceTable<f64> = DistanceTable::from_sequences(&seqs);
        assert_eq!(None, table.rows[0][2]);
        let printed = table.to_string();
        let lines: Vec<&str> = printed.lines().collect();
        assert_eq!(3, lines.len());
        assert_eq!("         C      N/A     N/A  0.0000", lines[2]);
        assert!(lines[0].starts_with("         A   0.0000  0.3041"));
    }
}
