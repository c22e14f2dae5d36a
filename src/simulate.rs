use crate::{Sequence, UpgmaError};
use log::debug;
use rand::Rng;

const NUCLEOTIDES: [u8; 4] = [b'A', b'T', b'C', b'G'];
const GAP: u8 = b'-';
const AMBIGUOUS: u8 = b'N';

/// Generates random aligned sequences named `Org1`, `Org2`, ... for exercising the clustering
/// on inputs of any size. Each position is independently a gap with probability `gap_prob`, an
/// ambiguous `N` with probability `ambiguous_prob`, and otherwise a uniformly chosen nucleotide.
#[derive(Debug, Clone, PartialEq)]
pub struct SequenceSimulator {
    pub n_sequences: usize,
    pub length: usize,
    pub gap_prob: f64,
    pub ambiguous_prob: f64,
}

impl SequenceSimulator {
    /// A simulator with no gaps and no ambiguous symbols.
    pub fn new(n_sequences: usize, length: usize) -> Self {
        SequenceSimulator {
            n_sequences,
            length,
            gap_prob: 0.0,
            ambiguous_prob: 0.0,
        }
    }

    pub fn gap_prob(mut self, gap_prob: f64) -> Self {
        self.gap_prob = gap_prob;
        self
    }

    pub fn ambiguous_prob(mut self, ambiguous_prob: f64) -> Self {
        self.ambiguous_prob = ambiguous_prob;
        self
    }

    /// Draws the sequences from `rng`.
    ///
    /// # Returns
    /// * The sequences, or `UpgmaError::InvalidParameter` if there would be no sequences, the
    ///   sequences would be empty, or a probability is outside `[0, 1]`.
    ///
    /// # Examples
    /// ```
    ///use rand::rngs::StdRng;
    ///use rand::SeedableRng;
    ///use upgma::SequenceSimulator;
    ///
    ///let mut rng = StdRng::seed_from_u64(7);
    ///let sequences = SequenceSimulator::new(3, 20).generate(&mut rng).unwrap();
    ///assert_eq!("Org3", sequences[2].name);
    ///assert!(sequences.iter().all(|seq| seq.symbols.len() == 20));
    /// ```
    pub fn generate<R: Rng>(&self, rng: &mut R) -> Result<Vec<Sequence>, UpgmaError> {
        self.validate()?;
        debug!(
            "Simulating {} sequences of length {}",
            self.n_sequences, self.length
        );
        let sequences = (1..=self.n_sequences)
            .map(|i| Sequence {
                name: format!("Org{i}"),
                symbols: (0..self.length).map(|_| self.draw_symbol(rng)).collect(),
            })
            .collect();
        Ok(sequences)
    }

    fn draw_symbol<R: Rng>(&self, rng: &mut R) -> u8 {
        let draw: f64 = rng.gen();
        if draw < self.gap_prob {
            GAP
        } else if draw < self.gap_prob + self.ambiguous_prob {
            AMBIGUOUS
        } else {
            NUCLEOTIDES[rng.gen_range(0..NUCLEOTIDES.len())]
        }
    }

    fn validate(&self) -> Result<(), UpgmaError> {
        if self.n_sequences == 0 || self.length == 0 {
            return Err(UpgmaError::InvalidParameter(format!(
                "cannot simulate {} sequences of length {}",
                self.n_sequences, self.length
            )));
        }
        let probs = [
            ("gap_prob", self.gap_prob),
            ("ambiguous_prob", self.ambiguous_prob),
        ];
        for (param, prob) in probs {
            if !(0.0..=1.0).contains(&prob) {
                return Err(UpgmaError::InvalidParameter(format!(
                    "{param} ({prob}) must be between 0 and 1"
                )));
            }
        }
        Ok(())
    }
}
