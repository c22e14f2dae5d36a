use num_traits::Float;

/// Value that undefined distances are mapped to before clustering, so that the merge arithmetic
/// only ever sees finite, totally ordered values.
pub const UNDEFINED_DISTANCE: f64 = 1_000_000.0;

// Beyond this proportion of differing sites the Jukes-Cantor correction is undefined
const MAX_DIFFERING_PROPORTION: f64 = 0.75;

fn is_nucleotide(symbol: u8) -> bool {
    matches!(symbol, b'A' | b'C' | b'G' | b'T')
}

/// Jukes-Cantor corrected distance between two aligned nucleotide sequences.
///
/// Only positions where both sequences carry one of `A`, `C`, `G` or `T` (case-insensitive) are
/// compared; gaps, ambiguity codes and anything else are skipped.
///
/// # Returns
/// * `None` if no position is comparable, or if the proportion of differing comparable positions
///   is 0.75 or more, where the correction is undefined. Otherwise the corrected distance
///   `-3/4 * ln(1 - 4/3 * p)`.
pub fn jukes_cantor<T: Float>(a: &[u8], b: &[u8]) -> Option<T> {
    let (differences, total) = a
        .iter()
        .zip(b.iter())
        .map(|(x, y)| (x.to_ascii_uppercase(), y.to_ascii_uppercase()))
        .filter(|(x, y)| is_nucleotide(*x) && is_nucleotide(*y))
        .fold((0usize, 0usize), |(diff, total), (x, y)| {
            (diff + usize::from(x != y), total + 1)
        });

    if total == 0 {
        return None;
    }
    if differences == 0 {
        return Some(T::zero());
    }
    let p = differences as f64 / total as f64;
    if p >= MAX_DIFFERING_PROPORTION {
        return None;
    }
    T::from(-0.75 * (1.0 - (4.0 / 3.0) * p).ln())
}
