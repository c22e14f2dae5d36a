use super::calc_row;
use crate::upgma::MatrixSource;
use num_traits::Float;
use std::ops::Range;

// Unused when the rayon calculator is compiled in
#[cfg_attr(feature = "parallel", allow(dead_code))]
pub(crate) struct RowCalculator<'a, T> {
    source: &'a MatrixSource<'a, T>,
    undefined: T,
}

#[cfg_attr(feature = "parallel", allow(dead_code))]
impl<'a, T: Float> RowCalculator<'a, T> {
    pub(crate) fn new(source: &'a MatrixSource<'a, T>, undefined: T) -> Self {
        Self { source, undefined }
    }

    pub(crate) fn calc_rows(&self, rows: Range<usize>) -> Vec<(usize, Vec<T>)> {
        rows.map(|i| (i, calc_row(self.source, i, self.undefined)))
            .collect()
    }
}
