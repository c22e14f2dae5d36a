#![cfg(feature = "parallel")]
use super::calc_row;
use crate::upgma::MatrixSource;
use num_traits::Float;
use rayon::prelude::*;
use std::ops::Range;

pub(crate) struct RowCalculatorPar<'a, T> {
    source: &'a MatrixSource<'a, T>,
    undefined: T,
}

impl<'a, T: Float + Send + Sync> RowCalculatorPar<'a, T> {
    pub(crate) fn new(source: &'a MatrixSource<'a, T>, undefined: T) -> Self {
        Self { source, undefined }
    }

    pub(crate) fn calc_rows(&self, rows: Range<usize>) -> Vec<(usize, Vec<T>)> {
        rows.into_par_iter()
            .map(|i| (i, calc_row(self.source, i, self.undefined)))
            .collect()
    }
}
