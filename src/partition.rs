use std::ops::Range;

/// How rows are split between workers when their count does not divide evenly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PartitionPolicy {
    /// Every worker gets `n / p` rows, and the first `n % p` workers get one extra row each.
    RemainderFirst,
    /// Every worker gets `n / p` rows, and the last worker also takes all `n % p` leftover rows.
    RemainderLast,
}

/// A contiguous block of row positions owned by one worker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkerPartition {
    pub rank: usize,
    pub rows: Range<usize>,
}

impl PartitionPolicy {
    /// Computes the block of `n_rows` owned by `rank` out of `n_workers`. Blocks of all ranks are
    /// disjoint, in rank order, and together cover `0..n_rows`. Ranks may own an empty block when
    /// there are more workers than rows.
    pub fn partition(&self, n_rows: usize, n_workers: usize, rank: usize) -> WorkerPartition {
        let n_workers = n_workers.max(1);
        let base = n_rows / n_workers;
        let remainder = n_rows % n_workers;
        let rows = match self {
            Self::RemainderFirst => {
                let start = rank * base + rank.min(remainder);
                let len = base + usize::from(rank < remainder);
                start..start + len
            }
            Self::RemainderLast => {
                let start = rank * base;
                if rank + 1 == n_workers {
                    start..n_rows
                } else {
                    start..start + base
                }
            }
        };
        WorkerPartition { rank, rows }
    }
}
