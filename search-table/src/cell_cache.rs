use crate::{Dataset, fold_case};
use std::time::Instant;
use tracing::debug;

/// Verbatim and case-folded mirrors of a [`Dataset`]'s cells.
///
/// Built once per dataset and read by every search until the dataset is
/// replaced. There is no incremental update path: a new dataset means a new
/// cache.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CellCache {
    verbatim: Vec<Vec<String>>,
    lower: Vec<Vec<String>>,
    column_count: usize,
}

impl CellCache {
    pub fn build(dataset: &Dataset) -> Self {
        let start = Instant::now();
        let column_count = dataset.column_count();
        let verbatim: Vec<Vec<String>> = dataset.rows().to_vec();
        let lower = verbatim
            .iter()
            .map(|cells| cells.iter().map(|cell| fold_case(cell)).collect())
            .collect();
        debug!(
            "Cell cache built: {} rows x {} columns, time: {:?}",
            verbatim.len(),
            column_count,
            start.elapsed()
        );
        Self {
            verbatim,
            lower,
            column_count,
        }
    }

    pub fn verbatim(&self) -> &[Vec<String>] {
        &self.verbatim
    }

    pub fn lower(&self) -> &[Vec<String>] {
        &self.lower
    }

    pub fn verbatim_row(&self, index: usize) -> Option<&[String]> {
        self.verbatim.get(index).map(Vec::as_slice)
    }

    /// The row as the matcher should see it: verbatim when matching is case
    /// sensitive, folded otherwise.
    pub fn row(&self, index: usize, case_sensitive: bool) -> Option<&[String]> {
        let rows = if case_sensitive {
            &self.verbatim
        } else {
            &self.lower
        };
        rows.get(index).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.verbatim.len()
    }

    pub fn is_empty(&self) -> bool {
        self.verbatim.is_empty()
    }

    pub fn column_count(&self) -> usize {
        self.column_count
    }

    /// Every column index, in order. Used whenever no restriction applies.
    pub fn all_columns(&self) -> Vec<usize> {
        (0..self.column_count).collect()
    }
}
