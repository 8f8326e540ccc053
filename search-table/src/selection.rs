use crate::Column;
use hashbrown::HashSet;
use itertools::Itertools;

/// Which columns take part in matching.
///
/// A selection that names every column is stored as [`ColumnSelection::All`]
/// so that "everything ticked" and "nothing restricted" can never drift
/// apart.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ColumnSelection {
    #[default]
    All,
    Only(Vec<usize>),
}

impl ColumnSelection {
    /// Keeps the first occurrence of each in-range index, in the order given.
    pub fn from_indexes(indexes: impl IntoIterator<Item = usize>, column_count: usize) -> Self {
        let mut seen = HashSet::new();
        let kept: Vec<usize> = indexes
            .into_iter()
            .filter(|&index| index < column_count && seen.insert(index))
            .collect();
        Self::normalized(kept, column_count)
    }

    /// Resolves column keys against `columns`. Unknown keys are dropped.
    pub fn from_keys<S: AsRef<str>>(keys: impl IntoIterator<Item = S>, columns: &[Column]) -> Self {
        let indexes = keys.into_iter().filter_map(|key| {
            columns
                .iter()
                .position(|column| column.key == key.as_ref())
        });
        Self::from_indexes(indexes, columns.len())
    }

    fn normalized(indexes: Vec<usize>, column_count: usize) -> Self {
        if indexes.is_empty() || indexes.len() >= column_count {
            ColumnSelection::All
        } else {
            ColumnSelection::Only(indexes)
        }
    }

    pub fn is_all(&self) -> bool {
        matches!(self, ColumnSelection::All)
    }

    /// Column indexes the matcher should visit.
    pub fn indexes(&self, column_count: usize) -> Vec<usize> {
        match self {
            ColumnSelection::All => (0..column_count).collect(),
            ColumnSelection::Only(indexes) => indexes.clone(),
        }
    }

    pub fn contains(&self, index: usize) -> bool {
        match self {
            ColumnSelection::All => true,
            ColumnSelection::Only(indexes) => indexes.contains(&index),
        }
    }

    /// Keys of the restricted columns; empty when nothing is restricted.
    pub fn keys(&self, columns: &[Column]) -> Vec<String> {
        match self {
            ColumnSelection::All => Vec::new(),
            ColumnSelection::Only(indexes) => indexes
                .iter()
                .filter_map(|&index| columns.get(index))
                .map(|column| column.key.clone())
                .collect(),
        }
    }

    /// Ticks or unticks one column. Unticking the last remaining column
    /// falls back to all columns rather than an empty search scope.
    pub fn toggle(&mut self, index: usize, on: bool, column_count: usize) {
        if index >= column_count {
            return;
        }
        let mut current = self.indexes(column_count);
        if on {
            if !current.contains(&index) {
                current.push(index);
            }
        } else {
            current.retain(|&existing| existing != index);
        }
        *self = Self::normalized(current, column_count);
    }

    /// Short human-readable scope: `All`, or up to three labels followed by
    /// `+N` for the rest.
    pub fn describe(&self, columns: &[Column]) -> String {
        let labels: Vec<&str> = match self {
            ColumnSelection::All => Vec::new(),
            ColumnSelection::Only(_) => columns
                .iter()
                .enumerate()
                .filter(|(index, _)| self.contains(*index))
                .map(|(_, column)| column.label.as_str())
                .collect(),
        };
        if labels.is_empty() {
            return "All".to_string();
        }
        let preview = labels.iter().take(3).join(", ");
        match labels.len() {
            0..=3 => preview,
            n => format!("{preview} +{}", n - 3),
        }
    }
}
