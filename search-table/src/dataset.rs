use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

/// Where a column came from when datasets are combined for comparison.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ColumnOrigin {
    #[default]
    Single,
    Reference,
    Comparison,
}

impl ColumnOrigin {
    fn key_prefix(self) -> &'static str {
        match self {
            ColumnOrigin::Single => "col",
            ColumnOrigin::Reference => "ref",
            ColumnOrigin::Comparison => "cmp",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    /// Stable identifier used by persisted selections and UI toggles.
    pub key: String,
    /// Text shown in headers and in match summaries.
    pub label: String,
    pub origin: ColumnOrigin,
}

impl Column {
    pub fn new(key: impl Into<String>, label: impl Into<String>, origin: ColumnOrigin) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            origin,
        }
    }
}

/// Label used for a column without a usable header. `index` is zero based.
pub fn fallback_label(index: usize) -> String {
    format!("Column {}", index + 1)
}

/// Rows of string cells plus per-column metadata.
///
/// Every row has exactly `columns.len()` cells; constructors pad short rows
/// with empty strings and cut long ones. The search engine only ever reads a
/// dataset, through a [`crate::CellCache`] built from it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawDataset")]
pub struct Dataset {
    columns: Vec<Column>,
    rows: Vec<Vec<String>>,
}

// Wire shape of a dataset. Decoding goes through `Dataset::new` so rows are
// fitted to the column count like every other constructor.
#[derive(Deserialize)]
struct RawDataset {
    #[serde(default)]
    columns: Vec<Column>,
    #[serde(default)]
    rows: Vec<Vec<String>>,
}

impl From<RawDataset> for Dataset {
    fn from(RawDataset { columns, rows }: RawDataset) -> Self {
        Dataset::new(columns, rows)
    }
}

impl Dataset {
    pub fn new(columns: Vec<Column>, rows: Vec<Vec<String>>) -> Self {
        let width = columns.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, String::new());
                row
            })
            .collect();
        Self { columns, rows }
    }

    /// Builds a dataset from decoded records.
    ///
    /// Header labels are trimmed, blank ones replaced by `Column N` and
    /// duplicates suffixed with ` (2)`, ` (3)`, ... When `headers` is empty,
    /// the first record is used as the header row. Missing cells (`None`)
    /// become empty strings. Without any header the dataset is empty.
    pub fn from_records<H, S>(headers: Vec<H>, records: Vec<Vec<Option<S>>>) -> Self
    where
        H: AsRef<str>,
        S: Into<String>,
    {
        let mut records = records.into_iter();
        let header_text: Vec<String> = if headers.is_empty() {
            match records.next() {
                Some(first) => first.into_iter().map(cell_text).collect(),
                None => Vec::new(),
            }
        } else {
            headers.iter().map(|h| h.as_ref().to_string()).collect()
        };

        if header_text.is_empty() {
            return Self::default();
        }

        let columns: Vec<Column> = normalize_headers(&header_text)
            .into_iter()
            .map(|label| {
                Column::new(
                    format!("{}.{label}", ColumnOrigin::Single.key_prefix()),
                    label,
                    ColumnOrigin::Single,
                )
            })
            .collect();

        let rows: Vec<Vec<String>> = records
            .map(|record| record.into_iter().map(cell_text).collect())
            .collect();

        Self::new(columns, rows)
    }

    /// Places `reference` and `comparison` next to each other row by row.
    ///
    /// Columns are relabelled `ref.<label>` / `cmp.<label>` (label and key
    /// are the same string) and tagged with their origin. The result has as
    /// many rows as the longer input; the shorter side is padded with empty
    /// cells.
    pub fn side_by_side(reference: &Dataset, comparison: &Dataset) -> Self {
        let prefixed = |dataset: &Dataset, origin: ColumnOrigin| {
            dataset
                .columns
                .iter()
                .map(move |column| {
                    let label = format!("{}.{}", origin.key_prefix(), column.label);
                    Column::new(label.clone(), label, origin)
                })
                .collect::<Vec<_>>()
        };
        let mut columns = prefixed(reference, ColumnOrigin::Reference);
        columns.extend(prefixed(comparison, ColumnOrigin::Comparison));

        let total = reference.len().max(comparison.len());
        let rows = (0..total)
            .map(|index| {
                let mut row = Vec::with_capacity(columns.len());
                for side in [reference, comparison] {
                    match side.row(index) {
                        Some(cells) => row.extend(cells.iter().cloned()),
                        None => row.resize(row.len() + side.column_count(), String::new()),
                    }
                }
                row
            })
            .collect();

        Self::new(columns, rows)
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn row(&self, index: usize) -> Option<&[String]> {
        self.rows.get(index).map(Vec::as_slice)
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, key: &str) -> Option<usize> {
        self.columns.iter().position(|column| column.key == key)
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|column| column.label.as_str())
    }
}

fn cell_text<S: Into<String>>(cell: Option<S>) -> String {
    cell.map(Into::into).unwrap_or_default()
}

fn normalize_headers(headers: &[String]) -> Vec<String> {
    let mut seen: HashMap<String, usize> = HashMap::new();
    headers
        .iter()
        .enumerate()
        .map(|(index, header)| {
            let trimmed = header.trim();
            let base = if trimmed.is_empty() {
                fallback_label(index)
            } else {
                trimmed.to_string()
            };
            let count = seen.entry(base.clone()).or_insert(0);
            *count += 1;
            if *count == 1 {
                base
            } else {
                format!("{base} ({count})")
            }
        })
        .collect()
}
