use anyhow::Result;
use search_cancel::{CancellationToken, SearchVersion};
use search_table::{
    CellCache, Column, ColumnSelection, Dataset, HighlightBuilder, MarkStyle, SearchOptions,
    evaluate, extract_keywords, operand_values, tokenize,
};
use serde::Serialize;
use std::time::Instant;
use tracing::{debug, info};

/// Header of the extra trailing column shown in comparison mode.
pub const MATCHES_COLUMN_LABEL: &str = "Keywords found";

/// One row of a search result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResultRow {
    /// Position of the row in the dataset.
    pub index: usize,
    /// Verbatim cells, plus the summary cell when the matches column is on.
    pub cells: Vec<String>,
    /// Same length as `cells`. `None` means the cell had no match and is
    /// rendered with [`MarkStyle::render_unmarked`].
    pub highlights: Vec<Option<String>>,
    pub summary: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchOutcome {
    /// `None` when a newer search superseded this one.
    pub rows: Option<Vec<ResultRow>>,
    pub operands: Vec<String>,
}

/// Everything needed to answer queries over one loaded dataset.
///
/// The session owns the dataset and its cell cache, so the two are always
/// replaced together. The column restriction is stored as keys and
/// re-resolved whenever the dataset changes.
pub struct SearchSession {
    dataset: Dataset,
    cache: CellCache,
    selected_keys: Vec<String>,
    selection: ColumnSelection,
    options: SearchOptions,
    style: MarkStyle,
    include_matches_column: bool,
    reference_keywords: Vec<String>,
    version: SearchVersion,
}

impl SearchSession {
    pub fn new(dataset: Dataset) -> Self {
        let cache = CellCache::build(&dataset);
        Self {
            dataset,
            cache,
            selected_keys: Vec::new(),
            selection: ColumnSelection::All,
            options: SearchOptions::default(),
            style: MarkStyle::default(),
            include_matches_column: false,
            reference_keywords: Vec::new(),
            version: SearchVersion::new(),
        }
    }

    /// Session over `reference` and `comparison` placed side by side, with
    /// the "keywords found" column enabled.
    pub fn comparison(reference: &Dataset, comparison: &Dataset) -> Self {
        let mut session = Self::new(Dataset::side_by_side(reference, comparison));
        session.include_matches_column = true;
        session.reference_keywords = extract_keywords(reference.rows().iter().flatten());
        info!(
            "Comparison loaded: {} reference keywords, {} rows",
            session.reference_keywords.len(),
            session.dataset.len()
        );
        session
    }

    /// Swaps in a new dataset. The cache is rebuilt and the stored column
    /// keys are resolved again; keys the new dataset lacks are ignored.
    /// Reference keywords belong to the previous comparison and are cleared.
    pub fn replace_dataset(&mut self, dataset: Dataset, include_matches_column: bool) {
        self.cache = CellCache::build(&dataset);
        self.dataset = dataset;
        self.include_matches_column = include_matches_column;
        self.reference_keywords.clear();
        self.resolve_selection();
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn columns(&self) -> &[Column] {
        self.dataset.columns()
    }

    pub fn options(&self) -> SearchOptions {
        self.options
    }

    pub fn set_options(&mut self, options: SearchOptions) {
        self.options = options;
    }

    pub fn set_style(&mut self, style: MarkStyle) {
        self.style = style;
    }

    pub fn selection(&self) -> &ColumnSelection {
        &self.selection
    }

    pub fn reference_keywords(&self) -> &[String] {
        &self.reference_keywords
    }

    /// Restricts matching to the columns named by `keys`. An empty list
    /// clears the restriction.
    pub fn set_selection_keys<S: AsRef<str>>(&mut self, keys: impl IntoIterator<Item = S>) {
        self.selected_keys = keys.into_iter().map(|key| key.as_ref().to_string()).collect();
        self.resolve_selection();
    }

    /// Ticks or unticks the column with `key`. Returns `false` for an
    /// unknown key.
    pub fn toggle_column(&mut self, key: &str, on: bool) -> bool {
        let Some(index) = self.dataset.column_index(key) else {
            return false;
        };
        self.selection.toggle(index, on, self.dataset.column_count());
        self.selected_keys = self.selection.keys(self.dataset.columns());
        true
    }

    fn resolve_selection(&mut self) {
        self.selection = ColumnSelection::from_keys(&self.selected_keys, self.dataset.columns());
        debug!(
            "Column selection: {}",
            self.selection.describe(self.dataset.columns())
        );
    }

    /// Column headers as displayed, including the matches column when on.
    pub fn headers(&self) -> Vec<String> {
        let mut headers: Vec<String> = self.dataset.labels().map(str::to_string).collect();
        if self.include_matches_column {
            headers.push(MATCHES_COLUMN_LABEL.to_string());
        }
        headers
    }

    /// Handle for callers that issue searches from another thread.
    pub fn version(&self) -> SearchVersion {
        self.version.clone()
    }

    /// Starts a new search generation, cancelling any search still running.
    pub fn begin(&self) -> CancellationToken {
        self.version.bump()
    }

    pub fn search(&self, query: &str) -> Result<SearchOutcome> {
        self.search_with_token(query, &self.begin())
    }

    /// Runs `query` through the full pipeline. A blank query returns every
    /// row without highlights.
    pub fn search_with_token(&self, query: &str, token: &CancellationToken) -> Result<SearchOutcome> {
        let start = Instant::now();
        let query = query.trim();
        let tokens = tokenize(query);
        let operands: Vec<String> = operand_values(&tokens)
            .into_iter()
            .map(str::to_string)
            .collect();
        let indexes = evaluate(&self.cache, &tokens, &self.options, &self.selection)?;

        if token.is_cancelled() {
            info!("Search {} was cancelled", token.version());
            return Ok(SearchOutcome {
                rows: None,
                operands,
            });
        }

        let restriction = match &self.selection {
            ColumnSelection::All => Vec::new(),
            selection => selection.indexes(self.dataset.column_count()),
        };
        let builder =
            HighlightBuilder::new(&self.cache, self.dataset.columns()).with_style(self.style.clone());
        let rows: Vec<ResultRow> = indexes
            .into_iter()
            .filter_map(|index| {
                let cells = self.dataset.row(index)?.to_vec();
                Some(if operands.is_empty() {
                    self.plain_row(index, cells)
                } else {
                    let highlights = builder.build(index, &operands, &self.options, &restriction);
                    self.result_row(index, cells, highlights.highlights, highlights.summary)
                })
            })
            .collect();

        info!(
            "Search {:?} matched {} of {} rows, time: {:?}",
            query,
            rows.len(),
            self.dataset.len(),
            start.elapsed()
        );
        Ok(SearchOutcome {
            rows: token.guard(rows),
            operands,
        })
    }

    fn plain_row(&self, index: usize, cells: Vec<String>) -> ResultRow {
        let highlights = vec![None; cells.len()];
        self.result_row(index, cells, highlights, String::new())
    }

    fn result_row(
        &self,
        index: usize,
        mut cells: Vec<String>,
        mut highlights: Vec<Option<String>>,
        summary: String,
    ) -> ResultRow {
        if self.include_matches_column {
            cells.push(summary.clone());
            highlights.push(None);
        }
        ResultRow {
            index,
            cells,
            highlights,
            summary,
        }
    }
}
