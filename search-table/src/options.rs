use serde::{Deserialize, Serialize};

/// Matching policy shared by the row matcher, the evaluator and the
/// highlight pass.
///
/// `exact_match` compares whole cells: a cell matches only when it equals
/// the operand after case normalization. Substring containment is used
/// otherwise.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchOptions {
    #[serde(default)]
    pub case_sensitive: bool,
    #[serde(default)]
    pub exact_match: bool,
}

impl SearchOptions {
    pub fn new(case_sensitive: bool, exact_match: bool) -> Self {
        Self {
            case_sensitive,
            exact_match,
        }
    }

    /// Normalizes `text` the way cached cells are normalized for this policy.
    pub fn normalize<'a>(&self, text: &'a str) -> std::borrow::Cow<'a, str> {
        if self.case_sensitive {
            std::borrow::Cow::Borrowed(text)
        } else {
            std::borrow::Cow::Owned(fold_case(text))
        }
    }

    /// Compares an already-normalized cell with an already-normalized needle.
    pub(crate) fn cell_matches(&self, cell: &str, needle: &str) -> bool {
        if self.exact_match {
            cell == needle
        } else {
            cell.contains(needle)
        }
    }
}

/// Delimiters wrapped around each merged highlight region.
///
/// `escape_html` controls whether cell text is HTML-escaped around the
/// delimiters. Markup styles need it; terminal styles do not.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkStyle {
    pub open: String,
    pub close: String,
    #[serde(default = "escape_by_default")]
    pub escape_html: bool,
}

impl MarkStyle {
    pub fn html(open: impl Into<String>, close: impl Into<String>) -> Self {
        Self {
            open: open.into(),
            close: close.into(),
            escape_html: true,
        }
    }

    /// Delimiters for plain-text output; cell text is copied verbatim.
    pub fn plain(open: impl Into<String>, close: impl Into<String>) -> Self {
        Self {
            open: open.into(),
            close: close.into(),
            escape_html: false,
        }
    }

    /// Renders a cell that has no highlight, escaping it if the style does.
    pub fn render_unmarked(&self, text: &str) -> String {
        if self.escape_html {
            crate::escape_html(text)
        } else {
            text.to_string()
        }
    }
}

impl Default for MarkStyle {
    fn default() -> Self {
        Self::html("<mark>", "</mark>")
    }
}

fn escape_by_default() -> bool {
    true
}

/// Lowercases per `char`.
///
/// Every cached cell and every needle goes through this one function so that
/// the two sides always agree. `str::to_lowercase` is avoided on purpose: it
/// applies context rules (final sigma) that would make a needle fold
/// differently from the same text inside a longer cell.
pub fn fold_case(text: &str) -> String {
    text.chars().flat_map(char::to_lowercase).collect()
}
