use crate::{CellCache, Column, MarkStyle, SearchOptions, fallback_label};
use itertools::Itertools;
use memchr::memmem;
use serde::Serialize;
use std::{borrow::Cow, collections::BTreeMap};

/// Byte range `[start, end)` of one cell's original text, always on `char`
/// boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct HighlightSpan {
    pub start: usize,
    pub end: usize,
}

impl HighlightSpan {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// One operand and the columns (indexes, query order) where it was found.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OperandMatch {
    pub operand: String,
    pub columns: Vec<usize>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RowHighlights {
    /// `operand (Col A, Col B); other (Col C)`, operands in query order.
    pub summary: String,
    /// Marked-up text per column, `None` where nothing matched.
    pub highlights: Vec<Option<String>>,
    pub matches: Vec<OperandMatch>,
}

/// Recomputes where a matched row's operands occur and renders each touched
/// cell with its matches wrapped in [`MarkStyle`] delimiters.
pub struct HighlightBuilder<'a> {
    cache: &'a CellCache,
    columns: &'a [Column],
    style: MarkStyle,
}

impl<'a> HighlightBuilder<'a> {
    pub fn new(cache: &'a CellCache, columns: &'a [Column]) -> Self {
        Self {
            cache,
            columns,
            style: MarkStyle::default(),
        }
    }

    pub fn with_style(mut self, style: MarkStyle) -> Self {
        self.style = style;
        self
    }

    pub fn build<S: AsRef<str>>(
        &self,
        row: usize,
        operands: &[S],
        options: &SearchOptions,
        column_indexes: &[usize],
    ) -> RowHighlights {
        let mut highlights = vec![None; self.cache.column_count()];
        let (Some(original), Some(compared)) = (
            self.cache.verbatim_row(row),
            self.cache.row(row, options.case_sensitive),
        ) else {
            return RowHighlights {
                highlights,
                ..Default::default()
            };
        };

        let all_columns;
        let indexes = if column_indexes.is_empty() {
            all_columns = self.cache.all_columns();
            all_columns.as_slice()
        } else {
            column_indexes
        };

        let mut collector = HighlightCollector::default();
        let mut matches = Vec::new();
        for operand in operands {
            let operand = operand.as_ref().trim();
            if operand.is_empty() {
                continue;
            }
            let needle = options.normalize(operand);
            let matched: Vec<usize> = indexes
                .iter()
                .copied()
                .filter(|&index| {
                    compared
                        .get(index)
                        .is_some_and(|cell| options.cell_matches(cell, &needle))
                })
                .collect();
            for &index in &matched {
                collector.push(index, operand);
            }
            if !matched.is_empty() {
                matches.push(OperandMatch {
                    operand: operand.to_string(),
                    columns: matched,
                });
            }
        }

        for (index, tokens) in collector.into_columns() {
            let text = original.get(index).map(String::as_str).unwrap_or_default();
            if let Some(slot) = highlights.get_mut(index) {
                *slot = Some(highlight_cell(text, &tokens, options, &self.style));
            }
        }

        let summary = matches
            .iter()
            .map(|entry| {
                let labels = entry.columns.iter().map(|&index| self.label(index)).join(", ");
                format!("{} ({labels})", entry.operand)
            })
            .join("; ");

        RowHighlights {
            summary,
            highlights,
            matches,
        }
    }

    fn label(&self, index: usize) -> Cow<'a, str> {
        match self.columns.get(index) {
            Some(column) if !column.label.is_empty() => Cow::Borrowed(column.label.as_str()),
            _ => Cow::Owned(fallback_label(index)),
        }
    }
}

/// Shorthand for [`HighlightBuilder`] with the default `<mark>` style.
pub fn build_highlights<S: AsRef<str>>(
    cache: &CellCache,
    columns: &[Column],
    row: usize,
    operands: &[S],
    options: &SearchOptions,
    column_indexes: &[usize],
) -> RowHighlights {
    HighlightBuilder::new(cache, columns).build(row, operands, options, column_indexes)
}

/// Tokens to mark, grouped by column. Within a column each literal operand
/// text is kept once, in first-seen order.
#[derive(Default)]
struct HighlightCollector<'t> {
    columns: BTreeMap<usize, Vec<&'t str>>,
}

impl<'t> HighlightCollector<'t> {
    fn push(&mut self, column: usize, token: &'t str) {
        let tokens = self.columns.entry(column).or_default();
        if !tokens.contains(&token) {
            tokens.push(token);
        }
    }

    fn into_columns(self) -> impl Iterator<Item = (usize, Vec<&'t str>)> {
        self.columns.into_iter()
    }
}

/// Renders `text` with every occurrence of `tokens` marked, escaped as
/// `style` requires.
pub fn highlight_cell<S: AsRef<str>>(
    text: &str,
    tokens: &[S],
    options: &SearchOptions,
    style: &MarkStyle,
) -> String {
    if text.is_empty() {
        return String::new();
    }
    let spans = merge_spans(find_spans(text, tokens, options));
    render_marked(text, &spans, style)
}

/// Locates `tokens` inside `text` under `options`, in original-text byte
/// offsets. Spans are unsorted and may overlap; see [`merge_spans`].
///
/// With `exact_match` a token yields a single span covering the whole cell
/// when the cell equals it. Otherwise every non-overlapping occurrence is
/// reported, scanning left to right.
pub fn find_spans<S: AsRef<str>>(
    text: &str,
    tokens: &[S],
    options: &SearchOptions,
) -> Vec<HighlightSpan> {
    let mut spans = Vec::new();
    if options.case_sensitive {
        for token in tokens {
            collect_spans(text, token.as_ref(), options.exact_match, &mut spans);
        }
        return spans;
    }

    let folded = FoldedText::new(text);
    for token in tokens {
        let needle = options.normalize(token.as_ref());
        collect_spans(&folded.text, &needle, options.exact_match, &mut spans);
    }
    spans.into_iter().map(|span| folded.to_original(span)).collect()
}

fn collect_spans(haystack: &str, needle: &str, exact: bool, spans: &mut Vec<HighlightSpan>) {
    if needle.is_empty() {
        return;
    }
    if exact {
        if haystack == needle {
            spans.push(HighlightSpan::new(0, haystack.len()));
        }
        return;
    }
    spans.extend(
        memmem::find_iter(haystack.as_bytes(), needle.as_bytes())
            .map(|start| HighlightSpan::new(start, start + needle.len())),
    );
}

/// Sorts spans by start (then end) and folds every span that starts at or
/// before the previous one's end into it.
pub fn merge_spans(mut spans: Vec<HighlightSpan>) -> Vec<HighlightSpan> {
    spans.retain(|span| !span.is_empty());
    spans.sort_unstable();
    let mut merged: Vec<HighlightSpan> = Vec::with_capacity(spans.len());
    for span in spans {
        match merged.last_mut() {
            Some(last) if span.start <= last.end => last.end = last.end.max(span.end),
            _ => merged.push(span),
        }
    }
    merged
}

/// Wraps each span in `style`'s delimiters, escaping the text when the
/// style asks for HTML escaping.
///
/// `spans` must be sorted and disjoint, as returned by [`merge_spans`].
/// Spans that break that contract or fall outside `text` are skipped.
pub fn render_marked(text: &str, spans: &[HighlightSpan], style: &MarkStyle) -> String {
    let push: fn(&mut String, &str) = if style.escape_html {
        push_escaped
    } else {
        String::push_str
    };
    let mut out = String::with_capacity(text.len() + spans.len() * 16);
    let mut cursor = 0;
    for span in spans {
        if span.start < cursor {
            continue;
        }
        let (Some(before), Some(marked)) = (text.get(cursor..span.start), text.get(span.start..span.end))
        else {
            continue;
        };
        push(&mut out, before);
        out.push_str(&style.open);
        push(&mut out, marked);
        out.push_str(&style.close);
        cursor = span.end;
    }
    push(&mut out, &text[cursor..]);
    out
}

pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    push_escaped(&mut out, text);
    out
}

fn push_escaped(out: &mut String, text: &str) {
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
}

/// Case-folded copy of a cell that remembers, for every folded byte, the
/// original `char` it came from. Lowercasing can change a character's byte
/// length, so folded offsets cannot be reused on the original directly.
struct FoldedText {
    text: String,
    origin: Vec<(usize, usize)>,
}

impl FoldedText {
    fn new(original: &str) -> Self {
        let mut text = String::with_capacity(original.len());
        let mut origin = Vec::with_capacity(original.len());
        for (start, ch) in original.char_indices() {
            let source = (start, start + ch.len_utf8());
            for lower in ch.to_lowercase() {
                text.push(lower);
            }
            origin.resize(text.len(), source);
        }
        Self { text, origin }
    }

    // Widens to whole original characters when a match covers only part of
    // a multi-char lowercase expansion.
    fn to_original(&self, span: HighlightSpan) -> HighlightSpan {
        let start = self.origin[span.start].0;
        let end = self.origin[span.end - 1].1;
        HighlightSpan::new(start, end)
    }
}
