//! Mapping tree-sitter positions back onto the source text.

use tree_sitter::Node;

/// A `(start_line, start_col)`-`(end_line, end_col)` range.
///
/// Lines and columns are 0-indexed, columns are byte offsets within the line
/// (as reported by tree-sitter), and the end column is exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Span {
    pub start_line: usize,
    pub start_col: usize,
    pub end_line: usize,
    pub end_col: usize,
}

impl Span {
    /// Creates a span from explicit coordinates.
    pub fn new(start_line: usize, start_col: usize, end_line: usize, end_col: usize) -> Self {
        Self {
            start_line,
            start_col,
            end_line,
            end_col,
        }
    }

    /// The span covered by a syntax node.
    pub fn of(node: &Node<'_>) -> Self {
        let start = node.start_position();
        let end = node.end_position();
        Self::new(start.row, start.column, end.row, end.column)
    }

    /// `(line, column)` of the first character.
    pub fn start(&self) -> (usize, usize) {
        (self.start_line, self.start_col)
    }

    /// `(line, column)` one past the last character.
    pub fn end(&self) -> (usize, usize) {
        (self.end_line, self.end_col)
    }

    /// Returns true if the span starts and ends on the same line.
    pub fn is_single_line(&self) -> bool {
        self.start_line == self.end_line
    }
}

/// Source text split into lines once, so many spans can be resolved cheaply.
#[derive(Debug, Clone)]
pub struct SourceLines<'a> {
    lines: Vec<&'a str>,
}

impl<'a> SourceLines<'a> {
    /// Splits `source` on `\n`. Carriage returns stay part of their line.
    pub fn new(source: &'a str) -> Self {
        Self {
            lines: source.split('\n').collect(),
        }
    }

    /// Number of lines (a trailing newline yields a final empty line).
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Returns true if there are no lines; never the case for a split string.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Returns the text covered by `span`, or an empty string when the span does
    /// not fit the source (grammar/source mismatches do produce such spans).
    pub fn resolve(&self, span: Span) -> String {
        self.try_resolve(span).unwrap_or_default()
    }

    /// Text of a syntax node.
    pub fn node_text(&self, node: &Node<'_>) -> String {
        self.resolve(Span::of(node))
    }

    fn try_resolve(&self, span: Span) -> Option<String> {
        if span.start() > span.end() {
            return None;
        }

        if span.is_single_line() {
            let line = self.lines.get(span.start_line)?;
            return line.get(span.start_col..span.end_col).map(String::from);
        }

        let head = self.lines.get(span.start_line)?.get(span.start_col..)?;
        let middle = self.lines.get(span.start_line + 1..span.end_line)?;
        let tail = self.lines.get(span.end_line)?.get(..span.end_col)?;

        let mut parts = Vec::with_capacity(middle.len() + 2);
        parts.push(head);
        parts.extend_from_slice(middle);
        parts.push(tail);
        Some(parts.join("\n"))
    }
}

/// Resolves a single span against `source`.
///
/// Prefer [`SourceLines`] when resolving many spans of the same file.
pub fn resolve(span: Span, source: &str) -> String {
    SourceLines::new(source).resolve(span)
}
