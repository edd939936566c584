//! Structured documentation comments.
//!
//! Each supported comment convention is parsed into a [`StructuredDoc`]: a
//! short and long description plus a list of block tags. The style-specific
//! parsers live in submodules; matching the tags against a function signature
//! happens here, in [`StructuredDoc::field_map`].
//!
//! | Style | Used by | Example |
//! |-------|---------|---------|
//! | [`DocStyle::Javadoc`] | Java, JavaScript, TypeScript | `@param {string} name desc` |
//! | [`DocStyle::Rest`] | Python | `:param int x: desc` |
//! | [`DocStyle::Google`] | Python | `Args:` / `x (int): desc` |
//! | [`DocStyle::Numpy`] | Python | `Parameters` / `----------` |
//! | [`DocStyle::Yard`] | Ruby | `@param name [String] desc` |
//! | [`DocStyle::Plain`] | Go | free text only |

mod javadoc;
mod python;
mod yard;

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use thiserror::Error;

use crate::record::Parameters;

/// Reserved key for documented names that are not in the signature.
pub const OTHER_PARAM: &str = "other_param";

/// A comment whose tag syntax could not be understood.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DocParseError {
    #[error("@{tag} tag has no argument name")]
    MissingArgName { tag: String },

    #[error("unbalanced type expression in @{tag} tag")]
    UnbalancedType { tag: String },

    #[error("expected a colon in {0:?}")]
    MissingColon(String),

    #[error("unexpected arguments in field {0:?}")]
    UnexpectedArguments(String),
}

/// The role of a block tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TagKind {
    Param,
    Returns,
    Raises,
    Yields,
    Other,
}

impl TagKind {
    /// Classifies a tag keyword (`param`, `returns`, `throws`, ...).
    pub fn classify(tag: &str) -> Self {
        match tag.to_ascii_lowercase().as_str() {
            "param" | "parameter" | "arg" | "argument" | "attribute" | "key" | "keyword" => {
                TagKind::Param
            }
            "return" | "returns" => TagKind::Returns,
            "raises" | "raise" | "except" | "exception" | "throws" | "throw" => TagKind::Raises,
            "yield" | "yields" => TagKind::Yields,
            _ => TagKind::Other,
        }
    }

    /// Returns true for tags that may repeat and accumulate into a list.
    pub fn is_repeatable(&self) -> bool {
        matches!(self, TagKind::Returns | TagKind::Raises | TagKind::Yields)
    }
}

/// One block tag of a structured comment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocTag {
    /// The keyword as written (`param`, `return`, `throws`, ...).
    pub tag: String,
    pub kind: TagKind,
    pub arg_name: Option<String>,
    pub type_name: Option<String>,
    pub default: Option<String>,
    pub is_optional: Option<bool>,
    pub description: Option<String>,
}

impl DocTag {
    /// Creates a tag with nothing but its keyword set.
    pub fn new(tag: impl Into<String>) -> Self {
        let tag = tag.into();
        Self {
            kind: TagKind::classify(&tag),
            tag,
            arg_name: None,
            type_name: None,
            default: None,
            is_optional: None,
            description: None,
        }
    }

    pub fn with_arg_name(mut self, name: impl Into<String>) -> Self {
        self.arg_name = Some(name.into());
        self
    }

    pub fn with_type(mut self, type_name: Option<String>) -> Self {
        self.type_name = type_name.filter(|t| !t.is_empty());
        self
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = non_empty(description);
        self
    }
}

/// A parsed comment: description plus block tags.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StructuredDoc {
    pub short_description: Option<String>,
    pub long_description: Option<String>,
    pub tags: Vec<DocTag>,
}

impl StructuredDoc {
    /// Builds a doc from the free-text part of a comment: the first line is the
    /// short description, everything after it the long description.
    pub fn from_description(text: &str) -> Self {
        let text = text.trim();
        let (short, long) = match text.split_once('\n') {
            Some((short, long)) => (short, long),
            None => (text, ""),
        };
        Self {
            short_description: non_empty(short),
            long_description: non_empty(long),
            tags: Vec::new(),
        }
    }

    /// The short and long description joined by a newline.
    pub fn summary(&self) -> String {
        match (&self.short_description, &self.long_description) {
            (Some(short), Some(long)) => format!("{short}\n{long}"),
            (Some(short), None) => short.clone(),
            (None, Some(long)) => long.clone(),
            (None, None) => String::new(),
        }
    }

    /// Matches the tags against a signature.
    ///
    /// Every signature parameter gets an entry (empty if undocumented);
    /// documented names missing from the signature go to `other_param`;
    /// return/raise/yield tags accumulate per keyword in encounter order.
    pub fn field_map(&self, parameters: &Parameters) -> DocstringParams {
        let mut fields = DocstringParams::for_parameters(parameters);

        for tag in &self.tags {
            match tag.kind {
                TagKind::Param => {
                    let Some(name) = tag.arg_name.as_deref() else {
                        continue;
                    };
                    let name = name.trim_start_matches('*');
                    let doc = FieldDoc {
                        docstring: tag.description.clone(),
                        type_name: tag.type_name.clone(),
                        default: tag.default.clone(),
                        optional: tag.is_optional,
                    };
                    match parameters.get(name) {
                        Some(declared) => {
                            let doc = FieldDoc {
                                type_name: non_empty(declared).or(doc.type_name),
                                ..doc
                            };
                            fields.set_param(name, doc);
                        }
                        None => fields.set_other_param(name, doc),
                    }
                }
                kind if kind.is_repeatable() => {
                    let Some(description) = tag.description.as_deref() else {
                        continue;
                    };
                    if description == "None" {
                        continue;
                    }
                    fields.push_tag(
                        &tag.tag,
                        FieldDoc {
                            docstring: Some(description.to_string()),
                            type_name: tag.type_name.clone(),
                            default: None,
                            optional: None,
                        },
                    );
                }
                _ => {}
            }
        }

        fields
    }
}

/// Documentation attached to one parameter or tag.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FieldDoc {
    pub docstring: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub type_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub optional: Option<bool>,
}

/// The structured fields of a comment, keyed by parameter name or tag.
///
/// Serializes as one JSON object: `other_param` first, then the signature
/// parameters in declaration order, then repeatable tags, each as a list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocstringParams {
    params: Vec<(String, FieldDoc)>,
    other_params: Vec<(String, FieldDoc)>,
    tags: Vec<(String, Vec<FieldDoc>)>,
}

impl DocstringParams {
    /// An empty entry for every parameter of the signature.
    pub fn for_parameters(parameters: &Parameters) -> Self {
        Self {
            params: parameters
                .names()
                .map(|name| (name.to_string(), FieldDoc::default()))
                .collect(),
            ..Self::default()
        }
    }

    /// The entry of a signature parameter.
    pub fn param(&self, name: &str) -> Option<&FieldDoc> {
        lookup(&self.params, name)
    }

    /// The entry of a documented name that is not in the signature.
    pub fn other_param(&self, name: &str) -> Option<&FieldDoc> {
        lookup(&self.other_params, name)
    }

    /// All entries accumulated under a repeatable tag.
    pub fn tag(&self, tag: &str) -> Option<&[FieldDoc]> {
        lookup(&self.tags, tag).map(Vec::as_slice)
    }

    pub fn params(&self) -> impl Iterator<Item = (&str, &FieldDoc)> {
        self.params.iter().map(|(n, d)| (n.as_str(), d))
    }

    pub fn other_params(&self) -> impl Iterator<Item = (&str, &FieldDoc)> {
        self.other_params.iter().map(|(n, d)| (n.as_str(), d))
    }

    pub fn tags(&self) -> impl Iterator<Item = (&str, &[FieldDoc])> {
        self.tags.iter().map(|(n, d)| (n.as_str(), d.as_slice()))
    }

    fn set_param(&mut self, name: &str, doc: FieldDoc) {
        if let Some(entry) = self.params.iter_mut().find(|(n, _)| n == name) {
            entry.1 = doc;
        }
    }

    fn set_other_param(&mut self, name: &str, doc: FieldDoc) {
        match self.other_params.iter_mut().find(|(n, _)| n == name) {
            Some(entry) => entry.1 = doc,
            None => self.other_params.push((name.to_string(), doc)),
        }
    }

    fn push_tag(&mut self, tag: &str, doc: FieldDoc) {
        match self.tags.iter_mut().find(|(t, _)| t == tag) {
            Some(entry) => entry.1.push(doc),
            None => self.tags.push((tag.to_string(), vec![doc])),
        }
    }
}

fn lookup<'a, T>(entries: &'a [(String, T)], key: &str) -> Option<&'a T> {
    entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
}

struct NamedFields<'a>(&'a [(String, FieldDoc)]);

impl Serialize for NamedFields<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, doc) in self.0 {
            map.serialize_entry(name, doc)?;
        }
        map.end()
    }
}

impl Serialize for DocstringParams {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let len = 1 + self.params.len() + self.tags.len();
        let mut map = serializer.serialize_map(Some(len))?;
        map.serialize_entry(OTHER_PARAM, &NamedFields(&self.other_params))?;
        for (name, doc) in &self.params {
            map.serialize_entry(name, doc)?;
        }
        for (tag, docs) in &self.tags {
            map.serialize_entry(tag, docs)?;
        }
        map.end()
    }
}

/// A doc comment after parsing: raw text, summary, and structured fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocstringRecord {
    pub raw: String,
    pub summary: String,
    pub fields: DocstringParams,
}

/// A documentation comment convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocStyle {
    Javadoc,
    Rest,
    Google,
    Numpy,
    Yard,
    Plain,
}

impl DocStyle {
    /// Parses `text` (comment delimiters already stripped) in this style.
    pub fn parse(self, text: &str) -> Result<StructuredDoc, DocParseError> {
        match self {
            DocStyle::Javadoc => javadoc::parse(text),
            DocStyle::Rest => python::parse_rest(text),
            DocStyle::Google => python::parse_google(text),
            DocStyle::Numpy => python::parse_numpy(text),
            DocStyle::Yard => yard::parse(text),
            DocStyle::Plain => Ok(StructuredDoc::from_description(text)),
        }
    }

    /// Picks the Python docstring convention `text` is written in.
    pub fn detect_python(text: &str) -> Self {
        python::detect(text)
    }
}

/// Parses a raw comment against a signature.
///
/// Returns `None` for an empty comment or one whose tags are malformed.
pub fn parse_doc_comment(
    style: DocStyle,
    raw: &str,
    parameters: &Parameters,
) -> Option<DocstringRecord> {
    if raw.trim().is_empty() {
        return None;
    }
    let doc = style.parse(raw).ok()?;
    Some(DocstringRecord {
        raw: raw.to_string(),
        summary: doc.summary(),
        fields: doc.field_map(parameters),
    })
}

/// Splits a tagged comment into its free-text description and `@tag` blocks,
/// then parses each block with `parse_block`.
///
/// A block starts at a line beginning with `@` and a letter, and runs until the
/// next such line. Blank lines inside a block are dropped.
pub(super) fn parse_block_tags(
    text: &str,
    parse_block: impl Fn(&str) -> Result<DocTag, DocParseError>,
) -> Result<StructuredDoc, DocParseError> {
    let mut description: Vec<&str> = Vec::new();
    let mut blocks: Vec<String> = Vec::new();

    for line in text.lines() {
        let trimmed = line.trim();
        let starts_tag = trimmed
            .strip_prefix('@')
            .is_some_and(|rest| rest.starts_with(|c: char| c.is_ascii_alphabetic()));
        if starts_tag {
            blocks.push(trimmed.to_string());
        } else if let Some(block) = blocks.last_mut() {
            if !trimmed.is_empty() {
                block.push('\n');
                block.push_str(trimmed);
            }
        } else {
            description.push(line);
        }
    }

    let mut doc = StructuredDoc::from_description(&description.join("\n"));
    for block in &blocks {
        doc.tags.push(parse_block(block)?);
    }
    Ok(doc)
}

pub(crate) fn non_empty(text: &str) -> Option<String> {
    let text = text.trim();
    (!text.is_empty()).then(|| text.to_string())
}

/// Splits off the first whitespace-delimited word.
pub(crate) fn split_first_word(text: &str) -> (&str, &str) {
    let text = text.trim_start();
    match text.find(char::is_whitespace) {
        Some(idx) => (&text[..idx], &text[idx..]),
        None => (text, ""),
    }
}

/// Takes a bracketed expression such as `{Array.<{a: number}>}` off the front
/// of `text`, returning its contents and the remainder.
pub(crate) fn take_bracketed(text: &str, open: char, close: char) -> Option<(&str, &str)> {
    let mut depth = 0usize;
    for (idx, c) in text.char_indices() {
        if c == open {
            depth += 1;
        } else if c == close {
            depth = depth.checked_sub(1)?;
            if depth == 0 {
                return Some((&text[open.len_utf8()..idx], &text[idx + close.len_utf8()..]));
            }
        }
    }
    None
}

/// Removes the common leading indentation of all lines but the first, and
/// trims blank lines at both ends.
pub(crate) fn cleandoc(text: &str) -> String {
    let lines: Vec<&str> = text.split('\n').collect();
    let indent = lines
        .iter()
        .skip(1)
        .filter(|l| !l.trim().is_empty())
        .map(|l| l.len() - l.trim_start().len())
        .min()
        .unwrap_or(0);

    let mut out: Vec<String> = Vec::with_capacity(lines.len());
    for (i, line) in lines.iter().enumerate() {
        if i == 0 {
            out.push(line.trim().to_string());
        } else {
            out.push(line.get(indent..).unwrap_or(line.trim_start()).trim_end().to_string());
        }
    }
    while out.first().is_some_and(|l| l.is_empty()) {
        out.remove(0);
    }
    while out.last().is_some_and(|l| l.is_empty()) {
        out.pop();
    }
    out.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(names: &[(&str, &str)]) -> Parameters {
        names.iter().copied().collect()
    }

    #[test]
    fn test_block_tags_group_continuation_lines() {
        let text = "Mails admin@example.com about {@code x}.\nSecond line.\n@param to the\n  address\n\n@return nothing";
        let doc = parse_block_tags(text, |block| Ok(DocTag::new("raw").with_description(block)))
            .unwrap();

        assert_eq!(
            doc.short_description.as_deref(),
            Some("Mails admin@example.com about {@code x}.")
        );
        assert_eq!(doc.long_description.as_deref(), Some("Second line."));
        let blocks: Vec<&str> = doc
            .tags
            .iter()
            .filter_map(|t| t.description.as_deref())
            .collect();
        assert_eq!(blocks, vec!["@param to the\naddress", "@return nothing"]);
    }

    #[test]
    fn test_block_tag_errors_propagate() {
        let result = parse_block_tags("Summary.\n@param {broken", |_| {
            Err(DocParseError::MissingArgName {
                tag: "param".to_string(),
            })
        });
        assert!(result.is_err());
    }

    #[test]
    fn test_summary_joins_short_and_long() {
        let doc = StructuredDoc::from_description("Short line.\n\nLonger text\nhere.");
        assert_eq!(doc.short_description.as_deref(), Some("Short line."));
        assert_eq!(doc.long_description.as_deref(), Some("Longer text\nhere."));
        assert_eq!(doc.summary(), "Short line.\nLonger text\nhere.");
    }

    #[test]
    fn test_documented_subset_of_parameters() {
        let doc = StructuredDoc {
            tags: vec![DocTag::new("param").with_arg_name("a").with_description("the first")],
            ..StructuredDoc::from_description("Does things.")
        };
        let fields = doc.field_map(&params(&[("a", "int"), ("b", "String")]));

        let a = fields.param("a").unwrap();
        assert_eq!(a.docstring.as_deref(), Some("the first"));
        assert_eq!(a.type_name.as_deref(), Some("int"));
        assert_eq!(fields.param("b"), Some(&FieldDoc::default()));
        assert_eq!(fields.other_params().count(), 0);
    }

    #[test]
    fn test_unknown_names_go_to_other_param() {
        let doc = StructuredDoc {
            tags: vec![
                DocTag::new("param").with_arg_name("c").with_description("extra"),
                DocTag::new("param")
                    .with_arg_name("d")
                    .with_type(Some("long".to_string())),
            ],
            ..StructuredDoc::default()
        };
        let fields = doc.field_map(&params(&[("a", "int")]));

        assert_eq!(
            fields.other_param("c").unwrap().docstring.as_deref(),
            Some("extra")
        );
        assert_eq!(
            fields.other_param("d").unwrap().type_name.as_deref(),
            Some("long")
        );
        assert!(fields.param("c").is_none());
    }

    #[test]
    fn test_repeatable_tags_are_always_lists() {
        let doc = StructuredDoc {
            tags: vec![
                DocTag::new("return").with_description("the total"),
                DocTag::new("throws")
                    .with_type(Some("IOException".to_string()))
                    .with_description("on read failure"),
                DocTag::new("throws")
                    .with_type(Some("ParseException".to_string()))
                    .with_description("on bad input"),
                DocTag::new("return").with_description("None"),
                DocTag::new("since").with_description("1.2"),
            ],
            ..StructuredDoc::default()
        };
        let fields = doc.field_map(&Parameters::new());

        assert_eq!(fields.tag("return").unwrap().len(), 1);
        let throws = fields.tag("throws").unwrap();
        assert_eq!(throws.len(), 2);
        assert_eq!(throws[1].type_name.as_deref(), Some("ParseException"));
        assert!(fields.tag("since").is_none());
    }

    #[test]
    fn test_field_map_serialization_order() {
        let doc = StructuredDoc {
            tags: vec![
                DocTag::new("return").with_description("sum"),
                DocTag::new("param").with_arg_name("b").with_description("second"),
                DocTag::new("param").with_arg_name("z").with_description("ghost"),
            ],
            ..StructuredDoc::default()
        };
        let fields = doc.field_map(&params(&[("a", "int"), ("b", "int")]));
        let json = serde_json::to_string(&fields).unwrap();

        assert_eq!(
            json,
            concat!(
                r#"{"other_param":{"z":{"docstring":"ghost"}},"#,
                r#""a":{"docstring":null},"#,
                r#""b":{"docstring":"second","type":"int"},"#,
                r#""return":[{"docstring":"sum"}]}"#
            )
        );
    }

    #[test]
    fn test_parse_doc_comment_rejects_malformed() {
        let p = params(&[("a", "int")]);
        assert!(parse_doc_comment(DocStyle::Javadoc, "Does it.\n@param", &p).is_none());
        assert!(parse_doc_comment(DocStyle::Javadoc, "   ", &p).is_none());

        let record = parse_doc_comment(DocStyle::Javadoc, "Does it.\n@param a x", &p).unwrap();
        assert_eq!(record.summary, "Does it.");
        assert_eq!(record.raw, "Does it.\n@param a x");
    }

    #[test]
    fn test_take_bracketed_nested() {
        assert_eq!(
            take_bracketed("{Array.<{a: number}>} rest", '{', '}'),
            Some(("Array.<{a: number}>", " rest"))
        );
        assert_eq!(take_bracketed("{unclosed", '{', '}'), None);
    }

    #[test]
    fn test_cleandoc() {
        assert_eq!(
            cleandoc("First line.\n\n        Indented body.\n          Deeper.\n    "),
            "First line.\n\nIndented body.\n  Deeper."
        );
        assert_eq!(cleandoc("\n    Leading blank.\n    "), "Leading blank.");
    }
}
