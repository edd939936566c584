//! Comment cleaning and noise detection.
//!
//! Two kinds of decisions live here: turning a raw comment into normalized
//! text ([`clean_comment`]), and recognizing comments that carry no information
//! beyond the identifier they document ([`is_auto_generated`]).

use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;

/// `{@link Foo#bar label}`, `{@code x}`, `{@inheritDoc}` and friends.
static INLINE_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{@(\w+)\s*([^}]*)\}").expect("inline tag pattern is valid")
});

static HTML_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"</?[A-Za-z][A-Za-z0-9]*(\s[^<>]*)?/?>").expect("html tag pattern is valid")
});

static HTML_ENTITY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"&(nbsp|amp|lt|gt|quot|#39);").expect("entity pattern is valid"));

static INNER_WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[ \t\u{a0}]+").expect("whitespace pattern is valid"));

/// Lines made only of decoration, e.g. `-----`, `=====`, `*****`.
static SEPARATOR_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\s\-=*#~_+/]+$").expect("separator pattern is valid"));

/// Generator stamps and placeholder text.
static GENERATED_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"auto[- ]?generated",
        r"\bgenerated (by|with|from|using)\b",
        r"@generated\b",
        r"\bdo not (edit|modify)\b",
        r"\bmethod stub\b",
        r"^\s*(todo|fixme|xxx|hack)\b",
        r"\b(todo|fixme)\s*:",
        r"^\s*not (yet )?implemented\b",
        r"\binsert (the )?method'?s? description here\b",
        r"\bdescription of the method\b",
        r"^\s*(default )?constructor\.?\s*$",
        r"^\s*creates a new instance of\b",
        r"^\s*(\{@inheritdoc\}|inheritdoc|@inheritdoc)\s*$",
        r"^\s*@see\b",
        r"^\s*(no )?(description|comment|documentation)\.?\s*$",
        r"^\s*n/?a\.?\s*$",
        r"^\s*placeholder\b",
        r"^\s*created by\b",
    ]
    .iter()
    .map(|p| Regex::new(&format!("(?i){p}")).expect("noise pattern is valid"))
    .collect()
});

/// Words that do not count as content when checking for restatements.
static FILLER_WORDS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    [
        "a", "an", "the", "this", "that", "these", "those", "it", "its", "of", "for", "to",
        "in", "on", "at", "by", "with", "from", "and", "or", "is", "are", "be", "was", "if",
        "whether", "as", "get", "gets", "getter", "set", "sets", "setter", "return",
        "returns", "returned", "method", "function", "value", "values", "field", "property",
        "new", "given", "specified", "current", "true", "false", "object", "instance",
        "class", "param", "parameter", "called", "when", "s",
    ]
    .into_iter()
    .collect()
});

static WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[A-Za-z][A-Za-z0-9]*").expect("word pattern is valid"));

/// Strips `/** */`, `/* */` and `//` markers and leading `*` gutters, line by line.
pub fn strip_c_style_comment_delimiters(comment: &str) -> String {
    comment
        .split('\n')
        .map(|line| {
            let mut line = line.trim();
            if let Some(rest) = line.strip_suffix("*/") {
                line = rest;
            }
            if let Some(rest) = line.strip_prefix("/**") {
                line = rest;
            } else if let Some(rest) = line.strip_prefix("/*") {
                line = rest;
            } else if let Some(rest) = line.strip_prefix("///") {
                line = rest;
            } else if let Some(rest) = line.strip_prefix("//") {
                line = rest;
            } else if let Some(rest) = line.strip_prefix('*') {
                line = rest;
            }
            line.trim()
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Strips `#` markers and `=begin`/`=end` fences, line by line.
pub fn strip_hash_comment_delimiters(comment: &str) -> String {
    comment
        .split('\n')
        .filter(|line| {
            let t = line.trim();
            !(t.starts_with("=begin") || t.starts_with("=end"))
        })
        .map(|line| line.trim().trim_start_matches('#').trim())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Normalizes a comment for use as training text.
///
/// Unwraps inline Javadoc tags, removes HTML markup and stray comment markers,
/// drops decoration lines, and collapses whitespace while keeping paragraph
/// breaks. Returns an empty string when nothing worth keeping remains: no
/// letters at all, or a comment that is only a question.
pub fn clean_comment(text: &str) -> String {
    let text = INLINE_TAG.replace_all(text, |caps: &regex::Captures<'_>| {
        let tag = caps[1].to_ascii_lowercase();
        let body = caps[2].trim();
        match tag.as_str() {
            "inheritdoc" => String::new(),
            "link" | "linkplain" => {
                // `{@link Type#member label}` reads as its label when present
                let mut parts = body.splitn(2, char::is_whitespace);
                let target = parts.next().unwrap_or_default();
                match parts.next().map(str::trim).filter(|l| !l.is_empty()) {
                    Some(label) => label.to_string(),
                    None => target.trim_start_matches('#').replace('#', "."),
                }
            }
            _ => body.to_string(),
        }
    });
    let text = HTML_TAG.replace_all(&text, "");
    let text = HTML_ENTITY.replace_all(&text, |caps: &regex::Captures<'_>| {
        match &caps[1] {
            "amp" => "&",
            "lt" => "<",
            "gt" => ">",
            "quot" => "\"",
            "#39" => "'",
            _ => " ",
        }
        .to_string()
    });

    let mut lines: Vec<String> = Vec::new();
    for line in text.split('\n') {
        let line = strip_line_markers(line);
        let line = INNER_WHITESPACE.replace_all(line, " ").trim().to_string();
        if line.is_empty() {
            if lines.last().is_some_and(|l| !l.is_empty()) {
                lines.push(String::new());
            }
            continue;
        }
        if SEPARATOR_LINE.is_match(&line) {
            continue;
        }
        lines.push(line);
    }
    while lines.last().is_some_and(|l| l.is_empty()) {
        lines.pop();
    }
    let cleaned = lines.join("\n");

    if !cleaned.chars().any(char::is_alphabetic) {
        return String::new();
    }
    if is_question(&cleaned) {
        return String::new();
    }
    cleaned
}

fn strip_line_markers(line: &str) -> &str {
    let mut line = line.trim();
    if let Some(rest) = line.strip_suffix("*/") {
        line = rest.trim_end();
    }
    for marker in ["/**", "/*", "///", "//", "*", "#"] {
        if let Some(rest) = line.strip_prefix(marker) {
            return rest.trim_start();
        }
    }
    line
}

/// A single sentence ending in a question mark.
fn is_question(text: &str) -> bool {
    let trimmed = text.trim();
    trimmed.ends_with('?')
        && !trimmed[..trimmed.len() - 1]
            .contains(|c: char| matches!(c, '.' | '!' | '?' | '\n'))
}

/// Returns true if `text` looks machine-written or merely restates `identifier`.
///
/// Flags generator stamps, TODO/FIXME placeholders, template phrases such as
/// "Default constructor", and comments whose content words all come from the
/// identifier itself ("Gets the user name." on `getUserName`).
pub fn is_auto_generated(identifier: &str, text: &str) -> bool {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return true;
    }
    if GENERATED_PATTERNS.iter().any(|p| p.is_match(trimmed)) {
        return true;
    }
    is_restatement(identifier, trimmed)
}

fn is_restatement(identifier: &str, text: &str) -> bool {
    let name_words: HashSet<String> = split_identifier(identifier).into_iter().collect();
    if name_words.is_empty() {
        return false;
    }

    let mut content_words = WORD
        .find_iter(text)
        .map(|m| m.as_str().to_ascii_lowercase())
        .filter(|w| !FILLER_WORDS.contains(w.as_str()))
        .peekable();

    if content_words.peek().is_none() {
        return true;
    }
    content_words.all(|w| name_words.contains(&w) || name_words.contains(w.trim_end_matches('s')))
}

/// Splits an identifier into lowercase words on case changes, digits and
/// separators: `getHTTPResponse_code` becomes `get`, `http`, `response`, `code`.
pub fn split_identifier(identifier: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut current = String::new();
    let chars: Vec<char> = identifier.chars().collect();

    for (i, &c) in chars.iter().enumerate() {
        if !c.is_alphanumeric() {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            continue;
        }
        let prev = if i > 0 { Some(chars[i - 1]) } else { None };
        let next = chars.get(i + 1).copied();
        let boundary = match prev {
            Some(p) if c.is_uppercase() && p.is_lowercase() => true,
            Some(p) if c.is_uppercase() && p.is_uppercase() => {
                next.is_some_and(|n| n.is_lowercase())
            }
            Some(p) if c.is_ascii_digit() != p.is_ascii_digit() && p.is_alphanumeric() => true,
            _ => false,
        };
        if boundary && !current.is_empty() {
            words.push(std::mem::take(&mut current));
        }
        current.extend(c.to_lowercase());
    }
    if !current.is_empty() {
        words.push(current);
    }
    words
}
