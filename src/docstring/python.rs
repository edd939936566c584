//! Python docstring conventions: reStructuredText fields, Google sections and
//! NumPy sections.

use regex::Regex;
use std::sync::LazyLock;

use super::{DocParseError, DocStyle, DocTag, StructuredDoc, TagKind, cleandoc, non_empty};

static REST_FIELD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?m)^\s*:(param|parameter|arg|argument|key|keyword|type|returns?|rtype|raises?|except|exception|yields?|ytype)\b",
    )
    .expect("rest field pattern is valid")
});

const GOOGLE_TITLES: &str = "Args|Arguments|Parameters|Params|Keyword Args|Keyword Arguments|Other Parameters|Attributes|Returns|Return|Yields|Yield|Raises|Raise|Exceptions|Except|Example|Examples|Note|Notes|Warning|Warnings|See Also|Todo|References";

static GOOGLE_SECTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"^({GOOGLE_TITLES}):[ \t]*$")).expect("google section pattern is valid")
});

static NUMPY_UNDERLINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*-{3,}\s*$").expect("numpy underline pattern is valid"));

const NUMPY_TITLES: &[&str] = &[
    "Parameters",
    "Other Parameters",
    "Attributes",
    "Returns",
    "Yields",
    "Receives",
    "Raises",
    "Warns",
    "See Also",
    "Notes",
    "References",
    "Examples",
];

/// `name (type, optional): ...` in Google argument sections.
static GOOGLE_TYPED_ARG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(.+?)\s*\(\s*(.*\S)\s*\)\s*$").expect("typed arg pattern is valid")
});

static DEFAULT_IN_DESCRIPTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bdefaults?\s+(?:to|is)\s*:?\s*`?([^`\s]+?)`?\.?(?:\s|$)")
        .expect("default pattern is valid")
});

/// Picks the docstring convention used by `text`.
pub(super) fn detect(text: &str) -> DocStyle {
    if REST_FIELD.is_match(text) {
        return DocStyle::Rest;
    }
    let lines: Vec<&str> = text.lines().collect();
    let numpy = lines.windows(2).any(|pair| {
        NUMPY_TITLES.contains(&pair[0].trim()) && NUMPY_UNDERLINE.is_match(pair[1])
    });
    if numpy {
        return DocStyle::Numpy;
    }
    if lines.iter().any(|line| GOOGLE_SECTION.is_match(line.trim())) {
        return DocStyle::Google;
    }
    DocStyle::Plain
}

fn default_from_description(description: Option<&str>) -> Option<String> {
    let caps = DEFAULT_IN_DESCRIPTION.captures(description?)?;
    non_empty(caps.get(1)?.as_str())
}

// ---------------------------------------------------------------------------
// reST
// ---------------------------------------------------------------------------

pub(super) fn parse_rest(text: &str) -> Result<StructuredDoc, DocParseError> {
    let text = cleandoc(text);
    let mut description: Vec<&str> = Vec::new();
    let mut chunks: Vec<String> = Vec::new();

    for line in text.lines() {
        if line.trim_start().starts_with(':') && REST_FIELD.is_match(line) {
            chunks.push(line.trim_start().to_string());
        } else if let Some(chunk) = chunks.last_mut() {
            chunk.push('\n');
            chunk.push_str(line);
        } else {
            description.push(line);
        }
    }

    let mut doc = StructuredDoc::from_description(&description.join("\n"));
    let mut param_types: Vec<(String, String)> = Vec::new();
    let mut return_type: Option<String> = None;
    let mut yield_type: Option<String> = None;

    for chunk in &chunks {
        let body = &chunk[1..];
        let (args, desc) = body
            .split_once(':')
            .ok_or_else(|| DocParseError::MissingColon(chunk.clone()))?;
        let args: Vec<&str> = args.split_whitespace().collect();
        let desc = rest_description(desc);

        match args.as_slice() {
            ["type", name] => param_types.push((name.to_string(), desc)),
            ["rtype"] => return_type = non_empty(&desc),
            ["ytype"] => yield_type = non_empty(&desc),
            [keyword, rest @ ..] => doc.tags.push(rest_tag(keyword, rest, &desc, chunk)?),
            [] => return Err(DocParseError::UnexpectedArguments(chunk.clone())),
        }
    }

    for tag in &mut doc.tags {
        match tag.kind {
            TagKind::Param if tag.type_name.is_none() => {
                tag.type_name = param_types
                    .iter()
                    .find(|(name, _)| Some(name.as_str()) == tag.arg_name.as_deref())
                    .and_then(|(_, ty)| non_empty(ty));
            }
            TagKind::Returns if tag.type_name.is_none() => tag.type_name = return_type.clone(),
            TagKind::Yields if tag.type_name.is_none() => tag.type_name = yield_type.clone(),
            _ => {}
        }
    }

    Ok(doc)
}

fn rest_description(desc: &str) -> String {
    match desc.trim_start().split_once('\n') {
        Some((first, rest)) => {
            let rest = cleandoc(&format!("\n{rest}"));
            format!("{}\n{}", first.trim(), rest).trim().to_string()
        }
        None => desc.trim().to_string(),
    }
}

fn rest_tag(
    keyword: &str,
    args: &[&str],
    desc: &str,
    chunk: &str,
) -> Result<DocTag, DocParseError> {
    let mut tag = DocTag::new(keyword).with_description(desc);
    match (tag.kind, args) {
        (TagKind::Param, [name]) => {
            tag = tag.with_arg_name(*name);
        }
        (TagKind::Param, [type_name, name]) => {
            tag = tag.with_arg_name(*name);
            if let Some(base) = type_name.strip_suffix('?') {
                tag.is_optional = Some(true);
                tag = tag.with_type(Some(base.to_string()));
            } else {
                tag = tag.with_type(Some(type_name.to_string()));
            }
        }
        (TagKind::Param, _) => {
            return Err(DocParseError::MissingArgName {
                tag: keyword.to_string(),
            });
        }
        (TagKind::Returns | TagKind::Yields | TagKind::Raises, []) => {}
        (TagKind::Returns | TagKind::Yields | TagKind::Raises, [type_name]) => {
            tag = tag.with_type(Some(type_name.to_string()));
        }
        (TagKind::Other, _) => {}
        _ => return Err(DocParseError::UnexpectedArguments(chunk.to_string())),
    }
    if tag.kind == TagKind::Param {
        tag.default = default_from_description(tag.description.as_deref());
    }
    Ok(tag)
}

// ---------------------------------------------------------------------------
// Google
// ---------------------------------------------------------------------------

pub(super) fn parse_google(text: &str) -> Result<StructuredDoc, DocParseError> {
    let text = cleandoc(text);
    let lines: Vec<&str> = text.lines().collect();

    let mut sections: Vec<(&str, Vec<&str>)> = Vec::new();
    let mut description: Vec<&str> = Vec::new();
    for &line in &lines {
        if let Some(caps) = GOOGLE_SECTION.captures(line) {
            let title = caps.get(1).map_or("", |m| m.as_str());
            sections.push((title, Vec::new()));
        } else if let Some((_, body)) = sections.last_mut() {
            body.push(line);
        } else {
            description.push(line);
        }
    }

    let mut doc = StructuredDoc::from_description(&description.join("\n"));
    for (title, body) in sections {
        let Some(keyword) = google_keyword(title) else {
            continue;
        };
        match TagKind::classify(keyword) {
            TagKind::Returns | TagKind::Yields => {
                let entry = cleandoc(&format!("\n{}", body.join("\n")));
                if entry.is_empty() {
                    continue;
                }
                doc.tags.push(google_return(keyword, &entry));
            }
            kind => {
                for entry in split_entries(&body) {
                    doc.tags.push(google_entry(keyword, kind, &entry)?);
                }
            }
        }
    }
    Ok(doc)
}

fn google_keyword(title: &str) -> Option<&'static str> {
    match title {
        "Args" | "Arguments" | "Parameters" | "Params" | "Keyword Args" | "Keyword Arguments"
        | "Other Parameters" => Some("param"),
        "Attributes" => Some("attribute"),
        "Returns" | "Return" => Some("returns"),
        "Yields" | "Yield" => Some("yields"),
        "Raises" | "Raise" | "Exceptions" | "Except" => Some("raises"),
        _ => None,
    }
}

/// Groups section lines into entries: a line at the section's base
/// indentation starts an entry, deeper lines continue it.
fn split_entries(body: &[&str]) -> Vec<String> {
    let indent = body
        .iter()
        .filter(|l| !l.trim().is_empty())
        .map(|l| l.len() - l.trim_start().len())
        .min()
        .unwrap_or(0);

    let mut entries: Vec<String> = Vec::new();
    for line in body {
        if line.trim().is_empty() {
            continue;
        }
        let depth = line.len() - line.trim_start().len();
        match entries.last_mut() {
            Some(entry) if depth > indent => {
                entry.push('\n');
                entry.push_str(line.trim());
            }
            _ => entries.push(line.trim().to_string()),
        }
    }
    entries
}

fn google_entry(keyword: &str, kind: TagKind, entry: &str) -> Result<DocTag, DocParseError> {
    let (before, desc) = entry
        .split_once(':')
        .ok_or_else(|| DocParseError::MissingColon(entry.to_string()))?;
    let desc = desc.trim();
    let tag = DocTag::new(keyword).with_description(desc);

    if kind == TagKind::Raises {
        return Ok(tag.with_type(non_empty(before)));
    }

    let mut tag = match GOOGLE_TYPED_ARG.captures(before) {
        Some(caps) => {
            let name = caps.get(1).map_or("", |m| m.as_str());
            let mut type_name = caps.get(2).map_or("", |m| m.as_str());
            let mut optional = None;
            if let Some(base) = type_name.strip_suffix(", optional") {
                type_name = base;
                optional = Some(true);
            }
            let mut tag = tag.with_arg_name(name).with_type(non_empty(type_name));
            tag.is_optional = optional;
            tag
        }
        None => {
            let name = before.trim();
            if name.is_empty() {
                return Err(DocParseError::MissingArgName {
                    tag: keyword.to_string(),
                });
            }
            tag.with_arg_name(name)
        }
    };
    tag.default = default_from_description(tag.description.as_deref());
    Ok(tag)
}

fn google_return(keyword: &str, entry: &str) -> DocTag {
    let first_line = entry.lines().next().unwrap_or_default();
    match first_line.split_once(':') {
        // `int: the count`, but not prose such as `The result: ...` spanning words
        Some((type_name, _)) if !type_name.trim().contains(' ') || type_name.contains('[') => {
            let (_, desc) = entry.split_once(':').unwrap_or(("", entry));
            DocTag::new(keyword)
                .with_type(non_empty(type_name))
                .with_description(desc)
        }
        _ => DocTag::new(keyword).with_description(entry),
    }
}

// ---------------------------------------------------------------------------
// NumPy
// ---------------------------------------------------------------------------

pub(super) fn parse_numpy(text: &str) -> Result<StructuredDoc, DocParseError> {
    let text = cleandoc(text);
    let lines: Vec<&str> = text.lines().collect();

    let mut description: Vec<&str> = Vec::new();
    let mut sections: Vec<(&str, Vec<&str>)> = Vec::new();
    let mut i = 0;
    while i < lines.len() {
        let line = lines[i];
        let is_title = NUMPY_TITLES.contains(&line.trim())
            && lines.get(i + 1).is_some_and(|next| NUMPY_UNDERLINE.is_match(next));
        if is_title {
            sections.push((line.trim(), Vec::new()));
            i += 2;
            continue;
        }
        match sections.last_mut() {
            Some((_, body)) => body.push(line),
            None => description.push(line),
        }
        i += 1;
    }

    let mut doc = StructuredDoc::from_description(&description.join("\n"));
    for (title, body) in sections {
        let keyword = match title {
            "Parameters" | "Other Parameters" | "Receives" => "param",
            "Attributes" => "attribute",
            "Returns" => "returns",
            "Yields" => "yields",
            "Raises" => "raises",
            _ => continue,
        };
        for entry in split_entries(&body) {
            doc.tags.push(numpy_entry(keyword, &entry));
        }
    }
    Ok(doc)
}

fn numpy_entry(keyword: &str, entry: &str) -> DocTag {
    let (head, desc) = entry.split_once('\n').unwrap_or((entry, ""));
    let tag = DocTag::new(keyword).with_description(desc);

    match tag.kind {
        TagKind::Param => {
            let (name, type_spec) = match head.split_once(" : ") {
                Some((name, spec)) => (name.trim(), spec.trim()),
                None => (head.trim().trim_end_matches(':').trim(), ""),
            };
            let mut optional = None;
            let mut default = None;
            let mut type_parts: Vec<&str> = Vec::new();
            for part in type_spec.split(',').map(str::trim) {
                if part == "optional" {
                    optional = Some(true);
                } else if let Some(value) = part
                    .strip_prefix("default")
                    .map(|v| v.trim_start_matches([' ', ':', '=']))
                {
                    default = non_empty(value);
                } else if !part.is_empty() {
                    type_parts.push(part);
                }
            }
            let described_default = default_from_description(tag.description.as_deref());
            let mut tag = tag
                .with_arg_name(name)
                .with_type(non_empty(&type_parts.join(", ")));
            tag.is_optional = optional;
            tag.default = default.or(described_default);
            tag
        }
        _ => {
            // `name : type` for named returns, otherwise just the type
            let type_name = match head.split_once(" : ") {
                Some((_, ty)) => ty,
                None => head,
            };
            tag.with_type(non_empty(type_name))
        }
    }
}
