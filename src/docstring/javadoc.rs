//! Javadoc and JSDoc block tags.
//!
//! ```text
//! Summary line.
//! @param {string} name description
//! @param [count=1] optional JSDoc parameter
//! @return description
//! @throws IOException description
//! ```

use super::{
    DocParseError, DocTag, StructuredDoc, TagKind, non_empty, parse_block_tags, split_first_word,
    take_bracketed,
};

pub(super) fn parse(text: &str) -> Result<StructuredDoc, DocParseError> {
    parse_block_tags(text, parse_block)
}

fn parse_block(block: &str) -> Result<DocTag, DocParseError> {
    let (keyword, rest) = split_first_word(&block[1..]);
    let mut tag = DocTag::new(keyword);
    let mut rest = rest.trim_start();

    if rest.starts_with('{') {
        let (type_expr, after) =
            take_bracketed(rest, '{', '}').ok_or_else(|| DocParseError::UnbalancedType {
                tag: keyword.to_string(),
            })?;
        let type_expr = type_expr.trim();
        // JSDoc marks optional parameters with a trailing `=` on the type
        if let Some(base) = type_expr.strip_suffix('=') {
            tag.is_optional = Some(true);
            tag = tag.with_type(Some(base.trim().to_string()));
        } else {
            tag = tag.with_type(Some(type_expr.to_string()));
        }
        rest = after.trim_start();
    }

    match tag.kind {
        TagKind::Param => {
            let after = if rest.starts_with('[') {
                let (inner, after) =
                    take_bracketed(rest, '[', ']').ok_or_else(|| DocParseError::UnbalancedType {
                        tag: keyword.to_string(),
                    })?;
                let (name, default) = match inner.split_once('=') {
                    Some((name, default)) => (name.trim(), non_empty(default)),
                    None => (inner.trim(), None),
                };
                if name.is_empty() {
                    return Err(DocParseError::MissingArgName {
                        tag: keyword.to_string(),
                    });
                }
                tag = tag.with_arg_name(name);
                tag.default = default;
                tag.is_optional = Some(true);
                after
            } else {
                let (name, after) = split_first_word(rest);
                if name.is_empty() {
                    return Err(DocParseError::MissingArgName {
                        tag: keyword.to_string(),
                    });
                }
                tag = tag.with_arg_name(name);
                after
            };
            let description = after.trim_start();
            let description = description
                .strip_prefix("- ")
                .unwrap_or(description);
            Ok(tag.with_description(description))
        }
        TagKind::Raises if tag.type_name.is_none() => {
            let (exception, after) = split_first_word(rest);
            Ok(tag
                .with_type(non_empty(exception))
                .with_description(after))
        }
        _ => Ok(tag.with_description(rest)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_java_tags() {
        let text = "Adds two numbers.\nSecond line.\n@param a the first\n    operand\n@param b the second\n@return the sum\n@throws ArithmeticException on overflow";
        let doc = parse(text).unwrap();

        assert_eq!(doc.summary(), "Adds two numbers.\nSecond line.");
        assert_eq!(doc.tags.len(), 4);
        assert_eq!(doc.tags[0].arg_name.as_deref(), Some("a"));
        assert_eq!(doc.tags[0].description.as_deref(), Some("the first\noperand"));
        assert_eq!(doc.tags[2].kind, TagKind::Returns);
        assert_eq!(doc.tags[2].description.as_deref(), Some("the sum"));
        assert_eq!(doc.tags[3].kind, TagKind::Raises);
        assert_eq!(doc.tags[3].type_name.as_deref(), Some("ArithmeticException"));
        assert_eq!(doc.tags[3].description.as_deref(), Some("on overflow"));
    }

    #[test]
    fn test_jsdoc_types_and_optionals() {
        let text = "Formats a value.\n@param {string} label - shown first\n@param {number=} width padding\n@param {Object} [opts={}] settings\n@returns {string} the text";
        let doc = parse(text).unwrap();

        let label = &doc.tags[0];
        assert_eq!(label.type_name.as_deref(), Some("string"));
        assert_eq!(label.arg_name.as_deref(), Some("label"));
        assert_eq!(label.description.as_deref(), Some("shown first"));

        let width = &doc.tags[1];
        assert_eq!(width.type_name.as_deref(), Some("number"));
        assert_eq!(width.is_optional, Some(true));

        let opts = &doc.tags[2];
        assert_eq!(opts.arg_name.as_deref(), Some("opts"));
        assert_eq!(opts.default.as_deref(), Some("{}"));
        assert_eq!(opts.is_optional, Some(true));

        let returns = &doc.tags[3];
        assert_eq!(returns.kind, TagKind::Returns);
        assert_eq!(returns.type_name.as_deref(), Some("string"));
        assert_eq!(returns.description.as_deref(), Some("the text"));
    }

    #[test]
    fn test_inline_tags_stay_in_description() {
        let doc = parse("Uses {@link Foo} internally.\n@see Bar").unwrap();
        assert_eq!(doc.summary(), "Uses {@link Foo} internally.");
        assert_eq!(doc.tags[0].kind, TagKind::Other);
    }

    #[test]
    fn test_email_like_text_is_not_a_tag() {
        let doc = parse("Contact me\n@ the office").unwrap();
        assert!(doc.tags.is_empty());
        assert_eq!(doc.summary(), "Contact me\n@ the office");
    }

    #[test]
    fn test_malformed_tags() {
        assert!(matches!(
            parse("Text\n@param"),
            Err(DocParseError::MissingArgName { .. })
        ));
        assert!(matches!(
            parse("Text\n@param {string name"),
            Err(DocParseError::UnbalancedType { .. })
        ));
        assert!(matches!(
            parse("Text\n@param [name"),
            Err(DocParseError::UnbalancedType { .. })
        ));
    }
}
