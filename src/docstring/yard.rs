//! YARD tags, as written in Ruby comments.
//!
//! ```text
//! Summary line.
//! @param name [String] description
//! @param [Integer] count description
//! @return [Boolean] description
//! @raise [ArgumentError] description
//! ```

use super::{
    DocParseError, DocTag, StructuredDoc, TagKind, parse_block_tags, split_first_word,
    take_bracketed,
};

pub(super) fn parse(text: &str) -> Result<StructuredDoc, DocParseError> {
    parse_block_tags(text, parse_block)
}

fn take_types<'a>(text: &'a str, keyword: &str) -> Result<(Option<String>, &'a str), DocParseError> {
    let text = text.trim_start();
    if !text.starts_with('[') {
        return Ok((None, text));
    }
    let (types, rest) = take_bracketed(text, '[', ']').ok_or_else(|| {
        DocParseError::UnbalancedType {
            tag: keyword.to_string(),
        }
    })?;
    Ok((Some(types.trim().to_string()), rest.trim_start()))
}

fn parse_block(block: &str) -> Result<DocTag, DocParseError> {
    let (keyword, rest) = split_first_word(&block[1..]);
    // `@yieldparam` and `@option` carry argument names but are not signature parameters
    let tag = DocTag::new(keyword);

    if tag.kind == TagKind::Param {
        let (leading_type, rest) = take_types(rest, keyword)?;
        let (name, rest) = split_first_word(rest);
        if name.is_empty() {
            return Err(DocParseError::MissingArgName {
                tag: keyword.to_string(),
            });
        }
        let (trailing_type, rest) = take_types(rest, keyword)?;
        return Ok(tag
            .with_arg_name(name)
            .with_type(leading_type.or(trailing_type))
            .with_description(rest));
    }

    let (type_name, rest) = take_types(rest, keyword)?;
    Ok(tag.with_type(type_name).with_description(rest))
}
