//! Attribute block parser
//!
//! An attribute block is a list of text records: a `T` header whose last
//! field counts the lines of one logical `name=value` string. A count of
//! zero marks a deleted slot and is skipped. Continuation lines are appended
//! to the value as-is, and only the first `=` separates name from value.
//!
//! Visibility and show-mode stay uninterpreted here; the renderer decides
//! what to draw because it needs the enclosing component's overrides.

use crate::ast::Attribute;
use crate::errors::{ParseError, SourceContext};
use crate::parse::{Cursor, SourceLine, check_fields, malformed, parse_header, split_lines, text_header};
use crate::Rule;

/// Decode a whole `{ }` body given as its own source text
pub fn parse_attributes(ctx: &SourceContext) -> Result<Vec<Attribute>, ParseError> {
    let lines = split_lines(&ctx.source);
    parse_attribute_lines(ctx, &lines)
}

pub(crate) fn parse_attribute_lines(
    ctx: &SourceContext,
    lines: &[SourceLine<'_>],
) -> Result<Vec<Attribute>, ParseError> {
    let mut cursor = Cursor::new(lines.to_vec());
    let mut attributes = Vec::new();

    while let Some(line) = cursor.next_header() {
        let header = parse_header(ctx, &line)?;
        if header.kind != Rule::text {
            return Err(malformed(ctx, &line, "attribute blocks may only hold text records"));
        }
        check_fields(ctx, &line, &header.ints)?;
        let count = header.ints[8];
        let count = usize::try_from(count)
            .map_err(|_| malformed(ctx, &line, format!("negative attribute line count {count}")))?;
        if count == 0 {
            continue;
        }
        let body = cursor.take_body(count).ok_or_else(|| {
            malformed(
                ctx,
                &line,
                format!("attribute declares {count} lines but only {} remain", cursor.remaining()),
            )
        })?;

        let (key, first) = body[0]
            .text
            .split_once('=')
            .ok_or_else(|| malformed(ctx, &body[0], "attribute text has no `=`"))?;
        let mut value = first.to_string();
        for continuation in &body[1..] {
            value.push_str(continuation.text);
        }

        attributes.push(Attribute {
            header: text_header(ctx, &line, &header.ints)?,
            key: key.to_string(),
            value,
        });
    }
    Ok(attributes)
}
