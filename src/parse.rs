//! Grammar parser: raw file text to [`ObjectRecord`]s
//!
//! The format is line oriented. A record starts with a header line whose
//! first token is its kind tag; `T` and `H` headers end with the number of
//! body lines that follow verbatim. A header may then be followed by a
//! `[ ]` block (embedded symbol, components only) and, independently, a
//! `{ }` block (attributes). Header lines are checked against a per-kind
//! schema by the pest grammar; everything else is plain line scanning.

use glam::{IVec2, ivec2};
use miette::SourceSpan;
use pest::Parser;
use pest::iterators::Pair;

use crate::ast::*;
use crate::attrs::parse_attribute_lines;
use crate::errors::{BlockKind, ParseError, SourceContext};
use crate::render::defaults::COORD_LIMIT;
use crate::transform::Rotation;
use crate::types::{BoundingBox, ColorIndex};
use crate::{Rule, SchematicParser};

/// Records of one file plus the bounds of the geometry they directly hold.
///
/// Component instances only contribute their placement point here; symbol
/// resolution adds the rest.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedFile {
    pub records: Vec<ObjectRecord>,
    pub bounds: BoundingBox,
}

/// One physical line and where it sits in the source
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct SourceLine<'a> {
    pub text: &'a str,
    pub offset: usize,
    pub number: usize,
}

impl SourceLine<'_> {
    pub fn span(&self) -> SourceSpan {
        (self.offset, self.text.len()).into()
    }
}

pub(crate) fn split_lines(source: &str) -> Vec<SourceLine<'_>> {
    let mut offset = 0;
    source
        .split_inclusive('\n')
        .enumerate()
        .map(|(i, raw)| {
            let line = SourceLine {
                text: raw.trim_end_matches(|c| c == '\n' || c == '\r'),
                offset,
                number: i + 1,
            };
            offset += raw.len();
            line
        })
        .collect()
}

pub(crate) fn malformed(ctx: &SourceContext, line: &SourceLine<'_>, message: impl Into<String>) -> ParseError {
    ParseError::MalformedRecord {
        message: message.into(),
        src: ctx.named_source(),
        span: line.span(),
    }
}

/// Forward-only view over the lines of a file
pub(crate) struct Cursor<'a> {
    lines: Vec<SourceLine<'a>>,
    pos: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(lines: Vec<SourceLine<'a>>) -> Self {
        Cursor { lines, pos: 0 }
    }

    pub fn take(&mut self) -> Option<SourceLine<'a>> {
        let line = self.lines.get(self.pos).copied()?;
        self.pos += 1;
        Some(line)
    }

    /// Next non-blank line, where a record header is expected
    pub fn next_header(&mut self) -> Option<SourceLine<'a>> {
        while let Some(line) = self.take() {
            if !line.text.trim().is_empty() {
                return Some(line);
            }
        }
        None
    }

    /// Take exactly `count` lines, or `None` if the file ends first
    pub fn take_body(&mut self, count: usize) -> Option<Vec<SourceLine<'a>>> {
        let end = self.pos.checked_add(count)?;
        let body = self.lines.get(self.pos..end)?.to_vec();
        self.pos = end;
        Some(body)
    }

    pub fn remaining(&self) -> usize {
        self.lines.len().saturating_sub(self.pos)
    }

    pub fn peek_is(&self, delimiter: &str) -> bool {
        self.lines
            .get(self.pos)
            .is_some_and(|line| line.text.trim() == delimiter)
    }
}

/// A header line checked against its kind's schema
pub(crate) struct Header<'a> {
    pub kind: Rule,
    pub ints: Vec<i32>,
    pub words: Vec<&'a str>,
}

impl Header<'_> {
    /// Number of verbatim body lines following the header
    fn body_lines(&self) -> Option<i32> {
        match self.kind {
            Rule::text => self.ints.get(8).copied(),
            Rule::path => self.ints.get(12).copied(),
            _ => None,
        }
    }
}

pub(crate) fn parse_header<'a>(ctx: &SourceContext, line: &SourceLine<'a>) -> Result<Header<'a>, ParseError> {
    let tag = line.text.split_whitespace().next().unwrap_or_default();
    let mut pairs = SchematicParser::parse(Rule::header, line.text).map_err(|e| {
        malformed(
            ctx,
            line,
            format!("`{}` header does not match its schema: {}", tag, e.variant.message()),
        )
    })?;
    let kind = pairs
        .next()
        .and_then(|header| header.into_inner().next())
        .ok_or_else(|| malformed(ctx, line, "empty header"))?;

    let rule = kind.as_rule();
    let mut ints = Vec::new();
    let mut words = Vec::new();
    for field in kind.into_inner() {
        match field.as_rule() {
            Rule::int => ints.push(parse_int(ctx, line, &field)?),
            _ => words.push(field.as_str()),
        }
    }
    Ok(Header { kind: rule, ints, words })
}

fn parse_int(ctx: &SourceContext, line: &SourceLine<'_>, pair: &Pair<'_, Rule>) -> Result<i32, ParseError> {
    pair.as_str()
        .parse::<i32>()
        .map_err(|_| malformed(ctx, line, format!("number out of range: {}", pair.as_str())))
}

/// Parse one schematic or symbol file
pub fn parse(ctx: &SourceContext) -> Result<ParsedFile, ParseError> {
    let mut cursor = Cursor::new(split_lines(&ctx.source));
    let mut records = Vec::new();
    let mut bounds = BoundingBox::new();

    while let Some(line) = cursor.next_header() {
        if matches!(line.text.trim(), "[" | "]" | "{" | "}") {
            return Err(malformed(ctx, &line, "block delimiter without a record to attach to"));
        }
        let header = parse_header(ctx, &line)?;

        let body = match header.body_lines() {
            Some(count) => {
                let count = usize::try_from(count)
                    .map_err(|_| malformed(ctx, &line, format!("negative body line count {count}")))?;
                cursor.take_body(count).ok_or_else(|| {
                    malformed(
                        ctx,
                        &line,
                        format!("declares {count} body lines but only {} remain", cursor.remaining()),
                    )
                })?
            }
            None => Vec::new(),
        };

        let embedded = if cursor.peek_is("[") {
            let block = take_block(ctx, &mut cursor, BlockKind::Embedded)?;
            Some(join_lines(&block))
        } else {
            None
        };

        let attributes = if cursor.peek_is("{") {
            let block = take_block(ctx, &mut cursor, BlockKind::Attributes)?;
            parse_attribute_lines(ctx, &block)?
        } else {
            Vec::new()
        };

        let object = build_object(ctx, &line, header, &body, embedded)?;
        expand_local_bounds(&mut bounds, &object);
        records.push(ObjectRecord {
            object,
            attributes,
            line: line.number,
        });
    }

    crate::log::debug!(
        source = %ctx.name,
        records = records.len(),
        "parsed file"
    );
    Ok(ParsedFile { records, bounds })
}

/// Consume a delimited block, returning the lines between the delimiters.
///
/// Embedded bodies may themselves hold embedded components, so `[` nests.
fn take_block<'a>(
    ctx: &SourceContext,
    cursor: &mut Cursor<'a>,
    kind: BlockKind,
) -> Result<Vec<SourceLine<'a>>, ParseError> {
    let (open, close) = match kind {
        BlockKind::Embedded => ("[", "]"),
        BlockKind::Attributes => ("{", "}"),
    };
    let Some(opening) = cursor.take() else {
        return Ok(Vec::new());
    };

    let mut depth = 1usize;
    let mut body = Vec::new();
    loop {
        let Some(line) = cursor.take() else {
            return Err(ParseError::UnterminatedBlock {
                block: kind,
                src: ctx.named_source(),
                span: opening.span(),
            });
        };
        let trimmed = line.text.trim();
        if kind == BlockKind::Embedded && trimmed == open {
            depth += 1;
        } else if trimmed == close {
            depth -= 1;
            if depth == 0 {
                return Ok(body);
            }
        }
        body.push(line);
    }
}

fn join_lines(lines: &[SourceLine<'_>]) -> String {
    let mut out = String::new();
    for line in lines {
        out.push_str(line.text);
        out.push('\n');
    }
    out
}

/// Reject numeric fields whose magnitude exceeds [`COORD_LIMIT`]
pub(crate) fn check_fields(ctx: &SourceContext, line: &SourceLine<'_>, ints: &[i32]) -> Result<(), ParseError> {
    match ints.iter().find(|v| v.unsigned_abs() > COORD_LIMIT.unsigned_abs()) {
        Some(v) => Err(malformed(
            ctx,
            line,
            format!("field {v} is outside the supported range of ±{COORD_LIMIT}"),
        )),
        None => Ok(()),
    }
}

fn check_point(ctx: &SourceContext, line: &SourceLine<'_>, p: IVec2) -> Result<IVec2, ParseError> {
    check_fields(ctx, line, &p.to_array())?;
    Ok(p)
}

fn color(ctx: &SourceContext, line: &SourceLine<'_>, value: i32) -> Result<ColorIndex, ParseError> {
    usize::try_from(value)
        .map(ColorIndex)
        .map_err(|_| malformed(ctx, line, format!("negative color index {value}")))
}

/// Decode the eight leading `T` fields shared by text and attributes
pub(crate) fn text_header(ctx: &SourceContext, line: &SourceLine<'_>, i: &[i32]) -> Result<TextHeader, ParseError> {
    let show = match i[5] {
        0 => ShowMode::NameValue,
        1 => ShowMode::Value,
        2 => ShowMode::Name,
        other => return Err(malformed(ctx, line, format!("unknown show mode {other}"))),
    };
    let alignment = u8::try_from(i[7])
        .ok()
        .filter(|a| *a <= 8)
        .ok_or_else(|| malformed(ctx, line, format!("alignment {} is outside 0..=8", i[7])))?;
    Ok(TextHeader {
        origin: ivec2(i[0], i[1]),
        color: color(ctx, line, i[2])?,
        size: i[3],
        visible: i[4] != 0,
        show,
        angle: i[6],
        alignment,
    })
}

fn build_object(
    ctx: &SourceContext,
    line: &SourceLine<'_>,
    header: Header<'_>,
    body: &[SourceLine<'_>],
    embedded: Option<String>,
) -> Result<Object, ParseError> {
    if embedded.is_some() && header.kind != Rule::component {
        return Err(malformed(ctx, line, "only components may carry an embedded `[ ]` body"));
    }
    let i = &header.ints;
    if !matches!(header.kind, Rule::version | Rule::opaque) {
        check_fields(ctx, line, i)?;
    }
    let object = match header.kind {
        Rule::line => Object::Line(Line {
            from: ivec2(i[0], i[1]),
            to: ivec2(i[2], i[3]),
            color: color(ctx, line, i[4])?,
            width: i[5],
        }),
        Rule::net => Object::Net(Net {
            from: ivec2(i[0], i[1]),
            to: ivec2(i[2], i[3]),
            color: color(ctx, line, i[4])?,
        }),
        Rule::bus => Object::Bus(Bus {
            from: ivec2(i[0], i[1]),
            to: ivec2(i[2], i[3]),
            color: color(ctx, line, i[4])?,
            ripper_direction: i[5],
        }),
        Rule::pin => Object::Pin(Pin {
            from: ivec2(i[0], i[1]),
            to: ivec2(i[2], i[3]),
            color: color(ctx, line, i[4])?,
            kind: if i[5] == 1 { PinKind::Bus } else { PinKind::Normal },
            active_end: match i[6] {
                0 => PinEnd::First,
                1 => PinEnd::Second,
                other => return Err(malformed(ctx, line, format!("pin end must be 0 or 1, got {other}"))),
            },
        }),
        Rule::box_obj => Object::Box(BoxObject {
            corner: ivec2(i[0], i[1]),
            size: ivec2(i[2], i[3]),
            color: color(ctx, line, i[4])?,
            width: i[5],
            filled: i[10] == 1,
        }),
        Rule::circle => Object::Circle(Circle {
            center: ivec2(i[0], i[1]),
            radius: i[2],
            color: color(ctx, line, i[3])?,
            width: i[4],
            filled: i[9] == 1,
        }),
        Rule::arc => Object::Arc(Arc {
            center: ivec2(i[0], i[1]),
            radius: i[2],
            start_angle: i[3],
            sweep_angle: i[4],
            color: color(ctx, line, i[5])?,
            width: i[6],
        }),
        Rule::text => Object::Text(Text {
            header: text_header(ctx, line, i)?,
            lines: body.iter().map(|l| l.text.to_string()).collect(),
        }),
        Rule::path => {
            let data = join_lines(body);
            Object::Path(Path {
                color: color(ctx, line, i[0])?,
                width: i[1],
                filled: i[6] == 1,
                commands: parse_path_data(ctx, line, &data)?,
            })
        }
        Rule::component => {
            let rotation = Rotation::from_degrees(i[3])
                .ok_or_else(|| malformed(ctx, line, format!("component angle {} is not a quarter turn", i[3])))?;
            let basename = header
                .words
                .first()
                .ok_or_else(|| malformed(ctx, line, "component without a symbol name"))?;
            Object::Component(Component {
                origin: ivec2(i[0], i[1]),
                selectable: i[2] != 0,
                rotation,
                mirrored: i[4] != 0,
                basename: basename.to_string(),
                embedded,
            })
        }
        Rule::version | Rule::opaque => {
            let mut tokens = line.text.split_whitespace();
            Object::Other(Opaque {
                tag: tokens.next().unwrap_or_default().to_string(),
                fields: tokens.map(str::to_string).collect(),
            })
        }
        other => return Err(malformed(ctx, line, format!("unexpected header rule {other:?}"))),
    };
    Ok(object)
}

/// Parse `H` body text into absolute commands
fn parse_path_data(ctx: &SourceContext, line: &SourceLine<'_>, data: &str) -> Result<Vec<PathCommand>, ParseError> {
    let mut pairs = SchematicParser::parse(Rule::path_data, data)
        .map_err(|e| malformed(ctx, line, format!("bad path data: {}", e.variant.message())))?;
    let mut commands = Vec::new();
    let Some(root) = pairs.next() else {
        return Ok(commands);
    };

    let mut current = IVec2::ZERO;
    let mut subpath_start = IVec2::ZERO;
    for command in root.into_inner() {
        let rule = command.as_rule();
        let relative = matches!(rule, Rule::move_rel | Rule::line_rel | Rule::curve_rel);
        let points = command
            .into_inner()
            .map(|point| parse_point(ctx, line, point))
            .collect::<Result<Vec<_>, _>>()?;

        match rule {
            Rule::move_abs | Rule::move_rel => {
                for (n, p) in points.into_iter().enumerate() {
                    let target = check_point(ctx, line, if relative { current + p } else { p })?;
                    if n == 0 {
                        commands.push(PathCommand::MoveTo(target));
                        subpath_start = target;
                    } else {
                        commands.push(PathCommand::LineTo(target));
                    }
                    current = target;
                }
            }
            Rule::line_abs | Rule::line_rel => {
                for p in points {
                    let target = check_point(ctx, line, if relative { current + p } else { p })?;
                    commands.push(PathCommand::LineTo(target));
                    current = target;
                }
            }
            Rule::curve_abs | Rule::curve_rel => {
                for chunk in points.chunks_exact(3) {
                    let base = if relative { current } else { IVec2::ZERO };
                    let end = check_point(ctx, line, base + chunk[2])?;
                    commands.push(PathCommand::CurveTo(
                        check_point(ctx, line, base + chunk[0])?,
                        check_point(ctx, line, base + chunk[1])?,
                        end,
                    ));
                    current = end;
                }
            }
            Rule::close => {
                commands.push(PathCommand::Close);
                current = subpath_start;
            }
            _ => {}
        }
    }
    Ok(commands)
}

fn parse_point(ctx: &SourceContext, line: &SourceLine<'_>, pair: Pair<'_, Rule>) -> Result<IVec2, ParseError> {
    let mut coords = pair.into_inner();
    match (coords.next(), coords.next()) {
        (Some(x), Some(y)) => check_point(ctx, line, ivec2(parse_int(ctx, line, &x)?, parse_int(ctx, line, &y)?)),
        _ => Err(malformed(ctx, line, "path point needs two coordinates")),
    }
}

/// Grow `bounds` by the geometry an object holds directly
pub fn expand_local_bounds(bounds: &mut BoundingBox, object: &Object) {
    match object {
        Object::Line(Line { from, to, .. })
        | Object::Net(Net { from, to, .. })
        | Object::Bus(Bus { from, to, .. })
        | Object::Pin(Pin { from, to, .. }) => {
            bounds.expand_point(*from);
            bounds.expand_point(*to);
        }
        Object::Box(b) => {
            bounds.expand_point(b.corner);
            bounds.expand_point(b.corner + b.size);
        }
        Object::Text(t) => bounds.expand_point(t.header.origin),
        Object::Arc(a) => bounds.expand_radius(a.center, a.radius),
        Object::Circle(c) => bounds.expand_radius(c.center, c.radius),
        Object::Path(p) => {
            for command in &p.commands {
                command.for_each_point(|pt| bounds.expand_point(pt));
            }
        }
        Object::Component(c) => bounds.expand_point(c.origin),
        Object::Other(_) => {}
    }
}
