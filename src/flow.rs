/*
 * This Source Code Form is subject to the terms of the
 * Mozilla Public License, v. 2.0. If a copy of the MPL
 * was not distributed with this file, You can obtain one at http://mozilla.org/MPL/2.0/.
 */

//! A minimal flow-YAML fragment reader.
//!
//! `spec.md`'s `MAP_KEY` (flow) token treats the YAML parser as a black-box
//! collaborator: "consume one complete YAML fragment via the YAML parser in
//! flow-only mode". This crate has no streaming YAML parser to delegate to,
//! so this module hand-rolls the small subset of flow-YAML needed for keys:
//! quoted strings, flow sequences, flow mappings, and the handful of plain
//! scalar shapes (null/bool/int/float/bare word) that can appear as a flow
//! map's keys or values. It shares [`crate::reader::CharReader`] with the
//! tokenizer and the document loader rather than introducing its own
//! scanning primitive.

use crate::error::{Error, ErrorKind};
use crate::reader::{CharReader, Span};

/// A parsed YAML fragment, owned by the `Expr` (`MapKey`) that holds it.
///
/// Kept deliberately small: this is not a general YAML value, only what can
/// occur as a flow-mode key or nested value.
#[derive(Debug, Clone, PartialEq)]
pub enum FlowValue
{
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Seq(Vec<FlowValue>),
    Map(Vec<(FlowValue, FlowValue)>),
}

/// Reads one complete flow-YAML fragment starting at the reader's current
/// position, leaving the cursor just past the fragment.
pub fn read_fragment(reader: &mut CharReader<'_>) -> Result<FlowValue, Error>
{
    skip_ws(reader);

    match reader.peek()
    {
        Some('"') => read_double_quoted(reader),
        Some('\'') => read_single_quoted(reader),
        Some('[') => read_seq(reader),
        Some('{') => read_map(reader),
        Some(_) => read_plain_scalar(reader),
        None => Err(Error::new(ErrorKind::UnexpectedEnd, None)),
    }
}

fn skip_ws(reader: &mut CharReader<'_>)
{
    while matches!(reader.peek(), Some(' ') | Some('\t'))
    {
        reader.advance(1);
    }
}

fn read_double_quoted(reader: &mut CharReader<'_>) -> Result<FlowValue, Error>
{
    let start = reader.mark();
    reader.advance(1); // opening quote
    let mut out = String::new();

    loop
    {
        match reader.peek()
        {
            None => return Err(truncated(reader, start)),
            Some('"') =>
            {
                reader.advance(1);
                break;
            },
            Some('\\') =>
            {
                reader.advance(1);
                match reader.peek()
                {
                    Some('n') => out.push('\n'),
                    Some('t') => out.push('\t'),
                    Some('"') => out.push('"'),
                    Some('\\') => out.push('\\'),
                    Some(c) => out.push(c),
                    None => return Err(truncated(reader, start)),
                }
                reader.advance(1);
            },
            Some(c) =>
            {
                out.push(c);
                reader.advance(1);
            },
        }
    }

    Ok(FlowValue::Str(out))
}

fn read_single_quoted(reader: &mut CharReader<'_>) -> Result<FlowValue, Error>
{
    let start = reader.mark();
    reader.advance(1);
    let mut out = String::new();

    loop
    {
        match reader.peek()
        {
            None => return Err(truncated(reader, start)),
            Some('\'') if reader.peek_at(1) == Some('\'') =>
            {
                out.push('\'');
                reader.advance(2);
            },
            Some('\'') =>
            {
                reader.advance(1);
                break;
            },
            Some(c) =>
            {
                out.push(c);
                reader.advance(1);
            },
        }
    }

    Ok(FlowValue::Str(out))
}

fn read_seq(reader: &mut CharReader<'_>) -> Result<FlowValue, Error>
{
    let start = reader.mark();
    reader.advance(1); // '['
    let mut items = Vec::new();

    skip_ws(reader);
    if reader.peek() == Some(']')
    {
        reader.advance(1);
        return Ok(FlowValue::Seq(items));
    }

    loop
    {
        skip_ws(reader);
        items.push(read_fragment(reader)?);
        skip_ws(reader);

        match reader.peek()
        {
            Some(',') =>
            {
                reader.advance(1);
            },
            Some(']') =>
            {
                reader.advance(1);
                break;
            },
            _ => return Err(truncated(reader, start)),
        }
    }

    Ok(FlowValue::Seq(items))
}

fn read_map(reader: &mut CharReader<'_>) -> Result<FlowValue, Error>
{
    let start = reader.mark();
    reader.advance(1); // '{'
    let mut entries = Vec::new();

    skip_ws(reader);
    if reader.peek() == Some('}')
    {
        reader.advance(1);
        return Ok(FlowValue::Map(entries));
    }

    loop
    {
        skip_ws(reader);
        let key = read_fragment(reader)?;
        skip_ws(reader);

        match reader.peek()
        {
            Some(':') => reader.advance(1),
            _ => return Err(truncated(reader, start)),
        }

        skip_ws(reader);
        let value = read_fragment(reader)?;
        entries.push((key, value));
        skip_ws(reader);

        match reader.peek()
        {
            Some(',') =>
            {
                reader.advance(1);
            },
            Some('}') =>
            {
                reader.advance(1);
                break;
            },
            _ => return Err(truncated(reader, start)),
        }
    }

    Ok(FlowValue::Map(entries))
}

fn is_plain_terminator(c: char) -> bool
{
    matches!(c, ',' | '[' | ']' | '{' | '}' | ':' | ' ' | '\t')
}

fn read_plain_scalar(reader: &mut CharReader<'_>) -> Result<FlowValue, Error>
{
    let start = reader.mark();

    while reader
        .peek()
        .map(|c| !is_plain_terminator(c))
        .unwrap_or(false)
    {
        reader.advance(1);
    }

    let span = reader.fill_atom(start);
    let text = reader.slice(span);

    if text.is_empty()
    {
        return Err(Error::new(
            ErrorKind::InvalidFlowFragment("empty scalar".into()),
            Some(span),
        ));
    }

    Ok(classify_scalar(text))
}

fn classify_scalar(text: &str) -> FlowValue
{
    match text
    {
        "null" | "Null" | "NULL" | "~" => FlowValue::Null,
        "true" | "True" | "TRUE" => FlowValue::Bool(true),
        "false" | "False" | "FALSE" => FlowValue::Bool(false),
        _ =>
        {
            if let Ok(i) = text.parse::<i64>()
            {
                FlowValue::Int(i)
            }
            else if let Ok(f) = text.parse::<f64>()
            {
                FlowValue::Float(f)
            }
            else
            {
                FlowValue::Str(text.to_owned())
            }
        },
    }
}

fn truncated(reader: &CharReader<'_>, start: crate::reader::Mark) -> Error
{
    Error::new(ErrorKind::UnterminatedFlowFragment, Some(reader.fill_atom(start)))
}

#[allow(dead_code)]
pub(crate) fn span_of<F>(reader: &mut CharReader<'_>, f: F) -> Result<(FlowValue, Span), Error>
where
    F: FnOnce(&mut CharReader<'_>) -> Result<FlowValue, Error>,
{
    let start = reader.mark();
    let value = f(reader)?;
    Ok((value, reader.fill_atom(start)))
}

#[cfg(test)]
mod tests
{
    use super::*;

    fn parse(src: &str) -> FlowValue
    {
        let mut r = CharReader::new(src);
        read_fragment(&mut r).expect("fragment should parse")
    }

    #[test]
    fn scalars()
    {
        assert_eq!(parse("null"), FlowValue::Null);
        assert_eq!(parse("true"), FlowValue::Bool(true));
        assert_eq!(parse("42"), FlowValue::Int(42));
        assert_eq!(parse("3.5"), FlowValue::Float(3.5));
        assert_eq!(parse("bareword"), FlowValue::Str("bareword".into()));
    }

    #[test]
    fn quoted_strings()
    {
        assert_eq!(parse("\"a b\""), FlowValue::Str("a b".into()));
        assert_eq!(parse("'it''s'"), FlowValue::Str("it's".into()));
    }

    #[test]
    fn seq_and_map()
    {
        assert_eq!(
            parse("[1, 2, 3]"),
            FlowValue::Seq(vec![FlowValue::Int(1), FlowValue::Int(2), FlowValue::Int(3)])
        );
        assert_eq!(
            parse("{a: 1, b: 2}"),
            FlowValue::Map(vec![
                (FlowValue::Str("a".into()), FlowValue::Int(1)),
                (FlowValue::Str("b".into()), FlowValue::Int(2)),
            ])
        );
    }

    #[test]
    fn truncated_seq_errors()
    {
        let mut r = CharReader::new("[1, 2");
        assert!(read_fragment(&mut r).is_err());
    }
}
