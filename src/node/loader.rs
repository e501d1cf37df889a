/*
 * This Source Code Form is subject to the terms of the
 * Mozilla Public License, v. 2.0. If a copy of the MPL
 * was not distributed with this file, You can obtain one at http://mozilla.org/MPL/2.0/.
 */

//! A minimal YAML-subset loader that builds a [`Document`].
//!
//! `spec.md` treats the YAML parser as an external black-box collaborator.
//! This loader is that collaborator's stand-in: enough of block and flow
//! YAML to build documents for the engine's own tests, not a conformant
//! YAML 1.1/1.2 implementation. It shares [`CharReader`] and the flow
//! fragment reader ([`crate::flow`]) with the path tokenizer, the way the
//! teacher shares its scanning primitives across scanner states.
//!
//! Supported: block mappings (`key: value`, indentation-nested), block
//! sequences (`- item`, indentation-nested), flow mappings/sequences,
//! single- and double-quoted scalars, anchors (`&name`), and `#` comments.
//! Not supported (documented simplifications, not silent gaps): multi-line
//! flow collections, block scalars (`|`, `>`), tags, multiple documents per
//! stream, and the compact `- key: value` single-line block-sequence
//! mapping shorthand (write `- {key: value}` instead).

use std::collections::HashMap;

use slotmap::SlotMap;

use super::document::{Document, Entry, Payload};
use super::scalar::Scalar;
use super::{NodeId, NodeRef};
use crate::error::{Error, ErrorKind};
use crate::flow::{self, FlowValue};
use crate::reader::CharReader;

struct Line<'a>
{
    indent:  usize,
    content: &'a str,
}

fn split_lines(src: &str) -> Vec<Line<'_>>
{
    src.lines()
        .filter_map(|raw| {
            let indent = raw.len() - raw.trim_start_matches(' ').len();
            let without_comment = strip_comment(raw.trim_start_matches(' '));
            let content = without_comment.trim_end();
            if content.is_empty()
            {
                None
            }
            else
            {
                Some(Line { indent, content })
            }
        })
        .collect()
}

/// Strips a `#` comment to end of line. Not quote-aware (a documented
/// simplification): a `#` inside a quoted scalar on the same line as a
/// mapping entry will be (incorrectly) treated as a comment start.
fn strip_comment(s: &str) -> &str
{
    match s.find('#')
    {
        Some(0) => "",
        Some(i) if s.as_bytes()[i - 1] == b' ' => &s[..i],
        _ => s,
    }
}

fn is_first_alpha(c: char) -> bool
{
    c.is_alphabetic() || c == '_'
}

fn is_alnum(c: char) -> bool
{
    is_first_alpha(c) || c.is_ascii_digit()
}

fn is_seq_item(content: &str) -> bool
{
    content == "-" || content.starts_with("- ")
}

/// If `content` opens with a plain or quoted mapping key immediately
/// followed by `:` (then a space or end-of-line), returns the byte offset
/// just past the key (i.e. the index of the `:`).
fn find_mapping_colon(content: &str) -> Option<usize>
{
    if let Some(rest) = content.strip_prefix('"')
    {
        let mut escaped = false;
        for (i, c) in rest.char_indices()
        {
            if escaped
            {
                escaped = false;
                continue;
            }
            match c
            {
                '\\' => escaped = true,
                '"' =>
                {
                    let end = 1 + i + 1;
                    return colon_follows(content, end);
                },
                _ => {},
            }
        }
        None
    }
    else if let Some(rest) = content.strip_prefix('\'')
    {
        let mut it = rest.char_indices().peekable();
        while let Some((i, c)) = it.next()
        {
            if c == '\''
            {
                if rest[i + 1..].starts_with('\'')
                {
                    it.next();
                    continue;
                }
                let end = 1 + i + 1;
                return colon_follows(content, end);
            }
        }
        None
    }
    else
    {
        let mut chars = content.char_indices();
        let (_, first) = chars.next()?;
        if !is_first_alpha(first)
        {
            return None;
        }
        let mut end = first.len_utf8();
        for (i, c) in chars
        {
            if is_alnum(c)
            {
                end = i + c.len_utf8();
            }
            else
            {
                break;
            }
        }
        colon_follows(content, end)
    }
}

fn colon_follows(content: &str, end: usize) -> Option<usize>
{
    let after = &content[end..];
    if after == ":" || after.starts_with(": ")
    {
        Some(end)
    }
    else
    {
        None
    }
}

fn key_text(content: &str, colon_at: usize) -> String
{
    let raw = &content[..colon_at];
    if (raw.starts_with('"') && raw.ends_with('"') && raw.len() >= 2)
        || (raw.starts_with('\'') && raw.ends_with('\'') && raw.len() >= 2)
    {
        raw[1..raw.len() - 1].to_owned()
    }
    else
    {
        raw.to_owned()
    }
}

struct Builder
{
    arena:   SlotMap<NodeId, Entry>,
    anchors: HashMap<String, NodeId>,
}

impl Builder
{
    fn reserve(&mut self, parent: Option<NodeId>) -> NodeId
    {
        self.arena.insert(Entry { parent, payload: Payload::Scalar(Scalar::Null) })
    }

    fn set_payload(&mut self, id: NodeId, payload: Payload)
    {
        self.arena[id].payload = payload;
    }

    fn insert_scalar(&mut self, scalar: Scalar, parent: Option<NodeId>) -> NodeId
    {
        self.arena.insert(Entry { parent, payload: Payload::Scalar(scalar) })
    }

    fn insert_flow_value(&mut self, value: FlowValue, parent: Option<NodeId>) -> NodeId
    {
        match value
        {
            FlowValue::Seq(items) =>
            {
                let id = self.reserve(parent);
                let ids = items
                    .into_iter()
                    .map(|v| self.insert_flow_value(v, Some(id)))
                    .collect();
                self.set_payload(id, Payload::Sequence(ids));
                id
            },
            FlowValue::Map(entries) =>
            {
                let id = self.reserve(parent);
                let ids = entries
                    .into_iter()
                    .map(|(k, v)| {
                        let kid = self.insert_flow_value(k, Some(id));
                        let vid = self.insert_flow_value(v, Some(id));
                        (kid, vid)
                    })
                    .collect();
                self.set_payload(id, Payload::Mapping(ids));
                id
            },
            scalar => self.insert_scalar(Scalar::from_flow(&scalar).expect("non-collection variant"), parent),
        }
    }

    fn register_anchor(&mut self, name: String, id: NodeId)
    {
        self.anchors.insert(name, id);
    }
}

/// Parses a value appearing after `key:` or `- `, on a single line:
/// optionally an anchor, then a flow construct or a plain scalar.
fn parse_inline_value(text: &str, builder: &mut Builder, parent: Option<NodeId>) -> Result<NodeId, Error>
{
    let mut rest = text.trim();
    let mut anchor = None;

    if let Some(after_amp) = rest.strip_prefix('&')
    {
        let name_len = after_amp.find(' ').unwrap_or(after_amp.len());
        anchor = Some(after_amp[..name_len].to_owned());
        rest = after_amp[name_len..].trim_start();
    }

    let id = if rest.is_empty()
    {
        builder.insert_scalar(Scalar::Null, parent)
    }
    else if matches!(rest.chars().next(), Some('{') | Some('[') | Some('"') | Some('\''))
    {
        let mut reader = CharReader::new(rest);
        let value = flow::read_fragment(&mut reader)?;
        builder.insert_flow_value(value, parent)
    }
    else
    {
        builder.insert_scalar(Scalar::from_plain_text(rest), parent)
    };

    if let Some(name) = anchor
    {
        builder.register_anchor(name, id);
    }

    Ok(id)
}

fn parse_block(lines: &[Line<'_>], pos: &mut usize, builder: &mut Builder, parent: Option<NodeId>) -> Result<NodeId, Error>
{
    let indent = lines[*pos].indent;

    if is_seq_item(lines[*pos].content)
    {
        parse_block_sequence(lines, pos, indent, builder, parent)
    }
    else if find_mapping_colon(lines[*pos].content).is_some()
    {
        parse_block_mapping(lines, pos, indent, builder, parent)
    }
    else
    {
        let content = lines[*pos].content;
        *pos += 1;
        parse_inline_value(content, builder, parent)
    }
}

fn parse_block_mapping(
    lines: &[Line<'_>],
    pos: &mut usize,
    indent: usize,
    builder: &mut Builder,
    parent: Option<NodeId>,
) -> Result<NodeId, Error>
{
    let id = builder.reserve(parent);
    let mut entries = Vec::new();

    while *pos < lines.len() && lines[*pos].indent == indent
    {
        let content = lines[*pos].content;
        let colon = match find_mapping_colon(content)
        {
            Some(c) => c,
            None => break,
        };

        *pos += 1;
        let key = key_text(content, colon);
        let key_id = builder.insert_scalar(Scalar::Str(key), Some(id));
        let value_text = content[colon + 1..].trim_start();

        let value_id = if value_text.is_empty()
        {
            if *pos < lines.len() && lines[*pos].indent > indent
            {
                parse_block(lines, pos, builder, Some(id))?
            }
            else
            {
                builder.insert_scalar(Scalar::Null, Some(id))
            }
        }
        else
        {
            parse_inline_value(value_text, builder, Some(id))?
        };

        entries.push((key_id, value_id));
    }

    builder.set_payload(id, Payload::Mapping(entries));
    Ok(id)
}

fn parse_block_sequence(
    lines: &[Line<'_>],
    pos: &mut usize,
    indent: usize,
    builder: &mut Builder,
    parent: Option<NodeId>,
) -> Result<NodeId, Error>
{
    let id = builder.reserve(parent);
    let mut items = Vec::new();

    while *pos < lines.len() && lines[*pos].indent == indent && is_seq_item(lines[*pos].content)
    {
        let content = lines[*pos].content;
        *pos += 1;
        let rest = if content == "-" { "" } else { content[2..].trim_start() };

        let item_id = if rest.is_empty()
        {
            if *pos < lines.len() && lines[*pos].indent > indent
            {
                parse_block(lines, pos, builder, Some(id))?
            }
            else
            {
                builder.insert_scalar(Scalar::Null, Some(id))
            }
        }
        else
        {
            parse_inline_value(rest, builder, Some(id))?
        };

        items.push(item_id);
    }

    builder.set_payload(id, Payload::Sequence(items));
    Ok(id)
}

/// Loads a [`Document`] from a minimal-YAML-subset source string.
pub fn load(src: &str) -> Result<Document, Error>
{
    let lines = split_lines(src);
    let mut builder = Builder {
        arena:   SlotMap::with_key(),
        anchors: HashMap::new(),
    };

    let root = if lines.is_empty()
    {
        builder.insert_scalar(Scalar::Null, None)
    }
    else
    {
        let mut pos = 0;
        let root = parse_block(&lines, &mut pos, &mut builder, None)?;
        if pos != lines.len()
        {
            return Err(Error::new(
                ErrorKind::InvalidFlowFragment("trailing content at unexpected indentation".into()),
                None,
            ));
        }
        root
    };

    Ok(Document {
        arena:   builder.arena,
        root,
        anchors: builder.anchors,
    })
}

#[allow(dead_code)]
pub(crate) fn node_ref(doc: &Document, id: NodeId) -> NodeRef<'_>
{
    NodeRef::new(doc, id)
}

#[cfg(test)]
mod tests
{
    use super::*;
    use crate::node::Node;

    #[test]
    fn simple_block_mapping()
    {
        let doc = load("a: 1\nb: 2\nc: 3\n").unwrap();
        let root = doc.root();
        assert_eq!(root.kind(), crate::node::NodeKind::Mapping);
        let a = root.mapping_value_by_simple_key("a").unwrap();
        assert_eq!(a.as_scalar().unwrap(), &Scalar::Int(1));
    }

    #[test]
    fn flow_sequence_value()
    {
        let doc = load("items: [10, 20, 30, 40]\n").unwrap();
        let items = doc.root().mapping_value_by_simple_key("items").unwrap();
        assert_eq!(items.sequence_len(), Some(4));
        assert_eq!(items.sequence_item(1).unwrap().as_scalar().unwrap(), &Scalar::Int(20));
    }

    #[test]
    fn nested_flow_mapping()
    {
        let doc = load("a: {b: {c: 7}}\n").unwrap();
        let a = doc.root().mapping_value_by_simple_key("a").unwrap();
        let b = a.mapping_value_by_simple_key("b").unwrap();
        let c = b.mapping_value_by_simple_key("c").unwrap();
        assert_eq!(c.as_scalar().unwrap(), &Scalar::Int(7));
    }

    #[test]
    fn anchor_on_flow_mapping()
    {
        let doc = load("x: &A {k: 9}\n").unwrap();
        let root = doc.root();
        let aliased = root.anchor("A").unwrap();
        assert_eq!(
            aliased.mapping_value_by_simple_key("k").unwrap().as_scalar().unwrap(),
            &Scalar::Int(9)
        );
    }

    #[test]
    fn parent_pointers()
    {
        let doc = load("a: {b: 1}\n").unwrap();
        let root = doc.root();
        let a = root.mapping_value_by_simple_key("a").unwrap();
        let b = a.mapping_value_by_simple_key("b").unwrap();
        assert_eq!(b.parent().unwrap().id(), a.id());
    }
}
