/*
 * This Source Code Form is subject to the terms of the
 * Mozilla Public License, v. 2.0. If a copy of the MPL
 * was not distributed with this file, You can obtain one at http://mozilla.org/MPL/2.0/.
 */

//! Path-expression token kinds (`spec.md §4.B`).
//!
//! Split into a payload-carrying [`Token`] and a bare discriminant
//! [`Marker`], the way the teacher crate splits its YAML `Token`/`Marker`
//! pair -- useful for error messages and tests that only care which kind of
//! token was produced.

use std::fmt;

use crate::flow::FlowValue;
use crate::reader::Span;

/// The upper bound of a `SEQ_SLICE`: either a concrete index or "to end".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SliceEnd
{
    Bounded(u32),
    Open,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Token
{
    StreamStart,
    StreamEnd,
    Slash,
    Root,
    This,
    Parent,
    EveryChild,
    EveryChildR,
    Alias(String),
    ScalarFilter,
    CollectionFilter,
    SeqFilter,
    MapFilter,
    Sibling,
    Comma,
    MapKeySimple(String),
    MapKeyFlow(FlowValue),
    SeqIndex(i32),
    SeqSlice(u32, SliceEnd),
}

/// A token together with the source span it was lexed from.
#[derive(Debug, Clone, PartialEq)]
pub struct TokenEntry
{
    pub token: Token,
    pub span:  Span,
}

impl TokenEntry
{
    pub fn new(token: Token, span: Span) -> Self
    {
        Self { token, span }
    }
}

/// Bare discriminant of [`Token`], with no payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marker
{
    StreamStart,
    StreamEnd,
    Slash,
    Root,
    This,
    Parent,
    EveryChild,
    EveryChildR,
    Alias,
    ScalarFilter,
    CollectionFilter,
    SeqFilter,
    MapFilter,
    Sibling,
    Comma,
    MapKeySimple,
    MapKeyFlow,
    SeqIndex,
    SeqSlice,
}

impl From<&Token> for Marker
{
    fn from(token: &Token) -> Self
    {
        match token
        {
            Token::StreamStart => Marker::StreamStart,
            Token::StreamEnd => Marker::StreamEnd,
            Token::Slash => Marker::Slash,
            Token::Root => Marker::Root,
            Token::This => Marker::This,
            Token::Parent => Marker::Parent,
            Token::EveryChild => Marker::EveryChild,
            Token::EveryChildR => Marker::EveryChildR,
            Token::Alias(_) => Marker::Alias,
            Token::ScalarFilter => Marker::ScalarFilter,
            Token::CollectionFilter => Marker::CollectionFilter,
            Token::SeqFilter => Marker::SeqFilter,
            Token::MapFilter => Marker::MapFilter,
            Token::Sibling => Marker::Sibling,
            Token::Comma => Marker::Comma,
            Token::MapKeySimple(_) => Marker::MapKeySimple,
            Token::MapKeyFlow(_) => Marker::MapKeyFlow,
            Token::SeqIndex(_) => Marker::SeqIndex,
            Token::SeqSlice(..) => Marker::SeqSlice,
        }
    }
}

impl PartialEq<Token> for Marker
{
    fn eq(&self, other: &Token) -> bool
    {
        *self == Marker::from(other)
    }
}

impl fmt::Display for Marker
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        let name = match self
        {
            Marker::StreamStart => "STREAM_START",
            Marker::StreamEnd => "STREAM_END",
            Marker::Slash => "SLASH",
            Marker::Root => "ROOT",
            Marker::This => "THIS",
            Marker::Parent => "PARENT",
            Marker::EveryChild => "EVERY_CHILD",
            Marker::EveryChildR => "EVERY_CHILD_R",
            Marker::Alias => "ALIAS",
            Marker::ScalarFilter => "SCALAR_FILTER",
            Marker::CollectionFilter => "COLLECTION_FILTER",
            Marker::SeqFilter => "SEQ_FILTER",
            Marker::MapFilter => "MAP_FILTER",
            Marker::Sibling => "SIBLING",
            Marker::Comma => "COMMA",
            Marker::MapKeySimple => "MAP_KEY",
            Marker::MapKeyFlow => "MAP_KEY",
            Marker::SeqIndex => "SEQ_INDEX",
            Marker::SeqSlice => "SEQ_SLICE",
        };
        write!(f, "{}", name)
    }
}
