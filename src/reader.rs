/*
 * This Source Code Form is subject to the terms of the
 * Mozilla Public License, v. 2.0. If a copy of the MPL
 * was not distributed with this file, You can obtain one at http://mozilla.org/MPL/2.0/.
 */

//! A UTF-8 code-point cursor over path-expression (and embedded flow-YAML
//! fragment) text, with peek-at-offset and positional marks.
//!
//! Shared by the tokenizer ([`crate::tokenizer`]), the flow-key fragment
//! reader ([`crate::flow`]) and the YAML-subset document loader
//! ([`crate::node::loader`]) -- the same low-level reading primitive backs
//! every character-at-a-time scanner in the crate.

/// A half-open byte range into the original source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span
{
    pub start: usize,
    pub end: usize,
}

impl Span
{
    pub fn new(start: usize, end: usize) -> Self
    {
        Self { start, end }
    }

    pub fn point(at: usize) -> Self
    {
        Self { start: at, end: at }
    }

    pub fn join(self, other: Span) -> Span
    {
        Span {
            start: self.start.min(other.start),
            end:   self.end.max(other.end),
        }
    }

    /// True if `self` ends no later than `other` begins.
    pub fn precedes(self, other: Span) -> bool
    {
        self.start <= other.start
    }
}

/// A saved cursor position, cheap to copy, used to compute spans after the
/// fact (`reader.fill(mark)`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mark
{
    pub byte:   usize,
    pub line:   usize,
    pub column: usize,
}

/// A UTF-8 code-point cursor over a single in-memory buffer.
pub struct CharReader<'de>
{
    src:    &'de str,
    chars:  Vec<(usize, char)>,
    cursor: usize,
    line:   usize,
    column: usize,
}

impl<'de> CharReader<'de>
{
    pub fn new(src: &'de str) -> Self
    {
        Self {
            src,
            chars: src.char_indices().collect(),
            cursor: 0,
            line: 0,
            column: 0,
        }
    }

    /// The current code point, or `None` at end of input.
    pub fn peek(&self) -> Option<char>
    {
        self.peek_at(0)
    }

    /// The `n`th following code point (`n == 0` is [`peek`](Self::peek)).
    pub fn peek_at(&self, n: usize) -> Option<char>
    {
        self.chars.get(self.cursor + n).map(|&(_, c)| c)
    }

    /// Consume `n` code points, updating line and column.
    pub fn advance(&mut self, n: usize)
    {
        for _ in 0..n
        {
            match self.peek()
            {
                Some('\n') =>
                {
                    self.line += 1;
                    self.column = 0;
                    self.cursor += 1;
                },
                Some(_) =>
                {
                    self.column += 1;
                    self.cursor += 1;
                },
                None => break,
            }
        }
    }

    pub fn mark(&self) -> Mark
    {
        Mark {
            byte:   self.byte_offset(),
            line:   self.line,
            column: self.column,
        }
    }

    /// Byte offset of the cursor into the original source text.
    pub fn byte_offset(&self) -> usize
    {
        self.chars
            .get(self.cursor)
            .map(|&(i, _)| i)
            .unwrap_or_else(|| self.src.len())
    }

    /// The span from `mark` to the current cursor position.
    pub fn fill_atom(&self, start: Mark) -> Span
    {
        Span::new(start.byte, self.byte_offset())
    }

    /// The raw source text covered by `span`.
    pub fn slice(&self, span: Span) -> &'de str
    {
        &self.src[span.start..span.end]
    }

    pub fn is_eof(&self) -> bool
    {
        self.peek().is_none()
    }
}

#[cfg(test)]
mod tests
{
    use super::*;

    #[test]
    fn peek_and_advance()
    {
        let mut r = CharReader::new("ab");
        assert_eq!(r.peek(), Some('a'));
        assert_eq!(r.peek_at(1), Some('b'));
        assert_eq!(r.peek_at(2), None);
        r.advance(1);
        assert_eq!(r.peek(), Some('b'));
        r.advance(1);
        assert!(r.is_eof());
    }

    #[test]
    fn mark_and_fill_atom()
    {
        let mut r = CharReader::new("foo/bar");
        let start = r.mark();
        r.advance(3);
        let span = r.fill_atom(start);
        assert_eq!(r.slice(span), "foo");
    }

    #[test]
    fn multibyte_code_points()
    {
        let mut r = CharReader::new("a\u{00e9}b");
        assert_eq!(r.peek(), Some('a'));
        r.advance(1);
        assert_eq!(r.peek(), Some('\u{00e9}'));
        r.advance(1);
        assert_eq!(r.peek(), Some('b'));
    }
}
