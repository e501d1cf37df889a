/*
 * This Source Code Form is subject to the terms of the
 * Mozilla Public License, v. 2.0. If a copy of the MPL
 * was not distributed with this file, You can obtain one at http://mozilla.org/MPL/2.0/.
 */

//! The tokenizer driver (`spec.md §4.B`): turns a [`CharReader`] over path
//! text into a sequence of [`TokenEntry`] values, one per call to
//! [`Tokenizer::next_token`].
//!
//! Unlike the teacher's YAML scanner, this tokenizer never defers a token
//! (no `Lazy`/`MaybeToken` split is needed -- the path grammar has no
//! construct whose kind depends on content discovered arbitrarily far
//! ahead), so there is no batch `scan_tokens` stage and no stall beyond a
//! defensive debug assertion that every successful call advances the
//! cursor.

use crate::error::{Error, ErrorKind};
use crate::flow::{self, FlowValue};
use crate::reader::{CharReader, Span};
use crate::token::{SliceEnd, Token, TokenEntry};

/// Delimiter class per `spec.md §6`: not allowed inside a `simpleKey`.
const DELIMITERS: &str = ",[]{}#&*!|<>'\"%@`?:/$";

fn is_delimiter(c: char) -> bool
{
    DELIMITERS.contains(c)
}

fn is_first_alpha(c: char) -> bool
{
    c.is_alphabetic() || c == '_'
}

fn is_alnum(c: char) -> bool
{
    is_first_alpha(c) || c.is_ascii_digit()
}

pub struct Tokenizer<'de>
{
    reader:   CharReader<'de>,
    started:  bool,
    finished: bool,
}

impl<'de> Tokenizer<'de>
{
    pub fn new(src: &'de str) -> Self
    {
        Self {
            reader:   CharReader::new(src),
            started:  false,
            finished: false,
        }
    }

    /// Produce the next token. Idempotent at end of input: every call after
    /// the first `STREAM_END` returns another `STREAM_END` at the same span.
    pub fn next_token(&mut self) -> Result<TokenEntry, Error>
    {
        if !self.started
        {
            self.started = true;
            let at = self.reader.byte_offset();
            return Ok(TokenEntry::new(Token::StreamStart, Span::point(at)));
        }

        if self.reader.is_eof()
        {
            self.finished = true;
            let at = self.reader.byte_offset();
            return Ok(TokenEntry::new(Token::StreamEnd, Span::point(at)));
        }

        let start = self.reader.mark();
        let c = self.reader.peek().expect("checked not eof above");

        let token = match c
        {
            '/' =>
            {
                self.reader.advance(1);
                Token::Slash
            },
            '^' =>
            {
                self.reader.advance(1);
                Token::Root
            },
            '.' if self.reader.peek_at(1) == Some('.') =>
            {
                self.reader.advance(2);
                Token::Parent
            },
            '.' =>
            {
                self.reader.advance(1);
                Token::This
            },
            '*' if self.reader.peek_at(1) == Some('*') =>
            {
                self.reader.advance(2);
                Token::EveryChildR
            },
            '*' if self.reader.peek_at(1).map(is_first_alpha).unwrap_or(false) =>
            {
                self.reader.advance(1);
                Token::Alias(self.read_identifier())
            },
            '*' =>
            {
                self.reader.advance(1);
                Token::EveryChild
            },
            '$' =>
            {
                self.reader.advance(1);
                Token::ScalarFilter
            },
            '%' =>
            {
                self.reader.advance(1);
                Token::CollectionFilter
            },
            '[' if self.reader.peek_at(1) == Some(']') =>
            {
                self.reader.advance(2);
                Token::SeqFilter
            },
            '{' if self.reader.peek_at(1) == Some('}') =>
            {
                self.reader.advance(2);
                Token::MapFilter
            },
            ',' =>
            {
                self.reader.advance(1);
                Token::Comma
            },
            ':' =>
            {
                self.reader.advance(1);
                Token::Sibling
            },
            '-' if self.reader.peek_at(1).map(|d| d.is_ascii_digit()).unwrap_or(false) =>
            {
                self.read_seq_index_or_slice(start)?
            },
            d if d.is_ascii_digit() => self.read_seq_index_or_slice(start)?,
            a if is_first_alpha(a) => Token::MapKeySimple(self.read_identifier()),
            '"' | '\'' | '{' | '[' =>
            {
                let value = flow::read_fragment(&mut self.reader)?;
                Token::MapKeyFlow(value)
            },
            other => return Err(self.lex_error(ErrorKind::UnknownDelimiter(other), start)),
        };

        let span = self.reader.fill_atom(start);
        debug_assert!(span.end > span.start, "tokenizer stalled at {}", span.start);

        Ok(TokenEntry::new(token, span))
    }

    fn lex_error(&self, kind: ErrorKind, start: crate::reader::Mark) -> Error
    {
        Error::new(kind, Some(self.reader.fill_atom(start)))
    }

    /// `first-alpha alnum*`, used for both simple map keys and alias names.
    fn read_identifier(&mut self) -> String
    {
        let start = self.reader.mark();
        self.reader.advance(1); // the first-alpha char already matched by caller

        while self.reader.peek().map(is_alnum).unwrap_or(false)
        {
            self.reader.advance(1);
        }

        let span = self.reader.fill_atom(start);
        self.reader.slice(span).to_owned()
    }

    /// Reads a run of ASCII digits (no sign), enforcing the "leading zero
    /// only as a lone digit" rule, and returns the matched text.
    fn read_digit_run(&mut self) -> Result<Span, Error>
    {
        let start = self.reader.mark();

        while self.reader.peek().map(|c| c.is_ascii_digit()).unwrap_or(false)
        {
            self.reader.advance(1);
        }

        let span = self.reader.fill_atom(start);
        let text = self.reader.slice(span);

        if text.len() > 1 && text.starts_with('0')
        {
            return Err(self.lex_error(ErrorKind::LeadingZeroDigits, start));
        }

        Ok(span)
    }

    /// `SEQ_INDEX` (`[-]digit+`) or `SEQ_SLICE` (`digit+ ':' digit*`).
    fn read_seq_index_or_slice(&mut self, start: crate::reader::Mark) -> Result<Token, Error>
    {
        let negative = self.reader.peek() == Some('-');
        if negative
        {
            self.reader.advance(1);
        }

        let digits_span = self.read_digit_run()?;
        let digits = self.reader.slice(digits_span);

        if digits.is_empty()
        {
            return Err(self.lex_error(ErrorKind::UnexpectedEnd, start));
        }

        if negative
        {
            // SEQ_INDEX only: slices never have a signed lower bound.
            let magnitude: i32 =
                atoi::atoi(digits.as_bytes()).ok_or_else(|| self.lex_error(ErrorKind::IntOverflow, start))?;
            let value = magnitude
                .checked_neg()
                .ok_or_else(|| self.lex_error(ErrorKind::IntOverflow, start))?;
            return Ok(Token::SeqIndex(value));
        }

        if self.reader.peek() == Some(':')
        {
            self.reader.advance(1);
            let from: u32 =
                atoi::atoi(digits.as_bytes()).ok_or_else(|| self.lex_error(ErrorKind::IntOverflow, start))?;

            if self.reader.peek().map(|c| c.is_ascii_digit()).unwrap_or(false)
            {
                let end_span = self.read_digit_run()?;
                let end_digits = self.reader.slice(end_span);
                let to: u32 = atoi::atoi(end_digits.as_bytes())
                    .ok_or_else(|| self.lex_error(ErrorKind::IntOverflow, start))?;
                Ok(Token::SeqSlice(from, SliceEnd::Bounded(to)))
            }
            else
            {
                Ok(Token::SeqSlice(from, SliceEnd::Open))
            }
        }
        else
        {
            let value: i32 =
                atoi::atoi(digits.as_bytes()).ok_or_else(|| self.lex_error(ErrorKind::IntOverflow, start))?;
            Ok(Token::SeqIndex(value))
        }
    }
}

#[cfg(test)]
mod tests
{
    use super::*;

    fn tokens(src: &str) -> Vec<Token>
    {
        let mut t = Tokenizer::new(src);
        let mut out = Vec::new();
        loop
        {
            let entry = t.next_token().expect("should lex");
            let done = entry.token == Token::StreamEnd;
            out.push(entry.token);
            if done
            {
                break;
            }
        }
        out
    }

    #[test]
    fn simple_path()
    {
        assert_eq!(
            tokens("/foo/bar"),
            vec![
                Token::StreamStart,
                Token::Slash,
                Token::MapKeySimple("foo".into()),
                Token::Slash,
                Token::MapKeySimple("bar".into()),
                Token::StreamEnd,
            ]
        );
    }

    #[test]
    fn seq_index_and_slice()
    {
        assert_eq!(
            tokens("0:3"),
            vec![
                Token::StreamStart,
                Token::SeqSlice(0, SliceEnd::Bounded(3)),
                Token::StreamEnd,
            ]
        );
        assert_eq!(
            tokens("-1"),
            vec![Token::StreamStart, Token::SeqIndex(-1), Token::StreamEnd]
        );
        assert_eq!(
            tokens("5:"),
            vec![
                Token::StreamStart,
                Token::SeqSlice(5, SliceEnd::Open),
                Token::StreamEnd,
            ]
        );
    }

    #[test]
    fn alias_vs_every_child()
    {
        assert_eq!(
            tokens("*anchor"),
            vec![
                Token::StreamStart,
                Token::Alias("anchor".into()),
                Token::StreamEnd,
            ]
        );
        assert_eq!(
            tokens("**$"),
            vec![
                Token::StreamStart,
                Token::EveryChildR,
                Token::ScalarFilter,
                Token::StreamEnd,
            ]
        );
        assert_eq!(
            tokens("*/x"),
            vec![
                Token::StreamStart,
                Token::EveryChild,
                Token::Slash,
                Token::MapKeySimple("x".into()),
                Token::StreamEnd,
            ]
        );
    }

    #[test]
    fn leading_zero_is_rejected()
    {
        let mut t = Tokenizer::new("01");
        let _ = t.next_token().unwrap(); // STREAM_START
        assert!(t.next_token().is_err());
    }

    #[test]
    fn lone_zero_is_accepted()
    {
        assert_eq!(
            tokens("0"),
            vec![Token::StreamStart, Token::SeqIndex(0), Token::StreamEnd]
        );
    }

    #[test]
    fn unknown_delimiter_errors()
    {
        let mut t = Tokenizer::new("|");
        let _ = t.next_token().unwrap();
        assert!(t.next_token().is_err());
    }

    #[test]
    fn stream_end_is_idempotent()
    {
        let mut t = Tokenizer::new("");
        let _ = t.next_token().unwrap();
        let a = t.next_token().unwrap();
        let b = t.next_token().unwrap();
        assert_eq!(a.token, Token::StreamEnd);
        assert_eq!(a, b);
    }
}
