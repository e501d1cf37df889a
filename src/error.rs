/*
 * This Source Code Form is subject to the terms of the
 * Mozilla Public License, v. 2.0. If a copy of the MPL
 * was not distributed with this file, You can obtain one at http://mozilla.org/MPL/2.0/.
 */

//! Error types for path compilation and evaluation.
//!
//! Follows a layered design: a small public [`Error`] wrapping a private,
//! exhaustive [`internal::ErrorKind`]. Callers that only care about the
//! coarse failure category use [`Error::classify`]; callers that want the
//! full message use `Display`.

use std::fmt;

use crate::reader::Span;

/// The five abstract error kinds a path-expression engine can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category
{
    /// Tokenizer or parser rejected the input.
    Syntax,
    /// Syntactically acceptable but semantically disallowed.
    Unsupported,
    /// A numeric literal did not fit its target width.
    Overflow,
    /// End of input inside a container literal (flow key, quoted string).
    Truncated,
    /// Allocation failure or unreachable state. Always fatal.
    Internal,
}

/// An opaque compile- or eval-time error.
#[derive(Debug)]
pub struct Error
{
    inner: Box<internal::Error>,
}

impl Error
{
    pub(crate) fn new(kind: internal::ErrorKind, span: Option<Span>) -> Self
    {
        Self {
            inner: Box::new(internal::Error { kind, span }),
        }
    }

    /// The span in the source expression this error refers to, if any.
    pub fn span(&self) -> Option<Span>
    {
        self.inner.span
    }

    /// The coarse category this error falls under.
    pub fn classify(&self) -> Category
    {
        self.inner.kind.category()
    }
}

impl fmt::Display for Error
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        write!(f, "{}", self.inner.kind)?;

        if let Some(span) = self.inner.span
        {
            write!(f, " (at {}..{})", span.start, span.end)?;
        }

        Ok(())
    }
}

impl std::error::Error for Error {}

pub(crate) mod internal
{
    use std::fmt;

    use super::Category;
    use crate::reader::Span;

    #[derive(Debug)]
    pub struct Error
    {
        pub kind: ErrorKind,
        pub span: Option<Span>,
    }

    #[derive(Debug)]
    pub enum ErrorKind
    {
        UnexpectedEnd,
        UnknownDelimiter(char),
        UnterminatedFlowFragment,
        InvalidFlowFragment(String),
        LeadingZeroDigits,
        IntOverflow,
        EmptyOperand
        {
            operator: &'static str,
        },
        SiblingOnNonKey,
        OperandStackDepth(usize),
        UnknownAnchor(String),
        AllocationFailure,
        Stalled,
    }

    impl ErrorKind
    {
        pub fn category(&self) -> Category
        {
            use ErrorKind::*;

            match self
            {
                UnexpectedEnd
                | UnknownDelimiter(_)
                | EmptyOperand { .. }
                | OperandStackDepth(_)
                | Stalled => Category::Syntax,

                UnterminatedFlowFragment | InvalidFlowFragment(_) => Category::Truncated,

                LeadingZeroDigits | IntOverflow => Category::Overflow,

                SiblingOnNonKey | UnknownAnchor(_) => Category::Unsupported,

                AllocationFailure => Category::Internal,
            }
        }
    }

    impl fmt::Display for ErrorKind
    {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
        {
            use ErrorKind::*;

            match self
            {
                UnexpectedEnd => write!(f, "unexpected end of path expression"),
                UnknownDelimiter(c) => write!(f, "unexpected character '{}'", c),
                UnterminatedFlowFragment => write!(f, "unterminated flow key"),
                InvalidFlowFragment(msg) => write!(f, "invalid flow key: {}", msg),
                LeadingZeroDigits => write!(f, "leading zero is only allowed as a lone digit"),
                IntOverflow => write!(f, "numeric literal does not fit a 32-bit signed integer"),
                EmptyOperand { operator } => {
                    write!(f, "'{}' is missing an operand", operator)
                },
                SiblingOnNonKey => write!(f, "sibling operator applied to a non map-key operand"),
                OperandStackDepth(n) => {
                    write!(f, "expression did not reduce to a single operand ({} left)", n)
                },
                UnknownAnchor(name) => write!(f, "no such anchor '{}'", name),
                AllocationFailure => write!(f, "allocation failure"),
                Stalled => write!(f, "tokenizer stalled without reaching end of input"),
            }
        }
    }
}

pub(crate) use internal::ErrorKind;
