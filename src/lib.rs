/*
 * This Source Code Form is subject to the terms of the
 * Mozilla Public License, v. 2.0. If a copy of the MPL
 * was not distributed with this file, You can obtain one at http://mozilla.org/MPL/2.0/.
 */

//! A small query language over already-parsed YAML documents.
//!
//! A caller supplies a path expression (`/foo/bar`, `/items/0:3`, `/**$`,
//! `/a,b,c`) together with a YAML document node; [`compile`] turns the
//! expression into a reusable [`Expr`] tree, and [`eval`] walks that tree
//! against a node to produce the ordered, duplicate-free set of matches.
//!
//! ```
//! use ypath::node::loader::load;
//! use ypath::{compile, eval};
//!
//! let doc = load("a: 1\nb: 2\nc: 3\n").unwrap();
//! let expr = compile("/a,b,c").unwrap();
//! let results = eval(&expr, Some(doc.root())).unwrap();
//! assert_eq!(results.len(), 3);
//! ```

#![allow(dead_code)]

pub mod diagnostics;
pub mod error;
pub mod eval;
pub mod expr;
pub mod flow;
pub mod node;
pub mod parser;
pub mod reader;
pub mod results;
pub mod token;
pub mod tokenizer;

pub use diagnostics::{Diagnostic, Severity, Sink, TracingSink};
pub use error::{Category, Error};
pub use expr::Expr;
pub use node::Node;
pub use parser::Parser;
pub use results::ResultList;

bitflags::bitflags! {
    /// Debug knobs for `compile` (`spec.md §6`: "debug knobs (e.g., disable
    /// small-object recycling) are optional").
    pub struct CompileFlags: u8 {
        /// Disables the parser's `Expr`-arena recycling pool, forcing every
        /// `compile` call to allocate a fresh arena. Also forced on by the
        /// private `test_pool_disabled` Cargo feature.
        const POOL_DISABLED = 0b0000_0001;
    }
}

bitflags::bitflags! {
    /// Evaluation-time behavior knobs.
    pub struct EvalFlags: u8 {
        /// Treat an `Alias` to an unknown anchor as a `PathUnsupported`
        /// error instead of `spec.md §4.D`'s default "not an error, returns
        /// no match".
        const STRICT_ANCHORS = 0b0000_0001;
    }
}

/// Compiles `path` into a reusable [`Expr`] tree, using a throwaway
/// [`Parser`]. Embedders that compile many paths and want the arena
/// recycling pool (`spec.md §9`) should keep their own [`Parser`] instead.
pub fn compile(path: &str) -> Result<Expr, Error>
{
    compile_with(path, CompileFlags::empty(), &TracingSink)
}

pub fn compile_with(path: &str, flags: CompileFlags, sink: &dyn Sink) -> Result<Expr, Error>
{
    let mut parser = Parser::new();
    let result = parser.compile(path, flags);

    if let Err(err) = &result
    {
        sink.emit(&Diagnostic::new(Severity::Error, err.to_string(), err.span()));
    }

    result
}

/// Evaluates `expr` against `node` (or the empty set if `node` is `None`),
/// using the default `tracing`-backed diagnostics sink.
pub fn eval<N: Node>(expr: &Expr, node: Option<N>) -> Result<ResultList<N>, Error>
{
    eval_with(expr, node, EvalFlags::empty(), &TracingSink)
}

pub fn eval_with<N: Node>(
    expr: &Expr,
    node: Option<N>,
    flags: EvalFlags,
    sink: &dyn Sink,
) -> Result<ResultList<N>, Error>
{
    let result = eval::eval(expr, node, flags);

    if let Err(err) = &result
    {
        sink.emit(&Diagnostic::new(Severity::Error, err.to_string(), err.span()));
    }

    result
}
