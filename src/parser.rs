/*
 * This Source Code Form is subject to the terms of the
 * Mozilla Public License, v. 2.0. If a copy of the MPL
 * was not distributed with this file, You can obtain one at http://mozilla.org/MPL/2.0/.
 */

//! The shunting-yard parser (`spec.md §4.C`): two stacks, an operator stack
//! of [`TokenEntry`] and an operand stack of [`ExprId`], driven by the
//! precedence table in `spec.md`.

use crate::error::{Error, ErrorKind};
use crate::expr::{Expr, ExprArena, ExprId, ExprKind};
use crate::reader::Span;
use crate::token::{Token, TokenEntry};
use crate::tokenizer::Tokenizer;
use crate::CompileFlags;

fn precedence(token: &Token) -> u8
{
    match token
    {
        Token::ScalarFilter | Token::CollectionFilter | Token::SeqFilter | Token::MapFilter => 5,
        Token::Slash => 10,
        Token::Comma => 15,
        Token::Sibling => 20,
        _ => unreachable!("precedence() called on a non-operator token"),
    }
}

fn is_operand(token: &Token) -> bool
{
    matches!(
        token,
        Token::Root
            | Token::This
            | Token::Parent
            | Token::MapKeySimple(_)
            | Token::MapKeyFlow(_)
            | Token::SeqIndex(_)
            | Token::SeqSlice(..)
            | Token::EveryChild
            | Token::EveryChildR
            | Token::Alias(_)
    )
}

/// A reusable shunting-yard driver. Holds its auxiliary stacks between
/// calls (`spec.md §5`: "the parser uses bounded auxiliary stacks that grow
/// by doubling") and, once a caller returns an `Expr` via [`Parser::release`],
/// reuses that arena's allocation for the next `compile` -- the "recycling
/// pool of `Expr` objects local to a parser instance" `spec.md §9` mentions.
#[derive(Default)]
pub struct Parser
{
    operators: Vec<TokenEntry>,
    operands:  Vec<ExprId>,
    spare:     Option<ExprArena>,
}

impl Parser
{
    pub fn new() -> Self
    {
        Self::default()
    }

    /// Returns a compiled expression's arena allocation to this parser's
    /// pool for reuse by the next [`Parser::compile`] call. The Rust
    /// analogue of `spec.md §6`'s `freeExpr`.
    pub fn release(&mut self, mut expr: Expr)
    {
        expr.arena.recycle();
        self.spare = Some(expr.arena);
    }

    pub fn compile(&mut self, path: &str, flags: CompileFlags) -> Result<Expr, Error>
    {
        self.operators.clear();
        self.operands.clear();

        let mut arena = if flags.contains(CompileFlags::POOL_DISABLED)
        {
            ExprArena::new()
        }
        else
        {
            self.spare.take().unwrap_or_default()
        };

        let result = drive(&mut arena, &mut self.operators, &mut self.operands, path);

        match result
        {
            Ok(root) => Ok(Expr { arena, root }),
            Err(err) =>
            {
                // Release any partial tree; compile never leaves a
                // half-built Expr observable.
                self.operands.clear();
                self.operators.clear();
                Err(err)
            },
        }
    }
}

fn drive(
    arena: &mut ExprArena,
    operators: &mut Vec<TokenEntry>,
    operands: &mut Vec<ExprId>,
    path: &str,
) -> Result<ExprId, Error>
{
    let mut tokenizer = Tokenizer::new(path);

    let first = tokenizer.next_token()?;
    debug_assert_eq!(first.token, Token::StreamStart);

    loop
    {
        let entry = tokenizer.next_token()?;
        if entry.token == Token::StreamEnd
        {
            break;
        }

        if is_operand(&entry.token)
        {
            let id = push_operand_leaf(arena, entry);
            operands.push(id);
        }
        else
        {
            while let Some(top) = operators.last()
            {
                if precedence(&top.token) >= precedence(&entry.token)
                {
                    let top = operators.pop().expect("just peeked");
                    reduce(arena, top, operands)?;
                }
                else
                {
                    break;
                }
            }
            operators.push(entry);
        }
    }

    while let Some(top) = operators.pop()
    {
        reduce(arena, top, operands)?;
    }

    if operands.len() != 1
    {
        return Err(Error::new(ErrorKind::OperandStackDepth(operands.len()), None));
    }

    Ok(operands.pop().expect("length checked above"))
}

fn push_operand_leaf(arena: &mut ExprArena, entry: TokenEntry) -> ExprId
{
    let kind = match entry.token
    {
        Token::Root => ExprKind::Root,
        Token::This => ExprKind::This,
        Token::Parent => ExprKind::Parent,
        Token::EveryChild => ExprKind::EveryChild,
        Token::EveryChildR => ExprKind::EveryChildRecursive,
        Token::Alias(name) => ExprKind::Alias(name),
        Token::MapKeySimple(name) => ExprKind::SimpleMapKey(name),
        Token::MapKeyFlow(value) => ExprKind::MapKey(value),
        Token::SeqIndex(i) => ExprKind::SeqIndex(i),
        Token::SeqSlice(start, end) => ExprKind::SeqSlice(start, end),
        _ => unreachable!("push_operand_leaf called on a non-operand token"),
    };

    arena.insert(kind, entry.span, Vec::new())
}

fn reduce(arena: &mut ExprArena, op: TokenEntry, operands: &mut Vec<ExprId>) -> Result<(), Error>
{
    match op.token
    {
        Token::Slash => reduce_slash(arena, op.span, operands),
        Token::Comma => reduce_comma(arena, op.span, operands),
        Token::Sibling => reduce_sibling(arena, op.span, operands),
        Token::ScalarFilter => reduce_filter(arena, op.span, operands, ExprKind::AssertScalar, "$"),
        Token::CollectionFilter => reduce_filter(arena, op.span, operands, ExprKind::AssertCollection, "%"),
        Token::SeqFilter => reduce_filter(arena, op.span, operands, ExprKind::AssertSequence, "[]"),
        Token::MapFilter => reduce_filter(arena, op.span, operands, ExprKind::AssertMapping, "{}"),
        _ => unreachable!("only operator tokens reach the operator stack"),
    }
}

fn reduce_slash(arena: &mut ExprArena, op_span: Span, operands: &mut Vec<ExprId>) -> Result<(), Error>
{
    let right = match operands.pop()
    {
        None =>
        {
            // Slash at the very beginning, nothing pushed at all: bare `/`.
            let root = arena.insert(ExprKind::Root, op_span, Vec::new());
            operands.push(root);
            return Ok(());
        },
        Some(id) => id,
    };

    match operands.pop()
    {
        None =>
        {
            let right_span = arena.get(right).span;

            if op_span.precedes(right_span)
            {
                // `/foo` form: slash precedes the operand.
                let root = arena.insert(ExprKind::Root, Span::point(op_span.start), Vec::new());
                let span = op_span.join(right_span);
                let chain = make_chain(arena, root, right, span);
                operands.push(chain);
            }
            else
            {
                // Trailing slash: operand is left, synthesize AssertCollection as right.
                let assert = arena.insert(ExprKind::AssertCollection, Span::point(op_span.end), Vec::new());
                let span = right_span.join(op_span);
                let chain = make_chain(arena, right, assert, span);
                operands.push(chain);
            }
        },
        Some(left) =>
        {
            let left_span = arena.get(left).span;
            let right_span = arena.get(right).span;
            let span = left_span.join(op_span).join(right_span);
            let chain = make_chain(arena, left, right, span);
            operands.push(chain);
        },
    }

    Ok(())
}

fn reduce_comma(arena: &mut ExprArena, op_span: Span, operands: &mut Vec<ExprId>) -> Result<(), Error>
{
    let right = operands
        .pop()
        .ok_or_else(|| Error::new(ErrorKind::EmptyOperand { operator: "COMMA" }, Some(op_span)))?;
    let left = operands
        .pop()
        .ok_or_else(|| Error::new(ErrorKind::EmptyOperand { operator: "COMMA" }, Some(op_span)))?;

    let span = arena.get(left).span.join(op_span).join(arena.get(right).span);
    let multi = make_multi(arena, left, right, span);
    operands.push(multi);

    Ok(())
}

fn reduce_sibling(arena: &mut ExprArena, op_span: Span, operands: &mut Vec<ExprId>) -> Result<(), Error>
{
    let operand = operands
        .pop()
        .ok_or_else(|| Error::new(ErrorKind::EmptyOperand { operator: "SIBLING" }, Some(op_span)))?;

    let operand_node = arena.get(operand);
    let is_key = matches!(operand_node.kind, ExprKind::SimpleMapKey(_) | ExprKind::MapKey(_));
    let operand_span = operand_node.span;

    if !is_key
    {
        return Err(Error::new(ErrorKind::SiblingOnNonKey, Some(operand_span)));
    }

    let parent = arena.insert(ExprKind::Parent, Span::point(op_span.start), Vec::new());
    let span = op_span.join(operand_span);
    let chain = arena.insert(ExprKind::Chain, span, vec![parent, operand]);
    operands.push(chain);

    Ok(())
}

fn reduce_filter(
    arena: &mut ExprArena,
    op_span: Span,
    operands: &mut Vec<ExprId>,
    assert_kind: ExprKind,
    name: &'static str,
) -> Result<(), Error>
{
    let operand = operands
        .pop()
        .ok_or_else(|| Error::new(ErrorKind::EmptyOperand { operator: name }, Some(op_span)))?;

    let operand_node = arena.get(operand);
    let operand_span = operand_node.span;
    let span = operand_span.join(op_span);

    let assert = arena.insert(assert_kind, Span::point(op_span.end), Vec::new());

    let chain = if matches!(operand_node.kind, ExprKind::Chain)
    {
        let mut children = operand_node.children.clone();
        children.push(assert);
        arena.insert(ExprKind::Chain, span, children)
    }
    else
    {
        arena.insert(ExprKind::Chain, span, vec![operand, assert])
    };

    operands.push(chain);

    Ok(())
}

/// `spec.md §3`: "Chain never contains Chain as a direct child (chains are
/// flattened during construction)."
fn make_chain(arena: &mut ExprArena, left: ExprId, right: ExprId, span: Span) -> ExprId
{
    let mut children = Vec::new();
    extend_flattened(arena, left, ExprKind::Chain, &mut children);
    extend_flattened(arena, right, ExprKind::Chain, &mut children);
    arena.insert(ExprKind::Chain, span, children)
}

/// `spec.md §3`: "Multi never contains Multi as a direct child (multis are
/// flattened)."
fn make_multi(arena: &mut ExprArena, left: ExprId, right: ExprId, span: Span) -> ExprId
{
    let mut children = Vec::new();
    extend_flattened(arena, left, ExprKind::Multi, &mut children);
    extend_flattened(arena, right, ExprKind::Multi, &mut children);
    arena.insert(ExprKind::Multi, span, children)
}

fn extend_flattened(arena: &ExprArena, id: ExprId, flatten_kind: ExprKind, out: &mut Vec<ExprId>)
{
    let node = arena.get(id);
    if std::mem::discriminant(&node.kind) == std::mem::discriminant(&flatten_kind)
    {
        out.extend(node.children.iter().copied());
    }
    else
    {
        out.push(id);
    }
}

#[cfg(test)]
mod tests
{
    use super::*;

    fn compile(path: &str) -> Expr
    {
        Parser::new().compile(path, CompileFlags::empty()).expect("should compile")
    }

    fn kind_of(expr: &Expr, id: ExprId) -> &ExprKind
    {
        &expr.node(id).kind
    }

    #[test]
    fn bare_slash_is_root_only()
    {
        let expr = compile("/");
        assert!(matches!(kind_of(&expr, expr.root()), ExprKind::Root));
    }

    #[test]
    fn leading_slash_synthesizes_root()
    {
        let expr = compile("/foo");
        let root = expr.root_node();
        assert!(matches!(root.kind, ExprKind::Chain));
        assert_eq!(root.children.len(), 2);
        assert!(matches!(kind_of(&expr, root.children[0]), ExprKind::Root));
        assert!(matches!(kind_of(&expr, root.children[1]), ExprKind::SimpleMapKey(name) if name == "foo"));
    }

    #[test]
    fn trailing_slash_synthesizes_assert_collection()
    {
        let expr = compile("foo/");
        let root = expr.root_node();
        assert!(matches!(root.kind, ExprKind::Chain));
        assert_eq!(root.children.len(), 2);
        assert!(matches!(kind_of(&expr, root.children[0]), ExprKind::SimpleMapKey(name) if name == "foo"));
        assert!(matches!(kind_of(&expr, root.children[1]), ExprKind::AssertCollection));
    }

    #[test]
    fn slash_chains_are_flattened()
    {
        let expr = compile("/a/b/c");
        let root = expr.root_node();
        assert!(matches!(root.kind, ExprKind::Chain));
        assert_eq!(root.children.len(), 4); // Root, a, b, c
    }

    #[test]
    fn comma_binds_looser_than_slash()
    {
        // a/b,c/d => Multi[Chain[a,b], Chain[c,d]]
        let expr = compile("a/b,c/d");
        let root = expr.root_node();
        assert!(matches!(root.kind, ExprKind::Multi));
        assert_eq!(root.children.len(), 2);
        for child in &root.children
        {
            assert!(matches!(kind_of(&expr, *child), ExprKind::Chain));
        }
    }

    #[test]
    fn comma_list_is_flattened()
    {
        let expr = compile("a,b,c");
        let root = expr.root_node();
        assert!(matches!(root.kind, ExprKind::Multi));
        assert_eq!(root.children.len(), 3);
    }

    #[test]
    fn sibling_produces_parent_then_key()
    {
        let expr = compile("/items/:sibling_key");
        let root = expr.root_node();
        assert!(matches!(root.kind, ExprKind::Chain));
        // Root, items, Parent, sibling_key
        assert_eq!(root.children.len(), 4);
        assert!(matches!(kind_of(&expr, root.children[2]), ExprKind::Parent));
        assert!(matches!(kind_of(&expr, root.children[3]), ExprKind::SimpleMapKey(name) if name == "sibling_key"));
    }

    #[test]
    fn sibling_on_non_key_is_an_error()
    {
        let err = Parser::new().compile("/foo/:0", CompileFlags::empty()).unwrap_err();
        assert_eq!(err.classify(), crate::error::Category::Unsupported);
    }

    #[test]
    fn scalar_filter_suffix()
    {
        let expr = compile("/a$");
        let root = expr.root_node();
        assert!(matches!(root.kind, ExprKind::Chain));
        assert_eq!(root.children.len(), 3); // Root, a, AssertScalar
        assert!(matches!(kind_of(&expr, root.children[2]), ExprKind::AssertScalar));
    }

    #[test]
    fn recursive_scalar_filter()
    {
        let expr = compile("/**$");
        let root = expr.root_node();
        assert!(matches!(root.kind, ExprKind::Chain));
        assert_eq!(root.children.len(), 3);
        assert!(matches!(kind_of(&expr, root.children[1]), ExprKind::EveryChildRecursive));
        assert!(matches!(kind_of(&expr, root.children[2]), ExprKind::AssertScalar));
    }

    #[test]
    fn alias_start()
    {
        let expr = compile("*A/k");
        let root = expr.root_node();
        assert!(matches!(root.kind, ExprKind::Chain));
        assert!(matches!(kind_of(&expr, root.children[0]), ExprKind::Alias(name) if name == "A"));
    }

    #[test]
    fn dangling_operator_is_an_error()
    {
        assert!(Parser::new().compile("a,", CompileFlags::empty()).is_err());
    }

    #[test]
    fn release_recycles_arena_allocation()
    {
        let mut parser = Parser::new();
        let expr = parser.compile("/a/b/c", CompileFlags::empty()).unwrap();
        assert!(expr.arena.len() > 0);
        parser.release(expr);
        let expr2 = parser.compile("/x", CompileFlags::empty()).unwrap();
        assert!(matches!(expr2.root_node().kind, ExprKind::Chain));
    }
}
