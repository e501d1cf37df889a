/*
 * This Source Code Form is subject to the terms of the
 * Mozilla Public License, v. 2.0. If a copy of the MPL
 * was not distributed with this file, You can obtain one at http://mozilla.org/MPL/2.0/.
 */

//! The expression tree data model (`spec.md §3`).
//!
//! `spec.md §9` flags that the source's parent back-pointers inside the
//! expression tree create ownership cycles, and recommends indices or
//! eliminating parent pointers entirely. This module follows the teacher's
//! own answer to that exact problem in its YAML node graph
//! (`node/graph.rs`'s `Storage` wrapping a `slotmap::SlotMap`): every `Expr`
//! lives in an [`ExprArena`] keyed by [`ExprId`], with children stored as a
//! `Vec<ExprId>` and no parent link at all. Dropping the arena frees the
//! whole tree as a unit.

use slotmap::{new_key_type, SlotMap};

use crate::flow::FlowValue;
use crate::reader::Span;
use crate::token::SliceEnd;

new_key_type! {
    pub struct ExprId;
}

/// The closed set of expression node kinds (`spec.md §3`). Exactly 17
/// variants; adding one is a breaking change.
#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind
{
    Root,
    This,
    Parent,
    EveryChild,
    EveryChildRecursive,
    EveryLeaf,
    AssertCollection,
    AssertScalar,
    AssertSequence,
    AssertMapping,
    SimpleMapKey(String),
    MapKey(FlowValue),
    Alias(String),
    SeqIndex(i32),
    SeqSlice(u32, SliceEnd),
    Multi,
    Chain,
}

impl ExprKind
{
    /// Operands never gain children except through parser composition
    /// (`spec.md §3` invariants); `Multi`/`Chain` are the only composite
    /// kinds.
    pub fn is_composite(&self) -> bool
    {
        matches!(self, ExprKind::Multi | ExprKind::Chain)
    }
}

#[derive(Debug, Clone)]
pub struct ExprNode
{
    pub kind:     ExprKind,
    pub span:     Span,
    pub children: Vec<ExprId>,
}

/// Arena owning every `Expr` node produced by one `compile()` call.
///
/// Reused across calls on the same [`crate::parser::Parser`] (object-pool
/// recycling, `spec.md §9`) unless `CompileFlags::POOL_DISABLED` is set or
/// the crate is built with `feature = "test_pool_disabled"`.
pub struct ExprArena
{
    slots: SlotMap<ExprId, ExprNode>,
}

impl ExprArena
{
    pub fn new() -> Self
    {
        Self { slots: SlotMap::with_key() }
    }

    pub fn insert(&mut self, kind: ExprKind, span: Span, children: Vec<ExprId>) -> ExprId
    {
        self.slots.insert(ExprNode { kind, span, children })
    }

    pub fn get(&self, id: ExprId) -> &ExprNode
    {
        &self.slots[id]
    }

    pub fn len(&self) -> usize
    {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool
    {
        self.slots.is_empty()
    }

    /// Clears all nodes, keeping the underlying allocation for reuse by the
    /// next `compile()` call. A no-op under `feature = "test_pool_disabled"`,
    /// which instead drops and reallocates so pool-sensitive tests can
    /// observe raw allocation behavior.
    pub fn recycle(&mut self)
    {
        #[cfg(feature = "test_pool_disabled")]
        {
            self.slots = SlotMap::with_key();
        }
        #[cfg(not(feature = "test_pool_disabled"))]
        {
            self.slots.clear();
        }
    }
}

impl Default for ExprArena
{
    fn default() -> Self
    {
        Self::new()
    }
}

/// The output of a successful `compile()`: an arena plus its root node.
pub struct Expr
{
    pub(crate) arena: ExprArena,
    pub(crate) root:  ExprId,
}

impl Expr
{
    pub fn root(&self) -> ExprId
    {
        self.root
    }

    pub fn node(&self, id: ExprId) -> &ExprNode
    {
        self.arena.get(id)
    }

    pub fn root_node(&self) -> &ExprNode
    {
        self.node(self.root)
    }

    /// The source span covered by the root node -- `spec.md §8` invariant 7
    /// ("round-trip of compile: the span covered by the root equals the
    /// trimmed input").
    pub fn span(&self) -> Span
    {
        self.root_node().span
    }
}
