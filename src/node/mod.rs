/*
 * This Source Code Form is subject to the terms of the
 * Mozilla Public License, v. 2.0. If a copy of the MPL
 * was not distributed with this file, You can obtain one at http://mozilla.org/MPL/2.0/.
 */

//! The YAML node surface the evaluator consumes (`spec.md §3`), and a
//! concrete, minimal implementation of it (`document`, `loader`) used to
//! exercise the engine in tests.
//!
//! `spec.md` deliberately treats the document model as an external
//! collaborator: "the YAML document data model (traversal primitives only)"
//! is listed as out of scope for the *core*. A crate with nothing
//! implementing the trait cannot be compiled against or tested, so this
//! module adds one concrete implementation grounded in the teacher's own
//! node graph (`node/graph.rs`, `node/nodes/*`): a `slotmap`-keyed arena,
//! `parent: Option<NodeId>` back-references, no `Rc`/`Weak`.

pub mod document;
pub mod loader;
pub mod scalar;

pub use document::{Document, NodeRef};
pub use scalar::Scalar;

use slotmap::new_key_type;

use crate::flow::FlowValue;

new_key_type! {
    pub struct NodeId;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind
{
    Scalar,
    Sequence,
    Mapping,
}

/// The opaque `Node` surface `spec.md §3` describes: "An opaque `Node`
/// offers: `kind()`, `parent()`, `documentRoot()`, `anchor(name)`,
/// `sequenceLen()`, `sequenceItem(i)`, `mappingValueBySimpleKey(bytes)`,
/// `mappingValueByKey(ParsedYamlFragment)`, `children()` for either
/// variant."
///
/// `Copy` because every concrete implementation is expected to be a cheap
/// handle (an arena key plus a document reference), never an owning value;
/// the evaluator passes nodes by value freely while walking the tree.
pub trait Node: Copy
{
    fn kind(&self) -> NodeKind;

    /// Identity used for result-list deduplication (`spec.md §3`: "set
    /// semantics on identity").
    fn id(&self) -> NodeId;

    fn parent(&self) -> Option<Self>;

    fn document_root(&self) -> Self;

    fn anchor(&self, name: &str) -> Option<Self>;

    fn sequence_len(&self) -> Option<usize>;

    fn sequence_item(&self, index: usize) -> Option<Self>;

    fn mapping_value_by_simple_key(&self, key: &str) -> Option<Self>;

    fn mapping_value_by_key(&self, fragment: &FlowValue) -> Option<Self>;

    /// Immediate children: sequence items in order, or mapping values in
    /// entry order. Scalars have none (`EveryChild`/`EveryChildRecursive`
    /// special-case the scalar case themselves rather than calling this).
    fn children(&self) -> Vec<Self>;
}
