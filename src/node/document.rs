/*
 * This Source Code Form is subject to the terms of the
 * Mozilla Public License, v. 2.0. If a copy of the MPL
 * was not distributed with this file, You can obtain one at http://mozilla.org/MPL/2.0/.
 */

//! A minimal, concrete `Node` implementation backed by a `slotmap` arena,
//! grounded in the teacher's `node/graph.rs` `Storage<'a>` (a `SlotMap` plus
//! a `SecondaryMap`) -- here collapsed to a single `SlotMap` since every
//! node kind's extra data fits directly in one `Entry` without needing a
//! second map.

use std::collections::HashMap;

use slotmap::SlotMap;

use super::scalar::Scalar;
use super::{Node, NodeId, NodeKind};
use crate::flow::FlowValue;

pub(crate) enum Payload
{
    Scalar(Scalar),
    Sequence(Vec<NodeId>),
    Mapping(Vec<(NodeId, NodeId)>),
}

pub(crate) struct Entry
{
    pub(crate) parent:  Option<NodeId>,
    pub(crate) payload: Payload,
}

/// An owned, in-memory YAML document.
pub struct Document
{
    pub(crate) arena:   SlotMap<NodeId, Entry>,
    pub(crate) root:    NodeId,
    pub(crate) anchors: HashMap<String, NodeId>,
}

impl Document
{
    pub fn root(&self) -> NodeRef<'_>
    {
        NodeRef { doc: self, id: self.root }
    }

    fn entry(&self, id: NodeId) -> &Entry
    {
        &self.arena[id]
    }

    fn matches_fragment(&self, id: NodeId, fragment: &FlowValue) -> bool
    {
        match (&self.entry(id).payload, fragment)
        {
            (Payload::Scalar(s), f) => s.matches_fragment(f),
            (Payload::Sequence(items), FlowValue::Seq(expected)) =>
            {
                items.len() == expected.len()
                    && items
                        .iter()
                        .zip(expected.iter())
                        .all(|(&id, f)| self.matches_fragment(id, f))
            },
            (Payload::Mapping(entries), FlowValue::Map(expected)) =>
            {
                if entries.len() != expected.len()
                {
                    return false;
                }

                let mut used = vec![false; entries.len()];
                'outer: for (fk, fv) in expected
                {
                    for (i, &(k, v)) in entries.iter().enumerate()
                    {
                        if !used[i] && self.matches_fragment(k, fk) && self.matches_fragment(v, fv)
                        {
                            used[i] = true;
                            continue 'outer;
                        }
                    }
                    return false;
                }
                true
            },
            _ => false,
        }
    }
}

/// A cheap, `Copy` handle into a [`Document`]. The concrete `Node`
/// implementation used throughout tests and the `eval` examples.
#[derive(Clone, Copy)]
pub struct NodeRef<'doc>
{
    doc: &'doc Document,
    id:  NodeId,
}

impl<'doc> NodeRef<'doc>
{
    pub(crate) fn new(doc: &'doc Document, id: NodeId) -> Self
    {
        Self { doc, id }
    }

    /// The scalar value this node holds, if it is a scalar.
    pub fn as_scalar(&self) -> Option<&'doc Scalar>
    {
        match &self.doc.entry(self.id).payload
        {
            Payload::Scalar(s) => Some(s),
            _ => None,
        }
    }
}

impl<'doc> Node for NodeRef<'doc>
{
    fn kind(&self) -> NodeKind
    {
        match &self.doc.entry(self.id).payload
        {
            Payload::Scalar(_) => NodeKind::Scalar,
            Payload::Sequence(_) => NodeKind::Sequence,
            Payload::Mapping(_) => NodeKind::Mapping,
        }
    }

    fn id(&self) -> NodeId
    {
        self.id
    }

    fn parent(&self) -> Option<Self>
    {
        self.doc.entry(self.id).parent.map(|id| NodeRef::new(self.doc, id))
    }

    fn document_root(&self) -> Self
    {
        NodeRef::new(self.doc, self.doc.root)
    }

    fn anchor(&self, name: &str) -> Option<Self>
    {
        self.doc.anchors.get(name).map(|&id| NodeRef::new(self.doc, id))
    }

    fn sequence_len(&self) -> Option<usize>
    {
        match &self.doc.entry(self.id).payload
        {
            Payload::Sequence(items) => Some(items.len()),
            _ => None,
        }
    }

    fn sequence_item(&self, index: usize) -> Option<Self>
    {
        match &self.doc.entry(self.id).payload
        {
            Payload::Sequence(items) => items.get(index).map(|&id| NodeRef::new(self.doc, id)),
            _ => None,
        }
    }

    fn mapping_value_by_simple_key(&self, key: &str) -> Option<Self>
    {
        match &self.doc.entry(self.id).payload
        {
            Payload::Mapping(entries) => entries.iter().find_map(|&(k, v)| {
                let key_scalar = match &self.doc.entry(k).payload
                {
                    Payload::Scalar(s) => s.as_str(),
                    _ => None,
                };
                if key_scalar == Some(key)
                {
                    Some(NodeRef::new(self.doc, v))
                }
                else
                {
                    None
                }
            }),
            _ => None,
        }
    }

    fn mapping_value_by_key(&self, fragment: &FlowValue) -> Option<Self>
    {
        match &self.doc.entry(self.id).payload
        {
            Payload::Mapping(entries) => entries.iter().find_map(|&(k, v)| {
                if self.doc.matches_fragment(k, fragment)
                {
                    Some(NodeRef::new(self.doc, v))
                }
                else
                {
                    None
                }
            }),
            _ => None,
        }
    }

    fn children(&self) -> Vec<Self>
    {
        match &self.doc.entry(self.id).payload
        {
            Payload::Scalar(_) => Vec::new(),
            Payload::Sequence(items) => items.iter().map(|&id| NodeRef::new(self.doc, id)).collect(),
            Payload::Mapping(entries) => entries.iter().map(|&(_, v)| NodeRef::new(self.doc, v)).collect(),
        }
    }
}
