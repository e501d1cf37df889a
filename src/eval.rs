/*
 * This Source Code Form is subject to the terms of the
 * Mozilla Public License, v. 2.0. If a copy of the MPL
 * was not distributed with this file, You can obtain one at http://mozilla.org/MPL/2.0/.
 */

//! The evaluator (`spec.md §4.D`): walks an [`Expr`] tree against a starting
//! [`Node`], producing an ordered, deduplicated [`ResultList`].

use crate::error::{Error, ErrorKind};
use crate::expr::{Expr, ExprId, ExprKind};
use crate::node::{Node, NodeKind};
use crate::results::ResultList;
use crate::token::SliceEnd;
use crate::EvalFlags;

/// `eval(Expr, Node) -> OrderedSet<Node>`. `input = None` yields the empty
/// set.
pub fn eval<N: Node>(expr: &Expr, input: Option<N>, flags: EvalFlags) -> Result<ResultList<N>, Error>
{
    let mut results = ResultList::new();

    if let Some(node) = input
    {
        eval_into(expr, expr.root(), node, flags, &mut results)?;
    }

    Ok(results)
}

fn eval_into<N: Node>(
    expr: &Expr,
    id: ExprId,
    node: N,
    flags: EvalFlags,
    out: &mut ResultList<N>,
) -> Result<(), Error>
{
    let expr_node = expr.node(id);

    match &expr_node.kind
    {
        ExprKind::Chain => eval_chain(expr, &expr_node.children, node, flags, out),
        ExprKind::Multi => eval_multi(expr, &expr_node.children, node, flags, out),
        ExprKind::EveryChild => eval_every_child(node, out),
        ExprKind::EveryChildRecursive => eval_recursive(node, out, false),
        ExprKind::EveryLeaf => eval_recursive(node, out, true),
        ExprKind::SeqSlice(start, end) => eval_slice(node, *start, *end, out),
        single =>
        {
            if let Some(result) = eval_single(single, node, flags)?
            {
                out.push(result);
            }
            Ok(())
        },
    }
}

/// The single-result operator table (`spec.md §4.D`).
fn eval_single<N: Node>(kind: &ExprKind, node: N, flags: EvalFlags) -> Result<Option<N>, Error>
{
    Ok(match kind
    {
        ExprKind::Root => Some(node.document_root()),
        ExprKind::This => Some(node),
        ExprKind::Parent => node.parent(),
        ExprKind::Alias(name) =>
        {
            let found = node.anchor(name);
            if found.is_none() && flags.contains(EvalFlags::STRICT_ANCHORS)
            {
                return Err(Error::new(ErrorKind::UnknownAnchor(name.clone()), None));
            }
            found
        },
        ExprKind::SimpleMapKey(key) =>
        {
            if node.kind() == NodeKind::Mapping
            {
                node.mapping_value_by_simple_key(key)
            }
            else
            {
                None
            }
        },
        ExprKind::MapKey(fragment) =>
        {
            if node.kind() == NodeKind::Mapping
            {
                node.mapping_value_by_key(fragment)
            }
            else
            {
                None
            }
        },
        ExprKind::SeqIndex(i) =>
        {
            if node.kind() == NodeKind::Sequence && *i >= 0
            {
                node.sequence_item(*i as usize)
            }
            else
            {
                None
            }
        },
        ExprKind::AssertScalar => (node.kind() == NodeKind::Scalar).then(|| node),
        ExprKind::AssertCollection => (node.kind() != NodeKind::Scalar).then(|| node),
        ExprKind::AssertSequence => (node.kind() == NodeKind::Sequence).then(|| node),
        ExprKind::AssertMapping => (node.kind() == NodeKind::Mapping).then(|| node),
        _ => unreachable!("eval_single called on a multi-result or composite kind"),
    })
}

fn eval_every_child<N: Node>(node: N, out: &mut ResultList<N>) -> Result<(), Error>
{
    match node.kind()
    {
        NodeKind::Scalar => out.push(node),
        NodeKind::Sequence | NodeKind::Mapping =>
        {
            for child in node.children()
            {
                out.push(child);
            }
        },
    }
    Ok(())
}

/// `EveryChildRecursive` / `EveryLeaf`: pre-order traversal via an explicit
/// worklist (a stack of pending subtrees), not native recursion, so
/// pathologically deep documents don't blow the call stack (`spec.md §9`'s
/// continuation-stack recommendation, applied on the document side).
fn eval_recursive<N: Node>(node: N, out: &mut ResultList<N>, leaves_only: bool) -> Result<(), Error>
{
    // A stack of "next sibling list to resume" frames would let this stream;
    // materializing the full pre-order sequence up front is simpler and
    // matches `spec.md §4.D`'s "an implementation may materialize or
    // stream" note.
    let mut stack = vec![node];

    while let Some(current) = stack.pop()
    {
        if !leaves_only || current.kind() == NodeKind::Scalar
        {
            out.push(current);
        }

        // Push children in reverse so pre-order (first child first) comes
        // out of the stack in the right order.
        let children = current.children();
        for child in children.into_iter().rev()
        {
            stack.push(child);
        }
    }

    Ok(())
}

fn eval_slice<N: Node>(node: N, start: u32, end: SliceEnd, out: &mut ResultList<N>) -> Result<(), Error>
{
    let len = match node.sequence_len()
    {
        Some(len) => len,
        None => return Ok(()),
    };

    let start = start as usize;
    let end = match end
    {
        SliceEnd::Open => len,
        SliceEnd::Bounded(e) => (e as usize).min(len),
    };

    if start >= end || start >= len
    {
        return Ok(());
    }

    for i in start..end
    {
        if let Some(item) = node.sequence_item(i)
        {
            out.push(item);
        }
    }

    Ok(())
}

fn eval_chain<N: Node>(
    expr: &Expr,
    stages: &[ExprId],
    node: N,
    flags: EvalFlags,
    out: &mut ResultList<N>,
) -> Result<(), Error>
{
    let mut current: Vec<N> = vec![node];

    for &stage in stages
    {
        let mut next = ResultList::new();
        for n in current
        {
            eval_into(expr, stage, n, flags, &mut next)?;
        }
        current = next.into_vec();
    }

    for n in current
    {
        out.push(n);
    }

    Ok(())
}

fn eval_multi<N: Node>(
    expr: &Expr,
    branches: &[ExprId],
    node: N,
    flags: EvalFlags,
    out: &mut ResultList<N>,
) -> Result<(), Error>
{
    for &branch in branches
    {
        eval_into(expr, branch, node, flags, out)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests
{
    use super::*;
    use crate::node::loader::load;
    use crate::parser::Parser;
    use crate::CompileFlags;

    fn run(doc_src: &str, path: &str) -> Vec<String>
    {
        let doc = load(doc_src).unwrap();
        let expr = Parser::new().compile(path, CompileFlags::empty()).unwrap();
        let results = eval(&expr, Some(doc.root()), EvalFlags::empty()).unwrap();
        results
            .into_vec()
            .into_iter()
            .map(|n| format!("{:?}", n.as_scalar()))
            .collect()
    }

    #[test]
    fn scenario_1_comma_list()
    {
        assert_eq!(run("a: 1\nb: 2\nc: 3\n", "/a,b,c"), vec!["Some(Int(1))", "Some(Int(2))", "Some(Int(3))"]);
    }

    #[test]
    fn scenario_2_slice()
    {
        assert_eq!(run("items: [10, 20, 30, 40]\n", "/items/1:3"), vec!["Some(Int(20))", "Some(Int(30))"]);
    }

    #[test]
    fn scenario_3_negative_index_never_matches()
    {
        let empty: Vec<String> = Vec::new();
        assert_eq!(run("items: [10, 20, 30]\n", "/items/-1"), empty);
    }

    #[test]
    fn scenario_4_nested_path()
    {
        assert_eq!(run("a: {b: {c: 7}}\n", "/a/b/c"), vec!["Some(Int(7))"]);
    }

    #[test]
    fn scenario_5_every_leaf()
    {
        assert_eq!(
            run("a: {b: 1, c: [ {d: 2}, {d: 3} ] }\n", "/**$"),
            vec!["Some(Int(1))", "Some(Int(2))", "Some(Int(3))"]
        );
    }

    #[test]
    fn scenario_6_alias_start()
    {
        assert_eq!(run("x: &A {k: 9}\n", "*A/k"), vec!["Some(Int(9))"]);
    }

    #[test]
    fn scenario_8_scalar_filter()
    {
        assert_eq!(run("a: 1\n", "/a$"), vec!["Some(Int(1))"]);
    }

    #[test]
    fn scenario_9_collection_filter()
    {
        let doc = load("a: {b: 1}\n").unwrap();
        let expr = Parser::new().compile("/a%", CompileFlags::empty()).unwrap();
        let results = eval(&expr, Some(doc.root()), EvalFlags::empty()).unwrap();
        let values = results.into_vec();
        assert_eq!(values.len(), 1);
        assert_eq!(values[0].kind(), NodeKind::Mapping);
    }

    #[test]
    fn scenario_10_sibling()
    {
        let doc = load("a: 1\nb: 2\n").unwrap();
        let expr = Parser::new().compile("/a/:b", CompileFlags::empty()).unwrap();
        let results = eval(&expr, Some(doc.root()), EvalFlags::empty()).unwrap();
        let values = results.into_vec();
        assert_eq!(values.len(), 1);
        assert_eq!(values[0].as_scalar().unwrap(), &crate::node::Scalar::Int(2));
    }

    #[test]
    fn missing_key_is_not_an_error()
    {
        let empty: Vec<String> = Vec::new();
        assert_eq!(run("a: 1\n", "/missing_key"), empty);
    }

    #[test]
    fn idempotence_of_this()
    {
        let doc = load("a: 1\n").unwrap();
        let a = Parser::new().compile("/a", CompileFlags::empty()).unwrap();
        let a_this = Parser::new().compile("/a/.", CompileFlags::empty()).unwrap();
        let r1 = eval(&a, Some(doc.root()), EvalFlags::empty()).unwrap().into_vec();
        let r2 = eval(&a_this, Some(doc.root()), EvalFlags::empty()).unwrap().into_vec();
        assert_eq!(r1.len(), r2.len());
        assert_eq!(r1[0].id(), r2[0].id());
    }

    #[test]
    fn every_child_recursive_dominates_every_leaf()
    {
        let doc = load("a: {b: 1, c: 2}\n").unwrap();
        let all = Parser::new().compile("/**", CompileFlags::empty()).unwrap();
        let leaves = Parser::new().compile("/**$", CompileFlags::empty()).unwrap();
        let all_ids: Vec<_> = eval(&all, Some(doc.root()), EvalFlags::empty())
            .unwrap()
            .into_vec()
            .into_iter()
            .map(|n| n.id())
            .collect();
        let leaf_ids: Vec<_> = eval(&leaves, Some(doc.root()), EvalFlags::empty())
            .unwrap()
            .into_vec()
            .into_iter()
            .map(|n| n.id())
            .collect();
        assert!(leaf_ids.iter().all(|id| all_ids.contains(id)));
    }
}
