/*
 * This Source Code Form is subject to the terms of the
 * Mozilla Public License, v. 2.0. If a copy of the MPL
 * was not distributed with this file, You can obtain one at http://mozilla.org/MPL/2.0/.
 */

//! End-to-end coverage of the concrete scenarios in `spec.md §8`, exercised
//! through the public `compile`/`eval` surface rather than any internal
//! module.

use anyhow::Result;
use ypath::node::loader::load;
use ypath::node::{Node, Scalar};
use ypath::{compile, eval};

fn scalars(doc_src: &str, path: &str) -> Result<Vec<Scalar>>
{
    let doc = load(doc_src)?;
    let expr = compile(path)?;
    let results = eval(&expr, Some(doc.root()))?;
    Ok(results
        .into_vec()
        .into_iter()
        .map(|n| n.as_scalar().cloned().expect("expected scalar matches"))
        .collect())
}

#[test]
fn scenario_1_comma_list() -> Result<()>
{
    assert_eq!(
        scalars("a: 1\nb: 2\nc: 3\n", "/a,b,c")?,
        vec![Scalar::Int(1), Scalar::Int(2), Scalar::Int(3)]
    );
    Ok(())
}

#[test]
fn scenario_2_slice() -> Result<()>
{
    assert_eq!(
        scalars("items: [10, 20, 30, 40]\n", "/items/1:3")?,
        vec![Scalar::Int(20), Scalar::Int(30)]
    );
    Ok(())
}

#[test]
fn scenario_3_negative_index_never_matches() -> Result<()>
{
    assert_eq!(scalars("items: [10, 20, 30]\n", "/items/-1")?, Vec::new());
    Ok(())
}

#[test]
fn scenario_4_nested_mapping() -> Result<()>
{
    assert_eq!(scalars("a: {b: {c: 7}}\n", "/a/b/c")?, vec![Scalar::Int(7)]);
    Ok(())
}

#[test]
fn scenario_5_every_leaf_preorder() -> Result<()>
{
    assert_eq!(
        scalars("a: {b: 1, c: [ {d: 2}, {d: 3} ] }\n", "/**$")?,
        vec![Scalar::Int(1), Scalar::Int(2), Scalar::Int(3)]
    );
    Ok(())
}

#[test]
fn scenario_6_alias_start() -> Result<()>
{
    assert_eq!(scalars("x: &A {k: 9}\n", "*A/k")?, vec![Scalar::Int(9)]);
    Ok(())
}

#[test]
fn scenario_7_bare_slash_asserts_collection() -> Result<()>
{
    let doc = load("root: {a: 1}\n")?;
    let expr = compile("/")?;
    let results = eval(&expr, Some(doc.root()))?;
    let values = results.into_vec();
    assert_eq!(values.len(), 1);
    assert_eq!(values[0].id(), doc.root().id());
    Ok(())
}

#[test]
fn scenario_8_scalar_filter() -> Result<()>
{
    assert_eq!(scalars("a: 1\n", "/a$")?, vec![Scalar::Int(1)]);
    Ok(())
}

#[test]
fn scenario_9_collection_filter() -> Result<()>
{
    let doc = load("a: {b: 1}\n")?;
    let expr = compile("/a%")?;
    let results = eval(&expr, Some(doc.root()))?;
    let values = results.into_vec();
    assert_eq!(values.len(), 1);
    assert_eq!(values[0].mapping_value_by_simple_key("b").unwrap().as_scalar(), Some(&Scalar::Int(1)));
    Ok(())
}

#[test]
fn scenario_10_sibling_lookup() -> Result<()>
{
    assert_eq!(scalars("a: 1\nb: 2\n", "/a/:b")?, vec![Scalar::Int(2)]);
    Ok(())
}

#[test]
fn empty_document_path_has_no_matches() -> Result<()>
{
    assert_eq!(scalars("a: 1\n", "/missing/deeper/path")?, Vec::new());
    Ok(())
}

#[test]
fn syntax_errors_are_rejected_at_compile_time() -> Result<()>
{
    assert!(compile("/a,").is_err());
    assert!(compile("|").is_err());
    assert!(compile("01").is_err());
    Ok(())
}
