/*
 * This Source Code Form is subject to the terms of the
 * Mozilla Public License, v. 2.0. If a copy of the MPL
 * was not distributed with this file, You can obtain one at http://mozilla.org/MPL/2.0/.
 */

//! The scalar value held by a leaf document node.

use crate::flow::FlowValue;

#[derive(Debug, Clone, PartialEq)]
pub enum Scalar
{
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

impl Scalar
{
    /// The plain-scalar text this value was read from, for display and for
    /// `SimpleMapKey` matching (which only ever compares against `Str`).
    pub fn as_str(&self) -> Option<&str>
    {
        match self
        {
            Scalar::Str(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn matches_fragment(&self, fragment: &FlowValue) -> bool
    {
        match (self, fragment)
        {
            (Scalar::Null, FlowValue::Null) => true,
            (Scalar::Bool(a), FlowValue::Bool(b)) => a == b,
            (Scalar::Int(a), FlowValue::Int(b)) => a == b,
            (Scalar::Float(a), FlowValue::Float(b)) => (a - b).abs() < f64::EPSILON,
            (Scalar::Str(a), FlowValue::Str(b)) => a == b,
            _ => false,
        }
    }

    pub(crate) fn from_flow(value: &FlowValue) -> Option<Scalar>
    {
        Some(match value
        {
            FlowValue::Null => Scalar::Null,
            FlowValue::Bool(b) => Scalar::Bool(*b),
            FlowValue::Int(i) => Scalar::Int(*i),
            FlowValue::Float(f) => Scalar::Float(*f),
            FlowValue::Str(s) => Scalar::Str(s.clone()),
            FlowValue::Seq(_) | FlowValue::Map(_) => return None,
        })
    }

    pub(crate) fn from_plain_text(text: &str) -> Scalar
    {
        match text
        {
            "null" | "Null" | "NULL" | "~" | "" => Scalar::Null,
            "true" | "True" | "TRUE" => Scalar::Bool(true),
            "false" | "False" | "FALSE" => Scalar::Bool(false),
            _ =>
            {
                if let Ok(i) = text.parse::<i64>()
                {
                    Scalar::Int(i)
                }
                else if let Ok(f) = text.parse::<f64>()
                {
                    Scalar::Float(f)
                }
                else
                {
                    Scalar::Str(text.to_owned())
                }
            },
        }
    }
}
