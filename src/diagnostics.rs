/*
 * This Source Code Form is subject to the terms of the
 * Mozilla Public License, v. 2.0. If a copy of the MPL
 * was not distributed with this file, You can obtain one at http://mozilla.org/MPL/2.0/.
 */

//! A write-only diagnostics surface (`spec.md §4.F`): "receives warnings and
//! errors with source spans; callers may attach a logger." Diagnostic
//! output is side-effectful and never affects compiled `Expr`s or eval
//! results.

use crate::reader::Span;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity
{
    Notice,
    Warning,
    Error,
}

#[derive(Debug, Clone)]
pub struct Diagnostic
{
    pub severity: Severity,
    pub message:  String,
    pub span:     Option<Span>,
}

impl Diagnostic
{
    pub fn new(severity: Severity, message: impl Into<String>, span: Option<Span>) -> Self
    {
        Self { severity, message: message.into(), span }
    }
}

/// A sink that receives [`Diagnostic`]s. Never fallible: a sink that cannot
/// deliver a message (e.g. a disconnected remote logger) drops it rather
/// than propagating a failure into `compile`/`eval`.
pub trait Sink
{
    fn emit(&self, diagnostic: &Diagnostic);
}

/// Routes diagnostics through `tracing`, the host's logger sink per
/// `spec.md §6`'s "Environment" section.
pub struct TracingSink;

impl Sink for TracingSink
{
    fn emit(&self, diagnostic: &Diagnostic)
    {
        let span_text = diagnostic
            .span
            .map(|s| format!(" at {}..{}", s.start, s.end))
            .unwrap_or_default();

        match diagnostic.severity
        {
            Severity::Notice => tracing::info!("{}{}", diagnostic.message, span_text),
            Severity::Warning => tracing::warn!("{}{}", diagnostic.message, span_text),
            Severity::Error => tracing::error!("{}{}", diagnostic.message, span_text),
        }
    }
}

/// Discards every diagnostic. For embedders that don't want logging.
pub struct NullSink;

impl Sink for NullSink
{
    fn emit(&self, _diagnostic: &Diagnostic) {}
}
