//! Element protocol
//!
//! Every model element supports validation, diagnostic dumping and
//! representation as raw data (which can be translated into JSON or YAML)
//! via [`Element::raw_form`].
//!
//! The default methods are deliberate opt-in points: `raw_form` reports
//! `NotSupported` until an element implements it, while `validate`,
//! `coerce_values` and `dump` do nothing. Instantiation has no default,
//! see [`Instantiable`].

use crate::error::{Error, Result};
use crate::value::Value;
use serde::{Deserialize, Serialize};
use std::fmt::Write;

/// Severity of a validation issue
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum IssueLevel {
    /// Suspicious but usable
    Warning,
    /// The element cannot be used as declared
    Error,
}

/// A problem recorded during validation or value coercion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Issue {
    /// Severity
    pub level: IssueLevel,
    /// Human-readable description
    pub message: String,
}

/// Context threaded through element operations
///
/// Collects issues instead of aborting, and buffers diagnostic dump output.
#[derive(Debug, Default)]
pub struct ModelContext {
    issues: Vec<Issue>,
    out: String,
    indent: usize,
}

impl ModelContext {
    /// Create an empty context
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an issue
    pub fn report(&mut self, level: IssueLevel, message: impl Into<String>) {
        self.issues.push(Issue {
            level,
            message: message.into(),
        });
    }

    /// Record an error-level issue from an error value
    pub fn report_error(&mut self, err: &Error) {
        self.report(IssueLevel::Error, err.to_string());
    }

    /// All recorded issues, in report order
    pub fn issues(&self) -> &[Issue] {
        &self.issues
    }

    /// Check whether any error-level issue was recorded
    pub fn has_errors(&self) -> bool {
        self.issues.iter().any(|i| i.level == IssueLevel::Error)
    }

    /// Write one line of dump output at the current indentation
    pub fn write_line(&mut self, line: impl AsRef<str>) {
        for _ in 0..self.indent {
            self.out.push_str("  ");
        }
        // Writing to a String cannot fail
        let _ = writeln!(self.out, "{}", line.as_ref());
    }

    /// Run `f` with dump output indented one level deeper
    pub fn indented<F: FnOnce(&mut Self)>(&mut self, f: F) {
        self.indent += 1;
        f(self);
        self.indent -= 1;
    }

    /// Dump output written so far
    pub fn output(&self) -> &str {
        &self.out
    }
}

/// Capability set shared by every model element
pub trait Element {
    /// Project this element into encoding-ready raw data
    ///
    /// Must not mutate. Elements that are never serialized keep the default.
    fn raw_form(&self) -> Result<Value> {
        Err(Error::NotSupported("raw_form"))
    }

    /// Check this element, recording problems in `ctx`
    ///
    /// Reports rather than aborts: ordinary validation failures become issues.
    fn validate(&self, _ctx: &mut ModelContext) {}

    /// Replace embedded raw values with their typed counterparts, in place
    ///
    /// `container` is the raw form of the element that holds this one. When
    /// `report_issues` is set, failures are recorded in `ctx` and `Ok` is
    /// returned; otherwise the first failure is returned.
    fn coerce_values(
        &mut self,
        _ctx: &mut ModelContext,
        _container: &Value,
        _report_issues: bool,
    ) -> Result<()> {
        Ok(())
    }

    /// Write a human-readable description of this element to `ctx`
    fn dump(&self, _ctx: &mut ModelContext) {}
}

/// Elements that have a runtime counterpart
pub trait Instantiable: Element {
    /// The live element produced by instantiation
    type Instance: Element;

    /// Create the live counterpart of this element
    fn instantiate(&self, ctx: &mut ModelContext, container: &Value) -> Result<Self::Instance>;
}
