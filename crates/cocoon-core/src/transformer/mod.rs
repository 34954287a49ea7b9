/*!
# Rewrite Passes

Every pass rewrites one parsed callable in place and records what it did on
the snippet it came from. Passes are composed into a [`Pipeline`], and
[`transform`] drives a pipeline over a snippet: parse, run every pass in
order, print the result back into the snippet.

Structural passes walk the tree with [`crate::ast::visit_mut::VisitMut`]:
a node is rewritten first, then its (possibly new) children are visited.
Identifier passes do one scan of the whole callable instead.
*/

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;
use tracing::debug;

use crate::ast::{Callable, ToSource};
use crate::parser::parse;
use crate::snippet::{Snippet, Transformation};

pub mod expand_unary_increment;
pub mod for_to_while;
pub mod identifiers;
pub mod nest_else_if;
pub mod reverse_if;
pub mod scope;
pub mod swap_equals_operands;
pub mod swap_relation_operands;

pub use expand_unary_increment::ExpandUnaryIncrement;
pub use for_to_while::ForToWhile;
pub use identifiers::{FunctionName, ParameterName, VariableName};
pub use nest_else_if::NestElseIf;
pub use reverse_if::ReverseIf;
pub use swap_equals_operands::SwapEqualsOperands;
pub use swap_relation_operands::SwapRelationOperands;

/// A construct a pass refuses to rewrite around
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum UnsupportedConstruct {
    /// `continue label;` inside the body of a loop being desugared
    #[error("labeled continue `{label}` inside a for loop being rewritten")]
    LabeledContinue { label: String },
}

/// Errors that abort a pass, and with it the snippet's driver run
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PassError {
    #[error("Unsupported construct: {0}")]
    Unsupported(#[from] UnsupportedConstruct),
}

/// A single rewrite rule over a parsed callable
pub trait Pass: Send + Sync {
    /// Name used to select the pass in configuration files
    fn name(&self) -> &'static str;

    /// Detailed description of what this pass does
    fn description(&self) -> &'static str;

    /// Rewrite `callable` in place and record occurrences on `snippet`.
    ///
    /// `snippet.code` still holds the source as it was before this pass ran.
    fn apply(&self, callable: &mut Callable, snippet: &mut Snippet) -> Result<(), PassError>;
}

/// An ordered list of passes, each applied once
#[derive(Default)]
pub struct Pipeline {
    passes: Vec<Box<dyn Pass>>,
}

impl Pipeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`Pipeline::push`]
    pub fn with_pass(mut self, pass: impl Pass + 'static) -> Self {
        self.passes.push(Box::new(pass));
        self
    }

    pub fn push(&mut self, pass: Box<dyn Pass>) {
        self.passes.push(pass);
    }

    pub fn len(&self) -> usize {
        self.passes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.passes.is_empty()
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.passes.iter().map(|pass| pass.name()).collect()
    }

    pub fn passes(&self) -> impl Iterator<Item = &dyn Pass> {
        self.passes.iter().map(|pass| pass.as_ref())
    }

    pub fn transform(&self, snippet: &mut Snippet) -> crate::Result<()> {
        transform(self, snippet)
    }
}

impl fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pipeline")
            .field("passes", &self.names())
            .finish()
    }
}

/// Run `pipeline` over `snippet`.
///
/// On error the snippet is left exactly as it was; a partially rewritten
/// tree is never printed back.
pub fn transform(pipeline: &Pipeline, snippet: &mut Snippet) -> crate::Result<()> {
    let mut callable = parse(&snippet.code)?;
    if pipeline.is_empty() {
        return Ok(());
    }
    let mut working = snippet.clone();

    for pass in pipeline.passes() {
        let before = working.total_transformations();
        pass.apply(&mut callable, &mut working)?;
        working.code = callable.to_source();
        debug!(
            snippet = %working.id,
            pass = pass.name(),
            applied = working.total_transformations() - before,
            "pass finished"
        );
    }

    *snippet = working;
    Ok(())
}

/// Summary of a batch of driver runs
#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct TransformationSummary {
    pub snippets: usize,
    pub snippets_changed: usize,
    pub transformations: BTreeMap<Transformation, usize>,
    pub failures: Vec<String>,
}

impl TransformationSummary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count a snippet after a successful driver run
    pub fn record(&mut self, snippet: &Snippet) {
        self.snippets += 1;
        if snippet.total_transformations() > 0 {
            self.snippets_changed += 1;
        }
        for (kind, count) in &snippet.transformations {
            *self.transformations.entry(*kind).or_insert(0) += count;
        }
    }

    /// Count a snippet whose driver run failed
    pub fn record_failure(&mut self, id: &str, error: &crate::CocoonError) {
        self.snippets += 1;
        self.failures.push(format!("{id}: {error}"));
    }

    pub fn merge(&mut self, other: TransformationSummary) {
        self.snippets += other.snippets;
        self.snippets_changed += other.snippets_changed;
        for (kind, count) in other.transformations {
            *self.transformations.entry(kind).or_insert(0) += count;
        }
        self.failures.extend(other.failures);
    }

    pub fn total(&self) -> usize {
        self.transformations.values().sum()
    }

    pub fn success(&self) -> bool {
        self.failures.is_empty()
    }
}

impl fmt::Display for TransformationSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{} snippets, {} changed, {} failed",
            self.snippets,
            self.snippets_changed,
            self.failures.len()
        )?;
        for (kind, count) in &self.transformations {
            writeln!(f, "  {kind}: {count}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests;
