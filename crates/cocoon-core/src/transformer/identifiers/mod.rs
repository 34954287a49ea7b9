/*!
# Identifier Renaming

Shared machinery of the variable, parameter and function renaming passes.
Each pass asks a [`SynonymOracle`] for a new name per eligible identifier,
filters the answer through [`SynonymGuard`], then applies every accepted
rename across the whole callable in one walk.
*/

use std::fmt;

use tracing::{debug, warn};

use super::scope::ScopeNames;
use crate::ast::visit_mut::{walk_expr_mut, walk_stmt_mut, VisitMut};
use crate::ast::{Binding, BindingKind, Callable, Declarator, Expr, Param, Stmt};
use crate::snippet::NameMapping;
use crate::synonyms::{IdentifierKind, SynonymOracle};

mod function_name;
mod parameter_name;
mod variable_name;

pub use function_name::FunctionName;
pub use parameter_name::ParameterName;
pub use variable_name::VariableName;

/// Reserved words and literals that can never name anything
pub const RESERVED_WORDS: &[&str] = &[
    "abstract", "assert", "boolean", "break", "byte", "case", "catch", "char", "class", "const",
    "continue", "default", "do", "double", "else", "enum", "extends", "final", "finally",
    "float", "for", "goto", "if", "implements", "import", "instanceof", "int", "interface",
    "long", "native", "new", "package", "private", "protected", "public", "return", "short",
    "static", "strictfp", "super", "switch", "synchronized", "this", "throw", "throws",
    "transient", "try", "void", "volatile", "while", "true", "false", "null", "_",
];

/// Java identifier syntax plus the reserved word check
pub fn is_legal_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    let starts = first.is_alphabetic() || first == '_' || first == '$';
    starts
        && chars.all(|c| c.is_alphanumeric() || c == '_' || c == '$')
        && !RESERVED_WORDS.contains(&name)
}

/// Why a candidate name was turned down
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// The oracle gave the original name back
    Unchanged,
    /// Not a legal Java identifier, or a reserved word
    Illegal,
    /// Already declared somewhere in the callable
    Declared,
    /// Already used as a plain name in the body, e.g. a field
    Referenced,
    /// Already the name of a method invoked in the body
    Called,
    /// Already chosen for another identifier in this pass
    Taken,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            Rejection::Unchanged => "same as the original",
            Rejection::Illegal => "not a legal identifier",
            Rejection::Declared => "collides with a declaration",
            Rejection::Referenced => "collides with a referenced name",
            Rejection::Called => "collides with a called method",
            Rejection::Taken => "already used by another rename",
        };
        f.write_str(reason)
    }
}

/// Acceptance rules for oracle suggestions, built from the callable as it
/// was when the pass started.
pub struct SynonymGuard {
    names: ScopeNames,
    check_names: bool,
    check_calls: bool,
}

impl SynonymGuard {
    /// Guard for variable and parameter renames: the candidate must not
    /// clash with any declared or referenced name.
    pub fn new(callable: &Callable) -> Self {
        Self {
            names: ScopeNames::of_callable(callable),
            check_names: true,
            check_calls: false,
        }
    }

    /// Guard for renaming the method itself. Methods live apart from
    /// variables in Java, so only names of called methods clash.
    pub fn for_method(callable: &Callable) -> Self {
        Self {
            names: ScopeNames::of_callable(callable),
            check_names: false,
            check_calls: true,
        }
    }

    pub fn names(&self) -> &ScopeNames {
        &self.names
    }

    pub fn check(
        &self,
        original: &str,
        candidate: &str,
        accepted: &NameMapping,
    ) -> Result<(), Rejection> {
        if candidate == original {
            return Err(Rejection::Unchanged);
        }
        if !is_legal_identifier(candidate) {
            return Err(Rejection::Illegal);
        }
        if self.check_names && self.names.is_declared(candidate) {
            return Err(Rejection::Declared);
        }
        if self.check_names && self.names.is_referenced(candidate) {
            return Err(Rejection::Referenced);
        }
        if self.check_calls && self.names.is_called(candidate) {
            return Err(Rejection::Called);
        }
        if accepted.values().any(|taken| taken == candidate) {
            return Err(Rejection::Taken);
        }
        Ok(())
    }
}

/// Query the oracle for every name and keep the suggestions the guard
/// accepts, in query order.
pub(crate) fn collect_renames<'a>(
    oracle: &dyn SynonymOracle,
    guard: &SynonymGuard,
    names: impl IntoIterator<Item = &'a str>,
    context: &str,
    kind: IdentifierKind,
) -> NameMapping {
    let mut accepted = NameMapping::new();
    for name in names {
        if accepted.contains_key(name) {
            continue;
        }
        let candidate = match oracle.generate_synonym_for(name, context, kind) {
            Ok(candidate) => candidate,
            Err(error) => {
                warn!(%kind, name, %error, "synonym oracle failed, keeping name");
                continue;
            }
        };
        match guard.check(name, &candidate, &accepted) {
            Ok(()) => {
                debug!(%kind, name, candidate = %candidate, "accepted rename");
                accepted.insert(name.to_string(), candidate);
            }
            Err(reason) => {
                debug!(%kind, name, candidate = %candidate, %reason, "rejected rename");
            }
        }
    }
    accepted
}

/// Which occurrences a [`Renamer`] rewrites
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RenameTarget {
    /// Local declarators, for-each and resource variables
    Variables,
    /// The callable's parameters plus catch and lambda parameters
    Parameters,
}

/// Applies an accepted mapping to every declaration and reference
pub(crate) struct Renamer<'m> {
    mapping: &'m NameMapping,
    target: RenameTarget,
}

impl<'m> Renamer<'m> {
    pub(crate) fn new(mapping: &'m NameMapping, target: RenameTarget) -> Self {
        Self { mapping, target }
    }

    fn rename(&self, name: &mut String) {
        if let Some(new_name) = self.mapping.get(name.as_str()) {
            *name = new_name.clone();
        }
    }
}

impl VisitMut for Renamer<'_> {
    fn visit_param_mut(&mut self, param: &mut Param) {
        // receiver parameter
        if param.name == "this" {
            return;
        }
        if self.target == RenameTarget::Parameters {
            self.rename(&mut param.name);
        }
    }

    fn visit_declarator_mut(&mut self, declarator: &mut Declarator) {
        if self.target == RenameTarget::Variables {
            self.rename(&mut declarator.name);
        }
        crate::ast::visit_mut::walk_declarator_mut(self, declarator);
    }

    fn visit_stmt_mut(&mut self, stmt: &mut Stmt) {
        if let (Stmt::ForEach { name, .. }, RenameTarget::Variables) = (&mut *stmt, self.target) {
            self.rename(name);
        }
        walk_stmt_mut(self, stmt);
    }

    fn visit_expr_mut(&mut self, expr: &mut Expr) {
        if let Expr::Name(name) = expr {
            self.rename(name);
        }
        walk_expr_mut(self, expr);
    }

    fn visit_binding_mut(&mut self, binding: &mut Binding) {
        let matches_target = match binding.kind {
            BindingKind::Variable => self.target == RenameTarget::Variables,
            BindingKind::Parameter => self.target == RenameTarget::Parameters,
        };
        if matches_target {
            self.rename(&mut binding.name);
        }
    }
}

#[cfg(test)]
mod tests;
