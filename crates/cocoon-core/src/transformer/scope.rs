//! Name inventory of a callable or block, used by the shadow guard of the
//! loop desugaring and by the identifier passes' acceptance guard.

use std::collections::{HashMap, HashSet};

use indexmap::IndexSet;

use crate::ast::visit::{walk_declarator, walk_expr, walk_stmt, Visit};
use crate::ast::{Binding, BindingKind, Block, Callable, Declarator, Expr, Param, Stmt};

#[derive(Debug, Default, Clone)]
pub struct ScopeNames {
    declared: HashMap<String, usize>,
    variables: IndexSet<String>,
    parameters: HashSet<String>,
    referenced: HashSet<String>,
    called: HashSet<String>,
}

impl ScopeNames {
    /// Scan a whole callable, parameters included
    pub fn of_callable(callable: &Callable) -> Self {
        let mut names = Self::default();
        names.visit_callable(callable);
        names
    }

    pub fn of_block(block: &Block) -> Self {
        let mut names = Self::default();
        names.visit_block(block);
        names
    }

    /// How many declarations of `name` the scan saw, in any nested scope
    pub fn declarations(&self, name: &str) -> usize {
        self.declared.get(name).copied().unwrap_or(0)
    }

    pub fn is_declared(&self, name: &str) -> bool {
        self.declared.contains_key(name)
    }

    /// Names read or written as plain identifiers
    pub fn is_referenced(&self, name: &str) -> bool {
        self.referenced.contains(name)
    }

    /// Names of invoked methods, qualified or not
    pub fn is_called(&self, name: &str) -> bool {
        self.called.contains(name)
    }

    /// Declared somewhere as a local, for-each, resource or pattern variable
    pub fn is_variable(&self, name: &str) -> bool {
        self.variables.contains(name)
    }

    /// Declared somewhere as a method, lambda or catch parameter
    pub fn is_parameter(&self, name: &str) -> bool {
        self.parameters.contains(name)
    }

    /// Local variable names in declaration order, each once
    pub fn variables(&self) -> impl Iterator<Item = &str> {
        self.variables.iter().map(String::as_str)
    }

    fn declare(&mut self, name: &str) {
        *self.declared.entry(name.to_string()).or_insert(0) += 1;
    }

    fn declare_variable(&mut self, name: &str) {
        self.declare(name);
        self.variables.insert(name.to_string());
    }

    fn declare_parameter(&mut self, name: &str) {
        self.declare(name);
        self.parameters.insert(name.to_string());
    }
}

impl Visit for ScopeNames {
    fn visit_param(&mut self, param: &Param) {
        self.declare_parameter(&param.name);
    }

    fn visit_declarator(&mut self, declarator: &Declarator) {
        self.declare_variable(&declarator.name);
        walk_declarator(self, declarator);
    }

    fn visit_stmt(&mut self, stmt: &Stmt) {
        if let Stmt::ForEach { name, .. } = stmt {
            self.declare_variable(name);
        }
        walk_stmt(self, stmt);
    }

    fn visit_expr(&mut self, expr: &Expr) {
        match expr {
            Expr::Name(name) => {
                self.referenced.insert(name.clone());
            }
            Expr::Call { name, .. } => {
                self.called.insert(name.clone());
            }
            _ => {}
        }
        walk_expr(self, expr);
    }

    fn visit_binding(&mut self, binding: &Binding) {
        match binding.kind {
            BindingKind::Variable => self.declare_variable(&binding.name),
            BindingKind::Parameter => self.declare_parameter(&binding.name),
        }
    }
}
