use std::sync::Arc;

use tracing::debug;

use super::{collect_renames, RenameTarget, Renamer, SynonymGuard};
use crate::ast::visit_mut::VisitMut;
use crate::ast::Callable;
use crate::snippet::{Snippet, Transformation};
use crate::synonyms::{IdentifierKind, SynonymOracle};
use crate::transformer::{Pass, PassError};

/// Renames local variables: declarators, for-each variables and
/// try-with-resources variables.
pub struct VariableName {
    oracle: Arc<dyn SynonymOracle>,
}

impl VariableName {
    pub fn new(oracle: Arc<dyn SynonymOracle>) -> Self {
        Self { oracle }
    }
}

impl Pass for VariableName {
    fn name(&self) -> &'static str {
        "variableNameTransformer"
    }

    fn description(&self) -> &'static str {
        "Renames local variables to synonyms suggested by the oracle"
    }

    fn apply(&self, callable: &mut Callable, snippet: &mut Snippet) -> Result<(), PassError> {
        let guard = SynonymGuard::new(callable);
        let names = guard.names();
        // A name that also binds a lambda or catch parameter somewhere would
        // be renamed at its references but not at that binding.
        let eligible = names.variables().filter(|name| {
            let shared = names.is_parameter(name);
            if shared {
                debug!(name, "variable name also declared as a parameter, keeping it");
            }
            !shared
        });
        let mapping = collect_renames(
            self.oracle.as_ref(),
            &guard,
            eligible,
            &snippet.code,
            IdentifierKind::Variable,
        );

        if !mapping.is_empty() {
            Renamer::new(&mapping, RenameTarget::Variables).visit_callable_mut(callable);
            debug!(renamed = mapping.len(), "renamed variables");
        }
        snippet.add_transformations(Transformation::RenameVariables, mapping.len());
        snippet.variable_mapping = Some(mapping);
        Ok(())
    }
}
