//! Existing out-of-line definitions in the output file.

use std::{collections::HashMap, path::Path};

use tracing::debug;

use crate::ast::{Cursor, TranslationUnit, Visit, walk};

/// Function-like cursors of one file that could be the definition of a
/// declaration, grouped by name. Built per request and never kept.
#[derive(Debug)]
pub struct DefinitionIndex<C> {
    by_name: HashMap<String, Vec<C>>,
}

impl<C: Cursor> DefinitionIndex<C> {
    /// Index `file` for definitions of `decl`.
    ///
    /// In-class declarations and inline bodies of `decl`'s class are left
    /// out, as is `decl` itself unless it is an out-of-line definition.
    /// Cursors of other files (includes) are never visited.
    pub fn build<U>(
        unit: &U,
        file: &Path,
        decl: &C,
    ) -> Self
    where
        U: TranslationUnit<Cursor = C>,
    {
        let skip_decl = !is_out_of_line(decl);
        let owner = decl.semantic_parent().filter(|parent| parent.kind().is_record()).map(|parent| parent.canonical());

        let found = walk(&unit.root(), |cursor: &C| {
            let Some(loc) = cursor.location() else {
                return Visit::Continue;
            };
            if loc.file != file {
                return Visit::Skip;
            }
            if !cursor.kind().is_function() || (skip_decl && cursor.id() == decl.id()) {
                return Visit::Continue;
            }
            let in_owner = match (&owner, cursor.lexical_parent()) {
                (Some(owner), Some(lexical)) => lexical.canonical().id() == owner.id(),
                _ => false,
            };
            if in_owner { Visit::Continue } else { Visit::Collect(cursor.clone()) }
        });

        let mut by_name: HashMap<String, Vec<C>> = HashMap::new();
        for cursor in found {
            by_name.entry(cursor.spelling()).or_default().push(cursor);
        }
        debug!("[lookup] {} candidate definition names in {}", by_name.len(), file.display());

        Self {
            by_name,
        }
    }

    /// The indexed cursor that is the same entity as `decl`.
    pub fn find(
        &self,
        decl: &C,
    ) -> Option<&C> {
        self.by_name.get(&decl.spelling())?.iter().find(|candidate| candidate.is_same_entity(decl))
    }
}

/// Whether `decl` sits outside the scope that owns it, as an out-of-line
/// member definition does.
fn is_out_of_line<C: Cursor>(decl: &C) -> bool {
    match (decl.lexical_parent(), decl.semantic_parent()) {
        (Some(lexical), Some(semantic)) => lexical.canonical().id() != semantic.canonical().id(),
        _ => false,
    }
}
