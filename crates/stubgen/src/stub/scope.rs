//! Namespace qualification and insertion placement.

use std::{collections::HashSet, path::Path};

use tracing::debug;

use super::lookup::DefinitionIndex;
use crate::ast::{Cursor, CursorKind, NodeId, TranslationUnit, Visit, walk};

/// Where a stub goes in the output file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertionPoint {
    /// Insert so the stub's first line becomes this 1-based line.
    Above(u32),
    /// Append, or for headers place above a trailing include guard `#endif`.
    EndOfFile,
}

/// An insertion point plus the namespaces textually open there.
#[derive(Debug, Clone)]
pub struct Placement<C> {
    pub point: InsertionPoint,
    /// Open namespaces at `point`, outermost first.
    pub scope: Vec<C>,
}

/// Namespaces `decl` belongs to, outermost first.
pub fn namespace_chain<C: Cursor>(decl: &C) -> Vec<C> {
    let mut namespaces = Vec::new();
    let mut current = decl.semantic_parent();
    while let Some(cursor) = current {
        if cursor.kind() == CursorKind::Namespace {
            namespaces.push(cursor.clone());
        }
        current = cursor.semantic_parent();
    }
    namespaces.reverse();
    namespaces
}

/// Namespace blocks written in `file` that are one of `decl`'s namespaces,
/// in source order. Re-opened namespaces yield one entry per block.
pub fn lexical_namespaces<U: TranslationUnit>(
    unit: &U,
    decl: &U::Cursor,
    file: &Path,
) -> Vec<U::Cursor> {
    let owners: HashSet<NodeId> = namespace_chain(decl).iter().map(|ns| ns.canonical().id()).collect();

    walk(&unit.root(), |cursor: &U::Cursor| {
        let Some(loc) = cursor.location() else {
            return Visit::Continue;
        };
        if loc.file != file {
            return Visit::Skip;
        }
        if cursor.kind() == CursorKind::Namespace && owners.contains(&cursor.canonical().id()) {
            Visit::Collect(cursor.clone())
        } else {
            Visit::Continue
        }
    })
}

/// The part of `namespaces` not already open in `lexical`, joined with `::`.
///
/// Both chains are compared by canonical identity from the outermost in; the
/// first mismatch ends the shared prefix.
pub fn namespace_qualification<C: Cursor>(
    namespaces: &[C],
    lexical: &[C],
) -> String {
    let shared = namespaces.iter().zip(lexical).take_while(|(ns, open)| ns.is_same_entity(open)).count();
    namespaces[shared..].iter().map(Cursor::spelling).filter(|name| !name.is_empty()).collect::<Vec<_>>().join("::")
}

/// Function-like declarations written after `decl` in the same lexical
/// scope of `header`, in source order.
pub fn following_declarations<C: Cursor>(
    decl: &C,
    header: &Path,
) -> Vec<C> {
    let Some(scope) = decl.lexical_parent().map(|parent| parent.canonical().id()) else {
        return Vec::new();
    };
    let Some(start) = decl.semantic_parent() else {
        return Vec::new();
    };

    let mut found_decl = false;
    walk(&start, |cursor: &C| {
        if let Some(loc) = cursor.location()
            && loc.file != header
        {
            return Visit::Skip;
        }
        if cursor.is_same_entity(decl) {
            found_decl = true;
            return Visit::Continue;
        }
        let same_scope = cursor.lexical_parent().is_some_and(|parent| parent.canonical().id() == scope);
        if found_decl && same_scope && cursor.kind().is_function() {
            Visit::Collect(cursor.clone())
        } else {
            Visit::Continue
        }
    })
}

/// Decide where the definition of `decl` goes.
///
/// In priority order: above the existing definition of the first following
/// declaration that has one, before the closing brace of the innermost
/// enclosing namespace block, or at the end of the file.
pub fn resolve_placement<C: Cursor>(
    following: &[C],
    definitions: &DefinitionIndex<C>,
    lexical: &[C],
) -> Placement<C> {
    for next in following {
        let Some(definition) = definitions.find(next) else {
            continue;
        };
        let Some(extent) = definition.extent() else {
            continue;
        };
        debug!("[placement] above definition of '{}' at line {}", next.spelling(), extent.start.line);
        return Placement {
            point: InsertionPoint::Above(extent.start.line),
            scope: enclosing_namespaces(definition),
        };
    }

    let chain = innermost_chain(lexical);
    if let Some(extent) = chain.last().and_then(Cursor::extent) {
        debug!("[placement] end of namespace block closing at line {}", extent.end.line);
        return Placement {
            point: InsertionPoint::Above(extent.end.line),
            scope: chain,
        };
    }

    debug!("[placement] end of file");
    Placement {
        point: InsertionPoint::EndOfFile,
        scope: Vec::new(),
    }
}

/// Namespace blocks textually enclosing `cursor`, outermost first.
fn enclosing_namespaces<C: Cursor>(cursor: &C) -> Vec<C> {
    let mut namespaces = Vec::new();
    let mut current = cursor.lexical_parent();
    while let Some(parent) = current {
        if parent.kind() == CursorKind::Namespace {
            namespaces.push(parent.clone());
        }
        current = parent.lexical_parent();
    }
    namespaces.reverse();
    namespaces
}

/// The deepest properly nested run of blocks in `lexical`, outermost first.
///
/// Ties go to the block written last.
fn innermost_chain<C: Cursor>(lexical: &[C]) -> Vec<C> {
    let ids: HashSet<NodeId> = lexical.iter().map(Cursor::id).collect();
    let mut best: Vec<C> = Vec::new();
    for block in lexical {
        let mut chain: Vec<C> = enclosing_namespaces(block).into_iter().filter(|ns| ids.contains(&ns.id())).collect();
        chain.push(block.clone());
        if chain.len() >= best.len() {
            best = chain;
        }
    }
    best
}
