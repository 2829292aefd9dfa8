//! Resolution that has to wait for the whole file.
//!
//! The parser binds what the open scope chain knows at the point of use.
//! Everything else (forward references to later top-level declarations,
//! builtins, imported package names) lands on `File::unresolved`.
//! [`resolve_deferred`] retries those against the finished package scope;
//! [`resolve_universe`] lets a caller bind what is left against names
//! defined outside the file.

use log::debug;

use crate::ast::{File, IdentId, LitKind, ObjectId, Spec};
use crate::error::Result;
use crate::scope::{DeclRef, ObjKind, Object};

/// Binds pending identifiers found in the package scope. Returns how many
/// were bound; the rest stay in `file.unresolved`.
///
/// Held composite-literal keys are settled afterwards, once forward type
/// names are bound: keys of struct literals stay unbound, keys of other
/// literals are bound or reported. Keys whose type is still unknown stay
/// in `file.pending_keys`.
pub fn resolve_deferred(file: &mut File) -> usize {
    let scope = file.scope;
    let mut bound = retain_unbound(file, |file, id| {
        let name = file.ast.idents[id].name;
        file.ast.scopes.lookup(scope, name)
    });

    let keys = std::mem::take(&mut file.pending_keys);
    let mut reported = false;
    for key in keys {
        match file.ast.literal_has_fields(key.typ) {
            Some(false) => {}
            Some(true) => continue,
            None => {
                file.pending_keys.push(key);
                continue;
            }
        }
        let name = file.ast.idents[key.key].name;
        match key.candidate.or_else(|| file.ast.scopes.lookup(scope, name)) {
            Some(obj) => {
                file.ast.idents[key.key].obj = Some(obj);
                bound += 1;
            }
            None => {
                file.unresolved.push(key.key);
                reported = true;
            }
        }
    }
    if reported {
        let idents = &file.ast.idents;
        file.unresolved.sort_by_key(|&id| idents.span(id).start);
    }
    bound
}

fn retain_unbound(
    file: &mut File,
    mut lookup: impl FnMut(&File, IdentId) -> Option<ObjectId>,
) -> usize {
    let pending = std::mem::take(&mut file.unresolved);
    let total = pending.len();
    let mut still = Vec::with_capacity(total);
    for id in pending {
        match lookup(file, id) {
            Some(obj) => file.ast.idents[id].obj = Some(obj),
            None => still.push(id),
        }
    }
    let bound = total - still.len();
    debug!(
        target: "minigo_parser",
        "deferred resolution: {bound} bound, {} left",
        still.len()
    );
    file.unresolved = still;
    bound
}

/// Names predeclared outside any file.
#[derive(Debug, Clone, Default)]
pub struct Universe {
    entries: Vec<(String, ObjKind)>,
}

impl Universe {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, kind: ObjKind) -> Self {
        self.entries.push((name.into(), kind));
        self
    }

    /// The dialect's predeclared types, constants and functions.
    pub fn builtins() -> Self {
        const TYPES: &[&str] = &[
            "bool", "byte", "int", "int8", "int16", "int32", "int64", "rune", "string", "uint",
            "uint8", "uint16", "uint32", "uint64", "uintptr", "error",
        ];
        const CONSTS: &[&str] = &["true", "false", "nil", "iota"];
        const FUNCS: &[&str] = &[
            "append", "cap", "copy", "delete", "len", "make", "new", "panic", "print", "println",
        ];

        let mut u = Self::new();
        u.entries.extend(TYPES.iter().map(|n| (n.to_string(), ObjKind::Type)));
        u.entries.extend(CONSTS.iter().map(|n| (n.to_string(), ObjKind::Const)));
        u.entries.extend(FUNCS.iter().map(|n| (n.to_string(), ObjKind::Func)));
        u
    }

    /// Adds a `Package` object for every import of `file`, named after the
    /// last path element.
    pub fn with_imports(mut self, file: &File) -> Self {
        for &spec in file.imports() {
            let Spec::Import(import) = file.ast.specs[spec] else {
                continue;
            };
            if import.path.kind != LitKind::String {
                continue;
            }
            let path = file.ast.str(import.path.value).trim_matches(|c| c == '"' || c == '`');
            let name = path.rsplit('/').next().unwrap_or(path);
            if !name.is_empty() {
                self.entries.push((name.to_owned(), ObjKind::Package));
            }
        }
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Binds what is still unresolved against `universe`. The universe gets its
/// own scope in the file's arena (outer of nothing); objects are created
/// with [`DeclRef::Predeclared`]. Returns how many identifiers were bound.
pub fn resolve_universe(file: &mut File, universe: &Universe) -> Result<usize> {
    let scope = file.ast.scopes.new_scope(None);
    for (name, kind) in &universe.entries {
        let name = file.ast.interner.intern(name);
        let obj = file.ast.objects.alloc(
            Object {
                kind: *kind,
                name,
                decl: DeclRef::Predeclared,
                data: None,
            },
            Default::default(),
        );
        file.ast.scopes.insert(Some(scope), name, obj)?;
    }
    Ok(retain_unbound(file, |file, id| {
        file.ast.scopes.lookup(scope, file.ast.idents[id].name)
    }))
}
