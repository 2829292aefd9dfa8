//! Lexical scopes and the objects they bind.

use std::collections::HashMap;
use std::ops::Index;

use crate::ast::{DeclId, FieldId, ObjectId, ScopeId, SpecId, StmtId, Symbol};
use crate::error::{ParseError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjKind {
    Const,
    Type,
    Var,
    Func,
    Package,
}

/// The node that introduced an object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclRef {
    /// Value or type spec.
    Spec(SpecId),
    Func(DeclId),
    /// Parameter, result, receiver or struct field.
    Field(FieldId),
    /// Short variable declaration, range headers included.
    Assign(StmtId),
    /// Defined outside the file (builtins, imported packages).
    Predeclared,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Object {
    pub kind: ObjKind,
    pub name: Symbol,
    pub decl: DeclRef,
    /// Free slot for later stages; `-1` conventionally marks a global.
    pub data: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Scope {
    pub outer: Option<ScopeId>,
    bindings: HashMap<Symbol, ObjectId>,
}

impl Scope {
    pub fn new(outer: Option<ScopeId>) -> Self {
        Self {
            outer,
            bindings: HashMap::new(),
        }
    }

    pub fn get(&self, name: Symbol) -> Option<ObjectId> {
        self.bindings.get(&name).copied()
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Symbol, ObjectId)> + '_ {
        self.bindings.iter().map(|(&k, &v)| (k, v))
    }
}

/// Arena of every scope opened while parsing a file. Closed scopes stay
/// allocated; closing only moves the parser's cursor to the outer scope.
#[derive(Debug, Default)]
pub struct Scopes {
    data: Vec<Scope>,
}

impl Scopes {
    pub fn new_scope(&mut self, outer: Option<ScopeId>) -> ScopeId {
        let id = ScopeId::from_raw(self.data.len() as u32);
        self.data.push(Scope::new(outer));
        id
    }

    /// Binds `name` in `scope`, replacing any earlier binding of the same name.
    pub fn insert(&mut self, scope: Option<ScopeId>, name: Symbol, obj: ObjectId) -> Result<()> {
        let scope = scope.ok_or_else(|| ParseError::Internal {
            rule: "insert",
            what: "no scope to declare into".into(),
        })?;
        let slot = self
            .data
            .get_mut(scope.to_usize())
            .ok_or_else(|| ParseError::Internal {
                rule: "insert",
                what: format!("scope handle {scope:?} out of range"),
            })?;
        slot.bindings.insert(name, obj);
        Ok(())
    }

    /// Single-level lookup.
    pub fn lookup(&self, scope: ScopeId, name: Symbol) -> Option<ObjectId> {
        self.data.get(scope.to_usize())?.get(name)
    }

    /// Walks the chain outward from `scope`; first match wins.
    pub fn lookup_chain(&self, mut scope: Option<ScopeId>, name: Symbol) -> Option<ObjectId> {
        while let Some(s) = scope {
            let cur = self.data.get(s.to_usize())?;
            if let Some(obj) = cur.get(name) {
                return Some(obj);
            }
            scope = cur.outer;
        }
        None
    }

    pub fn outer(&self, scope: ScopeId) -> Option<ScopeId> {
        self.data.get(scope.to_usize())?.outer
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl Index<ScopeId> for Scopes {
    type Output = Scope;
    fn index(&self, id: ScopeId) -> &Scope {
        &self.data[id.to_usize()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn obj(n: u32) -> ObjectId {
        ObjectId::from_raw(n)
    }

    #[test]
    fn insert_overwrites_and_lookup_is_single_level() {
        let mut scopes = Scopes::default();
        let outer = scopes.new_scope(None);
        let inner = scopes.new_scope(Some(outer));
        let x = Symbol::from_raw(7);

        scopes.insert(Some(outer), x, obj(1)).unwrap();
        assert_eq!(scopes.lookup(outer, x), Some(obj(1)));
        assert_eq!(scopes.lookup(inner, x), None);
        assert_eq!(scopes.lookup_chain(Some(inner), x), Some(obj(1)));

        scopes.insert(Some(outer), x, obj(2)).unwrap();
        assert_eq!(scopes.lookup(outer, x), Some(obj(2)));
        assert_eq!(scopes[outer].len(), 1);
    }

    #[test]
    fn innermost_binding_wins() {
        let mut scopes = Scopes::default();
        let pkg = scopes.new_scope(None);
        let block = scopes.new_scope(Some(pkg));
        let x = Symbol::from_raw(3);
        scopes.insert(Some(pkg), x, obj(1)).unwrap();
        scopes.insert(Some(block), x, obj(2)).unwrap();
        assert_eq!(scopes.lookup_chain(Some(block), x), Some(obj(2)));
        assert_eq!(scopes.lookup_chain(Some(pkg), x), Some(obj(1)));
        assert_eq!(scopes.outer(block), Some(pkg));
    }

    #[test]
    fn insert_without_scope_is_internal_error() {
        let mut scopes = Scopes::default();
        let err = scopes.insert(None, Symbol::from_raw(1), obj(0)).unwrap_err();
        assert!(matches!(err, ParseError::Internal { rule: "insert", .. }));
    }
}
