use crate::ast::*;

// Core traits
pub trait Walk<'ast> {
    fn walk<V: Visitor<'ast> + ?Sized>(&self, a: &'ast Ast, v: &mut V);
}

/// Default methods descend into children; override to observe a node kind
/// and call the default body (or `walk`) to keep descending.
pub trait Visitor<'ast> {
    #[inline(always)]
    fn visit_file(&mut self, f: &'ast File) {
        f.imports.walk(&f.ast, self);
        f.decls.walk(&f.ast, self);
    }

    #[inline(always)]
    fn visit_decl(&mut self, a: &'ast Ast, id: DeclId) {
        a.decls[id].walk(a, self);
    }

    #[inline(always)]
    fn visit_spec(&mut self, a: &'ast Ast, id: SpecId) {
        a.specs[id].walk(a, self);
    }

    #[inline(always)]
    fn visit_stmt(&mut self, a: &'ast Ast, id: StmtId) {
        a.stmts[id].walk(a, self);
    }

    #[inline(always)]
    fn visit_clause(&mut self, a: &'ast Ast, id: ClauseId) {
        a.clauses[id].walk(a, self);
    }

    #[inline(always)]
    fn visit_expr(&mut self, a: &'ast Ast, id: ExprId) {
        a.exprs[id].walk(a, self);
    }

    #[inline(always)]
    fn visit_field(&mut self, a: &'ast Ast, id: FieldId) {
        a.fields[id].walk(a, self);
    }

    /// Leaf: identifiers have no children.
    #[inline(always)]
    fn visit_ident(&mut self, _a: &'ast Ast, _id: IdentId) {}
}

macro_rules! impl_walk_for_ids {
    ($($id:ty => $visit:ident),* $(,)?) => {
        $(
            impl<'ast> Walk<'ast> for $id {
                #[inline(always)]
                fn walk<V: Visitor<'ast> + ?Sized>(&self, a: &'ast Ast, v: &mut V) {
                    v.$visit(a, *self);
                }
            }
        )*
    };
}

impl_walk_for_ids! {
    DeclId => visit_decl,
    SpecId => visit_spec,
    StmtId => visit_stmt,
    ClauseId => visit_clause,
    ExprId => visit_expr,
    FieldId => visit_field,
    IdentId => visit_ident,
}

pub trait ListSlice<T> {
    fn slice(&self, r: ListRef<T>) -> &[T];
}

impl<'ast, T> Walk<'ast> for ListRef<T>
where
    Ast: ListSlice<T>,
    T: Walk<'ast>,
{
    #[inline(always)]
    fn walk<V: Visitor<'ast> + ?Sized>(&self, a: &'ast Ast, v: &mut V) {
        for item in a.slice(*self) {
            item.walk(a, v);
        }
    }
}

macro_rules! impl_list_slice {
    ($($t:ty => $getter:ident),* $(,)?) => {
        $(
            impl ListSlice<$t> for Ast {
                #[inline(always)]
                fn slice(&self, r: ListRef<$t>) -> &[$t] {
                    self.$getter(r)
                }
            }
        )*
    };
}

impl_list_slice! {
    IdentId => idents_list,
    ExprId => exprs_list,
    StmtId => stmts_list,
    DeclId => decls_list,
    SpecId => specs_list,
    FieldId => fields_list,
    ClauseId => clauses_list,
}

impl<'ast, T: Walk<'ast>> Walk<'ast> for Option<T> {
    #[inline(always)]
    fn walk<V: Visitor<'ast> + ?Sized>(&self, a: &'ast Ast, v: &mut V) {
        if let Some(x) = self {
            x.walk(a, v);
        }
    }
}

// Leaves
macro_rules! impl_walk_noop {
    ($($ty:ty),* $(,)?) => {
        $(
            impl<'ast> Walk<'ast> for $ty {
                #[inline(always)]
                fn walk<V: Visitor<'ast> + ?Sized>(&self, _: &'ast Ast, _: &mut V) {}
            }
        )*
    };
}

impl_walk_noop! {
    Span,
    Symbol,
    ScopeId,
    BasicLit,
    bool,
    GenKind,
    BranchKind,
    UnaryOp,
    BinaryOp,
    AssignOp,
    IncDecOp,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse_file;

    #[derive(Default)]
    struct Counter {
        idents: usize,
        calls: usize,
        clauses: usize,
    }

    impl<'ast> Visitor<'ast> for Counter {
        fn visit_expr(&mut self, a: &'ast Ast, id: ExprId) {
            if matches!(a.exprs[id], Expr::Call { .. }) {
                self.calls += 1;
            }
            a.exprs[id].walk(a, self);
        }

        fn visit_clause(&mut self, a: &'ast Ast, id: ClauseId) {
            self.clauses += 1;
            a.clauses[id].walk(a, self);
        }

        fn visit_ident(&mut self, _a: &'ast Ast, _id: IdentId) {
            self.idents += 1;
        }
    }

    #[test]
    fn visitor_reaches_nested_nodes() {
        let src = "package p\n\
                   func f(a int) int {\n\
                   \tswitch a {\n\
                   \tcase 1:\n\
                   \t\treturn g(a)\n\
                   \tdefault:\n\
                   \t}\n\
                   \treturn 0\n\
                   }\n\
                   func g(b int) int { return b }\n";
        let file = parse_file("walk.go", src).unwrap();
        let mut c = Counter::default();
        c.visit_file(&file);
        assert_eq!(c.calls, 1);
        assert_eq!(c.clauses, 2);
        // f a int int, a, g a, g b int int b
        assert_eq!(c.idents, 12);
    }
}
