//! Text dumps of a parsed file for the `minigo` driver.

use std::fmt::Write as _;

use minigo_parser::ast::*;
use minigo_parser::line_col;
use minigo_parser::scope::DeclRef;
use minigo_parser::walk::{Visitor, Walk};

/// Indented outline: one node per line, identifiers with their binding.
pub fn tree(file: &File, src: &str) -> String {
    let mut d = TreeDump {
        src,
        out: String::new(),
        depth: 0,
    };
    let _ = writeln!(d.out, "File {}", file.package_name());
    d.depth = 1;
    d.visit_file(file);
    d.out
}

struct TreeDump<'s> {
    src: &'s str,
    out: String,
    depth: usize,
}

impl TreeDump<'_> {
    fn node(&mut self, label: &str, span: Span) {
        let (line, col) = line_col(self.src, span.start);
        let _ = writeln!(
            self.out,
            "{:indent$}{label} @{line}:{col}",
            "",
            indent = self.depth * 2
        );
    }

    fn nested(&mut self, f: impl FnOnce(&mut Self)) {
        self.depth += 1;
        f(self);
        self.depth -= 1;
    }
}

fn head<T: std::fmt::Debug>(node: &T) -> String {
    let s = format!("{node:?}");
    s.split(|c: char| !c.is_alphanumeric())
        .next()
        .unwrap_or_default()
        .to_owned()
}

impl<'ast> Visitor<'ast> for TreeDump<'_> {
    fn visit_decl(&mut self, a: &'ast Ast, id: DeclId) {
        let label = match a.decls[id] {
            Decl::Gen(g) => format!("GenDecl {}", g.kind.keyword()),
            Decl::Func(f) if f.recv.is_some() => format!("Method {}", a.ident_name(f.name)),
            Decl::Func(f) => format!("Func {}", a.ident_name(f.name)),
        };
        self.node(&label, a.decls.span(id));
        self.nested(|d| a.decls[id].walk(a, d));
    }

    fn visit_spec(&mut self, a: &'ast Ast, id: SpecId) {
        self.node(&format!("{}Spec", head(&a.specs[id])), a.specs.span(id));
        self.nested(|d| a.specs[id].walk(a, d));
    }

    fn visit_stmt(&mut self, a: &'ast Ast, id: StmtId) {
        self.node(&head(&a.stmts[id]), a.stmts.span(id));
        self.nested(|d| a.stmts[id].walk(a, d));
    }

    fn visit_clause(&mut self, a: &'ast Ast, id: ClauseId) {
        let label = if a.clauses[id].is_default {
            "Default"
        } else {
            "Case"
        };
        self.node(label, a.clauses.span(id));
        self.nested(|d| a.clauses[id].walk(a, d));
    }

    fn visit_expr(&mut self, a: &'ast Ast, id: ExprId) {
        let label = match a.exprs[id] {
            // Identifiers print on their own line below.
            Expr::Ident(ident) => return self.visit_ident(a, ident),
            Expr::BasicLit(lit) => format!("BasicLit {}", a.str(lit.value)),
            Expr::Unary { op, .. } => format!("Unary {}", op.as_str()),
            Expr::Binary { op, .. } => format!("Binary {}", op.as_str()),
            Expr::Type(t) => format!("{}Type", head(&t)),
            e => head(&e),
        };
        self.node(&label, a.exprs.span(id));
        self.nested(|d| a.exprs[id].walk(a, d));
    }

    fn visit_field(&mut self, a: &'ast Ast, id: FieldId) {
        self.node("Field", a.fields.span(id));
        self.nested(|d| a.fields[id].walk(a, d));
    }

    fn visit_ident(&mut self, a: &'ast Ast, id: IdentId) {
        let ident = a.idents[id];
        let label = match ident.obj {
            Some(obj) => format!(
                "Ident {} -> {:?} {:?}",
                a.str(ident.name),
                a.objects[obj].kind,
                obj
            ),
            None => format!("Ident {}", a.str(ident.name)),
        };
        self.node(&label, a.idents.span(id));
    }
}

/// `line:col name -> Kind (declared at line:col)` for every bound identifier.
pub fn bindings(file: &File, src: &str) -> String {
    let mut out = String::new();
    for (id, ident) in file.ast.idents.iter() {
        let Some(obj) = ident.obj else {
            continue;
        };
        let (line, col) = line_col(src, file.ast.idents.span(id).start);
        let object = &file.ast.objects[obj];
        let where_ = if object.decl == DeclRef::Predeclared {
            "predeclared".to_owned()
        } else {
            let (dl, dc) = line_col(src, file.ast.objects.span(obj).start);
            format!("declared at {dl}:{dc}")
        };
        let _ = writeln!(
            out,
            "{line}:{col} {} -> {:?} ({where_})",
            file.ast.str(ident.name),
            object.kind
        );
    }
    out
}

pub fn unresolved(file: &File, src: &str) -> String {
    let mut out = String::new();
    for &id in &file.unresolved {
        let (line, col) = line_col(src, file.ast.idents.span(id).start);
        let _ = writeln!(out, "{line}:{col} {}", file.ast.ident_name(id));
    }
    for key in &file.pending_keys {
        let (line, col) = line_col(src, file.ast.idents.span(key.key).start);
        let _ = writeln!(out, "{line}:{col} {} (literal key)", file.ast.ident_name(key.key));
    }
    out
}
