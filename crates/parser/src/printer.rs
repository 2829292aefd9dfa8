//! Re-derives source text from a parsed [`File`].
//!
//! Output is gofmt-flavoured (tabs, one statement per line) and parses back
//! to a tree of the same shape: parentheses only appear where the tree has a
//! `Paren` node.

use std::fmt::Write as _;

use crate::ast::*;

pub fn print_file(file: &File) -> String {
    let mut p = Printer {
        ast: &file.ast,
        out: String::with_capacity(4096),
        indent: 0,
    };
    p.file(file);
    p.out
}

struct Printer<'a> {
    ast: &'a Ast,
    out: String,
    indent: usize,
}

impl<'a> Printer<'a> {
    fn line(&mut self) {
        self.out.push('\n');
        for _ in 0..self.indent {
            self.out.push('\t');
        }
    }

    fn word(&mut self, s: &str) {
        self.out.push_str(s);
    }

    fn ident(&mut self, id: IdentId) {
        let name = self.ast.ident_name(id);
        self.out.push_str(name);
    }

    fn file(&mut self, file: &File) {
        self.word("package ");
        self.ident(file.name);
        self.out.push('\n');

        let imports = file.imports();
        if !imports.is_empty() {
            self.out.push('\n');
            for &spec in imports {
                self.word("import ");
                self.spec(spec);
                self.out.push('\n');
            }
        }

        for &decl in file.decls() {
            self.out.push('\n');
            self.decl(decl);
            self.out.push('\n');
        }
    }

    // -------------------------------------------------------------------------
    // Declarations
    // -------------------------------------------------------------------------

    fn decl(&mut self, id: DeclId) {
        match self.ast.decls[id] {
            Decl::Gen(g) => self.gen_decl(g),
            Decl::Func(f) => self.func_decl(f),
        }
    }

    fn gen_decl(&mut self, g: GenDecl) {
        self.word(g.kind.keyword());
        self.word(" ");
        let specs = self.ast.specs_list(g.specs);
        if !g.grouped {
            if let Some(&spec) = specs.first() {
                self.spec(spec);
            }
            return;
        }
        self.word("(");
        self.indent += 1;
        for &spec in specs {
            self.line();
            self.spec(spec);
        }
        self.indent -= 1;
        self.line();
        self.word(")");
    }

    fn spec(&mut self, id: SpecId) {
        match self.ast.specs[id] {
            Spec::Import(i) => self.word(self.ast.str(i.path.value)),
            Spec::Value(v) => {
                self.ident(v.name);
                if let Some(t) = v.typ {
                    self.word(" ");
                    self.expr(t);
                }
                if let Some(x) = v.value {
                    self.word(" = ");
                    self.expr(x);
                }
            }
            Spec::Type(t) => {
                self.ident(t.name);
                self.word(if t.alias { " = " } else { " " });
                self.expr(t.typ);
            }
        }
    }

    fn func_decl(&mut self, f: FuncDecl) {
        self.word("func ");
        if let Some(recv) = f.recv {
            self.fields(recv, ", ");
            self.word(" ");
        }
        self.ident(f.name);
        self.signature(f.typ);
        if let Some(body) = f.body {
            self.word(" ");
            self.block(body);
        }
    }

    fn signature(&mut self, sig: FuncType) {
        self.fields(sig.params, ", ");
        let Some(results) = sig.results else {
            return;
        };
        self.word(" ");
        let list = self.ast.fields_list(results);
        match list {
            [single] if self.ast.fields[*single].names.is_empty() => {
                self.expr(self.ast.fields[*single].typ);
            }
            _ => self.fields(results, ", "),
        }
    }

    /// `(a T, b U)`
    fn fields(&mut self, list: ListRef<FieldId>, sep: &str) {
        self.word("(");
        self.field_list(list, sep);
        self.word(")");
    }

    fn field_list(&mut self, list: ListRef<FieldId>, sep: &str) {
        for (i, &f) in self.ast.fields_list(list).iter().enumerate() {
            if i > 0 {
                self.word(sep);
            }
            let field = self.ast.fields[f];
            for (j, &name) in self.ast.idents_list(field.names).iter().enumerate() {
                if j > 0 {
                    self.word(", ");
                }
                self.ident(name);
            }
            if !field.names.is_empty() {
                self.word(" ");
            }
            self.expr(field.typ);
        }
    }

    // -------------------------------------------------------------------------
    // Statements
    // -------------------------------------------------------------------------

    fn block(&mut self, b: Block) {
        self.word("{");
        self.stmt_lines(b.stmts);
        self.line();
        self.word("}");
    }

    fn stmt_lines(&mut self, stmts: ListRef<StmtId>) {
        self.indent += 1;
        for &s in self.ast.stmts_list(stmts) {
            self.line();
            self.stmt(s);
        }
        self.indent -= 1;
    }

    fn stmt(&mut self, id: StmtId) {
        match self.ast.stmts[id] {
            Stmt::Expr(x) => self.expr(x),
            Stmt::Decl(d) => self.decl(d),
            Stmt::IncDec { x, op } => {
                self.expr(x);
                self.word(match op {
                    IncDecOp::Inc => "++",
                    IncDecOp::Dec => "--",
                });
            }
            Stmt::Assign { lhs, op, rhs, .. } => {
                self.expr_list(lhs);
                self.word(" ");
                self.word(op.as_str());
                self.word(" ");
                self.expr_list(rhs);
            }
            Stmt::Return { results } => {
                self.word("return");
                if !results.is_empty() {
                    self.word(" ");
                    self.expr_list(results);
                }
            }
            Stmt::Branch(BranchKind::Break) => self.word("break"),
            Stmt::Branch(BranchKind::Continue) => self.word("continue"),
            Stmt::Block(b) => self.block(b),
            Stmt::If {
                init,
                cond,
                body,
                else_,
            } => {
                self.word("if ");
                if let Some(init) = init {
                    self.stmt(init);
                    self.word("; ");
                }
                self.expr(cond);
                self.word(" ");
                self.block(body);
                if let Some(e) = else_ {
                    self.word(" else ");
                    self.stmt(e);
                }
            }
            Stmt::Switch { init, tag, clauses } => {
                self.word("switch ");
                if let Some(init) = init {
                    self.stmt(init);
                    self.word("; ");
                }
                if let Some(tag) = tag {
                    self.expr(tag);
                    self.word(" ");
                }
                self.clauses(clauses);
            }
            Stmt::TypeSwitch {
                init,
                assign,
                clauses,
            } => {
                self.word("switch ");
                if let Some(init) = init {
                    self.stmt(init);
                    self.word("; ");
                }
                self.stmt(assign);
                self.word(" ");
                self.clauses(clauses);
            }
            Stmt::For {
                init,
                cond,
                post,
                body,
            } => {
                self.word("for ");
                if init.is_some() || post.is_some() {
                    if let Some(init) = init {
                        self.stmt(init);
                    }
                    self.word("; ");
                    if let Some(cond) = cond {
                        self.expr(cond);
                    }
                    self.word("; ");
                    if let Some(post) = post {
                        self.stmt(post);
                        self.word(" ");
                    }
                } else if let Some(cond) = cond {
                    self.expr(cond);
                    self.word(" ");
                }
                self.block(body);
            }
            Stmt::Range {
                key,
                value,
                op,
                x,
                body,
                ..
            } => {
                self.word("for ");
                if let Some(key) = key {
                    self.expr(key);
                    if let Some(value) = value {
                        self.word(", ");
                        self.expr(value);
                    }
                    self.word(" ");
                    self.word(op.map_or(":=", AssignOp::as_str));
                    self.word(" ");
                }
                self.word("range ");
                self.expr(x);
                self.word(" ");
                self.block(body);
            }
            Stmt::Go { call } => {
                self.word("go ");
                self.expr(call);
            }
            Stmt::Empty => self.word(";"),
        }
    }

    fn clauses(&mut self, clauses: ListRef<ClauseId>) {
        self.word("{");
        for &c in self.ast.clauses_list(clauses) {
            let clause = self.ast.clauses[c];
            self.line();
            if clause.is_default {
                self.word("default:");
            } else {
                self.word("case ");
                self.expr_list(clause.list);
                self.word(":");
            }
            self.stmt_lines(clause.body);
        }
        self.line();
        self.word("}");
    }

    // -------------------------------------------------------------------------
    // Expressions
    // -------------------------------------------------------------------------

    fn expr_list(&mut self, list: ListRef<ExprId>) {
        for (i, &x) in self.ast.exprs_list(list).iter().enumerate() {
            if i > 0 {
                self.word(", ");
            }
            self.expr(x);
        }
    }

    fn expr(&mut self, id: ExprId) {
        match self.ast.exprs[id] {
            Expr::Ident(i) => self.ident(i),
            Expr::BasicLit(lit) => self.word(self.ast.str(lit.value)),
            Expr::CompositeLit { typ, elts } => {
                self.expr(typ);
                self.word("{");
                self.expr_list(elts);
                self.word("}");
            }
            Expr::KeyValue { key, value } => {
                self.expr(key);
                self.word(": ");
                self.expr(value);
            }
            Expr::Paren { x } => {
                self.word("(");
                self.expr(x);
                self.word(")");
            }
            Expr::Selector { x, sel } => {
                self.expr(x);
                self.word(".");
                self.ident(sel);
            }
            Expr::Index { x, index } => {
                self.expr(x);
                self.word("[");
                self.expr(index);
                self.word("]");
            }
            Expr::Slice {
                x,
                low,
                high,
                max,
                slice3,
            } => {
                self.expr(x);
                self.word("[");
                if let Some(low) = low {
                    self.expr(low);
                }
                self.word(":");
                if let Some(high) = high {
                    self.expr(high);
                }
                if slice3 {
                    self.word(":");
                    if let Some(max) = max {
                        self.expr(max);
                    }
                }
                self.word("]");
            }
            Expr::TypeAssert { x, typ } => {
                self.expr(x);
                self.word(".(");
                match typ {
                    Some(t) => self.expr(t),
                    None => self.word("type"),
                }
                self.word(")");
            }
            Expr::Call {
                fun,
                args,
                ellipsis,
            } => {
                self.expr(fun);
                self.word("(");
                self.expr_list(args);
                if ellipsis.is_some() {
                    self.word("...");
                }
                self.word(")");
            }
            Expr::Star { x } => {
                self.word("*");
                self.expr(x);
            }
            Expr::Unary { op, x } => {
                self.word(op.as_str());
                // Keeps `- -x` and `range x` from fusing.
                if op == UnaryOp::Range || matches!(self.ast.exprs[x], Expr::Unary { .. }) {
                    self.word(" ");
                }
                self.expr(x);
            }
            Expr::Binary { x, op, y } => {
                self.expr(x);
                let _ = write!(self.out, " {} ", op.as_str());
                self.expr(y);
            }
            Expr::Type(t) => self.type_expr(t),
        }
    }

    fn type_expr(&mut self, t: TypeExpr) {
        match t {
            TypeExpr::Array { len, elt } => {
                self.word("[");
                if let Some(len) = len {
                    self.expr(len);
                }
                self.word("]");
                self.expr(elt);
            }
            TypeExpr::Struct { fields, .. } => {
                self.word("struct {");
                if !fields.is_empty() {
                    self.word(" ");
                    self.field_list(fields, "; ");
                    self.word(" ");
                }
                self.word("}");
            }
            TypeExpr::Map { key, value } => {
                self.word("map[");
                self.expr(key);
                self.word("]");
                self.expr(value);
            }
            TypeExpr::Interface { methods } => {
                self.word("interface {");
                for (i, &m) in self.ast.fields_list(methods).iter().enumerate() {
                    self.word(if i == 0 { " " } else { "; " });
                    let field = self.ast.fields[m];
                    if let Some(&name) = self.ast.idents_list(field.names).first() {
                        self.ident(name);
                    }
                    if let Expr::Type(TypeExpr::Func(sig)) = self.ast.exprs[field.typ] {
                        self.signature(sig);
                    }
                }
                if !methods.is_empty() {
                    self.word(" ");
                }
                self.word("}");
            }
            TypeExpr::Func(sig) => {
                self.word("func");
                self.signature(sig);
            }
            TypeExpr::Ellipsis { elt } => {
                self.word("...");
                self.expr(elt);
            }
        }
    }
}
