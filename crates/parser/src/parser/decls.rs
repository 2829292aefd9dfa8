//! Import, value, type and function declarations.

use smallvec::SmallVec;

use super::Parser;
use crate::ast::{
    Decl, DeclId, FuncDecl, GenDecl, GenKind, ImportSpec, Spec, SpecId, TypeSpec,
    ValueSpec,
};
use crate::error::Result;
use crate::lexer::Tok;
use crate::scope::{DeclRef, ObjKind};

impl<'src, T> Parser<'src, T>
where
    T: Iterator<Item = (usize, Tok<'src>, usize)>,
{
    pub(super) fn parse_top_level_decl(&mut self) -> Result<DeclId> {
        match self.tok {
            Tok::KwVar | Tok::KwConst | Tok::KwType => self.parse_gen_decl(),
            Tok::KwFunc => self.parse_func_decl(),
            Tok::KwImport => Err(self.unsupported("import after other declarations", "parse_file")),
            _ => Err(self.expected("declaration", "parse_file")),
        }
    }

    /// `import "path"` or `import ( "a"; "b" )`. Paths are recorded on the
    /// file; nothing is declared.
    pub(super) fn parse_import_decl(&mut self) -> Result<()> {
        const RULE: &str = "parse_import_decl";
        self.expect(Tok::KwImport, RULE)?;
        if self.tok == Tok::LParen {
            self.next()?;
            while self.tok != Tok::RParen && self.tok != Tok::Eof {
                let spec = self.parse_import_spec()?;
                self.imports.push(spec);
                self.expect_semi(RULE)?;
            }
            self.expect(Tok::RParen, RULE)?;
        } else {
            let spec = self.parse_import_spec()?;
            self.imports.push(spec);
        }
        self.expect_semi(RULE)
    }

    fn parse_import_spec(&mut self) -> Result<SpecId> {
        const RULE: &str = "parse_import_spec";
        let start = self.span.start;
        if !matches!(self.tok, Tok::StringLit(_) | Tok::RawStringLit(_)) {
            return Err(self.expected("import path", RULE));
        }
        let path = self.parse_basic_lit(RULE)?;
        let spec = self
            .ast
            .specs
            .alloc(Spec::Import(ImportSpec { path }), self.span_from(start));
        Ok(spec)
    }

    pub(super) fn parse_gen_decl(&mut self) -> Result<DeclId> {
        const RULE: &str = "parse_gen_decl";
        let start = self.span.start;
        let kind = match self.tok {
            Tok::KwVar => GenKind::Var,
            Tok::KwConst => GenKind::Const,
            Tok::KwType => GenKind::Type,
            _ => return Err(self.expected("var, const or type", RULE)),
        };
        self.next()?;

        let mut specs: SmallVec<[SpecId; 4]> = SmallVec::new();
        let grouped = self.tok == Tok::LParen;
        if grouped {
            self.next()?;
            while self.tok != Tok::RParen && self.tok != Tok::Eof {
                specs.push(self.parse_spec(kind)?);
            }
            self.expect(Tok::RParen, RULE)?;
            self.expect_semi(RULE)?;
        } else {
            specs.push(self.parse_spec(kind)?);
        }

        let specs = self.ast.list_specs(specs);
        Ok(self.ast.decls.alloc(
            Decl::Gen(GenDecl {
                kind,
                specs,
                grouped,
            }),
            self.span_from(start),
        ))
    }

    fn parse_spec(&mut self, kind: GenKind) -> Result<SpecId> {
        match kind {
            GenKind::Type => self.parse_type_spec(),
            GenKind::Var | GenKind::Const => self.parse_value_spec(kind),
        }
    }

    /// One name, optional type, optional initializer. The name is declared
    /// after the initializer, so `var x = x` refers to an outer `x`.
    fn parse_value_spec(&mut self, kind: GenKind) -> Result<SpecId> {
        const RULE: &str = "parse_value_spec";
        let start = self.span.start;
        let name = self.parse_ident(RULE)?;
        if self.tok == Tok::Comma {
            return Err(self.unsupported("several names in one value declaration", RULE));
        }
        let typ = self.try_type()?;
        let value = if self.tok == Tok::Assign {
            self.next()?;
            Some(self.parse_rhs()?)
        } else {
            None
        };
        if self.tok == Tok::Comma {
            return Err(self.unsupported("several values in one value declaration", RULE));
        }
        // A const spec may repeat the previous one implicitly; a var may not.
        if kind == GenKind::Var && typ.is_none() && value.is_none() {
            return Err(self.expected("type or =", RULE));
        }
        self.expect_semi(RULE)?;

        let spec = self.ast.specs.alloc(
            Spec::Value(ValueSpec { name, typ, value }),
            self.span_from(start),
        );
        let obj_kind = if kind == GenKind::Const {
            ObjKind::Const
        } else {
            ObjKind::Var
        };
        self.declare(DeclRef::Spec(spec), self.top_scope, obj_kind, name)?;
        Ok(spec)
    }

    /// The name is declared before its type is parsed so that the type can
    /// refer to itself.
    fn parse_type_spec(&mut self) -> Result<SpecId> {
        const RULE: &str = "parse_type_spec";
        let start = self.span.start;
        let name = self.parse_ident(RULE)?;

        let reserved = self.ast.specs.next_id();
        self.declare(DeclRef::Spec(reserved), self.top_scope, ObjKind::Type, name)?;

        let alias = self.tok == Tok::Assign;
        if alias {
            self.next()?;
        }
        let typ = self.parse_type(RULE)?;
        self.expect_semi(RULE)?;

        let spec = self.ast.specs.alloc(
            Spec::Type(TypeSpec { name, alias, typ }),
            self.span_from(start),
        );
        if spec != reserved {
            return Err(Self::internal(
                format!("type spec allocated as {spec:?}, declared as {reserved:?}"),
                RULE,
            ));
        }
        Ok(spec)
    }

    /// Receiver, parameters, results and body share one scope whose outer
    /// is the package scope. Plain functions are declared after their body;
    /// methods are not declared at all.
    fn parse_func_decl(&mut self) -> Result<DeclId> {
        const RULE: &str = "parse_func_decl";
        let start = self.span.start;
        self.expect(Tok::KwFunc, RULE)?;

        let scope = self.ast.scopes.new_scope(self.top_scope);
        let recv = if self.tok == Tok::LParen {
            Some(self.parse_parameters(scope, false)?)
        } else {
            None
        };
        let name = self.parse_ident(RULE)?;
        let typ = self.parse_signature(scope)?;
        let body = if self.tok == Tok::LBrace {
            Some(self.parse_body(scope)?)
        } else {
            None
        };
        self.expect_semi(RULE)?;

        let decl = self.ast.decls.alloc(
            Decl::Func(FuncDecl {
                recv,
                name,
                typ,
                body,
                scope,
            }),
            self.span_from(start),
        );
        if recv.is_none() {
            self.declare(DeclRef::Func(decl), self.pkg_scope, ObjKind::Func, name)?;
        }
        Ok(decl)
    }
}
