//! Type expressions, field lists and signatures.

use smallvec::SmallVec;

use super::Parser;
use crate::ast::{Expr, ExprId, Field, FieldId, FuncType, IdentId, ListRef, ScopeId, TypeExpr};
use crate::error::Result;
use crate::lexer::Tok;
use crate::scope::{DeclRef, ObjKind};

impl<'src, T> Parser<'src, T>
where
    T: Iterator<Item = (usize, Tok<'src>, usize)>,
{
    /// A type is required here; its name (if it is one) gets bound.
    pub(super) fn parse_type(&mut self, rule: &'static str) -> Result<ExprId> {
        self.try_type()?.ok_or_else(|| self.expected("type", rule))
    }

    pub(super) fn try_type(&mut self) -> Result<Option<ExprId>> {
        let typ = self.try_ident_or_type()?;
        if let Some(t) = typ {
            self.resolve(t);
        }
        Ok(typ)
    }

    /// Parses a type if the current token can start one. Bare type names are
    /// returned unbound.
    pub(super) fn try_ident_or_type(&mut self) -> Result<Option<ExprId>> {
        const RULE: &str = "try_ident_or_type";
        self.nest(RULE)?;
        let start = self.span.start;
        let typ = match self.tok {
            Tok::Ident(_) => Some(self.parse_type_name()?),
            Tok::LBrack => Some(self.parse_array_type()?),
            Tok::KwStruct => Some(self.parse_struct_type()?),
            Tok::KwMap => Some(self.parse_map_type()?),
            Tok::Star => {
                self.next()?;
                let x = self.parse_type(RULE)?;
                Some(self.ast.exprs.alloc(Expr::Star { x }, self.span_from(start)))
            }
            Tok::KwInterface => Some(self.parse_interface_type()?),
            Tok::KwFunc => {
                self.next()?;
                let scope = self.ast.scopes.new_scope(self.top_scope);
                let sig = self.parse_signature(scope)?;
                Some(self.type_node(TypeExpr::Func(sig), start))
            }
            Tok::LParen => {
                self.next()?;
                let x = self.parse_type(RULE)?;
                self.expect(Tok::RParen, RULE)?;
                Some(self.ast.exprs.alloc(Expr::Paren { x }, self.span_from(start)))
            }
            Tok::KwChan => return Err(self.unsupported("channel type", RULE)),
            _ => None,
        };
        self.unnest();
        Ok(typ)
    }

    fn type_node(&mut self, typ: TypeExpr, start: u32) -> ExprId {
        self.ast.exprs.alloc(Expr::Type(typ), self.span_from(start))
    }

    /// `T` or `pkg.T`. The package name is bound; `T` is left to the caller.
    fn parse_type_name(&mut self) -> Result<ExprId> {
        const RULE: &str = "parse_type_name";
        let start = self.span.start;
        let x = self.parse_ident_expr(RULE)?;
        if self.tok != Tok::Dot {
            return Ok(x);
        }
        self.next()?;
        self.resolve(x);
        let sel = self.parse_ident(RULE)?;
        Ok(self
            .ast
            .exprs
            .alloc(Expr::Selector { x, sel }, self.span_from(start)))
    }

    fn parse_array_type(&mut self) -> Result<ExprId> {
        const RULE: &str = "parse_array_type";
        let start = self.span.start;
        self.expect(Tok::LBrack, RULE)?;
        let len = if self.tok != Tok::RBrack {
            self.expr_lev += 1;
            let len = self.parse_rhs()?;
            self.expr_lev -= 1;
            Some(len)
        } else {
            None
        };
        self.expect(Tok::RBrack, RULE)?;
        let elt = self.parse_type(RULE)?;
        Ok(self.type_node(TypeExpr::Array { len, elt }, start))
    }

    fn parse_map_type(&mut self) -> Result<ExprId> {
        const RULE: &str = "parse_map_type";
        let start = self.span.start;
        self.expect(Tok::KwMap, RULE)?;
        self.expect(Tok::LBrack, RULE)?;
        let key = self.parse_type(RULE)?;
        self.expect(Tok::RBrack, RULE)?;
        let value = self.parse_type(RULE)?;
        Ok(self.type_node(TypeExpr::Map { key, value }, start))
    }

    fn parse_struct_type(&mut self) -> Result<ExprId> {
        const RULE: &str = "parse_struct_type";
        let start = self.span.start;
        self.expect(Tok::KwStruct, RULE)?;
        self.expect(Tok::LBrace, RULE)?;

        // Field names live apart from the lexical chain.
        let scope = self.ast.scopes.new_scope(None);
        let mut fields: SmallVec<[FieldId; 8]> = SmallVec::new();
        loop {
            match self.tok {
                Tok::Ident(_) => fields.push(self.parse_field_decl(scope)?),
                Tok::Star => return Err(self.unsupported("embedded field", RULE)),
                _ => break,
            }
        }
        self.expect(Tok::RBrace, RULE)?;

        let fields = self.ast.list_fields(fields);
        Ok(self.type_node(TypeExpr::Struct { fields, scope }, start))
    }

    fn parse_field_decl(&mut self, scope: ScopeId) -> Result<FieldId> {
        const RULE: &str = "parse_field_decl";
        let start = self.span.start;
        let name = self.parse_ident(RULE)?;
        if self.tok == Tok::Comma {
            return Err(self.unsupported("several names in one field declaration", RULE));
        }
        let Some(typ) = self.try_type()? else {
            return Err(self.unsupported("embedded field", RULE));
        };
        self.expect_semi(RULE)?;

        let field = self.alloc_field(&[name], typ, start);
        self.declare(DeclRef::Field(field), Some(scope), ObjKind::Var, name)?;
        Ok(field)
    }

    fn parse_interface_type(&mut self) -> Result<ExprId> {
        const RULE: &str = "parse_interface_type";
        let start = self.span.start;
        self.expect(Tok::KwInterface, RULE)?;
        self.expect(Tok::LBrace, RULE)?;

        let mut methods: SmallVec<[FieldId; 4]> = SmallVec::new();
        while let Tok::Ident(_) = self.tok {
            let mstart = self.span.start;
            let name = self.parse_ident(RULE)?;
            if self.tok != Tok::LParen {
                return Err(self.unsupported("embedded interface", RULE));
            }
            let scope = self.ast.scopes.new_scope(self.top_scope);
            let sig = self.parse_signature(scope)?;
            let typ = self.type_node(TypeExpr::Func(sig), mstart);
            methods.push(self.alloc_field(&[name], typ, mstart));
            self.expect_semi(RULE)?;
        }
        self.expect(Tok::RBrace, RULE)?;

        let methods = self.ast.list_fields(methods);
        Ok(self.type_node(TypeExpr::Interface { methods }, start))
    }

    fn alloc_field(&mut self, names: &[IdentId], typ: ExprId, start: u32) -> FieldId {
        let names = self.ast.list_idents(names.iter().copied());
        self.ast
            .fields
            .alloc(Field { names, typ }, self.span_from(start))
    }

    fn try_var_type(&mut self, ellipsis_ok: bool) -> Result<Option<ExprId>> {
        const RULE: &str = "try_var_type";
        if !(ellipsis_ok && self.tok == Tok::Ellipsis) {
            return self.try_ident_or_type();
        }
        let start = self.span.start;
        self.next()?;
        let elt = self.parse_type(RULE)?;
        Ok(Some(self.type_node(TypeExpr::Ellipsis { elt }, start)))
    }

    fn parse_var_type(&mut self, ellipsis_ok: bool, rule: &'static str) -> Result<ExprId> {
        self.try_var_type(ellipsis_ok)?
            .ok_or_else(|| self.expected("type", rule))
    }

    fn is_variadic(&self, typ: ExprId) -> bool {
        matches!(self.ast.exprs[typ], Expr::Type(TypeExpr::Ellipsis { .. }))
    }

    /// A named parameter becomes a field and a `Var` in the function scope.
    fn declare_param(&mut self, name: IdentId, typ: ExprId, scope: ScopeId) -> Result<FieldId> {
        let start = self.ast.idents.span(name).start;
        let field = self.alloc_field(&[name], typ, start);
        self.declare(DeclRef::Field(field), Some(scope), ObjKind::Var, name)?;
        self.resolve(typ);
        Ok(field)
    }

    /// Either every parameter is named (`a T, b U`) or none is (`T, U`).
    fn parse_parameter_list(
        &mut self,
        scope: ScopeId,
        ellipsis_ok: bool,
    ) -> Result<SmallVec<[FieldId; 4]>> {
        const RULE: &str = "parse_parameter_list";
        let mut list: SmallVec<[ExprId; 4]> = SmallVec::new();
        let mut variadic = false;
        loop {
            if variadic {
                return Err(self.expected(")", RULE));
            }
            let typ = self.parse_var_type(ellipsis_ok, RULE)?;
            variadic = self.is_variadic(typ);
            list.push(typ);
            if self.tok != Tok::Comma {
                break;
            }
            self.next()?;
            if self.tok == Tok::RParen {
                break;
            }
        }

        let mut params = SmallVec::new();
        if let Some(typ) = self.try_var_type(ellipsis_ok)? {
            if list.len() > 1 {
                let span = self.ast.exprs.span(list[0]);
                return Err(self.unsupported_at("identifier list sharing one parameter type", span, RULE));
            }
            let name = self.name_of(list[0], "parameter name must be an identifier", RULE)?;
            let mut variadic = self.is_variadic(typ);
            params.push(self.declare_param(name, typ, scope)?);

            if self.tok == Tok::Comma {
                self.next()?;
                while self.tok != Tok::RParen && self.tok != Tok::Eof {
                    if variadic {
                        return Err(self.expected(")", RULE));
                    }
                    let name = self.parse_ident(RULE)?;
                    let typ = self.parse_var_type(ellipsis_ok, RULE)?;
                    variadic = self.is_variadic(typ);
                    params.push(self.declare_param(name, typ, scope)?);
                    if self.tok != Tok::Comma {
                        break;
                    }
                    self.next()?;
                }
            }
            return Ok(params);
        }

        for typ in list {
            self.resolve(typ);
            let start = self.ast.exprs.span(typ).start;
            params.push(self.alloc_field(&[], typ, start));
        }
        Ok(params)
    }

    pub(super) fn parse_parameters(&mut self, scope: ScopeId, ellipsis_ok: bool) -> Result<ListRef<FieldId>> {
        const RULE: &str = "parse_parameters";
        self.expect(Tok::LParen, RULE)?;
        let params = if self.tok != Tok::RParen {
            self.parse_parameter_list(scope, ellipsis_ok)?
        } else {
            SmallVec::new()
        };
        self.expect(Tok::RParen, RULE)?;
        Ok(self.ast.list_fields(params))
    }

    fn parse_result(&mut self, scope: ScopeId) -> Result<Option<ListRef<FieldId>>> {
        if self.tok == Tok::LParen {
            return self.parse_parameters(scope, false).map(Some);
        }
        let start = self.span.start;
        match self.try_type()? {
            Some(typ) => {
                let field = self.alloc_field(&[], typ, start);
                Ok(Some(self.ast.list_fields([field])))
            }
            None => Ok(None),
        }
    }

    /// Parameters and results declare into `scope`; their types resolve
    /// against the enclosing chain.
    pub(super) fn parse_signature(&mut self, scope: ScopeId) -> Result<FuncType> {
        let params = self.parse_parameters(scope, true)?;
        let results = self.parse_result(scope)?;
        Ok(FuncType { params, results })
    }
}
