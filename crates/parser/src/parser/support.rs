//! Token discipline, scope bookkeeping and binding helpers.

use log::trace;

use super::Parser;
use crate::ast::{
    Expr, ExprId, IdentId, ObjectId, PendingKey, ScopeId, Span, Stmt, StmtId, Symbol,
};
use crate::error::{ParseError, Result};
use crate::lexer::Tok;
use crate::scope::{DeclRef, ObjKind, Object};

impl<'src, T> Parser<'src, T>
where
    T: Iterator<Item = (usize, Tok<'src>, usize)>,
{
    // -------------------------------------------------------------------------
    // Tokens
    // -------------------------------------------------------------------------

    pub(super) fn next(&mut self) -> Result<()> {
        self.prev_end = self.span.end;
        loop {
            match self.tokens.next() {
                Some((_, Tok::Comment(_), _)) => continue,
                Some((start, Tok::Error(kind), end)) => {
                    return Err(ParseError::Lex {
                        kind,
                        span: Span::new(start, end),
                    });
                }
                Some((start, tok, end)) => {
                    self.tok = tok;
                    self.span = Span::new(start, end);
                }
                None => {
                    self.tok = Tok::Eof;
                    self.span = Span {
                        start: self.span.end,
                        end: self.span.end,
                    };
                }
            }
            break;
        }
        trace!(target: "minigo_parser", "tok {} at {}", self.tok, self.span.start);
        Ok(())
    }

    pub(super) fn expected(&self, expected: &'static str, rule: &'static str) -> ParseError {
        ParseError::Syntax {
            rule,
            expected,
            found: self.tok.to_string(),
            span: self.span,
        }
    }

    pub(super) fn unsupported(&self, what: impl Into<String>, rule: &'static str) -> ParseError {
        ParseError::Unsupported {
            rule,
            what: what.into(),
            span: self.span,
        }
    }

    pub(super) fn unsupported_at(&self, what: impl Into<String>, span: Span, rule: &'static str) -> ParseError {
        ParseError::Unsupported {
            rule,
            what: what.into(),
            span,
        }
    }

    pub(super) fn internal(what: impl Into<String>, rule: &'static str) -> ParseError {
        ParseError::Internal {
            rule,
            what: what.into(),
        }
    }

    /// Consumes `want` and returns its span.
    pub(super) fn expect(&mut self, want: Tok<'src>, rule: &'static str) -> Result<Span> {
        if self.tok != want {
            return Err(self.expected(want.as_str(), rule));
        }
        let span = self.span;
        self.next()?;
        Ok(span)
    }

    /// A `;` is optional before `)` and `}`.
    pub(super) fn expect_semi(&mut self, rule: &'static str) -> Result<()> {
        match self.tok {
            Tok::RParen | Tok::RBrace => Ok(()),
            Tok::Semi => self.next(),
            _ => Err(self.expected(";", rule)),
        }
    }

    /// Span from `start` to the end of the last consumed token.
    #[inline]
    pub(super) fn span_from(&self, start: u32) -> Span {
        Span {
            start,
            end: self.prev_end.max(start),
        }
    }

    pub(super) fn nest(&mut self, rule: &'static str) -> Result<()> {
        self.depth += 1;
        if self.depth > self.config.max_nesting {
            return Err(self.unsupported(
                format!("nesting deeper than {}", self.config.max_nesting),
                rule,
            ));
        }
        Ok(())
    }

    #[inline]
    pub(super) fn unnest(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    // -------------------------------------------------------------------------
    // Scopes
    // -------------------------------------------------------------------------

    pub(super) fn open_scope(&mut self) -> ScopeId {
        let scope = self.ast.scopes.new_scope(self.top_scope);
        trace!(target: "minigo_parser", "open scope {scope:?} (outer {:?})", self.top_scope);
        self.top_scope = Some(scope);
        scope
    }

    pub(super) fn close_scope(&mut self, rule: &'static str) -> Result<()> {
        let top = self
            .top_scope
            .ok_or_else(|| Self::internal("close_scope with no open scope", rule))?;
        trace!(target: "minigo_parser", "close scope {top:?}");
        self.top_scope = self.ast.scopes.outer(top);
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Binding
    // -------------------------------------------------------------------------

    /// Creates an object for `ident` and binds it in `scope`. The blank
    /// identifier gets neither.
    pub(super) fn declare(
        &mut self,
        decl: DeclRef,
        scope: Option<ScopeId>,
        kind: ObjKind,
        ident: IdentId,
    ) -> Result<Option<ObjectId>> {
        let name = self.ast.idents[ident].name;
        if name == Symbol::BLANK {
            return Ok(None);
        }
        let span = self.ast.idents.span(ident);
        let obj = self.ast.objects.alloc(
            Object {
                kind,
                name,
                decl,
                data: None,
            },
            span,
        );
        self.ast.idents[ident].obj = Some(obj);
        self.ast.scopes.insert(scope, name, obj)?;
        trace!(
            target: "minigo_parser",
            "declare {:?} {} in {scope:?}",
            kind,
            self.ast.str(name)
        );
        Ok(Some(obj))
    }

    /// Binds `x` if it is a bare identifier.
    pub(super) fn resolve(&mut self, x: ExprId) {
        if let Expr::Ident(id) = self.ast.exprs[x] {
            self.resolve_ident(id);
        }
    }

    /// Walks the open scope chain; a miss queues the identifier for the
    /// deferred pass. Already-bound identifiers and `_` are left alone.
    pub(super) fn resolve_ident(&mut self, id: IdentId) {
        let ident = self.ast.idents[id];
        if ident.name == Symbol::BLANK || ident.obj.is_some() {
            return;
        }
        match self.ast.scopes.lookup_chain(self.top_scope, ident.name) {
            Some(obj) => {
                self.ast.idents[id].obj = Some(obj);
                trace!(target: "minigo_parser", "resolve {} -> {obj:?}", self.ast.str(ident.name));
            }
            None => {
                self.unresolved.push(id);
                trace!(target: "minigo_parser", "defer {}", self.ast.str(ident.name));
            }
        }
    }

    /// A bare key of a struct literal names a field and stays unbound; in
    /// any other literal it is an ordinary expression. When the literal type
    /// is not known yet the key waits for the deferred pass.
    pub(super) fn resolve_key(&mut self, key: ExprId, typ: ExprId) {
        let Some(id) = self.ast.expr_ident(key) else {
            return;
        };
        match self.ast.literal_has_fields(typ) {
            Some(true) => {}
            Some(false) => self.resolve_ident(id),
            None => {
                let name = self.ast.idents[id].name;
                if name == Symbol::BLANK {
                    return;
                }
                let candidate = self.ast.scopes.lookup_chain(self.top_scope, name);
                trace!(target: "minigo_parser", "hold key {}", self.ast.str(name));
                self.pending_keys.push(PendingKey {
                    key: id,
                    typ,
                    candidate,
                });
            }
        }
    }

    /// The identifier of a plain-name expression, or `what` as `Unsupported`.
    pub(super) fn name_of(&self, x: ExprId, what: &str, rule: &'static str) -> Result<IdentId> {
        self.ast
            .expr_ident(x)
            .ok_or_else(|| self.unsupported_at(what, self.ast.exprs.span(x), rule))
    }

    /// The expression of an expression statement.
    pub(super) fn stmt_expr(&self, s: StmtId, expected: &'static str, rule: &'static str) -> Result<ExprId> {
        match self.ast.stmts[s] {
            Stmt::Expr(x) => Ok(x),
            _ => Err(ParseError::Syntax {
                rule,
                expected,
                found: "simple statement".into(),
                span: self.ast.stmts.span(s),
            }),
        }
    }
}
