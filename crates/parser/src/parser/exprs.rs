//! Expressions: operands, postfix chains, unary and binary operators.
//!
//! `lhs` marks an expression that may still turn out to be the left side of
//! a short variable declaration. Its leading identifier stays unbound until
//! the parser knows; any postfix or binary operator settles it as a use.

use smallvec::SmallVec;

use super::Parser;
use crate::ast::{BasicLit, BinaryOp, Expr, ExprId, Ident, IdentId, LitKind, TypeExpr, UnaryOp};
use crate::error::Result;
use crate::lexer::Tok;

impl<'src, T> Parser<'src, T>
where
    T: Iterator<Item = (usize, Tok<'src>, usize)>,
{
    pub(super) fn parse_ident(&mut self, rule: &'static str) -> Result<IdentId> {
        let Tok::Ident(name) = self.tok else {
            return Err(self.expected("IDENT", rule));
        };
        let name = self.ast.interner.intern(name);
        let id = self.ast.idents.alloc(Ident { name, obj: None }, self.span);
        self.next()?;
        Ok(id)
    }

    /// Identifier wrapped as an expression node.
    pub(super) fn parse_ident_expr(&mut self, rule: &'static str) -> Result<ExprId> {
        let span = self.span;
        let id = self.parse_ident(rule)?;
        Ok(self.ast.exprs.alloc(Expr::Ident(id), span))
    }

    pub(super) fn parse_basic_lit(&mut self, rule: &'static str) -> Result<BasicLit> {
        let (kind, text) = match self.tok {
            Tok::IntLit(s) => (LitKind::Int, s),
            Tok::CharLit(s) => (LitKind::Char, s),
            Tok::StringLit(s) | Tok::RawStringLit(s) => (LitKind::String, s),
            Tok::FloatLit(_) => return Err(self.unsupported("floating-point literal", rule)),
            _ => return Err(self.expected("literal", rule)),
        };
        let value = self.ast.interner.intern(text);
        self.next()?;
        Ok(BasicLit { kind, value })
    }

    fn parse_operand(&mut self, lhs: bool) -> Result<ExprId> {
        const RULE: &str = "parse_operand";
        let start = self.span.start;
        match self.tok {
            Tok::Ident(_) => {
                let x = self.parse_ident_expr(RULE)?;
                if !lhs {
                    self.resolve(x);
                }
                Ok(x)
            }
            Tok::IntLit(_)
            | Tok::CharLit(_)
            | Tok::StringLit(_)
            | Tok::RawStringLit(_)
            | Tok::FloatLit(_) => {
                let lit = self.parse_basic_lit(RULE)?;
                Ok(self.ast.exprs.alloc(Expr::BasicLit(lit), self.span_from(start)))
            }
            Tok::LParen => {
                self.next()?;
                self.expr_lev += 1;
                let x = self.parse_rhs()?;
                self.expr_lev -= 1;
                self.expect(Tok::RParen, RULE)?;
                Ok(self.ast.exprs.alloc(Expr::Paren { x }, self.span_from(start)))
            }
            _ => match self.try_ident_or_type()? {
                Some(typ) => Ok(typ),
                None => Err(self.expected("operand", RULE)),
            },
        }
    }

    /// Composite literals are only taken for these operand shapes.
    fn is_literal_type(&self, x: ExprId) -> bool {
        match self.ast.exprs[x] {
            Expr::Ident(_) => true,
            Expr::Selector { x, .. } => matches!(self.ast.exprs[x], Expr::Ident(_)),
            Expr::Type(TypeExpr::Array { .. } | TypeExpr::Struct { .. }) => true,
            _ => false,
        }
    }

    fn parse_primary_expr(&mut self, lhs: bool) -> Result<ExprId> {
        const RULE: &str = "parse_primary_expr";
        let start = self.span.start;
        let mut x = self.parse_operand(lhs)?;
        let mut chain = 0usize;

        loop {
            let postfix = match self.tok {
                Tok::Dot | Tok::LParen | Tok::LBrack => true,
                Tok::LBrace => self.expr_lev >= 0 && self.is_literal_type(x),
                _ => false,
            };
            if !postfix {
                return Ok(x);
            }

            chain += 1;
            if chain > self.config.max_postfix_chain {
                return Err(self.unsupported(
                    format!(
                        "more than {} postfix operators in one expression",
                        self.config.max_postfix_chain
                    ),
                    RULE,
                ));
            }
            if lhs {
                self.resolve(x);
            }

            x = match self.tok {
                Tok::Dot => {
                    self.next()?;
                    match self.tok {
                        Tok::Ident(_) => {
                            let sel = self.parse_ident(RULE)?;
                            let sx = self
                                .ast
                                .exprs
                                .alloc(Expr::Selector { x, sel }, self.span_from(start));
                            if self.tok == Tok::LParen {
                                self.parse_call_expr(sx, start)?
                            } else {
                                sx
                            }
                        }
                        Tok::LParen => self.parse_type_assertion(x, start)?,
                        _ => return Err(self.expected("IDENT or (", RULE)),
                    }
                }
                Tok::LParen => self.parse_call_expr(x, start)?,
                Tok::LBrack => self.parse_index_or_slice(x, start)?,
                _ => self.parse_literal_value(x, start)?,
            };
        }
    }

    fn parse_call_expr(&mut self, fun: ExprId, start: u32) -> Result<ExprId> {
        const RULE: &str = "parse_call_expr";
        self.expect(Tok::LParen, RULE)?;
        self.expr_lev += 1;

        let mut args: SmallVec<[ExprId; 4]> = SmallVec::new();
        let mut ellipsis = None;
        while self.tok != Tok::RParen {
            args.push(self.parse_rhs()?);
            if self.tok == Tok::Ellipsis {
                ellipsis = Some(self.span);
                self.next()?;
                if self.tok == Tok::Comma {
                    self.next()?;
                }
                break;
            }
            if self.tok != Tok::Comma {
                break;
            }
            self.next()?;
        }

        self.expr_lev -= 1;
        self.expect(Tok::RParen, RULE)?;
        let args = self.ast.list_exprs(args);
        Ok(self.ast.exprs.alloc(
            Expr::Call {
                fun,
                args,
                ellipsis,
            },
            self.span_from(start),
        ))
    }

    /// `x.(T)` or `x.(type)`; the `.` is already consumed.
    fn parse_type_assertion(&mut self, x: ExprId, start: u32) -> Result<ExprId> {
        const RULE: &str = "parse_type_assertion";
        self.expect(Tok::LParen, RULE)?;
        let typ = if self.tok == Tok::KwType {
            self.next()?;
            None
        } else {
            Some(self.parse_type(RULE)?)
        };
        self.expect(Tok::RParen, RULE)?;
        Ok(self
            .ast
            .exprs
            .alloc(Expr::TypeAssert { x, typ }, self.span_from(start)))
    }

    fn parse_index_or_slice(&mut self, x: ExprId, start: u32) -> Result<ExprId> {
        const RULE: &str = "parse_index_or_slice";
        self.expect(Tok::LBrack, RULE)?;
        self.expr_lev += 1;

        let mut index: [Option<ExprId>; 3] = [None; 3];
        if self.tok != Tok::Colon {
            index[0] = Some(self.parse_rhs()?);
        }
        let mut ncolons = 0;
        while self.tok == Tok::Colon && ncolons < 2 {
            ncolons += 1;
            self.next()?;
            if self.tok != Tok::Colon && self.tok != Tok::RBrack {
                index[ncolons] = Some(self.parse_rhs()?);
            }
        }

        self.expr_lev -= 1;
        self.expect(Tok::RBrack, RULE)?;

        let node = if ncolons > 0 {
            Expr::Slice {
                x,
                low: index[0],
                high: index[1],
                max: index[2],
                slice3: ncolons == 2,
            }
        } else {
            let index = index[0].ok_or_else(|| Self::internal("index without operand", RULE))?;
            Expr::Index { x, index }
        };
        Ok(self.ast.exprs.alloc(node, self.span_from(start)))
    }

    fn parse_literal_value(&mut self, typ: ExprId, start: u32) -> Result<ExprId> {
        const RULE: &str = "parse_literal_value";
        self.expect(Tok::LBrace, RULE)?;
        self.expr_lev += 1;

        let mut elts: SmallVec<[ExprId; 8]> = SmallVec::new();
        while self.tok != Tok::RBrace {
            elts.push(self.parse_element(typ)?);
            if self.tok != Tok::Comma {
                break;
            }
            self.next()?;
        }

        self.expr_lev -= 1;
        self.expect(Tok::RBrace, RULE)?;
        let elts = self.ast.list_exprs(elts);
        Ok(self
            .ast
            .exprs
            .alloc(Expr::CompositeLit { typ, elts }, self.span_from(start)))
    }

    fn parse_element(&mut self, typ: ExprId) -> Result<ExprId> {
        let start = self.span.start;
        let x = self.parse_expr(true)?;
        if self.tok != Tok::Colon {
            self.resolve(x);
            return Ok(x);
        }
        self.next()?;
        self.resolve_key(x, typ);
        let value = self.parse_rhs()?;
        Ok(self
            .ast
            .exprs
            .alloc(Expr::KeyValue { key: x, value }, self.span_from(start)))
    }

    fn parse_unary_expr(&mut self, lhs: bool) -> Result<ExprId> {
        self.nest("parse_unary_expr")?;
        let x = self.parse_unary_inner(lhs);
        self.unnest();
        x
    }

    fn parse_unary_inner(&mut self, lhs: bool) -> Result<ExprId> {
        let start = self.span.start;
        let op = match self.tok {
            Tok::Plus => UnaryOp::Add,
            Tok::Minus => UnaryOp::Sub,
            Tok::Bang => UnaryOp::Not,
            Tok::Amp => UnaryOp::Addr,
            Tok::Star => {
                self.next()?;
                let x = self.parse_unary_expr(false)?;
                return Ok(self.ast.exprs.alloc(Expr::Star { x }, self.span_from(start)));
            }
            _ => return self.parse_primary_expr(lhs),
        };
        self.next()?;
        let x = self.parse_unary_expr(false)?;
        Ok(self
            .ast
            .exprs
            .alloc(Expr::Unary { op, x }, self.span_from(start)))
    }

    fn binary_op(&self) -> Option<BinaryOp> {
        Some(match self.tok {
            Tok::Plus => BinaryOp::Add,
            Tok::Minus => BinaryOp::Sub,
            Tok::Star => BinaryOp::Mul,
            Tok::Slash => BinaryOp::Div,
            Tok::Percent => BinaryOp::Mod,
            Tok::Amp => BinaryOp::And,
            Tok::Pipe => BinaryOp::Or,
            Tok::Caret => BinaryOp::Xor,
            Tok::Shl => BinaryOp::Shl,
            Tok::Shr => BinaryOp::Shr,
            Tok::AndNot => BinaryOp::AndNot,
            Tok::LAnd => BinaryOp::LAnd,
            Tok::LOr => BinaryOp::LOr,
            Tok::EqEq => BinaryOp::Eq,
            Tok::NotEq => BinaryOp::Ne,
            Tok::Lt => BinaryOp::Lt,
            Tok::Le => BinaryOp::Le,
            Tok::Gt => BinaryOp::Gt,
            Tok::Ge => BinaryOp::Ge,
            _ => return None,
        })
    }

    fn parse_binary_expr(&mut self, mut lhs: bool, prec1: u8) -> Result<ExprId> {
        let start = self.span.start;
        let mut x = self.parse_unary_expr(lhs)?;
        while let Some(op) = self.binary_op() {
            let oprec = op.precedence();
            if oprec < prec1 {
                break;
            }
            self.next()?;
            if lhs {
                self.resolve(x);
                lhs = false;
            }
            let y = self.parse_binary_expr(false, oprec + 1)?;
            x = self
                .ast
                .exprs
                .alloc(Expr::Binary { x, op, y }, self.span_from(start));
        }
        Ok(x)
    }

    pub(super) fn parse_expr(&mut self, lhs: bool) -> Result<ExprId> {
        self.parse_binary_expr(lhs, 1)
    }

    pub(super) fn parse_rhs(&mut self) -> Result<ExprId> {
        self.parse_expr(false)
    }

    pub(super) fn parse_expr_list(&mut self, lhs: bool) -> Result<SmallVec<[ExprId; 4]>> {
        let mut list = SmallVec::new();
        list.push(self.parse_expr(lhs)?);
        while self.tok == Tok::Comma {
            self.next()?;
            list.push(self.parse_expr(lhs)?);
        }
        Ok(list)
    }

    /// Left side of a simple statement. Bound right away unless a `:=`
    /// follows, in which case the statement declares the names instead.
    pub(super) fn parse_lhs_list(&mut self) -> Result<SmallVec<[ExprId; 4]>> {
        let list = self.parse_expr_list(true)?;
        if self.tok != Tok::Define {
            for &x in &list {
                self.resolve(x);
            }
        }
        Ok(list)
    }

    pub(super) fn parse_rhs_list(&mut self) -> Result<SmallVec<[ExprId; 4]>> {
        self.parse_expr_list(false)
    }
}
