//! Statements, blocks and the control-statement headers.

use smallvec::SmallVec;

use super::Parser;
use crate::ast::{
    AssignOp, Block, BranchKind, CaseClause, ClauseId, Expr, ExprId, IncDecOp, ScopeId, Stmt,
    StmtId, UnaryOp,
};
use crate::error::{ParseError, Result};
use crate::lexer::Tok;
use crate::scope::{DeclRef, ObjKind};

impl<'src, T> Parser<'src, T>
where
    T: Iterator<Item = (usize, Tok<'src>, usize)>,
{
    fn assign_op(&self) -> Option<AssignOp> {
        Some(match self.tok {
            Tok::Assign => AssignOp::Assign,
            Tok::Define => AssignOp::Define,
            Tok::AddAssign => AssignOp::AddAssign,
            Tok::SubAssign => AssignOp::SubAssign,
            Tok::MulAssign => AssignOp::MulAssign,
            Tok::DivAssign => AssignOp::DivAssign,
            Tok::ModAssign => AssignOp::ModAssign,
            Tok::AndAssign => AssignOp::AndAssign,
            Tok::OrAssign => AssignOp::OrAssign,
            Tok::XorAssign => AssignOp::XorAssign,
            Tok::ShlAssign => AssignOp::ShlAssign,
            Tok::ShrAssign => AssignOp::ShrAssign,
            Tok::AndNotAssign => AssignOp::AndNotAssign,
            _ => return None,
        })
    }

    /// Assignment, short declaration, inc/dec or expression statement. With
    /// `range_ok`, `k, v := range x` is accepted and tagged `is_range`.
    pub(super) fn parse_simple_stmt(&mut self, range_ok: bool) -> Result<StmtId> {
        const RULE: &str = "parse_simple_stmt";
        let start = self.span.start;
        let lhs = self.parse_lhs_list()?;

        if let Some(op) = self.assign_op() {
            self.next()?;
            let is_range = range_ok
                && self.tok == Tok::KwRange
                && matches!(op, AssignOp::Assign | AssignOp::Define);
            let rhs = if is_range {
                let rstart = self.span.start;
                self.next()?;
                let x = self.parse_rhs()?;
                let range = self.ast.exprs.alloc(
                    Expr::Unary {
                        op: UnaryOp::Range,
                        x,
                    },
                    self.span_from(rstart),
                );
                SmallVec::from_elem(range, 1)
            } else {
                self.parse_rhs_list()?
            };

            let lhs_list = self.ast.list_exprs(lhs.iter().copied());
            let rhs = self.ast.list_exprs(rhs);
            let stmt = self.ast.stmts.alloc(
                Stmt::Assign {
                    lhs: lhs_list,
                    op,
                    rhs,
                    is_range,
                },
                self.span_from(start),
            );

            if op == AssignOp::Define {
                for &x in &lhs {
                    let name = self.name_of(x, "non-name on left side of :=", RULE)?;
                    self.declare(DeclRef::Assign(stmt), self.top_scope, ObjKind::Var, name)?;
                }
            }
            return Ok(stmt);
        }

        if lhs.len() > 1 {
            return Err(self.expected("assignment operator", RULE));
        }
        let x = lhs[0];

        let node = match self.tok {
            Tok::Inc | Tok::Dec => {
                let op = if self.tok == Tok::Inc {
                    IncDecOp::Inc
                } else {
                    IncDecOp::Dec
                };
                self.next()?;
                Stmt::IncDec { x, op }
            }
            _ => Stmt::Expr(x),
        };
        Ok(self.ast.stmts.alloc(node, self.span_from(start)))
    }

    pub(super) fn parse_stmt(&mut self) -> Result<StmtId> {
        const RULE: &str = "parse_stmt";
        self.nest(RULE)?;
        let start = self.span.start;
        let stmt = match self.tok {
            Tok::KwVar | Tok::KwConst | Tok::KwType => {
                let decl = self.parse_gen_decl()?;
                self.ast.stmts.alloc(Stmt::Decl(decl), self.span_from(start))
            }
            Tok::Ident(_)
            | Tok::IntLit(_)
            | Tok::FloatLit(_)
            | Tok::CharLit(_)
            | Tok::StringLit(_)
            | Tok::RawStringLit(_)
            | Tok::LParen
            | Tok::LBrack
            | Tok::KwStruct
            | Tok::KwMap
            | Tok::KwFunc
            | Tok::KwInterface
            | Tok::Plus
            | Tok::Minus
            | Tok::Star
            | Tok::Amp
            | Tok::Bang => {
                let s = self.parse_simple_stmt(false)?;
                self.expect_semi(RULE)?;
                s
            }
            Tok::KwReturn => self.parse_return_stmt()?,
            Tok::KwBreak | Tok::KwContinue => self.parse_branch_stmt()?,
            Tok::KwIf => self.parse_if_stmt()?,
            Tok::KwSwitch => self.parse_switch_stmt()?,
            Tok::KwFor => self.parse_for_stmt()?,
            Tok::KwGo => self.parse_go_stmt()?,
            Tok::LBrace => {
                let body = self.parse_block_stmt()?;
                self.expect_semi(RULE)?;
                self.ast.stmts.alloc(Stmt::Block(body), self.span_from(start))
            }
            Tok::Semi => {
                self.next()?;
                self.ast.stmts.alloc(Stmt::Empty, self.span_from(start))
            }
            Tok::KwDefer | Tok::KwGoto | Tok::KwFallthrough | Tok::KwSelect => {
                let what = format!("{} statement", self.tok.as_str());
                return Err(self.unsupported(what, RULE));
            }
            _ => return Err(self.expected("statement", RULE)),
        };
        self.unnest();
        Ok(stmt)
    }

    fn parse_stmt_list(&mut self) -> Result<SmallVec<[StmtId; 8]>> {
        let mut list = SmallVec::new();
        while !matches!(
            self.tok,
            Tok::RBrace | Tok::Eof | Tok::KwCase | Tok::KwDefault
        ) {
            list.push(self.parse_stmt()?);
        }
        Ok(list)
    }

    /// `{ ... }` in a fresh scope.
    pub(super) fn parse_block_stmt(&mut self) -> Result<Block> {
        const RULE: &str = "parse_block_stmt";
        self.expect(Tok::LBrace, RULE)?;
        self.open_scope();
        let stmts = self.parse_stmt_list()?;
        self.close_scope(RULE)?;
        self.expect(Tok::RBrace, RULE)?;
        Ok(Block {
            stmts: self.ast.list_stmts(stmts),
        })
    }

    /// Function body in the function's own scope, which the signature has
    /// already populated.
    pub(super) fn parse_body(&mut self, scope: ScopeId) -> Result<Block> {
        const RULE: &str = "parse_body";
        self.expect(Tok::LBrace, RULE)?;
        self.top_scope = Some(scope);
        let stmts = self.parse_stmt_list()?;
        self.close_scope(RULE)?;
        self.expect(Tok::RBrace, RULE)?;
        Ok(Block {
            stmts: self.ast.list_stmts(stmts),
        })
    }

    fn parse_return_stmt(&mut self) -> Result<StmtId> {
        const RULE: &str = "parse_return_stmt";
        let start = self.span.start;
        self.expect(Tok::KwReturn, RULE)?;
        let results = if self.tok != Tok::Semi && self.tok != Tok::RBrace {
            self.parse_rhs_list()?
        } else {
            SmallVec::new()
        };
        self.expect_semi(RULE)?;
        let results = self.ast.list_exprs(results);
        Ok(self
            .ast
            .stmts
            .alloc(Stmt::Return { results }, self.span_from(start)))
    }

    fn parse_branch_stmt(&mut self) -> Result<StmtId> {
        const RULE: &str = "parse_branch_stmt";
        let start = self.span.start;
        let kind = if self.tok == Tok::KwBreak {
            BranchKind::Break
        } else {
            BranchKind::Continue
        };
        self.next()?;
        if let Tok::Ident(_) = self.tok {
            return Err(self.unsupported("labeled branch", RULE));
        }
        self.expect_semi(RULE)?;
        Ok(self.ast.stmts.alloc(Stmt::Branch(kind), self.span_from(start)))
    }

    fn parse_go_stmt(&mut self) -> Result<StmtId> {
        const RULE: &str = "parse_go_stmt";
        let start = self.span.start;
        self.expect(Tok::KwGo, RULE)?;
        let call = self.parse_rhs()?;
        if !matches!(self.ast.exprs[call], Expr::Call { .. }) {
            return Err(ParseError::Syntax {
                rule: RULE,
                expected: "function call",
                found: "expression".into(),
                span: self.ast.exprs.span(call),
            });
        }
        self.expect_semi(RULE)?;
        Ok(self.ast.stmts.alloc(Stmt::Go { call }, self.span_from(start)))
    }

    /// `else if` chains recurse here, so each link counts toward the
    /// nesting limit.
    fn parse_if_stmt(&mut self) -> Result<StmtId> {
        self.nest("parse_if_stmt")?;
        let stmt = self.parse_if_inner();
        self.unnest();
        stmt
    }

    fn parse_if_inner(&mut self) -> Result<StmtId> {
        const RULE: &str = "parse_if_stmt";
        let start = self.span.start;
        self.expect(Tok::KwIf, RULE)?;
        self.open_scope();

        let old_lev = self.expr_lev;
        self.expr_lev = -1;
        if self.tok == Tok::LBrace {
            return Err(self.expected("condition", RULE));
        }
        let mut init = None;
        let mut s = self.parse_simple_stmt(false)?;
        if self.tok == Tok::Semi {
            self.next()?;
            init = Some(s);
            if self.tok == Tok::LBrace {
                return Err(self.expected("condition", RULE));
            }
            s = self.parse_simple_stmt(false)?;
        }
        let cond = self.stmt_expr(s, "condition expression", RULE)?;
        self.expr_lev = old_lev;

        let body = self.parse_block_stmt()?;
        let else_ = if self.tok == Tok::KwElse {
            self.next()?;
            match self.tok {
                Tok::KwIf => Some(self.parse_if_stmt()?),
                Tok::LBrace => {
                    let bstart = self.span.start;
                    let block = self.parse_block_stmt()?;
                    self.expect_semi(RULE)?;
                    Some(self.ast.stmts.alloc(Stmt::Block(block), self.span_from(bstart)))
                }
                _ => return Err(self.expected("if statement or block", RULE)),
            }
        } else {
            self.expect_semi(RULE)?;
            None
        };

        self.close_scope(RULE)?;
        Ok(self.ast.stmts.alloc(
            Stmt::If {
                init,
                cond,
                body,
                else_,
            },
            self.span_from(start),
        ))
    }

    /// `x.(type)`, alone or as the single right side of an assignment.
    fn is_type_switch_guard(&self, s: StmtId) -> bool {
        let is_type_assert =
            |x: ExprId| matches!(self.ast.exprs[x], Expr::TypeAssert { typ: None, .. });
        match self.ast.stmts[s] {
            Stmt::Expr(x) => is_type_assert(x),
            Stmt::Assign { lhs, rhs, .. } => {
                let rhs = self.ast.exprs_list(rhs);
                lhs.len() == 1 && rhs.len() == 1 && is_type_assert(rhs[0])
            }
            _ => false,
        }
    }

    fn parse_switch_stmt(&mut self) -> Result<StmtId> {
        const RULE: &str = "parse_switch_stmt";
        let start = self.span.start;
        self.expect(Tok::KwSwitch, RULE)?;
        self.open_scope();

        let mut init = None;
        let mut guard = None;
        if self.tok != Tok::LBrace {
            let old_lev = self.expr_lev;
            self.expr_lev = -1;
            let s = if self.tok != Tok::Semi {
                Some(self.parse_simple_stmt(false)?)
            } else {
                None
            };
            if self.tok == Tok::Semi {
                self.next()?;
                init = s;
                if self.tok != Tok::LBrace {
                    guard = Some(self.parse_simple_stmt(false)?);
                }
            } else {
                guard = s;
            }
            self.expr_lev = old_lev;
        }

        self.expect(Tok::LBrace, RULE)?;
        let mut clauses: SmallVec<[ClauseId; 8]> = SmallVec::new();
        while matches!(self.tok, Tok::KwCase | Tok::KwDefault) {
            clauses.push(self.parse_case_clause()?);
        }
        self.expect(Tok::RBrace, RULE)?;
        self.expect_semi(RULE)?;
        self.close_scope(RULE)?;

        let clauses = self.ast.list_clauses(clauses);
        let node = match guard {
            Some(g) if self.is_type_switch_guard(g) => Stmt::TypeSwitch {
                init,
                assign: g,
                clauses,
            },
            Some(g) => Stmt::Switch {
                init,
                tag: Some(self.stmt_expr(g, "switch expression", RULE)?),
                clauses,
            },
            None => Stmt::Switch {
                init,
                tag: None,
                clauses,
            },
        };
        Ok(self.ast.stmts.alloc(node, self.span_from(start)))
    }

    /// The clause scope opens after the colon.
    fn parse_case_clause(&mut self) -> Result<ClauseId> {
        const RULE: &str = "parse_case_clause";
        let start = self.span.start;
        let (list, is_default) = if self.tok == Tok::KwCase {
            self.next()?;
            (self.parse_rhs_list()?, false)
        } else {
            self.expect(Tok::KwDefault, RULE)?;
            (SmallVec::new(), true)
        };
        self.expect(Tok::Colon, RULE)?;

        self.open_scope();
        let body = self.parse_stmt_list()?;
        self.close_scope(RULE)?;

        let list = self.ast.list_exprs(list);
        let body = self.ast.list_stmts(body);
        Ok(self.ast.clauses.alloc(
            CaseClause {
                list,
                is_default,
                body,
            },
            self.span_from(start),
        ))
    }

    fn parse_for_stmt(&mut self) -> Result<StmtId> {
        const RULE: &str = "parse_for_stmt";
        let start = self.span.start;
        self.expect(Tok::KwFor, RULE)?;
        self.open_scope();

        let mut init = None;
        let mut cond = None;
        let mut post = None;
        let mut bare_range = None;
        let mut is_range = false;

        if self.tok != Tok::LBrace {
            let old_lev = self.expr_lev;
            self.expr_lev = -1;
            if self.tok == Tok::KwRange {
                self.next()?;
                bare_range = Some(self.parse_rhs()?);
            } else {
                if self.tok != Tok::Semi {
                    let s = self.parse_simple_stmt(true)?;
                    is_range = matches!(self.ast.stmts[s], Stmt::Assign { is_range: true, .. });
                    cond = Some(s);
                }
                if !is_range && self.tok == Tok::Semi {
                    self.next()?;
                    init = cond.take();
                    if self.tok != Tok::Semi {
                        cond = Some(self.parse_simple_stmt(false)?);
                    }
                    self.expect_semi(RULE)?;
                    if self.tok != Tok::LBrace {
                        post = Some(self.parse_simple_stmt(false)?);
                    }
                }
            }
            self.expr_lev = old_lev;
        }

        let body = self.parse_block_stmt()?;
        self.expect_semi(RULE)?;
        self.close_scope(RULE)?;

        let node = if let Some(x) = bare_range {
            Stmt::Range {
                key: None,
                value: None,
                op: None,
                x,
                body,
                header: None,
            }
        } else if is_range {
            let header = cond.ok_or_else(|| Self::internal("range clause without header", RULE))?;
            self.range_stmt(header, body)?
        } else {
            let cond = match cond {
                Some(s) => Some(self.stmt_expr(s, "for loop condition", RULE)?),
                None => None,
            };
            Stmt::For {
                init,
                cond,
                post,
                body,
            }
        };
        Ok(self.ast.stmts.alloc(node, self.span_from(start)))
    }

    /// Reclassifies a range-tagged header assignment as a `Range` statement.
    fn range_stmt(&self, header: StmtId, body: Block) -> Result<Stmt> {
        const RULE: &str = "parse_for_stmt";
        let Stmt::Assign { lhs, op, rhs, .. } = self.ast.stmts[header] else {
            return Err(Self::internal("range header is not an assignment", RULE));
        };
        let lhs = self.ast.exprs_list(lhs);
        let (key, value) = match *lhs {
            [] => (None, None),
            [k] => (Some(k), None),
            [k, v] => (Some(k), Some(v)),
            _ => {
                return Err(ParseError::Syntax {
                    rule: RULE,
                    expected: "at most 2 iteration variables",
                    found: format!("{} expressions", lhs.len()),
                    span: self.ast.stmts.span(header),
                });
            }
        };
        let x = match self.ast.exprs_list(rhs) {
            [r] => match self.ast.exprs[*r] {
                Expr::Unary {
                    op: UnaryOp::Range,
                    x,
                } => x,
                _ => return Err(Self::internal("range header without range operand", RULE)),
            },
            _ => return Err(Self::internal("range header with several operands", RULE)),
        };
        Ok(Stmt::Range {
            key,
            value,
            op: Some(op),
            x,
            body,
            header: Some(header),
        })
    }
}
