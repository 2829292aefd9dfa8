//! Single-pass recursive-descent parser with integrated identifier
//! resolution.
//!
//! The parser keeps one token of lookahead, a chain of open scopes and a list
//! of identifiers that no open scope could bind. [`Parser::parse_file`] runs
//! the deferred pass over that list once the package scope is complete.

mod decls;
mod exprs;
mod stmts;
mod support;
mod types;

use log::debug;
use smallvec::SmallVec;

use crate::ast::{Ast, DeclId, File, IdentId, PendingKey, ScopeId, Span, SpecId};
use crate::config::{Mode, ParserConfig};
use crate::error::{ParseError, Result};
use crate::lexer::{Lexer, Tok};
use crate::resolve;

pub struct Parser<'src, T = Lexer<'src>>
where
    T: Iterator<Item = (usize, Tok<'src>, usize)>,
{
    tokens: T,
    tok: Tok<'src>,
    span: Span,
    prev_end: u32,
    filename: String,
    config: ParserConfig,
    ast: Ast,
    /// Innermost open scope.
    top_scope: Option<ScopeId>,
    pkg_scope: Option<ScopeId>,
    /// Identifiers to retry against the package scope.
    unresolved: Vec<IdentId>,
    /// Literal keys whose literal type is not known yet.
    pending_keys: Vec<PendingKey>,
    imports: SmallVec<[SpecId; 8]>,
    /// Signed nesting level; `-1` inside control-statement headers.
    expr_lev: i32,
    depth: usize,
}

impl<'src> Parser<'src> {
    pub fn new(filename: &str, src: &'src str, config: ParserConfig) -> Result<Self> {
        Self::from_tokens(filename, Lexer::new(src), config)
    }
}

impl<'src, T> Parser<'src, T>
where
    T: Iterator<Item = (usize, Tok<'src>, usize)>,
{
    /// Drives the parser from any token source. Comment tokens are skipped;
    /// exhaustion reads as [`Tok::Eof`].
    pub fn from_tokens(filename: &str, tokens: T, config: ParserConfig) -> Result<Self> {
        let mut p = Self {
            tokens,
            tok: Tok::Eof,
            span: Span::default(),
            prev_end: 0,
            filename: filename.to_owned(),
            config,
            ast: Ast::new(),
            top_scope: None,
            pkg_scope: None,
            unresolved: Vec::new(),
            pending_keys: Vec::new(),
            imports: SmallVec::new(),
            expr_lev: 0,
            depth: 0,
        };
        p.next()?;
        Ok(p)
    }

    /// Parses a whole file and runs the deferred resolution pass.
    pub fn parse_file(self) -> Result<File> {
        let mut file = self.parse_file_pending()?;
        resolve::resolve_deferred(&mut file);
        Ok(file)
    }

    /// Parses a whole file but leaves `File::unresolved` as the parser left
    /// it, before the deferred pass.
    pub fn parse_file_pending(mut self) -> Result<File> {
        const RULE: &str = "parse_file";

        let package_pos = self.expect(Tok::KwPackage, RULE)?;
        let name = self.parse_ident(RULE)?;
        self.expect_semi(RULE)?;

        let scope = self.open_scope();
        self.pkg_scope = Some(scope);

        while self.tok == Tok::KwImport {
            self.parse_import_decl()?;
        }

        let mut decls: SmallVec<[DeclId; 16]> = SmallVec::new();
        if self.config.mode == Mode::Full {
            while self.tok != Tok::Eof {
                decls.push(self.parse_top_level_decl()?);
            }
        }

        if self.top_scope != Some(scope) {
            return Err(ParseError::Internal {
                rule: RULE,
                what: "scopes left open at end of file".into(),
            });
        }
        self.top_scope = None;

        let imports = self.ast.list_specs(self.imports.iter().copied());
        let decls = self.ast.list_decls(decls);

        debug!(
            target: "minigo_parser",
            "{}: parsed {} decls, {} imports, {} pending identifiers",
            self.filename,
            decls.len(),
            imports.len(),
            self.unresolved.len()
        );

        Ok(File {
            name,
            package_pos,
            imports,
            decls,
            scope,
            unresolved: self.unresolved,
            pending_keys: self.pending_keys,
            ast: self.ast,
        })
    }
}
