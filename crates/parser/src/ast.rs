//! # minigo syntax tree
//!
//! Nodes live in typed arenas (`SpannedArena<T>`) owned by one [`Ast`] per
//! file and are addressed by `Id<T>` handles. Variable-length children are
//! `ListRef<T>` ranges into the centralized [`ExtraData`] buffers.
//!
//! Identifier occurrences are [`Ident`] nodes carrying an optional binding to
//! an [`Object`]; objects and scopes are arena-allocated next to the tree so
//! that the finished [`File`] owns everything and nothing borrows the parser.
//!
//! `#[derive(WalkAst)]` generates `impl crate::walk::Walk` for the node types.

use ast_derive::WalkAst;
use core::fmt;
use core::hash::{Hash, Hasher};
use core::marker::PhantomData;
use core::ops::{Index, IndexMut};
use smallvec::SmallVec;
use std::collections::HashMap;
use std::hash::{BuildHasher, BuildHasherDefault, RandomState};

pub use crate::error::Span;
use crate::scope::{DeclRef, ObjKind, Object, Scope, Scopes};

// =============================================================================
// Handles and list references
// =============================================================================

/// Type-safe handle for an arena-allocated node.
#[repr(transparent)]
pub struct Id<T> {
    raw: u32,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Id<T> {
    #[inline]
    pub const fn from_raw(raw: u32) -> Self {
        Self {
            raw,
            _marker: PhantomData,
        }
    }

    #[inline]
    pub const fn to_usize(&self) -> usize {
        self.raw as usize
    }

    #[inline]
    pub const fn raw(&self) -> u32 {
        self.raw
    }
}

// Manual impls: derives would demand the same bounds of `T`.
impl<T> Copy for Id<T> {}

impl<T> Clone for Id<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> PartialEq for Id<T> {
    fn eq(&self, other: &Self) -> bool {
        self.raw == other.raw
    }
}

impl<T> Eq for Id<T> {}

impl<T> Hash for Id<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.raw.hash(state);
    }
}

impl<T> fmt::Debug for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.raw)
    }
}

/// Typed reference into a centralized list buffer.
pub struct ListRef<T> {
    start: u32,
    len: u32,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Copy for ListRef<T> {}

impl<T> Clone for ListRef<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> PartialEq for ListRef<T> {
    fn eq(&self, other: &Self) -> bool {
        self.start == other.start && self.len == other.len
    }
}

impl<T> Eq for ListRef<T> {}

impl<T> fmt::Debug for ListRef<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}..{}]", self.start, self.end())
    }
}

impl<T> Default for ListRef<T> {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl<T> ListRef<T> {
    pub const EMPTY: Self = Self {
        start: 0,
        len: 0,
        _marker: PhantomData,
    };

    #[inline]
    pub const fn new(start: u32, len: u32) -> Self {
        Self {
            start,
            len,
            _marker: PhantomData,
        }
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub const fn start(&self) -> u32 {
        self.start
    }

    #[inline]
    pub const fn len(&self) -> u32 {
        self.len
    }

    #[inline]
    pub const fn end(&self) -> u32 {
        self.start + self.len
    }
}

// =============================================================================
// Symbol interning
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct Symbol(u32);

impl Symbol {
    /// The blank identifier `_`, interned first by every [`Interner`].
    pub const BLANK: Symbol = Symbol(0);

    #[inline]
    pub const fn from_raw(v: u32) -> Self {
        Self(v)
    }

    #[inline]
    pub const fn as_u32(self) -> u32 {
        self.0
    }
}

#[derive(Default)]
struct U64IdentityHasher(u64);

impl Hasher for U64IdentityHasher {
    fn write(&mut self, bytes: &[u8]) {
        for &b in bytes {
            self.0 = self.0.rotate_left(8) ^ u64::from(b);
        }
    }

    #[inline]
    fn write_u64(&mut self, i: u64) {
        self.0 = i;
    }

    #[inline]
    fn finish(&self) -> u64 {
        self.0
    }
}

type U64IdentityBuild = BuildHasherDefault<U64IdentityHasher>;

/// String interner. Symbols are looked up through pre-hashed buckets.
#[derive(Debug)]
pub struct Interner {
    strings: Vec<Box<str>>,
    buckets: HashMap<u64, SmallVec<[Symbol; 1]>, U64IdentityBuild>,
    state: RandomState,
}

impl Default for Interner {
    fn default() -> Self {
        let mut interner = Self {
            strings: Vec::new(),
            buckets: HashMap::default(),
            state: RandomState::new(),
        };
        let blank = interner.intern("_");
        debug_assert_eq!(blank, Symbol::BLANK);
        interner
    }
}

impl Interner {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn reserve(&mut self, additional: usize) {
        self.strings.reserve(additional);
        self.buckets.reserve(additional);
    }

    #[inline]
    pub fn intern(&mut self, s: &str) -> Symbol {
        let h = self.state.hash_one(s);
        let entry = self.buckets.entry(h).or_default();

        for &sym in entry.iter() {
            if self.strings[sym.0 as usize].as_ref() == s {
                return sym;
            }
        }

        let sym = Symbol(self.strings.len() as u32);
        self.strings.push(s.into());
        entry.push(sym);
        sym
    }

    /// Looks a string up without interning it.
    pub fn get(&self, s: &str) -> Option<Symbol> {
        let h = self.state.hash_one(s);
        self.buckets
            .get(&h)?
            .iter()
            .copied()
            .find(|sym| self.strings[sym.0 as usize].as_ref() == s)
    }

    /// Resolves a symbol back to its string. Foreign symbols resolve to "".
    #[inline]
    pub fn resolve(&self, sym: Symbol) -> &str {
        self.strings.get(sym.0 as usize).map_or("", |s| s.as_ref())
    }

    pub fn len(&self) -> usize {
        self.strings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }
}

// =============================================================================
// Arena allocation
// =============================================================================

/// Nodes and their spans in parallel vectors.
#[derive(Debug)]
pub struct SpannedArena<T> {
    data: Vec<T>,
    spans: Vec<Span>,
}

impl<T> Default for SpannedArena<T> {
    fn default() -> Self {
        Self {
            data: Vec::new(),
            spans: Vec::new(),
        }
    }
}

impl<T> SpannedArena<T> {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn alloc(&mut self, node: T, span: Span) -> Id<T> {
        let id = self.next_id();
        self.data.push(node);
        self.spans.push(span);
        id
    }

    /// The handle the next `alloc` will return.
    #[inline]
    pub fn next_id(&self) -> Id<T> {
        Id::from_raw(self.data.len() as u32)
    }

    #[inline]
    pub fn get(&self, id: Id<T>) -> &T {
        &self.data[id.to_usize()]
    }

    #[inline]
    pub fn get_mut(&mut self, id: Id<T>) -> &mut T {
        &mut self.data[id.to_usize()]
    }

    #[inline]
    pub fn span(&self, id: Id<T>) -> Span {
        self.spans[id.to_usize()]
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Id<T>, &T)> {
        self.data
            .iter()
            .enumerate()
            .map(|(i, node)| (Id::from_raw(i as u32), node))
    }
}

impl<T> Index<Id<T>> for SpannedArena<T> {
    type Output = T;
    fn index(&self, id: Id<T>) -> &T {
        self.get(id)
    }
}

impl<T> IndexMut<Id<T>> for SpannedArena<T> {
    fn index_mut(&mut self, id: Id<T>) -> &mut T {
        self.get_mut(id)
    }
}

// =============================================================================
// Node handles
// =============================================================================

pub type IdentId = Id<Ident>;
pub type ExprId = Id<Expr>;
pub type StmtId = Id<Stmt>;
pub type DeclId = Id<Decl>;
pub type SpecId = Id<Spec>;
pub type FieldId = Id<Field>;
pub type ClauseId = Id<CaseClause>;
pub type ObjectId = Id<Object>;
pub type ScopeId = Id<Scope>;

// =============================================================================
// Centralized list storage
// =============================================================================

#[derive(Debug, Default)]
pub struct ExtraData {
    pub idents: Vec<IdentId>,
    pub exprs: Vec<ExprId>,
    pub stmts: Vec<StmtId>,
    pub decls: Vec<DeclId>,
    pub specs: Vec<SpecId>,
    pub fields: Vec<FieldId>,
    pub clauses: Vec<ClauseId>,
}

/// Every node, object and scope of one file.
#[derive(Debug, Default)]
pub struct Ast {
    pub idents: SpannedArena<Ident>,
    pub exprs: SpannedArena<Expr>,
    pub stmts: SpannedArena<Stmt>,
    pub decls: SpannedArena<Decl>,
    pub specs: SpannedArena<Spec>,
    pub fields: SpannedArena<Field>,
    pub clauses: SpannedArena<CaseClause>,
    pub objects: SpannedArena<Object>,
    pub scopes: Scopes,
    pub extras: ExtraData,
    pub interner: Interner,
}

impl Ast {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    fn push_list<T>(buf: &mut Vec<T>, items: impl IntoIterator<Item = T>) -> ListRef<T> {
        let start = buf.len();
        buf.extend(items);
        let len = buf.len() - start;
        debug_assert!(start <= u32::MAX as usize);
        debug_assert!(len <= u32::MAX as usize);
        ListRef::new(start as u32, len as u32)
    }

    #[inline]
    fn slice<T>(buf: &[T], r: ListRef<T>) -> &[T] {
        &buf[r.start() as usize..r.end() as usize]
    }

    // List builders

    pub fn list_idents(&mut self, i: impl IntoIterator<Item = IdentId>) -> ListRef<IdentId> {
        Self::push_list(&mut self.extras.idents, i)
    }

    pub fn list_exprs(&mut self, i: impl IntoIterator<Item = ExprId>) -> ListRef<ExprId> {
        Self::push_list(&mut self.extras.exprs, i)
    }

    pub fn list_stmts(&mut self, i: impl IntoIterator<Item = StmtId>) -> ListRef<StmtId> {
        Self::push_list(&mut self.extras.stmts, i)
    }

    pub fn list_decls(&mut self, i: impl IntoIterator<Item = DeclId>) -> ListRef<DeclId> {
        Self::push_list(&mut self.extras.decls, i)
    }

    pub fn list_specs(&mut self, i: impl IntoIterator<Item = SpecId>) -> ListRef<SpecId> {
        Self::push_list(&mut self.extras.specs, i)
    }

    pub fn list_fields(&mut self, i: impl IntoIterator<Item = FieldId>) -> ListRef<FieldId> {
        Self::push_list(&mut self.extras.fields, i)
    }

    pub fn list_clauses(&mut self, i: impl IntoIterator<Item = ClauseId>) -> ListRef<ClauseId> {
        Self::push_list(&mut self.extras.clauses, i)
    }

    // List accessors

    pub fn idents_list(&self, r: ListRef<IdentId>) -> &[IdentId] {
        Self::slice(&self.extras.idents, r)
    }

    pub fn exprs_list(&self, r: ListRef<ExprId>) -> &[ExprId] {
        Self::slice(&self.extras.exprs, r)
    }

    pub fn stmts_list(&self, r: ListRef<StmtId>) -> &[StmtId] {
        Self::slice(&self.extras.stmts, r)
    }

    pub fn decls_list(&self, r: ListRef<DeclId>) -> &[DeclId] {
        Self::slice(&self.extras.decls, r)
    }

    pub fn specs_list(&self, r: ListRef<SpecId>) -> &[SpecId] {
        Self::slice(&self.extras.specs, r)
    }

    pub fn fields_list(&self, r: ListRef<FieldId>) -> &[FieldId] {
        Self::slice(&self.extras.fields, r)
    }

    pub fn clauses_list(&self, r: ListRef<ClauseId>) -> &[ClauseId] {
        Self::slice(&self.extras.clauses, r)
    }

    // Convenience

    /// Source text of an interned symbol.
    #[inline]
    pub fn str(&self, sym: Symbol) -> &str {
        self.interner.resolve(sym)
    }

    #[inline]
    pub fn ident_name(&self, id: IdentId) -> &str {
        self.str(self.idents[id].name)
    }

    /// The identifier node behind an `Expr::Ident`.
    pub fn expr_ident(&self, x: ExprId) -> Option<IdentId> {
        match self.exprs[x] {
            Expr::Ident(id) => Some(id),
            _ => None,
        }
    }

    /// Whether keys of a composite literal of type `typ` name struct fields.
    /// `None` while a named type is still unbound or declared outside the
    /// file. Named types are followed through their type specs.
    pub fn literal_has_fields(&self, mut typ: ExprId) -> Option<bool> {
        const MAX_TYPE_HOPS: usize = 16;
        for _ in 0..MAX_TYPE_HOPS {
            let id = match self.exprs[typ] {
                Expr::Type(TypeExpr::Struct { .. }) => return Some(true),
                Expr::Type(_) => return Some(false),
                Expr::Ident(id) => id,
                _ => return None,
            };
            let object = &self.objects[self.idents[id].obj?];
            if object.kind != ObjKind::Type {
                return Some(false);
            }
            typ = match object.decl {
                // A spec still being parsed has no node yet.
                DeclRef::Spec(spec) if spec.to_usize() < self.specs.len() => match self.specs[spec] {
                    Spec::Type(ts) => ts.typ,
                    _ => return Some(false),
                },
                DeclRef::Predeclared => return Some(false),
                _ => return None,
            };
        }
        None
    }

    /// Sets the auxiliary slot later stages use (storage offsets and the like).
    pub fn set_object_data(&mut self, obj: ObjectId, data: i64) {
        self.objects[obj].data = Some(data);
    }
}

// =============================================================================
// Identifiers
// =============================================================================

/// One identifier occurrence. `obj` is filled in by resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ident {
    pub name: Symbol,
    pub obj: Option<ObjectId>,
}

// =============================================================================
// File
// =============================================================================

/// A bare composite-literal key whose literal type was not yet known where
/// the literal appeared.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingKey {
    pub key: IdentId,
    pub typ: ExprId,
    /// Binding the open scope chain held for the key's name at the literal.
    pub candidate: Option<ObjectId>,
}

/// A parsed file. Owns its tree, objects and scopes.
#[derive(Debug)]
pub struct File {
    /// Package name from the package clause.
    pub name: IdentId,
    pub package_pos: Span,
    pub imports: ListRef<SpecId>,
    pub decls: ListRef<DeclId>,
    /// Package scope holding every top-level declaration.
    pub scope: ScopeId,
    /// Identifiers no scope could bind, in source order.
    pub unresolved: Vec<IdentId>,
    /// Literal keys waiting for their literal type. After the deferred pass
    /// only keys of imported or undeclared types remain.
    pub pending_keys: Vec<PendingKey>,
    pub ast: Ast,
}

impl File {
    pub fn package_name(&self) -> &str {
        self.ast.ident_name(self.name)
    }

    pub fn imports(&self) -> &[SpecId] {
        self.ast.specs_list(self.imports)
    }

    pub fn decls(&self) -> &[DeclId] {
        self.ast.decls_list(self.decls)
    }

    /// Looks a name up in the package scope.
    pub fn lookup(&self, name: &str) -> Option<ObjectId> {
        let sym = self.ast.interner.get(name)?;
        self.ast.scopes.lookup(self.scope, sym)
    }

    /// Distinct unresolved names, in order of first occurrence.
    pub fn unresolved_names(&self) -> Vec<&str> {
        let mut seen = std::collections::HashSet::new();
        self.unresolved
            .iter()
            .map(|&id| self.ast.idents[id].name)
            .filter(|sym| seen.insert(*sym))
            .map(|sym| self.ast.str(sym))
            .collect()
    }
}

// =============================================================================
// Declarations
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, WalkAst)]
pub enum Decl {
    Gen(GenDecl),
    Func(FuncDecl),
}

/// `var`, `const` or `type`, one spec or a parenthesized group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, WalkAst)]
pub struct GenDecl {
    pub kind: GenKind,
    pub specs: ListRef<SpecId>,
    pub grouped: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenKind {
    Const,
    Var,
    Type,
}

impl GenKind {
    pub fn keyword(self) -> &'static str {
        match self {
            GenKind::Const => "const",
            GenKind::Var => "var",
            GenKind::Type => "type",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, WalkAst)]
pub struct FuncDecl {
    /// Receiver list; present for methods.
    pub recv: Option<ListRef<FieldId>>,
    pub name: IdentId,
    pub typ: FuncType,
    pub body: Option<Block>,
    /// Scope shared by receiver, parameters, results and body.
    pub scope: ScopeId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, WalkAst)]
pub enum Spec {
    Import(ImportSpec),
    Value(ValueSpec),
    Type(TypeSpec),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, WalkAst)]
pub struct ImportSpec {
    pub path: BasicLit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, WalkAst)]
pub struct ValueSpec {
    pub name: IdentId,
    pub typ: Option<ExprId>,
    pub value: Option<ExprId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, WalkAst)]
pub struct TypeSpec {
    pub name: IdentId,
    /// `type N = T`
    pub alias: bool,
    pub typ: ExprId,
}

// =============================================================================
// Statements
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, WalkAst)]
pub struct Block {
    pub stmts: ListRef<StmtId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, WalkAst)]
pub enum Stmt {
    Expr(ExprId),
    Decl(DeclId),
    IncDec {
        x: ExprId,
        op: IncDecOp,
    },
    Assign {
        lhs: ListRef<ExprId>,
        op: AssignOp,
        rhs: ListRef<ExprId>,
        /// Right side is a single `Unary { op: Range, .. }`.
        is_range: bool,
    },
    Return {
        results: ListRef<ExprId>,
    },
    Branch(BranchKind),
    Block(Block),
    If {
        init: Option<StmtId>,
        cond: ExprId,
        body: Block,
        /// Another `If` or a `Block`.
        else_: Option<StmtId>,
    },
    Switch {
        init: Option<StmtId>,
        tag: Option<ExprId>,
        clauses: ListRef<ClauseId>,
    },
    TypeSwitch {
        init: Option<StmtId>,
        /// `x.(type)` as an expression statement or `v := x.(type)`.
        assign: StmtId,
        clauses: ListRef<ClauseId>,
    },
    For {
        init: Option<StmtId>,
        cond: Option<ExprId>,
        post: Option<StmtId>,
        body: Block,
    },
    Range {
        key: Option<ExprId>,
        value: Option<ExprId>,
        /// `=` or `:=`; absent for `for range x`.
        op: Option<AssignOp>,
        x: ExprId,
        body: Block,
        /// The header assignment that declared `key`/`value`.
        #[walk(skip)]
        header: Option<StmtId>,
    },
    Go {
        call: ExprId,
    },
    Empty,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, WalkAst)]
pub struct CaseClause {
    /// Empty for `default`.
    pub list: ListRef<ExprId>,
    pub is_default: bool,
    pub body: ListRef<StmtId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BranchKind {
    Break,
    Continue,
}

// =============================================================================
// Expressions
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, WalkAst)]
pub enum Expr {
    Ident(IdentId),
    BasicLit(BasicLit),
    CompositeLit {
        typ: ExprId,
        elts: ListRef<ExprId>,
    },
    KeyValue {
        key: ExprId,
        value: ExprId,
    },
    Paren {
        x: ExprId,
    },
    Selector {
        x: ExprId,
        sel: IdentId,
    },
    Index {
        x: ExprId,
        index: ExprId,
    },
    Slice {
        x: ExprId,
        low: Option<ExprId>,
        high: Option<ExprId>,
        max: Option<ExprId>,
        slice3: bool,
    },
    /// `x.(T)`; `typ` is absent for `x.(type)`.
    TypeAssert {
        x: ExprId,
        typ: Option<ExprId>,
    },
    Call {
        fun: ExprId,
        args: ListRef<ExprId>,
        /// Position of a trailing `...` spread.
        ellipsis: Option<Span>,
    },
    /// Dereference or pointer type.
    Star {
        x: ExprId,
    },
    Unary {
        op: UnaryOp,
        x: ExprId,
    },
    Binary {
        x: ExprId,
        op: BinaryOp,
        y: ExprId,
    },
    Type(TypeExpr),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BasicLit {
    pub kind: LitKind,
    /// Literal text as written, quotes included.
    pub value: Symbol,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LitKind {
    Int,
    Char,
    String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, WalkAst)]
pub enum TypeExpr {
    /// `[N]T`, or `[]T` when `len` is absent.
    Array {
        len: Option<ExprId>,
        elt: ExprId,
    },
    Struct {
        fields: ListRef<FieldId>,
        /// Field scope; its outer is always absent.
        scope: ScopeId,
    },
    Map {
        key: ExprId,
        value: ExprId,
    },
    Interface {
        methods: ListRef<FieldId>,
    },
    Func(FuncType),
    /// Variadic parameter type `...T`.
    Ellipsis {
        elt: ExprId,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, WalkAst)]
pub struct FuncType {
    pub params: ListRef<FieldId>,
    /// Absent when the function has no result.
    pub results: Option<ListRef<FieldId>>,
}

/// Parameter, result, receiver, struct field or interface method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, WalkAst)]
pub struct Field {
    /// Empty for anonymous parameters.
    pub names: ListRef<IdentId>,
    pub typ: ExprId,
}

// =============================================================================
// Operators
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Add,   // +
    Sub,   // -
    Not,   // !
    Addr,  // &
    Range, // range x
}

impl UnaryOp {
    pub fn as_str(self) -> &'static str {
        match self {
            UnaryOp::Add => "+",
            UnaryOp::Sub => "-",
            UnaryOp::Not => "!",
            UnaryOp::Addr => "&",
            UnaryOp::Range => "range",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,    // +
    Sub,    // -
    Mul,    // *
    Div,    // /
    Mod,    // %
    And,    // &
    Or,     // |
    Xor,    // ^
    Shl,    // <<
    Shr,    // >>
    AndNot, // &^
    LAnd,   // &&
    LOr,    // ||
    Eq,     // ==
    Ne,     // !=
    Lt,     // <
    Le,     // <=
    Gt,     // >
    Ge,     // >=
}

impl BinaryOp {
    /// Binding strength; higher binds tighter.
    pub fn precedence(self) -> u8 {
        match self {
            BinaryOp::Mul
            | BinaryOp::Div
            | BinaryOp::Mod
            | BinaryOp::And
            | BinaryOp::Shl
            | BinaryOp::Shr
            | BinaryOp::AndNot => 5,
            BinaryOp::Add | BinaryOp::Sub | BinaryOp::Or | BinaryOp::Xor => 4,
            BinaryOp::Eq
            | BinaryOp::Ne
            | BinaryOp::Lt
            | BinaryOp::Le
            | BinaryOp::Gt
            | BinaryOp::Ge => 3,
            BinaryOp::LAnd => 2,
            BinaryOp::LOr => 1,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Mod => "%",
            BinaryOp::And => "&",
            BinaryOp::Or => "|",
            BinaryOp::Xor => "^",
            BinaryOp::Shl => "<<",
            BinaryOp::Shr => ">>",
            BinaryOp::AndNot => "&^",
            BinaryOp::LAnd => "&&",
            BinaryOp::LOr => "||",
            BinaryOp::Eq => "==",
            BinaryOp::Ne => "!=",
            BinaryOp::Lt => "<",
            BinaryOp::Le => "<=",
            BinaryOp::Gt => ">",
            BinaryOp::Ge => ">=",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignOp {
    Assign,       // =
    Define,       // :=
    AddAssign,    // +=
    SubAssign,    // -=
    MulAssign,    // *=
    DivAssign,    // /=
    ModAssign,    // %=
    AndAssign,    // &=
    OrAssign,     // |=
    XorAssign,    // ^=
    ShlAssign,    // <<=
    ShrAssign,    // >>=
    AndNotAssign, // &^=
}

impl AssignOp {
    pub fn as_str(self) -> &'static str {
        match self {
            AssignOp::Assign => "=",
            AssignOp::Define => ":=",
            AssignOp::AddAssign => "+=",
            AssignOp::SubAssign => "-=",
            AssignOp::MulAssign => "*=",
            AssignOp::DivAssign => "/=",
            AssignOp::ModAssign => "%=",
            AssignOp::AndAssign => "&=",
            AssignOp::OrAssign => "|=",
            AssignOp::XorAssign => "^=",
            AssignOp::ShlAssign => "<<=",
            AssignOp::ShrAssign => ">>=",
            AssignOp::AndNotAssign => "&^=",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IncDecOp {
    Inc, // ++
    Dec, // --
}
