use crate::error::{Diag, LexError, LexErrorKind, Span};
use logos::{Lexer as LogosLexer, Logos};
use std::fmt;
use std::ops::Range;

// =============================================================================
// 1. Shared helpers
// =============================================================================

#[inline(always)]
const fn has_newline(s: &str) -> bool {
    let bytes = s.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if matches!(bytes[i], b'\n' | b'\r') {
            return true;
        }
        i += 1;
    }
    false
}

#[inline(always)]
const fn is_hex_digit(b: u8) -> bool {
    b.is_ascii_hexdigit()
}

#[inline(always)]
const fn is_octal_digit(b: u8) -> bool {
    matches!(b, b'0'..=b'7')
}

#[inline]
fn lex_block_comment(lex: &mut LogosLexer<'_, RawTok>) -> Result<(), LexErrorKind> {
    let rem = lex.remainder().as_bytes();
    match memchr::memmem::find(rem, b"*/") {
        Some(pos) => {
            lex.bump(pos + 2);
            Ok(())
        }
        None => {
            lex.bump(rem.len());
            Err(LexErrorKind::UnterminatedComment)
        }
    }
}

// =============================================================================
// 2. Escape validation for interpreted strings and char literals
// =============================================================================

mod esc {
    use super::*;

    /// Validates one escape starting at the byte after `\`. Returns the index
    /// just past the escape.
    fn escape(body: &[u8], at: usize, quote: u8) -> Result<usize, LexErrorKind> {
        let Some(&c) = body.get(at) else {
            return Err(LexErrorKind::InvalidEscape);
        };
        let hex = |n: usize| -> Result<usize, LexErrorKind> {
            let digits = body
                .get(at + 1..at + 1 + n)
                .ok_or(LexErrorKind::InvalidEscape)?;
            if !digits.iter().all(|&b| is_hex_digit(b)) {
                return Err(LexErrorKind::InvalidEscape);
            }
            let value = digits
                .iter()
                .fold(0u32, |acc, &b| (acc << 4) | (b as char).to_digit(16).unwrap_or(0));
            if n > 2 && char::from_u32(value).is_none() {
                return Err(LexErrorKind::InvalidEscape);
            }
            Ok(at + 1 + n)
        };
        match c {
            b'a' | b'b' | b'f' | b'n' | b'r' | b't' | b'v' | b'\\' => Ok(at + 1),
            b'x' => hex(2),
            b'u' => hex(4),
            b'U' => hex(8),
            b'0'..=b'7' => {
                let digits = body
                    .get(at..at + 3)
                    .ok_or(LexErrorKind::InvalidEscape)?;
                if !digits.iter().all(|&b| is_octal_digit(b)) {
                    return Err(LexErrorKind::InvalidEscape);
                }
                let value = digits
                    .iter()
                    .fold(0u32, |acc, &b| (acc << 3) | u32::from(b - b'0'));
                if value > 255 {
                    return Err(LexErrorKind::InvalidEscape);
                }
                Ok(at + 3)
            }
            c if c == quote => Ok(at + 1),
            _ => Err(LexErrorKind::InvalidEscape),
        }
    }

    pub fn validate_string(lex: &mut LogosLexer<'_, RawTok>) -> Result<(), LexErrorKind> {
        let slice = lex.slice().as_bytes();
        let body = &slice[1..slice.len() - 1];
        let mut i = 0;
        while let Some(off) = memchr::memchr(b'\\', &body[i..]) {
            i = escape(body, i + off + 1, b'"')?;
        }
        Ok(())
    }

    pub fn validate_char(lex: &mut LogosLexer<'_, RawTok>) -> Result<(), LexErrorKind> {
        let slice = lex.slice();
        let body = &slice[1..slice.len() - 1];
        let bytes = body.as_bytes();
        if bytes.first() == Some(&b'\\') {
            return if escape(bytes, 1, b'\'')? == bytes.len() {
                Ok(())
            } else {
                Err(LexErrorKind::InvalidChar)
            };
        }
        if body.chars().count() == 1 {
            Ok(())
        } else {
            Err(LexErrorKind::InvalidChar)
        }
    }
}

// =============================================================================
// 3. Raw tokens (logos DFA)
// =============================================================================

#[repr(u8)]
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(error = LexErrorKind)]
#[logos(skip r"[ \t\f]+")]
#[rustfmt::skip]
enum RawTok {
    #[token("\u{FEFF}")] Bom,

    // Trivia
    #[regex(r"\r\n|\n|\r")] Newline,
    #[regex(r"//[^\n\r]*", allow_greedy = true)] LineComment,
    #[token("/*", lex_block_comment)] BlockComment,

    // Keywords (before Ident)
    #[token("break")] KwBreak,
    #[token("case")] KwCase,
    #[token("chan")] KwChan,
    #[token("const")] KwConst,
    #[token("continue")] KwContinue,
    #[token("default")] KwDefault,
    #[token("defer")] KwDefer,
    #[token("else")] KwElse,
    #[token("fallthrough")] KwFallthrough,
    #[token("for")] KwFor,
    #[token("func")] KwFunc,
    #[token("go")] KwGo,
    #[token("goto")] KwGoto,
    #[token("if")] KwIf,
    #[token("import")] KwImport,
    #[token("interface")] KwInterface,
    #[token("map")] KwMap,
    #[token("package")] KwPackage,
    #[token("range")] KwRange,
    #[token("return")] KwReturn,
    #[token("select")] KwSelect,
    #[token("struct")] KwStruct,
    #[token("switch")] KwSwitch,
    #[token("type")] KwType,
    #[token("var")] KwVar,

    #[regex(r"[_\p{L}][_\p{L}\p{Nd}]*")] Ident,

    // Numbers
    #[regex(r"0[xX][0-9a-fA-F_]+|0[bB][01_]+|0[oO][0-7_]+|[0-9][0-9_]*")] Int,
    #[regex(r"[0-9][0-9_]*\.[0-9_]*([eE][+-]?[0-9]+)?|[0-9][0-9_]*[eE][+-]?[0-9]+|\.[0-9][0-9_]*([eE][+-]?[0-9]+)?")] Float,

    // Strings / chars
    #[regex(r"`[^`]*`")] RawString,
    #[regex(r#""([^"\\\n\r]|\\.)*""#, esc::validate_string)] String,
    #[regex(r"'([^'\\\n\r]|\\.)+'", esc::validate_char)] Char,

    // Operators
    #[token("...")] Ellipsis,
    #[token("<<=")] ShlAssign,
    #[token(">>=")] ShrAssign,
    #[token("&^=")] AndNotAssign,
    #[token("+=")] AddAssign,
    #[token("-=")] SubAssign,
    #[token("*=")] MulAssign,
    #[token("/=")] DivAssign,
    #[token("%=")] ModAssign,
    #[token("&=")] AndAssign,
    #[token("|=")] OrAssign,
    #[token("^=")] XorAssign,
    #[token("<<")] Shl,
    #[token(">>")] Shr,
    #[token("&^")] AndNot,
    #[token("&&")] LAnd,
    #[token("||")] LOr,
    #[token("==")] EqEq,
    #[token("!=")] NotEq,
    #[token("<=")] Le,
    #[token(">=")] Ge,
    #[token("++")] Inc,
    #[token("--")] Dec,
    #[token(":=")] Define,
    #[token("<-")] Arrow,
    #[token("=")] Assign,
    #[token("+")] Plus,
    #[token("-")] Minus,
    #[token("*")] Star,
    #[token("/")] Slash,
    #[token("%")] Percent,
    #[token("&")] Amp,
    #[token("|")] Pipe,
    #[token("^")] Caret,
    #[token("~")] Tilde,
    #[token("!")] Bang,
    #[token("<")] Lt,
    #[token(">")] Gt,

    // Delimiters
    #[token("(")] LParen,
    #[token(")")] RParen,
    #[token("[")] LBrack,
    #[token("]")] RBrack,
    #[token("{")] LBrace,
    #[token("}")] RBrace,
    #[token(",")] Comma,
    #[token(";")] Semi,
    #[token(":")] Colon,
    #[token(".")] Dot,

    // Catch-all (lowest priority)
    #[regex(r".", priority = 0)] Error,
}

// =============================================================================
// 4. Lookup tables
// =============================================================================

macro_rules! gen_lookup_table {
    (bool, $size:expr, $($variant:ident),* $(,)?) => {{
        let mut table = [false; $size];
        $(table[RawTok::$variant as usize] = true;)*
        table
    }};
}

const SEMI_INSERT_TABLE: [bool; 256] = gen_lookup_table!(
    bool,
    256,
    Ident,
    Int,
    Float,
    Char,
    String,
    RawString,
    KwBreak,
    KwContinue,
    KwFallthrough,
    KwReturn,
    Inc,
    Dec,
    RParen,
    RBrack,
    RBrace,
);

impl RawTok {
    #[inline(always)]
    const fn can_insert_semicolon(self) -> bool {
        SEMI_INSERT_TABLE[self as usize]
    }

    #[inline]
    fn to_token(self, slice: &str) -> Tok<'_> {
        macro_rules! simple_tok {
            ($($raw:ident),* $(,)?) => {
                match self {
                    Self::Ident => Tok::Ident(slice),
                    Self::Int => Tok::IntLit(slice),
                    Self::Float => Tok::FloatLit(slice),
                    Self::Char => Tok::CharLit(slice),
                    Self::String => Tok::StringLit(slice),
                    Self::RawString => Tok::RawStringLit(slice),
                    Self::LineComment | Self::BlockComment => Tok::Comment(slice),
                    $(Self::$raw => Tok::$raw,)*
                    // Placement of BOM, newlines and stray bytes is decided by the wrapper.
                    Self::Bom | Self::Newline | Self::Error => Tok::Error(LexErrorKind::InvalidToken),
                }
            };
        }

        simple_tok! {
            KwBreak, KwCase, KwChan, KwConst, KwContinue, KwDefault, KwDefer, KwElse,
            KwFallthrough, KwFor, KwFunc, KwGo, KwGoto, KwIf, KwImport, KwInterface,
            KwMap, KwPackage, KwRange, KwReturn, KwSelect, KwStruct, KwSwitch, KwType, KwVar,

            Ellipsis, ShlAssign, ShrAssign, AndNotAssign, AddAssign, SubAssign, MulAssign,
            DivAssign, ModAssign, AndAssign, OrAssign, XorAssign, Shl, Shr, AndNot, LAnd, LOr,
            EqEq, NotEq, Le, Ge, Inc, Dec, Define, Arrow, Assign, Plus, Minus, Star, Slash,
            Percent, Amp, Pipe, Caret, Tilde, Bang, Lt, Gt,

            LParen, RParen, LBrack, RBrack, LBrace, RBrace, Comma, Semi, Colon, Dot,
        }
    }
}

// =============================================================================
// 5. Public tokens (zero-copy)
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tok<'input> {
    Ident(&'input str),
    IntLit(&'input str),
    FloatLit(&'input str),
    CharLit(&'input str),
    StringLit(&'input str),
    RawStringLit(&'input str),
    Comment(&'input str),

    // Keywords
    KwBreak,
    KwCase,
    KwChan,
    KwConst,
    KwContinue,
    KwDefault,
    KwDefer,
    KwElse,
    KwFallthrough,
    KwFor,
    KwFunc,
    KwGo,
    KwGoto,
    KwIf,
    KwImport,
    KwInterface,
    KwMap,
    KwPackage,
    KwRange,
    KwReturn,
    KwSelect,
    KwStruct,
    KwSwitch,
    KwType,
    KwVar,

    // Operators / Delimiters
    Ellipsis,
    ShlAssign,
    ShrAssign,
    AndNotAssign,
    AddAssign,
    SubAssign,
    MulAssign,
    DivAssign,
    ModAssign,
    AndAssign,
    OrAssign,
    XorAssign,
    Shl,
    Shr,
    AndNot,
    LAnd,
    LOr,
    EqEq,
    NotEq,
    Le,
    Ge,
    Inc,
    Dec,
    Define,
    Arrow,
    Assign,
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Amp,
    Pipe,
    Caret,
    Tilde,
    Bang,
    Lt,
    Gt,
    LParen,
    RParen,
    LBrack,
    RBrack,
    LBrace,
    RBrace,
    Comma,
    Semi,
    Colon,
    Dot,

    Error(LexErrorKind),
    /// Never produced by [`Lexer`]; the parser's stand-in once input runs out.
    Eof,
}

impl Tok<'_> {
    /// Token class as shown in diagnostics.
    pub fn as_str(&self) -> &'static str {
        match self {
            Tok::Ident(_) => "IDENT",
            Tok::IntLit(_) => "INT",
            Tok::FloatLit(_) => "FLOAT",
            Tok::CharLit(_) => "CHAR",
            Tok::StringLit(_) | Tok::RawStringLit(_) => "STRING",
            Tok::Comment(_) => "COMMENT",
            Tok::KwBreak => "break",
            Tok::KwCase => "case",
            Tok::KwChan => "chan",
            Tok::KwConst => "const",
            Tok::KwContinue => "continue",
            Tok::KwDefault => "default",
            Tok::KwDefer => "defer",
            Tok::KwElse => "else",
            Tok::KwFallthrough => "fallthrough",
            Tok::KwFor => "for",
            Tok::KwFunc => "func",
            Tok::KwGo => "go",
            Tok::KwGoto => "goto",
            Tok::KwIf => "if",
            Tok::KwImport => "import",
            Tok::KwInterface => "interface",
            Tok::KwMap => "map",
            Tok::KwPackage => "package",
            Tok::KwRange => "range",
            Tok::KwReturn => "return",
            Tok::KwSelect => "select",
            Tok::KwStruct => "struct",
            Tok::KwSwitch => "switch",
            Tok::KwType => "type",
            Tok::KwVar => "var",
            Tok::Ellipsis => "...",
            Tok::ShlAssign => "<<=",
            Tok::ShrAssign => ">>=",
            Tok::AndNotAssign => "&^=",
            Tok::AddAssign => "+=",
            Tok::SubAssign => "-=",
            Tok::MulAssign => "*=",
            Tok::DivAssign => "/=",
            Tok::ModAssign => "%=",
            Tok::AndAssign => "&=",
            Tok::OrAssign => "|=",
            Tok::XorAssign => "^=",
            Tok::Shl => "<<",
            Tok::Shr => ">>",
            Tok::AndNot => "&^",
            Tok::LAnd => "&&",
            Tok::LOr => "||",
            Tok::EqEq => "==",
            Tok::NotEq => "!=",
            Tok::Le => "<=",
            Tok::Ge => ">=",
            Tok::Inc => "++",
            Tok::Dec => "--",
            Tok::Define => ":=",
            Tok::Arrow => "<-",
            Tok::Assign => "=",
            Tok::Plus => "+",
            Tok::Minus => "-",
            Tok::Star => "*",
            Tok::Slash => "/",
            Tok::Percent => "%",
            Tok::Amp => "&",
            Tok::Pipe => "|",
            Tok::Caret => "^",
            Tok::Tilde => "~",
            Tok::Bang => "!",
            Tok::Lt => "<",
            Tok::Gt => ">",
            Tok::LParen => "(",
            Tok::RParen => ")",
            Tok::LBrack => "[",
            Tok::RBrack => "]",
            Tok::LBrace => "{",
            Tok::RBrace => "}",
            Tok::Comma => ",",
            Tok::Semi => ";",
            Tok::Colon => ":",
            Tok::Dot => ".",
            Tok::Error(_) => "ILLEGAL",
            Tok::Eof => "EOF",
        }
    }

    /// Literal text for identifiers, literals and comments.
    pub fn text(&self) -> Option<&str> {
        match *self {
            Tok::Ident(s)
            | Tok::IntLit(s)
            | Tok::FloatLit(s)
            | Tok::CharLit(s)
            | Tok::StringLit(s)
            | Tok::RawStringLit(s)
            | Tok::Comment(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for Tok<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.text() {
            Some(text) if !matches!(self, Tok::Comment(_)) => write!(f, "{} {}", self.as_str(), text),
            _ => f.write_str(self.as_str()),
        }
    }
}

// =============================================================================
// 6. Lexer wrapper: semicolon insertion + diags
// =============================================================================

pub struct Lexer<'src> {
    logos: LogosLexer<'src, RawTok>,
    pending: Option<(usize, Tok<'src>, usize)>,
    diags: Vec<Diag>,
    last_can_insert_semi: bool,
    src_len: usize,
    eof_done: bool,
}

impl<'src> Lexer<'src> {
    pub fn new(input: &'src str) -> Self {
        Self {
            logos: RawTok::lexer(input),
            pending: None,
            diags: Vec::with_capacity(16),
            last_can_insert_semi: false,
            src_len: input.len(),
            eof_done: false,
        }
    }

    pub fn take_diags(&mut self) -> Vec<Diag> {
        std::mem::take(&mut self.diags)
    }

    #[inline]
    fn push_lex_diag(&mut self, kind: LexErrorKind, span: Range<usize>) {
        let span = Span::from_range(span);
        self.diags.push(LexError { kind, span }.diag());
    }

    #[inline]
    fn emit_semi_at(&mut self, pos: usize) {
        self.pending = Some((pos, Tok::Semi, pos));
    }

    #[inline]
    fn handle_eof(&mut self) {
        self.eof_done = true;
        if self.last_can_insert_semi {
            self.last_can_insert_semi = false;
            self.emit_semi_at(self.src_len);
        }
    }

    #[inline]
    fn error_token(&mut self, kind: LexErrorKind, span: Range<usize>) -> (usize, Tok<'src>, usize) {
        self.push_lex_diag(kind, span.clone());
        self.last_can_insert_semi = false;
        (span.start, Tok::Error(kind), span.end)
    }

    /// `None` means the raw token was trivia and nothing is emitted.
    #[inline]
    fn handle_raw_token(&mut self, raw: RawTok) -> Option<(usize, Tok<'src>, usize)> {
        let span = self.logos.span();
        let slice = self.logos.slice();

        match raw {
            RawTok::Bom if span.start == 0 => None,
            RawTok::Bom | RawTok::Error => Some(self.error_token(LexErrorKind::InvalidToken, span)),
            RawTok::Newline => {
                if self.last_can_insert_semi {
                    self.last_can_insert_semi = false;
                    self.emit_semi_at(span.start);
                }
                None
            }
            RawTok::LineComment => Some((span.start, Tok::Comment(slice), span.end)),
            RawTok::BlockComment => {
                // A multi-line comment acts like a newline.
                if self.last_can_insert_semi && has_newline(slice) {
                    self.last_can_insert_semi = false;
                    self.emit_semi_at(span.end);
                }
                Some((span.start, Tok::Comment(slice), span.end))
            }
            _ => {
                self.last_can_insert_semi = raw.can_insert_semicolon();
                Some((span.start, raw.to_token(slice), span.end))
            }
        }
    }
}

impl<'src> Iterator for Lexer<'src> {
    type Item = (usize, Tok<'src>, usize);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(tok) = self.pending.take() {
                return Some(tok);
            }

            if self.eof_done {
                return None;
            }

            match self.logos.next() {
                None => {
                    // The inserted ';' (if any) goes out on the next turn.
                    self.handle_eof();
                }
                Some(Err(kind)) => {
                    let span = self.logos.span();
                    return Some(self.error_token(kind, span));
                }
                Some(Ok(raw)) => {
                    if let Some(item) = self.handle_raw_token(raw) {
                        return Some(item);
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn toks(src: &str) -> Vec<Tok<'_>> {
        Lexer::new(src).map(|(_, t, _)| t).collect()
    }

    #[test]
    fn keywords_and_idents() {
        assert_eq!(
            toks("package main"),
            vec![Tok::KwPackage, Tok::Ident("main"), Tok::Semi]
        );
    }

    #[test]
    fn escapes_are_validated() {
        assert_eq!(toks(r#""a\n\x41é""#), vec![Tok::StringLit(r#""a\n\x41é""#), Tok::Semi]);
        assert_eq!(toks(r#""\q""#)[0], Tok::Error(LexErrorKind::InvalidEscape));
        assert_eq!(toks(r"'\''")[0], Tok::CharLit(r"'\''"));
        assert_eq!(toks("'ab'")[0], Tok::Error(LexErrorKind::InvalidChar));
        assert_eq!(toks(r"'\400'")[0], Tok::Error(LexErrorKind::InvalidEscape));
    }

    #[test]
    fn display_includes_literal_text() {
        assert_eq!(Tok::Ident("x").to_string(), "IDENT x");
        assert_eq!(Tok::RBrace.to_string(), "}");
        assert_eq!(Tok::Eof.to_string(), "EOF");
    }
}
