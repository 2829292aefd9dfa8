use thiserror::Error;

/// Compact byte-span used across the front end.
///
/// Positions are clamped to `u32`; inputs over 4GiB are not supported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    pub start: u32,
    pub end: u32, // exclusive
}

impl Span {
    #[inline]
    pub const fn new(start: usize, end: usize) -> Self {
        Self {
            start: clamp(start),
            end: clamp(end),
        }
    }

    #[inline]
    pub const fn empty_at(pos: usize) -> Self {
        let p = clamp(pos);
        Self { start: p, end: p }
    }

    pub const fn from_range(range: std::ops::Range<usize>) -> Self {
        Self::new(range.start, range.end)
    }

    #[inline]
    pub const fn len(&self) -> u32 {
        self.end.saturating_sub(self.start)
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Smallest span covering both `self` and `other`.
    #[inline]
    pub fn to(self, other: Span) -> Span {
        Span {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }
}

#[inline]
const fn clamp(pos: usize) -> u32 {
    if pos > u32::MAX as usize {
        u32::MAX
    } else {
        pos as u32
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagKind {
    Lex,
    Parse,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diag {
    pub kind: DiagKind,
    pub span: Span,
    pub message: String,
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq, Default)]
pub enum LexErrorKind {
    #[default]
    #[error("invalid token")]
    InvalidToken,
    #[error("invalid escape")]
    InvalidEscape,
    #[error("invalid character literal")]
    InvalidChar,
    #[error("unterminated comment")]
    UnterminatedComment,
}

#[derive(Debug, Error, Clone, PartialEq, Eq, Default)]
#[error("{kind}: {span:?}")]
pub struct LexError {
    pub kind: LexErrorKind,
    pub span: Span,
}

impl LexError {
    #[inline]
    pub fn diag(&self) -> Diag {
        Diag {
            kind: DiagKind::Lex,
            span: self.span,
            message: self.kind.to_string(),
        }
    }
}

/// The single error a parse can end with. Every variant names the grammar
/// rule that gave up.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("{rule}: {expected} expected, got {found}")]
    Syntax {
        rule: &'static str,
        expected: &'static str,
        found: String,
        span: Span,
    },
    #[error("{rule}: unsupported: {what}")]
    Unsupported {
        rule: &'static str,
        what: String,
        span: Span,
    },
    #[error("{rule}: internal error: {what}")]
    Internal { rule: &'static str, what: String },
    #[error("lexer: {kind}")]
    Lex { kind: LexErrorKind, span: Span },
}

impl ParseError {
    pub fn rule(&self) -> &'static str {
        match self {
            ParseError::Syntax { rule, .. }
            | ParseError::Unsupported { rule, .. }
            | ParseError::Internal { rule, .. } => rule,
            ParseError::Lex { .. } => "lexer",
        }
    }

    pub fn span(&self) -> Option<Span> {
        match self {
            ParseError::Syntax { span, .. }
            | ParseError::Unsupported { span, .. }
            | ParseError::Lex { span, .. } => Some(*span),
            ParseError::Internal { .. } => None,
        }
    }

    pub fn diag(&self) -> Diag {
        Diag {
            kind: match self {
                ParseError::Lex { .. } => DiagKind::Lex,
                _ => DiagKind::Parse,
            },
            span: self.span().unwrap_or_default(),
            message: self.to_string(),
        }
    }
}

pub type Result<T, E = ParseError> = std::result::Result<T, E>;

/// 1-based line and column of a byte offset, for reporting.
pub fn line_col(src: &str, offset: u32) -> (usize, usize) {
    let offset = (offset as usize).min(src.len());
    let before = &src.as_bytes()[..offset];
    let line = memchr::memchr_iter(b'\n', before).count() + 1;
    let line_start = memchr::memrchr(b'\n', before).map_or(0, |i| i + 1);
    (line, offset - line_start + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn syntax_error_message_names_rule_and_tokens() {
        let err = ParseError::Syntax {
            rule: "parse_block_stmt",
            expected: "}",
            found: "EOF".into(),
            span: Span::empty_at(10),
        };
        assert_eq!(err.to_string(), "parse_block_stmt: } expected, got EOF");
        assert_eq!(err.diag().kind, DiagKind::Parse);
    }

    #[test]
    fn line_col_counts_from_one() {
        let src = "package p\nfunc f() {}\n";
        assert_eq!(line_col(src, 0), (1, 1));
        assert_eq!(line_col(src, 10), (2, 1));
        assert_eq!(line_col(src, 15), (2, 6));
        assert_eq!(line_col(src, 999).0, 3);
    }
}
