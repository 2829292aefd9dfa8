use minigo_parser::error::{Diag, DiagKind, LexErrorKind, Span};
use minigo_parser::lexer::{Lexer, Tok};

fn lex_all(input: &str) -> (Vec<(usize, Tok<'_>, usize)>, Vec<Diag>) {
    let mut lx = Lexer::new(input);
    let toks: Vec<_> = lx.by_ref().collect();
    let diags = lx.take_diags();
    (toks, diags)
}

fn toks(input: &str) -> Vec<Tok<'_>> {
    let (toks, diags) = lex_all(input);
    assert!(diags.is_empty(), "{input:?} produced diags: {diags:?}");
    toks.into_iter().map(|(_, t, _)| t).collect()
}

fn lex1(input: &str) -> Tok<'_> {
    Lexer::new(input).next().map(|(_, t, _)| t).unwrap_or(Tok::Eof)
}

#[test]
fn golden_declaration() {
    assert_eq!(
        toks("func (s *S) f(x int) []byte { return s.b[x:] }"),
        vec![
            Tok::KwFunc,
            Tok::LParen,
            Tok::Ident("s"),
            Tok::Star,
            Tok::Ident("S"),
            Tok::RParen,
            Tok::Ident("f"),
            Tok::LParen,
            Tok::Ident("x"),
            Tok::Ident("int"),
            Tok::RParen,
            Tok::LBrack,
            Tok::RBrack,
            Tok::Ident("byte"),
            Tok::LBrace,
            Tok::KwReturn,
            Tok::Ident("s"),
            Tok::Dot,
            Tok::Ident("b"),
            Tok::LBrack,
            Tok::Ident("x"),
            Tok::Colon,
            Tok::RBrack,
            Tok::RBrace,
            Tok::Semi,
        ]
    );
}

#[test]
fn operators_take_the_longest_match() {
    let names: Vec<_> = toks("a<<=b&^c...d:=e<-f")
        .iter()
        .map(|t| t.as_str())
        .collect();
    assert_eq!(
        names,
        ["IDENT", "<<=", "IDENT", "&^", "IDENT", "...", "IDENT", ":=", "IDENT", "<-", "IDENT", ";"]
    );
}

#[test]
fn raw_string_basic() {
    assert_eq!(lex1("`abc`"), Tok::RawStringLit("`abc`"));
    // Raw strings may span lines; the semicolon goes after the literal.
    assert_eq!(toks("`a\nb`\n"), vec![Tok::RawStringLit("`a\nb`"), Tok::Semi]);
}

#[test]
fn interpreted_string_escapes_ok() {
    for s in [
        r#""\n""#,
        r#""\t""#,
        r#""\\\"""#,
        r#""\x41""#,
        r#""A""#,
        r#""\U00000041""#,
        r#""\101""#,
    ] {
        assert_eq!(toks(s), vec![Tok::StringLit(s), Tok::Semi], "{s}");
    }
}

#[test]
fn char_literals() {
    for s in ["'a'", r"'\n'", r"'\x41'", r"'A'", r"'\U00000041'", r"'\141'", "'é'"] {
        assert_eq!(toks(s), vec![Tok::CharLit(s), Tok::Semi], "{s}");
    }
}

#[test]
fn bad_literals_are_error_tokens_with_diags() {
    let cases = [
        (r#""\q""#, LexErrorKind::InvalidEscape),
        (r#""\xZZ""#, LexErrorKind::InvalidEscape),
        (r#""\uD800""#, LexErrorKind::InvalidEscape),
        (r"'\400'", LexErrorKind::InvalidEscape),
        ("'ab'", LexErrorKind::InvalidChar),
        (r"'\nx'", LexErrorKind::InvalidChar),
    ];
    for (src, kind) in cases {
        let (toks, diags) = lex_all(src);
        assert_eq!(toks[0].1, Tok::Error(kind), "{src}");
        assert_eq!((toks[0].0, toks[0].2), (0, src.len()), "{src}");
        assert_eq!(diags.len(), 1, "{src}");
        assert_eq!(diags[0].kind, DiagKind::Lex);
        assert_eq!(diags[0].message, kind.to_string());
    }
}

#[test]
fn unterminated_block_comment() {
    let (toks, diags) = lex_all("x /* never closed");
    assert_eq!(
        toks.iter().map(|(_, t, _)| *t).collect::<Vec<_>>(),
        vec![Tok::Ident("x"), Tok::Error(LexErrorKind::UnterminatedComment)]
    );
    assert_eq!(diags.len(), 1);
    assert_eq!(diags[0].span, Span { start: 2, end: 17 });
}

#[test]
fn comments_are_tokens() {
    assert_eq!(
        toks("// head\nx /* mid */ y"),
        vec![
            Tok::Comment("// head"),
            Tok::Ident("x"),
            Tok::Comment("/* mid */"),
            Tok::Ident("y"),
            Tok::Semi,
        ]
    );
    assert_eq!(Tok::Comment("// x").to_string(), "COMMENT");
}

#[test]
fn numbers() {
    for s in ["0", "42", "1_000", "0x1F", "0XdeadBEEF", "0b1010", "0o17"] {
        assert_eq!(toks(s), vec![Tok::IntLit(s), Tok::Semi], "{s}");
    }
    for s in ["1.5", "1.", ".5", "1e9", "2.5E-3"] {
        assert_eq!(toks(s), vec![Tok::FloatLit(s), Tok::Semi], "{s}");
    }
    assert_eq!(Tok::IntLit("42").to_string(), "INT 42");
}

#[test]
fn unicode_identifiers() {
    assert_eq!(toks("αβγ"), vec![Tok::Ident("αβγ"), Tok::Semi]);
    assert_eq!(toks("_x1"), vec![Tok::Ident("_x1"), Tok::Semi]);
    assert_eq!(toks("x١"), vec![Tok::Ident("x١"), Tok::Semi]);
}

#[test]
fn stray_characters_are_errors() {
    let src = "x € y";
    let (toks, diags) = lex_all(src);
    let at = src.find('€').unwrap();
    assert_eq!(toks[1], (at, Tok::Error(LexErrorKind::InvalidToken), at + '€'.len_utf8()));
    assert_eq!(toks[2].1, Tok::Ident("y"));
    assert_eq!(diags.len(), 1);
}

#[test]
fn byte_order_mark_only_at_start() {
    assert_eq!(
        toks("\u{FEFF}package p"),
        vec![Tok::KwPackage, Tok::Ident("p"), Tok::Semi]
    );
    let (toks, diags) = lex_all("a\u{FEFF}b");
    assert_eq!(toks[1].1, Tok::Error(LexErrorKind::InvalidToken));
    assert_eq!(diags.len(), 1);
}

#[test]
fn keywords_are_not_identifiers() {
    assert_eq!(lex1("range"), Tok::KwRange);
    assert_eq!(lex1("ranges"), Tok::Ident("ranges"));
    assert_eq!(lex1("go"), Tok::KwGo);
    assert_eq!(lex1("goto"), Tok::KwGoto);
    assert_eq!(lex1("gox"), Tok::Ident("gox"));
}
