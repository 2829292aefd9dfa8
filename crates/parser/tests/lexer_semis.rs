use minigo_parser::lexer::{Lexer, Tok};

fn injected_semis(input: &str) -> Vec<usize> {
    Lexer::new(input)
        .filter_map(|(s, t, e)| (t == Tok::Semi && s == e).then_some(s))
        .collect()
}

fn lex_names(input: &str) -> String {
    Lexer::new(input)
        .map(|(_, t, _)| t.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}

fn check_semi_case(input: &str, want: &str) {
    let got = lex_names(input);
    assert_eq!(got, want, "input=<<{input}>>");
}

/// Tokens after which a newline is swallowed: the statement cannot end there.
#[rustfmt::skip]
const CONTINUATIONS: &[&str] = &[
    "+", "-", "*", "/", "%", "&", "|", "^", "<<", ">>", "&^",
    "+=", "-=", "*=", "/=", "%=", "&=", "|=", "^=", "<<=", ">>=", "&^=",
    "&&", "||", "<-", "==", "!=", "<", "<=", ">", ">=", "=", ":=", "!",
    "...", "(", "[", "{", ",", ".", ":",
    "case", "chan", "const", "default", "defer", "else", "for", "func", "go",
    "goto", "if", "import", "interface", "map", "package", "range", "select",
    "struct", "switch", "type", "var",
];

/// Tokens that end a statement when a newline follows them.
#[rustfmt::skip]
const TERMINATORS: &[(&str, &str)] = &[
    ("foo", "IDENT"), ("123", "INT"), ("1.2", "FLOAT"), ("'x'", "CHAR"),
    ("\"x\"", "STRING"), ("`x`", "STRING"),
    (")", ")"), ("]", "]"), ("}", "}"), ("++", "++"), ("--", "--"),
    ("break", "break"), ("continue", "continue"), ("fallthrough", "fallthrough"),
    ("return", "return"),
];

#[test]
fn newline_after_continuation_is_swallowed() {
    for op in CONTINUATIONS {
        check_semi_case(&format!("{op}\n"), op);
        check_semi_case(&format!("{op}\n\n"), op);
    }
}

#[test]
fn newline_after_terminator_inserts_semi() {
    for (src, name) in TERMINATORS {
        let want = format!("{name} ;");
        check_semi_case(&format!("{src}\n"), &want);
        // End of input acts as a newline.
        check_semi_case(src, &want);
    }
}

#[test]
fn empty_and_bom_inputs() {
    check_semi_case("", "");
    check_semi_case(";", ";");
    check_semi_case(";\n", ";");
    check_semi_case("\u{FEFF};", ";");
}

#[rustfmt::skip]
const DIALECT_LINES: &[(&str, &str)] = &[
    ("for k, v := range xs {\n", "for IDENT , IDENT := range IDENT {"),
    ("for i := 0; i < n; i++ {\n", "for IDENT := INT ; IDENT < IDENT ; IDENT ++ {"),
    ("switch t := x.(type) {\n", "switch IDENT := IDENT . ( type ) {"),
    ("case int, string:\n", "case IDENT , IDENT :"),
    ("v := x.(T)\n", "IDENT := IDENT . ( IDENT ) ;"),
    ("if err != nil {\n\treturn\n}\n", "if IDENT != IDENT { return ; } ;"),
    ("L:\n\tfor {\n\t\tbreak L\n\t}\n", "IDENT : for { break IDENT ; } ;"),
    ("func (r *T) M() {}\n", "func ( IDENT * IDENT ) IDENT ( ) { } ;"),
    ("func f(xs ...int) (n int)\n", "func IDENT ( IDENT ... IDENT ) ( IDENT IDENT ) ;"),
    ("type (\n\tA int\n\tB = A\n)\n", "type ( IDENT IDENT ; IDENT = IDENT ; ) ;"),
    ("import (\n\t\"fmt\"\n\tio \"io\"\n)\n", "import ( STRING ; IDENT STRING ; ) ;"),
    ("var s struct{ x, y int }\n", "var IDENT struct { IDENT , IDENT IDENT } ;"),
    ("m := map[string]int{\n\t\"a\": 1,\n}\n", "IDENT := map [ IDENT ] IDENT { STRING : INT , } ;"),
    ("xs := []int{\n\t1,\n\t2}\n", "IDENT := [ ] IDENT { INT , INT } ;"),
    ("a, b = b, a // swap\n", "IDENT , IDENT = IDENT , IDENT COMMENT ;"),
    ("ch <- v\n", "IDENT <- IDENT ;"),
    ("fallthrough\n}", "fallthrough ; } ;"),
    ("foo/*\n*/", "IDENT COMMENT ;"),
    ("foo    /*comment*/    \n", "IDENT COMMENT ;"),
    (
        "package main\n\nfunc main() {\n\tif {\n\t\treturn /* */ }\n}\n",
        "package IDENT ; func IDENT ( ) { if { return COMMENT } ; } ;",
    ),
];

#[test]
fn dialect_lines() {
    for (input, want) in DIALECT_LINES {
        check_semi_case(input, want);

        // Trailing newlines never change the token stream.
        let mut trimmed = *input;
        while let Some(rest) = trimmed.strip_suffix('\n') {
            trimmed = rest;
            check_semi_case(trimmed, want);
        }
    }
}

#[test]
fn fallthrough_ends_its_clause() {
    let src = "switch x {\ncase 1:\n\tfallthrough\ndefault:\n}";
    let nl = src.find("\ndefault").unwrap();
    assert_eq!(injected_semis(src), vec![nl, src.len()]);
}

#[test]
fn many_semis_mixed() {
    let src = r#"
package p
func f() {
    x := 1
    x++
    if x > 0 {
        return
    } else {
        x--
    }
}
"#;
    // p, 1, x++, return, x--, }, }
    assert_eq!(injected_semis(src).len(), 7);
}

#[test]
fn comment_newline_equivalence() {
    let a = injected_semis("x/*\n*/y");
    let b = injected_semis("x\ny");
    assert_eq!(a.len(), b.len());
}

#[test]
fn semicolon_insertion_windows_newline_crlf() {
    assert_eq!(injected_semis("x\r\ny"), vec![1, 4]);
}

#[test]
fn multiline_block_comment_puts_semi_at_its_end() {
    assert_eq!(injected_semis("x/*\r*/y"), vec![6, 7]);
    assert_eq!(injected_semis("x/*\n*/y"), vec![6, 7]);
}

#[test]
fn block_comment_newline_does_not_insert_after_if() {
    assert_eq!(injected_semis("if/*\n*/x"), vec![8]);
}

#[test]
fn line_comment_at_eof_ok() {
    let src = "x//c";
    assert_eq!(injected_semis(src), vec![src.len()]);
}

#[test]
fn line_comment_before_crlf_ok() {
    let src = "x//c\r\ny";
    let cr_pos = src.find('\r').unwrap();
    assert_eq!(injected_semis(src), vec![cr_pos, src.len()]);
}

#[test]
fn line_comment_before_cr_ok() {
    let src = "x//c\ry";
    let cr_pos = src.find('\r').unwrap();
    assert_eq!(injected_semis(src), vec![cr_pos, src.len()]);
}

#[test]
fn semicolon_insertion_after_break_continue_fallthrough() {
    assert_eq!(injected_semis("break\nx"), vec![5, 7]);
    assert_eq!(injected_semis("continue\nx"), vec![8, 10]);
    assert_eq!(injected_semis("fallthrough\nx"), vec![11, 13]);
}

#[test]
fn semicolon_insertion_after_inc_dec() {
    assert_eq!(injected_semis("x++\ny"), vec![3, 5]);
    assert_eq!(injected_semis("x--\ny"), vec![3, 5]);
}

#[test]
fn no_semi_after_error_token() {
    assert_eq!(lex_names("x @\ny"), "IDENT ILLEGAL IDENT ;");
}

#[test]
fn explicit_semis_are_not_injected() {
    assert!(injected_semis("a; b;").is_empty());
}
