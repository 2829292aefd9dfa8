use std::collections::HashMap;

use minigo_parser::ast::*;
use minigo_parser::walk::{Visitor, Walk};
use minigo_parser::{parse_file, print_file};

/// Node kinds in walk order plus, for every identifier, which object it is
/// bound to (numbered by first appearance).
#[derive(Default)]
struct Shape {
    kinds: Vec<String>,
    objects: HashMap<ObjectId, usize>,
    bindings: Vec<Option<usize>>,
}

fn variant<T: std::fmt::Debug>(node: &T) -> String {
    let s = format!("{node:?}");
    s.split(|c: char| !c.is_alphanumeric()).next().unwrap_or_default().to_owned()
}

impl<'ast> Visitor<'ast> for Shape {
    fn visit_decl(&mut self, a: &'ast Ast, id: DeclId) {
        self.kinds.push(variant(&a.decls[id]));
        a.decls[id].walk(a, self);
    }

    fn visit_spec(&mut self, a: &'ast Ast, id: SpecId) {
        self.kinds.push(variant(&a.specs[id]));
        a.specs[id].walk(a, self);
    }

    fn visit_stmt(&mut self, a: &'ast Ast, id: StmtId) {
        self.kinds.push(variant(&a.stmts[id]));
        a.stmts[id].walk(a, self);
    }

    fn visit_expr(&mut self, a: &'ast Ast, id: ExprId) {
        let kind = match a.exprs[id] {
            Expr::Type(t) => variant(&t),
            e => variant(&e),
        };
        self.kinds.push(kind);
        a.exprs[id].walk(a, self);
    }

    fn visit_ident(&mut self, a: &'ast Ast, id: IdentId) {
        self.kinds.push(a.ident_name(id).to_owned());
        let next = self.objects.len();
        let bound = a.idents[id].obj.map(|o| *self.objects.entry(o).or_insert(next));
        self.bindings.push(bound);
    }
}

fn shape(file: &File) -> Shape {
    let mut s = Shape::default();
    s.visit_file(file);
    s
}

fn assert_round_trip(src: &str) -> String {
    let first = parse_file("a.go", src).unwrap_or_else(|e| panic!("{e}\n{src}"));
    let printed = print_file(&first);
    let second = parse_file("b.go", &printed)
        .unwrap_or_else(|e| panic!("printed form does not parse: {e}\n{printed}"));

    let (a, b) = (shape(&first), shape(&second));
    assert_eq!(a.kinds, b.kinds, "node kinds differ\n{printed}");
    assert_eq!(a.bindings, b.bindings, "bindings differ\n{printed}");
    assert_eq!(first.unresolved_names(), second.unresolved_names());

    // Printing is a fixed point after one round.
    assert_eq!(print_file(&second), printed);
    printed
}

#[test]
fn prints_in_canonical_layout() {
    let printed = assert_round_trip(
        "package p\nfunc f(a int) (int, error) {\n  if a > 0 { return - -a, nil }\n  return 0, nil\n}\n",
    );
    assert_eq!(
        printed,
        "package p\n\nfunc f(a int) (int, error) {\n\tif a > 0 {\n\t\treturn - -a, nil\n\t}\n\treturn 0, nil\n}\n"
    );
}

#[test]
fn grouped_declarations_and_imports() {
    let printed = assert_round_trip(
        "package p\nimport (\n\"fmt\"\n\"os\"\n)\nconst (\nA = iota\nB\n)\nvar x = 1\n",
    );
    assert!(printed.contains("import \"fmt\"\nimport \"os\"\n"));
    assert!(printed.contains("const (\n\tA = iota\n\tB\n)"));
}

#[test]
fn statements_round_trip() {
    assert_round_trip(
        r#"package p

type Node struct { kind int; next *Node; name string }

type Visitor interface {
    Visit(n *Node) bool
    Done()
}

type Alias = Node

func (n *Node) Len() (count int) {
    for cur := n; cur != nil; cur = cur.next {
        count++
    }
    return
}

func walk(nodes []*Node, v Visitor, extra ...int) {
    for i, n := range nodes {
        if i == 0 {
            continue
        } else if ok := v.Visit(n); !ok {
            break
        } else {
            v.Done()
        }
    }
    for range extra {
    }
    var total int
    for total < 10 {
        total += len(extra)
    }
    switch k := nodes[0].kind; k {
    case 1, 2:
        total = k
    default:
    }
    var x interface{} = total
    switch t := x.(type) {
    case int:
        _ = t
    case *Node:
        _ = t.name
    }
    go walk(nodes[1:], v, extra...)
    {
        var m map[string][]int
        m["a"] = append(m["a"], nodes[0].kind)
        _ = nodes[:len(nodes):cap(nodes)]
    }
    ;
    p := &Node{kind: 1, name: "x"}
    q := [2]Node{*p, Node{}}
    _ = (q[0].kind + 1) * -p.kind
    _ = 'c' == 'd' || !(1 < 2) && 3 >= 4
    var f func(int) bool
    _ = f
}
"#,
    );
}

#[test]
fn type_forms_round_trip() {
    assert_round_trip(
        "package p\ntype A [4]int\ntype S struct {}\ntype I interface {}\ntype M map[string]struct { a int }\ntype F func(a int, b string) (int, error)\nvar v = struct { x int }{x: 1}\n",
    );
}
