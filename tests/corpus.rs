use std::path::{Path, PathBuf};

use minigo_parser::{line_col, parse_file, print_file, resolve_universe, Universe};
use walkdir::WalkDir;

fn go_files(root: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(root)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .filter(|p| p.extension().and_then(|e| e.to_str()) == Some("go"))
        .collect();
    files.sort();
    files
}

/// Parse, print and re-parse; returns how many names the universe left over.
fn check_file(path: &Path) -> usize {
    let src = std::fs::read_to_string(path)
        .unwrap_or_else(|e| panic!("reading {}: {e}", path.display()));
    let name = path.display().to_string();

    let mut file = parse_file(&name, &src).unwrap_or_else(|e| {
        let (line, col) = e.span().map_or((0, 0), |s| line_col(&src, s.start));
        panic!("{name}:{line}:{col}: {e}");
    });

    let printed = print_file(&file);
    let again = parse_file(&name, &printed)
        .unwrap_or_else(|e| panic!("printed {name} does not parse: {e}\n{printed}"));
    assert_eq!(print_file(&again), printed, "{name}: printer is not a fixed point");
    assert_eq!(file.unresolved_names(), again.unresolved_names(), "{name}");

    let universe = Universe::builtins().with_imports(&file);
    resolve_universe(&mut file, &universe).unwrap_or_else(|e| panic!("{name}: {e}"));
    file.unresolved.len()
}

#[test]
fn testdata_programs_parse_and_resolve() {
    let root = Path::new(env!("CARGO_MANIFEST_DIR")).join("testdata");
    let files = go_files(&root);
    assert!(files.len() >= 3, "testdata has {} programs", files.len());

    for path in &files {
        // Every name in the fixtures is declared locally, a builtin or an import.
        assert_eq!(check_file(path), 0, "{} has unresolved names", path.display());
    }
}

#[test]
fn parses_corpus_if_configured() {
    let Some(root) = std::env::var_os("MINIGO_CORPUS") else {
        eprintln!("MINIGO_CORPUS not set; skipping corpus test");
        return;
    };

    let files = go_files(Path::new(&root));
    for path in &files {
        check_file(path);
    }
    eprintln!("Parsed {} files successfully.", files.len());
}
