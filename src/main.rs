//! `minigo`: parse dialect source files and report what the resolver saw.

mod dump;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{anyhow, Context, Result};
use clap::{ArgAction, Parser, ValueEnum};
use log::{info, LevelFilter};
use minigo_parser::{
    line_col, parse_file_with, print_file, resolve_universe, ParserConfig, Universe,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Dump {
    /// Indented node outline with bindings.
    Tree,
    /// Every bound identifier and the object it refers to.
    Bindings,
    /// Identifiers left unresolved.
    Unresolved,
    /// Source re-derived from the tree.
    Print,
    /// Nothing; only report success or the error.
    None,
}

#[derive(Debug, Parser)]
#[command(name = "minigo", version, about = "Parse and resolve minigo source files")]
struct Cli {
    /// Source files to parse.
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// What to print for each file.
    #[arg(long, value_enum, default_value_t = Dump::Unresolved)]
    dump: Dump,

    /// Stop after the import declarations.
    #[arg(long)]
    imports_only: bool,

    /// Postfix operators allowed in one primary expression.
    #[arg(long, default_value_t = ParserConfig::default().max_postfix_chain)]
    max_postfix_chain: usize,

    /// Recursion limit for nested expressions, types and statements.
    #[arg(long, default_value_t = ParserConfig::default().max_nesting)]
    max_nesting: usize,

    /// Bind leftovers against builtins and imported package names.
    #[arg(long)]
    universe: bool,

    /// More logging (-v info, -vv debug, -vvv trace). `RUST_LOG` overrides.
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn config(&self) -> ParserConfig {
        let config = ParserConfig::default()
            .with_max_postfix_chain(self.max_postfix_chain)
            .with_max_nesting(self.max_nesting);
        if self.imports_only {
            config.imports_only()
        } else {
            config
        }
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format_timestamp(None)
        .init();
}

fn run_file(cli: &Cli, path: &Path) -> Result<()> {
    let src = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    let name = path.display().to_string();

    let mut file = parse_file_with(&name, &src, cli.config()).map_err(|e| {
        let (line, col) = e.span().map_or((0, 0), |s| line_col(&src, s.start));
        anyhow!("{name}:{line}:{col}: {e}")
    })?;

    if cli.universe {
        let universe = Universe::builtins().with_imports(&file);
        let bound = resolve_universe(&mut file, &universe)
            .with_context(|| format!("resolving {name} against the universe"))?;
        info!("{name}: {bound} identifiers bound to predeclared names");
    }

    let out = match cli.dump {
        Dump::Tree => dump::tree(&file, &src),
        Dump::Bindings => dump::bindings(&file, &src),
        Dump::Unresolved => dump::unresolved(&file, &src),
        Dump::Print => print_file(&file),
        Dump::None => String::new(),
    };
    if cli.files.len() > 1 && cli.dump != Dump::None {
        println!("==> {name} <==");
    }
    print!("{out}");
    info!(
        "{name}: {} decls, {} unresolved",
        file.decls().len(),
        file.unresolved.len()
    );
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut failed = false;
    for path in &cli.files {
        if let Err(e) = run_file(&cli, path) {
            eprintln!("error: {e:#}");
            failed = true;
        }
    }
    if failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
