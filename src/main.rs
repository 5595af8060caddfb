use std::{
    fs::read_to_string,
    io::{self, Read},
    path::PathBuf,
    process::ExitCode,
    rc::Rc,
    time::Instant,
};

use clap::Parser;
use goo::{
    errors::errors::Error,
    lexer::lexer::tokenize,
    parser::parser::parse,
    render_error,
    type_checker::{context::Options, type_checker::type_check},
};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "goo", version, about = "Checks a Goo source file for semantic errors")]
struct Cli {
    /// Source file to check. Standard input is read when omitted.
    file: Option<PathBuf>,

    /// Trace every symbol table definition
    #[arg(long = "trace-symbols", visible_alias = "dtsy")]
    trace_symbols: bool,

    /// Dump each scope as it is closed
    #[arg(long = "dump-scopes", visible_alias = "dsym")]
    dump_scopes: bool,

    /// Dump the predefined scope
    #[arg(long = "dump-predefined", visible_alias = "dpre")]
    dump_predefined: bool,

    /// Pretty-print the syntax tree
    #[arg(long = "print-tree", visible_alias = "dppt")]
    print_tree: bool,
}

impl Cli {
    fn options(&self) -> Options {
        Options {
            trace_symbols: self.trace_symbols,
            dump_scopes: self.dump_scopes,
            dump_predefined: self.dump_predefined,
            print_tree: self.print_tree,
        }
    }
}

/// Returns the display name and contents of the source.
fn read_source(file: Option<&PathBuf>) -> io::Result<(String, String)> {
    match file {
        Some(path) => {
            let name = path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string());
            Ok((name, read_to_string(path)?))
        }
        None => {
            let mut source = String::new();
            io::stdin().read_to_string(&mut source)?;
            Ok((String::from("<stdin>"), source))
        }
    }
}

fn halt(errors: usize) -> ExitCode {
    eprintln!("* Compilation halted -- there were {} errors", errors);
    ExitCode::FAILURE
}

fn syntax_error(error: &Error, source: &str) -> ExitCode {
    eprint!("{}", render_error(error, source));
    eprintln!("{}", error);
    halt(1)
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let options = cli.options();

    let (file_name, source) = match read_source(cli.file.as_ref()) {
        Ok(source) => source,
        Err(error) => {
            eprintln!("Error: cannot read source: {}", error);
            return ExitCode::FAILURE;
        }
    };

    let start = Instant::now();

    let tokens = match tokenize(source.clone(), Some(file_name.clone())) {
        Ok(tokens) => tokens,
        Err(error) => return syntax_error(&error, &source),
    };
    debug!(tokens = tokens.len(), elapsed = ?start.elapsed(), "tokenized");

    let (_, parsed) = parse(tokens, Rc::new(file_name));
    let file = match parsed {
        Ok(file) => file,
        Err(error) => return syntax_error(&error, &source),
    };
    debug!(elapsed = ?start.elapsed(), "parsed");

    if options.print_tree {
        println!("{:#?}", file);
    }

    let (ctx, halted) = type_check(&file, options);
    debug!(elapsed = ?start.elapsed(), "type checked");

    for line in &ctx.listing {
        println!("{}", line);
    }
    for error in ctx.diagnostics.errors() {
        eprintln!("{}", error);
    }

    match halted {
        Some(halted) => halt(halted.errors),
        None => ExitCode::SUCCESS,
    }
}
