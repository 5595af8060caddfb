use std::fmt::Display;

use thiserror::Error;
use tracing::debug;

use crate::ast::ast::SourceFile;

use super::{
    context::{Context, Options},
    declarations::build_declarations,
    resolver::resolve_source_file,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Declarations,
    Resolution,
}

impl Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Stage::Declarations => write!(f, "declarations"),
            Stage::Resolution => write!(f, "resolution"),
        }
    }
}

/// A stage finished with errors; later stages were not run.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("* Compilation halted -- there were {errors} errors")]
pub struct CompilationHalted {
    pub stage: Stage,
    pub errors: usize,
}

fn check_errors(ctx: &Context, stage: Stage) -> Result<(), CompilationHalted> {
    let errors = ctx.diagnostics.error_count();
    debug!(%stage, errors, "stage finished");

    if ctx.diagnostics.has_errors() {
        return Err(CompilationHalted { stage, errors });
    }
    Ok(())
}

fn run(ctx: &mut Context, file: &SourceFile) -> Result<(), CompilationHalted> {
    build_declarations(ctx, file);
    check_errors(ctx, Stage::Declarations)?;

    resolve_source_file(ctx, file);
    check_errors(ctx, Stage::Resolution)
}

/// Runs both passes over `file`. The context is handed back either way so
/// the caller can read diagnostics, listings and node types.
pub fn type_check(file: &SourceFile, options: Options) -> (Context, Option<CompilationHalted>) {
    let mut ctx = Context::new(options);
    let halted = run(&mut ctx, file).err();

    (ctx, halted)
}
