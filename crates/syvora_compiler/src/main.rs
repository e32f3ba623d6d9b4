mod cli;
mod compiler;
mod diagnostics;

#[cfg(test)]
mod tests;

use std::path::Path;
use std::process::ExitCode;

use clap::Parser as _;
use cli::Cli;
use syvora_backend::BackendError;
use syvora_diagnostic::{Diagnostic, SourceFile};
use syvora_frontend::SyntaxError;

use crate::compiler::Compiler;
use crate::diagnostics::{IntoDiagnostic, PrettyDiagnosticEmitter};

#[derive(thiserror::Error, Debug)]
enum CompilerError {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Syntax(#[from] SyntaxError),

    #[error(transparent)]
    Backend(#[from] BackendError),

    #[error("error emitting object: {0}")]
    Object(#[from] syvora_backend::object::write::Error),
}

type CompilerResult<T> = Result<T, CompilerError>;

fn main() -> ExitCode {
    env_logger::init();

    let cli = Cli::parse();

    let Some(input) = cli.input else {
        println!("Usage: syvora <filename>");
        return ExitCode::SUCCESS;
    };

    match run(&input, cli.output.as_deref()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(diagnostic) => {
            let mut emitter = PrettyDiagnosticEmitter::default();
            if let Err(err) = emitter.emit(&diagnostic) {
                eprintln!("failed to emit diagnostic: {err}");
            }
            ExitCode::FAILURE
        }
    }
}

fn run(input: &Path, output: Option<&Path>) -> Result<(), Diagnostic> {
    let text = std::fs::read_to_string(input).map_err(|err| {
        Diagnostic::error(format!("couldn't read {}: {err}", input.display()))
    })?;
    let source = SourceFile::new(input.display().to_string(), text);

    build(&source, output).map_err(|err| err.into_diagnostic(&source))
}

fn build(source: &SourceFile, output: Option<&Path>) -> CompilerResult<()> {
    let compiled = Compiler::default().compile(source)?;

    print!("{}", compiled.ir);

    if let Some(output) = output {
        let object_data = compiled.object.emit()?;
        std::fs::write(output, object_data)?;
        log::debug!("wrote {}", output.display());
    }

    Ok(())
}
