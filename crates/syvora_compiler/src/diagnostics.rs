use std::io;

use syvora_backend::BackendError;
use syvora_diagnostic::termcolor::{ColorChoice, StandardStream};
use syvora_diagnostic::{Config, Diagnostic, Location, SourceFile};
use syvora_frontend::SyntaxError;

use crate::CompilerError;

pub struct PrettyDiagnosticEmitter {
    pub stream: StandardStream,
    pub config: Config,
}

impl Default for PrettyDiagnosticEmitter {
    fn default() -> Self {
        Self {
            stream: StandardStream::stderr(ColorChoice::Auto),
            config: Config::default(),
        }
    }
}

impl PrettyDiagnosticEmitter {
    pub fn emit(&mut self, diagnostic: &Diagnostic) -> io::Result<()> {
        diagnostic.write_to_stream(&self.config, &mut self.stream)
    }
}

pub trait IntoDiagnostic {
    fn into_diagnostic(self, source: &SourceFile) -> Diagnostic;
}

impl IntoDiagnostic for SyntaxError {
    fn into_diagnostic(self, _source: &SourceFile) -> Diagnostic {
        Diagnostic::error(self.kind.to_string())
            .with_location(Location {
                file: self.file,
                line: self.line,
                column: self.column,
            })
            .with_excerpt(self.excerpt)
    }
}

impl IntoDiagnostic for BackendError {
    fn into_diagnostic(self, source: &SourceFile) -> Diagnostic {
        let span = self.span();
        let diagnostic = Diagnostic::error(self.to_string());

        match span {
            Some(span) => diagnostic.with_span(source, span),
            None => diagnostic,
        }
    }
}

impl IntoDiagnostic for CompilerError {
    fn into_diagnostic(self, source: &SourceFile) -> Diagnostic {
        match self {
            Self::Syntax(err) => err.into_diagnostic(source),
            Self::Backend(err) => err.into_diagnostic(source),
            other => Diagnostic::error(other.to_string()),
        }
    }
}
