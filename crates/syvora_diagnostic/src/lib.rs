//! Error reporting shared by every stage of the compiler.

pub mod sources;
pub mod span;

use std::io;

pub use termcolor;
use termcolor::{Color, ColorSpec, WriteColor};

pub use self::sources::{Excerpt, SourceFile};
pub use self::span::Span;

#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub message: String,
    pub location: Option<Location>,
    pub excerpt: Option<Excerpt>,
}

impl Diagnostic {
    pub fn new(kind: DiagnosticKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            location: None,
            excerpt: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(DiagnosticKind::Error, message)
    }

    #[must_use]
    pub fn with_location(mut self, location: Location) -> Self {
        self.location = Some(location);
        self
    }

    #[must_use]
    pub fn with_excerpt(mut self, excerpt: Excerpt) -> Self {
        self.excerpt = Some(excerpt);
        self
    }

    /// Attach the location and excerpt of `span` within `source`.
    #[must_use]
    pub fn with_span(self, source: &SourceFile, span: Span) -> Self {
        match source.byte_to_line_col(span.start) {
            Some((line, column)) => self
                .with_location(Location {
                    file: source.name().to_owned(),
                    line,
                    column,
                })
                .with_excerpt(source.excerpt(line, column)),
            None => self,
        }
    }

    pub fn write_to_stream(&self, config: &Config, stream: &mut impl WriteColor) -> io::Result<()> {
        let color = match self.kind {
            DiagnosticKind::Error => &config.error_color,
            DiagnosticKind::Warning => &config.warning_color,
        };

        stream.set_color(color)?;
        write!(stream, "{}:", self.kind.as_str())?;
        stream.reset()?;

        stream.set_color(&config.emphasis)?;
        writeln!(stream, " {}", self.message)?;
        stream.reset()?;

        if let Some(location) = &self.location {
            stream.set_color(&config.subtle)?;
            writeln!(
                stream,
                "In {}:{}:{}",
                location.file, location.line, location.column
            )?;
            stream.reset()?;
        }

        if let Some(excerpt) = &self.excerpt {
            writeln!(stream, "{} {}", config.gutter, excerpt.line)?;

            write!(stream, "{} ", config.gutter)?;
            stream.set_color(color)?;
            writeln!(stream, "{:offset$}^", "", offset = excerpt.caret_offset)?;
            stream.reset()?;
        }

        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum DiagnosticKind {
    Warning,
    Error,
}

impl DiagnosticKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Warning => "warning",
            Self::Error => "error",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    pub file: String,
    pub line: usize,
    pub column: usize,
}

#[derive(Debug)]
pub struct Config {
    pub error_color: ColorSpec,
    pub warning_color: ColorSpec,

    pub emphasis: ColorSpec,
    pub subtle: ColorSpec,

    pub gutter: &'static str,
}

impl Default for Config {
    fn default() -> Self {
        let mut error_color = ColorSpec::new();
        error_color.set_fg(Some(Color::Red));
        error_color.set_bold(true);

        let mut warning_color = ColorSpec::new();
        warning_color.set_fg(Some(Color::Yellow));
        warning_color.set_bold(true);

        let mut subtle = ColorSpec::new();
        subtle.set_italic(true);
        subtle.set_dimmed(true);

        let mut emphasis = ColorSpec::new();
        emphasis.set_bold(true);

        Self {
            error_color,
            warning_color,
            emphasis,
            subtle,

            gutter: "│",
        }
    }
}
