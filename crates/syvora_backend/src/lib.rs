//! Lowering of the Syvora AST to Cranelift IR.

pub mod builtins;
mod codegen;
pub mod symbols;
pub mod types;

pub use codegen::{check_argument_labels, Codegen, CompiledModule, Symbol};

// Re-exporting here instead of using workspace dependencies
// so that we stay in sync with the version that cranelift uses.
pub use cranelift_object::{object, ObjectProduct};

use syvora_diagnostic::Span;
use syvora_frontend::ast::Module;
use target_lexicon::{Architecture, Triple};

#[derive(thiserror::Error, Debug)]
pub enum BackendError {
    #[error("unsupported architecture: {0}")]
    UnsupportedArch(Architecture),

    #[error(transparent)]
    Settings(#[from] cranelift::codegen::settings::SetError),

    #[error(transparent)]
    Module(#[from] cranelift_module::ModuleError),

    #[error(transparent)]
    Codegen(#[from] cranelift::codegen::CodegenError),

    #[error("unknown type `{name}`")]
    UnknownType { name: String, span: Span },

    #[error("function `{name}` is not defined")]
    FunctionNotDefined {
        name: String,
        low_level_name: String,
        span: Span,
    },

    #[error("argument `{found}` does not match `{expected}`")]
    ArgumentLabelMismatch {
        expected: String,
        found: String,
        span: Span,
    },

    #[error("function `{name}` takes {expected} argument(s) but {found} were given")]
    ArgumentCountMismatch {
        name: String,
        expected: usize,
        found: usize,
        span: Span,
    },

    #[error("function `{name}` declares a return type but has no return expression")]
    MissingReturnExpression { name: String, span: Span },

    #[error("function `{name}` has a return expression but declares no return type")]
    UnexpectedReturnExpression { name: String, span: Span },

    #[error("`{name}` is not defined")]
    VariableNotDefined { name: String, span: Span },

    #[error("`{name}` is a function, not a value")]
    NotAValue { name: String, span: Span },

    #[error("expression does not produce a value")]
    VoidValue { span: Span },

    #[error("mismatched operand types `{lhs}` and `{rhs}` for `{op}`")]
    OperandTypeMismatch {
        op: &'static str,
        lhs: String,
        rhs: String,
        span: Span,
    },

    #[error("operator `{op}` is not supported for `{ty}`")]
    UnsupportedOperator {
        op: &'static str,
        ty: String,
        span: Span,
    },

    #[error("{feature} are not yet supported")]
    NotYetSupported { feature: &'static str, span: Span },
}

impl BackendError {
    /// Source location of semantic errors.
    pub fn span(&self) -> Option<Span> {
        match self {
            Self::UnsupportedArch(_) | Self::Settings(_) | Self::Module(_) | Self::Codegen(_) => {
                None
            }

            Self::UnknownType { span, .. }
            | Self::FunctionNotDefined { span, .. }
            | Self::ArgumentLabelMismatch { span, .. }
            | Self::ArgumentCountMismatch { span, .. }
            | Self::MissingReturnExpression { span, .. }
            | Self::UnexpectedReturnExpression { span, .. }
            | Self::VariableNotDefined { span, .. }
            | Self::NotAValue { span, .. }
            | Self::VoidValue { span }
            | Self::OperandTypeMismatch { span, .. }
            | Self::UnsupportedOperator { span, .. }
            | Self::NotYetSupported { span, .. } => Some(*span),
        }
    }
}

pub type BackendResult<T> = Result<T, BackendError>;

/// Generate a whole module for `target`.
pub fn compile(module: &Module, target: Triple, name: &str) -> BackendResult<CompiledModule> {
    let mut codegen = Codegen::new(target, name)?;
    codegen.compile_module(module)?;
    Ok(codegen.finish())
}

#[cfg(test)]
mod tests;
