use cranelift::codegen::ir::{types, Type};
use syvora_frontend::ast::AccessibleTypeExpression;

use crate::{BackendError, BackendResult};

/// The source-level scalar types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarType {
    Int,
    Float,
    Bool,
}

impl ScalarType {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "Int" => Some(Self::Int),
            "Float" => Some(Self::Float),
            "Bool" => Some(Self::Bool),
            _ => None,
        }
    }

    /// Cranelift has no 1-bit type, booleans live in a byte.
    pub fn clif_type(self) -> Type {
        match self {
            Self::Int => types::I64,
            Self::Float => types::F64,
            Self::Bool => types::I8,
        }
    }
}

/// Only unchained paths naming one of the scalar types resolve.
pub fn resolve_type(ty: &AccessibleTypeExpression) -> BackendResult<ScalarType> {
    ty.child
        .is_none()
        .then(|| ScalarType::from_name(&ty.name))
        .flatten()
        .ok_or_else(|| BackendError::UnknownType {
            name: ty.to_string(),
            span: ty.span,
        })
}
