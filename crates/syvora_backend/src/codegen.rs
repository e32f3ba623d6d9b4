use std::borrow::Cow;

use cranelift::codegen::ir::{StackSlot, UserFuncName};
use cranelift::codegen::{verify_function, CodegenError};
use cranelift::prelude::*;
use cranelift_module::{FuncId, Linkage, Module as _};
use cranelift_object::{ObjectBuilder, ObjectModule, ObjectProduct};
use syvora_frontend::ast::{
    self, BinOp, Expr, ExprKind, FunctionCall, FunctionDeclaration, Literal, Module, UnOp,
};
use target_lexicon::Triple;

use crate::builtins;
use crate::symbols::SymbolTable;
use crate::types::{resolve_type, ScalarType};
use crate::{BackendError, BackendResult};

/// What a name refers to during lowering.
#[derive(Debug, Clone)]
pub enum Symbol<'ast> {
    /// A parameter, held in its own stack slot.
    Local { slot: StackSlot, ty: Type },

    /// A defined function, keyed by its mangled name.
    Function {
        decl: Cow<'ast, FunctionDeclaration>,
        id: FuncId,
    },
}

/// Output of a finished module: the textual IR of every function in
/// definition order, and the object file.
pub struct CompiledModule {
    pub ir: String,
    pub object: ObjectProduct,
}

pub struct Codegen<'ast> {
    ctx: codegen::Context,
    builder_ctx: FunctionBuilderContext,
    module: ObjectModule,

    symbols: SymbolTable<Symbol<'ast>>,
    ir: String,
}

impl<'ast> Codegen<'ast> {
    pub fn new(target: Triple, module_name: &str) -> BackendResult<Self> {
        let mut flag_builder = settings::builder();
        flag_builder.set("is_pic", "true")?;
        flag_builder.set("opt_level", "speed")?;

        let flags = settings::Flags::new(flag_builder);

        let isa = match isa::lookup(target.clone()) {
            Ok(isa_builder) => isa_builder.finish(flags)?,
            Err(_) => {
                return Err(BackendError::UnsupportedArch(target.architecture));
            }
        };

        let module_builder =
            ObjectBuilder::new(isa, module_name, cranelift_module::default_libcall_names())?;

        let module = ObjectModule::new(module_builder);

        Ok(Self {
            ctx: module.make_context(),
            builder_ctx: FunctionBuilderContext::new(),
            module,

            symbols: SymbolTable::new(),
            ir: String::new(),
        })
    }

    /// Lower every function in source order. A function is only callable
    /// from functions that follow it.
    pub fn compile_module(&mut self, module: &'ast Module) -> BackendResult<()> {
        self.define_builtins()?;

        for function in &module.functions {
            self.gen_function(function)?;
        }

        Ok(())
    }

    pub fn finish(self) -> CompiledModule {
        CompiledModule {
            ir: self.ir,
            object: self.module.finish(),
        }
    }

    fn define_builtins(&mut self) -> BackendResult<()> {
        let decl = builtins::print_declaration();
        let name = decl.low_level_name();

        let id = builtins::build_print(&mut self.module, &mut self.ctx, &mut self.builder_ctx)?;
        self.define_current(id)?;

        self.symbols.insert(
            name,
            Symbol::Function {
                decl: Cow::Owned(decl),
                id,
            },
        );

        Ok(())
    }

    fn gen_function(&mut self, decl: &'ast FunctionDeclaration) -> BackendResult<()> {
        let name = decl.low_level_name();
        log::debug!("generating `{name}`");

        let param_types = decl
            .arguments
            .iter()
            .map(|arg| resolve_type(&arg.ty))
            .collect::<BackendResult<Vec<_>>>()?;
        let return_type = decl.return_type.as_ref().map(resolve_type).transpose()?;

        self.module.clear_context(&mut self.ctx);

        let signature = &mut self.ctx.func.signature;
        for ty in &param_types {
            signature.params.push(AbiParam::new(ty.clif_type()));
        }
        if let Some(ty) = return_type {
            signature.returns.push(AbiParam::new(ty.clif_type()));
        }
        self.ctx.func.name = UserFuncName::testcase(&name);

        let id = self
            .module
            .declare_function(&name, Linkage::Export, &self.ctx.func.signature)?;

        let mut builder = FunctionBuilder::new(&mut self.ctx.func, &mut self.builder_ctx);

        let entry_block = builder.create_block();
        builder.append_block_params_for_function_params(entry_block);
        builder.switch_to_block(entry_block);
        builder.seal_block(entry_block); // no predecessors

        let mut func_codegen = FuncCodegen {
            builder,
            module: &mut self.module,
            symbols: &mut self.symbols,
        };

        func_codegen.symbols.enter_scope();
        let result = func_codegen.gen_function_body(decl, entry_block, &param_types);
        func_codegen.symbols.exit_scope();
        result?;

        func_codegen.builder.finalize();

        self.define_current(id)?;

        self.symbols.insert(
            name,
            Symbol::Function {
                decl: Cow::Borrowed(decl),
                id,
            },
        );

        Ok(())
    }

    /// Verify the function in the context, record its IR and define it.
    fn define_current(&mut self, id: FuncId) -> BackendResult<()> {
        verify_function(&self.ctx.func, self.module.isa()).map_err(CodegenError::Verifier)?;

        // Captured before definition, which optimizes the function in place.
        self.ir.push_str(&self.ctx.func.display().to_string());
        self.ir.push('\n');

        self.module.define_function(id, &mut self.ctx)?;

        Ok(())
    }
}

/// Check a call's labels against the declaration it resolved to.
///
/// Calls are resolved by mangled name, so this only fails when the callee
/// was found under a name that does not reflect its parameters.
pub fn check_argument_labels(decl: &FunctionDeclaration, call: &FunctionCall) -> BackendResult<()> {
    if decl.arguments.len() != call.arguments.len() {
        return Err(BackendError::ArgumentCountMismatch {
            name: decl.name.name.clone(),
            expected: decl.arguments.len(),
            found: call.arguments.len(),
            span: call.name.span,
        });
    }

    for (param, arg) in decl.arguments.iter().zip(&call.arguments) {
        if param.identifier.name != arg.label.name {
            return Err(BackendError::ArgumentLabelMismatch {
                expected: param.identifier.name.clone(),
                found: arg.label.name.clone(),
                span: arg.label.span,
            });
        }
    }

    Ok(())
}

struct FuncCodegen<'a, 'ast> {
    builder: FunctionBuilder<'a>,
    module: &'a mut ObjectModule,
    symbols: &'a mut SymbolTable<Symbol<'ast>>,
}

impl FuncCodegen<'_, '_> {
    fn gen_function_body(
        &mut self,
        decl: &FunctionDeclaration,
        entry_block: Block,
        param_types: &[ScalarType],
    ) -> BackendResult<()> {
        let params = self.builder.block_params(entry_block).to_vec();

        for ((arg, ty), value) in decl.arguments.iter().zip(param_types).zip(params) {
            let ty = ty.clif_type();
            let slot = self.builder.create_sized_stack_slot(StackSlotData::new(
                StackSlotKind::ExplicitSlot,
                ty.bytes(),
            ));
            self.builder.ins().stack_store(value, slot, 0);

            self.symbols
                .insert(arg.identifier.name.clone(), Symbol::Local { slot, ty });
        }

        self.gen_block(&decl.body)?;

        let return_expression = decl.body.return_expression.as_deref();
        match (&decl.return_type, return_expression) {
            (Some(_), Some(expr)) => {
                let value = self.gen_value(expr)?;
                self.builder.ins().return_(&[value]);
            }

            (None, None) => {
                self.builder.ins().return_(&[]);
            }

            (Some(_), None) => {
                return Err(BackendError::MissingReturnExpression {
                    name: decl.name.name.clone(),
                    span: decl.name.span,
                });
            }

            (None, Some(expr)) => {
                return Err(BackendError::UnexpectedReturnExpression {
                    name: decl.name.name.clone(),
                    span: expr.span,
                });
            }
        }

        Ok(())
    }

    /// Statements only; the return expression is handled by the function.
    fn gen_block(&mut self, block: &ast::Block) -> BackendResult<()> {
        self.symbols.enter_scope();

        let result = block
            .statements
            .iter()
            .try_for_each(|stmt| self.gen_expr(stmt).map(drop));

        self.symbols.exit_scope();

        result
    }

    fn gen_value(&mut self, expr: &Expr) -> BackendResult<Value> {
        self.gen_expr(expr)?
            .ok_or(BackendError::VoidValue { span: expr.span })
    }

    fn gen_expr(&mut self, expr: &Expr) -> BackendResult<Option<Value>> {
        let value = match &expr.kind {
            ExprKind::Literal(literal) => match *literal {
                Literal::Integer(n) => self.builder.ins().iconst(types::I64, n),
                Literal::Float(x) => self.builder.ins().f64const(x),
                Literal::Bool(b) => self.builder.ins().iconst(types::I8, i64::from(b)),
            },

            ExprKind::Identifier(name) => match self.symbols.lookup(name) {
                Some(&Symbol::Local { slot, ty }) => self.builder.ins().stack_load(ty, slot, 0),

                Some(Symbol::Function { .. }) => {
                    return Err(BackendError::NotAValue {
                        name: name.clone(),
                        span: expr.span,
                    });
                }

                None => {
                    return Err(BackendError::VariableNotDefined {
                        name: name.clone(),
                        span: expr.span,
                    });
                }
            },

            ExprKind::Unary { op, operand } => self.gen_unary(*op, operand, expr)?,

            ExprKind::Binary { op, lhs, rhs } => self.gen_binary(*op, lhs, rhs, expr)?,

            ExprKind::Call(call) => return self.gen_call(call, expr),

            ExprKind::If { .. } => {
                return Err(BackendError::NotYetSupported {
                    feature: "if expressions",
                    span: expr.span,
                });
            }
        };

        Ok(Some(value))
    }

    fn gen_unary(&mut self, op: UnOp, operand: &Expr, expr: &Expr) -> BackendResult<Value> {
        let operand = self.gen_value(operand)?;
        let ty = self.builder.func.dfg.value_type(operand);

        let ins = self.builder.ins();
        let value = match (op, ty) {
            (UnOp::Negate, types::I64) => ins.ineg(operand),
            (UnOp::Negate, types::F64) => ins.fneg(operand),
            (UnOp::Not, types::I8) => ins.bxor_imm(operand, 1),
            (UnOp::Not, types::I64) => ins.bnot(operand),

            _ => {
                return Err(BackendError::UnsupportedOperator {
                    op: op.as_str(),
                    ty: ty.to_string(),
                    span: expr.span,
                });
            }
        };

        Ok(value)
    }

    fn gen_binary(&mut self, op: BinOp, lhs: &Expr, rhs: &Expr, expr: &Expr) -> BackendResult<Value> {
        let lhs = self.gen_value(lhs)?;
        let rhs = self.gen_value(rhs)?;

        let ty = self.builder.func.dfg.value_type(lhs);
        let rhs_ty = self.builder.func.dfg.value_type(rhs);

        if ty != rhs_ty {
            return Err(BackendError::OperandTypeMismatch {
                op: op.as_str(),
                lhs: ty.to_string(),
                rhs: rhs_ty.to_string(),
                span: expr.span,
            });
        }

        let unsupported = || BackendError::UnsupportedOperator {
            op: op.as_str(),
            ty: ty.to_string(),
            span: expr.span,
        };

        let ins = self.builder.ins();
        let value = match ty {
            types::F64 => match op {
                BinOp::Add => ins.fadd(lhs, rhs),
                BinOp::Sub => ins.fsub(lhs, rhs),
                BinOp::Mul => ins.fmul(lhs, rhs),
                BinOp::Div => ins.fdiv(lhs, rhs),
                BinOp::Eq => ins.fcmp(FloatCC::Equal, lhs, rhs),
                BinOp::NotEq => ins.fcmp(FloatCC::NotEqual, lhs, rhs),
                BinOp::Lt => ins.fcmp(FloatCC::LessThan, lhs, rhs),
                BinOp::LtEq => ins.fcmp(FloatCC::LessThanOrEqual, lhs, rhs),
                BinOp::Gt => ins.fcmp(FloatCC::GreaterThan, lhs, rhs),
                BinOp::GtEq => ins.fcmp(FloatCC::GreaterThanOrEqual, lhs, rhs),
                _ => return Err(unsupported()),
            },

            types::I8 => match op {
                BinOp::LogicalAnd => ins.band(lhs, rhs),
                BinOp::LogicalOr => ins.bor(lhs, rhs),
                BinOp::Eq => ins.icmp(IntCC::Equal, lhs, rhs),
                BinOp::NotEq => ins.icmp(IntCC::NotEqual, lhs, rhs),
                _ => return Err(unsupported()),
            },

            _ => match op {
                BinOp::Add => ins.iadd(lhs, rhs),
                BinOp::Sub => ins.isub(lhs, rhs),
                BinOp::Mul => ins.imul(lhs, rhs),
                BinOp::Div => ins.sdiv(lhs, rhs),
                BinOp::Rem => ins.srem(lhs, rhs),
                BinOp::Eq => ins.icmp(IntCC::Equal, lhs, rhs),
                BinOp::NotEq => ins.icmp(IntCC::NotEqual, lhs, rhs),
                BinOp::Lt => ins.icmp(IntCC::SignedLessThan, lhs, rhs),
                BinOp::LtEq => ins.icmp(IntCC::SignedLessThanOrEqual, lhs, rhs),
                BinOp::Gt => ins.icmp(IntCC::SignedGreaterThan, lhs, rhs),
                BinOp::GtEq => ins.icmp(IntCC::SignedGreaterThanOrEqual, lhs, rhs),
                _ => return Err(unsupported()),
            },
        };

        Ok(value)
    }

    fn gen_call(&mut self, call: &FunctionCall, expr: &Expr) -> BackendResult<Option<Value>> {
        let low_level_name = call.low_level_name();
        log::trace!("call to `{low_level_name}`");

        // Parameter names may collide with mangled names, calls only see functions.
        let callee = self
            .symbols
            .lookup_where(&low_level_name, |symbol| matches!(symbol, Symbol::Function { .. }));

        let id = match callee {
            Some(Symbol::Function { decl, id }) => {
                check_argument_labels(decl, call)?;
                *id
            }

            _ => {
                return Err(BackendError::FunctionNotDefined {
                    name: call.name.name.clone(),
                    low_level_name,
                    span: expr.span,
                });
            }
        };

        let mut args = Vec::with_capacity(call.arguments.len());
        for arg in &call.arguments {
            args.push(self.gen_value(&arg.value)?);
        }

        for child in call.children.iter().flatten() {
            self.gen_expr(child)?;
        }

        let func_ref = self.module.declare_func_in_func(id, self.builder.func);
        let inst = self.builder.ins().call(func_ref, &args);

        Ok(self.builder.inst_results(inst).first().copied())
    }
}
