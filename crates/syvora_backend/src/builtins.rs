//! Functions every module can call without declaring them.

use cranelift::codegen::ir::UserFuncName;
use cranelift::prelude::*;
use cranelift_module::{DataDescription, FuncId, Linkage, Module as _};
use cranelift_object::ObjectModule;
use syvora_diagnostic::Span;
use syvora_frontend::ast::{AccessibleTypeExpression, Argument, Block, FunctionDeclaration, Ident};

use crate::BackendResult;

pub const PRINT_NAME: &str = "print_arg";
pub const PRINT_LABEL: &str = "arg";

const PRINT_FORMAT: &[u8] = b"%lld\n\0";

/// Source-level view of the print built-in, `print_arg(arg: Int)`.
pub fn print_declaration() -> FunctionDeclaration {
    FunctionDeclaration {
        name: Ident::new(PRINT_NAME, Span::default()),
        arguments: vec![Argument {
            identifier: Ident::new(PRINT_LABEL, Span::default()),
            ty: AccessibleTypeExpression::simple("Int", Span::default()),
        }],
        return_type: None,
        body: Block::default(),
    }
}

/// Build the print built-in into `ctx`, forwarding its argument to the C
/// `printf`. The function is declared but left for the caller to define.
pub(crate) fn build_print(
    module: &mut ObjectModule,
    ctx: &mut codegen::Context,
    builder_ctx: &mut FunctionBuilderContext,
) -> BackendResult<FuncId> {
    let name = print_declaration().low_level_name();
    let pointer_type = module.target_config().pointer_type();

    // No varargs in cranelift, so `printf` is imported with the one shape used here.
    let mut printf_sig = module.make_signature();
    printf_sig.params.push(AbiParam::new(pointer_type));
    printf_sig.params.push(AbiParam::new(types::I64));
    printf_sig.returns.push(AbiParam::new(types::I32));
    let printf = module.declare_function("printf", Linkage::Import, &printf_sig)?;

    let format = module.declare_data(&format!("{name}.format"), Linkage::Local, false, false)?;
    let mut description = DataDescription::new();
    description.define(PRINT_FORMAT.to_vec().into_boxed_slice());
    module.define_data(format, &description)?;

    module.clear_context(ctx);
    ctx.func.signature.params.push(AbiParam::new(types::I64));
    ctx.func.name = UserFuncName::testcase(&name);

    let id = module.declare_function(&name, Linkage::Local, &ctx.func.signature)?;

    let mut builder = FunctionBuilder::new(&mut ctx.func, builder_ctx);

    let entry_block = builder.create_block();
    builder.append_block_params_for_function_params(entry_block);
    builder.switch_to_block(entry_block);
    builder.seal_block(entry_block);

    let arg = builder.block_params(entry_block)[0];

    let printf_ref = module.declare_func_in_func(printf, builder.func);
    let format_ref = module.declare_data_in_func(format, builder.func);
    let format_ptr = builder.ins().global_value(pointer_type, format_ref);

    builder.ins().call(printf_ref, &[format_ptr, arg]);
    builder.ins().return_(&[]);
    builder.finalize();

    log::debug!("built `{name}`");

    Ok(id)
}
