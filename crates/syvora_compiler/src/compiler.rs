use std::path::Path;

use syvora_backend::CompiledModule;
use syvora_diagnostic::SourceFile;
use target_lexicon::Triple;

use crate::CompilerResult;

pub struct Compiler {
    triple: Triple,
}

impl Default for Compiler {
    fn default() -> Self {
        Self::new(Triple::host())
    }
}

impl Compiler {
    pub fn new(triple: Triple) -> Self {
        Self { triple }
    }

    pub fn compile(&self, source: &SourceFile) -> CompilerResult<CompiledModule> {
        log::debug!("parsing {}", source.name());
        let module = syvora_frontend::parse(source)?;

        log::debug!("generating {} function(s)", module.functions.len());
        let compiled = syvora_backend::compile(&module, self.triple.clone(), module_name(source))?;

        Ok(compiled)
    }
}

/// Object module name: the file stem of the source.
fn module_name(source: &SourceFile) -> &str {
    Path::new(source.name())
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or("main")
}
