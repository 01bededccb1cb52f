#![no_main]

use std::path::PathBuf;

use libfuzzer_sys::fuzz_target;
use pyrite::{CompilerOptions, Module, ModuleSource};
use pyrite::frontend::module::ImportedModules;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        let root = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("..");
        let options = CompilerOptions::new(root.join("stdlib"), std::env::temp_dir());
        let mut module = Module::new(ModuleSource::Inline(s.to_string()));
        // Declaration and body resolution over arbitrary programs; errors are expected, panics are not.
        let _ = module.compile(&options, &ImportedModules::new());
    }
});
