#![no_main]

use libfuzzer_sys::fuzz_target;
use pyrite_syntax::diagnostics::format_error;
use pyrite_syntax::parser::parse_source;

fuzz_target!(|data: &[u8]| {
    // Invalid UTF-8 never reaches the lexer
    if let Ok(s) = std::str::from_utf8(data) {
        match parse_source(s) {
            Ok(program) => {
                let _ = program.imported_modules();
            }
            // Error spans must always land on char boundaries of the source
            Err(errors) => {
                for error in &errors {
                    let _ = format_error("<fuzz>", s, error);
                }
            }
        }
    }
});
