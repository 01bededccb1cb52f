//! Compiler-defined intrinsics.
//!
//! These are the types and functions the backend provides directly. They have no source
//! definition: the internal standard-library module declares which of them it links via its
//! extern pragma, and no other module may name them.
//!
//! Signatures are stored as type *names* so this crate stays independent of the type registry.
//!
//! ## Examples
//! ```rust
//! use pyrite_core::lang::intrinsics;
//!
//! let malloc = intrinsics::function("_ext_malloc").unwrap();
//! assert_eq!(malloc.params, &["_ext_Pointer"]);
//! assert_eq!(malloc.returns, "_ext_Pointer");
//! assert!(intrinsics::ty("_ext_Char").is_some());
//! ```

/// Name of the virtual module intrinsics are imported from.
pub const COMPILER_DEFINED_MODULE: &str = "_compiler_defined";

/// A backend-provided primitive type.
#[derive(Debug, Clone, Copy)]
pub struct IntrinsicType {
    pub name: &'static str,
    pub size_bytes: u32,
}

/// A backend-provided function signature.
#[derive(Debug, Clone, Copy)]
pub struct IntrinsicFunction {
    pub name: &'static str,
    pub params: &'static [&'static str],
    pub returns: &'static str,
}

pub const INTRINSIC_TYPES: &[IntrinsicType] = &[
    // Platform pointer, lowered to i8*.
    IntrinsicType { name: "_ext_Pointer", size_bytes: 8 },
    IntrinsicType { name: "_ext_Char", size_bytes: 1 },
];

const fn func(
    name: &'static str,
    params: &'static [&'static str],
    returns: &'static str,
) -> IntrinsicFunction {
    IntrinsicFunction { name, params, returns }
}

pub const INTRINSIC_FUNCTIONS: &[IntrinsicFunction] = &[
    // Conversions
    func("_ext_to_ptr", &["int"], "_ext_Pointer"),
    func("_to_char", &["int"], "_ext_Char"),
    func("_ext_get_byte", &["_ext_Pointer"], "_ext_Char"),
    func("_set_byte", &["_ext_Pointer", "_ext_Char"], "_ext_Char"),
    // libc
    func("_ext_malloc", &["_ext_Pointer"], "_ext_Pointer"),
    func("_ext_calloc", &["_ext_Pointer"], "_ext_Pointer"),
    func("_ext_free", &["_ext_Pointer"], "None"),
    func("_ext_abort", &[], "None"),
    func("_ext_cos", &["float"], "float"),
];

/// Look up an intrinsic type by name.
pub fn ty(name: &str) -> Option<&'static IntrinsicType> {
    INTRINSIC_TYPES.iter().find(|t| t.name == name)
}

/// Look up an intrinsic function by name.
pub fn function(name: &str) -> Option<&'static IntrinsicFunction> {
    INTRINSIC_FUNCTIONS.iter().find(|f| f.name == name)
}

/// Return `true` if `name` is any intrinsic (type or function).
pub fn is_intrinsic(name: &str) -> bool {
    ty(name).is_some() || function(name).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signatures_only_mention_known_types() {
        let known = |name: &str| {
            ty(name).is_some() || crate::lang::types::from_str(name).is_some()
        };
        for f in INTRINSIC_FUNCTIONS {
            assert!(known(f.returns), "{} returns unknown type {}", f.name, f.returns);
            for p in f.params {
                assert!(known(p), "{} takes unknown type {}", f.name, p);
            }
        }
    }
}
