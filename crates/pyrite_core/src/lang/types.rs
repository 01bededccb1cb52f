//! Built-in primitive types.
//!
//! Every module's type registry is seeded from [`BUILTIN_TYPES`] before anything else, so these
//! names always resolve. Sizes are the storage width used when lowering.

/// Stable identifier for built-in primitive types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuiltinTypeId {
    Int,
    Str,
    Bool,
    Float,
    None,
}

/// Metadata for a built-in primitive.
#[derive(Debug, Clone, Copy)]
pub struct BuiltinTypeInfo {
    pub id: BuiltinTypeId,
    pub name: &'static str,
    pub size_bytes: u32,
}

/// Registry of built-in primitives, in seeding order.
pub const BUILTIN_TYPES: &[BuiltinTypeInfo] = &[
    BuiltinTypeInfo { id: BuiltinTypeId::Int, name: "int", size_bytes: 4 },
    BuiltinTypeInfo { id: BuiltinTypeId::Str, name: "str", size_bytes: 8 },
    BuiltinTypeInfo { id: BuiltinTypeId::Bool, name: "bool", size_bytes: 1 },
    BuiltinTypeInfo { id: BuiltinTypeId::Float, name: "float", size_bytes: 4 },
    BuiltinTypeInfo { id: BuiltinTypeId::None, name: "None", size_bytes: 0 },
];

/// Resolve a built-in type by name.
pub fn from_str(name: &str) -> Option<BuiltinTypeId> {
    BUILTIN_TYPES.iter().find(|t| t.name == name).map(|t| t.id)
}

/// Return the metadata entry for a built-in type.
pub fn info_for(id: BuiltinTypeId) -> &'static BuiltinTypeInfo {
    BUILTIN_TYPES
        .iter()
        .find(|t| t.id == id)
        .expect("INVARIANT: every BuiltinTypeId has a registry entry")
}

/// Return the source spelling of a built-in type.
pub fn as_str(id: BuiltinTypeId) -> &'static str {
    info_for(id).name
}

/// Size in bytes used for every class instance (classes are passed by reference).
pub const REFERENCE_SIZE_BYTES: u32 = 8;
