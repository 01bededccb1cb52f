//! Types and the per-module type registry.
//!
//! A [`Type`] is identified by its id: the bare name for built-ins, `<owner module id>_<name>`
//! otherwise. Ids are unique without any shared table, so every module keeps its own
//! [`TypeRegistry`] and receives imported types by value.

use std::collections::BTreeMap;
use std::fmt;
use std::hash::{Hash, Hasher};

use pyrite_core::lang::types::BUILTIN_TYPES;
use pyrite_syntax::ast::{Expr, Spanned};

use crate::errors::SemanticError;
use crate::frontend::source::ModuleId;

#[derive(Debug, Clone)]
pub struct Type {
    name: String,
    owner: Option<ModuleId>,
    size_bytes: u32,
    id: String,
}

impl Type {
    /// A built-in type. Built-ins never have an owning module.
    pub fn builtin(name: impl Into<String>, size_bytes: u32) -> Self {
        let name = name.into();
        Self {
            id: name.clone(),
            name,
            owner: None,
            size_bytes,
        }
    }

    /// A type declared by module `owner`.
    pub fn user(name: impl Into<String>, owner: &ModuleId, size_bytes: u32) -> Self {
        let name = name.into();
        Self {
            id: format!("{}_{}", owner.as_str(), name),
            name,
            owner: Some(owner.clone()),
            size_bytes,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn owner(&self) -> Option<&ModuleId> {
        self.owner.as_ref()
    }

    pub fn is_builtin(&self) -> bool {
        self.owner.is_none()
    }

    pub fn size_bytes(&self) -> u32 {
        self.size_bytes
    }
}

impl PartialEq for Type {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Type {}

impl Hash for Type {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Name → type table owned by one module.
#[derive(Debug, Clone, Default)]
pub struct TypeRegistry {
    types: BTreeMap<String, Type>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding the fixed built-in primitives.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        for info in BUILTIN_TYPES {
            registry.register(Type::builtin(info.name, info.size_bytes));
        }
        registry
    }

    /// Insert `ty` under its own name, replacing any previous entry. Returns the replaced type.
    pub fn register(&mut self, ty: Type) -> Option<Type> {
        let name = ty.name().to_string();
        self.register_as(name, ty)
    }

    /// Insert `ty` under `name` (an import alias), replacing any previous entry.
    pub fn register_as(&mut self, name: impl Into<String>, ty: Type) -> Option<Type> {
        self.types.insert(name.into(), ty)
    }

    pub fn resolve_by_name(&self, name: &str) -> Option<&Type> {
        self.types.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.types.contains_key(name)
    }

    /// Resolve a type annotation.
    ///
    /// Only a bare name, a string literal naming a type, or the `None` literal are type
    /// expressions.
    pub fn resolve_from_expression(&self, expr: &Spanned<Expr>) -> Result<Type, SemanticError> {
        let name = match &expr.node {
            Expr::Name(name) | Expr::Str(name) => name.as_str(),
            Expr::None => "None",
            other => {
                return Err(SemanticError::new(
                    format!("Invalid type expression: expected a type name, found {}", other.describe()),
                    expr.span,
                ));
            }
        };

        self.resolve_by_name(name)
            .cloned()
            .ok_or_else(|| SemanticError::new(format!("Unknown type '{name}'"), expr.span))
    }

    /// Registered `(name, type)` pairs in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Type)> {
        self.types.iter().map(|(name, ty)| (name.as_str(), ty))
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}
