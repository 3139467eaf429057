//! Queryable in-memory schema model.
//!
//! The analyzer needs four things from a schema regardless of where it
//! came from: operation-root lookup, field enumeration per type,
//! argument enumeration per field, and type unwrapping (NonNull, List,
//! Named). Declaration order is preserved everywhere so probe plans and
//! selection sets are deterministic.

use serde::{Deserialize, Serialize};

/// GraphQL built-in scalars, always leaf-selectable even when a schema
/// source does not declare them.
pub const BUILTIN_SCALARS: &[&str] = &["Int", "Float", "String", "Boolean", "ID"];

/// Kind discriminant of a type reference, introspection-style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TypeKind {
    Scalar,
    Object,
    Interface,
    Union,
    Enum,
    InputObject,
    List,
    NonNull,
}

/// A possibly-wrapped type reference, e.g. `[Order!]!`.
///
/// Deserializes directly from the introspection wire shape
/// `{kind, name, ofType}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeRef {
    pub kind: TypeKind,
    pub name: Option<String>,
    pub of_type: Option<Box<TypeRef>>,
}

impl TypeRef {
    /// A bare named reference.
    #[must_use]
    pub fn named(kind: TypeKind, name: impl Into<String>) -> Self {
        Self {
            kind,
            name: Some(name.into()),
            of_type: None,
        }
    }

    /// Wraps a reference in a list.
    #[must_use]
    pub fn list(inner: Self) -> Self {
        Self {
            kind: TypeKind::List,
            name: None,
            of_type: Some(Box::new(inner)),
        }
    }

    /// Wraps a reference in a non-null.
    #[must_use]
    pub fn non_null(inner: Self) -> Self {
        Self {
            kind: TypeKind::NonNull,
            name: None,
            of_type: Some(Box::new(inner)),
        }
    }

    /// The underlying named type, unwrapping every wrapper.
    #[must_use]
    pub fn named_type(&self) -> Option<&str> {
        match self.kind {
            TypeKind::NonNull | TypeKind::List => {
                self.of_type.as_deref().and_then(TypeRef::named_type)
            }
            _ => self.name.as_deref(),
        }
    }

    /// True for `T!` at the outermost level.
    #[must_use]
    pub fn is_non_null(&self) -> bool {
        self.kind == TypeKind::NonNull
    }

    /// Strips one outer `NonNull` wrapper, if present.
    #[must_use]
    pub fn unwrap_non_null(&self) -> &Self {
        match (self.kind, self.of_type.as_deref()) {
            (TypeKind::NonNull, Some(inner)) => inner,
            _ => self,
        }
    }

    /// True when the reference is a list at the outer level, looking
    /// through a leading `NonNull` (`[T]` and `[T]!` both qualify).
    #[must_use]
    pub fn is_list(&self) -> bool {
        self.unwrap_non_null().kind == TypeKind::List
    }

    /// Renders the reference as GraphQL type syntax, e.g. `[String!]!`.
    #[must_use]
    pub fn to_type_string(&self) -> String {
        match self.kind {
            TypeKind::NonNull => self.of_type.as_ref().map_or_else(
                || "!".to_string(),
                |of_type| format!("{}!", of_type.to_type_string()),
            ),
            TypeKind::List => self.of_type.as_ref().map_or_else(
                || "[]".to_string(),
                |of_type| format!("[{}]", of_type.to_type_string()),
            ),
            _ => self.name.as_deref().unwrap_or_default().to_string(),
        }
    }
}

impl std::fmt::Display for TypeRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_type_string())
    }
}

/// Kind of a type definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeDefKind {
    Scalar,
    Object,
    Interface,
    Union,
    Enum,
    InputObject,
}

/// An argument (or input field) declaration.
#[derive(Debug, Clone)]
pub struct InputValueDef {
    pub name: String,
    pub ty: TypeRef,
}

impl InputValueDef {
    /// True when the argument must be supplied (`T!`).
    #[must_use]
    pub fn is_required(&self) -> bool {
        self.ty.is_non_null()
    }
}

/// A field declaration with its arguments, in declaration order.
#[derive(Debug, Clone)]
pub struct FieldDef {
    pub name: String,
    pub args: Vec<InputValueDef>,
    pub ty: TypeRef,
}

/// A named type definition.
#[derive(Debug, Clone)]
pub struct TypeDef {
    pub name: String,
    pub kind: TypeDefKind,
    /// Fields in declaration order; empty for non-composite kinds.
    pub fields: Vec<FieldDef>,
}

impl TypeDef {
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|f| f.name == name)
    }
}

/// The parsed schema, declaration-ordered.
#[derive(Debug, Clone)]
pub struct Schema {
    query_type: Option<String>,
    mutation_type: Option<String>,
    types: Vec<TypeDef>,
}

impl Schema {
    #[must_use]
    pub fn new(
        query_type: Option<String>,
        mutation_type: Option<String>,
        types: Vec<TypeDef>,
    ) -> Self {
        Self {
            query_type,
            mutation_type,
            types,
        }
    }

    /// Looks a type up by name.
    #[must_use]
    pub fn get_type(&self, name: &str) -> Option<&TypeDef> {
        self.types.iter().find(|t| t.name == name)
    }

    /// The root query type, when declared and defined.
    #[must_use]
    pub fn query_root(&self) -> Option<&TypeDef> {
        self.query_type.as_deref().and_then(|name| self.get_type(name))
    }

    /// The root mutation type, when declared and defined.
    #[must_use]
    pub fn mutation_root(&self) -> Option<&TypeDef> {
        self.mutation_type
            .as_deref()
            .and_then(|name| self.get_type(name))
    }

    /// True when `name` resolves to a scalar (declared or built-in).
    #[must_use]
    pub fn is_scalar(&self, name: &str) -> bool {
        match self.get_type(name) {
            Some(def) => def.kind == TypeDefKind::Scalar,
            None => BUILTIN_SCALARS.contains(&name),
        }
    }

    /// True when `name` resolves to an object type.
    #[must_use]
    pub fn is_object(&self, name: &str) -> bool {
        self.get_type(name)
            .is_some_and(|def| def.kind == TypeDefKind::Object)
    }

    /// All type definitions, in declaration order.
    #[must_use]
    pub fn types(&self) -> &[TypeDef] {
        &self.types
    }
}
