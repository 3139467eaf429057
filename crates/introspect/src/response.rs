//! Serde types for the introspection JSON and its conversion into the
//! runtime [`Schema`] model.
//!
//! These mirror the wire structure of an introspection response, minus
//! the members the scanner never reads (descriptions, deprecation,
//! directives); serde skips unknown members.

use crate::schema::{FieldDef, InputValueDef, Schema, TypeDef, TypeDefKind, TypeRef};
use serde::Deserialize;

/// The `data` member of an introspection response.
#[derive(Debug, Clone, Deserialize)]
pub struct IntrospectionData {
    #[serde(rename = "__schema")]
    pub schema: IntrospectionSchema,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntrospectionSchema {
    pub query_type: Option<IntrospectionTypeName>,
    pub mutation_type: Option<IntrospectionTypeName>,
    #[serde(default)]
    pub types: Vec<IntrospectionType>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct IntrospectionTypeName {
    pub name: String,
}

/// A type definition, tagged by its `kind` discriminant.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind")]
pub enum IntrospectionType {
    #[serde(rename = "SCALAR")]
    Scalar(IntrospectionNamedType),
    #[serde(rename = "OBJECT")]
    Object(IntrospectionCompositeType),
    #[serde(rename = "INTERFACE")]
    Interface(IntrospectionCompositeType),
    #[serde(rename = "UNION")]
    Union(IntrospectionNamedType),
    #[serde(rename = "ENUM")]
    Enum(IntrospectionNamedType),
    #[serde(rename = "INPUT_OBJECT")]
    InputObject(IntrospectionNamedType),
}

#[derive(Debug, Clone, Deserialize)]
pub struct IntrospectionNamedType {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct IntrospectionCompositeType {
    pub name: String,
    #[serde(default)]
    pub fields: Option<Vec<IntrospectionField>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct IntrospectionField {
    pub name: String,
    #[serde(default)]
    pub args: Vec<IntrospectionInputValue>,
    #[serde(rename = "type")]
    pub type_ref: TypeRef,
}

#[derive(Debug, Clone, Deserialize)]
pub struct IntrospectionInputValue {
    pub name: String,
    #[serde(rename = "type")]
    pub type_ref: TypeRef,
}

impl IntrospectionData {
    /// Converts the wire representation into the runtime schema model,
    /// dropping introspection meta types (`__Type`, `__Schema`, ...).
    #[must_use]
    pub fn into_schema(self) -> Schema {
        let query_type = self.schema.query_type.map(|t| t.name);
        let mutation_type = self.schema.mutation_type.map(|t| t.name);

        let types = self
            .schema
            .types
            .into_iter()
            .map(IntrospectionType::into_type_def)
            .filter(|def| !def.name.starts_with("__"))
            .collect();

        Schema::new(query_type, mutation_type, types)
    }
}

impl IntrospectionType {
    fn into_type_def(self) -> TypeDef {
        match self {
            Self::Scalar(t) => TypeDef {
                name: t.name,
                kind: TypeDefKind::Scalar,
                fields: vec![],
            },
            Self::Object(t) => composite_def(t, TypeDefKind::Object),
            Self::Interface(t) => composite_def(t, TypeDefKind::Interface),
            Self::Union(t) => TypeDef {
                name: t.name,
                kind: TypeDefKind::Union,
                fields: vec![],
            },
            Self::Enum(t) => TypeDef {
                name: t.name,
                kind: TypeDefKind::Enum,
                fields: vec![],
            },
            Self::InputObject(t) => TypeDef {
                name: t.name,
                kind: TypeDefKind::InputObject,
                fields: vec![],
            },
        }
    }
}

fn composite_def(t: IntrospectionCompositeType, kind: TypeDefKind) -> TypeDef {
    let fields = t
        .fields
        .unwrap_or_default()
        .into_iter()
        .map(|f| FieldDef {
            name: f.name,
            args: f
                .args
                .into_iter()
                .map(|a| InputValueDef {
                    name: a.name,
                    ty: a.type_ref,
                })
                .collect(),
            ty: f.type_ref,
        })
        .collect();

    TypeDef {
        name: t.name,
        kind,
        fields,
    }
}
