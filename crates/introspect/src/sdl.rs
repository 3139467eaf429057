//! SDL parsing into the runtime schema model.
//!
//! Schema overrides arrive as SDL text. Parsing is two-pass: first
//! collect every definition's name and kind (needed to classify named
//! type references), then build field and argument tables.

use crate::schema::{
    FieldDef, InputValueDef, Schema, TypeDef, TypeDefKind, TypeKind, TypeRef, BUILTIN_SCALARS,
};
use crate::{IntrospectError, Result};
use apollo_parser::cst;
use apollo_parser::Parser;
use std::collections::HashMap;

/// Parses an SDL document into a [`Schema`].
///
/// Root operation types default to `Query`/`Mutation` unless a
/// `schema { ... }` definition names others.
///
/// # Errors
///
/// Returns [`IntrospectError::Sdl`] when the document has syntax errors.
pub fn parse_sdl(sdl: &str) -> Result<Schema> {
    let tree = Parser::new(sdl).parse();
    if tree.errors().len() > 0 {
        let rendered: Vec<String> = tree.errors().map(|e| e.message().to_string()).collect();
        return Err(IntrospectError::Sdl(rendered.join("; ")));
    }
    let document = tree.document();

    let mut query_type = "Query".to_string();
    let mut mutation_type = "Mutation".to_string();
    let mut pending: Vec<PendingDef> = Vec::new();

    for definition in document.definitions() {
        match definition {
            cst::Definition::SchemaDefinition(schema_def) => {
                for root_op in schema_def.root_operation_type_definitions() {
                    let Some(name) = root_op
                        .named_type()
                        .and_then(|t| t.name())
                        .map(|n| n.text().to_string())
                    else {
                        continue;
                    };
                    if let Some(op_type) = root_op.operation_type() {
                        if op_type.query_token().is_some() {
                            query_type = name;
                        } else if op_type.mutation_token().is_some() {
                            mutation_type = name;
                        }
                    }
                }
            }
            cst::Definition::ObjectTypeDefinition(obj) => {
                if let Some(name) = obj.name().map(|n| n.text().to_string()) {
                    pending.push(PendingDef {
                        name,
                        kind: TypeDefKind::Object,
                        fields: obj.fields_definition(),
                    });
                }
            }
            cst::Definition::InterfaceTypeDefinition(interface) => {
                if let Some(name) = interface.name().map(|n| n.text().to_string()) {
                    pending.push(PendingDef {
                        name,
                        kind: TypeDefKind::Interface,
                        fields: interface.fields_definition(),
                    });
                }
            }
            cst::Definition::ScalarTypeDefinition(scalar) => {
                push_fieldless(&mut pending, scalar.name(), TypeDefKind::Scalar);
            }
            cst::Definition::EnumTypeDefinition(enum_def) => {
                push_fieldless(&mut pending, enum_def.name(), TypeDefKind::Enum);
            }
            cst::Definition::UnionTypeDefinition(union_def) => {
                push_fieldless(&mut pending, union_def.name(), TypeDefKind::Union);
            }
            cst::Definition::InputObjectTypeDefinition(input) => {
                push_fieldless(&mut pending, input.name(), TypeDefKind::InputObject);
            }
            _ => {}
        }
    }

    let kinds: HashMap<String, TypeDefKind> = pending
        .iter()
        .map(|def| (def.name.clone(), def.kind))
        .collect();

    let types = pending
        .into_iter()
        .map(|def| TypeDef {
            fields: def
                .fields
                .map(|fields| convert_fields(&fields, &kinds))
                .unwrap_or_default(),
            name: def.name,
            kind: def.kind,
        })
        .collect();

    Ok(Schema::new(Some(query_type), Some(mutation_type), types))
}

struct PendingDef {
    name: String,
    kind: TypeDefKind,
    fields: Option<cst::FieldsDefinition>,
}

fn push_fieldless(
    pending: &mut Vec<PendingDef>,
    name: Option<cst::Name>,
    kind: TypeDefKind,
) {
    if let Some(name) = name.map(|n| n.text().to_string()) {
        pending.push(PendingDef {
            name,
            kind,
            fields: None,
        });
    }
}

fn convert_fields(
    fields: &cst::FieldsDefinition,
    kinds: &HashMap<String, TypeDefKind>,
) -> Vec<FieldDef> {
    fields
        .field_definitions()
        .filter_map(|field| {
            let name = field.name()?.text().to_string();
            let ty = field.ty().and_then(|t| convert_type(&t, kinds))?;
            let args = field
                .arguments_definition()
                .map(|args| {
                    args.input_value_definitions()
                        .filter_map(|arg| {
                            let name = arg.name()?.text().to_string();
                            let ty = arg.ty().and_then(|t| convert_type(&t, kinds))?;
                            Some(InputValueDef { name, ty })
                        })
                        .collect()
                })
                .unwrap_or_default();
            Some(FieldDef { name, args, ty })
        })
        .collect()
}

fn convert_type(ty: &cst::Type, kinds: &HashMap<String, TypeDefKind>) -> Option<TypeRef> {
    match ty {
        cst::Type::NamedType(named) => {
            let name = named.name()?.text().to_string();
            Some(TypeRef::named(named_kind(&name, kinds), name))
        }
        cst::Type::ListType(list) => {
            let inner = list.ty().and_then(|t| convert_type(&t, kinds))?;
            Some(TypeRef::list(inner))
        }
        cst::Type::NonNullType(non_null) => {
            let inner = if let Some(named) = non_null.named_type() {
                let name = named.name()?.text().to_string();
                TypeRef::named(named_kind(&name, kinds), name)
            } else if let Some(list) = non_null.list_type() {
                let element = list.ty().and_then(|t| convert_type(&t, kinds))?;
                TypeRef::list(element)
            } else {
                return None;
            };
            Some(TypeRef::non_null(inner))
        }
    }
}

/// Classifies a named reference: declared kind, built-in scalar, or
/// (for references to undeclared types) Object.
fn named_kind(name: &str, kinds: &HashMap<String, TypeDefKind>) -> TypeKind {
    match kinds.get(name) {
        Some(TypeDefKind::Scalar) => TypeKind::Scalar,
        Some(TypeDefKind::Object) => TypeKind::Object,
        Some(TypeDefKind::Interface) => TypeKind::Interface,
        Some(TypeDefKind::Union) => TypeKind::Union,
        Some(TypeDefKind::Enum) => TypeKind::Enum,
        Some(TypeDefKind::InputObject) => TypeKind::InputObject,
        None if BUILTIN_SCALARS.contains(&name) => TypeKind::Scalar,
        None => TypeKind::Object,
    }
}
