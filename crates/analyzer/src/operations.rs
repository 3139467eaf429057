//! GraphQL operation synthesis.
//!
//! Probes are rendered as plain operation text: a single root field
//! with an optional id argument and a small, deterministic selection
//! set. Selection sets always include `id __typename` plus up to three
//! schema-known scalar fields of the return type, in declaration order.

use crate::{deep_path, BolaPointOfInterest};
use gqlguard_introspect::Schema;

/// Selections present in every synthesized operation.
const BASE_SELECTIONS: [&str; 2] = ["id", "__typename"];

/// How many schema-derived scalar fields a selection set may add.
const MAX_SCALAR_SELECTIONS: usize = 3;

/// Builds the probe document for a BOLA point of interest, addressing
/// `object_id` through the point's id argument.
#[must_use]
pub fn build_bola_operation(
    point: &BolaPointOfInterest,
    object_id: &str,
    schema: Option<&Schema>,
) -> String {
    let selections = selection_set(schema, point.return_type_name.as_deref());
    format!(
        "{} {{ {}({}: \"{}\") {{ {} }} }}",
        point.operation,
        point.field_name,
        point.id_arg_name,
        escape_string(object_id),
        selections.join(" ")
    )
}

/// Builds a bare list query for the pagination probe.
#[must_use]
pub fn build_list_query(field_name: &str, schema: Option<&Schema>) -> String {
    let element_type = schema
        .and_then(Schema::query_root)
        .and_then(|root| root.field(field_name))
        .and_then(|field| field.ty.named_type());
    let selections = selection_set(schema, element_type);
    format!("query {{ {} {{ {} }} }}", field_name, selections.join(" "))
}

/// Builds the depth probe document.
///
/// Follows the analyzer's deep path when the schema yields one;
/// otherwise emits a synthetic `node { child0 { ... } }` document of
/// exactly `depth` nesting levels. Unknown synthetic fields are
/// expected to fail validation on most servers, which downgrades the
/// check instead of inflating it.
#[must_use]
pub fn build_deep_query(depth: usize, schema: Option<&Schema>) -> String {
    let path = deep_path(schema, depth);
    let fields = if path.is_empty() {
        synthetic_path(depth)
    } else {
        path
    };
    format!("query {{ {} }}", nest(&fields))
}

/// `node, child0, child1, ...` totalling `depth` nesting levels.
fn synthetic_path(depth: usize) -> Vec<String> {
    let mut fields = vec!["node".to_string()];
    for i in 0..depth.saturating_sub(1) {
        fields.push(format!("child{i}"));
    }
    fields
}

/// Nests `fields` into selection sets terminating in the base leaves.
fn nest(fields: &[String]) -> String {
    let mut body = BASE_SELECTIONS.join(" ");
    for field in fields.iter().rev() {
        body = format!("{field} {{ {body} }}");
    }
    body
}

/// `id __typename` plus the first scalar fields of `type_name`,
/// deduplicated, in declaration order.
fn selection_set(schema: Option<&Schema>, type_name: Option<&str>) -> Vec<String> {
    let mut selections: Vec<String> = BASE_SELECTIONS.iter().map(ToString::to_string).collect();

    let Some((schema, type_name)) = schema.zip(type_name) else {
        return selections;
    };
    if !schema.is_object(type_name) {
        return selections;
    }
    let Some(def) = schema.get_type(type_name) else {
        return selections;
    };

    let mut added = 0;
    for field in &def.fields {
        if added == MAX_SCALAR_SELECTIONS {
            break;
        }
        let is_scalar = field
            .ty
            .named_type()
            .is_some_and(|name| schema.is_scalar(name));
        if is_scalar && !selections.iter().any(|s| s == &field.name) {
            selections.push(field.name.clone());
            added += 1;
        }
    }

    selections
}

/// Escapes a value for embedding in a GraphQL string literal.
fn escape_string(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::OperationKind;
    use apollo_parser::cst;
    use gqlguard_introspect::parse_sdl;

    const SDL: &str = r"
        type Query {
            order(id: ID!): Order
            orders: [Order!]!
            me: User
        }
        type Mutation {
            updateOrder(id: ID!): Order
        }
        type Order {
            id: ID!
            total: Float
            status: String
            createdAt: String
            owner: User
            notes: String
        }
        type User { id: ID! profile: Profile }
        type Profile { owner: User }
    ";

    fn schema() -> gqlguard_introspect::Schema {
        parse_sdl(SDL).unwrap()
    }

    fn point(operation: OperationKind, field: &str) -> BolaPointOfInterest {
        BolaPointOfInterest {
            field_name: field.to_string(),
            operation,
            id_arg_name: "id".to_string(),
            return_type_name: Some("Order".to_string()),
        }
    }

    fn assert_parses(document: &str) {
        let tree = apollo_parser::Parser::new(document).parse();
        assert_eq!(tree.errors().len(), 0, "document should parse: {document}");
    }

    /// Longest single-branch nesting depth of the document's first
    /// operation (a field with a selection set counts one level).
    fn max_depth(document: &str) -> usize {
        fn selection_depth(selection_set: &cst::SelectionSet) -> usize {
            selection_set
                .selections()
                .filter_map(|selection| match selection {
                    cst::Selection::Field(field) => Some(
                        field
                            .selection_set()
                            .as_ref()
                            .map_or(0, |nested| 1 + selection_depth(nested)),
                    ),
                    _ => None,
                })
                .max()
                .unwrap_or(0)
        }

        let tree = apollo_parser::Parser::new(document).parse();
        assert_eq!(tree.errors().len(), 0);
        tree.document()
            .definitions()
            .filter_map(|definition| match definition {
                cst::Definition::OperationDefinition(op) => {
                    op.selection_set().map(|ss| selection_depth(&ss))
                }
                _ => None,
            })
            .max()
            .unwrap_or(0)
    }

    #[test]
    fn test_bola_operation_shape() {
        let document =
            build_bola_operation(&point(OperationKind::Query, "order"), "o1", Some(&schema()));
        assert_eq!(
            document,
            "query { order(id: \"o1\") { id __typename total status createdAt } }"
        );
        assert_parses(&document);
    }

    #[test]
    fn test_bola_mutation_keyword() {
        let document = build_bola_operation(
            &point(OperationKind::Mutation, "updateOrder"),
            "o1",
            Some(&schema()),
        );
        assert!(document.starts_with("mutation { updateOrder(id: \"o1\")"));
        assert_parses(&document);
    }

    #[test]
    fn test_bola_operation_without_schema_uses_base_selections() {
        let document = build_bola_operation(&point(OperationKind::Query, "order"), "o1", None);
        assert_eq!(document, "query { order(id: \"o1\") { id __typename } }");
        assert_parses(&document);
    }

    #[test]
    fn test_object_id_is_escaped() {
        let document =
            build_bola_operation(&point(OperationKind::Query, "order"), "o\"1\\x", None);
        assert!(document.contains(r#"(id: "o\"1\\x")"#));
        assert_parses(&document);
    }

    #[test]
    fn test_scalar_selections_dedup_against_base() {
        // Order declares id first; it must not appear twice, and the
        // scalar picks skip the object-valued `owner`.
        let document = build_list_query("orders", Some(&schema()));
        assert_eq!(
            document,
            "query { orders { id __typename total status createdAt } }"
        );
        assert_parses(&document);
    }

    #[test]
    fn test_list_query_without_schema() {
        let document = build_list_query("users", None);
        assert_eq!(document, "query { users { id __typename } }");
        assert_parses(&document);
    }

    #[test]
    fn test_deep_query_follows_schema_path() {
        let document = build_deep_query(4, Some(&schema()));
        assert_eq!(
            document,
            "query { me { profile { owner { profile { id __typename } } } } }"
        );
        assert_eq!(max_depth(&document), 4);
    }

    #[test]
    fn test_deep_query_synthetic_without_schema() {
        let document = build_deep_query(7, None);
        assert!(document.starts_with("query { node { child0 {"));
        assert_parses(&document);
        assert_eq!(max_depth(&document), 7);
    }

    #[test]
    fn test_deep_query_depth_one() {
        assert_eq!(max_depth(&build_deep_query(1, None)), 1);
    }
}
