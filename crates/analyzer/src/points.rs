//! BOLA points of interest.

use gqlguard_introspect::{Schema, TypeDef};

/// Root operation kind a point of interest hangs off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationKind {
    Query,
    Mutation,
}

impl std::fmt::Display for OperationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Query => write!(f, "query"),
            Self::Mutation => write!(f, "mutation"),
        }
    }
}

/// A (field, id-argument) pair suitable for BOLA probing.
///
/// `field_name` exists on the operation root and `id_arg_name` is one
/// of its declared arguments.
#[derive(Debug, Clone)]
pub struct BolaPointOfInterest {
    pub field_name: String,
    pub operation: OperationKind,
    pub id_arg_name: String,
    /// The named return type, unwrapped from NonNull/List wrappers.
    pub return_type_name: Option<String>,
}

impl BolaPointOfInterest {
    /// The object type whose owned ids feed this point: the declared
    /// return type, or a name inferred from the field when the return
    /// type is unavailable.
    #[must_use]
    pub fn object_type(&self) -> String {
        self.return_type_name
            .clone()
            .unwrap_or_else(|| infer_object_type_from_field_name(&self.field_name))
    }
}

/// Walks the root query and mutation fields for id-addressable entry
/// points.
///
/// A field qualifies when one of its arguments has named type `ID` or a
/// name containing `id` (case-insensitive); the first such argument in
/// declaration order is selected. When `target_object_types` is present
/// and non-empty, only points returning one of those types survive.
#[must_use]
pub fn find_bola_points_of_interest(
    schema: &Schema,
    target_object_types: Option<&[String]>,
) -> Vec<BolaPointOfInterest> {
    let mut points = Vec::new();

    let roots: [(OperationKind, Option<&TypeDef>); 2] = [
        (OperationKind::Query, schema.query_root()),
        (OperationKind::Mutation, schema.mutation_root()),
    ];

    for (operation, root) in roots {
        let Some(root) = root else { continue };
        for field in &root.fields {
            let Some(id_arg) = field.args.iter().find(|arg| {
                arg.ty.named_type() == Some("ID") || arg.name.to_lowercase().contains("id")
            }) else {
                continue;
            };

            let return_type_name = field.ty.named_type().map(ToString::to_string);

            if let Some(wanted) = target_object_types.filter(|w| !w.is_empty()) {
                let matches = return_type_name
                    .as_deref()
                    .is_some_and(|name| wanted.iter().any(|t| t == name));
                if !matches {
                    continue;
                }
            }

            points.push(BolaPointOfInterest {
                field_name: field.name.clone(),
                operation,
                id_arg_name: id_arg.name.clone(),
                return_type_name,
            });
        }
    }

    points
}

/// Guesses the object type name behind a root field name:
/// `users → User`, `getOrderById → Order`. Idempotent on names that are
/// already canonical. Used only as a fallback when a point of interest
/// has no resolvable return type.
#[must_use]
pub fn infer_object_type_from_field_name(name: &str) -> String {
    let mut rest = name;

    for prefix in ["get", "find", "list", "all"] {
        if let Some(stripped) = rest.strip_prefix(prefix) {
            rest = stripped;
            break;
        }
    }

    for suffix in ["ById", "Connection", "Edge", "s"] {
        if let Some(stripped) = rest.strip_suffix(suffix) {
            rest = stripped;
            break;
        }
    }

    let mut chars = rest.chars();
    match chars.next() {
        None => "Object".to_string(),
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gqlguard_introspect::parse_sdl;

    const SDL: &str = r"
        type Query {
            order(id: ID!): Order
            userByEmail(email: String!): User
            search(term: String, ownerId: String): [Order!]
            health: String
        }

        type Mutation {
            updateOrder(id: ID!, total: Float): Order
        }

        type Order { id: ID! total: Float }
        type User { id: ID! name: String }
    ";

    fn schema() -> Schema {
        parse_sdl(SDL).unwrap()
    }

    #[test]
    fn test_points_require_an_id_argument() {
        let schema = schema();
        let points = find_bola_points_of_interest(&schema, None);

        let names: Vec<_> = points
            .iter()
            .map(|p| (p.operation, p.field_name.as_str(), p.id_arg_name.as_str()))
            .collect();
        assert_eq!(
            names,
            [
                (OperationKind::Query, "order", "id"),
                (OperationKind::Query, "search", "ownerId"),
                (OperationKind::Mutation, "updateOrder", "id"),
            ]
        );
    }

    #[test]
    fn test_id_arg_is_declared_on_the_field() {
        let schema = schema();
        for point in find_bola_points_of_interest(&schema, None) {
            let root = match point.operation {
                OperationKind::Query => schema.query_root().unwrap(),
                OperationKind::Mutation => schema.mutation_root().unwrap(),
            };
            let field = root.field(&point.field_name).unwrap();
            assert!(field.args.iter().any(|a| a.name == point.id_arg_name));
        }
    }

    #[test]
    fn test_return_type_unwraps_wrappers() {
        let schema = schema();
        let points = find_bola_points_of_interest(&schema, None);
        let search = points.iter().find(|p| p.field_name == "search").unwrap();
        assert_eq!(search.return_type_name.as_deref(), Some("Order"));
    }

    #[test]
    fn test_target_type_filter() {
        let schema = schema();
        let points =
            find_bola_points_of_interest(&schema, Some(&["User".to_string()]));
        assert!(points.is_empty());

        let points =
            find_bola_points_of_interest(&schema, Some(&["Order".to_string()]));
        assert_eq!(points.len(), 3);

        // An empty restriction means no restriction.
        let points = find_bola_points_of_interest(&schema, Some(&[]));
        assert_eq!(points.len(), 3);
    }

    #[test]
    fn test_infer_object_type_from_field_name() {
        assert_eq!(infer_object_type_from_field_name("users"), "User");
        assert_eq!(infer_object_type_from_field_name("getOrderById"), "Order");
        assert_eq!(infer_object_type_from_field_name("findUser"), "User");
        assert_eq!(infer_object_type_from_field_name("allProducts"), "Product");
        assert_eq!(infer_object_type_from_field_name("ordersConnection"), "Orders");
        assert_eq!(infer_object_type_from_field_name(""), "Object");
        assert_eq!(infer_object_type_from_field_name("list"), "Object");
    }

    #[test]
    fn test_infer_is_idempotent_on_canonical_names() {
        for canonical in ["User", "Order", "Product"] {
            assert_eq!(infer_object_type_from_field_name(canonical), canonical);
            assert_eq!(
                infer_object_type_from_field_name(&infer_object_type_from_field_name(canonical)),
                canonical
            );
        }
    }
}
