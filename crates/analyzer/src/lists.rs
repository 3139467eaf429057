//! Candidate list fields for the pagination probe.

use gqlguard_introspect::Schema;

/// Names probed when the schema is unavailable or offers no list
/// fields. Common collection names across public GraphQL APIs.
pub const FALLBACK_LIST_FIELDS: &[&str] = &[
    "users",
    "posts",
    "items",
    "orders",
    "products",
    "nodes",
    "edges",
    "connections",
    "list",
    "all",
    "get",
];

/// Arguments that indicate pagination support; a required argument
/// outside this set disqualifies a field (we cannot call it bare).
const PAGINATION_ARGS: &[&str] = &["first", "last", "before", "after", "limit", "offset"];

/// Root query fields that return a list and can be called without
/// arguments. Falls back to [`FALLBACK_LIST_FIELDS`] when the schema is
/// missing or yields no candidates.
#[must_use]
pub fn find_list_fields(schema: Option<&Schema>) -> Vec<String> {
    let candidates: Vec<String> = schema
        .and_then(Schema::query_root)
        .map(|root| {
            root.fields
                .iter()
                .filter(|field| field.ty.is_list())
                .filter(|field| {
                    field.args.iter().all(|arg| {
                        !arg.is_required()
                            || PAGINATION_ARGS.contains(&arg.name.to_lowercase().as_str())
                    })
                })
                .map(|field| field.name.clone())
                .collect()
        })
        .unwrap_or_default();

    if candidates.is_empty() {
        FALLBACK_LIST_FIELDS
            .iter()
            .map(ToString::to_string)
            .collect()
    } else {
        candidates
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gqlguard_introspect::parse_sdl;

    #[test]
    fn test_list_fields_exclude_required_non_pagination_args() {
        let schema = parse_sdl(
            r"
            type Query {
                users(first: Int, after: String): [User!]!
                posts: [Post]
                search(term: String!): [Post]
                ordersFor(userId: ID!): [Order]
                me: User
            }
            type User { id: ID! }
            type Post { id: ID! }
            type Order { id: ID! }
            ",
        )
        .unwrap();

        let fields = find_list_fields(Some(&schema));
        assert_eq!(fields, ["users", "posts"]);
    }

    #[test]
    fn test_required_pagination_args_are_allowed() {
        let schema = parse_sdl(
            r"
            type Query { feed(first: Int!): [Post] }
            type Post { id: ID! }
            ",
        )
        .unwrap();

        assert_eq!(find_list_fields(Some(&schema)), ["feed"]);
    }

    #[test]
    fn test_fallback_when_schema_missing() {
        let fields = find_list_fields(None);
        assert_eq!(fields.len(), FALLBACK_LIST_FIELDS.len());
        assert_eq!(fields[0], "users");
    }

    #[test]
    fn test_fallback_when_no_field_qualifies() {
        let schema = parse_sdl(
            r"
            type Query { me: User }
            type User { id: ID! }
            ",
        )
        .unwrap();

        assert_eq!(find_list_fields(Some(&schema)), FALLBACK_LIST_FIELDS);
    }
}
