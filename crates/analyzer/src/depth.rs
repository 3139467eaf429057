//! Deep-nesting path discovery for the depth probe.

use gqlguard_introspect::{InputValueDef, Schema, TypeDefKind};

/// Greedily walks object-valued fields from the query root to build a
/// nesting path of up to `depth` steps.
///
/// At each step the first field qualifies that (a) is not a list at the
/// outer level, (b) has no required arguments, and (c) returns an
/// object type different from the current one. The walk stops early
/// when no field qualifies; an empty path means the caller should fall
/// back to a synthetic document.
#[must_use]
pub fn deep_path(schema: Option<&Schema>, depth: usize) -> Vec<String> {
    let Some(schema) = schema else {
        return Vec::new();
    };
    let Some(mut current) = schema.query_root() else {
        return Vec::new();
    };

    let mut path = Vec::new();
    for _ in 0..depth {
        let next = current.fields.iter().find_map(|field| {
            if field.ty.is_list() {
                return None;
            }
            if field.args.iter().any(InputValueDef::is_required) {
                return None;
            }
            let name = field.ty.named_type()?;
            if name == current.name {
                return None;
            }
            let def = schema.get_type(name)?;
            (def.kind == TypeDefKind::Object).then(|| (field.name.clone(), def))
        });

        let Some((field_name, def)) = next else { break };
        path.push(field_name);
        current = def;
    }

    path
}
