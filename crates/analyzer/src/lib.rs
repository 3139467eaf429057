//! Schema analysis and probe synthesis.
//!
//! Three pure extractors turn a schema into a finite probe plan (BOLA
//! points of interest, unpaginated list-field candidates, and a deep
//! nesting path) and the operation builder renders each planned probe
//! as valid GraphQL text. Everything here tolerates a missing schema by
//! returning fallbacks; nothing performs I/O.

mod depth;
mod lists;
mod operations;
mod points;

pub use depth::deep_path;
pub use lists::{find_list_fields, FALLBACK_LIST_FIELDS};
pub use operations::{build_bola_operation, build_deep_query, build_list_query};
pub use points::{
    find_bola_points_of_interest, infer_object_type_from_field_name, BolaPointOfInterest,
    OperationKind,
};
