//! Schema acquisition for gqlguard.
//!
//! The scanner needs one queryable, declaration-ordered [`Schema`] no
//! matter where it came from: remote introspection (the default), or a
//! schema override given as inline SDL, a file path, or a URL. This
//! crate produces that schema and records the introspection posture of
//! the endpoint as findings.

mod error;
mod fetcher;
mod query;
mod response;
mod schema;
mod sdl;

pub use error::{IntrospectError, Result};
pub use fetcher::SchemaFetcher;
pub use query::INTROSPECTION_QUERY;
pub use response::{
    IntrospectionCompositeType, IntrospectionData, IntrospectionField, IntrospectionInputValue,
    IntrospectionNamedType, IntrospectionSchema, IntrospectionType, IntrospectionTypeName,
};
pub use schema::{FieldDef, InputValueDef, Schema, TypeDef, TypeDefKind, TypeKind, TypeRef};
pub use sdl::parse_sdl;
