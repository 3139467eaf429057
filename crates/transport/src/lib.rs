//! HTTP transport and error classification for gqlguard.
//!
//! All scanner traffic goes through [`GraphqlClient`]: JSON-wrapped
//! GraphQL POSTs with per-principal bearer headers and per-request
//! timeouts. Failures surface as a small set of [`TransportError`]
//! values whose display strings double as classifier input and finding
//! evidence.

mod classify;
mod client;
mod error;
mod response;

pub use classify::{classify, ErrorClass};
pub use client::GraphqlClient;
pub use error::{Result, TransportError};
pub use response::{GraphqlError, GraphqlResponse};
