//! Caller identity. Sessions are resolved upstream; the gateway forwards the
//! authenticated user id in a trusted header.

mod extractor;
mod identity;

pub use extractor::AuthUser;
pub use identity::{resolve_identity, IdentityHeader};
