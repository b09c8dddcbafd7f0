mod client;
mod credentials;
mod signature;

pub use client::*;
pub use credentials::*;
pub use signature::{sign_params, SignatureAlgorithm};
