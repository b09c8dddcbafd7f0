mod asset_store;
#[cfg(test)]
pub mod mock;
mod profile_store;

pub use asset_store::*;
pub use profile_store::*;
