mod avatar;

pub use avatar::*;
