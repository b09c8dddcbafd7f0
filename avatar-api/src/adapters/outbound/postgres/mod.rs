mod profile;

pub use profile::PostgresProfileStore;
