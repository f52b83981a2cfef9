//! Hierarchical configuration: YAML files, one per profile, overridden by environment variables.
mod profile;
mod schema;

pub use profile::ApplicationProfile;
pub use schema::{Config, ServerConfig};
