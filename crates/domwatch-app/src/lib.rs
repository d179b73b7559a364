// Application layer - use cases on top of the domain and infrastructure crates

pub mod application;

pub use application::bootstrap::{bootstrap, resolve_config_path, App};
