pub mod bootstrap;
pub mod services;
