// Domain layer - Pure business logic
// No dependencies on infrastructure or application layers

pub mod domain_record;
pub mod lookup;
pub mod monitor;
pub mod notification;
pub mod settings;
pub mod shared;

// Re-exports for convenience
pub use domain_record::DomainRecord;
pub use shared::{DomainError, DomainId};
