mod domain_registry;
mod monitor_service;
mod notification_dispatcher;
mod scheduler;

#[cfg(test)]
mod test_support;

pub use domain_registry::{DomainRegistry, ImportSummary};
pub use monitor_service::{BatchCheckSummary, MonitorService};
pub use notification_dispatcher::{DispatchSummary, NotificationDispatcher};
pub use scheduler::{normalize_cron_expression, DomainCheckScheduler};
