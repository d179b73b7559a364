mod domain_record_repo;
mod notification_log_repo;
mod settings_repo;

pub use domain_record_repo::SqliteDomainRecordRepository;
pub use notification_log_repo::SqliteNotificationLogRepository;
pub use settings_repo::SqliteSettingsRepository;
