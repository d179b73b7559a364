use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};

use domwatch_domain::settings::SettingsRepository;
use domwatch_infrastructure::config::{apply_settings, AppConfig};
use domwatch_infrastructure::logging::init_logger;
use domwatch_infrastructure::lookup::WhoisApiClient;
use domwatch_infrastructure::notification::build_senders;
use domwatch_infrastructure::persistence::repositories::{
    SqliteDomainRecordRepository, SqliteNotificationLogRepository, SqliteSettingsRepository,
};
use domwatch_infrastructure::persistence::Database;

use super::services::{DomainCheckScheduler, DomainRegistry, MonitorService, NotificationDispatcher};

pub const CONFIG_ENV_VAR: &str = "DOMWATCH_CONFIG";
pub const DEFAULT_CONFIG_PATH: &str = "config/config.yaml";

/// First CLI argument, then `DOMWATCH_CONFIG`, then the default path
pub fn resolve_config_path(cli_arg: Option<String>, env_value: Option<String>) -> PathBuf {
    cli_arg
        .or(env_value)
        .filter(|p| !p.trim().is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
}

/// Fully wired service graph
pub struct App {
    pub config: AppConfig,
    pub database: Database,
    pub dispatcher: Arc<NotificationDispatcher>,
    pub monitor: Arc<MonitorService>,
    pub registry: DomainRegistry,
    pub scheduler: DomainCheckScheduler,
}

/// Overlay persisted settings on the file config.
/// A failed load keeps the file values and startup carries on.
async fn load_setting_overrides(repo: &dyn SettingsRepository, config: &mut AppConfig) -> usize {
    match repo.find_all().await {
        Ok(settings) => {
            let applied = apply_settings(config, &settings);
            if applied > 0 {
                info!(applied, "Applied persisted setting overrides");
            }
            applied
        }
        Err(e) => {
            warn!(error = %e, "Failed to load persisted settings, using file configuration");
            0
        }
    }
}

pub async fn bootstrap(config_path: &Path) -> Result<App> {
    let mut config = AppConfig::load(config_path)?;

    init_logger(PathBuf::from(&config.logging.dir), &config.logging.level)
        .context("Failed to initialize logging")?;
    info!(config = %config_path.display(), "Configuration loaded");

    let database = Database::new(&config.database.path, config.timeouts().db_acquire)
        .await
        .context("Failed to open database")?;
    database
        .run_migrations()
        .await
        .context("Failed to run database migrations")?;
    let pool = Arc::new(database.pool().clone());

    let settings_repo = SqliteSettingsRepository::new(pool.clone());
    load_setting_overrides(&settings_repo, &mut config).await;

    let timeouts = config.timeouts();
    let channels = config.notifications.enabled_channels();
    let senders = build_senders(&channels, &timeouts);
    info!(
        configured = channels.len(),
        active = senders.len(),
        "Notification channels ready"
    );

    let domain_repo = Arc::new(SqliteDomainRecordRepository::new(pool.clone()));
    let log_repo = Arc::new(SqliteNotificationLogRepository::new(pool));
    let dispatcher = Arc::new(NotificationDispatcher::new(senders, log_repo));

    let lookup = Arc::new(
        WhoisApiClient::new(&config.whois.api_url, timeouts.lookup_request)
            .context("Invalid whois.api_url")?,
    );

    let monitor = Arc::new(MonitorService::new(
        lookup,
        domain_repo.clone(),
        dispatcher.clone(),
        config.monitor.alert_days.clone(),
    ));
    let registry = DomainRegistry::new(domain_repo, monitor.clone());
    let scheduler = DomainCheckScheduler::new(monitor.clone(), &config.monitor.check_interval).await?;

    Ok(App {
        config,
        database,
        dispatcher,
        monitor,
        registry,
        scheduler,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use domwatch_domain::shared::DomainError;
    use mockall::mock;
    use std::collections::HashMap;

    mock! {
        Settings {}

        #[async_trait]
        impl SettingsRepository for Settings {
            async fn find_all(&self) -> Result<HashMap<String, String>, DomainError>;
            async fn set(&self, key: &str, value: &str) -> Result<(), DomainError>;
        }
    }

    #[tokio::test]
    async fn test_settings_load_failure_keeps_file_config() {
        let mut repo = MockSettings::new();
        repo.expect_find_all()
            .times(1)
            .returning(|| Err(DomainError::Repository("database is locked".to_string())));

        let mut config = AppConfig::default();
        let before = config.clone();

        assert_eq!(load_setting_overrides(&repo, &mut config).await, 0);
        assert_eq!(config, before);
    }

    #[tokio::test]
    async fn test_settings_overlay_file_config() {
        let mut repo = MockSettings::new();
        repo.expect_find_all().times(1).returning(|| {
            Ok(HashMap::from([(
                "monitor.check_interval".to_string(),
                "0 6 * * *".to_string(),
            )]))
        });

        let mut config = AppConfig::default();
        assert_eq!(load_setting_overrides(&repo, &mut config).await, 1);
        assert_eq!(config.monitor.check_interval, "0 6 * * *");
    }

    #[test]
    fn test_config_path_precedence() {
        assert_eq!(
            resolve_config_path(Some("a.yaml".into()), Some("b.yaml".into())),
            PathBuf::from("a.yaml")
        );
        assert_eq!(
            resolve_config_path(None, Some("b.yaml".into())),
            PathBuf::from("b.yaml")
        );
        assert_eq!(
            resolve_config_path(None, None),
            PathBuf::from(DEFAULT_CONFIG_PATH)
        );
    }

    #[tokio::test]
    async fn test_bootstrap_wires_services() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("config.yaml");
        let yaml = format!(
            r#"
database:
  path: {db}
whois:
  api_url: http://127.0.0.1:9/whois
monitor:
  check_interval: "0 9 * * *"
notifications:
  webhook:
    enabled: true
    url: http://127.0.0.1:9/hook
  telegram:
    enabled: true
    bot_token: ""
    chat_id: "42"
logging:
  dir: {logs}
"#,
            db = dir.path().join("domwatch.db").display(),
            logs = dir.path().join("logs").display(),
        );
        std::fs::write(&config_path, yaml).unwrap();

        let app = bootstrap(&config_path).await.unwrap();

        // Telegram has no token and is left out
        assert_eq!(app.dispatcher.channel_count(), 1);
        assert_eq!(app.scheduler.expression(), "0 0 9 * * *");
        assert!(app.monitor.check_all_domains().await.unwrap().total == 0);
    }
}
