//! Services shared by every command

use std::sync::Arc;

use anyhow::{Context, Result};
use fleet_access::navigation::load_menu;
use fleet_access::{FileStorage, LocalStorage, PermissionResolver, PermissionStore, SessionStore};
use fleet_shared::AppConfig;
use tracing::debug;

pub struct AppContext {
    pub config: AppConfig,
    pub permissions: Arc<PermissionStore>,
    pub session: Arc<SessionStore>,
    pub resolver: PermissionResolver,
}

impl AppContext {
    pub fn from_config(config: AppConfig) -> Result<Self> {
        debug!("Local storage at {}", config.storage.path.display());
        let storage: Arc<dyn LocalStorage> = Arc::new(FileStorage::new(&config.storage.path));
        Self::with_storage(config, storage)
    }

    pub fn with_storage(config: AppConfig, storage: Arc<dyn LocalStorage>) -> Result<Self> {
        let menu = load_menu(config.access.menu_path.as_deref())
            .context("Failed to load navigation menu")?;

        let permissions = Arc::new(PermissionStore::new(storage.clone()));
        let session = Arc::new(SessionStore::new(storage));
        let resolver = PermissionResolver::new(Arc::new(menu), permissions.clone());

        Ok(Self {
            config,
            permissions,
            session,
            resolver,
        })
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::path::{Path, PathBuf};

    use fleet_access::MemoryStorage;
    use fleet_shared::config::{
        AccessSettings, ApiSettings, AppSettings, ExportSettings, LogFormat, LoggingSettings,
        StorageSettings,
    };

    use super::*;

    pub fn config(output_dir: &Path, base_url: &str) -> AppConfig {
        AppConfig {
            app: AppSettings {
                env: "test".into(),
                name: "fleet-admin".into(),
            },
            storage: StorageSettings {
                path: PathBuf::from("unused.json"),
            },
            api: ApiSettings {
                base_url: base_url.into(),
                timeout_seconds: 5,
            },
            export: ExportSettings {
                output_dir: output_dir.to_path_buf(),
                column_width: 20.0,
                rows_per_page: 25,
            },
            logging: LoggingSettings {
                level: "debug".into(),
                format: LogFormat::Pretty,
                directory: None,
            },
            access: AccessSettings::default(),
        }
    }

    pub fn context(output_dir: &Path) -> AppContext {
        context_with_api(output_dir, "http://127.0.0.1:9")
    }

    pub fn context_with_api(output_dir: &Path, base_url: &str) -> AppContext {
        AppContext::with_storage(config(output_dir, base_url), Arc::new(MemoryStorage::new()))
            .unwrap()
    }
}
