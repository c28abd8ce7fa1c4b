//! Configuration management

use std::path::{Path, PathBuf};

use config::{Config, Environment, File};
use serde::Deserialize;

use crate::constants::{DEFAULT_API_TIMEOUT_SECONDS, DEFAULT_COLUMN_WIDTH, DEFAULT_ROWS_PER_PAGE};
use crate::error::AppError;

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub app: AppSettings,
    pub storage: StorageSettings,
    pub api: ApiSettings,
    pub export: ExportSettings,
    pub logging: LoggingSettings,
    #[serde(default)]
    pub access: AccessSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppSettings {
    pub env: String,
    pub name: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StorageSettings {
    /// JSON document standing in for the browser's local storage.
    pub path: PathBuf,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ApiSettings {
    pub base_url: String,
    pub timeout_seconds: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ExportSettings {
    pub output_dir: PathBuf,
    pub column_width: f64,
    pub rows_per_page: usize,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingSettings {
    pub level: String,
    pub format: LogFormat,
    /// Daily-rotated log files are written here when set.
    #[serde(default)]
    pub directory: Option<PathBuf>,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct AccessSettings {
    /// JSON menu definition replacing the built-in navigation tree.
    #[serde(default)]
    pub menu_path: Option<PathBuf>,
}

impl AppConfig {
    pub fn load() -> Result<Self, AppError> {
        Self::load_with(None)
    }

    /// Layered load: defaults, `config/default`, `config/{APP_ENV}`, an
    /// optional explicit file, then `FLEET_SECTION__KEY` environment variables.
    pub fn load_with(extra_file: Option<&Path>) -> Result<Self, AppError> {
        dotenvy::dotenv().ok();

        let env = std::env::var("APP_ENV").unwrap_or_else(|_| "development".into());
        let mut builder = Config::builder()
            .set_default("app.env", env.clone())?
            .set_default("app.name", "fleet-admin")?
            .set_default("storage.path", ".fleet/local-storage.json")?
            .set_default("api.base_url", "http://127.0.0.1:8080")?
            .set_default("api.timeout_seconds", DEFAULT_API_TIMEOUT_SECONDS)?
            .set_default("export.output_dir", "exports")?
            .set_default("export.column_width", DEFAULT_COLUMN_WIDTH)?
            .set_default("export.rows_per_page", DEFAULT_ROWS_PER_PAGE as u64)?
            .set_default("logging.level", "info")?
            .set_default("logging.format", "pretty")?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env)).required(false));

        if let Some(path) = extra_file {
            builder = builder.add_source(File::from(path).required(true));
        }

        let config = builder
            .add_source(
                Environment::with_prefix("FLEET")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let settings: AppConfig = config.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<(), AppError> {
        if self.export.rows_per_page == 0 {
            return Err(AppError::InvalidConfig(
                "export.rows_per_page must be greater than zero".into(),
            ));
        }
        if self.export.column_width.is_nan() || self.export.column_width <= 0.0 {
            return Err(AppError::InvalidConfig(
                "export.column_width must be positive".into(),
            ));
        }
        if self.api.base_url.trim().is_empty() {
            return Err(AppError::InvalidConfig("api.base_url is empty".into()));
        }
        Ok(())
    }
}
