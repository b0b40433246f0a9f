// Configuration loading and parsing (console.toml plus environment overrides).

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::models::user::UserRole;

/// Environment variables that replace `api.base_url`, checked in order.
pub const API_URL_ENV_VARS: &[&str] = &["AEROTECH_API_URL", "AEROTECH_API_BASE_URL"];

const CONFIG_FILE: &str = "console.toml";

/// Upper bound for `[drafts] due_in_days` (ten years).
pub const MAX_DUE_IN_DAYS: u32 = 3650;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("validation error for field `{field}`: {message}")]
    ValidationError { field: String, message: String },

    #[error("failed to initialize config from defaults: {message}")]
    DefaultsCopyError { message: String },
}

// ---------------------------------------------------------------------------
// console.toml structs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub console: ConsoleConfig,
    #[serde(default)]
    pub drafts: DraftPolicy,
    #[serde(default)]
    pub sprint: SprintConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    /// Scheme + host a relative `base_url` is resolved against.
    #[serde(default = "default_origin")]
    pub origin: String,
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

impl ApiConfig {
    /// The base URL with relative paths joined onto `origin`.
    pub fn resolved_base_url(&self) -> String {
        let base = self.base_url.trim();
        if base.starts_with("http://") || base.starts_with("https://") {
            base.trim_end_matches('/').to_string()
        } else {
            format!(
                "{}/{}",
                self.origin.trim().trim_end_matches('/'),
                base.trim_start_matches('/').trim_end_matches('/')
            )
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        ApiConfig {
            origin: default_origin(),
            base_url: default_base_url(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConsoleConfig {
    /// Preselected role. `None` starts on the user-selection screen.
    #[serde(default)]
    pub role: Option<UserRole>,
    #[serde(default)]
    pub user_id: Option<String>,
}

/// Placeholder policies used when turning planner text into a work package.
#[derive(Debug, Clone, Deserialize)]
pub struct DraftPolicy {
    #[serde(default = "default_due_in_days")]
    pub due_in_days: u32,
    #[serde(default = "default_aircraft")]
    pub default_aircraft: String,
    #[serde(default = "default_ata")]
    pub default_ata: String,
    #[serde(default = "default_placeholder_title")]
    pub placeholder_title: String,
}

impl Default for DraftPolicy {
    fn default() -> Self {
        DraftPolicy {
            due_in_days: default_due_in_days(),
            default_aircraft: default_aircraft(),
            default_ata: default_ata(),
            placeholder_title: default_placeholder_title(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SprintConfig {
    #[serde(default = "default_duration_days")]
    pub default_duration_days: u32,
}

impl Default for SprintConfig {
    fn default() -> Self {
        SprintConfig {
            default_duration_days: default_duration_days(),
        }
    }
}

fn default_origin() -> String {
    "http://127.0.0.1:8000".into()
}
fn default_base_url() -> String {
    "/api".into()
}
fn default_due_in_days() -> u32 {
    7
}
fn default_aircraft() -> String {
    "A320".into()
}
fn default_ata() -> String {
    "27".into()
}
fn default_placeholder_title() -> String {
    "New work package".into()
}
fn default_duration_days() -> u32 {
    14
}

// ---------------------------------------------------------------------------
// Loading logic
// ---------------------------------------------------------------------------

/// Load and validate `config/console.toml` relative to `base_dir`.
///
/// Does not copy defaults and does not read the environment; see
/// [`load_config`] for the full startup path.
pub fn load_config_from(base_dir: &Path) -> Result<Config, ConfigError> {
    let path = base_dir.join("config").join(CONFIG_FILE);
    let text = read_file(&path)?;
    let config: Config = toml::from_str(&text).map_err(|e| ConfigError::ParseError {
        path: path.clone(),
        source: e,
    })?;

    validate(&config)?;

    Ok(config)
}

/// Ensure all config files exist by copying missing ones from `defaults/`.
/// Returns the list of files that were copied. Skips `.example` files.
pub fn ensure_config_files(base_dir: &Path) -> Result<Vec<PathBuf>, ConfigError> {
    let defaults_dir = base_dir.join("defaults");
    let config_dir = base_dir.join("config");

    if !defaults_dir.exists() {
        if !config_dir.exists() {
            return Err(ConfigError::DefaultsCopyError {
                message: format!(
                    "neither defaults/ nor config/ directory found in {}; \
                     run from the project root or ensure defaults/ is present",
                    base_dir.display()
                ),
            });
        }
        return Ok(vec![]);
    }

    std::fs::create_dir_all(&config_dir).map_err(|e| ConfigError::DefaultsCopyError {
        message: format!("failed to create config directory: {e}"),
    })?;

    let entries = std::fs::read_dir(&defaults_dir).map_err(|e| ConfigError::DefaultsCopyError {
        message: format!("failed to read defaults directory: {e}"),
    })?;

    let mut copied = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| ConfigError::DefaultsCopyError {
            message: format!("failed to read defaults entry: {e}"),
        })?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let Some(file_name) = path.file_name() else {
            continue;
        };
        if file_name.to_str().is_some_and(|n| n.ends_with(".example")) {
            continue;
        }
        let target = config_dir.join(file_name);

        match std::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&target)
        {
            Ok(mut dest) => {
                let content = std::fs::read(&path).map_err(|e| ConfigError::DefaultsCopyError {
                    message: format!("failed to read {}: {e}", path.display()),
                })?;
                std::io::Write::write_all(&mut dest, &content).map_err(|e| {
                    ConfigError::DefaultsCopyError {
                        message: format!("failed to write {}: {e}", target.display()),
                    }
                })?;
                copied.push(target);
            }
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {}
            Err(e) => {
                return Err(ConfigError::DefaultsCopyError {
                    message: format!("failed to create {}: {e}", target.display()),
                });
            }
        }
    }

    Ok(copied)
}

/// Replace `api.base_url` with the first non-empty override from `lookup`.
///
/// Returns the name of the variable that won, if any.
pub fn apply_env_overrides<F>(config: &mut Config, lookup: F) -> Option<&'static str>
where
    F: Fn(&str) -> Option<String>,
{
    for name in API_URL_ENV_VARS {
        if let Some(value) = lookup(name).filter(|v| !v.trim().is_empty()) {
            config.api.base_url = value.trim().to_string();
            return Some(name);
        }
    }
    None
}

/// Convenience wrapper: copies defaults, loads relative to the current
/// working directory, then applies environment overrides.
pub fn load_config() -> Result<Config, ConfigError> {
    let cwd = std::env::current_dir().map_err(|_| ConfigError::FileNotFound {
        path: PathBuf::from("."),
    })?;
    ensure_config_files(&cwd)?;
    let mut config = load_config_from(&cwd)?;
    if let Some(var) = apply_env_overrides(&mut config, |name| std::env::var(name).ok()) {
        tracing::info!("api.base_url overridden by {var}");
    }
    validate(&config)?;
    Ok(config)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn read_file(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
        path: path.to_path_buf(),
    })
}

fn validate(config: &Config) -> Result<(), ConfigError> {
    if config.api.base_url.trim().is_empty() {
        return Err(ConfigError::ValidationError {
            field: "api.base_url".into(),
            message: "must not be empty".into(),
        });
    }

    let base = config.api.base_url.trim();
    let absolute = base.starts_with("http://") || base.starts_with("https://");
    if !absolute && config.api.origin.trim().is_empty() {
        return Err(ConfigError::ValidationError {
            field: "api.origin".into(),
            message: "required when api.base_url is a relative path".into(),
        });
    }

    if config.drafts.due_in_days == 0 || config.drafts.due_in_days > MAX_DUE_IN_DAYS {
        return Err(ConfigError::ValidationError {
            field: "drafts.due_in_days".into(),
            message: format!("must be between 1 and {MAX_DUE_IN_DAYS}"),
        });
    }

    let draft_fields: &[(&str, &str)] = &[
        ("drafts.default_aircraft", &config.drafts.default_aircraft),
        ("drafts.default_ata", &config.drafts.default_ata),
        ("drafts.placeholder_title", &config.drafts.placeholder_title),
    ];
    for (name, val) in draft_fields {
        if val.trim().is_empty() {
            return Err(ConfigError::ValidationError {
                field: name.to_string(),
                message: "must not be empty".into(),
            });
        }
    }

    if config.sprint.default_duration_days == 0 {
        return Err(ConfigError::ValidationError {
            field: "sprint.default_duration_days".into(),
            message: "must be greater than 0".into(),
        });
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
