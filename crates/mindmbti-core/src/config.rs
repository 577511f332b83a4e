// Configuration loading and parsing (client.toml).

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Environment variable that overrides `api.base_url`.
pub const API_URL_ENV: &str = "MINDMBTI_API_URL";

const CONFIG_FILE: &str = "client.toml";

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
// client.toml structs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub api: ApiConfig,
    pub ui: UiConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    /// Backend root including the `/api` prefix, e.g.
    /// `https://mindmbti-api.onrender.com/api`.
    pub base_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UiConfig {
    /// Seconds before a pending question fetch shows the "server may be
    /// asleep" hint.
    pub slow_hint_after_secs: u64,
    /// Where downloaded PDFs are written.
    pub download_dir: String,
    /// Web origin used to print share links (`<origin>/share/<id>`). When
    /// empty the backend's relative `share_url` is shown instead.
    #[serde(default)]
    pub share_origin: Option<String>,
}

impl UiConfig {
    pub fn slow_hint_after(&self) -> Duration {
        Duration::from_secs(self.slow_hint_after_secs)
    }
}

// ---------------------------------------------------------------------------
// Loading logic
// ---------------------------------------------------------------------------

/// Load and validate `config/client.toml` relative to `base_dir`, then apply
/// environment overrides from `env`.
///
/// This is the lower-level loading primitive that does not auto-copy defaults.
/// Prefer `load_config()` which handles default initialization automatically.
pub fn load_config_from(
    base_dir: &Path,
    env: impl Fn(&str) -> Option<String>,
) -> Result<Config, ConfigError> {
    let path = base_dir.join("config").join(CONFIG_FILE);
    let text = read_file(&path)?;
    let mut config: Config = toml::from_str(&text).map_err(|e| ConfigError::ParseError {
        path: path.clone(),
        source: e,
    })?;

    if let Some(url) = env(API_URL_ENV).filter(|u| !u.trim().is_empty()) {
        config.api.base_url = url.trim().to_string();
    }

    config.api.base_url = config.api.base_url.trim_end_matches('/').to_string();
    config.ui.share_origin = config
        .ui
        .share_origin
        .take()
        .map(|o| o.trim().trim_end_matches('/').to_string())
        .filter(|o| !o.is_empty());

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

    let mut copied = Vec::new();

    let entries = std::fs::read_dir(&defaults_dir).map_err(|e| ConfigError::DefaultsCopyError {
        message: format!("failed to read defaults directory: {e}"),
    })?;

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

/// Convenience wrapper: loads config relative to the current working directory,
/// honouring `MINDMBTI_API_URL`. Ensures default config files are copied first.
pub fn load_config() -> Result<Config, ConfigError> {
    let cwd = std::env::current_dir().map_err(|_| ConfigError::FileNotFound {
        path: PathBuf::from("."),
    })?;
    ensure_config_files(&cwd)?;
    load_config_from(&cwd, |key| std::env::var(key).ok())
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
    let url = &config.api.base_url;
    if !(url.starts_with("http://") || url.starts_with("https://")) {
        return Err(ConfigError::ValidationError {
            field: "api.base_url".into(),
            message: format!("must start with http:// or https://, got {url:?}"),
        });
    }

    if config.ui.slow_hint_after_secs == 0 {
        return Err(ConfigError::ValidationError {
            field: "ui.slow_hint_after_secs".into(),
            message: "must be > 0".into(),
        });
    }

    if config.ui.download_dir.trim().is_empty() {
        return Err(ConfigError::ValidationError {
            field: "ui.download_dir".into(),
            message: "must not be empty".into(),
        });
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    /// Helper: returns the workspace root that holds `defaults/`
    /// (works whether `cargo test` runs from the crate dir or the repo root).
    fn project_root() -> PathBuf {
        let cwd = std::env::current_dir().unwrap();
        if cwd.join("defaults").exists() {
            cwd
        } else if cwd.join("../../defaults").exists() {
            cwd.join("../..")
        } else {
            panic!("Cannot locate defaults/ directory from CWD {:?}", cwd);
        }
    }

    fn no_env(_: &str) -> Option<String> {
        None
    }

    /// Write `client.toml` into a fresh temp dir and return the dir.
    fn temp_config(name: &str, contents: &str) -> PathBuf {
        let tmp = std::env::temp_dir().join(format!("mindmbti_config_test_{name}"));
        let _ = fs::remove_dir_all(&tmp);
        fs::create_dir_all(tmp.join("config")).unwrap();
        fs::write(tmp.join("config").join(CONFIG_FILE), contents).unwrap();
        tmp
    }

    const VALID: &str = r#"
[api]
base_url = "https://mindmbti-api.example.com/api/"

[ui]
slow_hint_after_secs = 15
download_dir = "downloads"
share_origin = "https://mindmbti.example.com/"
"#;

    #[test]
    fn load_valid_config_from_defaults() {
        let root = project_root();
        let tmp = std::env::temp_dir().join("mindmbti_config_test_defaults");
        let _ = fs::remove_dir_all(&tmp);
        fs::create_dir_all(tmp.join("defaults")).unwrap();
        fs::copy(
            root.join("defaults").join(CONFIG_FILE),
            tmp.join("defaults").join(CONFIG_FILE),
        )
        .unwrap();

        ensure_config_files(&tmp).expect("should copy default configs");
        let config = load_config_from(&tmp, no_env).expect("should load valid config");

        assert_eq!(config.api.base_url, "http://127.0.0.1:8000/api");
        assert_eq!(config.ui.slow_hint_after_secs, 15);
        assert_eq!(config.ui.slow_hint_after(), Duration::from_secs(15));
        assert_eq!(config.ui.download_dir, "downloads");
        assert!(config.ui.share_origin.is_none());
    }

    #[test]
    fn trailing_slashes_are_stripped() {
        let tmp = temp_config("slashes", VALID);
        let config = load_config_from(&tmp, no_env).unwrap();
        assert_eq!(config.api.base_url, "https://mindmbti-api.example.com/api");
        assert_eq!(
            config.ui.share_origin.as_deref(),
            Some("https://mindmbti.example.com")
        );
    }

    #[test]
    fn env_overrides_base_url() {
        let tmp = temp_config("env_override", VALID);
        let config = load_config_from(&tmp, |key| {
            (key == API_URL_ENV).then(|| "http://localhost:9999/api".to_string())
        })
        .unwrap();
        assert_eq!(config.api.base_url, "http://localhost:9999/api");
    }

    #[test]
    fn blank_env_override_is_ignored() {
        let tmp = temp_config("env_blank", VALID);
        let config = load_config_from(&tmp, |_| Some("  ".to_string())).unwrap();
        assert_eq!(config.api.base_url, "https://mindmbti-api.example.com/api");
    }

    #[test]
    fn rejects_non_http_base_url() {
        let tmp = temp_config(
            "bad_url",
            &VALID.replace("https://mindmbti-api.example.com/api/", "/api"),
        );
        match load_config_from(&tmp, no_env) {
            Err(ConfigError::ValidationError { field, .. }) => assert_eq!(field, "api.base_url"),
            other => panic!("expected ValidationError, got {other:?}"),
        }
    }

    #[test]
    fn rejects_zero_slow_hint() {
        let tmp = temp_config(
            "zero_hint",
            &VALID.replace("slow_hint_after_secs = 15", "slow_hint_after_secs = 0"),
        );
        match load_config_from(&tmp, no_env) {
            Err(ConfigError::ValidationError { field, .. }) => {
                assert_eq!(field, "ui.slow_hint_after_secs")
            }
            other => panic!("expected ValidationError, got {other:?}"),
        }
    }

    #[test]
    fn file_not_found_for_missing_client_toml() {
        let tmp = std::env::temp_dir().join("mindmbti_config_test_missing");
        let _ = fs::remove_dir_all(&tmp);
        fs::create_dir_all(&tmp).unwrap();
        assert!(matches!(
            load_config_from(&tmp, no_env),
            Err(ConfigError::FileNotFound { .. })
        ));
    }

    #[test]
    fn parse_error_for_invalid_toml() {
        let tmp = temp_config("invalid", "[api\nbase_url = ");
        assert!(matches!(
            load_config_from(&tmp, no_env),
            Err(ConfigError::ParseError { .. })
        ));
    }

    #[test]
    fn ensure_config_files_skips_existing() {
        let tmp = temp_config("skip_existing", VALID);
        fs::create_dir_all(tmp.join("defaults")).unwrap();
        fs::write(tmp.join("defaults").join(CONFIG_FILE), "overwritten = true").unwrap();
        fs::write(tmp.join("defaults").join("client.toml.example"), "").unwrap();

        let copied = ensure_config_files(&tmp).unwrap();
        assert!(copied.is_empty());
        let kept = fs::read_to_string(tmp.join("config").join(CONFIG_FILE)).unwrap();
        assert!(kept.contains("mindmbti-api.example.com"));
        assert!(!tmp.join("config").join("client.toml.example").exists());
    }

    #[test]
    fn ensure_config_files_errors_when_both_dirs_missing() {
        let tmp = std::env::temp_dir().join("mindmbti_config_test_empty");
        let _ = fs::remove_dir_all(&tmp);
        fs::create_dir_all(&tmp).unwrap();
        assert!(matches!(
            ensure_config_files(&tmp),
            Err(ConfigError::DefaultsCopyError { .. })
        ));
    }
}
