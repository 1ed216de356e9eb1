use crate::Result;
use anyhow::anyhow;
use once_cell::sync::Lazy;
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;

// TOML configuration structure
#[derive(Debug, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub upload_refresh: UploadRefreshConfig,
    #[serde(default)]
    pub analytics: AnalyticsConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default)]
    pub token: String,
    #[serde(default = "default_timeout")]
    pub timeout: String,
}

/// アップロード後の再取得（ポーリング）設定
#[derive(Debug, Deserialize)]
pub struct UploadRefreshConfig {
    #[serde(default = "default_initial_delay")]
    pub initial_delay: String,
    #[serde(default = "default_poll_interval")]
    pub poll_interval: String,
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
}

#[derive(Debug, Deserialize)]
pub struct AnalyticsConfig {
    #[serde(default = "default_timestamp_policy")]
    pub timestamp_policy: String,
    #[serde(default = "default_lookback_days")]
    pub default_lookback_days: u32,
}

#[derive(Debug, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_rust_log_format")]
    pub rust_log_format: String,
}

// Default values
fn default_base_url() -> String {
    "http://127.0.0.1:8000/api/v1".to_string()
}
fn default_timeout() -> String {
    "30s".to_string()
}
fn default_initial_delay() -> String {
    "2s".to_string()
}
fn default_poll_interval() -> String {
    "1s".to_string()
}
fn default_max_attempts() -> u32 {
    5
}
fn default_timestamp_policy() -> String {
    "pass_through".to_string()
}
fn default_lookback_days() -> u32 {
    30
}
fn default_rust_log_format() -> String {
    "term".to_string()
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            token: String::new(),
            timeout: default_timeout(),
        }
    }
}

impl Default for UploadRefreshConfig {
    fn default() -> Self {
        Self {
            initial_delay: default_initial_delay(),
            poll_interval: default_poll_interval(),
            max_attempts: default_max_attempts(),
        }
    }
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            timestamp_policy: default_timestamp_policy(),
            default_lookback_days: default_lookback_days(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            rust_log_format: default_rust_log_format(),
        }
    }
}

static CONFIG: Lazy<Config> = Lazy::new(|| {
    load_config().unwrap_or_else(|e| {
        eprintln!(
            "Warning: Failed to load config files: {}. Using defaults.",
            e
        );
        Config::default()
    })
});

static CONFIG_STORE: Lazy<Arc<Mutex<HashMap<String, String>>>> =
    Lazy::new(|| Arc::new(Mutex::new(HashMap::new())));

pub fn get(name: &str) -> Result<String> {
    // Priority 1: CONFIG_STORE (runtime overrides)
    if let Some(value) = get_from_store(name) {
        if value.is_empty() {
            return Err(anyhow!("{} is empty", name));
        }
        return Ok(value);
    }

    // Priority 2: Environment variables
    if let Ok(val) = std::env::var(name)
        && !val.is_empty()
    {
        return Ok(val);
    }

    // Priority 3: TOML config
    let toml_value = match name {
        "DASHBOARD_API_BASE_URL" => Some(CONFIG.api.base_url.clone()),
        "DASHBOARD_API_TOKEN" => Some(CONFIG.api.token.clone()),
        "DASHBOARD_HTTP_TIMEOUT" => Some(CONFIG.api.timeout.clone()),
        "UPLOAD_REFRESH_DELAY" => Some(CONFIG.upload_refresh.initial_delay.clone()),
        "UPLOAD_POLL_INTERVAL" => Some(CONFIG.upload_refresh.poll_interval.clone()),
        "UPLOAD_POLL_MAX_ATTEMPTS" => Some(CONFIG.upload_refresh.max_attempts.to_string()),
        "TIMESTAMP_POLICY" => Some(CONFIG.analytics.timestamp_policy.clone()),
        "DEFAULT_LOOKBACK_DAYS" => Some(CONFIG.analytics.default_lookback_days.to_string()),
        "RUST_LOG_FORMAT" => Some(CONFIG.logging.rust_log_format.clone()),
        _ => None,
    };

    if let Some(value) = toml_value
        && !value.is_empty()
    {
        return Ok(value);
    }

    Err(anyhow!("Configuration key not found: {}", name))
}

/// humantime 形式（"2s", "500ms" など）の設定値を Duration として取得する。
///
/// 未設定またはパースできない場合は `default` を返す。
pub fn get_duration(name: &str, default: Duration) -> Duration {
    get(name)
        .ok()
        .and_then(|v| humantime::parse_duration(&v).ok())
        .unwrap_or(default)
}

/// テスト用: 設定値を上書きする
///
/// 注: `#[cfg(test)]` にすると他クレートのテストから参照できないため
/// `#[doc(hidden)]` で公開している
#[doc(hidden)]
pub fn set(name: &str, value: &str) {
    if let Ok(mut store) = CONFIG_STORE.lock() {
        store.insert(name.to_string(), value.to_string());
    }
}

/// テスト用: 設定値を CONFIG_STORE から削除する
#[doc(hidden)]
pub fn remove(name: &str) {
    if let Ok(mut store) = CONFIG_STORE.lock() {
        store.remove(name);
    }
}

/// テスト用: CONFIG_STORE に値をセットし、Drop 時に自動で元に戻す RAII ガード。
///
/// テストが途中で panic しても確実にクリーンアップされる。
#[doc(hidden)]
pub struct ConfigGuard {
    key: String,
    previous: Option<String>,
}

impl ConfigGuard {
    pub fn new(key: &str, value: &str) -> Self {
        let previous = get_from_store(key);
        set(key, value);
        Self {
            key: key.to_string(),
            previous,
        }
    }
}

impl Drop for ConfigGuard {
    fn drop(&mut self) {
        match &self.previous {
            Some(prev) => set(&self.key, prev),
            None => remove(&self.key),
        }
    }
}

fn get_from_store(name: &str) -> Option<String> {
    if let Ok(store) = CONFIG_STORE.lock() {
        store.get(name).cloned()
    } else {
        None
    }
}

/// Load configuration from TOML files with priority:
/// 1. config/config.local.toml (git-ignored, for local overrides)
/// 2. config/config.toml (git-managed template)
/// 3. Default values
fn load_config() -> Result<Config> {
    let mut config = Config::default();

    let base_path = "config/config.toml";
    if Path::new(base_path).exists() {
        let content = fs::read_to_string(base_path)?;
        config = toml::from_str(&content)?;
    }

    let local_path = "config/config.local.toml";
    if Path::new(local_path).exists() {
        let content = fs::read_to_string(local_path)?;
        let local_config: Config = toml::from_str(&content)?;
        merge_config(&mut config, local_config);
    }

    Ok(config)
}

/// Merge local config into base config (local values override base values)
fn merge_config(base: &mut Config, local: Config) {
    // API
    if local.api.base_url != default_base_url() {
        base.api.base_url = local.api.base_url;
    }
    if !local.api.token.is_empty() {
        base.api.token = local.api.token;
    }
    if local.api.timeout != default_timeout() {
        base.api.timeout = local.api.timeout;
    }

    // Upload refresh
    if local.upload_refresh.initial_delay != default_initial_delay() {
        base.upload_refresh.initial_delay = local.upload_refresh.initial_delay;
    }
    if local.upload_refresh.poll_interval != default_poll_interval() {
        base.upload_refresh.poll_interval = local.upload_refresh.poll_interval;
    }
    if local.upload_refresh.max_attempts != default_max_attempts() {
        base.upload_refresh.max_attempts = local.upload_refresh.max_attempts;
    }

    // Analytics
    if local.analytics.timestamp_policy != default_timestamp_policy() {
        base.analytics.timestamp_policy = local.analytics.timestamp_policy;
    }
    if local.analytics.default_lookback_days != default_lookback_days() {
        base.analytics.default_lookback_days = local.analytics.default_lookback_days;
    }

    // Logging
    if local.logging.rust_log_format != default_rust_log_format() {
        base.logging.rust_log_format = local.logging.rust_log_format;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_config_store_priority() {
        // CONFIG_STOREの値が最優先
        const TEST_KEY: &str = "RUST_LOG_FORMAT";
        unsafe {
            std::env::set_var(TEST_KEY, "env-value");
        }
        set(TEST_KEY, "store-value");
        let result = get(TEST_KEY).unwrap();
        assert_eq!(result, "store-value");

        remove(TEST_KEY);
        unsafe {
            std::env::remove_var(TEST_KEY);
        }
    }

    #[test]
    #[serial]
    fn test_env_overrides_toml() {
        const TEST_KEY: &str = "UPLOAD_POLL_MAX_ATTEMPTS";
        remove(TEST_KEY);
        unsafe {
            std::env::set_var(TEST_KEY, "9");
        }
        assert_eq!(get(TEST_KEY).unwrap(), "9");
        unsafe {
            std::env::remove_var(TEST_KEY);
        }
    }

    #[test]
    #[serial]
    fn test_defaults() {
        let keys_and_defaults = [
            ("DASHBOARD_API_BASE_URL", "http://127.0.0.1:8000/api/v1"),
            ("DASHBOARD_HTTP_TIMEOUT", "30s"),
            ("UPLOAD_REFRESH_DELAY", "2s"),
            ("UPLOAD_POLL_INTERVAL", "1s"),
            ("UPLOAD_POLL_MAX_ATTEMPTS", "5"),
            ("TIMESTAMP_POLICY", "pass_through"),
            ("DEFAULT_LOOKBACK_DAYS", "30"),
        ];

        for (key, expected) in &keys_and_defaults {
            unsafe {
                std::env::remove_var(key);
            }
            remove(key);
            let result = get(key).unwrap();
            assert_eq!(result, *expected, "key={key}");
        }
    }

    #[test]
    #[serial]
    fn test_token_absent_by_default() {
        unsafe {
            std::env::remove_var("DASHBOARD_API_TOKEN");
        }
        remove("DASHBOARD_API_TOKEN");
        // トークン未設定は空文字列なので Err（資格情報なし）になる
        assert!(get("DASHBOARD_API_TOKEN").is_err());
    }

    #[test]
    #[serial]
    fn test_unknown_key() {
        assert!(get("NO_SUCH_DASHBOARD_KEY").is_err());
    }

    #[test]
    #[serial]
    fn test_get_duration() {
        let _guard = ConfigGuard::new("UPLOAD_REFRESH_DELAY", "250ms");
        assert_eq!(
            get_duration("UPLOAD_REFRESH_DELAY", Duration::from_secs(2)),
            Duration::from_millis(250)
        );
    }

    #[test]
    #[serial]
    fn test_get_duration_falls_back_on_garbage() {
        let _guard = ConfigGuard::new("UPLOAD_POLL_INTERVAL", "soon");
        assert_eq!(
            get_duration("UPLOAD_POLL_INTERVAL", Duration::from_secs(1)),
            Duration::from_secs(1)
        );
    }

    #[test]
    #[serial]
    fn test_config_guard_restores_previous() {
        set("DEFAULT_LOOKBACK_DAYS", "7");
        {
            let _guard = ConfigGuard::new("DEFAULT_LOOKBACK_DAYS", "90");
            assert_eq!(get("DEFAULT_LOOKBACK_DAYS").unwrap(), "90");
        }
        assert_eq!(get("DEFAULT_LOOKBACK_DAYS").unwrap(), "7");
        remove("DEFAULT_LOOKBACK_DAYS");
    }

    #[test]
    fn test_merge_local_overrides() {
        let mut base = Config::default();
        let mut local = Config::default();
        local.api.base_url = "http://dashboard.internal/api/v1".to_string();
        local.upload_refresh.max_attempts = 12;

        merge_config(&mut base, local);

        assert_eq!(base.api.base_url, "http://dashboard.internal/api/v1");
        assert_eq!(base.upload_refresh.max_attempts, 12);
        assert_eq!(base.upload_refresh.initial_delay, "2s");
    }

    #[test]
    fn test_parse_toml_sections() {
        let content = r#"
            [api]
            base_url = "http://localhost:9000/api/v1"

            [analytics]
            timestamp_policy = "reject"
        "#;
        let config: Config = toml::from_str(content).unwrap();
        assert_eq!(config.api.base_url, "http://localhost:9000/api/v1");
        assert_eq!(config.api.timeout, "30s");
        assert_eq!(config.analytics.timestamp_policy, "reject");
        assert_eq!(config.analytics.default_lookback_days, 30);
    }
}
