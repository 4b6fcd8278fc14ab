// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow, bail};
use mealjoin_app::Route;
use mealjoin_store::StoreOptions;
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

const CONFIG_VERSION: i64 = 1;
const DEFAULT_LATENCY: &str = "1s";
const DEFAULT_PAYMENT_DELAY: &str = "3s";
const DEFAULT_START_SCREEN: &str = "find-meal";
const DEFAULT_TOAST_SECONDS: i64 = 4;
const DEFAULT_LOG_LEVEL: &str = "warn";
const LOG_LEVELS: [&str; 6] = ["trace", "debug", "info", "warn", "error", "off"];

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub version: i64,
    #[serde(default)]
    pub data: Data,
    #[serde(default)]
    pub ui: Ui,
    #[serde(default)]
    pub log: Log,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            data: Data::default(),
            ui: Ui::default(),
            log: Log::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Data {
    pub latency: Option<String>,
    pub payment_delay: Option<String>,
    pub fail_fetches: Option<bool>,
    pub fail_mutations: Option<bool>,
}

impl Default for Data {
    fn default() -> Self {
        Self {
            latency: Some(DEFAULT_LATENCY.to_owned()),
            payment_delay: Some(DEFAULT_PAYMENT_DELAY.to_owned()),
            fail_fetches: Some(false),
            fail_mutations: Some(false),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Ui {
    pub start_screen: Option<String>,
    pub toast_seconds: Option<i64>,
}

impl Default for Ui {
    fn default() -> Self {
        Self {
            start_screen: Some(DEFAULT_START_SCREEN.to_owned()),
            toast_seconds: Some(DEFAULT_TOAST_SECONDS),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Log {
    pub level: Option<String>,
    pub file: Option<String>,
}

impl Config {
    pub fn default_path() -> Result<PathBuf> {
        if let Some(path) = env::var_os("MEALJOIN_CONFIG_PATH") {
            return Ok(PathBuf::from(path));
        }

        let config_root = dirs::config_dir().ok_or_else(|| {
            anyhow!("cannot resolve config directory; set MEALJOIN_CONFIG_PATH to the config file")
        })?;

        Ok(config_root
            .join(mealjoin_store::APP_NAME)
            .join("config.toml"))
    }

    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let raw = fs::read_to_string(path)
            .with_context(|| format!("read config file {}", path.display()))?;
        let value: toml::Value = toml::from_str(&raw)
            .with_context(|| format!("parse TOML config {}", path.display()))?;

        let version = value
            .get("version")
            .and_then(toml::Value::as_integer)
            .ok_or_else(|| {
                anyhow!(
                    "config file {} is not versioned. Add `version = 1` and keep values under [data], [ui], and [log]",
                    path.display()
                )
            })?;

        if version != CONFIG_VERSION {
            bail!(
                "unsupported config version {} in {}; expected version = 1",
                version,
                path.display()
            );
        }

        let config: Config = value
            .try_into()
            .with_context(|| format!("decode config {}", path.display()))?;
        config.validate(path)?;
        Ok(config)
    }

    fn validate(&self, path: &Path) -> Result<()> {
        for (key, raw) in [
            ("data.latency", &self.data.latency),
            ("data.payment_delay", &self.data.payment_delay),
        ] {
            if let Some(raw) = raw {
                let parsed = parse_duration(raw)
                    .with_context(|| format!("{key} in {}", path.display()))?;
                if parsed.is_zero() {
                    bail!("{key} in {} must be positive, got {raw}", path.display());
                }
            }
        }

        if let Some(seconds) = self.ui.toast_seconds
            && seconds <= 0
        {
            bail!(
                "ui.toast_seconds in {} must be positive, got {}",
                path.display(),
                seconds
            );
        }

        if let Some(screen) = &self.ui.start_screen
            && parse_start_screen(screen).is_none()
        {
            bail!(
                "ui.start_screen in {} is {screen:?}; use a screen path such as find-meal, messages, or admin/users",
                path.display()
            );
        }

        if let Some(level) = &self.log.level
            && !LOG_LEVELS.contains(&level.trim().to_ascii_lowercase().as_str())
        {
            bail!(
                "log.level in {} is {level:?}; expected one of: {}",
                path.display(),
                LOG_LEVELS.join(", ")
            );
        }

        Ok(())
    }

    pub fn latency(&self) -> Result<Duration> {
        parse_duration(self.data.latency.as_deref().unwrap_or(DEFAULT_LATENCY))
    }

    pub fn payment_delay(&self) -> Result<Duration> {
        parse_duration(
            self.data
                .payment_delay
                .as_deref()
                .unwrap_or(DEFAULT_PAYMENT_DELAY),
        )
    }

    pub fn store_options(&self) -> Result<StoreOptions> {
        Ok(StoreOptions {
            latency: self.latency()?,
            payment_delay: self.payment_delay()?,
            fail_fetches: self.data.fail_fetches.unwrap_or(false),
            fail_mutations: self.data.fail_mutations.unwrap_or(false),
        })
    }

    pub fn start_route(&self) -> Result<Route> {
        let raw = self
            .ui
            .start_screen
            .as_deref()
            .unwrap_or(DEFAULT_START_SCREEN);
        parse_start_screen(raw).ok_or_else(|| anyhow!("unknown start screen {raw:?}"))
    }

    pub fn toast_duration(&self) -> Duration {
        let seconds = self.ui.toast_seconds.unwrap_or(DEFAULT_TOAST_SECONDS);
        Duration::from_secs(seconds.max(1).unsigned_abs())
    }

    pub fn log_level(&self) -> String {
        self.log
            .level
            .as_deref()
            .unwrap_or(DEFAULT_LOG_LEVEL)
            .trim()
            .to_ascii_lowercase()
    }

    pub fn log_file(&self) -> Option<PathBuf> {
        self.log
            .file
            .as_deref()
            .map(str::trim)
            .filter(|path| !path.is_empty())
            .map(PathBuf::from)
    }

    pub fn example_config(path: &Path) -> String {
        format!(
            "# mealjoin config\n# Place this file at: {}\n\nversion = 1\n\n[data]\n# Simulated network delay for every fetch and action.\nlatency = \"{}\"\n# Simulated card processing time for bookings.\npayment_delay = \"{}\"\n# Force failures to try out error handling.\nfail_fetches = false\nfail_mutations = false\n\n[ui]\n# find-meal, messages, cook-dashboard, admin, admin/users, ...\nstart_screen = \"{}\"\ntoast_seconds = {}\n\n[log]\n# trace, debug, info, warn, error, or off. MEALJOIN_LOG and RUST_LOG take precedence.\nlevel = \"{}\"\n# Interactive runs only log when a file is set.\n# file = \"/tmp/mealjoin.log\"\n",
            path.display(),
            DEFAULT_LATENCY,
            DEFAULT_PAYMENT_DELAY,
            DEFAULT_START_SCREEN,
            DEFAULT_TOAST_SECONDS,
            DEFAULT_LOG_LEVEL,
        )
    }
}

/// Accepts a route path with or without its leading slash.
fn parse_start_screen(raw: &str) -> Option<Route> {
    let trimmed = raw.trim();
    if trimmed.eq_ignore_ascii_case("home") {
        return Some(Route::Home);
    }
    Route::parse(&format!("/{}", trimmed.trim_start_matches('/')))
}

fn parse_duration(raw: &str) -> Result<Duration> {
    let raw = raw.trim();
    if let Some(value) = raw.strip_suffix("ms") {
        let millis: u64 = value
            .parse()
            .with_context(|| format!("invalid duration {raw:?}"))?;
        return Ok(Duration::from_millis(millis));
    }
    if let Some(value) = raw.strip_suffix('s') {
        let secs: u64 = value
            .parse()
            .with_context(|| format!("invalid duration {raw:?}"))?;
        return Ok(Duration::from_secs(secs));
    }
    if let Some(value) = raw.strip_suffix('m') {
        let mins: u64 = value
            .parse()
            .with_context(|| format!("invalid duration {raw:?}"))?;
        return Ok(Duration::from_secs(mins * 60));
    }

    bail!("invalid duration {raw:?}; use one of: <N>ms, <N>s, <N>m (for example 500ms or 1s)")
}

#[cfg(test)]
mod tests {
    use super::{Config, parse_duration, parse_start_screen};
    use anyhow::Result;
    use mealjoin_app::Route;
    use mealjoin_testkit::temp_config_path;
    use std::path::PathBuf;
    use std::sync::{Mutex, OnceLock};
    use std::time::Duration;

    fn write_config(content: &str) -> Result<(tempfile::TempDir, PathBuf)> {
        let (temp, path) = temp_config_path()?;
        std::fs::write(&path, content)?;
        Ok((temp, path))
    }

    fn env_lock() -> std::sync::MutexGuard<'static, ()> {
        static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();
        match ENV_LOCK.get_or_init(|| Mutex::new(())).lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    #[test]
    fn missing_config_uses_defaults() -> Result<()> {
        let temp = tempfile::tempdir()?;
        let config = Config::load(&temp.path().join("missing.toml"))?;
        assert_eq!(config.version, 1);
        assert_eq!(config.latency()?, Duration::from_secs(1));
        assert_eq!(config.payment_delay()?, Duration::from_secs(3));
        assert_eq!(config.start_route()?, Route::FindMeal);
        assert_eq!(config.toast_duration(), Duration::from_secs(4));
        assert_eq!(config.log_level(), "warn");
        assert_eq!(config.log_file(), None);
        Ok(())
    }

    #[test]
    fn unversioned_config_is_rejected_with_actionable_message() -> Result<()> {
        let (_temp, path) = write_config("[data]\nlatency = \"1s\"\n")?;
        let error = Config::load(&path).expect_err("unversioned config should fail");
        let message = error.to_string();
        assert!(message.contains("version = 1"));
        assert!(message.contains("[data], [ui], and [log]"));
        Ok(())
    }

    #[test]
    fn v1_config_parses() -> Result<()> {
        let (_temp, path) = write_config(
            "version = 1\n[data]\nlatency = \"250ms\"\npayment_delay = \"2s\"\nfail_fetches = true\n[ui]\nstart_screen = \"admin/users\"\ntoast_seconds = 9\n[log]\nlevel = \"DEBUG\"\nfile = \"/tmp/mealjoin.log\"\n",
        )?;
        let config = Config::load(&path)?;
        let options = config.store_options()?;
        assert_eq!(options.latency, Duration::from_millis(250));
        assert_eq!(options.payment_delay, Duration::from_secs(2));
        assert!(options.fail_fetches);
        assert!(!options.fail_mutations);
        assert_eq!(config.start_route()?, Route::AdminUsers);
        assert_eq!(config.toast_duration(), Duration::from_secs(9));
        assert_eq!(config.log_level(), "debug");
        assert_eq!(config.log_file(), Some(PathBuf::from("/tmp/mealjoin.log")));
        Ok(())
    }

    #[test]
    fn malformed_config_returns_parse_error() -> Result<()> {
        let (_temp, path) = write_config("{{not toml")?;
        let error = Config::load(&path).expect_err("malformed config should fail");
        assert!(error.to_string().contains("parse TOML config"));
        Ok(())
    }

    #[test]
    fn unsupported_config_version_is_rejected() -> Result<()> {
        let (_temp, path) = write_config("version = 2\n")?;
        let error = Config::load(&path).expect_err("v2 config should fail");
        assert!(error.to_string().contains("unsupported config version 2"));
        Ok(())
    }

    #[test]
    fn zero_latency_is_rejected() -> Result<()> {
        let (_temp, path) = write_config("version = 1\n[data]\nlatency = \"0s\"\n")?;
        let error = Config::load(&path).expect_err("zero latency should fail");
        let message = error.to_string();
        assert!(message.contains("data.latency"));
        assert!(message.contains("must be positive"));
        Ok(())
    }

    #[test]
    fn unparseable_payment_delay_names_the_key() -> Result<()> {
        let (_temp, path) = write_config("version = 1\n[data]\npayment_delay = \"soon\"\n")?;
        let error = Config::load(&path).expect_err("bad duration should fail");
        assert!(format!("{error:#}").contains("data.payment_delay"));
        Ok(())
    }

    #[test]
    fn unknown_start_screen_is_rejected() -> Result<()> {
        let (_temp, path) = write_config("version = 1\n[ui]\nstart_screen = \"kitchen\"\n")?;
        let error = Config::load(&path).expect_err("unknown screen should fail");
        assert!(error.to_string().contains("ui.start_screen"));
        Ok(())
    }

    #[test]
    fn non_positive_toast_is_rejected() -> Result<()> {
        let (_temp, path) = write_config("version = 1\n[ui]\ntoast_seconds = 0\n")?;
        let error = Config::load(&path).expect_err("zero toast should fail");
        assert!(error.to_string().contains("ui.toast_seconds"));
        Ok(())
    }

    #[test]
    fn unknown_log_level_is_rejected() -> Result<()> {
        let (_temp, path) = write_config("version = 1\n[log]\nlevel = \"loud\"\n")?;
        let error = Config::load(&path).expect_err("unknown level should fail");
        let message = error.to_string();
        assert!(message.contains("log.level"));
        assert!(message.contains("trace, debug, info, warn, error, off"));
        Ok(())
    }

    #[test]
    fn start_screen_accepts_paths_with_or_without_slash() {
        assert_eq!(parse_start_screen("messages"), Some(Route::Messages));
        assert_eq!(parse_start_screen("/admin"), Some(Route::AdminDashboard));
        assert_eq!(parse_start_screen("home"), Some(Route::Home));
        assert_eq!(parse_start_screen("nowhere"), None);
    }

    #[test]
    fn durations_parse_ms_seconds_and_minutes() -> Result<()> {
        assert_eq!(parse_duration("500ms")?, Duration::from_millis(500));
        assert_eq!(parse_duration("1s")?, Duration::from_secs(1));
        assert_eq!(parse_duration("2m")?, Duration::from_secs(120));
        assert!(parse_duration("oops").is_err());
        Ok(())
    }

    #[test]
    fn default_path_honors_env_override() -> Result<()> {
        let _guard = env_lock();
        let temp = tempfile::tempdir()?;
        let override_path = temp.path().join("custom-config.toml");
        // SAFETY: test-only process-local env mutation.
        unsafe {
            std::env::set_var("MEALJOIN_CONFIG_PATH", &override_path);
        }
        let resolved = Config::default_path()?;
        // SAFETY: test cleanup for process-local env mutation.
        unsafe {
            std::env::remove_var("MEALJOIN_CONFIG_PATH");
        }
        assert_eq!(resolved, override_path);
        Ok(())
    }

    #[test]
    fn default_path_ends_in_app_config_file() -> Result<()> {
        let _guard = env_lock();
        // SAFETY: test-only process-local env mutation.
        unsafe {
            std::env::remove_var("MEALJOIN_CONFIG_PATH");
        }
        let path = Config::default_path()?;
        assert!(path.ends_with("mealjoin/config.toml"));
        Ok(())
    }

    #[test]
    fn example_config_round_trips_through_load() -> Result<()> {
        let (_temp, path) = temp_config_path()?;
        std::fs::write(&path, Config::example_config(&path))?;
        let config = Config::load(&path)?;
        assert_eq!(config.start_route()?, Route::FindMeal);
        assert_eq!(config.latency()?, Duration::from_secs(1));
        Ok(())
    }
}
