use crate::error::{HarnessError, Result};
use log::LevelFilter;
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

pub static GLOBAL_CONFIG: Lazy<HarnessConfig> = Lazy::new(HarnessConfig::new);

static DEFAULT_ARTIFACTS_DIR: &str = "starknet-artifacts";
static DEFAULT_NAMESPACE: &str = "starknet";
static DEFAULT_LOG_LEVEL: &str = "info";

const ARTIFACTS_DIR_KEY: &str = "STARKNET_ARTIFACTS_DIR";
const NAMESPACE_KEY: &str = "STARKNET_CONTRACTS_NAMESPACE";
const LOG_LEVEL_KEY: &str = "STARKNET_HARNESS_LOG";

pub struct HarnessConfig {
    inner: RwLock<HashMap<String, String>>,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl HarnessConfig {
    /// Seed every setting from the environment, falling back to defaults
    pub fn new() -> HarnessConfig {
        let mut map = HashMap::new();
        for (key, default) in [
            (ARTIFACTS_DIR_KEY, DEFAULT_ARTIFACTS_DIR),
            (NAMESPACE_KEY, DEFAULT_NAMESPACE),
            (LOG_LEVEL_KEY, DEFAULT_LOG_LEVEL),
        ] {
            let value = env::var(key).unwrap_or_else(|_| String::from(default));
            map.insert(String::from(key), value);
        }

        HarnessConfig {
            inner: RwLock::new(map),
        }
    }

    /// Config rooted at an explicit artifacts directory, ignoring the environment
    pub fn with_artifacts_dir(dir: impl Into<PathBuf>) -> HarnessConfig {
        let mut map = HashMap::new();
        map.insert(
            String::from(ARTIFACTS_DIR_KEY),
            dir.into().to_string_lossy().to_string(),
        );
        map.insert(String::from(NAMESPACE_KEY), String::from(DEFAULT_NAMESPACE));
        map.insert(String::from(LOG_LEVEL_KEY), String::from(DEFAULT_LOG_LEVEL));

        HarnessConfig {
            inner: RwLock::new(map),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<String, String>> {
        self.inner.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<String, String>> {
        self.inner.write().unwrap_or_else(|e| e.into_inner())
    }

    fn get_or(&self, key: &str, default: &str) -> String {
        self.read()
            .get(key)
            .cloned()
            .unwrap_or_else(|| String::from(default))
    }

    pub fn get_artifacts_dir(&self) -> PathBuf {
        PathBuf::from(self.get_or(ARTIFACTS_DIR_KEY, DEFAULT_ARTIFACTS_DIR))
    }

    pub fn set_artifacts_dir(&self, dir: impl Into<PathBuf>) {
        self.write().insert(
            String::from(ARTIFACTS_DIR_KEY),
            dir.into().to_string_lossy().to_string(),
        );
    }

    pub fn get_namespace(&self) -> String {
        self.get_or(NAMESPACE_KEY, DEFAULT_NAMESPACE)
    }

    pub fn set_namespace(&self, namespace: String) {
        self.write().insert(String::from(NAMESPACE_KEY), namespace);
    }

    pub fn get_log_level(&self) -> String {
        self.get_or(LOG_LEVEL_KEY, DEFAULT_LOG_LEVEL)
    }

    pub fn set_log_level(&self, level: String) {
        self.write().insert(String::from(LOG_LEVEL_KEY), level);
    }

    pub fn log_level_filter(&self) -> Result<LevelFilter> {
        let level = self.get_log_level();
        LevelFilter::from_str(&level).map_err(|_| {
            HarnessError::Config(format!("Unknown log level {level:?} in {LOG_LEVEL_KEY}"))
        })
    }
}
