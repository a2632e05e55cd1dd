//! Loading [`ClientConfig`] from a YAML file and the environment.
//!
//! A config file looks like this:
//!
//! ```yaml
//! lwApi:
//!   url: https://api.liquidweb.com
//!   username: ${LW_USERNAME}
//!   password: ${LW_PASSWORD}
//!   timeout: 30
//!   secure: true
//! ```
//!
//! `${VAR}` placeholders are filled from the environment before parsing, and any of the
//! `LWAPI_*` variables override what the file says.

use std::{
    env, fs,
    path::{Path, PathBuf},
    time::Duration,
};

use dotenvy::{dotenv, from_path};
use regex::{Captures, Regex};
use serde::Deserialize;
use thiserror::Error;

use crate::api::ClientConfig;

pub const ENV_URL: &str = "LWAPI_URL";
pub const ENV_USERNAME: &str = "LWAPI_USERNAME";
pub const ENV_PASSWORD: &str = "LWAPI_PASSWORD";
pub const ENV_TIMEOUT: &str = "LWAPI_TIMEOUT";
pub const ENV_SECURE: &str = "LWAPI_SECURE";

const ENV_ORIGIN: &str = "environment";

#[derive(Error, Debug)]
pub enum ReadConfigError {
    #[error("Can not find config file {0}")]
    CanNotFindConfig(PathBuf),

    #[error("Can not read config file {0}")]
    CanNotReadConfig(PathBuf),

    #[error("Config is invalid yaml and does not match the struct - {0}")]
    InvalidYaml(String),

    #[error("Environment variable {0} not found")]
    EnvironmentVariableNotFound(String),

    #[error("{key} has an invalid value: {value}")]
    InvalidValue { key: String, value: String },
}

#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    #[serde(rename = "lwApi", default)]
    lw_api: Settings,
}

#[derive(Debug, Default, Deserialize)]
struct Settings {
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    username: Option<String>,
    #[serde(default)]
    password: Option<String>,
    /// Seconds.
    #[serde(default)]
    timeout: Option<u64>,
    #[serde(default)]
    secure: Option<bool>,
}

/// Read the config file at `path`, then apply `LWAPI_*` overrides from the environment.
pub fn read(path: &Path) -> Result<ClientConfig, ReadConfigError> {
    read_with_env(path, |key| env::var(key).ok())
}

/// Build the config from `LWAPI_*` environment variables alone.
pub fn from_env() -> Result<ClientConfig, ReadConfigError> {
    from_env_with(|key| env::var(key).ok())
}

/// Loads a `.env` file from `dir`, falling back to the working directory.
pub fn load_dotenv(dir: &Path) {
    if from_path(dir.join(".env")).is_err() {
        dotenv().ok();
    }
}

fn read_with_env<F>(path: &Path, lookup: F) -> Result<ClientConfig, ReadConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if !path.exists() {
        return Err(ReadConfigError::CanNotFindConfig(path.to_path_buf()));
    }
    let contents = fs::read_to_string(path)
        .map_err(|_| ReadConfigError::CanNotReadConfig(path.to_path_buf()))?;

    let substituted = substitute_env_variables(&contents, &lookup)?;
    let file: ConfigFile = if substituted.trim().is_empty() {
        ConfigFile::default()
    } else {
        serde_yaml::from_str(&substituted)
            .map_err(|e| ReadConfigError::InvalidYaml(e.to_string()))?
    };

    let mut settings = file.lw_api;
    apply_env_overrides(&mut settings, &lookup)?;

    Ok(settings.into_config(path.display().to_string()))
}

fn from_env_with<F>(lookup: F) -> Result<ClientConfig, ReadConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut settings = Settings::default();
    apply_env_overrides(&mut settings, &lookup)?;
    Ok(settings.into_config(ENV_ORIGIN.to_string()))
}

fn substitute_env_variables<F>(contents: &str, lookup: &F) -> Result<String, ReadConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let re = Regex::new(r"\$\{([^}]+)\}")
        .map_err(|e| ReadConfigError::InvalidYaml(e.to_string()))?;

    let mut missing = None;
    let result = re.replace_all(contents, |caps: &Captures| {
        let var_name = &caps[1];
        lookup(var_name).unwrap_or_else(|| {
            missing.get_or_insert_with(|| var_name.to_string());
            String::new()
        })
    });

    match missing {
        Some(var_name) => Err(ReadConfigError::EnvironmentVariableNotFound(var_name)),
        None => Ok(result.into_owned()),
    }
}

fn apply_env_overrides<F>(settings: &mut Settings, lookup: &F) -> Result<(), ReadConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(url) = lookup(ENV_URL) {
        settings.url = Some(url);
    }
    if let Some(username) = lookup(ENV_USERNAME) {
        settings.username = Some(username);
    }
    if let Some(password) = lookup(ENV_PASSWORD) {
        settings.password = Some(password);
    }
    if let Some(timeout) = lookup(ENV_TIMEOUT) {
        settings.timeout = Some(timeout.trim().parse().map_err(|_| {
            ReadConfigError::InvalidValue { key: ENV_TIMEOUT.to_string(), value: timeout.clone() }
        })?);
    }
    if let Some(secure) = lookup(ENV_SECURE) {
        settings.secure = Some(parse_bool(&secure).ok_or_else(|| {
            ReadConfigError::InvalidValue { key: ENV_SECURE.to_string(), value: secure.clone() }
        })?);
    }

    Ok(())
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

impl Settings {
    fn into_config(self, origin: String) -> ClientConfig {
        let mut config = ClientConfig::new(
            self.url.unwrap_or_default(),
            self.username.unwrap_or_default(),
            self.password.unwrap_or_default(),
        )
        .with_tls_verification(self.secure.unwrap_or(true))
        .with_origin(origin);

        if let Some(seconds) = self.timeout {
            config = config.with_timeout(Duration::from_secs(seconds));
        }

        config
    }
}
