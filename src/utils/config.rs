// src/utils/config.rs

use crate::api::config as api_config;
use crate::errors::AppError;
use crate::models::Backend;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::{env, fs};

pub const LOG_LEVELS: [&str; 6] = ["off", "error", "warn", "info", "debug", "trace"];

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    pub log_level: String,
    pub temp_folder: String,
    pub backend: Backend,
    pub max_prompt_bytes: Option<usize>,
    pub shallow_clone: bool,
    pub skip_vcs_metadata: bool,
    pub anthropic_api_key: Option<String>,
    pub anthropic_model: String,
    pub anthropic_base_url: Option<String>,
    pub max_tokens: u32,
    pub vertex_project: Option<String>,
    pub vertex_location: String,
    pub vertex_model: String,
    pub vertex_base_url: Option<String>,
    pub vertex_access_token: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            log_level: "off".to_string(),
            temp_folder: "./temp".to_string(),
            backend: Backend::default(),
            max_prompt_bytes: None,
            shallow_clone: true,
            skip_vcs_metadata: false,
            anthropic_api_key: None,
            anthropic_model: api_config::DEFAULT_ANTHROPIC_MODEL.to_string(),
            anthropic_base_url: None,
            max_tokens: api_config::DEFAULT_MAX_TOKENS,
            vertex_project: None,
            vertex_location: api_config::DEFAULT_VERTEX_LOCATION.to_string(),
            vertex_model: api_config::DEFAULT_VERTEX_MODEL.to_string(),
            vertex_base_url: None,
            vertex_access_token: None,
        }
    }
}

pub fn get_config_path() -> Result<PathBuf, AppError> {
    let mut path = get_executable_dir()?;
    path.push("config.toml");
    Ok(path)
}

/// Validate config to prevent obviously wrong or missing values.
pub fn validate_config(config: &Config) -> Result<(), AppError> {
    if !LOG_LEVELS.contains(&config.log_level.as_str()) {
        return Err(AppError::InvalidInput(format!(
            "Unknown log level '{}', expected one of {}",
            config.log_level,
            LOG_LEVELS.join(", ")
        )));
    }
    if config.temp_folder.trim().is_empty() {
        return Err(AppError::InvalidInput(
            "Temp folder cannot be empty".to_string(),
        ));
    }
    if config.max_tokens == 0 {
        return Err(AppError::InvalidInput(
            "Max tokens cannot be zero".to_string(),
        ));
    }
    if config.max_prompt_bytes == Some(0) {
        return Err(AppError::InvalidInput(
            "Max prompt bytes cannot be zero".to_string(),
        ));
    }
    if config.vertex_location.trim().is_empty() {
        return Err(AppError::InvalidInput(
            "Vertex location cannot be empty".to_string(),
        ));
    }
    if matches!(&config.vertex_project, Some(project) if project.trim().is_empty()) {
        return Err(AppError::InvalidInput(
            "Vertex project cannot be empty".to_string(),
        ));
    }
    Ok(())
}

/// Read config from file, and create a default config if none exists.
pub fn read_config() -> Result<Config, AppError> {
    read_config_from(&get_config_path()?)
}

pub fn read_config_from(config_path: &Path) -> Result<Config, AppError> {
    if !config_path.exists() {
        write_config_to(config_path, &Config::default())?;
    }
    let config_str = fs::read_to_string(config_path)?;
    let config: Config = toml::from_str(&config_str)?;
    validate_config(&config)?;
    Ok(config)
}

pub fn write_config_to(config_path: &Path, config: &Config) -> Result<(), AppError> {
    let config_str = toml::to_string(config)?;
    fs::write(config_path, config_str)?;
    Ok(())
}

fn get_executable_dir() -> Result<PathBuf, AppError> {
    let exe = env::current_exe()?;
    exe.parent().map(Path::to_path_buf).ok_or_else(|| {
        AppError::InvalidInput(format!(
            "Executable has no parent directory: {}",
            exe.display()
        ))
    })
}
