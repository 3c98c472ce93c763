//! Configuration management module.
//!
//! This module handles loading, saving, and managing application configuration,
//! including the session file location, log verbosity and the settings new
//! forms start with.

mod error;

pub use error::ConfigError;

use crate::error::AppError;
use crate::form::FormSettings;
use log::LevelFilter;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    io::Write,
    path::{Path, PathBuf},
    str::FromStr,
};

const FILE_NAME: &str = "config.yml";
const SESSION_FILE_NAME: &str = "session.json";
const DEFAULT_DIRECTORY_PATH: &str = ".config/formcraft";

/// Oversees management of configuration file.
///
#[derive(Clone, Debug)]
pub struct Config {
    pub session_file: Option<PathBuf>,
    pub log_level: String,
    pub form_settings: FormSettings,
    dir_path: Option<PathBuf>,
    file_path: Option<PathBuf>,
}

/// Define specification for configuration file.
///
#[derive(Debug, Serialize, Deserialize)]
struct FileSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_file: Option<PathBuf>,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default = "default_submit_button_text")]
    pub submit_button_text: String,
    #[serde(default = "default_true")]
    pub allow_multiple_submissions: bool,
    #[serde(default)]
    pub show_progress_bar: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_submit_button_text() -> String {
    FormSettings::default().submit_button_text
}

fn default_true() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Config::new()
    }
}

impl Config {
    /// Return a new empty instance.
    ///
    pub fn new() -> Config {
        Config {
            session_file: None,
            log_level: default_log_level(),
            form_settings: FormSettings::default(),
            dir_path: None,
            file_path: None,
        }
    }

    /// Try to load an existing configuration from the disk using the custom
    /// directory if provided. A missing file leaves the defaults in place;
    /// nothing is written until `save` is called.
    ///
    pub fn load(&mut self, custom_path: Option<&str>) -> Result<(), AppError> {
        // Use default path unless custom path provided
        let dir_path = match custom_path {
            Some(path) => Path::new(&path).to_path_buf(),
            None => Config::default_path()?,
        };

        // Specify config file path
        self.file_path = Some(dir_path.join(Path::new(FILE_NAME)));
        self.dir_path = Some(dir_path);
        let file_path = self.file_path.as_ref().ok_or(ConfigError::FilePathNotSet)?;

        if file_path.exists() {
            let contents = fs::read_to_string(file_path).map_err(|e| ConfigError::LoadFailed {
                path: file_path.clone(),
                message: format!("IO error: {}", e),
            })?;
            let data: FileSpec = serde_yaml::from_str(&contents)
                .map_err(|e| ConfigError::DeserializationFailed(e.to_string()))?;
            self.apply(data)?;
        }

        Ok(())
    }

    fn apply(&mut self, data: FileSpec) -> Result<(), ConfigError> {
        LevelFilter::from_str(&data.log_level)
            .map_err(|_| ConfigError::InvalidLogLevel(data.log_level.clone()))?;
        self.session_file = data.session_file;
        self.log_level = data.log_level;
        self.form_settings = FormSettings {
            submit_button_text: data.submit_button_text,
            allow_multiple_submissions: data.allow_multiple_submissions,
            show_progress_bar: data.show_progress_bar,
        };
        Ok(())
    }

    fn to_file_spec(&self) -> FileSpec {
        FileSpec {
            session_file: self.session_file.clone(),
            log_level: self.log_level.clone(),
            submit_button_text: self.form_settings.submit_button_text.clone(),
            allow_multiple_submissions: self.form_settings.allow_multiple_submissions,
            show_progress_bar: self.form_settings.show_progress_bar,
        }
    }

    /// Returns the configured log level, falling back to info.
    ///
    pub fn level_filter(&self) -> LevelFilter {
        LevelFilter::from_str(&self.log_level).unwrap_or(LevelFilter::Info)
    }

    /// Returns the configuration file path, if `load` has run.
    ///
    pub fn file_path(&self) -> Option<&Path> {
        self.file_path.as_deref()
    }

    /// Returns the session file path: the configured one, or `session.json`
    /// beside the configuration file.
    ///
    pub fn session_path(&self) -> Result<PathBuf, AppError> {
        if let Some(session_file) = &self.session_file {
            return Ok(session_file.clone());
        }
        let dir_path = match &self.dir_path {
            Some(dir_path) => dir_path.clone(),
            None => Config::default_path()?,
        };
        Ok(dir_path.join(SESSION_FILE_NAME))
    }

    /// Attempt to serialize the configuration data and write it to the disk,
    /// returning any unrecoverable errors.
    ///
    pub fn save(&self) -> Result<(), AppError> {
        let file_path = self.file_path.as_ref().ok_or(ConfigError::FilePathNotSet)?;
        let content = serde_yaml::to_string(&self.to_file_spec())
            .map_err(|e| ConfigError::SerializationFailed(e.to_string()))?;

        // Create parent directory if it doesn't exist
        if let Some(parent) = file_path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent).map_err(|e| ConfigError::CreateDirectoryFailed {
                    path: parent.to_path_buf(),
                    source: e,
                })?;
            }
        }

        let mut file = fs::File::create(file_path).map_err(|e| ConfigError::SaveFailed {
            path: file_path.clone(),
            source: e,
        })?;
        write!(file, "{}", content).map_err(|e| ConfigError::SaveFailed {
            path: file_path.clone(),
            source: e,
        })?;
        file.flush().map_err(|e| ConfigError::SaveFailed {
            path: file_path.clone(),
            source: e,
        })?; // Ensure data is written to disk
        Ok(())
    }

    /// Returns the path buffer for the default configuration directory or an
    /// error if the home directory could not be found.
    ///
    fn default_path() -> Result<PathBuf, AppError> {
        match dirs::home_dir() {
            Some(home) => {
                let home_path = Path::new(&home);
                let default_config_path = Path::new(DEFAULT_DIRECTORY_PATH);
                Ok(home_path.join(default_config_path))
            }
            None => Err(ConfigError::HomeDirectoryNotFound.into()),
        }
    }
}
