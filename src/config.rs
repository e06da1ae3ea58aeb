use crate::error::{BumpError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// File name searched for in the working directory.
pub const CONFIG_FILE_NAME: &str = "versionbump.toml";

/// Default reminder posted in comment-only mode.
pub const DEFAULT_COMMENT_TEMPLATE: &str =
    "⚠️ Reminder: Version should be updated to `{version}` in {file}";

/// Represents the complete settings for version-bump.
///
/// Contains git identity and push behavior, comment formatting, and which
/// version fields the build file carries.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub struct Config {
    #[serde(default)]
    pub git: GitConfig,

    #[serde(default)]
    pub comment: CommentConfig,

    #[serde(default)]
    pub fields: FieldsConfig,
}

fn default_user_name() -> String {
    "GitHub Action".to_string()
}

fn default_user_email() -> String {
    "action@github.com".to_string()
}

fn default_remote() -> String {
    "origin".to_string()
}

/// Identity and push settings for the commit made in update-file mode.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct GitConfig {
    #[serde(default = "default_user_name")]
    pub user_name: String,

    #[serde(default = "default_user_email")]
    pub user_email: String,

    #[serde(default = "default_remote")]
    pub remote: String,

    /// Overwrite the remote branch history on push. Off unless asked for.
    #[serde(default)]
    pub force_push: bool,
}

impl Default for GitConfig {
    fn default() -> Self {
        GitConfig {
            user_name: default_user_name(),
            user_email: default_user_email(),
            remote: default_remote(),
            force_push: false,
        }
    }
}

fn default_comment_template() -> String {
    DEFAULT_COMMENT_TEMPLATE.to_string()
}

/// Formatting of the pull request reminder.
///
/// `{version}` and `{file}` are substituted.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct CommentConfig {
    #[serde(default = "default_comment_template")]
    pub template: String,
}

impl Default for CommentConfig {
    fn default() -> Self {
        CommentConfig {
            template: default_comment_template(),
        }
    }
}

impl CommentConfig {
    pub fn render(&self, version: &str, file: &str) -> String {
        self.template
            .replace("{version}", version)
            .replace("{file}", file)
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub struct FieldsConfig {
    /// Read and bump `versionCode` next to `versionName`.
    #[serde(default)]
    pub track_version_code: bool,
}

/// Loads settings from file or returns defaults.
///
/// Attempts to load settings in the following order:
/// 1. Custom path provided as parameter
/// 2. `versionbump.toml` in current directory
/// 3. `.versionbump.toml` in the user config directory
/// 4. Default settings if no file found
///
/// # Returns
/// * `Ok(Config)` - Loaded or default settings
/// * `Err` - If a file exists but cannot be read or parsed, or an explicit
///   path does not exist
pub fn load_config(config_path: Option<&str>) -> Result<Config> {
    let local = Path::new(".").join(CONFIG_FILE_NAME);

    let config_str = if let Some(path) = config_path {
        read_config_file(Path::new(path))?
    } else if local.exists() {
        read_config_file(&local)?
    } else if let Some(config_dir) = dirs::config_dir() {
        let user_path = config_dir.join(format!(".{}", CONFIG_FILE_NAME));
        if user_path.exists() {
            read_config_file(&user_path)?
        } else {
            return Ok(Config::default());
        }
    } else {
        return Ok(Config::default());
    };

    toml::from_str(&config_str).map_err(|e| BumpError::config(e.to_string()))
}

fn read_config_file(path: &Path) -> Result<String> {
    fs::read_to_string(path)
        .map_err(|e| BumpError::config(format!("cannot read {}: {}", path.display(), e)))
}
