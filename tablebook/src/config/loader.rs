//! Configuration file discovery and loading.

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::schema::Config;
use crate::error::{Error, Result};

/// File name of the user configuration inside the data directory.
pub const USER_CONFIG_FILE: &str = "config.yaml";

/// File name of a shared restaurant configuration.
pub const PROJECT_CONFIG_FILE: &str = "tablebook.yaml";

/// File name of a private, uncommitted override next to
/// [`PROJECT_CONFIG_FILE`].
pub const LOCAL_CONFIG_FILE: &str = "tablebook.local.yaml";

/// Which file layer a configuration came from. Later layers override
/// earlier ones; the derived ordering is the merge order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ConfigLayer {
    /// `config.yaml` in the data directory.
    User,
    /// `tablebook.yaml`, shared by everyone running the restaurant.
    Restaurant,
    /// `tablebook.local.yaml` next to the restaurant file.
    Local,
}

impl ConfigLayer {
    /// The file name this layer is read from.
    #[must_use]
    pub const fn file_name(self) -> &'static str {
        match self {
            Self::User => USER_CONFIG_FILE,
            Self::Restaurant => PROJECT_CONFIG_FILE,
            Self::Local => LOCAL_CONFIG_FILE,
        }
    }
}

/// A parsed configuration file.
#[derive(Debug, Clone)]
pub struct ConfigSource {
    /// Path to the configuration file.
    pub path: PathBuf,
    /// The layer the file belongs to.
    pub layer: ConfigLayer,
    /// Parsed configuration.
    pub config: Config,
}

/// Loads configuration from various sources.
///
/// # Examples
///
/// ```no_run
/// use tablebook::config::ConfigLoader;
/// use std::path::Path;
///
/// let sources = ConfigLoader::load_all(Path::new("."), None).unwrap();
/// println!("Found {} configuration sources", sources.len());
/// ```
pub struct ConfigLoader;

impl ConfigLoader {
    /// Discover and load all configuration files, ordered by layer.
    ///
    /// Searches for `config.yaml` in the data directory, then walks up from
    /// `working_dir` to the first directory holding `tablebook.yaml` or
    /// `tablebook.local.yaml`.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration file exists but cannot be read
    /// or parsed.
    pub fn load_all(working_dir: &Path, data_dir: Option<&Path>) -> Result<Vec<ConfigSource>> {
        let mut sources = Vec::new();

        if let Some(user_config) = Self::load_user_config(data_dir)? {
            sources.push(user_config);
        }
        sources.extend(Self::discover_project_configs(working_dir)?);
        sources.sort_by_key(|s| s.layer);

        Ok(sources)
    }

    fn load_user_config(data_dir: Option<&Path>) -> Result<Option<ConfigSource>> {
        let config_path = match data_dir {
            Some(dir) => dir.join(ConfigLayer::User.file_name()),
            None => crate::database::resolve_data_dir()?.join(ConfigLayer::User.file_name()),
        };

        if !config_path.exists() {
            return Ok(None);
        }

        let config = Self::load_file(&config_path)?;
        Ok(Some(ConfigSource {
            path: config_path,
            layer: ConfigLayer::User,
            config,
        }))
    }

    /// Discover restaurant configurations by walking up directories.
    ///
    /// Stops at the first directory containing either file.
    ///
    /// # Errors
    ///
    /// Returns an error if any discovered file cannot be read or parsed.
    pub fn discover_project_configs(start_dir: &Path) -> Result<Vec<ConfigSource>> {
        let mut configs = Vec::new();
        let mut current = start_dir.to_path_buf();

        loop {
            for layer in [ConfigLayer::Restaurant, ConfigLayer::Local] {
                let path = current.join(layer.file_name());
                if path.exists() {
                    let config = Self::load_file(&path)?;
                    configs.push(ConfigSource { path, layer, config });
                }
            }

            if !configs.is_empty() || !current.pop() {
                break;
            }
        }

        Ok(configs)
    }

    /// Load and parse a YAML configuration file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or the YAML is invalid.
    pub fn load_file(path: &Path) -> Result<Config> {
        let contents = fs::read_to_string(path).map_err(|e| {
            Error::validation(
                path.display().to_string(),
                format!("failed to read configuration file: {e}"),
            )
        })?;
        log::debug!("Loading configuration from {}", path.display());
        // A file holding only comments is an empty document.
        let config: Option<Config> = serde_yaml::from_str(&contents)?;
        Ok(config.unwrap_or_default())
    }
}
