//! Platform directories for trace output and the CLI host's configuration.
//!
//! Environment overrides win; otherwise the locations come from the
//! `directories` crate.

use crate::domain::error::{PortalSearchError, Result};
use directories::ProjectDirs;
use std::env;
use std::path::PathBuf;

const QUALIFIER: &str = "net";
const ORGANIZATION: &str = "yacy";
const APPLICATION: &str = "portalsearch";

const CONFIG_DIR_ENV: &str = "PORTALSEARCH_CONFIG_DIR";
const DATA_DIR_ENV: &str = "PORTALSEARCH_DATA_DIR";

/// Name of the configuration file inside [`get_config_dir`].
pub const CONFIG_FILE_NAME: &str = "portalsearch.toml";

fn project_dirs() -> Result<ProjectDirs> {
    ProjectDirs::from(QUALIFIER, ORGANIZATION, APPLICATION).ok_or_else(|| {
        PortalSearchError::Configuration("unable to determine a home directory".to_string())
    })
}

/// An empty override counts as unset.
fn dir_from_env(name: &str) -> Option<PathBuf> {
    let value = env::var_os(name)?;
    if value.is_empty() {
        None
    } else {
        Some(PathBuf::from(value))
    }
}

/// Directory holding `portalsearch.toml`.
///
/// # Errors
///
/// Returns [`PortalSearchError::Configuration`] when no home directory can be
/// determined and no override is set.
pub fn get_config_dir() -> Result<PathBuf> {
    if let Some(dir) = dir_from_env(CONFIG_DIR_ENV) {
        return Ok(dir);
    }
    Ok(project_dirs()?.config_local_dir().to_path_buf())
}

/// Directory that receives trace files.
///
/// # Errors
///
/// Returns [`PortalSearchError::Configuration`] when no home directory can be
/// determined and no override is set.
pub fn get_data_dir() -> Result<PathBuf> {
    if let Some(dir) = dir_from_env(DATA_DIR_ENV) {
        return Ok(dir);
    }
    Ok(project_dirs()?.data_local_dir().to_path_buf())
}

/// Default location of the configuration file.
///
/// # Errors
///
/// See [`get_config_dir`].
pub fn default_config_file() -> Result<PathBuf> {
    Ok(get_config_dir()?.join(CONFIG_FILE_NAME))
}
