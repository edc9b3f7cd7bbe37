use std::fs;
use std::path::{Path, PathBuf};

use crate::model::config::WorkspaceConfig;

/// Error type for workspace I/O operations
#[derive(Debug, thiserror::Error)]
pub enum WorkspaceError {
    #[error("not a join workspace: no join/ directory found")]
    NotAWorkspace,
    #[error("workspace already initialized at {0} (use --force to reinitialize)")]
    AlreadyInitialized(PathBuf),
    #[error("could not read {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not parse workspace.toml: {0}")]
    ConfigParseError(#[from] toml::de::Error),
    #[error("could not serialize workspace.toml: {0}")]
    ConfigSerializeError(#[from] toml::ser::Error),
    #[error("io error: {0}")]
    IoError(#[from] std::io::Error),
}

/// A loaded workspace: the root directory, its `join/` data directory, and
/// the parsed configuration.
#[derive(Debug, Clone)]
pub struct Workspace {
    pub root: PathBuf,
    pub data_dir: PathBuf,
    pub config: WorkspaceConfig,
}

/// Discover the workspace by walking up from the given directory,
/// looking for a `join/` subdirectory with a workspace.toml.
pub fn discover_workspace(start: &Path) -> Result<PathBuf, WorkspaceError> {
    let mut current = start.to_path_buf();
    loop {
        let data_dir = current.join("join");
        if data_dir.is_dir() && data_dir.join("workspace.toml").exists() {
            return Ok(current);
        }
        if !current.pop() {
            return Err(WorkspaceError::NotAWorkspace);
        }
    }
}

/// Load a workspace from the given root directory.
pub fn load_workspace(root: &Path) -> Result<Workspace, WorkspaceError> {
    let data_dir = root.join("join");
    if !data_dir.is_dir() {
        return Err(WorkspaceError::NotAWorkspace);
    }

    let config_path = data_dir.join("workspace.toml");
    let config_text = fs::read_to_string(&config_path).map_err(|e| WorkspaceError::ReadError {
        path: config_path.clone(),
        source: e,
    })?;
    let config: WorkspaceConfig = toml::from_str(&config_text)?;

    Ok(Workspace {
        root: root.to_path_buf(),
        data_dir,
        config,
    })
}

/// Initialize a new workspace under `root`, creating `join/workspace.toml`.
pub fn init_workspace(root: &Path, name: &str, force: bool) -> Result<Workspace, WorkspaceError> {
    let data_dir = root.join("join");
    let config_path = data_dir.join("workspace.toml");
    if config_path.exists() && !force {
        return Err(WorkspaceError::AlreadyInitialized(data_dir));
    }

    fs::create_dir_all(&data_dir)?;
    let config = WorkspaceConfig::new(name);
    let text = toml::to_string_pretty(&config)?;
    fs::write(&config_path, text)?;

    Ok(Workspace {
        root: root.to_path_buf(),
        data_dir,
        config,
    })
}
