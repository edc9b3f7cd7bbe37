use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Configuration from workspace.toml
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkspaceConfig {
    pub workspace: WorkspaceInfo,
    #[serde(default)]
    pub ui: UiConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkspaceInfo {
    pub name: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UiConfig {
    /// Named color overrides for the TUI theme (e.g. `highlight = "#FB4196"`).
    #[serde(default)]
    pub colors: HashMap<String, String>,
    /// Show the key-hint row at the bottom of the board.
    #[serde(default = "default_true")]
    pub show_key_hints: bool,
    /// Seconds a toast stays visible.
    #[serde(default = "default_toast_secs")]
    pub toast_secs: u64,
}

fn default_true() -> bool {
    true
}

fn default_toast_secs() -> u64 {
    3
}

impl WorkspaceConfig {
    pub fn new(name: impl Into<String>) -> Self {
        WorkspaceConfig {
            workspace: WorkspaceInfo { name: name.into() },
            ui: UiConfig::default(),
        }
    }
}
