use std::path::PathBuf;

use crate::cli::commands::InitArgs;
use crate::io::workspace::init_workspace;

/// `join init` — create join/workspace.toml in the current directory.
pub fn cmd_init(args: InitArgs, dir_override: Option<PathBuf>) -> Result<(), Box<dyn std::error::Error>> {
    let root = match dir_override {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };

    let name = match args.name {
        Some(name) => name,
        None => root
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("join")
            .to_string(),
    };

    let ws = init_workspace(&root, &name, args.force)?;
    println!(
        "Initialized workspace '{}' in {}",
        ws.config.workspace.name,
        ws.data_dir.display()
    );
    Ok(())
}
