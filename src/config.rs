//! Configuration paths.
//!
//! Settings live in a per-user config directory, resolved in order:
//!
//! 1. `--config-dir` on the command line
//! 2. `PRINTBRIDGE_CONFIG_DIR` environment variable
//! 3. Platform config directory from dirs-next:
//!    - Linux: `~/.config/printbridge`
//!    - macOS: `~/Library/Application Support/printbridge`
//!    - Windows: `%APPDATA%\printbridge`
//! 4. The current directory, if the platform has none

use std::path::PathBuf;

pub const APP_NAME: &str = "printbridge";

/// Environment variable overriding the config directory
pub const CONFIG_DIR_ENV: &str = "PRINTBRIDGE_CONFIG_DIR";

/// Resolve the directory holding `settings.json`.
pub fn config_dir(cli_dir: Option<PathBuf>) -> PathBuf {
    cli_dir
        .or_else(|| {
            std::env::var_os(CONFIG_DIR_ENV)
                .filter(|v| !v.is_empty())
                .map(PathBuf::from)
        })
        .or_else(|| dirs_next::config_dir().map(|dir| dir.join(APP_NAME)))
        .unwrap_or_else(|| PathBuf::from("."))
}
