//! Platform-specific directory paths.
//!
//! Uses XDG on Linux, standard locations on macOS/Windows.

use std::path::PathBuf;

use directories::ProjectDirs;

const QUALIFIER: &str = "dev";
const ORGANIZATION: &str = "tableview";
const APPLICATION: &str = "tableview";

/// Get project directories, or None if home directory cannot be determined.
fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from(QUALIFIER, ORGANIZATION, APPLICATION)
}

/// Get the config directory.
///
/// - Linux: `$XDG_CONFIG_HOME/tableview` or `~/.config/tableview`
/// - macOS: `~/Library/Application Support/dev.tableview.tableview`
/// - Windows: `C:\Users\<User>\AppData\Roaming\tableview\tableview\config`
pub fn config_dir() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the default settings file.
pub fn settings_file() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("settings.json"))
}
