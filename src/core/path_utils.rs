/*
 * Locates the per-user directory where the toolkit keeps its settings file
 * and, optionally, its log file.
 */
use directories::ProjectDirs;
use std::fs;
use std::path::{Path, PathBuf};

/*
 * Ensures `dir` exists, creating missing parents. Returns `false` and logs
 * when the directory could not be created.
 */
pub(crate) fn ensure_dir_exists(dir: &Path) -> bool {
    if dir.is_dir() {
        log::trace!("PathUtils: Directory already exists: {dir:?}");
        return true;
    }
    match fs::create_dir_all(dir) {
        Ok(()) => {
            log::debug!("PathUtils: Created directory: {dir:?}");
            true
        }
        Err(e) => {
            log::error!("PathUtils: Failed to create directory {dir:?}: {e}");
            false
        }
    }
}

/*
 * Retrieves the local (non-roaming) configuration directory for `app_name`,
 * creating it on first use. No organization qualifier is used, so the
 * directory sits directly below the platform's local config root
 * (e.g. `~/.config/<app>` on Linux, `AppData/Local/<app>` on Windows).
 *
 * Returns `None` if the platform offers no home directory or the directory
 * cannot be created.
 */
pub fn get_base_app_config_local_dir(app_name: &str) -> Option<PathBuf> {
    log::trace!("PathUtils: Resolving config dir for '{app_name}'");
    let proj_dirs = ProjectDirs::from("", "", app_name)?;
    let config_path = proj_dirs.config_local_dir();
    if ensure_dir_exists(config_path) {
        Some(config_path.to_path_buf())
    } else {
        None
    }
}
