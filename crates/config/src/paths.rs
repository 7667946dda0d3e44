use std::path::PathBuf;

use directories::ProjectDirs;

pub const CONFIG_PATH_ENV: &str = "BOARD_CONFIG_PATH";

pub fn config_path() -> PathBuf {
    if let Ok(override_path) = std::env::var(CONFIG_PATH_ENV) {
        let override_path = override_path.trim();
        if !override_path.is_empty() {
            return PathBuf::from(override_path);
        }
    }

    match ProjectDirs::from("dev", "board-tools", "board-tools") {
        Some(dirs) => dirs.config_dir().join("config.json"),
        // No home directory (containers, CI): look next to the process.
        None => PathBuf::from("config.json"),
    }
}
