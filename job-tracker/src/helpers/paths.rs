use std::path::PathBuf;

const APP_DIR: &str = "job-tracker";

/// Returns the path to the tracker config file
///
/// # Platform-specific paths
///
/// - **macOS**: `~/Library/Application Support/job-tracker/tracker.toml`
/// - **Linux**: `~/.config/job-tracker/tracker.toml`
/// - **Windows**: `%APPDATA%\job-tracker\tracker.toml`
pub fn get_config_path() -> PathBuf {
    if let Some(config_dir) = dirs::config_dir() {
        config_dir.join(APP_DIR).join("tracker.toml")
    } else {
        PathBuf::from("tracker.toml")
    }
}

/// Returns the directory holding the local blobs (wishlist and the simulated
/// primary collection)
///
/// # Platform-specific paths
///
/// - **macOS**: `~/Library/Application Support/job-tracker`
/// - **Linux**: `~/.local/share/job-tracker`
/// - **Windows**: `%LOCALAPPDATA%\job-tracker`
pub fn get_data_dir() -> PathBuf {
    if let Some(data_dir) = dirs::data_local_dir() {
        data_dir.join(APP_DIR)
    } else {
        PathBuf::from(".job-tracker")
    }
}
