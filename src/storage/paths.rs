use dirs::home_dir;
use std::{env, path::PathBuf};

const DEFAULT_DIR_NAME: &str = ".billguard";
const SUBSCRIPTIONS_FILE: &str = "subscriptions.json";
const CONFIG_FILE: &str = "config.json";

/// Returns the application data directory, defaulting to `~/.billguard`.
pub fn app_data_dir() -> PathBuf {
    if let Some(custom) = env::var_os("BILLGUARD_HOME") {
        return PathBuf::from(custom);
    }
    home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(DEFAULT_DIR_NAME)
}

/// The fixed location of the persisted subscription list.
pub fn subscriptions_file_in(base: &std::path::Path) -> PathBuf {
    base.join(SUBSCRIPTIONS_FILE)
}

/// The fixed location of the persisted configuration.
pub fn config_file_in(base: &std::path::Path) -> PathBuf {
    base.join(CONFIG_FILE)
}
