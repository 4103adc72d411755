use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// File constants
// ---------------------------------------------------------------------------

pub const CONFIG_FILE: &str = "destiny.yaml";

pub const DEFAULT_DATA_DIR: &str = "data";
pub const DEFAULT_RESPONSES_FILE: &str = "responses.json";
pub const DEFAULT_RESULTS_FILE: &str = "user_results.csv";
pub const DEFAULT_ASSETS_DIR: &str = "public";

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

pub fn config_path(root: &Path) -> PathBuf {
    root.join(CONFIG_FILE)
}

pub fn data_dir(root: &Path, dir: &str) -> PathBuf {
    root.join(dir)
}
