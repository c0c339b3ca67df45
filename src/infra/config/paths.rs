use std::fs;
use std::path::PathBuf;

pub const APP_DIR: &str = "askql";
pub const CONFIG_FILE_NAME: &str = "config.toml";
pub const LOG_FILE_NAME: &str = "askql.log";

pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|base| base.join(APP_DIR).join(CONFIG_FILE_NAME))
}

/// Creates `<cache_dir>/askql` on first use.
pub fn log_dir() -> std::io::Result<PathBuf> {
    let base = dirs::cache_dir().ok_or_else(|| {
        std::io::Error::new(std::io::ErrorKind::NotFound, "could not find cache directory")
    })?;
    let dir = base.join(APP_DIR);
    if !dir.exists() {
        fs::create_dir_all(&dir)?;
    }
    Ok(dir)
}
