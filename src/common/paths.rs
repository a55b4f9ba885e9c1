//! Centralized path management for rw

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Get the rw config directory (not created; rw only ever reads from it)
pub fn rw_config_dir() -> Result<PathBuf> {
    let config_dir = dirs::config_dir()
        .context("Unable to determine user config directory")?
        .join("rw");
    Ok(config_dir)
}

/// Default location of the config file
pub fn config_file_path() -> Result<PathBuf> {
    Ok(rw_config_dir()?.join("rw.toml"))
}

/// Name of the per-user lock file
pub fn lock_file_name(uid: u32) -> String {
    format!("rw-rb-{uid}.lock")
}

/// Lock file for `uid` inside `dir`
pub fn lock_file_in(dir: &Path, uid: u32) -> PathBuf {
    dir.join(lock_file_name(uid))
}

/// Lock file for the invoking user in the system temporary directory
pub fn lock_file_path() -> PathBuf {
    let uid = nix::unistd::getuid().as_raw();
    lock_file_in(&std::env::temp_dir(), uid)
}
