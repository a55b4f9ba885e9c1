use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::common::paths;
use crate::wallpaper::cli::RotateArgs;
use crate::wallpaper::feh::{self, Mode};
use crate::wallpaper::interval::{self, Interval};

/// Defaults read from `rw.toml`. Every key is optional; command line flags
/// take precedence.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct RwConfig {
    pub program: Option<String>,
    pub mode: Option<Mode>,
    pub no_xinerama: bool,
    pub image: Option<String>,
    pub directory: Option<String>,
    pub interval: Option<String>,
}

impl RwConfig {
    pub fn load() -> Result<Self> {
        Self::load_from(&paths::config_file_path()?)
    }

    /// A missing file yields the defaults.
    pub fn load_from(cfg_path: &Path) -> Result<Self> {
        if !cfg_path.exists() {
            return Ok(Self::default());
        }

        let s = fs::read_to_string(cfg_path)
            .with_context(|| format!("reading config {}", cfg_path.display()))?;
        toml::from_str(&s).with_context(|| format!("parsing config {}", cfg_path.display()))
    }
}

fn expand(path: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(path).into_owned())
}

/// Immutable snapshot of everything a rotation needs.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub program: String,
    pub mode: Option<Mode>,
    pub no_xinerama: bool,
    pub image: Option<PathBuf>,
    pub directory: Option<PathBuf>,
    pub interval: String,
}

impl Settings {
    /// Merge command line arguments over the config file.
    ///
    /// Sources are taken as a pair: if the command line names an image or a
    /// directory, the file's image and directory are both ignored.
    pub fn resolve(args: &RotateArgs, file: RwConfig) -> Self {
        let (image, directory) = if args.image.is_some() || args.directory.is_some() {
            (args.image.clone(), args.directory.clone())
        } else {
            (
                file.image.as_deref().map(expand),
                file.directory.as_deref().map(expand),
            )
        };

        Self {
            program: file
                .program
                .unwrap_or_else(|| feh::DEFAULT_PROGRAM.to_string()),
            mode: args.mode().or(file.mode),
            no_xinerama: args.noxinerama || file.no_xinerama,
            image,
            directory,
            interval: args
                .timeinterval
                .clone()
                .or(file.interval)
                .unwrap_or_else(|| interval::DEFAULT_INTERVAL.to_string()),
        }
    }

    /// The active source. A directory wins over an image.
    pub fn source(&self) -> Option<&Path> {
        self.directory.as_deref().or(self.image.as_deref())
    }

    pub fn flags(&self) -> Vec<String> {
        feh::feh_flags(self.mode, self.no_xinerama)
    }

    pub fn interval(&self) -> Interval {
        Interval::parse(&self.interval)
    }
}
