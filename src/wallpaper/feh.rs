use serde::{Deserialize, Serialize};
use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitStatus;
use thiserror::Error;
use tokio::process::Command;

use crate::ui::prelude::*;
use crate::wallpaper::random;

pub const DEFAULT_PROGRAM: &str = "feh";
pub const NO_XINERAMA: &str = "--no-xinerama";

/// How feh fits the image to the screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Center,
    Fill,
    Max,
    Scale,
    Tile,
}

impl Mode {
    /// Resolution order when several modes are requested at once.
    pub const PRIORITY: [Mode; 5] = [
        Mode::Center,
        Mode::Fill,
        Mode::Max,
        Mode::Scale,
        Mode::Tile,
    ];

    pub fn flag(self) -> &'static str {
        match self {
            Mode::Center => "--bg-center",
            Mode::Fill => "--bg-fill",
            Mode::Max => "--bg-max",
            Mode::Scale => "--bg-scale",
            Mode::Tile => "--bg-tile",
        }
    }

    /// First requested mode in [`Mode::PRIORITY`] order.
    pub fn first_requested(requested: &[Mode]) -> Option<Mode> {
        Self::PRIORITY
            .into_iter()
            .find(|mode| requested.contains(mode))
    }
}

/// Flags passed to feh ahead of the image, in order.
pub fn feh_flags(mode: Option<Mode>, no_xinerama: bool) -> Vec<String> {
    let mut flags = Vec::new();
    if let Some(mode) = mode {
        flags.push(mode.flag().to_string());
    }
    if no_xinerama {
        flags.push(NO_XINERAMA.to_string());
    }
    flags
}

#[derive(Debug, Error)]
pub enum FehError {
    #[error("'{program}' was not found")]
    NotFound {
        program: String,
        source: which::Error,
    },

    #[error("failed to launch {program}")]
    Launch { program: String, source: io::Error },

    #[error("`{command}` failed ({status}): {stderr}")]
    NonZeroExit {
        command: String,
        status: ExitStatus,
        stderr: String,
    },
}

impl FehError {
    /// Launch problems end the program, a failed invocation does not.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, FehError::NonZeroExit { .. })
    }
}

/// A resolved wallpaper setter plus the flags it is always called with.
#[derive(Debug, Clone)]
pub struct Feh {
    program: String,
    executable: PathBuf,
    flags: Vec<String>,
}

impl Feh {
    /// Resolve `program` through `PATH` (or as a path) up front, so a missing
    /// binary is reported before rotation starts.
    pub fn new(program: &str, flags: Vec<String>) -> Result<Self, FehError> {
        let executable = which::which(program).map_err(|source| FehError::NotFound {
            program: program.to_string(),
            source,
        })?;
        Ok(Self {
            program: program.to_string(),
            executable,
            flags,
        })
    }

    /// Full argument vector: program name, flags, image.
    pub fn command_line(&self, image: &Path) -> Vec<OsString> {
        let mut argv = Vec::with_capacity(self.flags.len() + 2);
        argv.push(OsString::from(&self.program));
        argv.extend(self.flags.iter().map(OsString::from));
        argv.push(image.as_os_str().to_os_string());
        argv
    }

    /// Shell-escaped form of [`Feh::command_line`], for messages only.
    pub fn display_command(&self, image: &Path) -> String {
        let argv: Vec<String> = self
            .command_line(image)
            .iter()
            .map(|a| a.to_string_lossy().into_owned())
            .collect();
        shell_words::join(argv)
    }

    /// Run feh once and wait for it.
    pub async fn invoke(&self, image: &Path) -> Result<(), FehError> {
        let output = Command::new(&self.executable)
            .args(&self.flags)
            .arg(image)
            .output()
            .await
            .map_err(|source| FehError::Launch {
                program: self.program.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(FehError::NonZeroExit {
                command: self.display_command(image),
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(())
    }

    /// Pick an image from `source` and set it.
    ///
    /// A non-zero exit is printed and swallowed; `Ok(false)` tells the caller
    /// the cycle did not change the wallpaper.
    pub async fn run(&self, source: &Path) -> Result<bool, FehError> {
        let image = random::select(source, &mut rand::thread_rng());
        self.apply(image.as_deref(), source).await
    }

    async fn apply(&self, image: Option<&Path>, source: &Path) -> Result<bool, FehError> {
        let image = match image {
            Some(image) => image,
            None => {
                emit(
                    Level::Warn,
                    "feh.no_image",
                    &format!("No image found at {}", source.display()),
                    None,
                );
                Path::new("")
            }
        };

        debug("feh.invoke", &self.display_command(image));
        match self.invoke(image).await {
            Ok(()) => {
                emit(
                    Level::Success,
                    "feh.applied",
                    &format!("Wallpaper set: {}", image.display()),
                    Some(serde_json::json!({ "image": image.to_string_lossy() })),
                );
                Ok(true)
            }
            Err(e) if !e.is_fatal() => {
                emit(Level::Error, "feh.failed", &e.to_string(), None);
                Ok(false)
            }
            Err(e) => Err(e),
        }
    }
}
