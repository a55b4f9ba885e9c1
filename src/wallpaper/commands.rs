use anyhow::Result;
use std::path::Path;

use crate::common::InstanceLock;
use crate::ui::prelude::*;
use crate::wallpaper::cli::RotateArgs;
use crate::wallpaper::config::{RwConfig, Settings};
use crate::wallpaper::feh::Feh;
use crate::wallpaper::rotation::{self, Rotation};

/// Load settings from `config_path` (or the default location) and merge args.
pub fn load_settings(args: &RotateArgs, config_path: Option<&Path>) -> Result<Settings> {
    let file = match config_path {
        Some(path) => RwConfig::load_from(path)?,
        None => RwConfig::load()?,
    };
    Ok(Settings::resolve(args, file))
}

pub async fn handle_rotate(args: RotateArgs, config_path: Option<&Path>) -> Result<()> {
    if !args.background {
        debug(
            "rotate.disabled",
            "--background not given, not touching the wallpaper",
        );
        return Ok(());
    }

    let settings = load_settings(&args, config_path)?;
    let Some(source) = settings.source() else {
        emit(
            Level::Warn,
            "rotate.no_source",
            "No --image or --directory given, nothing to rotate",
            None,
        );
        return Ok(());
    };

    let feh = Feh::new(&settings.program, settings.flags())?;
    let rotation = Rotation::new(feh, source, settings.interval());

    // Handlers go in before the lock so a signal can never skip the release.
    let signal = rotation::shutdown_signal()?;
    let lock = InstanceLock::acquire()?;
    debug(
        "rotate.locked",
        &format!("Holding {}", lock.path().display()),
    );

    emit(
        Level::Info,
        "rotate.start",
        &format!(
            "Rotating {} every {}",
            rotation.source().display(),
            rotation.interval()
        ),
        Some(serde_json::json!({
            "source": rotation.source().to_string_lossy(),
            "interval": rotation.interval().as_secs(),
            "flags": settings.flags(),
        })),
    );

    let result = rotation.run_forever(signal).await;
    let released = lock.release();

    let cycles = result?;
    released?;
    debug("rotate.stopped", &format!("Stopped after {cycles} cycles"));
    Ok(())
}
