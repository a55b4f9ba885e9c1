use clap::Args;
use std::path::PathBuf;

use crate::wallpaper::feh::Mode;

#[derive(Args, Debug, Clone, Default)]
pub struct RotateArgs {
    /// Set the background. Nothing happens without this flag.
    /// Use in conjunction with --center, --fill, --max, --scale or --tile
    #[arg(short, long)]
    pub background: bool,

    /// Center the file on the background. If it is too small, it will be
    /// surrounded by a black border
    #[arg(short, long)]
    pub center: bool,

    /// Like --scale, but preserves aspect ratio by zooming the image until it
    /// fits. Either a horizontal or a vertical part of the image will be cut off
    #[arg(short, long)]
    pub fill: bool,

    /// Like --fill, but scale the image to the maximum size that fits the
    /// screen with black borders on one side
    #[arg(short, long)]
    pub max: bool,

    /// Fit the file into the background without repeating it, cutting off
    /// stuff or using borders. The aspect ratio is not preserved either
    #[arg(short, long)]
    pub scale: bool,

    /// Tile (repeat) the image in case it is too small for the screen
    #[arg(short, long)]
    pub tile: bool,

    /// Treat the whole X display as one screen when setting wallpapers
    #[arg(short, long)]
    pub noxinerama: bool,

    /// Pick a random image from this directory on every rotation
    #[arg(short, long, value_name = "DIR")]
    pub directory: Option<PathBuf>,

    /// Use this background image
    #[arg(short, long, value_name = "IMG")]
    pub image: Option<PathBuf>,

    /// Rotation interval, '1h' by default. Use e.g. '30s' for seconds,
    /// '10m' for minutes or '2h' for hours
    #[arg(short = 'T', long, value_name = "TI")]
    pub timeinterval: Option<String>,
}

impl RotateArgs {
    /// Mode flags that were passed, in declaration order.
    pub fn requested_modes(&self) -> Vec<Mode> {
        [
            (self.center, Mode::Center),
            (self.fill, Mode::Fill),
            (self.max, Mode::Max),
            (self.scale, Mode::Scale),
            (self.tile, Mode::Tile),
        ]
        .into_iter()
        .filter_map(|(set, mode)| set.then_some(mode))
        .collect()
    }

    /// The effective mode, if any was passed.
    pub fn mode(&self) -> Option<Mode> {
        Mode::first_requested(&self.requested_modes())
    }
}
