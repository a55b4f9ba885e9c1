mod common;
mod ui;
mod wallpaper;

use clap::Parser;
use std::path::PathBuf;

use crate::common::LockError;
use crate::ui::prelude::*;
use crate::wallpaper::cli::RotateArgs;

/// rw - rotate wallpaper with feh
#[derive(Parser, Debug)]
#[command(name = "rw", author, version, about, long_about = None)]
struct Cli {
    #[command(flatten)]
    rotate: RotateArgs,

    /// Config file to read defaults from (defaults to ~/.config/rw/rw.toml)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Show debug output
    #[arg(long)]
    debug: bool,

    /// Output format for messages
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    output: OutputFormat,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,
}

fn program_name() -> String {
    std::env::args_os()
        .next()
        .map(PathBuf::from)
        .and_then(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()))
        .unwrap_or_else(|| "rw".to_string())
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();

    ui::set_debug_mode(cli.debug);
    ui::init(cli.output, !cli.no_color);

    if let Err(e) = wallpaper::commands::handle_rotate(cli.rotate, cli.config.as_deref()).await {
        if let Some(LockError::AlreadyRunning(path)) = e.downcast_ref::<LockError>() {
            emit(
                Level::Error,
                "rotate.already_running",
                &format!("{} is already running!", program_name()),
                Some(serde_json::json!({ "lock": path.to_string_lossy() })),
            );
        } else {
            emit(Level::Error, "rotate.failed", &format!("Error: {e:#}"), None);
        }
        std::process::exit(1);
    }
}
