//! The rotation loop: set a wallpaper, sleep, repeat until told to stop.

use std::future::Future;
use std::io;
use std::path::{Path, PathBuf};
use tokio::signal::unix::{SignalKind, signal};

use crate::ui::prelude::*;
use crate::wallpaper::feh::{Feh, FehError};
use crate::wallpaper::interval::Interval;

pub struct Rotation {
    feh: Feh,
    source: PathBuf,
    interval: Interval,
}

impl Rotation {
    pub fn new(feh: Feh, source: impl Into<PathBuf>, interval: Interval) -> Self {
        Self {
            feh,
            source: source.into(),
            interval,
        }
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn interval(&self) -> Interval {
        self.interval
    }

    /// One pick-and-set step. Only launch failures are errors.
    pub async fn cycle(&self) -> Result<bool, FehError> {
        self.feh.run(&self.source).await
    }

    /// Rotate until `shutdown` completes and return the number of finished
    /// cycles. `shutdown` is checked before, during and after every cycle and
    /// interrupts the sleep.
    pub async fn run_until<F>(&self, shutdown: F) -> Result<u64, FehError>
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);
        let mut cycles = 0u64;

        loop {
            tokio::select! {
                biased;
                _ = &mut shutdown => return Ok(cycles),
                res = self.cycle() => {
                    res?;
                }
            }
            cycles += 1;

            debug(
                "rotation.sleep",
                &format!("Next wallpaper in {}", self.interval),
            );
            tokio::select! {
                biased;
                _ = &mut shutdown => return Ok(cycles),
                _ = tokio::time::sleep(self.interval.duration()) => {}
            }
        }
    }

    /// Rotate until `signal` (see [`shutdown_signal`]) reports a termination
    /// signal.
    pub async fn run_forever<S>(&self, signal: S) -> Result<u64, FehError>
    where
        S: Future<Output = &'static str>,
    {
        self.run_until(async {
            let name = signal.await;
            emit(
                Level::Info,
                "rotation.shutdown",
                &format!("Received {name}, stopping rotation"),
                None,
            );
        })
        .await
    }
}

/// Installs the handlers immediately and resolves with the name of the first
/// termination signal received.
pub fn shutdown_signal() -> io::Result<impl Future<Output = &'static str>> {
    let mut interrupt = signal(SignalKind::interrupt())?;
    let mut terminate = signal(SignalKind::terminate())?;
    let mut hangup = signal(SignalKind::hangup())?;

    Ok(async move {
        tokio::select! {
            _ = interrupt.recv() => "SIGINT",
            _ = terminate.recv() => "SIGTERM",
            _ = hangup.recv() => "SIGHUP",
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::os::unix::fs::PermissionsExt;
    use std::time::{Duration, Instant};
    use tempfile::tempdir;

    fn counting_feh(log: &Path, exit_code: i32) -> Feh {
        let script = format!("echo \"$1\" >> '{}'; exit {}", log.display(), exit_code);
        Feh::new("sh", vec!["-c".to_string(), script, "feh".to_string()]).unwrap()
    }

    fn lines(path: &Path) -> usize {
        fs::read_to_string(path)
            .map(|s| s.lines().count())
            .unwrap_or(0)
    }

    fn image(dir: &Path) -> PathBuf {
        let image = dir.join("a.png");
        fs::write(&image, b"img").unwrap();
        image
    }

    #[tokio::test]
    async fn repeats_until_shutdown() {
        let dir = tempdir().unwrap();
        let log = dir.path().join("calls.log");
        let rotation = Rotation::new(
            counting_feh(&log, 0),
            image(dir.path()),
            Interval::from_secs(0),
        );

        let cycles = rotation
            .run_until(tokio::time::sleep(Duration::from_millis(300)))
            .await
            .unwrap();

        assert!(cycles >= 2, "only {cycles} cycles");
        assert!(lines(&log) as u64 >= cycles);
    }

    #[tokio::test]
    async fn tool_failures_do_not_stop_rotation() {
        let dir = tempdir().unwrap();
        let log = dir.path().join("calls.log");
        let rotation = Rotation::new(
            counting_feh(&log, 1),
            image(dir.path()),
            Interval::from_secs(0),
        );

        let cycles = rotation
            .run_until(tokio::time::sleep(Duration::from_millis(300)))
            .await
            .unwrap();
        assert!(cycles >= 2, "only {cycles} cycles");
    }

    #[tokio::test]
    async fn shutdown_interrupts_sleep() {
        let dir = tempdir().unwrap();
        let log = dir.path().join("calls.log");
        let rotation = Rotation::new(
            counting_feh(&log, 0),
            image(dir.path()),
            Interval::parse("1h"),
        );

        let started = Instant::now();
        let cycles = rotation
            .run_until(tokio::time::sleep(Duration::from_millis(1500)))
            .await
            .unwrap();

        assert_eq!(cycles, 1);
        assert_eq!(lines(&log), 1);
        assert!(started.elapsed() < Duration::from_secs(30));
    }

    #[tokio::test]
    async fn ready_shutdown_runs_nothing() {
        let dir = tempdir().unwrap();
        let log = dir.path().join("calls.log");
        let rotation = Rotation::new(
            counting_feh(&log, 0),
            image(dir.path()),
            Interval::from_secs(0),
        );

        let cycles = rotation.run_until(std::future::ready(())).await.unwrap();
        assert_eq!(cycles, 0);
        assert_eq!(lines(&log), 0);
    }

    #[tokio::test]
    async fn run_forever_stops_on_signal_future() {
        let dir = tempdir().unwrap();
        let log = dir.path().join("calls.log");
        let rotation = Rotation::new(
            counting_feh(&log, 0),
            image(dir.path()),
            Interval::parse("10m"),
        );

        let signal = async {
            tokio::time::sleep(Duration::from_millis(1500)).await;
            "SIGTERM"
        };
        assert_eq!(rotation.run_forever(signal).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn launch_failure_ends_rotation() {
        let dir = tempdir().unwrap();
        let tool = dir.path().join("fake-feh");
        fs::write(&tool, "#!/bin/sh\nexit 0\n").unwrap();
        fs::set_permissions(&tool, fs::Permissions::from_mode(0o755)).unwrap();

        let feh = Feh::new(&tool.to_string_lossy(), Vec::new()).unwrap();
        fs::remove_file(&tool).unwrap();

        let rotation = Rotation::new(feh, image(dir.path()), Interval::from_secs(0));
        let err = rotation
            .run_until(std::future::pending())
            .await
            .unwrap_err();
        assert!(matches!(err, FehError::Launch { .. }));
    }
}
