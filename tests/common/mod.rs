use anyhow::Result;
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Isolated sandbox for one rw invocation: its own TMPDIR (and so its own
/// lock file), config home, images and a stub wallpaper setter.
pub struct TestEnvironment {
    temp_dir: TempDir,
}

impl TestEnvironment {
    pub fn new() -> Result<Self> {
        let temp_dir = tempfile::tempdir()?;
        for sub in ["tmp", "config", "walls"] {
            fs::create_dir_all(temp_dir.path().join(sub))?;
        }
        Ok(Self { temp_dir })
    }

    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Directory handed to rw as TMPDIR
    pub fn tmp_dir(&self) -> PathBuf {
        self.path().join("tmp")
    }

    pub fn config_home(&self) -> PathBuf {
        self.path().join("config")
    }

    pub fn walls_dir(&self) -> PathBuf {
        self.path().join("walls")
    }

    /// The lock file rw creates for the current user inside this sandbox
    pub fn lock_file(&self) -> PathBuf {
        let uid = nix::unistd::getuid().as_raw();
        self.tmp_dir().join(format!("rw-rb-{uid}.lock"))
    }

    /// Every invocation of the stub appends its arguments, one per line,
    /// followed by a `--` separator.
    pub fn calls_log(&self) -> PathBuf {
        self.path().join("calls.log")
    }

    pub fn add_image(&self, name: &str) -> Result<PathBuf> {
        let path = self.walls_dir().join(name);
        fs::write(&path, b"not really a png")?;
        Ok(path)
    }

    /// Write an executable stand-in for feh and return its path.
    pub fn stub_tool(&self, exit_code: i32) -> Result<PathBuf> {
        let path = self.path().join("fake-feh");
        let script = format!(
            "#!/bin/sh\nprintf '%s\\n' \"$@\" >> '{log}'\necho -- >> '{log}'\nexit {exit_code}\n",
            log = self.calls_log().display(),
        );
        fs::write(&path, script)?;
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755))?;
        Ok(path)
    }

    /// Write an rw.toml pointing at `program` and return its path.
    pub fn write_config(&self, program: &Path) -> Result<PathBuf> {
        let path = self.config_home().join("rw.toml");
        fs::write(&path, format!("program = '{}'\n", program.display()))?;
        Ok(path)
    }

    /// Argument lists of every recorded stub invocation
    pub fn recorded_calls(&self) -> Vec<Vec<String>> {
        let Ok(log) = fs::read_to_string(self.calls_log()) else {
            return Vec::new();
        };
        let mut calls = Vec::new();
        let mut current = Vec::new();
        for line in log.lines() {
            if line == "--" {
                calls.push(std::mem::take(&mut current));
            } else {
                current.push(line.to_string());
            }
        }
        calls
    }
}
