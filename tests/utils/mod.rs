use anyhow::{Result, bail};
use nix::sys::signal::{self, Signal};
use nix::unistd::Pid;
use std::process::{Child, Command, Stdio};
use std::time::{Duration, Instant};

use super::common::TestEnvironment;

pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
    pub exit_code: i32,
}

fn rw_command(env: &TestEnvironment, args: &[&str]) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_rw"));
    cmd.args(args)
        .env("TMPDIR", env.tmp_dir())
        .env("XDG_CONFIG_HOME", env.config_home())
        .env("NO_COLOR", "1")
        .stdin(Stdio::null());
    cmd
}

/// Run rw to completion.
pub fn run_rw_command(env: &TestEnvironment, args: &[&str]) -> Result<CommandOutput> {
    let output = rw_command(env, args).output()?;
    Ok(CommandOutput {
        stdout: String::from_utf8_lossy(&output.stdout).to_string(),
        stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        exit_code: output.status.code().unwrap_or(-1),
    })
}

/// Start rw in the background; the caller stops it with [`terminate`].
pub fn spawn_rw_command(env: &TestEnvironment, args: &[&str]) -> Result<Child> {
    Ok(rw_command(env, args)
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()?)
}

/// Poll `condition` until it holds or `timeout` passes.
pub fn wait_for(timeout: Duration, mut condition: impl FnMut() -> bool) -> Result<()> {
    let deadline = Instant::now() + timeout;
    while Instant::now() < deadline {
        if condition() {
            return Ok(());
        }
        std::thread::sleep(Duration::from_millis(20));
    }
    bail!("condition not met within {:?}", timeout)
}

/// Send SIGTERM and wait for the exit code.
pub fn terminate(mut child: Child) -> Result<i32> {
    signal::kill(Pid::from_raw(child.id() as i32), Signal::SIGTERM)?;
    let status = child.wait()?;
    Ok(status.code().unwrap_or(-1))
}
