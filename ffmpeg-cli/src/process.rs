use std::env;
use std::path::{Path, PathBuf};
use std::process::ExitStatus;

use tokio::process::{Child, ChildStdin};

use crate::command::FfmpegCommand;

/// Resolve a program name the way a shell would: names containing a path
/// separator are taken as-is, bare names are looked up in `PATH`. Only
/// executable files count.
pub fn find_program(program: &Path) -> Option<PathBuf> {
    if program.components().count() > 1 {
        return is_executable(program).then(|| program.to_path_buf());
    }
    let paths = env::var_os("PATH")?;
    env::split_paths(&paths)
        .map(|dir| dir.join(program))
        .find(|candidate| is_executable(candidate))
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;

    path.metadata()
        .map(|meta| meta.is_file() && meta.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}

/// A running engine process.
pub struct EngineProcess {
    child: Child,
}

impl EngineProcess {
    pub fn spawn(command: &FfmpegCommand) -> anyhow::Result<Self> {
        let child = command.to_command().spawn().map_err(|e| {
            anyhow::anyhow!("spawn {}: {}", command.program().display(), e)
        })?;
        log::debug!("engine started, pid {:?}", child.id());
        Ok(Self { child })
    }

    /// Hand out the stdin pipe. Dropping it signals end of input.
    pub fn take_stdin(&mut self) -> Option<ChildStdin> {
        self.child.stdin.take()
    }

    pub async fn wait(&mut self) -> anyhow::Result<ExitStatus> {
        Ok(self.child.wait().await?)
    }

    pub async fn kill(&mut self) -> anyhow::Result<()> {
        match self.child.try_wait()? {
            Some(_) => Ok(()),
            None => Ok(self.child.kill().await?),
        }
    }
}
