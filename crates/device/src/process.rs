use crate::DeviceError;
use std::io::ErrorKind;
use std::path::Path;
use std::process::{Child, Command};

/// Handle to the externally launched game binary.
pub trait GameProcess {
    /// Stop the process. Calling this on a process that already exited, or
    /// calling it twice, succeeds without doing anything.
    ///
    /// # Errors
    ///
    /// Returns [`DeviceError::Terminate`] if the OS refuses to kill a process
    /// that is still running.
    fn terminate(&mut self) -> Result<(), DeviceError>;
}

pub trait ProcessLauncher {
    /// # Errors
    ///
    /// Returns [`DeviceError::Launch`] when the executable cannot be started.
    fn launch(&self, executable: &Path, args: &[String])
        -> Result<Box<dyn GameProcess>, DeviceError>;
}

/// Launches games as plain child processes.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemLauncher;

impl ProcessLauncher for SystemLauncher {
    fn launch(
        &self,
        executable: &Path,
        args: &[String],
    ) -> Result<Box<dyn GameProcess>, DeviceError> {
        let child = ChildProcess::spawn(executable, args)?;
        Ok(Box::new(child))
    }
}

#[derive(Debug)]
pub struct ChildProcess {
    child: Child,
}

impl ChildProcess {
    /// # Errors
    ///
    /// Returns [`DeviceError::Launch`] when spawning fails, typically because
    /// the executable does not exist.
    pub fn spawn(executable: &Path, args: &[String]) -> Result<Self, DeviceError> {
        let child = Command::new(executable)
            .args(args)
            .spawn()
            .map_err(|source| DeviceError::Launch {
                path: executable.to_path_buf(),
                source,
            })?;
        tracing::info!(pid = child.id(), "launched {}", executable.display());
        Ok(Self { child })
    }

    #[must_use]
    pub fn id(&self) -> u32 {
        self.child.id()
    }
}

impl GameProcess for ChildProcess {
    fn terminate(&mut self) -> Result<(), DeviceError> {
        if let Some(status) = self.child.try_wait().map_err(DeviceError::Terminate)? {
            tracing::debug!(pid = self.child.id(), %status, "game process already exited");
            return Ok(());
        }
        match self.child.kill() {
            Ok(()) => {}
            // Raced with the process exiting on its own.
            Err(e) if e.kind() == ErrorKind::InvalidInput => return Ok(()),
            Err(e) => return Err(DeviceError::Terminate(e)),
        }
        self.child.wait().map_err(DeviceError::Terminate)?;
        tracing::info!(pid = self.child.id(), "game process terminated");
        Ok(())
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[test]
    fn terminate_is_idempotent() {
        let mut child = ChildProcess::spawn(Path::new("sleep"), &["30".to_owned()])
            .expect("sleep should be available on unix");
        child.terminate().unwrap();
        child.terminate().unwrap();
    }

    #[test]
    fn terminate_after_natural_exit_succeeds() {
        let mut child = ChildProcess::spawn(Path::new("true"), &[]).unwrap();
        std::thread::sleep(std::time::Duration::from_millis(100));
        child.terminate().unwrap();
    }

    #[test]
    fn missing_executable_is_a_launch_error() {
        let err = SystemLauncher
            .launch(Path::new("/definitely/not/a/game.exe"), &[])
            .err()
            .unwrap();
        assert!(matches!(err, DeviceError::Launch { .. }));
    }
}
