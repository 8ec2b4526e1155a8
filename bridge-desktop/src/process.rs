//! Process inspection using `sysinfo`

use bridge_traits::{
    error::{BridgeError, Result},
    process::{normalize_process_name, ProcessInspector},
};
use parking_lot::Mutex;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};
use sysinfo::System;
use tracing::{debug, info, warn};

/// `sysinfo`-backed process inspector.
///
/// The process table is refreshed on every `is_running` call; a poll cycle
/// asks at most twice, so the cost stays bounded by the poll interval.
///
/// Launched children are kept until they exit and are reaped on the next
/// inspection, so short-lived launchers never linger as zombies.
pub struct SysinfoProcessInspector {
    system: Mutex<System>,
    children: Mutex<Vec<(PathBuf, Child)>>,
}

impl SysinfoProcessInspector {
    pub fn new() -> Self {
        Self {
            system: Mutex::new(System::new()),
            children: Mutex::new(Vec::new()),
        }
    }

    /// Reap exited children. Returns how many are still alive.
    fn reap(&self) -> usize {
        let mut children = self.children.lock();
        children.retain_mut(|(path, child)| match child.try_wait() {
            Ok(None) => true,
            Ok(Some(status)) => {
                debug!(path = %path.display(), %status, "Launched process exited");
                false
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Failed to poll launched process");
                false
            }
        });
        children.len()
    }
}

impl Default for SysinfoProcessInspector {
    fn default() -> Self {
        Self::new()
    }
}

impl ProcessInspector for SysinfoProcessInspector {
    fn is_running(&self, name: &str) -> bool {
        self.reap();

        let wanted = normalize_process_name(name);
        let mut system = self.system.lock();
        system.refresh_processes();

        let running = system
            .processes()
            .values()
            .any(|process| normalize_process_name(process.name()) == wanted);

        debug!(process = name, running, "Checked process table");
        running
    }

    fn launch(&self, path: &Path) -> Result<()> {
        self.reap();

        if self.children.lock().iter().any(|(launched, _)| launched == path) {
            debug!(path = %path.display(), "Previous launch still running");
            return Ok(());
        }

        info!(path = %path.display(), "Launching process");

        let child = Command::new(path)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| BridgeError::LaunchFailed {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;

        self.children.lock().push((path.to_path_buf(), child));
        Ok(())
    }
}
