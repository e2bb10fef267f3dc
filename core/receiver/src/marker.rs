//! Liveness marker: a pid file launchers check before starting another
//! receiver.
//!
//! Written only once the port is bound, and removed whenever the process
//! leaves `main` (idle exit, Ctrl-C). A failed bind therefore never leaves a
//! marker pointing at a dead process.

use std::path::{Path, PathBuf};

use fs_err as fs;
use tracing::{debug, warn};

pub const MARKER_FILE: &str = "otel-receiver.pid";

#[derive(Debug)]
pub struct LivenessMarker {
    path: PathBuf,
}

impl LivenessMarker {
    pub fn create(state_dir: &Path) -> std::io::Result<Self> {
        fs::create_dir_all(state_dir)?;
        let path = state_dir.join(MARKER_FILE);
        fs::write(&path, format!("{}\n", std::process::id()))?;
        debug!(path = %path.display(), "Liveness marker written");
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for LivenessMarker {
    fn drop(&mut self) {
        match fs::remove_file(&self.path) {
            Ok(()) => debug!(path = %self.path.display(), "Liveness marker removed"),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
            Err(err) => warn!(error = %err, "Failed to remove liveness marker"),
        }
    }
}
