//! Process name lookup through procfs.

use super::{ContextFailure, Probed};
use std::path::Path;

/// Name of the process with the given PID, from `/proc/<pid>/comm`.
pub fn application_name(pid: u32) -> Probed {
    application_name_in(Path::new("/proc"), pid)
}

pub(crate) fn application_name_in(proc_root: &Path, pid: u32) -> Probed {
    let comm = proc_root.join(pid.to_string()).join("comm");
    match std::fs::read_to_string(&comm) {
        Ok(name) if !name.trim().is_empty() => Probed::Known(name.trim_end().to_string()),
        Ok(_) => Probed::Unavailable(ContextFailure::UnknownApplication),
        Err(e) => {
            tracing::debug!(pid, error = %e, "Could not read process name");
            Probed::Unavailable(ContextFailure::UnknownApplication)
        }
    }
}
