//! Default `project_version` to the project's current VCS revision — a
//! read-only `git rev-parse` shell-out. Never invoked from `pyxref_core`
//! itself; this is purely CLI-layer convenience.

use std::path::Path;
use std::process::Command;

const FALLBACK: &str = "0.0.0";

/// The short hash of `project_root`'s current `git` revision, or
/// [`FALLBACK`] with a warning if `git` isn't available, the directory
/// isn't a repository, or the command otherwise fails.
pub fn default_project_version(project_root: &Path) -> String {
    let output = Command::new("git")
        .arg("-C")
        .arg(project_root)
        .args(["rev-parse", "--short", "HEAD"])
        .output();

    match output {
        Ok(output) if output.status.success() => {
            let hash = String::from_utf8_lossy(&output.stdout).trim().to_string();
            if hash.is_empty() {
                log::warn!("git rev-parse produced no output under {}; using {FALLBACK}", project_root.display());
                FALLBACK.to_string()
            } else {
                hash
            }
        }
        _ => {
            log::warn!(
                "could not determine a git revision under {}; using {FALLBACK}",
                project_root.display()
            );
            FALLBACK.to_string()
        }
    }
}
