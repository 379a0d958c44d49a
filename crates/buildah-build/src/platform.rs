//! Host platform check

use crate::error::{Result, RunError};

/// Operating system reported by the Actions runner, or the compile target
/// when not running under one.
pub fn host_os() -> String {
    std::env::var("RUNNER_OS")
        .ok()
        .filter(|os| !os.trim().is_empty())
        .unwrap_or_else(|| std::env::consts::OS.to_string())
}

/// buildah only exists on Linux.
pub fn check_platform(os: &str) -> Result<()> {
    if os.trim().eq_ignore_ascii_case("linux") {
        Ok(())
    } else {
        Err(RunError::UnsupportedPlatform(os.to_string()))
    }
}
