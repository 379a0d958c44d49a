//! buildah client error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum BuildahError {
    #[error("buildah not found. Please install buildah (https://buildah.io) and make sure it is on PATH")]
    NotFound,

    #[error("Failed to execute '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("buildah {command} failed (exit code {exit_code}):\n{stderr}")]
    CommandFailed {
        command: String,
        exit_code: i32,
        stderr: String,
    },

    #[error("buildah from did not print a container id")]
    EmptyContainerId,

    #[error("JSON serialize error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, BuildahError>;
