use buildah_build_core::InputError;
use buildah_client::BuildahError;
use std::fmt;
use thiserror::Error;

/// Step of the build an invocation belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildStage {
    Version,
    Dockerfile,
    From,
    Config,
    Copy,
    Commit,
    Tag,
}

impl fmt::Display for BuildStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BuildStage::Version => "version check",
            BuildStage::Dockerfile => "Dockerfile build",
            BuildStage::From => "working container creation",
            BuildStage::Config => "image configuration",
            BuildStage::Copy => "content copy",
            BuildStage::Commit => "commit",
            BuildStage::Tag => "tagging",
        };
        f.write_str(name)
    }
}

#[derive(Error, Debug)]
pub enum RunError {
    #[error("buildah, and therefore this action, only works on Linux (detected: {0}). Please use a Linux runner.")]
    UnsupportedPlatform(String),

    #[error(transparent)]
    Input(#[from] InputError),

    #[error(transparent)]
    Locate(BuildahError),

    #[error("{stage} failed: {source}")]
    Builder {
        stage: BuildStage,
        #[source]
        source: BuildahError,
    },

    #[error("Failed to resolve the workspace directory: {0}")]
    Workspace(#[source] std::io::Error),

    #[error("Failed to write outputs: {0}")]
    Outputs(#[source] std::io::Error),
}

impl RunError {
    pub(crate) fn at(stage: BuildStage) -> impl FnOnce(BuildahError) -> RunError {
        move |source| RunError::Builder { stage, source }
    }
}

pub type Result<T> = std::result::Result<T, RunError>;
