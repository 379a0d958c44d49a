//! buildah-build
//!
//! Builds a container image with buildah, either from Dockerfiles
//! (`buildah bud`) or imperatively from a base image
//! (`from`/`config`/`copy`/`commit`), then applies any additional tags.

pub mod cli;
pub mod error;
pub mod orchestrator;
pub mod outputs;
pub mod platform;

pub use cli::Cli;
pub use error::{BuildStage, Result, RunError};
pub use orchestrator::Orchestrator;

use buildah_build_core::BuildResult;
use buildah_client::{Buildah, ProcessRunner, StorageProbe};

/// Run one build as described by the command line and publish its outputs.
pub async fn run(cli: &Cli) -> Result<BuildResult> {
    platform::check_platform(&platform::host_os())?;

    let workspace = cli.workspace_dir().map_err(RunError::Workspace)?;
    let request = cli.raw_inputs().normalize(&workspace)?;
    tracing::debug!("Build request: {:?}", request);

    let buildah = Buildah::locate(ProcessRunner).map_err(RunError::Locate)?;
    let result = Orchestrator::new(buildah, StorageProbe::new())
        .run(&request)
        .await?;

    outputs::publish(&result, cli.output_file.as_deref()).map_err(RunError::Outputs)?;
    Ok(result)
}
