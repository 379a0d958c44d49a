//! Build orchestration
//!
//! Runs one [`BuildRequest`] through the builder:
//!
//! ```text
//! version -> storage probe -> bud                        -> [tag] -> done
//!                          \-> from -> config -> copy -> commit -/
//! ```
//!
//! Every step awaits the previous one. The first failure stops the run;
//! a half configured working container is left as is.

use crate::error::{BuildStage, Result, RunError};
use buildah_build_core::{BuildMode, BuildRequest, BuildResult, DockerfileBuild, ScratchBuild};
use buildah_client::{Buildah, CommandRunner, ConfigSettings, StorageProbe};

pub struct Orchestrator<R> {
    buildah: Buildah<R>,
    probe: StorageProbe,
}

impl<R: CommandRunner> Orchestrator<R> {
    pub fn new(buildah: Buildah<R>, probe: StorageProbe) -> Self {
        Self { buildah, probe }
    }

    /// Run the build. The storage probe runs exactly once, after the version
    /// check and before any build step.
    pub async fn run(self, request: &BuildRequest) -> Result<BuildResult> {
        self.buildah
            .version()
            .await
            .map_err(RunError::at(BuildStage::Version))?;

        let storage = self.probe.detect();
        let buildah = self.buildah.with_storage(storage);

        let image_ref = request.image_with_tag();
        match &request.mode {
            BuildMode::Dockerfile(build) => {
                build_using_dockerfiles(&buildah, request, build, &image_ref).await?
            }
            BuildMode::Scratch(build) => {
                build_from_scratch(&buildah, request, build, &image_ref).await?
            }
        }

        if request.has_additional_tags() {
            tracing::info!(
                "Tagging {} with {}",
                image_ref,
                request.tags[1..].join(", ")
            );
            buildah
                .tag(&request.image, &request.tags)
                .await
                .map_err(RunError::at(BuildStage::Tag))?;
        }

        tracing::info!("Successfully built: {}", image_ref);
        Ok(BuildResult {
            image: request.image.clone(),
            tags: request.tags.clone(),
        })
    }
}

async fn build_using_dockerfiles<R: CommandRunner>(
    buildah: &Buildah<R>,
    request: &BuildRequest,
    build: &DockerfileBuild,
    image_ref: &str,
) -> Result<()> {
    if build.dockerfiles.len() == 1 {
        tracing::info!("Performing build from Dockerfile");
    } else {
        tracing::info!(
            "Performing build from {} Dockerfiles",
            build.dockerfiles.len()
        );
    }

    buildah
        .build_using_dockerfiles(
            image_ref,
            &build.context_dir,
            &build.dockerfiles,
            &build.build_args,
            request.format,
            request.architecture.as_deref(),
            build.layers.as_deref(),
            &build.extra_args,
        )
        .await
        .map_err(RunError::at(BuildStage::Dockerfile))?;

    Ok(())
}

async fn build_from_scratch<R: CommandRunner>(
    buildah: &Buildah<R>,
    request: &BuildRequest,
    build: &ScratchBuild,
    image_ref: &str,
) -> Result<()> {
    tracing::info!("Performing build from scratch");

    let container = buildah
        .from(&build.base_image)
        .await
        .map_err(RunError::at(BuildStage::From))?;
    tracing::debug!("Working container: {}", container);

    let settings = ConfigSettings {
        entrypoint: build.entrypoint.clone(),
        port: build.port.clone(),
        workdir: build.workdir.clone(),
        envs: build.envs.clone(),
        arch: request.architecture.clone(),
    };
    buildah
        .config(&container, &settings)
        .await
        .map_err(RunError::at(BuildStage::Config))?;

    buildah
        .copy(&container, &build.content)
        .await
        .map_err(RunError::at(BuildStage::Copy))?;

    buildah
        .commit(&container, image_ref, request.format)
        .await
        .map_err(RunError::at(BuildStage::Commit))?;

    Ok(())
}
