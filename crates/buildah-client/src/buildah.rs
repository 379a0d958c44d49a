//! buildah client
//!
//! One method per buildah subcommand used by the build. Every invocation
//! receives the storage environment the client was configured with.

use crate::command::BuildahCommand;
use crate::error::{BuildahError, Result};
use crate::runner::{CommandOutput, CommandRunner, ProcessRunner};
use crate::storage::StorageEnvironment;
use buildah_build_core::ImageFormat;
use std::fmt;
use std::path::{Path, PathBuf};

/// Working container id printed by `buildah from`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerHandle(String);

impl ContainerHandle {
    /// Take the first line of `buildah from` output as the id.
    pub fn from_output(stdout: &str) -> Result<Self> {
        let id = stdout.lines().next().map(str::trim).unwrap_or_default();
        if id.is_empty() {
            return Err(BuildahError::EmptyContainerId);
        }
        Ok(Self(id.to_string()))
    }

    pub fn id(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContainerHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Image configuration applied by `buildah config`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigSettings {
    pub entrypoint: Vec<String>,
    pub port: Option<String>,
    pub workdir: Option<String>,
    pub envs: Vec<String>,
    pub arch: Option<String>,
}

/// buildah CLI wrapper
pub struct Buildah<R = ProcessRunner> {
    path: PathBuf,
    runner: R,
    storage: StorageEnvironment,
}

impl<R: CommandRunner> Buildah<R> {
    pub fn new(path: impl Into<PathBuf>, runner: R) -> Self {
        Self {
            path: path.into(),
            runner,
            storage: StorageEnvironment::default(),
        }
    }

    /// Find `buildah` on `PATH`.
    pub fn locate(runner: R) -> Result<Self> {
        let path = which::which("buildah").map_err(|_| BuildahError::NotFound)?;
        tracing::debug!("Using buildah at {}", path.display());
        Ok(Self::new(path, runner))
    }

    /// Attach the storage overrides used by every later invocation.
    pub fn with_storage(mut self, storage: StorageEnvironment) -> Self {
        self.storage = storage;
        self
    }

    /// Run a command and fail on a non-zero exit.
    pub async fn execute(&self, cmd: &BuildahCommand) -> Result<CommandOutput> {
        tracing::debug!("Running: {}", cmd.to_command_string());

        let output = self
            .runner
            .run(&self.path, cmd.as_args(), self.storage.vars())
            .await
            .map_err(|source| BuildahError::Spawn {
                program: self.path.display().to_string(),
                source,
            })?;

        if !output.success() {
            return Err(BuildahError::CommandFailed {
                command: cmd.subcommand().to_string(),
                exit_code: output.exit_code,
                stderr: output.stderr.trim().to_string(),
            });
        }

        if !output.stderr.trim().is_empty() {
            tracing::debug!("buildah {} stderr: {}", cmd.subcommand(), output.stderr.trim());
        }

        Ok(output)
    }

    /// Print `buildah version`; a broken installation fails here.
    pub async fn version(&self) -> Result<CommandOutput> {
        let output = self.execute(&BuildahCommand::version()).await?;
        for line in output.stdout.lines() {
            tracing::info!("{}", line);
        }
        Ok(output)
    }

    /// Build `image` from one or more Dockerfiles.
    #[allow(clippy::too_many_arguments)]
    pub async fn build_using_dockerfiles(
        &self,
        image: &str,
        context_dir: &Path,
        dockerfiles: &[PathBuf],
        build_args: &[String],
        format: ImageFormat,
        arch: Option<&str>,
        layers: Option<&str>,
        extra_args: &[String],
    ) -> Result<CommandOutput> {
        let cmd = BuildahCommand::bud(
            image,
            context_dir,
            dockerfiles,
            build_args,
            format,
            arch,
            layers,
            extra_args,
        );
        self.execute(&cmd).await
    }

    /// Create a working container from `base_image`.
    pub async fn from(&self, base_image: &str) -> Result<ContainerHandle> {
        let output = self.execute(&BuildahCommand::from_image(base_image)).await?;
        ContainerHandle::from_output(&output.stdout)
    }

    pub async fn config(
        &self,
        container: &ContainerHandle,
        settings: &ConfigSettings,
    ) -> Result<CommandOutput> {
        let entrypoint = if settings.entrypoint.is_empty() {
            None
        } else {
            Some(serde_json::to_string(&settings.entrypoint)?)
        };

        let cmd = BuildahCommand::config(
            container.id(),
            entrypoint.as_deref(),
            settings.port.as_deref(),
            settings.workdir.as_deref(),
            &settings.envs,
            settings.arch.as_deref(),
        );
        self.execute(&cmd).await
    }

    /// Copy every path into the container, in order. Nothing is run for an
    /// empty list.
    pub async fn copy(&self, container: &ContainerHandle, paths: &[String]) -> Result<()> {
        for path in paths {
            self.execute(&BuildahCommand::copy(container.id(), path)).await?;
        }
        Ok(())
    }

    pub async fn commit(
        &self,
        container: &ContainerHandle,
        image: &str,
        format: ImageFormat,
    ) -> Result<CommandOutput> {
        self.execute(&BuildahCommand::commit(container.id(), image, format))
            .await
    }

    /// Give `image:tags[0]` every following tag.
    pub async fn tag(&self, image: &str, tags: &[String]) -> Result<CommandOutput> {
        self.execute(&BuildahCommand::tag(image, tags)).await
    }
}
