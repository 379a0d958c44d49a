use buildah_build_core::RawInputs;
use clap::Parser;
use std::path::PathBuf;

/// Options mirror the action inputs. Each one can also be supplied through
/// the `INPUT_<NAME>` environment variable set by the Actions runner.
#[derive(Parser, Debug, Clone, Default)]
#[command(name = "buildah-build")]
#[command(
    about = "Build a container image with buildah, from Dockerfiles or from scratch",
    long_about = None,
    version
)]
pub struct Cli {
    /// Name to give to the output image
    #[arg(long, env = "INPUT_IMAGE", default_value = "")]
    pub image: String,

    /// Space separated tags; the first is used for the build
    #[arg(long, env = "INPUT_TAGS", default_value = "")]
    pub tags: String,

    /// Newline separated Dockerfile paths, relative to the workspace
    #[arg(long, env = "INPUT_DOCKERFILES", default_value = "")]
    pub dockerfiles: String,

    /// Build context directory, relative to the workspace
    #[arg(long, env = "INPUT_CONTEXT", default_value = "")]
    pub context: String,

    /// Newline separated KEY=VALUE build arguments
    #[arg(long, env = "INPUT_BUILD-ARGS", default_value = "", allow_hyphen_values = true)]
    pub build_args: String,

    /// Value passed as --layers= to buildah bud
    #[arg(long, env = "INPUT_LAYERS", default_value = "")]
    pub layers: String,

    /// Extra arguments for buildah bud, split on newlines and spaces (no quoting)
    #[arg(long, env = "INPUT_EXTRA-ARGS", default_value = "", allow_hyphen_values = true)]
    pub extra_args: String,

    /// "true" to produce an OCI image instead of a Docker image
    #[arg(long, env = "INPUT_OCI", default_value = "")]
    pub oci: String,

    /// Base image for a build from scratch
    #[arg(long, env = "INPUT_BASE-IMAGE", default_value = "")]
    pub base_image: String,

    /// Newline separated paths to copy into the image
    #[arg(long, env = "INPUT_CONTENT", default_value = "")]
    pub content: String,

    /// Newline separated entrypoint arguments
    #[arg(long, env = "INPUT_ENTRYPOINT", default_value = "", allow_hyphen_values = true)]
    pub entrypoint: String,

    /// Port to expose
    #[arg(long, env = "INPUT_PORT", default_value = "")]
    pub port: String,

    /// Working directory of the image
    #[arg(long, env = "INPUT_WORKDIR", default_value = "")]
    pub workdir: String,

    /// Newline separated KEY=VALUE environment variables
    #[arg(long, env = "INPUT_ENVS", default_value = "")]
    pub envs: String,

    /// Target architecture
    #[arg(long, env = "INPUT_ARCH", default_value = "")]
    pub arch: String,

    /// Target architecture (deprecated, "arch" takes precedence)
    #[arg(long, env = "INPUT_ARCHS", default_value = "")]
    pub archs: String,

    /// Directory paths are resolved against (defaults to the current directory)
    #[arg(long, env = "GITHUB_WORKSPACE")]
    pub workspace: Option<PathBuf>,

    /// File the outputs are appended to (defaults to stdout)
    #[arg(long, env = "GITHUB_OUTPUT")]
    pub output_file: Option<PathBuf>,
}

impl Cli {
    pub fn raw_inputs(&self) -> RawInputs {
        RawInputs {
            image: self.image.clone(),
            tags: self.tags.clone(),
            dockerfiles: self.dockerfiles.clone(),
            context: self.context.clone(),
            build_args: self.build_args.clone(),
            layers: self.layers.clone(),
            extra_args: self.extra_args.clone(),
            oci: self.oci.clone(),
            base_image: self.base_image.clone(),
            content: self.content.clone(),
            entrypoint: self.entrypoint.clone(),
            port: self.port.clone(),
            workdir: self.workdir.clone(),
            envs: self.envs.clone(),
            arch: self.arch.clone(),
            archs: self.archs.clone(),
        }
    }

    /// Workspace directory, falling back to the current directory.
    pub fn workspace_dir(&self) -> std::io::Result<PathBuf> {
        match &self.workspace {
            Some(dir) if !dir.as_os_str().is_empty() => Ok(dir.clone()),
            _ => std::env::current_dir(),
        }
    }
}
