//! buildah argument grammar
//!
//! Each constructor produces the full argument vector of one buildah
//! invocation. Values are kept as discrete arguments and never joined into
//! a shell string.

use buildah_build_core::ImageFormat;
use std::path::{Path, PathBuf};

/// One buildah invocation: the subcommand followed by its arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildahCommand {
    args: Vec<String>,
}

impl BuildahCommand {
    fn new(subcommand: &str) -> Self {
        Self {
            args: vec![subcommand.to_string()],
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    fn arg_path(self, path: &Path) -> Self {
        self.arg(path.to_string_lossy().into_owned())
    }

    fn format(self, format: ImageFormat) -> Self {
        self.arg("--format").arg(format.as_str())
    }

    pub fn subcommand(&self) -> &str {
        &self.args[0]
    }

    pub fn as_args(&self) -> &[String] {
        &self.args
    }

    /// Human readable form for logs.
    pub fn to_command_string(&self) -> String {
        format!("buildah {}", self.args.join(" "))
    }

    /// `buildah version`
    pub fn version() -> Self {
        Self::new("version")
    }

    /// `buildah bud`
    ///
    /// Order: format, one `-f` per Dockerfile, one `--build-arg` per entry,
    /// `--arch`, `--layers=`, `--tag`, the extra tokens, and finally the
    /// context directory. Extra tokens follow every generated flag so they
    /// can override them.
    #[allow(clippy::too_many_arguments)]
    pub fn bud(
        image: &str,
        context_dir: &Path,
        dockerfiles: &[PathBuf],
        build_args: &[String],
        format: ImageFormat,
        arch: Option<&str>,
        layers: Option<&str>,
        extra_args: &[String],
    ) -> Self {
        let mut cmd = Self::new("bud").format(format);

        for dockerfile in dockerfiles {
            cmd = cmd.arg("-f").arg_path(dockerfile);
        }

        for build_arg in build_args {
            cmd = cmd.arg("--build-arg").arg(build_arg.as_str());
        }

        if let Some(arch) = arch.filter(|a| !a.is_empty()) {
            cmd = cmd.arg("--arch").arg(arch);
        }

        if let Some(layers) = layers.filter(|l| !l.is_empty()) {
            cmd = cmd.arg(format!("--layers={}", layers));
        }

        cmd.arg("--tag")
            .arg(image)
            .args(extra_args.iter().map(String::as_str))
            .arg_path(context_dir)
    }

    /// `buildah from <base-image>`
    pub fn from_image(base_image: &str) -> Self {
        Self::new("from").arg(base_image)
    }

    /// `buildah config [options] <container>`
    ///
    /// `entrypoint` must already be rendered in JSON exec form.
    pub fn config(
        container: &str,
        entrypoint: Option<&str>,
        port: Option<&str>,
        workdir: Option<&str>,
        envs: &[String],
        arch: Option<&str>,
    ) -> Self {
        let mut cmd = Self::new("config");

        if let Some(entrypoint) = entrypoint {
            cmd = cmd.arg("--entrypoint").arg(entrypoint);
        }
        if let Some(port) = port.filter(|p| !p.is_empty()) {
            cmd = cmd.arg("--port").arg(port);
        }
        if let Some(workdir) = workdir.filter(|w| !w.is_empty()) {
            cmd = cmd.arg("--workingdir").arg(workdir);
        }
        for env in envs {
            cmd = cmd.arg("--env").arg(env.as_str());
        }
        if let Some(arch) = arch.filter(|a| !a.is_empty()) {
            cmd = cmd.arg("--arch").arg(arch);
        }

        cmd.arg(container)
    }

    /// `buildah copy <container> <path>`
    ///
    /// With more sources buildah treats the last one as the destination, so
    /// every path gets its own invocation.
    pub fn copy(container: &str, path: &str) -> Self {
        Self::new("copy").arg(container).arg(path)
    }

    /// `buildah commit --format <fmt> <container> <image>`
    pub fn commit(container: &str, image: &str, format: ImageFormat) -> Self {
        Self::new("commit").format(format).arg(container).arg(image)
    }

    /// `buildah tag <image:tag0> <image:tag1> ...`
    ///
    /// The first reference names the already built image, the others are
    /// the names added to it.
    pub fn tag(image: &str, tags: &[String]) -> Self {
        Self::new("tag").args(tags.iter().map(|tag| format!("{}:{}", image, tag)))
    }
}
