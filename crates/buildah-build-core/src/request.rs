//! Raw option values and their conversion into a [`BuildRequest`]

use crate::error::{InputError, Result};
use crate::input::{
    parse_bool, parse_extra_args, parse_list, parse_optional, resolve_architecture, resolve_tags,
};
use crate::model::{BuildMode, BuildRequest, DockerfileBuild, ImageFormat, ScratchBuild};
use std::path::Path;

/// Option values exactly as they were supplied, before any normalization.
///
/// Unset options are empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawInputs {
    pub image: String,
    pub tags: String,
    pub dockerfiles: String,
    pub context: String,
    pub build_args: String,
    pub layers: String,
    pub extra_args: String,
    pub oci: String,
    pub base_image: String,
    pub content: String,
    pub entrypoint: String,
    pub port: String,
    pub workdir: String,
    pub envs: String,
    pub arch: String,
    pub archs: String,
}

impl RawInputs {
    /// Validate and normalize into a request.
    ///
    /// Dockerfile paths and the build context are resolved against
    /// `workspace`. The presence of at least one Dockerfile selects
    /// [`BuildMode::Dockerfile`]; otherwise the base image is required.
    pub fn normalize(&self, workspace: &Path) -> Result<BuildRequest> {
        let image = parse_optional(&self.image).ok_or(InputError::MissingInput("image"))?;
        let tags = resolve_tags(&self.tags);
        let format = ImageFormat::from_oci_flag(parse_bool(&self.oci));
        let architecture = parse_optional(&resolve_architecture(&self.arch, &self.archs));

        let dockerfiles = parse_list(&self.dockerfiles);
        let mode = if dockerfiles.is_empty() {
            BuildMode::Scratch(self.scratch_build()?)
        } else {
            BuildMode::Dockerfile(DockerfileBuild {
                context_dir: workspace.join(self.context.trim()),
                dockerfiles: dockerfiles.iter().map(|f| workspace.join(f)).collect(),
                build_args: parse_list(&self.build_args),
                layers: parse_optional(&self.layers),
                extra_args: parse_extra_args(&self.extra_args),
            })
        };

        Ok(BuildRequest {
            image,
            tags,
            format,
            architecture,
            mode,
        })
    }

    fn scratch_build(&self) -> Result<ScratchBuild> {
        let base_image =
            parse_optional(&self.base_image).ok_or(InputError::MissingInput("base-image"))?;

        Ok(ScratchBuild {
            base_image,
            content: parse_list(&self.content),
            entrypoint: parse_list(&self.entrypoint),
            port: parse_optional(&self.port),
            workdir: parse_optional(&self.workdir),
            envs: parse_list(&self.envs),
        })
    }
}
