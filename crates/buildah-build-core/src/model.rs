//! Build request and result types

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Image manifest format written by `bud` and `commit`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    #[default]
    Docker,
    Oci,
}

impl ImageFormat {
    pub fn from_oci_flag(use_oci: bool) -> Self {
        if use_oci { Self::Oci } else { Self::Docker }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Docker => "docker",
            Self::Oci => "oci",
        }
    }
}

impl fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Build from one or more Dockerfiles with `buildah bud`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DockerfileBuild {
    pub context_dir: PathBuf,
    /// Absolute paths, never empty.
    pub dockerfiles: Vec<PathBuf>,
    /// `KEY=VALUE` entries.
    pub build_args: Vec<String>,
    /// Value for `--layers=`, passed through untouched.
    pub layers: Option<String>,
    /// Raw tokens appended after every generated flag.
    pub extra_args: Vec<String>,
}

/// Assemble an image from a base image with `from`/`config`/`copy`/`commit`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScratchBuild {
    pub base_image: String,
    pub content: Vec<String>,
    /// Exec form, one argv entry per element.
    pub entrypoint: Vec<String>,
    pub port: Option<String>,
    pub workdir: Option<String>,
    /// `KEY=VALUE` entries.
    pub envs: Vec<String>,
}

/// The two mutually exclusive ways of producing the image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildMode {
    Dockerfile(DockerfileBuild),
    Scratch(ScratchBuild),
}

/// A validated, normalized description of one build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildRequest {
    pub image: String,
    /// Never empty; the first entry is the primary tag.
    pub tags: Vec<String>,
    pub format: ImageFormat,
    pub architecture: Option<String>,
    pub mode: BuildMode,
}

impl BuildRequest {
    pub fn primary_tag(&self) -> &str {
        self.tags.first().map(String::as_str).unwrap_or(crate::input::DEFAULT_TAG)
    }

    /// `image:primaryTag`, the reference the build or commit writes to.
    pub fn image_with_tag(&self) -> String {
        format!("{}:{}", self.image, self.primary_tag())
    }

    /// Whether a secondary tagging step is needed after the build.
    pub fn has_additional_tags(&self) -> bool {
        self.tags.len() > 1
    }
}

/// What a successful run publishes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildResult {
    pub image: String,
    pub tags: Vec<String>,
}

impl BuildResult {
    pub fn image_with_tag(&self) -> String {
        match self.tags.first() {
            Some(tag) => format!("{}:{}", self.image, tag),
            None => self.image.clone(),
        }
    }
}
