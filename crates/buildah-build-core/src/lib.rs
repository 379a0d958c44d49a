//! buildah-build core
//!
//! Typed model of one image build plus the normalization stage that turns
//! raw, string-valued options into it.
//!
//! - [`input`]: list/token splitting, tag and architecture resolution
//! - [`model`]: [`BuildRequest`], [`BuildMode`] and [`BuildResult`]
//! - [`request`]: assembling a validated request from [`RawInputs`]

pub mod error;
pub mod input;
pub mod model;
pub mod request;

pub use error::{InputError, Result};
pub use model::{BuildMode, BuildRequest, BuildResult, DockerfileBuild, ImageFormat, ScratchBuild};
pub use request::RawInputs;
