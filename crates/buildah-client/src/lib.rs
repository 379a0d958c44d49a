//! buildah CLI wrapper
//!
//! Runs `buildah` subcommands as discrete argument vectors and reports
//! their captured output.
//!
//! # Requirements
//!
//! - `buildah` must be installed and on the search path (Linux only)
//! - `fuse-overlayfs` is optional; when found it is used as the overlay
//!   mount program
//!
//! # Example
//!
//! ```ignore
//! use buildah_client::{Buildah, ProcessRunner, StorageProbe};
//!
//! let buildah = Buildah::locate(ProcessRunner)?
//!     .with_storage(StorageProbe::new().detect());
//!
//! buildah.version().await?;
//! let container = buildah.from("registry.fedoraproject.org/fedora-minimal").await?;
//! ```

pub mod buildah;
pub mod command;
pub mod error;
pub mod runner;
pub mod storage;

pub use buildah::{Buildah, ConfigSettings, ContainerHandle};
pub use command::BuildahCommand;
pub use error::{BuildahError, Result};
pub use runner::{CommandOutput, CommandRunner, ProcessRunner};
pub use storage::{StorageEnvironment, StorageProbe};
