//! Publishing the build result
//!
//! Outputs are `name=value` lines. Under the Actions runner they are
//! appended to the file named by `GITHUB_OUTPUT`; otherwise they go to
//! stdout.

use buildah_build_core::BuildResult;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

pub const OUTPUT_IMAGE: &str = "image";
pub const OUTPUT_TAGS: &str = "tags";
pub const OUTPUT_IMAGE_WITH_TAG: &str = "image-with-tag";

pub fn format_outputs(result: &BuildResult) -> String {
    format!(
        "{}={}\n{}={}\n{}={}\n",
        OUTPUT_IMAGE,
        result.image,
        OUTPUT_TAGS,
        result.tags.join(" "),
        OUTPUT_IMAGE_WITH_TAG,
        result.image_with_tag(),
    )
}

pub fn publish(result: &BuildResult, output_file: Option<&Path>) -> std::io::Result<()> {
    let outputs = format_outputs(result);

    match output_file {
        Some(path) => {
            let mut file = OpenOptions::new().create(true).append(true).open(path)?;
            file.write_all(outputs.as_bytes())?;
            tracing::debug!("Outputs written to {}", path.display());
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(outputs.as_bytes())?;
            stdout.flush()?;
        }
    }

    Ok(())
}
