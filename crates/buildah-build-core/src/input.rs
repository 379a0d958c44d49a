//! Input normalization
//!
//! Every option arrives as a single raw string. These helpers turn those
//! strings into the ordered lists and scalars the build request is made of.

/// Tag used when no tags are supplied.
pub const DEFAULT_TAG: &str = "latest";

/// Split a newline separated option into trimmed, non-empty entries.
///
/// Both `\n` and `\r\n` line endings are accepted. Running the result back
/// through this function (joined with `\n`) yields the same list.
pub fn parse_list(raw: &str) -> Vec<String> {
    raw.split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .filter(|line| !line.is_empty())
        .map(|line| line.trim())
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Tokenize the extra arguments passed through to `buildah bud`.
///
/// Lines are split on single spaces and every token is trimmed. Quoting is
/// NOT honored: `--label "a b"` becomes the three tokens `--label`, `"a` and
/// `b"`. Arguments containing spaces cannot be expressed.
pub fn parse_extra_args(raw: &str) -> Vec<String> {
    raw.lines()
        .flat_map(|line| line.split(' '))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .collect()
}

/// Pick the target architecture from the `arch` and legacy `archs` options.
///
/// `arch` always wins. When both are set a warning is logged and `archs` is
/// ignored. Returns an empty string when neither is set.
pub fn resolve_architecture(arch: &str, archs: &str) -> String {
    let arch = arch.trim();
    let archs = archs.trim();

    if !arch.is_empty() && !archs.is_empty() {
        tracing::warn!(
            "Please use only one input of \"arch\" and \"archs\". \"arch\" takes precedence, so --arch argument will be \"{}\".",
            arch
        );
    }

    if arch.is_empty() {
        archs.to_string()
    } else {
        arch.to_string()
    }
}

/// Split the space separated `tags` option.
///
/// Falls back to [`DEFAULT_TAG`] when nothing is supplied, so the result is
/// never empty.
pub fn resolve_tags(raw: &str) -> Vec<String> {
    let tags: Vec<String> = raw
        .split(' ')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(str::to_string)
        .collect();

    if tags.is_empty() {
        tracing::info!(
            "Input \"tags\" is not provided, using default tag \"{}\"",
            DEFAULT_TAG
        );
        return vec![DEFAULT_TAG.to_string()];
    }

    tags
}

/// Boolean options are enabled only by the literal `true`.
pub fn parse_bool(raw: &str) -> bool {
    raw.trim() == "true"
}

/// Trimmed value, or `None` when the option is blank.
pub fn parse_optional(raw: &str) -> Option<String> {
    let value = raw.trim();
    (!value.is_empty()).then(|| value.to_string())
}
