//! Entity names and definition file names

use regex::Regex;
use std::path::Path;
use std::sync::LazyLock;

/// Pattern every workflow, application and pipeline name must match
pub const NAME_PATTERN: &str = r"^[a-zA-Z0-9._-]{1,}$";

static NAME_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(NAME_PATTERN).expect("name pattern is a valid regex"));

/// Whether `name` is accepted by the control plane as an entity name
pub fn is_valid_name(name: &str) -> bool {
    NAME_REGEX.is_match(name)
}

/// `<workflow>.yml`
pub fn workflow_file_name(name: &str) -> String {
    format!("{}.yml", name)
}

/// `<application>.app.yml`
pub fn application_file_name(name: &str) -> String {
    format!("{}.app.yml", name)
}

/// `<pipeline>.pip.yml`
pub fn pipeline_file_name(name: &str) -> String {
    format!("{}.pip.yml", name)
}

/// Whether a path looks like a definition file (`*.yml` or `*.yaml`)
pub fn is_definition_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("yml") || ext.eq_ignore_ascii_case("yaml"))
}
