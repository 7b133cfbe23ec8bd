//! Fixed file lists describing the template tree

use crate::error::{ConfigureError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tokio::fs;

/// Optional override file, relative to the template root
pub const LAYOUT_FILE: &str = "setup/configure.yaml";

/// A move from a placeholder-named path to its final name
///
/// Both sides may contain tokens such as `${POD_NAME}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rename {
    pub from: String,
    pub to: String,
}

impl Rename {
    fn new(from: &str, to: &str) -> Self {
        Self {
            from: from.to_string(),
            to: to.to_string(),
        }
    }
}

/// Where the materializer finds and puts things
///
/// All paths are relative to the template root. The defaults describe the
/// standard library template; `setup/configure.yaml` may replace any field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TemplateLayout {
    /// Files whose tokens are substituted
    pub substitute: Vec<String>,

    /// Template-only paths removed recursively
    pub cleanup: Vec<String>,

    /// File names removed wherever they appear in the tree
    pub cleanup_file_names: Vec<String>,

    /// Moves applied after cleanup, in order
    pub renames: Vec<Rename>,

    pub dependency_manifest: String,
    pub dependency_placeholder: String,

    /// Prefix header; skipped when the active variant has none
    pub prefix_header: String,
    pub prefix_placeholder: String,

    /// Test stub path without its extension
    pub test_stub: String,
    pub test_placeholder: String,

    /// Directory of test example snippets
    pub fragment_dir: String,

    /// Directory holding one sub-tree per variant
    pub variant_root: String,

    /// Path fragment replaced by the project name when a variant is copied
    pub project_path_marker: String,
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

impl Default for TemplateLayout {
    fn default() -> Self {
        Self {
            substitute: strings(&[
                "POD_LICENSE",
                "POD_README.md",
                "NAME.podspec",
                ".travis.yml",
                "Example/Podfile",
            ]),
            cleanup: strings(&[
                "configure",
                "_CONFIGURE.rb",
                "README.md",
                "LICENSE",
                "templates",
                "setup",
                "CODE_OF_CONDUCT.md",
            ]),
            cleanup_file_names: strings(&[".gitkeep"]),
            renames: vec![
                Rename::new("POD_README.md", "README.md"),
                Rename::new("POD_LICENSE", "LICENSE"),
                Rename::new("NAME.podspec", "${POD_NAME}.podspec"),
                Rename::new("Pod", "${POD_NAME}"),
            ],
            dependency_manifest: "Cartfile.private".to_string(),
            dependency_placeholder: "${INCLUDED_LIBS}".to_string(),
            prefix_header: "${POD_NAME}Tests/Prefix.pch".to_string(),
            prefix_placeholder: "${INCLUDED_PREFIXES}".to_string(),
            test_stub: "${POD_NAME}Tests/Tests".to_string(),
            test_placeholder: "${TEST_EXAMPLE}".to_string(),
            fragment_dir: "setup/test_examples".to_string(),
            variant_root: "templates".to_string(),
            project_path_marker: "PROJECT".to_string(),
        }
    }
}

impl TemplateLayout {
    /// Load the layout for a template root, falling back to the defaults
    pub async fn load(root: &Path) -> Result<Self> {
        let path = root.join(LAYOUT_FILE);
        let content = match fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => return Err(ConfigureError::read(&path, e)),
        };
        Self::parse(&content).map_err(|source| ConfigureError::Layout { path, source })
    }

    pub fn parse(content: &str) -> std::result::Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(content)
    }
}
