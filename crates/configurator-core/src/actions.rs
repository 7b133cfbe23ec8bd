//! External commands run once the project tree is materialized
//!
//! Source control re-initialization and the dependency managers are run as
//! child processes. Their exit status is not inspected: a failing command
//! leaves the project as materialized and the run carries on.

use crate::error::{ConfigureError, Result};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::process::Command;

/// A CLI tool the configurator shells out to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalTool {
    /// Name of the tool binary (e.g., "carthage")
    pub name: &'static str,
    /// Display name for user-facing messages
    pub display_name: &'static str,
    /// Installation instructions shown when the tool is missing
    pub docs_url: &'static str,
}

impl ExternalTool {
    pub const GIT: ExternalTool = ExternalTool {
        name: "git",
        display_name: "Git",
        docs_url: "https://git-scm.com/downloads",
    };

    pub const CARTHAGE: ExternalTool = ExternalTool {
        name: "carthage",
        display_name: "Carthage",
        docs_url: "https://github.com/Carthage/Carthage#installing-carthage",
    };

    pub const COCOAPODS: ExternalTool = ExternalTool {
        name: "pod",
        display_name: "CocoaPods",
        docs_url: "https://guides.cocoapods.org/using/getting-started.html",
    };

    /// Check if the tool is installed and available in PATH
    pub fn is_installed(&self) -> bool {
        std::process::Command::new("which")
            .arg(self.name)
            .output()
            .map(|output| output.status.success())
            .unwrap_or(false)
    }

    /// Run the tool to completion, ignoring its exit status
    async fn run(&self, dir: &Path, args: &[&str]) {
        let _ = Command::new(self.name)
            .args(args)
            .current_dir(dir)
            .status()
            .await;
    }
}

/// Result of one external action
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionOutcome {
    /// The commands ran; their exit status was not checked
    Completed,
    /// The tool is not installed, so nothing ran
    ToolMissing(ExternalTool),
}

/// The post-materialization commands for one project
pub struct ProjectActions {
    root: PathBuf,
    project_name: String,
    git: ExternalTool,
    carthage: ExternalTool,
    cocoapods: ExternalTool,
}

impl ProjectActions {
    pub fn new(root: impl Into<PathBuf>, project_name: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            project_name: project_name.into(),
            git: ExternalTool::GIT,
            carthage: ExternalTool::CARTHAGE,
            cocoapods: ExternalTool::COCOAPODS,
        }
    }

    /// Replace the tools used, e.g. to point at wrappers
    pub fn with_tools(
        mut self,
        git: ExternalTool,
        carthage: ExternalTool,
        cocoapods: ExternalTool,
    ) -> Self {
        self.git = git;
        self.carthage = carthage;
        self.cocoapods = cocoapods;
        self
    }

    /// Example project file committed after `pod install`
    pub fn example_project_file(&self) -> String {
        format!(
            "Example/{}Example.xcodeproj/project.pbxproj",
            self.project_name
        )
    }

    /// Drop the template's history and start a fresh repository
    pub async fn reinitialize_git(&self) -> Result<ActionOutcome> {
        let git_dir = self.root.join(".git");
        match fs::remove_dir_all(&git_dir).await {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => return Err(ConfigureError::write(&git_dir, e)),
        }

        if !self.git.is_installed() {
            return Ok(ActionOutcome::ToolMissing(self.git.clone()));
        }
        self.git.run(&self.root, &["init"]).await;
        self.git.run(&self.root, &["add", "-A"]).await;
        Ok(ActionOutcome::Completed)
    }

    pub async fn carthage_update(&self) -> ActionOutcome {
        if !self.carthage.is_installed() {
            return ActionOutcome::ToolMissing(self.carthage.clone());
        }
        self.carthage.run(&self.root, &["update"]).await;
        ActionOutcome::Completed
    }

    /// Install the example's pods, then commit everything
    pub async fn pod_install(&self) -> ActionOutcome {
        if !self.cocoapods.is_installed() {
            return ActionOutcome::ToolMissing(self.cocoapods.clone());
        }
        self.cocoapods
            .run(&self.root.join("Example"), &["install"])
            .await;

        if self.git.is_installed() {
            let project_file = self.example_project_file();
            self.git.run(&self.root, &["add", project_file.as_str()]).await;
            self.git
                .run(&self.root, &["commit", "-m", "Initial commit"])
                .await;
        }
        ActionOutcome::Completed
    }
}
