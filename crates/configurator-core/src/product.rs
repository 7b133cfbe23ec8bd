//! Product configuration trait for configurator binaries
//!
//! This trait defines what a binary supplies to the shared configuration
//! flow: its identity, where templates are found, and the messages shown
//! around a run.

use crate::variant::Variant;
use std::path::Path;

/// Configuration trait for configurator products
pub trait ProductConfig: Clone + Send + Sync + 'static {
    /// Human-readable display name
    fn display_name(&self) -> &'static str;

    /// Environment variable naming the template root
    fn template_dir_env(&self) -> &'static str;

    /// Shown once before the first question
    fn welcome_message(&self) -> String;

    /// Question asked when no project name was given on the command line
    fn project_name_question(&self) -> &'static str {
        "What is your project name"
    }

    /// Generate the "next steps" instructions after configuration
    fn next_steps(&self, dir: &Path, project_name: &str, variant: Variant) -> Vec<String>;
}
