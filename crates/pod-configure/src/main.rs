//! pod-configure - turns the library template into a new project

use anyhow::Result;
use clap::Parser;
use configurator_core::tui::ConfigureArgs;
use configurator_core::{ConfigureError, ProductConfig, Variant};
use std::path::{Path, PathBuf};

/// Library template product configuration
#[derive(Clone)]
pub struct PodTemplateConfig;

impl ProductConfig for PodTemplateConfig {
    fn display_name(&self) -> &'static str {
        "Pod Template"
    }

    fn template_dir_env(&self) -> &'static str {
        "POD_TEMPLATE_DIR"
    }

    fn welcome_message(&self) -> String {
        "Configuring your new library. A few questions first; \
         press return to accept the value shown in brackets."
            .to_string()
    }

    fn next_steps(&self, dir: &Path, project_name: &str, variant: Variant) -> Vec<String> {
        let mut steps = Vec::new();
        let current = std::env::current_dir().ok();

        if current.as_ref() != Some(&dir.to_path_buf()) {
            steps.push(format!("cd {}", dir.display()));
        }

        steps.push(format!("open Example/{}.xcworkspace", project_name));

        match variant {
            Variant::IosObjC => steps.push(format!(
                "Add your classes to {}/Classes and specs to {}Tests",
                project_name, project_name
            )),
            Variant::IosSwift | Variant::MacOs => steps.push(format!(
                "Add your sources to {}/Classes and tests to {}Tests",
                project_name, project_name
            )),
        }

        steps.push(format!("pod lib lint {}.podspec", project_name));
        steps
    }
}

#[derive(Parser, Debug)]
#[command(name = "pod-configure")]
#[command(about = "Configure the library template for a new project")]
#[command(version)]
pub struct Args {
    /// Name of the new project (asked interactively when omitted)
    pub name: Option<String>,

    /// Template root to configure instead of the current directory (for development use)
    #[arg(long = "template-dir")]
    pub template_dir: Option<PathBuf>,
}

impl From<Args> for ConfigureArgs {
    fn from(args: Args) -> Self {
        ConfigureArgs {
            project_name: args.name,
            template_dir: args.template_dir,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Ensure terminal cursor is restored on panic
    let default_panic = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = console::Term::stderr().show_cursor();
        default_panic(info);
    }));

    // Handle Ctrl+C gracefully
    ctrlc::set_handler(move || {
        let _ = console::Term::stderr().show_cursor();
        std::process::exit(130);
    })
    .ok();

    let args = Args::parse();
    let config = PodTemplateConfig;

    let result = configurator_core::run(&config, args.into()).await;

    // Ensure cursor is visible on normal exit
    let _ = console::Term::stderr().show_cursor();

    match result {
        Err(e)
            if e.downcast_ref::<ConfigureError>()
                .is_some_and(ConfigureError::is_aborted) =>
        {
            let _ = print_aborted(config.display_name());
            std::process::exit(130);
        }
        other => other,
    }
}

/// Tell the operator the run stopped before anything was written
fn print_aborted(product: &str) -> std::io::Result<()> {
    use std::io::Write;
    let mut stderr = std::io::stderr();
    writeln!(stderr)?;
    writeln!(stderr, "{} configuration aborted; no files were changed.", product)
}
