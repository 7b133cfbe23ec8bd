//! Charm-style framing around a configuration run

use crate::actions::{ActionOutcome, ProjectActions};
use crate::materialize::{MaterializeReport, TemplateLayout, TemplateMaterializer};
use crate::product::ProductConfig;
use crate::prompter::Prompter;
use crate::session::ConfigurationSession;
use crate::values::SystemAmbient;
use crate::variant::Variant;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// CLI arguments for a configuration run
#[derive(Debug, Clone, Default)]
pub struct ConfigureArgs {
    /// Project name; asked interactively when missing
    pub project_name: Option<String>,

    /// Template root to configure instead of the default location
    pub template_dir: Option<PathBuf>,
}

/// Run the configurator: questions, materialization, then external actions
pub async fn run<C: ProductConfig>(config: &C, args: ConfigureArgs) -> Result<()> {
    cliclack::intro(config.display_name())?;
    cliclack::log::info(config.welcome_message())?;

    // Step 1: Locate the template tree and its layout
    let root = template_root(config, &args)?;
    let layout = TemplateLayout::load(&root)
        .await
        .with_context(|| format!("Failed to load template layout from {}", root.display()))?;

    // Step 2: Project name
    let mut prompter = Prompter::stdio();
    let project_name = match args.project_name.as_deref().map(str::trim) {
        Some(name) if !name.is_empty() => name.to_string(),
        _ => prompter.ask_free_text(config.project_name_question())?,
    };

    // Step 3: Confirm values and choose the variant
    cliclack::log::step("Confirm the template values")?;
    let mut session = ConfigurationSession::new(project_name, SystemAmbient);
    session.confirm_all(&mut prompter)?;
    println!();
    for key in session.changed_values() {
        cliclack::log::info(format!("Using your value for `{}`: {}", key, session.value(key)))?;
    }

    cliclack::log::step("Choose the template variant")?;
    let variant = session.choose_variant(&mut prompter)?;
    println!();
    cliclack::log::success(format!(
        "Configuring {} for {}",
        session.project_name(),
        variant
    ))?;

    // Step 4: Materialize the project tree
    let tokens = session.tokens(chrono::Local::now().date_naive());
    let plan = session.plan(&tokens)?;
    let report = materialize(&root, layout, &plan).await?;
    log_report(&report)?;

    // Step 5: External actions
    run_external_actions(&root, session.project_name()).await?;

    // Step 6: Show next steps
    print_next_steps(config, &root, session.project_name(), variant)?;

    Ok(())
}

fn template_root<C: ProductConfig>(config: &C, args: &ConfigureArgs) -> Result<PathBuf> {
    let root = match &args.template_dir {
        Some(path) => {
            cliclack::log::info(format!("Using templates from {}", path.display()))?;
            path.clone()
        }
        None => match std::env::var(config.template_dir_env()) {
            Ok(path) if !path.trim().is_empty() => PathBuf::from(path.trim()),
            _ => std::env::current_dir().context("Failed to read the current directory")?,
        },
    };

    if !root.is_dir() {
        anyhow::bail!("Template directory not found: {}", root.display());
    }

    Ok(root)
}

async fn materialize(
    root: &Path,
    layout: TemplateLayout,
    plan: &crate::materialize::MaterializePlan<'_>,
) -> Result<MaterializeReport> {
    let spinner = cliclack::spinner();
    spinner.start("Configuring template...");

    match TemplateMaterializer::new(root, layout).materialize(plan).await {
        Ok(report) => {
            spinner.stop(format!("Project files written to {}", root.display()));
            Ok(report)
        }
        Err(e) => {
            spinner.stop("Configuration failed");
            Err(e).context("The template tree was left partially configured")
        }
    }
}

fn log_report(report: &MaterializeReport) -> Result<()> {
    cliclack::log::info(format!(
        "Copied {} variant files, filled {} files, removed {} template assets, renamed {} paths",
        report.activated, report.substituted, report.removed, report.renamed
    ))?;

    if report.dependencies > 0 {
        cliclack::log::info(format!("Added {} dependencies", report.dependencies))?;
    }
    if report.prefix_folded {
        cliclack::log::info("Customised the prefix header")?;
    }

    Ok(())
}

async fn run_external_actions(root: &Path, project_name: &str) -> Result<()> {
    let actions = ProjectActions::new(root, project_name);

    cliclack::log::info("Re-initializing the git repository")?;
    log_outcome(actions.reinitialize_git().await?)?;

    cliclack::log::info("Running carthage update on your new library")?;
    log_outcome(actions.carthage_update().await)?;

    cliclack::log::info("Running pod install on your example")?;
    log_outcome(actions.pod_install().await)?;

    Ok(())
}

fn log_outcome(outcome: ActionOutcome) -> Result<()> {
    match outcome {
        ActionOutcome::Completed => {}
        ActionOutcome::ToolMissing(tool) => {
            cliclack::log::warning(format!(
                "{} is not installed, skipping. Refer to the docs for installation instructions: ({})",
                tool.display_name, tool.docs_url
            ))?;
        }
    }
    Ok(())
}

fn print_next_steps<C: ProductConfig>(
    config: &C,
    root: &Path,
    project_name: &str,
    variant: Variant,
) -> Result<()> {
    let steps = config.next_steps(root, project_name, variant);

    println!();
    println!("  Next steps");
    println!();

    for (i, step) in steps.iter().enumerate() {
        println!("  {}.  {}", i + 1, step);
    }

    cliclack::outro("Happy coding!")?;

    Ok(())
}
