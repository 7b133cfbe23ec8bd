//! Configurator Core - turns a library template tree into a finished project
//!
//! A run collects a handful of values from the operator (or from the
//! environment and tool settings), chooses one template variant, and then
//! rewrites the template tree in place: token substitution, cleanup of
//! template-only assets, renames, and folding of variant-specific fragments.
//!
//! # Architecture
//!
//! The library is organized into layers:
//!
//! - **Layer 1: Values and Prompts** - `ValueProvider` source chains and the line-based `Prompter`
//! - **Layer 2: Session and Variants** - `ConfigurationSession` owns the run, `VariantSelector` maps choices to declarations
//! - **Layer 3: Materialization** - `TemplateMaterializer` applies a `MaterializePlan` in a fixed order
//! - **Layer 4: CLI/TUI Interface** - Optional cliclack-framed `run` (feature-gated)
//!
//! # Feature Flags
//!
//! - `tui` (default): Enables the cliclack-based run module
//!
//! # Example Usage (without TUI)
//!
//! ```ignore
//! use configurator_core::{ConfigurationSession, Prompter, SystemAmbient, TemplateLayout, TemplateMaterializer};
//!
//! let mut prompter = Prompter::stdio();
//! let mut session = ConfigurationSession::new("MyLib", SystemAmbient);
//! session.confirm_all(&mut prompter)?;
//! session.choose_variant(&mut prompter)?;
//!
//! let tokens = session.tokens(chrono::Local::now().date_naive());
//! let layout = TemplateLayout::load(&root).await?;
//! TemplateMaterializer::new(&root, layout).materialize(&session.plan(&tokens)?).await?;
//! ```

pub mod actions;
pub mod error;
pub mod materialize;
pub mod product;
pub mod prompter;
pub mod session;
pub mod values;
pub mod variant;

#[cfg(feature = "tui")]
pub mod tui;

// Re-export main types for convenience
pub use actions::{ActionOutcome, ExternalTool, ProjectActions};
pub use error::{ConfigureError, Result};
pub use materialize::{
    MaterializePlan, MaterializeReport, TemplateLayout, TemplateMaterializer, TokenSet,
};
pub use product::ProductConfig;
pub use prompter::Prompter;
pub use session::ConfigurationSession;
pub use values::{AmbientSource, OrganizationSettings, SystemAmbient, ValueKey, ValueProvider};
pub use variant::{Language, Platform, SideEffectSet, Variant, VariantSelector};

#[cfg(feature = "tui")]
pub use tui::run;
