//! Template materialization
//!
//! This module provides:
//! - Token substitution (`TokenSet`)
//! - The template layout and its optional override file
//! - Placeholder folding for dependencies, prefix lines and test examples
//! - `TemplateMaterializer`, which applies all steps in a fixed order

pub mod fold;
pub mod layout;
pub mod materializer;
pub mod tokens;

pub use layout::{Rename, TemplateLayout, LAYOUT_FILE};
pub use materializer::{MaterializePlan, MaterializeReport, TemplateMaterializer};
pub use tokens::{repo_name, TokenSet};
