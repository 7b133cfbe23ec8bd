//! Configuration value resolution
//!
//! This module provides:
//! - `ValueProvider`, which resolves each value from an ordered chain of sources
//! - The `AmbientSource` capability and its OS-backed implementation

pub mod ambient;
pub mod provider;

pub use ambient::{AmbientSource, OrganizationSettings, SystemAmbient};
pub use provider::{ValueKey, ValueProvider};
