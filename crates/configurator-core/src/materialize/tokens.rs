//! `${TOKEN}` placeholder substitution

use crate::values::ValueKey;
use chrono::NaiveDate;
use regex::{Captures, Regex};
use std::collections::HashMap;
use std::sync::LazyLock;

static TOKEN_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([A-Za-z0-9_]+)\}").expect("Invalid token regex"));

/// Project name as written in the library template
pub const POD_NAME: &str = "POD_NAME";
/// Alias of `POD_NAME`
pub const PROJECT_NAME: &str = "PROJECT_NAME";
pub const REPO_NAME: &str = "REPO_NAME";
pub const GITHUB_ACCOUNT_NAME: &str = "GITHUB_ACCOUNT_NAME";
pub const USER_NAME: &str = "USER_NAME";
pub const USER_EMAIL: &str = "USER_EMAIL";
pub const ORGANIZATION_NAME: &str = "ORGANIZATION_NAME";
pub const BUNDLE_ID_PREFIX: &str = "BUNDLE_ID_PREFIX";
pub const YEAR: &str = "YEAR";
pub const DATE: &str = "DATE";

/// Repository name derived from a project name (`+` is not allowed in repo names)
pub fn repo_name(project_name: &str) -> String {
    project_name.replace('+', "-")
}

/// Recognized tokens and their replacement values
#[derive(Debug, Clone, Default)]
pub struct TokenSet {
    values: HashMap<&'static str, String>,
}

impl TokenSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a token value
    pub fn with(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.values.insert(name, value.into());
        self
    }

    /// The full token set for a project
    pub fn for_project(
        project_name: &str,
        value: impl Fn(ValueKey) -> String,
        today: NaiveDate,
    ) -> Self {
        Self::new()
            .with(POD_NAME, project_name)
            .with(PROJECT_NAME, project_name)
            .with(REPO_NAME, repo_name(project_name))
            .with(GITHUB_ACCOUNT_NAME, value(ValueKey::AccountName))
            .with(USER_NAME, value(ValueKey::UserName))
            .with(USER_EMAIL, value(ValueKey::UserEmail))
            .with(ORGANIZATION_NAME, value(ValueKey::OrganizationName))
            .with(BUNDLE_ID_PREFIX, value(ValueKey::IdentifierPrefix))
            .with(YEAR, today.format("%Y").to_string())
            .with(DATE, today.format("%Y/%m/%d").to_string())
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    /// Replace every recognized token in one pass
    ///
    /// Unrecognized tokens are left as they are, and inserted values are
    /// never scanned again.
    pub fn substitute(&self, text: &str) -> String {
        TOKEN_PATTERN
            .replace_all(text, |caps: &Captures| match self.values.get(&caps[1]) {
                Some(value) => value.clone(),
                None => caps[0].to_string(),
            })
            .into_owned()
    }
}
