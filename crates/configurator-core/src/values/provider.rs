//! Value resolution with override, ambient and placeholder precedence

use super::ambient::{AmbientSource, OrganizationSettings};
use std::cell::{OnceCell, RefCell};
use std::collections::HashMap;
use std::fmt;

/// Overridable configuration values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKey {
    UserName,
    UserEmail,
    AccountName,
    OrganizationName,
    IdentifierPrefix,
}

impl ValueKey {
    /// Order in which values are confirmed with the operator
    pub const ALL: [ValueKey; 5] = [
        ValueKey::UserName,
        ValueKey::UserEmail,
        ValueKey::AccountName,
        ValueKey::OrganizationName,
        ValueKey::IdentifierPrefix,
    ];

    /// Label shown when asking whether to change the value
    pub fn label(&self) -> &'static str {
        match self {
            ValueKey::UserName => "${USER_NAME}",
            ValueKey::UserEmail => "${USER_EMAIL}",
            ValueKey::AccountName => "${GITHUB_ACCOUNT_NAME}",
            ValueKey::OrganizationName => "Organization Name",
            ValueKey::IdentifierPrefix => "Bundle Identifier Prefix",
        }
    }
}

impl fmt::Display for ValueKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

pub const USER_NAME_PLACEHOLDER: &str = "<GITHUB_USERNAME>";
pub const USER_EMAIL_PLACEHOLDER: &str = "<USER_EMAIL>";
pub const ACCOUNT_NAME_PLACEHOLDER: &str = "<GITHUB_ACCOUNT_NAME>";
pub const IDENTIFIER_PREFIX_ROOT: &str = "io.github.";

/// Trim a candidate and drop it when nothing is left
fn filled(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Resolves configuration values for one session
///
/// Sources are tried in order: operator override, environment, tool
/// configuration, external queries, then a literal placeholder. External
/// queries run at most once per session; their results are cached even
/// when empty.
pub struct ValueProvider<A: AmbientSource> {
    ambient: A,
    overrides: HashMap<ValueKey, String>,
    git_config: RefCell<HashMap<&'static str, Option<String>>>,
    account: OnceCell<Option<String>>,
    organization: OnceCell<OrganizationSettings>,
}

impl<A: AmbientSource> ValueProvider<A> {
    pub fn new(ambient: A) -> Self {
        Self {
            ambient,
            overrides: HashMap::new(),
            git_config: RefCell::new(HashMap::new()),
            account: OnceCell::new(),
            organization: OnceCell::new(),
        }
    }

    /// Record an operator override
    ///
    /// A value can be overridden once; later calls for the same key are
    /// ignored and return false. Blank overrides count as unset.
    pub fn set_override(&mut self, key: ValueKey, value: impl Into<String>) -> bool {
        let Some(value) = filled(Some(value.into())) else {
            return false;
        };
        if self.overrides.contains_key(&key) {
            return false;
        }
        self.overrides.insert(key, value);
        true
    }

    /// Whether the operator replaced the default for `key`
    pub fn is_overridden(&self, key: ValueKey) -> bool {
        self.overrides.contains_key(&key)
    }

    /// Resolve a value; never fails and never returns untrimmed text
    pub fn resolve(&self, key: ValueKey) -> String {
        if let Some(value) = filled(self.overrides.get(&key).cloned()) {
            return value;
        }

        match key {
            ValueKey::UserName => filled(self.ambient.env("GIT_COMMITTER_NAME"))
                .or_else(|| self.git_config("user.name"))
                .or_else(|| self.account_name())
                .unwrap_or_else(|| USER_NAME_PLACEHOLDER.to_string()),
            ValueKey::UserEmail => filled(self.ambient.env("GIT_COMMITTER_EMAIL"))
                .or_else(|| self.git_config("user.email"))
                .unwrap_or_else(|| USER_EMAIL_PLACEHOLDER.to_string()),
            ValueKey::AccountName => filled(self.ambient.env("GITHUB_ACCOUNT_NAME"))
                .or_else(|| self.account_name())
                .unwrap_or_else(|| ACCOUNT_NAME_PLACEHOLDER.to_string()),
            ValueKey::OrganizationName => {
                filled(self.organization_settings().organization_name.clone())
                    .unwrap_or_else(|| self.resolve(ValueKey::UserName))
            }
            ValueKey::IdentifierPrefix => {
                filled(self.organization_settings().bundle_identifier_prefix.clone())
                    .unwrap_or_else(|| {
                        format!(
                            "{}{}",
                            IDENTIFIER_PREFIX_ROOT,
                            self.resolve(ValueKey::AccountName)
                        )
                    })
            }
        }
    }

    fn git_config(&self, key: &'static str) -> Option<String> {
        if let Some(cached) = self.git_config.borrow().get(key) {
            return cached.clone();
        }
        let value = filled(self.ambient.git_config(key));
        self.git_config.borrow_mut().insert(key, value.clone());
        value
    }

    fn account_name(&self) -> Option<String> {
        self.account
            .get_or_init(|| filled(self.ambient.query_account_name()))
            .clone()
    }

    fn organization_settings(&self) -> &OrganizationSettings {
        self.organization
            .get_or_init(|| self.ambient.query_organization_settings())
    }
}
