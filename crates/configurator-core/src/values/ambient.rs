//! Ambient lookups: environment, git config, credential store, IDE settings

use std::process::Command;

/// Organization values stored in the IDE's project template settings
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrganizationSettings {
    pub organization_name: Option<String>,
    pub bundle_identifier_prefix: Option<String>,
}

/// Sources of already-configured values on the current machine
///
/// Every method may come back empty; the provider falls through to the
/// next source in that case.
pub trait AmbientSource {
    /// Read an environment variable
    fn env(&self, key: &str) -> Option<String>;

    /// Read a `git config` key such as `user.name`
    fn git_config(&self, key: &str) -> Option<String>;

    /// Account name stored for github.com in the credential store
    fn query_account_name(&self) -> Option<String>;

    /// Organization name and identifier prefix from IDE settings
    fn query_organization_settings(&self) -> OrganizationSettings;
}

/// Ambient source backed by the real environment and OS tools
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemAmbient;

impl SystemAmbient {
    /// Run a command and return its stdout when it exits successfully
    fn capture(program: &str, args: &[&str]) -> Option<String> {
        Command::new(program)
            .args(args)
            .output()
            .ok()
            .and_then(|output| {
                if output.status.success() {
                    String::from_utf8(output.stdout).ok()
                } else {
                    None
                }
            })
    }
}

impl AmbientSource for SystemAmbient {
    fn env(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }

    fn git_config(&self, key: &str) -> Option<String> {
        Self::capture("git", &["config", key]).map(|s| s.trim().to_string())
    }

    fn query_account_name(&self) -> Option<String> {
        Self::capture("security", &["find-internet-password", "-s", "github.com"])
            .and_then(|out| parse_keychain_account(&out))
    }

    fn query_organization_settings(&self) -> OrganizationSettings {
        Self::capture("defaults", &["read", "-app", "Xcode", "IDETemplateOptions"])
            .map(|out| parse_template_options(&out))
            .unwrap_or_default()
    }
}

/// Extract the account attribute from `security find-internet-password` output
///
/// An account that looks like an email address is not a usable account name.
pub fn parse_keychain_account(output: &str) -> Option<String> {
    output
        .lines()
        .map(str::trim)
        .find_map(|line| line.strip_prefix("\"acct\"<blob>="))
        .map(|value| value.trim().trim_matches('"').trim().to_string())
        .filter(|account| !account.is_empty() && !account.contains('@'))
}

/// Parse the `key = value;` dictionary printed by `defaults read`
pub fn parse_template_options(output: &str) -> OrganizationSettings {
    let mut settings = OrganizationSettings::default();

    for line in output.lines() {
        let Some((key, value)) = line.split_once('=') else {
            continue;
        };
        let value = value
            .trim()
            .trim_end_matches(';')
            .trim()
            .trim_matches('"')
            .trim()
            .to_string();
        if value.is_empty() {
            continue;
        }

        match key.trim().trim_matches('"') {
            "organizationName" => settings.organization_name = Some(value),
            "bundleIdentifierPrefix" => settings.bundle_identifier_prefix = Some(value),
            _ => {}
        }
    }

    settings
}
