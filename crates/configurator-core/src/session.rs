//! One configuration run: confirmed values, chosen variant, gathered side effects

use crate::error::{ConfigureError, Result};
use crate::materialize::{MaterializePlan, TokenSet};
use crate::prompter::Prompter;
use crate::values::{AmbientSource, ValueKey, ValueProvider};
use crate::variant::{Language, Platform, SideEffectSet, Variant, VariantSelector};
use chrono::NaiveDate;
use std::io::{BufRead, Write};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Fresh,
    Confirmed,
    VariantChosen,
}

/// Owns every value and declaration for a single run
///
/// `confirm_all` runs first, then `choose_variant`, each exactly once.
/// Materialization reads from the session through `tokens` and `plan`.
pub struct ConfigurationSession<A: AmbientSource> {
    project_name: String,
    values: ValueProvider<A>,
    phase: Phase,
    variant: Option<Variant>,
    side_effects: SideEffectSet,
}

impl<A: AmbientSource> ConfigurationSession<A> {
    pub fn new(project_name: impl Into<String>, ambient: A) -> Self {
        Self {
            project_name: project_name.into(),
            values: ValueProvider::new(ambient),
            phase: Phase::Fresh,
            variant: None,
            side_effects: SideEffectSet::default(),
        }
    }

    pub fn project_name(&self) -> &str {
        &self.project_name
    }

    /// Current value for `key`, override first
    pub fn value(&self, key: ValueKey) -> String {
        self.values.resolve(key)
    }

    /// Values the operator replaced, in question order
    pub fn changed_values(&self) -> Vec<ValueKey> {
        ValueKey::ALL
            .into_iter()
            .filter(|key| self.values.is_overridden(*key))
            .collect()
    }

    pub fn variant(&self) -> Option<Variant> {
        self.variant
    }

    pub fn side_effects(&self) -> &SideEffectSet {
        &self.side_effects
    }

    /// Offer every overridable value with its resolved default
    pub fn confirm_all<R: BufRead, W: Write>(
        &mut self,
        prompter: &mut Prompter<R, W>,
    ) -> Result<()> {
        if self.phase != Phase::Fresh {
            return Err(ConfigureError::OutOfOrder(
                "values have already been confirmed",
            ));
        }

        for key in ValueKey::ALL {
            let default = self.values.resolve(key);
            let question = format!("Do you want to change the default value of `{}`?", key);
            if let Some(answer) = prompter.ask_with_default(&question, &default)? {
                self.values.set_override(key, answer);
            }
        }

        self.phase = Phase::Confirmed;
        Ok(())
    }

    /// Ask for the platform, and the language when the platform needs one
    pub fn choose_variant<R: BufRead, W: Write>(
        &mut self,
        prompter: &mut Prompter<R, W>,
    ) -> Result<Variant> {
        match self.phase {
            Phase::Fresh => {
                return Err(ConfigureError::OutOfOrder(
                    "values must be confirmed before choosing a variant",
                ))
            }
            Phase::VariantChosen => {
                return Err(ConfigureError::OutOfOrder("a variant has already been chosen"))
            }
            Phase::Confirmed => {}
        }

        let answer =
            prompter.ask_choice("What platform do you want to use", &Platform::ANSWERS)?;
        let platform = Platform::from_answer(&answer)
            .unwrap_or_else(|| unreachable!("unmapped platform answer `{}`", answer));

        let language = if platform.needs_language() {
            let answer =
                prompter.ask_choice("What language do you want to use", &Language::ANSWERS)?;
            Some(
                Language::from_answer(&answer)
                    .unwrap_or_else(|| unreachable!("unmapped language answer `{}`", answer)),
            )
        } else {
            None
        };

        let variant = Variant::from_choices(platform, language)
            .unwrap_or_else(|| unreachable!("{:?} was chosen without a language", platform));
        self.side_effects
            .record(&VariantSelector::declarations_for(variant));
        self.variant = Some(variant);
        self.phase = Phase::VariantChosen;

        Ok(variant)
    }

    /// Add a dependency on top of the variant's own
    pub fn add_dependency(&mut self, name: impl Into<String>) {
        self.side_effects.add_dependency(name);
    }

    /// Add a prefix header line on top of the variant's own
    pub fn add_prefix_line(&mut self, line: impl Into<String>) {
        self.side_effects.add_prefix_line(line);
    }

    /// Token values as of `today`
    pub fn tokens(&self, today: NaiveDate) -> TokenSet {
        TokenSet::for_project(&self.project_name, |key| self.values.resolve(key), today)
    }

    /// Borrow everything the materializer needs
    pub fn plan<'a>(&'a self, tokens: &'a TokenSet) -> Result<MaterializePlan<'a>> {
        if self.phase != Phase::VariantChosen {
            return Err(ConfigureError::OutOfOrder(
                "a variant must be chosen before materializing",
            ));
        }
        Ok(MaterializePlan {
            project_name: &self.project_name,
            tokens,
            side_effects: &self.side_effects,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::materialize::tokens;
    use crate::values::testing::FixedAmbient;
    use std::io::Cursor;

    fn prompter(input: &str) -> Prompter<Cursor<Vec<u8>>, Vec<u8>> {
        Prompter::new(Cursor::new(input.as_bytes().to_vec()), Vec::new())
    }

    fn ambient() -> FixedAmbient {
        FixedAmbient::default()
            .with_env("GIT_COMMITTER_NAME", "Jane Doe")
            .with_env("GIT_COMMITTER_EMAIL", "jane@example.com")
            .with_env("GITHUB_ACCOUNT_NAME", "janedoe")
    }

    fn confirmed(project: &str) -> ConfigurationSession<FixedAmbient> {
        let mut session = ConfigurationSession::new(project, ambient());
        session.confirm_all(&mut prompter("\n\n\n\n\n")).unwrap();
        session
    }

    #[test]
    fn test_confirm_all_keeps_defaults_on_empty_answers() {
        let session = confirmed("Widget");
        assert_eq!(session.value(ValueKey::UserName), "Jane Doe");
        assert_eq!(session.value(ValueKey::OrganizationName), "Jane Doe");
        assert_eq!(
            session.value(ValueKey::IdentifierPrefix),
            "io.github.janedoe"
        );
        assert!(session.changed_values().is_empty());
    }

    #[test]
    fn test_confirm_all_records_overrides() {
        let mut session = ConfigurationSession::new("Widget", ambient());
        let mut p = prompter("\n\nacme\nAcme Labs\n\n");
        session.confirm_all(&mut p).unwrap();

        assert_eq!(session.value(ValueKey::UserName), "Jane Doe");
        assert_eq!(session.value(ValueKey::AccountName), "acme");
        assert_eq!(session.value(ValueKey::OrganizationName), "Acme Labs");
        // Derived after the account override was recorded
        assert_eq!(session.value(ValueKey::IdentifierPrefix), "io.github.acme");

        assert_eq!(
            session.changed_values(),
            vec![ValueKey::AccountName, ValueKey::OrganizationName]
        );

        let out = String::from_utf8(p.into_output()).unwrap();
        assert_eq!(out.matches("Do you want to change the default value").count(), 5);
    }

    #[test]
    fn test_macos_skips_language_question() {
        let mut session = confirmed("Widget");
        let mut p = prompter("macos\n");
        let variant = session.choose_variant(&mut p).unwrap();

        assert_eq!(variant, Variant::MacOs);
        let out = String::from_utf8(p.into_output()).unwrap();
        assert!(!out.contains("What language"));
        assert_eq!(session.side_effects().test_fragment().unwrap().id, "xctest");
    }

    #[test]
    fn test_ios_always_asks_language() {
        let mut session = confirmed("Widget");
        let mut p = prompter("\nswift\n");
        let variant = session.choose_variant(&mut p).unwrap();

        assert_eq!(variant, Variant::IosSwift);
        let out = String::from_utf8(p.into_output()).unwrap();
        assert!(out.contains("What language do you want to use"));
        assert_eq!(session.side_effects().test_fragment().unwrap().id, "quick");
    }

    #[test]
    fn test_ios_default_language_is_objc() {
        let mut session = confirmed("Widget");
        let variant = session.choose_variant(&mut prompter("ios\n\n")).unwrap();
        assert_eq!(variant, Variant::IosObjC);
        assert_eq!(session.side_effects().prefix_lines().len(), 2);
    }

    #[test]
    fn test_variant_before_confirmation_is_rejected() {
        let mut session = ConfigurationSession::new("Widget", ambient());
        let err = session.choose_variant(&mut prompter("macos\n")).unwrap_err();
        assert!(matches!(err, ConfigureError::OutOfOrder(_)));
    }

    #[test]
    fn test_phases_run_once() {
        let mut session = confirmed("Widget");
        assert!(session.confirm_all(&mut prompter("\n\n\n\n\n")).is_err());

        session.choose_variant(&mut prompter("macos\n")).unwrap();
        let err = session.choose_variant(&mut prompter("ios\nswift\n")).unwrap_err();
        assert!(matches!(err, ConfigureError::OutOfOrder(_)));
        assert_eq!(session.variant(), Some(Variant::MacOs));
    }

    #[test]
    fn test_aborted_input_stops_confirmation() {
        let mut session = ConfigurationSession::new("Widget", ambient());
        let err = session.confirm_all(&mut prompter("\n\n")).unwrap_err();
        assert!(err.is_aborted());
    }

    #[test]
    fn test_plan_and_tokens() {
        let mut session = confirmed("Foo+Bar");
        let today = NaiveDate::from_ymd_opt(2024, 3, 7).unwrap();
        let tokens = session.tokens(today);
        assert!(session.plan(&tokens).is_err());

        session.choose_variant(&mut prompter("ios\nswift\n")).unwrap();
        session.add_dependency("LibA");
        session.add_dependency("LibB");

        let plan = session.plan(&tokens).unwrap();
        assert_eq!(plan.project_name, "Foo+Bar");
        assert_eq!(plan.tokens.get(tokens::REPO_NAME), Some("Foo-Bar"));
        assert_eq!(plan.tokens.get(tokens::YEAR), Some("2024"));
        assert_eq!(
            plan.side_effects.dependencies(),
            &["Quick/Quick", "Quick/Nimble", "LibA", "LibB"]
        );
    }
}
