//! Turning the template tree into the finished project tree

use super::fold::{fold_placeholder, format_dependencies, format_prefix_lines};
use super::layout::TemplateLayout;
use super::tokens::TokenSet;
use crate::error::{ConfigureError, Result};
use crate::variant::{SideEffectSet, TestFragment};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use walkdir::WalkDir;

/// Read access to everything a materialization run consumes
#[derive(Debug, Clone, Copy)]
pub struct MaterializePlan<'a> {
    pub project_name: &'a str,
    pub tokens: &'a TokenSet,
    pub side_effects: &'a SideEffectSet,
}

/// What a materialization run touched
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MaterializeReport {
    /// Files copied from the variant sub-tree
    pub activated: usize,
    /// Files whose tokens were substituted
    pub substituted: usize,
    /// Template-only paths removed
    pub removed: usize,
    pub renamed: usize,
    /// Entries written into the dependency manifest
    pub dependencies: usize,
    pub prefix_folded: bool,
}

/// Applies a plan to a template tree rooted at `root`
pub struct TemplateMaterializer {
    root: PathBuf,
    layout: TemplateLayout,
}

impl TemplateMaterializer {
    pub fn new(root: impl Into<PathBuf>, layout: TemplateLayout) -> Self {
        Self {
            root: root.into(),
            layout,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn layout(&self) -> &TemplateLayout {
        &self.layout
    }

    /// Run every step in order
    ///
    /// The variant sub-tree is copied in and the test fragment is read
    /// before cleanup removes the directories holding them. A failure
    /// leaves the tree partially materialized.
    pub async fn materialize(&self, plan: &MaterializePlan<'_>) -> Result<MaterializeReport> {
        let not_chosen = || ConfigureError::OutOfOrder("a variant must be chosen before materializing");
        let sub_tree = plan.side_effects.sub_tree().ok_or_else(not_chosen)?;
        let fragment = plan.side_effects.test_fragment().ok_or_else(not_chosen)?;

        let mut report = MaterializeReport {
            activated: self.activate_variant(sub_tree, plan.project_name).await?,
            ..Default::default()
        };
        let example = self.load_fragment(fragment).await?;

        report.substituted = self.substitute_files(plan.tokens).await?;
        report.removed = self.clean().await?;
        report.renamed = self.rename(plan.tokens).await?;
        report.dependencies = self
            .fold_dependencies(plan.side_effects.dependencies())
            .await?;
        report.prefix_folded = self
            .fold_prefix(plan.tokens, plan.side_effects.prefix_lines())
            .await?;
        self.fold_test_example(plan.tokens, fragment.extension, &example)
            .await?;

        Ok(report)
    }

    /// Copy the variant sub-tree into the root, naming `PROJECT` paths after the project
    pub async fn activate_variant(&self, sub_tree: &str, project_name: &str) -> Result<usize> {
        let source = self.root.join(&self.layout.variant_root).join(sub_tree);
        fs::metadata(&source)
            .await
            .map_err(|e| ConfigureError::read(&source, e))?;

        let mut copied = 0;
        for entry in WalkDir::new(&source).min_depth(1).sort_by_file_name() {
            let entry = entry.map_err(|e| {
                let path = e
                    .path()
                    .map(Path::to_path_buf)
                    .unwrap_or_else(|| source.clone());
                ConfigureError::read(path, e.into())
            })?;

            let relative = entry.path().strip_prefix(&source).unwrap_or(entry.path());
            let target = self.root.join(project_relative(
                relative,
                &self.layout.project_path_marker,
                project_name,
            ));

            if entry.file_type().is_dir() {
                fs::create_dir_all(&target)
                    .await
                    .map_err(|e| ConfigureError::write(&target, e))?;
                continue;
            }

            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent)
                    .await
                    .map_err(|e| ConfigureError::write(parent, e))?;
            }
            fs::copy(entry.path(), &target)
                .await
                .map_err(|e| ConfigureError::write(&target, e))?;
            copied += 1;
        }

        Ok(copied)
    }

    /// Read a test example snippet from the fragment library
    pub async fn load_fragment(&self, fragment: &TestFragment) -> Result<String> {
        let path = self
            .root
            .join(&self.layout.fragment_dir)
            .join(fragment.file_name());
        fs::read_to_string(&path)
            .await
            .map_err(|e| ConfigureError::read(&path, e))
    }

    /// Step 1: substitute tokens in every listed file
    pub async fn substitute_files(&self, tokens: &TokenSet) -> Result<usize> {
        for file in &self.layout.substitute {
            rewrite(&self.root.join(file), |text| tokens.substitute(text)).await?;
        }
        Ok(self.layout.substitute.len())
    }

    /// Step 2: remove template-only paths; missing ones are skipped
    pub async fn clean(&self) -> Result<usize> {
        let mut removed = 0;
        for asset in &self.layout.cleanup {
            if remove_path(&self.root.join(asset)).await? {
                removed += 1;
            }
        }

        if self.layout.cleanup_file_names.is_empty() {
            return Ok(removed);
        }

        let strays: Vec<PathBuf> = WalkDir::new(&self.root)
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter(|entry| {
                entry.file_type().is_file()
                    && self
                        .layout
                        .cleanup_file_names
                        .iter()
                        .any(|name| entry.file_name() == name.as_str())
            })
            .map(walkdir::DirEntry::into_path)
            .collect();

        for path in strays {
            fs::remove_file(&path)
                .await
                .map_err(|e| ConfigureError::write(&path, e))?;
            removed += 1;
        }

        Ok(removed)
    }

    /// Step 3: move placeholder-named paths to their project names
    pub async fn rename(&self, tokens: &TokenSet) -> Result<usize> {
        let mut renamed = 0;
        for rename in &self.layout.renames {
            let from = self.root.join(tokens.substitute(&rename.from));
            let to = self.root.join(tokens.substitute(&rename.to));
            if from == to {
                continue;
            }
            fs::rename(&from, &to)
                .await
                .map_err(|e| ConfigureError::read(&from, e))?;
            renamed += 1;
        }
        Ok(renamed)
    }

    /// Step 4: write dependency entries into the manifest's placeholder
    pub async fn fold_dependencies(&self, dependencies: &[String]) -> Result<usize> {
        let entries = format_dependencies(dependencies);
        let placeholder = &self.layout.dependency_placeholder;
        rewrite(&self.root.join(&self.layout.dependency_manifest), |text| {
            fold_placeholder(text, placeholder, &entries)
        })
        .await?;
        Ok(dependencies.len())
    }

    /// Step 5: splice prefix lines into the prefix header, if the variant has one
    pub async fn fold_prefix(&self, tokens: &TokenSet, lines: &[String]) -> Result<bool> {
        let path = self.root.join(tokens.substitute(&self.layout.prefix_header));
        let text = match fs::read_to_string(&path).await {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(false),
            Err(e) => return Err(ConfigureError::read(&path, e)),
        };

        let folded = fold_placeholder(
            &text,
            &self.layout.prefix_placeholder,
            &format_prefix_lines(lines),
        );
        fs::write(&path, folded)
            .await
            .map_err(|e| ConfigureError::write(&path, e))?;
        Ok(true)
    }

    /// Step 6: splice the test example into the variant's test stub
    pub async fn fold_test_example(
        &self,
        tokens: &TokenSet,
        extension: &str,
        example: &str,
    ) -> Result<()> {
        let stub = format!("{}.{}", self.layout.test_stub, extension);
        let placeholder = &self.layout.test_placeholder;
        rewrite(&self.root.join(tokens.substitute(&stub)), |text| {
            fold_placeholder(text, placeholder, example)
        })
        .await
    }
}

/// Whole-file read, edit and write back
async fn rewrite(path: &Path, edit: impl FnOnce(&str) -> String) -> Result<()> {
    let text = fs::read_to_string(path)
        .await
        .map_err(|e| ConfigureError::read(path, e))?;
    let updated = edit(&text);
    fs::write(path, updated)
        .await
        .map_err(|e| ConfigureError::write(path, e))
}

/// Remove a file or directory tree; returns false when nothing was there
async fn remove_path(path: &Path) -> Result<bool> {
    let metadata = match fs::symlink_metadata(path).await {
        Ok(metadata) => metadata,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(false),
        Err(e) => return Err(ConfigureError::write(path, e)),
    };

    let removal = if metadata.is_dir() {
        fs::remove_dir_all(path).await
    } else {
        fs::remove_file(path).await
    };
    removal.map_err(|e| ConfigureError::write(path, e))?;
    Ok(true)
}

/// Rename each path component containing `marker` after the project
fn project_relative(relative: &Path, marker: &str, project_name: &str) -> PathBuf {
    if marker.is_empty() {
        return relative.to_path_buf();
    }
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy().replace(marker, project_name))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::values::ValueKey;
    use crate::variant::{Variant, VariantSelector};
    use chrono::NaiveDate;
    use std::fs as stdfs;
    use tempfile::TempDir;

    fn write(root: &Path, path: &str, content: &str) {
        let full = root.join(path);
        stdfs::create_dir_all(full.parent().unwrap()).unwrap();
        stdfs::write(full, content).unwrap();
    }

    fn read(root: &Path, path: &str) -> String {
        stdfs::read_to_string(root.join(path)).unwrap()
    }

    /// A small copy of the library template tree
    fn template_tree() -> TempDir {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();

        write(root, "POD_LICENSE", "Copyright (c) ${YEAR} ${USER_NAME} <${USER_EMAIL}>\n");
        write(
            root,
            "POD_README.md",
            "# ${POD_NAME}\nhttps://github.com/${GITHUB_ACCOUNT_NAME}/${REPO_NAME}\n${UNKNOWN}\n",
        );
        write(
            root,
            "NAME.podspec",
            "s.name = '${POD_NAME}'\ns.homepage = 'https://github.com/${GITHUB_ACCOUNT_NAME}/${REPO_NAME}'\n",
        );
        write(root, ".travis.yml", "# ${POD_NAME} created ${DATE}\n");
        write(root, "Cartfile.private", "# Test dependencies\n${INCLUDED_LIBS}\n# end\n");
        write(root, "README.md", "template readme\n");
        write(root, "LICENSE", "template license\n");
        write(root, "CODE_OF_CONDUCT.md", "be kind\n");
        write(root, "configure", "#!/bin/sh\n");
        write(root, "Pod/Classes/.gitkeep", "");
        write(root, "Pod/Classes/ReplaceMe.m", "");
        write(root, "Pod/Assets/.gitkeep", "");

        write(root, "setup/test_examples/quick.swift", "describe(\"these will pass\") {}\n");
        write(root, "setup/test_examples/specta.m", "SpecBegin(InitialSpecs)\nSpecEnd\n");
        write(root, "setup/test_examples/xctest.swift", "func testExample() {}\n");

        for (tree, stub) in [
            ("swift", "Tests.swift"),
            ("ios", "Tests.m"),
            ("macos-swift", "Tests.swift"),
        ] {
            write(
                root,
                &format!("templates/{}/Example/Podfile", tree),
                "target '${POD_NAME}_Example' do\n  pod '${POD_NAME}', :path => '../'\nend\n",
            );
            write(
                root,
                &format!("templates/{}/PROJECTTests/{}", tree, stub),
                "// Tests\n${TEST_EXAMPLE}\n",
            );
        }
        write(
            root,
            "templates/ios/PROJECTTests/Prefix.pch",
            "#ifdef __OBJC__\n  ${INCLUDED_PREFIXES}\n#endif\n",
        );

        dir
    }

    fn tokens(project_name: &str) -> TokenSet {
        TokenSet::for_project(
            project_name,
            |key| match key {
                ValueKey::UserName => "Jane Doe".to_string(),
                ValueKey::UserEmail => "jane@example.com".to_string(),
                ValueKey::AccountName => "janedoe".to_string(),
                ValueKey::OrganizationName => "Acme".to_string(),
                ValueKey::IdentifierPrefix => "com.acme".to_string(),
            },
            NaiveDate::from_ymd_opt(2024, 3, 7).unwrap(),
        )
    }

    fn effects_for(variant: Variant) -> SideEffectSet {
        let mut effects = SideEffectSet::default();
        effects.record(&VariantSelector::declarations_for(variant));
        effects
    }

    #[tokio::test]
    async fn test_end_to_end_ios_swift() {
        let dir = template_tree();
        let root = dir.path();
        let tokens = tokens("Foo+Bar");

        let mut effects = SideEffectSet::default();
        effects.record(&VariantSelector::declarations_for(Variant::IosSwift));
        effects.add_dependency("LibA");
        effects.add_dependency("LibB");

        let materializer = TemplateMaterializer::new(root, TemplateLayout::default());
        let report = materializer
            .materialize(&MaterializePlan {
                project_name: "Foo+Bar",
                tokens: &tokens,
                side_effects: &effects,
            })
            .await
            .unwrap();

        // Manifest entries joined by newline, surrounding text untouched
        assert_eq!(
            read(root, "Cartfile.private"),
            "# Test dependencies\ngithub \"Quick/Quick\"\ngithub \"Quick/Nimble\"\ngithub \"LibA\"\ngithub \"LibB\"\n# end\n"
        );
        assert!(read(root, "Cartfile.private").contains("github \"LibA\"\ngithub \"LibB\""));

        // Renames
        assert!(root.join("Foo+Bar/Classes/ReplaceMe.m").exists());
        assert!(!root.join("Pod").exists());
        assert!(root.join("Foo+Bar.podspec").exists());
        assert!(!root.join("NAME.podspec").exists());
        assert!(!root.join("POD_README.md").exists());
        assert!(!root.join("POD_LICENSE").exists());

        // Substitution, with the repository name derived from the project name
        assert_eq!(
            read(root, "README.md"),
            "# Foo+Bar\nhttps://github.com/janedoe/Foo-Bar\n${UNKNOWN}\n"
        );
        assert_eq!(
            read(root, "LICENSE"),
            "Copyright (c) 2024 Jane Doe <jane@example.com>\n"
        );
        assert_eq!(
            read(root, "Foo+Bar.podspec"),
            "s.name = 'Foo+Bar'\ns.homepage = 'https://github.com/janedoe/Foo-Bar'\n"
        );
        assert_eq!(read(root, ".travis.yml"), "# Foo+Bar created 2024/03/07\n");
        assert_eq!(
            read(root, "Example/Podfile"),
            "target 'Foo+Bar_Example' do\n  pod 'Foo+Bar', :path => '../'\nend\n"
        );

        // Cleanup
        for gone in ["templates", "setup", "configure", "CODE_OF_CONDUCT.md"] {
            assert!(!root.join(gone).exists(), "{} should be removed", gone);
        }
        assert!(!root.join("Foo+Bar/Classes/.gitkeep").exists());
        assert!(!root.join("Foo+Bar/Assets/.gitkeep").exists());

        // Test fragment spliced, no prefix header for Swift
        assert_eq!(
            read(root, "Foo+BarTests/Tests.swift"),
            "// Tests\ndescribe(\"these will pass\") {}\n\n"
        );
        assert!(!report.prefix_folded);
        assert_eq!(report.dependencies, 4);
        assert_eq!(report.renamed, 4);
        assert_eq!(report.substituted, 5);
    }

    #[tokio::test]
    async fn test_objc_folds_prefix_header() {
        let dir = template_tree();
        let root = dir.path();
        let tokens = tokens("Widget");
        let effects = effects_for(Variant::IosObjC);

        let report = TemplateMaterializer::new(root, TemplateLayout::default())
            .materialize(&MaterializePlan {
                project_name: "Widget",
                tokens: &tokens,
                side_effects: &effects,
            })
            .await
            .unwrap();

        assert!(report.prefix_folded);
        assert_eq!(
            read(root, "WidgetTests/Prefix.pch"),
            "#ifdef __OBJC__\n  @import Specta;\n  @import Expecta;\n#endif\n"
        );
        assert_eq!(
            read(root, "WidgetTests/Tests.m"),
            "// Tests\nSpecBegin(InitialSpecs)\nSpecEnd\n\n"
        );
    }

    #[tokio::test]
    async fn test_missing_fragment_is_fatal() {
        let dir = template_tree();
        let root = dir.path();
        stdfs::remove_file(root.join("setup/test_examples/xctest.swift")).unwrap();
        let tokens = tokens("Widget");
        let effects = effects_for(Variant::MacOs);

        let err = TemplateMaterializer::new(root, TemplateLayout::default())
            .materialize(&MaterializePlan {
                project_name: "Widget",
                tokens: &tokens,
                side_effects: &effects,
            })
            .await
            .unwrap_err();

        match err {
            ConfigureError::MissingTemplate { path, .. } => {
                assert!(path.ends_with("xctest.swift"))
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[tokio::test]
    async fn test_missing_substitution_target_is_fatal() {
        let dir = template_tree();
        let root = dir.path();
        stdfs::remove_file(root.join(".travis.yml")).unwrap();

        let err = TemplateMaterializer::new(root, TemplateLayout::default())
            .substitute_files(&tokens("Widget"))
            .await
            .unwrap_err();
        assert!(matches!(err, ConfigureError::MissingTemplate { .. }));
    }

    #[tokio::test]
    async fn test_substitution_twice_matches_once() {
        let dir = template_tree();
        let root = dir.path();
        let materializer = TemplateMaterializer::new(root, TemplateLayout::default());
        let tokens = tokens("Foo+Bar");

        materializer
            .activate_variant("swift", "Foo+Bar")
            .await
            .unwrap();
        materializer.substitute_files(&tokens).await.unwrap();
        let once: Vec<String> = materializer
            .layout()
            .substitute
            .iter()
            .map(|f| read(root, f))
            .collect();

        materializer.substitute_files(&tokens).await.unwrap();
        let twice: Vec<String> = materializer
            .layout()
            .substitute
            .iter()
            .map(|f| read(root, f))
            .collect();

        assert_eq!(once, twice);
    }

    #[tokio::test]
    async fn test_clean_tolerates_missing_paths() {
        let dir = template_tree();
        let materializer = TemplateMaterializer::new(dir.path(), TemplateLayout::default());

        let first = materializer.clean().await.unwrap();
        assert!(first > 0);
        assert_eq!(materializer.clean().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_activation_names_project_paths() {
        let dir = template_tree();
        let root = dir.path();
        let copied = TemplateMaterializer::new(root, TemplateLayout::default())
            .activate_variant("ios", "Widget")
            .await
            .unwrap();

        assert_eq!(copied, 3);
        assert!(root.join("WidgetTests/Tests.m").exists());
        assert!(root.join("WidgetTests/Prefix.pch").exists());
        assert!(root.join("Example/Podfile").exists());
        assert!(!root.join("PROJECTTests").exists());
    }

    #[tokio::test]
    async fn test_materialize_requires_variant() {
        let dir = template_tree();
        let tokens = tokens("Widget");
        let effects = SideEffectSet::default();

        let err = TemplateMaterializer::new(dir.path(), TemplateLayout::default())
            .materialize(&MaterializePlan {
                project_name: "Widget",
                tokens: &tokens,
                side_effects: &effects,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ConfigureError::OutOfOrder(_)));
    }

    #[test]
    fn test_project_relative() {
        assert_eq!(
            project_relative(Path::new("Example/PROJECT.xcodeproj"), "PROJECT", "Foo"),
            PathBuf::from("Example/Foo.xcodeproj")
        );
        assert_eq!(
            project_relative(Path::new("PROJECTTests/Tests.m"), "", "Foo"),
            PathBuf::from("PROJECTTests/Tests.m")
        );
    }
}
