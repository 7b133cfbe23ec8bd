//! Template variants and the declarations each one contributes

use std::fmt;

/// Target platform offered to the operator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Platform {
    Ios,
    MacOs,
}

impl Platform {
    /// Answers in the order they are offered; the first is the default
    pub const ANSWERS: [&'static str; 2] = ["iOS", "macOS"];

    /// Map a lower-cased choice answer back to a platform
    pub fn from_answer(answer: &str) -> Option<Self> {
        match answer.to_lowercase().as_str() {
            "ios" => Some(Platform::Ios),
            "macos" => Some(Platform::MacOs),
            _ => None,
        }
    }

    /// Whether this platform needs a language decision
    pub fn needs_language(&self) -> bool {
        matches!(self, Platform::Ios)
    }
}

/// Implementation language for platforms that offer one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Language {
    ObjC,
    Swift,
}

impl Language {
    pub const ANSWERS: [&'static str; 2] = ["ObjC", "Swift"];

    pub fn from_answer(answer: &str) -> Option<Self> {
        match answer.to_lowercase().as_str() {
            "objc" => Some(Language::ObjC),
            "swift" => Some(Language::Swift),
            _ => None,
        }
    }
}

/// The single active template variant of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Variant {
    MacOs,
    IosSwift,
    IosObjC,
}

impl Variant {
    pub const ALL: [Variant; 3] = [Variant::MacOs, Variant::IosSwift, Variant::IosObjC];

    /// Combine the platform and, when asked, the language into a variant
    ///
    /// Returns `None` when iOS is chosen without a language.
    pub fn from_choices(platform: Platform, language: Option<Language>) -> Option<Self> {
        match (platform, language) {
            (Platform::MacOs, _) => Some(Variant::MacOs),
            (Platform::Ios, Some(Language::Swift)) => Some(Variant::IosSwift),
            (Platform::Ios, Some(Language::ObjC)) => Some(Variant::IosObjC),
            (Platform::Ios, None) => None,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Variant::MacOs => "macOS (Swift)",
            Variant::IosSwift => "iOS (Swift)",
            Variant::IosObjC => "iOS (Objective-C)",
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Test example snippet in the fragment library, addressed as `<id>.<extension>`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TestFragment {
    pub id: &'static str,
    pub extension: &'static str,
}

impl TestFragment {
    pub fn file_name(&self) -> String {
        format!("{}.{}", self.id, self.extension)
    }
}

/// Everything a variant contributes to the run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Declarations {
    /// Directory under the variant root that holds this variant's files
    pub sub_tree: &'static str,
    pub dependencies: &'static [&'static str],
    pub prefix_lines: &'static [&'static str],
    pub test_fragment: TestFragment,
}

/// Maps each variant to its declarations
pub struct VariantSelector;

impl VariantSelector {
    pub fn declarations_for(variant: Variant) -> Declarations {
        match variant {
            Variant::MacOs => Declarations {
                sub_tree: "macos-swift",
                dependencies: &["Quick/Quick", "Quick/Nimble"],
                prefix_lines: &[],
                test_fragment: TestFragment {
                    id: "xctest",
                    extension: "swift",
                },
            },
            Variant::IosSwift => Declarations {
                sub_tree: "swift",
                dependencies: &["Quick/Quick", "Quick/Nimble"],
                prefix_lines: &[],
                test_fragment: TestFragment {
                    id: "quick",
                    extension: "swift",
                },
            },
            Variant::IosObjC => Declarations {
                sub_tree: "ios",
                dependencies: &["specta/specta", "specta/expecta"],
                prefix_lines: &["@import Specta;", "@import Expecta;"],
                test_fragment: TestFragment {
                    id: "specta",
                    extension: "m",
                },
            },
        }
    }
}

/// Deferred work gathered while configuring and applied during materialization
///
/// Entries keep their insertion order; duplicates are kept as given.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SideEffectSet {
    sub_tree: Option<String>,
    dependencies: Vec<String>,
    prefix_lines: Vec<String>,
    test_fragment: Option<TestFragment>,
}

impl SideEffectSet {
    pub fn add_dependency(&mut self, name: impl Into<String>) {
        self.dependencies.push(name.into());
    }

    pub fn add_prefix_line(&mut self, line: impl Into<String>) {
        self.prefix_lines.push(line.into());
    }

    /// Append everything a variant declares
    pub fn record(&mut self, declarations: &Declarations) {
        self.sub_tree = Some(declarations.sub_tree.to_string());
        for dependency in declarations.dependencies {
            self.add_dependency(*dependency);
        }
        for line in declarations.prefix_lines {
            self.add_prefix_line(*line);
        }
        self.test_fragment = Some(declarations.test_fragment);
    }

    pub fn sub_tree(&self) -> Option<&str> {
        self.sub_tree.as_deref()
    }

    pub fn dependencies(&self) -> &[String] {
        &self.dependencies
    }

    pub fn prefix_lines(&self) -> &[String] {
        &self.prefix_lines
    }

    pub fn test_fragment(&self) -> Option<&TestFragment> {
        self.test_fragment.as_ref()
    }
}
