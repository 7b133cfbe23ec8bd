//! Splicing accumulated declarations into placeholder regions

/// Separator between dependency manifest entries
pub const DEPENDENCY_SEPARATOR: &str = "\n";

/// Separator between prefix header lines (keeps the header's indentation)
pub const PREFIX_SEPARATOR: &str = "\n  ";

/// Format dependency names as manifest entries, one per line
pub fn format_dependencies(dependencies: &[String]) -> String {
    dependencies
        .iter()
        .map(|name| format!("github \"{}\"", name))
        .collect::<Vec<_>>()
        .join(DEPENDENCY_SEPARATOR)
}

/// Join prefix header lines
pub fn format_prefix_lines(lines: &[String]) -> String {
    lines.join(PREFIX_SEPARATOR)
}

/// Replace a placeholder region, leaving everything around it untouched
pub fn fold_placeholder(text: &str, placeholder: &str, content: &str) -> String {
    text.replace(placeholder, content)
}
