//! Kotlin identifier rules.

/// Kotlin hard keywords. These can only be used as identifiers when
/// escaped with backticks.
pub const KOTLIN_HARD_KEYWORDS: &[&str] = &[
    "as", "break", "class", "continue", "do", "else", "false", "for", "fun", "if", "in",
    "interface", "is", "null", "object", "package", "return", "super", "this", "throw", "true",
    "try", "typealias", "typeof", "val", "var", "when", "while",
];

/// Check if a name is a Kotlin hard keyword.
pub fn is_hard_keyword(name: &str) -> bool {
    KOTLIN_HARD_KEYWORDS.contains(&name)
}

/// Escape a name with backticks when it collides with a hard keyword.
pub fn escape_identifier(name: &str) -> String {
    if is_hard_keyword(name) {
        format!("`{}`", name)
    } else {
        name.to_string()
    }
}

/// Check that a name is a plain (unescaped) Kotlin identifier.
///
/// Returns `None` if valid, `Some(reason)` if invalid.
pub fn is_valid_identifier(name: &str) -> Option<&'static str> {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return Some("name cannot be empty");
    };

    if !(first.is_alphabetic() || first == '_') {
        return Some("name must start with a letter or underscore");
    }

    if !chars.all(|c| c.is_alphanumeric() || c == '_') {
        return Some("name may only contain letters, digits, and underscores");
    }

    None
}
