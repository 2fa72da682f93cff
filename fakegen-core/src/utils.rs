//! Shared string utilities for code generation.

/// Uppercase the first character (e.g., "findById" -> "FindById").
///
/// Unlike [`to_pascal_case`], the rest of the string is left untouched,
/// which is what Kotlin member names need when they are embedded in a
/// generated name such as `configureFindById`.
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        None => String::new(),
        Some(c) => c.to_uppercase().chain(chars).collect(),
    }
}

/// Lowercase the first character (e.g., "UserRepository" -> "userRepository").
pub fn decapitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        None => String::new(),
        Some(c) => c.to_lowercase().chain(chars).collect(),
    }
}

/// Convert a string to PascalCase (e.g., "hello_world" -> "HelloWorld")
pub fn to_pascal_case(s: &str) -> String {
    s.split(['_', '-', '.'])
        .map(capitalize)
        .collect()
}

/// Convert a string to camelCase (e.g., "hello_world" -> "helloWorld")
pub fn to_camel_case(s: &str) -> String {
    decapitalize(&to_pascal_case(s))
}
